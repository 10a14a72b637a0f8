use std::process::ExitCode;

fn main() -> ExitCode {
    lomography::init_logger();

    let program = std::env::args_os()
        .next()
        .map(|arg| arg.to_string_lossy().into_owned())
        .unwrap_or_else(|| "lomography".to_string());

    match lomography::run(std::env::args_os()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report(&program);
            ExitCode::FAILURE
        }
    }
}
