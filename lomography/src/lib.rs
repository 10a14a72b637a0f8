//! Lomography filter
//!
//! Loads a photograph and previews two cosmetic effects in a slint window:
//! a sigmoid tone curve on the red channel and a dark halo vignette. Each
//! slider change recomputes the affected filter synchronously and the `s`
//! key writes the preview to `output.jpg`.
//!
//! # Architecture
//! - `cli`: command line parsing
//! - `config`: persisted slider defaults and encoder settings
//! - `controller`: the filter pipeline state machine, independent of the UI
//! - `logic`: slint callback wiring

slint::include_modules!();

#[macro_use]
extern crate derivative;

pub mod cli;
pub mod config;
pub mod controller;

mod logic;

use controller::Controller;
use lomo_effect::{ColorCurveConfig, VignetteConfig};
use std::{cell::RefCell, ffi::OsString, fmt::Display, path::PathBuf, rc::Rc};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    ArgumentParse(String),

    #[error("Unable to open picture {}: {message}", .path.display())]
    ImageLoad { path: PathBuf, message: String },

    #[error("{operation} failed: {message}")]
    Library {
        operation: &'static str,
        message: String,
    },
}

impl Error {
    pub fn library(operation: &'static str, err: impl Display) -> Self {
        Error::Library {
            operation,
            message: err.to_string(),
        }
    }

    /// The stream and text the command line reports this error with.
    pub fn render(&self, program: &str) -> (Stream, String) {
        match self {
            Error::Usage(usage) => (Stream::Stdout, usage.clone()),
            Error::ArgumentParse(detail) => (Stream::Stderr, detail.clone()),
            _ => (Stream::Stderr, format!("Error: {program}: {self}")),
        }
    }

    pub fn report(&self, program: &str) {
        match self.render(program) {
            (Stream::Stdout, text) => println!("{text}"),
            (Stream::Stderr, text) => eprintln!("{text}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Initializes the logger.
///
/// Sets up a custom logger format with timestamp, log level, file name, line number,
/// and log message. `RUST_LOG` overrides the default `info` level.
pub fn init_logger() {
    use std::io::Write;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

/// Parses `args`, loads the picture and runs the interactive session until a
/// key press or the window closes.
pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let filename = cli::Cli::parse_from_args(args)?;

    let original = controller::load_image(&filename)?;

    config::init();
    let conf = config::all();
    let controller = Controller::new(
        original,
        ColorCurveConfig::new().with_strength(conf.preview.strength.clamp(0, 20)),
        VignetteConfig::new().with_radius(conf.preview.radius.clamp(0, 100)),
    )
    .with_jpeg_quality(conf.output.jpeg_quality);

    let ui = AppWindow::new().map_err(|e| Error::library("create window", e))?;
    let session = Rc::new(RefCell::new(logic::Session::new(controller)));
    logic::init(&ui, &session);

    log::debug!("start...");
    ui.run().map_err(|e| Error::library("event loop", e))?;
    log::debug!("exit...");

    let outcome = session.borrow_mut().outcome.take();
    match outcome {
        Some(Err(e)) => Err(e),
        Some(Ok(end)) => {
            log::info!("session ended: {end:?}");
            Ok(())
        }
        None => {
            log::info!("session ended: window closed");
            Ok(())
        }
    }
}
