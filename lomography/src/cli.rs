//! Command line: one picture path and a help flag.

use crate::{Error, Result};
use clap::{ArgAction, CommandFactory, Parser};
use std::{ffi::OsString, path::PathBuf};

#[derive(Parser, Debug)]
#[command(name = "lomography", about = "Lomography v1.0", disable_help_flag = true)]
pub struct Cli {
    /// Picture file
    #[arg(value_name = "FILENAME")]
    pub filename: Option<PathBuf>,

    /// Print this message
    #[arg(short = 'h', long = "help", short_alias = '?', action = ArgAction::SetTrue)]
    pub help: bool,
}

impl Cli {
    /// Parse `args` (program name first) into the picture path.
    ///
    /// A help request or a missing filename is reported as [`Error::Usage`]
    /// carrying the rendered help text.
    pub fn parse_from_args<I, T>(args: I) -> Result<PathBuf>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| Error::ArgumentParse(e.render().to_string()))?;

        match cli.filename {
            Some(filename) if !cli.help && !filename.as_os_str().is_empty() => Ok(filename),
            _ => Err(Error::Usage(usage())),
        }
    }
}

pub fn usage() -> String {
    Cli::command().render_help().to_string()
}
