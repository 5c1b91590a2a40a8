//! Command-line arguments and usage-error reporting

use clap::Parser;
use std::fmt;
use std::path::PathBuf;

/// Exit code for a malformed command line (wrong positional count).
pub const EXIT_USAGE: i32 = 1;
/// Exit code for a required value missing while `--no-input` is set.
pub const EXIT_MISSING_VALUE: i32 = 2;

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(
    author,
    version,
    about = "Worldbak - back up a game world from an FTP server to a local directory"
)]
pub struct Args {
    /// Name of the world directory on the FTP server
    #[arg(value_name = "WORLD")]
    pub world: Vec<String>,

    /// Address of the FTP server (refer to your hosting service documentation)
    #[arg(long)]
    pub addr: Option<String>,

    /// Port of the FTP server
    #[arg(long)]
    pub port: Option<String>,

    /// Username for the FTP login
    #[arg(long)]
    pub user: Option<String>,

    /// Path to a file whose entire content is used as the password
    #[arg(long)]
    pub password_file: Option<PathBuf>,

    /// Local directory name for the backup (defaults to the world name)
    #[arg(long)]
    pub output: Option<String>,

    /// Append the current date (YYYYMMDD) to the backup directory name
    #[arg(long)]
    pub with_timestamp: bool,

    /// Never prompt interactively; fail if a required value is missing
    #[arg(long)]
    pub no_input: bool,

    /// Suppress progress bars and informational output
    #[arg(long)]
    pub quiet: bool,

    /// Append JSONL log entries to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// A command-line usage failure carrying its process exit code.
///
/// Raised by argument and credential validation, recognized by the
/// top-level error handler, which prints the help text and exits with
/// the carried code instead of the generic operational-failure code.
#[derive(Debug)]
pub struct Usage {
    pub code: i32,
    pub message: String,
}

impl Usage {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Usage {}

/// Validate that exactly one world name was given on the command line.
pub fn world_argument(world: &[String]) -> Result<&str, Usage> {
    match world {
        [name] => Ok(name.as_str()),
        [] => Err(Usage::new(
            EXIT_USAGE,
            "You must specify the name of the world to back up",
        )),
        _ => Err(Usage::new(
            EXIT_USAGE,
            "Too many arguments, exactly one world name is expected",
        )),
    }
}
