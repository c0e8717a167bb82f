//! Command-line interface for browsing Waytrail navigation history.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use clap::{Parser, Subcommand};
use std::io;

mod error;
mod history;
mod show;

pub use error::CliError;
use history::HistoryArgs;
use show::ShowArgs;

pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_STATUS: &str = "status";
pub(crate) const ARG_QUERY: &str = "query";
pub(crate) const ARG_USER: &str = "user";
pub(crate) const ARG_RECORD_ID: &str = "id";
pub(crate) const ENV_HISTORY_DATABASE: &str = "WAYTRAIL_CMDS_HISTORY_DATABASE";
pub(crate) const ENV_SHOW_DATABASE: &str = "WAYTRAIL_CMDS_SHOW_DATABASE";
pub(crate) const ENV_SHOW_ID: &str = "WAYTRAIL_CMDS_SHOW_ID";

/// Run the Waytrail CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::History(args) => history::run_history(args, &mut stdout),
        Command::Show(args) => show::run_show(args, &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waytrail",
    about = "Inspect navigation history recorded by the Waytrail engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List stored sessions, optionally filtered by status and text.
    History(HistoryArgs),
    /// Print every detail of one stored session.
    Show(ShowArgs),
}

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_database(path: &Utf8Path) -> Result<(), CliError> {
    match database_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::DatabaseNotFile {
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            Err(CliError::MissingDatabase {
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectDatabase {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Look the file up through its parent directory with capability-based IO.
///
/// A bare file name resolves against the current directory.
fn database_is_file(path: &Utf8Path) -> io::Result<bool> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "database path has no file name")
    })?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(name).map(|metadata| metadata.is_file())
}

#[cfg(test)]
mod tests;
