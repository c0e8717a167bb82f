//! Error types emitted by the Waytrail CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use waytrail_core::{ParseCategoryError, RecordId, SqliteHistoryStoreError};

/// Errors emitted by the Waytrail CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The history database does not exist.
    #[error("history database {path:?} does not exist")]
    MissingDatabase { path: Utf8PathBuf },
    /// The history database path names something other than a file.
    #[error("history database {path:?} exists but is not a file")]
    DatabaseNotFile { path: Utf8PathBuf },
    /// The history database path could not be inspected.
    #[error("failed to inspect history database {path:?}: {source}")]
    InspectDatabase {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A `--status` entry named no known category.
    #[error(transparent)]
    InvalidCategory(#[from] ParseCategoryError),
    /// The record identifier is not a UUID.
    #[error("invalid record id {raw:?}: {source}")]
    InvalidRecordId {
        raw: String,
        #[source]
        source: uuid::Error,
    },
    /// No stored session carries the identifier.
    #[error("no history record with id {id}")]
    RecordNotFound { id: RecordId },
    /// Reading from the history store failed.
    #[error("history store error: {0}")]
    Store(#[from] SqliteHistoryStoreError),
    /// Serialising a record failed.
    #[error("failed to serialise history record: {0}")]
    SerialiseRecord(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
