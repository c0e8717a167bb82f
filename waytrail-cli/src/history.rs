//! `history` command: list stored sessions through a [`HistoryQuery`].

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waytrail_core::{
    FilterCategory, HistoryQuery, HistoryRecord, HistoryStore, SqliteHistoryStore,
};

use crate::{
    ARG_DATABASE, ARG_QUERY, ARG_STATUS, ARG_USER, CliError, ENV_HISTORY_DATABASE,
    require_database,
};

/// CLI arguments for the `history` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "List stored navigation sessions, newest first. Categories \
                 and search text narrow the listing; the database path can \
                 come from CLI flags, configuration files, or environment \
                 variables.",
    about = "List stored navigation sessions"
)]
#[ortho_config(prefix = "WAYTRAIL")]
pub(crate) struct HistoryArgs {
    /// Path to the SQLite history database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Comma-separated categories: in-progress, completed, cancelled.
    #[arg(long = ARG_STATUS, value_name = "categories")]
    #[serde(default)]
    pub(crate) status: Option<String>,
    /// Case-insensitive text matched against descriptions and stop names.
    #[arg(long = ARG_QUERY, value_name = "text")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Only list sessions recorded for this user.
    #[arg(long = ARG_USER, value_name = "id")]
    #[serde(default)]
    pub(crate) user: Option<String>,
}

impl HistoryArgs {
    pub(crate) fn into_config(self) -> Result<HistoryConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        HistoryConfig::try_from(merged)
    }
}

/// Resolved `history` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HistoryConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) query: HistoryQuery,
    pub(crate) user: Option<String>,
}

impl TryFrom<HistoryArgs> for HistoryConfig {
    type Error = CliError;

    fn try_from(args: HistoryArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_HISTORY_DATABASE,
        })?;
        let mut query = HistoryQuery::new().with_text(args.query.unwrap_or_default());
        for category in parse_categories(args.status.as_deref().unwrap_or_default())? {
            query.add_category(category);
        }
        Ok(Self {
            database,
            query,
            user: args.user,
        })
    }
}

/// Split a comma-separated category list, ignoring blank entries.
pub(crate) fn parse_categories(raw: &str) -> Result<Vec<FilterCategory>, CliError> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.parse::<FilterCategory>().map_err(CliError::from))
        .collect()
}

pub(crate) fn run_history(args: HistoryArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_database(&config.database)?;
    let store = SqliteHistoryStore::open_read_only(&config.database)?;
    let records = store.list(config.user.as_deref())?;
    let visible = config.query.filter(&records);
    debug!(
        "{} of {} history records match the query",
        visible.len(),
        records.len()
    );
    write_history(writer, &visible)
}

fn write_history(writer: &mut dyn Write, records: &[&HistoryRecord]) -> Result<(), CliError> {
    if records.is_empty() {
        return writeln!(writer, "No matching history records").map_err(CliError::WriteOutput);
    }
    for record in records {
        writeln!(writer, "{}", summary_line(record)).map_err(CliError::WriteOutput)?;
    }
    Ok(())
}

/// One listing row: id, start, status, stops, duration and description.
pub(crate) fn summary_line(record: &HistoryRecord) -> String {
    format!(
        "{id}  {started}  {status:<11}  {done}/{total} ({percent}%)  {duration:>7}  {description}",
        id = record.id(),
        started = record.started_at().format("%Y-%m-%d %H:%M"),
        status = record.status().as_str(),
        done = record.completed_stops(),
        total = record.total_stops(),
        percent = record.completion_percentage(),
        duration = record.duration_text(),
        description = record.description(),
    )
}
