//! `show` command: print one stored session in full.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waytrail_core::{
    DestinationSummary, HistoryRecord, HistoryStore, RecordId, SqliteHistoryStore,
    label_for_order,
};

use crate::{
    ARG_DATABASE, ARG_RECORD_ID, CliError, ENV_SHOW_DATABASE, ENV_SHOW_ID, require_database,
};

/// Output rendering for `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// Aligned, human-readable fields.
    #[default]
    Text,
    /// The stored record as pretty-printed JSON.
    Json,
}

/// CLI arguments for the `show` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Print a stored navigation session, including every stop \
                 with its arrival time and alarm state.",
    about = "Print one stored navigation session"
)]
#[ortho_config(prefix = "WAYTRAIL")]
pub(crate) struct ShowArgs {
    /// Identifier of the record to print.
    #[arg(value_name = "id")]
    #[serde(default)]
    pub(crate) id: Option<String>,
    /// Path to the SQLite history database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Output format.
    #[arg(long, value_enum, value_name = "format")]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
}

impl ShowArgs {
    pub(crate) fn into_config(self) -> Result<ShowConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ShowConfig::try_from(merged)
    }
}

/// Resolved `show` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShowConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) id: RecordId,
    pub(crate) format: OutputFormat,
}

impl TryFrom<ShowArgs> for ShowConfig {
    type Error = CliError;

    fn try_from(args: ShowArgs) -> Result<Self, Self::Error> {
        let raw = args.id.ok_or(CliError::MissingArgument {
            field: ARG_RECORD_ID,
            env: ENV_SHOW_ID,
        })?;
        let parsed = raw.trim().parse::<RecordId>();
        let id = parsed.map_err(|source| CliError::InvalidRecordId { raw, source })?;
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_SHOW_DATABASE,
        })?;
        Ok(Self {
            database,
            id,
            format: args.format.unwrap_or_default(),
        })
    }
}

pub(crate) fn run_show(args: ShowArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_database(&config.database)?;
    let store = SqliteHistoryStore::open_read_only(&config.database)?;
    let record = store
        .get(config.id)?
        .ok_or(CliError::RecordNotFound { id: config.id })?;
    let rendered = match config.format {
        OutputFormat::Text => render_text(&record),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&record).map_err(CliError::SerialiseRecord)?
        }
    };
    writeln!(writer, "{rendered}").map_err(CliError::WriteOutput)
}

pub(crate) fn render_text(record: &HistoryRecord) -> String {
    let ended = record
        .ended_at()
        .map_or_else(|| "-".to_owned(), |at| at.to_rfc3339());
    let mut lines = vec![
        format!("Record    {}", record.id()),
        format!("Route     {}", record.description()),
        format!("Status    {}", record.status()),
        format!("Started   {}", record.started_at().to_rfc3339()),
        format!("Ended     {ended}"),
        format!("Duration  {}", record.duration_text()),
        format!(
            "Progress  {}/{} stops ({}%)",
            record.completed_stops(),
            record.total_stops(),
            record.completion_percentage()
        ),
        format!("Distance  {:.1} km", record.total_distance_km()),
        format!("Alarms    {}", record.alarms_triggered()),
        format!("User      {}", record.user_id().unwrap_or("-")),
    ];
    if let Some(start) = record.start_location() {
        lines.push(format!("From      {}", start.name));
    }
    if !record.destinations().is_empty() {
        lines.push("Stops".to_owned());
        lines.extend(record.destinations().iter().map(stop_line));
    }
    lines.join("\n")
}

fn stop_line(stop: &DestinationSummary) -> String {
    let state = if stop.completed { "passed" } else { "pending" };
    let arrived = stop
        .arrived_at
        .map(|at| format!("  arrived {}", at.format("%H:%M")))
        .unwrap_or_default();
    let alarm = if stop.alarm_triggered { "  alarm" } else { "" };
    format!(
        "  {label:<3}{name}  {state}{arrived}{alarm}",
        label = label_for_order(stop.order),
        name = stop.name,
    )
}
