//! Focused unit tests covering command configuration and validation.

use super::*;
use crate::history::{HistoryArgs, HistoryConfig, parse_categories};
use crate::show::{OutputFormat, ShowArgs, ShowConfig};
use camino::Utf8PathBuf;
use rstest::rstest;
use std::fs;
use tempfile::TempDir;
use waytrail_core::{FilterCategory, NavigationStatus, RecordId};

fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir")
}

#[rstest]
fn history_requires_a_database() {
    let err = HistoryConfig::try_from(HistoryArgs::default()).expect_err("missing database");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_DATABASE);
            assert_eq!(env, ENV_HISTORY_DATABASE);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn history_config_builds_the_query() {
    let args = HistoryArgs {
        database: Some(Utf8PathBuf::from("history.db")),
        status: Some("cancelled, in-progress".to_owned()),
        query: Some("Market".to_owned()),
        user: Some("ana".to_owned()),
    };
    let config = HistoryConfig::try_from(args).expect("valid arguments");
    assert_eq!(config.database, Utf8PathBuf::from("history.db"));
    assert_eq!(config.user.as_deref(), Some("ana"));
    assert_eq!(config.query.text(), "Market");
    let statuses: Vec<_> = config.query.statuses().iter().copied().collect();
    assert_eq!(
        statuses,
        vec![
            NavigationStatus::InProgress,
            NavigationStatus::Cancelled,
            NavigationStatus::Failed,
        ]
    );
}

#[rstest]
#[case("", vec![])]
#[case("completed", vec![FilterCategory::Completed])]
#[case(
    "completed,,cancelled",
    vec![FilterCategory::Completed, FilterCategory::Cancelled]
)]
fn categories_parse_from_comma_lists(#[case] raw: &str, #[case] expected: Vec<FilterCategory>) {
    assert_eq!(parse_categories(raw).expect("valid categories"), expected);
}

#[rstest]
fn unknown_categories_are_rejected() {
    let err = parse_categories("completed,archived").expect_err("unknown category");
    match err {
        CliError::InvalidCategory(inner) => assert_eq!(inner.0, "archived"),
        other => panic!("expected InvalidCategory, found {other:?}"),
    }
}

#[rstest]
fn show_requires_an_id() {
    let args = ShowArgs {
        database: Some(Utf8PathBuf::from("history.db")),
        ..ShowArgs::default()
    };
    let err = ShowConfig::try_from(args).expect_err("missing id");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_RECORD_ID);
            assert_eq!(env, ENV_SHOW_ID);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn show_rejects_malformed_ids() {
    let args = ShowArgs {
        id: Some("not-a-uuid".to_owned()),
        database: Some(Utf8PathBuf::from("history.db")),
        format: None,
    };
    let err = ShowConfig::try_from(args).expect_err("malformed id");
    match err {
        CliError::InvalidRecordId { raw, .. } => assert_eq!(raw, "not-a-uuid"),
        other => panic!("expected InvalidRecordId, found {other:?}"),
    }
}

#[rstest]
fn show_defaults_to_text_output() {
    let id = RecordId::new();
    let args = ShowArgs {
        id: Some(id.to_string()),
        database: Some(Utf8PathBuf::from("history.db")),
        format: None,
    };
    let config = ShowConfig::try_from(args).expect("valid arguments");
    assert_eq!(config.id, id);
    assert_eq!(config.format, OutputFormat::Text);
}

#[rstest]
fn require_database_reports_missing_files() {
    let dir = TempDir::new().expect("tempdir");
    let missing = utf8_dir(&dir).join("absent.db");
    let err = require_database(&missing).expect_err("missing database");
    match err {
        CliError::MissingDatabase { path } => assert_eq!(path, missing),
        other => panic!("expected MissingDatabase, found {other:?}"),
    }
}

#[rstest]
fn require_database_reports_missing_parent_directory() {
    let dir = TempDir::new().expect("tempdir");
    let missing = utf8_dir(&dir).join("absent").join("history.db");
    let err = require_database(&missing).expect_err("parent directory is missing");
    match err {
        CliError::MissingDatabase { path } => assert_eq!(path, missing),
        other => panic!("expected MissingDatabase, found {other:?}"),
    }
}

#[rstest]
fn require_database_rejects_paths_without_a_file_name() {
    let dir = TempDir::new().expect("tempdir");
    let dotted = utf8_dir(&dir).join("..");
    let err = require_database(&dotted).expect_err("no file name to look up");
    match err {
        CliError::InspectDatabase { path, source } => {
            assert_eq!(path, dotted);
            assert_eq!(source.kind(), std::io::ErrorKind::InvalidInput);
        }
        other => panic!("expected InspectDatabase, found {other:?}"),
    }
}

#[rstest]
fn require_database_rejects_directories() {
    let dir = TempDir::new().expect("tempdir");
    let err = require_database(&utf8_dir(&dir)).expect_err("directory is not a database");
    match err {
        CliError::DatabaseNotFile { .. } => {}
        other => panic!("expected DatabaseNotFile, found {other:?}"),
    }
}

#[rstest]
fn require_database_accepts_files() {
    let dir = TempDir::new().expect("tempdir");
    let path = utf8_dir(&dir).join("history.db");
    fs::write(&path, b"").expect("write database file");
    require_database(&path).expect("existing file is accepted");
}

#[rstest]
fn merged_layers_honour_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({ "database": "from-file.db", "status": "completed" }),
        None,
    );
    composer.push_environment(json!({ "database": "from-env.db" }));
    composer.push_cli(json!({ "query": "harbour" }));

    let merged = HistoryArgs::merge_from_layers(composer.layers()).expect("layers merge");
    let config = HistoryConfig::try_from(merged).expect("valid configuration");
    assert_eq!(config.database, Utf8PathBuf::from("from-env.db"));
    assert_eq!(config.query.text(), "harbour");
    assert!(config.query.has_category(FilterCategory::Completed));
}
