//! End-to-end tests running commands against a seeded SQLite database.

use super::helpers::SeededDatabase;
use super::*;
use crate::history::{HistoryArgs, run_history};
use crate::show::{OutputFormat, ShowArgs, run_show};
use rstest::{fixture, rstest};
use waytrail_core::{HistoryRecord, NavigationStatus, RecordId};

#[fixture]
fn seeded() -> SeededDatabase {
    SeededDatabase::new()
}

fn history_output(seeded: &SeededDatabase, args: HistoryArgs) -> Vec<String> {
    let args = HistoryArgs {
        database: Some(seeded.path().to_path_buf()),
        ..args
    };
    let mut buffer = Vec::new();
    run_history(args, &mut buffer).expect("history command succeeds");
    String::from_utf8(buffer)
        .expect("utf-8 output")
        .lines()
        .map(str::to_owned)
        .collect()
}

fn show_output(seeded: &SeededDatabase, id: RecordId, format: OutputFormat) -> String {
    let args = ShowArgs {
        id: Some(id.to_string()),
        database: Some(seeded.path().to_path_buf()),
        format: Some(format),
    };
    let mut buffer = Vec::new();
    run_show(args, &mut buffer).expect("show command succeeds");
    String::from_utf8(buffer).expect("utf-8 output")
}

fn ids(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| line.split_whitespace().next().map(str::to_owned))
        .collect()
}

#[rstest]
fn history_lists_newest_first(seeded: SeededDatabase) {
    let lines = history_output(&seeded, HistoryArgs::default());
    assert_eq!(
        ids(&lines),
        vec![
            seeded.in_progress.to_string(),
            seeded.failed.to_string(),
            seeded.cancelled.to_string(),
            seeded.completed.to_string(),
        ]
    );
}

#[rstest]
fn cancelled_category_includes_failures(seeded: SeededDatabase) {
    let args = HistoryArgs {
        status: Some("cancelled".to_owned()),
        ..HistoryArgs::default()
    };
    let lines = history_output(&seeded, args);
    assert_eq!(
        ids(&lines),
        vec![seeded.failed.to_string(), seeded.cancelled.to_string()]
    );
}

#[rstest]
fn text_query_matches_destination_names(seeded: SeededDatabase) {
    let args = HistoryArgs {
        query: Some("market".to_owned()),
        ..HistoryArgs::default()
    };
    let lines = history_output(&seeded, args);
    let [line] = lines.as_slice() else {
        panic!("expected a single row, found {lines:?}");
    };
    assert!(line.starts_with(&seeded.completed.to_string()));
    assert!(line.contains("completed"));
    assert!(line.contains("2/2 (100%)"));
    assert!(line.ends_with("Harbour → Market"));
}

#[rstest]
fn user_filter_narrows_the_listing(seeded: SeededDatabase) {
    let args = HistoryArgs {
        user: Some("ana".to_owned()),
        ..HistoryArgs::default()
    };
    let lines = history_output(&seeded, args);
    assert_eq!(ids(&lines), vec![seeded.in_progress.to_string()]);
}

#[rstest]
fn empty_results_print_a_notice(seeded: SeededDatabase) {
    let args = HistoryArgs {
        query: Some("lighthouse".to_owned()),
        ..HistoryArgs::default()
    };
    let lines = history_output(&seeded, args);
    assert_eq!(lines, vec!["No matching history records".to_owned()]);
}

#[rstest]
fn show_prints_stops_with_arrivals(seeded: SeededDatabase) {
    let text = show_output(&seeded, seeded.completed, OutputFormat::Text);
    assert!(text.contains("Route     Harbour → Market"));
    assert!(text.contains("Status    completed"));
    assert!(text.contains("Duration  26m"));
    assert!(text.contains("Progress  2/2 stops (100%)"));
    assert!(text.contains("Alarms    2"));
    assert!(text.contains("From      Home"));
    assert!(text.contains("  A  Harbour  passed  arrived 12:12  alarm"));
    assert!(text.contains("  B  Market  passed  arrived 12:25  alarm"));
}

#[rstest]
fn show_prints_json_records(seeded: SeededDatabase) {
    let json = show_output(&seeded, seeded.cancelled, OutputFormat::Json);
    let record: HistoryRecord = serde_json::from_str(&json).expect("valid record JSON");
    assert_eq!(record.id(), seeded.cancelled);
    assert_eq!(record.status(), NavigationStatus::Cancelled);
    assert_eq!(record.description(), "Trip to Station");
}

#[rstest]
fn show_reports_unknown_records(seeded: SeededDatabase) {
    let missing = RecordId::new();
    let args = ShowArgs {
        id: Some(missing.to_string()),
        database: Some(seeded.path().to_path_buf()),
        format: None,
    };
    let err = run_show(args, &mut Vec::<u8>::new()).expect_err("unknown record");
    match err {
        CliError::RecordNotFound { id } => assert_eq!(id, missing),
        other => panic!("expected RecordNotFound, found {other:?}"),
    }
}
