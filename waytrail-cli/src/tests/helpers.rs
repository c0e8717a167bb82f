//! Test helpers for seeding a history database on disk.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use waytrail_core::test_support::instant;
use waytrail_core::{
    HistoryRecord, HistoryStore, NavigationSession, NavigationStatus, Place, RecordId, Route,
    SqliteHistoryStore, finalize,
};

/// A temporary database holding one session per status.
///
/// Sessions start ten minutes apart, so listing order is predictable:
/// newest first reads in-progress, failed, cancelled, completed.
pub(super) struct SeededDatabase {
    _dir: TempDir,
    path: Utf8PathBuf,
    pub(super) completed: RecordId,
    pub(super) cancelled: RecordId,
    pub(super) failed: RecordId,
    pub(super) in_progress: RecordId,
}

impl SeededDatabase {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("history.db"))
            .expect("utf-8 database path");
        let completed = travelled_session();
        let cancelled = ended_session(NavigationStatus::Cancelled, &["Station"], 10);
        let failed = ended_session(NavigationStatus::Failed, &["Airport", "Hotel"], 20);
        let in_progress = HistoryRecord::in_progress(&route_at(&["Museum"], 30), instant(30))
            .with_user_id("ana");

        let mut store = SqliteHistoryStore::open(&path).expect("open history store");
        for record in [&completed, &cancelled, &failed, &in_progress] {
            store.save(record).expect("save record");
        }
        Self {
            _dir: dir,
            path,
            completed: completed.id(),
            cancelled: cancelled.id(),
            failed: failed.id(),
            in_progress: in_progress.id(),
        }
    }

    pub(super) fn path(&self) -> &Utf8Path {
        &self.path
    }
}

fn route_at(names: &[&str], minute: i64) -> Route {
    let mut route = Route::with_created_at("CLI route", instant(minute));
    for name in names {
        route.append(Place::named(*name));
    }
    route
}

fn ended_session(status: NavigationStatus, names: &[&str], minute: i64) -> HistoryRecord {
    finalize(&route_at(names, minute), status, instant(minute + 5)).expect("terminal status")
}

/// Harbour then Market, both reached with alarms on.
fn travelled_session() -> HistoryRecord {
    let route = route_at(&[], 0).with_alarm_for_each_stop(true);
    let mut session = NavigationSession::start(route, instant(0))
        .with_start_location(Place::named("Home"));
    session.route_mut().append(Place::named("Harbour"));
    session.route_mut().append(Place::named("Market"));
    session.arrive(instant(12));
    session.arrive(instant(25));
    session
        .finalize(NavigationStatus::Completed, instant(26))
        .expect("completed session")
}
