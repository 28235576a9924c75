//! Shared test utilities for the lineup bot.
//!
//! Provides a two-league configuration fixture and store constructors backed by
//! in-memory or on-disk persistence.

#![allow(clippy::expect_used)]

use crate::{
    config::AppConfig,
    core::{registration::RegistrationBook, roster::RosterStore},
    storage::{JsonFileStore, MemoryStore, Persistence},
};
use std::{path::Path, sync::Arc};
use tracing_subscriber::EnvFilter;

/// Two small leagues: two teams each, principal (max 1), driver and engineer (max 2).
/// F1 admins hold role 500; only member 900 may reset.
pub const TEST_CONFIG: &str = r#"
reset_user_ids = [900]

[leagues.F1]
update_channel_id = 1001
live_lineup_channel_id = 1002
admin_role_ids = [500]

[[leagues.F1.teams]]
name = "McLaren F1 team"
role_id = 101

[[leagues.F1.teams]]
name = "Scuderia Ferrari F1 team"
role_id = 102

[[leagues.F1.roles]]
name = "Team Principal F1"
role_id = 111
max = 1

[[leagues.F1.roles]]
name = "Main Driver F1"
role_id = 112
max = 2

[[leagues.F1.roles]]
name = "Engineer F1"
role_id = 113
max = 2

[leagues.F2]
update_channel_id = 2001
live_lineup_channel_id = 2002
admin_role_ids = [500, 600]

[[leagues.F2.teams]]
name = "McLaren F2 team"
role_id = 201

[[leagues.F2.teams]]
name = "Scuderia Ferrari F2 team"
role_id = 202

[[leagues.F2.roles]]
name = "Team Principal F2"
role_id = 211
max = 1

[[leagues.F2.roles]]
name = "Main Driver F2"
role_id = 212
max = 2

[[leagues.F2.roles]]
name = "Engineer F2"
role_id = 213
max = 2
"#;

/// Initialises a tracing subscriber that writes through the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Parses [`TEST_CONFIG`].
///
/// # Panics
/// If the fixture stops parsing.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_config() -> AppConfig {
    AppConfig::from_toml(TEST_CONFIG).expect("test config parses")
}

/// File-backed persistence rooted at `dir`.
///
/// # Panics
/// If the directory cannot be created.
#[must_use]
pub fn file_persistence(dir: &Path) -> Arc<dyn Persistence> {
    Arc::new(JsonFileStore::open(dir).expect("data dir opens"))
}

/// An empty roster over in-memory persistence; the store handle is returned
/// so tests can inspect documents or inject write failures.
///
/// # Panics
/// If the roster cannot be opened.
#[must_use]
#[allow(clippy::expect_used)]
pub fn setup_roster() -> (Arc<MemoryStore>, RosterStore) {
    let store = Arc::new(MemoryStore::new());
    let persistence: Arc<dyn Persistence> = store.clone();
    let roster = RosterStore::open(Arc::new(test_config().leagues), persistence)
        .expect("roster opens");
    (store, roster)
}

/// An empty registration book over in-memory persistence.
///
/// # Panics
/// If the book cannot be opened.
#[must_use]
#[allow(clippy::expect_used)]
pub fn setup_registrations() -> (Arc<MemoryStore>, RegistrationBook) {
    let store = Arc::new(MemoryStore::new());
    let persistence: Arc<dyn Persistence> = store.clone();
    let book = RegistrationBook::open(persistence).expect("registration book opens");
    (store, book)
}
