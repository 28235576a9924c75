//! Durable storage for the bot's tables.
//!
//! Every table is a single JSON document rewritten in full on each mutation.
//! Stores receive an `Arc<dyn Persistence>` so tests can swap the file backend
//! for an in-memory one.

/// One JSON file per table inside a data directory
pub mod json_file;
/// In-memory backend for tests
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::errors::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;

/// The logical tables the bot persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Table {
    /// F1 assignments, keyed by member
    AssignmentsF1,
    /// F2 assignments, keyed by member
    AssignmentsF2,
    /// Registrations for both leagues
    Registrations,
    /// Standalone car-number claims for both leagues
    CarNumberClaims,
    /// Message id of each league's live lineup embed
    LiveLineups,
}

impl Table {
    /// File name used by [`JsonFileStore`].
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::AssignmentsF1 => "assignments_f1.json",
            Self::AssignmentsF2 => "assignments_f2.json",
            Self::Registrations => "registrations.json",
            Self::CarNumberClaims => "car_number_claims.json",
            Self::LiveLineups => "live_lineups.json",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Raw document storage keyed by [`Table`].
pub trait Persistence: Send + Sync + fmt::Debug {
    /// Reads a table, `None` when it has never been written.
    fn load(&self, table: Table) -> Result<Option<String>>;

    /// Replaces a table's contents.
    fn save(&self, table: Table, contents: &str) -> Result<()>;
}

/// Loads and decodes a table, falling back to `T::default()` when it does not exist yet.
pub fn load_json<T>(persistence: &dyn Persistence, table: Table) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match persistence.load(table)? {
        Some(contents) if !contents.trim().is_empty() => {
            serde_json::from_str(&contents).map_err(|e| Error::Persistence {
                table: table.to_string(),
                message: format!("corrupt JSON: {e}"),
            })
        }
        _ => Ok(T::default()),
    }
}

/// Encodes a table as pretty JSON and saves it.
pub fn save_json<T>(persistence: &dyn Persistence, table: Table, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let contents = serde_json::to_string_pretty(value)?;
    persistence.save(table, &contents)?;
    tracing::trace!(%table, bytes = contents.len(), "Table saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_missing_table_loads_default() {
        let store = MemoryStore::new();
        let loaded: BTreeMap<String, u32> = load_json(&store, Table::Registrations).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_corrupt_table_is_persistence_error() {
        let store = MemoryStore::new();
        store.save(Table::LiveLineups, "{not json").unwrap();
        let err = load_json::<BTreeMap<String, u32>>(&store, Table::LiveLineups).unwrap_err();
        assert!(matches!(err, Error::Persistence { table, .. } if table == "live_lineups.json"));
    }

    #[test]
    fn test_saved_json_is_human_readable() {
        let store = MemoryStore::new();
        let mut value = BTreeMap::new();
        value.insert("a".to_string(), 1_u32);
        save_json(&store, Table::CarNumberClaims, &value).unwrap();
        assert_eq!(
            store.raw(Table::CarNumberClaims).unwrap(),
            "{\n  \"a\": 1\n}"
        );
    }
}
