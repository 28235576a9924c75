//! In-memory persistence used by tests.

use super::{Persistence, Table};
use crate::errors::{Error, Result};
use std::{
    collections::HashMap,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

/// Keeps table documents in a map; saves can be made to fail on demand.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<Table, String>>,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `save` fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Current document for `table`.
    #[must_use]
    pub fn raw(&self, table: Table) -> Option<String> {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&table)
            .cloned()
    }
}

impl Persistence for MemoryStore {
    fn load(&self, table: Table) -> Result<Option<String>> {
        Ok(self.raw(table))
    }

    fn save(&self, table: Table, contents: &str) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::Persistence {
                table: table.to_string(),
                message: "simulated write failure".to_string(),
            });
        }
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(table, contents.to_string());
        Ok(())
    }
}
