//! File-backed persistence: one pretty-printed JSON document per table.

use super::{Persistence, Table};
use crate::errors::{Error, Result};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Stores each [`Table`] as `<dir>/<table file name>`.
///
/// Writes land in a sibling `.tmp` file first and are moved into place with a
/// rename, so a crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (and creates if needed) the data directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| Error::Persistence {
            table: dir.display().to_string(),
            message: format!("cannot create data directory: {e}"),
        })?;
        debug!(dir = %dir.display(), "Opened JSON data directory");
        Ok(Self { dir })
    }

    /// Full path of a table's file.
    #[must_use]
    pub fn path_of(&self, table: Table) -> PathBuf {
        self.dir.join(table.file_name())
    }

    fn write_atomically(&self, table: Table, contents: &str) -> std::io::Result<()> {
        let target = self.path_of(table);
        let tmp = target.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &target)
    }
}

impl Persistence for JsonFileStore {
    fn load(&self, table: Table) -> Result<Option<String>> {
        match fs::read_to_string(self.path_of(table)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Persistence {
                table: table.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn save(&self, table: Table, contents: &str) -> Result<()> {
        self.write_atomically(table, contents)
            .map_err(|e| Error::Persistence {
                table: table.to_string(),
                message: e.to_string(),
            })
    }
}
