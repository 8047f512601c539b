//! Durable library storage using redb.
//!
//! # Table design
//!
//! ```text
//! libraries: u64 user id  -> JSON-encoded UserLibrary
//! settings:  "global"     -> JSON-encoded GlobalSettings
//! ```
//!
//! Every write runs in its own committed transaction, so a returned `Ok`
//! means the change survives a restart. Reads use a single read
//! transaction, which gives `load_all` a consistent snapshot.

use std::collections::BTreeMap;
use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use crate::error::{GameLibError, Result};
use crate::library::{GlobalSettings, UserLibrary};
use crate::types::UserId;

use super::LibraryBackend;

// ---------------------------------------------------------------------------
// Table definitions
// ---------------------------------------------------------------------------

const LIBRARIES: TableDefinition<u64, &[u8]> = TableDefinition::new("libraries");
const SETTINGS: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");

const GLOBAL_KEY: &str = "global";

fn db_err(e: impl std::fmt::Display) -> GameLibError {
    GameLibError::Storage(e.to_string())
}

// ---------------------------------------------------------------------------
// RedbBackend
// ---------------------------------------------------------------------------

pub struct RedbBackend {
    db: Database,
}

impl RedbBackend {
    /// Open or create the database at `path`, creating both tables so
    /// read transactions never hit a missing table.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path).map_err(db_err)?;
        let wt = db.begin_write().map_err(db_err)?;
        wt.open_table(LIBRARIES).map_err(db_err)?;
        wt.open_table(SETTINGS).map_err(db_err)?;
        wt.commit().map_err(db_err)?;
        Ok(Self { db })
    }
}

impl LibraryBackend for RedbBackend {
    fn load(&self, user: UserId) -> Result<Option<UserLibrary>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(LIBRARIES).map_err(db_err)?;
        let Some(value) = table.get(user.get()).map_err(db_err)? else {
            return Ok(None);
        };
        let library = serde_json::from_slice(value.value()).map_err(db_err)?;
        Ok(Some(library))
    }

    fn save(&self, library: &UserLibrary) -> Result<()> {
        let value = serde_json::to_vec(library).map_err(db_err)?;
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = wt.open_table(LIBRARIES).map_err(db_err)?;
            table
                .insert(library.user_id.get(), value.as_slice())
                .map_err(db_err)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(())
    }

    fn load_all(&self) -> Result<BTreeMap<UserId, UserLibrary>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(LIBRARIES).map_err(db_err)?;

        let mut result = BTreeMap::new();
        for entry in table.iter().map_err(db_err)? {
            let (k, v) = entry.map_err(db_err)?;
            let library: UserLibrary = serde_json::from_slice(v.value()).map_err(db_err)?;
            result.insert(UserId(k.value()), library);
        }
        Ok(result)
    }

    fn load_settings(&self) -> Result<GlobalSettings> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let table = rt.open_table(SETTINGS).map_err(db_err)?;
        match table.get(GLOBAL_KEY).map_err(db_err)? {
            Some(value) => serde_json::from_slice(value.value()).map_err(db_err),
            None => Ok(GlobalSettings::default()),
        }
    }

    fn save_settings(&self, settings: &GlobalSettings) -> Result<()> {
        let value = serde_json::to_vec(settings).map_err(db_err)?;
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = wt.open_table(SETTINGS).map_err(db_err)?;
            table
                .insert(GLOBAL_KEY, value.as_slice())
                .map_err(db_err)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
