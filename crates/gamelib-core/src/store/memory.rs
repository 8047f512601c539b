use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use crate::error::Result;
use crate::library::{GlobalSettings, UserLibrary};
use crate::types::UserId;

use super::LibraryBackend;

/// Process-local backend for tests and dry runs. Nothing is written to disk.
#[derive(Default)]
pub struct MemoryBackend {
    libraries: RwLock<HashMap<UserId, UserLibrary>>,
    settings: RwLock<GlobalSettings>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LibraryBackend for MemoryBackend {
    fn load(&self, user: UserId) -> Result<Option<UserLibrary>> {
        let libraries = self.libraries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(libraries.get(&user).cloned())
    }

    fn save(&self, library: &UserLibrary) -> Result<()> {
        let mut libraries = self
            .libraries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        libraries.insert(library.user_id, library.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<BTreeMap<UserId, UserLibrary>> {
        let libraries = self.libraries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(libraries
            .iter()
            .map(|(id, lib)| (*id, lib.clone()))
            .collect())
    }

    fn load_settings(&self) -> Result<GlobalSettings> {
        let settings = self.settings.read().unwrap_or_else(PoisonError::into_inner);
        Ok(settings.clone())
    }

    fn save_settings(&self, settings: &GlobalSettings) -> Result<()> {
        let mut current = self.settings.write().unwrap_or_else(PoisonError::into_inner);
        *current = settings.clone();
        Ok(())
    }
}
