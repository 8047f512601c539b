//! The library store: sole owner of every `UserLibrary` and the global
//! settings record.
//!
//! Storage is pluggable through [`LibraryBackend`]. The store adds the
//! per-user serialization that keeps read-modify-write cycles (add, remove,
//! merge, clear, link) from losing updates when the host dispatches several
//! commands at once. Reads never take a per-user lock.

pub mod db;
pub mod memory;

pub use db::RedbBackend;
pub use memory::MemoryBackend;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::Result;
use crate::library::{
    normalize_title, AddOutcome, GlobalSettings, MergeOutcome, Ownership, RemoveOutcome,
    UserLibrary,
};
use crate::types::{ExternalId, UserId};

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// Raw persistence for libraries and settings.
///
/// `save` and `save_settings` must be durable when they return `Ok`.
/// `load_all` must come from one consistent snapshot.
pub trait LibraryBackend: Send + Sync {
    fn load(&self, user: UserId) -> Result<Option<UserLibrary>>;
    fn save(&self, library: &UserLibrary) -> Result<()>;
    fn load_all(&self) -> Result<BTreeMap<UserId, UserLibrary>>;
    fn load_settings(&self) -> Result<GlobalSettings>;
    fn save_settings(&self, settings: &GlobalSettings) -> Result<()>;
}

// ---------------------------------------------------------------------------
// LibraryStore
// ---------------------------------------------------------------------------

pub struct LibraryStore {
    backend: Box<dyn LibraryBackend>,
    user_locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
    settings_lock: Mutex<()>,
}

impl LibraryStore {
    pub fn new(backend: impl LibraryBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            user_locks: Mutex::new(HashMap::new()),
            settings_lock: Mutex::new(()),
        }
    }

    /// Open the durable redb-backed store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(RedbBackend::open(path)?))
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Titles owned by `user`; empty when the user has never stored any.
    pub fn get_titles(&self, user: UserId) -> Result<BTreeSet<String>> {
        Ok(self
            .backend
            .load(user)?
            .map(|lib| lib.titles)
            .unwrap_or_default())
    }

    pub fn get_library(&self, user: UserId) -> Result<Option<UserLibrary>> {
        self.backend.load(user)
    }

    pub fn get_link(&self, user: UserId) -> Result<Option<ExternalId>> {
        Ok(self
            .backend
            .load(user)?
            .and_then(|lib| lib.linked_external_id))
    }

    pub fn all_libraries(&self) -> Result<BTreeMap<UserId, UserLibrary>> {
        self.backend.load_all()
    }

    pub fn check_title(&self, user: UserId, title: &str) -> Result<Ownership> {
        let title = normalize_title(title)?;
        let titles = self.get_titles(user)?;
        if titles.is_empty() {
            Ok(Ownership::NoLibrary)
        } else if titles.contains(&title) {
            Ok(Ownership::Owns)
        } else {
            Ok(Ownership::Missing)
        }
    }

    /// Every user whose library contains `title`, in id order.
    pub fn owners_of(&self, title: &str) -> Result<Vec<UserId>> {
        let title = normalize_title(title)?;
        Ok(self
            .all_libraries()?
            .into_values()
            .filter(|lib| lib.titles.contains(&title))
            .map(|lib| lib.user_id)
            .collect())
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn add_title(&self, user: UserId, title: &str) -> Result<AddOutcome> {
        let title = normalize_title(title)?;
        let outcome = self.mutate(user, |lib| {
            if lib.titles.insert(title.clone()) {
                (AddOutcome::Added, true)
            } else {
                (AddOutcome::AlreadyPresent, false)
            }
        })?;
        tracing::debug!(user = %user, title = %title, ?outcome, "add title");
        Ok(outcome)
    }

    pub fn remove_title(&self, user: UserId, title: &str) -> Result<RemoveOutcome> {
        let title = normalize_title(title)?;
        let outcome = self.mutate(user, |lib| {
            if lib.titles.remove(&title) {
                (RemoveOutcome::Removed, true)
            } else {
                (RemoveOutcome::NotPresent, false)
            }
        })?;
        tracing::debug!(user = %user, title = %title, ?outcome, "remove title");
        Ok(outcome)
    }

    /// Union `incoming` into the user's titles in one write.
    ///
    /// Blank entries are skipped. Applying the same input twice leaves the
    /// set unchanged the second time.
    pub fn merge_titles<I, S>(&self, user: UserId, incoming: I) -> Result<MergeOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let incoming: Vec<String> = incoming
            .into_iter()
            .filter_map(|t| normalize_title(t.as_ref()).ok())
            .collect();
        let outcome = self.mutate(user, |lib| {
            let before = lib.titles.len();
            lib.titles.extend(incoming.iter().cloned());
            let added = lib.titles.len() - before;
            let outcome = MergeOutcome {
                added,
                titles: lib.titles.clone(),
            };
            (outcome, added > 0)
        })?;
        tracing::debug!(
            user = %user,
            incoming = incoming.len(),
            added = outcome.added,
            total = outcome.titles.len(),
            "merge titles"
        );
        Ok(outcome)
    }

    /// Empty the user's titles. The external link is kept.
    pub fn clear_titles(&self, user: UserId) -> Result<()> {
        self.mutate(user, |lib| {
            let changed = !lib.titles.is_empty();
            lib.titles.clear();
            ((), changed)
        })?;
        tracing::debug!(user = %user, "clear titles");
        Ok(())
    }

    pub fn set_link(
        &self,
        user: UserId,
        external_id: ExternalId,
        profile: Option<&str>,
    ) -> Result<()> {
        self.mutate(user, |lib| {
            lib.linked_external_id = Some(external_id);
            lib.linked_profile = profile.map(str::to_string);
            ((), true)
        })?;
        tracing::debug!(user = %user, external_id = %external_id, "set link");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Global settings
    // -----------------------------------------------------------------------

    pub fn integration_api_key(&self) -> Result<Option<String>> {
        Ok(self
            .backend
            .load_settings()?
            .api_key()
            .map(str::to_string))
    }

    pub fn set_integration_api_key(&self, key: &str) -> Result<()> {
        let _guard = self
            .settings_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut settings = self.backend.load_settings()?;
        let key = key.trim();
        settings.integration_api_key = (!key.is_empty()).then(|| key.to_string());
        self.backend.save_settings(&settings)?;
        tracing::debug!(enabled = settings.api_key().is_some(), "set integration api key");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn user_lock(&self, user: UserId) -> Arc<Mutex<()>> {
        let mut locks = self
            .user_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(user).or_default().clone()
    }

    /// Load (or create) the user's library, apply `f`, and persist when `f`
    /// reports a change. Runs under the user's lock.
    fn mutate<R>(
        &self,
        user: UserId,
        f: impl FnOnce(&mut UserLibrary) -> (R, bool),
    ) -> Result<R> {
        let lock = self.user_lock(user);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut library = self
            .backend
            .load(user)?
            .unwrap_or_else(|| UserLibrary::new(user));
        let (result, changed) = f(&mut library);
        if changed {
            library.touch();
            self.backend.save(&library)?;
        }
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
