//! Merging externally owned games into a member's library.
//!
//! The flow is always fetch-then-merge: the network call happens with no
//! store lock held, and `merge_titles` runs once on success or not at all.

use crate::error::{GameLibError, Result};
use crate::store::LibraryStore;
use crate::types::{ExternalId, UserId};
use serde::Serialize;

/// A third-party service that knows which games a profile owns.
pub trait OwnershipSource {
    /// Turn a human-chosen profile name into a stable id.
    /// Fails with `NameResolutionFailed` when no profile matches.
    fn resolve_vanity_name(&self, name: &str) -> Result<ExternalId>;

    /// All game titles owned by `id`. Fails with `IntegrationUnavailable`
    /// when the service cannot be asked, so an empty `Ok` always means the
    /// profile genuinely owns nothing.
    fn fetch_external_titles(&self, id: ExternalId) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub user: UserId,
    pub external_id: ExternalId,
    pub fetched: usize,
    pub added: usize,
    pub total: usize,
}

/// Link `user` to `profile` (a 64-bit id or a vanity name), then sync.
///
/// The link is stored before fetching, so a failed fetch still leaves the
/// member linked and a later `refresh` can retry.
pub fn link_profile(
    store: &LibraryStore,
    source: &dyn OwnershipSource,
    user: UserId,
    profile: &str,
) -> Result<SyncReport> {
    let profile = profile.trim();
    let (external_id, vanity) = match ExternalId::parse(profile) {
        Some(id) => (id, None),
        None => {
            if profile.is_empty() {
                return Err(GameLibError::NameResolutionFailed(profile.to_string()));
            }
            (source.resolve_vanity_name(profile)?, Some(profile))
        }
    };
    store.set_link(user, external_id, vanity)?;
    tracing::info!(user = %user, external_id = %external_id, "linked external profile");
    fetch_and_merge(store, source, user, external_id)
}

/// Re-sync a member who is already linked.
pub fn refresh(
    store: &LibraryStore,
    source: &dyn OwnershipSource,
    user: UserId,
) -> Result<SyncReport> {
    let external_id = store
        .get_link(user)?
        .ok_or(GameLibError::NotLinked(user.get()))?;
    fetch_and_merge(store, source, user, external_id)
}

fn fetch_and_merge(
    store: &LibraryStore,
    source: &dyn OwnershipSource,
    user: UserId,
    external_id: ExternalId,
) -> Result<SyncReport> {
    let fetched = match source.fetch_external_titles(external_id) {
        Ok(titles) => titles,
        Err(e) => {
            tracing::warn!(
                user = %user,
                external_id = %external_id,
                error = %e,
                "fetch failed, nothing merged"
            );
            return Err(e);
        }
    };
    let merged = store.merge_titles(user, &fetched)?;
    let report = SyncReport {
        user,
        external_id,
        fetched: fetched.len(),
        added: merged.added,
        total: merged.titles.len(),
    };
    tracing::info!(user = %user, fetched = report.fetched, added = report.added, "synced library");
    Ok(report)
}
