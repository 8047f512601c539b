use crate::error::{GameLibError, Result};
use crate::types::{ExternalId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// UserLibrary
// ---------------------------------------------------------------------------

/// One member's games plus their optional link to the external source.
///
/// Titles are deduplicated by exact, case-sensitive match. The `BTreeSet`
/// also gives the alphabetical order used when listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLibrary {
    pub user_id: UserId,
    #[serde(default)]
    pub titles: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_external_id: Option<ExternalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_profile: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl UserLibrary {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            titles: BTreeSet::new(),
            linked_external_id: None,
            linked_profile: None,
            updated_at: Utc::now(),
        }
    }

    pub fn is_linked(&self) -> bool {
        self.linked_external_id.is_some()
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// ---------------------------------------------------------------------------
// GlobalSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_api_key: Option<String>,
}

impl GlobalSettings {
    /// The configured key, treating an empty string as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.integration_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Operation outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoveOutcome {
    Removed,
    NotPresent,
}

/// Result of merging a batch of titles, counted under the user's lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// Titles that were not in the library before this merge.
    pub added: usize,
    pub titles: BTreeSet<String>,
}

/// Answer to "does this member have this game".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    Owns,
    Missing,
    /// The member has never stored a single title.
    NoLibrary,
}

// ---------------------------------------------------------------------------
// Title validation
// ---------------------------------------------------------------------------

/// Trim surrounding whitespace and reject empty titles. Case is preserved.
pub fn normalize_title(raw: &str) -> Result<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(GameLibError::InvalidTitle("title must not be empty".into()));
    }
    Ok(title.to_string())
}
