//! Audience resolution: which members take part in a common-games query.

use crate::error::{GameLibError, Result};
use crate::types::{Presence, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Member / Community
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub presence: Presence,
    /// Bots and other automated accounts never count toward an audience.
    #[serde(default, rename = "bot")]
    pub automated: bool,
    /// Holds the manage-community capability.
    #[serde(default, rename = "manage")]
    pub can_manage: bool,
}

/// The host's view of the community, as seen by one requesting member.
pub trait Community {
    fn requester(&self) -> UserId;

    /// Members of the voice grouping the requester is in, or `None` when the
    /// requester is not in one.
    fn requester_voice_members(&self) -> Option<Vec<Member>>;

    fn members(&self) -> Vec<Member>;

    fn member(&self, id: UserId) -> Option<Member>;

    fn can_manage(&self, id: UserId) -> bool {
        self.member(id).is_some_and(|m| m.can_manage)
    }
}

// ---------------------------------------------------------------------------
// AudienceMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudienceMode {
    Voice,
    Presence,
}

impl AudienceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AudienceMode::Voice => "voice",
            AudienceMode::Presence => "online",
        }
    }

    /// Parse an optional user-supplied filter. `None` means "voice, falling
    /// back to online".
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>> {
        raw.map(str::parse).transpose()
    }
}

impl fmt::Display for AudienceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AudienceMode {
    type Err = GameLibError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "voice" => Ok(AudienceMode::Voice),
            "online" | "presence" => Ok(AudienceMode::Presence),
            _ => Err(GameLibError::InvalidMode(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// AudienceSelection
// ---------------------------------------------------------------------------

/// Resolved audience. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudienceSelection {
    /// The strategy that actually produced `users`.
    pub mode: AudienceMode,
    pub users: Vec<UserId>,
}

impl AudienceSelection {
    fn from_members(mode: AudienceMode, members: impl IntoIterator<Item = Member>) -> Self {
        let users: BTreeSet<UserId> = members
            .into_iter()
            .filter(|m| !m.automated)
            .map(|m| m.id)
            .collect();
        Self {
            mode,
            users: users.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Fail unless at least two distinct users were resolved.
    pub fn require_quorum(&self) -> Result<()> {
        if self.users.len() < 2 {
            return Err(GameLibError::InsufficientAudience {
                found: self.users.len(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

pub fn resolve(community: &dyn Community, mode: Option<AudienceMode>) -> Result<AudienceSelection> {
    match mode {
        Some(AudienceMode::Voice) => resolve_voice(community),
        Some(AudienceMode::Presence) => Ok(resolve_presence(community)),
        None => match resolve_voice(community) {
            Err(GameLibError::NotInVoiceGroup) => {
                tracing::debug!(
                    requester = %community.requester(),
                    "not in voice, using online members"
                );
                Ok(resolve_presence(community))
            }
            other => other,
        },
    }
}

fn resolve_voice(community: &dyn Community) -> Result<AudienceSelection> {
    let members = community
        .requester_voice_members()
        .ok_or(GameLibError::NotInVoiceGroup)?;
    Ok(AudienceSelection::from_members(AudienceMode::Voice, members))
}

fn resolve_presence(community: &dyn Community) -> AudienceSelection {
    let available = community
        .members()
        .into_iter()
        .filter(|m| m.presence.is_available());
    AudienceSelection::from_members(AudienceMode::Presence, available)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
