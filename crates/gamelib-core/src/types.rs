use crate::error::GameLibError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// UserId
// ---------------------------------------------------------------------------

/// Stable member identifier issued by the chat host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl UserId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = GameLibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(UserId)
            .map_err(|_| GameLibError::UnknownMember(s.to_string()))
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        UserId(id)
    }
}

// ---------------------------------------------------------------------------
// ExternalId
// ---------------------------------------------------------------------------

/// Lowest 64-bit id of an individual Steam account (account number 0).
const STEAM_INDIVIDUAL_BASE: u64 = 76_561_197_960_265_728;

static STEAM_ID_RE: OnceLock<Regex> = OnceLock::new();

fn steam_id_re() -> &'static Regex {
    STEAM_ID_RE.get_or_init(|| Regex::new(r"^\d{17}$").unwrap())
}

/// 64-bit identifier of a profile on the external ownership source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalId(pub u64);

impl ExternalId {
    /// Interpret `raw` as a 64-bit profile id if it looks like one.
    ///
    /// Returns `None` for anything else, which callers treat as a vanity
    /// profile name that still has to be resolved.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if !steam_id_re().is_match(raw) {
            return None;
        }
        let value = raw.parse::<u64>().ok()?;
        let account = value.checked_sub(STEAM_INDIVIDUAL_BASE)?;
        (account <= u64::from(u32::MAX)).then_some(ExternalId(value))
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Presence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Online,
    Idle,
    #[serde(alias = "dnd")]
    DoNotDisturb,
    #[default]
    Offline,
}

impl Presence {
    /// Online and idle members count as available; busy and offline do not.
    pub fn is_available(self) -> bool {
        matches!(self, Presence::Online | Presence::Idle)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Presence::Online => "online",
            Presence::Idle => "idle",
            Presence::DoNotDisturb => "do_not_disturb",
            Presence::Offline => "offline",
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_id_accepts_individual_account() {
        let id = ExternalId::parse("76561198221914843").unwrap();
        assert_eq!(id.0, 76561198221914843);
    }

    #[test]
    fn external_id_rejects_vanity_names() {
        assert!(ExternalId::parse("Alyx").is_none());
        assert!(ExternalId::parse("gaben123").is_none());
        assert!(ExternalId::parse("").is_none());
    }

    #[test]
    fn external_id_rejects_out_of_range_digits() {
        // 17 digits but below the individual account range
        assert!(ExternalId::parse("12345678901234567").is_none());
        // too short
        assert!(ExternalId::parse("7656119822191484").is_none());
    }

    #[test]
    fn user_id_parses_decimal() {
        let id: UserId = " 42 ".parse().unwrap();
        assert_eq!(id, UserId(42));
        assert!("not-a-user".parse::<UserId>().is_err());
    }

    #[test]
    fn presence_availability() {
        assert!(Presence::Online.is_available());
        assert!(Presence::Idle.is_available());
        assert!(!Presence::DoNotDisturb.is_available());
        assert!(!Presence::Offline.is_available());
    }

    #[test]
    fn presence_accepts_dnd_alias() {
        let p: Presence = serde_yaml::from_str("dnd").unwrap();
        assert_eq!(p, Presence::DoNotDisturb);
    }
}
