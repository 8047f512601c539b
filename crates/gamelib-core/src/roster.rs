//! File-backed community snapshot.
//!
//! The CLI has no live chat connection, so members, their presence, and who
//! sits in which voice channel are read from `.gamelib/roster.yaml`.

use crate::audience::{Community, Member};
use crate::error::{GameLibError, Result};
use crate::paths;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceChannel {
    pub name: String,
    #[serde(default)]
    pub members: Vec<UserId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub voice_channels: Vec<VoiceChannel>,
}

impl Roster {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::roster_path(root);
        if !path.exists() {
            return Err(GameLibError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn member(&self, id: UserId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Look a member up by numeric id or, failing that, by exact name.
    pub fn find(&self, needle: &str) -> Result<&Member> {
        if let Ok(id) = needle.parse::<UserId>() {
            if let Some(m) = self.member(id) {
                return Ok(m);
            }
        }
        self.members
            .iter()
            .find(|m| m.name == needle)
            .ok_or_else(|| GameLibError::UnknownMember(needle.to_string()))
    }

    /// Display name for `id`, or the bare id when the member has left.
    pub fn display_name(&self, id: UserId) -> String {
        self.member(id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn voice_channel_of(&self, id: UserId) -> Option<&VoiceChannel> {
        self.voice_channels.iter().find(|c| c.members.contains(&id))
    }

    /// Bind the roster to the member issuing the command.
    pub fn as_seen_by(&self, requester: UserId) -> Result<RosterCommunity<'_>> {
        if self.member(requester).is_none() {
            return Err(GameLibError::UnknownMember(requester.to_string()));
        }
        Ok(RosterCommunity::new(self, requester))
    }
}

pub struct RosterCommunity<'a> {
    roster: &'a Roster,
    requester: UserId,
}

impl<'a> RosterCommunity<'a> {
    /// Unchecked constructor for a requester already known to be a member.
    pub fn new(roster: &'a Roster, requester: UserId) -> Self {
        Self { roster, requester }
    }
}

impl Community for RosterCommunity<'_> {
    fn requester(&self) -> UserId {
        self.requester
    }

    fn requester_voice_members(&self) -> Option<Vec<Member>> {
        let channel = self.roster.voice_channel_of(self.requester)?;
        Some(
            channel
                .members
                .iter()
                .filter_map(|id| self.roster.member(*id).cloned())
                .collect(),
        )
    }

    fn members(&self) -> Vec<Member> {
        self.roster.members.clone()
    }

    fn member(&self, id: UserId) -> Option<Member> {
        self.roster.member(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audience::{resolve, AudienceMode};
    use crate::types::Presence;
    use tempfile::TempDir;

    const ROSTER: &str = r#"
members:
  - id: 1
    name: Alyx
    presence: online
    manage: true
  - id: 2
    name: Gordon
    presence: idle
  - id: 3
    name: Barney
    presence: dnd
  - id: 4
    name: Dog
    presence: online
    bot: true
voice_channels:
  - name: General
    members: [2, 3, 4]
"#;

    fn roster() -> Roster {
        serde_yaml::from_str(ROSTER).unwrap()
    }

    #[test]
    fn parses_roster_yaml() {
        let r = roster();
        assert_eq!(r.members.len(), 4);
        assert_eq!(r.members[2].presence, Presence::DoNotDisturb);
        assert!(r.members[3].automated);
        assert!(r.members[0].can_manage);
    }

    #[test]
    fn find_by_id_or_name() {
        let r = roster();
        assert_eq!(r.find("2").unwrap().name, "Gordon");
        assert_eq!(r.find("Barney").unwrap().id, UserId(3));
        assert!(matches!(
            r.find("Eli"),
            Err(GameLibError::UnknownMember(_))
        ));
    }

    #[test]
    fn voice_membership_follows_requester() {
        let r = roster();
        let gordon = r.as_seen_by(UserId(2)).unwrap();
        let sel = resolve(&gordon, Some(AudienceMode::Voice)).unwrap();
        assert_eq!(sel.users, vec![UserId(2), UserId(3)]);

        let alyx = r.as_seen_by(UserId(1)).unwrap();
        assert!(alyx.requester_voice_members().is_none());
        assert!(alyx.can_manage(UserId(1)));
        assert!(!alyx.can_manage(UserId(2)));
    }

    #[test]
    fn unknown_requester_is_rejected() {
        assert!(roster().as_seen_by(UserId(77)).is_err());
    }

    #[test]
    fn load_missing_roster_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Roster::load(dir.path()),
            Err(GameLibError::NotInitialized)
        ));
    }

    #[test]
    fn load_reads_roster_file() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(paths::GAMELIB_DIR)).unwrap();
        std::fs::write(
            paths::roster_path(dir.path()),
            "members:\n  - id: 9\n    name: vort\n",
        )
        .unwrap();
        let loaded = Roster::load(dir.path()).unwrap();
        assert_eq!(loaded.display_name(UserId(9)), "vort");
        assert_eq!(loaded.member(UserId(9)).unwrap().presence, Presence::Offline);
        assert!(loaded.voice_channels.is_empty());
    }
}
