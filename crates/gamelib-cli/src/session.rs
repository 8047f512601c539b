use anyhow::{bail, Context};
use gamelib_core::config::Config;
use gamelib_core::roster::{Roster, RosterCommunity};
use gamelib_core::store::LibraryStore;
use gamelib_core::types::UserId;
use std::path::Path;

/// Everything a command needs: config, the open store, the community
/// roster, and who is asking.
pub struct Session {
    pub config: Config,
    pub store: LibraryStore,
    pub roster: Roster,
    pub requester: UserId,
}

impl Session {
    pub fn open(root: &Path, requester: Option<&str>) -> anyhow::Result<Self> {
        let config = Config::load(root).context("failed to load config")?;
        let roster = Roster::load(root).context("failed to load roster")?;
        let Some(requester) = requester else {
            bail!("no requesting member: pass --as <member> or set GAMELIB_USER");
        };
        let requester = roster
            .find(requester)
            .with_context(|| format!("'{requester}' is not in the roster"))?
            .id;
        let db = config.db_path(root);
        let store = LibraryStore::open(&db)
            .with_context(|| format!("failed to open library at {}", db.display()))?;
        tracing::debug!(requester = %requester, db = %db.display(), "session opened");
        Ok(Self {
            config,
            store,
            roster,
            requester,
        })
    }

    pub fn community(&self) -> RosterCommunity<'_> {
        // requester was looked up in this roster when the session opened
        RosterCommunity::new(&self.roster, self.requester)
    }

    /// The `--user` target, defaulting to the requester.
    pub fn target(&self, user: Option<&str>) -> anyhow::Result<UserId> {
        match user {
            None => Ok(self.requester),
            Some(needle) => Ok(self
                .roster
                .find(needle)
                .with_context(|| format!("'{needle}' is not in the roster"))?
                .id),
        }
    }

    pub fn name(&self, id: UserId) -> String {
        self.roster.display_name(id)
    }
}
