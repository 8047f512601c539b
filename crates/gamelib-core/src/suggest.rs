//! Common-game suggestions across an audience.

use crate::audience::{self, AudienceMode, AudienceSelection, Community};
use crate::error::{GameLibError, Result};
use crate::store::LibraryStore;
use crate::types::UserId;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeSet;

/// Games every member of `users` owns, sorted and deduplicated.
///
/// A user without a library contributes an empty set, so any such user
/// makes the result empty. Duplicate ids are collapsed before the quorum
/// check.
pub fn compute_common_games(store: &LibraryStore, users: &[UserId]) -> Result<Vec<String>> {
    let distinct: BTreeSet<UserId> = users.iter().copied().collect();
    if distinct.len() < 2 {
        return Err(GameLibError::InsufficientAudience {
            found: distinct.len(),
        });
    }

    let mut common: Option<BTreeSet<String>> = None;
    for user in distinct {
        let titles = store.get_titles(user)?;
        let next = match common {
            None => titles,
            Some(acc) => acc.intersection(&titles).cloned().collect(),
        };
        if next.is_empty() {
            return Ok(Vec::new());
        }
        common = Some(next);
    }
    Ok(common.unwrap_or_default().into_iter().collect())
}

/// Result of a suggestion request. An empty `games` list means the audience
/// was resolved but shares nothing, which callers report differently from
/// a failed resolution.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestions {
    pub audience: AudienceSelection,
    pub games: Vec<String>,
}

impl Suggestions {
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

/// Resolve the audience, require at least two people, and intersect.
pub fn suggest(
    store: &LibraryStore,
    community: &dyn Community,
    mode: Option<AudienceMode>,
) -> Result<Suggestions> {
    let audience = audience::resolve(community, mode)?;
    audience.require_quorum()?;
    let games = compute_common_games(store, &audience.users)?;
    tracing::info!(
        mode = %audience.mode,
        users = audience.len(),
        games = games.len(),
        "computed common games"
    );
    Ok(Suggestions { audience, games })
}

/// Choose one game at random, for "just tell us what to play".
pub fn pick_one<'a, R: Rng + ?Sized>(games: &'a [String], rng: &mut R) -> Option<&'a str> {
    games.choose(rng).map(String::as_str)
}
