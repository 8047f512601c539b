use crate::output::{print_games, print_json};
use crate::session::Session;
use gamelib_core::audience::AudienceMode;
use gamelib_core::poll::{PollService, StrawpollClient};
use gamelib_core::suggest::{self, Suggestions};
use gamelib_core::GameLibError;
use std::path::Path;

const NOTHING_IN_COMMON: &str = "You have exactly zero games in common, go buy a 4-pack!";

/// Resolve, intersect, and turn audience failures into the messages members
/// see in chat. An empty intersection is not an error.
fn common_games(session: &Session, mode: Option<&str>) -> anyhow::Result<Suggestions> {
    let mode = AudienceMode::parse_optional(mode)?;
    match suggest::suggest(&session.store, &session.community(), mode) {
        Ok(s) => Ok(s),
        Err(GameLibError::NotInVoiceGroup) => {
            anyhow::bail!("You need to be in a voice channel for that (or use `online`).")
        }
        Err(GameLibError::InsufficientAudience { found }) => anyhow::bail!(
            "You need more than one person for that ({found} available)."
        ),
        Err(e) => Err(e.into()),
    }
}

pub fn suggest(
    root: &Path,
    requester: Option<&str>,
    mode: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::open(root, requester)?;
    let suggestions = common_games(&session, mode)?;

    if json {
        print_json(&suggestions)?;
    } else if suggestions.is_empty() {
        println!("{NOTHING_IN_COMMON}");
    } else {
        print_games("You can play these games:", &suggestions.games);
    }
    Ok(())
}

pub fn poll(
    root: &Path,
    requester: Option<&str>,
    mode: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::open(root, requester)?;
    let suggestions = common_games(&session, mode)?;

    // A poll needs two options; with fewer there is nothing to vote on.
    if let [] | [_] = suggestions.games.as_slice() {
        if json {
            print_json(&serde_json::json!({ "games": suggestions.games, "poll": null }))?;
        } else {
            match suggestions.games.first() {
                Some(game) => println!("You only have one game in common: {game}"),
                None => println!("{NOTHING_IN_COMMON}"),
            }
        }
        return Ok(());
    }

    let client = StrawpollClient::new(&session.config.poll)?;
    let id = match client.create_poll(&session.config.poll.title, &suggestions.games) {
        Ok(id) => id,
        Err(GameLibError::TooManyOptions { count, max }) => anyhow::bail!(
            "Phew! You have way too many games in common ({count}, a poll allows {max}). \
             Try `gamelib suggest` for the full list instead."
        ),
        Err(e) => {
            let e = anyhow::Error::new(e);
            return Err(e.context("something went wrong while creating the poll"));
        }
    };
    let url = client.poll_url(id);

    if json {
        print_json(&serde_json::json!({
            "games": suggestions.games,
            "poll": { "id": id, "url": url },
        }))?;
    } else {
        println!("Here's your poll link: {url}");
    }
    Ok(())
}

pub fn pick(
    root: &Path,
    requester: Option<&str>,
    mode: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::open(root, requester)?;
    let suggestions = common_games(&session, mode)?;
    let choice = suggest::pick_one(&suggestions.games, &mut rand::thread_rng());

    if json {
        print_json(&serde_json::json!({ "pick": choice }))?;
    } else {
        match choice {
            Some(game) => println!("Let's play some {game}!"),
            None => println!("{NOTHING_IN_COMMON}"),
        }
    }
    Ok(())
}
