use crate::output::{print_games, print_json, print_members};
use crate::session::Session;
use anyhow::Context;
use gamelib_core::access;
use gamelib_core::library::{AddOutcome, Ownership, RemoveOutcome};
use std::io::{BufRead, Write};
use std::path::Path;

pub fn add(
    root: &Path,
    requester: Option<&str>,
    title: &str,
    user: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::open(root, requester)?;
    let target = session.target(user)?;
    access::authorize(&session.community(), target)?;

    let outcome = session
        .store
        .add_title(target, title)
        .context("failed to save library")?;
    let title = title.trim();
    let name = session.name(target);

    if json {
        print_json(&serde_json::json!({
            "user": target,
            "title": title,
            "outcome": outcome,
        }))?;
    } else {
        match outcome {
            AddOutcome::Added => println!("{title} was added to {name}'s library."),
            AddOutcome::AlreadyPresent => println!("{title} already exists in {name}'s library."),
        }
    }
    Ok(())
}

pub fn remove(
    root: &Path,
    requester: Option<&str>,
    title: &str,
    user: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::open(root, requester)?;
    let target = session.target(user)?;
    access::authorize(&session.community(), target)?;

    let outcome = session
        .store
        .remove_title(target, title)
        .context("failed to save library")?;
    let title = title.trim();
    let name = session.name(target);

    if json {
        print_json(&serde_json::json!({
            "user": target,
            "title": title,
            "outcome": outcome,
        }))?;
    } else {
        match outcome {
            RemoveOutcome::Removed => println!("{title} was removed from {name}'s library."),
            RemoveOutcome::NotPresent => println!("{title} is not in {name}'s library."),
        }
    }
    Ok(())
}

pub fn list(
    root: &Path,
    requester: Option<&str>,
    user: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::open(root, requester)?;
    let target = session.target(user)?;
    let library = session.store.get_library(target)?;
    let name = session.name(target);

    let games: Vec<String> = library
        .as_ref()
        .map(|lib| lib.titles.iter().cloned().collect())
        .unwrap_or_default();
    let linked = library.as_ref().and_then(|lib| lib.linked_external_id);

    if json {
        print_json(&serde_json::json!({
            "user": target,
            "name": name,
            "linked_external_id": linked.map(|id| id.to_string()),
            "games": games,
        }))?;
    } else if games.is_empty() {
        println!(
            "{name} does not have any games. Add some with `gamelib add` \
             or link a Steam profile with `gamelib link`."
        );
    } else {
        print_games(&format!("{name}'s games ({}):", games.len()), &games);
    }
    Ok(())
}

pub fn check(
    root: &Path,
    requester: Option<&str>,
    title: &str,
    user: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::open(root, requester)?;
    let title = title.trim();

    if let Some(user) = user {
        let target = session.target(Some(user))?;
        let ownership = session.store.check_title(target, title)?;
        let name = session.name(target);
        if json {
            print_json(&serde_json::json!({
                "user": target,
                "title": title,
                "ownership": ownership,
            }))?;
        } else {
            match ownership {
                Ownership::Owns => println!("Aye, {name} has {title}."),
                Ownership::Missing => println!("Nay, {name} does not have {title}."),
                Ownership::NoLibrary => println!(
                    "{name} does not have a game library yet. \
                     Use `gamelib add` to start adding games!"
                ),
            }
        }
        return Ok(());
    }

    // Only report owners who are still in the community.
    let owners: Vec<_> = session
        .store
        .owners_of(title)?
        .into_iter()
        .filter_map(|id| session.roster.member(id).cloned())
        .collect();

    if json {
        let owners: Vec<_> = owners
            .iter()
            .map(|m| serde_json::json!({ "id": m.id, "name": m.name }))
            .collect();
        print_json(&serde_json::json!({ "title": title, "owners": owners }))?;
    } else if owners.is_empty() {
        println!("None of you have {title}!");
    } else {
        println!("The following of you have {title}:");
        print_members(&owners);
    }
    Ok(())
}

pub fn destroy(
    root: &Path,
    requester: Option<&str>,
    user: Option<&str>,
    yes: bool,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::open(root, requester)?;
    let target = session.target(user)?;
    access::authorize(&session.community(), target)?;
    let name = session.name(target);

    if !yes && !confirm(&format!("Wipe {name}'s game library? (yes/no) "))? {
        if json {
            print_json(&serde_json::json!({ "user": target, "cleared": false }))?;
        } else {
            println!("Well, that was close!");
        }
        return Ok(());
    }

    session
        .store
        .clear_titles(target)
        .context("failed to save library")?;

    if json {
        print_json(&serde_json::json!({ "user": target, "cleared": true }))?;
    } else {
        println!("{name}, your game library has been nuked.");
    }
    Ok(())
}

/// Ask on stderr, read one line from stdin. Anything but yes/y is a no,
/// including end of input.
fn confirm(prompt: &str) -> anyhow::Result<bool> {
    let mut err = std::io::stderr();
    write!(err, "{prompt}")?;
    err.flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "yes" | "y"))
}
