use crate::output::print_json;
use crate::session::Session;
use anyhow::Context;
use gamelib_core::steam::SteamClient;
use gamelib_core::sync::{self, SyncReport};
use gamelib_core::access;
use std::path::Path;

pub fn update(
    root: &Path,
    requester: Option<&str>,
    user: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::open(root, requester)?;
    let target = session.target(user)?;
    access::authorize(&session.community(), target)?;
    let name = session.name(target);

    // Not being linked is the more useful thing to report when both apply.
    if session.store.get_link(target)?.is_none() {
        anyhow::bail!(
            "{name} is not linked to a Steam profile yet. Use `gamelib link <profile>` first."
        );
    }
    let client = SteamClient::from_store(&session.store, &session.config.steam)?;
    let report = sync::refresh(&session.store, &client, target)?;
    print_report(&name, &report, "updated", json)
}

pub fn link(
    root: &Path,
    requester: Option<&str>,
    profile: &str,
    user: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let session = Session::open(root, requester)?;
    let target = session.target(user)?;
    access::authorize(&session.community(), target)?;
    let name = session.name(target);

    let client = SteamClient::from_store(&session.store, &session.config.steam)?;
    let report = sync::link_profile(&session.store, &client, target, profile)
        .with_context(|| {
            format!("could not sync {name}'s account with Steam profile '{profile}'")
        })?;
    print_report(&name, &report, "linked with Steam", json)
}

pub fn set_key(root: &Path, requester: Option<&str>, key: &str, json: bool) -> anyhow::Result<()> {
    let session = Session::open(root, requester)?;
    access::authorize_admin(&session.community())?;

    session
        .store
        .set_integration_api_key(key)
        .context("failed to save settings")?;
    let enabled = session.store.integration_api_key()?.is_some();

    if json {
        print_json(&serde_json::json!({ "integration_enabled": enabled }))?;
    } else if enabled {
        println!("The Steam API key has been saved. Clear it from your shell history!");
    } else {
        println!("The Steam API key has been cleared; Steam sync is disabled.");
    }
    Ok(())
}

fn print_report(name: &str, report: &SyncReport, verb: &str, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(report);
    }
    println!("{name}'s account was {verb}.");
    println!(
        "Fetched {} games from Steam profile {}: {} new, {} total.",
        report.fetched, report.external_id, report.added, report.total
    );
    Ok(())
}
