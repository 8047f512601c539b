use crate::output::print_json;
use anyhow::Context;
use gamelib_core::config::Config;
use gamelib_core::store::LibraryStore;
use gamelib_core::{io, paths};
use std::path::Path;

const EXAMPLE_ROSTER: &str = r#"# Community snapshot used in place of a live chat connection.
# presence: online | idle | dnd | offline
members:
  - id: 1
    name: admin
    presence: online
    manage: true
voice_channels: []
"#;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config_path = paths::config_path(root);
    let wrote_config = if config_path.exists() {
        false
    } else {
        Config::default().save(root).context("failed to write config")?;
        true
    };

    let wrote_roster = io::write_if_missing(&paths::roster_path(root), EXAMPLE_ROSTER.as_bytes())
        .context("failed to write roster")?;

    // Opening creates the database file and its tables.
    let config = Config::load(root).context("failed to load config")?;
    let db = config.db_path(root);
    LibraryStore::open(&db).with_context(|| format!("failed to create {}", db.display()))?;

    if json {
        print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "config_created": wrote_config,
            "roster_created": wrote_roster,
            "database": db.display().to_string(),
        }))?;
    } else {
        println!("Initialized game library in {}", paths::gamelib_dir(root).display());
        if wrote_roster {
            println!("Edit {} to describe your community.", paths::ROSTER_FILE);
        }
    }
    Ok(())
}
