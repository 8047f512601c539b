use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use gamelib_core::config::{Config, ConfigWarning, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration, defaults filled in
    Show,

    /// Check service URLs, poll limits and storage settings
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    match subcmd {
        ConfigSubcommand::Show => show(root, &config, json),
        ConfigSubcommand::Validate => validate(&config, json),
    }
}

fn show(root: &Path, config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(config);
    }

    let steam = &config.steam;
    let poll = &config.poll;
    println!(
        "steam  {} (free games: {}, timeout {}s)",
        steam.api_base, steam.include_free_games, steam.timeout_secs
    );
    println!("poll   {} (timeout {}s)", poll.api_base, poll.timeout_secs);
    println!("       title \"{}\", up to {} options", poll.title, poll.max_options);
    println!("       multi {}, dupcheck {}, captcha {}", poll.multi, poll.dupcheck, poll.captcha);
    println!("db     {}", config.db_path(root).display());
    Ok(())
}

fn validate(config: &Config, json: bool) -> anyhow::Result<()> {
    let warnings = config.validate();
    let errors = warnings.iter().filter(|w| w.level == WarnLevel::Error).count();

    if json {
        print_json(&serde_json::json!({ "errors": errors, "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        warnings.iter().for_each(print_warning);
    }

    if errors > 0 {
        anyhow::bail!("config has {errors} error(s)");
    }
    Ok(())
}

fn print_warning(w: &ConfigWarning) {
    let tag = match w.level {
        WarnLevel::Error => "error",
        WarnLevel::Warning => "warn ",
    };
    println!("{tag}  {}", w.message);
}
