use gamelib_core::audience::Member;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print one game per line under a heading.
pub fn print_games(heading: &str, games: &[String]) {
    println!("{heading}");
    for game in games {
        println!("  {game}");
    }
}

/// Print members as an aligned name / id listing.
pub fn print_members(members: &[Member]) {
    let width = members
        .iter()
        .map(|m| m.name.chars().count())
        .max()
        .unwrap_or(0);
    for m in members {
        println!("  {:width$}  ({})", m.name, m.id);
    }
}
