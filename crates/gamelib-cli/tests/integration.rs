#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ROSTER: &str = r#"
members:
  - id: 1
    name: alyx
    presence: online
    manage: true
  - id: 2
    name: gordon
    presence: online
  - id: 3
    name: barney
    presence: dnd
  - id: 4
    name: dog
    presence: online
    bot: true
  - id: 5
    name: eli
    presence: offline
voice_channels:
  - name: Lab
    members: [2, 3]
  - name: Kennel
    members: [4, 5]
"#;

const OWNED_GAMES: &str =
    r#"{"response":{"game_count":2,"games":[{"name":"Portal 2"},{"name":"Half-Life"}]}}"#;

fn gamelib(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gamelib").unwrap();
    cmd.current_dir(dir.path())
        .env("GAMELIB_ROOT", dir.path())
        .env_remove("GAMELIB_USER")
        .env_remove("RUST_LOG");
    cmd
}

fn as_user(dir: &TempDir, user: &str) -> Command {
    let mut cmd = gamelib(dir);
    cmd.args(["--as", user]);
    cmd
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    gamelib(&dir).arg("init").assert().success();
    std::fs::write(dir.path().join(".gamelib/roster.yaml"), ROSTER).unwrap();
    dir
}

fn add(dir: &TempDir, user: &str, title: &str) {
    as_user(dir, user).args(["add", title]).assert().success();
}

fn write_config(dir: &TempDir, yaml: &str) {
    std::fs::write(dir.path().join(".gamelib/config.yaml"), yaml).unwrap();
}

// ---------------------------------------------------------------------------
// gamelib init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_layout() {
    let dir = TempDir::new().unwrap();
    gamelib(&dir).arg("init").assert().success();

    assert!(dir.path().join(".gamelib").is_dir());
    assert!(dir.path().join(".gamelib/config.yaml").exists());
    assert!(dir.path().join(".gamelib/roster.yaml").exists());
    assert!(dir.path().join(".gamelib/library.db").exists());
}

#[test]
fn init_is_idempotent_and_keeps_roster() {
    let dir = setup();
    gamelib(&dir).arg("init").assert().success();
    let roster = std::fs::read_to_string(dir.path().join(".gamelib/roster.yaml")).unwrap();
    assert!(roster.contains("gordon"));
}

#[test]
fn commands_before_init_fail() {
    let dir = TempDir::new().unwrap();
    as_user(&dir, "1")
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn missing_requester_fails() {
    let dir = setup();
    gamelib(&dir)
        .args(["add", "Chess"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--as"));
}

// ---------------------------------------------------------------------------
// add / remove / list
// ---------------------------------------------------------------------------

#[test]
fn add_and_list_sorted() {
    let dir = setup();
    add(&dir, "gordon", "Portal");
    add(&dir, "gordon", "Chess");
    add(&dir, "gordon", "Go");

    let out = as_user(&dir, "gordon")
        .arg("list")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let out = String::from_utf8(out).unwrap();
    let chess = out.find("Chess").unwrap();
    let go = out.find("Go").unwrap();
    let portal = out.find("Portal").unwrap();
    assert!(chess < go && go < portal, "not sorted:\n{out}");
}

#[test]
fn add_twice_reports_already_present() {
    let dir = setup();
    add(&dir, "gordon", "Chess");
    as_user(&dir, "gordon")
        .args(["add", "Chess"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    as_user(&dir, "gordon")
        .args(["--json", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""Chess""#).count(1));
}

#[test]
fn remove_present_and_absent() {
    let dir = setup();
    add(&dir, "gordon", "Chess");
    as_user(&dir, "gordon")
        .args(["remove", "Chess"])
        .assert()
        .success()
        .stdout(predicate::str::contains("was removed"));
    as_user(&dir, "gordon")
        .args(["remove", "Chess"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is not in"));
}

#[test]
fn list_empty_library() {
    let dir = setup();
    as_user(&dir, "eli")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("does not have any games"));
}

#[test]
fn adding_to_another_member_requires_manage() {
    let dir = setup();
    as_user(&dir, "gordon")
        .args(["add", "Chess", "--user", "alyx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not allowed"));

    as_user(&dir, "alyx")
        .args(["add", "Chess", "--user", "gordon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gordon's library"));
}

#[test]
fn unknown_target_member_fails() {
    let dir = setup();
    as_user(&dir, "alyx")
        .args(["add", "Chess", "--user", "breen"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("breen"));
}

// ---------------------------------------------------------------------------
// check / destroy
// ---------------------------------------------------------------------------

#[test]
fn check_single_member() {
    let dir = setup();
    as_user(&dir, "alyx")
        .args(["check", "Go", "--user", "gordon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("does not have a game library yet"));

    add(&dir, "gordon", "Go");
    as_user(&dir, "alyx")
        .args(["check", "Go", "--user", "gordon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Aye, gordon has Go."));
    as_user(&dir, "alyx")
        .args(["check", "Chess", "--user", "gordon"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nay"));
}

#[test]
fn check_everyone() {
    let dir = setup();
    add(&dir, "gordon", "Go");
    add(&dir, "barney", "Go");
    as_user(&dir, "alyx")
        .args(["check", "Go"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gordon").and(predicate::str::contains("barney")));
    as_user(&dir, "alyx")
        .args(["check", "Tetris"])
        .assert()
        .success()
        .stdout(predicate::str::contains("None of you have Tetris!"));
}

#[test]
fn destroy_with_yes_clears_library() {
    let dir = setup();
    add(&dir, "gordon", "Go");
    as_user(&dir, "gordon")
        .args(["destroy", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nuked"));
    as_user(&dir, "gordon")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("does not have any games"));
}

#[test]
fn destroy_declined_keeps_library() {
    let dir = setup();
    add(&dir, "gordon", "Go");
    as_user(&dir, "gordon")
        .arg("destroy")
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("that was close"));
    as_user(&dir, "gordon")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Go"));
}

// ---------------------------------------------------------------------------
// suggest / pick
// ---------------------------------------------------------------------------

#[test]
fn suggest_online_lists_common_games() {
    let dir = setup();
    for g in ["Chess", "Go"] {
        add(&dir, "alyx", g);
    }
    for g in ["Go", "Checkers"] {
        add(&dir, "gordon", g);
    }
    as_user(&dir, "alyx")
        .args(["suggest", "online"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Go").and(predicate::str::contains("Chess").not()));
}

#[test]
fn suggest_zero_in_common_is_success() {
    let dir = setup();
    add(&dir, "alyx", "Chess");
    add(&dir, "gordon", "Go");
    as_user(&dir, "alyx")
        .args(["suggest", "online"])
        .assert()
        .success()
        .stdout(predicate::str::contains("zero games in common"));
}

#[test]
fn suggest_rejects_unknown_mode() {
    let dir = setup();
    as_user(&dir, "alyx")
        .args(["suggest", "everyone"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid audience filter"));
}

#[test]
fn suggest_voice_requires_voice_channel() {
    let dir = setup();
    as_user(&dir, "alyx")
        .args(["suggest", "voice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("voice channel"));
}

#[test]
fn suggest_default_falls_back_to_online() {
    let dir = setup();
    add(&dir, "alyx", "Go");
    add(&dir, "gordon", "Go");
    as_user(&dir, "alyx")
        .args(["--json", "suggest"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""mode": "presence""#))
        .stdout(predicate::str::contains(r#""Go""#));
}

#[test]
fn suggest_voice_uses_channel_members() {
    let dir = setup();
    // barney is busy but sitting in voice with gordon
    add(&dir, "gordon", "Half-Life");
    add(&dir, "barney", "Half-Life");
    as_user(&dir, "gordon")
        .arg("suggest")
        .assert()
        .success()
        .stdout(predicate::str::contains("Half-Life"));
}

#[test]
fn suggest_alone_is_insufficient_audience() {
    let dir = setup();
    // eli shares the Kennel only with a bot
    as_user(&dir, "eli")
        .args(["suggest", "voice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("more than one person"));
}

#[test]
fn pick_chooses_a_common_game() {
    let dir = setup();
    add(&dir, "alyx", "Go");
    add(&dir, "gordon", "Go");
    as_user(&dir, "alyx")
        .args(["pick", "online"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Let's play some Go!"));
}

// ---------------------------------------------------------------------------
// poll
// ---------------------------------------------------------------------------

#[test]
fn poll_creates_link() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/v2/polls")
        .with_body(r#"{"id": 4242}"#)
        .create();

    let dir = setup();
    write_config(&dir, &format!("poll:\n  api_base: {}\n", server.url()));
    for g in ["Chess", "Go"] {
        add(&dir, "alyx", g);
        add(&dir, "gordon", g);
    }
    as_user(&dir, "alyx")
        .args(["poll", "online"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{}/4242", server.url())));
    mock.assert();
}

#[test]
fn poll_with_too_many_games_is_distinct_from_zero() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/api/v2/polls").expect(0).create();

    let dir = setup();
    write_config(
        &dir,
        &format!("poll:\n  api_base: {}\n  max_options: 2\n", server.url()),
    );
    for g in ["Chess", "Go", "Checkers"] {
        add(&dir, "alyx", g);
        add(&dir, "gordon", g);
    }
    as_user(&dir, "alyx")
        .args(["poll", "online"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too many games"))
        .stderr(predicate::str::contains("zero").not());
    mock.assert();
}

#[test]
fn poll_with_one_common_game_names_it_without_polling() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/api/v2/polls").expect(0).create();

    let dir = setup();
    write_config(&dir, &format!("poll:\n  api_base: {}\n", server.url()));
    for user in ["alyx", "gordon"] {
        add(&dir, user, "Go");
    }
    add(&dir, "alyx", "Chess");
    as_user(&dir, "alyx")
        .args(["poll", "online"])
        .assert()
        .success()
        .stdout(predicate::str::contains("only have one game in common: Go"));
    mock.assert();
}

#[test]
fn poll_with_nothing_in_common_skips_service() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/api/v2/polls").expect(0).create();

    let dir = setup();
    write_config(&dir, &format!("poll:\n  api_base: {}\n", server.url()));
    add(&dir, "alyx", "Chess");
    add(&dir, "gordon", "Go");
    as_user(&dir, "alyx")
        .args(["poll", "online"])
        .assert()
        .success()
        .stdout(predicate::str::contains("zero games in common"));
    mock.assert();
}

// ---------------------------------------------------------------------------
// steamkey / link / update
// ---------------------------------------------------------------------------

#[test]
fn steamkey_requires_manage() {
    let dir = setup();
    as_user(&dir, "gordon")
        .args(["steamkey", "KEY"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not allowed"));
    as_user(&dir, "alyx")
        .args(["steamkey", "KEY"])
        .assert()
        .success()
        .stdout(predicate::str::contains("saved"));
}

#[test]
fn link_without_key_is_unavailable() {
    let dir = setup();
    as_user(&dir, "gordon")
        .args(["link", "76561198221914843"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no Steam API key"));
}

#[test]
fn link_merges_steam_games_and_survives_destroy() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/ISteamUser/ResolveVanityURL/v0001/")
        .match_query(mockito::Matcher::UrlEncoded(
            "vanityurl".into(),
            "gman".into(),
        ))
        .with_body(r#"{"response":{"steamid":"76561198221914843","success":1}}"#)
        .create();
    server
        .mock("GET", "/IPlayerService/GetOwnedGames/v0001/")
        .match_query(mockito::Matcher::Any)
        .with_body(OWNED_GAMES)
        .expect(2)
        .create();

    let dir = setup();
    write_config(&dir, &format!("steam:\n  api_base: {}\n", server.url()));
    as_user(&dir, "alyx").args(["steamkey", "KEY"]).assert().success();
    add(&dir, "gordon", "Chess");

    as_user(&dir, "gordon")
        .args(["link", "gman"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 new, 3 total"));

    as_user(&dir, "gordon").args(["destroy", "--yes"]).assert().success();

    // the link survives the wipe, so update can re-sync
    as_user(&dir, "gordon")
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 new, 2 total"));
}

#[test]
fn update_without_link_fails() {
    let dir = setup();
    as_user(&dir, "alyx").args(["steamkey", "KEY"]).assert().success();
    as_user(&dir, "gordon")
        .arg("update")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not linked"));
}

#[test]
fn update_reports_missing_link_before_missing_key() {
    let dir = setup();
    as_user(&dir, "gordon")
        .arg("update")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not linked"))
        .stderr(predicate::str::contains("API key").not());
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_default_is_clean() {
    let dir = setup();
    gamelib(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No warnings"));
}

#[test]
fn config_validate_reports_errors() {
    let dir = setup();
    write_config(&dir, "poll:\n  max_options: 1\n");
    gamelib(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("max_options"));
}
