use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const GAMELIB_DIR: &str = ".gamelib";

pub const CONFIG_FILE: &str = ".gamelib/config.yaml";
pub const ROSTER_FILE: &str = ".gamelib/roster.yaml";
pub const DEFAULT_DB_FILE: &str = "library.db";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn gamelib_dir(root: &Path) -> PathBuf {
    root.join(GAMELIB_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn roster_path(root: &Path) -> PathBuf {
    root.join(ROSTER_FILE)
}

/// Location of the library database. `file_name` comes from
/// `storage.db_file` in the config and is relative to `.gamelib/`.
pub fn db_path(root: &Path, file_name: &str) -> PathBuf {
    gamelib_dir(root).join(file_name)
}
