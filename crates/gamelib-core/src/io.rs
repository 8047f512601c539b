use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `path` with `data` in one rename, creating parent directories.
/// Readers see either the old file or the new one, never a torn write.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Seed a file the operator is expected to edit. Returns false when it exists.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, data).map(|()| true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_parents_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".gamelib/config.yaml");
        atomic_write(&path, b"version: 1").unwrap();
        atomic_write(&path, b"version: 2").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "version: 2");
    }

    #[test]
    fn seeded_roster_is_never_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("roster.yaml");
        assert!(write_if_missing(&path, b"members: []").unwrap());
        assert!(!write_if_missing(&path, b"members: [oops]").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "members: []");
    }
}
