use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// A JSON document persisted as a single versioned file.
///
/// The on-disk version tag must match `VERSION` exactly; anything else
/// (including a missing or unreadable file) reads back as `empty()`.
pub trait VersionedFile: Serialize + DeserializeOwned {
    const VERSION: u32;

    fn version(&self) -> u32;

    /// The version-tagged empty document used when the file is absent.
    fn empty() -> Self;
}

/// Load a versioned store file, degrading to the empty default.
///
/// Missing file, read error, parse error, and version mismatch are all
/// treated as "first run". A file that exists but fails to parse gets a
/// one-line stderr warning before being discarded; every other failure
/// path is silent.
pub fn load<T: VersionedFile>(path: &Path) -> T {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return T::empty(),
    };
    match serde_json::from_str::<T>(&content) {
        Ok(file) if file.version() == T::VERSION => file,
        Ok(_) => T::empty(),
        Err(e) => {
            eprintln!(
                "warning: ignoring malformed store file {}: {}",
                path.display(),
                e
            );
            T::empty()
        }
    }
}

/// Atomically replace a store file with a pretty-printed serialization.
///
/// Writes a sibling `.tmp` file and renames it over the target, so a crash
/// mid-write leaves either the old contents or the new, never a partial
/// file. Parent directories are created as needed. Errors propagate.
pub fn save<T: VersionedFile>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create store directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(value).context("Failed to serialize store file")?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    std::fs::write(&tmp, &json)
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestFile {
        version: u32,
        items: Vec<String>,
    }

    impl VersionedFile for TestFile {
        const VERSION: u32 = 1;

        fn version(&self) -> u32 {
            self.version
        }

        fn empty() -> Self {
            Self {
                version: Self::VERSION,
                items: Vec::new(),
            }
        }
    }

    #[test]
    fn load_missing_file_returns_empty() {
        let dir = TempDir::new().unwrap();
        let loaded: TestFile = load(&dir.path().join("nope.json"));
        assert_eq!(loaded, TestFile::empty());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let file = TestFile {
            version: 1,
            items: vec!["a".into(), "b".into()],
        };
        save(&path, &file).unwrap();
        let loaded: TestFile = load(&path);
        assert_eq!(loaded, file);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deep/nested/store.json");
        save(&path, &TestFile::empty()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn load_corrupt_file_returns_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{not json at all").unwrap();
        let loaded: TestFile = load(&path);
        assert_eq!(loaded, TestFile::empty());
    }

    #[test]
    fn load_version_mismatch_returns_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{"version": 99, "items": ["stale"]}"#).unwrap();
        let loaded: TestFile = load(&path);
        assert_eq!(loaded, TestFile::empty());
    }

    #[test]
    fn save_is_atomic_no_tmp_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        save(&path, &TestFile::empty()).unwrap();
        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["store.json"]);
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let first = TestFile {
            version: 1,
            items: vec!["old".into()],
        };
        save(&path, &first).unwrap();
        let second = TestFile {
            version: 1,
            items: vec!["new".into()],
        };
        save(&path, &second).unwrap();
        let loaded: TestFile = load(&path);
        assert_eq!(loaded.items, vec!["new"]);
    }

    #[test]
    fn saved_json_is_pretty_printed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let file = TestFile {
            version: 1,
            items: vec!["a".into()],
        };
        save(&path, &file).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains('\n'), "store files should be pretty-printed");
    }
}
