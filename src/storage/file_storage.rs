use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::model::ProfileCache;
use crate::storage::ProfileStore;
use crate::{ArmoryError, Result};

const LOG_PREFIX: &str = "[file-storage]";

/// Profile cache kept as a single JSON document.
///
/// The file is overwritten in place on every save. There is no
/// temp-file-and-rename step, so a crash in the middle of a write can leave
/// a truncated file behind, which then fails to load.
pub struct FileStorage {
    log_prefix: String,
    label: String,
    path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with a diagnostic label and file path
    pub fn new(label: String, path: &Path) -> Self {
        Self {
            log_prefix: format!("{} {}", LOG_PREFIX, label),
            label,
            path: PathBuf::from(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error<E: ToString>(&self, e: E) -> ArmoryError {
        ArmoryError::Storage(self.label.clone(), e.to_string())
    }
}

impl ProfileStore for FileStorage {
    /// Read the whole cache from disk, a missing file is an empty cache
    fn load(&mut self) -> Result<ProfileCache> {
        if !self.path.exists() {
            log::info!(
                "{} {} does not exist yet, starting empty",
                self.log_prefix,
                self.path.display()
            );
            return Ok(ProfileCache::new());
        }

        let file = File::open(&self.path).map_err(|e| self.storage_error(e))?;
        let profiles: ProfileCache =
            serde_json::from_reader(BufReader::new(file))
                .map_err(|e| self.storage_error(e))?;

        log::info!(
            "{} {} entries have been read",
            self.log_prefix,
            profiles.len()
        );
        Ok(profiles)
    }

    /// Overwrite the file with the given cache
    fn save(&mut self, profiles: &ProfileCache) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| self.storage_error(e))?;
            }
        }
        let file = File::create(&self.path).map_err(|e| self.storage_error(e))?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer(&mut writer, profiles)
            .map_err(|e| self.storage_error(e))?;
        writer.flush().map_err(|e| self.storage_error(e))?;

        log::info!(
            "{} {} entries have been written",
            self.log_prefix,
            profiles.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProfileEntry, Scraped};
    use tempdir::TempDir;

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new("d3armory_storage").unwrap();
        let mut storage = FileStorage::new(
            "profiles".to_owned(),
            &dir.path().join("profiles.json"),
        );
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new("d3armory_storage").unwrap();
        let path = dir.path().join("nested/cache/profiles.json");
        let mut storage = FileStorage::new("profiles".to_owned(), &path);

        let mut profiles = ProfileCache::new();
        profiles.insert(
            "Foo-1234".to_owned(),
            ProfileEntry::new(Scraped::failed("Could not load file")),
        );
        storage.save(&profiles).unwrap();

        assert!(path.exists());
        assert_eq!(storage.load().unwrap(), profiles);
    }

    #[test]
    fn written_file_is_a_plain_mapping() {
        let dir = TempDir::new("d3armory_storage").unwrap();
        let path = dir.path().join("profiles.json");
        let mut storage = FileStorage::new("profiles".to_owned(), &path);

        let mut profiles = ProfileCache::new();
        profiles.insert(
            "Foo-1234".to_owned(),
            ProfileEntry::new(Scraped::failed("timeout")),
        );
        storage.save(&profiles).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({
                "Foo-1234": {"career": {"error": "timeout"}, "heroes": {}}
            })
        );
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = TempDir::new("d3armory_storage").unwrap();
        let path = dir.path().join("profiles.json");
        fs::write(&path, "{\"Foo-1234\": {\"car").unwrap();

        let mut storage = FileStorage::new("profiles".to_owned(), &path);
        assert!(matches!(
            storage.load(),
            Err(ArmoryError::Storage(ref label, _)) if label == "profiles"
        ));
    }

    #[test]
    fn unwritable_path_is_a_storage_error() {
        let dir = TempDir::new("d3armory_storage").unwrap();
        // a directory where the file should be
        let path = dir.path().join("profiles.json");
        fs::create_dir_all(&path).unwrap();

        let mut storage = FileStorage::new("profiles".to_owned(), &path);
        assert!(matches!(
            storage.save(&ProfileCache::new()),
            Err(ArmoryError::Storage(..))
        ));
    }
}
