use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::base_storage::KeyValueStorage;
use profile_error::{ProfileError, Result};

const STORAGE_VERSION: i32 = 3;

/// Key-value storage persisted as a single JSON file.
///
/// Every operation reads or rewrites the whole file, so two instances
/// pointing at the same path always observe each other's writes.
#[derive(Debug, Clone)]
pub struct FileStorage {
    label: String,
    path: PathBuf,
}

/// The on-disk layout of a [`FileStorage`].
#[derive(Serialize, Deserialize)]
pub struct FileStorageData {
    version: i32,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Create a new file storage with a diagnostic label and file path
    pub fn new(label: String, path: &Path) -> Self {
        Self {
            label,
            path: PathBuf::from(path),
        }
    }

    /// Read all entries from the storage file.
    /// A missing file is an empty storage.
    pub fn read_fs(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            log::debug!("{}: no file at {}", self.label, self.path.display());
            return Ok(BTreeMap::new());
        }

        let file = File::open(&self.path)?;
        let data: FileStorageData =
            serde_json::from_reader(BufReader::new(file)).map_err(|err| {
                ProfileError::Storage(self.label.clone(), err.to_string())
            })?;
        if data.version != STORAGE_VERSION {
            return Err(ProfileError::Storage(
                self.label.clone(),
                format!(
                    "Storage version mismatch: expected {}, got {}",
                    STORAGE_VERSION, data.version
                ),
            ));
        }

        Ok(data.entries)
    }

    /// Replace the storage file with `entries`.
    ///
    /// The data goes to a sibling temporary file first and is then renamed
    /// over the target, so readers never see a half-written file.
    pub fn write_fs(&self, entries: BTreeMap<String, String>) -> Result<()> {
        let parent_dir = self.path.parent().ok_or_else(|| {
            ProfileError::Storage(
                self.label.clone(),
                "Failed to get parent directory".to_owned(),
            )
        })?;
        fs::create_dir_all(parent_dir)?;

        let count = entries.len();
        let data = FileStorageData {
            version: STORAGE_VERSION,
            entries,
        };

        let tmp_path = self.path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer(&mut writer, &data)?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        log::info!("{} {} entries have been written", self.label, count);
        Ok(())
    }

    /// Erase the storage file from disk
    pub fn erase(&self) -> Result<()> {
        fs::remove_file(&self.path).map_err(|err| {
            ProfileError::Storage(self.label.clone(), err.to_string())
        })
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_fs()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        let mut entries = self.read_fs()?;
        entries.insert(key.to_owned(), value);
        self.write_fs(entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.read_fs()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_fs(entries)
    }
}
