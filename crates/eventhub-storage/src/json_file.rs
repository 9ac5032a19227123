//! Directory-of-JSON-files `StateStore`.
//!
//! Each key maps to `<dir>/<key>.json`. Saves write `<key>.json.tmp`, sync
//! it, then rename over the target, so a crash leaves either the old or the
//! new document and never a partial one.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use eventhub_core::error::DomainError;
use eventhub_core::persistence::StateStore;
use tracing::debug;

use crate::error::StorageError;

/// File-backed state store rooted at a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStateStore {
    dir: PathBuf,
}

impl JsonFileStateStore {
    /// Opens (creating if needed) the state directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// The directory holding the state files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn read(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        let path = self.path_for(key)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StorageError::Corrupt { path, source })
    }

    fn write(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| StorageError::Corrupt {
            path: path.clone(),
            source,
        })?;

        let mut file = File::create(&tmp).map_err(io_err(&tmp))?;
        file.write_all(&bytes).map_err(io_err(&tmp))?;
        file.sync_all().map_err(io_err(&tmp))?;
        drop(file);
        fs::rename(&tmp, &path).map_err(io_err(&path))?;

        debug!(key, bytes = bytes.len(), "state file written");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + use<> {
    let path = path.to_path_buf();
    move |source| StorageError::Io { path, source }
}

impl StateStore for JsonFileStateStore {
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, DomainError> {
        Ok(self.read(key)?)
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), DomainError> {
        Ok(self.write(key, value)?)
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        Ok(self.delete(key)?)
    }
}
