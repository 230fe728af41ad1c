//! Shared configuration store
//!
//! Owns the live configuration. Readers take snapshots; every write goes
//! through `update`, which runs under the write lock so no reader sees a
//! half-applied change.

use crate::error::{Error, Result};
use crate::manifest::{self, Configuration};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Configuration shared across daemon subsystems
#[derive(Debug)]
pub struct ConfigStore {
    /// File the configuration was loaded from, if any
    path: Option<PathBuf>,
    inner: RwLock<Configuration>,
}

impl ConfigStore {
    /// Create an in-memory store
    pub fn new(config: Configuration) -> Self {
        Self {
            path: None,
            inner: RwLock::new(config),
        }
    }

    /// Load the store from a file, using defaults when it does not exist yet
    pub fn open(path: &Path) -> Result<Self> {
        let config = manifest::load_or_default(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            inner: RwLock::new(config),
        })
    }

    /// Clone of the current configuration
    pub fn snapshot(&self) -> Configuration {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply a mutation atomically
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Configuration),
    {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }

    /// Write the current configuration back to its file
    ///
    /// Writes to a sibling temp file and renames it into place.
    pub fn write_to_disk(&self) -> Result<()> {
        let path = self.path.as_ref().ok_or_else(|| {
            Error::ConfigValidation("configuration store has no backing file".into())
        })?;

        let text = toml::to_string_pretty(&self.snapshot())?;

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, text)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::debug!(path = %path.display(), "wrote configuration to disk");
        Ok(())
    }
}
