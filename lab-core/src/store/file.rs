//! TOML file-backed preference storage.

use std::fs;
use std::path::{Path, PathBuf};

use super::{PreferenceBackend, Preferences, StoreError};

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV: &str = "LAB_CONFIG";

/// Preferences stored as a TOML file.
///
/// # Storage Location
///
/// `~/.config/lab/config.toml` on Linux, the platform configuration
/// directory elsewhere, or the path named by `LAB_CONFIG`.
///
/// A missing file loads as empty preferences; parent directories are
/// created on the first write.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend for a specific file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the default configuration file path.
    ///
    /// Honors `LAB_CONFIG` when set and non-empty.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let dirs = directories::ProjectDirs::from("", "", "lab")
            .ok_or(StoreError::ConfigDirUnavailable)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Create a backend for the default location.
    pub fn default_location() -> Result<Self, StoreError> {
        Ok(Self::new(Self::default_path()?))
    }

    /// Get the storage path for this backend.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PreferenceBackend for FileBackend {
    fn load(&self) -> Result<Preferences, StoreError> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        toml::from_str(&contents).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, prefs: &Preferences) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let contents = toml::to_string_pretty(prefs)?;
        fs::write(&self.path, contents).map_err(|e| self.io_error(e))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
