//! Persisted user preferences.
//!
//! This module provides:
//! - [`Preferences`] - Preferred domains and stored tokens
//! - [`PreferenceBackend`] - Trait for persistence backends
//! - [`PreferenceStore`] - The loaded preferences plus the backend they came from
//! - [`FileBackend`] - TOML file in the platform configuration directory
//! - [`MemoryBackend`] - In-memory implementation for testing
//!
//! # Lifecycle
//!
//! A store is loaded once at process start, mutated in place by the
//! resolvers, and written back with [`PreferenceStore::persist`] whenever
//! a new choice or token has been recorded. Writes replace the whole file.
//!
//! # Example
//!
//! ```rust,ignore
//! use lab_core::store::PreferenceStore;
//!
//! let mut prefs = PreferenceStore::load_default()?;
//! prefs.add_preferred_domain("gitlab.example.com");
//! prefs.persist()?;
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::model::Token;

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Error type for preference persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error reading or writing the store.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored file is not valid TOML or has the wrong shape.
    #[error("invalid preferences in {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Preferences could not be serialized.
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] toml::ser::Error),

    /// Configuration directory not available.
    #[error("configuration directory not available")]
    ConfigDirUnavailable,

    /// The storage backend encountered an error.
    #[error("backend error: {message}")]
    BackendError { message: String },
}

/// The persisted preference data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Domains chosen earlier, highest priority first.
    #[serde(default)]
    pub preferred_domains: Vec<String>,

    /// Stored credential per domain.
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

/// Abstraction over preference persistence backends.
///
/// Implementations include:
/// - [`FileBackend`] - TOML file on disk
/// - [`MemoryBackend`] - In-memory storage for testing
pub trait PreferenceBackend {
    /// Read the stored preferences.
    ///
    /// Returns empty preferences if nothing has been stored yet.
    fn load(&self) -> Result<Preferences, StoreError>;

    /// Replace the stored preferences.
    fn write(&self, prefs: &Preferences) -> Result<(), StoreError>;

    /// Human-readable location, for diagnostics.
    fn describe(&self) -> String;
}

/// Loaded preferences bound to the backend they are written back to.
///
/// This value is owned by the caller and passed by `&mut` into each
/// resolver call. It is not safe to share between concurrently running
/// resolutions: every [`persist`](Self::persist) overwrites the backend
/// with this instance's view.
pub struct PreferenceStore {
    data: Preferences,
    backend: Box<dyn PreferenceBackend>,
}

impl PreferenceStore {
    /// Load preferences from the given backend.
    pub fn load(backend: Box<dyn PreferenceBackend>) -> Result<Self, StoreError> {
        let data = backend.load()?;
        tracing::debug!(
            location = %backend.describe(),
            preferred = data.preferred_domains.len(),
            tokens = data.tokens.len(),
            "Loaded preferences"
        );
        Ok(Self { data, backend })
    }

    /// Load preferences from the default configuration file.
    pub fn load_default() -> Result<Self, StoreError> {
        Self::load(Box::new(FileBackend::default_location()?))
    }

    /// Load preferences from a specific configuration file.
    pub fn load_from_path(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::load(Box::new(FileBackend::new(path)))
    }

    /// Write the current state through the backend.
    pub fn persist(&self) -> Result<(), StoreError> {
        tracing::debug!(location = %self.backend.describe(), "Writing preferences");
        self.backend.write(&self.data)
    }

    /// Domains chosen earlier, highest priority first.
    pub fn preferred_domains(&self) -> &[String] {
        &self.data.preferred_domains
    }

    /// Append a domain to the preference list.
    ///
    /// Duplicates are not filtered; callers only add domains that did not
    /// match an existing preference.
    pub fn add_preferred_domain(&mut self, domain: impl Into<String>) {
        self.data.preferred_domains.push(domain.into());
    }

    /// Look up the stored token for a domain.
    ///
    /// An empty stored value counts as no token.
    pub fn token(&self, domain: &str) -> Option<Token> {
        self.data
            .tokens
            .get(domain)
            .filter(|value| !value.is_empty())
            .map(|value| Token::new(value.as_str()))
    }

    /// Record a token for a domain.
    ///
    /// A non-empty token already stored for the domain is kept; returns
    /// whether the map changed.
    pub fn add_token(&mut self, domain: impl Into<String>, token: &Token) -> bool {
        let domain = domain.into();
        if self.token(&domain).is_some() {
            return false;
        }
        self.data.tokens.insert(domain, token.expose().to_string());
        true
    }

    /// Read-only view of the loaded data.
    pub fn data(&self) -> &Preferences {
        &self.data
    }

    /// Location the store writes to.
    pub fn location(&self) -> String {
        self.backend.describe()
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("location", &self.backend.describe())
            .field("preferred_domains", &self.data.preferred_domains)
            .field("tokens_count", &self.data.tokens.len())
            .finish()
    }
}
