//! In-memory preference storage implementation.

use std::sync::{Arc, RwLock};

use super::{PreferenceBackend, Preferences, StoreError};

#[derive(Debug, Default)]
struct MemoryState {
    data: Preferences,
    writes: usize,
    fail_writes: bool,
}

/// In-memory preference backend for testing and development.
///
/// This backend is not persistent; data is lost when the process exits.
/// Clones share the same state, so a test can keep a handle after boxing
/// one into a [`PreferenceStore`](super::PreferenceStore) and inspect the
/// writes made through it.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryBackend {
    /// Create a new empty memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory backend with initial data.
    pub fn with_data(data: Preferences) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState {
                data,
                ..MemoryState::default()
            })),
        }
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut state) = self.state.write() {
            state.fail_writes = fail;
        }
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.state.read().map(|s| s.writes).unwrap_or(0)
    }

    /// Copy of the last written (or initial) data.
    pub fn snapshot(&self) -> Preferences {
        self.state
            .read()
            .map(|s| s.data.clone())
            .unwrap_or_default()
    }
}

impl PreferenceBackend for MemoryBackend {
    fn load(&self) -> Result<Preferences, StoreError> {
        let state = self.state.read().map_err(|e| StoreError::BackendError {
            message: format!("lock poisoned: {}", e),
        })?;
        Ok(state.data.clone())
    }

    fn write(&self, prefs: &Preferences) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|e| StoreError::BackendError {
            message: format!("lock poisoned: {}", e),
        })?;
        if state.fail_writes {
            return Err(StoreError::BackendError {
                message: "memory backend is read-only".to_string(),
            });
        }
        state.data = prefs.clone();
        state.writes += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
