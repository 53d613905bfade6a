// Persisted last-snapshot slot (browser local storage in production).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// One key holding the raw text of the last good snapshot message.
pub trait SnapshotStore {
    fn load(&self) -> Option<String>;
    fn save(&mut self, raw: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slot: Option<String>,
}

impl MemoryStore {
    pub fn with_saved(raw: impl Into<String>) -> Self {
        Self {
            slot: Some(raw.into()),
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.slot.clone()
    }

    fn save(&mut self, raw: &str) -> Result<(), StoreError> {
        self.slot = Some(raw.to_string());
        Ok(())
    }
}
