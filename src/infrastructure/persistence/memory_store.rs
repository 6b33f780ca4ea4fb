//! In-process mirror store.

use crate::domain::repositories::{MirrorResult, MirrorStore};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A mirror kept in memory.
///
/// Clones share the same map, so a test can hand one clone to a registry and
/// inspect or reuse the data through another. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        debug!("Using MemoryStore (persistence limited to this process)");
        Self::default()
    }

    /// Seeds `key` with a raw value, bypassing any encoding.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries.lock().insert(key.to_string(), value.to_string());
        self
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

impl MirrorStore for MemoryStore {
    fn get(&self, key: &str) -> MirrorResult<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> MirrorResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
