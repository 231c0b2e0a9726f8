use crate::settings::Setting;
use crate::StorageAdapter;
use pixfont_shared::types::Result;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Session storage: values set here are gone when the process exits. This is what the config
/// store starts with until a json file is attached.
#[derive(Debug, Default)]
pub struct MemoryStorageAdapter {
    values: RwLock<HashMap<String, Setting>>,
}

impl MemoryStorageAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys that were set in this session
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Setting>> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Setting>> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FromIterator<(String, Setting)> for MemoryStorageAdapter {
    fn from_iter<I: IntoIterator<Item = (String, Setting)>>(iter: I) -> Self {
        Self {
            values: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl StorageAdapter for MemoryStorageAdapter {
    fn get(&self, key: &str) -> Option<Setting> {
        self.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Setting) {
        self.write().insert(key.to_owned(), value);
    }

    fn all(&self) -> Result<HashMap<String, Setting>> {
        Ok(self.read().clone())
    }
}
