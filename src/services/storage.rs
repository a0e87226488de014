use serde::{Deserialize, Serialize};
use web_sys::window;

use crate::error::{BotWaveError, Result};

/// String-keyed durable storage holding JSON values.
pub trait KeyValueStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>>;
    fn set_raw(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str);

    /// `Ok(None)` when nothing is stored under `key`.
    fn load<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        match self.get_raw(key)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| BotWaveError::corrupt(key, e)),
            None => Ok(None),
        }
    }

    /// Writes are fire-and-forget: failures are logged, never returned.
    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let written = serde_json::to_string(value)
            .map_err(BotWaveError::from)
            .and_then(|json| self.set_raw(key, &json));
        if let Err(e) = written {
            tracing::warn!("failed to write '{}': {}", key, e);
        }
    }
}

/// `window.localStorage`.
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage> {
        window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(BotWaveError::Storage)
    }
}

impl KeyValueStore for LocalStorage {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| BotWaveError::Storage)
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| BotWaveError::Storage)
    }

    fn remove(&self, key: &str) {
        if let Ok(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

#[cfg(test)]
pub use memory::MemoryStorage;

#[cfg(test)]
mod memory {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::KeyValueStore;
    use crate::error::Result;

    /// In-process storage; clones share the same map, like tabs share localStorage.
    #[derive(Clone, Default)]
    pub struct MemoryStorage {
        items: Rc<RefCell<HashMap<String, String>>>,
    }

    impl KeyValueStore for MemoryStorage {
        fn get_raw(&self, key: &str) -> Result<Option<String>> {
            Ok(self.items.borrow().get(key).cloned())
        }

        fn set_raw(&self, key: &str, value: &str) -> Result<()> {
            self.items.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) {
            self.items.borrow_mut().remove(key);
        }
    }
}
