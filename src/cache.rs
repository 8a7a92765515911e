/// Session cache: a narrow key-value view over page-local storage
use std::cell::RefCell;
use std::collections::HashMap;

use thiserror::Error;
use web_sys::Storage;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("storage write rejected: {0}")]
    Write(String),
}

/// Key-value store that survives extension re-injection within a session
pub trait SessionCache {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;
}

/// `window.localStorage`, shared by the page context and the content script
pub struct LocalStorageCache {
    storage: Storage,
}

impl LocalStorageCache {
    pub fn new(storage: Storage) -> Self {
        LocalStorageCache { storage }
    }

    /// Open the current window's local storage, if the page allows it
    pub fn from_window() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(LocalStorageCache::new(storage))
    }
}

impl SessionCache for LocalStorageCache {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| CacheError::Write(format!("{:?}", e)))
    }
}

/// In-process cache used when local storage is unavailable (sandboxed frames)
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Best available cache for the current page
pub fn open() -> Box<dyn SessionCache> {
    match LocalStorageCache::from_window() {
        Some(cache) => Box::new(cache),
        None => {
            log::warn!("localStorage unavailable, channel id will not persist across re-injection");
            Box::new(MemoryCache::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_cache_round_trip() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("yt-extension-channel-id"), None);

        cache.set("yt-extension-channel-id", "UC1234567890123456789012").unwrap();
        assert_eq!(
            cache.get("yt-extension-channel-id"),
            Some("UC1234567890123456789012".to_string())
        );
    }

    #[test]
    fn test_memory_cache_overwrites() {
        let cache = MemoryCache::new();
        cache.set("k", "first").unwrap();
        cache.set("k", "second").unwrap();
        assert_eq!(cache.get("k"), Some("second".to_string()));
    }
}
