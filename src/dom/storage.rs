//! Browser-backed persistence: `localStorage` and the address bar

use wasm_bindgen::JsValue;

use crate::persist::{HistoryEntry, KeyValueStore, MemoryStore, ParamChange, UrlState};

/// `localStorage`, or an in-memory map when the browser refuses access
/// (private mode, disabled storage)
pub enum BrowserStorage {
    Local(web_sys::Storage),
    Memory(MemoryStore),
}

impl BrowserStorage {
    pub fn open() -> Self {
        match web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            Some(storage) => BrowserStorage::Local(storage),
            None => {
                log::warn!(target: "persist", "local storage unavailable, filters will not survive reloads");
                BrowserStorage::Memory(MemoryStore::default())
            }
        }
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            BrowserStorage::Local(s) => s.get_item(key).ok().flatten(),
            BrowserStorage::Memory(m) => m.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        match self {
            BrowserStorage::Local(s) => {
                if let Err(e) = s.set_item(key, value) {
                    log::warn!(target: "persist", "could not store {}: {:?}", key, e);
                }
            }
            BrowserStorage::Memory(m) => m.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) {
        match self {
            BrowserStorage::Local(s) => {
                let _ = s.remove_item(key);
            }
            BrowserStorage::Memory(m) => m.remove(key),
        }
    }
}

/// The current page URL, rewritten through the History API
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserUrl;

impl BrowserUrl {
    fn current() -> Option<web_sys::Url> {
        let href = web_sys::window()?.location().href().ok()?;
        web_sys::Url::new(&href).ok()
    }
}

impl UrlState for BrowserUrl {
    fn param(&self, key: &str) -> Option<String> {
        Self::current()?.search_params().get(key)
    }

    fn apply(&mut self, changes: &[ParamChange], entry: HistoryEntry) {
        let Some(url) = Self::current() else {
            return;
        };
        let params = url.search_params();
        for change in changes {
            match change {
                ParamChange::Set(key, value) => params.set(key, value),
                ParamChange::Remove(key) => params.delete(key),
            }
        }
        url.set_search(&String::from(params.to_string()));

        let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
            return;
        };
        let href = url.href();
        let result = match entry {
            HistoryEntry::Replace => history.replace_state_with_url(&JsValue::NULL, "", Some(&href)),
            HistoryEntry::Push => history.push_state_with_url(&JsValue::NULL, "", Some(&href)),
        };
        if let Err(e) = result {
            log::warn!(target: "persist", "history update failed: {:?}", e);
        }
    }

    fn href(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default()
    }
}
