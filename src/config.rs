//! Client Configuration
//!
//! Tunables embedded by the server page as
//! `<script type="application/json" id="board-config">{...}</script>`.
//! Every field is optional.

use serde::Deserialize;

pub const CONFIG_ELEMENT_ID: &str = "board-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Version polling period
    pub poll_interval_ms: u32,
    /// Delay between the last keystroke and the search request
    pub search_debounce_ms: u32,
    /// Local storage key of the persisted team filter
    pub storage_key: String,
    /// Prefix for every API path (empty = same origin)
    pub api_base: String,
    /// Days rendered per calendar week, starting Sunday
    pub work_days: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5000,
            search_debounce_ms: 300,
            storage_key: "activeTeamFilter".to_string(),
            api_base: String::new(),
            work_days: 5,
        }
    }
}

impl BoardConfig {
    /// Parse an embedded config block, falling back to defaults on bad input
    pub fn from_json(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<BoardConfig>(raw) {
            Ok(mut config) => {
                config.work_days = config.work_days.clamp(1, 7);
                config
            }
            Err(e) => {
                log::warn!(target: "config", "ignoring invalid board config: {}", e);
                Self::default()
            }
        }
    }

    /// Read the config block from the current document
    pub fn load() -> Self {
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| doc.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());
        match raw {
            Some(text) => Self::from_json(&text),
            None => Self::default(),
        }
    }
}
