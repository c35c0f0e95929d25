//! Calendar Context
//!
//! Shared signals and configuration provided via Leptos Context API.

use leptos::prelude::*;

use crate::api::{BoardApi, FetchTransport};
use crate::config::BoardConfig;
use crate::dom::{BrowserStorage, BrowserUrl};
use crate::persist::{persist_team_filter, resolve_on_load};
use crate::state::TeamFilter;

/// Calendar-wide signals provided via context
#[derive(Clone, Copy)]
pub struct CalendarContext {
    /// Bumps the reload counter the calendar app watches
    set_reload_trigger: WriteSignal<u32>,
    /// Day columns per week
    pub work_days: u32,
    api_base: StoredValue<String>,
    storage_key: StoredValue<String>,
}

impl CalendarContext {
    pub fn new(set_reload_trigger: WriteSignal<u32>, config: &BoardConfig) -> Self {
        Self {
            set_reload_trigger,
            work_days: config.work_days,
            api_base: StoredValue::new(config.api_base.clone()),
            storage_key: StoredValue::new(config.storage_key.clone()),
        }
    }

    /// Trigger a reload of the displayed week
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    pub fn api(&self) -> BoardApi<FetchTransport> {
        BoardApi::new(FetchTransport, self.api_base.get_value())
    }

    /// Write a team filter change through to URL and storage, the same way
    /// the board page does
    pub fn persist_team(&self, previous: &TeamFilter, next: &TeamFilter) {
        let mut storage = BrowserStorage::open();
        let key = self.storage_key.get_value();
        persist_team_filter(&mut BrowserUrl, &mut storage, &key, previous, next);
    }

    /// Team filter at page load: URL, then storage
    pub fn restore_team(&self) -> TeamFilter {
        let storage = BrowserStorage::open();
        let key = self.storage_key.get_value();
        resolve_on_load(&mut BrowserUrl, &storage, &key).team
    }
}
