//! Calendar State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use chrono::NaiveDate;
use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{MemberWorkload, SpecialDay, Task, Team};
use crate::state::FilterState;

/// Calendar page state with field-level reactivity
#[derive(Clone, Debug, Store)]
pub struct CalendarState {
    /// Any day of the displayed week
    pub anchor: NaiveDate,
    /// Team filter and week/workload view
    pub filter: FilterState,
    /// Tasks of the displayed week
    pub tasks: Vec<Task>,
    /// Member rows of the workload view
    pub workload: Vec<MemberWorkload>,
    pub special_days: Vec<SpecialDay>,
    /// Active teams, for the filter buttons
    pub teams: Vec<Team>,
    /// Task open in the schedule editor
    pub schedule_task: Option<Task>,
}

impl CalendarState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            anchor: today,
            filter: FilterState::for_calendar(),
            tasks: Vec::new(),
            workload: Vec::new(),
            special_days: Vec::new(),
            teams: Vec::new(),
            schedule_task: None,
        }
    }
}

pub type CalendarStore = Store<CalendarState>;

/// Get the calendar store from context
pub fn use_calendar_store() -> CalendarStore {
    expect_context::<CalendarStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_remove_special_day(store: &CalendarStore, id: u32) {
    store.special_days().write().retain(|d| d.id != id);
}
