//! Calendar Components
//!
//! Leptos views of the calendar page.

mod calendar_app;
mod schedule_editor;
mod special_days_panel;
mod toolbar;
mod week_view;
mod workload_view;

pub use calendar_app::CalendarApp;
pub use schedule_editor::ScheduleEditor;
pub use special_days_panel::SpecialDaysPanel;
pub use toolbar::Toolbar;
pub use week_view::WeekView;
pub use workload_view::WorkloadView;

/// Blocking browser alert, for failures the user has to acknowledge
pub(crate) fn alert(message: &str) {
    if let Some(win) = web_sys::window() {
        let _ = win.alert_with_message(message);
    }
}
