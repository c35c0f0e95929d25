//! Schedule Editor Component
//!
//! Modal for the start and end date of the task picked in either view.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::alert;
use crate::calendar::context::CalendarContext;
use crate::calendar::schedule_from_input;
use crate::calendar::store::{use_calendar_store, CalendarStateStoreFields};
use crate::dates;
use crate::error::ApiError;
use crate::mutation::{failure_message, TaskMutations, MSG_SCHEDULE_FAILED};

#[component]
pub fn ScheduleEditor() -> impl IntoView {
    let ctx = expect_context::<CalendarContext>();
    let store = use_calendar_store();
    let (start, set_start) = signal(String::new());
    let (end, set_end) = signal(String::new());
    let (saving, set_saving) = signal(false);

    // refill the inputs whenever another task is opened
    Effect::new(move |_| {
        if let Some(task) = store.schedule_task().get() {
            set_start.set(task.start_date.as_deref().map(dates::iso_to_display).unwrap_or_default());
            set_end.set(task.end_date.as_deref().map(dates::iso_to_display).unwrap_or_default());
        }
    });

    let close = move || store.schedule_task().set(None);

    let on_save = move |_: web_sys::MouseEvent| {
        let Some(task) = store.schedule_task().get_untracked() else {
            return;
        };
        let patch = match schedule_from_input(&start.get_untracked(), &end.get_untracked()) {
            Ok(patch) => patch,
            Err(ApiError::Invalid(msg)) => {
                alert(&msg);
                return;
            }
            Err(e) => {
                alert(&failure_message(MSG_SCHEDULE_FAILED, &e));
                return;
            }
        };

        set_saving.set(true);
        spawn_local(async move {
            let api = ctx.api();
            let result = TaskMutations::new(&api).reschedule(task.id, &patch).await;
            set_saving.set(false);
            match result {
                Ok(()) => {
                    close();
                    ctx.reload();
                }
                Err(e) => {
                    log::error!(target: "calendar", "saving schedule of task {} failed: {}", task.id, e);
                    alert(&failure_message(MSG_SCHEDULE_FAILED, &e));
                }
            }
        });
    };

    let task_name = move || store.schedule_task().read().as_ref().map(|t| t.task.clone()).unwrap_or_default();

    view! {
        <Show when=move || store.schedule_task().read().is_some()>
            <div class="modal schedule-modal" on:click=move |_| close()>
                <div class="modal-content" on:click=|ev| ev.stop_propagation()>
                    <span class="close-modal" on:click=move |_| close()>"×"</span>
                    <h3>{task_name}</h3>
                    <label>
                        "תאריך התחלה"
                        <input
                            type="text"
                            id="scheduleStartDate"
                            placeholder="dd/mm/yyyy"
                            prop:value=move || start.get()
                            on:input=move |ev| set_start.set(event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "תאריך סיום"
                        <input
                            type="text"
                            id="scheduleEndDate"
                            placeholder="dd/mm/yyyy"
                            prop:value=move || end.get()
                            on:input=move |ev| set_end.set(event_target_value(&ev))
                        />
                    </label>
                    <div class="modal-actions">
                        <button class="btn-primary" disabled=move || saving.get() on:click=on_save>
                            "שמור"
                        </button>
                        <button class="btn-secondary" on:click=move |_| close()>"ביטול"</button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
