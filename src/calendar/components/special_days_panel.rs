//! Special Days Panel Component
//!
//! Lists holidays and company events in date order, with add and delete.
//! Deleting asks inline first; only one row waits for confirmation at a time.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::alert;
use crate::calendar::context::CalendarContext;
use crate::calendar::store::{store_remove_special_day, use_calendar_store, CalendarStateStoreFields};
use crate::calendar::{day_type_label, delete_prompt, new_special_day, sorted_special_days};
use crate::dates;
use crate::mutation::failure_message;

const MSG_ADD_FAILED: &str = "שגיאה בהוספת יום מיוחד";
const MSG_REMOVE_FAILED: &str = "שגיאה במחיקת יום מיוחד";

const DAY_TYPES: [&str; 3] = ["holiday", "company_event", "other"];

#[component]
pub fn SpecialDaysPanel() -> impl IntoView {
    let ctx = expect_context::<CalendarContext>();
    let store = use_calendar_store();
    let (open, set_open) = signal(false);
    let (date, set_date) = signal(String::new());
    let (name, set_name) = signal(String::new());
    let (day_type, set_day_type) = signal(DAY_TYPES[0].to_string());
    // id of the row showing the delete question
    let pending_delete = RwSignal::new(None::<u32>);

    let on_add = move |_: web_sys::MouseEvent| {
        let Some(day) = new_special_day(&date.get_untracked(), &name.get_untracked(), &day_type.get_untracked()) else {
            return;
        };
        spawn_local(async move {
            match ctx.api().add_special_day(&day).await {
                Ok(_) => {
                    set_date.set(String::new());
                    set_name.set(String::new());
                    ctx.reload();
                }
                Err(e) => {
                    log::error!(target: "calendar", "adding special day {} failed: {}", day.date, e);
                    alert(&failure_message(MSG_ADD_FAILED, &e));
                }
            }
        });
    };

    let remove = move |id: u32| {
        pending_delete.set(None);
        spawn_local(async move {
            match ctx.api().delete_special_day(id).await {
                Ok(_) => {
                    store_remove_special_day(&store, id);
                    ctx.reload();
                }
                Err(e) => {
                    log::error!(target: "calendar", "deleting special day {} failed: {}", id, e);
                    alert(&failure_message(MSG_REMOVE_FAILED, &e));
                }
            }
        });
    };

    let days = move || sorted_special_days(&store.special_days().read());

    view! {
        <div class="special-days">
            <button class="special-days-toggle" on:click=move |_| set_open.update(|o| *o = !*o)>
                "ימים מיוחדים"
            </button>
            <Show when=move || open.get()>
                <div class="special-days-panel">
                    <div class="special-day-form">
                        <input
                            type="text"
                            id="specialDayDate"
                            placeholder="dd/mm/yyyy"
                            prop:value=move || date.get()
                            on:input=move |ev| set_date.set(event_target_value(&ev))
                        />
                        <input
                            type="text"
                            placeholder="שם"
                            prop:value=move || name.get()
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                        />
                        <select
                            prop:value=move || day_type.get()
                            on:change=move |ev| set_day_type.set(event_target_value(&ev))
                        >
                            {DAY_TYPES
                                .iter()
                                .map(|t| view! { <option value=*t>{day_type_label(t).to_string()}</option> })
                                .collect_view()}
                        </select>
                        <button class="btn-primary" on:click=on_add>"הוסף"</button>
                    </div>

                    <Show
                        when=move || !store.special_days().read().is_empty()
                        fallback=|| view! { <p class="empty-list">"אין ימים מיוחדים מוגדרים"</p> }
                    >
                        <ul class="special-days-list">
                            <For
                                each=days
                                key=|day| day.id
                                children=move |day| {
                                    let id = day.id;
                                    let prompt = delete_prompt(&day);
                                    let armed = move || pending_delete.get() == Some(id);
                                    view! {
                                        <li class="special-day-item" class:pending-delete=armed>
                                            <span class="special-day-date">{dates::iso_to_display(&day.date)}</span>
                                            <span class="special-day-name">{day.name.clone()}</span>
                                            <span class="special-day-type">{day_type_label(&day.day_type).to_string()}</span>
                                            <Show
                                                when=armed
                                                fallback=move || view! {
                                                    <button
                                                        class="special-day-delete"
                                                        title="מחק"
                                                        on:click=move |_| pending_delete.set(Some(id))
                                                    >
                                                        "×"
                                                    </button>
                                                }
                                            >
                                                <span class="delete-confirm">
                                                    <span class="delete-confirm-text">{prompt.clone()}</span>
                                                    <button class="confirm-btn" on:click=move |_| remove(id)>"✓"</button>
                                                    <button class="cancel-btn" on:click=move |_| pending_delete.set(None)>
                                                        "✗"
                                                    </button>
                                                </span>
                                            </Show>
                                        </li>
                                    }
                                }
                            />
                        </ul>
                    </Show>
                </div>
            </Show>
        </div>
    }
}
