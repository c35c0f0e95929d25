//! Week View Component
//!
//! One column per work day. Task cards open the schedule editor on click
//! and can be dragged onto another day.

use board_dragdrop::{make_on_mouseleave, make_on_mousedown, make_on_target_mouseenter, DndSignals};
use chrono::{Datelike, NaiveDate};
use leptos::prelude::*;

use crate::calendar::context::CalendarContext;
use crate::calendar::store::{use_calendar_store, CalendarStateStoreFields};
use crate::calendar::{day_name, day_type_label, priority_color, special_day_on, tasks_on};
use crate::dates;
use crate::models::Task;

#[component]
fn TaskCard(task: Task) -> impl IntoView {
    let store = use_calendar_store();
    let dnd = expect_context::<DndSignals<NaiveDate>>();
    let id = task.id;

    let class = move || {
        if dnd.is_dragging(id) {
            "calendar-task-card dragging"
        } else {
            "calendar-task-card"
        }
    };
    let style = format!("border-right: 4px solid {}", priority_color(&task.priority));

    let open = {
        let task = task.clone();
        move |_: web_sys::MouseEvent| {
            // the click that ends a drag is not a click on the card
            if dnd.drag_just_ended_read.get_untracked() {
                return;
            }
            store.schedule_task().set(Some(task.clone()));
        }
    };

    view! {
        <div
            class=class
            style=style
            title=task.notes.clone().unwrap_or_default()
            on:mousedown=make_on_mousedown(dnd, id)
            on:click=open
        >
            <div class="task-card-name">{task.task.clone()}</div>
            <div class="task-card-project">{task.project.clone()}</div>
        </div>
    }
}

#[component]
fn DayColumn(day: NaiveDate) -> impl IntoView {
    let store = use_calendar_store();
    let dnd = expect_context::<DndSignals<NaiveDate>>();

    let special = move || special_day_on(&store.special_days().read(), day).cloned();
    let class = move || {
        let mut c = "calendar-day-column".to_string();
        if special().is_some() {
            c.push_str(" special-day");
        }
        if dnd.is_target(day) {
            c.push_str(" drop-target");
        }
        c
    };
    let tasks = move || tasks_on(&store.tasks().read(), day);

    view! {
        <div
            class=class
            data-date=dates::to_iso(day)
            on:mouseenter=make_on_target_mouseenter(dnd, day)
            on:mouseleave=make_on_mouseleave(dnd)
        >
            <div class="day-header">
                <span class="day-name">{day_name(day)}</span>
                <span class="day-number">{day.day()}</span>
                {move || special().map(|sd| view! {
                    <div class="special-day-label" title=day_type_label(&sd.day_type).to_string()>
                        {sd.name.clone()}
                    </div>
                })}
            </div>
            <div class="day-tasks">
                {move || tasks().into_iter().map(|task| view! { <TaskCard task=task /> }).collect_view()}
            </div>
        </div>
    }
}

#[component]
pub fn WeekView() -> impl IntoView {
    let ctx = expect_context::<CalendarContext>();
    let store = use_calendar_store();

    view! {
        <div class="calendar-week">
            <For
                each=move || dates::week_days(store.anchor().get(), ctx.work_days)
                key=|day| *day
                children=move |day| view! { <DayColumn day=day /> }
            />
        </div>
    }
}
