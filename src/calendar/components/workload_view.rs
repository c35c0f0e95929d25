//! Workload View Component
//!
//! Member rows by work day columns.

use leptos::prelude::*;

use crate::calendar::context::CalendarContext;
use crate::calendar::store::{use_calendar_store, CalendarStateStoreFields};
use crate::calendar::{block_title, block_tooltip, day_name, priority_color, special_day_on, workload_rows, WorkloadRow};
use crate::dates;
use crate::models::Task;

#[component]
fn WorkloadBlock(task: Task) -> impl IntoView {
    let store = use_calendar_store();
    let mut style = format!("background-color: {}", priority_color(&task.priority));
    if task.is_archived {
        style.push_str("; opacity: 0.5");
    }
    let title = block_tooltip(&task);
    let label = block_title(&task);

    view! {
        <div
            class="workload-task-block"
            style=style
            title=title
            on:click=move |_| store.schedule_task().set(Some(task.clone()))
        >
            {label}
        </div>
    }
}

#[component]
fn MemberRow(row: WorkloadRow) -> impl IntoView {
    let WorkloadRow { member, cells } = row;

    view! {
        <div class="workload-row">
            <div class="workload-member">
                <img class="avatar-sm" src=member.avatar_url() alt=member.name_he.clone() />
                <span class="workload-member-name">{member.name_he.clone()}</span>
            </div>
            {cells
                .into_iter()
                .map(|tasks| view! {
                    <div class="workload-cell">
                        {tasks.into_iter().map(|task| view! { <WorkloadBlock task=task /> }).collect_view()}
                    </div>
                })
                .collect_view()}
        </div>
    }
}

#[component]
pub fn WorkloadView() -> impl IntoView {
    let ctx = expect_context::<CalendarContext>();
    let store = use_calendar_store();

    let days = move || dates::week_days(store.anchor().get(), ctx.work_days);
    let rows = move || workload_rows(&store.workload().read(), &days());

    view! {
        <div class="workload-grid">
            <div class="workload-header">
                <div class="workload-member-header">"חבר צוות"</div>
                {move || days()
                    .into_iter()
                    .map(|day| {
                        let special = special_day_on(&store.special_days().read(), day).is_some();
                        view! {
                            <div class=if special { "workload-day-header special-day" } else { "workload-day-header" }>
                                <span class="day-name">{day_name(day)}</span>
                                <span class="day-number">{dates::to_display(day)}</span>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
            {move || rows().into_iter().map(|row| view! { <MemberRow row=row /> }).collect_view()}
        </div>
    }
}
