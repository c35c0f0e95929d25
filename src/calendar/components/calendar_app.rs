//! Calendar App
//!
//! Root of the calendar page: provides the store, context and drag state,
//! and reloads the displayed period whenever it changes.

use board_dragdrop::{bind_global_handlers, create_dnd_signals};
use chrono::NaiveDate;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use super::{alert, ScheduleEditor, SpecialDaysPanel, Toolbar, WeekView, WorkloadView};
use crate::calendar::context::CalendarContext;
use crate::calendar::store::{CalendarState, CalendarStateStoreFields, CalendarStore};
use crate::calendar::{all_tasks, drop_patch, fetch_range, today};
use crate::config::BoardConfig;
use crate::models::TaskId;
use crate::mutation::{failure_message, TaskMutations, MSG_SCHEDULE_FAILED};
use crate::state::{FilterState, ViewMode};

/// Fetch the week or workload for `anchor` and `filter`. A response that
/// arrives after the user moved on is dropped.
async fn load_period(ctx: CalendarContext, store: CalendarStore, anchor: NaiveDate, filter: FilterState) {
    let api = ctx.api();
    let view = filter.view();
    let (start, end) = fetch_range(anchor, view, ctx.work_days);
    let team = filter.team().team().map(String::from);
    let is_current = || store.anchor().get_untracked() == anchor && store.filter().get_untracked() == filter;

    match view {
        ViewMode::Workload => match api.workload(start, end, team.as_deref()).await {
            Ok(data) if is_current() => store.workload().set(data.workload),
            Ok(_) => log::debug!(target: "calendar", "dropping stale workload for {}", start),
            Err(e) => log::error!(target: "calendar", "failed to load workload: {}", e),
        },
        _ => match api.week(start, end, team.as_deref()).await {
            Ok(data) if is_current() => store.tasks().set(data.tasks),
            Ok(_) => log::debug!(target: "calendar", "dropping stale week for {}", start),
            Err(e) => log::error!(target: "calendar", "failed to load week: {}", e),
        },
    }
}

async fn load_teams(ctx: CalendarContext, store: CalendarStore) {
    let api = ctx.api();
    match api.teams(true).await {
        Ok(teams) => store.teams().set(teams),
        Err(e) => log::error!(target: "calendar", "failed to load teams: {}", e),
    }
}

/// Drop of a task card on a day column
fn reschedule_on_drop(ctx: CalendarContext, store: CalendarStore, task: TaskId, day: NaiveDate) {
    let tasks = all_tasks(&store.tasks().get_untracked(), &store.workload().get_untracked());
    let Some(patch) = drop_patch(&tasks, task, day) else {
        return;
    };
    spawn_local(async move {
        let api = ctx.api();
        match TaskMutations::new(&api).reschedule(task, &patch).await {
            Ok(()) => ctx.reload(),
            Err(e) => {
                log::error!(target: "calendar", "moving task {} failed: {}", task, e);
                alert(&failure_message(MSG_SCHEDULE_FAILED, &e));
            }
        }
    });
}

#[component]
pub fn CalendarApp(config: BoardConfig) -> impl IntoView {
    let (reload_trigger, set_reload_trigger) = signal(0u32);
    let ctx = CalendarContext::new(set_reload_trigger, &config);
    provide_context(ctx);

    let mut initial = CalendarState::new(today());
    initial.filter.set_team(ctx.restore_team());
    let store = Store::new(initial);
    provide_context(store);

    // one document-level binding for the whole page; the views only read it
    let dnd = create_dnd_signals::<NaiveDate>();
    bind_global_handlers(dnd, move |task, day| reschedule_on_drop(ctx, store, task, day));
    provide_context(dnd);

    spawn_local(load_teams(ctx, store));

    Effect::new(move |_| {
        let _ = reload_trigger.get();
        spawn_local(async move {
            match ctx.api().special_days().await {
                Ok(days) => store.special_days().set(days),
                Err(e) => log::error!(target: "calendar", "failed to load special days: {}", e),
            }
        });
    });

    Effect::new(move |_| {
        let trigger = reload_trigger.get();
        let anchor = store.anchor().get();
        let filter = store.filter().get();
        log::debug!(target: "calendar", "loading {} around {}, trigger={}", filter.view().as_str(), anchor, trigger);
        spawn_local(load_period(ctx, store, anchor, filter));
    });

    let view_mode = Memo::new(move |_| store.filter().read().view());

    view! {
        <div class="calendar-app">
            <Toolbar />
            {move || match view_mode.get() {
                ViewMode::Workload => view! { <WorkloadView /> }.into_any(),
                _ => view! { <WeekView /> }.into_any(),
            }}
            <ScheduleEditor />
            <SpecialDaysPanel />
        </div>
    }
}
