//! Calendar Toolbar Component
//!
//! Week navigation, week/workload toggle and the team filter buttons.

use leptos::prelude::*;

use crate::api::encode_query_value;
use crate::calendar::context::CalendarContext;
use crate::calendar::store::{use_calendar_store, CalendarStateStoreFields};
use crate::calendar::{period_title, today};
use crate::dates;
use crate::state::{TeamFilter, ViewMode};

fn button_class(base: &'static str, active: bool) -> String {
    if active {
        format!("{} active", base)
    } else {
        base.to_string()
    }
}

#[component]
pub fn Toolbar() -> impl IntoView {
    let ctx = expect_context::<CalendarContext>();
    let store = use_calendar_store();

    let title = move || {
        let view = store.filter().read().view();
        period_title(store.anchor().get(), view, ctx.work_days)
    };

    let shift = move |weeks: i64| store.anchor().update(|a| *a = dates::shift_weeks(*a, weeks));

    // clicking the active team again clears it
    let select_team = move |clicked: TeamFilter| {
        let previous = store.filter().get_untracked().team().clone();
        let next = if previous == clicked { TeamFilter::All } else { clicked };
        ctx.persist_team(&previous, &next);
        store.filter().update(|f| f.set_team(next));
    };

    let is_view = move |view: ViewMode| store.filter().read().view() == view;
    let set_view = move |view: ViewMode| store.filter().update(|f| f.set_view(view));

    let board_link = move || match store.filter().read().team() {
        TeamFilter::Archive => "/?mode=archive".to_string(),
        TeamFilter::Team(key) => format!("/?team={}", encode_query_value(key)),
        TeamFilter::All => "/".to_string(),
    };

    view! {
        <div class="calendar-toolbar">
            <div class="calendar-nav">
                <button class="nav-btn" on:click=move |_| shift(-1)>"‹"</button>
                <button class="nav-btn today-btn" on:click=move |_| store.anchor().set(today())>"היום"</button>
                <button class="nav-btn" on:click=move |_| shift(1)>"›"</button>
                <h2 class="calendar-title">{title}</h2>
            </div>

            <div class="view-toggle">
                <button
                    class=move || button_class("view-btn", is_view(ViewMode::Week))
                    on:click=move |_| set_view(ViewMode::Week)
                >
                    "שבוע"
                </button>
                <button
                    class=move || button_class("view-btn", is_view(ViewMode::Workload))
                    on:click=move |_| set_view(ViewMode::Workload)
                >
                    "עומס עבודה"
                </button>
            </div>

            <div class="team-filter-buttons">
                <button
                    class=move || button_class("filter-team-btn", store.filter().read().team() == &TeamFilter::All)
                    on:click=move |_| select_team(TeamFilter::All)
                >
                    "הכל"
                </button>
                <For
                    each=move || store.teams().get()
                    key=|team| team.id
                    children=move |team| {
                        let filter = TeamFilter::Team(team.key());
                        let active = {
                            let filter = filter.clone();
                            move || store.filter().read().team() == &filter
                        };
                        view! {
                            <button
                                class=move || button_class("filter-team-btn", active())
                                on:click=move |_| select_team(filter.clone())
                            >
                                {team.name_he.clone()}
                            </button>
                        }
                    }
                />
            </div>

            <a class="back-to-board" href=board_link>"חזרה למשימות"</a>
        </div>
    }
}
