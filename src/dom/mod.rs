//! Browser Board View
//!
//! `BoardView` over the server-rendered page. Every lookup tolerates missing
//! elements: a page without a filter bar or modal simply skips that part.

mod forms;
mod listeners;
mod splice;
mod storage;

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlSelectElement};

use crate::filter::{BoardSnapshot, MemberButton, TaskCard, TeamButton, VisibilityPlan};
use crate::models::{Member, TaskId, Team};
use crate::view::{BoardView, EventSink, FocusSnapshot, FormKind, SpliceOutcome, TaskForm};

pub use storage::{BrowserStorage, BrowserUrl};

const TASK: &str = ".task-item";
const PROJECT: &str = ".project-card";
const MEMBER_BUTTON: &str = ".filter-avatar-btn";
const TEAM_BUTTON: &str = ".filter-team-btn";

const FILTERED_HIDDEN: &str = "filtered-hidden";
const SEARCH_HIDDEN: &str = "search-hidden";
const ACTIVE: &str = "active";

const STATUS_SELECT: &str = "filterStatus";
const PRIORITY_SELECT: &str = "filterPriority";

pub(crate) fn query(doc: &Document, selector: &str) -> Option<Element> {
    doc.query_selector(selector).ok().flatten()
}

pub(crate) fn by_id<T: JsCast>(doc: &Document, id: &str) -> Option<T> {
    doc.get_element_by_id(id)?.dyn_into::<T>().ok()
}

fn collect(list: Result<web_sys::NodeList, wasm_bindgen::JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub(crate) fn query_all(doc: &Document, selector: &str) -> Vec<Element> {
    collect(doc.query_selector_all(selector))
}

pub(crate) fn query_all_in(root: &Element, selector: &str) -> Vec<Element> {
    collect(root.query_selector_all(selector))
}

pub(crate) fn data(el: &Element, name: &str) -> Option<String> {
    el.get_attribute(&format!("data-{}", name))
        .filter(|v| !v.trim().is_empty())
}

fn set_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

pub(crate) fn set_display(el: &Element, value: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property("display", value);
    }
}

fn status_of(task: &Element) -> String {
    task.query_selector(".status-badge")
        .ok()
        .flatten()
        .and_then(|badge| {
            badge
                .class_name()
                .split_whitespace()
                .find(|c| c.starts_with("status-") && *c != "status-badge")
                .map(String::from)
        })
        .unwrap_or_default()
}

fn read_card(el: &Element, project: Option<usize>) -> Option<TaskCard> {
    let id: TaskId = data(el, "id")?.parse().ok()?;
    let members = query_all_in(el, ".avatar[data-member-name]")
        .iter()
        .filter_map(|a| data(a, "member-name"))
        .collect();
    Some(TaskCard {
        id,
        project,
        team: data(el, "team-id"),
        members,
        status: status_of(el),
        priority: data(el, "priority").unwrap_or_else(|| "none".to_string()),
        search_hidden: el.class_list().contains(SEARCH_HIDDEN),
    })
}

/// Task elements paired with what was read from them, in snapshot order:
/// grouped tasks project by project, then ungrouped ones
fn task_elements(doc: &Document) -> Vec<(Element, TaskCard)> {
    let mut out = Vec::new();
    for (index, project) in query_all(doc, PROJECT).iter().enumerate() {
        for el in query_all_in(project, TASK) {
            if let Some(card) = read_card(&el, Some(index)) {
                out.push((el, card));
            }
        }
    }
    for el in query_all(doc, TASK) {
        if el.closest(PROJECT).ok().flatten().is_some() {
            continue;
        }
        if let Some(card) = read_card(&el, None) {
            out.push((el, card));
        }
    }
    out
}

pub struct DomView {
    document: Document,
    search_debounce_ms: u32,
    search_timer: Rc<RefCell<Option<Timeout>>>,
}

impl DomView {
    pub fn new(document: Document, search_debounce_ms: u32) -> Self {
        Self {
            document,
            search_debounce_ms,
            search_timer: Rc::new(RefCell::new(None)),
        }
    }

    fn window() -> Option<web_sys::Window> {
        web_sys::window()
    }
}

impl BoardView for DomView {
    fn snapshot(&self) -> BoardSnapshot {
        let doc = &self.document;
        let tasks = task_elements(doc).into_iter().map(|(_, card)| card).collect();
        let member_buttons = query_all(doc, MEMBER_BUTTON)
            .iter()
            .map(|btn| MemberButton {
                member: data(btn, "member").unwrap_or_default(),
                team: data(btn, "team-id"),
            })
            .collect();
        let team_buttons = query_all(doc, TEAM_BUTTON)
            .iter()
            .map(|btn| TeamButton {
                team: data(btn, "team-id"),
                archive: data(btn, "mode").as_deref() == Some("archive"),
            })
            .collect();
        BoardSnapshot {
            tasks,
            project_count: query_all(doc, PROJECT).len(),
            member_buttons,
            team_buttons,
        }
    }

    fn apply_plan(&self, plan: &VisibilityPlan) {
        let doc = &self.document;
        for ((el, _), visible) in task_elements(doc).iter().zip(&plan.task_visible) {
            set_class(el, FILTERED_HIDDEN, !visible);
        }
        for (el, visible) in query_all(doc, PROJECT).iter().zip(&plan.project_visible) {
            set_class(el, FILTERED_HIDDEN, !visible);
        }
        let member_buttons = query_all(doc, MEMBER_BUTTON);
        for (i, btn) in member_buttons.iter().enumerate() {
            let shown = plan.member_button_shown.get(i).copied().unwrap_or(true);
            set_display(btn, if shown { "" } else { "none" });
            set_class(btn, ACTIVE, plan.member_button_active.get(i).copied().unwrap_or(false));
        }
        for (btn, active) in query_all(doc, TEAM_BUTTON).iter().zip(&plan.team_button_active) {
            set_class(btn, ACTIVE, *active);
        }
        // a splice brings back server-rendered dropdowns showing "all"
        for (id, value) in [(STATUS_SELECT, &plan.status_value), (PRIORITY_SELECT, &plan.priority_value)] {
            if let Some(select) = by_id::<HtmlSelectElement>(doc, id) {
                if select.value() != *value {
                    select.set_value(value);
                }
            }
        }
    }

    fn set_search_hidden(&self, flags: &[bool]) {
        for ((el, _), hidden) in task_elements(&self.document).iter().zip(flags) {
            set_class(el, SEARCH_HIDDEN, *hidden);
        }
    }

    fn capture_focus(&self) -> Option<FocusSnapshot> {
        splice::capture_focus(&self.document)
    }

    fn restore_focus(&self, focus: &FocusSnapshot) {
        splice::restore_focus(&self.document, focus);
    }

    fn splice(&self, html: &str) -> SpliceOutcome {
        splice::splice_page(&self.document, html)
    }

    fn populate_pickers(&self, teams: &[Team], members: &[Member]) {
        forms::populate_team_selects(&self.document, teams);
        forms::populate_member_checkboxes(&self.document, members);
    }

    fn bind(&self, sink: &EventSink) {
        listeners::bind_all(&self.document, sink, self.search_debounce_ms, &self.search_timer);
    }

    fn open_editor(&self, task: TaskId) {
        forms::open_editor(&self.document, task);
    }

    fn open_creator(&self, project: Option<&str>, team: Option<&str>) {
        forms::open_creator(&self.document, project, team);
    }

    fn read_form(&self, kind: FormKind) -> Option<TaskForm> {
        forms::read_form(&self.document, kind)
    }

    fn close_modals(&self) {
        forms::close_modals(&self.document);
    }

    fn alert(&self, message: &str) {
        if let Some(win) = Self::window() {
            let _ = win.alert_with_message(message);
        }
    }

    fn confirm(&self, message: &str) -> bool {
        Self::window()
            .and_then(|win| win.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}
