//! Event listener binding
//!
//! Binding is idempotent: every element gets a `data-board-bound` marker the
//! first time, and marked elements are skipped, so rebinding after a splice
//! only reaches the fresh elements.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlInputElement, HtmlSelectElement};

use super::{data, query_all, set_display};
use crate::models::TaskId;
use crate::view::{BoardEvent, EventSink};

const BOUND_MARKER: &str = "data-board-bound";

/// Something that can carry the bound marker
trait BindMark {
    fn is_marked(&self) -> bool;
    fn mark(&self);
}

impl BindMark for Element {
    fn is_marked(&self) -> bool {
        self.has_attribute(BOUND_MARKER)
    }

    fn mark(&self) {
        let _ = self.set_attribute(BOUND_MARKER, "");
    }
}

/// True the first time it is called for `el`
fn claim<M: BindMark>(el: &M) -> bool {
    if el.is_marked() {
        return false;
    }
    el.mark();
    true
}

/// The elements not bound yet, marking them on the way
fn claim_fresh<M: BindMark>(elements: Vec<M>) -> Vec<M> {
    elements.into_iter().filter(|el| claim(el)).collect()
}

fn listen<F>(el: &Element, event: &str, handler: F)
where
    F: FnMut(Event) + 'static,
{
    let cb = Closure::<dyn FnMut(Event)>::new(handler);
    let _ = el.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
    cb.forget();
}

fn on_each<F>(doc: &Document, selector: &str, event: &str, make: F)
where
    F: Fn(&Element) -> Option<Box<dyn FnMut(Event)>>,
{
    for el in claim_fresh(query_all(doc, selector)) {
        if let Some(handler) = make(&el) {
            listen(&el, event, handler);
        }
    }
}

/// Click on a single element by id that emits a fixed event
fn on_click_emit(doc: &Document, id: &str, sink: &EventSink, event: BoardEvent) {
    on_each(doc, &format!("#{}", id), "click", |_| {
        let sink = sink.clone();
        let event = event.clone();
        Some(Box::new(move |_: Event| sink(event.clone())))
    });
}

fn bind_filters(doc: &Document, sink: &EventSink) {
    on_each(doc, ".filter-team-btn", "click", |btn| {
        let sink = sink.clone();
        let event = if data(btn, "mode").as_deref() == Some("archive") {
            BoardEvent::ArchiveClicked
        } else {
            BoardEvent::TeamClicked(data(btn, "team-id")?)
        };
        Some(Box::new(move |_: Event| sink(event.clone())))
    });

    on_each(doc, ".filter-avatar-btn", "click", |btn| {
        let sink = sink.clone();
        let member = data(btn, "member")?;
        Some(Box::new(move |_: Event| sink(BoardEvent::MemberClicked(member.clone()))))
    });
    on_click_emit(doc, "resetMemberFiltersBtn", sink, BoardEvent::ResetMember);

    for (id, status) in [("filterStatus", true), ("filterPriority", false)] {
        on_each(doc, &format!("#{}", id), "change", |el| {
            let sink = sink.clone();
            let select = el.clone().dyn_into::<HtmlSelectElement>().ok()?;
            Some(Box::new(move |_: Event| {
                let value = select.value();
                sink(if status {
                    BoardEvent::StatusChanged(value)
                } else {
                    BoardEvent::PriorityChanged(value)
                })
            }))
        });
    }

    on_click_emit(doc, "clearFiltersBtn", sink, BoardEvent::ClearFilters);
}

fn bind_search(doc: &Document, sink: &EventSink, debounce_ms: u32, timer: &Rc<RefCell<Option<Timeout>>>) {
    on_each(doc, "#searchBox", "input", |el| {
        let input = el.clone().dyn_into::<HtmlInputElement>().ok()?;
        let sink = sink.clone();
        let timer = timer.clone();
        let doc = doc.clone();
        Some(Box::new(move |_: Event| {
            let query = input.value().trim().to_string();
            if let Some(clear) = doc.get_element_by_id("clearSearch") {
                set_display(&clear, if query.is_empty() { "none" } else { "block" });
            }
            let sink = sink.clone();
            // replacing the pending timeout cancels it
            *timer.borrow_mut() = Some(Timeout::new(debounce_ms, move || {
                sink(BoardEvent::SearchInput(query))
            }));
        }))
    });

    on_each(doc, "#clearSearch", "click", |el| {
        let sink = sink.clone();
        let timer = timer.clone();
        let doc = doc.clone();
        let button = el.clone();
        Some(Box::new(move |_: Event| {
            timer.borrow_mut().take();
            if let Some(input) = super::forms::search_box(&doc) {
                input.set_value("");
            }
            set_display(&button, "none");
            sink(BoardEvent::SearchInput(String::new()))
        }))
    });
}

fn bind_tasks(doc: &Document, sink: &EventSink) {
    on_each(doc, ".task-item", "click", |item| {
        let sink = sink.clone();
        let id: TaskId = data(item, "id")?.parse().ok()?;
        Some(Box::new(move |ev: Event| {
            let inner_control = ev
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|t| t.closest("button, input, a").ok().flatten())
                .is_some();
            if !inner_control {
                sink(BoardEvent::EditTask(id))
            }
        }))
    });

    on_each(doc, ".add-task-project-btn", "click", |btn| {
        let sink = sink.clone();
        let project = data(btn, "project");
        let team = btn
            .closest(".project-card")
            .ok()
            .flatten()
            .and_then(|card| data(&card, "team-id"));
        Some(Box::new(move |ev: Event| {
            ev.stop_propagation();
            sink(BoardEvent::OpenCreate {
                project: project.clone(),
                team: team.clone(),
            })
        }))
    });

    on_click_emit(
        doc,
        "addTaskBtn",
        sink,
        BoardEvent::OpenCreate {
            project: None,
            team: None,
        },
    );
}

fn bind_modals(doc: &Document, sink: &EventSink) {
    on_click_emit(doc, "saveBtn", sink, BoardEvent::SaveTask);
    on_click_emit(doc, "createSaveBtn", sink, BoardEvent::CreateTask);
    on_click_emit(doc, "deleteBtn", sink, BoardEvent::DeleteTask);

    on_each(doc, ".close-modal, .close-modal-create", "click", |_| {
        let sink = sink.clone();
        Some(Box::new(move |_: Event| sink(BoardEvent::CloseModals)))
    });

    // a click on the backdrop itself, not on the dialog inside it
    on_each(doc, "#taskModal, #createTaskModal", "click", |modal| {
        let sink = sink.clone();
        let modal_id = modal.id();
        Some(Box::new(move |ev: Event| {
            let on_backdrop = ev
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .is_some_and(|t| t.id() == modal_id);
            if on_backdrop {
                sink(BoardEvent::CloseModals)
            }
        }))
    });
}

pub fn bind_all(doc: &Document, sink: &EventSink, debounce_ms: u32, timer: &Rc<RefCell<Option<Timeout>>>) {
    bind_filters(doc, sink);
    bind_search(doc, sink, debounce_ms, timer);
    bind_tasks(doc, sink);
    bind_modals(doc, sink);
}
