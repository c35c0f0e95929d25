//! Board DragDrop Utilities
//!
//! Mouse-driven drag-and-drop of task cards onto drop targets (calendar
//! days, member rows). A movement threshold tells a click from a drag, so
//! cards stay clickable.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Id of the dragged card
pub type ItemId = u32;

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// Delay before `drag_just_ended` resets, long enough to swallow the click
/// that follows a mouseup
const JUST_ENDED_RESET_MS: i32 = 100;

/// True once the pointer moved far enough from `start` to count as a drag
pub fn exceeds_threshold(start: (i32, i32), now: (i32, i32)) -> bool {
    (now.0 - start.0).abs() > DRAG_THRESHOLD_PX || (now.1 - start.1).abs() > DRAG_THRESHOLD_PX
}

/// DnD state signals, generic over what a card can be dropped on
#[derive(Clone, Copy)]
pub struct DndSignals<T: Copy + Send + Sync + 'static> {
    pub dragging_id_read: ReadSignal<Option<ItemId>>,
    pub dragging_id_write: WriteSignal<Option<ItemId>>,
    pub drop_target_read: ReadSignal<Option<T>>,
    pub drop_target_write: WriteSignal<Option<T>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Mousedown seen, threshold not crossed yet
    pub pending_id_read: ReadSignal<Option<ItemId>>,
    pub pending_id_write: WriteSignal<Option<ItemId>>,
    pub start_read: ReadSignal<(i32, i32)>,
    pub start_write: WriteSignal<(i32, i32)>,
}

pub fn create_dnd_signals<T: Copy + Send + Sync + 'static>() -> DndSignals<T> {
    let (dragging_id_read, dragging_id_write) = signal(None::<ItemId>);
    let (drop_target_read, drop_target_write) = signal(None::<T>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_id_read, pending_id_write) = signal(None::<ItemId>);
    let (start_read, start_write) = signal((0i32, 0i32));
    DndSignals {
        dragging_id_read,
        dragging_id_write,
        drop_target_read,
        drop_target_write,
        drag_just_ended_read,
        drag_just_ended_write,
        pending_id_read,
        pending_id_write,
        start_read,
        start_write,
    }
}

impl<T: Copy + Send + Sync + 'static> DndSignals<T> {
    pub fn is_dragging(&self, item: ItemId) -> bool {
        self.dragging_id_read.get() == Some(item)
    }

    pub fn is_target(&self, target: T) -> bool
    where
        T: PartialEq,
    {
        self.drop_target_read.get() == Some(target)
    }
}

pub fn end_drag<T: Copy + Send + Sync + 'static>(dnd: &DndSignals<T>) {
    dnd.dragging_id_write.set(None);
    dnd.drop_target_write.set(None);
    dnd.pending_id_write.set(None);
    dnd.drag_just_ended_write.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        let cb = Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            JUST_ENDED_RESET_MS,
        );
        cb.forget();
    }
}

/// Mousedown on a draggable card: record a pending drag and its origin
pub fn make_on_mousedown<T: Copy + Send + Sync + 'static>(
    dnd: DndSignals<T>,
    item_id: ItemId,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // inputs and buttons inside a card keep their own behavior
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some()
                || target.dyn_ref::<web_sys::HtmlButtonElement>().is_some()
            {
                return;
            }
        }
        dnd.pending_id_write.set(Some(item_id));
        dnd.start_write.set((ev.client_x(), ev.client_y()));
    }
}

/// Document mousemove: promote a pending drag once past the threshold
fn bind_global_mousemove<T: Copy + Send + Sync + 'static>(dnd: DndSignals<T>) {
    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let pending = dnd.pending_id_read.get_untracked();
        if pending.is_none() || dnd.dragging_id_read.get_untracked().is_some() {
            return;
        }
        if exceeds_threshold(dnd.start_read.get_untracked(), (ev.client_x(), ev.client_y())) {
            dnd.dragging_id_write.set(pending);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
    }
    on_mousemove.forget();
}

/// Mouseenter on a drop target
pub fn make_on_target_mouseenter<T: Copy + Send + Sync + 'static>(
    dnd: DndSignals<T>,
    target: T,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id_read.get_untracked().is_some() {
            dnd.drop_target_write.set(Some(target));
        }
    }
}

pub fn make_on_mouseleave<T: Copy + Send + Sync + 'static>(
    dnd: DndSignals<T>,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id_read.get_untracked().is_some() {
            dnd.drop_target_write.set(None);
        }
    }
}

/// Bind document mouseup (drop) and mousemove (drag start). `on_drop` only
/// fires for a real drag that ended over a target.
pub fn bind_global_handlers<T, F>(dnd: DndSignals<T>, on_drop: F)
where
    T: Copy + Send + Sync + 'static,
    F: Fn(ItemId, T) + 'static,
{
    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let dragging_id = dnd.dragging_id_read.get_untracked();
        let drop_target = dnd.drop_target_read.get_untracked();
        end_drag(&dnd);
        if let (Some(dragged), Some(target)) = (dragging_id, drop_target) {
            on_drop(dragged, target);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
    }
    on_mouseup.forget();

    bind_global_mousemove(dnd);
}
