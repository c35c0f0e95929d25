//! Task Board Frontend Entry Point
//!
//! The board page is server-rendered and driven by `BoardController`; the
//! calendar page is a Leptos app mounted into `#calendar-root`.

mod api;
mod calendar;
mod config;
mod controller;
mod dates;
mod dom;
mod error;
mod filter;
mod logger;
mod models;
mod mutation;
mod persist;
mod poll;
mod refresh;
mod state;
mod view;

#[cfg(test)]
mod testing;

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use api::{BoardApi, FetchTransport};
use calendar::components::CalendarApp;
use config::BoardConfig;
use controller::BoardController;
use dom::{BrowserStorage, BrowserUrl, DomView};
use view::EventSink;

const CALENDAR_ROOT: &str = "calendar-root";

type BrowserBoard = BoardController<DomView, FetchTransport, BrowserStorage, BrowserUrl>;

fn start_board(document: web_sys::Document, config: BoardConfig) {
    let view = DomView::new(document, config.search_debounce_ms);
    let api = BoardApi::new(FetchTransport, config.api_base.clone());
    let board: Rc<BrowserBoard> = Rc::new(BoardController::new(view, api, BrowserStorage::open(), BrowserUrl, config));

    let weak = Rc::downgrade(&board);
    let sink: EventSink = Rc::new(move |event| {
        if let Some(board) = weak.upgrade() {
            spawn_local(async move { board.dispatch(event).await });
        }
    });
    board.set_sink(sink);

    spawn_local(async move {
        board.init().await;
        board.run_polling().await;
    });
}

fn main() {
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
    let config = BoardConfig::load();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    match document
        .get_element_by_id(CALENDAR_ROOT)
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
    {
        Some(root) => {
            log::info!(target: "calendar", "mounting calendar");
            leptos::mount::mount_to(root, move || view! { <CalendarApp config=config.clone() /> }).forget();
        }
        None => start_board(document, config),
    }
}
