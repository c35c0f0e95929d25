//! Content Refresher
//!
//! Refetches the current page and splices its fresh server-rendered content
//! into the live document. Every request takes a ticket from a sequencer;
//! a response that arrives after a newer request was dispatched is dropped
//! instead of overwriting newer content.

use std::cell::Cell;

use crate::api::{BoardApi, Transport};
use crate::error::ApiError;
use crate::models::{Member, Team};
use crate::view::{BoardView, EventSink, SpliceOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

#[derive(Debug, Default)]
pub struct RefreshSequencer {
    issued: Cell<u64>,
    in_flight: Cell<u32>,
}

impl RefreshSequencer {
    pub fn begin(&self) -> RefreshTicket {
        let next = self.issued.get() + 1;
        self.issued.set(next);
        self.in_flight.set(self.in_flight.get() + 1);
        RefreshTicket(next)
    }

    /// True while no newer request has been dispatched
    pub fn is_latest(&self, ticket: RefreshTicket) -> bool {
        ticket.0 == self.issued.get()
    }

    pub fn finish(&self, _ticket: RefreshTicket) {
        self.in_flight.set(self.in_flight.get().saturating_sub(1));
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.get() > 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Applied { navbar_changed: bool },
    /// Superseded by a newer refresh before the response arrived
    Stale,
    MissingContainer,
    Failed(ApiError),
}

/// What a refresh needs besides the page itself
pub struct RefreshContext<'a> {
    pub href: &'a str,
    pub teams: &'a [Team],
    pub members: &'a [Member],
    pub sink: Option<&'a EventSink>,
}

#[derive(Debug, Default)]
pub struct Refresher {
    sequencer: RefreshSequencer,
}

impl Refresher {
    pub fn is_busy(&self) -> bool {
        self.sequencer.is_busy()
    }

    /// Fetch and splice. Re-filtering is left to the caller, which owns the
    /// filter state and the search results.
    pub async fn run<V, T>(&self, view: &V, api: &BoardApi<T>, ctx: RefreshContext<'_>) -> RefreshOutcome
    where
        V: BoardView + ?Sized,
        T: Transport,
    {
        let ticket = self.sequencer.begin();
        let fetched = api.page(ctx.href).await;
        self.sequencer.finish(ticket);

        let html = match fetched {
            Ok(html) => html,
            Err(e) => {
                log::error!(target: "refresh", "error refreshing content: {}", e);
                return RefreshOutcome::Failed(e);
            }
        };
        if !self.sequencer.is_latest(ticket) {
            log::debug!(target: "refresh", "dropping stale refresh {:?}", ticket);
            return RefreshOutcome::Stale;
        }

        let focus = view.capture_focus();
        let navbar_changed = match view.splice(&html) {
            SpliceOutcome::Replaced { navbar_changed } => navbar_changed,
            SpliceOutcome::MissingContainer => {
                log::warn!(target: "refresh", "fetched page has no main container");
                return RefreshOutcome::MissingContainer;
            }
        };
        if let Some(focus) = &focus {
            view.restore_focus(focus);
        }
        view.populate_pickers(ctx.teams, ctx.members);
        if let Some(sink) = ctx.sink {
            view.bind(sink);
        }
        RefreshOutcome::Applied { navbar_changed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::testing::{FakeTransport, FakeView};
    use crate::view::FocusSnapshot;

    fn ctx(href: &str) -> RefreshContext<'_> {
        RefreshContext {
            href,
            teams: &[],
            members: &[],
            sink: None,
        }
    }

    #[test]
    fn test_sequencer_marks_older_tickets_stale() {
        let seq = RefreshSequencer::default();
        let first = seq.begin();
        let second = seq.begin();
        assert!(seq.is_busy());
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
        seq.finish(first);
        seq.finish(second);
        assert!(!seq.is_busy());
    }

    #[tokio::test]
    async fn test_refresh_restores_search_focus() {
        let fake = FakeTransport::default();
        fake.respond(Method::Get, "/?q=abc", 200, "<page/>");
        let api = BoardApi::new(fake, "");
        let view = FakeView::default();
        let focus = FocusSnapshot {
            element_id: "searchBox".into(),
            selection: Some((1, 3)),
        };
        *view.focus.borrow_mut() = Some(focus.clone());

        let outcome = Refresher::default().run(&view, &api, ctx("/?q=abc")).await;
        assert_eq!(outcome, RefreshOutcome::Applied { navbar_changed: false });
        assert_eq!(view.splices.get(), 1);
        assert_eq!(view.restored.borrow().as_slice(), &[focus]);
        assert_eq!(view.populates.get(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_refreshes_apply_only_latest() {
        let fake = FakeTransport::default();
        fake.respond(Method::Get, "/", 200, "<page/>");
        let api = BoardApi::new(fake, "");
        let view = FakeView::default();
        let refresher = Refresher::default();

        let (first, second) = tokio::join!(
            refresher.run(&view, &api, ctx("/")),
            refresher.run(&view, &api, ctx("/")),
        );
        assert_eq!(first, RefreshOutcome::Stale);
        assert_eq!(second, RefreshOutcome::Applied { navbar_changed: false });
        assert_eq!(view.splices.get(), 1);
        assert!(!refresher.is_busy());
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_dom_alone() {
        let fake = FakeTransport::default();
        fake.fail(Method::Get, "/", "offline");
        let api = BoardApi::new(fake, "");
        let view = FakeView::default();
        let outcome = Refresher::default().run(&view, &api, ctx("/")).await;
        assert!(matches!(outcome, RefreshOutcome::Failed(ApiError::Transport(_))));
        assert_eq!(view.splices.get(), 0);
    }

    #[tokio::test]
    async fn test_missing_container_skips_rebinding() {
        let fake = FakeTransport::default();
        fake.respond(Method::Get, "/", 200, "<broken/>");
        let api = BoardApi::new(fake, "");
        let view = FakeView::default();
        view.missing_container.set(true);
        let outcome = Refresher::default().run(&view, &api, ctx("/")).await;
        assert_eq!(outcome, RefreshOutcome::MissingContainer);
        assert_eq!(view.populates.get(), 0);
    }
}
