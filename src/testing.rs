//! Test Doubles
//!
//! Scripted transport and an in-memory board view shared by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;

use crate::api::{HttpResponse, Method, Transport};
use crate::error::{ApiError, ApiResult};
use crate::filter::{BoardSnapshot, VisibilityPlan};
use crate::models::{Member, TaskId, Team};
use crate::view::{BoardView, EventSink, FocusSnapshot, FormKind, SpliceOutcome, TaskForm};

type Route = (Method, String, ApiResult<HttpResponse>);
pub type Call = (Method, String, Option<String>);

#[derive(Default)]
struct FakeRoutes {
    routes: Vec<Route>,
    calls: Vec<Call>,
}

/// Transport answering from a route table. A route registered without a
/// query string matches any query on the same path.
#[derive(Clone, Default)]
pub struct FakeTransport {
    inner: Rc<RefCell<FakeRoutes>>,
}

impl FakeTransport {
    fn insert(&self, method: Method, url: &str, result: ApiResult<HttpResponse>) {
        let mut inner = self.inner.borrow_mut();
        inner.routes.retain(|(m, u, _)| !(*m == method && u == url));
        inner.routes.push((method, url.to_string(), result));
    }

    pub fn respond(&self, method: Method, url: &str, status: u16, body: &str) {
        self.insert(method, url, Ok(HttpResponse { status, body: body.to_string() }));
    }

    pub fn fail(&self, method: Method, url: &str, message: &str) {
        self.insert(method, url, Err(ApiError::Transport(message.to_string())));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.borrow().calls.clone()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|(m, u, _)| *m == method && u.split('?').next() == Some(path))
            .count()
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn send(&self, method: Method, url: &str, body: Option<String>) -> ApiResult<HttpResponse> {
        self.inner.borrow_mut().calls.push((method, url.to_string(), body));
        // give concurrently polled futures a chance to interleave
        tokio::task::yield_now().await;

        let inner = self.inner.borrow();
        let path = url.split('?').next().unwrap_or(url);
        let exact = inner.routes.iter().find(|(m, u, _)| *m == method && u == url);
        let by_path = || {
            inner
                .routes
                .iter()
                .find(|(m, u, _)| *m == method && !u.contains('?') && u == path)
        };
        match exact.or_else(by_path) {
            Some((_, _, result)) => result.clone(),
            None => Err(ApiError::Transport(format!("no route for {} {}", method.as_str(), url))),
        }
    }
}

/// In-memory page. `pages` maps fetched HTML to the snapshot the page shows
/// after that HTML is spliced in.
#[derive(Default)]
pub struct FakeView {
    pub snapshot: RefCell<BoardSnapshot>,
    pub pages: RefCell<HashMap<String, BoardSnapshot>>,
    pub plans: RefCell<Vec<VisibilityPlan>>,
    pub focus: RefCell<Option<FocusSnapshot>>,
    pub restored: RefCell<Vec<FocusSnapshot>>,
    pub missing_container: Cell<bool>,
    pub splices: Cell<usize>,
    pub populates: Cell<usize>,
    pub binds: Cell<usize>,
    pub edit_form: RefCell<Option<TaskForm>>,
    pub create_form: RefCell<Option<TaskForm>>,
    pub opened_editor: RefCell<Option<TaskId>>,
    pub opened_creator: RefCell<Option<(Option<String>, Option<String>)>>,
    pub closed: Cell<usize>,
    pub alerts: RefCell<Vec<String>>,
    pub confirm_answer: Cell<bool>,
}

impl FakeView {
    pub fn with_snapshot(snapshot: BoardSnapshot) -> Self {
        let view = Self::default();
        *view.snapshot.borrow_mut() = snapshot;
        view.confirm_answer.set(true);
        view
    }

    pub fn last_plan(&self) -> Option<VisibilityPlan> {
        self.plans.borrow().last().cloned()
    }
}

impl BoardView for FakeView {
    fn snapshot(&self) -> BoardSnapshot {
        self.snapshot.borrow().clone()
    }

    fn apply_plan(&self, plan: &VisibilityPlan) {
        self.plans.borrow_mut().push(plan.clone());
    }

    fn set_search_hidden(&self, flags: &[bool]) {
        let mut snapshot = self.snapshot.borrow_mut();
        for (card, hidden) in snapshot.tasks.iter_mut().zip(flags) {
            card.search_hidden = *hidden;
        }
    }

    fn capture_focus(&self) -> Option<FocusSnapshot> {
        self.focus.borrow().clone()
    }

    fn restore_focus(&self, focus: &FocusSnapshot) {
        self.restored.borrow_mut().push(focus.clone());
    }

    fn splice(&self, html: &str) -> SpliceOutcome {
        if self.missing_container.get() {
            return SpliceOutcome::MissingContainer;
        }
        self.splices.set(self.splices.get() + 1);
        if let Some(next) = self.pages.borrow().get(html) {
            *self.snapshot.borrow_mut() = next.clone();
        }
        SpliceOutcome::Replaced { navbar_changed: false }
    }

    fn populate_pickers(&self, _teams: &[Team], _members: &[Member]) {
        self.populates.set(self.populates.get() + 1);
    }

    fn bind(&self, _sink: &EventSink) {
        self.binds.set(self.binds.get() + 1);
    }

    fn open_editor(&self, task: TaskId) {
        *self.opened_editor.borrow_mut() = Some(task);
    }

    fn open_creator(&self, project: Option<&str>, team: Option<&str>) {
        *self.opened_creator.borrow_mut() = Some((project.map(String::from), team.map(String::from)));
    }

    fn read_form(&self, kind: FormKind) -> Option<TaskForm> {
        match kind {
            FormKind::Edit => self.edit_form.borrow().clone(),
            FormKind::Create => self.create_form.borrow().clone(),
        }
    }

    fn close_modals(&self) {
        self.closed.set(self.closed.get() + 1);
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn confirm(&self, _message: &str) -> bool {
        self.confirm_answer.get()
    }
}
