//! Board Controller
//!
//! Owns the filter state and wires it to the page, the server and the
//! persisted URL/storage state. Page listeners deliver `BoardEvent`s to
//! `dispatch`; the polling loop calls `poll_tick`.

use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::api::{BoardApi, Transport};
use crate::config::BoardConfig;
use crate::error::{ApiError, ApiResult};
use crate::filter::{self, VisibilityPlan};
use crate::models::{Member, Team, TaskId};
use crate::mutation::{
    failure_message, TaskMutations, MSG_CONFIRM_DELETE, MSG_CREATE_FAILED, MSG_DELETE_FAILED,
    MSG_SAVE_FAILED,
};
use crate::persist::{
    clear_team_filter, persist_search, persist_team_filter, resolve_on_load, KeyValueStore,
    UrlState,
};
use crate::poll::{self, PollMonitor, TickOutcome};
use crate::refresh::{RefreshContext, RefreshOutcome, Refresher};
use crate::state::{FieldFilter, FilterState, TeamFilter};
use crate::view::{BoardEvent, BoardView, EventSink, FormKind};

/// Data loaded once per page plus per-interaction bookkeeping
#[derive(Debug, Default)]
struct Session {
    teams: Vec<Team>,
    members: Vec<Member>,
    /// Task open in the edit modal
    current_task: Option<TaskId>,
    /// `None` while no search is active
    search_matches: Option<BTreeSet<TaskId>>,
    search_generation: u64,
}

pub struct BoardController<V, T, S, U> {
    view: V,
    api: BoardApi<T>,
    store: RefCell<S>,
    url: RefCell<U>,
    config: BoardConfig,
    state: RefCell<FilterState>,
    session: RefCell<Session>,
    refresher: Refresher,
    poll: PollMonitor,
    sink: RefCell<Option<EventSink>>,
}

impl<V, T, S, U> BoardController<V, T, S, U>
where
    V: BoardView,
    T: Transport,
    S: KeyValueStore,
    U: UrlState,
{
    pub fn new(view: V, api: BoardApi<T>, store: S, url: U, config: BoardConfig) -> Self {
        Self {
            view,
            api,
            store: RefCell::new(store),
            url: RefCell::new(url),
            config,
            state: RefCell::new(FilterState::for_board()),
            session: RefCell::new(Session::default()),
            refresher: Refresher::default(),
            poll: PollMonitor::default(),
            sink: RefCell::new(None),
        }
    }

    #[cfg(test)]
    pub fn view(&self) -> &V {
        &self.view
    }

    #[cfg(test)]
    pub fn state(&self) -> FilterState {
        self.state.borrow().clone()
    }

    /// Where listeners bound from now on deliver their events
    pub fn set_sink(&self, sink: EventSink) {
        *self.sink.borrow_mut() = Some(sink);
    }

    /// Page load: restore persisted filters, load pickers, bind listeners and
    /// filter the server-rendered content
    pub async fn init(&self) {
        let resolution = {
            let mut url = self.url.borrow_mut();
            let store = self.store.borrow();
            resolve_on_load(&mut *url, &*store, &self.config.storage_key)
        };
        log::info!(
            target: "board",
            "starting with team filter {:?}, query {:?}",
            resolution.team,
            resolution.search_query
        );
        {
            let mut state = self.state.borrow_mut();
            state.set_team(resolution.team.clone());
            state.set_search_query(resolution.search_query.clone());
        }

        self.poll.prime(&self.api).await;
        self.load_catalog().await;
        self.populate_and_bind();

        if resolution.needs_refresh {
            self.refresh().await;
            return;
        }
        if !resolution.search_query.is_empty() {
            self.run_search().await;
        }
        self.apply_filters();
    }

    async fn load_catalog(&self) {
        let teams = self.api.teams(true).await;
        let members = self.api.members().await;
        let mut session = self.session.borrow_mut();
        match teams {
            Ok(teams) => session.teams = teams,
            Err(e) => log::error!(target: "board", "error loading teams: {}", e),
        }
        match members {
            Ok(members) => session.members = members,
            Err(e) => log::error!(target: "board", "error loading members: {}", e),
        }
    }

    fn populate_and_bind(&self) {
        {
            let session = self.session.borrow();
            self.view.populate_pickers(&session.teams, &session.members);
        }
        if let Some(sink) = self.sink.borrow().as_ref() {
            self.view.bind(sink);
        }
    }

    /// Recompute visibility from the current page and state and write it back
    pub fn apply_filters(&self) -> VisibilityPlan {
        let snapshot = self.view.snapshot();
        let plan = filter::compute(&snapshot, &self.state.borrow());
        self.view.apply_plan(&plan);
        log::debug!(
            target: "filter",
            "{} of {} tasks visible",
            plan.task_visible.iter().filter(|v| **v).count(),
            snapshot.tasks.len()
        );
        plan
    }

    /// Refetch the page, then re-run search and filters on the new content
    pub async fn refresh(&self) -> RefreshOutcome {
        let href = self.url.borrow().href();
        let (teams, members) = {
            let session = self.session.borrow();
            (session.teams.clone(), session.members.clone())
        };
        let sink = self.sink.borrow().clone();
        let ctx = RefreshContext {
            href: &href,
            teams: &teams,
            members: &members,
            sink: sink.as_ref(),
        };
        let outcome = self.refresher.run(&self.view, &self.api, ctx).await;

        match outcome {
            // the newer refresh filters its own content
            RefreshOutcome::Stale => return outcome,
            RefreshOutcome::Applied { .. } if !self.state.borrow().search_query().is_empty() => {
                self.run_search().await;
            }
            _ => {}
        }
        self.apply_filters();
        outcome
    }

    /// Ask the server for matches of the current query and mark the rest
    async fn run_search(&self) {
        let query = self.state.borrow().search_query().to_string();
        let generation = {
            let mut session = self.session.borrow_mut();
            session.search_generation += 1;
            session.search_generation
        };

        let result = if query.is_empty() {
            Ok(None)
        } else {
            self.api.search(&query).await.map(Some)
        };

        let flags = {
            let mut session = self.session.borrow_mut();
            if session.search_generation != generation {
                log::debug!(target: "search", "dropping superseded results for {:?}", query);
                return;
            }
            match result {
                Ok(matches) => session.search_matches = matches,
                // a failed lookup keeps the previous matches instead of revealing everything
                Err(e) => log::error!(target: "search", "error searching for {:?}: {}", query, e),
            }
            filter::search_hidden_flags(&self.view.snapshot().tasks, session.search_matches.as_ref())
        };
        self.view.set_search_hidden(&flags);
    }

    async fn search(&self, raw: &str) {
        let query = raw.trim();
        self.state.borrow_mut().set_search_query(query);
        persist_search(&mut *self.url.borrow_mut(), query);
        self.run_search().await;
        self.apply_filters();
    }

    async fn change_team(&self, next: TeamFilter) {
        let previous = self.state.borrow().team().clone();
        let crossing = {
            let mut url = self.url.borrow_mut();
            let mut store = self.store.borrow_mut();
            persist_team_filter(&mut *url, &mut *store, &self.config.storage_key, &previous, &next)
        };
        {
            let mut state = self.state.borrow_mut();
            state.set_team(next);
            state.set_member(None);
        }
        if crossing {
            self.refresh().await;
        } else {
            self.apply_filters();
        }
    }

    async fn clear_filters(&self) {
        let previous = self.state.borrow().team().clone();
        self.state.borrow_mut().reset_filters();
        if previous.is_archive() {
            {
                let mut url = self.url.borrow_mut();
                let mut store = self.store.borrow_mut();
                persist_team_filter(
                    &mut *url,
                    &mut *store,
                    &self.config.storage_key,
                    &previous,
                    &TeamFilter::All,
                );
            }
            self.refresh().await;
        } else {
            {
                let mut url = self.url.borrow_mut();
                let mut store = self.store.borrow_mut();
                clear_team_filter(&mut *url, &mut *store, &self.config.storage_key);
            }
            self.apply_filters();
        }
    }

    /// Success closes the modals and refreshes; failure alerts and leaves the
    /// modal open with the user's input
    async fn finish_mutation(&self, result: ApiResult<()>, failure_prefix: &str) {
        match result {
            Ok(()) => {
                self.session.borrow_mut().current_task = None;
                self.view.close_modals();
                self.refresh().await;
            }
            Err(ApiError::Invalid(message)) => self.view.alert(&message),
            Err(e) => {
                log::error!(target: "mutation", "{}: {}", failure_prefix, e);
                self.view.alert(&failure_message(failure_prefix, &e));
            }
        }
    }

    async fn save_task(&self) {
        let Some(id) = self.session.borrow().current_task else {
            return;
        };
        let Some(form) = self.view.read_form(FormKind::Edit) else {
            return;
        };
        let result = TaskMutations::new(&self.api).update(id, &form).await;
        self.finish_mutation(result, MSG_SAVE_FAILED).await;
    }

    async fn create_task(&self) {
        let Some(form) = self.view.read_form(FormKind::Create) else {
            return;
        };
        let result = TaskMutations::new(&self.api).create(&form).await.map(|_| ());
        self.finish_mutation(result, MSG_CREATE_FAILED).await;
    }

    async fn delete_task(&self) {
        let Some(id) = self.session.borrow().current_task else {
            return;
        };
        if !self.view.confirm(MSG_CONFIRM_DELETE) {
            return;
        }
        let result = TaskMutations::new(&self.api).delete(id).await;
        self.finish_mutation(result, MSG_DELETE_FAILED).await;
    }

    pub async fn dispatch(&self, event: BoardEvent) {
        log::debug!(target: "board", "{:?}", event);
        match event {
            BoardEvent::TeamClicked(key) => {
                let current = self.state.borrow().team().clone();
                let next = if current.team() == Some(key.as_str()) {
                    TeamFilter::All
                } else {
                    TeamFilter::Team(key)
                };
                self.change_team(next).await;
            }
            BoardEvent::ArchiveClicked => {
                let current = self.state.borrow().team().clone();
                let next = if current.is_archive() {
                    TeamFilter::All
                } else {
                    TeamFilter::Archive
                };
                self.change_team(next).await;
            }
            BoardEvent::MemberClicked(member) => {
                {
                    let mut state = self.state.borrow_mut();
                    let next = if state.member() == Some(member.as_str()) {
                        None
                    } else {
                        Some(member)
                    };
                    state.set_member(next);
                }
                self.apply_filters();
            }
            BoardEvent::ResetMember => {
                self.state.borrow_mut().set_member(None);
                self.apply_filters();
            }
            BoardEvent::StatusChanged(raw) => {
                self.state.borrow_mut().set_status(FieldFilter::parse(&raw));
                self.apply_filters();
            }
            BoardEvent::PriorityChanged(raw) => {
                self.state.borrow_mut().set_priority(FieldFilter::parse(&raw));
                self.apply_filters();
            }
            BoardEvent::ClearFilters => self.clear_filters().await,
            BoardEvent::SearchInput(query) => self.search(&query).await,
            BoardEvent::EditTask(id) => {
                self.session.borrow_mut().current_task = Some(id);
                self.view.open_editor(id);
            }
            BoardEvent::OpenCreate { project, team } => {
                let team = team.or_else(|| self.state.borrow().team().team().map(String::from));
                self.view.open_creator(project.as_deref(), team.as_deref());
            }
            BoardEvent::SaveTask => self.save_task().await,
            BoardEvent::CreateTask => self.create_task().await,
            BoardEvent::DeleteTask => self.delete_task().await,
            BoardEvent::CloseModals => {
                self.session.borrow_mut().current_task = None;
                self.view.close_modals();
            }
        }
    }

    /// One polling round; skipped while a refresh is in flight
    pub async fn poll_tick(&self) -> TickOutcome {
        self.poll
            .tick(
                &self.api,
                || self.refresher.is_busy(),
                || async {
                    self.refresh().await;
                },
            )
            .await
    }

    /// Poll forever at the configured interval
    pub async fn run_polling(&self) {
        log::info!(target: "poll", "polling every {} ms", self.config.poll_interval_ms);
        loop {
            poll::sleep_ms(self.config.poll_interval_ms).await;
            self.poll_tick().await;
        }
    }
}
