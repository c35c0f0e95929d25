//! Filter State Store
//!
//! The single source of truth for what the user asked to see. Setters are
//! plain assignments; re-filtering is the caller's job.

use crate::models::{MemberKey, TeamKey};

/// Literal used for archive mode in storage and dropdowns
pub const ARCHIVE: &str = "archive";

/// Team dimension of the filter. Archive mode and a concrete team cannot
/// both be active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TeamFilter {
    #[default]
    All,
    Team(TeamKey),
    Archive,
}

impl TeamFilter {
    /// Parse a persisted value; empty means no filter
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" => TeamFilter::All,
            ARCHIVE => TeamFilter::Archive,
            key => TeamFilter::Team(key.to_string()),
        }
    }

    /// Value to persist, `None` when nothing should be stored
    pub fn as_persisted(&self) -> Option<&str> {
        match self {
            TeamFilter::All => None,
            TeamFilter::Team(key) => Some(key.as_str()),
            TeamFilter::Archive => Some(ARCHIVE),
        }
    }

    pub fn is_archive(&self) -> bool {
        matches!(self, TeamFilter::Archive)
    }

    /// The concrete team, if one is selected
    pub fn team(&self) -> Option<&str> {
        match self {
            TeamFilter::Team(key) => Some(key.as_str()),
            _ => None,
        }
    }
}

/// Status / priority dimension. `Only` keeps the `<select>` option value as
/// chosen so the dropdown can be restored from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldFilter {
    #[default]
    All,
    Only(String),
}

impl FieldFilter {
    /// Parse a `<select>` value; `"all"` and empty clear the filter
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "all" => FieldFilter::All,
            value => FieldFilter::Only(value.to_string()),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            FieldFilter::All => true,
            FieldFilter::Only(wanted) => normalize_code(wanted) == normalize_code(value),
        }
    }

    /// Option value the dropdown shows for this filter
    pub fn select_value(&self) -> &str {
        match self {
            FieldFilter::All => "all",
            FieldFilter::Only(value) => value,
        }
    }
}

/// `status-done` and `done` name the same status
pub fn normalize_code(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("status-")
        .unwrap_or(trimmed)
        .to_ascii_lowercase()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    Week,
    Workload,
    #[default]
    Board,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Week => "week",
            ViewMode::Workload => "workload",
            ViewMode::Board => "board",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    team: TeamFilter,
    member: Option<MemberKey>,
    status: FieldFilter,
    priority: FieldFilter,
    search_query: String,
    view: ViewMode,
}

impl FilterState {
    /// Initial state of the task board page
    pub fn for_board() -> Self {
        Self::default()
    }

    /// Initial state of the calendar page
    pub fn for_calendar() -> Self {
        Self {
            view: ViewMode::Week,
            ..Self::default()
        }
    }

    pub fn team(&self) -> &TeamFilter {
        &self.team
    }

    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    pub fn status(&self) -> &FieldFilter {
        &self.status
    }

    pub fn priority(&self) -> &FieldFilter {
        &self.priority
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn set_team(&mut self, team: TeamFilter) {
        self.team = team;
    }

    pub fn set_member(&mut self, member: Option<MemberKey>) {
        self.member = member;
    }

    pub fn set_status(&mut self, status: FieldFilter) {
        self.status = status;
    }

    pub fn set_priority(&mut self, priority: FieldFilter) {
        self.priority = priority;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    /// Drop team, member, status and priority selections. Search and view stay.
    pub fn reset_filters(&mut self) {
        self.team = TeamFilter::All;
        self.member = None;
        self.status = FieldFilter::All;
        self.priority = FieldFilter::All;
    }
}
