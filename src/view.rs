//! Board View Seam
//!
//! What the controller needs from the rendered page, and the typed events the
//! page sends back. The browser implementation lives in `dom`.

use std::rc::Rc;

use crate::filter::{BoardSnapshot, VisibilityPlan};
use crate::models::{Member, MemberKey, TaskId, Team, TeamKey};

/// User intents raised by page listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    TeamClicked(TeamKey),
    ArchiveClicked,
    MemberClicked(MemberKey),
    ResetMember,
    StatusChanged(String),
    PriorityChanged(String),
    ClearFilters,
    /// Already debounced by the page
    SearchInput(String),
    EditTask(TaskId),
    OpenCreate {
        project: Option<String>,
        team: Option<TeamKey>,
    },
    SaveTask,
    CreateTask,
    DeleteTask,
    CloseModals,
}

/// Where page listeners deliver events
pub type EventSink = Rc<dyn Fn(BoardEvent)>;

/// Focused element at the moment a refresh replaced the page content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSnapshot {
    pub element_id: String,
    /// Text selection, kept only for the search box
    pub selection: Option<(u32, u32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceOutcome {
    Replaced { navbar_changed: bool },
    /// The fetched page had no main container; nothing was touched
    MissingContainer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Edit,
    Create,
}

/// Raw values of the task modal inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub project: String,
    pub name: String,
    pub members: Vec<MemberKey>,
    pub status: String,
    pub priority: String,
    pub notes: String,
    /// Team `<select>` value: a team id, `archive`, or empty
    pub team: String,
    /// `d/m/Y`
    pub start_date: String,
    pub end_date: String,
}

pub trait BoardView {
    /// Read task cards, groupings and filter buttons as currently rendered
    fn snapshot(&self) -> BoardSnapshot;
    fn apply_plan(&self, plan: &VisibilityPlan);
    /// Positional over `snapshot().tasks`
    fn set_search_hidden(&self, flags: &[bool]);

    fn capture_focus(&self) -> Option<FocusSnapshot>;
    fn restore_focus(&self, focus: &FocusSnapshot);
    /// Replace the main container (and the navbar when it differs) with the
    /// matching parts of `html`, then re-resolve cached element references
    fn splice(&self, html: &str) -> SpliceOutcome;
    fn populate_pickers(&self, teams: &[Team], members: &[Member]);
    /// Attach listeners to every element not bound yet
    fn bind(&self, sink: &EventSink);

    fn open_editor(&self, task: TaskId);
    fn open_creator(&self, project: Option<&str>, team: Option<&str>);
    fn read_form(&self, kind: FormKind) -> Option<TaskForm>;
    fn close_modals(&self);

    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}
