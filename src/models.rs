//! Frontend Models
//!
//! Data structures matching the board server's JSON.

use serde::{Deserialize, Serialize};

/// Task id as issued by the server
pub type TaskId = u32;

/// Team key as it appears in `data-team-id` attributes and URL params
pub type TeamKey = String;

/// Member key (`name_en`), the value stored in a task's member list
pub type MemberKey = String;

/// Team data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name_en: String,
    pub name_he: String,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Team {
    pub fn key(&self) -> TeamKey {
        self.id.to_string()
    }
}

/// Team member data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: u32,
    pub team_id: u32,
    pub name_en: String,
    pub name_he: String,
    #[serde(default = "default_avatar")]
    pub avatar_path: String,
    #[serde(default)]
    pub team_name: Option<String>,
}

/// Where the server serves uploaded avatars
pub const AVATAR_DIR: &str = "/uploads/avatars";

impl Member {
    pub fn avatar_url(&self) -> String {
        format!("{}/{}", AVATAR_DIR, self.avatar_path)
    }
}

fn default_avatar() -> String {
    "default.png".to_string()
}

/// Task data structure (matches backend `Task.to_dict`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project: String,
    pub task: String,
    #[serde(default)]
    pub members: Vec<MemberKey>,
    pub status: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub team_id: Option<u32>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub is_archived: bool,
}

fn default_priority() -> String {
    "none".to_string()
}

/// Holiday / non-working day marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialDay {
    pub id: u32,
    pub date: String,
    pub name: String,
    #[serde(rename = "type", default = "default_day_type")]
    pub day_type: String,
    #[serde(default)]
    pub color: Option<String>,
}

fn default_day_type() -> String {
    "holiday".to_string()
}

/// `/api/version` response
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct VersionMarker {
    pub timestamp: i64,
}

/// `/api/search` hit; only the id drives visibility
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchHit {
    pub id: TaskId,
}

/// Envelope returned by every mutating endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub id: Option<TaskId>,
}

/// `/api/calendar/week` response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WeekData {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// One member row of the workload view
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MemberWorkload {
    pub member: Member,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// `/api/calendar/workload` response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WorkloadData {
    #[serde(default)]
    pub workload: Vec<MemberWorkload>,
}

/// Body of create/update requests
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskPayload {
    pub project: String,
    pub task: String,
    pub members: Vec<MemberKey>,
    pub status: String,
    pub priority: String,
    pub notes: String,
    pub team_id: Option<u32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_archived: bool,
}

/// Body of `PUT /api/tasks/:id/schedule`. An outer `None` leaves the
/// field alone; `Some(None)` is sent as `null` and clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchedulePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
}

impl SchedulePatch {
    /// Start date the patch sets, if any
    pub fn start(&self) -> Option<&str> {
        self.start_date.as_ref()?.as_deref()
    }

    pub fn end(&self) -> Option<&str> {
        self.end_date.as_ref()?.as_deref()
    }
}

/// Body of `POST /api/special-days`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSpecialDay {
    pub date: String,
    pub name: String,
    #[serde(rename = "type")]
    pub day_type: String,
}
