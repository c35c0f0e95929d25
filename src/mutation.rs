//! Task Mutation Client
//!
//! Turns raw modal input into request payloads and sends create, update,
//! delete and schedule changes to the server. Nothing here touches the page;
//! the controller decides how failures are surfaced.

use chrono::NaiveDate;

use crate::api::{BoardApi, Transport};
use crate::dates;
use crate::error::{ApiError, ApiResult};
use crate::models::{SchedulePatch, Task, TaskId, TaskPayload};
use crate::state::ARCHIVE;
use crate::view::TaskForm;

/// Project used when a task is created without one
pub const DEFAULT_PROJECT: &str = "כללי";

pub const MSG_NAME_REQUIRED: &str = "נא להזין שם משימה";
pub const MSG_DATE_ORDER: &str = "תאריך ההתחלה לא יכול להיות מאוחר מתאריך הסיום";
pub const MSG_SAVE_FAILED: &str = "שגיאה בשמירת המשימה";
pub const MSG_CREATE_FAILED: &str = "שגיאה ביצירת המשימה";
pub const MSG_DELETE_FAILED: &str = "שגיאה במחיקת המשימה";
pub const MSG_SCHEDULE_FAILED: &str = "שגיאה בשמירת תזמון המשימה";
pub const MSG_CONFIRM_DELETE: &str = "האם אתה בטוח שברצונך למחוק משימה זו?";

/// Alert text for a failed mutation: the fixed prefix, plus the server's
/// message when it sent one
pub fn failure_message(prefix: &str, err: &ApiError) -> String {
    match err.server_message() {
        Some(detail) if !detail.is_empty() => format!("{}: {}", prefix, detail),
        _ => prefix.to_string(),
    }
}

/// Team dropdown value to `(team_id, is_archived)`
fn resolve_team(raw: &str) -> (Option<u32>, bool) {
    match raw.trim() {
        "" => (None, false),
        ARCHIVE => (None, true),
        other => match other.parse() {
            Ok(id) => (Some(id), false),
            Err(_) => {
                log::warn!(target: "mutation", "ignoring unknown team value {:?}", other);
                (None, false)
            }
        },
    }
}

fn resolve_date(raw: &str) -> Option<NaiveDate> {
    if raw.trim().is_empty() {
        return None;
    }
    let parsed = dates::parse_display(raw);
    if parsed.is_none() {
        log::warn!(target: "mutation", "unreadable date {:?}, leaving it empty", raw);
    }
    parsed
}

fn check_order(start: Option<NaiveDate>, end: Option<NaiveDate>) -> ApiResult<()> {
    match (start, end) {
        (Some(s), Some(e)) if s > e => Err(ApiError::Invalid(MSG_DATE_ORDER.to_string())),
        _ => Ok(()),
    }
}

fn build_payload(form: &TaskForm, creating: bool) -> ApiResult<TaskPayload> {
    let name = form.name.trim();
    if creating && name.is_empty() {
        return Err(ApiError::Invalid(MSG_NAME_REQUIRED.to_string()));
    }

    let start = resolve_date(&form.start_date);
    let end = resolve_date(&form.end_date);
    check_order(start, end)?;

    let project = form.project.trim();
    let project = if creating && project.is_empty() {
        DEFAULT_PROJECT
    } else {
        project
    };
    let (team_id, is_archived) = resolve_team(&form.team);

    Ok(TaskPayload {
        project: project.to_string(),
        task: name.to_string(),
        members: form.members.clone(),
        status: form.status.clone(),
        priority: form.priority.clone(),
        notes: form.notes.trim().to_string(),
        team_id,
        start_date: start.map(dates::to_iso),
        end_date: end.map(dates::to_iso),
        is_archived,
    })
}

/// Payload for `POST /api/tasks`
pub fn create_payload(form: &TaskForm) -> ApiResult<TaskPayload> {
    build_payload(form, true)
}

/// Payload for `PUT /api/tasks/:id`
pub fn update_payload(form: &TaskForm) -> ApiResult<TaskPayload> {
    build_payload(form, false)
}

/// Schedule editor input to a patch. Both dates are always sent, so an
/// emptied field clears the stored date.
pub fn schedule_patch(start: Option<NaiveDate>, end: Option<NaiveDate>) -> ApiResult<SchedulePatch> {
    check_order(start, end)?;
    Ok(SchedulePatch {
        start_date: Some(start.map(dates::to_iso)),
        end_date: Some(end.map(dates::to_iso)),
        estimated_hours: None,
    })
}

/// Move `task` so it starts on `day`, keeping its length. A task with only
/// an end date keeps that end unless the drop lands past it, in which case
/// the end moves to `day`.
pub fn reschedule_patch(task: &Task, day: NaiveDate) -> SchedulePatch {
    let start = task.start_date.as_deref().and_then(dates::parse_iso);
    let end = task.end_date.as_deref().and_then(dates::parse_iso);
    let new_end = match (start, end) {
        (Some(s), Some(e)) => Some(day + (e - s).max(chrono::Duration::zero())),
        (None, Some(e)) if e < day => Some(day),
        _ => None,
    };
    SchedulePatch {
        start_date: Some(Some(dates::to_iso(day))),
        end_date: new_end.map(|d| Some(dates::to_iso(d))),
        estimated_hours: None,
    }
}

pub struct TaskMutations<'a, T> {
    api: &'a BoardApi<T>,
}

impl<'a, T: Transport> TaskMutations<'a, T> {
    pub fn new(api: &'a BoardApi<T>) -> Self {
        Self { api }
    }

    /// Returns the id the server assigned, when it reports one
    pub async fn create(&self, form: &TaskForm) -> ApiResult<Option<TaskId>> {
        let payload = create_payload(form)?;
        let resp = self.api.create_task(&payload).await?;
        log::info!(target: "mutation", "created task {:?} in {}", resp.id, payload.project);
        Ok(resp.id)
    }

    pub async fn update(&self, id: TaskId, form: &TaskForm) -> ApiResult<()> {
        let payload = update_payload(form)?;
        self.api.update_task(id, &payload).await?;
        log::info!(target: "mutation", "updated task {}", id);
        Ok(())
    }

    pub async fn delete(&self, id: TaskId) -> ApiResult<()> {
        self.api.delete_task(id).await?;
        log::info!(target: "mutation", "deleted task {}", id);
        Ok(())
    }

    pub async fn reschedule(&self, id: TaskId, patch: &SchedulePatch) -> ApiResult<()> {
        self.api.update_schedule(id, patch).await?;
        log::info!(target: "mutation", "rescheduled task {} to {:?}..{:?}", id, patch.start(), patch.end());
        Ok(())
    }
}
