//! Calendar Page
//!
//! Week and workload views of scheduled tasks, rendered with Leptos. This
//! module holds the view-independent rules; `components` renders them.

pub mod components;
pub mod context;
pub mod store;

use chrono::{Datelike, Duration, NaiveDate};

use crate::dates;
use crate::error::{ApiError, ApiResult};
use crate::models::{Member, MemberWorkload, NewSpecialDay, SchedulePatch, SpecialDay, Task, TaskId};
use crate::mutation::{reschedule_patch, schedule_patch};
use crate::state::ViewMode;

pub const HEBREW_DAYS: [&str; 7] = ["ראשון", "שני", "שלישי", "רביעי", "חמישי", "שישי", "שבת"];

/// Longest task title shown inside a workload block
const BLOCK_TITLE_CHARS: usize = 30;

/// Browser-local date of today
pub fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .unwrap_or_default()
}

pub fn day_name(day: NaiveDate) -> &'static str {
    HEBREW_DAYS[day.weekday().num_days_from_sunday() as usize]
}

pub fn priority_color(priority: &str) -> &'static str {
    match priority {
        "high" => "#EF4444",
        "medium" => "#F59E0B",
        "low" => "#FCD34D",
        _ => "#9CA3AF",
    }
}

pub fn day_type_label(day_type: &str) -> &str {
    match day_type {
        "holiday" => "חג",
        "company_event" => "אירוע חברה",
        "other" => "אחר",
        other => other,
    }
}

/// First and last day requested from the server. The week view spans the
/// whole week; the workload view only the work days.
pub fn fetch_range(anchor: NaiveDate, view: ViewMode, work_days: u32) -> (NaiveDate, NaiveDate) {
    let start = dates::week_start(anchor);
    let span = match view {
        ViewMode::Workload => work_days.max(1) - 1,
        _ => 6,
    };
    (start, start + Duration::days(span as i64))
}

pub fn period_title(anchor: NaiveDate, view: ViewMode, work_days: u32) -> String {
    let (start, end) = fetch_range(anchor, view, work_days);
    let range = format!("{} - {}", dates::to_display(start), dates::to_display(end));
    match view {
        ViewMode::Workload => format!("חברי צוות: {}", range),
        _ => range,
    }
}

/// Tasks shown on `day`: those starting that day or spanning it
pub fn tasks_on(tasks: &[Task], day: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| dates::covers(t.start_date.as_deref(), t.end_date.as_deref(), day))
        .cloned()
        .collect()
}

pub fn special_day_on(special_days: &[SpecialDay], day: NaiveDate) -> Option<&SpecialDay> {
    let iso = dates::to_iso(day);
    special_days.iter().find(|sd| sd.date == iso)
}

/// Special days in date order, for the management list
pub fn sorted_special_days(special_days: &[SpecialDay]) -> Vec<SpecialDay> {
    let mut sorted = special_days.to_vec();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));
    sorted
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadRow {
    pub member: Member,
    /// One entry per displayed day
    pub cells: Vec<Vec<Task>>,
}

pub fn workload_rows(workload: &[MemberWorkload], days: &[NaiveDate]) -> Vec<WorkloadRow> {
    workload
        .iter()
        .map(|entry| WorkloadRow {
            member: entry.member.clone(),
            cells: days.iter().map(|day| tasks_on(&entry.tasks, *day)).collect(),
        })
        .collect()
}

pub fn block_title(task: &Task) -> String {
    let mut title: String = task.task.chars().take(BLOCK_TITLE_CHARS).collect();
    if task.task.chars().count() > BLOCK_TITLE_CHARS {
        title.push_str("...");
    }
    title
}

pub fn block_tooltip(task: &Task) -> String {
    let base = format!("{}\nפרויקט: {}", task.task, task.project);
    if task.is_archived {
        format!("[ארכיון] {}", base)
    } else {
        base
    }
}

/// Every task currently on screen, in either view
pub fn all_tasks(week: &[Task], workload: &[MemberWorkload]) -> Vec<Task> {
    let mut tasks = week.to_vec();
    for entry in workload {
        for task in &entry.tasks {
            if !tasks.iter().any(|t| t.id == task.id) {
                tasks.push(task.clone());
            }
        }
    }
    tasks
}

/// Schedule change for dropping `task` on `day`; `None` when it already
/// starts there
pub fn drop_patch(tasks: &[Task], task: TaskId, day: NaiveDate) -> Option<SchedulePatch> {
    let task = tasks.iter().find(|t| t.id == task)?;
    if task.start_date.as_deref().and_then(dates::parse_iso) == Some(day) {
        return None;
    }
    Some(reschedule_patch(task, day))
}

/// Schedule editor fields (`d/m/Y`, either may be empty) to a patch
pub fn schedule_from_input(start: &str, end: &str) -> ApiResult<SchedulePatch> {
    let read = |raw: &str| -> ApiResult<Option<NaiveDate>> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        dates::parse_display(raw)
            .map(Some)
            .ok_or_else(|| ApiError::Invalid(format!("תאריך לא תקין: {}", raw.trim())))
    };
    schedule_patch(read(start)?, read(end)?)
}

/// New special day from the add form; `None` until both date and name are filled
/// Inline question shown before a special day is deleted
pub fn delete_prompt(day: &SpecialDay) -> String {
    format!("למחוק את {} ({})?", day.name, dates::iso_to_display(&day.date))
}

pub fn new_special_day(date: &str, name: &str, day_type: &str) -> Option<NewSpecialDay> {
    let date = dates::parse_display(date)?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(NewSpecialDay {
        date: dates::to_iso(date),
        name: name.to_string(),
        day_type: day_type.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_task(id: TaskId, start: Option<&str>, end: Option<&str>) -> Task {
        Task {
            id,
            project: "Infra".into(),
            task: format!("task {}", id),
            members: vec![],
            status: "status-inprogress".into(),
            priority: "none".into(),
            notes: None,
            team_id: None,
            start_date: start.map(String::from),
            end_date: end.map(String::from),
            estimated_hours: None,
            is_archived: false,
        }
    }

    fn make_member(name: &str) -> Member {
        Member {
            id: 1,
            team_id: 1,
            name_en: name.into(),
            name_he: name.into(),
            avatar_path: "default.png".into(),
            team_name: None,
        }
    }

    #[test]
    fn test_fetch_range_per_view() {
        // Wednesday
        let anchor = ymd(2026, 10, 21);
        assert_eq!(fetch_range(anchor, ViewMode::Week, 5), (ymd(2026, 10, 18), ymd(2026, 10, 24)));
        assert_eq!(fetch_range(anchor, ViewMode::Workload, 5), (ymd(2026, 10, 18), ymd(2026, 10, 22)));
        assert_eq!(period_title(anchor, ViewMode::Week, 5), "18/10/2026 - 24/10/2026");
    }

    #[test]
    fn test_tasks_on_day() {
        let tasks = vec![
            make_task(1, Some("2026-10-19"), None),
            make_task(2, Some("2026-10-18"), Some("2026-10-20")),
            make_task(3, None, Some("2026-10-19")),
        ];
        let ids: Vec<TaskId> = tasks_on(&tasks, ymd(2026, 10, 19)).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_workload_rows_split_by_day() {
        let workload = vec![MemberWorkload {
            member: make_member("dana"),
            tasks: vec![make_task(1, Some("2026-10-18"), Some("2026-10-19"))],
        }];
        let days = dates::week_days(ymd(2026, 10, 18), 3);
        let rows = workload_rows(&workload, &days);
        assert_eq!(rows.len(), 1);
        let counts: Vec<usize> = rows[0].cells.iter().map(Vec::len).collect();
        assert_eq!(counts, vec![1, 1, 0]);
    }

    #[test]
    fn test_special_day_lookup_and_order() {
        let days = vec![
            SpecialDay {
                id: 2,
                date: "2026-10-20".into(),
                name: "Offsite".into(),
                day_type: "company_event".into(),
                color: None,
            },
            SpecialDay {
                id: 1,
                date: "2026-10-05".into(),
                name: "Holiday".into(),
                day_type: "holiday".into(),
                color: None,
            },
        ];
        assert_eq!(special_day_on(&days, ymd(2026, 10, 20)).map(|d| d.id), Some(2));
        assert!(special_day_on(&days, ymd(2026, 10, 21)).is_none());
        let order: Vec<u32> = sorted_special_days(&days).iter().map(|d| d.id).collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(day_type_label("company_event"), "אירוע חברה");
        assert_eq!(day_type_label("custom"), "custom");
    }

    #[test]
    fn test_drop_on_same_day_is_noop() {
        let tasks = vec![make_task(7, Some("2026-10-19"), Some("2026-10-21"))];
        assert_eq!(drop_patch(&tasks, 7, ymd(2026, 10, 19)), None);
        let patch = drop_patch(&tasks, 7, ymd(2026, 10, 20)).unwrap();
        assert_eq!(patch.end(), Some("2026-10-22"));
        assert_eq!(drop_patch(&tasks, 99, ymd(2026, 10, 20)), None);
    }

    #[test]
    fn test_drop_due_only_task_past_its_end() {
        let tasks = vec![make_task(1, None, Some("2026-10-19"))];
        let patch = drop_patch(&tasks, 1, ymd(2026, 10, 21)).unwrap();
        assert_eq!(patch.start(), Some("2026-10-21"));
        assert_eq!(patch.end(), Some("2026-10-21"));
    }

    #[test]
    fn test_block_title_truncates() {
        let mut task = make_task(1, None, None);
        task.task = "x".repeat(40);
        assert_eq!(block_title(&task).len(), 33);
        task.is_archived = true;
        assert!(block_tooltip(&task).starts_with("[ארכיון]"));
    }

    #[test]
    fn test_schedule_input() {
        let patch = schedule_from_input("19/10/2026", "").unwrap();
        assert_eq!(patch.start(), Some("2026-10-19"));
        assert_eq!(patch.end_date, Some(None));
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"start_date":"2026-10-19","end_date":null}"#);
        assert!(matches!(schedule_from_input("20/10/2026", "19/10/2026"), Err(ApiError::Invalid(_))));
        assert!(matches!(schedule_from_input("40/40/2026", ""), Err(ApiError::Invalid(_))));
        let cleared = schedule_from_input("", "").unwrap();
        assert_eq!((cleared.start_date, cleared.end_date), (Some(None), Some(None)));
    }

    #[test]
    fn test_delete_prompt_names_the_day() {
        let day = SpecialDay {
            id: 7,
            date: "2026-12-25".into(),
            name: "Offsite".into(),
            day_type: "company_event".into(),
            color: None,
        };
        assert_eq!(delete_prompt(&day), "למחוק את Offsite (25/12/2026)?");
    }

    #[test]
    fn test_new_special_day_needs_date_and_name() {
        let day = new_special_day("05.10.2026", " Sukkot ", "holiday").unwrap();
        assert_eq!(day.date, "2026-10-05");
        assert_eq!(day.name, "Sukkot");
        assert!(new_special_day("", "Sukkot", "holiday").is_none());
        assert!(new_special_day("05/10/2026", "  ", "holiday").is_none());
    }

    #[test]
    fn test_day_names_start_sunday() {
        assert_eq!(day_name(ymd(2026, 10, 18)), "ראשון");
        assert_eq!(day_name(ymd(2026, 10, 24)), "שבת");
    }
}
