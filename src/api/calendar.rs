//! Calendar Endpoints
//!
//! Week and workload projections plus the special-day overlay.

use chrono::NaiveDate;

use super::{with_query, BoardApi, Method, Transport};
use crate::error::ApiResult;
use crate::models::{MutationResponse, NewSpecialDay, SpecialDay, WeekData, WorkloadData};

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl<T: Transport> BoardApi<T> {
    /// `GET /api/calendar/week?start_date&end_date[&team_id]`
    pub async fn week(&self, start: NaiveDate, end: NaiveDate, team: Option<&str>) -> ApiResult<WeekData> {
        let (start, end) = (iso(start), iso(end));
        let path = with_query(
            "/api/calendar/week",
            &[("start_date", Some(start.as_str())), ("end_date", Some(end.as_str())), ("team_id", team)],
        );
        self.get_json(&path).await
    }

    /// `GET /api/calendar/workload?start_date&end_date[&team_id]`
    pub async fn workload(&self, start: NaiveDate, end: NaiveDate, team: Option<&str>) -> ApiResult<WorkloadData> {
        let (start, end) = (iso(start), iso(end));
        let path = with_query(
            "/api/calendar/workload",
            &[("start_date", Some(start.as_str())), ("end_date", Some(end.as_str())), ("team_id", team)],
        );
        self.get_json(&path).await
    }

    pub async fn special_days(&self) -> ApiResult<Vec<SpecialDay>> {
        self.get_json("/api/special-days").await
    }

    pub async fn add_special_day(&self, day: &NewSpecialDay) -> ApiResult<MutationResponse> {
        self.mutate(Method::Post, "/api/special-days", Some(day)).await
    }

    pub async fn delete_special_day(&self, id: u32) -> ApiResult<MutationResponse> {
        self.mutate::<()>(Method::Delete, &format!("/api/special-days/{}", id), None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;

    #[tokio::test]
    async fn test_week_query_with_team() {
        let fake = FakeTransport::default();
        fake.respond(
            Method::Get,
            "/api/calendar/week?start_date=2026-10-18&end_date=2026-10-24&team_id=2",
            200,
            r#"{"tasks": []}"#,
        );
        let api = BoardApi::new(fake, "");
        let start = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 10, 24).unwrap();
        assert!(api.week(start, end, Some("2")).await.unwrap().tasks.is_empty());
    }

    #[tokio::test]
    async fn test_workload_without_team() {
        let fake = FakeTransport::default();
        fake.respond(
            Method::Get,
            "/api/calendar/workload?start_date=2026-10-18&end_date=2026-10-22",
            200,
            r#"{"workload": [{"member": {"id": 1, "team_id": 1, "name_en": "dana", "name_he": "דנה"}, "tasks": []}]}"#,
        );
        let api = BoardApi::new(fake, "");
        let start = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 10, 22).unwrap();
        let data = api.workload(start, end, None).await.unwrap();
        assert_eq!(data.workload[0].member.avatar_path, "default.png");
    }
}
