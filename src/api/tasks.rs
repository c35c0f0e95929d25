//! Task Endpoints

use super::{BoardApi, Method, Transport};
use crate::error::ApiResult;
use crate::models::{MutationResponse, SchedulePatch, TaskId, TaskPayload};

impl<T: Transport> BoardApi<T> {
    /// `POST /api/tasks`
    pub async fn create_task(&self, payload: &TaskPayload) -> ApiResult<MutationResponse> {
        self.mutate(Method::Post, "/api/tasks", Some(payload)).await
    }

    /// `PUT /api/tasks/:id`
    pub async fn update_task(&self, id: TaskId, payload: &TaskPayload) -> ApiResult<MutationResponse> {
        self.mutate(Method::Put, &format!("/api/tasks/{}", id), Some(payload)).await
    }

    /// `DELETE /api/tasks/:id`
    pub async fn delete_task(&self, id: TaskId) -> ApiResult<MutationResponse> {
        self.mutate::<()>(Method::Delete, &format!("/api/tasks/{}", id), None).await
    }

    /// `PUT /api/tasks/:id/schedule` with only the fields that change
    pub async fn update_schedule(&self, id: TaskId, patch: &SchedulePatch) -> ApiResult<MutationResponse> {
        self.mutate(Method::Put, &format!("/api/tasks/{}/schedule", id), Some(patch)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;

    #[tokio::test]
    async fn test_schedule_patch_body() {
        let fake = FakeTransport::default();
        fake.respond(Method::Put, "/api/tasks/5/schedule", 200, r#"{"success": true}"#);
        let api = BoardApi::new(fake.clone(), "");
        let patch = SchedulePatch {
            start_date: Some(Some("2026-10-19".into())),
            ..Default::default()
        };
        api.update_schedule(5, &patch).await.unwrap();
        assert_eq!(fake.calls()[0].2.as_deref(), Some(r#"{"start_date":"2026-10-19"}"#));
    }

    #[tokio::test]
    async fn test_create_returns_new_id() {
        let fake = FakeTransport::default();
        fake.respond(Method::Post, "/api/tasks", 200, r#"{"success": true, "id": 42}"#);
        let api = BoardApi::new(fake, "");
        let payload = TaskPayload {
            project: "General".into(),
            task: "Write docs".into(),
            members: vec![],
            status: "status-notstarted".into(),
            priority: "none".into(),
            notes: String::new(),
            team_id: Some(1),
            start_date: None,
            end_date: None,
            is_archived: false,
        };
        assert_eq!(api.create_task(&payload).await.unwrap().id, Some(42));
    }
}
