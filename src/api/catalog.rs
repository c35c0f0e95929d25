//! Catalog Endpoints
//!
//! Teams, members, search, the version marker and the page itself.

use std::collections::BTreeSet;

use super::{with_query, BoardApi, Transport};
use crate::error::ApiResult;
use crate::models::{Member, SearchHit, TaskId, Team, VersionMarker};

/// Milliseconds since the epoch, used as a cache buster
pub fn now_ms() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

impl<T: Transport> BoardApi<T> {
    /// `GET /api/version?t=<cachebuster>`
    pub async fn version(&self) -> ApiResult<VersionMarker> {
        let t = now_ms().to_string();
        self.get_json(&with_query("/api/version", &[("t", Some(t.as_str()))])).await
    }

    /// `GET /api/teams`, optionally restricted to teams in active use
    pub async fn teams(&self, active_only: bool) -> ApiResult<Vec<Team>> {
        let mode = active_only.then_some("active");
        self.get_json(&with_query("/api/teams", &[("mode", mode)])).await
    }

    pub async fn members(&self) -> ApiResult<Vec<Member>> {
        self.get_json("/api/members").await
    }

    /// Ids of the tasks matching `query`
    pub async fn search(&self, query: &str) -> ApiResult<BTreeSet<TaskId>> {
        let hits: Vec<SearchHit> = self
            .get_json(&with_query("/api/search", &[("q", Some(query))]))
            .await?;
        Ok(hits.into_iter().map(|h| h.id).collect())
    }

    /// Server-rendered HTML of a page on the same origin
    pub async fn page(&self, href: &str) -> ApiResult<String> {
        self.get_text(href).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::testing::FakeTransport;

    #[tokio::test]
    async fn test_version_sends_cache_buster() {
        let fake = FakeTransport::default();
        fake.respond(Method::Get, "/api/version", 200, r#"{"timestamp": 17}"#);
        let api = BoardApi::new(fake.clone(), "");
        assert_eq!(api.version().await.unwrap().timestamp, 17);
        let calls = fake.calls();
        assert!(calls[0].1.starts_with("/api/version?t="));
    }

    #[tokio::test]
    async fn test_search_collects_ids() {
        let fake = FakeTransport::default();
        fake.respond(Method::Get, "/api/search?q=db%20migration", 200, r#"[{"id": 3, "task": "x"}, {"id": 9}]"#);
        let api = BoardApi::new(fake, "");
        assert_eq!(api.search("db migration").await.unwrap(), BTreeSet::from([3, 9]));
    }

    #[tokio::test]
    async fn test_teams_active_mode() {
        let fake = FakeTransport::default();
        fake.respond(Method::Get, "/api/teams?mode=active", 200,
            r#"[{"id": 1, "name_en": "infra", "name_he": "תשתיות"}]"#);
        let api = BoardApi::new(fake, "");
        let teams = api.teams(true).await.unwrap();
        assert_eq!(teams[0].key(), "1");
        assert!(teams[0].members.is_empty());
    }
}
