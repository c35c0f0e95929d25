//! Persistence Bridge
//!
//! Mirrors the team filter and search query into the URL query string and
//! local storage, and reads them back at page load. The URL always wins over
//! storage; storage only carries the last choice across sessions.

use std::collections::BTreeMap;

use crate::state::TeamFilter;

pub const PARAM_TEAM: &str = "team";
pub const PARAM_MODE: &str = "mode";
pub const PARAM_QUERY: &str = "q";
pub const MODE_ACTIVE: &str = "active";
pub const MODE_ARCHIVE: &str = "archive";

/// Local-storage-like key/value persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// How a URL change lands in the session history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEntry {
    Replace,
    Push,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamChange {
    Set(&'static str, String),
    Remove(&'static str),
}

/// Query string of the current page, updated without navigation
pub trait UrlState {
    fn param(&self, key: &str) -> Option<String>;
    fn apply(&mut self, changes: &[ParamChange], entry: HistoryEntry);
    /// Full URL of the current page, query included
    fn href(&self) -> String;
}

/// Filter state recovered at page load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResolution {
    pub team: TeamFilter,
    pub search_query: String,
    /// The server rendered a different mode than the one restored; the page
    /// content must be refetched before it can be filtered.
    pub needs_refresh: bool,
}

/// Resolve the initial team filter: URL parameter, then storage, then none.
/// Stale URL state that conflicts with the resolved filter is rewritten.
pub fn resolve_on_load<U, S>(url: &mut U, store: &S, storage_key: &str) -> LoadResolution
where
    U: UrlState + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let search_query = url.param(PARAM_QUERY).unwrap_or_default();
    let url_mode = url.param(PARAM_MODE);
    let url_team = url.param(PARAM_TEAM).filter(|t| !t.trim().is_empty());

    if url_mode.as_deref() == Some(MODE_ARCHIVE) {
        if url_team.is_some() {
            url.apply(&[ParamChange::Remove(PARAM_TEAM)], HistoryEntry::Replace);
        }
        return LoadResolution {
            team: TeamFilter::Archive,
            search_query,
            needs_refresh: false,
        };
    }

    if let Some(team) = url_team {
        return LoadResolution {
            team: TeamFilter::parse(&team),
            search_query,
            needs_refresh: false,
        };
    }

    // an explicit active mode without a team is a URL choice of all teams
    if url_mode.as_deref() == Some(MODE_ACTIVE) {
        return LoadResolution {
            team: TeamFilter::All,
            search_query,
            needs_refresh: false,
        };
    }

    match store.get(storage_key).map(|raw| TeamFilter::parse(&raw)) {
        Some(TeamFilter::Archive) => {
            log::info!(target: "persist", "restoring archive mode from storage");
            url.apply(
                &[
                    ParamChange::Set(PARAM_MODE, MODE_ARCHIVE.to_string()),
                    ParamChange::Remove(PARAM_TEAM),
                ],
                HistoryEntry::Replace,
            );
            LoadResolution {
                team: TeamFilter::Archive,
                search_query,
                needs_refresh: true,
            }
        }
        Some(TeamFilter::Team(key)) => {
            log::info!(target: "persist", "restoring team {} from storage", key);
            url.apply(
                &[
                    ParamChange::Set(PARAM_TEAM, key.clone()),
                    ParamChange::Set(PARAM_MODE, MODE_ACTIVE.to_string()),
                ],
                HistoryEntry::Replace,
            );
            LoadResolution {
                team: TeamFilter::Team(key),
                search_query,
                needs_refresh: false,
            }
        }
        _ => LoadResolution {
            team: TeamFilter::All,
            search_query,
            needs_refresh: false,
        },
    }
}

/// Write a user-driven team filter change through to URL and storage.
/// Returns true when the change crosses the archive boundary, which needs
/// server-rendered content.
pub fn persist_team_filter<U, S>(
    url: &mut U,
    store: &mut S,
    storage_key: &str,
    previous: &TeamFilter,
    next: &TeamFilter,
) -> bool
where
    U: UrlState + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let mode_changed = previous.is_archive() != next.is_archive();
    let entry = if mode_changed {
        HistoryEntry::Push
    } else {
        HistoryEntry::Replace
    };

    let mut changes = Vec::with_capacity(2);
    match next {
        TeamFilter::Archive => {
            changes.push(ParamChange::Set(PARAM_MODE, MODE_ARCHIVE.to_string()));
            changes.push(ParamChange::Remove(PARAM_TEAM));
        }
        TeamFilter::Team(key) => {
            changes.push(ParamChange::Set(PARAM_TEAM, key.clone()));
            if mode_changed {
                changes.push(ParamChange::Set(PARAM_MODE, MODE_ACTIVE.to_string()));
            }
        }
        TeamFilter::All => {
            changes.push(ParamChange::Remove(PARAM_TEAM));
            if mode_changed {
                changes.push(ParamChange::Set(PARAM_MODE, MODE_ACTIVE.to_string()));
            }
        }
    }
    url.apply(&changes, entry);

    match next.as_persisted() {
        Some(value) => store.set(storage_key, value),
        None => store.remove(storage_key),
    }
    mode_changed
}

/// Keep `q` in sync with the search box
pub fn persist_search<U: UrlState + ?Sized>(url: &mut U, query: &str) {
    let change = if query.is_empty() {
        ParamChange::Remove(PARAM_QUERY)
    } else {
        ParamChange::Set(PARAM_QUERY, query.to_string())
    };
    url.apply(&[change], HistoryEntry::Replace);
}

/// Forget the persisted team filter entirely
pub fn clear_team_filter<U, S>(url: &mut U, store: &mut S, storage_key: &str)
where
    U: UrlState + ?Sized,
    S: KeyValueStore + ?Sized,
{
    url.apply(&[ParamChange::Remove(PARAM_TEAM)], HistoryEntry::Replace);
    store.remove(storage_key);
}

/// In-memory storage, used by tests and as a fallback when the browser
/// refuses storage access
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// In-memory query string with a record of history writes
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryUrl {
    pub path: String,
    params: BTreeMap<String, String>,
    pub history: Vec<HistoryEntry>,
}

#[cfg(test)]
impl MemoryUrl {
    pub fn with_params(pairs: &[(&str, &str)]) -> Self {
        Self {
            path: "/".to_string(),
            params: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            history: Vec::new(),
        }
    }
}

#[cfg(test)]
impl UrlState for MemoryUrl {
    fn param(&self, key: &str) -> Option<String> {
        self.params.get(key).cloned()
    }

    fn apply(&mut self, changes: &[ParamChange], entry: HistoryEntry) {
        for change in changes {
            match change {
                ParamChange::Set(key, value) => {
                    self.params.insert(key.to_string(), value.clone());
                }
                ParamChange::Remove(key) => {
                    self.params.remove(*key);
                }
            }
        }
        self.history.push(entry);
    }

    fn href(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "activeTeamFilter";

    fn store_with(value: &str) -> MemoryStore {
        let mut store = MemoryStore::default();
        store.set(KEY, value);
        store
    }

    #[test]
    fn test_url_team_wins_over_storage() {
        let mut url = MemoryUrl::with_params(&[("team", "2")]);
        let store = store_with("5");
        let resolved = resolve_on_load(&mut url, &store, KEY);
        assert_eq!(resolved.team, TeamFilter::Team("2".into()));
        assert!(!resolved.needs_refresh);
        assert!(url.history.is_empty());
    }

    #[test]
    fn test_url_archive_drops_stale_team_param() {
        let mut url = MemoryUrl::with_params(&[("mode", "archive"), ("team", "2")]);
        let resolved = resolve_on_load(&mut url, &MemoryStore::default(), KEY);
        assert_eq!(resolved.team, TeamFilter::Archive);
        assert_eq!(url.param(PARAM_TEAM), None);
    }

    #[test]
    fn test_stored_archive_without_url_params() {
        let mut url = MemoryUrl::with_params(&[("team", "")]);
        let resolved = resolve_on_load(&mut url, &store_with("archive"), KEY);
        assert_eq!(resolved.team, TeamFilter::Archive);
        assert!(resolved.needs_refresh);
        assert_eq!(url.param(PARAM_MODE).as_deref(), Some("archive"));
        assert_eq!(url.param(PARAM_TEAM), None);
    }

    #[test]
    fn test_stored_team_is_echoed_into_url() {
        let mut url = MemoryUrl::default();
        let resolved = resolve_on_load(&mut url, &store_with("4"), KEY);
        assert_eq!(resolved.team, TeamFilter::Team("4".into()));
        assert_eq!(url.param(PARAM_TEAM).as_deref(), Some("4"));
        assert_eq!(url.param(PARAM_MODE).as_deref(), Some("active"));
        assert_eq!(url.history, vec![HistoryEntry::Replace]);
    }

    #[test]
    fn test_url_active_mode_beats_stored_archive() {
        let mut url = MemoryUrl::with_params(&[("mode", "active")]);
        let resolved = resolve_on_load(&mut url, &store_with("archive"), KEY);
        assert_eq!(resolved.team, TeamFilter::All);
        assert!(!resolved.needs_refresh);
        assert_eq!(url.param(PARAM_MODE).as_deref(), Some("active"));
        assert!(url.history.is_empty());

        let resolved = resolve_on_load(&mut url, &store_with("4"), KEY);
        assert_eq!(resolved.team, TeamFilter::All);
        assert_eq!(url.param(PARAM_TEAM), None);
    }

    #[test]
    fn test_nothing_persisted() {
        let mut url = MemoryUrl::with_params(&[("q", "deploy")]);
        let resolved = resolve_on_load(&mut url, &MemoryStore::default(), KEY);
        assert_eq!(resolved.team, TeamFilter::All);
        assert_eq!(resolved.search_query, "deploy");
    }

    #[test]
    fn test_round_trip_restores_team() {
        let mut url = MemoryUrl::default();
        let mut store = MemoryStore::default();
        persist_team_filter(&mut url, &mut store, KEY, &TeamFilter::All, &TeamFilter::Team("7".into()));
        persist_search(&mut url, "infra");

        // simulated reload: a fresh read of the same URL and storage
        let resolved = resolve_on_load(&mut url, &store, KEY);
        assert_eq!(resolved.team, TeamFilter::Team("7".into()));
        assert_eq!(resolved.search_query, "infra");
        assert!(!resolved.needs_refresh);
    }

    #[test]
    fn test_archive_and_team_are_exclusive() {
        let mut url = MemoryUrl::with_params(&[("team", "3")]);
        let mut store = store_with("3");

        let crossed = persist_team_filter(
            &mut url, &mut store, KEY,
            &TeamFilter::Team("3".into()), &TeamFilter::Archive,
        );
        assert!(crossed);
        assert_eq!(url.param(PARAM_TEAM), None);
        assert_eq!(store.get(KEY).as_deref(), Some("archive"));

        let crossed = persist_team_filter(
            &mut url, &mut store, KEY,
            &TeamFilter::Archive, &TeamFilter::Team("5".into()),
        );
        assert!(crossed);
        assert_eq!(url.param(PARAM_MODE).as_deref(), Some("active"));
        assert_eq!(url.param(PARAM_TEAM).as_deref(), Some("5"));
        assert_eq!(store.get(KEY).as_deref(), Some("5"));
        assert_eq!(url.history, vec![HistoryEntry::Push, HistoryEntry::Push]);
    }

    #[test]
    fn test_clearing_deletes_instead_of_writing_empty() {
        let mut url = MemoryUrl::with_params(&[("team", "3"), ("q", "x")]);
        let mut store = store_with("3");
        let crossed = persist_team_filter(
            &mut url, &mut store, KEY,
            &TeamFilter::Team("3".into()), &TeamFilter::All,
        );
        assert!(!crossed);
        assert_eq!(url.param(PARAM_TEAM), None);
        assert_eq!(store.get(KEY), None);

        persist_search(&mut url, "");
        assert_eq!(url.param(PARAM_QUERY), None);
        assert_eq!(url.href(), "/");
    }

    #[test]
    fn test_leaving_archive_to_all_sets_active_mode() {
        let mut url = MemoryUrl::with_params(&[("mode", "archive")]);
        let mut store = store_with("archive");
        persist_team_filter(&mut url, &mut store, KEY, &TeamFilter::Archive, &TeamFilter::All);
        assert_eq!(url.param(PARAM_MODE).as_deref(), Some("active"));
        assert_eq!(store.get(KEY), None);
    }
}
