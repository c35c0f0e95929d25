//! Filter Application Engine
//!
//! Pure visibility computation over a snapshot of the rendered board. The DOM
//! layer reads a `BoardSnapshot`, asks `compute` for a `VisibilityPlan`, and
//! writes the plan back. Plans are positional: entry `i` belongs to the
//! `i`-th element of the matching snapshot list.

use std::collections::BTreeSet;

use crate::models::{MemberKey, TaskId, TeamKey};
use crate::state::{FilterState, TeamFilter};

/// A rendered task element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard {
    pub id: TaskId,
    /// Index of the enclosing project grouping, if any
    pub project: Option<usize>,
    pub team: Option<TeamKey>,
    pub members: Vec<MemberKey>,
    pub status: String,
    pub priority: String,
    /// Set by the search pass, independent of the filters
    pub search_hidden: bool,
}

/// A member avatar filter button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberButton {
    pub member: MemberKey,
    pub team: Option<TeamKey>,
}

/// A team filter button; the archive toggle has `archive = true`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamButton {
    pub team: Option<TeamKey>,
    pub archive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub tasks: Vec<TaskCard>,
    pub project_count: usize,
    pub member_buttons: Vec<MemberButton>,
    pub team_buttons: Vec<TeamButton>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityPlan {
    pub task_visible: Vec<bool>,
    pub project_visible: Vec<bool>,
    pub member_button_shown: Vec<bool>,
    pub member_button_active: Vec<bool>,
    pub team_button_active: Vec<bool>,
    /// Option values the status and priority dropdowns must show
    pub status_value: String,
    pub priority_value: String,
}

#[cfg(test)]
impl VisibilityPlan {
    pub fn visible_task_ids(&self, snapshot: &BoardSnapshot) -> BTreeSet<TaskId> {
        snapshot
            .tasks
            .iter()
            .zip(&self.task_visible)
            .filter(|(_, visible)| **visible)
            .map(|(card, _)| card.id)
            .collect()
    }
}

fn team_matches(card: &TaskCard, filter: &TeamFilter) -> bool {
    match filter {
        // the server already restricted the page to archived tasks
        TeamFilter::All | TeamFilter::Archive => true,
        TeamFilter::Team(key) => card.team.as_deref() == Some(key.as_str()),
    }
}

fn member_matches(card: &TaskCard, member: Option<&str>) -> bool {
    match member {
        None => true,
        Some(wanted) => card.members.iter().any(|m| m == wanted),
    }
}

/// Task-level decision: every active criterion must hold
pub fn task_visible(card: &TaskCard, state: &FilterState) -> bool {
    team_matches(card, state.team())
        && member_matches(card, state.member())
        && !card.search_hidden
        && state.status().matches(&card.status)
        && state.priority().matches(&card.priority)
}

pub fn compute(snapshot: &BoardSnapshot, state: &FilterState) -> VisibilityPlan {
    let task_visible: Vec<bool> = snapshot
        .tasks
        .iter()
        .map(|card| task_visible(card, state))
        .collect();

    let mut project_visible = vec![false; snapshot.project_count];
    for (card, visible) in snapshot.tasks.iter().zip(&task_visible) {
        if !*visible {
            continue;
        }
        if let Some(slot) = card.project.and_then(|p| project_visible.get_mut(p)) {
            *slot = true;
        }
    }

    let active_team = state.team().team();
    let member_button_shown = snapshot
        .member_buttons
        .iter()
        .map(|btn| match active_team {
            Some(team) => btn.team.as_deref() == Some(team),
            None => true,
        })
        .collect();

    let member_button_active = snapshot
        .member_buttons
        .iter()
        .map(|btn| state.member() == Some(btn.member.as_str()))
        .collect();

    let team_button_active = snapshot
        .team_buttons
        .iter()
        .map(|btn| {
            if btn.archive {
                state.team().is_archive()
            } else {
                btn.team.is_some() && btn.team.as_deref() == active_team
            }
        })
        .collect();

    VisibilityPlan {
        task_visible,
        project_visible,
        member_button_shown,
        member_button_active,
        team_button_active,
        status_value: state.status().select_value().to_string(),
        priority_value: state.priority().select_value().to_string(),
    }
}

/// Search-hidden flags for `cards` given the ids returned by `/api/search`.
/// `None` means no search is active and nothing is hidden.
pub fn search_hidden_flags(cards: &[TaskCard], matches: Option<&BTreeSet<TaskId>>) -> Vec<bool> {
    match matches {
        None => vec![false; cards.len()],
        Some(ids) => cards.iter().map(|card| !ids.contains(&card.id)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FieldFilter;
    use pretty_assertions::assert_eq;

    fn make_card(id: TaskId, project: usize, team: &str, members: &[&str], status: &str) -> TaskCard {
        TaskCard {
            id,
            project: Some(project),
            team: if team.is_empty() { None } else { Some(team.to_string()) },
            members: members.iter().map(|m| m.to_string()).collect(),
            status: status.to_string(),
            priority: "none".to_string(),
            search_hidden: false,
        }
    }

    fn make_snapshot(tasks: Vec<TaskCard>) -> BoardSnapshot {
        let project_count = tasks.iter().filter_map(|t| t.project).max().map_or(0, |p| p + 1);
        BoardSnapshot {
            tasks,
            project_count,
            member_buttons: vec![
                MemberButton { member: "dana".into(), team: Some("A".into()) },
                MemberButton { member: "omer".into(), team: Some("B".into()) },
            ],
            team_buttons: vec![
                TeamButton { team: Some("A".into()), archive: false },
                TeamButton { team: Some("B".into()), archive: false },
                TeamButton { team: None, archive: true },
            ],
        }
    }

    #[test]
    fn test_team_and_status_scenario() {
        let snapshot = make_snapshot(vec![
            make_card(1, 0, "A", &[], "done"),
            make_card(2, 1, "B", &[], "done"),
        ]);
        let mut state = FilterState::for_board();
        state.set_team(TeamFilter::Team("A".into()));
        state.set_status(FieldFilter::parse("done"));

        let plan = compute(&snapshot, &state);
        assert_eq!(plan.task_visible, vec![true, false]);
        assert_eq!(plan.project_visible, vec![true, false]);
        assert_eq!(plan.member_button_shown, vec![true, false]);
        assert_eq!(plan.team_button_active, vec![true, false, false]);
        assert_eq!(plan.status_value, "done");
        assert_eq!(plan.priority_value, "all");
    }

    #[test]
    fn test_plan_carries_dropdown_values_through_reset() {
        let snapshot = make_snapshot(vec![make_card(1, 0, "A", &[], "status-done")]);
        let mut state = FilterState::for_board();
        state.set_status(FieldFilter::parse("status-done"));
        state.set_priority(FieldFilter::parse("high"));

        let plan = compute(&snapshot, &state);
        assert_eq!(plan.status_value, "status-done");
        assert_eq!(plan.priority_value, "high");

        state.reset_filters();
        let plan = compute(&snapshot, &state);
        assert_eq!(plan.status_value, "all");
        assert_eq!(plan.priority_value, "all");
    }

    #[test]
    fn test_filtering_is_conjunctive() {
        let mut hidden_by_search = make_card(3, 0, "A", &["dana"], "status-done");
        hidden_by_search.search_hidden = true;
        let snapshot = make_snapshot(vec![
            make_card(1, 0, "A", &["dana"], "status-done"),
            make_card(2, 0, "A", &["omer"], "status-done"),
            hidden_by_search,
            make_card(4, 0, "A", &["dana"], "status-inprogress"),
            make_card(5, 0, "B", &["dana"], "status-done"),
        ]);
        let mut state = FilterState::for_board();
        state.set_team(TeamFilter::Team("A".into()));
        state.set_member(Some("dana".into()));
        state.set_status(FieldFilter::parse("status-done"));

        let plan = compute(&snapshot, &state);
        assert_eq!(plan.visible_task_ids(&snapshot), BTreeSet::from([1]));

        for card in &snapshot.tasks {
            let expected = card.team.as_deref() == Some("A")
                && card.members.iter().any(|m| m == "dana")
                && state.status().matches(&card.status)
                && !card.search_hidden;
            assert_eq!(task_visible(card, &state), expected, "task {}", card.id);
        }
    }

    #[test]
    fn test_task_without_team_hidden_under_team_filter() {
        let snapshot = make_snapshot(vec![make_card(1, 0, "", &[], "done")]);
        let mut state = FilterState::for_board();
        assert_eq!(compute(&snapshot, &state).task_visible, vec![true]);
        state.set_team(TeamFilter::Team("A".into()));
        assert_eq!(compute(&snapshot, &state).task_visible, vec![false]);
    }

    #[test]
    fn test_archive_mode_shows_all_members_and_tasks() {
        let snapshot = make_snapshot(vec![
            make_card(1, 0, "A", &[], "done"),
            make_card(2, 1, "B", &[], "done"),
        ]);
        let mut state = FilterState::for_board();
        state.set_team(TeamFilter::Archive);
        let plan = compute(&snapshot, &state);
        assert_eq!(plan.task_visible, vec![true, true]);
        assert_eq!(plan.member_button_shown, vec![true, true]);
        assert_eq!(plan.team_button_active, vec![false, false, true]);
    }

    #[test]
    fn test_empty_project_hidden() {
        let snapshot = make_snapshot(vec![make_card(1, 1, "A", &[], "done")]);
        let plan = compute(&snapshot, &FilterState::for_board());
        // project 0 has no tasks at all
        assert_eq!(plan.project_visible, vec![false, true]);
    }

    #[test]
    fn test_active_member_button_mirrors_state() {
        let snapshot = make_snapshot(vec![]);
        let mut state = FilterState::for_board();
        state.set_member(Some("omer".into()));
        let plan = compute(&snapshot, &state);
        assert_eq!(plan.member_button_active, vec![false, true]);
        assert_eq!(plan.team_button_active, vec![false, false, false]);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let snapshot = make_snapshot(vec![
            make_card(1, 0, "A", &["dana"], "done"),
            make_card(2, 1, "B", &["omer"], "inprogress"),
        ]);
        let mut state = FilterState::for_board();
        state.set_member(Some("omer".into()));
        assert_eq!(compute(&snapshot, &state), compute(&snapshot, &state));
    }

    #[test]
    fn test_search_hidden_flags() {
        let cards = vec![make_card(1, 0, "A", &[], "done"), make_card(2, 0, "A", &[], "done")];
        assert_eq!(search_hidden_flags(&cards, None), vec![false, false]);
        let matches = BTreeSet::from([2]);
        assert_eq!(search_hidden_flags(&cards, Some(&matches)), vec![true, false]);
    }
}
