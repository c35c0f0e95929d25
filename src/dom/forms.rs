//! Task modals: pickers, population from a rendered card, and reading input

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use super::{by_id, data, query, query_all, query_all_in, set_display};
use crate::dates;
use crate::models::{Member, TaskId, Team};
use crate::state::ARCHIVE;
use crate::view::{FormKind, TaskForm};

const EDIT_MODAL: &str = "taskModal";
const CREATE_MODAL: &str = "createTaskModal";

/// Element ids of one modal's inputs
struct FormIds {
    modal: &'static str,
    name: &'static str,
    project: &'static str,
    status: &'static str,
    priority: &'static str,
    notes: &'static str,
    team: &'static str,
    start: &'static str,
    end: &'static str,
}

const EDIT: FormIds = FormIds {
    modal: EDIT_MODAL,
    name: "taskNameInput",
    project: "projectNameInput",
    status: "taskStatus",
    priority: "taskPriority",
    notes: "taskNotes",
    team: "taskTeam",
    start: "taskStartDate",
    end: "taskEndDate",
};

const CREATE: FormIds = FormIds {
    modal: CREATE_MODAL,
    name: "createTaskNameInput",
    project: "createProjectNameInput",
    status: "createTaskStatus",
    priority: "createTaskPriority",
    notes: "createTaskNotes",
    team: "createTaskTeam",
    start: "createTaskStartDate",
    end: "createTaskEndDate",
};

fn ids(kind: FormKind) -> &'static FormIds {
    match kind {
        FormKind::Edit => &EDIT,
        FormKind::Create => &CREATE,
    }
}

/// Value of an input, select or textarea
fn field_value(doc: &Document, id: &str) -> Option<String> {
    let el = doc.get_element_by_id(id)?;
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        return Some(select.value());
    }
    el.dyn_ref::<HtmlTextAreaElement>().map(|area| area.value())
}

fn set_field(doc: &Document, id: &str, value: &str) {
    let Some(el) = doc.get_element_by_id(id) else {
        return;
    };
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        select.set_value(value);
    } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        area.set_value(value);
    }
}

fn member_checkboxes(doc: &Document, modal: &str) -> Vec<HtmlInputElement> {
    query_all(doc, &format!("#{} .members-select input[type=\"checkbox\"]", modal))
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlInputElement>().ok())
        .collect()
}

fn option(doc: &Document, value: &str, label: &str) -> Option<Element> {
    let opt = doc.create_element("option").ok()?;
    opt.set_attribute("value", value).ok()?;
    opt.set_text_content(Some(label));
    Some(opt)
}

/// Choice to restore after a picker rebuild: the old one if still offered
fn retained_choice<'a>(previous: &'a str, offered: &[String]) -> &'a str {
    if offered.iter().any(|v| v == previous) {
        previous
    } else {
        ""
    }
}

/// Members still offered after a rebuild, in their previous order
fn retained_members(previous: &[String], offered: &[String]) -> Vec<String> {
    previous.iter().filter(|m| offered.contains(m)).cloned().collect()
}

fn fill_select(doc: &Document, id: &str, teams: &[Team], with_archive: bool) {
    let Some(select) = by_id::<HtmlSelectElement>(doc, id) else {
        return;
    };
    let previous = select.value();
    select.set_inner_html("");

    let mut offered = vec![(String::new(), "בחר צוות...".to_string())];
    offered.extend(teams.iter().map(|t| (t.key(), t.name_he.clone())));
    if with_archive {
        offered.push((ARCHIVE.to_string(), "ארכיון".to_string()));
    }
    for opt in offered.iter().filter_map(|(value, label)| option(doc, value, label)) {
        let _ = select.append_child(&opt);
    }

    let values: Vec<String> = offered.into_iter().map(|(value, _)| value).collect();
    select.set_value(retained_choice(&previous, &values));
}

/// The edit dropdown also offers archiving; the create dropdown does not
pub fn populate_team_selects(doc: &Document, teams: &[Team]) {
    fill_select(doc, EDIT.team, teams, true);
    fill_select(doc, CREATE.team, teams, false);
}

fn member_label(doc: &Document, member: &Member) -> Option<Element> {
    let label = doc.create_element("label").ok()?;
    label.set_class_name("member-checkbox");

    let input = doc.create_element("input").ok()?;
    input.set_attribute("type", "checkbox").ok()?;
    input.set_attribute("value", &member.name_en).ok()?;

    let img = doc.create_element("img").ok()?;
    img.set_class_name("avatar-sm");
    img.set_attribute("src", &member.avatar_url()).ok()?;

    let name = doc.create_element("span").ok()?;
    name.set_text_content(Some(&member.name_he));

    label.append_child(&input).ok()?;
    label.append_child(&img).ok()?;
    label.append_child(&name).ok()?;
    Some(label)
}

fn checkboxes_in(container: &Element) -> Vec<HtmlInputElement> {
    query_all_in(container, "input[type=\"checkbox\"]")
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlInputElement>().ok())
        .collect()
}

/// Rebuild every member picker, keeping the boxes an open modal has checked
pub fn populate_member_checkboxes(doc: &Document, members: &[Member]) {
    let offered: Vec<String> = members.iter().map(|m| m.name_en.clone()).collect();
    for container in query_all(doc, ".members-select") {
        let checked: Vec<String> = checkboxes_in(&container)
            .iter()
            .filter(|cb| cb.checked())
            .map(|cb| cb.value())
            .collect();
        let keep = retained_members(&checked, &offered);

        container.set_inner_html("");
        for label in members.iter().filter_map(|m| member_label(doc, m)) {
            let _ = container.append_child(&label);
        }
        for checkbox in checkboxes_in(&container) {
            checkbox.set_checked(keep.contains(&checkbox.value()));
        }
    }
}

fn show(doc: &Document, modal: &str) {
    if let Some(el) = doc.get_element_by_id(modal) {
        set_display(&el, "block");
    }
}

pub fn close_modals(doc: &Document) {
    for id in [EDIT_MODAL, CREATE_MODAL] {
        if let Some(el) = doc.get_element_by_id(id) {
            set_display(&el, "none");
        }
    }
}

/// Fill the edit modal from the rendered card of `task`
pub fn open_editor(doc: &Document, task: TaskId) {
    let Some(card) = query(doc, &format!(".task-item[data-id=\"{}\"]", task)) else {
        log::warn!(target: "board", "task {} is not on the page", task);
        return;
    };

    let name = card
        .query_selector(".task-name")
        .ok()
        .flatten()
        .and_then(|el| el.text_content())
        .unwrap_or_default();
    set_field(doc, EDIT.name, name.trim());
    set_field(doc, EDIT.notes, &data(&card, "notes").unwrap_or_default());

    let status = super::status_of(&card);
    set_field(doc, EDIT.status, if status.is_empty() { "status-inprogress" } else { status.as_str() });
    set_field(doc, EDIT.priority, &data(&card, "priority").unwrap_or_else(|| "none".into()));

    let project = card
        .closest(".project-card")
        .ok()
        .flatten()
        .and_then(|p| p.query_selector(".project-title").ok().flatten())
        .and_then(|t| t.text_content())
        .unwrap_or_default();
    set_field(doc, EDIT.project, project.trim());

    let assigned: Vec<String> = query_all_in(&card, ".avatar[data-member-name]")
        .iter()
        .filter_map(|a| data(a, "member-name"))
        .collect();
    for checkbox in member_checkboxes(doc, EDIT.modal) {
        checkbox.set_checked(assigned.contains(&checkbox.value()));
    }

    let team = if data(&card, "is-archived").as_deref() == Some("true") {
        ARCHIVE.to_string()
    } else {
        data(&card, "team-id").unwrap_or_default()
    };
    set_field(doc, EDIT.team, &team);

    let start = data(&card, "start-date").map(|d| dates::iso_to_display(&d)).unwrap_or_default();
    let end = data(&card, "end-date").map(|d| dates::iso_to_display(&d)).unwrap_or_default();
    set_field(doc, EDIT.start, &start);
    set_field(doc, EDIT.end, &end);

    show(doc, EDIT.modal);
}

pub fn open_creator(doc: &Document, project: Option<&str>, team: Option<&str>) {
    set_field(doc, CREATE.name, "");
    set_field(doc, CREATE.project, project.unwrap_or_default());
    set_field(doc, CREATE.status, "status-notstarted");
    set_field(doc, CREATE.priority, "none");
    set_field(doc, CREATE.notes, "");
    set_field(doc, CREATE.team, team.unwrap_or_default());
    set_field(doc, CREATE.start, "");
    set_field(doc, CREATE.end, "");
    for checkbox in member_checkboxes(doc, CREATE.modal) {
        checkbox.set_checked(false);
    }
    show(doc, CREATE.modal);
}

pub fn read_form(doc: &Document, kind: FormKind) -> Option<TaskForm> {
    let ids = ids(kind);
    let members = member_checkboxes(doc, ids.modal)
        .iter()
        .filter(|cb| cb.checked())
        .map(|cb| cb.value())
        .collect();
    Some(TaskForm {
        name: field_value(doc, ids.name)?,
        project: field_value(doc, ids.project).unwrap_or_default(),
        members,
        status: field_value(doc, ids.status).unwrap_or_default(),
        priority: field_value(doc, ids.priority).unwrap_or_else(|| "none".into()),
        notes: field_value(doc, ids.notes).unwrap_or_default(),
        team: field_value(doc, ids.team).unwrap_or_default(),
        start_date: field_value(doc, ids.start).unwrap_or_default(),
        end_date: field_value(doc, ids.end).unwrap_or_default(),
    })
}

/// Search box element, for listeners that reset it
pub fn search_box(doc: &Document) -> Option<HtmlInputElement> {
    by_id(doc, "searchBox")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_values(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_team_choice_survives_rebuild() {
        let offered = make_values(&["", "1", "2", ARCHIVE]);
        assert_eq!(retained_choice("2", &offered), "2");
        assert_eq!(retained_choice(ARCHIVE, &offered), ARCHIVE);
    }

    #[test]
    fn test_removed_team_falls_back_to_placeholder() {
        let offered = make_values(&["", "1"]);
        assert_eq!(retained_choice("3", &offered), "");
        assert_eq!(retained_choice("", &offered), "");
    }

    #[test]
    fn test_checked_members_survive_rebuild() {
        let offered = make_values(&["dana", "omer", "yael"]);
        let checked = make_values(&["yael", "dana"]);
        assert_eq!(retained_members(&checked, &offered), make_values(&["yael", "dana"]));
    }

    #[test]
    fn test_departed_member_is_dropped() {
        let offered = make_values(&["dana"]);
        let checked = make_values(&["dana", "omer"]);
        assert_eq!(retained_members(&checked, &offered), make_values(&["dana"]));
        assert!(retained_members(&[], &offered).is_empty());
    }
}
