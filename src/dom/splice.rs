//! Page splicing and focus preservation

use wasm_bindgen::JsCast;
use web_sys::{Document, DomParser, HtmlElement, HtmlInputElement, SupportedType};

use super::query;
use crate::view::{FocusSnapshot, SpliceOutcome};

const MAIN: &str = ".main-container";
const NAVBAR: &str = ".navbar";
const SEARCH_BOX: &str = "searchBox";

fn parse(html: &str) -> Option<Document> {
    let parser = DomParser::new().ok()?;
    parser.parse_from_string(html, SupportedType::TextHtml).ok()
}

/// Swap in the fetched main container, and the navbar only when it changed
pub fn splice_page(doc: &Document, html: &str) -> SpliceOutcome {
    let Some(fresh) = parse(html) else {
        return SpliceOutcome::MissingContainer;
    };
    let (Some(current_main), Some(fresh_main)) = (query(doc, MAIN), query(&fresh, MAIN)) else {
        return SpliceOutcome::MissingContainer;
    };
    current_main.set_inner_html(&fresh_main.inner_html());

    let navbar_changed = match (query(doc, NAVBAR), query(&fresh, NAVBAR)) {
        (Some(current), Some(next)) => {
            let next_html = next.inner_html();
            match navbar_update(&current.inner_html(), &next_html) {
                Some(html) => {
                    current.set_inner_html(html);
                    true
                }
                None => false,
            }
        }
        _ => false,
    };
    SpliceOutcome::Replaced { navbar_changed }
}

/// Markup to write into the navbar, `None` when it is unchanged. Rewriting
/// an identical navbar would drop its listeners and focus for nothing.
fn navbar_update<'a>(current: &str, fresh: &'a str) -> Option<&'a str> {
    (current != fresh).then_some(fresh)
}

pub fn capture_focus(doc: &Document) -> Option<FocusSnapshot> {
    let active = doc.active_element()?;
    let element_id = active.id();
    if element_id.is_empty() {
        return None;
    }
    let selection = if element_id == SEARCH_BOX {
        active.dyn_ref::<HtmlInputElement>().and_then(|input| {
            let start = input.selection_start().ok().flatten()?;
            let end = input.selection_end().ok().flatten()?;
            Some((start, end))
        })
    } else {
        None
    };
    Some(FocusSnapshot { element_id, selection })
}

pub fn restore_focus(doc: &Document, focus: &FocusSnapshot) {
    let Some(el) = doc.get_element_by_id(&focus.element_id) else {
        return;
    };
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.focus();
    }
    if let (Some((start, end)), Some(input)) = (focus.selection, el.dyn_ref::<HtmlInputElement>()) {
        let _ = input.set_selection_range(start, end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_navbar_is_left_alone() {
        let html = r#"<a href="/calendar">יומן</a><span class="count">12</span>"#;
        assert_eq!(navbar_update(html, html), None);
    }

    #[test]
    fn test_changed_navbar_is_replaced() {
        let current = r#"<span class="count">12</span>"#;
        let fresh = r#"<span class="count">13</span>"#;
        assert_eq!(navbar_update(current, fresh), Some(fresh));
        // whitespace counts as a change, the comparison is on raw markup
        assert_eq!(navbar_update(current, " <span class=\"count\">12</span>"), Some(" <span class=\"count\">12</span>"));
    }
}
