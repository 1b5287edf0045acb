#![forbid(unsafe_code)]

//! Stateless element queries over a [`Document`].
//!
//! These helpers hold no state of their own; they answer questions the
//! dialog engine asks about arbitrary host elements.

use crate::document::{Document, NodeId};

/// Tags that accept focus by default when enabled.
const FOCUSABLE_CONTROLS: &[&str] = &["button", "input", "select", "textarea"];

/// Tags that support the `disabled` attribute.
const DISABLEABLE: &[&str] = &["button", "input", "select", "textarea", "fieldset"];

/// Parsed `tabindex`, if present and numeric.
pub fn tab_index(doc: &Document, id: NodeId) -> Option<i32> {
    doc.attr(id, "tabindex")?.trim().parse().ok()
}

/// Whether a form control is disabled.
pub fn is_disabled(doc: &Document, id: NodeId) -> bool {
    doc.tag_name(id)
        .is_some_and(|tag| DISABLEABLE.contains(&tag))
        && doc.has_attr(id, "disabled")
}

/// Whether the element takes part in sequential focus navigation.
///
/// Enabled form controls (except hidden inputs), links with `href`, and any
/// element with a non-negative `tabindex`. A negative `tabindex` opts a
/// control out.
pub fn is_focusable(doc: &Document, id: NodeId) -> bool {
    let Some(tag) = doc.tag_name(id) else {
        return false;
    };
    if is_disabled(doc, id) {
        return false;
    }
    if let Some(index) = tab_index(doc, id) {
        return index >= 0;
    }
    if tag == "input" && input_type(doc, id) == "hidden" {
        return false;
    }
    FOCUSABLE_CONTROLS.contains(&tag) || (tag == "a" && doc.has_attr(id, "href"))
}

/// Whether the element is an enabled `autofocus` candidate.
pub fn is_autofocus_candidate(doc: &Document, id: NodeId) -> bool {
    doc.has_attr(id, "autofocus") && !is_disabled(doc, id)
}

/// Lowercased `type` of an `input`, defaulting to `text`.
pub fn input_type(doc: &Document, id: NodeId) -> String {
    doc.attr(id, "type")
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "text".to_string())
}

/// Whether activating the element submits its form.
///
/// `button` elements submit unless their `type` is `button` or `reset`;
/// `input` elements submit when their `type` is `submit` or `image`.
pub fn is_submit_control(doc: &Document, id: NodeId) -> bool {
    if is_disabled(doc, id) {
        return false;
    }
    match doc.tag_name(id) {
        Some("button") => !matches!(
            doc.attr(id, "type")
                .map(|t| t.trim().to_ascii_lowercase())
                .as_deref(),
            Some("button" | "reset")
        ),
        Some("input") => matches!(input_type(doc, id).as_str(), "submit" | "image"),
        _ => false,
    }
}

/// The form that owns a control: its closest `form` ancestor.
pub fn owning_form(doc: &Document, id: NodeId) -> Option<NodeId> {
    let parent = doc.parent(id)?;
    doc.closest(parent, |d, n| d.tag_name(n) == Some("form"))
}

/// Lowercased `method` of a form, defaulting to `get`.
pub fn form_method(doc: &Document, form: NodeId) -> String {
    doc.attr(form, "method")
        .map(|m| m.trim().to_ascii_lowercase())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "get".to_string())
}
