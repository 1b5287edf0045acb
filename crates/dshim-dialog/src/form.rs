#![forbid(unsafe_code)]

//! `method="dialog"` form submission.

use dshim_core::query::{form_method, is_submit_control, owning_form};
use dshim_core::{Document, NodeId};

/// A submission that closes a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogSubmission {
    pub form: NodeId,
    /// The open dialog the form closes.
    pub dialog: NodeId,
    /// The submitter's `value` attribute (empty when absent), or `None`
    /// when the form was submitted without a submitter.
    pub return_value: Option<String>,
}

/// The submit control activated by a click on `target`, with its form.
pub fn submitter_for_click(doc: &Document, target: NodeId) -> Option<(NodeId, NodeId)> {
    let submitter = doc.closest(target, is_submit_control)?;
    let form = owning_form(doc, submitter)?;
    Some((form, submitter))
}

/// Resolve a submission of `form` against the open dialogs.
///
/// Returns `None` unless the form's method is `dialog` and some ancestor of
/// the form satisfies `is_open_dialog`. The nearest such ancestor wins.
pub fn resolve_submission(
    doc: &Document,
    form: NodeId,
    submitter: Option<NodeId>,
    is_open_dialog: impl Fn(NodeId) -> bool,
) -> Option<DialogSubmission> {
    if doc.tag_name(form) != Some("form") || form_method(doc, form) != "dialog" {
        return None;
    }
    let dialog = doc.closest(form, |_, node| is_open_dialog(node))?;
    let return_value = submitter.map(|s| doc.attr(s, "value").unwrap_or_default().to_string());
    Some(DialogSubmission {
        form,
        dialog,
        return_value,
    })
}
