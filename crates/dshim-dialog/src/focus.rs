#![forbid(unsafe_code)]

//! Focus capture, containment and release.
//!
//! The controller holds no state. Containment is derived from the modal
//! stack on every request: while the topmost modal dialog is connected, any
//! focus landing outside its subtree is redirected to the dialog element.
//!
//! | Event | Behavior |
//! |-------|----------|
//! | Dialog opens | Active element captured; initial target focused |
//! | Focus request outside topmost modal | Redirected to the topmost modal |
//! | Tab with focus outside topmost modal | Focus moves into the dialog |
//! | Dialog closes with focus inside | Document blurred, nothing restored |

use dshim_core::query::{is_autofocus_candidate, is_focusable, tab_index};
use dshim_core::{Document, DomResult, KeyCode, KeyEvent, NodeId};

use crate::stack::ModalStack;

/// Chooses and enforces the focused element around dialogs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusController;

impl FocusController {
    pub fn new() -> Self {
        Self
    }

    /// The element to remember as previously focused.
    pub fn capture(&self, doc: &Document) -> Option<NodeId> {
        doc.active_element()
    }

    /// Initial focus target inside `dialog`.
    ///
    /// In order: the first enabled `autofocus` descendant, the first
    /// focusable descendant, then the dialog itself when it has a
    /// non-negative `tabindex`.
    pub fn initial_target(&self, doc: &Document, dialog: NodeId) -> Option<NodeId> {
        doc.descendants(dialog)
            .find(|n| is_autofocus_candidate(doc, *n))
            .or_else(|| doc.descendants(dialog).find(|n| is_focusable(doc, *n)))
            .or_else(|| tab_index(doc, dialog).filter(|i| *i >= 0).map(|_| dialog))
    }

    /// Focus the initial target, if there is one, subject to containment.
    ///
    /// Returns where focus landed, or `None` when focus was left alone.
    pub fn apply_initial(
        &self,
        doc: &mut Document,
        stack: &ModalStack,
        dialog: NodeId,
    ) -> DomResult<Option<NodeId>> {
        match self.initial_target(doc, dialog) {
            Some(target) => self.request(doc, stack, target).map(Some),
            None => Ok(None),
        }
    }

    /// The dialog focus is confined to, if any.
    pub fn trap_root(&self, doc: &Document, stack: &ModalStack) -> Option<NodeId> {
        stack.top().filter(|top| doc.is_connected(*top))
    }

    /// Where a request to focus `target` actually lands.
    pub fn resolve(&self, doc: &Document, stack: &ModalStack, target: NodeId) -> NodeId {
        match self.trap_root(doc, stack) {
            Some(root) if !doc.contains(root, target) => root,
            _ => target,
        }
    }

    /// Move focus to `target`, subject to containment.
    pub fn request(
        &self,
        doc: &mut Document,
        stack: &ModalStack,
        target: NodeId,
    ) -> DomResult<NodeId> {
        let landed = self.resolve(doc, stack, target);
        #[cfg(feature = "tracing")]
        {
            if landed != target {
                tracing::debug!(requested = %target, redirected = %landed, "focus redirected");
            }
        }
        doc.set_active_element(Some(landed))?;
        Ok(landed)
    }

    /// Pull the current focus back inside the topmost modal.
    ///
    /// Returns the new active element when a redirect happened.
    pub fn contain(&self, doc: &mut Document, stack: &ModalStack) -> DomResult<Option<NodeId>> {
        let Some(root) = self.trap_root(doc, stack) else {
            return Ok(None);
        };
        match doc.active_element() {
            Some(active) if doc.contains(root, active) => Ok(None),
            Some(active) => self.request(doc, stack, active).map(Some),
            None => Ok(None),
        }
    }

    /// Keep Tab navigation inside the topmost modal.
    ///
    /// Returns `true` when the key was consumed.
    pub fn handle_tab(
        &self,
        doc: &mut Document,
        stack: &ModalStack,
        event: &KeyEvent,
    ) -> DomResult<bool> {
        if !event.is_press_of(KeyCode::Tab) {
            return Ok(false);
        }
        let Some(root) = self.trap_root(doc, stack) else {
            return Ok(false);
        };
        if doc.active_element().is_some_and(|a| doc.contains(root, a)) {
            return Ok(false);
        }
        let target = self.initial_target(doc, root).unwrap_or(root);
        doc.set_active_element(Some(target))?;
        Ok(true)
    }

    /// Blur the document if focus is inside the closing `dialog`.
    pub fn release(&self, doc: &mut Document, dialog: NodeId) -> DomResult<bool> {
        match doc.active_element() {
            Some(active) if doc.contains(dialog, active) => {
                doc.set_active_element(None)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(doc: &mut Document, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = doc.create_element(tag);
        for (name, value) in attrs {
            doc.set_attr(id, name, *value).unwrap();
        }
        doc.append_child(parent, id).unwrap();
        id
    }

    fn setup() -> (Document, NodeId) {
        let mut doc = Document::default();
        let body = doc.body();
        let dialog = child(&mut doc, body, "dialog", &[]);
        (doc, dialog)
    }

    #[test]
    fn first_focusable_in_document_order() {
        let (mut doc, dialog) = setup();
        let p = child(&mut doc, dialog, "p", &[]);
        let first = child(&mut doc, p, "input", &[]);
        let _second = child(&mut doc, dialog, "input", &[]);
        assert_eq!(FocusController::new().initial_target(&doc, dialog), Some(first));
    }

    #[test]
    fn autofocus_wins() {
        let (mut doc, dialog) = setup();
        let _plain = child(&mut doc, dialog, "input", &[]);
        let auto = child(&mut doc, dialog, "input", &[("autofocus", "")]);
        assert_eq!(FocusController::new().initial_target(&doc, dialog), Some(auto));
    }

    #[test]
    fn disabled_autofocus_skipped() {
        let (mut doc, dialog) = setup();
        let plain = child(&mut doc, dialog, "input", &[]);
        let _auto = child(&mut doc, dialog, "input", &[("autofocus", ""), ("disabled", "")]);
        assert_eq!(FocusController::new().initial_target(&doc, dialog), Some(plain));
    }

    #[test]
    fn tabindex_div_is_target() {
        let (mut doc, dialog) = setup();
        let div = child(&mut doc, dialog, "div", &[("tabindex", "4")]);
        assert_eq!(FocusController::new().initial_target(&doc, dialog), Some(div));
    }

    #[test]
    fn dialog_itself_then_nothing() {
        let (mut doc, dialog) = setup();
        let focus = FocusController::new();
        assert_eq!(focus.initial_target(&doc, dialog), None);
        doc.set_attr(dialog, "tabindex", "0").unwrap();
        assert_eq!(focus.initial_target(&doc, dialog), Some(dialog));
    }

    #[test]
    fn no_target_leaves_focus_alone() {
        let (mut doc, dialog) = setup();
        let body = doc.body();
        let outside = child(&mut doc, body, "input", &[]);
        doc.set_active_element(Some(outside)).unwrap();
        let stack = ModalStack::default();
        let applied = FocusController::new()
            .apply_initial(&mut doc, &stack, dialog)
            .unwrap();
        assert_eq!(applied, None);
        assert_eq!(doc.active_element(), Some(outside));
    }

    #[test]
    fn initial_focus_outside_trap_is_redirected() {
        let (mut doc, top) = setup();
        let body = doc.body();
        let other = child(&mut doc, body, "dialog", &[]);
        let input = child(&mut doc, other, "input", &[]);
        let backdrop = doc.create_element("div");
        let mut stack = ModalStack::default();
        stack.push(&mut doc, top, backdrop).unwrap();

        let landed = FocusController::new()
            .apply_initial(&mut doc, &stack, other)
            .unwrap();
        assert_eq!(landed, Some(top));
        assert_ne!(doc.active_element(), Some(input));
    }

    #[test]
    fn containment_redirects_to_topmost() {
        let (mut doc, dialog) = setup();
        let body = doc.body();
        let outside = child(&mut doc, body, "input", &[]);
        let inside = child(&mut doc, dialog, "input", &[]);
        let backdrop = doc.create_element("div");
        let mut stack = ModalStack::default();
        stack.push(&mut doc, dialog, backdrop).unwrap();

        let focus = FocusController::new();
        assert_eq!(focus.request(&mut doc, &stack, outside).unwrap(), dialog);
        assert_eq!(doc.active_element(), Some(dialog));
        assert_eq!(focus.request(&mut doc, &stack, inside).unwrap(), inside);
    }

    #[test]
    fn contain_pulls_focus_in() {
        let (mut doc, dialog) = setup();
        let body = doc.body();
        let outside = child(&mut doc, body, "input", &[]);
        doc.set_active_element(Some(outside)).unwrap();
        let backdrop = doc.create_element("div");
        let mut stack = ModalStack::default();
        stack.push(&mut doc, dialog, backdrop).unwrap();

        let focus = FocusController::new();
        assert_eq!(focus.contain(&mut doc, &stack).unwrap(), Some(dialog));
        assert_eq!(focus.contain(&mut doc, &stack).unwrap(), None);
    }

    #[test]
    fn disconnected_top_imposes_nothing() {
        let (mut doc, dialog) = setup();
        let body = doc.body();
        let outside = child(&mut doc, body, "input", &[]);
        let backdrop = doc.create_element("div");
        let mut stack = ModalStack::default();
        stack.push(&mut doc, dialog, backdrop).unwrap();
        doc.remove(dialog).unwrap();

        let focus = FocusController::new();
        assert_eq!(focus.request(&mut doc, &stack, outside).unwrap(), outside);
    }

    #[test]
    fn tab_from_outside_enters_dialog() {
        let (mut doc, dialog) = setup();
        let body = doc.body();
        let outside = child(&mut doc, body, "input", &[]);
        let inside = child(&mut doc, dialog, "button", &[]);
        let backdrop = doc.create_element("div");
        let mut stack = ModalStack::default();
        stack.push(&mut doc, dialog, backdrop).unwrap();
        doc.set_active_element(Some(outside)).unwrap();

        let focus = FocusController::new();
        let handled = focus
            .handle_tab(&mut doc, &stack, &KeyEvent::press(KeyCode::Tab))
            .unwrap();
        assert!(handled);
        assert_eq!(doc.active_element(), Some(inside));

        let again = focus
            .handle_tab(&mut doc, &stack, &KeyEvent::press(KeyCode::Tab))
            .unwrap();
        assert!(!again);
    }

    #[test]
    fn release_blurs_only_inside() {
        let (mut doc, dialog) = setup();
        let body = doc.body();
        let inside = child(&mut doc, dialog, "input", &[]);
        let outside = child(&mut doc, body, "input", &[]);
        let focus = FocusController::new();

        doc.set_active_element(Some(outside)).unwrap();
        assert!(!focus.release(&mut doc, dialog).unwrap());
        assert_eq!(doc.active_element(), Some(outside));

        doc.set_active_element(Some(inside)).unwrap();
        assert!(focus.release(&mut doc, dialog).unwrap());
        assert_eq!(doc.active_element(), None);
    }
}
