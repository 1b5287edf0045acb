#![forbid(unsafe_code)]

//! Modal stack: ordering, z-index assignment, backdrop and overlay placement.
//!
//! The `ModalStack` holds every dialog currently open as a modal, ordered by
//! the time of its most recent `showModal()` (last = topmost). It owns the
//! shared overlay element; each entry references the backdrop its dialog
//! record owns.
//!
//! # Invariants
//!
//! - Z-order is strictly increasing: later modals are always on top.
//! - A dialog appears at most once; removal never reorders the others.
//! - Each dialog's backdrop sits at `z - 1` and is its immediate next sibling
//!   while the dialog is connected.
//! - The overlay sits at `top.z - 2`, strictly between the topmost dialog's
//!   backdrop and every other dialog, as the immediate previous sibling of
//!   the topmost dialog.
//! - The overlay exists exactly while the stack is non-empty; it is detached
//!   (not destroyed) while the topmost dialog is disconnected.
//!
//! # Failure Modes
//!
//! - `remove()` of a dialog not in the stack returns `Ok(None)`.
//! - `push()` past the top of the `u32` z range fails with
//!   `StackingExhausted` before touching the document.
//! - Document errors while placing elements propagate; the entry list is
//!   already updated, so a later [`ModalStack::reconcile`] repairs placement.

use dshim_core::{Document, DomResult, NodeId};

use crate::config::{DialogConfig, MIN_Z_BASE};
use crate::error::{DialogError, DialogResult};

const Z_INDEX: &str = "z-index";

/// An open modal dialog in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StackEntry {
    dialog: NodeId,
    backdrop: NodeId,
    z_index: u32,
}

/// Ordered set of open modal dialogs.
#[derive(Debug, Clone)]
pub struct ModalStack {
    /// Entries in z-order (bottom to top).
    entries: Vec<StackEntry>,
    /// Offset from `z_base` for the next push.
    next_z: u32,
    /// Shared overlay element, present while `entries` is non-empty.
    overlay: Option<NodeId>,
    z_base: u32,
    z_increment: u32,
    overlay_class: String,
}

impl Default for ModalStack {
    fn default() -> Self {
        Self::new(&DialogConfig::default())
    }
}

impl ModalStack {
    /// Create an empty stack.
    pub fn new(config: &DialogConfig) -> Self {
        Self {
            entries: Vec::new(),
            next_z: 0,
            overlay: None,
            z_base: config.z_base.max(MIN_Z_BASE),
            z_increment: config.z_increment.max(3),
            overlay_class: config.overlay_class.clone(),
        }
    }

    // --- Stack Operations ---

    /// Push `dialog` (with its `backdrop`) on top.
    ///
    /// Returns the z-index assigned to the dialog. Pushing a dialog that is
    /// already in the stack returns its existing z-index and changes nothing.
    pub fn push(&mut self, doc: &mut Document, dialog: NodeId, backdrop: NodeId) -> DialogResult<u32> {
        if let Some(existing) = self.entry(dialog) {
            return Ok(existing.z_index);
        }

        let z_index = self.next_z_index().ok_or(DialogError::StackingExhausted {
            depth: self.entries.len(),
        })?;
        self.next_z = self.next_z.saturating_add(self.z_increment);
        self.entries.push(StackEntry {
            dialog,
            backdrop,
            z_index,
        });

        doc.set_style(dialog, Z_INDEX, z_index.to_string())?;
        doc.set_style(backdrop, Z_INDEX, z_index.saturating_sub(1).to_string())?;

        if self.overlay.is_none() {
            let overlay = doc.create_element("div");
            doc.add_class(overlay, &self.overlay_class)?;
            self.overlay = Some(overlay);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(dialog = %dialog, z_index, depth = self.entries.len(), "modal pushed");

        self.reconcile(doc)?;
        Ok(z_index)
    }

    /// Remove `dialog` from any position.
    ///
    /// Clears the z-index applied to the dialog and detaches its backdrop,
    /// returning the backdrop for its owner to destroy. When the stack
    /// empties, the overlay is destroyed and z allocation restarts.
    pub fn remove(&mut self, doc: &mut Document, dialog: NodeId) -> DomResult<Option<NodeId>> {
        let Some(idx) = self.entries.iter().position(|e| e.dialog == dialog) else {
            return Ok(None);
        };
        let entry = self.entries.remove(idx);

        if doc.is_alive(entry.dialog) {
            doc.remove_style(entry.dialog, Z_INDEX)?;
        }
        if doc.is_alive(entry.backdrop) {
            doc.remove(entry.backdrop)?;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(dialog = %dialog, depth = self.entries.len(), "modal removed");

        if self.entries.is_empty() {
            self.next_z = 0;
            if let Some(overlay) = self.overlay.take()
                && doc.is_alive(overlay)
            {
                doc.discard(overlay)?;
            }
        } else {
            self.reconcile(doc)?;
        }
        Ok(Some(entry.backdrop))
    }

    /// Bring backdrop and overlay placement in line with the document.
    ///
    /// Idempotent: a second call without intervening document changes
    /// performs no mutations.
    pub fn reconcile(&mut self, doc: &mut Document) -> DomResult<()> {
        for entry in &self.entries {
            if !doc.is_alive(entry.backdrop) {
                continue;
            }
            if doc.is_connected(entry.dialog) {
                doc.insert_after(entry.dialog, entry.backdrop)?;
            } else if doc.parent(entry.backdrop).is_some() {
                doc.remove(entry.backdrop)?;
            }
        }

        let Some(overlay) = self.overlay.filter(|o| doc.is_alive(*o)) else {
            return Ok(());
        };
        match self.entries.last() {
            Some(top) if doc.is_connected(top.dialog) => {
                doc.set_style(overlay, Z_INDEX, top.z_index.saturating_sub(2).to_string())?;
                if doc.next_sibling(overlay) != Some(top.dialog)
                    && let Some(parent) = doc.parent(top.dialog)
                {
                    doc.insert_before(parent, overlay, Some(top.dialog))?;
                }
            }
            _ => {
                if doc.parent(overlay).is_some() {
                    doc.remove(overlay)?;
                }
            }
        }
        Ok(())
    }

    // --- State Queries ---

    /// z-index the next pushed dialog would get, or `None` once the range
    /// is used up.
    pub fn next_z_index(&self) -> Option<u32> {
        self.z_base
            .checked_add(self.next_z)
            .filter(|z| self.entries.last().is_none_or(|top| *z > top.z_index))
    }

    fn entry(&self, dialog: NodeId) -> Option<&StackEntry> {
        self.entries.iter().find(|e| e.dialog == dialog)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of open modal dialogs.
    #[inline]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Whether `dialog` is open as a modal.
    pub fn contains(&self, dialog: NodeId) -> bool {
        self.entry(dialog).is_some()
    }

    /// The topmost modal dialog.
    pub fn top(&self) -> Option<NodeId> {
        self.entries.last().map(|e| e.dialog)
    }

    /// Whether `dialog` is the topmost modal dialog.
    pub fn is_topmost(&self, dialog: NodeId) -> bool {
        self.top() == Some(dialog)
    }

    /// Dialogs from bottom to top.
    pub fn dialogs(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|e| e.dialog)
    }

    /// z-index assigned to `dialog`.
    pub fn z_index(&self, dialog: NodeId) -> Option<u32> {
        self.entry(dialog).map(|e| e.z_index)
    }

    /// The backdrop registered with `dialog`'s entry.
    pub fn backdrop_of(&self, dialog: NodeId) -> Option<NodeId> {
        self.entry(dialog).map(|e| e.backdrop)
    }

    /// The dialog whose backdrop is `node`.
    pub fn dialog_for_backdrop(&self, node: NodeId) -> Option<NodeId> {
        self.entries
            .iter()
            .find(|e| e.backdrop == node)
            .map(|e| e.dialog)
    }

    /// The shared overlay element, while the stack is non-empty.
    #[inline]
    pub fn overlay(&self) -> Option<NodeId> {
        self.overlay
    }

    /// Whether `node` is the shared overlay.
    pub fn is_overlay(&self, node: NodeId) -> bool {
        self.overlay == Some(node)
    }

    /// z-index the overlay takes while the topmost dialog is shown.
    pub fn overlay_z_index(&self) -> Option<u32> {
        self.overlay?;
        self.entries.last().map(|e| e.z_index.saturating_sub(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dshim_core::style::parse_px;

    fn setup() -> (Document, ModalStack) {
        (Document::default(), ModalStack::default())
    }

    fn dialog(doc: &mut Document) -> (NodeId, NodeId) {
        let body = doc.body();
        let el = doc.create_element("dialog");
        doc.append_child(body, el).unwrap();
        let backdrop = doc.create_element("div");
        doc.add_class(backdrop, "backdrop").unwrap();
        (el, backdrop)
    }

    fn z(doc: &Document, node: NodeId) -> u32 {
        doc.style(node, "z-index")
            .and_then(parse_px)
            .map(|v| v as u32)
            .unwrap()
    }

    #[test]
    fn empty_stack() {
        let stack = ModalStack::default();
        assert!(stack.is_empty());
        assert_eq!(stack.depth(), 0);
        assert!(stack.top().is_none());
        assert!(stack.overlay().is_none());
    }

    #[test]
    fn push_increases_depth() {
        let (mut doc, mut stack) = setup();
        let (a, ab) = dialog(&mut doc);
        let (b, bb) = dialog(&mut doc);
        stack.push(&mut doc, a, ab).unwrap();
        assert_eq!(stack.depth(), 1);
        assert!(stack.contains(a));
        stack.push(&mut doc, b, bb).unwrap();
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top(), Some(b));
    }

    #[test]
    fn duplicate_push_is_noop() {
        let (mut doc, mut stack) = setup();
        let (a, ab) = dialog(&mut doc);
        let z1 = stack.push(&mut doc, a, ab).unwrap();
        let z2 = stack.push(&mut doc, a, ab).unwrap();
        assert_eq!(z1, z2);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn remove_lifo_order() {
        let (mut doc, mut stack) = setup();
        let (a, ab) = dialog(&mut doc);
        let (b, bb) = dialog(&mut doc);
        let (c, cb) = dialog(&mut doc);
        stack.push(&mut doc, a, ab).unwrap();
        stack.push(&mut doc, b, bb).unwrap();
        stack.push(&mut doc, c, cb).unwrap();

        assert_eq!(stack.remove(&mut doc, c).unwrap(), Some(cb));
        assert_eq!(stack.top(), Some(b));
        assert_eq!(stack.remove(&mut doc, b).unwrap(), Some(bb));
        assert_eq!(stack.top(), Some(a));
        assert_eq!(stack.remove(&mut doc, a).unwrap(), Some(ab));
        assert!(stack.is_empty());
    }

    #[test]
    fn remove_middle_keeps_order() {
        let (mut doc, mut stack) = setup();
        let (a, ab) = dialog(&mut doc);
        let (b, bb) = dialog(&mut doc);
        let (c, cb) = dialog(&mut doc);
        stack.push(&mut doc, a, ab).unwrap();
        stack.push(&mut doc, b, bb).unwrap();
        stack.push(&mut doc, c, cb).unwrap();

        stack.remove(&mut doc, b).unwrap();
        let order: Vec<NodeId> = stack.dialogs().collect();
        assert_eq!(order, vec![a, c]);
        assert_eq!(stack.top(), Some(c));
        assert!(doc.parent(bb).is_none());
    }

    #[test]
    fn remove_nonexistent() {
        let (mut doc, mut stack) = setup();
        let (a, ab) = dialog(&mut doc);
        let (b, _) = dialog(&mut doc);
        stack.push(&mut doc, a, ab).unwrap();
        assert_eq!(stack.remove(&mut doc, b).unwrap(), None);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn z_order_increasing() {
        let (mut doc, mut stack) = setup();
        let mut zs = Vec::new();
        for _ in 0..4 {
            let (d, bd) = dialog(&mut doc);
            zs.push(stack.push(&mut doc, d, bd).unwrap());
        }
        for pair in zs.windows(2) {
            assert!(pair[1] > pair[0], "z_index should be strictly increasing");
        }
    }

    #[test]
    fn overlay_between_top_and_rest() {
        let (mut doc, mut stack) = setup();
        let (a, ab) = dialog(&mut doc);
        let (b, bb) = dialog(&mut doc);
        stack.push(&mut doc, a, ab).unwrap();
        stack.push(&mut doc, b, bb).unwrap();

        let overlay = stack.overlay().unwrap();
        assert!(z(&doc, b) > z(&doc, bb));
        assert!(z(&doc, bb) > z(&doc, overlay));
        assert!(z(&doc, overlay) > z(&doc, a));
        assert!(z(&doc, a) > z(&doc, ab));
        assert_eq!(stack.overlay_z_index(), Some(z(&doc, overlay)));
    }

    #[test]
    fn placement_is_adjacent() {
        let (mut doc, mut stack) = setup();
        let (a, ab) = dialog(&mut doc);
        let (b, bb) = dialog(&mut doc);
        stack.push(&mut doc, a, ab).unwrap();
        stack.push(&mut doc, b, bb).unwrap();
        let overlay = stack.overlay().unwrap();
        assert_eq!(doc.next_sibling(a), Some(ab));
        assert_eq!(doc.next_sibling(b), Some(bb));
        assert_eq!(doc.next_sibling(overlay), Some(b));
        assert!(doc.has_class(overlay, "_dialog_overlay"));
    }

    #[test]
    fn overlay_follows_new_top_on_remove() {
        let (mut doc, mut stack) = setup();
        let (a, ab) = dialog(&mut doc);
        let (b, bb) = dialog(&mut doc);
        stack.push(&mut doc, a, ab).unwrap();
        stack.push(&mut doc, b, bb).unwrap();
        let overlay = stack.overlay().unwrap();

        stack.remove(&mut doc, b).unwrap();
        assert_eq!(stack.overlay(), Some(overlay), "overlay is moved, not recreated");
        assert_eq!(doc.next_sibling(overlay), Some(a));
        assert!(z(&doc, overlay) < z(&doc, ab));
        assert_eq!(doc.style(b, "z-index"), None);
    }

    #[test]
    fn overlay_destroyed_when_empty() {
        let (mut doc, mut stack) = setup();
        let (a, ab) = dialog(&mut doc);
        stack.push(&mut doc, a, ab).unwrap();
        let overlay = stack.overlay().unwrap();
        stack.remove(&mut doc, a).unwrap();
        assert!(stack.overlay().is_none());
        assert!(!doc.is_alive(overlay));
        assert!(doc.first_with_class("_dialog_overlay").is_none());
    }

    #[test]
    fn z_allocation_restarts_after_empty() {
        let (mut doc, mut stack) = setup();
        let (a, ab) = dialog(&mut doc);
        let first = stack.push(&mut doc, a, ab).unwrap();
        stack.remove(&mut doc, a).unwrap();
        let (b, bb) = dialog(&mut doc);
        assert_eq!(stack.push(&mut doc, b, bb).unwrap(), first);
    }

    #[test]
    fn overlay_shares_parent_with_top() {
        let (mut doc, mut stack) = setup();
        let body = doc.body();
        let wrapper = doc.create_element("div");
        doc.append_child(body, wrapper).unwrap();
        let el = doc.create_element("dialog");
        doc.append_child(wrapper, el).unwrap();
        let backdrop = doc.create_element("div");
        stack.push(&mut doc, el, backdrop).unwrap();
        let overlay = stack.overlay().unwrap();
        assert_eq!(doc.parent(overlay), Some(wrapper));
        assert_eq!(doc.parent(backdrop), Some(wrapper));
    }

    #[test]
    fn detached_top_clears_visuals_and_reconnect_restores() {
        let (mut doc, mut stack) = setup();
        let body = doc.body();
        let (a, ab) = dialog(&mut doc);
        stack.push(&mut doc, a, ab).unwrap();
        let overlay = stack.overlay().unwrap();

        doc.remove(a).unwrap();
        stack.reconcile(&mut doc).unwrap();
        assert!(doc.parent(ab).is_none());
        assert!(doc.parent(overlay).is_none());
        assert!(stack.contains(a));

        doc.append_child(body, a).unwrap();
        stack.reconcile(&mut doc).unwrap();
        assert_eq!(doc.next_sibling(a), Some(ab));
        assert_eq!(doc.next_sibling(overlay), Some(a));
    }

    #[test]
    fn detached_lower_dialog_keeps_overlay() {
        let (mut doc, mut stack) = setup();
        let (a, ab) = dialog(&mut doc);
        let (b, bb) = dialog(&mut doc);
        stack.push(&mut doc, a, ab).unwrap();
        stack.push(&mut doc, b, bb).unwrap();
        let overlay = stack.overlay().unwrap();

        doc.remove(a).unwrap();
        stack.reconcile(&mut doc).unwrap();
        assert!(doc.parent(ab).is_none());
        assert_eq!(doc.next_sibling(overlay), Some(b));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let (mut doc, mut stack) = setup();
        let (a, ab) = dialog(&mut doc);
        let (b, bb) = dialog(&mut doc);
        stack.push(&mut doc, a, ab).unwrap();
        stack.push(&mut doc, b, bb).unwrap();
        doc.take_mutations();
        stack.reconcile(&mut doc).unwrap();
        assert!(!doc.has_pending_mutations());
    }

    #[test]
    fn backdrop_lookup() {
        let (mut doc, mut stack) = setup();
        let (a, ab) = dialog(&mut doc);
        stack.push(&mut doc, a, ab).unwrap();
        assert_eq!(stack.backdrop_of(a), Some(ab));
        assert_eq!(stack.dialog_for_backdrop(ab), Some(a));
        assert_eq!(stack.dialog_for_backdrop(a), None);
        assert!(stack.is_topmost(a));
    }

    #[test]
    fn z_range_exhaustion_is_an_error() {
        let mut doc = Document::default();
        let config = DialogConfig::default().z_base(u32::MAX - 5);
        let mut stack = ModalStack::new(&config);
        let (a, ab) = dialog(&mut doc);
        let (b, bb) = dialog(&mut doc);

        assert_eq!(stack.push(&mut doc, a, ab).unwrap(), u32::MAX - 5);
        assert_eq!(stack.next_z_index(), None);
        assert_eq!(
            stack.push(&mut doc, b, bb),
            Err(DialogError::StackingExhausted { depth: 1 })
        );
        assert_eq!(stack.depth(), 1);
        assert_eq!(doc.style(b, "z-index"), None);
        assert!(doc.parent(bb).is_none());

        stack.remove(&mut doc, a).unwrap();
        assert_eq!(stack.next_z_index(), Some(u32::MAX - 5));
    }

    #[test]
    fn z_base_floor_keeps_layers_non_negative() {
        let mut doc = Document::default();
        let mut stack = ModalStack::new(&DialogConfig::default().z_base(0));
        let (a, ab) = dialog(&mut doc);
        assert_eq!(stack.push(&mut doc, a, ab).unwrap(), MIN_Z_BASE);
        assert_eq!(z(&doc, ab), MIN_Z_BASE - 1);
        assert_eq!(stack.overlay_z_index(), Some(MIN_Z_BASE - 2));
    }
}
