#![forbid(unsafe_code)]

//! Bridge from document mutations to dialog reconciliation.
//!
//! The document queues a [`MutationRecord`] for every structural or
//! attribute change. Nothing reacts immediately: the host drains the queue
//! on its next `tick()`, feeds the records through a [`StructureObserver`],
//! and asks the bridge which watched dialogs were affected.
//!
//! # Failure Modes
//!
//! Records may mention nodes that were discarded before delivery. Those
//! are skipped without error.

use ahash::AHashSet;
use dshim_core::{Document, MutationRecord, NodeId};

/// Receives document change notifications.
pub trait StructureObserver {
    /// Nodes were inserted into or removed from the tree.
    fn on_structure_change(&mut self, added: &[NodeId], removed: &[NodeId]);

    /// An attribute on `target` changed.
    fn on_attribute_change(&mut self, target: NodeId, name: &str, old_value: Option<&str>) {
        let _ = (target, name, old_value);
    }
}

/// Feed a batch of records to `observer`, in order.
pub fn deliver<O: StructureObserver + ?Sized>(observer: &mut O, records: &[MutationRecord]) {
    for record in records {
        match record {
            MutationRecord::ChildList { added, removed, .. } => {
                observer.on_structure_change(added, removed);
            }
            MutationRecord::Attribute {
                target,
                name,
                old_value,
            } => observer.on_attribute_change(*target, name, old_value.as_deref()),
        }
    }
}

/// What one turn of observation found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    /// Watched dialogs inside a subtree that was inserted or removed.
    pub moved: Vec<NodeId>,
    /// Watched dialogs whose `open` attribute changed.
    pub open_changed: Vec<NodeId>,
}

impl Observation {
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty() && self.open_changed.is_empty()
    }
}

/// Collects changes relevant to registered dialogs.
#[derive(Debug, Clone, Default)]
pub struct ObservationBridge {
    watched: AHashSet<NodeId>,
    /// Roots of inserted or removed subtrees since the last `take`.
    touched: Vec<NodeId>,
    open_changed: Vec<NodeId>,
}

impl ObservationBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start reporting changes that involve `dialog`.
    pub fn watch(&mut self, dialog: NodeId) {
        self.watched.insert(dialog);
    }

    /// Stop tracking `dialog`.
    pub fn unwatch(&mut self, dialog: NodeId) {
        self.watched.remove(&dialog);
    }

    /// Whether `dialog` is tracked.
    pub fn is_watching(&self, dialog: NodeId) -> bool {
        self.watched.contains(&dialog)
    }

    /// Whether anything has been recorded since the last `take`.
    pub fn has_pending(&self) -> bool {
        !self.touched.is_empty() || !self.open_changed.is_empty()
    }

    /// Resolve the recorded changes against `doc` and reset.
    ///
    /// Results are in ascending id order without duplicates.
    pub fn take(&mut self, doc: &Document) -> Observation {
        let touched = std::mem::take(&mut self.touched);
        let mut moved: Vec<NodeId> = self
            .watched
            .iter()
            .copied()
            .filter(|dialog| doc.is_alive(*dialog))
            .filter(|dialog| {
                touched
                    .iter()
                    .any(|root| doc.is_alive(*root) && doc.contains(*root, *dialog))
            })
            .collect();
        moved.sort_unstable();

        let mut open_changed = std::mem::take(&mut self.open_changed);
        open_changed.retain(|dialog| doc.is_alive(*dialog));
        open_changed.sort_unstable();
        open_changed.dedup();

        Observation {
            moved,
            open_changed,
        }
    }
}

impl StructureObserver for ObservationBridge {
    fn on_structure_change(&mut self, added: &[NodeId], removed: &[NodeId]) {
        self.touched.extend(added.iter().chain(removed).copied());
    }

    fn on_attribute_change(&mut self, target: NodeId, name: &str, _old_value: Option<&str>) {
        if name == "open" && self.watched.contains(&target) {
            self.open_changed.push(target);
        }
    }
}
