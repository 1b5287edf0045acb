#![forbid(unsafe_code)]

//! Mutation records queued by the [`Document`](crate::Document).
//!
//! Every structural or attribute change appends one record. Records are not
//! delivered synchronously: an observer drains the queue on its next turn,
//! so a remove-then-reinsert performed within one turn arrives as two
//! records describing a node that is connected again.

use crate::document::NodeId;

/// One observed change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    /// Children were added to or removed from `parent`.
    ChildList {
        parent: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
    /// An attribute on `target` was set or removed.
    Attribute {
        target: NodeId,
        name: String,
        old_value: Option<String>,
    },
}

impl MutationRecord {
    /// Nodes added by this record.
    pub fn added(&self) -> &[NodeId] {
        match self {
            Self::ChildList { added, .. } => added,
            Self::Attribute { .. } => &[],
        }
    }

    /// Nodes removed by this record.
    pub fn removed(&self) -> &[NodeId] {
        match self {
            Self::ChildList { removed, .. } => removed,
            Self::Attribute { .. } => &[],
        }
    }

    /// Whether this is an attribute change for `name`.
    pub fn is_attribute(&self, name: &str) -> bool {
        matches!(self, Self::Attribute { name: n, .. } if n == name)
    }
}

/// FIFO of pending records.
#[derive(Debug, Clone, Default)]
pub struct MutationQueue {
    records: Vec<MutationRecord>,
}

impl MutationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a record for the next drain.
    pub fn push(&mut self, record: MutationRecord) {
        self.records.push(record);
    }

    /// Take every pending record, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
