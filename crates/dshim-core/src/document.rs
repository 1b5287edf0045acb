#![forbid(unsafe_code)]

//! Arena-backed document tree.
//!
//! Nodes live in a `Vec` and are addressed by [`NodeId`]. Ids are never
//! reused: [`Document::discard`] tombstones a node, after which every
//! lookup through that id fails with [`DomError::Discarded`]. Holding a
//! `NodeId` therefore never keeps a node alive, which is what lets the
//! dialog engine keep weak references to previously focused elements.
//!
//! # Invariants
//!
//! - The root (`html`) is always connected and can never be moved.
//! - A node has at most one parent, and appears exactly once in that
//!   parent's child list.
//! - Every structural or attribute change pushes one [`MutationRecord`].
//! - If the active element leaves the connected tree, focus is cleared.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown id | Id from another document | `DomError::UnknownNode` |
//! | Discarded id | Node was tombstoned | `DomError::Discarded` |
//! | Cycle | Inserting an ancestor into its descendant | `DomError::HierarchyCycle` |
//! | Bad reference | `insert_before` reference not a child | `DomError::NotAChild` |

use std::collections::BTreeMap;
use std::fmt;

use crate::geometry::{Size, Viewport};
use crate::mutation::{MutationQueue, MutationRecord};
use crate::style::InlineStyle;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw arena index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Errors from document operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The id was never issued by this document.
    UnknownNode(NodeId),
    /// The node was discarded.
    Discarded(NodeId),
    /// The insertion would make a node its own ancestor.
    HierarchyCycle { parent: NodeId, child: NodeId },
    /// The reference node is not a child of the given parent.
    NotAChild { parent: NodeId, child: NodeId },
    /// The document root cannot be moved, removed or discarded.
    RootImmutable,
    /// Text nodes carry no attributes, style or children.
    NotAnElement(NodeId),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "unknown node: {id}"),
            Self::Discarded(id) => write!(f, "node was discarded: {id}"),
            Self::HierarchyCycle { parent, child } => {
                write!(f, "inserting {child} into {parent} would create a cycle")
            }
            Self::NotAChild { parent, child } => {
                write!(f, "{child} is not a child of {parent}")
            }
            Self::RootImmutable => write!(f, "the document root cannot be moved or removed"),
            Self::NotAnElement(id) => write!(f, "{id} is not an element"),
        }
    }
}

impl std::error::Error for DomError {}

/// Result alias for document operations.
pub type DomResult<T> = Result<T, DomError>;

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    style: InlineStyle,
    size: Size,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
    discarded: bool,
}

/// The host document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
    active: Option<NodeId>,
    viewport: Viewport,
    mutations: MutationQueue,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl Document {
    /// Create a document containing `html > body`.
    pub fn new(viewport: Viewport) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            active: None,
            viewport,
            mutations: MutationQueue::new(),
        };
        doc.root = doc.alloc(NodeKind::Element(Element::new("html")));
        doc.body = doc.alloc(NodeKind::Element(Element::new("body")));
        doc.nodes[doc.body.0].parent = Some(doc.root);
        doc.nodes[doc.root.0].children.push(doc.body);
        doc
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
            discarded: false,
        });
        id
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        match self.nodes.get(id.0) {
            None => Err(DomError::UnknownNode(id)),
            Some(node) if node.discarded => Err(DomError::Discarded(id)),
            Some(node) => Ok(node),
        }
    }

    fn element(&self, id: NodeId) -> DomResult<&Element> {
        match &self.node(id)?.kind {
            NodeKind::Element(el) => Ok(el),
            NodeKind::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut Element> {
        self.node(id)?;
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(el) => Ok(el),
            NodeKind::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    // --- Tree structure ---

    /// The `html` root.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The `body` element.
    #[inline]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element. Tag names are lowercased.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(Element::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(text.into()))
    }

    /// Whether `id` refers to a live (issued, not discarded) node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// Whether `id` is a live element node.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_ok()
    }

    /// Lowercased tag name, or `None` for text and dead nodes.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok().map(|el| el.tag.as_str())
    }

    /// Concatenated text of the node and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Ok(NodeKind::Text(text)) = self.node(id).map(|n| &n.kind) {
            out.push_str(text);
        }
        for node in self.descendants(id) {
            if let Ok(NodeKind::Text(text)) = self.node(node).map(|n| &n.kind) {
                out.push_str(text);
            }
        }
        out
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|n| n.parent)
    }

    /// Children of a node (empty for dead nodes).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    fn sibling_offset(&self, id: NodeId, offset: isize) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|c| *c == id)?;
        let target = pos.checked_add_signed(offset)?;
        siblings.get(target).copied()
    }

    /// Next sibling in the parent's child list.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.sibling_offset(id, 1)
    }

    /// Previous sibling in the parent's child list.
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.sibling_offset(id, -1)
    }

    /// Whether the node is reachable from the root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == self.root {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Inclusive containment: `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(node) {
            return false;
        }
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Pre-order traversal of the descendants of `id` (excluding `id`).
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// Closest inclusive ancestor matching `pred`.
    pub fn closest(&self, id: NodeId, mut pred: impl FnMut(&Self, NodeId) -> bool) -> Option<NodeId> {
        let mut cursor = Some(id).filter(|n| self.is_alive(*n));
        while let Some(current) = cursor {
            if pred(self, current) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.element(parent)?;
        self.node(child)?;
        if child == self.root {
            return Err(DomError::RootImmutable);
        }
        if self.contains(child, parent) {
            return Err(DomError::HierarchyCycle { parent, child });
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.nodes[child.0].parent.take() {
            self.nodes[old_parent.0].children.retain(|c| *c != child);
            self.mutations.push(MutationRecord::ChildList {
                parent: old_parent,
                added: Vec::new(),
                removed: vec![child],
            });
        }
    }

    /// Append `child` as the last child of `parent`, moving it if attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (or at the end when `None`).
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        self.check_insert(parent, child)?;
        if let Some(reference) = reference {
            self.node(reference)?;
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild {
                    parent,
                    child: reference,
                });
            }
            if reference == child {
                return Ok(());
            }
        }

        let was_connected = self.is_connected(child);
        self.detach(child);

        let siblings = &mut self.nodes[parent.0].children;
        let index = reference
            .and_then(|r| siblings.iter().position(|c| *c == r))
            .unwrap_or(siblings.len());
        siblings.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        self.mutations.push(MutationRecord::ChildList {
            parent,
            added: vec![child],
            removed: Vec::new(),
        });

        if was_connected && !self.is_connected(child) {
            self.clear_focus_within(child);
        }
        Ok(())
    }

    /// Insert `child` immediately after `target` in `target`'s parent.
    ///
    /// A detached `target` leaves `child` untouched.
    pub fn insert_after(&mut self, target: NodeId, child: NodeId) -> DomResult<()> {
        self.node(target)?;
        let Some(parent) = self.parent(target) else {
            return Ok(());
        };
        if target == child {
            return Ok(());
        }
        let next = self.next_sibling(target);
        if next == Some(child) {
            return Ok(());
        }
        self.insert_before(parent, child, next)
    }

    /// Detach a node from its parent. Detached nodes are a no-op.
    pub fn remove(&mut self, child: NodeId) -> DomResult<()> {
        self.node(child)?;
        if child == self.root {
            return Err(DomError::RootImmutable);
        }
        self.detach(child);
        self.clear_focus_within(child);
        Ok(())
    }

    /// Detach and tombstone a node and its whole subtree.
    pub fn discard(&mut self, id: NodeId) -> DomResult<()> {
        self.remove(id)?;
        let doomed: Vec<NodeId> = std::iter::once(id).chain(self.descendants(id)).collect();
        #[cfg(feature = "tracing")]
        tracing::trace!(node = %id, count = doomed.len(), "subtree discarded");
        for node in doomed {
            self.nodes[node.0].discarded = true;
        }
        Ok(())
    }

    fn clear_focus_within(&mut self, subtree: NodeId) {
        if let Some(active) = self.active
            && self.contains(subtree, active)
            && !self.is_connected(active)
        {
            self.active = None;
        }
    }

    // --- Attributes ---

    /// Attribute value. Names are case-insensitive.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.element(id)
            .ok()
            .and_then(|el| el.attrs.get(&name))
            .map(String::as_str)
    }

    /// Whether the attribute is present (any value, including empty).
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Set an attribute, recording the change.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> DomResult<()> {
        let name = name.to_ascii_lowercase();
        let old_value = self
            .element_mut(id)?
            .attrs
            .insert(name.clone(), value.into());
        self.mutations.push(MutationRecord::Attribute {
            target: id,
            name,
            old_value,
        });
        Ok(())
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> DomResult<bool> {
        let name = name.to_ascii_lowercase();
        let Some(old_value) = self.element_mut(id)?.attrs.remove(&name) else {
            return Ok(false);
        };
        self.mutations.push(MutationRecord::Attribute {
            target: id,
            name,
            old_value: Some(old_value),
        });
        Ok(true)
    }

    /// Whether the whitespace-separated `class` attribute contains `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
    }

    /// Add a class if it is not already present.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> DomResult<()> {
        if self.has_class(id, class) {
            return Ok(());
        }
        let list = match self.attr(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attr(id, "class", list)
    }

    /// Connected elements carrying `class`, in document order.
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .filter(|n| self.has_class(*n, class))
            .collect()
    }

    /// First connected element carrying `class`, in document order.
    pub fn first_with_class(&self, class: &str) -> Option<NodeId> {
        self.descendants(self.root).find(|n| self.has_class(*n, class))
    }

    // --- Inline style ---

    /// Inline style property.
    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id).ok().and_then(|el| el.style.get(property))
    }

    /// Set an inline style property (an empty value removes it).
    pub fn set_style(&mut self, id: NodeId, property: &str, value: impl Into<String>) -> DomResult<()> {
        self.element_mut(id)?.style.set(property, value);
        Ok(())
    }

    /// Remove an inline style property, returning the old value.
    pub fn remove_style(&mut self, id: NodeId, property: &str) -> DomResult<Option<String>> {
        Ok(self.element_mut(id)?.style.remove(property))
    }

    /// The full inline style block.
    pub fn inline_style(&self, id: NodeId) -> Option<&InlineStyle> {
        self.element(id).ok().map(|el| &el.style)
    }

    // --- Layout ---

    /// The element's border-box size as laid out by the host.
    pub fn box_size(&self, id: NodeId) -> Size {
        self.element(id).map(|el| el.size).unwrap_or(Size::ZERO)
    }

    /// Record the element's laid-out size.
    pub fn set_box_size(&mut self, id: NodeId, size: Size) -> DomResult<()> {
        self.element_mut(id)?.size = size;
        Ok(())
    }

    /// Current viewport.
    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replace the viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Scroll the viewport to a document position.
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.viewport = self.viewport.with_scroll(x, y);
    }

    // --- Focus ---

    /// The focused element, if any.
    pub fn active_element(&self) -> Option<NodeId> {
        self.active.filter(|id| self.is_connected(*id))
    }

    /// Move focus without any policy checks. `None` blurs.
    pub fn set_active_element(&mut self, target: Option<NodeId>) -> DomResult<()> {
        if let Some(id) = target {
            self.element(id)?;
        }
        self.active = target;
        Ok(())
    }

    // --- Mutations ---

    /// Drain pending mutation records.
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        let records = self.mutations.drain();
        #[cfg(feature = "tracing")]
        {
            if !records.is_empty() {
                tracing::trace!(count = records.len(), "mutation records drained");
            }
        }
        records
    }

    /// Whether records are waiting to be observed.
    pub fn has_pending_mutations(&self) -> bool {
        !self.mutations.is_empty()
    }
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            style: InlineStyle::new(),
            size: Size::ZERO,
        }
    }
}

/// Pre-order descendant iterator.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let next = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(next).iter().rev().copied());
        Some(next)
    }
}
