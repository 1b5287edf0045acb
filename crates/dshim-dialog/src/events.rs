#![forbid(unsafe_code)]

//! Lifecycle notifications: `cancel` and `close`.
//!
//! Listeners are attached per dialog element and run synchronously, in
//! registration order. They receive the event and a read-only view of the
//! modal stack as it stands after the transition that fired them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use dshim_core::NodeId;

use crate::stack::ModalStack;

/// Global counter for listener ids.
static LISTENER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Kind of lifecycle notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogEventKind {
    /// Fired before an Escape-triggered close. Cancelable.
    Cancel,
    /// Fired after the dialog reached Closed. Not cancelable.
    Close,
}

impl fmt::Display for DialogEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancel => f.write_str("cancel"),
            Self::Close => f.write_str("close"),
        }
    }
}

/// A lifecycle notification delivered to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogEvent {
    kind: DialogEventKind,
    target: NodeId,
    cancelable: bool,
    default_prevented: bool,
}

impl DialogEvent {
    /// A cancelable `cancel` event for `target`.
    pub fn cancel(target: NodeId) -> Self {
        Self {
            kind: DialogEventKind::Cancel,
            target,
            cancelable: true,
            default_prevented: false,
        }
    }

    /// A non-cancelable `close` event for `target`.
    pub fn close(target: NodeId) -> Self {
        Self {
            kind: DialogEventKind::Close,
            target,
            cancelable: false,
            default_prevented: false,
        }
    }

    #[inline]
    pub fn kind(&self) -> DialogEventKind {
        self.kind
    }

    /// The dialog element the event is about.
    #[inline]
    pub fn target(&self) -> NodeId {
        self.target
    }

    #[inline]
    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Ask the engine to skip the default action. Ignored unless cancelable.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    #[inline]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Handle returned by listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn new() -> Self {
        Self(LISTENER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Callback type for lifecycle listeners.
pub type Listener = Box<dyn FnMut(&mut DialogEvent, &ModalStack)>;

struct Registered {
    id: ListenerId,
    kind: DialogEventKind,
    callback: Listener,
}

/// Listener table keyed by dialog element.
#[derive(Default)]
pub struct Listeners {
    table: AHashMap<NodeId, Vec<Registered>>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("targets", &self.table.len())
            .field("total", &self.len())
            .finish()
    }
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `callback` for `kind` events on `target`.
    pub fn add<F>(&mut self, target: NodeId, kind: DialogEventKind, callback: F) -> ListenerId
    where
        F: FnMut(&mut DialogEvent, &ModalStack) + 'static,
    {
        let id = ListenerId::new();
        self.table.entry(target).or_default().push(Registered {
            id,
            kind,
            callback: Box::new(callback),
        });
        id
    }

    /// Detach a listener. Returns `false` if the id is unknown.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let mut found = false;
        self.table.retain(|_, list| {
            let before = list.len();
            list.retain(|r| r.id != id);
            found |= list.len() != before;
            !list.is_empty()
        });
        found
    }

    /// Drop every listener attached to `target`.
    pub fn clear_target(&mut self, target: NodeId) {
        self.table.remove(&target);
    }

    /// Total number of attached listeners.
    pub fn len(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    /// Whether no listener is attached.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Run every matching listener. Returns `true` if default was prevented.
    pub fn dispatch(&mut self, event: &mut DialogEvent, stack: &ModalStack) -> bool {
        let kind = event.kind;
        if let Some(list) = self.table.get_mut(&event.target) {
            for registered in list.iter_mut().filter(|r| r.kind == kind) {
                (registered.callback)(event, stack);
            }
        }
        event.default_prevented()
    }
}
