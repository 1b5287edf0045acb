#![forbid(unsafe_code)]

//! Per-element dialog record and its transition rules.
//!
//! # State machine
//!
//! ```text
//!            show()                       showModal()
//!   Closed ─────────▶ OpenNonModal   Closed ─────────▶ OpenModal
//!     ▲                    │            ▲                  │
//!     └──── close() ───────┘            └──── close() ─────┘
//! ```
//!
//! There is no direct OpenNonModal ↔ OpenModal edge. Every other request
//! is rejected with [`InvalidStateReason`] and leaves the record untouched.

use dshim_core::{Document, NodeId};

use crate::error::InvalidStateReason;
use crate::position::Placement;

/// Lifecycle state of one dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DialogState {
    #[default]
    Closed,
    OpenNonModal,
    OpenModal,
}

impl DialogState {
    /// Whether the dialog is in the open set.
    #[inline]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }

    #[inline]
    pub const fn is_modal(self) -> bool {
        matches!(self, Self::OpenModal)
    }
}

/// How a record was installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmulationMode {
    /// The host has no dialog support; the engine owns all behaviour.
    Emulated,
    /// The host has native support but registration was forced.
    Forced,
}

/// State kept for one registered element.
#[derive(Debug, Clone)]
pub struct DialogRecord {
    element: NodeId,
    state: DialogState,
    return_value: String,
    previously_focused: Option<NodeId>,
    pub(crate) backdrop: Option<NodeId>,
    pub(crate) placement: Option<Placement>,
    mode: EmulationMode,
}

impl DialogRecord {
    pub(crate) fn new(element: NodeId, mode: EmulationMode) -> Self {
        Self {
            element,
            state: DialogState::Closed,
            return_value: String::new(),
            previously_focused: None,
            backdrop: None,
            placement: None,
            mode,
        }
    }

    #[inline]
    pub fn element(&self) -> NodeId {
        self.element
    }

    #[inline]
    pub fn state(&self) -> DialogState {
        self.state
    }

    #[inline]
    pub fn mode(&self) -> EmulationMode {
        self.mode
    }

    #[inline]
    pub fn return_value(&self) -> &str {
        &self.return_value
    }

    pub(crate) fn set_return_value(&mut self, value: impl Into<String>) {
        self.return_value = value.into();
    }

    /// The element focused when this dialog last opened, if it still exists.
    pub fn previously_focused(&self, doc: &Document) -> Option<NodeId> {
        self.previously_focused.filter(|id| doc.is_alive(*id))
    }

    /// The dialog's own backdrop while it is modal.
    #[inline]
    pub fn backdrop(&self) -> Option<NodeId> {
        self.backdrop
    }

    /// Where the positioning engine placed the dialog, while modal.
    #[inline]
    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    // --- Transition checks ---

    pub(crate) fn check_show(&self) -> Result<(), InvalidStateReason> {
        match self.state {
            DialogState::Closed => Ok(()),
            DialogState::OpenNonModal | DialogState::OpenModal => {
                Err(InvalidStateReason::AlreadyOpen)
            }
        }
    }

    pub(crate) fn check_show_modal(&self, connected: bool) -> Result<(), InvalidStateReason> {
        match self.state {
            DialogState::OpenNonModal => Err(InvalidStateReason::AlreadyOpenNonModal),
            DialogState::OpenModal => Err(InvalidStateReason::AlreadyOpen),
            DialogState::Closed if !connected => Err(InvalidStateReason::Disconnected),
            DialogState::Closed => Ok(()),
        }
    }

    pub(crate) fn check_close(&self) -> Result<(), InvalidStateReason> {
        if self.state.is_open() {
            Ok(())
        } else {
            Err(InvalidStateReason::AlreadyClosed)
        }
    }

    // --- Transitions (callers have already run the matching check) ---

    pub(crate) fn open(&mut self, state: DialogState, previously_focused: Option<NodeId>) {
        debug_assert!(state.is_open());
        self.state = state;
        self.previously_focused = previously_focused;
    }

    /// Move to Closed, handing back the backdrop and placement to tear down.
    pub(crate) fn close(&mut self) -> (Option<NodeId>, Option<Placement>) {
        self.state = DialogState::Closed;
        (self.backdrop.take(), self.placement.take())
    }
}
