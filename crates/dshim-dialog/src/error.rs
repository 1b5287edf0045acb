#![forbid(unsafe_code)]

//! Errors raised by dialog operations.
//!
//! Every error is raised synchronously at the call that caused it. Nothing
//! is retried, and the record is left exactly as it was before the call.

use std::fmt;

use dshim_core::{DomError, NodeId};

/// Why a transition was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidStateReason {
    /// `show()`/`showModal()` on a dialog that is already open.
    AlreadyOpen,
    /// `showModal()` on a dialog that is open non-modally.
    AlreadyOpenNonModal,
    /// `close()` on a closed dialog.
    AlreadyClosed,
    /// `showModal()` on an element outside the document.
    Disconnected,
}

impl fmt::Display for InvalidStateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::AlreadyOpen => "the dialog is already open",
            Self::AlreadyOpenNonModal => {
                "the dialog is already open as a non-modal dialog and cannot be made modal"
            }
            Self::AlreadyClosed => "the dialog is already closed",
            Self::Disconnected => "the element is not in a document",
        };
        f.write_str(msg)
    }
}

/// Errors from dialog operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    /// Illegal lifecycle transition.
    InvalidState(InvalidStateReason),
    /// The element was never registered as a dialog.
    NotRegistered(NodeId),
    /// The underlying document rejected an operation.
    Dom(DomError),
    /// No z-index above the current topmost modal is left to assign.
    StackingExhausted { depth: usize },
}

impl DialogError {
    /// Whether this is an `InvalidState` fault.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}

impl fmt::Display for DialogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState(reason) => write!(f, "invalid state: {reason}"),
            Self::NotRegistered(id) => write!(f, "{id} is not a registered dialog"),
            Self::Dom(err) => write!(f, "document error: {err}"),
            Self::StackingExhausted { depth } => {
                write!(f, "no z-index left above {depth} open modal dialogs")
            }
        }
    }
}

impl std::error::Error for DialogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Dom(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomError> for DialogError {
    fn from(err: DomError) -> Self {
        Self::Dom(err)
    }
}

impl From<InvalidStateReason> for DialogError {
    fn from(reason: InvalidStateReason) -> Self {
        Self::InvalidState(reason)
    }
}

/// Result alias for dialog operations.
pub type DialogResult<T> = Result<T, DialogError>;
