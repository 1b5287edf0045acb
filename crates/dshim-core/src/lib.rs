#![forbid(unsafe_code)]

//! Host document collaborator for the dshim dialog engine.
//!
//! The dialog engine never talks to a browser directly. Everything it needs
//! from its host lives here:
//!
//! - [`Document`]: a node arena with attributes, inline style, box sizes,
//!   a scrollable [`Viewport`], and the active (focused) element.
//! - [`MutationRecord`]: structural and attribute changes queued by the
//!   document and delivered to observers one turn later.
//! - [`event`]: key events with legacy key-code decoding.
//! - [`query`]: stateless helpers (focusability, submit controls, closest
//!   ancestor lookups).
//! - [`style`]: inline style storage and pixel parsing.

pub mod document;
pub mod event;
pub mod geometry;
pub mod mutation;
pub mod query;
pub mod style;

pub use document::{Descendants, Document, DomError, DomResult, NodeId};
pub use event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use geometry::{Size, Viewport};
pub use mutation::{MutationQueue, MutationRecord};
pub use style::InlineStyle;
