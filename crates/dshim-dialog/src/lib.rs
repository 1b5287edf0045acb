#![forbid(unsafe_code)]

//! Dialog element emulation.
//!
//! Makes an arbitrary element behave like a standards dialog: open/closed
//! state with `show()`/`showModal()`/`close()`, a stack of simultaneously
//! open modal dialogs with strict z-ordering, a per-dialog backdrop and a
//! shared overlay, focus containment while modal, one-shot viewport
//! centering, `cancel`/`close` notifications, and `method="dialog"` forms.
//!
//! # Example
//!
//! ```
//! use dshim_core::{Document, KeyCode, KeyEvent};
//! use dshim_dialog::{DialogHost, DialogState};
//!
//! let mut host = DialogHost::new(Document::default());
//! let dialog = host.document_mut().create_element("dialog");
//! let body = host.document().body();
//! host.document_mut().append_child(body, dialog).unwrap();
//!
//! host.register(dialog).unwrap();
//! host.show_modal(dialog).unwrap();
//! assert_eq!(host.topmost(), Some(dialog));
//!
//! host.key_down(body, KeyEvent::press(KeyCode::Escape)).unwrap();
//! assert_eq!(host.state(dialog).unwrap(), DialogState::Closed);
//! ```
//!
//! # Feature Flags
//!
//! - `tracing`: emit `tracing` events for registration, transitions, stack
//!   changes, focus redirects and bridge turns.

pub mod config;
pub mod error;
pub mod events;
pub mod focus;
pub mod form;
pub mod host;
pub mod observe;
pub mod position;
pub mod record;
pub mod stack;

pub use config::{DEFAULT_Z_BASE, DEFAULT_Z_INCREMENT, DialogConfig, HostCapabilities, MIN_Z_BASE};
pub use error::{DialogError, DialogResult, InvalidStateReason};
pub use events::{DialogEvent, DialogEventKind, Listener, ListenerId, Listeners};
pub use focus::FocusController;
pub use form::DialogSubmission;
pub use host::{ClickOutcome, Dialog, DialogHost, Registration};
pub use observe::{Observation, ObservationBridge, StructureObserver};
pub use position::{Placement, PositioningEngine, centered_origin};
pub use record::{DialogRecord, DialogState, EmulationMode};
pub use stack::ModalStack;
