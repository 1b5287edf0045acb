#![forbid(unsafe_code)]

//! The dialog engine entry point.
//!
//! `DialogHost` owns the document and every piece of shared dialog state:
//! per-element records, the modal stack, listeners and the observation
//! bridge. All mutation goes through `&mut self`, so a listener fired
//! synchronously from a transition always sees the finished state.
//!
//! # Deferred observation
//!
//! Changes made directly on the document (through [`DialogHost::document_mut`])
//! are queued, not acted on. [`DialogHost::tick`] runs one turn of the bridge;
//! [`DialogHost::settle`] runs turns until nothing is pending. The backdrop
//! and overlay queries settle first, so they never report stale placement.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `InvalidState` | Illegal transition | Error returned, record unchanged |
//! | `NotRegistered` | Element never registered (or native) | Error returned |
//! | `Dom` | Dead or foreign element passed in | Error returned |
//! | Bridge error | Node discarded between turns | Absorbed (logged under `tracing`) |

use ahash::AHashMap;
use dshim_core::query::is_focusable;
use dshim_core::{Document, KeyCode, KeyEvent, NodeId};

use crate::config::{DialogConfig, HostCapabilities};
use crate::error::{DialogError, DialogResult};
use crate::events::{DialogEvent, DialogEventKind, ListenerId, Listeners};
use crate::focus::FocusController;
use crate::form::{resolve_submission, submitter_for_click};
use crate::observe::{ObservationBridge, deliver};
use crate::position::PositioningEngine;
use crate::record::{DialogRecord, DialogState, EmulationMode};
use crate::stack::ModalStack;

/// Upper bound on bridge turns run by [`DialogHost::settle`].
const MAX_SETTLE_TURNS: usize = 4;

/// Result of [`DialogHost::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// A record was created.
    Installed(EmulationMode),
    /// The element already had a record; nothing changed.
    AlreadyRegistered,
    /// The host handles dialogs natively; nothing was installed.
    Native,
}

/// What happened to a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Delivered to the target unchanged.
    Delivered(NodeId),
    /// Landed on the overlay and was swallowed.
    Suppressed,
    /// Landed on a backdrop; delivered to its dialog, which took focus.
    Retargeted(NodeId),
    /// Activated a `method="dialog"` submit control, closing `dialog`.
    Submitted { dialog: NodeId, return_value: String },
}

/// Dialog engine bound to one document.
#[derive(Debug)]
pub struct DialogHost {
    document: Document,
    records: AHashMap<NodeId, DialogRecord>,
    stack: ModalStack,
    focus: FocusController,
    positioning: PositioningEngine,
    bridge: ObservationBridge,
    listeners: Listeners,
    config: DialogConfig,
}

impl Default for DialogHost {
    fn default() -> Self {
        Self::new(Document::default())
    }
}

impl DialogHost {
    /// Create a host with default configuration.
    pub fn new(document: Document) -> Self {
        Self::with_config(document, DialogConfig::default())
    }

    /// Create a host with explicit configuration.
    pub fn with_config(document: Document, config: DialogConfig) -> Self {
        Self {
            document,
            records: AHashMap::new(),
            stack: ModalStack::new(&config),
            focus: FocusController::new(),
            positioning: PositioningEngine::new(),
            bridge: ObservationBridge::new(),
            listeners: Listeners::new(),
            config,
        }
    }

    // --- Registration ---

    /// Register `element` as a dialog.
    ///
    /// Idempotent. When the host reports native dialog support, nothing is
    /// installed and [`Registration::Native`] is returned.
    pub fn register(&mut self, element: NodeId) -> DialogResult<Registration> {
        if self.records.contains_key(&element) {
            return Ok(Registration::AlreadyRegistered);
        }
        if self.config.capabilities.contains(HostCapabilities::NATIVE_DIALOG) {
            #[cfg(feature = "tracing")]
            tracing::debug!(element = %element, "native dialog support, registration skipped");
            return Ok(Registration::Native);
        }
        self.install(element, EmulationMode::Emulated)
    }

    /// Register `element` even when the host supports dialogs natively.
    pub fn force_register(&mut self, element: NodeId) -> DialogResult<Registration> {
        if self.records.contains_key(&element) {
            return Ok(Registration::AlreadyRegistered);
        }
        self.install(element, EmulationMode::Forced)
    }

    fn install(&mut self, element: NodeId, mode: EmulationMode) -> DialogResult<Registration> {
        self.document.set_attr(element, "role", self.config.role.as_str())?;

        let mut record = DialogRecord::new(element, mode);
        if self.document.has_attr(element, "open") {
            record.open(DialogState::OpenNonModal, None);
        }
        self.records.insert(element, record);
        self.bridge.watch(element);

        #[cfg(feature = "tracing")]
        tracing::debug!(element = %element, ?mode, "dialog registered");
        Ok(Registration::Installed(mode))
    }

    /// Whether `element` has a dialog record.
    pub fn is_registered(&self, element: NodeId) -> bool {
        self.records.contains_key(&element)
    }

    /// The record for a registered element.
    pub fn record(&self, element: NodeId) -> Option<&DialogRecord> {
        self.records.get(&element)
    }

    fn record_ref(&self, element: NodeId) -> DialogResult<&DialogRecord> {
        self.records
            .get(&element)
            .ok_or(DialogError::NotRegistered(element))
    }

    fn record_mut(&mut self, element: NodeId) -> DialogResult<&mut DialogRecord> {
        self.records
            .get_mut(&element)
            .ok_or(DialogError::NotRegistered(element))
    }

    /// Borrow a registered dialog through a handle.
    pub fn dialog(&mut self, element: NodeId) -> DialogResult<Dialog<'_>> {
        self.record_ref(element)?;
        Ok(Dialog {
            host: self,
            element,
        })
    }

    // --- Lifecycle ---

    /// Open `element` non-modally.
    pub fn show(&mut self, element: NodeId) -> DialogResult<()> {
        self.record_ref(element)?.check_show()?;
        self.open_non_modal(element)
    }

    fn open_non_modal(&mut self, element: NodeId) -> DialogResult<()> {
        if !self.document.has_attr(element, "open") {
            self.document.set_attr(element, "open", "")?;
        }
        let previous = self.focus.capture(&self.document);
        self.record_mut(element)?
            .open(DialogState::OpenNonModal, previous);
        self.focus
            .apply_initial(&mut self.document, &self.stack, element)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(element = %element, "dialog shown");
        Ok(())
    }

    /// Open `element` as the topmost modal dialog.
    pub fn show_modal(&mut self, element: NodeId) -> DialogResult<()> {
        let connected = self.document.is_connected(element);
        self.record_ref(element)?.check_show_modal(connected)?;

        let previous = self.focus.capture(&self.document);
        let backdrop = self.document.create_element("div");
        self.document
            .add_class(backdrop, &self.config.backdrop_class)?;
        if let Err(err) = self.stack.push(&mut self.document, element, backdrop) {
            self.document.discard(backdrop)?;
            return Err(err);
        }
        self.document.set_attr(element, "open", "")?;
        let placement = self.positioning.place(&mut self.document, element)?;

        let record = self.record_mut(element)?;
        record.open(DialogState::OpenModal, previous);
        record.backdrop = Some(backdrop);
        record.placement = Some(placement);

        self.focus
            .apply_initial(&mut self.document, &self.stack, element)?;
        self.focus.contain(&mut self.document, &self.stack)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            element = %element,
            depth = self.stack.depth(),
            z_index = ?self.stack.z_index(element),
            "dialog shown modally"
        );
        Ok(())
    }

    /// Close `element`, optionally setting its return value.
    pub fn close(&mut self, element: NodeId, return_value: Option<&str>) -> DialogResult<()> {
        self.record_ref(element)?.check_close()?;
        self.finish_close(element, return_value.map(str::to_owned))
    }

    fn finish_close(&mut self, element: NodeId, return_value: Option<String>) -> DialogResult<()> {
        let record = self.record_mut(element)?;
        if let Some(value) = return_value {
            record.set_return_value(value);
        }
        let was_modal = record.state().is_modal();
        let (backdrop, placement) = record.close();

        let alive = self.document.is_alive(element);
        if alive {
            self.document.remove_attr(element, "open")?;
        }
        if was_modal {
            self.stack.remove(&mut self.document, element)?;
        }
        if let Some(backdrop) = backdrop
            && self.document.is_alive(backdrop)
        {
            self.document.discard(backdrop)?;
        }
        if alive {
            if let Some(placement) = placement {
                self.positioning
                    .clear(&mut self.document, element, &placement)?;
            }
            self.focus.release(&mut self.document, element)?;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(element = %element, was_modal, depth = self.stack.depth(), "dialog closed");

        let mut event = DialogEvent::close(element);
        self.listeners.dispatch(&mut event, &self.stack);
        Ok(())
    }

    /// Whether `element` is open.
    pub fn is_open(&self, element: NodeId) -> DialogResult<bool> {
        Ok(self.record_ref(element)?.state().is_open())
    }

    /// Current lifecycle state.
    pub fn state(&self, element: NodeId) -> DialogResult<DialogState> {
        Ok(self.record_ref(element)?.state())
    }

    /// Write the `open` property: `true` sets the attribute, `false` removes it.
    pub fn set_open(&mut self, element: NodeId, open: bool) -> DialogResult<()> {
        if open {
            self.set_attribute(element, "open", "")
        } else {
            self.remove_attribute(element, "open")
        }
    }

    /// The dialog's return value. Survives reopening.
    pub fn return_value(&self, element: NodeId) -> DialogResult<&str> {
        Ok(self.record_ref(element)?.return_value())
    }

    /// Overwrite the return value, whatever the state.
    pub fn set_return_value(&mut self, element: NodeId, value: impl Into<String>) -> DialogResult<()> {
        self.record_mut(element)?.set_return_value(value);
        Ok(())
    }

    // --- Attributes ---

    /// Set an attribute, applying `open` semantics to registered dialogs.
    pub fn set_attribute(
        &mut self,
        element: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> DialogResult<()> {
        self.document.set_attr(element, name, value)?;
        if name.eq_ignore_ascii_case("open") && self.is_registered(element) {
            self.sync_open(element)?;
        }
        Ok(())
    }

    /// Remove an attribute, applying `open` semantics to registered dialogs.
    pub fn remove_attribute(&mut self, element: NodeId, name: &str) -> DialogResult<()> {
        self.document.remove_attr(element, name)?;
        if name.eq_ignore_ascii_case("open") && self.is_registered(element) {
            self.sync_open(element)?;
        }
        Ok(())
    }

    /// Bring the record in line with the presence of the `open` attribute.
    fn sync_open(&mut self, element: NodeId) -> DialogResult<()> {
        let has_attr = self.document.has_attr(element, "open");
        let is_open = self.record_ref(element)?.state().is_open();
        match (has_attr, is_open) {
            (true, false) => self.open_non_modal(element),
            (false, true) => self.finish_close(element, None),
            _ => Ok(()),
        }
    }

    // --- Listeners ---

    /// Attach a `cancel` or `close` listener to `element`.
    pub fn add_listener<F>(&mut self, element: NodeId, kind: DialogEventKind, callback: F) -> ListenerId
    where
        F: FnMut(&mut DialogEvent, &ModalStack) + 'static,
    {
        self.listeners.add(element, kind, callback)
    }

    /// Detach a listener. Returns `false` if the id is unknown.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // --- Input ---

    /// Handle a key press targeted at `target`.
    ///
    /// Returns `true` when the engine consumed the key.
    pub fn key_down(&mut self, target: NodeId, event: KeyEvent) -> DialogResult<bool> {
        if event.is_press_of(KeyCode::Tab) {
            return Ok(self
                .focus
                .handle_tab(&mut self.document, &self.stack, &event)?);
        }
        if !event.is_press_of(KeyCode::Escape) {
            return Ok(false);
        }

        let Some(top) = self.focus.trap_root(&self.document, &self.stack) else {
            return Ok(false);
        };
        let records = &self.records;
        let owner = self.document.closest(target, |_, node| {
            records.get(&node).is_some_and(|r| r.state().is_modal())
        });
        if owner.is_some_and(|owner| owner != top) {
            #[cfg(feature = "tracing")]
            tracing::debug!(node = %target, top = %top, "escape ignored inside lower modal");
            return Ok(false);
        }

        let mut cancel = DialogEvent::cancel(top);
        if self.listeners.dispatch(&mut cancel, &self.stack) {
            #[cfg(feature = "tracing")]
            tracing::debug!(element = %top, "cancel prevented");
            return Ok(true);
        }
        self.finish_close(top, None)?;
        Ok(true)
    }

    /// Dispatch a click on `target`.
    pub fn click(&mut self, target: NodeId) -> DialogResult<ClickOutcome> {
        if self.stack.is_overlay(target) {
            #[cfg(feature = "tracing")]
            tracing::debug!(node = %target, "overlay click suppressed");
            return Ok(ClickOutcome::Suppressed);
        }
        if let Some(dialog) = self.stack.dialog_for_backdrop(target) {
            self.focus
                .request(&mut self.document, &self.stack, dialog)?;
            return Ok(ClickOutcome::Retargeted(dialog));
        }
        if let Some((form, submitter)) = submitter_for_click(&self.document, target)
            && let Some(dialog) = self.submit_form(form, Some(submitter))?
        {
            let return_value = self.return_value(dialog)?.to_string();
            return Ok(ClickOutcome::Submitted {
                dialog,
                return_value,
            });
        }
        Ok(ClickOutcome::Delivered(target))
    }

    /// Request focus on `target`.
    ///
    /// Returns the element that received focus, or `None` when `target`
    /// cannot take focus and nothing changed.
    pub fn focus(&mut self, target: NodeId) -> DialogResult<Option<NodeId>> {
        let landed = self.focus.resolve(&self.document, &self.stack, target);
        let accepts = landed != target
            || self.records.contains_key(&target)
            || is_focusable(&self.document, target);
        if !accepts {
            return Ok(None);
        }
        self.focus
            .request(&mut self.document, &self.stack, target)
            .map(Some)
            .map_err(DialogError::from)
    }

    /// Submit `form`. A `method="dialog"` form closes its nearest open
    /// dialog; the submitter's `value` becomes the return value.
    ///
    /// Returns the dialog that was closed.
    pub fn submit_form(
        &mut self,
        form: NodeId,
        submitter: Option<NodeId>,
    ) -> DialogResult<Option<NodeId>> {
        let records = &self.records;
        let submission = resolve_submission(&self.document, form, submitter, |node| {
            records.get(&node).is_some_and(|r| r.state().is_open())
        });
        let Some(submission) = submission else {
            return Ok(None);
        };
        self.finish_close(submission.dialog, submission.return_value)?;
        Ok(Some(submission.dialog))
    }

    // --- Observation ---

    /// Run one turn of the observation bridge.
    ///
    /// Returns `true` if any queued change was processed.
    pub fn tick(&mut self) -> bool {
        let records = self.document.take_mutations();
        if records.is_empty() && !self.bridge.has_pending() {
            return self.prune_discarded();
        }
        deliver(&mut self.bridge, &records);
        let observation = self.bridge.take(&self.document);
        let pruned = self.prune_discarded();

        for element in &observation.open_changed {
            if let Err(_err) = self.sync_open(*element) {
                #[cfg(feature = "tracing")]
                tracing::warn!(element = %element, error = %_err, "open attribute sync failed");
            }
        }

        let restack = pruned
            || observation
                .moved
                .iter()
                .any(|element| self.stack.contains(*element));
        if restack && let Err(_err) = self.stack.reconcile(&mut self.document) {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_err, "modal stack reconcile failed");
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            records = records.len(),
            moved = observation.moved.len(),
            open_changed = observation.open_changed.len(),
            "observation turn"
        );
        true
    }

    /// Run bridge turns until no work is pending.
    pub fn settle(&mut self) {
        for _ in 0..MAX_SETTLE_TURNS {
            if !self.tick() {
                break;
            }
        }
    }

    /// Drop records whose element was discarded.
    fn prune_discarded(&mut self) -> bool {
        let dead: Vec<NodeId> = self
            .records
            .keys()
            .copied()
            .filter(|id| !self.document.is_alive(*id))
            .collect();
        for element in &dead {
            if let Some(mut record) = self.records.remove(element) {
                let (backdrop, _) = record.close();
                // Removing the entry detaches the backdrop; discard it too.
                let _ = self.stack.remove(&mut self.document, *element);
                if let Some(backdrop) = backdrop
                    && self.document.is_alive(backdrop)
                {
                    let _ = self.document.discard(backdrop);
                }
            }
            self.bridge.unwatch(*element);
            self.listeners.clear_target(*element);

            #[cfg(feature = "tracing")]
            tracing::debug!(element = %element, "discarded dialog pruned");
        }
        !dead.is_empty()
    }

    // --- Queries ---

    /// The backdrop of `element` while it is modal and attached.
    pub fn backdrop(&mut self, element: NodeId) -> Option<NodeId> {
        self.settle();
        self.records
            .get(&element)
            .and_then(DialogRecord::backdrop)
            .filter(|b| self.document.is_connected(*b))
    }

    /// The shared overlay while it is attached.
    pub fn overlay(&mut self) -> Option<NodeId> {
        self.settle();
        self.stack
            .overlay()
            .filter(|o| self.document.is_connected(*o))
    }

    /// The topmost modal dialog.
    pub fn topmost(&self) -> Option<NodeId> {
        self.stack.top()
    }

    /// The modal stack, bottom to top.
    #[inline]
    pub fn stack(&self) -> &ModalStack {
        &self.stack
    }

    /// The hosted document.
    #[inline]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable document access. Changes are observed on the next `tick()`.
    #[inline]
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Configuration fixed at construction.
    #[inline]
    pub fn config(&self) -> &DialogConfig {
        &self.config
    }
}

/// A registered dialog borrowed from its host.
#[derive(Debug)]
pub struct Dialog<'a> {
    host: &'a mut DialogHost,
    element: NodeId,
}

impl Dialog<'_> {
    /// The dialog element.
    #[inline]
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// See [`DialogHost::show`].
    pub fn show(&mut self) -> DialogResult<()> {
        self.host.show(self.element)
    }

    /// See [`DialogHost::show_modal`].
    pub fn show_modal(&mut self) -> DialogResult<()> {
        self.host.show_modal(self.element)
    }

    /// See [`DialogHost::close`].
    pub fn close(&mut self, return_value: Option<&str>) -> DialogResult<()> {
        self.host.close(self.element, return_value)
    }

    /// The `open` property: `true` unless closed.
    pub fn open(&self) -> bool {
        self.host.is_open(self.element).unwrap_or(false)
    }

    /// Write the `open` property.
    pub fn set_open(&mut self, open: bool) -> DialogResult<()> {
        self.host.set_open(self.element, open)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DialogState {
        self.host.state(self.element).unwrap_or_default()
    }

    /// The dialog's return value.
    pub fn return_value(&self) -> &str {
        self.host.return_value(self.element).unwrap_or_default()
    }

    /// Overwrite the return value.
    pub fn set_return_value(&mut self, value: impl Into<String>) -> DialogResult<()> {
        self.host.set_return_value(self.element, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidStateReason;

    fn host_with_dialog() -> (DialogHost, NodeId) {
        let mut host = DialogHost::default();
        let doc = host.document_mut();
        let body = doc.body();
        let el = doc.create_element("div");
        doc.append_child(body, el).unwrap();
        host.register(el).unwrap();
        (host, el)
    }

    #[test]
    fn register_sets_role_and_is_idempotent() {
        let (mut host, el) = host_with_dialog();
        assert_eq!(host.document().attr(el, "role"), Some("dialog"));
        assert_eq!(host.register(el).unwrap(), Registration::AlreadyRegistered);
    }

    #[test]
    fn native_hosts_skip_plain_registration() {
        let config = DialogConfig::default().capabilities(HostCapabilities::NATIVE_DIALOG);
        let mut host = DialogHost::with_config(Document::default(), config);
        let el = host.document_mut().create_element("dialog");
        assert_eq!(host.register(el).unwrap(), Registration::Native);
        assert!(!host.is_registered(el));
        assert_eq!(
            host.force_register(el).unwrap(),
            Registration::Installed(EmulationMode::Forced)
        );
        assert_eq!(host.record(el).map(DialogRecord::mode), Some(EmulationMode::Forced));
    }

    #[test]
    fn register_dead_node_fails() {
        let mut host = DialogHost::default();
        let el = host.document_mut().create_element("dialog");
        host.document_mut().discard(el).unwrap();
        assert!(matches!(host.register(el), Err(DialogError::Dom(_))));
    }

    #[test]
    fn preexisting_open_attribute_starts_open() {
        let mut host = DialogHost::default();
        let el = host.document_mut().create_element("dialog");
        host.document_mut().set_attr(el, "open", "").unwrap();
        host.register(el).unwrap();
        assert_eq!(host.state(el).unwrap(), DialogState::OpenNonModal);
    }

    #[test]
    fn unregistered_operations_fail() {
        let mut host = DialogHost::default();
        let el = host.document_mut().create_element("dialog");
        assert_eq!(host.show(el), Err(DialogError::NotRegistered(el)));
        assert!(host.dialog(el).is_err());
    }

    #[test]
    fn show_then_close() {
        let (mut host, el) = host_with_dialog();
        host.show(el).unwrap();
        assert!(host.is_open(el).unwrap());
        assert!(host.document().has_attr(el, "open"));
        assert!(host.stack().is_empty());

        host.close(el, Some("done")).unwrap();
        assert!(!host.document().has_attr(el, "open"));
        assert_eq!(host.return_value(el).unwrap(), "done");
        assert_eq!(
            host.close(el, None),
            Err(DialogError::InvalidState(InvalidStateReason::AlreadyClosed))
        );
    }

    #[test]
    fn show_allowed_when_disconnected() {
        let mut host = DialogHost::default();
        let el = host.document_mut().create_element("dialog");
        host.register(el).unwrap();
        host.show(el).unwrap();
        assert!(host.is_open(el).unwrap());
    }

    #[test]
    fn show_modal_requires_connection() {
        let mut host = DialogHost::default();
        let el = host.document_mut().create_element("dialog");
        host.register(el).unwrap();
        assert_eq!(
            host.show_modal(el),
            Err(DialogError::InvalidState(InvalidStateReason::Disconnected))
        );
        assert_eq!(host.state(el).unwrap(), DialogState::Closed);
    }

    #[test]
    fn modal_close_removes_backdrop_and_overlay() {
        let (mut host, el) = host_with_dialog();
        host.show_modal(el).unwrap();
        let backdrop = host.backdrop(el).unwrap();
        assert!(host.overlay().is_some());

        host.close(el, None).unwrap();
        assert!(!host.document().is_alive(backdrop));
        assert!(host.overlay().is_none());
        assert_eq!(host.document().style(el, "z-index"), None);
    }

    #[test]
    fn set_open_follows_attribute_rules() {
        let (mut host, el) = host_with_dialog();
        host.set_open(el, true).unwrap();
        assert_eq!(host.state(el).unwrap(), DialogState::OpenNonModal);
        host.set_open(el, true).unwrap();
        host.set_open(el, false).unwrap();
        assert_eq!(host.state(el).unwrap(), DialogState::Closed);
        host.set_open(el, false).unwrap();
    }

    #[test]
    fn handle_forwards_operations() {
        let (mut host, el) = host_with_dialog();
        let mut dialog = host.dialog(el).unwrap();
        dialog.set_return_value("kept").unwrap();
        dialog.show_modal().unwrap();
        assert!(dialog.open());
        assert_eq!(dialog.state(), DialogState::OpenModal);
        dialog.close(None).unwrap();
        assert_eq!(dialog.return_value(), "kept");
    }

    #[test]
    fn settle_terminates_with_no_work() {
        let (mut host, _el) = host_with_dialog();
        host.settle();
        assert!(!host.tick());
    }
}
