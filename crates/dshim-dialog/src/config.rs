#![forbid(unsafe_code)]

//! Engine configuration.

use bitflags::bitflags;

/// Default z-index for the first modal dialog.
pub const DEFAULT_Z_BASE: u32 = 100_000;

/// Lowest accepted `z_base`: the first dialog's backdrop and the overlay
/// sit one and two below it.
pub const MIN_Z_BASE: u32 = 2;

/// Default spacing between consecutive modal dialogs. Leaves room for the
/// backdrop (`z - 1`) and overlay (`z - 2`) of the dialog above.
pub const DEFAULT_Z_INCREMENT: u32 = 10;

bitflags! {
    /// What the host already provides natively, resolved once per
    /// registration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HostCapabilities: u8 {
        /// The host has its own (possibly partial) dialog implementation.
        /// Plain registration defers to it; forced registration overrides.
        const NATIVE_DIALOG = 0b0001;
    }
}

/// Dialog engine configuration.
///
/// # Invariants
///
/// - `z_increment >= 3`, so a dialog's backdrop and the overlay always fit
///   strictly between it and the dialog below.
/// - `z_base >= MIN_Z_BASE`, so neither goes below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogConfig {
    /// z-index of the first modal dialog after the stack empties.
    pub z_base: u32,
    /// Gap between consecutive modal dialogs.
    pub z_increment: u32,
    /// Class given to each per-dialog backdrop element.
    pub backdrop_class: String,
    /// Class given to the shared overlay element.
    pub overlay_class: String,
    /// Role attribute value set on every registered element.
    pub role: String,
    /// Host capabilities.
    pub capabilities: HostCapabilities,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            z_base: DEFAULT_Z_BASE,
            z_increment: DEFAULT_Z_INCREMENT,
            backdrop_class: "backdrop".to_string(),
            overlay_class: "_dialog_overlay".to_string(),
            role: "dialog".to_string(),
            capabilities: HostCapabilities::empty(),
        }
    }
}

impl DialogConfig {
    /// Set the z-index of the first modal dialog (raised to [`MIN_Z_BASE`]).
    pub fn z_base(mut self, base: u32) -> Self {
        self.z_base = base.max(MIN_Z_BASE);
        self
    }

    /// Set the gap between dialogs (values below 3 are raised to 3).
    pub fn z_increment(mut self, increment: u32) -> Self {
        self.z_increment = increment.max(3);
        self
    }

    /// Class given to backdrop elements.
    pub fn backdrop_class(mut self, class: impl Into<String>) -> Self {
        self.backdrop_class = class.into();
        self
    }

    /// Class given to the shared overlay.
    pub fn overlay_class(mut self, class: impl Into<String>) -> Self {
        self.overlay_class = class.into();
        self
    }

    /// Role attribute set on registered elements.
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Declare what the host provides natively.
    pub fn capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}
