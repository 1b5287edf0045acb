#![forbid(unsafe_code)]

//! Viewport centering for modal dialogs.
//!
//! Placement is computed once, at `showModal()` time, against the scroll
//! offset of that moment. Nothing re-centers on later scroll or resize.
//!
//! # Invariants
//!
//! - An author-specified `top` or `bottom` is never overwritten or cleared.
//! - A computed top is never above the viewport's top edge: a dialog taller
//!   than the viewport is pinned to `scroll_y`.
//! - On close, only the `top` this engine wrote is removed, and only if it
//!   still holds the value the engine wrote.

use dshim_core::style::{format_px, parse_px};
use dshim_core::{Document, DomResult, NodeId, Size, Viewport};

/// Result of placing a dialog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Document-space top edge, when known.
    pub top: Option<f64>,
    /// Document-space left edge the host stylesheet centers the dialog at.
    pub left: f64,
    /// Whether the engine wrote `top` itself.
    pub applied_top: bool,
}

impl Placement {
    /// Top edge relative to `viewport`.
    pub fn viewport_top(&self, viewport: &Viewport) -> Option<f64> {
        self.top.map(|top| viewport.to_viewport_y(top))
    }

    /// Left edge relative to `viewport`.
    pub fn viewport_left(&self, viewport: &Viewport) -> f64 {
        viewport.to_viewport_x(self.left)
    }
}

/// Centers a box of `size` in `viewport`, in document coordinates.
///
/// Returns `(top, left)`, each clamped to the viewport's scroll origin.
pub fn centered_origin(viewport: &Viewport, size: Size) -> (f64, f64) {
    let top = viewport.scroll_y + (viewport.height - size.height) / 2.0;
    let left = viewport.scroll_x + (viewport.width - size.width) / 2.0;
    (top.max(viewport.scroll_y), left.max(viewport.scroll_x))
}

/// Computes and applies modal placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositioningEngine;

impl PositioningEngine {
    pub fn new() -> Self {
        Self
    }

    /// Whether the author left the vertical position to the engine.
    pub fn needs_centering(&self, doc: &Document, dialog: NodeId) -> bool {
        doc.style(dialog, "top").is_none() && doc.style(dialog, "bottom").is_none()
    }

    /// Place `dialog`, writing an inline `top` unless the author set one.
    pub fn place(&self, doc: &mut Document, dialog: NodeId) -> DomResult<Placement> {
        let viewport = doc.viewport();
        let (top, left) = centered_origin(&viewport, doc.box_size(dialog));

        if !self.needs_centering(doc, dialog) {
            let author_top = doc.style(dialog, "top").and_then(parse_px);
            return Ok(Placement {
                top: author_top,
                left,
                applied_top: false,
            });
        }

        doc.set_style(dialog, "top", format_px(top))?;
        #[cfg(feature = "tracing")]
        tracing::debug!(dialog = %dialog, top, left, "centered modal dialog");
        Ok(Placement {
            top: Some(top),
            left,
            applied_top: true,
        })
    }

    /// Undo whatever [`place`](Self::place) wrote.
    pub fn clear(&self, doc: &mut Document, dialog: NodeId, placement: &Placement) -> DomResult<()> {
        if !placement.applied_top {
            return Ok(());
        }
        let Some(top) = placement.top else {
            return Ok(());
        };
        if doc.style(dialog, "top") == Some(format_px(top).as_str()) {
            doc.remove_style(dialog, "top")?;
        }
        Ok(())
    }
}
