#![forbid(unsafe_code)]

//! Geometry primitives in CSS pixels.

/// Width and height of an element's border box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// A zero-area size.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The visible window onto the document.
///
/// `scroll_x` / `scroll_y` are the document coordinates of the viewport's
/// top-left corner. Both are never negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}

impl Viewport {
    /// Create an unscrolled viewport.
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    /// Set the scroll offset, clamping negative values to zero.
    #[must_use]
    pub fn with_scroll(mut self, scroll_x: f64, scroll_y: f64) -> Self {
        self.scroll_x = scroll_x.max(0.0);
        self.scroll_y = scroll_y.max(0.0);
        self
    }

    /// Convert a document-space top coordinate to viewport space.
    #[inline]
    pub fn to_viewport_y(&self, document_y: f64) -> f64 {
        document_y - self.scroll_y
    }

    /// Convert a document-space left coordinate to viewport space.
    #[inline]
    pub fn to_viewport_x(&self, document_x: f64) -> f64 {
        document_x - self.scroll_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_viewport_is_unscrolled() {
        let vp = Viewport::default();
        assert_eq!(vp.scroll_x, 0.0);
        assert_eq!(vp.scroll_y, 0.0);
    }

    #[test]
    fn negative_scroll_clamps_to_zero() {
        let vp = Viewport::new(800.0, 600.0).with_scroll(-5.0, -10.0);
        assert_eq!(vp.scroll_x, 0.0);
        assert_eq!(vp.scroll_y, 0.0);
    }

    #[test]
    fn viewport_conversion_subtracts_scroll() {
        let vp = Viewport::new(800.0, 600.0).with_scroll(20.0, 200.0);
        assert_eq!(vp.to_viewport_y(250.0), 50.0);
        assert_eq!(vp.to_viewport_x(20.0), 0.0);
    }
}
