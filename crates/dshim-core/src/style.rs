#![forbid(unsafe_code)]

//! Inline style storage.
//!
//! Property names are stored lowercased in insertion order. Values are kept
//! verbatim; [`parse_px`] and [`format_px`] convert pixel lengths.

/// An element's inline `style` declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Create an empty declaration block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a property value.
    pub fn get(&self, property: &str) -> Option<&str> {
        let property = property.to_ascii_lowercase();
        self.declarations
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Set a property. An empty value removes the declaration.
    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        let property = property.to_ascii_lowercase();
        let value = value.into();
        if value.trim().is_empty() {
            self.remove(&property);
            return;
        }
        match self.declarations.iter_mut().find(|(name, _)| *name == property) {
            Some((_, existing)) => *existing = value,
            None => self.declarations.push((property, value)),
        }
    }

    /// Remove a property, returning its previous value.
    pub fn remove(&mut self, property: &str) -> Option<String> {
        let property = property.to_ascii_lowercase();
        let idx = self.declarations.iter().position(|(name, _)| *name == property)?;
        Some(self.declarations.remove(idx).1)
    }

    /// Whether the block has no declarations.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Iterate declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Parse a CSS pixel length such as `"12px"`, `"12.5px"` or a bare `"0"`.
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    if number.is_empty() {
        return None;
    }
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Format a pixel length for an inline style.
pub fn format_px(value: f64) -> String {
    format!("{value}px")
}
