use std::collections::BTreeMap;

use crate::foundation::core::Viewport;
use crate::foundation::error::{ScrollFxError, ScrollFxResult};

/// Vertical extent of a tracked element in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementRect {
    /// Distance from the document top to the element top.
    pub top: f64,
    /// Element height.
    pub height: f64,
}

impl ElementRect {
    /// Create a validated rect.
    pub fn new(top: f64, height: f64) -> ScrollFxResult<Self> {
        if !top.is_finite() || !height.is_finite() || height < 0.0 {
            return Err(ScrollFxError::validation(
                "element rect must be finite with height >= 0",
            ));
        }
        Ok(Self { top, height })
    }
}

/// Scroll geometry of one page: viewport, document extent, scroll offset and tracked elements.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    viewport: Viewport,
    document_height: f64,
    scroll_y: f64,
    elements: BTreeMap<String, ElementRect>,
}

impl Page {
    /// A page scrolled to the top.
    pub fn new(viewport: Viewport, document_height: f64) -> ScrollFxResult<Self> {
        let mut page = Self {
            viewport,
            document_height: 0.0,
            scroll_y: 0.0,
            elements: BTreeMap::new(),
        };
        page.set_document_height(document_height)?;
        Ok(page)
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Total document height.
    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    /// Current scroll offset, always within `[0, max_scroll]`.
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Largest reachable scroll offset.
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport.height).max(0.0)
    }

    /// Scroll to `y`, clamped to the scrollable range. Non-finite offsets are ignored.
    pub fn set_scroll_y(&mut self, y: f64) {
        if !y.is_finite() {
            return;
        }
        self.scroll_y = y.clamp(0.0, self.max_scroll());
    }

    /// Replace the viewport and re-clamp the scroll offset.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll());
    }

    /// Replace the document height and re-clamp the scroll offset.
    pub fn set_document_height(&mut self, height: f64) -> ScrollFxResult<()> {
        if !height.is_finite() || height < 0.0 {
            return Err(ScrollFxError::validation(
                "document height must be finite and >= 0",
            ));
        }
        self.document_height = height;
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll());
        Ok(())
    }

    /// Register or move a tracked element.
    pub fn insert_element(&mut self, id: impl Into<String>, rect: ElementRect) {
        self.elements.insert(id.into(), rect);
    }

    /// Forget a tracked element, returning its last rect.
    pub fn remove_element(&mut self, id: &str) -> Option<ElementRect> {
        self.elements.remove(id)
    }

    /// Look up a tracked element.
    pub fn element(&self, id: &str) -> Option<ElementRect> {
        self.elements.get(id).copied()
    }

    /// Whole-document progress: 0 at the top, 1 at the bottom, 0 if the page cannot scroll.
    pub fn document_progress(&self) -> f64 {
        let max = self.max_scroll();
        if max <= 0.0 {
            return 0.0;
        }
        (self.scroll_y / max).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/page.rs"]
mod tests;
