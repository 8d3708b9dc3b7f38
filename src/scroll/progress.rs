//! Scroll progress subscriptions.
//!
//! A [`ScrollHub`] owns the [`Page`] geometry and every progress subscription attached to it.
//! Hosts forward scroll and resize events; each event recomputes all live subscriptions
//! synchronously, and units read their latest value through a [`ProgressHandle`].
//!
//! Whole-document subscribers share one sampler. It is created by the first whole-document
//! attach and dropped by the last detach.

use crate::foundation::core::Viewport;
use crate::foundation::error::{ScrollFxError, ScrollFxResult};
use crate::scroll::page::{ElementRect, Page};

/// One trigger edge: the point `element` (fraction of the element height, from its top) meets
/// the line `viewport` (fraction of the viewport height, from its top).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OffsetEdge {
    /// Anchor inside the element, `0` = top, `1` = bottom.
    pub element: f64,
    /// Anchor inside the viewport, `0` = top, `1` = bottom.
    pub viewport: f64,
}

impl OffsetEdge {
    /// Element top meets viewport bottom.
    pub const START_END: Self = Self::new(0.0, 1.0);
    /// Element bottom meets viewport top.
    pub const END_START: Self = Self::new(1.0, 0.0);
    /// Element top meets viewport top.
    pub const START_START: Self = Self::new(0.0, 0.0);
    /// Element bottom meets viewport bottom.
    pub const END_END: Self = Self::new(1.0, 1.0);

    /// Edge from explicit anchors.
    pub const fn new(element: f64, viewport: f64) -> Self {
        Self { element, viewport }
    }

    /// Document scroll offset at which this edge is crossed.
    fn scroll_at(self, rect: ElementRect, viewport: Viewport) -> f64 {
        rect.top + self.element * rect.height - self.viewport * viewport.height
    }
}

/// Entry (progress 0) and exit (progress 1) edges of an element-relative source.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollOffsets {
    /// Edge that maps to progress 0.
    pub entry: OffsetEdge,
    /// Edge that maps to progress 1.
    pub exit: OffsetEdge,
}

impl Default for ScrollOffsets {
    /// Track the whole time the element intersects the viewport.
    fn default() -> Self {
        Self {
            entry: OffsetEdge::START_END,
            exit: OffsetEdge::END_START,
        }
    }
}

impl ScrollOffsets {
    /// Offsets from explicit edges.
    pub const fn new(entry: OffsetEdge, exit: OffsetEdge) -> Self {
        Self { entry, exit }
    }

    fn validate(&self) -> ScrollFxResult<()> {
        let all = [
            self.entry.element,
            self.entry.viewport,
            self.exit.element,
            self.exit.viewport,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(ScrollFxError::validation("scroll offsets must be finite"));
        }
        Ok(())
    }

    /// Progress of `rect` at the page's current scroll offset.
    ///
    /// Coinciding edges make a step: 0 before, 1 at or after.
    pub fn progress(&self, rect: ElementRect, page: &Page) -> f64 {
        let viewport = page.viewport();
        let start = self.entry.scroll_at(rect, viewport);
        let end = self.exit.scroll_at(rect, viewport);
        let span = end - start;
        let y = page.scroll_y();
        if span == 0.0 {
            return if y >= start { 1.0 } else { 0.0 };
        }
        ((y - start) / span).clamp(0.0, 1.0)
    }
}

/// What a progress source tracks.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProgressTarget {
    /// Whole-document scroll.
    WholeDocument,
    /// A tracked element by id.
    Element(String),
}

/// Token for one attached progress source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgressHandle {
    slot: u32,
    generation: u32,
}

#[derive(Clone, Debug)]
enum Source {
    Document,
    Element {
        id: String,
        offsets: ScrollOffsets,
        value: f64,
    },
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    source: Option<Source>,
}

#[derive(Clone, Copy, Debug)]
struct DocumentSampler {
    value: f64,
    subscribers: usize,
}

/// Owner of page geometry and the progress sources attached to it.
#[derive(Debug)]
pub struct ScrollHub {
    page: Page,
    document: Option<DocumentSampler>,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl ScrollHub {
    /// Take ownership of `page`.
    pub fn new(page: Page) -> Self {
        Self {
            page,
            document: None,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Read-only page geometry.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Attach a progress source.
    ///
    /// Fails with a configuration error when `target` names an element the page does not track.
    pub fn attach(
        &mut self,
        target: ProgressTarget,
        offsets: ScrollOffsets,
    ) -> ScrollFxResult<ProgressHandle> {
        let source = match target {
            ProgressTarget::WholeDocument => {
                if let Some(sampler) = &mut self.document {
                    sampler.subscribers += 1;
                } else {
                    tracing::debug!("document scroll sampler started");
                    self.document = Some(DocumentSampler {
                        value: self.page.document_progress(),
                        subscribers: 1,
                    });
                }
                Source::Document
            }
            ProgressTarget::Element(id) => {
                offsets.validate()?;
                let rect = self.page.element(&id).ok_or_else(|| {
                    ScrollFxError::config(format!("progress target element '{id}' not found"))
                })?;
                let value = offsets.progress(rect, &self.page);
                Source::Element { id, offsets, value }
            }
        };

        let slot = match self.free.pop() {
            Some(i) => i,
            None => {
                let i = u32::try_from(self.slots.len())
                    .map_err(|_| ScrollFxError::config("too many progress sources"))?;
                self.slots.push(Slot {
                    generation: 0,
                    source: None,
                });
                i
            }
        };
        let entry = &mut self.slots[slot as usize];
        entry.source = Some(source);
        Ok(ProgressHandle {
            slot,
            generation: entry.generation,
        })
    }

    /// Release a progress source. Stale or foreign handles are a configuration error.
    pub fn detach(&mut self, handle: ProgressHandle) -> ScrollFxResult<()> {
        let entry = self.slot_mut(handle)?;
        let source = entry.source.take();
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(handle.slot);

        if let Some(Source::Document) = source
            && let Some(sampler) = &mut self.document
        {
            sampler.subscribers -= 1;
            if sampler.subscribers == 0 {
                tracing::debug!("document scroll sampler stopped");
                self.document = None;
            }
        }
        Ok(())
    }

    /// Latest progress for `handle`.
    pub fn progress(&self, handle: ProgressHandle) -> ScrollFxResult<f64> {
        match self.source(handle)? {
            Source::Document => Ok(self.document.map(|d| d.value).unwrap_or(0.0)),
            Source::Element { value, .. } => Ok(*value),
        }
    }

    /// Number of live progress sources.
    pub fn source_count(&self) -> usize {
        self.slots.iter().filter(|s| s.source.is_some()).count()
    }

    /// Whether the shared whole-document sampler currently exists.
    pub fn document_sampler_live(&self) -> bool {
        self.document.is_some()
    }

    /// Scroll event.
    pub fn on_scroll(&mut self, scroll_y: f64) {
        self.page.set_scroll_y(scroll_y);
        self.recompute();
    }

    /// Resize event.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.page.set_viewport(viewport);
        self.recompute();
    }

    /// Document height change (content reflow).
    pub fn on_document_resize(&mut self, document_height: f64) -> ScrollFxResult<()> {
        self.page.set_document_height(document_height)?;
        self.recompute();
        Ok(())
    }

    /// Register or move a tracked element.
    pub fn set_element(&mut self, id: impl Into<String>, rect: ElementRect) {
        self.page.insert_element(id, rect);
        self.recompute();
    }

    /// Forget a tracked element. Sources bound to it keep their last value.
    pub fn remove_element(&mut self, id: &str) -> Option<ElementRect> {
        self.page.remove_element(id)
    }

    fn recompute(&mut self) {
        if let Some(sampler) = &mut self.document {
            sampler.value = self.page.document_progress();
        }
        for slot in &mut self.slots {
            let Some(Source::Element { id, offsets, value }) = &mut slot.source else {
                continue;
            };
            let Some(rect) = self.page.element(id) else {
                continue;
            };
            *value = offsets.progress(rect, &self.page);
        }
    }

    fn source(&self, handle: ProgressHandle) -> ScrollFxResult<&Source> {
        self.slots
            .get(handle.slot as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.source.as_ref())
            .ok_or_else(|| ScrollFxError::config("unknown or detached progress handle"))
    }

    fn slot_mut(&mut self, handle: ProgressHandle) -> ScrollFxResult<&mut Slot> {
        self.slots
            .get_mut(handle.slot as usize)
            .filter(|s| s.generation == handle.generation && s.source.is_some())
            .ok_or_else(|| ScrollFxError::config("unknown or detached progress handle"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/progress.rs"]
mod tests;
