//! Deterministic host for a [`SceneConfig`]: scroll, resize and pointer input in, visual state
//! out.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use crate::foundation::core::{Point, Viewport};
use crate::foundation::error::{ScrollFxError, ScrollFxResult};
use crate::render::label::LabelPainter;
use crate::render::surface::{FrameRGBA, Surface};
use crate::scene::config::{PointerEvent, SceneConfig, TimelineAction, TimelineStep};
use crate::scroll::page::Page;
use crate::scroll::progress::{ProgressHandle, ProgressTarget, ScrollHub, ScrollOffsets};
use crate::sequence::loader::{FrameLoader, FsLoader};
use crate::sequence::player::{DrawnFrame, FramePlayer};
use crate::units::parallax::Parallax;
use crate::units::progress_bar::ProgressBar;
use crate::units::reveal_group::{RevealGroup, RevealVisual};
use crate::units::tilt::{TiltCard, TiltFrame};
use crate::units::word_reveal::{WordReveal, WordVisual};

/// Fixed step used when a timeline advances time.
const TIMELINE_STEP: f64 = 1.0 / 60.0;
/// Fixed ticks per timeline step; any longer advance is applied as one final tick.
const MAX_TIMELINE_TICKS: u32 = 600;

struct Bound<T, E = String> {
    element: E,
    handle: ProgressHandle,
    unit: T,
}

struct Card {
    card: TiltCard,
    clicks: Rc<Cell<u32>>,
}

struct Sequence {
    handle: ProgressHandle,
    player: FramePlayer,
}

/// Every unit of one page wired to a shared [`ScrollHub`].
pub struct Scene {
    hub: ScrollHub,
    time: f64,
    progress_bar: Option<(ProgressHandle, ProgressBar)>,
    word_reveals: Vec<Bound<WordReveal, Option<String>>>,
    reveal_groups: Vec<Bound<RevealGroup>>,
    parallax: Vec<Bound<Parallax>>,
    cards: BTreeMap<String, Card>,
    sequence: Option<Sequence>,
    timeline: Vec<TimelineStep>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("hub", &self.hub)
            .field("time", &self.time)
            .field("word_reveals", &self.word_reveals.len())
            .field("reveal_groups", &self.reveal_groups.len())
            .field("parallax", &self.parallax.len())
            .field("cards", &self.cards.keys().collect::<Vec<_>>())
            .field("sequence", &self.sequence.as_ref().map(|s| &s.player))
            .finish_non_exhaustive()
    }
}

/// Visual state of a word reveal.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct WordRevealSnapshot {
    /// Tracked element; absent for whole-document progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    /// Source progress.
    pub progress: f64,
    /// Per-word opacities.
    pub words: Vec<WordVisual>,
}

/// Visual state of a reveal group.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RevealGroupSnapshot {
    /// Tracked element.
    pub element: String,
    /// Source progress.
    pub progress: f64,
    /// Per-child visuals.
    pub children: Vec<RevealVisual>,
}

/// Visual state of a parallax section.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ParallaxSnapshot {
    /// Tracked element.
    pub element: String,
    /// Source progress.
    pub progress: f64,
    /// Vertical offset in percent of the section height.
    pub offset_y_pct: f64,
}

/// Visual state of a tilt card.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TiltSnapshot {
    /// Rotation and highlight.
    #[serde(flatten)]
    pub frame: TiltFrame,
    /// Clicks received so far.
    pub clicks: u32,
}

/// State of the frame sequence player.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SequenceSnapshot {
    /// Whole-document progress feeding the player.
    pub progress: f64,
    /// Selected frame.
    pub current_index: u32,
    /// What the surface shows.
    pub last_drawn: Option<DrawnFrame>,
    /// Frames that reached a terminal state.
    pub completed: usize,
    /// Frames that failed to load.
    pub failed: usize,
    /// Every frame completed.
    pub ready: bool,
}

/// Serializable visual parameters of every unit at one instant.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SceneSnapshot {
    /// Simulated seconds since the scene started.
    pub time: f64,
    /// Current scroll offset.
    pub scroll_y: f64,
    /// Current viewport.
    pub viewport: Viewport,
    /// Raw whole-document progress.
    pub document_progress: f64,
    /// Smoothed indicator scale, when the indicator is enabled.
    pub progress_bar: Option<f64>,
    /// Word reveals in configuration order.
    pub word_reveals: Vec<WordRevealSnapshot>,
    /// Reveal groups in configuration order.
    pub reveal_groups: Vec<RevealGroupSnapshot>,
    /// Parallax sections in configuration order.
    pub parallax: Vec<ParallaxSnapshot>,
    /// Tilt cards by name.
    pub tilt_cards: BTreeMap<String, TiltSnapshot>,
    /// Frame sequence, when configured.
    pub sequence: Option<SequenceSnapshot>,
}

impl Scene {
    /// Build a scene whose frames are read from disk, relative to `assets_root`.
    pub fn new(config: &SceneConfig, assets_root: &Path) -> ScrollFxResult<Self> {
        let mut config = config.clone();
        if let Some(seq) = &mut config.sequence {
            seq.player.naming = seq.player.naming.rooted_at(assets_root);
        }
        Self::with_loader(&config, Box::new(FsLoader::new()))
    }

    /// Build a scene with an explicit frame loader.
    pub fn with_loader(
        config: &SceneConfig,
        loader: Box<dyn FrameLoader>,
    ) -> ScrollFxResult<Self> {
        config.validate()?;
        let mut page = Page::new(config.viewport, config.document_height)?;
        for (id, rect) in &config.elements {
            page.insert_element(id.clone(), *rect);
        }
        let mut hub = ScrollHub::new(page);

        let progress_bar = match config.progress_bar {
            Some(spring) => {
                let handle = hub.attach(ProgressTarget::WholeDocument, ScrollOffsets::default())?;
                let bar = ProgressBar::new(hub.progress(handle)?, spring)?;
                Some((handle, bar))
            }
            None => None,
        };

        let mut word_reveals = Vec::with_capacity(config.word_reveals.len());
        for def in &config.word_reveals {
            let unit = WordReveal::new(&def.text, def.config)?;
            let handle = match &def.element {
                Some(element) => attach_element(&mut hub, element, def.config.offsets)?,
                None => hub.attach(ProgressTarget::WholeDocument, ScrollOffsets::default())?,
            };
            word_reveals.push(Bound {
                element: def.element.clone(),
                handle,
                unit,
            });
        }

        let mut reveal_groups = Vec::with_capacity(config.reveal_groups.len());
        for def in &config.reveal_groups {
            let unit = RevealGroup::new(def.count, def.config)?;
            let handle = attach_element(&mut hub, &def.element, def.config.offsets)?;
            reveal_groups.push(Bound {
                element: def.element.clone(),
                handle,
                unit,
            });
        }

        let mut parallax = Vec::with_capacity(config.parallax.len());
        for def in &config.parallax {
            let unit = Parallax::new(def.config)?;
            let handle = attach_element(&mut hub, &def.element, def.config.offsets)?;
            parallax.push(Bound {
                element: def.element.clone(),
                handle,
                unit,
            });
        }

        let mut cards = BTreeMap::new();
        for def in &config.tilt_cards {
            let clicks = Rc::new(Cell::new(0));
            let counter = Rc::clone(&clicks);
            let card = TiltCard::new(
                def.bounds,
                def.config,
                Some(Box::new(move || counter.set(counter.get() + 1))),
            )?;
            cards.insert(def.name.clone(), Card { card, clicks });
        }

        let sequence = match &config.sequence {
            Some(def) => {
                let handle = hub.attach(ProgressTarget::WholeDocument, ScrollOffsets::default())?;
                let mut player = FramePlayer::create(def.frame_count, loader, def.player.clone())?;
                player.attach_surface(Surface::new(config.viewport)?);
                player.set_progress(hub.progress(handle)?, config.viewport)?;
                Some(Sequence { handle, player })
            }
            None => None,
        };

        tracing::debug!(
            word_reveals = word_reveals.len(),
            reveal_groups = reveal_groups.len(),
            parallax = parallax.len(),
            cards = cards.len(),
            sequence = sequence.is_some(),
            "scene built"
        );

        Ok(Self {
            hub,
            time: 0.0,
            progress_bar,
            word_reveals,
            reveal_groups,
            parallax,
            cards,
            sequence,
            timeline: config.timeline.clone(),
        })
    }

    /// Shared progress sources.
    pub fn hub(&self) -> &ScrollHub {
        &self.hub
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.hub.page().viewport()
    }

    /// Frame sequence player, when configured.
    pub fn player(&self) -> Option<&FramePlayer> {
        self.sequence.as_ref().map(|s| &s.player)
    }

    /// Use `labels` instead of the bundled font for placeholder text.
    pub fn set_label_painter(&mut self, labels: LabelPainter) {
        if let Some(seq) = &mut self.sequence {
            seq.player.set_label_painter(labels);
        }
    }

    /// Scroll to an absolute offset (clamped to the scrollable range).
    pub fn scroll_to(&mut self, y: f64) -> ScrollFxResult<()> {
        self.hub.on_scroll(y);
        self.push_document_progress(false)
    }

    /// Scroll so that whole-document progress equals `progress` (clamped to `[0, 1]`).
    pub fn scroll_to_progress(&mut self, progress: f64) -> ScrollFxResult<()> {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.scroll_to(p * self.hub.page().max_scroll())
    }

    /// Resize the viewport; the frame sequence repaints at the new size.
    pub fn resize(&mut self, viewport: Viewport) -> ScrollFxResult<()> {
        self.hub.on_resize(viewport);
        self.push_document_progress(true)
    }

    fn push_document_progress(&mut self, resized: bool) -> ScrollFxResult<()> {
        let viewport = self.viewport();
        if let Some((handle, bar)) = &mut self.progress_bar {
            bar.update(self.hub.progress(*handle)?);
        }
        if let Some(seq) = &mut self.sequence {
            let p = self.hub.progress(seq.handle)?;
            let drew = seq.player.set_progress(p, viewport)?;
            if resized && !drew {
                seq.player.on_resize(viewport)?;
            }
        }
        Ok(())
    }

    /// Deliver pointer input to the card called `card`.
    pub fn pointer(&mut self, card: &str, event: PointerEvent) -> ScrollFxResult<()> {
        let entry = self
            .cards
            .get_mut(card)
            .ok_or_else(|| ScrollFxError::config(format!("unknown tilt card '{card}'")))?;
        match event {
            PointerEvent::Enter => entry.card.pointer_enter(),
            PointerEvent::Move { x, y } => entry.card.pointer_move(Point::new(x, y)),
            PointerEvent::Leave => entry.card.pointer_leave(),
            PointerEvent::Click => entry.card.click(),
        }
        Ok(())
    }

    /// Advance springs by `dt` seconds and absorb finished frame loads.
    ///
    /// Returns `true` while any spring is still moving.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn tick(&mut self, dt: f64) -> ScrollFxResult<bool> {
        if dt.is_finite() && dt > 0.0 {
            self.time += dt;
        }
        let mut moving = false;
        if let Some((_, bar)) = &mut self.progress_bar {
            moving |= bar.tick(dt);
        }
        for entry in self.cards.values_mut() {
            moving |= entry.card.tick(dt);
        }
        let viewport = self.viewport();
        if let Some(seq) = &mut self.sequence {
            seq.player.pump(viewport)?;
        }
        Ok(moving)
    }

    /// Block until the frame sequence finished loading or `timeout` elapsed.
    pub fn wait_for_frames(&mut self, timeout: Duration) -> ScrollFxResult<bool> {
        let viewport = self.viewport();
        match &mut self.sequence {
            Some(seq) => seq.player.wait_until_ready(timeout, viewport),
            None => Ok(true),
        }
    }

    /// Pixels currently shown by the frame sequence.
    pub fn frame(&self) -> Option<FrameRGBA> {
        self.player()
            .and_then(FramePlayer::surface)
            .map(Surface::to_frame)
    }

    /// Apply the configured timeline, returning a snapshot after each step.
    pub fn run_timeline(&mut self) -> ScrollFxResult<Vec<SceneSnapshot>> {
        let steps = std::mem::take(&mut self.timeline);
        let mut out = Vec::with_capacity(steps.len());
        for step in &steps {
            let mut remaining = step.advance;
            let mut ticks = 0;
            while remaining > 0.0 {
                let dt = if ticks < MAX_TIMELINE_TICKS {
                    remaining.min(TIMELINE_STEP)
                } else {
                    remaining
                };
                self.tick(dt)?;
                remaining -= dt;
                ticks += 1;
            }
            match &step.action {
                TimelineAction::Scroll { y } => self.scroll_to(*y)?,
                TimelineAction::Resize { width, height } => {
                    self.resize(Viewport::new(*width, *height)?)?;
                }
                TimelineAction::Pointer { card, event } => self.pointer(card, *event)?,
                TimelineAction::Wait => {}
            }
            out.push(self.snapshot()?);
        }
        self.timeline = steps;
        Ok(out)
    }

    /// Visual parameters of every unit right now.
    pub fn snapshot(&self) -> ScrollFxResult<SceneSnapshot> {
        let page = self.hub.page();

        let mut word_reveals = Vec::with_capacity(self.word_reveals.len());
        for b in &self.word_reveals {
            let progress = self.hub.progress(b.handle)?;
            word_reveals.push(WordRevealSnapshot {
                element: b.element.clone(),
                progress,
                words: b.unit.sample(progress),
            });
        }

        let mut reveal_groups = Vec::with_capacity(self.reveal_groups.len());
        for b in &self.reveal_groups {
            let progress = self.hub.progress(b.handle)?;
            reveal_groups.push(RevealGroupSnapshot {
                element: b.element.clone(),
                progress,
                children: b.unit.sample(progress),
            });
        }

        let mut parallax = Vec::with_capacity(self.parallax.len());
        for b in &self.parallax {
            let progress = self.hub.progress(b.handle)?;
            parallax.push(ParallaxSnapshot {
                element: b.element.clone(),
                progress,
                offset_y_pct: b.unit.offset_y_pct(progress),
            });
        }

        let tilt_cards = self
            .cards
            .iter()
            .map(|(name, c)| {
                let snap = TiltSnapshot {
                    frame: c.card.frame(),
                    clicks: c.clicks.get(),
                };
                (name.clone(), snap)
            })
            .collect();

        let sequence = match &self.sequence {
            Some(seq) => Some(SequenceSnapshot {
                progress: self.hub.progress(seq.handle)?,
                current_index: seq.player.current_index(),
                last_drawn: seq.player.last_drawn(),
                completed: seq.player.sequence().completed(),
                failed: seq.player.sequence().failed(),
                ready: seq.player.is_ready(),
            }),
            None => None,
        };

        Ok(SceneSnapshot {
            time: self.time,
            scroll_y: page.scroll_y(),
            viewport: page.viewport(),
            document_progress: page.document_progress(),
            progress_bar: self.progress_bar.as_ref().map(|(_, bar)| bar.scale_x()),
            word_reveals,
            reveal_groups,
            parallax,
            tilt_cards,
            sequence,
        })
    }

    /// Release every progress source and tear the player down.
    pub fn destroy(mut self) -> ScrollFxResult<()> {
        let handles = self
            .progress_bar
            .iter()
            .map(|(h, _)| *h)
            .chain(self.word_reveals.iter().map(|b| b.handle))
            .chain(self.reveal_groups.iter().map(|b| b.handle))
            .chain(self.parallax.iter().map(|b| b.handle))
            .chain(self.sequence.iter().map(|s| s.handle))
            .collect::<Vec<_>>();
        for h in handles {
            self.hub.detach(h)?;
        }
        if let Some(seq) = self.sequence.take() {
            seq.player.destroy();
        }
        debug_assert_eq!(self.hub.source_count(), 0);
        Ok(())
    }
}

fn attach_element(
    hub: &mut ScrollHub,
    element: &str,
    offsets: ScrollOffsets,
) -> ScrollFxResult<ProgressHandle> {
    hub.attach(ProgressTarget::Element(element.to_string()), offsets)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/driver.rs"]
mod tests;
