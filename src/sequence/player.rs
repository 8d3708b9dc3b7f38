//! Scroll-scrubbed image sequence drawn onto a [`Surface`].

use std::time::Duration;

use crate::foundation::core::{Affine, Point, Rect, Rgba8, Size, Viewport};
use crate::foundation::error::ScrollFxResult;
use crate::render::label::{LabelPainter, LabelStyle};
use crate::render::paint::{FramePaint, affine_to_cpu, color_to_cpu, shape_to_cpu};
use crate::render::surface::Surface;
use crate::sequence::cover::cover_fit;
use crate::sequence::frames::{FrameNaming, FrameSequence, FrameState};
use crate::sequence::loader::{FrameLoader, FrameRequest, wait_until};

/// Presentation settings for a [`FramePlayer`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayerOpts {
    /// Where frames are loaded from.
    pub naming: FrameNaming,
    /// Fill behind frames and placeholders.
    pub background: Rgba8,
    /// Placeholder circle color.
    pub placeholder_fill: Rgba8,
    /// Placeholder circle radius for index 0.
    pub placeholder_radius: f64,
    /// Radius added per frame index.
    pub placeholder_radius_step: f64,
    /// Placeholder label, followed by the frame index.
    pub label_prefix: String,
    /// Label style.
    pub label: LabelStyle,
    /// Label baseline below the surface center.
    pub label_offset_y: f64,
    /// Caption under the label. `None` names the expected frame files.
    pub caption: Option<String>,
    /// Caption style.
    pub caption_style: LabelStyle,
    /// Caption baseline below the surface center.
    pub caption_offset_y: f64,
}

impl Default for PlayerOpts {
    fn default() -> Self {
        Self {
            naming: FrameNaming::default(),
            background: Rgba8::rgb(0x0a, 0x0f, 0x25),
            placeholder_fill: Rgba8::rgb(0x00, 0x66, 0xff),
            placeholder_radius: 50.0,
            placeholder_radius_step: 2.0,
            label_prefix: "FRAME".to_string(),
            label: LabelStyle {
                size_px: 48.0,
                color: Rgba8::rgb(0xff, 0xff, 0xff),
                bold: true,
            },
            label_offset_y: 100.0,
            caption: None,
            caption_style: LabelStyle {
                size_px: 20.0,
                color: Rgba8::rgb(0x94, 0xa3, 0xb8),
                bold: false,
            },
            caption_offset_y: 140.0,
        }
    }
}

impl PlayerOpts {
    /// Caption text actually drawn under the label.
    pub fn caption_text(&self) -> String {
        match &self.caption {
            Some(c) => c.clone(),
            None => format!(
                "Replace with {}/NNNN.{}",
                self.naming.dir.display(),
                self.naming.extension
            ),
        }
    }
}

/// What the last draw put on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum DrawKind {
    /// The decoded frame, cover-fit.
    Frame,
    /// Background, circle and labels.
    Placeholder,
}

/// Index and kind of the last draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DrawnFrame {
    /// 1-based frame index.
    pub index: u32,
    /// Frame or placeholder.
    pub kind: DrawKind,
}

/// Frame index shown at `progress` for a sequence of `total` frames.
///
/// Progress is clamped to `[0, 1]` (NaN counts as 0) and maps to `round(1 + p * (total - 1))`.
pub fn frame_index_for(progress: f64, total: u32) -> u32 {
    if total <= 1 {
        return 1;
    }
    let p = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let idx = (1.0 + p * f64::from(total - 1)).round() as u32;
    idx.clamp(1, total)
}

/// Maps progress to a frame index and keeps the surface showing that frame.
pub struct FramePlayer {
    sequence: FrameSequence,
    loader: Box<dyn FrameLoader>,
    opts: PlayerOpts,
    surface: Option<Surface>,
    labels: LabelPainter,
    paints: Vec<Option<FramePaint>>,
    current: u32,
    last_drawn: Option<DrawnFrame>,
}

impl std::fmt::Debug for FramePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramePlayer")
            .field("sequence", &self.sequence)
            .field("opts", &self.opts)
            .field("surface", &self.surface)
            .field("labels", &self.labels)
            .field("current", &self.current)
            .field("last_drawn", &self.last_drawn)
            .finish_non_exhaustive()
    }
}

impl FramePlayer {
    /// Create the player and schedule loads of all `frame_count` frames right away.
    ///
    /// Placeholder labels use the bundled font until [`FramePlayer::set_label_painter`]
    /// replaces it.
    pub fn create(
        frame_count: u32,
        mut loader: Box<dyn FrameLoader>,
        opts: PlayerOpts,
    ) -> ScrollFxResult<Self> {
        let sequence = FrameSequence::new(frame_count)?;
        let labels = LabelPainter::bundled()?;
        let requests = (1..=frame_count)
            .map(|index| FrameRequest {
                index,
                path: opts.naming.path(index),
            })
            .collect();
        loader.start(requests);
        tracing::debug!(frame_count, dir = %opts.naming.dir.display(), "frame loads scheduled");

        Ok(Self {
            sequence,
            loader,
            opts,
            surface: None,
            labels,
            paints: vec![None; frame_count as usize],
            current: 1,
            last_drawn: None,
        })
    }

    /// Presentation settings.
    pub fn opts(&self) -> &PlayerOpts {
        &self.opts
    }

    /// Load bookkeeping.
    pub fn sequence(&self) -> &FrameSequence {
        &self.sequence
    }

    /// Every frame has completed, loaded or failed.
    pub fn is_ready(&self) -> bool {
        self.sequence.is_ready()
    }

    /// Index selected by the latest progress.
    pub fn current_index(&self) -> u32 {
        self.current
    }

    /// What the surface currently shows, if anything was drawn.
    pub fn last_drawn(&self) -> Option<DrawnFrame> {
        self.last_drawn
    }

    /// Frame index shown at `progress`.
    pub fn index_for_progress(&self, progress: f64) -> u32 {
        frame_index_for(progress, self.sequence.total())
    }

    /// Draw into `surface` from now on. The next draw repaints unconditionally.
    pub fn attach_surface(&mut self, surface: Surface) {
        self.surface = Some(surface);
        self.last_drawn = None;
    }

    /// Stop drawing and hand the surface back.
    pub fn detach_surface(&mut self) -> Option<Surface> {
        self.last_drawn = None;
        self.surface.take()
    }

    /// Attached surface.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Font used for placeholder labels.
    pub fn set_label_painter(&mut self, labels: LabelPainter) {
        self.labels = labels;
        self.last_drawn = None;
    }

    /// Select the frame for `progress` and redraw if the index changed.
    ///
    /// Returns whether the surface was repainted.
    pub fn set_progress(&mut self, progress: f64, viewport: Viewport) -> ScrollFxResult<bool> {
        self.current = self.index_for_progress(progress);
        if self
            .last_drawn
            .is_some_and(|d| d.index == self.current)
        {
            tracing::trace!(index = self.current, "frame unchanged, redraw skipped");
            return Ok(false);
        }
        self.redraw(viewport)
    }

    /// The viewport changed; repaint the current frame at the new size.
    pub fn on_resize(&mut self, viewport: Viewport) -> ScrollFxResult<bool> {
        self.redraw(viewport)
    }

    /// Absorb finished loads. Repaints the current frame when the sequence just became ready.
    pub fn pump(&mut self, viewport: Viewport) -> ScrollFxResult<bool> {
        let was_ready = self.sequence.is_ready();
        for outcome in self.loader.poll() {
            self.sequence.complete(outcome.index, outcome.result);
        }
        self.after_completions(was_ready, viewport)
    }

    /// Block until every frame completed or `timeout` elapsed, then repaint if the sequence
    /// became ready. Returns readiness.
    pub fn wait_until_ready(
        &mut self,
        timeout: Duration,
        viewport: Viewport,
    ) -> ScrollFxResult<bool> {
        let was_ready = self.sequence.is_ready();
        wait_until(
            self.loader.as_mut(),
            timeout,
            &mut self.sequence,
            |seq, outcome| {
                seq.complete(outcome.index, outcome.result);
            },
            FrameSequence::is_ready,
        );
        self.after_completions(was_ready, viewport)?;
        Ok(self.sequence.is_ready())
    }

    fn after_completions(&mut self, was_ready: bool, viewport: Viewport) -> ScrollFxResult<bool> {
        if was_ready || !self.sequence.is_ready() {
            return Ok(false);
        }
        tracing::info!(
            total = self.sequence.total(),
            failed = self.sequence.failed(),
            "frame sequence ready"
        );
        self.redraw(viewport)
    }

    /// Repaint the current frame regardless of what was drawn before.
    #[tracing::instrument(level = "debug", skip_all, fields(index = self.current))]
    pub fn redraw(&mut self, viewport: Viewport) -> ScrollFxResult<bool> {
        let index = self.current;
        let Some(surface) = self.surface.as_mut() else {
            return Ok(false);
        };
        surface.resize(viewport)?;
        let size = Size::new(f64::from(surface.width()), f64::from(surface.height()));

        let paint = match self.sequence.state(index) {
            Some(FrameState::Loaded(frame)) if self.sequence.is_ready() => {
                let slot = &mut self.paints[(index - 1) as usize];
                if slot.is_none() {
                    *slot = Some(FramePaint::new(frame)?);
                }
                slot.clone()
            }
            _ => None,
        };

        let opts = &self.opts;
        let labels = &mut self.labels;
        let kind = match paint {
            Some(paint) => {
                surface.draw(|ctx| {
                    fill_background(ctx, opts.background, size);
                    draw_cover(ctx, &paint, size);
                    Ok(())
                })?;
                DrawKind::Frame
            }
            None => {
                surface.draw(|ctx| {
                    fill_background(ctx, opts.background, size);
                    draw_placeholder(ctx, labels, opts, index, size)
                })?;
                DrawKind::Placeholder
            }
        };

        self.last_drawn = Some(DrawnFrame { index, kind });
        Ok(true)
    }

    /// Tear the player down. In-flight loads are abandoned; the surface is handed back.
    pub fn destroy(self) -> Option<Surface> {
        tracing::debug!(
            completed = self.sequence.completed(),
            total = self.sequence.total(),
            "frame player destroyed"
        );
        self.surface
    }
}

fn fill_background(ctx: &mut vello_cpu::RenderContext, color: Rgba8, size: Size) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(color_to_cpu(color));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, size.width, size.height));
}

fn draw_cover(ctx: &mut vello_cpu::RenderContext, paint: &FramePaint, size: Size) {
    let Some(fit) = cover_fit(size, Size::new(paint.width, paint.height)) else {
        return;
    };
    ctx.set_transform(affine_to_cpu(fit.to_affine()));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(paint.image.clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, paint.width, paint.height));
}

fn draw_placeholder(
    ctx: &mut vello_cpu::RenderContext,
    labels: &mut LabelPainter,
    opts: &PlayerOpts,
    index: u32,
    size: Size,
) -> ScrollFxResult<()> {
    let center = Rect::from_origin_size(Point::ORIGIN, size).center();
    let radius = opts.placeholder_radius + opts.placeholder_radius_step * f64::from(index);

    ctx.set_transform(affine_to_cpu(Affine::IDENTITY));
    ctx.set_paint(color_to_cpu(opts.placeholder_fill));
    ctx.fill_path(&shape_to_cpu(&kurbo::Circle::new(center, radius)));

    let label = format!("{} {index}", opts.label_prefix);
    labels.draw_centered(
        ctx,
        &label,
        opts.label,
        center.x,
        center.y + opts.label_offset_y,
    )?;
    labels.draw_centered(
        ctx,
        &opts.caption_text(),
        opts.caption_style,
        center.x,
        center.y + opts.caption_offset_y,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/player.rs"]
mod tests;
