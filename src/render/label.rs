use std::borrow::Cow;

use crate::foundation::core::{Affine, Rgba8};
use crate::foundation::error::{ScrollFxError, ScrollFxResult};
use crate::render::paint::affine_to_cpu;

/// DejaVu Sans, used when no label font is configured.
static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TextBrush {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl From<Rgba8> for TextBrush {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Style of one label line.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LabelStyle {
    /// Font size in pixels.
    pub size_px: f32,
    /// Fill color.
    pub color: Rgba8,
    /// Request the bold weight.
    pub bold: bool,
}

/// Shapes and draws single-line labels from one font file.
///
/// Font bytes are registered once; every label reuses the Parley contexts.
pub struct LabelPainter {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for LabelPainter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelPainter")
            .field("family_name", &self.family_name)
            .finish_non_exhaustive()
    }
}

impl LabelPainter {
    /// Register `font_bytes` (TTF/OTF) and prepare the layout contexts.
    pub fn new(font_bytes: Vec<u8>) -> ScrollFxResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ScrollFxError::asset("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ScrollFxError::asset("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0),
        })
    }

    /// Painter backed by the bundled DejaVu Sans face.
    pub fn bundled() -> ScrollFxResult<Self> {
        Self::new(BUNDLED_FONT.to_vec())
    }

    /// Read a font file from disk.
    pub fn from_path(path: &std::path::Path) -> ScrollFxResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ScrollFxError::asset(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::new(bytes)
    }

    /// Family name of the registered font.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    fn layout(
        &mut self,
        text: &str,
        style: LabelStyle,
    ) -> ScrollFxResult<parley::Layout<TextBrush>> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(ScrollFxError::validation(
                "label size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrush::from(
            style.color,
        )));
        if style.bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Draw `text` horizontally centered on `center_x` with its first baseline at `baseline_y`.
    pub fn draw_centered(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        style: LabelStyle,
        center_x: f64,
        baseline_y: f64,
    ) -> ScrollFxResult<()> {
        let layout = self.layout(text, style)?;
        let baseline = layout
            .lines()
            .next()
            .map(|line| f64::from(line.metrics().baseline))
            .unwrap_or(0.0);
        let origin = Affine::translate((
            center_x - f64::from(layout.width()) / 2.0,
            baseline_y - baseline,
        ));
        ctx.set_transform(affine_to_cpu(origin));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/label.rs"]
mod tests;
