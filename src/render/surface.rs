use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Rgba8, Viewport};
use crate::foundation::error::{ScrollFxError, ScrollFxResult};

/// A rendered frame as RGBA8 pixels.
///
/// Surfaces read back **premultiplied alpha**; the flag makes this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Convert to straight alpha in place. No-op when already straight.
    pub fn unpremultiply(&mut self) {
        if !self.premultiplied {
            return;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        self.premultiplied = false;
    }

    /// Write the frame as a PNG, creating parent directories.
    pub fn save_png(&self, path: &Path) -> ScrollFxResult<()> {
        let mut straight = self.clone();
        straight.unpremultiply();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &straight.data,
            straight.width,
            straight.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Raster target the player draws into, sized to the viewport.
pub struct Surface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    ctx: Option<vello_cpu::RenderContext>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

fn pixel_dims(viewport: Viewport) -> ScrollFxResult<(u16, u16)> {
    let (w, h) = viewport.pixel_size();
    let w: u16 = w
        .try_into()
        .map_err(|_| ScrollFxError::render("surface width exceeds u16"))?;
    let h: u16 = h
        .try_into()
        .map_err(|_| ScrollFxError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

impl Surface {
    /// Transparent surface covering `viewport`.
    pub fn new(viewport: Viewport) -> ScrollFxResult<Self> {
        let (width, height) = pixel_dims(viewport)?;
        Ok(Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
            ctx: None,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Match the surface to `viewport`. Returns `true` when the pixel size changed, in which
    /// case the contents are discarded.
    pub fn resize(&mut self, viewport: Viewport) -> ScrollFxResult<bool> {
        let (width, height) = pixel_dims(viewport)?;
        if width == self.width && height == self.height {
            return Ok(false);
        }
        self.width = width;
        self.height = height;
        self.pixmap = vello_cpu::Pixmap::new(width, height);
        Ok(true)
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Rgba8) {
        let premul = color.premultiplied();
        for px in self.pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&premul);
        }
    }

    /// Record drawing commands with `f` and rasterize them into the surface.
    pub fn draw(
        &mut self,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> ScrollFxResult<()>,
    ) -> ScrollFxResult<()> {
        let (width, height) = (self.width, self.height);
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        f(&mut ctx)?;
        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);
        self.ctx = Some(ctx);
        Ok(())
    }

    /// Premultiplied RGBA of the pixel at (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let i = (y as usize * self.width() as usize + x as usize) * 4;
        let data = self.pixmap.data_as_u8_slice();
        Some([data[i], data[i + 1], data[i + 2], data[i + 3]])
    }

    /// Copy the current contents out.
    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.width(),
            height: self.height(),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
