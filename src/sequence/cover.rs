use crate::foundation::core::{Affine, Size, Vec2};

/// Placement that scales an image to cover a canvas, cropping the overflowing axis evenly.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CoverFit {
    /// Uniform scale applied to the image.
    pub scale: f64,
    /// Drawn width in canvas pixels.
    pub draw_width: f64,
    /// Drawn height in canvas pixels.
    pub draw_height: f64,
    /// Top-left corner of the drawn image; negative on the cropped axis.
    pub offset: Vec2,
}

impl CoverFit {
    /// Transform from image pixels to canvas pixels.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }
}

/// Cover-fit `image` into `canvas`.
///
/// A wider canvas fills the width and crops top and bottom; otherwise the height is filled and
/// the sides are cropped. Returns `None` for degenerate sizes.
pub fn cover_fit(canvas: Size, image: Size) -> Option<CoverFit> {
    if !is_drawable(canvas) || !is_drawable(image) {
        return None;
    }

    let canvas_ratio = canvas.width / canvas.height;
    let image_ratio = image.width / image.height;
    let (draw_width, draw_height, offset) = if canvas_ratio > image_ratio {
        let h = canvas.width / image_ratio;
        (canvas.width, h, Vec2::new(0.0, (canvas.height - h) / 2.0))
    } else {
        let w = canvas.height * image_ratio;
        (w, canvas.height, Vec2::new((canvas.width - w) / 2.0, 0.0))
    };

    Some(CoverFit {
        scale: draw_width / image.width,
        draw_width,
        draw_height,
        offset,
    })
}

fn is_drawable(s: Size) -> bool {
    s.width.is_finite() && s.height.is_finite() && s.width > 0.0 && s.height > 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/cover.rs"]
mod tests;
