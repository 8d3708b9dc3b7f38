use crate::foundation::error::{ScrollFxError, ScrollFxResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Visible viewport dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a validated viewport with finite, non-negative dimensions.
    pub fn new(width: f64, height: f64) -> ScrollFxResult<Self> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(ScrollFxError::validation(
                "viewport dimensions must be finite and >= 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Width over height. Degenerate viewports report an aspect of 1.
    pub fn aspect(self) -> f64 {
        if self.height <= 0.0 {
            return 1.0;
        }
        self.width / self.height
    }

    /// Integer pixel dimensions for raster surfaces (rounded, at least 1x1).
    pub fn pixel_size(self) -> (u32, u32) {
        let w = self.width.round().max(1.0) as u32;
        let h = self.height.round().max(1.0) as u32;
        (w, h)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Straight-alpha RGBA8 color as used in configuration.
///
/// Deserializes from `"#rrggbb"`, `"#rrggbbaa"` or `{ "r", "g", "b", "a" }` (alpha defaults
/// to 255).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "ColorDef")]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ColorDef {
    Hex(String),
    Parts {
        r: u8,
        g: u8,
        b: u8,
        #[serde(default = "opaque")]
        a: u8,
    },
}

fn opaque() -> u8 {
    255
}

impl TryFrom<ColorDef> for Rgba8 {
    type Error = ScrollFxError;

    fn try_from(def: ColorDef) -> Result<Self, Self::Error> {
        match def {
            ColorDef::Hex(s) => Self::from_hex(&s),
            ColorDef::Parts { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
        }
    }
}

impl Rgba8 {
    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self::rgba(0, 0, 0, 0)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> ScrollFxResult<Self> {
        let s = hex.strip_prefix('#').unwrap_or(hex);
        if !s.is_ascii() || (s.len() != 6 && s.len() != 8) {
            return Err(ScrollFxError::validation(format!(
                "color '{hex}' must be #rrggbb or #rrggbbaa"
            )));
        }
        let byte = |i: usize| -> ScrollFxResult<u8> {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map_err(|_| ScrollFxError::validation(format!("color '{hex}' is not hex")))
        };
        let a = if s.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }

    /// Premultiplied `[r, g, b, a]` bytes.
    pub fn premultiplied(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }

    /// Same color with alpha scaled by `opacity` (clamped to `[0, 1]`).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (f64::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
