use crate::animation::map::{Domain, map_range};
use crate::animation::spring::{Spring, SpringConfig};
use crate::foundation::core::{Point, Rect, Rgba8, Vec2};
use crate::foundation::error::{ScrollFxError, ScrollFxResult};

/// Tuning for a [`TiltCard`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Rotation magnitude (degrees) when the pointer sits on an edge.
    pub max_deg: f64,
    /// Smoothing applied to each normalized pointer axis.
    pub spring: SpringConfig,
    /// Radius of the pointer highlight in pixels.
    pub highlight_radius: f64,
    /// Highlight color at its center.
    pub glow: Rgba8,
    /// Fraction of the radius at which the highlight is fully transparent.
    pub highlight_fade: f64,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            max_deg: 7.5,
            spring: SpringConfig::tilt(),
            highlight_radius: 350.0,
            glow: Rgba8::rgba(37, 99, 235, 38),
            highlight_fade: 0.8,
        }
    }
}

/// Radial highlight that follows the raw pointer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Highlight {
    /// Center in card-local pixels.
    pub center: Point,
    /// Radius in pixels.
    pub radius: f64,
    /// Center color.
    pub color: Rgba8,
    /// Fraction of the radius where the gradient ends.
    pub fade: f64,
    /// 1 while hovered, 0 otherwise.
    pub opacity: f64,
}

/// Per-tick visual state of a tilt card.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TiltFrame {
    /// Rotation about the horizontal axis in degrees.
    pub rotate_x_deg: f64,
    /// Rotation about the vertical axis in degrees.
    pub rotate_y_deg: f64,
    /// Pointer highlight.
    pub highlight: Highlight,
    /// Whether the pointer is over the card.
    pub hovered: bool,
}

/// Card that tilts toward the pointer and lights up under it.
pub struct TiltCard {
    bounds: Rect,
    config: TiltConfig,
    x: Spring,
    y: Spring,
    pointer_px: Point,
    hovered: bool,
    on_click: Option<Box<dyn FnMut()>>,
}

impl std::fmt::Debug for TiltCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiltCard")
            .field("bounds", &self.bounds)
            .field("config", &self.config)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("pointer_px", &self.pointer_px)
            .field("hovered", &self.hovered)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

impl TiltCard {
    /// Card occupying `bounds` (client coordinates), neutral and not hovered.
    pub fn new(
        bounds: Rect,
        config: TiltConfig,
        on_click: Option<Box<dyn FnMut()>>,
    ) -> ScrollFxResult<Self> {
        if !config.max_deg.is_finite() || !config.highlight_radius.is_finite() {
            return Err(ScrollFxError::validation(
                "tilt max_deg and highlight_radius must be finite",
            ));
        }
        Ok(Self {
            bounds,
            config,
            x: Spring::follow(0.0, config.spring)?,
            y: Spring::follow(0.0, config.spring)?,
            pointer_px: Point::ZERO,
            hovered: false,
            on_click,
        })
    }

    /// Move or resize the card.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Card bounds in client coordinates.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Pointer entered the card.
    pub fn pointer_enter(&mut self) {
        self.hovered = true;
    }

    /// Pointer moved to `client`. Moves outside the card are ignored.
    pub fn pointer_move(&mut self, client: Point) {
        let b = self.bounds;
        let inside = (b.x0..=b.x1).contains(&client.x) && (b.y0..=b.y1).contains(&client.y);
        if !inside || b.width() <= 0.0 || b.height() <= 0.0 {
            return;
        }
        self.hovered = true;
        let local = Point::new(client.x - b.x0, client.y - b.y0);
        self.pointer_px = local;
        self.x.set_target(local.x / b.width() - 0.5);
        self.y.set_target(local.y / b.height() - 0.5);
    }

    /// Pointer left the card; the springs carry the rotation back to neutral.
    pub fn pointer_leave(&mut self) {
        self.hovered = false;
        self.x.set_target(0.0);
        self.y.set_target(0.0);
    }

    /// Forward a click to the registered callback.
    pub fn click(&mut self) {
        if let Some(cb) = self.on_click.as_mut() {
            cb();
        }
    }

    /// Latest raw normalized pointer offset, each axis in `[-0.5, 0.5]`.
    pub fn pointer_offset(&self) -> Vec2 {
        Vec2::new(self.x.target(), self.y.target())
    }

    /// Advance both springs; `true` while the card is still moving.
    pub fn tick(&mut self, dt: f64) -> bool {
        let moving_x = self.x.tick(dt);
        let moving_y = self.y.tick(dt);
        moving_x || moving_y
    }

    /// Current visual state.
    pub fn frame(&self) -> TiltFrame {
        let axis = Domain::new(-0.5, 0.5);
        let max = self.config.max_deg;
        TiltFrame {
            rotate_x_deg: map_range(self.y.value(), axis, &max, &-max),
            rotate_y_deg: map_range(self.x.value(), axis, &-max, &max),
            highlight: Highlight {
                center: self.pointer_px,
                radius: self.config.highlight_radius,
                color: self.config.glow,
                fade: self.config.highlight_fade,
                opacity: if self.hovered { 1.0 } else { 0.0 },
            },
            hovered: self.hovered,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/units/tilt.rs"]
mod tests;
