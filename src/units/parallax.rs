use crate::animation::map::{Domain, map_range};
use crate::foundation::error::{ScrollFxError, ScrollFxResult};
use crate::scroll::progress::ScrollOffsets;

/// Tuning for a [`Parallax`] section.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    /// Fraction of the section height travelled over the full progress range.
    pub speed: f64,
    /// Trigger edges of the section's source.
    pub offsets: ScrollOffsets,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            speed: 0.5,
            offsets: ScrollOffsets::default(),
        }
    }
}

/// Section whose content drifts down slower than the page scrolls.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Parallax {
    config: ParallaxConfig,
}

impl Parallax {
    /// Validate `speed` and build the section.
    pub fn new(config: ParallaxConfig) -> ScrollFxResult<Self> {
        if !config.speed.is_finite() {
            return Err(ScrollFxError::validation("parallax speed must be finite"));
        }
        Ok(Self { config })
    }

    /// Section configuration.
    pub fn config(&self) -> ParallaxConfig {
        self.config
    }

    /// Vertical offset in percent of the section height.
    pub fn offset_y_pct(&self, progress: f64) -> f64 {
        map_range(progress, Domain::unit(), &0.0, &(self.config.speed * 100.0))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/units/parallax.rs"]
mod tests;
