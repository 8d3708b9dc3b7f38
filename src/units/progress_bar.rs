use crate::animation::spring::{Spring, SpringConfig};
use crate::foundation::error::ScrollFxResult;

/// Top-of-page reading indicator: document progress smoothed by a spring.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ProgressBar {
    spring: Spring,
}

impl ProgressBar {
    /// Start settled at `progress`.
    pub fn new(progress: f64, config: SpringConfig) -> ScrollFxResult<Self> {
        Ok(Self {
            spring: Spring::follow(progress, config)?,
        })
    }

    /// Feed the latest raw document progress.
    pub fn update(&mut self, progress: f64) {
        self.spring.set_target(progress);
    }

    /// Advance the smoothing; `true` while still moving.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.spring.tick(dt)
    }

    /// Horizontal scale of the bar, `0` = empty, `1` = full.
    pub fn scale_x(&self) -> f64 {
        self.spring.value().clamp(0.0, 1.0)
    }

    /// Whether the bar has caught up with the raw progress.
    pub fn is_settled(&self) -> bool {
        self.spring.is_settled()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/units/progress_bar.rs"]
mod tests;
