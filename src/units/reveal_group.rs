use crate::animation::map::{Domain, map_range};
use crate::foundation::error::{ScrollFxError, ScrollFxResult};
use crate::scroll::progress::{OffsetEdge, ScrollOffsets};

/// Tuning for a [`RevealGroup`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Width of each child's window in multiples of the even partition width.
    pub overlap: f64,
    /// Vertical offset (percent of own height) a child starts from.
    pub offset_from_pct: f64,
    /// Scale a child starts from.
    pub scale_from: f64,
    /// Trigger edges of the shared element-relative source.
    pub offsets: ScrollOffsets,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            overlap: 1.5,
            offset_from_pct: 100.0,
            scale_from: 0.8,
            // top of the group at 90% of the viewport, then at 30%
            offsets: ScrollOffsets::new(OffsetEdge::new(0.0, 0.9), OffsetEdge::new(0.0, 0.3)),
        }
    }
}

/// Visual state of one child for a progress sample.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RevealVisual {
    /// Child index.
    pub index: usize,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Vertical offset in percent of the child's height (positive is down).
    pub offset_y_pct: f64,
    /// Uniform scale.
    pub scale: f64,
}

/// Staggered reveal of `count` children against one shared progress scalar.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RevealGroup {
    domains: Vec<Domain>,
    config: RevealConfig,
}

impl RevealGroup {
    /// Child `i` gets `[i/count, min(1, i/count + overlap/count)]`.
    pub fn new(count: usize, config: RevealConfig) -> ScrollFxResult<Self> {
        if !config.overlap.is_finite() || config.overlap <= 0.0 {
            return Err(ScrollFxError::validation(
                "reveal overlap must be finite and > 0",
            ));
        }
        if !config.offset_from_pct.is_finite() || !config.scale_from.is_finite() {
            return Err(ScrollFxError::validation(
                "reveal offset and scale must be finite",
            ));
        }
        let n = count as f64;
        let domains = (0..count)
            .map(|i| {
                let start = i as f64 / n;
                Domain::new(start, (start + config.overlap / n).min(1.0))
            })
            .collect();
        Ok(Self { domains, config })
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Whether the group has no children.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Progress window of each child.
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// Group configuration.
    pub fn config(&self) -> RevealConfig {
        self.config
    }

    /// Opacity, offset and scale of every child from one progress sample.
    pub fn sample(&self, progress: f64) -> Vec<RevealVisual> {
        let from = (0.0, self.config.offset_from_pct, self.config.scale_from);
        let to = (1.0, 0.0, 1.0);
        self.domains
            .iter()
            .enumerate()
            .map(|(index, d)| {
                let (opacity, offset_y_pct, scale) = map_range(progress, *d, &from, &to);
                RevealVisual {
                    index,
                    opacity,
                    offset_y_pct,
                    scale,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/units/reveal_group.rs"]
mod tests;
