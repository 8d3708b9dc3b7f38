use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::animation::spring::SpringConfig;
use crate::foundation::core::{Rect, Viewport};
use crate::foundation::error::{ScrollFxError, ScrollFxResult};
use crate::scroll::page::ElementRect;
use crate::sequence::player::PlayerOpts;
use crate::units::parallax::ParallaxConfig;
use crate::units::reveal_group::RevealConfig;
use crate::units::tilt::TiltConfig;
use crate::units::word_reveal::WordRevealConfig;

/// JSON-facing description of one scrolling page and the effects placed on it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Initial viewport.
    pub viewport: Viewport,
    /// Total scrollable document height.
    pub document_height: f64,
    /// Tracked elements by id.
    pub elements: BTreeMap<String, ElementRect>,
    /// Reading progress indicator smoothing; `None` disables the indicator.
    pub progress_bar: Option<SpringConfig>,
    /// Scroll-revealed paragraphs.
    pub word_reveals: Vec<WordRevealDef>,
    /// Staggered child reveals.
    pub reveal_groups: Vec<RevealGroupDef>,
    /// Parallax sections.
    pub parallax: Vec<ParallaxDef>,
    /// Pointer tilt cards.
    pub tilt_cards: Vec<TiltCardDef>,
    /// Scroll-scrubbed frame sequence.
    pub sequence: Option<SequenceDef>,
    /// Scripted input, applied in order.
    pub timeline: Vec<TimelineStep>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            document_height: 3600.0,
            elements: BTreeMap::new(),
            progress_bar: None,
            word_reveals: Vec::new(),
            reveal_groups: Vec::new(),
            parallax: Vec::new(),
            tilt_cards: Vec::new(),
            sequence: None,
            timeline: Vec::new(),
        }
    }
}

/// Word reveal driven by whole-document progress, or by a tracked element when `element`
/// is set.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WordRevealDef {
    /// Tracked element id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    /// Paragraph text.
    pub text: String,
    /// Tuning.
    #[serde(default)]
    pub config: WordRevealConfig,
}

/// Reveal group bound to a tracked element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RevealGroupDef {
    /// Tracked element id.
    pub element: String,
    /// Number of children.
    pub count: usize,
    /// Tuning.
    #[serde(default)]
    pub config: RevealConfig,
}

/// Parallax section bound to a tracked element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParallaxDef {
    /// Tracked element id.
    pub element: String,
    /// Tuning.
    #[serde(default)]
    pub config: ParallaxConfig,
}

/// Tilt card placed in client coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TiltCardDef {
    /// Card name used by pointer events.
    pub name: String,
    /// Card bounds.
    pub bounds: Rect,
    /// Tuning.
    #[serde(default)]
    pub config: TiltConfig,
}

/// Frame sequence driven by whole-document progress.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SequenceDef {
    /// Number of frames.
    #[serde(default = "default_frame_count")]
    pub frame_count: u32,
    /// Presentation and frame naming.
    #[serde(default)]
    pub player: PlayerOpts,
}

fn default_frame_count() -> u32 {
    120
}

/// Pointer input for a tilt card.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    /// Pointer entered the card.
    Enter,
    /// Pointer moved to client coordinates.
    Move {
        /// Client x.
        x: f64,
        /// Client y.
        y: f64,
    },
    /// Pointer left the card.
    Leave,
    /// Card clicked.
    Click,
}

/// One scripted input.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineAction {
    /// Scroll to an absolute offset.
    Scroll {
        /// Target scroll offset.
        y: f64,
    },
    /// Resize the viewport.
    Resize {
        /// New width.
        width: f64,
        /// New height.
        height: f64,
    },
    /// Pointer input for a named card.
    Pointer {
        /// Card name.
        card: String,
        /// Event.
        event: PointerEvent,
    },
    /// Only let time pass.
    Wait,
}

/// Advance time by `advance` seconds, then apply `action`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelineStep {
    /// Seconds simulated before the action.
    #[serde(default)]
    pub advance: f64,
    /// Input applied after advancing.
    #[serde(flatten)]
    pub action: TimelineAction,
}

impl SceneConfig {
    /// Parse a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ScrollFxResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ScrollFxError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON string.
    pub fn from_json(s: &str) -> ScrollFxResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ScrollFxResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ScrollFxError::config(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check numeric fields and that every effect names a tracked element.
    pub fn validate(&self) -> ScrollFxResult<()> {
        Viewport::new(self.viewport.width, self.viewport.height)?;
        if !self.document_height.is_finite() || self.document_height < 0.0 {
            return Err(ScrollFxError::validation(
                "document_height must be finite and >= 0",
            ));
        }
        for (id, rect) in &self.elements {
            ElementRect::new(rect.top, rect.height).map_err(|e| {
                ScrollFxError::validation(format!("element '{id}': {e}"))
            })?;
        }

        let bound = self
            .word_reveals
            .iter()
            .filter_map(|w| w.element.as_deref())
            .chain(self.reveal_groups.iter().map(|g| g.element.as_str()))
            .chain(self.parallax.iter().map(|p| p.element.as_str()));
        for id in bound {
            if !self.elements.contains_key(id) {
                return Err(ScrollFxError::config(format!(
                    "effect targets unknown element '{id}'"
                )));
            }
        }

        let mut names = std::collections::BTreeSet::new();
        for card in &self.tilt_cards {
            if !names.insert(card.name.as_str()) {
                return Err(ScrollFxError::config(format!(
                    "duplicate tilt card '{}'",
                    card.name
                )));
            }
        }
        for step in &self.timeline {
            if !step.advance.is_finite() || step.advance < 0.0 {
                return Err(ScrollFxError::validation(
                    "timeline advance must be finite and >= 0",
                ));
            }
            if let TimelineAction::Pointer { card, .. } = &step.action
                && !names.contains(card.as_str())
            {
                return Err(ScrollFxError::config(format!(
                    "timeline targets unknown tilt card '{card}'"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
