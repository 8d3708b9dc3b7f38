use crate::animation::map::{Domain, map_range};
use crate::foundation::error::{ScrollFxError, ScrollFxResult};
use crate::scroll::progress::ScrollOffsets;

/// Tuning for a [`WordReveal`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WordRevealConfig {
    /// Opacity of the always-visible dim copy of each word.
    pub base_opacity: f64,
    /// Trigger edges when bound to an element.
    pub offsets: ScrollOffsets,
}

impl Default for WordRevealConfig {
    fn default() -> Self {
        Self {
            base_opacity: 0.2,
            offsets: ScrollOffsets::default(),
        }
    }
}

/// One whitespace-delimited word and its slice of the progress range.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct WordToken {
    /// Word text.
    pub text: String,
    /// Progress sub-range over which the overlay fades in.
    pub domain: Domain,
}

/// Visual state of one word for a progress sample.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct WordVisual {
    /// Token index.
    pub index: usize,
    /// Opacity of the dim base copy.
    pub base_opacity: f64,
    /// Opacity of the revealed overlay copy.
    pub overlay_opacity: f64,
}

/// Left-to-right "ink" reveal of a sentence driven by one progress scalar.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct WordReveal {
    tokens: Vec<WordToken>,
    config: WordRevealConfig,
}

impl WordReveal {
    /// Split `text` on whitespace and give token `i` of `n` the range `[i/n, (i+1)/n]`.
    pub fn new(text: &str, config: WordRevealConfig) -> ScrollFxResult<Self> {
        if !(0.0..=1.0).contains(&config.base_opacity) {
            return Err(ScrollFxError::validation(
                "word reveal base_opacity must be within [0, 1]",
            ));
        }
        let words: Vec<&str> = text.split_whitespace().collect();
        let n = words.len() as f64;
        let tokens = words
            .into_iter()
            .enumerate()
            .map(|(i, w)| {
                let start = i as f64 / n;
                WordToken {
                    text: w.to_string(),
                    domain: Domain::new(start, start + 1.0 / n),
                }
            })
            .collect();
        Ok(Self { tokens, config })
    }

    /// Tokens in reading order. Empty input yields no tokens.
    pub fn tokens(&self) -> &[WordToken] {
        &self.tokens
    }

    /// Unit configuration.
    pub fn config(&self) -> WordRevealConfig {
        self.config
    }

    /// Per-word opacities for `progress`.
    pub fn sample(&self, progress: f64) -> Vec<WordVisual> {
        self.tokens
            .iter()
            .enumerate()
            .map(|(index, t)| WordVisual {
                index,
                base_opacity: self.config.base_opacity,
                overlay_opacity: map_range(progress, t.domain, &0.0, &1.0),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/units/word_reveal.rs"]
mod tests;
