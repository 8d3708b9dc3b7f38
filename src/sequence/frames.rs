use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{ScrollFxError, ScrollFxResult};

/// Decoded raster frame in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedFrame {
    /// Wrap premultiplied RGBA8 bytes, checking the length against the dimensions.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> ScrollFxResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if width == 0 || height == 0 || rgba8_premul.len() != expected {
            return Err(ScrollFxError::asset(format!(
                "frame bytes do not match {width}x{height} RGBA8"
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Solid-color frame, mostly useful for tests and demos.
    pub fn solid(width: u32, height: u32, premul: [u8; 4]) -> ScrollFxResult<Self> {
        let n = (width as usize).saturating_mul(height as usize);
        Self::from_premul(width, height, premul.repeat(n))
    }
}

/// Decode encoded image bytes (webp, png, jpeg, ...) and convert to premultiplied RGBA8.
pub fn decode_frame(bytes: &[u8]) -> ScrollFxResult<DecodedFrame> {
    let dyn_img = image::load_from_memory(bytes).context("decode frame from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    DecodedFrame::from_premul(width, height, rgba8_premul)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Where frame `i` of a sequence lives: `{dir}/{i:04}.{extension}`, 1-based.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameNaming {
    /// Directory holding the frames.
    pub dir: PathBuf,
    /// File extension without the dot.
    pub extension: String,
}

impl Default for FrameNaming {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("sequence"),
            extension: "webp".to_string(),
        }
    }
}

impl FrameNaming {
    /// Naming rooted at `dir` with `extension`.
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// File name of frame `index`, e.g. `0007.webp`.
    pub fn file_name(&self, index: u32) -> String {
        format!("{index:04}.{}", self.extension)
    }

    /// Full path of frame `index`.
    pub fn path(&self, index: u32) -> PathBuf {
        self.dir.join(self.file_name(index))
    }

    /// Same naming with `dir` resolved against `root` when relative.
    pub fn rooted_at(&self, root: &Path) -> Self {
        let dir = if self.dir.is_absolute() {
            self.dir.clone()
        } else {
            root.join(&self.dir)
        };
        Self {
            dir,
            extension: self.extension.clone(),
        }
    }
}

/// Load state of one frame. `Loaded` and `Failed` are terminal.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameState {
    /// Load scheduled, no completion yet.
    Pending,
    /// Decoded and ready to draw.
    Loaded(Arc<DecodedFrame>),
    /// Missing or undecodable; drawn as a placeholder.
    Failed,
}

impl FrameState {
    /// `true` for `Loaded` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Ordered frames of one sequence with completion bookkeeping.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    frames: Vec<FrameState>,
    completed: usize,
}

impl FrameSequence {
    /// `count` pending frames.
    pub fn new(count: u32) -> ScrollFxResult<Self> {
        if count == 0 {
            return Err(ScrollFxError::validation("frame count must be > 0"));
        }
        Ok(Self {
            frames: vec![FrameState::Pending; count as usize],
            completed: 0,
        })
    }

    /// Number of frames.
    pub fn total(&self) -> u32 {
        self.frames.len() as u32
    }

    /// Frames that reached a terminal state, loaded or failed. Never decreases.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Frames that failed to load.
    pub fn failed(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| matches!(f, FrameState::Failed))
            .count()
    }

    /// Every frame completed, whether or not it succeeded.
    pub fn is_ready(&self) -> bool {
        self.completed == self.frames.len()
    }

    /// State of 1-based frame `index`.
    pub fn state(&self, index: u32) -> Option<&FrameState> {
        let i = (index as usize).checked_sub(1)?;
        self.frames.get(i)
    }

    /// Record the completion of frame `index`.
    ///
    /// Returns `false` (and changes nothing) for out-of-range indices or frames that already
    /// completed.
    pub fn complete(&mut self, index: u32, result: ScrollFxResult<DecodedFrame>) -> bool {
        let Some(slot) = (index as usize)
            .checked_sub(1)
            .and_then(|i| self.frames.get_mut(i))
        else {
            tracing::warn!(index, "completion for unknown frame ignored");
            return false;
        };
        if slot.is_terminal() {
            tracing::debug!(index, "duplicate frame completion ignored");
            return false;
        }
        *slot = match result {
            Ok(frame) => FrameState::Loaded(Arc::new(frame)),
            Err(e) => {
                tracing::warn!(index, error = %e, "frame failed to load, using placeholder");
                FrameState::Failed
            }
        };
        self.completed += 1;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/frames.rs"]
mod tests;
