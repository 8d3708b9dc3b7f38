//! scrollfx is a scroll- and pointer-driven animation engine.
//!
//! A host forwards scroll, resize and pointer events; the engine turns them into visual
//! parameters:
//!
//! - [`ScrollHub`] owns page geometry and the progress sources units subscribe to
//! - [`Spring`] and [`map_range`] smooth and map those progress values
//! - units ([`WordReveal`], [`RevealGroup`], [`Parallax`], [`ProgressBar`], [`TiltCard`]) derive
//!   per-element opacity, offsets, scale and rotation
//! - [`FramePlayer`] scrubs an image sequence onto a CPU [`Surface`]
//!
//! [`Scene`] wires all of it from a JSON [`SceneConfig`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod animation;
pub mod foundation;
pub mod render;
pub mod scene;
pub mod scroll;
pub mod sequence;
pub mod units;

pub use crate::animation::map::{Domain, Lerp, RangeMapping, map_range, map_stops};
pub use crate::animation::spring::{Spring, SpringConfig};
pub use crate::foundation::core::{Affine, Point, Rect, Rgba8, Size, Vec2, Viewport};
pub use crate::foundation::error::{ScrollFxError, ScrollFxResult};
pub use crate::render::label::{LabelPainter, LabelStyle};
pub use crate::render::surface::{FrameRGBA, Surface};
pub use crate::scene::config::{PointerEvent, SceneConfig};
pub use crate::scene::driver::{Scene, SceneSnapshot};
pub use crate::scroll::page::{ElementRect, Page};
pub use crate::scroll::progress::{
    OffsetEdge, ProgressHandle, ProgressTarget, ScrollHub, ScrollOffsets,
};
pub use crate::sequence::cover::{CoverFit, cover_fit};
pub use crate::sequence::frames::{DecodedFrame, FrameNaming, FrameSequence, FrameState};
pub use crate::sequence::loader::{FrameLoader, FrameRequest, FsLoader, LoadOutcome, MemoryLoader};
pub use crate::sequence::player::{DrawKind, DrawnFrame, FramePlayer, PlayerOpts};
pub use crate::units::parallax::{Parallax, ParallaxConfig};
pub use crate::units::progress_bar::ProgressBar;
pub use crate::units::reveal_group::{RevealConfig, RevealGroup, RevealVisual};
pub use crate::units::tilt::{Highlight, TiltCard, TiltConfig, TiltFrame};
pub use crate::units::word_reveal::{WordReveal, WordRevealConfig, WordToken, WordVisual};
