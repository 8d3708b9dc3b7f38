//! Scroll and pointer driven effects.
//!
//! Units are pure state: they turn a progress sample (or pointer input) into visual parameters
//! and leave drawing to the host.

/// Section drifting at a fraction of the scroll speed.
pub mod parallax;
/// Spring-smoothed reading progress indicator.
pub mod progress_bar;
/// Staggered fade, rise and scale of a group of children.
pub mod reveal_group;
/// Pointer-following 3D tilt with a radial highlight.
pub mod tilt;
/// Word-by-word text reveal.
pub mod word_reveal;
