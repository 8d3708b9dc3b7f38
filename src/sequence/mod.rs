//! Scroll-scrubbed image sequences.

/// Cover-fit placement.
pub mod cover;
/// Decoded frames, naming and load bookkeeping.
pub mod frames;
/// Frame loaders.
pub mod loader;
/// Progress-driven player.
pub mod player;
