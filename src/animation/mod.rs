//! Value mapping and spring smoothing.

/// Clamped range mapping.
pub mod map;
/// Spring follower.
pub mod spring;
