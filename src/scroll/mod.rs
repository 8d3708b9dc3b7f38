//! Page geometry and scroll progress sources.

/// Viewport, document and tracked element geometry.
pub mod page;
/// Progress subscriptions.
pub mod progress;
