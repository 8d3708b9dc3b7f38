//! Shared geometry, colors and the error type.

/// Viewport, colors and re-exported kurbo geometry.
pub mod core;
/// Error taxonomy.
pub mod error;
