//! CPU raster output for the frame sequence player.
//!
//! Everything here sits on `vello_cpu`; callers only see [`surface::Surface`] and
//! [`surface::FrameRGBA`].

/// Text labels shaped with `parley`.
pub mod label;
pub(crate) mod paint;
/// Pixel surface and frame readback.
pub mod surface;
