//! JSON scene description and the driver that plays it.

/// Serde boundary types.
pub mod config;
/// Scene host and snapshots.
pub mod driver;
