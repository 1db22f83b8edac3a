//! `smartcube` - State core of the Smart Focus Cube configurator
//!
//! Tracks the active operating mode and its per-mode settings, the
//! mode-independent case colour and material, part-highlight interaction
//! flags and a simulated Bluetooth pairing lifecycle. Renderers and views
//! read from [`store::ConfigStore`] and call its commands; nothing here draws.
//!
//! # Modules
//!
//! - [`color`]: hex / HSL conversion and live hue editing
//! - [`config`]: data models, built-in defaults, persisted snapshot and storage
//! - [`store`]: the configurator state store and its events
//! - [`connection`]: pairing state machine with pluggable timers and randomness
//! - [`utils`]: logging setup

// Module declarations
pub mod color;
pub mod config;
pub mod connection;
pub mod error;
pub mod store;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use error::{CubeError, Result};
