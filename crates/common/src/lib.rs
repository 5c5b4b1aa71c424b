//! ReelKit Common Utilities
//!
//! Shared infrastructure for all ReelKit crates:
//! - Error types and result aliases
//! - Frame/time conversions for the composition timeline
//! - Tracing/logging initialization
//! - Configuration loading

pub mod config;
pub mod error;
pub mod frames;
pub mod logging;

pub use config::*;
pub use error::*;
pub use frames::*;
