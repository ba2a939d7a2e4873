//! # CropSense Library
//!
//! This library exposes the CropSense modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod cli;
pub mod config;

// Re-export cropsense_core for convenience
pub use cropsense_core;
