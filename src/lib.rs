//! Riverpad installation controller library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod connectivity;
pub mod dispatch;
pub mod error;
pub mod feedback;
pub mod pins;
pub mod status;
pub mod timer;
pub mod touch;

pub mod adapters;
pub mod drivers;
