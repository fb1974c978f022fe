//! pcm-relay library crate
//!
//! This module exposes internal types for integration testing.
//! The main binary is in main.rs.

#[macro_use]
extern crate log;

pub mod constants;
pub mod frame;
pub mod relay;
pub mod sink;
pub mod sources;
