//! Token Faucet CLI - Library interface
//!
//! Re-exports internal modules for use in integration tests.

pub mod config;
pub mod render;
pub mod screen;
