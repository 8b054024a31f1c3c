//! # huddle-core
//!
//! Core types, configuration, and utilities for Huddle.
//!
//! This crate provides shared functionality used across all Huddle crates:
//!
//! - **Types**: messages, user profiles, and strongly-typed identifiers
//! - **Configuration**: loading, validation, and persistence of config files
//! - **Utilities**: path resolution and secret handling

pub mod config;
pub mod error;
pub mod paths;
pub mod secret;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use error::{ConfigError, Error, Result};
pub use secret::SecretString;
pub use types::*;
