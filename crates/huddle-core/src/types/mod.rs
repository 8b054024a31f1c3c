//! Common type definitions shared across Huddle crates.

mod identifiers;
mod message;
mod profile;

pub use identifiers::*;
pub use message::*;
pub use profile::*;
