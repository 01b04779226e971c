//! Live adapters for real external interactions.

pub mod browser;
pub mod clock;
pub mod filesystem;
