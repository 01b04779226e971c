//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the change-detection core and
//! an external system (time, disk, the page-automation engine).
//! Implementations live in `src/adapters/`.

pub mod browser;
pub mod clock;
pub mod filesystem;

pub use browser::{Browser, BrowserSession, ElementHandle, Page, PageResponse, PortFuture, WaitUntil};
pub use clock::Clock;
pub use filesystem::FileSystem;

/// Error type returned by every port operation.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
