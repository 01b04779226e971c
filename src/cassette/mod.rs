//! Cassettes: recorded page and clock traffic that can be replayed offline.

pub mod format;
pub mod recorder;
pub mod replayer;
