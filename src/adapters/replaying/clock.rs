//! Replaying adapter for the Clock port.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::{next_output, replay_value};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::clock::Clock;

/// Replays recorded clock values from a cassette.
///
/// Once the recorded readings run out, or a reading cannot be decoded, the
/// clock falls back to the system time.
pub struct ReplayingClock {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingClock {
    /// Cassette port name of clock interactions.
    pub const PORT: &'static str = "clock";

    /// Creates a new replaying clock from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl Clock for ReplayingClock {
    fn now(&self) -> DateTime<Utc> {
        match next_output(&self.replayer, Self::PORT, "now").and_then(replay_value) {
            Ok(now) => now,
            Err(e) => {
                warn!("clock replay unavailable, using system time: {e}");
                Utc::now()
            }
        }
    }
}
