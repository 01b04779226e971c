//! Replaying adapters that serve recorded interactions.

pub mod browser;
pub mod clock;

pub use browser::ReplayingBrowser;
pub use clock::ReplayingClock;

use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::PortError;

/// Take the output of the next `port`/`method` interaction.
///
/// # Errors
///
/// Returns an error when the cassette holds no further interaction for the
/// pair or the replayer lock is poisoned.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<Value, PortError> {
    let mut guard = replayer.lock().map_err(|_| "replayer lock poisoned")?;
    let interaction = guard.try_next_interaction(port, method)?;
    Ok(interaction.output.clone())
}

/// Decode a plain recorded value.
///
/// Mirror of `recording::record_interaction`.
pub(crate) fn replay_value<T: DeserializeOwned>(output: Value) -> Result<T, PortError> {
    Ok(serde_json::from_value(output)?)
}

/// Decode a recorded `Result` stored under the Ok/Err JSON convention.
///
/// Mirror of `recording::record_result`. A recorded `Err` comes back as the
/// recorded message.
pub(crate) fn replay_result<T: DeserializeOwned>(output: Value) -> Result<T, PortError> {
    match output {
        Value::Object(mut map) => {
            if let Some(err) = map.remove("Err") {
                let message = err.as_str().map_or_else(|| err.to_string(), str::to_string);
                return Err(message.into());
            }
            match map.remove("Ok") {
                Some(ok) => Ok(serde_json::from_value(ok)?),
                None => Err("recorded result has neither Ok nor Err".into()),
            }
        }
        other => Err(format!("recorded result is not an object: {other}").into()),
    }
}
