//! Recording adapters that capture interactions to cassettes.

pub mod browser;
pub mod clock;

pub use browser::RecordingBrowser;
pub use clock::RecordingClock;

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;

/// Record an interaction with a simple (non-Result) return value.
///
/// Mirror of `replaying::replay_value`. An interaction that cannot be
/// serialized is logged and left out of the cassette.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let output_json = match serde_json::to_value(output) {
        Ok(value) => value,
        Err(e) => {
            warn!(port, method, "failed to serialize recording output: {e}");
            return;
        }
    };
    push(recorder, port, method, input, output_json);
}

/// Record a `Result<T, E>` interaction using the Ok/Err JSON convention.
///
/// Mirror of `replaying::replay_result`.
///
/// Convention:
/// - `Ok(v)` is serialized as `{"Ok": v}`
/// - `Err(e)` is serialized as `{"Err": e.to_string()}`
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let output_json = match result {
        Ok(v) => match serde_json::to_value(v) {
            Ok(inner) => serde_json::json!({ "Ok": inner }),
            Err(e) => {
                warn!(port, method, "failed to serialize Ok value: {e}");
                return;
            }
        },
        Err(e) => serde_json::json!({ "Err": e.to_string() }),
    };
    push(recorder, port, method, input, output_json);
}

fn push<I: Serialize>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: serde_json::Value,
) {
    let input_json = match serde_json::to_value(input) {
        Ok(value) => value,
        Err(e) => {
            warn!(port, method, "failed to serialize recording input: {e}");
            return;
        }
    };
    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input_json, output),
        Err(_) => warn!(port, method, "recorder lock poisoned; interaction dropped"),
    }
}
