//! Cassette data structures for recording and replaying interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (`page` or `clock`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Input data sent to the port.
    pub input: serde_json::Value,
    /// Output data returned from the port, using the `{"Ok": ..}` / `{"Err": ..}`
    /// convention for fallible methods.
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Portal root the recorded run started from.
    pub source: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Returns `true` if any interaction was recorded for `port`.
    #[must_use]
    pub fn has_port(&self, port: &str) -> bool {
        self.interactions.iter().any(|i| i.port == port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_cassette() -> Cassette {
        Cassette {
            name: "test-cassette".into(),
            recorded_at: Utc::now(),
            source: "https://example.com/dadosabertos.aspx".into(),
            interactions: vec![
                Interaction {
                    seq: 0,
                    port: "page".into(),
                    method: "navigate".into(),
                    input: json!({"url": "https://example.com/dadosabertos.aspx"}),
                    output: json!({"Ok": null}),
                },
                Interaction {
                    seq: 1,
                    port: "page".into(),
                    method: "query".into(),
                    input: json!({"selector": "a"}),
                    output: json!({"Ok": []}),
                },
            ],
        }
    }

    #[test]
    fn yaml_preserves_interactions() {
        let cassette = sample_cassette();
        let yaml = serde_yaml::to_string(&cassette).expect("serialize");
        let deserialized: Cassette = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(cassette, deserialized);
    }

    #[test]
    fn has_port_checks_interactions() {
        let cassette = sample_cassette();
        assert!(cassette.has_port("page"));
        assert!(!cassette.has_port("clock"));
    }
}
