//! Entities discovered on the portal and the results of a detection run.
//!
//! Entities are flat values. Ownership is expressed by identifier
//! back-references, never by nesting, and every entity is rebuilt from live
//! page content on each run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resource category linked from the portal root (e.g. `Deputados`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Markup fingerprint of the source link.
    pub identifier: String,
    /// Absolute URL of the resource page.
    pub url: String,
    /// Display name of the link.
    pub title: String,
    /// Resource name used for filtering, storage and reporting.
    pub name: String,
}

/// A legislature term folder on a resource page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legislature {
    /// Markup fingerprint of the source link.
    pub identifier: String,
    /// Absolute URL of the legislature page.
    pub url: String,
    /// Human label, e.g. `Pasta XVII Legislatura`.
    pub name: String,
    /// Identifier of the owning resource.
    pub resource_identifier: String,
}

impl Legislature {
    /// Roman-numeral term code embedded in the name, if any.
    #[must_use]
    pub fn term_code(&self) -> Option<&str> {
        crate::discover::legislature::term_code(&self.name)
    }
}

/// A monitored XML document.
///
/// Resource and legislature fields are snapshot copies taken at discovery
/// time so the report can be built after the pages are gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Markup fingerprint of the source link.
    pub identifier: String,
    /// Absolute URL of the XML file.
    pub url: String,
    /// Resolved file name.
    pub filename: String,
    /// Identifier of the owning legislature.
    pub legislature_identifier: String,
    /// Name of the owning legislature.
    pub legislature_name: String,
    /// URL of the owning legislature.
    pub legislature_url: String,
    /// Identifier of the owning resource.
    pub resource_identifier: String,
    /// Name of the owning resource.
    pub resource_name: String,
    /// Display title of the owning resource.
    pub resource_title: String,
    /// URL of the owning resource.
    pub resource_url: String,
}

/// Outcome of one fetch-digest-compare cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    /// `true` when the digest differs from the stored one, or none was stored.
    pub has_changed: bool,
    /// SHA-256 hex digest of the fetched content.
    pub current_digest: String,
    /// Digest stored by a previous run; absent on first observation.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub previous_digest: Option<String>,
    /// Completion time of the detection.
    pub timestamp: DateTime<Utc>,
}

impl ChangeRecord {
    /// Returns `true` when this document had never been observed before.
    #[must_use]
    pub fn is_first_observation(&self) -> bool {
        self.previous_digest.is_none()
    }
}

/// A document paired with its change record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChangeResult {
    /// Document that was checked.
    pub document: Document,
    /// Result of the check.
    pub change: ChangeRecord,
}
