//! Pre-install script descriptors.
//!
//! The script sequence is re-derived from the profile on every pass of the
//! convergence loop; it has no identity of its own.

use serde::Deserialize;
use serde_yaml::Value;

use crate::domain::profile::ProfileDocument;

/// Phase tag of scripts executed before the installation proper.
pub const PRE_PHASE: &str = "pre";

/// One script declared by the profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScriptSpec {
    /// File name the script is spooled under.
    pub filename: String,
    /// Inline script body.
    pub source: String,
    /// Local path of an on-disk script, used when `source` is empty.
    pub location: String,
    /// Interpreter the script is run with.
    pub interpreter: String,
}

impl Default for ScriptSpec {
    fn default() -> Self {
        Self {
            filename: "script".to_string(),
            source: String::new(),
            location: String::new(),
            interpreter: "sh".to_string(),
        }
    }
}

/// A script that failed during a non-fatal phase run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFailure {
    pub filename: String,
    pub detail: String,
}

/// Pre-install scripts declared by the profile, in declaration order.
///
/// Malformed entries are dropped; a missing or empty `scripts` section
/// yields an empty sequence.
#[must_use]
pub fn pre_scripts(doc: &ProfileDocument) -> Vec<ScriptSpec> {
    doc.get("scripts")
        .and_then(|section| section.get("pre-scripts"))
        .and_then(Value::as_sequence)
        .map(|list| {
            list.iter()
                .filter_map(|entry| serde_yaml::from_value(entry.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}
