//! Profile document model and structural validation.
//!
//! A profile is a YAML mapping from top-level section names to arbitrarily
//! nested content. A document is replaced wholesale on every re-parse;
//! nothing in this module merges documents.

use serde_yaml::{Mapping, Value};

use crate::domain::error::ProfileError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Top-level sections this build knows how to process.
///
/// Anything else is tolerated but reported once, aggregated, before the
/// workflow continues.
pub const SUPPORTED_SECTIONS: &[&str] = &[
    "bootloader",
    "fcoe-client",
    "firewall",
    "general",
    "groups",
    "iscsi-client",
    "kdump",
    "keyboard",
    "language",
    "networking",
    "partitioning",
    "report",
    "scripts",
    "security",
    "services-manager",
    "software",
    "timezone",
    "users",
];

// ── Document ─────────────────────────────────────────────────────────────────

/// Parsed profile document.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDocument {
    sections: Mapping,
}

impl ProfileDocument {
    /// The raw section mapping.
    #[must_use]
    pub fn as_mapping(&self) -> &Mapping {
        &self.sections
    }

    /// Mutable access for value substitution (ask steps).
    pub fn sections_mut(&mut self) -> &mut Mapping {
        &mut self.sections
    }

    /// Content of the named top-level section.
    #[must_use]
    pub fn get(&self, section: &str) -> Option<&Value> {
        self.sections.get(Value::String(section.to_string()))
    }

    /// Whether the named top-level section is present.
    #[must_use]
    pub fn has(&self, section: &str) -> bool {
        self.get(section).is_some()
    }

    /// Names of all top-level sections, in document order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().filter_map(Value::as_str)
    }

    /// Section names not present in [`SUPPORTED_SECTIONS`], in document
    /// order.
    #[must_use]
    pub fn unsupported_sections(&self) -> Vec<String> {
        self.section_names()
            .filter(|name| !SUPPORTED_SECTIONS.contains(name))
            .map(str::to_string)
            .collect()
    }

    /// Serialize the document back to YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the mapping cannot be serialized.
    pub fn to_yaml(&self) -> Result<String, ProfileError> {
        serde_yaml::to_string(&self.sections).map_err(ProfileError::Parse)
    }
}

// ── Parsing ──────────────────────────────────────────────────────────────────

/// Parse raw profile bytes into a document.
///
/// # Errors
///
/// `ProfileError::Parse` when the bytes cannot be decoded, `Empty` when the
/// document is null or has no sections, `NotAMapping` when the root is not
/// a mapping of sections.
pub fn parse_profile(bytes: &[u8]) -> Result<ProfileDocument, ProfileError> {
    let value: Value = serde_yaml::from_slice(bytes)?;
    match value {
        Value::Null => Err(ProfileError::Empty),
        Value::Mapping(sections) if sections.is_empty() => Err(ProfileError::Empty),
        Value::Mapping(sections) => Ok(ProfileDocument { sections }),
        _ => Err(ProfileError::NotAMapping),
    }
}

/// Aggregated advisory warning naming every unsupported section.
#[must_use]
pub fn unsupported_section_report(names: &[String]) -> String {
    let mut message =
        String::from("The following profile sections are not supported and will be ignored:\n");
    for name in names {
        message.push_str(&format!("  <{name}/>\n"));
    }
    message.push_str("Use <scripts/> to apply such configuration instead.");
    message
}
