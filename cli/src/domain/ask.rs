//! Interactive "ask" prompts declared by the profile.
//!
//! An ask entry substitutes an operator-chosen value back into the profile
//! at a declared path. Substitution reports whether anything actually
//! changed; the convergence loop relies on that signal to reach a fixed
//! point.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::domain::profile::ProfileDocument;

/// One prompt from `general/ask-list`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AskEntry {
    /// Prompt text shown to the operator.
    pub question: String,
    /// Answer used without prompting in non-interactive runs, and offered
    /// as the pre-filled answer otherwise.
    pub default: Option<Value>,
    /// `text`, `password`, `boolean` or `selection`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Comma-separated path of the profile element the answer replaces.
    pub path: String,
    /// Choices offered for `selection` prompts.
    pub selection: Vec<SelectionItem>,
}

impl Default for AskEntry {
    fn default() -> Self {
        Self {
            question: String::new(),
            default: None,
            kind: "text".to_string(),
            path: String::new(),
            selection: Vec::new(),
        }
    }
}

/// One choice of a `selection` prompt.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectionItem {
    /// Value substituted into the profile when chosen.
    pub value: Value,
    /// Text shown to the operator; falls back to the value.
    #[serde(default)]
    pub label: String,
}

/// Ask prompts declared by the profile, in declaration order.
///
/// Malformed entries are dropped; a missing list yields an empty sequence.
#[must_use]
pub fn ask_list(doc: &ProfileDocument) -> Vec<AskEntry> {
    doc.get("general")
        .and_then(|general| general.get("ask-list"))
        .and_then(Value::as_sequence)
        .map(|list| {
            list.iter()
                .filter_map(|entry| serde_yaml::from_value(entry.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Substitute `value` into the document at a comma-separated path.
///
/// Numeric segments index sequences, everything else keys mappings;
/// missing intermediate levels are created. Returns whether the document
/// changed — substituting a value equal to the current content is a no-op.
pub fn substitute(doc: &mut ProfileDocument, path: &str, value: Value) -> bool {
    let segments: Vec<&str> = path
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();
    let Some((first, rest)) = segments.split_first() else {
        return false;
    };
    let slot = doc
        .sections_mut()
        .entry(Value::String((*first).to_string()))
        .or_insert(Value::Null);
    set_nested(slot, rest, value)
}

fn set_nested(target: &mut Value, segments: &[&str], value: Value) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        if *target == value {
            return false;
        }
        *target = value;
        return true;
    };

    if let Ok(index) = head.parse::<usize>() {
        if !matches!(target, Value::Sequence(_)) {
            *target = Value::Sequence(Vec::new());
        }
        let Value::Sequence(sequence) = target else {
            return false;
        };
        if sequence.len() <= index {
            sequence.resize(index + 1, Value::Null);
        }
        set_nested(&mut sequence[index], rest, value)
    } else {
        if !matches!(target, Value::Mapping(_)) {
            *target = Value::Mapping(Mapping::new());
        }
        let Value::Mapping(mapping) = target else {
            return false;
        };
        let entry = mapping
            .entry(Value::String((*head).to_string()))
            .or_insert(Value::Null);
        set_nested(entry, rest, value)
    }
}
