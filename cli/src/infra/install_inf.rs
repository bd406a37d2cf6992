//! Infrastructure implementation of the `InstallInfStore` port.
//!
//! The boot-time installation record is line-oriented `Key: value` text.
//! The profile address key is rewritten in place when the operator corrects
//! a failed address, so a workflow restart picks up the corrected value.

use std::path::PathBuf;

use anyhow::{Context, Result};
use regex::Regex;

use crate::application::ports::InstallInfStore;

/// Production `InstallInfStore` backed by a plain text file.
pub struct InstallInfFile {
    path: PathBuf,
}

impl InstallInfFile {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl InstallInfStore for InstallInfFile {
    fn read_all(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&self.path)
            .map(Some)
            .with_context(|| format!("reading {}", self.path.display()))
    }

    fn value_of(&self, key: &str) -> Result<Option<String>> {
        let Some(text) = self.read_all()? else {
            return Ok(None);
        };
        for line in text.lines() {
            if let Some((candidate, value)) = line.split_once(':') {
                if candidate.trim() == key {
                    return Ok(Some(value.trim().to_string()));
                }
            }
        }
        Ok(None)
    }

    fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let current = self.read_all()?.unwrap_or_default();
        let pattern = Regex::new(&format!(r"(?m)^{}:.*$", regex::escape(key)))
            .context("building key pattern")?;
        let replacement = format!("{key}: {value}");

        let updated = if pattern.is_match(&current) {
            pattern.replace(&current, replacement.as_str()).into_owned()
        } else if current.is_empty() {
            format!("{replacement}\n")
        } else if current.ends_with('\n') {
            format!("{current}{replacement}\n")
        } else {
            format!("{current}\n{replacement}\n")
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&self.path, updated)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}
