//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator. This module has zero imports from
//! `crate::infra`, `crate::commands` or `crate::application`.

use thiserror::Error;

// ── Profile errors ────────────────────────────────────────────────────────────

/// Errors raised while parsing and validating a profile document.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile could not be decoded: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("profile is empty")]
    Empty,

    #[error("profile root must be a mapping of sections")]
    NotAMapping,
}

// ── Source errors ─────────────────────────────────────────────────────────────

/// Errors raised while materializing a profile source address.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unsupported scheme '{0}' in profile address")]
    UnsupportedScheme(String),
}

// ── Resource errors ───────────────────────────────────────────────────────────

/// Errors raised by the configuration resource registry.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("unknown resource '{0}': no handler is registered for it")]
    Unknown(String),
}
