//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use anyhow::Result;

use crate::domain::outcome::Outcome;
use crate::domain::product::BaseProduct;
use crate::domain::profile::ProfileDocument;
use crate::domain::script::{ScriptFailure, ScriptSpec};
use crate::domain::source::SourceDescriptor;

// ── Profile Acquisition Ports ─────────────────────────────────────────────────

/// Materializes raw profile bytes from a source address.
#[allow(async_fn_in_trait)]
pub trait ProfileFetcher {
    /// Fetch the profile at `source`.
    ///
    /// Success means "bytes obtained", nothing more — validity is the
    /// validator's concern. Any failure is recoverable by retrying with a
    /// corrected address.
    async fn fetch(&self, source: &SourceDescriptor) -> Result<Vec<u8>>;
}

/// On-disk lifecycle of the profile being processed.
///
/// Scripts and ask steps signal a change by dropping a rewritten profile at
/// the modified location; `take_modified` adopts it wholesale.
pub trait ProfileStore {
    /// Persist freshly fetched raw bytes as the staged profile.
    fn stage(&self, bytes: &[u8]) -> Result<()>;
    /// Raw bytes of the staged profile, if one exists.
    fn staged_bytes(&self) -> Result<Option<Vec<u8>>>;
    /// Copy the staged profile to the operator inspection path.
    fn publish_for_inspection(&self) -> Result<()>;
    /// Drop a rewritten document at the modified location.
    fn put_modified(&self, doc: &ProfileDocument) -> Result<()>;
    /// Adopt a rewrite if one exists, replacing the staged profile and
    /// clearing the modified location. `None` means no rewrite happened. A
    /// rewrite that cannot be parsed is an error; the caller aborts.
    fn take_modified(&self) -> Result<Option<ProfileDocument>>;
    /// Whether a full workflow restart has been requested.
    fn restart_requested(&self) -> bool;
}

// ── Script Execution Port ─────────────────────────────────────────────────────

/// Registers and executes profile-declared scripts, one phase at a time.
///
/// The core always calls `import` and `write` as a strict pair.
#[allow(async_fn_in_trait)]
pub trait ScriptEngine {
    /// Replace the registered script sequence.
    fn import(&self, scripts: &[ScriptSpec]) -> Result<()>;
    /// Execute every registered script of `phase`, in order. With
    /// `fatal == false` individual failures are collected and returned;
    /// with `fatal == true` the first failure is an error.
    async fn write(&self, phase: &str, fatal: bool) -> Result<Vec<ScriptFailure>>;
}

// ── Resource Import/Write Port ────────────────────────────────────────────────

/// Configuration domains behind the generic import/write contract.
///
/// The core never inspects a domain's internal state; it hands over the
/// profile section and asks the domain to apply it.
#[allow(async_fn_in_trait)]
pub trait ResourceRegistry {
    /// Hand `data` to the named resource.
    ///
    /// # Errors
    ///
    /// Unknown resource names fail with `ResourceError::Unknown`.
    async fn import(&self, resource: &str, data: &serde_yaml::Value) -> Result<()>;
    /// Apply the named resource's imported configuration.
    async fn write(&self, resource: &str) -> Result<()>;
}

// ── Operator Interaction Port ─────────────────────────────────────────────────

/// Interactive prompts the workflow suspends on.
///
/// There is no timeout; implementations block until the operator answers.
pub trait OperatorPrompt {
    /// Ask the operator to correct a profile address that failed to
    /// resolve. Empty input means "give up".
    fn correct_source(&self, current: &str, error: &str) -> Result<String>;
    /// Ask whether a raised interrupt should really abandon the run.
    fn confirm_abort(&self) -> Result<bool>;
    /// Show a terminal, non-dismissable error explanation.
    fn show_error(&self, message: &str);
    /// Run the profile's ask prompts. Returns the updated document when
    /// any answer changed the profile content.
    fn ask(&self, doc: &ProfileDocument) -> Result<Option<ProfileDocument>>;
}

// ── Cancellation Port ─────────────────────────────────────────────────────────

/// Cooperative cancellation, polled at defined checkpoints only.
pub trait InterruptPoll {
    /// Whether the operator has raised an interrupt since the last poll.
    /// Polling consumes the signal.
    fn interrupted(&self) -> bool;
}

// ── Downstream Step Port ──────────────────────────────────────────────────────

/// Opaque downstream stages (hardware probing, system analysis, storage
/// clients). The core only sequences them and reads their outcome.
#[allow(async_fn_in_trait)]
pub trait ExternalStep {
    /// Run the named step, returning its symbolic outcome.
    async fn run(&self, step: &str) -> Result<Outcome>;
}

// ── Boot Record Port ──────────────────────────────────────────────────────────

/// The boot-time installation record (line-oriented `Key: value` text).
pub trait InstallInfStore {
    /// Full text of the record, if present.
    fn read_all(&self) -> Result<Option<String>>;
    /// Value of `key`, if present.
    fn value_of(&self, key: &str) -> Result<Option<String>>;
    /// Rewrite `key` in place, appending it when missing.
    fn set_value(&self, key: &str, value: &str) -> Result<()>;
}

// ── Product Catalog Port ──────────────────────────────────────────────────────

/// Installable base products offered by the current installation media.
pub trait ProductCatalog {
    fn available(&self) -> Result<Vec<BaseProduct>>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Announce a numbered workflow stage.
    fn stage(&self, current: usize, total: usize, title: &str);
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
