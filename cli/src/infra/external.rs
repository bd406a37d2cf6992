//! Infrastructure implementation of the `ExternalStep` port.
//!
//! Downstream stages (system analysis, the iSCSI pre-probe) are optional
//! hook executables under the hooks directory. A missing hook is a
//! successful no-op so the core stays runnable without the full installer
//! around it.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ExternalStep;
use crate::domain::outcome::Outcome;

/// Production `ExternalStep` delegating to hook executables.
pub struct HookStep {
    hooks_dir: PathBuf,
}

impl HookStep {
    #[must_use]
    pub fn new(hooks_dir: PathBuf) -> Self {
        Self { hooks_dir }
    }
}

impl ExternalStep for HookStep {
    async fn run(&self, step: &str) -> Result<Outcome> {
        let hook = self.hooks_dir.join(step);
        if !hook.exists() {
            return Ok(Outcome::Next);
        }
        let status = tokio::process::Command::new(&hook)
            .status()
            .await
            .with_context(|| format!("running step hook {}", hook.display()))?;
        Ok(if status.success() {
            Outcome::Next
        } else {
            Outcome::Abort
        })
    }
}
