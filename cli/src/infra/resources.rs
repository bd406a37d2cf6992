//! Infrastructure implementation of the `ResourceRegistry` port.
//!
//! Every configuration domain the core touches sits behind the same
//! import/write pair. `import` persists the profile section for the domain;
//! `write` hands it to an optional per-resource hook executable on stdin.
//! The core never inspects what a domain does with its section.

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;

use crate::application::ports::ResourceRegistry;
use crate::domain::error::ResourceError;
use crate::infra::paths::Paths;

/// Resource names with a registered handler.
pub const KNOWN_RESOURCES: &[&str] = &["report", "general", "iscsi-client", "fcoe-client"];

/// Production `ResourceRegistry` persisting sections under the state
/// directory and delegating `write` to hook executables.
pub struct HookResourceRegistry {
    state_dir: PathBuf,
    hooks_dir: PathBuf,
}

impl HookResourceRegistry {
    #[must_use]
    pub fn new(paths: &Paths) -> Self {
        Self {
            state_dir: paths.resource_state(),
            hooks_dir: paths.hooks_dir(),
        }
    }

    fn known(resource: &str) -> Result<()> {
        if KNOWN_RESOURCES.contains(&resource) {
            Ok(())
        } else {
            Err(ResourceError::Unknown(resource.to_string()).into())
        }
    }

    fn section_path(&self, resource: &str) -> PathBuf {
        self.state_dir.join(format!("{resource}.yaml"))
    }
}

impl ResourceRegistry for HookResourceRegistry {
    async fn import(&self, resource: &str, data: &serde_yaml::Value) -> Result<()> {
        Self::known(resource)?;
        std::fs::create_dir_all(&self.state_dir)
            .with_context(|| format!("creating {}", self.state_dir.display()))?;
        let text = serde_yaml::to_string(data)
            .with_context(|| format!("serializing section for {resource}"))?;
        let path = self.section_path(resource);
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))
    }

    async fn write(&self, resource: &str) -> Result<()> {
        Self::known(resource)?;
        let hook = self.hooks_dir.join(resource);
        if !hook.exists() {
            return Ok(());
        }

        let path = self.section_path(resource);
        let section = if path.exists() {
            std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?
        } else {
            Vec::new()
        };

        let mut child = tokio::process::Command::new(&hook)
            .stdin(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("running resource hook {}", hook.display()))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&section)
                .await
                .with_context(|| format!("feeding section to {resource} hook"))?;
            drop(stdin);
        }
        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for {resource} hook"))?;
        anyhow::ensure!(status.success(), "{resource} hook exited with {status}");
        Ok(())
    }
}
