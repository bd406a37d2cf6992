//! Filesystem layout of the installer state directory.

use std::path::{Path, PathBuf};

/// Default state directory of a privileged installer run.
pub const DEFAULT_STATE_DIR: &str = "/var/lib/autoinit";

/// Directory and file locations, honoring the `AUTOINIT_*` environment
/// overrides so tests and unprivileged runs stay sandboxed.
#[derive(Debug, Clone)]
pub struct Paths {
    state_dir: PathBuf,
}

impl Paths {
    /// Resolve the state directory: `AUTOINIT_DIR` wins, then the system
    /// location when it exists, then a per-user fallback.
    #[must_use]
    pub fn resolve() -> Self {
        if let Some(dir) = std::env::var_os("AUTOINIT_DIR") {
            return Self {
                state_dir: PathBuf::from(dir),
            };
        }
        let system = PathBuf::from(DEFAULT_STATE_DIR);
        if system.exists() {
            return Self { state_dir: system };
        }
        let state_dir = dirs::home_dir()
            .map_or_else(|| PathBuf::from(DEFAULT_STATE_DIR), |home| home.join(".autoinit"));
        Self { state_dir }
    }

    /// Use an explicit state directory (tests).
    #[must_use]
    pub fn with_state_dir(state_dir: PathBuf) -> Self {
        Self { state_dir }
    }

    #[must_use]
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Raw bytes of the profile as last fetched or adopted.
    #[must_use]
    pub fn staged_profile(&self) -> PathBuf {
        self.state_dir.join("staged.yaml")
    }

    /// Copy of the validated profile kept for operator inspection.
    #[must_use]
    pub fn inspection_copy(&self) -> PathBuf {
        self.state_dir.join("autoinst.yaml")
    }

    /// Drop point for profile rewrites produced by scripts and ask steps.
    #[must_use]
    pub fn modified_profile(&self) -> PathBuf {
        self.state_dir.join("modified.yaml")
    }

    /// Existence of this file requests a full workflow restart.
    #[must_use]
    pub fn restart_sentinel(&self) -> PathBuf {
        self.state_dir.join("restart")
    }

    /// Where script sources are materialized before execution.
    #[must_use]
    pub fn script_spool(&self) -> PathBuf {
        self.state_dir.join("scripts")
    }

    /// Where script output is captured.
    #[must_use]
    pub fn script_logs(&self) -> PathBuf {
        self.state_dir.join("logs")
    }

    /// Where imported resource sections are persisted for their domains.
    #[must_use]
    pub fn resource_state(&self) -> PathBuf {
        self.state_dir.join("resources")
    }

    /// The boot-time installation record.
    #[must_use]
    pub fn install_inf(&self) -> PathBuf {
        std::env::var_os("AUTOINIT_INSTALL_INF")
            .map_or_else(|| PathBuf::from("/etc/install.inf"), PathBuf::from)
    }

    /// Hook executables for external steps and resource write-backs.
    #[must_use]
    pub fn hooks_dir(&self) -> PathBuf {
        std::env::var_os("AUTOINIT_HOOKS")
            .map_or_else(|| self.state_dir.join("hooks"), PathBuf::from)
    }

    /// The installable-product catalog.
    #[must_use]
    pub fn products_catalog(&self) -> PathBuf {
        std::env::var_os("AUTOINIT_PRODUCTS")
            .map_or_else(|| self.state_dir.join("products.yaml"), PathBuf::from)
    }
}
