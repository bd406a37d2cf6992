//! Infrastructure implementation of the `ScriptEngine` port.
//!
//! Scripts are materialized into a spool directory and run with their
//! declared interpreter; stdout/stderr land in per-script log files so a
//! failed unattended run can be reconstructed afterwards. A hung script is
//! killed after the phase timeout.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::application::ports::ScriptEngine;
use crate::domain::script::{ScriptFailure, ScriptSpec};
use crate::infra::paths::Paths;

/// Upper bound for a single script run.
pub const SCRIPT_TIMEOUT: Duration = Duration::from_secs(600);

/// Production `ScriptEngine` spooling scripts under the state directory.
pub struct SpoolScriptEngine {
    spool: PathBuf,
    logs: PathBuf,
    timeout: Duration,
    registered: Mutex<Vec<ScriptSpec>>,
}

impl SpoolScriptEngine {
    #[must_use]
    pub fn new(paths: &Paths) -> Self {
        Self {
            spool: paths.script_spool(),
            logs: paths.script_logs(),
            timeout: SCRIPT_TIMEOUT,
            registered: Mutex::new(Vec::new()),
        }
    }

    fn registered_scripts(&self) -> Vec<ScriptSpec> {
        self.registered
            .lock()
            .map(|scripts| scripts.clone())
            .unwrap_or_default()
    }

    /// Resolve the script body: inline source wins, a local location is
    /// read from disk, neither means there is nothing to run.
    fn script_body(spec: &ScriptSpec) -> Result<Option<String>> {
        if !spec.source.is_empty() {
            return Ok(Some(spec.source.clone()));
        }
        if !spec.location.is_empty() {
            // Local paths only; remote script locations are not supported.
            return std::fs::read_to_string(&spec.location)
                .map(Some)
                .with_context(|| format!("reading script location {}", spec.location));
        }
        Ok(None)
    }

    async fn run_one(&self, spec: &ScriptSpec, phase: &str, index: usize) -> Result<()> {
        let Some(body) = Self::script_body(spec)? else {
            return Ok(());
        };

        std::fs::create_dir_all(&self.spool)
            .with_context(|| format!("creating {}", self.spool.display()))?;
        std::fs::create_dir_all(&self.logs)
            .with_context(|| format!("creating {}", self.logs.display()))?;

        let script_path = self.spool.join(format!("{phase}-{index:02}-{}", spec.filename));
        std::fs::write(&script_path, body)
            .with_context(|| format!("spooling {}", script_path.display()))?;

        let (status, stdout, stderr) = self.spawn_and_wait(spec, &script_path).await?;
        self.write_log(spec, &stdout, &stderr)?;

        anyhow::ensure!(
            status.success(),
            "{} exited with {status}",
            spec.filename
        );
        Ok(())
    }

    async fn spawn_and_wait(
        &self,
        spec: &ScriptSpec,
        script_path: &Path,
    ) -> Result<(std::process::ExitStatus, Vec<u8>, Vec<u8>)> {
        let mut child = tokio::process::Command::new(&spec.interpreter)
            .arg(script_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {}", spec.interpreter))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut handle) = stdout_handle {
                            let _ = handle.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut handle) = stderr_handle {
                            let _ = handle.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                let status = status.with_context(|| format!("waiting for {}", spec.filename))?;
                Ok((status, stdout, stderr))
            } => result,
            () = tokio::time::sleep(self.timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{} timed out after {}s", spec.filename, self.timeout.as_secs())
            }
        }
    }

    fn write_log(&self, spec: &ScriptSpec, stdout: &[u8], stderr: &[u8]) -> Result<()> {
        let log_path = self.logs.join(format!("{}.log", spec.filename));
        let mut log = format!("# {} run at {}\n", spec.filename, chrono::Utc::now().to_rfc3339());
        log.push_str(&String::from_utf8_lossy(stdout));
        if !stderr.is_empty() {
            log.push_str("# stderr\n");
            log.push_str(&String::from_utf8_lossy(stderr));
        }
        std::fs::write(&log_path, log).with_context(|| format!("writing {}", log_path.display()))
    }
}

impl ScriptEngine for SpoolScriptEngine {
    fn import(&self, scripts: &[ScriptSpec]) -> Result<()> {
        let mut registered = self
            .registered
            .lock()
            .map_err(|_| anyhow::anyhow!("script registry poisoned"))?;
        *registered = scripts.to_vec();
        Ok(())
    }

    async fn write(&self, phase: &str, fatal: bool) -> Result<Vec<ScriptFailure>> {
        let scripts = self.registered_scripts();
        let mut failures = Vec::new();
        for (index, spec) in scripts.iter().enumerate() {
            match self.run_one(spec, phase, index).await {
                Ok(()) => {}
                Err(error) if fatal => return Err(error),
                Err(error) => failures.push(ScriptFailure {
                    filename: spec.filename.clone(),
                    detail: format!("{error:#}"),
                }),
            }
        }
        Ok(failures)
    }
}
