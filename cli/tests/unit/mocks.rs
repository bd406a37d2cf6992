//! Shared mock infrastructure for unit tests.
//!
//! Provides canned port implementations and recording helpers so each test
//! file doesn't have to re-define the same boilerplate.

#![allow(clippy::expect_used)]
#![allow(dead_code)] // Not every test file uses every mock

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::Result;
use autoinit_cli::application::ports::{
    ExternalStep, InstallInfStore, InterruptPoll, OperatorPrompt, ProductCatalog, ProfileFetcher,
    ProfileStore, ProgressReporter, ResourceRegistry, ScriptEngine,
};
use autoinit_cli::domain::outcome::Outcome;
use autoinit_cli::domain::product::BaseProduct;
use autoinit_cli::domain::profile::{parse_profile, ProfileDocument};
use autoinit_cli::domain::script::{ScriptFailure, ScriptSpec};
use autoinit_cli::domain::source::SourceDescriptor;

// ── Fixture helpers ───────────────────────────────────────────────────────────

pub fn doc(yaml: &str) -> ProfileDocument {
    parse_profile(yaml.as_bytes()).expect("valid profile fixture")
}

pub fn product(name: &str, display_name: &str) -> BaseProduct {
    BaseProduct {
        name: name.to_string(),
        display_name: display_name.to_string(),
    }
}

// ── Mock: queue-scripted fetcher ──────────────────────────────────────────────

/// Pops one canned response per `fetch` call and records every address.
pub struct QueueFetcher {
    responses: Mutex<VecDeque<Result<Vec<u8>>>>,
    calls: Mutex<Vec<String>>,
}

impl QueueFetcher {
    pub fn new(responses: Vec<Result<Vec<u8>>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn addresses(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("lock").len()
    }
}

impl ProfileFetcher for QueueFetcher {
    async fn fetch(&self, source: &SourceDescriptor) -> Result<Vec<u8>> {
        self.calls
            .lock()
            .expect("lock")
            .push(source.original_uri.clone());
        self.responses
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| anyhow::bail!("no fetch response scripted"))
    }
}

// ── Mock: in-memory profile store ─────────────────────────────────────────────

/// A rewrite waiting at the modified location.
pub enum Rewrite {
    Doc(ProfileDocument),
    Unparsable,
}

pub struct MemoryProfileStore {
    staged: Mutex<Option<Vec<u8>>>,
    rewrites: Mutex<VecDeque<Rewrite>>,
    restart: Mutex<bool>,
    published: Mutex<u32>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self {
            staged: Mutex::new(None),
            rewrites: Mutex::new(VecDeque::new()),
            restart: Mutex::new(false),
            published: Mutex::new(0),
        }
    }

    pub fn with_staged(bytes: &[u8]) -> Self {
        let store = Self::new();
        *store.staged.lock().expect("lock") = Some(bytes.to_vec());
        store
    }

    /// Pre-seed a rewrite, as a pre-script dropping one would.
    pub fn push_rewrite(&self, rewrite: Rewrite) {
        self.rewrites.lock().expect("lock").push_back(rewrite);
    }

    pub fn set_restart(&self, requested: bool) {
        *self.restart.lock().expect("lock") = requested;
    }

    pub fn published_count(&self) -> u32 {
        *self.published.lock().expect("lock")
    }

    pub fn staged_content(&self) -> Option<Vec<u8>> {
        self.staged.lock().expect("lock").clone()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn stage(&self, bytes: &[u8]) -> Result<()> {
        *self.staged.lock().expect("lock") = Some(bytes.to_vec());
        Ok(())
    }

    fn staged_bytes(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.staged.lock().expect("lock").clone())
    }

    fn publish_for_inspection(&self) -> Result<()> {
        *self.published.lock().expect("lock") += 1;
        Ok(())
    }

    fn put_modified(&self, doc: &ProfileDocument) -> Result<()> {
        self.push_rewrite(Rewrite::Doc(doc.clone()));
        Ok(())
    }

    fn take_modified(&self) -> Result<Option<ProfileDocument>> {
        match self.rewrites.lock().expect("lock").pop_front() {
            None => Ok(None),
            Some(Rewrite::Doc(doc)) => Ok(Some(doc)),
            Some(Rewrite::Unparsable) => anyhow::bail!("rewritten profile is not parseable"),
        }
    }

    fn restart_requested(&self) -> bool {
        *self.restart.lock().expect("lock")
    }
}

// ── Mock: recording script engine ─────────────────────────────────────────────

pub struct RecordingScriptEngine {
    imports: Mutex<Vec<Vec<ScriptSpec>>>,
    writes: Mutex<Vec<(String, bool)>>,
    failures: Mutex<VecDeque<Vec<ScriptFailure>>>,
}

impl RecordingScriptEngine {
    pub fn new() -> Self {
        Self {
            imports: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue failures returned by the next `write` call.
    pub fn push_failures(&self, failures: Vec<ScriptFailure>) {
        self.failures.lock().expect("lock").push_back(failures);
    }

    pub fn import_count(&self) -> usize {
        self.imports.lock().expect("lock").len()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().expect("lock").len()
    }

    pub fn writes(&self) -> Vec<(String, bool)> {
        self.writes.lock().expect("lock").clone()
    }

    pub fn last_import(&self) -> Vec<ScriptSpec> {
        self.imports
            .lock()
            .expect("lock")
            .last()
            .cloned()
            .unwrap_or_default()
    }
}

impl ScriptEngine for RecordingScriptEngine {
    fn import(&self, scripts: &[ScriptSpec]) -> Result<()> {
        self.imports.lock().expect("lock").push(scripts.to_vec());
        Ok(())
    }

    async fn write(&self, phase: &str, fatal: bool) -> Result<Vec<ScriptFailure>> {
        self.writes
            .lock()
            .expect("lock")
            .push((phase.to_string(), fatal));
        Ok(self
            .failures
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_default())
    }
}

// ── Mock: recording resource registry ─────────────────────────────────────────

/// Records `"import <name>"` / `"write <name>"` in call order.
pub struct RecordingResources {
    calls: Mutex<Vec<String>>,
}

impl RecordingResources {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }
}

impl ResourceRegistry for RecordingResources {
    async fn import(&self, resource: &str, _data: &serde_yaml::Value) -> Result<()> {
        self.calls
            .lock()
            .expect("lock")
            .push(format!("import {resource}"));
        Ok(())
    }

    async fn write(&self, resource: &str) -> Result<()> {
        self.calls
            .lock()
            .expect("lock")
            .push(format!("write {resource}"));
        Ok(())
    }
}

// ── Mock: scripted operator prompt ────────────────────────────────────────────

pub struct ScriptedPrompt {
    corrections: Mutex<VecDeque<String>>,
    confirm_abort_answer: bool,
    errors: Mutex<Vec<String>>,
    asks: Mutex<VecDeque<Option<ProfileDocument>>>,
    ask_calls: Mutex<u32>,
}

impl Default for ScriptedPrompt {
    fn default() -> Self {
        Self {
            corrections: Mutex::new(VecDeque::new()),
            confirm_abort_answer: true,
            errors: Mutex::new(Vec::new()),
            asks: Mutex::new(VecDeque::new()),
            ask_calls: Mutex::new(0),
        }
    }
}

impl ScriptedPrompt {
    /// Addresses handed back, one per correction prompt; an exhausted queue
    /// answers with the empty string ("give up").
    pub fn with_corrections(self, corrections: Vec<&str>) -> Self {
        *self.corrections.lock().expect("lock") =
            corrections.into_iter().map(str::to_string).collect();
        self
    }

    /// Rewrites produced by successive ask steps; an exhausted queue means
    /// "nothing changed".
    pub fn with_asks(self, asks: Vec<Option<ProfileDocument>>) -> Self {
        *self.asks.lock().expect("lock") = asks.into_iter().collect();
        self
    }

    /// Decline the abort confirmation instead of honoring it.
    pub fn deny_abort(mut self) -> Self {
        self.confirm_abort_answer = false;
        self
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("lock").clone()
    }

    pub fn ask_call_count(&self) -> u32 {
        *self.ask_calls.lock().expect("lock")
    }
}

impl OperatorPrompt for ScriptedPrompt {
    fn correct_source(&self, _current: &str, _error: &str) -> Result<String> {
        Ok(self
            .corrections
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_default())
    }

    fn confirm_abort(&self) -> Result<bool> {
        Ok(self.confirm_abort_answer)
    }

    fn show_error(&self, message: &str) {
        self.errors.lock().expect("lock").push(message.to_string());
    }

    fn ask(&self, _doc: &ProfileDocument) -> Result<Option<ProfileDocument>> {
        *self.ask_calls.lock().expect("lock") += 1;
        Ok(self
            .asks
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_default())
    }
}

// ── Mock: scripted interrupt poll ─────────────────────────────────────────────

/// Pops one canned answer per poll; an exhausted queue means "not raised".
pub struct StaticInterrupt {
    signals: Mutex<VecDeque<bool>>,
}

impl StaticInterrupt {
    pub fn new(signals: Vec<bool>) -> Self {
        Self {
            signals: Mutex::new(signals.into_iter().collect()),
        }
    }

    pub fn idle() -> Self {
        Self::new(Vec::new())
    }
}

impl InterruptPoll for StaticInterrupt {
    fn interrupted(&self) -> bool {
        self.signals
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(false)
    }
}

// ── Mock: recording external steps ────────────────────────────────────────────

pub struct RecordingSteps {
    outcome: Outcome,
    calls: Mutex<Vec<String>>,
}

impl RecordingSteps {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }
}

impl ExternalStep for RecordingSteps {
    async fn run(&self, step: &str) -> Result<Outcome> {
        self.calls.lock().expect("lock").push(step.to_string());
        Ok(self.outcome)
    }
}

// ── Mock: in-memory install.inf ───────────────────────────────────────────────

pub struct MemoryInstallInf {
    text: Mutex<Option<String>>,
    sets: Mutex<Vec<(String, String)>>,
    fail_sets: bool,
}

impl MemoryInstallInf {
    pub fn new(text: Option<&str>) -> Self {
        Self {
            text: Mutex::new(text.map(str::to_string)),
            sets: Mutex::new(Vec::new()),
            fail_sets: false,
        }
    }

    /// A record whose rewrites always fail (read-only boot medium).
    pub fn failing(text: Option<&str>) -> Self {
        Self {
            fail_sets: true,
            ..Self::new(text)
        }
    }

    pub fn sets(&self) -> Vec<(String, String)> {
        self.sets.lock().expect("lock").clone()
    }
}

impl InstallInfStore for MemoryInstallInf {
    fn read_all(&self) -> Result<Option<String>> {
        Ok(self.text.lock().expect("lock").clone())
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
        anyhow::ensure!(!self.fail_sets, "boot record is read-only");
        self.sets
            .lock()
            .expect("lock")
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}

// ── Mock: static product catalog ──────────────────────────────────────────────

pub struct StaticCatalog {
    products: Vec<BaseProduct>,
}

impl StaticCatalog {
    pub fn new(products: Vec<BaseProduct>) -> Self {
        Self { products }
    }
}

impl ProductCatalog for StaticCatalog {
    fn available(&self) -> Result<Vec<BaseProduct>> {
        Ok(self.products.clone())
    }
}

// ── Mock: progress reporters ──────────────────────────────────────────────────

pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn stage(&self, _: usize, _: usize, _: &str) {}
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

pub struct RecordingReporter {
    warns: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self {
            warns: Mutex::new(Vec::new()),
        }
    }

    pub fn warns(&self) -> Vec<String> {
        self.warns.lock().expect("lock").clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn stage(&self, _: usize, _: usize, _: &str) {}
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, message: &str) {
        self.warns.lock().expect("lock").push(message.to_string());
    }
}
