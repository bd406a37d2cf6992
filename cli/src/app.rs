//! Application context — unified state passed to every command handler.
//!
//! `AppContext` gathers the cross-cutting pieces each command needs
//! (terminal output, filesystem layout, interactivity). Adding a new
//! concern requires only one field change here — zero command signatures
//! change.

use crate::infra::paths::Paths;
use crate::output::{OutputContext, TerminalReporter};

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Skip interactive prompts (also set by `CI` / `AUTOINIT_YES` env vars).
    pub yes: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Filesystem layout of the installer state directory.
    pub paths: Paths,
    /// When `true`, skip interactive prompts and use declared defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or
    /// `AUTOINIT_YES` environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("AUTOINIT_YES").is_ok();
        Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            paths: Paths::resolve(),
            non_interactive: flags.yes || ci_env,
        }
    }

    /// Progress reporter wired to this context's terminal output.
    #[must_use]
    pub fn terminal_reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }
}
