//! Symbolic workflow outcomes.

/// Result of a workflow stage.
///
/// Stages return one of these instead of threading aborts through error
/// types; callers match on the value and stop the sequence on anything but
/// `Next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Continue with the next stage.
    Next,
    /// The operator cancelled, or a terminal error was shown.
    Abort,
    /// A full restart of the workflow was requested; the launcher must
    /// re-run the whole process rather than continue.
    Restart,
}

impl Outcome {
    /// Process exit code reported to whatever launched the workflow.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Next => 0,
            Self::Abort => 1,
            Self::Restart => 2,
        }
    }

    /// Stable lowercase label used in machine-readable output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Abort => "abort",
            Self::Restart => "restart",
        }
    }
}
