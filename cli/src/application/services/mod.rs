//! Application services — use-case orchestration over the port traits.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port implementations.

pub mod acquire;
pub mod autoinit;
pub mod converge;

use anyhow::Result;

use crate::application::ports::{InterruptPoll, OperatorPrompt};

/// Total number of stages announced across the workflow.
pub(crate) const STAGE_COUNT: usize = 5;

/// Poll the interrupt checkpoint.
///
/// A raised interrupt is honored only after the operator confirms
/// abandonment; a declined confirmation consumes the signal and continues.
pub(crate) fn confirmed_interrupt(
    interrupt: &impl InterruptPoll,
    prompt: &impl OperatorPrompt,
) -> Result<bool> {
    if !interrupt.interrupted() {
        return Ok(false);
    }
    prompt.confirm_abort()
}
