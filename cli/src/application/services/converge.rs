//! Application service — profile convergence use-case.
//!
//! Re-runs pre-install scripts and ask prompts until the profile stops
//! changing. Scripts and ask steps signal a change by dropping a rewritten
//! profile at the modified location; each rewrite is adopted wholesale and
//! fed back into the next pass.

use anyhow::Result;

use crate::application::ports::{
    InterruptPoll, OperatorPrompt, ProfileStore, ProgressReporter, ScriptEngine,
};
use crate::application::services::{confirmed_interrupt, STAGE_COUNT};
use crate::domain::profile::ProfileDocument;
use crate::domain::script;

/// Outcome of the convergence loop.
#[derive(Debug)]
pub enum ConvergeOutcome {
    /// The profile reached a fixed point; carries the settled document.
    Settled(ProfileDocument),
    /// Operator abandoned the workflow, or a rewrite was unusable.
    Aborted,
    /// The restart sentinel appeared; the whole workflow must be re-run.
    RestartRequested,
}

/// Converge the profile: run pre-scripts and ask prompts until neither
/// produces a rewrite.
///
/// There is deliberately no iteration cap — termination relies on the
/// script/ask mechanism eventually reporting no further delta. The pass
/// counter is diagnostic only.
///
/// # Errors
///
/// Returns an error when a port fails outside the recoverable paths
/// (script spooling, prompt I/O). Abort and restart conditions surface as
/// [`ConvergeOutcome`].
pub async fn converge_profile(
    scripts: &impl ScriptEngine,
    store: &impl ProfileStore,
    prompt: &impl OperatorPrompt,
    interrupt: &impl InterruptPoll,
    reporter: &impl ProgressReporter,
    mut current: ProfileDocument,
) -> Result<ConvergeOutcome> {
    reporter.stage(5, STAGE_COUNT, "Executing pre-install scripts");

    run_pre_scripts(scripts, reporter, &current).await?;
    let mut pass_delta = match reparse_modified(store, prompt, &mut current) {
        Reparse::Changed => true,
        Reparse::Unchanged => false,
        Reparse::Aborted => return Ok(ConvergeOutcome::Aborted),
    };

    if confirmed_interrupt(interrupt, prompt)? {
        return Ok(ConvergeOutcome::Aborted);
    }

    let mut passes: u32 = 1;
    loop {
        // The sentinel wins over everything, including "no further delta".
        if store.restart_requested() {
            return Ok(ConvergeOutcome::RestartRequested);
        }

        let ask_delta = match run_ask(store, prompt, &mut current)? {
            Reparse::Changed => true,
            Reparse::Unchanged => false,
            Reparse::Aborted => return Ok(ConvergeOutcome::Aborted),
        };

        if !pass_delta && !ask_delta {
            break;
        }

        run_pre_scripts(scripts, reporter, &current).await?;
        passes += 1;
        pass_delta = match reparse_modified(store, prompt, &mut current) {
            Reparse::Changed => true,
            Reparse::Unchanged => false,
            Reparse::Aborted => return Ok(ConvergeOutcome::Aborted),
        };
    }

    if passes > 1 {
        reporter.step(&format!("profile settled after {passes} script passes"));
    }

    // The ask step may have adjusted script content without triggering
    // another full cycle; leave the engine holding the settled sequence.
    scripts.import(&script::pre_scripts(&current))?;

    Ok(ConvergeOutcome::Settled(current))
}

/// One import-then-write pass over the pre-install scripts.
async fn run_pre_scripts(
    scripts: &impl ScriptEngine,
    reporter: &impl ProgressReporter,
    doc: &ProfileDocument,
) -> Result<()> {
    scripts.import(&script::pre_scripts(doc))?;
    let failures = scripts.write(script::PRE_PHASE, false).await?;
    for failure in &failures {
        reporter.warn(&format!(
            "pre-install script {} failed: {}",
            failure.filename, failure.detail
        ));
    }
    Ok(())
}

enum Reparse {
    Changed,
    Unchanged,
    Aborted,
}

/// Re-validate the profile from its canonical location, adopting a rewrite
/// when one exists.
fn reparse_modified(
    store: &impl ProfileStore,
    prompt: &impl OperatorPrompt,
    current: &mut ProfileDocument,
) -> Reparse {
    match store.take_modified() {
        Ok(Some(document)) => {
            *current = document;
            Reparse::Changed
        }
        Ok(None) => Reparse::Unchanged,
        Err(error) => {
            prompt.show_error(&format!(
                "The rewritten profile cannot be used:\n{error:#}\n\
                 Fix the pre-install scripts or ask defaults and restart the installation."
            ));
            Reparse::Aborted
        }
    }
}

/// Present the ask prompts and pick up any rewrite they produced.
fn run_ask(
    store: &impl ProfileStore,
    prompt: &impl OperatorPrompt,
    current: &mut ProfileDocument,
) -> Result<Reparse> {
    if let Some(rewrite) = prompt.ask(current)? {
        store.put_modified(&rewrite)?;
    }
    Ok(reparse_modified(store, prompt, current))
}
