//! Application service — profile acquisition use-case.
//!
//! Locates and fetches the profile (retrying with operator-corrected
//! addresses), validates the result and imports the initial configuration
//! sections. Validation is never retried here: a parse failure is terminal,
//! and re-fetching with a corrected source is the only way back.

use anyhow::Result;
use serde_yaml::{Mapping, Value};

use crate::application::ports::{
    InstallInfStore, InterruptPoll, OperatorPrompt, ProfileFetcher, ProfileStore, ProgressReporter,
    ResourceRegistry,
};
use crate::application::services::{confirmed_interrupt, STAGE_COUNT};
use crate::domain::profile::{self, ProfileDocument};
use crate::domain::source::SourceDescriptor;

/// Key of the profile address inside the boot installation record.
pub const PROFILE_ADDRESS_KEY: &str = "AutoProfile";

/// Sections imported before convergence starts.
const INITIAL_SECTIONS: &[&str] = &["report", "general"];

/// Outcome of the acquisition use-case.
#[derive(Debug)]
pub enum AcquireOutcome {
    /// Profile fetched, validated and imported.
    Ready(ProfileDocument),
    /// Operator abandoned the workflow.
    Aborted,
}

/// Acquire and validate the profile named by `source`.
///
/// With `reuse_staged` set, an already staged profile short-circuits the
/// fetch and goes straight to validation.
///
/// # Errors
///
/// Returns an error when a port fails in a way the operator cannot correct
/// (filesystem trouble, prompt I/O). Recoverable conditions are resolved
/// here and surface as [`AcquireOutcome`].
#[allow(clippy::too_many_arguments)]
pub async fn acquire_profile(
    fetcher: &impl ProfileFetcher,
    store: &impl ProfileStore,
    install_inf: &impl InstallInfStore,
    resources: &impl ResourceRegistry,
    prompt: &impl OperatorPrompt,
    interrupt: &impl InterruptPoll,
    reporter: &impl ProgressReporter,
    source: SourceDescriptor,
    reuse_staged: bool,
) -> Result<AcquireOutcome> {
    reporter.stage(2, STAGE_COUNT, "Retrieving the profile");

    let staged_available = reuse_staged && store.staged_bytes()?.is_some();
    if staged_available {
        reporter.step("reusing the already staged profile");
    } else {
        match fetch_with_retry(fetcher, store, install_inf, prompt, interrupt, reporter, source)
            .await?
        {
            FetchOutcome::Staged => {}
            FetchOutcome::Aborted => return Ok(AcquireOutcome::Aborted),
        }
    }

    validate_and_import(store, resources, prompt, reporter).await
}

enum FetchOutcome {
    Staged,
    Aborted,
}

/// The resolver retry loop: unbounded, terminated only by success or by the
/// operator declining to supply a corrected address.
async fn fetch_with_retry(
    fetcher: &impl ProfileFetcher,
    store: &impl ProfileStore,
    install_inf: &impl InstallInfStore,
    prompt: &impl OperatorPrompt,
    interrupt: &impl InterruptPoll,
    reporter: &impl ProgressReporter,
    mut source: SourceDescriptor,
) -> Result<FetchOutcome> {
    if confirmed_interrupt(interrupt, prompt)? {
        return Ok(FetchOutcome::Aborted);
    }

    loop {
        reporter.step(&source.message);
        match fetcher.fetch(&source).await {
            Ok(bytes) => {
                store.stage(&bytes)?;
                break;
            }
            Err(error) => {
                let corrected = prompt.correct_source(&source.original_uri, &format!("{error:#}"))?;
                let corrected = corrected.trim().to_string();
                if corrected.is_empty() {
                    return Ok(FetchOutcome::Aborted);
                }
                // The corrected address outlives this process in the boot
                // record; failing to record it must not stop the retry.
                if let Err(persist_error) = install_inf.set_value(PROFILE_ADDRESS_KEY, &corrected) {
                    reporter.warn(&format!(
                        "could not record the corrected profile address: {persist_error:#}"
                    ));
                }
                source = SourceDescriptor::parse(&corrected);
            }
        }
    }

    if confirmed_interrupt(interrupt, prompt)? {
        return Ok(FetchOutcome::Aborted);
    }
    Ok(FetchOutcome::Staged)
}

async fn validate_and_import(
    store: &impl ProfileStore,
    resources: &impl ResourceRegistry,
    prompt: &impl OperatorPrompt,
    reporter: &impl ProgressReporter,
) -> Result<AcquireOutcome> {
    reporter.stage(3, STAGE_COUNT, "Parsing the profile");

    let bytes = store.staged_bytes()?.unwrap_or_default();
    let document = match profile::parse_profile(&bytes) {
        Ok(document) => document,
        Err(error) => {
            prompt.show_error(&format!(
                "Error while parsing the profile:\n{error}\n\
                 Fix the profile at its source and restart the installation."
            ));
            return Ok(AcquireOutcome::Aborted);
        }
    };

    let unsupported = document.unsupported_sections();
    if !unsupported.is_empty() {
        reporter.warn(&profile::unsupported_section_report(&unsupported));
    }

    reporter.stage(4, STAGE_COUNT, "Initial configuration");
    for section in INITIAL_SECTIONS {
        let data = document
            .get(section)
            .cloned()
            .unwrap_or_else(|| Value::Mapping(Mapping::new()));
        resources.import(section, &data).await?;
    }
    store.publish_for_inspection()?;

    Ok(AcquireOutcome::Ready(document))
}
