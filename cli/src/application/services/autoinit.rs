//! Application service — the autoinstallation workflow orchestrator.
//!
//! Sequences acquisition → validation → initial configuration →
//! convergence → system-analysis handoff, and owns the abort/continue
//! contract: every stage returns a symbolic outcome and the sequence stops
//! on anything but "next".

use anyhow::Result;

use crate::application::ports::{
    ExternalStep, InstallInfStore, InterruptPoll, OperatorPrompt, ProductCatalog, ProfileFetcher,
    ProfileStore, ProgressReporter, ResourceRegistry, ScriptEngine,
};
use crate::application::services::acquire::{self, AcquireOutcome, PROFILE_ADDRESS_KEY};
use crate::application::services::converge::{self, ConvergeOutcome};
use crate::application::services::{confirmed_interrupt, STAGE_COUNT};
use crate::domain::outcome::Outcome;
use crate::domain::product;
use crate::domain::source::SourceDescriptor;

/// Profile embedded in the target's root partition, used by upgrade runs
/// that carry no explicit profile address.
pub const ROOT_PART_PROFILE: &str = "file:///mnt/root/autoupg.yaml";

/// Storage client sections delegated after the system-analysis handoff.
const STORAGE_CLIENTS: &[&str] = &["iscsi-client", "fcoe-client"];

/// Options resolved from the command line.
#[derive(Debug, Default)]
pub struct WorkflowOptions {
    /// Explicit profile address; overrides the boot record.
    pub profile_uri: Option<String>,
    /// Upgrade an installed system instead of installing a fresh one.
    pub autoupgrade: bool,
}

/// Drive the full preparation workflow.
///
/// # Errors
///
/// Returns an error when a port fails in a way no stage can resolve;
/// operator aborts and restart requests surface as [`Outcome`] values.
#[allow(clippy::too_many_arguments)]
pub async fn run_workflow(
    fetcher: &impl ProfileFetcher,
    store: &impl ProfileStore,
    scripts: &impl ScriptEngine,
    resources: &impl ResourceRegistry,
    steps: &impl ExternalStep,
    install_inf: &impl InstallInfStore,
    products: &impl ProductCatalog,
    prompt: &impl OperatorPrompt,
    interrupt: &impl InterruptPoll,
    reporter: &impl ProgressReporter,
    opts: &WorkflowOptions,
) -> Result<Outcome> {
    reporter.stage(1, STAGE_COUNT, "Probing the installation environment");
    preprobe_storage(steps, install_inf).await?;

    let plan = resolve_source(store, install_inf, opts)?;

    let document = match acquire::acquire_profile(
        fetcher,
        store,
        install_inf,
        resources,
        prompt,
        interrupt,
        reporter,
        plan.source,
        plan.reuse_staged,
    )
    .await?
    {
        AcquireOutcome::Ready(document) => document,
        AcquireOutcome::Aborted => return Ok(Outcome::Abort),
    };

    let document =
        match converge::converge_profile(scripts, store, prompt, interrupt, reporter, document)
            .await?
        {
            ConvergeOutcome::Settled(document) => document,
            ConvergeOutcome::Aborted => return Ok(Outcome::Abort),
            ConvergeOutcome::RestartRequested => return Ok(Outcome::Restart),
        };

    // An upgrade driven by the profile embedded in the root partition has
    // nothing left to analyze.
    if !(opts.autoupgrade && plan.profile_in_root) {
        reporter.step("handing off to system analysis");
        if steps.run("system-analysis").await? == Outcome::Abort {
            return Ok(Outcome::Abort);
        }
    }

    for client in STORAGE_CLIENTS {
        if let Some(data) = document.get(client) {
            reporter.step(&format!("configuring {client}"));
            resources.import(client, data).await?;
            resources.write(client).await?;
        }
    }

    let available = products.available()?;
    if product::select_base_product(&document, &available).is_none() {
        prompt.show_error(&product::missing_product_report(&available));
        return Ok(Outcome::Abort);
    }

    if confirmed_interrupt(interrupt, prompt)? {
        return Ok(Outcome::Abort);
    }

    reporter.success("system prepared for automatic installation");
    Ok(Outcome::Next)
}

/// Invoke the iSCSI client before anything else when the boot record says
/// the installation source lives on iSCSI.
async fn preprobe_storage(
    steps: &impl ExternalStep,
    install_inf: &impl InstallInfStore,
) -> Result<()> {
    if let Some(text) = install_inf.read_all()? {
        if text.to_ascii_lowercase().contains("iscsi: 1") {
            // The pre-probe outcome is informational; the workflow goes on
            // either way.
            let _ = steps.run("iscsi-client").await?;
        }
    }
    Ok(())
}

struct SourcePlan {
    source: SourceDescriptor,
    profile_in_root: bool,
    reuse_staged: bool,
}

/// Decide where the profile comes from: the explicit address, the boot
/// record, the root-partition profile (upgrade mode), or — failing all of
/// those — an empty address that sends the operator straight to the
/// correction prompt.
fn resolve_source(
    store: &impl ProfileStore,
    install_inf: &impl InstallInfStore,
    opts: &WorkflowOptions,
) -> Result<SourcePlan> {
    if let Some(uri) = opts.profile_uri.as_deref() {
        // An explicit address always re-fetches.
        return Ok(SourcePlan {
            source: SourceDescriptor::parse(uri),
            profile_in_root: false,
            reuse_staged: false,
        });
    }

    let recorded = install_inf
        .value_of(PROFILE_ADDRESS_KEY)?
        .filter(|value| !value.trim().is_empty());
    if let Some(uri) = recorded {
        return Ok(SourcePlan {
            source: SourceDescriptor::parse(&uri),
            profile_in_root: false,
            reuse_staged: store.staged_bytes()?.is_some(),
        });
    }

    if opts.autoupgrade {
        return Ok(SourcePlan {
            source: SourceDescriptor::parse(ROOT_PART_PROFILE),
            profile_in_root: true,
            reuse_staged: false,
        });
    }

    Ok(SourcePlan {
        source: SourceDescriptor::parse(""),
        profile_in_root: false,
        reuse_staged: store.staged_bytes()?.is_some(),
    })
}
