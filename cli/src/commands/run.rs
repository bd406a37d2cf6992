//! `autoinit run` — drive the full preparation workflow.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::autoinit::{self, WorkflowOptions};
use crate::domain::outcome::Outcome;
use crate::infra::external::HookStep;
use crate::infra::fetch::UriFetcher;
use crate::infra::install_inf::InstallInfFile;
use crate::infra::interrupt::CtrlCPoll;
use crate::infra::products::YamlProductCatalog;
use crate::infra::profile_store::DiskProfileStore;
use crate::infra::prompt::DialoguerPrompt;
use crate::infra::resources::HookResourceRegistry;
use crate::infra::scripts::SpoolScriptEngine;

/// Arguments for the run command.
#[derive(Args, Default)]
pub struct RunArgs {
    /// Profile address (file path, file://, http:// or https:// URI);
    /// overrides the boot record
    #[arg(long)]
    pub profile: Option<String>,

    /// Upgrade an installed system instead of installing a fresh one
    #[arg(long)]
    pub autoupgrade: bool,
}

/// Run `autoinit run`.
///
/// # Errors
///
/// Returns an error if a port fails in a way no workflow stage can
/// resolve; operator aborts and restart requests are reported through the
/// returned [`Outcome`].
pub async fn run(args: &RunArgs, app: &AppContext) -> Result<Outcome> {
    let fetcher = UriFetcher::default();
    let store = DiskProfileStore::new(app.paths.clone());
    let scripts = SpoolScriptEngine::new(&app.paths);
    let resources = HookResourceRegistry::new(&app.paths);
    let steps = HookStep::new(app.paths.hooks_dir());
    let install_inf = InstallInfFile::new(app.paths.install_inf());
    let products = YamlProductCatalog::new(app.paths.products_catalog());
    let prompt = DialoguerPrompt::new(&app.output, app.non_interactive);
    let interrupt = CtrlCPoll::install();
    let reporter = app.terminal_reporter();

    let opts = WorkflowOptions {
        profile_uri: args.profile.clone(),
        autoupgrade: args.autoupgrade,
    };

    let outcome = autoinit::run_workflow(
        &fetcher,
        &store,
        &scripts,
        &resources,
        &steps,
        &install_inf,
        &products,
        &prompt,
        &interrupt,
        &reporter,
        &opts,
    )
    .await?;

    match outcome {
        Outcome::Next => {}
        Outcome::Abort => app.output.error("automatic installation aborted"),
        Outcome::Restart => app
            .output
            .info("restart requested — re-run the installation workflow"),
    }
    Ok(outcome)
}
