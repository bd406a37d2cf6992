//! `autoinit check` — fetch and validate a profile without touching the
//! system.
//!
//! Dry inspection for profile authors: one fetch (no correction retry),
//! structural validation, and a summary of what a run would see. Nothing is
//! staged and no scripts execute.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::{ProductCatalog as _, ProfileFetcher as _, ProfileStore as _};
use crate::domain::outcome::Outcome;
use crate::domain::profile::{self, ProfileDocument};
use crate::domain::source::SourceDescriptor;
use crate::domain::{ask, product, script};
use crate::infra::fetch::UriFetcher;
use crate::infra::products::YamlProductCatalog;
use crate::infra::profile_store::DiskProfileStore;
use crate::output::progress;

/// Arguments for the check command.
#[derive(Args, Default)]
pub struct CheckArgs {
    /// Profile address to check; defaults to the staged profile
    #[arg(long)]
    pub profile: Option<String>,
}

/// Run `autoinit check`.
///
/// # Errors
///
/// Returns an error when local I/O fails; an unreadable or invalid profile
/// is reported and yields [`Outcome::Abort`].
pub async fn run(args: &CheckArgs, app: &AppContext) -> Result<Outcome> {
    let bytes = match fetch_bytes(args, app).await? {
        Some(bytes) => bytes,
        None => return Ok(Outcome::Abort),
    };

    let document = match profile::parse_profile(&bytes) {
        Ok(document) => document,
        Err(error) => {
            app.output.error(&format!("profile is not valid: {error}"));
            return Ok(Outcome::Abort);
        }
    };

    summarize(&document, app);
    app.output.success("profile is valid");
    Ok(Outcome::Next)
}

async fn fetch_bytes(args: &CheckArgs, app: &AppContext) -> Result<Option<Vec<u8>>> {
    if let Some(uri) = args.profile.as_deref() {
        let source = SourceDescriptor::parse(uri);
        let spinner = app
            .output
            .show_progress()
            .then(|| progress::spinner(&source.message));
        let fetched = UriFetcher::default().fetch(&source).await;
        match fetched {
            Ok(bytes) => {
                if let Some(pb) = spinner {
                    progress::finish_ok(&pb, &source.message);
                }
                Ok(Some(bytes))
            }
            Err(error) => {
                if let Some(pb) = spinner {
                    progress::finish_error(&pb, &source.message);
                }
                app.output
                    .error(&format!("could not retrieve the profile: {error:#}"));
                Ok(None)
            }
        }
    } else {
        let store = DiskProfileStore::new(app.paths.clone());
        let staged = store.staged_bytes()?;
        if staged.is_none() {
            app.output
                .error("no profile staged; pass --profile <address>");
        }
        Ok(staged)
    }
}

fn summarize(document: &ProfileDocument, app: &AppContext) {
    app.output.header("Profile summary");
    let sections: Vec<&str> = document.section_names().collect();
    app.output.kv("Sections", &sections.join(", "));
    app.output.kv(
        "Pre-install scripts",
        &script::pre_scripts(document).len().to_string(),
    );
    app.output.kv(
        "Ask prompts",
        &ask::ask_list(document).len().to_string(),
    );

    let unsupported = document.unsupported_sections();
    if !unsupported.is_empty() {
        app.output
            .warn(&profile::unsupported_section_report(&unsupported));
    }

    match YamlProductCatalog::new(app.paths.products_catalog()).available() {
        Ok(available) => match product::select_base_product(document, &available) {
            Some(selected) => app.output.kv("Base product", &selected.name),
            None => app
                .output
                .warn("no installable base product could be determined"),
        },
        Err(error) => app
            .output
            .warn(&format!("product catalog is unreadable: {error:#}")),
    }
}
