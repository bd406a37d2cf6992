//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::domain::outcome::Outcome;

/// Unattended installation driven by declarative profiles
#[derive(Parser)]
#[command(
    name = "autoinit",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Never prompt; take declared defaults and abort where input is required
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full preparation workflow
    Run(commands::run::RunArgs),

    /// Fetch and validate a profile without touching the system
    Check(commands::check::CheckArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command, yielding the workflow outcome.
    ///
    /// # Errors
    ///
    /// Returns an error when a command fails outside the symbolic
    /// abort/restart paths (I/O trouble, broken prompt).
    pub async fn run(self) -> Result<Outcome> {
        let Cli {
            quiet,
            no_color,
            yes,
            command,
        } = self;
        let no_color = no_color || std::env::var_os("NO_COLOR").is_some();
        let app = AppContext::new(&AppFlags {
            no_color,
            quiet,
            yes,
        });
        match command {
            Command::Run(args) => commands::run::run(&args, &app).await,
            Command::Check(args) => commands::check::run(&args, &app).await,
            Command::Version => {
                commands::version::run();
                Ok(Outcome::Next)
            }
        }
    }
}
