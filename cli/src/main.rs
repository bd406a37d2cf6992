//! Autoinit CLI - unattended installation driven by declarative profiles

use clap::Parser;

use autoinit_cli::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match cli.run().await {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}
