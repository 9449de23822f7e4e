// ABOUTME: Entry point for the tidycrew binary.
// ABOUTME: Parses CLI arguments, initializes tracing, runs the crew, and prints the report.

use std::path::PathBuf;

use clap::Parser;

use tidycrew_agent::{Crew, create_runtime};
use tidycrew_core::KickoffInputs;

mod config;
use config::TidycrewConfig;

/// Recommend which files in a folder can be deleted, judged against a
/// reference folder. Recommendations only; nothing is ever deleted.
#[derive(Parser, Debug)]
#[command(name = "tidycrew", version)]
struct Cli {
    /// Folder whose files are candidates for deletion
    #[arg(long)]
    target: String,

    /// Reference folder used to infer what an ideal folder looks like
    #[arg(long)]
    standard: String,

    /// LLM provider: openai or anthropic (default: openai, or $TIDYCREW_PROVIDER)
    #[arg(long)]
    provider: Option<String>,

    /// Model override (provider default applies, or $TIDYCREW_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Also write the Markdown report to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tidycrew=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = TidycrewConfig::resolve(cli.provider, cli.model)?;
    let runtime = create_runtime(&config.provider, config.model.as_deref())?;

    tracing::info!(
        provider = runtime.provider_name(),
        model = runtime.model_name(),
        "tidycrew starting up"
    );

    let inputs = KickoffInputs::new(&cli.target, &cli.standard);
    let crew = Crew::with_default_tasks(runtime);
    let report = crew.kickoff(&inputs).await?;

    let markdown = report.to_markdown();
    println!("{markdown}");

    if let Some(path) = cli.output {
        std::fs::write(&path, &markdown)?;
        tracing::info!(path = %path.display(), "report written");
    }

    Ok(())
}
