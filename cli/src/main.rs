use anyhow::Result;
use clap::Parser;
use docsearch_cli::{run, Args};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let summary = run(&args)?;
    tracing::info!(
        documents = summary.documents,
        requests = summary.requests,
        matched = summary.matched,
        answers = %args.answers.display(),
        "end of search"
    );
    Ok(())
}
