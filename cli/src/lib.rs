use anyhow::{Context, Result};
use clap::Parser;
use docsearch_core::persist::{load_config, load_requests, read_documents, save_answers, Config};
use docsearch_core::{InvertedIndex, SearchServer};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug, Clone)]
#[command(name = "docsearch")]
#[command(about = "Index the documents listed in a config file and answer a batch of requests", long_about = None)]
pub struct Args {
    /// Config file listing documents and the response limit
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,
    /// Requests file
    #[arg(long, default_value = "requests.json")]
    pub requests: PathBuf,
    /// Where to write the answers
    #[arg(long, default_value = "answers.json")]
    pub answers: PathBuf,
    /// Indexing threads (defaults to one per core)
    #[arg(long)]
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub documents: usize,
    pub requests: usize,
    /// Requests with at least one hit.
    pub matched: usize,
    pub answers_written: bool,
}

pub fn run(args: &Args) -> Result<RunSummary> {
    let config = load_config(&args.config)?;
    log_header(&config);

    let documents = read_documents(&config);
    let index = Arc::new(InvertedIndex::new());
    build_index(&index, &documents, args.threads)?;

    let requests = load_requests(&args.requests)?;
    let mut server = SearchServer::new(Arc::clone(&index));
    server.set_max_responses(config.max_responses());
    tracing::info!("searching");
    let results = server.search(&requests);

    let matched = results.iter().filter(|hits| !hits.is_empty()).count();
    if matched == 0 {
        tracing::info!("no matches found");
    }
    let answers_written = save_answers(&args.answers, &results, config.max_responses())?;

    Ok(RunSummary { documents: documents.len(), requests: requests.len(), matched, answers_written })
}

fn build_index(index: &InvertedIndex, documents: &[String], threads: Option<usize>) -> Result<()> {
    match threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .thread_name(|i| format!("docsearch-index-{i}"))
                .build()
                .context("failed to create indexing thread pool")?;
            pool.install(|| index.update_document_base(documents));
        }
        None => index.update_document_base(documents),
    }
    Ok(())
}

fn log_header(config: &Config) {
    tracing::info!(
        name = %config.config.name,
        version = %config.config.version,
        max_responses = config.max_responses(),
        files = config.files.len(),
        "initialization"
    );
}
