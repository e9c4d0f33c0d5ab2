mod annotate;
mod collect;
mod error;
mod llm;
mod report;
mod scanner;

use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use crate::collect::collect_targets;
use crate::llm::{OllamaClient, DEFAULT_HOST, DEFAULT_MODEL};
use crate::report::{print_report, RunReport};

#[derive(Parser)]
#[command(
    name = "gtscribe",
    version,
    about = "Annotate C++ GoogleTest suites with LLM-written comments."
)]
struct Cli {
    /// C++ file or directory to annotate
    target: PathBuf,

    #[arg(
        long,
        default_value = "cpp",
        help = "Extension to collect when the target is a directory"
    )]
    ext: String,

    #[arg(long, help = "Generation service base URL (or set OLLAMA_HOST)")]
    host: Option<String>,

    #[arg(long, help = "Model identifier (or set MODEL_NAME)")]
    model: Option<String>,

    #[arg(
        long,
        default_value_t = false,
        help = "Overwrite files in place without keeping a .bak copy"
    )]
    no_backup: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gtscribe=warn".parse().unwrap()),
        )
        .with_target(false)
        .init();

    // Print failures through Display so the curated error messages
    // reach the user instead of their Debug form.
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let host = cli
        .host
        .or_else(|| env::var("OLLAMA_HOST").ok())
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let model = cli
        .model
        .or_else(|| env::var("MODEL_NAME").ok())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let client = OllamaClient::new(host, model)?;
    let files = collect_targets(&cli.target, &cli.ext)?;
    tracing::debug!(
        count = files.len(),
        model = client.model(),
        "annotation targets collected"
    );

    // Files are independent, but processing stays strictly sequential:
    // one slow generation call blocks the whole run by design.
    let started = Instant::now();
    let mut reports = Vec::new();
    for file in &files {
        reports.push(annotate::annotate_file(file, &client, !cli.no_backup)?);
    }

    let report = RunReport {
        files: reports,
        total_elapsed: started.elapsed(),
    };
    print_report(&report);
    Ok(())
}
