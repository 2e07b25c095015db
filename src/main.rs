use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ebpcharlie::abstracts::HttpAbstractFetcherBuilder;
use ebpcharlie::models::{ExportFormat, ExportRequest};
use ebpcharlie::openai::OpenAiClientBuilder;
use ebpcharlie::pipeline::{DEFAULT_MAX_RESULTS, PipelineBuilder, PipelineError};
use ebpcharlie::pubmed::PubMedClientBuilder;

/// ebpcharlie - evidence-based practice literature synthesis CLI
#[derive(Parser)]
#[command(name = "ebpcharlie")]
#[command(about = "Searches PubMed and synthesizes the evidence for a clinical question")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run the synthesis pipeline for a clinical question
    Run(RunCommand),
}

/// Run the pipeline
#[derive(Parser)]
struct RunCommand {
    /// The clinical question to search for
    #[arg(value_name = "QUERY")]
    query: String,

    /// Maximum number of articles to retrieve
    #[arg(short, long, default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: usize,

    /// Export the report to a document after the run
    #[arg(short, long, value_enum, value_name = "FORMAT")]
    export: Option<ExportFormat>,

    /// Directory that exported files are written into
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Write a word-cloud visualization of the synthesis as SVG
    #[arg(long)]
    word_cloud: bool,
}

fn main() {
    // A missing .env file is fine; the environment may carry the keys.
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(cmd) => handle_run(cmd),
    };

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors include validation failures like an empty query or a
/// missing API key.
fn is_user_error(error: &anyhow::Error) -> bool {
    // Alternate formatting includes the whole context chain.
    let error_msg = format!("{error:#}");
    error_msg.contains("clinical question") || error_msg.contains("No API key")
}

/// Handles the run command: builds the real clients, executes the
/// pipeline, prints the report, and exports on request.
fn handle_run(cmd: &RunCommand) -> Result<()> {
    let search = PubMedClientBuilder::new()
        .build()
        .context("Failed to create PubMed client")?;

    let fetcher = HttpAbstractFetcherBuilder::new()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to create abstract fetcher")?;

    let generator = OpenAiClientBuilder::new()
        .build()
        .context("Failed to create generation client")?;

    let pipeline = PipelineBuilder::new()
        .search(Arc::new(search))
        .fetcher(Arc::new(fetcher))
        .generator(Arc::new(generator))
        .max_results(cmd.max_results)
        .build();

    let report = pipeline.run(&cmd.query).map_err(|e| match e {
        PipelineError::EmptyQuery => anyhow::anyhow!("{e}"),
        other => anyhow::Error::new(other).context("Pipeline run failed"),
    })?;

    print_report(&report);

    if cmd.word_cloud {
        let svg_path = cmd.out_dir.join("word_cloud.svg");
        std::fs::write(&svg_path, report.word_cloud().to_svg())
            .with_context(|| format!("Failed to write {}", svg_path.display()))?;
        println!("Word cloud written to {}", svg_path.display());
    }

    if let Some(format) = cmd.export {
        let request = ExportRequest::new(format, report.combined_text());
        let path = ebpcharlie::export(&request, &cmd.out_dir).context("Export failed")?;
        println!("Report exported to {}", path.display());
    }

    Ok(())
}

/// Prints the synthesis followed by each article's abstract.
fn print_report(report: &ebpcharlie::RenderedReport) {
    println!("Summary of Findings");
    println!("===================");
    println!("{}\n", report.synthesis());

    println!("Article Abstracts");
    println!("=================");
    for entry in report.entries() {
        println!("PMID: {}", entry.id);
        println!("URL: {}", entry.url);
        println!("{}\n", entry.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_is_a_user_error() {
        let error = anyhow::anyhow!("Please enter a clinical question to search for articles");
        assert!(is_user_error(&error));
    }

    #[test]
    fn network_failure_is_an_internal_error() {
        let error = anyhow::anyhow!("Search service returned HTTP status 503");
        assert!(!is_user_error(&error));
    }

    #[test]
    fn missing_api_key_is_a_user_error() {
        let error = anyhow::anyhow!("No API key configured; set OPENAI_API_KEY or use api_key()");
        assert!(is_user_error(&error));
    }
}
