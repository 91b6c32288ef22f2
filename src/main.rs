//! PDF Redaction CLI Application.
//!
//! Command-line front end for the pdf-redactor library: permanently removes
//! search terms from a PDF and writes the result to a new file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use pdf_redactor::{MatchPolicy, RedactionJob, RedactionOutcome, RedactionService, TermSet};

/// PDF Redaction Tool
///
/// Permanently removes every occurrence of the given terms from a PDF.
/// Matched text is erased from the page content and covered by black boxes.
/// Use the 'extract' subcommand to inspect a document's text layer.
#[derive(Parser)]
#[command(name = "pdf-redactor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input PDF file path
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file path (must differ from the input)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Terms to redact, separated by commas or newlines (can be specified multiple times)
    #[arg(short, long, value_name = "TERMS")]
    terms: Vec<String>,

    /// Read additional terms from a file, one per line or comma separated
    #[arg(long, value_name = "FILE")]
    terms_file: Option<PathBuf>,

    /// Match letter case exactly
    #[arg(long)]
    case_sensitive: bool,

    /// Match whitespace exactly instead of collapsing runs and line breaks
    #[arg(long)]
    exact_whitespace: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a PDF (for debugging and verification)
    Extract {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output text file (optional, defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Redaction command handler.
struct RedactionHandler {
    service: RedactionService,
    verbose: bool,
}

impl RedactionHandler {
    fn new(policy: MatchPolicy, verbose: bool) -> Self {
        Self {
            service: RedactionService::with_policy(policy),
            verbose,
        }
    }

    /// Runs a redaction on a worker thread, reporting progress when verbose.
    fn redact(&self, input: &Path, output: &Path, terms: TermSet) -> Result<()> {
        if self.verbose {
            println!("Input:  {}", input.display());
            println!("Output: {}", output.display());
            println!("Terms:  {} term(s)", terms.len());
        }

        let job = RedactionJob::spawn(
            self.service.clone(),
            input.to_path_buf(),
            terms,
            output.to_path_buf(),
        );
        for event in job.progress() {
            if self.verbose {
                println!(
                    "  page {}/{} ({:.0}%)",
                    event.page_index + 1,
                    event.total_pages,
                    event.fraction() * 100.0
                );
            }
        }

        let result = match job.join().with_context(|| "Redaction failed")? {
            RedactionOutcome::Completed(result) => result,
            RedactionOutcome::Cancelled => anyhow::bail!("Redaction was cancelled"),
        };

        if self.verbose {
            println!("\nRedaction Summary:");
            println!("  Pages processed: {}", result.pages_total);
            println!("  Pages modified:  {}", result.pages_modified.len());
            println!("  Matches redacted: {}", result.total_matches);
            for count in &result.matches_per_term {
                println!("    {:<24} {}", count.term, count.matches);
            }
        }

        if result.has_redactions() {
            println!(
                "✓ Successfully redacted {} match(es) on {} page(s) → {}",
                result.total_matches,
                result.pages_modified.len(),
                output.display()
            );
        } else {
            println!("⚠ No matches found to redact → {}", output.display());
        }

        if !result.terms_not_found.is_empty() {
            let missing: Vec<&str> = result.terms_not_found.iter().map(|t| t.as_str()).collect();
            println!("⚠ Terms not found: {}", missing.join(", "));
        }

        Ok(())
    }

    /// Extracts text from a PDF.
    fn extract(&self, input: &Path, output: Option<&Path>) -> Result<()> {
        let text = self
            .service
            .extract_text(input)
            .with_context(|| "Text extraction failed")?;

        if let Some(output_path) = output {
            std::fs::write(output_path, &text)
                .with_context(|| format!("Failed to write to {}", output_path.display()))?;
            println!(
                "✓ Extracted {} characters → {}",
                text.chars().count(),
                output_path.display()
            );
        } else {
            println!("{}", text);
        }

        Ok(())
    }
}

/// Collects terms from repeated `--terms` values and an optional terms file.
fn build_terms(
    inline: &[String],
    terms_file: Option<&Path>,
    policy: &MatchPolicy,
) -> Result<TermSet> {
    let mut inputs = inline.to_vec();
    if let Some(path) = terms_file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read terms file {}", path.display()))?;
        inputs.push(contents);
    }
    if inputs.is_empty() {
        anyhow::bail!("No redaction terms specified. Use --terms or --terms-file.");
    }
    Ok(TermSet::from_inputs(&inputs, policy)?)
}

fn build_policy(case_sensitive: bool, exact_whitespace: bool) -> MatchPolicy {
    MatchPolicy::default()
        .with_case_sensitive(case_sensitive)
        .with_normalize_whitespace(!exact_whitespace)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "pdf_redactor=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let policy = build_policy(cli.case_sensitive, cli.exact_whitespace);
    let handler = RedactionHandler::new(policy, cli.verbose);

    match &cli.command {
        Some(Commands::Extract { input, output }) => {
            handler.extract(input, output.as_deref())?;
        }
        None => {
            let input = cli
                .input
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--input is required"))?;
            let output = cli
                .output
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--output is required"))?;

            let terms = build_terms(&cli.terms, cli.terms_file.as_deref(), &policy)?;
            handler.redact(input, output, terms)?;
        }
    }

    Ok(())
}
