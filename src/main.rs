use std::fs;
use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};
use clap::Parser;

use docpod::budget::{
    compute_budget, BudgetParams, DEFAULT_RESPONSE_RESERVE, DEFAULT_SAFETY_MARGIN,
};
use docpod::chunking::chunk_content;
use docpod::config::AppConfig;
use docpod::dispatch::{
    dispatch_units, prepare_units, OpenAiClient, RetryPolicy, HARD_SAFETY_FRACTION,
};
use docpod::prompts::ANALYSIS_INSTRUCTION;
use docpod::reconcile::reconcile;
use docpod::tokens::TokenCounter;
use docpod::types::ContentBody;
use docpod::usage::{pricing_for, UsageLedger, UsageReport};

/// Docpod - document analysis for podcast conversion
///
/// Splits a document into token-budgeted chunks, runs a structured content
/// analysis on each chunk through a completion service, and merges the
/// partial analyses into one podcast plan.
#[derive(Parser, Debug)]
#[command(name = "docpod")]
#[command(version = "0.1.0")]
#[command(about = "Document analysis for podcast conversion", long_about = None)]
struct Args {
    /// Input document path (plain text or markdown)
    #[arg(value_name = "INPUT")]
    input_file: PathBuf,

    /// Output path for the merged analysis JSON (stdout when omitted)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Completion model to analyze with
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// Context window size in tokens
    #[arg(long, default_value_t = 128_000)]
    context_window: usize,

    /// Tokens reserved for the model's response
    #[arg(long, default_value_t = DEFAULT_RESPONSE_RESERVE)]
    response_reserve: usize,

    /// Safety margin as a fraction of the remaining window
    #[arg(long, default_value_t = DEFAULT_SAFETY_MARGIN)]
    safety_margin: f64,

    /// Chunk the document and estimate cost without dispatching
    #[arg(long)]
    estimate: bool,
}

impl Args {
    /// Validate CLI arguments
    fn validate(&self) -> Result<()> {
        if !self.input_file.exists() {
            bail!("Input file does not exist: {:?}", self.input_file);
        }

        if !self.input_file.is_file() {
            bail!("Input path is not a file: {:?}", self.input_file);
        }

        if self.context_window == 0 {
            bail!("Context window must be positive");
        }

        if !(0.0..1.0).contains(&self.safety_margin) {
            bail!(
                "Safety margin must be at least 0 and below 1, got: {}",
                self.safety_margin
            );
        }

        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    args.validate()
        .context("Failed to validate command-line arguments")?;

    let config = AppConfig::from_env(args.model.clone());

    println!("docpod v0.1.0 - Document analysis for podcast conversion");
    println!("Input: {:?}", args.input_file);
    println!("Model: {}", config.model);

    println!("\n1. Reading input document...");
    let raw_text = fs::read_to_string(&args.input_file)
        .with_context(|| format!("Failed to read input document {:?}", args.input_file))?;
    let body = ContentBody::from_text(&raw_text);
    ensure!(!body.is_empty(), "Input document contains no text");
    println!("   Loaded {} paragraphs", body.len());

    println!("\n2. Computing token budget...");
    let counter = TokenCounter::for_model(&config.model)
        .context("Failed to initialize token counter")?;
    let params = BudgetParams {
        context_window: args.context_window,
        response_reserve: args.response_reserve,
        safety_margin: args.safety_margin,
    };
    let budget = compute_budget(ANALYSIS_INSTRUCTION, &params, &counter)?;
    println!("   Context window:   {}", params.context_window);
    println!("   Response reserve: {}", params.response_reserve);
    println!("   Content budget:   {budget}");

    println!("\n3. Chunking content...");
    let chunks = chunk_content(&body, budget, &counter);
    ensure!(!chunks.is_empty(), "Chunking produced no chunks");
    println!("   Created {} chunks", chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        println!(
            "   Chunk {:02}: {} tokens ({:.1}% of budget)",
            i + 1,
            chunk.token_count,
            chunk.token_count as f64 / budget as f64 * 100.0
        );
    }

    println!("\n4. Preparing request units...");
    let units = prepare_units(
        &chunks,
        ANALYSIS_INSTRUCTION,
        args.context_window,
        HARD_SAFETY_FRACTION,
        &counter,
    )?;
    if units.len() < chunks.len() {
        println!("   Dropped {} oversized units", chunks.len() - units.len());
    }
    println!("   {} request units ready", units.len());

    if args.estimate {
        let prompt_tokens: usize = units.iter().map(|unit| unit.prompt_tokens).sum();
        println!("\nEstimated prompt tokens: {prompt_tokens}");
        println!(
            "Estimated cost: ${:.4}",
            estimate_cost(&config.model, prompt_tokens)
        );
        return Ok(());
    }

    println!("\n5. Dispatching {} requests...", units.len());
    let api_key = config.require_api_key()?;
    let client = OpenAiClient::new(
        api_key.to_string(),
        config.model.clone(),
        config.base_url.clone(),
    )
    .context("Failed to build completion client")?;
    let ledger = UsageLedger::new(config.model.clone());
    let retry = RetryPolicy::default();
    let responses = dispatch_units(&units, &client, &retry, &ledger, &counter);
    println!(
        "   Collected {} of {} responses",
        responses.len(),
        units.len()
    );

    println!("\n6. Reconciling responses...");
    let analysis = reconcile(&responses)?;
    println!(
        "   Format: {}",
        analysis.format.as_deref().unwrap_or("unspecified")
    );
    println!(
        "   {} segments, {} terms, {} discussion points",
        analysis.segments.len(),
        analysis.technical_terms.len(),
        analysis.discussion_points.len()
    );

    println!("\n7. Writing analysis...");
    let rendered =
        serde_json::to_string_pretty(&analysis).context("Failed to render analysis JSON")?;
    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write analysis to {:?}", path))?;
            println!("   Wrote analysis to {:?}", path);
        }
        None => println!("{rendered}"),
    }

    print_usage_report(&ledger.report());

    println!("\n✓ Processing complete!");

    Ok(())
}

/// Pre-dispatch cost estimate. Completion tokens are assumed to come in at
/// 10% of prompt tokens.
fn estimate_cost(model: &str, prompt_tokens: usize) -> f64 {
    let completion_tokens = prompt_tokens / 10;
    pricing_for(model).cost(prompt_tokens, completion_tokens)
}

fn print_usage_report(report: &UsageReport) {
    println!("\n=== Token Usage Report ===");
    println!("   Model:              {}", report.model);
    println!("   Requests:           {}", report.requests);
    println!("   Prompt tokens:      {}", report.total_prompt_tokens);
    println!("   Completion tokens:  {}", report.total_completion_tokens);
    println!("   Total tokens:       {}", report.total_tokens);
    println!("   Avg tokens/request: {:.0}", report.average_tokens_per_request);
    println!("   Total cost:         ${:.4}", report.total_cost);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            input_file: PathBuf::from("doc.md"),
            output: None,
            model: None,
            context_window: 128_000,
            response_reserve: DEFAULT_RESPONSE_RESERVE,
            safety_margin: DEFAULT_SAFETY_MARGIN,
            estimate: false,
        }
    }

    #[test]
    fn estimate_assumes_ten_percent_completion() {
        // gpt-4: 0.03/1k prompt, 0.06/1k completion.
        let cost = estimate_cost("gpt-4", 10_000);
        let expected = (10_000.0 * 0.03 + 1_000.0 * 0.06) / 1000.0;
        assert!((cost - expected).abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_missing_input() {
        let args = base_args();
        assert!(args.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_safety_margin() {
        let input = tempfile::NamedTempFile::new().unwrap();
        let mut args = base_args();
        args.input_file = input.path().to_path_buf();
        args.safety_margin = 1.0;
        assert!(args.validate().is_err());

        args.safety_margin = 0.1;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_context_window() {
        let input = tempfile::NamedTempFile::new().unwrap();
        let mut args = base_args();
        args.input_file = input.path().to_path_buf();
        args.context_window = 0;
        assert!(args.validate().is_err());
    }
}
