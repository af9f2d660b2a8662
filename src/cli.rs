//! CLI interface for bedrock-cost
//!
//! # Example
//!
//! ```bash
//! # Last 30 days as JSON (the default output)
//! bedrock-cost
//!
//! # Two weeks with usage types and regions, as a table and a plot
//! bedrock-cost --period 2w --detail full --table --plot
//!
//! # One line for a status bar
//! bedrock-cost --summary --quiet
//! ```

use bedrock_cost_core::DetailLevel;
use bedrock_cost_core::period::DEFAULT_PERIOD;
use bedrock_cost_terminal::OutputFormat;
use clap::Parser;

/// Report AWS Bedrock model costs from AWS Cost Explorer
#[derive(Parser, Debug, Clone)]
#[command(name = "bedrock-cost")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Lookback period: a count with a d, w, or m suffix (e.g. 7d, 2w, 1m)
    #[arg(long, short = 'p', env = "BEDROCK_COST_PERIOD", default_value = DEFAULT_PERIOD)]
    pub period: String,

    /// Breakdown depth: basic, standard, or full
    #[arg(long, short = 'd', default_value = "standard")]
    pub detail: DetailLevel,

    /// AWS profile used to resolve credentials
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// AWS region for the Cost Explorer endpoint (defaults to us-east-1)
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Output as JSON (the default when no other output is chosen)
    #[arg(long)]
    pub json: bool,

    /// Output a model cost table
    #[arg(long)]
    pub table: bool,

    /// Output ASCII bar plots of daily and per-model cost
    #[arg(long)]
    pub plot: bool,

    /// Output a one-line summary
    #[arg(long)]
    pub summary: bool,

    /// Limit table, plot, and summary to the N most expensive models
    #[arg(long, value_name = "N", value_parser = parse_top)]
    pub top: Option<usize>,

    /// Show full model names instead of shortened versions
    #[arg(long)]
    pub full_model_names: bool,

    /// Show debug output on stderr
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors, overriding RUST_LOG
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Parse a `--top` limit; zero would hide every model
fn parse_top(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl Cli {
    /// Requested renderers in print order
    ///
    /// JSON is chosen when no output flag is given.
    pub fn output_formats(&self) -> Vec<OutputFormat> {
        let selected = [
            (self.json, OutputFormat::Json),
            (self.table, OutputFormat::Table),
            (self.plot, OutputFormat::Plot),
            (self.summary, OutputFormat::Summary),
        ];

        let formats: Vec<OutputFormat> = selected
            .into_iter()
            .filter_map(|(enabled, format)| enabled.then_some(format))
            .collect();

        if formats.is_empty() {
            vec![OutputFormat::Json]
        } else {
            formats
        }
    }

    /// Log filter directive for this invocation, or `None` to defer to `RUST_LOG`
    pub fn log_directive(&self) -> Option<&'static str> {
        if self.quiet {
            Some("error")
        } else if self.verbose {
            Some(
                "bedrock_cost=debug,bedrock_cost_core=debug,\
                 bedrock_cost_provider_aws=debug,bedrock_cost_terminal=debug",
            )
        } else {
            None
        }
    }
}
