//! bedrock-cost - Report AWS Bedrock model costs from AWS Cost Explorer

use anyhow::Result;
use bedrock_cost::cli::Cli;
use bedrock_cost::report::{generate_report, no_costs_message, render_outputs, should_short_circuit};
use bedrock_cost_core::period::{calculate_date_range_from, resolve_period, today_utc};
use bedrock_cost_provider_aws::CostExplorerGateway;
use bedrock_cost_terminal::RenderOptions;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // --quiet and --verbose override RUST_LOG
    let filter = match cli.log_directive() {
        Some(directive) => tracing_subscriber::EnvFilter::new(directive),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if cli.verbose {
                eprintln!("Error: {err:?}");
            } else {
                eprintln!("Error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let days = resolve_period(&cli.period)?;
    // One notion of "today" for the window and the estimate flags
    let today = today_utc();
    let window = calculate_date_range_from(today, days)?;
    let formats = cli.output_formats();

    info!(
        "Reporting Bedrock costs for {} ({} days) at {} detail",
        window, days, cli.detail
    );

    let gateway =
        CostExplorerGateway::from_env(cli.profile.as_deref(), cli.region.as_deref(), today).await;

    let progress = if is_terminal::is_terminal(std::io::stderr()) && !cli.quiet {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed_precise}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Querying AWS Cost Explorer");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = generate_report(&gateway, &window, cli.detail).await;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    let data = result?;

    if should_short_circuit(&data, &formats) {
        eprintln!("{}", no_costs_message(&window));
        return Ok(());
    }

    let options = RenderOptions::for_terminal(cli.full_model_names, cli.top);
    for rendered in render_outputs(&data, &formats, &options) {
        println!("{}", rendered.trim_end());
    }

    Ok(())
}
