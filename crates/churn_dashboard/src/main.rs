// Rust guideline compliant 2026-10-14

//! Churn-risk dashboard entry point.
//!
//! Wires the CSV loader to the dashboard facade and prints one view per run.
//!
//! # Usage
//!
//! ```text
//! churn-dashboard --data-dir ./data overview
//! churn-dashboard -t vip summaries --json
//! RUST_LOG=debug churn-dashboard report 0001
//! ```

mod cli;
mod render;

use anyhow::Context as _;
use clap::Parser;
use cli::{Args, Command};
use dashboard::{Dashboard, DashboardConfig};
use loader::{CsvSource, SourceConfig};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let customer_type = args.customer_type;

    let mut builder = SourceConfig::builder(&args.data_dir);
    if let Some(history) = &args.history {
        builder = builder.history(customer_type, history);
    }
    if args.target.is_some() {
        builder = builder.target(customer_type, args.target.clone());
    }
    let source_config = builder.build().context("failed to build source config")?;

    let config = DashboardConfig::builder().seed(args.seed).build();
    let dashboard = Dashboard::new(CsvSource::new(source_config), &config);
    tracing::debug!(%customer_type, seed = args.seed, "main.start");

    match args.command {
        Command::Overview => {
            let view = render::overview(&dashboard.overview(customer_type))
                .context("failed to render overview")?;
            println!("{view}");
        }
        Command::Summaries { tiers, json } => {
            let rows = if tiers.is_empty() {
                dashboard.customer_summaries(customer_type)
            } else {
                dashboard.summaries_in_tiers(customer_type, &tiers)
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&rows).context("failed to encode summaries")?);
            } else {
                let table = render::summaries(customer_type, &rows).context("failed to render summaries")?;
                println!("{table}");
            }
        }
        Command::Ids => {
            let ids = dashboard.list_customer_ids(customer_type);
            if ids.is_empty() {
                println!("{}", render::DATA_UNAVAILABLE);
            }
            for id in ids {
                println!("{id}");
            }
        }
        Command::History { id } => {
            let table = render::history(&id, &dashboard.customer_history(customer_type, &id))
                .context("failed to render history")?;
            println!("{table}");
        }
        Command::Report { id, json } => match dashboard.customer_report(customer_type, &id) {
            Some(report) if json => {
                println!("{}", serde_json::to_string_pretty(&report).context("failed to encode report")?);
            }
            Some(report) => {
                println!("{}", render::report(&report).context("failed to render report")?);
            }
            None => println!("no history for customer {id}"),
        },
        Command::Recommend { id } => match dashboard.recommendation_for(customer_type, &id) {
            Some(message) => println!("{message}"),
            None => println!("unknown customer {id}"),
        },
    }
    Ok(())
}
