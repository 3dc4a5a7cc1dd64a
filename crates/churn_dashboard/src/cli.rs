// Rust guideline compliant 2026-10-14

//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use domain::{CustomerType, RiskTier};

/// Churn-risk dashboard over monthly card-spend history
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Population to query: `general` or `vip`
    #[arg(short = 't', long, global = true, default_value = "general")]
    pub customer_type: CustomerType,

    /// Directory holding the default data files
    #[arg(short, long, global = true, default_value = ".")]
    pub data_dir: PathBuf,

    /// History file of the selected population, overriding the default
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,

    /// Target snapshot of the selected population, overriding the default
    #[arg(long, global = true)]
    pub target: Option<PathBuf>,

    /// Seed of the display-probability generator
    #[arg(long, global = true, default_value = "42")]
    pub seed: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Dashboard views.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Population figures: customers, protected spend, tier counts
    Overview,

    /// One row per customer
    Summaries {
        /// Keep only these tiers (repeatable)
        #[arg(long = "tier")]
        tiers: Vec<RiskTier>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Identifiers of every summarized customer
    Ids,

    /// Monthly history of one customer
    History {
        /// Customer identifier
        id: String,
    },

    /// Individual report: trend, diagnosis and strategy
    Report {
        /// Customer identifier
        id: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Marketing recommendation for one customer
    Recommend {
        /// Customer identifier
        id: String,
    },
}
