//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use crate::domain::id::Source;

/// Secondhand marketplace scanner that alerts on profitable resale flips
#[derive(Parser, Debug)]
#[command(name = "flipper")]
#[command(version, about)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll marketplaces and send alerts until interrupted
    Run(RunArgs),

    /// Validate the configuration and rules files
    CheckConfig,

    /// Send a sample alert, bypassing the threshold and dedup
    TestAlert(ListingArgs),

    /// Score an ad-hoc listing without notifying
    Evaluate(ListingArgs),

    /// Show alert bookkeeping totals
    Status,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Override the configured log level
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

/// Listing described on the command line.
#[derive(Args, Debug, Clone)]
pub struct ListingArgs {
    /// Listing title, used for brand and model extraction
    #[arg(long, default_value = "TaylorMade M6 Driver 10.5 Stiff")]
    pub title: String,

    /// Asking price in the base currency
    #[arg(long, default_value = "80")]
    pub price: Decimal,

    /// Shipping cost
    #[arg(long, default_value = "0")]
    pub shipping: Decimal,

    /// Marketplace whose fee schedule applies [ebay, vinted, manual]
    #[arg(long, default_value = "manual")]
    pub source: Source,

    /// Listing link included in the alert
    #[arg(long, default_value = "https://example.com/flipper-test-listing")]
    pub url: String,

    /// External id; generated when omitted
    #[arg(long)]
    pub id: Option<String>,
}
