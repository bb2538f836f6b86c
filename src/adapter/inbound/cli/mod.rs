//! CLI module graph and command dispatch.

pub mod alert;
pub mod check;
pub mod command;
pub mod evaluate;
pub mod output;
pub mod run;
pub mod status;

use std::path::Path;

use command::{Cli, Commands, ListingArgs};
use output::OutputConfig;

use crate::application::normalize::{Normalizer, Vocabulary};
use crate::domain::listing::{Listing, RawListing};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Execute a parsed command line.
///
/// # Errors
/// Returns the first error raised by the selected command.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose, &cli.color));

    match &cli.command {
        Commands::Run(args) => run::execute(&cli.config, args).await,
        Commands::CheckConfig => check::execute(&cli.config),
        Commands::TestAlert(args) => alert::execute(&cli.config, args).await,
        Commands::Evaluate(args) => evaluate::execute(&cli.config, args),
        Commands::Status => status::execute(&cli.config).await,
    }
}

pub(crate) fn load_config(path: &Path) -> Result<Config> {
    Config::load(path)
}

/// Turn command-line listing fields into a normalized listing.
pub(crate) fn listing_from_args(
    args: &ListingArgs,
    normalizer: &Normalizer,
    vocabulary: &Vocabulary,
) -> Result<Listing> {
    let mut raw = RawListing::new(args.source);
    raw.external_id = Some(
        args.id
            .clone()
            .unwrap_or_else(|| format!("cli-{}", uuid::Uuid::new_v4())),
    );
    raw.title = Some(args.title.clone());
    raw.price = Some(args.price.to_string());
    raw.currency = Some(normalizer.base_currency().to_string());
    raw.shipping = Some(args.shipping.to_string());
    raw.url = Some(args.url.clone());
    Ok(normalizer.normalize(raw, vocabulary)?)
}
