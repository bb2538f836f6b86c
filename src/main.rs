use clap::Parser;

use flipper::adapter::inbound::cli::command::Cli;
use flipper::adapter::inbound::cli::{self, output};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let args = Cli::parse();
    if let Err(err) = cli::execute(args).await {
        output::error(&err.to_string());
        std::process::exit(1);
    }
    Ok(())
}
