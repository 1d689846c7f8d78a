mod cli;
mod commands;
mod config;
mod error;
mod metadata;
mod pinning;
mod upload;

use clap::Parser;
use cli::Cli;
use commands::Settings;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::resolve(&cli)?;

    match cli.command {
        None | Some(cli::Commands::Single) => commands::single::run(settings).await,
        Some(cli::Commands::Batch(cmd)) => commands::batch::run(settings, cmd).await,
        Some(cli::Commands::Check) => commands::check::run(settings).await,
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "autogas_pin=debug" } else { "autogas_pin=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
