//! Paychan CLI: Local devnet for unidirectional payment channels.
//!
//! Subcommands: init, keys, fund, create, pay, submit, advance, query.

mod commands;
mod config;
mod devnet;
mod storage;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::PaychanConfig;

/// Paychan: Unidirectional multi-currency payment channels.
#[derive(Parser, Debug)]
#[command(name = "paychan", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "paychan.toml")]
    config: PathBuf,

    /// Override the data directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a new devnet configuration.
    Init(commands::init::InitArgs),
    /// Manage local signing keys.
    Keys(commands::keys::KeysArgs),
    /// Credit an account from the devnet faucet.
    Fund(commands::fund::FundArgs),
    /// Open a payment channel.
    Create(commands::create::CreateArgs),
    /// Sign an off-chain payment update.
    Pay(commands::pay::PayArgs),
    /// Submit a signed update to close a channel.
    Submit(commands::submit::SubmitArgs),
    /// End blocks and finalize expired closures.
    Advance(commands::advance::AdvanceArgs),
    /// Query channel and account state.
    Query(commands::query::QueryArgs),
}

fn init_tracing(config: &PaychanConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    if config.logging.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Init(args) = &cli.command {
        return commands::init::run(args);
    }

    let mut config = PaychanConfig::load(&cli.config)?;
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match &cli.command {
        Commands::Init(_) => Ok(()),
        Commands::Keys(args) => commands::keys::run(args, &config),
        Commands::Fund(args) => commands::fund::run(args, &config),
        Commands::Create(args) => commands::create::run(args, &config),
        Commands::Pay(args) => commands::pay::run(args, &config),
        Commands::Submit(args) => commands::submit::run(args, &config),
        Commands::Advance(args) => commands::advance::run(args, &config),
        Commands::Query(args) => commands::query::run(args, &config),
    }
}
