//! `paychan init`: Write a default devnet configuration.

use clap::Args;
use std::path::PathBuf;

use crate::config::PaychanConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory).
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    let config_path = args.dir.join("paychan.toml");

    if config_path.exists() {
        anyhow::bail!("configuration file already exists at {}", config_path.display());
    }

    let mut config = PaychanConfig::default();
    config.storage.data_dir = args.dir.join("data");
    config.save(&config_path)?;
    std::fs::create_dir_all(config.keys_dir())?;

    println!("Initialized paychan devnet at {}", config_path.display());
    println!("  Dispute period: {} blocks", config.channel.dispute_period);
    println!("Run 'paychan keys generate <name>' to create an account.");
    Ok(())
}
