//! `paychan pay`: Sign an off-chain payment update for the receiver.

use clap::Args;
use paychan_core::{Coins, Payout, Update};
use paychan_crypto::sign_update;
use std::path::PathBuf;

use crate::config::PaychanConfig;
use crate::devnet::load_key;

#[derive(Args, Debug)]
pub struct PayArgs {
    /// Name of the sender's key.
    #[arg(short, long)]
    pub from: String,

    /// Channel to pay through.
    #[arg(long, value_parser = parse_id)]
    pub channel: i64,

    /// Amount the sender keeps, e.g. `3usd`. Empty for nothing.
    #[arg(long, default_value = "")]
    pub to_sender: Coins,

    /// Amount the receiver gets, e.g. `7usd`. Empty for nothing.
    #[arg(long, default_value = "")]
    pub to_receiver: Coins,

    /// Write the signed update here instead of stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

fn parse_id(s: &str) -> Result<i64, String> {
    paychan_core::parse_channel_id(s).map_err(|e| e.to_string())
}

pub fn run(args: &PayArgs, config: &PaychanConfig) -> anyhow::Result<()> {
    let keypair = load_key(&config.keys_dir(), &args.from)?;
    let payout = Payout::new(args.to_sender.clone(), args.to_receiver.clone());
    let update = sign_update(Update::unsigned(args.channel, payout), &keypair);
    let json = serde_json::to_string_pretty(&update)?;

    match &args.out {
        Some(path) => {
            std::fs::write(path, &json)?;
            println!("Signed update for channel {} written to {}", args.channel, path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
