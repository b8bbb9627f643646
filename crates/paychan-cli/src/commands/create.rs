//! `paychan create`: Open a channel and escrow funds.

use clap::Args;
use paychan_core::{Coins, Msg, MsgCreate};
use paychan_ledger::ChannelEvent;

use crate::config::PaychanConfig;
use crate::devnet::{load_key, resolve_address, Devnet};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the sender's key.
    #[arg(short, long)]
    pub from: String,

    /// Receiver key name or hex address.
    #[arg(short, long)]
    pub to: String,

    /// Funds to lock, e.g. `10usd`.
    #[arg(short, long)]
    pub amount: Coins,
}

pub fn run(args: &CreateArgs, config: &PaychanConfig) -> anyhow::Result<()> {
    let sender = load_key(&config.keys_dir(), &args.from)?.address();
    let receiver = resolve_address(&config.keys_dir(), &args.to)?;
    let devnet = Devnet::open(config)?;

    let msg = Msg::Create(MsgCreate::new(sender, receiver, args.amount.clone()));
    if let ChannelEvent::Created { channel_id, .. } = devnet.deliver(&msg)? {
        println!("Channel created!");
        println!("  Channel ID: {}", channel_id);
        println!("  Funds:      {}", args.amount);
    }
    Ok(())
}
