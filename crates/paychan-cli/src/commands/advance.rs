//! `paychan advance`: End blocks, finalizing expired closures.

use clap::Args;

use crate::config::PaychanConfig;
use crate::devnet::Devnet;

#[derive(Args, Debug)]
pub struct AdvanceArgs {
    /// Number of blocks to end.
    #[arg(short, long, default_value_t = 1)]
    pub blocks: u64,
}

pub fn run(args: &AdvanceArgs, config: &PaychanConfig) -> anyhow::Result<()> {
    let devnet = Devnet::open(config)?;
    let events = devnet.advance(args.blocks)?;

    println!("Height: {}", devnet.height()?);
    for event in &events {
        println!("  Finalized channel {}", event.channel_id());
    }
    Ok(())
}
