//! `paychan submit`: Submit a signed update to close a channel.

use clap::Args;
use paychan_core::{Msg, MsgSubmitUpdate, Update};
use paychan_ledger::{ChannelEvent, CloseReason};
use std::path::PathBuf;

use crate::config::PaychanConfig;
use crate::devnet::{load_key, Devnet};

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Name of the submitting participant's key.
    #[arg(short, long)]
    pub from: String,

    /// Path to a signed update produced by `paychan pay`.
    pub update: PathBuf,
}

pub fn run(args: &SubmitArgs, config: &PaychanConfig) -> anyhow::Result<()> {
    let submitter = load_key(&config.keys_dir(), &args.from)?.address();
    let update: Update = serde_json::from_slice(&std::fs::read(&args.update)?)?;
    let devnet = Devnet::open(config)?;

    let msg = Msg::SubmitUpdate(MsgSubmitUpdate::new(update, submitter));
    match devnet.deliver(&msg)? {
        ChannelEvent::CloseInitiated {
            channel_id,
            execution_height,
        } => {
            println!("Closure of channel {} queued", channel_id);
            println!("  Final at height: {}", execution_height);
        }
        ChannelEvent::Closed {
            channel_id,
            reason: CloseReason::Receiver,
            ..
        } => println!("Channel {} closed", channel_id),
        event => println!("{}", serde_json::to_string_pretty(&event)?),
    }
    Ok(())
}
