//! `paychan query`: Read channel and account state.

use clap::{Args, Subcommand};
use paychan_ledger::Bank;

use crate::config::PaychanConfig;
use crate::devnet::{resolve_address, Devnet};

#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(subcommand)]
    pub command: QueryCommand,
}

#[derive(Subcommand, Debug)]
pub enum QueryCommand {
    /// Show a channel.
    Channel { id: i64 },
    /// Show the pending sender closure of a channel.
    Update { id: i64 },
    /// List channels with a pending sender closure.
    Queue,
    /// Show an account balance.
    Balance {
        /// Key name or hex address.
        account: String,
    },
    /// Show the current block height.
    Height,
}

pub fn run(args: &QueryArgs, config: &PaychanConfig) -> anyhow::Result<()> {
    let devnet = Devnet::open(config)?;
    let keeper = devnet.keeper();

    match &args.command {
        QueryCommand::Channel { id } => match keeper.channel(*id)? {
            Some(channel) => println!("{}", serde_json::to_string_pretty(&channel)?),
            None => anyhow::bail!("channel {} not found", id),
        },
        QueryCommand::Update { id } => match keeper.submitted_update(*id)? {
            Some(submitted) => println!("{}", serde_json::to_string_pretty(&submitted)?),
            None => anyhow::bail!("no pending closure for channel {}", id),
        },
        QueryCommand::Queue => {
            println!("{}", serde_json::to_string(&keeper.submitted_updates_queue()?)?)
        }
        QueryCommand::Balance { account } => {
            let address = resolve_address(&config.keys_dir(), account)?;
            println!("{}", keeper.bank().balance(&address)?);
        }
        QueryCommand::Height => println!("{}", devnet.height()?),
    }
    Ok(())
}
