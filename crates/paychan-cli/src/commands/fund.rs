//! `paychan fund`: Credit an account from the devnet faucet.

use clap::Args;
use paychan_core::Coins;
use paychan_ledger::Bank;

use crate::config::PaychanConfig;
use crate::devnet::{resolve_address, Devnet};

#[derive(Args, Debug)]
pub struct FundArgs {
    /// Key name or hex address to credit.
    pub account: String,

    /// Amount to credit, e.g. `100usd` or `5eur,100usd`.
    pub amount: Coins,
}

pub fn run(args: &FundArgs, config: &PaychanConfig) -> anyhow::Result<()> {
    let account = resolve_address(&config.keys_dir(), &args.account)?;
    let devnet = Devnet::open(config)?;
    let balance = devnet.keeper().bank().add(&account, &args.amount)?;

    tracing::info!(account = %account, amount = %args.amount, "Faucet credit");
    println!("Funded {}", account);
    println!("  Balance: {}", balance);
    Ok(())
}
