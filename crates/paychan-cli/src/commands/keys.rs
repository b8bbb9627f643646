//! `paychan keys`: Manage local signing keys.

use clap::{Args, Subcommand};
use paychan_crypto::KeyPair;

use crate::config::PaychanConfig;
use crate::devnet::{load_key, save_key};

#[derive(Args, Debug)]
pub struct KeysArgs {
    #[command(subcommand)]
    pub command: KeysCommand,
}

#[derive(Subcommand, Debug)]
pub enum KeysCommand {
    /// Generate a new key pair and store it under the given name.
    Generate {
        /// Local name for the key.
        name: String,
    },
    /// Show the public key and address of a stored key.
    Show {
        /// Local name of the key.
        name: String,
    },
}

pub fn run(args: &KeysArgs, config: &PaychanConfig) -> anyhow::Result<()> {
    match &args.command {
        KeysCommand::Generate { name } => {
            let keypair = KeyPair::generate();
            let path = save_key(&config.keys_dir(), name, &keypair)?;
            println!("Generated key '{}'", name);
            println!("  Address:    {}", keypair.address());
            println!("  Public key: {}", keypair.public_key().to_hex());
            println!("  Saved to:   {}", path.display());
        }
        KeysCommand::Show { name } => {
            let keypair = load_key(&config.keys_dir(), name)?;
            println!("Key '{}'", name);
            println!("  Address:    {}", keypair.address());
            println!("  Public key: {}", keypair.public_key().to_hex());
        }
    }
    Ok(())
}
