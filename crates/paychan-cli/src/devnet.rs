//! Single-process devnet host: block height, message delivery and key files.

use anyhow::{Context, Result};
use paychan_core::{Address, Msg};
use paychan_crypto::{Ed25519Scheme, KeyPair};
use paychan_ledger::{App, BlockContext, ChannelEvent, Keeper};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::PaychanConfig;
use crate::storage::Storage;

/// Local chain backed by RocksDB. Messages run in the current block;
/// [`Devnet::advance`] ends it and opens the next.
pub struct Devnet {
    storage: Storage,
    app: App,
}

impl Devnet {
    pub fn open(config: &PaychanConfig) -> Result<Self> {
        let storage = Storage::open(&config.db_dir())?;
        let app = App::new(storage.state(), Arc::new(Ed25519Scheme), config.channel.clone());
        Ok(Self { storage, app })
    }

    pub fn height(&self) -> Result<i64> {
        self.storage.height()
    }

    pub fn keeper(&self) -> Keeper {
        self.app.keeper()
    }

    /// Deliver `msg` in the current block.
    pub fn deliver(&self, msg: &Msg) -> Result<ChannelEvent> {
        let ctx = BlockContext::new(self.height()?);
        let event = self
            .app
            .deliver(&ctx, msg)
            .with_context(|| format!("{} message rejected", msg.kind()))?;
        tracing::info!(height = ctx.height, kind = msg.kind(), "Message delivered");
        Ok(event)
    }

    /// End `blocks` blocks, sweeping each one before moving the height on.
    pub fn advance(&self, blocks: u64) -> Result<Vec<ChannelEvent>> {
        let mut events = Vec::new();
        for _ in 0..blocks {
            let height = self.height()?;
            events.extend(self.app.end_block(&BlockContext::new(height))?);
            self.storage.set_height(height + 1)?;
            tracing::debug!(height = height + 1, "Block opened");
        }
        Ok(events)
    }
}

fn key_path(keys_dir: &Path, name: &str) -> PathBuf {
    keys_dir.join(format!("{}.key", name))
}

/// Write a key pair's secret as hex to `{keys_dir}/{name}.key`.
pub fn save_key(keys_dir: &Path, name: &str, keypair: &KeyPair) -> Result<PathBuf> {
    let path = key_path(keys_dir, name);
    if path.exists() {
        anyhow::bail!("key '{}' already exists at {}", name, path.display());
    }
    std::fs::create_dir_all(keys_dir)?;
    std::fs::write(&path, keypair.secret_hex().as_bytes())?;
    Ok(path)
}

pub fn load_key(keys_dir: &Path, name: &str) -> Result<KeyPair> {
    let path = key_path(keys_dir, name);
    let secret = std::fs::read_to_string(&path)
        .with_context(|| format!("no key named '{}' at {}", name, path.display()))?;
    Ok(KeyPair::from_hex(secret.trim())?)
}

/// Accept either a hex address or the name of a local key.
pub fn resolve_address(keys_dir: &Path, name_or_hex: &str) -> Result<Address> {
    if key_path(keys_dir, name_or_hex).exists() {
        return Ok(load_key(keys_dir, name_or_hex)?.address());
    }
    Address::from_hex(name_or_hex)
        .with_context(|| format!("'{}' is neither a key name nor an address", name_or_hex))
}
