//! Host-side wiring: per-message write buffering over the module and bank key spaces.

use paychan_core::{ChannelParams, Msg, SignatureScheme};
use std::sync::Arc;

use crate::bank::StoreBank;
use crate::error::LedgerError;
use crate::events::{BlockContext, ChannelEvent};
use crate::handler::handle_msg;
use crate::keeper::Keeper;
use crate::store::{CacheStore, KvStore, PrefixStore};
use crate::sweep;

/// Key prefix of the channel module inside the host store.
pub const MODULE_PREFIX: &[u8] = b"paychan/";
/// Key prefix of account balances inside the host store.
pub const BANK_PREFIX: &[u8] = b"bank/";

/// Runs messages and block sweeps so that each one commits fully or not at all.
///
/// Module and bank state share one host store, so a unit's writes reach it in
/// a single [`KvStore::apply`].
pub struct App {
    store: Arc<dyn KvStore>,
    scheme: Arc<dyn SignatureScheme>,
    params: ChannelParams,
}

impl App {
    pub fn new(
        store: Arc<dyn KvStore>,
        scheme: Arc<dyn SignatureScheme>,
        params: ChannelParams,
    ) -> Self {
        Self {
            store,
            scheme,
            params,
        }
    }

    /// Keeper over committed state, for queries and direct funding.
    pub fn keeper(&self) -> Keeper {
        self.keeper_over(self.store.clone())
    }

    /// Deliver one message. On error nothing is written.
    pub fn deliver(&self, ctx: &BlockContext, msg: &Msg) -> Result<ChannelEvent, LedgerError> {
        self.buffered(|keeper| handle_msg(keeper, ctx, msg))
    }

    /// Run the end-of-block sweep.
    pub fn end_block(&self, ctx: &BlockContext) -> Result<Vec<ChannelEvent>, LedgerError> {
        self.buffered(|keeper| sweep::end_block(keeper, ctx))
    }

    fn keeper_over(&self, root: Arc<dyn KvStore>) -> Keeper {
        let bank_store = Arc::new(PrefixStore::new(root.clone(), BANK_PREFIX));
        Keeper::new(
            Arc::new(PrefixStore::new(root, MODULE_PREFIX)),
            Arc::new(StoreBank::new(bank_store)),
            self.scheme.clone(),
            self.params.clone(),
        )
    }

    fn buffered<T>(
        &self,
        run: impl FnOnce(&Keeper) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let cache = Arc::new(CacheStore::new(self.store.clone()));
        let keeper = self.keeper_over(cache.clone());

        match run(&keeper) {
            Ok(value) => {
                cache.write()?;
                Ok(value)
            }
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    discarded = cache.pending_len(),
                    "Discarding buffered writes"
                );
                Err(e)
            }
        }
    }
}
