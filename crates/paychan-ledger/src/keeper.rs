use paychan_core::keys::{channel_key, LAST_CHANNEL_ID_KEY};
use paychan_core::{Address, Channel, ChannelId, ChannelParams, Coins, SignatureScheme, Update};
use std::sync::Arc;

use crate::bank::Bank;
use crate::error::LedgerError;
use crate::store::{get_json, set_json, KvStore};

/// Halt on corrupted state. Never returned to callers as an error.
pub(crate) fn invariant_violation(what: String) -> ! {
    tracing::error!(violation = %what, "channel ledger invariant violated");
    panic!("channel ledger invariant violated: {}", what);
}

/// Owns channel records, the channel id counter and the dispute queue.
///
/// All state lives in the module store; the keeper itself holds only handles
/// to its collaborators.
pub struct Keeper {
    pub(crate) store: Arc<dyn KvStore>,
    pub(crate) bank: Arc<dyn Bank>,
    pub(crate) scheme: Arc<dyn SignatureScheme>,
    pub(crate) params: ChannelParams,
}

impl Keeper {
    pub fn new(
        store: Arc<dyn KvStore>,
        bank: Arc<dyn Bank>,
        scheme: Arc<dyn SignatureScheme>,
        params: ChannelParams,
    ) -> Self {
        Self {
            store,
            bank,
            scheme,
            params,
        }
    }

    pub fn params(&self) -> &ChannelParams {
        &self.params
    }

    pub fn bank(&self) -> &dyn Bank {
        self.bank.as_ref()
    }

    /// Look up a channel by id.
    pub fn channel(&self, id: ChannelId) -> Result<Option<Channel>, LedgerError> {
        Ok(get_json(self.store.as_ref(), &channel_key(id))?)
    }

    pub(crate) fn require_channel(&self, id: ChannelId) -> Result<Channel, LedgerError> {
        self.channel(id)?.ok_or(LedgerError::ChannelNotFound(id))
    }

    pub(crate) fn set_channel(&self, channel: &Channel) -> Result<(), LedgerError> {
        set_json(self.store.as_ref(), &channel_key(channel.id), channel)?;
        Ok(())
    }

    /// The most recently issued channel id, `-1` before the first channel.
    pub fn last_channel_id(&self) -> Result<ChannelId, LedgerError> {
        Ok(get_json::<ChannelId>(self.store.as_ref(), LAST_CHANNEL_ID_KEY)?.unwrap_or(-1))
    }

    fn next_channel_id(&self) -> Result<ChannelId, LedgerError> {
        let id = self.last_channel_id()? + 1;
        set_json(self.store.as_ref(), LAST_CHANNEL_ID_KEY, &id)?;
        Ok(id)
    }

    /// Open a channel from `sender` to `receiver`, escrowing `funds` from the sender.
    ///
    /// The debit is the only step that can fail on a well-formed request; it
    /// runs before an id is allocated, so a failed create consumes nothing.
    pub fn create_channel(
        &self,
        sender: &Address,
        receiver: &Address,
        funds: &Coins,
    ) -> Result<ChannelId, LedgerError> {
        if sender.is_empty() || receiver.is_empty() {
            return Err(LedgerError::InvalidAddress("empty participant address".into()));
        }
        if !(funds.is_valid() && funds.is_all_positive()) {
            return Err(LedgerError::InvalidCoins(funds.to_string()));
        }

        self.bank.subtract(sender, funds)?;

        let id = self.next_channel_id()?;
        let channel = Channel {
            id,
            participants: [sender.clone(), receiver.clone()],
            funds: funds.clone(),
        };
        self.set_channel(&channel)?;

        tracing::info!(
            channel_id = id,
            sender = %sender,
            receiver = %receiver,
            funds = %funds,
            "Channel created"
        );
        Ok(id)
    }

    /// Pay out each leg of `update` and delete the channel.
    ///
    /// Callers verify the update first. A missing channel or failed credit
    /// here means state is corrupt and halts processing.
    pub(crate) fn close_channel(&self, update: &Update) -> Channel {
        let id = update.channel_id;
        let channel = match self.channel(id) {
            Ok(Some(channel)) => channel,
            Ok(None) => invariant_violation(format!("closing unknown channel {}", id)),
            Err(e) => invariant_violation(format!("reading channel {}: {}", id, e)),
        };

        for (participant, leg) in channel.participants.iter().zip(update.payout.legs()) {
            if leg.is_empty() {
                continue;
            }
            if let Err(e) = self.bank.add(participant, leg) {
                invariant_violation(format!(
                    "crediting {} with [{}] on channel {}: {}",
                    participant, leg, id, e
                ));
            }
        }

        if let Err(e) = self.store.delete(&channel_key(id)) {
            invariant_violation(format!("deleting channel {}: {}", id, e));
        }

        tracing::info!(
            channel_id = id,
            payout = ?update.payout.legs(),
            "Channel closed"
        );
        channel
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::bank::StoreBank;
    use crate::error::BankError;
    use crate::store::MemStore;
    use paychan_core::Payout;
    use paychan_crypto::{Ed25519Scheme, KeyPair};

    pub(crate) struct Fixture {
        pub keeper: Keeper,
        pub sender: KeyPair,
        pub receiver: KeyPair,
        pub module_store: Arc<MemStore>,
    }

    pub(crate) fn fixture_with(params: ChannelParams) -> Fixture {
        let module_store = Arc::new(MemStore::new());
        let bank = Arc::new(StoreBank::new(Arc::new(MemStore::new())));
        let sender = KeyPair::from_seed(&[1u8; 32]);
        let receiver = KeyPair::from_seed(&[2u8; 32]);
        bank.add(&sender.address(), &Coins::single("usd", 100))
            .unwrap();
        let keeper = Keeper::new(
            module_store.clone(),
            bank,
            Arc::new(Ed25519Scheme),
            params,
        );
        Fixture {
            keeper,
            sender,
            receiver,
            module_store,
        }
    }

    pub(crate) fn fixture() -> Fixture {
        fixture_with(ChannelParams::default())
    }

    pub(crate) fn open(f: &Fixture, amount: i128) -> ChannelId {
        f.keeper
            .create_channel(
                &f.sender.address(),
                &f.receiver.address(),
                &Coins::single("usd", amount),
            )
            .unwrap()
    }

    pub(crate) fn usd(f: &Fixture, who: &Address) -> i128 {
        f.keeper.bank().balance(who).unwrap().amount_of("usd")
    }

    #[test]
    fn test_create_debits_sender_only() {
        let f = fixture();
        let id = open(&f, 10);
        let channel = f.keeper.channel(id).unwrap().unwrap();

        assert_eq!(channel.funds, Coins::single("usd", 10));
        assert_eq!(channel.sender(), &f.sender.address());
        assert_eq!(channel.receiver(), &f.receiver.address());
        assert_eq!(usd(&f, &f.sender.address()), 90);
        assert_eq!(usd(&f, &f.receiver.address()), 0);
    }

    #[test]
    fn test_ids_are_sequential_and_never_reused() {
        let f = fixture();
        assert_eq!(f.keeper.last_channel_id().unwrap(), -1);
        assert_eq!(open(&f, 1), 0);
        assert_eq!(open(&f, 1), 1);

        let update = Update::unsigned(1, Payout::new(Coins::single("usd", 1), Coins::empty()));
        f.keeper.close_channel(&update);
        assert!(f.keeper.channel(1).unwrap().is_none());

        assert_eq!(open(&f, 1), 2);
        assert_eq!(f.keeper.last_channel_id().unwrap(), 2);
    }

    #[test]
    fn test_insufficient_funds_changes_nothing() {
        let f = fixture();
        let result = f.keeper.create_channel(
            &f.sender.address(),
            &f.receiver.address(),
            &Coins::single("usd", 101),
        );
        assert!(matches!(
            result,
            Err(LedgerError::Bank(BankError::InsufficientFunds { .. }))
        ));
        assert_eq!(f.keeper.last_channel_id().unwrap(), -1);
        assert!(f.module_store.is_empty());
        assert_eq!(usd(&f, &f.sender.address()), 100);
    }

    #[test]
    fn test_zero_value_channel_rejected() {
        let f = fixture();
        let result = f.keeper.create_channel(
            &f.sender.address(),
            &f.receiver.address(),
            &Coins::empty(),
        );
        assert!(matches!(result, Err(LedgerError::InvalidCoins(_))));
    }

    #[test]
    fn test_empty_address_rejected() {
        let f = fixture();
        let result = f.keeper.create_channel(
            &f.sender.address(),
            &Address::default(),
            &Coins::single("usd", 1),
        );
        assert!(matches!(result, Err(LedgerError::InvalidAddress(_))));
    }

    #[test]
    fn test_close_channel_pays_both_legs() {
        let f = fixture();
        let id = open(&f, 10);
        let update = Update::unsigned(
            id,
            Payout::new(Coins::single("usd", 3), Coins::single("usd", 7)),
        );
        let closed = f.keeper.close_channel(&update);

        assert_eq!(closed.id, id);
        assert_eq!(usd(&f, &f.sender.address()), 93);
        assert_eq!(usd(&f, &f.receiver.address()), 7);
        assert!(f.keeper.channel(id).unwrap().is_none());
    }

    #[test]
    #[should_panic(expected = "invariant violated")]
    fn test_close_missing_channel_halts() {
        let f = fixture();
        let update = Update::unsigned(7, Payout::new(Coins::empty(), Coins::empty()));
        f.keeper.close_channel(&update);
    }

    #[test]
    #[should_panic(expected = "invariant violated")]
    fn test_close_with_bad_credit_halts() {
        let f = fixture();
        let id = open(&f, 10);
        let update = Update::unsigned(
            id,
            Payout::new(Coins::single("usd", -3), Coins::single("usd", 13)),
        );
        f.keeper.close_channel(&update);
    }
}
