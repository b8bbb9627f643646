//! Shared fixtures for the paychan integration tests.

use paychan_core::{Address, ChannelId, ChannelParams, Coins, Msg, MsgCreate, MsgSubmitUpdate, Payout, Update};
use paychan_crypto::{sign_update, Ed25519Scheme, KeyPair};
use paychan_ledger::{App, Bank, BlockContext, ChannelEvent, MemStore};
use std::sync::Arc;

/// An in-memory chain with a funded sender and an empty receiver.
pub struct Chain {
    pub app: App,
    pub sender: KeyPair,
    pub receiver: KeyPair,
    pub height: i64,
}

impl Chain {
    pub fn new(params: ChannelParams, sender_funds: Coins) -> Self {
        let app = App::new(Arc::new(MemStore::new()), Arc::new(Ed25519Scheme), params);
        let sender = KeyPair::from_seed(&[0x5e; 32]);
        let receiver = KeyPair::from_seed(&[0x7e; 32]);
        app.keeper()
            .bank()
            .add(&sender.address(), &sender_funds)
            .expect("fund sender");
        Self {
            app,
            sender,
            receiver,
            height: 1,
        }
    }

    pub fn ctx(&self) -> BlockContext {
        BlockContext::new(self.height)
    }

    pub fn balance(&self, who: &Address) -> Coins {
        self.app.keeper().bank().balance(who).expect("balance")
    }

    pub fn open(&self, funds: Coins) -> ChannelId {
        let msg = Msg::Create(MsgCreate::new(
            self.sender.address(),
            self.receiver.address(),
            funds,
        ));
        match self.app.deliver(&self.ctx(), &msg).expect("create channel") {
            ChannelEvent::Created { channel_id, .. } => channel_id,
            other => panic!("unexpected event {:?}", other),
        }
    }

    /// A payout signed by the channel sender.
    pub fn signed(&self, id: ChannelId, to_sender: Coins, to_receiver: Coins) -> Update {
        sign_update(Update::unsigned(id, Payout::new(to_sender, to_receiver)), &self.sender)
    }

    pub fn submit(&self, submitter: &KeyPair, update: Update) -> Result<ChannelEvent, paychan_ledger::LedgerError> {
        let msg = Msg::SubmitUpdate(MsgSubmitUpdate::new(update, submitter.address()));
        self.app.deliver(&self.ctx(), &msg)
    }

    /// Sweep the current block and move to the next.
    pub fn end_block(&mut self) -> Vec<ChannelEvent> {
        let events = self.app.end_block(&self.ctx()).expect("end block");
        self.height += 1;
        events
    }
}

/// Parse a coin list such as `"3eur,10usd"`.
pub fn coins(s: &str) -> Coins {
    s.parse().expect("valid coins")
}
