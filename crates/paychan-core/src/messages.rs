use serde::{Deserialize, Serialize};

use crate::channel::Update;
use crate::error::CoreError;
use crate::types::{Address, Coins};

/// Open a channel from `participants[0]` to `participants[1]`, locking `funds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreate {
    /// `[sender, receiver]`.
    pub participants: [Address; 2],
    pub funds: Coins,
}

impl MsgCreate {
    pub fn new(sender: Address, receiver: Address, funds: Coins) -> Self {
        Self {
            participants: [sender, receiver],
            funds,
        }
    }

    pub fn sender(&self) -> &Address {
        &self.participants[0]
    }

    pub fn receiver(&self) -> &Address {
        &self.participants[self.participants.len() - 1]
    }

    /// Stateless checks: non-empty addresses and well-formed, positive funds.
    pub fn validate_basic(&self) -> Result<(), CoreError> {
        for participant in &self.participants {
            if participant.is_empty() {
                return Err(CoreError::InvalidAddress("empty participant address".into()));
            }
        }
        if !(self.funds.is_valid() && self.funds.is_all_positive()) {
            return Err(CoreError::InvalidCoins(self.funds.to_string()));
        }
        Ok(())
    }
}

/// Submit a signed update to close a channel, on behalf of `submitter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSubmitUpdate {
    pub update: Update,
    pub submitter: Address,
}

impl MsgSubmitUpdate {
    pub fn new(update: Update, submitter: Address) -> Self {
        Self { update, submitter }
    }

    /// Stateless checks: submitter present, id non-negative, payout legs
    /// well-formed and non-negative.
    pub fn validate_basic(&self) -> Result<(), CoreError> {
        if self.submitter.is_empty() {
            return Err(CoreError::InvalidAddress("empty submitter address".into()));
        }
        if self.update.channel_id < 0 {
            return Err(CoreError::InvalidChannelId(self.update.channel_id.to_string()));
        }
        for leg in self.update.payout.legs() {
            if !leg.is_valid() || leg.is_any_negative() {
                return Err(CoreError::InvalidCoins(format!(
                    "payout leg invalid: [{}]",
                    leg
                )));
            }
        }
        Ok(())
    }
}

/// Inbound messages routed to the channel module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Msg {
    Create(MsgCreate),
    SubmitUpdate(MsgSubmitUpdate),
}

impl Msg {
    pub fn validate_basic(&self) -> Result<(), CoreError> {
        match self {
            Msg::Create(msg) => msg.validate_basic(),
            Msg::SubmitUpdate(msg) => msg.validate_basic(),
        }
    }

    /// Address that must authorize this message.
    pub fn signer(&self) -> &Address {
        match self {
            Msg::Create(msg) => msg.sender(),
            Msg::SubmitUpdate(msg) => &msg.submitter,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Msg::Create(_) => "create",
            Msg::SubmitUpdate(_) => "submit_update",
        }
    }
}
