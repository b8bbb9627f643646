use paychan_core::{ChannelId, CoreError};

/// Key-value store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Balance ledger errors.
#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("insufficient funds for {account}: available [{available}], required [{required}]")]
    InsufficientFunds {
        account: String,
        available: String,
        required: String,
    },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Channel ledger errors surfaced to callers. None of these leave partial state.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid coins: {0}")]
    InvalidCoins(String),

    #[error("channel not found: {0}")]
    ChannelNotFound(ChannelId),

    #[error("update is for channel {update} but was checked against channel {channel}")]
    ChannelMismatch { update: ChannelId, channel: ChannelId },

    #[error("payout has {legs} legs but channel has {participants} participants")]
    PayoutLegCount { legs: usize, participants: usize },

    #[error("payout coins aren't well-formed: [{0}]")]
    MalformedPayout(String),

    #[error("payout cannot be negative")]
    NegativePayout,

    #[error("payout leg {0} is empty")]
    EmptyPayoutLeg(usize),

    #[error("payout [{payout}] doesn't match channel funds [{funds}]")]
    PayoutMismatch { payout: String, funds: String },

    #[error("invalid update signature: {0}")]
    InvalidSignature(String),

    #[error("channel {0} already has a pending sender closure")]
    DuplicateSubmission(ChannelId),

    #[error("dispute period {dispute_period} from height {height} overflows the block height")]
    HeightOverflow { height: i64, dispute_period: i64 },

    #[error("submitter {submitter} is not a participant of channel {channel_id}")]
    UnauthorizedSubmitter {
        submitter: String,
        channel_id: ChannelId,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Bank(#[from] BankError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
