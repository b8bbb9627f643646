use paychan_core::{Address, ChannelId, Coins, Payout};
use serde::{Deserialize, Serialize};

/// Per-block execution context supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockContext {
    /// Current block height. Non-decreasing across calls.
    pub height: i64,
}

impl BlockContext {
    pub fn new(height: i64) -> Self {
        Self { height }
    }
}

/// Who finalized a channel closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// The receiver submitted a sender-signed update.
    Receiver,
    /// A sender-initiated closure outlived its dispute period.
    DisputeExpired,
}

/// State changes reported back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChannelEvent {
    Created {
        channel_id: ChannelId,
        sender: Address,
        receiver: Address,
        funds: Coins,
    },
    CloseInitiated {
        channel_id: ChannelId,
        execution_height: i64,
    },
    Closed {
        channel_id: ChannelId,
        payout: Payout,
        reason: CloseReason,
    },
}

impl ChannelEvent {
    pub fn channel_id(&self) -> ChannelId {
        match self {
            ChannelEvent::Created { channel_id, .. }
            | ChannelEvent::CloseInitiated { channel_id, .. }
            | ChannelEvent::Closed { channel_id, .. } => *channel_id,
        }
    }
}
