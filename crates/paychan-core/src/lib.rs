//! Paychan core types.
//!
//! Multi-currency amounts, channel records, signed updates, inbound messages
//! and module parameters shared by the ledger, crypto and CLI crates.

pub mod error;
pub mod types;
pub mod channel;
pub mod messages;
pub mod keys;
pub mod config;
pub mod traits;

pub use error::CoreError;
pub use types::{is_valid_denom, parse_channel_id, Address, ChannelId, Coin, Coins};
pub use channel::{
    Channel, Payout, SubmittedUpdate, SubmittedUpdatesQueue, Update, UpdateSignature, RECEIVER,
    SENDER,
};
pub use messages::{Msg, MsgCreate, MsgSubmitUpdate};
pub use config::ChannelParams;
pub use traits::SignatureScheme;
