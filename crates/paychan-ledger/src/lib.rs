//! Paychan channel ledger.
//!
//! Channel creation and closure, update verification, the dispute queue for
//! sender-initiated closures, the end-of-block sweep, and the message handler
//! that routes inbound messages between them.

pub mod error;
pub mod store;
pub mod bank;
pub mod events;
pub mod verify;
pub mod keeper;
pub mod dispute;
pub mod sweep;
pub mod handler;
pub mod app;

pub use error::{BankError, LedgerError, StoreError};
pub use store::{get_json, set_json, CacheStore, KvStore, MemStore, PrefixStore, WriteOp};
pub use bank::{Bank, StoreBank};
pub use events::{BlockContext, ChannelEvent, CloseReason};
pub use verify::verify_update;
pub use keeper::Keeper;
pub use sweep::end_block;
pub use handler::handle_msg;
pub use app::{App, BANK_PREFIX, MODULE_PREFIX};
