//! Store key layout of the paychan module.

use crate::types::ChannelId;

/// Key of the last issued channel id.
pub const LAST_CHANNEL_ID_KEY: &[u8] = b"lastChannelID";

/// Key of the pending-closure queue.
pub const SUBMITTED_UPDATES_QUEUE_KEY: &[u8] = b"submittedUpdatesQueue";

/// Key of the channel with the given id.
pub fn channel_key(id: ChannelId) -> Vec<u8> {
    format!("channel:{}", id).into_bytes()
}

/// Key of the pending submitted update for the channel with the given id.
pub fn submitted_update_key(id: ChannelId) -> Vec<u8> {
    format!("submittedUpdate:{}", id).into_bytes()
}
