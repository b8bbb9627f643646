//! End-of-block finalization of expired sender closures.

use crate::error::LedgerError;
use crate::events::{BlockContext, ChannelEvent, CloseReason};
use crate::keeper::{invariant_violation, Keeper};

/// Finalize every queued closure with `execution_height <= ctx.height`.
///
/// Runs once per block after all messages for the block. Entries not yet due
/// stay queued. A queued id without a record, or a record whose channel is
/// gone, halts processing.
pub fn end_block(keeper: &Keeper, ctx: &BlockContext) -> Result<Vec<ChannelEvent>, LedgerError> {
    let queue = keeper.submitted_updates_queue()?;
    let mut events = Vec::new();

    for &id in queue.ids() {
        let submitted = match keeper.submitted_update(id)? {
            Some(submitted) => submitted,
            None => invariant_violation(format!(
                "channel {} is queued without a submitted update",
                id
            )),
        };

        if !submitted.is_due(ctx.height) {
            continue;
        }

        keeper.dequeue(id)?;
        keeper.close_channel(&submitted.update);
        events.push(ChannelEvent::Closed {
            channel_id: id,
            payout: submitted.update.payout,
            reason: CloseReason::DisputeExpired,
        });
    }

    if !events.is_empty() {
        tracing::info!(
            height = ctx.height,
            finalized = events.len(),
            pending = queue.len() - events.len(),
            "Finalized expired closures"
        );
    }
    Ok(events)
}
