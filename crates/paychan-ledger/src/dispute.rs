//! Sender-initiated closures waiting out their dispute period.
//!
//! Queue membership and the `submittedUpdate:{id}` record are written and
//! removed together; one never exists without the other.

use paychan_core::keys::{submitted_update_key, SUBMITTED_UPDATES_QUEUE_KEY};
use paychan_core::{Channel, ChannelId, SubmittedUpdate, SubmittedUpdatesQueue, Update};

use crate::error::LedgerError;
use crate::events::BlockContext;
use crate::keeper::Keeper;
use crate::store::{get_json, set_json};
use crate::verify::verify_update;

impl Keeper {
    /// The pending sender closure for channel `id`, if any.
    pub fn submitted_update(&self, id: ChannelId) -> Result<Option<SubmittedUpdate>, LedgerError> {
        Ok(get_json(self.store.as_ref(), &submitted_update_key(id))?)
    }

    /// Channel ids with a pending sender closure, in submission order.
    pub fn submitted_updates_queue(&self) -> Result<SubmittedUpdatesQueue, LedgerError> {
        Ok(get_json::<SubmittedUpdatesQueue>(self.store.as_ref(), SUBMITTED_UPDATES_QUEUE_KEY)?
            .unwrap_or_default())
    }

    fn set_submitted_updates_queue(&self, queue: &SubmittedUpdatesQueue) -> Result<(), LedgerError> {
        if queue.is_empty() {
            self.store.delete(SUBMITTED_UPDATES_QUEUE_KEY)?;
        } else {
            set_json(self.store.as_ref(), SUBMITTED_UPDATES_QUEUE_KEY, queue)?;
        }
        Ok(())
    }

    pub(crate) fn enqueue(&self, submitted: &SubmittedUpdate) -> Result<(), LedgerError> {
        let id = submitted.channel_id();
        let mut queue = self.submitted_updates_queue()?;
        queue.insert(id);
        set_json(self.store.as_ref(), &submitted_update_key(id), submitted)?;
        self.set_submitted_updates_queue(&queue)?;
        tracing::debug!(channel_id = id, queued = queue.len(), "Enqueued submitted update");
        Ok(())
    }

    pub(crate) fn dequeue(&self, id: ChannelId) -> Result<(), LedgerError> {
        let mut queue = self.submitted_updates_queue()?;
        queue.remove(id);
        self.store.delete(&submitted_update_key(id))?;
        self.set_submitted_updates_queue(&queue)?;
        tracing::debug!(channel_id = id, queued = queue.len(), "Dequeued submitted update");
        Ok(())
    }

    fn verify(&self, channel: &Channel, update: &Update) -> Result<(), LedgerError> {
        verify_update(channel, update, &self.params, self.scheme.as_ref()).inspect_err(|e| {
            tracing::debug!(channel_id = channel.id, error = %e, "Update failed verification");
        })
    }

    /// Start a sender closure: verify `update` and queue it until
    /// `height + dispute_period`. Moves no funds.
    ///
    /// Only one sender closure may be pending per channel; a second is
    /// rejected and the first is left as it was.
    pub fn init_close_by_sender(
        &self,
        ctx: &BlockContext,
        update: &Update,
    ) -> Result<SubmittedUpdate, LedgerError> {
        let id = update.channel_id;
        let channel = self.require_channel(id)?;
        self.verify(&channel, update)?;

        if self.submitted_update(id)?.is_some() {
            tracing::warn!(channel_id = id, "Rejected duplicate sender closure");
            return Err(LedgerError::DuplicateSubmission(id));
        }

        let execution_height = ctx
            .height
            .checked_add(self.params.dispute_period)
            .ok_or(LedgerError::HeightOverflow {
                height: ctx.height,
                dispute_period: self.params.dispute_period,
            })?;
        let submitted = SubmittedUpdate {
            update: update.clone(),
            execution_height,
        };
        self.enqueue(&submitted)?;

        tracing::info!(
            channel_id = id,
            height = ctx.height,
            execution_height = submitted.execution_height,
            "Sender closure queued"
        );
        Ok(submitted)
    }

    /// Close immediately with a sender-signed `update` presented by the
    /// receiver, overriding any pending sender closure.
    pub fn close_by_receiver(&self, update: &Update) -> Result<Channel, LedgerError> {
        let id = update.channel_id;
        let channel = self.require_channel(id)?;
        self.verify(&channel, update)?;

        if self.submitted_update(id)?.is_some() {
            self.dequeue(id)?;
            tracing::info!(channel_id = id, "Receiver overrode pending sender closure");
        }

        Ok(self.close_channel(update))
    }
}
