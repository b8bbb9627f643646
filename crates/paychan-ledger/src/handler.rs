//! Routes inbound messages to the keeper.

use paychan_core::{Msg, MsgCreate, MsgSubmitUpdate, RECEIVER, SENDER};

use crate::error::LedgerError;
use crate::events::{BlockContext, ChannelEvent, CloseReason};
use crate::keeper::Keeper;

/// Which side of a channel submitted an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Sender,
    Receiver,
}

/// Dispatch one message. Structural checks run here; business rules are
/// left to the keeper.
pub fn handle_msg(
    keeper: &Keeper,
    ctx: &BlockContext,
    msg: &Msg,
) -> Result<ChannelEvent, LedgerError> {
    msg.validate_basic()?;
    tracing::debug!(kind = msg.kind(), signer = %msg.signer(), height = ctx.height, "Handling message");

    match msg {
        Msg::Create(msg) => handle_create(keeper, msg),
        Msg::SubmitUpdate(msg) => handle_submit_update(keeper, ctx, msg),
    }
}

fn handle_create(keeper: &Keeper, msg: &MsgCreate) -> Result<ChannelEvent, LedgerError> {
    let id = keeper.create_channel(msg.sender(), msg.receiver(), &msg.funds)?;
    Ok(ChannelEvent::Created {
        channel_id: id,
        sender: msg.sender().clone(),
        receiver: msg.receiver().clone(),
        funds: msg.funds.clone(),
    })
}

fn handle_submit_update(
    keeper: &Keeper,
    ctx: &BlockContext,
    msg: &MsgSubmitUpdate,
) -> Result<ChannelEvent, LedgerError> {
    let id = msg.update.channel_id;
    let channel = keeper.require_channel(id)?;

    let role = if msg.submitter == channel.participants[SENDER] {
        Role::Sender
    } else if msg.submitter == channel.participants[RECEIVER] {
        Role::Receiver
    } else {
        tracing::warn!(channel_id = id, submitter = %msg.submitter, "Rejected update from non-participant");
        return Err(LedgerError::UnauthorizedSubmitter {
            submitter: msg.submitter.to_hex(),
            channel_id: id,
        });
    };

    match role {
        Role::Sender => {
            let submitted = keeper.init_close_by_sender(ctx, &msg.update)?;
            Ok(ChannelEvent::CloseInitiated {
                channel_id: id,
                execution_height: submitted.execution_height,
            })
        }
        Role::Receiver => {
            keeper.close_by_receiver(&msg.update)?;
            Ok(ChannelEvent::Closed {
                channel_id: id,
                payout: msg.update.payout.clone(),
                reason: CloseReason::Receiver,
            })
        }
    }
}
