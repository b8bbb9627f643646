//! Integration test: channel lifecycle across the core, crypto and ledger crates.
//!
//! Drives the ledger through `App`, the same entry point a host uses, so every
//! scenario also covers per-message commit and rollback.

use paychan_core::{ChannelParams, Coins};
use paychan_crypto::KeyPair;
use paychan_integration_tests::{coins, Chain};
use paychan_ledger::{ChannelEvent, CloseReason, LedgerError};

fn chain() -> Chain {
    Chain::new(ChannelParams::default(), coins("50eur,100usd"))
}

// =========================================================================
// Creation
// =========================================================================

#[test]
fn test_create_escrows_funds() {
    let chain = chain();
    let id = chain.open(coins("5eur,10usd"));

    let channel = chain.app.keeper().channel(id).unwrap().expect("channel stored");
    assert_eq!(channel.funds, coins("5eur,10usd"));
    assert_eq!(chain.balance(&chain.sender.address()), coins("45eur,90usd"));
    assert!(chain.balance(&chain.receiver.address()).is_empty());
}

#[test]
fn test_ids_never_reused() {
    let mut chain = chain();
    let first = chain.open(coins("10usd"));
    let update = chain.signed(first, coins("10usd"), Coins::empty());
    chain.submit(&chain.receiver, update).unwrap();
    chain.end_block();

    assert_eq!(chain.open(coins("10usd")), first + 1);
    assert_eq!(chain.open(coins("10usd")), first + 2);
    assert_eq!(chain.app.keeper().last_channel_id().unwrap(), first + 2);
}

#[test]
fn test_create_beyond_balance_leaves_no_trace() {
    let chain = chain();
    let msg = paychan_core::Msg::Create(paychan_core::MsgCreate::new(
        chain.sender.address(),
        chain.receiver.address(),
        coins("101usd"),
    ));
    let result = chain.app.deliver(&chain.ctx(), &msg);

    assert!(matches!(result, Err(LedgerError::Bank(_))));
    assert_eq!(chain.app.keeper().last_channel_id().unwrap(), -1);
    assert_eq!(chain.balance(&chain.sender.address()), coins("50eur,100usd"));
}

// =========================================================================
// Receiver closure
// =========================================================================

#[test]
fn test_receiver_close_pays_out() {
    let chain = chain();
    let id = chain.open(coins("10usd"));
    let update = chain.signed(id, coins("3usd"), coins("7usd"));

    let event = chain.submit(&chain.receiver, update).unwrap();
    assert!(matches!(
        event,
        ChannelEvent::Closed { reason: CloseReason::Receiver, .. }
    ));
    assert_eq!(chain.balance(&chain.sender.address()), coins("50eur,93usd"));
    assert_eq!(chain.balance(&chain.receiver.address()), coins("7usd"));
    assert!(chain.app.keeper().channel(id).unwrap().is_none());
}

#[test]
fn test_multi_currency_payout() {
    let chain = chain();
    let id = chain.open(coins("5eur,10usd"));
    let update = chain.signed(id, coins("1eur"), coins("4eur,10usd"));

    chain.submit(&chain.receiver, update).unwrap();
    assert_eq!(chain.balance(&chain.sender.address()), coins("46eur,90usd"));
    assert_eq!(chain.balance(&chain.receiver.address()), coins("4eur,10usd"));
}

#[test]
fn test_underpayout_rejected_without_side_effects() {
    let chain = chain();
    let id = chain.open(coins("10usd"));
    let update = chain.signed(id, coins("3usd"), coins("6usd"));

    let result = chain.submit(&chain.receiver, update);
    assert!(matches!(result, Err(LedgerError::PayoutMismatch { .. })));
    assert!(chain.app.keeper().channel(id).unwrap().is_some());
    assert!(chain.balance(&chain.receiver.address()).is_empty());
}

#[test]
fn test_update_signed_by_receiver_rejected() {
    let chain = chain();
    let id = chain.open(coins("10usd"));
    let update = paychan_crypto::sign_update(
        paychan_core::Update::unsigned(
            id,
            paychan_core::Payout::new(Coins::empty(), coins("10usd")),
        ),
        &chain.receiver,
    );

    let result = chain.submit(&chain.receiver, update);
    assert!(matches!(result, Err(LedgerError::InvalidSignature(_))));
}

// =========================================================================
// Sender closure and the dispute period
// =========================================================================

#[test]
fn test_sender_close_finalizes_after_dispute_period() {
    let mut chain = chain();
    let id = chain.open(coins("10usd"));
    let submitted_at = chain.height;
    let update = chain.signed(id, coins("6usd"), coins("4usd"));

    let event = chain.submit(&chain.sender, update).unwrap();
    let due = submitted_at + ChannelParams::default().dispute_period;
    assert_eq!(
        event,
        ChannelEvent::CloseInitiated {
            channel_id: id,
            execution_height: due,
        }
    );

    while chain.height < due {
        assert!(chain.end_block().is_empty());
        assert!(chain.app.keeper().channel(id).unwrap().is_some());
    }

    let events = chain.end_block();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        ChannelEvent::Closed { reason: CloseReason::DisputeExpired, .. }
    ));

    let keeper = chain.app.keeper();
    assert!(keeper.channel(id).unwrap().is_none());
    assert!(keeper.submitted_update(id).unwrap().is_none());
    assert_eq!(chain.balance(&chain.sender.address()), coins("50eur,96usd"));
    assert_eq!(chain.balance(&chain.receiver.address()), coins("4usd"));
}

#[test]
fn test_second_sender_submission_rejected() {
    let chain = chain();
    let id = chain.open(coins("10usd"));
    let first = chain.signed(id, coins("3usd"), coins("7usd"));

    chain.submit(&chain.sender, first.clone()).unwrap();
    let result = chain.submit(&chain.sender, first.clone());
    assert!(matches!(result, Err(LedgerError::DuplicateSubmission(_))));

    let keeper = chain.app.keeper();
    assert_eq!(keeper.submitted_updates_queue().unwrap().len(), 1);
    assert_eq!(keeper.submitted_update(id).unwrap().unwrap().update, first);
}

#[test]
fn test_receiver_overrides_sender_close() {
    let mut chain = chain();
    let id = chain.open(coins("10usd"));

    let greedy = chain.signed(id, coins("10usd"), Coins::empty());
    chain.submit(&chain.sender, greedy).unwrap();
    chain.end_block();

    let better = chain.signed(id, coins("2usd"), coins("8usd"));
    chain.submit(&chain.receiver, better).unwrap();

    assert!(chain.app.keeper().submitted_updates_queue().unwrap().is_empty());
    for _ in 0..ChannelParams::default().dispute_period + 1 {
        assert!(chain.end_block().is_empty());
    }
    assert_eq!(chain.balance(&chain.receiver.address()), coins("8usd"));
    assert_eq!(chain.balance(&chain.sender.address()), coins("50eur,92usd"));
}

#[test]
fn test_outsider_cannot_submit() {
    let chain = chain();
    let id = chain.open(coins("10usd"));
    let update = chain.signed(id, coins("3usd"), coins("7usd"));
    let outsider = KeyPair::from_seed(&[0x0d; 32]);

    let result = chain.submit(&outsider, update);
    assert!(matches!(result, Err(LedgerError::UnauthorizedSubmitter { .. })));
    assert!(chain.app.keeper().submitted_updates_queue().unwrap().is_empty());
}

// =========================================================================
// Parameters
// =========================================================================

#[test]
fn test_zero_leg_disallowed_by_params() {
    let params = ChannelParams {
        allow_zero_payout_leg: false,
        ..ChannelParams::default()
    };
    let chain = Chain::new(params, coins("100usd"));
    let id = chain.open(coins("10usd"));

    let all_to_receiver = chain.signed(id, Coins::empty(), coins("10usd"));
    let result = chain.submit(&chain.receiver, all_to_receiver);
    assert!(matches!(result, Err(LedgerError::EmptyPayoutLeg(0))));
}

#[test]
fn test_custom_dispute_period() {
    let params = ChannelParams {
        dispute_period: 2,
        ..ChannelParams::default()
    };
    let mut chain = Chain::new(params, coins("100usd"));
    let id = chain.open(coins("10usd"));
    chain
        .submit(&chain.sender, chain.signed(id, coins("5usd"), coins("5usd")))
        .unwrap();

    assert!(chain.end_block().is_empty());
    assert!(chain.end_block().is_empty());
    assert_eq!(chain.end_block().len(), 1);
}

#[test]
fn test_events_serialize_with_tag() {
    let chain = chain();
    let id = chain.open(coins("10usd"));
    let event = chain
        .submit(&chain.receiver, chain.signed(id, coins("3usd"), coins("7usd")))
        .unwrap();

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event"], "closed");
    assert_eq!(json["reason"], "receiver");
}
