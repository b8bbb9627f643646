//! Stateless validation of a proposed channel payout.

use paychan_core::{Channel, ChannelParams, SignatureScheme, Update, SENDER};

use crate::error::LedgerError;

/// Check that `update` is a valid closing payout for `channel`.
///
/// Checks run in a fixed order and stop at the first failure: leg count,
/// leg well-formedness, negativity, empty legs (when disallowed by `params`),
/// conservation of the channel funds, then the sender's signature.
/// Touches no state.
pub fn verify_update(
    channel: &Channel,
    update: &Update,
    params: &ChannelParams,
    scheme: &dyn SignatureScheme,
) -> Result<(), LedgerError> {
    if update.channel_id != channel.id {
        return Err(LedgerError::ChannelMismatch {
            update: update.channel_id,
            channel: channel.id,
        });
    }

    let legs = update.payout.legs();
    if legs.len() != channel.participants.len() {
        return Err(LedgerError::PayoutLegCount {
            legs: legs.len(),
            participants: channel.participants.len(),
        });
    }

    if let Some(leg) = legs.iter().find(|leg| !leg.is_valid()) {
        return Err(LedgerError::MalformedPayout(leg.to_string()));
    }

    if update.payout.is_any_negative() {
        return Err(LedgerError::NegativePayout);
    }

    if !params.allow_zero_payout_leg {
        if let Some(index) = legs.iter().position(|leg| leg.is_empty()) {
            return Err(LedgerError::EmptyPayoutLeg(index));
        }
    }

    let total = update.payout.sum()?;
    if total != channel.funds {
        return Err(LedgerError::PayoutMismatch {
            payout: total.to_string(),
            funds: channel.funds.to_string(),
        });
    }

    verify_sender_signature(channel, update, scheme)
}

fn verify_sender_signature(
    channel: &Channel,
    update: &Update,
    scheme: &dyn SignatureScheme,
) -> Result<(), LedgerError> {
    let sig = &update.signature;
    let signer = scheme
        .address_of(&sig.public_key)
        .ok_or_else(|| LedgerError::InvalidSignature("malformed public key".into()))?;

    if signer != channel.participants[SENDER] {
        return Err(LedgerError::InvalidSignature(format!(
            "signer {} is not the channel sender",
            signer
        )));
    }

    if !scheme.verify(&update.sign_bytes(), &sig.signature, &sig.public_key) {
        return Err(LedgerError::InvalidSignature(format!(
            "{} signature does not verify",
            scheme.name()
        )));
    }

    Ok(())
}
