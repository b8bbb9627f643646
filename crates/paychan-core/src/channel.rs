use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::types::{Address, ChannelId, Coins};

/// Index of the sender in [`Channel::participants`].
pub const SENDER: usize = 0;
/// Index of the receiver in [`Channel::participants`].
pub const RECEIVER: usize = 1;

/// Domain separator prepended to update sign bytes.
const UPDATE_SIGN_DOMAIN: &[u8] = b"paychan/update/v1";

/// A unidirectional payment channel: funds escrowed by the sender for the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    /// `[sender, receiver]`.
    pub participants: [Address; 2],
    /// Locked funds. Never mutated after creation.
    pub funds: Coins,
}

impl Channel {
    pub fn sender(&self) -> &Address {
        &self.participants[SENDER]
    }

    pub fn receiver(&self) -> &Address {
        &self.participants[RECEIVER]
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "channel {} ({} -> {}) funds [{}]",
            self.id,
            self.sender(),
            self.receiver(),
            self.funds
        )
    }
}

/// Amounts owed to each participant when a channel closes, in participant order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payout(pub Vec<Coins>);

impl Payout {
    /// A two-legged payout: `sender` gets `to_sender`, receiver gets `to_receiver`.
    pub fn new(to_sender: Coins, to_receiver: Coins) -> Self {
        Self(vec![to_sender, to_receiver])
    }

    pub fn legs(&self) -> &[Coins] {
        &self.0
    }

    pub fn is_any_negative(&self) -> bool {
        self.0.iter().any(Coins::is_any_negative)
    }

    /// Total paid out across all legs.
    pub fn sum(&self) -> Result<Coins, CoreError> {
        self.0
            .iter()
            .try_fold(Coins::empty(), |total, leg| total.checked_add(leg))
    }
}

/// Signature slot of an [`Update`]: the signer's public key and signature bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSignature {
    #[serde(with = "hex_bytes")]
    pub public_key: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub signature: Vec<u8>,
}

/// A proposed final payout for a channel, signed by the sender.
///
/// Exchanged off-chain between the participants and submitted to close the
/// channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub channel_id: ChannelId,
    pub payout: Payout,
    pub signature: UpdateSignature,
}

impl Update {
    /// An update with an empty signature slot, ready to be signed.
    pub fn unsigned(channel_id: ChannelId, payout: Payout) -> Self {
        Self {
            channel_id,
            payout,
            signature: UpdateSignature::default(),
        }
    }

    /// Canonical bytes covered by the sender's signature.
    ///
    /// Covers only the channel id and payout; the signature slot itself is
    /// excluded.
    pub fn sign_bytes(&self) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(UPDATE_SIGN_DOMAIN);
        payload.extend_from_slice(&self.channel_id.to_be_bytes());

        payload.extend_from_slice(&(self.payout.0.len() as u32).to_be_bytes());
        for leg in &self.payout.0 {
            payload.extend_from_slice(&(leg.len() as u32).to_be_bytes());
            for coin in leg.iter() {
                let denom = coin.denom.as_bytes();
                payload.extend_from_slice(&(denom.len() as u32).to_be_bytes());
                payload.extend_from_slice(denom);
                payload.extend_from_slice(&coin.amount.to_be_bytes());
            }
        }

        payload
    }
}

/// An update accepted into the dispute queue, final at `execution_height`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedUpdate {
    pub update: Update,
    pub execution_height: i64,
}

impl SubmittedUpdate {
    pub fn channel_id(&self) -> ChannelId {
        self.update.channel_id
    }

    /// Whether the update is final at block `height`.
    pub fn is_due(&self, height: i64) -> bool {
        self.execution_height <= height
    }
}

/// Channel ids with a pending sender-initiated closure, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmittedUpdatesQueue(pub Vec<ChannelId>);

impl SubmittedUpdatesQueue {
    pub fn contains(&self, id: ChannelId) -> bool {
        self.0.contains(&id)
    }

    /// Append `id` unless it is already queued.
    pub fn insert(&mut self, id: ChannelId) {
        if !self.contains(id) {
            self.0.push(id);
        }
    }

    /// Remove every occurrence of `id`.
    pub fn remove(&mut self, id: ChannelId) {
        self.0.retain(|queued| *queued != id);
    }

    pub fn ids(&self) -> &[ChannelId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
