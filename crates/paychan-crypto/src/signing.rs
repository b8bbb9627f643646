use ed25519_dalek::{Signer, Verifier, SIGNATURE_LENGTH};
use paychan_core::{Update, UpdateSignature};

use crate::error::CryptoError;
use crate::keys::{KeyPair, PublicKey};

/// Detached Ed25519 signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(ed25519_dalek::Signature);

impl Signature {
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.0.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        ed25519_dalek::Signature::from_slice(bytes)
            .map(Self)
            .map_err(|_| {
                CryptoError::InvalidInput(format!(
                    "signature must be {} bytes, got {}",
                    SIGNATURE_LENGTH,
                    bytes.len()
                ))
            })
    }
}

pub fn sign(message: &[u8], keypair: &KeyPair) -> Signature {
    Signature(keypair.signing_key().sign(message))
}

pub fn verify(message: &[u8], signature: &Signature, pubkey: &PublicKey) -> Result<(), CryptoError> {
    pubkey
        .verifying_key()
        .verify(message, &signature.0)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}

/// Sign `update.sign_bytes()` and fill the signature slot with the key and signature.
pub fn sign_update(mut update: Update, keypair: &KeyPair) -> Update {
    let signature = sign(&update.sign_bytes(), keypair);
    update.signature = UpdateSignature {
        public_key: keypair.public_key().as_bytes().to_vec(),
        signature: signature.to_bytes().to_vec(),
    };
    update
}
