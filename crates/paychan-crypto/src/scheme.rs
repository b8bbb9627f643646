use paychan_core::{Address, SignatureScheme};

use crate::keys::PublicKey;
use crate::signing::{verify, Signature};

/// Ed25519 signatures with BLAKE3-derived addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Scheme;

impl SignatureScheme for Ed25519Scheme {
    fn address_of(&self, public_key: &[u8]) -> Option<Address> {
        PublicKey::from_bytes(public_key).ok().map(|pk| pk.address())
    }

    fn verify(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
        let (Ok(pubkey), Ok(sig)) = (
            PublicKey::from_bytes(public_key),
            Signature::from_bytes(signature),
        ) else {
            return false;
        };
        verify(message, &sig, &pubkey).is_ok()
    }

    fn name(&self) -> &str {
        "ed25519"
    }
}
