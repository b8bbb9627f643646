use crate::types::Address;

/// Signature capability used to authenticate channel updates.
///
/// Implementations bind a concrete key scheme; the ledger only needs to
/// derive an address from a public key and check a signature over bytes.
pub trait SignatureScheme: Send + Sync {
    /// Derive the account address controlled by `public_key`.
    /// Returns `None` if the key is malformed for this scheme.
    fn address_of(&self, public_key: &[u8]) -> Option<Address>;

    /// Check `signature` over `message` under `public_key`.
    fn verify(&self, message: &[u8], signature: &[u8], public_key: &[u8]) -> bool;

    /// Short scheme name, e.g. `"ed25519"`.
    fn name(&self) -> &str;
}
