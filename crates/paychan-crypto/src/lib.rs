pub mod error;
pub mod keys;
pub mod signing;
pub mod hashing;
pub mod scheme;

pub use error::CryptoError;
pub use keys::{KeyPair, PublicKey};
pub use signing::{sign, sign_update, verify, Signature};
pub use hashing::{address_from_public_key, hash};
pub use scheme::Ed25519Scheme;
