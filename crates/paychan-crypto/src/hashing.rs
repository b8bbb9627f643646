use paychan_core::Address;

/// BLAKE3 hash (32 bytes).
pub type Hash = [u8; 32];

/// Length of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Hash arbitrary data using BLAKE3.
pub fn hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Derive an account address: the first 20 bytes of BLAKE3(public key).
pub fn address_from_public_key(public_key: &[u8]) -> Address {
    Address::new(hash(public_key)[..ADDRESS_LEN].to_vec())
}
