//! Cosigner child key derivation
//!
//! Public (hardened-free) BIP-32 derivation of the per-address pubkey each
//! cosigner contributes to the multisig script.

use bitcoin::bip32::Xpub;
use bitcoin::secp256k1::Secp256k1;
use thiserror::Error;

use crate::descriptor::{KeyPath, XPUB_ENCODED_LEN};

/// Length of a compressed SEC1 public key.
pub const COMPRESSED_PUBKEY_LEN: usize = 33;

/// A cosigner's derived pubkey in compressed encoding. Lives on the stack
/// for the duration of one script build and is never persisted.
pub type DerivedPublicKey = [u8; COMPRESSED_PUBKEY_LEN];

#[derive(Error, Debug)]
pub enum DerivationError {
    #[error("malformed extended key: {0}")]
    MalformedExtendedKey(bitcoin::bip32::Error),

    #[error("child key derivation failed: {0}")]
    DerivationFailure(bitcoin::bip32::Error),
}

/// Derive the compressed public key at `path` below `xpub`.
///
/// Deterministic: the same `(xpub, path)` pair always yields the same key.
/// Decoding happens here rather than at descriptor construction, so a
/// corrupted cosigner entry fails loudly instead of producing a wrong
/// address.
pub fn derive_public_key(
    xpub: &[u8; XPUB_ENCODED_LEN],
    path: &KeyPath,
) -> Result<DerivedPublicKey, DerivationError> {
    let parent = Xpub::decode(xpub).map_err(DerivationError::MalformedExtendedKey)?;
    let secp = Secp256k1::new();
    let child = parent
        .derive_pub(&secp, &path.child_numbers())
        .map_err(DerivationError::DerivationFailure)?;
    Ok(child.public_key.serialize())
}
