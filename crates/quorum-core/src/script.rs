//! Canonical multisig witness script construction
//!
//! Derives every cosigner key at the requested path, sorts the keys
//! lexicographically by compressed encoding (BIP-67) and frames them as
//! `OP_m <keys> OP_n OP_CHECKMULTISIG`.

use bitcoin::opcodes::all::OP_CHECKMULTISIG;
use bitcoin::script::Builder;
use thiserror::Error;

use crate::derive::{derive_public_key, DerivationError, COMPRESSED_PUBKEY_LEN};
use crate::descriptor::{KeyPath, MultisigDescriptor, MAX_SIGNERS};

/// Upper bound on the built witness script. A 15-of-15 sorted multisig
/// script is 513 bytes, so every valid descriptor stays inside the
/// 520-byte script-element limit.
pub const MAX_WITNESS_SCRIPT_SIZE: usize = 520;

#[derive(Error, Debug)]
pub enum ScriptBuildError {
    #[error("cosigner {index}: {source}")]
    KeyDerivation {
        index: usize,
        source: DerivationError,
    },

    #[error("invalid threshold: {threshold} of {signers}")]
    InvalidThreshold { threshold: u32, signers: usize },

    #[error("witness script too large: {0} bytes")]
    ScriptTooLarge(usize),

    #[error("script buffer too small: need {needed} bytes, have {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },
}

/// Build the canonical witness script for `descriptor` at `path` into
/// `script_out`, returning the number of bytes written.
///
/// The pubkeys are committed in lexicographic order of their compressed
/// encodings, not in descriptor order: cosigners holding the same quorum
/// in different stored orders must produce byte-identical scripts.
///
/// Nothing is written to `script_out` on any error path.
pub fn witness_script(
    descriptor: &MultisigDescriptor,
    path: &KeyPath,
    script_out: &mut [u8],
) -> Result<usize, ScriptBuildError> {
    let mut pubkeys = [[0u8; COMPRESSED_PUBKEY_LEN]; MAX_SIGNERS];
    let count = descriptor.signer_count();
    for (index, xpub) in descriptor.xpubs().enumerate() {
        pubkeys[index] = derive_public_key(xpub, path)
            .map_err(|source| ScriptBuildError::KeyDerivation { index, source })?;
    }

    // The descriptor constructor already enforced this; re-check instead of
    // trusting it, a bad threshold here means a wrong address.
    let threshold = descriptor.threshold();
    if threshold == 0 || threshold as usize > count {
        return Err(ScriptBuildError::InvalidThreshold {
            threshold,
            signers: count,
        });
    }

    let keys = &mut pubkeys[..count];
    keys.sort_unstable();

    let mut builder = Builder::new().push_int(threshold as i64);
    for key in keys.iter() {
        builder = builder.push_slice(key);
    }
    let script = builder
        .push_int(count as i64)
        .push_opcode(OP_CHECKMULTISIG)
        .into_script();

    let needed = script.len();
    if needed > MAX_WITNESS_SCRIPT_SIZE {
        return Err(ScriptBuildError::ScriptTooLarge(needed));
    }
    // Check the reported length against the caller's capacity before
    // copying a single byte.
    if needed > script_out.len() {
        return Err(ScriptBuildError::BufferTooSmall {
            needed,
            capacity: script_out.len(),
        });
    }
    script_out[..needed].copy_from_slice(script.as_bytes());
    Ok(needed)
}
