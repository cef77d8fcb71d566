//! Address payload derivation
//!
//! The witness script hashes to a payload in one of two ways: straight
//! SHA-256 for native P2WSH, or HASH160 of the wrapping P2WSH output
//! script for P2WSH nested in P2SH.

use bitcoin::hashes::{hash160, sha256, Hash};
use bitcoin::{ScriptBuf, WScriptHash};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::descriptor::{KeyPath, MultisigDescriptor};
use crate::script::{witness_script, ScriptBuildError, MAX_WITNESS_SCRIPT_SIZE};

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error(transparent)]
    Script(#[from] ScriptBuildError),

    #[error("unsupported output variant tag: {0}")]
    UnsupportedVariant(u32),
}

/// Output type selecting the hashing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputVariant {
    /// P2WSH: payload is SHA-256 of the witness script.
    NativeSegwit,
    /// P2WSH nested in P2SH: payload is HASH160 of the wrapping output
    /// script.
    WrappedSegwit,
}

impl OutputVariant {
    /// Decode a numeric wire/config tag. Anything but the two known tags
    /// is rejected, never defaulted.
    pub fn from_tag(tag: u32) -> Result<Self, PayloadError> {
        match tag {
            0 => Ok(Self::NativeSegwit),
            1 => Ok(Self::WrappedSegwit),
            other => Err(PayloadError::UnsupportedVariant(other)),
        }
    }
}

/// The final address payload: the hash callers embed in an output script
/// or address for the chosen variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// 32-byte P2WSH witness program.
    WitnessScriptHash([u8; 32]),
    /// 20-byte P2SH script hash.
    ScriptHash([u8; 20]),
}

impl Payload {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::WitnessScriptHash(hash) => hash,
            Payload::ScriptHash(hash) => hash,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Derive the address payload for `descriptor` at `path` under `variant`.
///
/// All-or-nothing: on any failure the error propagates and no partial
/// payload exists.
pub fn address_payload(
    descriptor: &MultisigDescriptor,
    variant: OutputVariant,
    path: &KeyPath,
) -> Result<Payload, PayloadError> {
    let mut script = [0u8; MAX_WITNESS_SCRIPT_SIZE];
    let written = witness_script(descriptor, path, &mut script)?;
    let script = &script[..written];

    let script_hash = sha256::Hash::hash(script);
    match variant {
        OutputVariant::NativeSegwit => {
            Ok(Payload::WitnessScriptHash(script_hash.to_byte_array()))
        }
        OutputVariant::WrappedSegwit => {
            let wrapping = ScriptBuf::new_p2wsh(&WScriptHash::from_byte_array(
                script_hash.to_byte_array(),
            ));
            let nested = hash160::Hash::hash(wrapping.as_bytes());
            Ok(Payload::ScriptHash(nested.to_byte_array()))
        }
    }
}
