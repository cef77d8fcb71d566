//! Multisig descriptor and key path types
//!
//! A descriptor fixes the spending quorum: the threshold and the cosigner
//! xpubs it applies to. A key path selects the (change, address index)
//! child pair every cosigner derives before the script is assembled.

use bitcoin::bip32::{ChildNumber, Xpub};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of cosigners in a multisig quorum.
pub const MAX_SIGNERS: usize = 15;

/// Length of a serialized BIP-32 extended key: version, depth, parent
/// fingerprint, child number, chain code, key data.
pub const XPUB_ENCODED_LEN: usize = 78;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("invalid threshold: {threshold} of {signers}")]
    InvalidThreshold { threshold: u32, signers: usize },

    #[error("descriptor has no cosigners")]
    NoSigners,

    #[error("too many cosigners: {0}")]
    TooManySigners(usize),

    #[error("hardened index {0} cannot be derived from an xpub")]
    HardenedIndex(u32),
}

/// An M-of-N multisig spending quorum.
///
/// Stores the raw serialized xpubs in the order the caller registered
/// them. Canonical (sorted) ordering applies to the *derived* pubkeys at
/// script-build time, never to the stored entries. The blobs are decoded,
/// and can fail, at derivation time — a corrupted entry surfaces as a
/// derivation error rather than a wrong address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigDescriptor {
    threshold: u32,
    xpubs: [[u8; XPUB_ENCODED_LEN]; MAX_SIGNERS],
    count: usize,
}

impl MultisigDescriptor {
    /// Create a descriptor from raw serialized xpubs.
    ///
    /// Requires `1 <= threshold <= xpubs.len() <= MAX_SIGNERS`.
    pub fn new(
        threshold: u32,
        xpubs: &[[u8; XPUB_ENCODED_LEN]],
    ) -> Result<Self, DescriptorError> {
        if xpubs.is_empty() {
            return Err(DescriptorError::NoSigners);
        }
        if xpubs.len() > MAX_SIGNERS {
            return Err(DescriptorError::TooManySigners(xpubs.len()));
        }
        if threshold == 0 || threshold as usize > xpubs.len() {
            return Err(DescriptorError::InvalidThreshold {
                threshold,
                signers: xpubs.len(),
            });
        }

        let mut stored = [[0u8; XPUB_ENCODED_LEN]; MAX_SIGNERS];
        stored[..xpubs.len()].copy_from_slice(xpubs);
        Ok(Self {
            threshold,
            xpubs: stored,
            count: xpubs.len(),
        })
    }

    /// Create a descriptor from already-parsed extended keys.
    pub fn from_xpubs(threshold: u32, xpubs: &[Xpub]) -> Result<Self, DescriptorError> {
        if xpubs.len() > MAX_SIGNERS {
            return Err(DescriptorError::TooManySigners(xpubs.len()));
        }
        let mut encoded = [[0u8; XPUB_ENCODED_LEN]; MAX_SIGNERS];
        for (slot, xpub) in encoded.iter_mut().zip(xpubs.iter()) {
            *slot = xpub.encode();
        }
        Self::new(threshold, &encoded[..xpubs.len()])
    }

    /// Number of signatures required to spend.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Number of cosigners in the quorum.
    pub fn signer_count(&self) -> usize {
        self.count
    }

    /// The stored xpub encodings, in registration order.
    pub fn xpubs(&self) -> impl Iterator<Item = &[u8; XPUB_ENCODED_LEN]> {
        self.xpubs[..self.count].iter()
    }
}

/// A two-level, non-hardened derivation path: (change, address index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyPath {
    change: u32,
    address_index: u32,
}

impl KeyPath {
    const HARDENED_BIT: u32 = 1 << 31;

    /// Both components must be ordinary (non-hardened) indices: hardened
    /// children cannot be derived from a public key.
    pub fn new(change: u32, address_index: u32) -> Result<Self, DescriptorError> {
        for index in [change, address_index] {
            if index & Self::HARDENED_BIT != 0 {
                return Err(DescriptorError::HardenedIndex(index));
            }
        }
        Ok(Self {
            change,
            address_index,
        })
    }

    pub fn change(&self) -> u32 {
        self.change
    }

    pub fn address_index(&self) -> u32 {
        self.address_index
    }

    /// The path as BIP-32 child numbers, change level first.
    pub fn child_numbers(&self) -> [ChildNumber; 2] {
        [
            ChildNumber::Normal { index: self.change },
            ChildNumber::Normal {
                index: self.address_index,
            },
        ]
    }
}

// Manual Deserialize so the non-hardened invariant survives a round trip
// through serde.
impl<'de> Deserialize<'de> for KeyPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            change: u32,
            address_index: u32,
        }
        let raw = Raw::deserialize(deserializer)?;
        KeyPath::new(raw.change, raw.address_index).map_err(serde::de::Error::custom)
    }
}
