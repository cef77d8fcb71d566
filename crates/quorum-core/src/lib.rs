//! Quorum Core
//!
//! Deterministic derivation of sorted-multisig witness scripts and address
//! payloads from an M-of-N descriptor and a (change, address index) path.
//!
//! # Derivation pipeline
//!
//! Every cosigner xpub is derived at the same two-level non-hardened path,
//! the resulting pubkeys are sorted lexicographically by their compressed
//! encoding (BIP-67), framed as an `OP_m <keys> OP_n OP_CHECKMULTISIG`
//! witness script, and hashed into the payload for the requested output
//! type:
//!
//! - native P2WSH: SHA-256 of the witness script (32 bytes)
//! - P2WSH nested in P2SH: HASH160 of the wrapping output script (20 bytes)
//!
//! The sort is what makes cosigners who derive independently arrive at
//! byte-identical scripts, whatever order each one stored the xpubs in.
//!
//! The engine is pure: no I/O, no shared state, and no working storage
//! beyond fixed-size stack buffers.

pub mod derive;
pub mod descriptor;
pub mod payload;
pub mod script;

pub use derive::*;
pub use descriptor::*;
pub use payload::*;
pub use script::*;
