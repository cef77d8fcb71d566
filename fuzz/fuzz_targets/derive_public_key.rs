#![no_main]

use libfuzzer_sys::fuzz_target;
use quorum_core::{derive_public_key, KeyPath, XPUB_ENCODED_LEN};

fuzz_target!(|data: &[u8]| {
    // Treat arbitrary bytes as a serialized xpub plus path indices.
    // derive_public_key must never panic — always Ok or Err.
    if data.len() < XPUB_ENCODED_LEN + 8 {
        return;
    }

    let mut xpub = [0u8; XPUB_ENCODED_LEN];
    xpub.copy_from_slice(&data[..XPUB_ENCODED_LEN]);

    let rest = &data[XPUB_ENCODED_LEN..];
    let change = u32::from_le_bytes(rest[..4].try_into().unwrap());
    let address_index = u32::from_le_bytes(rest[4..8].try_into().unwrap());

    if let Ok(path) = KeyPath::new(change, address_index) {
        let _ = derive_public_key(&xpub, &path);
    }
});
