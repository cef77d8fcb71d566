//! Cross-check engine payloads against the `bitcoin` crate's own address
//! construction for the same witness script.

use bitcoin::bip32::Xpub;
use bitcoin::hashes::{sha256, Hash};
use bitcoin::{Address, Network, Script, ScriptBuf, WScriptHash};
use quorum_core::{
    address_payload, witness_script, KeyPath, MultisigDescriptor, OutputVariant,
    MAX_WITNESS_SCRIPT_SIZE,
};
use std::str::FromStr;

// BIP-32 test vector master keys
const XPUBS: [&str; 3] = [
    "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8",
    "xpub661MyMwAqRbcFW31YEwpkMuc5THy2PSt5bDMsktWQcFF8syAmRUapSCGu8ED9W6oDMSgv6Zz8idoc4a6mr8BDzTJY47LJhkJ8UB7WEGuduB",
    "xpub661MyMwAqRbcEZVB4dScxMAdx6d4nFc9nvyvH3v4gJL378CSRZiYmhRoP7mBy6gSPSCYk6SzXPTf3ND1cZAceL7SfJ1Z3GC8vBgp2epUt13",
];

fn parsed_xpubs() -> Vec<Xpub> {
    XPUBS.iter().map(|s| Xpub::from_str(s).unwrap()).collect()
}

fn built_script(descriptor: &MultisigDescriptor, path: &KeyPath) -> Vec<u8> {
    let mut script = [0u8; MAX_WITNESS_SCRIPT_SIZE];
    let written = witness_script(descriptor, path, &mut script).unwrap();
    script[..written].to_vec()
}

#[test]
fn p2wsh_payload_matches_bitcoin_address() {
    let descriptor = MultisigDescriptor::from_xpubs(2, &parsed_xpubs()).unwrap();
    let path = KeyPath::new(0, 0).unwrap();

    let script_bytes = built_script(&descriptor, &path);
    let address = Address::p2wsh(Script::from_bytes(&script_bytes), Network::Bitcoin);
    let spk = address.script_pubkey();

    let payload = address_payload(&descriptor, OutputVariant::NativeSegwit, &path).unwrap();

    // OP_0 PUSH32 <witness program>
    assert_eq!(spk.len(), 34);
    assert_eq!(spk.as_bytes()[0], 0x00);
    assert_eq!(spk.as_bytes()[1], 0x20);
    assert_eq!(&spk.as_bytes()[2..], payload.as_bytes());
}

#[test]
fn p2sh_wrapped_payload_matches_bitcoin_address() {
    let descriptor = MultisigDescriptor::from_xpubs(2, &parsed_xpubs()).unwrap();
    let path = KeyPath::new(0, 0).unwrap();

    let script_bytes = built_script(&descriptor, &path);
    let script_hash = sha256::Hash::hash(&script_bytes);
    let wrapping =
        ScriptBuf::new_p2wsh(&WScriptHash::from_byte_array(script_hash.to_byte_array()));
    let address =
        Address::p2sh(&wrapping, Network::Bitcoin).expect("wrapping script is 34 bytes");
    let spk = address.script_pubkey();

    let payload = address_payload(&descriptor, OutputVariant::WrappedSegwit, &path).unwrap();

    // OP_HASH160 PUSH20 <script hash> OP_EQUAL
    assert_eq!(spk.len(), 23);
    assert_eq!(&spk.as_bytes()[2..22], payload.as_bytes());
}

#[test]
fn payloads_are_permutation_invariant_end_to_end() {
    let xpubs = parsed_xpubs();
    let path = KeyPath::new(0, 0).unwrap();

    let permutations: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    let reference = address_payload(
        &MultisigDescriptor::from_xpubs(2, &xpubs).unwrap(),
        OutputVariant::NativeSegwit,
        &path,
    )
    .unwrap();

    for permutation in permutations {
        let shuffled: Vec<Xpub> = permutation.iter().map(|&i| xpubs[i].clone()).collect();
        let descriptor = MultisigDescriptor::from_xpubs(2, &shuffled).unwrap();

        for variant in [OutputVariant::NativeSegwit, OutputVariant::WrappedSegwit] {
            let payload = address_payload(&descriptor, variant, &path).unwrap();
            match variant {
                OutputVariant::NativeSegwit => assert_eq!(payload, reference),
                OutputVariant::WrappedSegwit => assert_eq!(payload.len(), 20),
            }
        }

        assert_eq!(
            built_script(&descriptor, &path),
            built_script(&MultisigDescriptor::from_xpubs(2, &xpubs).unwrap(), &path),
        );
    }
}

#[test]
fn distinct_paths_produce_distinct_addresses() {
    let descriptor = MultisigDescriptor::from_xpubs(2, &parsed_xpubs()).unwrap();

    let receive = address_payload(
        &descriptor,
        OutputVariant::NativeSegwit,
        &KeyPath::new(0, 0).unwrap(),
    )
    .unwrap();
    let change = address_payload(
        &descriptor,
        OutputVariant::NativeSegwit,
        &KeyPath::new(1, 0).unwrap(),
    )
    .unwrap();
    let next = address_payload(
        &descriptor,
        OutputVariant::NativeSegwit,
        &KeyPath::new(0, 1).unwrap(),
    )
    .unwrap();

    assert_ne!(receive, change);
    assert_ne!(receive, next);
    assert_ne!(change, next);
}
