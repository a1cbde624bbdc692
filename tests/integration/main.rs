//! End-to-end tests of the election protocols.

use rand_core::{CryptoRng, RngCore};

use quorum_elgamal::{
    ceremony::KeyCeremonyTrustee,
    decryption::DecryptingTrustee,
    group::Ristretto,
};

mod decryption;
mod election;

/// Runs a complete key ceremony between `count` guardians with the specified quorum.
fn run_ceremony<R: CryptoRng + RngCore>(
    count: u64,
    quorum: usize,
    rng: &mut R,
) -> Vec<KeyCeremonyTrustee<Ristretto>> {
    let mut trustees: Vec<_> = (1..=count)
        .map(|i| KeyCeremonyTrustee::new(&format!("guardian{i}"), i, quorum, rng))
        .collect();

    let packages: Vec<_> = trustees
        .iter()
        .map(|trustee| trustee.public_keys().clone())
        .collect();
    for trustee in &mut trustees {
        for package in &packages {
            if package.guardian_id() != trustee.id() {
                trustee.receive_public_keys(package.clone()).unwrap();
            }
        }
    }

    let ids: Vec<_> = trustees.iter().map(|t| t.id().to_owned()).collect();
    for i in 0..trustees.len() {
        for j in 0..trustees.len() {
            if i != j {
                let share = trustees[i].encrypted_key_share_for(&ids[j], rng).unwrap();
                trustees[j].receive_encrypted_key_share(&share).unwrap();
            }
        }
    }
    trustees
}

fn into_decrypting<R: CryptoRng + RngCore>(
    trustees: Vec<KeyCeremonyTrustee<Ristretto>>,
    rng: &mut R,
) -> Vec<DecryptingTrustee<Ristretto>> {
    trustees
        .into_iter()
        .map(|trustee| trustee.into_decrypting(rng).unwrap())
        .collect()
}
