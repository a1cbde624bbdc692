//! Full election flow: ceremony, ballot encryption with range proofs, homomorphic
//! tallying and cooperative decryption with all guardians present.

use merlin::Transcript;
use rand::thread_rng;

use quorum_elgamal::{
    ceremony::combine_public_keys,
    group::{ElementOps, Ristretto},
    Ciphertext, CiphertextWithValue, DiscreteLogTable, RangeProof, VerificationError,
};

use crate::{into_decrypting, run_ceremony};

type Element = <Ristretto as ElementOps>::Element;

#[test]
fn ballot_encryption_with_range_proofs() {
    let mut rng = thread_rng();
    let trustees = run_ceremony(3, 2, &mut rng);
    let packages: Vec<_> = trustees
        .iter()
        .map(|trustee| trustee.public_keys().clone())
        .collect();
    let election_key = combine_public_keys(&packages);

    // A ballot with 5 selections, two of them chosen.
    let votes = [1_u64, 0, 0, 1, 0];
    let mut encrypted_ballot = Vec::with_capacity(votes.len());
    for &vote in &votes {
        let ciphertext = CiphertextWithValue::new(vote, &election_key, &mut rng);
        let proof = RangeProof::new(
            &ciphertext,
            1,
            &election_key,
            &mut Transcript::new(b"ballot_selection"),
        );
        proof
            .verify(
                ciphertext.inner(),
                1,
                &election_key,
                &mut Transcript::new(b"ballot_selection"),
            )
            .unwrap();
        encrypted_ballot.push(ciphertext.into_inner());
    }

    // A proof transplanted to another selection must not verify.
    let ciphertext = CiphertextWithValue::new(1, &election_key, &mut rng);
    let proof = RangeProof::new(
        &ciphertext,
        1,
        &election_key,
        &mut Transcript::new(b"ballot_selection"),
    );
    let err = proof
        .verify(
            &encrypted_ballot[0],
            1,
            &election_key,
            &mut Transcript::new(b"ballot_selection"),
        )
        .unwrap_err();
    assert_eq!(err, VerificationError::ChallengeMismatch);

    // Tally the ballot homomorphically and decrypt cooperatively with all
    // guardians present (empty missing set, unit Lagrange weight).
    let tally = encrypted_ballot
        .iter()
        .copied()
        .reduce(|acc, ciphertext| acc + ciphertext)
        .unwrap();
    let mut decrypting = into_decrypting(trustees, &mut rng);
    for trustee in &mut decrypting {
        assert!(trustee.set_missing(&1_u64.into(), &[]).unwrap());
    }

    let combined: Element = decrypting
        .iter()
        .map(|trustee| {
            let partial = trustee.decrypt(&[tally], &mut rng);
            assert_eq!(partial.len(), 1);
            partial[0].share()
        })
        .reduce(|acc, share| acc + share)
        .unwrap();
    let decrypted = *tally.blinded_element() - combined;

    let lookup_table = DiscreteLogTable::new(&election_key, 0..=votes.len() as u64);
    assert_eq!(lookup_table.get(&decrypted), Some(2));
}

#[test]
fn decryption_preserves_ciphertext_order() {
    let mut rng = thread_rng();
    let trustees = run_ceremony(2, 2, &mut rng);
    let packages: Vec<_> = trustees
        .iter()
        .map(|trustee| trustee.public_keys().clone())
        .collect();
    let election_key = combine_public_keys(&packages);

    let ciphertexts: Vec<Ciphertext<Ristretto>> = (0..5)
        .map(|value| election_key.encrypt(value, &mut rng))
        .collect();
    let mut decrypting = into_decrypting(trustees, &mut rng);
    for trustee in &mut decrypting {
        trustee.set_missing(&1_u64.into(), &[]).unwrap();
    }

    let partials: Vec<Vec<_>> = decrypting
        .iter()
        .map(|trustee| trustee.decrypt(&ciphertexts, &mut rng))
        .collect();
    let lookup_table = DiscreteLogTable::new(&election_key, 0..5);
    for (index, ciphertext) in ciphertexts.iter().enumerate() {
        let combined = partials
            .iter()
            .map(|partial| partial[index].share())
            .reduce(|acc, share| acc + share)
            .unwrap();
        let decrypted = *ciphertext.blinded_element() - combined;
        assert_eq!(lookup_table.get(&decrypted), Some(index as u64));
    }
}
