//! Cooperative decryption with missing guardians.

use merlin::Transcript;
use rand::thread_rng;

use quorum_elgamal::{
    ceremony::combine_public_keys,
    decryption::{lagrange_coefficients, ChallengeRequest, DecryptingTrustee, Error},
    group::{ElementOps, Ristretto, ScalarOps},
    DiscreteLogTable,
};

use crate::{into_decrypting, run_ceremony};

type Element = <Ristretto as ElementOps>::Element;
type Scalar = <Ristretto as ScalarOps>::Scalar;

fn combine(shares: impl IntoIterator<Item = Element>) -> Element {
    shares
        .into_iter()
        .reduce(|acc, share| acc + share)
        .unwrap()
}

#[test]
fn compensated_decryption_equals_direct_decryption() {
    let mut rng = thread_rng();
    let trustees = run_ceremony(3, 2, &mut rng);
    let packages: Vec<_> = trustees
        .iter()
        .map(|trustee| trustee.public_keys().clone())
        .collect();
    let election_key = combine_public_keys(&packages);
    let ciphertext = election_key.encrypt(7, &mut rng);
    let lookup_table = DiscreteLogTable::new(&election_key, 0..10);

    let mut decrypting = into_decrypting(trustees, &mut rng);
    let missing = decrypting.pop().unwrap();
    let missing_id = missing.id().to_owned();

    let coordinates: Vec<_> = decrypting
        .iter()
        .map(DecryptingTrustee::x_coordinate)
        .collect();
    let weights = lagrange_coefficients::<Ristretto>(&coordinates);
    for (trustee, weight) in decrypting.iter_mut().zip(&weights) {
        assert!(trustee
            .set_missing(weight, &[missing_id.as_str()])
            .unwrap());
        // Repeated calls are no-ops.
        assert!(!trustee
            .set_missing(weight, &[missing_id.as_str()])
            .unwrap());
    }

    let combined = combine(decrypting.iter().map(|trustee| {
        let partial = trustee.decrypt(&[ciphertext], &mut rng);
        partial[0].share()
    }));
    let decrypted = *ciphertext.blinded_element() - combined;
    // Recovering the plaintext means the compensated combination equals
    // the decryption with all guardians present, `[s]α`.
    assert_eq!(decrypted, election_key.as_element() * &Scalar::from(7_u64));
    assert_eq!(lookup_table.get(&decrypted), Some(7));
}

#[test]
fn challenge_responses_satisfy_commitments() {
    let mut rng = thread_rng();
    let trustees = run_ceremony(3, 2, &mut rng);
    let packages: Vec<_> = trustees
        .iter()
        .map(|trustee| trustee.public_keys().clone())
        .collect();
    let election_key = combine_public_keys(&packages);
    let ciphertext = election_key.encrypt(3, &mut rng);

    let mut decrypting = into_decrypting(trustees, &mut rng);
    let missing = decrypting.pop().unwrap();
    let missing_id = missing.id().to_owned();
    let coordinates: Vec<_> = decrypting
        .iter()
        .map(DecryptingTrustee::x_coordinate)
        .collect();
    let weights = lagrange_coefficients::<Ristretto>(&coordinates);

    for (trustee, weight) in decrypting.iter_mut().zip(&weights) {
        trustee.set_missing(weight, &[missing_id.as_str()]).unwrap();
        let partial = trustee.decrypt(&[ciphertext], &mut rng).remove(0);

        // The coordinator would derive the challenge from a transcript over the
        // commitments; any scalar works for checking the response equation.
        let mut transcript = Transcript::new(b"decryption_challenge");
        let mut challenge_bytes = [0_u8; 64];
        transcript.challenge_bytes(b"c", &mut challenge_bytes);
        let challenge = Scalar::from_bytes_mod_order_wide(&challenge_bytes);

        let request = ChallengeRequest {
            id: "tally".to_owned(),
            nonce: partial.nonce().clone(),
            challenge,
        };
        let response = trustee.respond_to_challenges(&[request]).remove(0);
        assert_eq!(response.id, "tally");

        // [v]α + [c]M̄ must reproduce the ciphertext commitment [u]α.
        let restored = *ciphertext.random_element() * &response.response
            + partial.share() * &challenge;
        assert_eq!(restored, partial.blinded_commitment());
    }
}

#[test]
fn missing_guardian_without_share_is_reported() {
    let mut rng = thread_rng();
    let trustees = run_ceremony(2, 2, &mut rng);
    let mut decrypting = into_decrypting(trustees, &mut rng);
    let err = decrypting[0]
        .set_missing(&Ristretto::generate_scalar(&mut rng), &["stranger"])
        .unwrap_err();
    assert_eq!(
        err,
        Error::MissingKeyShare {
            guardian_id: "stranger".to_owned(),
        }
    );
}
