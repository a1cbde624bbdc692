//! Range proof for ElGamal ciphertexts.

use merlin::Transcript;
use smallvec::SmallVec;
use subtle::ConstantTimeEq;

use crate::{
    encryption::{Ciphertext, CiphertextWithValue},
    group::Group,
    keys::PublicKey,
    nonces::Nonces,
    proofs::{TranscriptForGroup, VerificationError},
};

#[cfg(feature = "serde")]
use crate::serde::ScalarVec;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Buffer for per-branch prover nonces, inlined for the common 0/1 ballot case.
type ScalarBuffer<G> = SmallVec<[<G as crate::group::ScalarOps>::Scalar; 2]>;

/// Zero-knowledge proof that an ElGamal-encrypted value lies in the range `0..=L`.
///
/// The proof is an OR-composition of `L + 1` Chaum-Pedersen protocols, one per
/// candidate plaintext, with simulated sub-protocols for every candidate except the
/// actual plaintext. It consists of `L + 1` ordered challenge-response scalar pairs;
/// a verifier accepts iff the challenges sum to the transcript challenge and every
/// pair satisfies its reconstructed commitment equations.
///
/// Proof construction is deterministic: all per-branch nonces and simulated
/// challenges are derived from the encryption nonce via [`Nonces`], so the same
/// ciphertext always yields the same proof.
///
/// # Examples
///
/// ```
/// # use merlin::Transcript;
/// # use rand::thread_rng;
/// # use quorum_elgamal::{CiphertextWithValue, Keypair, RangeProof, group::Ristretto};
/// # fn main() -> Result<(), quorum_elgamal::VerificationError> {
/// let mut rng = thread_rng();
/// let receiver = Keypair::<Ristretto>::generate(&mut rng);
/// let ciphertext = CiphertextWithValue::new(1, receiver.public(), &mut rng);
/// let proof = RangeProof::new(
///     &ciphertext,
///     1,
///     receiver.public(),
///     &mut Transcript::new(b"test"),
/// );
/// proof.verify(
///     ciphertext.inner(),
///     1,
///     receiver.public(),
///     &mut Transcript::new(b"test"),
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct RangeProof<G: Group> {
    #[cfg_attr(feature = "serde", serde(with = "ScalarVec::<G, 1>"))]
    challenges: Vec<G::Scalar>,
    #[cfg_attr(feature = "serde", serde(with = "ScalarVec::<G, 1>"))]
    responses: Vec<G::Scalar>,
}

impl<G: Group> RangeProof<G> {
    /// Creates a proof that the value encrypted in `ciphertext` lies in
    /// `0..=upper_bound`.
    ///
    /// # Panics
    ///
    /// Panics if the encrypted value exceeds `upper_bound`; this is a caller contract
    /// violation rather than a protocol failure.
    pub fn new(
        ciphertext: &CiphertextWithValue<G>,
        upper_bound: u64,
        receiver: &PublicKey<G>,
        transcript: &mut Transcript,
    ) -> Self {
        assert!(
            ciphertext.value() <= upper_bound,
            "encrypted value {} exceeds upper bound {upper_bound}",
            ciphertext.value()
        );
        Self::new_unchecked(ciphertext, upper_bound, receiver, transcript)
    }

    /// Creates a proof without checking that the encrypted value is in range. If it
    /// is not, the returned proof will fail verification. Intended for negative tests
    /// of downstream verifiers.
    #[doc(hidden)]
    pub fn new_unchecked(
        ciphertext: &CiphertextWithValue<G>,
        upper_bound: u64,
        receiver: &PublicKey<G>,
        transcript: &mut Transcript,
    ) -> Self {
        Self::initialize_transcript(
            transcript,
            ciphertext.inner(),
            upper_bound,
            receiver,
        );
        let branch_count = Self::branch_count(upper_bound);
        let value = ciphertext.value();
        let value_scalar = G::Scalar::from(value);
        let encryption_nonce = ciphertext.nonce();

        let branch_nonces = Nonces::<G>::new(encryption_nonce, b"range_proof_nonce");
        let simulated_challenges = Nonces::<G>::new(encryption_nonce, b"range_proof_challenge");

        let mut nonces = ScalarBuffer::<G>::with_capacity(branch_count);
        let mut challenges = vec![G::Scalar::default(); branch_count];
        for (index, (nonce, challenge)) in branch_nonces
            .zip(simulated_challenges)
            .take(branch_count)
            .enumerate()
        {
            let commitment = G::mul_generator(&nonce);
            let blinded_commitment = if index as u64 == value {
                receiver.element * &nonce
            } else {
                // Simulated branch: nonce + (m - j) * challenge in the exponent of the
                // receiver key satisfies the verification equations for this branch.
                let exponent = nonce + (value_scalar - G::Scalar::from(index as u64)) * challenge;
                challenges[index] = challenge;
                receiver.element * &exponent
            };

            transcript.append_element::<G>(b"a", &commitment);
            transcript.append_element::<G>(b"b", &blinded_commitment);
            nonces.push(nonce);
        }

        let overall_challenge = transcript.challenge_scalar::<G>(b"c");
        let simulated_sum = challenges
            .iter()
            .fold(G::Scalar::default(), |acc, &challenge| acc + challenge);
        if let Some(actual_challenge) = challenges.get_mut(value as usize) {
            *actual_challenge = overall_challenge - simulated_sum;
        }

        let responses = nonces
            .iter()
            .zip(&challenges)
            .map(|(&nonce, &challenge)| nonce - challenge * *encryption_nonce)
            .collect();

        Self {
            challenges,
            responses,
        }
    }

    /// Verifies this proof against `ciphertext` and `upper_bound`.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of challenge-response pairs differs from
    /// `upper_bound + 1`, or if the challenges do not sum to the restored transcript
    /// challenge.
    pub fn verify(
        &self,
        ciphertext: &Ciphertext<G>,
        upper_bound: u64,
        receiver: &PublicKey<G>,
        transcript: &mut Transcript,
    ) -> Result<(), VerificationError> {
        VerificationError::check_lengths(
            "challenge-response pairs",
            self.challenges.len(),
            Self::branch_count(upper_bound),
        )?;
        VerificationError::check_lengths(
            "responses",
            self.responses.len(),
            Self::branch_count(upper_bound),
        )?;

        Self::initialize_transcript(transcript, ciphertext, upper_bound, receiver);
        for (index, (challenge, response)) in self.challenges.iter().zip(&self.responses).enumerate()
        {
            let commitment = G::vartime_double_mul_generator(
                challenge,
                ciphertext.random_element,
                response,
            );
            let blinded_exponent = *response - G::Scalar::from(index as u64) * *challenge;
            let blinded_commitment = G::vartime_multi_mul(
                [&blinded_exponent, challenge],
                [receiver.element, ciphertext.blinded_element],
            );
            transcript.append_element::<G>(b"a", &commitment);
            transcript.append_element::<G>(b"b", &blinded_commitment);
        }

        let expected_challenge = transcript.challenge_scalar::<G>(b"c");
        let challenge_sum = self
            .challenges
            .iter()
            .fold(G::Scalar::default(), |acc, &challenge| acc + challenge);
        if expected_challenge.ct_eq(&challenge_sum).into() {
            Ok(())
        } else {
            Err(VerificationError::ChallengeMismatch)
        }
    }

    fn initialize_transcript(
        transcript: &mut Transcript,
        ciphertext: &Ciphertext<G>,
        upper_bound: u64,
        receiver: &PublicKey<G>,
    ) {
        transcript.start_proof(b"range_proof");
        transcript.append_u64(b"L", upper_bound);
        transcript.append_element_bytes(b"K", receiver.as_bytes());
        transcript.append_element::<G>(b"alpha", &ciphertext.random_element);
        transcript.append_element::<G>(b"beta", &ciphertext.blinded_element);
    }

    #[allow(clippy::cast_possible_truncation)] // `L + 1` pairs must fit into memory anyway
    fn branch_count(upper_bound: u64) -> usize {
        upper_bound as usize + 1
    }
}
