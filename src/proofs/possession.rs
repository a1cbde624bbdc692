//! Proof of knowledge of several discrete logs with a shared challenge.

use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

use crate::{
    group::Group,
    keys::{Keypair, PublicKey, SecretKey},
    proofs::{TranscriptForGroup, VerificationError},
};

#[cfg(feature = "serde")]
use crate::serde::{ScalarHelper, ScalarVec};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Zero-knowledge proof of possession of one or more secret scalars.
///
/// The proof is a batched Schnorr protocol made non-interactive with a single
/// challenge shared among all proved keys. In the key ceremony, a guardian uses it
/// to prove knowledge of all `quorum` coefficients of its secret polynomial at once.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct ProofOfPossession<G: Group> {
    #[cfg_attr(feature = "serde", serde(with = "ScalarHelper::<G>"))]
    challenge: G::Scalar,
    #[cfg_attr(feature = "serde", serde(with = "ScalarVec::<G, 1>"))]
    responses: Vec<G::Scalar>,
}

impl<G: Group> ProofOfPossession<G> {
    /// Creates a proof of possession for the secret scalars in `keypairs`.
    pub fn new<R: CryptoRng + RngCore>(
        keypairs: &[Keypair<G>],
        transcript: &mut Transcript,
        rng: &mut R,
    ) -> Self {
        transcript.start_proof(b"multi_pop");

        let random_scalars: Vec<_> = keypairs
            .iter()
            .map(|keypair| {
                transcript.append_element_bytes(b"K", keypair.public().as_bytes());
                let random_scalar = SecretKey::<G>::generate(rng);
                let random_element = G::mul_generator(random_scalar.expose_scalar());
                transcript.append_element::<G>(b"[r]G", &random_element);
                random_scalar
            })
            .collect();

        let challenge = transcript.challenge_scalar::<G>(b"c");
        let responses = keypairs
            .iter()
            .zip(&random_scalars)
            .map(|(keypair, random_scalar)| {
                *random_scalar.expose_scalar() + challenge * *keypair.secret().expose_scalar()
            })
            .collect();

        Self {
            challenge,
            responses,
        }
    }

    /// Verifies this proof against the provided public keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of keys does not match the number of responses,
    /// or if the restored challenge does not match the proof.
    pub fn verify<'a>(
        &self,
        public_keys: impl ExactSizeIterator<Item = &'a PublicKey<G>>,
        transcript: &mut Transcript,
    ) -> Result<(), VerificationError> {
        VerificationError::check_lengths("public keys", public_keys.len(), self.responses.len())?;

        transcript.start_proof(b"multi_pop");
        for (public_key, response) in public_keys.zip(&self.responses) {
            transcript.append_element_bytes(b"K", public_key.as_bytes());
            let random_element = G::vartime_double_mul_generator(
                &-self.challenge,
                public_key.as_element(),
                response,
            );
            transcript.append_element::<G>(b"[r]G", &random_element);
        }

        let expected_challenge = transcript.challenge_scalar::<G>(b"c");
        if expected_challenge.ct_eq(&self.challenge).into() {
            Ok(())
        } else {
            Err(VerificationError::ChallengeMismatch)
        }
    }
}
