//! Cooperative decryption by a quorum of guardians.
//!
//! Each present guardian produces a [`PartialDecryption`] per ciphertext using its own
//! election secret plus a compensation term covering the missing guardians, fixed once
//! via [`DecryptingTrustee::set_missing()`]. The Lagrange weight is folded into the
//! compensation term, so partial decryptions of present guardians combine by plain
//! group addition: `Σ_ℓ [s_ℓ + t_ℓ]α = [s]α` for the joint secret `s`.

use rand_core::{CryptoRng, RngCore};

use core::fmt;
use std::collections::HashMap;

use crate::{
    ceremony::EncryptedKeyShare,
    encryption::Ciphertext,
    group::Group,
    keys::{Keypair, PublicKey, SecretKey},
};

/// Errors that can occur when preparing a [`DecryptingTrustee`] for decryption.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The key share of a guardian reported missing is not held by this trustee.
    MissingKeyShare {
        /// Id of the missing guardian.
        guardian_id: String,
    },
    /// The stored key share of a missing guardian failed authentication.
    InvalidKeyShare {
        /// Id of the missing guardian.
        guardian_id: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKeyShare { guardian_id } => write!(
                formatter,
                "no key share held for missing guardian '{guardian_id}'"
            ),
            Self::InvalidKeyShare { guardian_id } => write!(
                formatter,
                "key share for missing guardian '{guardian_id}' failed authentication"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Partial decryption of a single ciphertext by one guardian, together with the
/// commitments for the subsequent challenge round.
#[derive(Debug, Clone)]
pub struct PartialDecryption<G: Group> {
    guardian_id: String,
    share: G::Element,
    nonce: SecretKey<G>,
    commitment: G::Element,
    blinded_commitment: G::Element,
}

impl<G: Group> PartialDecryption<G> {
    /// Returns the id of the guardian that produced this partial decryption.
    pub fn guardian_id(&self) -> &str {
        &self.guardian_id
    }

    /// Returns `M̄ = [s_ℓ + t_ℓ]α`, this guardian's share of the decryption.
    pub fn share(&self) -> G::Element {
        self.share
    }

    /// Returns the commitment nonce, to be passed back in a [`ChallengeRequest`].
    pub fn nonce(&self) -> &SecretKey<G> {
        &self.nonce
    }

    /// Returns the generator commitment `[u]G`.
    pub fn commitment(&self) -> G::Element {
        self.commitment
    }

    /// Returns the ciphertext commitment `[u]α`.
    pub fn blinded_commitment(&self) -> G::Element {
        self.blinded_commitment
    }
}

/// Challenge for a single [`PartialDecryption`], sent by the decryption coordinator.
#[derive(Debug, Clone)]
pub struct ChallengeRequest<G: Group> {
    /// Identifier of the challenged decryption, echoed back in the response.
    pub id: String,
    /// Commitment nonce from the corresponding [`PartialDecryption`].
    pub nonce: SecretKey<G>,
    /// Challenge scalar.
    pub challenge: G::Scalar,
}

/// Response to a [`ChallengeRequest`].
#[derive(Debug, Clone)]
pub struct ChallengeResponse<G: Group> {
    /// Identifier copied from the request.
    pub id: String,
    /// Response scalar `v = u − c·(s_ℓ + t_ℓ)`.
    pub response: G::Scalar,
}

/// Guardian-side decryption state: the guardian's election keypair plus its shares of
/// every peer's polynomial, kept encrypted under the guardian's own key.
///
/// Produced by [`KeyCeremonyTrustee::into_decrypting()`](crate::ceremony::KeyCeremonyTrustee::into_decrypting).
pub struct DecryptingTrustee<G: Group> {
    id: String,
    x_coordinate: u64,
    election_keypair: Keypair<G>,
    key_shares: HashMap<String, EncryptedKeyShare<G>>,
    missing_delta: Option<G::Scalar>,
}

impl<G: Group> fmt::Debug for DecryptingTrustee<G> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DecryptingTrustee")
            .field("id", &self.id)
            .field("x_coordinate", &self.x_coordinate)
            .finish_non_exhaustive()
    }
}

impl<G: Group> DecryptingTrustee<G> {
    pub(crate) fn new(
        id: String,
        x_coordinate: u64,
        election_keypair: Keypair<G>,
        key_shares: HashMap<String, EncryptedKeyShare<G>>,
    ) -> Self {
        Self {
            id,
            x_coordinate,
            election_keypair,
            key_shares,
            missing_delta: None,
        }
    }

    /// Returns the id of this guardian.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the 1-based x-coordinate of this guardian.
    pub fn x_coordinate(&self) -> u64 {
        self.x_coordinate
    }

    /// Returns this guardian's election public key.
    pub fn election_public_key(&self) -> &PublicKey<G> {
        self.election_keypair.public()
    }

    /// Fixes the set of missing guardians for this decryption, computing the
    /// compensation term `t_ℓ = w_ℓ · Σ_{j missing} P_j(ℓ)`, where `w_ℓ` is this
    /// guardian's Lagrange coefficient over the present coordinates.
    ///
    /// Returns `Ok(false)` if the missing set was already fixed; the call is then a
    /// no-op. Must be called (possibly with an empty missing set) before
    /// [`Self::decrypt()`].
    ///
    /// # Errors
    ///
    /// Returns an error if a share for a missing guardian is absent or fails
    /// authentication.
    pub fn set_missing(
        &mut self,
        lagrange_coefficient: &G::Scalar,
        missing_guardians: &[&str],
    ) -> Result<bool, Error> {
        if self.missing_delta.is_some() {
            return Ok(false);
        }

        let mut sum = G::Scalar::default();
        for &guardian_id in missing_guardians {
            let share =
                self.key_shares
                    .get(guardian_id)
                    .ok_or_else(|| Error::MissingKeyShare {
                        guardian_id: guardian_id.to_owned(),
                    })?;
            let value = share
                .decrypt(self.election_keypair.public(), self.election_keypair.secret())
                .map_err(|_| Error::InvalidKeyShare {
                    guardian_id: guardian_id.to_owned(),
                })?;
            sum = sum + value;
        }
        self.missing_delta = Some(*lagrange_coefficient * sum);
        Ok(true)
    }

    fn delta(&self) -> &G::Scalar {
        self.missing_delta
            .as_ref()
            .expect("set_missing() must be called before decryption")
    }

    /// Produces partial decryptions for the provided ciphertexts, one per ciphertext
    /// and in the same order, with a fresh commitment nonce each.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::set_missing()`] was not called beforehand; defaulting the
    /// compensation term would silently corrupt the combined decryption.
    pub fn decrypt<R: CryptoRng + RngCore>(
        &self,
        ciphertexts: &[Ciphertext<G>],
        rng: &mut R,
    ) -> Vec<PartialDecryption<G>> {
        ciphertexts
            .iter()
            .map(|ciphertext| self.decrypt_single(ciphertext, G::generate_scalar(rng)))
            .collect()
    }

    /// Same as [`Self::decrypt()`], but with a fixed commitment nonce. Only useful to
    /// make decryption reproducible in test harnesses.
    #[doc(hidden)]
    pub fn decrypt_with_nonce(
        &self,
        ciphertexts: &[Ciphertext<G>],
        nonce: &G::Scalar,
    ) -> Vec<PartialDecryption<G>> {
        ciphertexts
            .iter()
            .map(|ciphertext| self.decrypt_single(ciphertext, *nonce))
            .collect()
    }

    fn decrypt_single(&self, ciphertext: &Ciphertext<G>, nonce: G::Scalar) -> PartialDecryption<G> {
        let alpha = ciphertext.random_element;
        let exponent = *self.election_keypair.secret().expose_scalar() + *self.delta();
        PartialDecryption {
            guardian_id: self.id.clone(),
            share: alpha * &exponent,
            commitment: G::mul_generator(&nonce),
            blinded_commitment: alpha * &nonce,
            nonce: SecretKey::new(nonce),
        }
    }

    /// Responds to decryption challenges: `v = u − c·(s_ℓ + t_ℓ)`.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::set_missing()`] was not called beforehand.
    pub fn respond_to_challenges(
        &self,
        requests: &[ChallengeRequest<G>],
    ) -> Vec<ChallengeResponse<G>> {
        let exponent = *self.election_keypair.secret().expose_scalar() + *self.delta();
        requests
            .iter()
            .map(|request| ChallengeResponse {
                id: request.id.clone(),
                response: *request.nonce.expose_scalar() - request.challenge * exponent,
            })
            .collect()
    }
}

/// Computes the Lagrange coefficient at zero for `x_coordinate` over the provided
/// coordinates: `w = Π_{j ≠ x} j / (j − x)`.
///
/// Coordinates must be distinct and nonzero; `x_coordinate` itself is skipped, so it
/// may but does not have to be part of `all_coordinates`.
pub fn lagrange_coefficient<G: Group>(x_coordinate: u64, all_coordinates: &[u64]) -> G::Scalar {
    let x = G::Scalar::from(x_coordinate);
    let mut numerator = G::Scalar::from(1_u64);
    let mut denominator = G::Scalar::from(1_u64);
    for &other in all_coordinates {
        if other == x_coordinate {
            continue;
        }
        numerator = numerator * G::Scalar::from(other);
        denominator = denominator * (G::Scalar::from(other) - x);
    }
    numerator * G::invert_scalar(denominator)
}

/// Computes Lagrange coefficients at zero for all provided coordinates at once,
/// using batch inversion. The output order matches `coordinates`.
pub fn lagrange_coefficients<G: Group>(coordinates: &[u64]) -> Vec<G::Scalar> {
    let mut denominators: Vec<_> = coordinates
        .iter()
        .map(|&x_coordinate| {
            let x = G::Scalar::from(x_coordinate);
            coordinates
                .iter()
                .filter(|&&other| other != x_coordinate)
                .fold(G::Scalar::from(1_u64), |acc, &other| {
                    acc * (G::Scalar::from(other) - x)
                })
        })
        .collect();
    G::invert_scalars(&mut denominators);

    coordinates
        .iter()
        .zip(denominators)
        .map(|(&x_coordinate, inv_denominator)| {
            coordinates
                .iter()
                .filter(|&&other| other != x_coordinate)
                .fold(inv_denominator, |acc, &other| acc * G::Scalar::from(other))
        })
        .collect()
}
