//! Guardian-side state machine of the key ceremony.

use merlin::Transcript;
use rand_core::{CryptoRng, RngCore};

use std::collections::HashMap;

use crate::{
    ceremony::{
        share::{EncryptedKeyShare, KeyShare, ShareDecryptionError},
        Error, PublicKeysDefect,
    },
    decryption::DecryptingTrustee,
    group::Group,
    keys::{Keypair, PublicKey, SecretKey},
    proofs::{ProofOfPossession, VerificationError},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

fn keys_transcript(guardian_id: &str, x_coordinate: u64) -> Transcript {
    let mut transcript = Transcript::new(b"guardian_public_keys");
    transcript.append_message(b"id", guardian_id.as_bytes());
    transcript.append_u64(b"x", x_coordinate);
    transcript
}

/// Public package a guardian publishes at the start of the ceremony: commitments
/// `K_{i,j} = [a_{i,j}]G` to all coefficients of its secret polynomial, together with
/// a proof of possession of the coefficients.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct PublicKeys<G: Group> {
    pub(crate) guardian_id: String,
    pub(crate) x_coordinate: u64,
    #[cfg_attr(
        feature = "serde",
        serde(with = "crate::serde::VecHelper::<PublicKey<G>, 1>")
    )]
    pub(crate) commitments: Vec<PublicKey<G>>,
    pub(crate) proof: ProofOfPossession<G>,
}

impl<G: Group> PublicKeys<G> {
    /// Returns the id of the guardian that produced this package.
    pub fn guardian_id(&self) -> &str {
        &self.guardian_id
    }

    /// Returns the 1-based x-coordinate of the guardian.
    pub fn x_coordinate(&self) -> u64 {
        self.x_coordinate
    }

    /// Returns the coefficient commitments, lowest degree first.
    pub fn commitments(&self) -> &[PublicKey<G>] {
        &self.commitments
    }

    /// Returns the guardian's election public key (the coefficient-0 commitment).
    ///
    /// # Panics
    ///
    /// Panics if the package holds no commitments, which cannot happen for packages
    /// produced by [`KeyCeremonyTrustee`] or deserialized with the `serde` feature
    /// (deserialization rejects empty commitment lists).
    pub fn election_public_key(&self) -> &PublicKey<G> {
        &self.commitments[0]
    }

    /// Verifies the proof of possession against the commitments.
    ///
    /// # Errors
    ///
    /// Returns an error if the proof does not verify.
    pub fn verify(&self) -> Result<(), VerificationError> {
        let mut transcript = keys_transcript(&self.guardian_id, self.x_coordinate);
        self.proof.verify(self.commitments.iter(), &mut transcript)
    }
}

/// Guardian participating in the key ceremony.
///
/// A trustee is created with a fresh random polynomial of degree `quorum - 1`; its
/// coefficient-0 keypair is the guardian's election keypair. The ceremony then
/// proceeds pairwise: exchange [`PublicKeys`] packages, exchange [`EncryptedKeyShare`]s,
/// and finally either compute the joint secret share via [`Self::key_share()`] or
/// convert into a [`DecryptingTrustee`].
///
/// # Examples
///
/// ```
/// # use rand::thread_rng;
/// # use quorum_elgamal::{group::Ristretto, ceremony::KeyCeremonyTrustee};
/// # fn main() -> Result<(), quorum_elgamal::ceremony::Error> {
/// let mut rng = thread_rng();
/// let mut trustees: Vec<_> = (1..=3)
///     .map(|i| KeyCeremonyTrustee::<Ristretto>::new(&format!("guardian{i}"), i, 2, &mut rng))
///     .collect();
///
/// // Exchange public keys.
/// let packages: Vec<_> = trustees.iter().map(|t| t.public_keys().clone()).collect();
/// for trustee in &mut trustees {
///     for package in &packages {
///         if package.guardian_id() != trustee.id() {
///             trustee.receive_public_keys(package.clone())?;
///         }
///     }
/// }
///
/// // Exchange encrypted key shares.
/// let ids: Vec<_> = trustees.iter().map(|t| t.id().to_owned()).collect();
/// for i in 0..trustees.len() {
///     for j in 0..trustees.len() {
///         if i != j {
///             let share = trustees[i].encrypted_key_share_for(&ids[j], &mut rng)?;
///             trustees[j].receive_encrypted_key_share(&share)?;
///         }
///     }
/// }
///
/// for trustee in &trustees {
///     trustee.key_share()?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct KeyCeremonyTrustee<G: Group> {
    id: String,
    x_coordinate: u64,
    polynomial: Vec<Keypair<G>>,
    public_keys: PublicKeys<G>,
    other_public_keys: HashMap<String, PublicKeys<G>>,
    shares_for_others: HashMap<String, (EncryptedKeyShare<G>, SecretKey<G>)>,
    my_share_of_others: HashMap<String, SecretKey<G>>,
}

impl<G: Group> core::fmt::Debug for KeyCeremonyTrustee<G> {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        formatter
            .debug_struct("KeyCeremonyTrustee")
            .field("id", &self.id)
            .field("x_coordinate", &self.x_coordinate)
            .field("quorum", &self.polynomial.len())
            .finish_non_exhaustive()
    }
}

impl<G: Group> KeyCeremonyTrustee<G> {
    /// Creates a trustee with a fresh random polynomial.
    ///
    /// # Panics
    ///
    /// Panics if `id` is empty, or if `x_coordinate` or `quorum` is zero.
    pub fn new<R: CryptoRng + RngCore>(
        id: &str,
        x_coordinate: u64,
        quorum: usize,
        rng: &mut R,
    ) -> Self {
        assert!(!id.is_empty(), "guardian id cannot be empty");
        assert!(x_coordinate > 0, "guardian x-coordinate must be positive");
        assert!(quorum > 0, "ceremony quorum must be positive");

        let polynomial: Vec<_> = (0..quorum).map(|_| Keypair::generate(rng)).collect();
        let commitments: Vec<_> = polynomial
            .iter()
            .map(|keypair| keypair.public().clone())
            .collect();
        let mut transcript = keys_transcript(id, x_coordinate);
        let proof = ProofOfPossession::new(&polynomial, &mut transcript, rng);

        Self {
            id: id.to_owned(),
            x_coordinate,
            polynomial,
            public_keys: PublicKeys {
                guardian_id: id.to_owned(),
                x_coordinate,
                commitments,
                proof,
            },
            other_public_keys: HashMap::new(),
            shares_for_others: HashMap::new(),
            my_share_of_others: HashMap::new(),
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

    /// Returns the ceremony quorum (the degree of the secret polynomial plus one).
    pub fn quorum(&self) -> usize {
        self.polynomial.len()
    }

    /// Returns this guardian's election public key.
    pub fn election_public_key(&self) -> &PublicKey<G> {
        self.polynomial[0].public()
    }

    /// Returns the package this guardian publishes to its peers.
    pub fn public_keys(&self) -> &PublicKeys<G> {
        &self.public_keys
    }

    /// Evaluates the secret polynomial at `x_coordinate` via the Horner scheme.
    fn polynomial_value_at(&self, x_coordinate: u64) -> G::Scalar {
        let x = G::Scalar::from(x_coordinate);
        self.polynomial
            .iter()
            .rev()
            .fold(G::Scalar::default(), |acc, keypair| {
                acc * x + *keypair.secret().expose_scalar()
            })
    }

    /// Receives and validates a peer's [`PublicKeys`] package.
    ///
    /// All structural defects of the package are collected before reporting, so a
    /// misbehaving peer gets a complete diagnosis in one round trip.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending guardian if the package is structurally
    /// invalid, or if its proof of possession does not verify.
    pub fn receive_public_keys(&mut self, keys: PublicKeys<G>) -> Result<(), Error> {
        let mut defects = Vec::new();
        if keys.guardian_id == self.id {
            defects.push(PublicKeysDefect::SelfReference);
        }
        if keys.x_coordinate == 0 {
            defects.push(PublicKeysDefect::ZeroCoordinate);
        }
        if keys.commitments.len() != self.quorum() {
            defects.push(PublicKeysDefect::CommitmentCountMismatch {
                expected: self.quorum(),
                actual: keys.commitments.len(),
            });
        }
        if !defects.is_empty() {
            return Err(Error::InvalidPublicKeys {
                guardian_id: keys.guardian_id,
                defects,
            });
        }

        keys.verify().map_err(|error| Error::InvalidProof {
            guardian_id: keys.guardian_id.clone(),
            error,
        })?;
        self.other_public_keys.insert(keys.guardian_id.clone(), keys);
        Ok(())
    }

    /// Produces this guardian's polynomial share for `recipient_id`, encrypted for
    /// that guardian. The result is cached: repeated calls return the identical
    /// ciphertext, since the encryption nonce must not change once the share has
    /// been handed out.
    ///
    /// # Errors
    ///
    /// Returns an error if the recipient's public keys were never received.
    pub fn encrypted_key_share_for<R: CryptoRng + RngCore>(
        &mut self,
        recipient_id: &str,
        rng: &mut R,
    ) -> Result<EncryptedKeyShare<G>, Error> {
        if let Some((share, _)) = self.shares_for_others.get(recipient_id) {
            return Ok(share.clone());
        }

        let recipient =
            self.other_public_keys
                .get(recipient_id)
                .ok_or_else(|| Error::UnknownGuardian {
                    guardian_id: recipient_id.to_owned(),
                })?;
        let value = self.polynomial_value_at(recipient.x_coordinate);
        let encrypted = EncryptedKeyShare::new(
            &value,
            self.id.clone(),
            self.x_coordinate,
            recipient.guardian_id.clone(),
            recipient.x_coordinate,
            recipient.election_public_key(),
            rng,
        );
        self.shares_for_others.insert(
            recipient_id.to_owned(),
            (encrypted.clone(), SecretKey::new(value)),
        );
        Ok(encrypted)
    }

    /// Receives, decrypts and verifies a share of a peer's polynomial evaluated at
    /// this guardian's coordinate. The decrypted share is checked against the peer's
    /// coefficient commitments: `[P_i(ℓ)]G` must equal `Σ_j [ℓ^j]K_{i,j}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the share is addressed to another guardian, the sender's
    /// public keys were never received, the share fails authentication, or it does
    /// not match the sender's commitments.
    pub fn receive_encrypted_key_share(
        &mut self,
        share: &EncryptedKeyShare<G>,
    ) -> Result<(), Error> {
        if share.recipient_id != self.id || share.recipient_coordinate != self.x_coordinate {
            return Err(Error::WrongRecipient {
                expected: share.recipient_id.clone(),
                actual: self.id.clone(),
            });
        }
        let sender =
            self.other_public_keys
                .get(&share.sender_id)
                .ok_or_else(|| Error::UnknownGuardian {
                    guardian_id: share.sender_id.clone(),
                })?;

        let value = share
            .decrypt(self.polynomial[0].public(), self.polynomial[0].secret())
            .map_err(|err| match err {
                ShareDecryptionError::Authentication => Error::AuthenticationFailure {
                    guardian_id: share.sender_id.clone(),
                },
                ShareDecryptionError::NonCanonicalScalar => Error::MalformedShare {
                    guardian_id: share.sender_id.clone(),
                },
            })?;
        Self::verify_against_commitments(&value, &sender.commitments, self.x_coordinate).map_err(
            |()| Error::InvalidShare {
                guardian_id: share.sender_id.clone(),
            },
        )?;

        self.my_share_of_others
            .insert(share.sender_id.clone(), SecretKey::new(value));
        Ok(())
    }

    /// Produces the unencrypted share for `recipient_id`, to be published when the
    /// recipient challenges the encrypted share.
    ///
    /// # Errors
    ///
    /// Returns an error if the encrypted share for the recipient was never produced;
    /// the published value must be the exact share handed out earlier.
    pub fn key_share_for(&self, recipient_id: &str) -> Result<KeyShare<G>, Error> {
        let (_, value) =
            self.shares_for_others
                .get(recipient_id)
                .ok_or_else(|| Error::MissingShare {
                    guardian_id: recipient_id.to_owned(),
                })?;
        Ok(KeyShare {
            sender_id: self.id.clone(),
            sender_coordinate: self.x_coordinate,
            recipient_id: recipient_id.to_owned(),
            share: value.clone(),
        })
    }

    /// Receives an unencrypted, published share of a peer's polynomial. The share is
    /// verified against the peer's coefficient commitments only; anyone can perform
    /// the same check, so no decryption dispute needs to be adjudicated.
    ///
    /// # Errors
    ///
    /// Returns an error if the share is addressed to another guardian, the sender's
    /// public keys were never received, or the share does not match the sender's
    /// commitments.
    pub fn receive_key_share(&mut self, share: KeyShare<G>) -> Result<(), Error> {
        if share.recipient_id != self.id {
            return Err(Error::WrongRecipient {
                expected: share.recipient_id.clone(),
                actual: self.id.clone(),
            });
        }
        let sender =
            self.other_public_keys
                .get(&share.sender_id)
                .ok_or_else(|| Error::UnknownGuardian {
                    guardian_id: share.sender_id.clone(),
                })?;
        Self::verify_against_commitments(
            share.share.expose_scalar(),
            &sender.commitments,
            self.x_coordinate,
        )
        .map_err(|()| Error::InvalidShare {
            guardian_id: share.sender_id.clone(),
        })?;

        self.my_share_of_others
            .insert(share.sender_id.clone(), share.share);
        Ok(())
    }

    fn verify_against_commitments(
        share: &G::Scalar,
        commitments: &[PublicKey<G>],
        x_coordinate: u64,
    ) -> Result<(), ()> {
        let x = G::Scalar::from(x_coordinate);
        let mut power = G::Scalar::from(1_u64);
        let powers: Vec<_> = commitments
            .iter()
            .map(|_| {
                let current = power;
                power = power * x;
                current
            })
            .collect();
        let expected = G::vartime_multi_mul(
            &powers,
            commitments.iter().map(PublicKey::as_element),
        );
        if bool::from(subtle::ConstantTimeEq::ct_eq(
            &G::mul_generator(share),
            &expected,
        )) {
            Ok(())
        } else {
            Err(())
        }
    }

    /// Computes this guardian's share of the joint election secret,
    /// `P(ℓ) = Σ_i P_i(ℓ) mod q` over all guardians including this one.
    ///
    /// # Errors
    ///
    /// Returns an error if a share from any known peer is absent.
    pub fn key_share(&self) -> Result<SecretKey<G>, Error> {
        let mut sum = self.polynomial_value_at(self.x_coordinate);
        for id in self.other_public_keys.keys() {
            let share = self
                .my_share_of_others
                .get(id)
                .ok_or_else(|| Error::MissingShare {
                    guardian_id: id.clone(),
                })?;
            sum = sum + *share.expose_scalar();
        }
        Ok(SecretKey::new(sum))
    }

    /// Converts this trustee into a [`DecryptingTrustee`] once the ceremony is
    /// complete. Shares of the peers' polynomials are re-encrypted under this
    /// guardian's own election key, so they stay authenticated at rest.
    ///
    /// # Errors
    ///
    /// Returns an error if a share from any known peer is absent.
    pub fn into_decrypting<R: CryptoRng + RngCore>(
        self,
        rng: &mut R,
    ) -> Result<DecryptingTrustee<G>, Error> {
        let mut key_shares = HashMap::with_capacity(self.other_public_keys.len());
        for (id, keys) in &self.other_public_keys {
            let share = self
                .my_share_of_others
                .get(id)
                .ok_or_else(|| Error::MissingShare {
                    guardian_id: id.clone(),
                })?;
            let encrypted = EncryptedKeyShare::new(
                share.expose_scalar(),
                id.clone(),
                keys.x_coordinate,
                self.id.clone(),
                self.x_coordinate,
                self.polynomial[0].public(),
                rng,
            );
            key_shares.insert(id.clone(), encrypted);
        }

        Ok(DecryptingTrustee::new(
            self.id,
            self.x_coordinate,
            self.polynomial[0].clone(),
            key_shares,
        ))
    }

    #[cfg(test)]
    pub(crate) fn election_secret(&self) -> &G::Scalar {
        self.polynomial[0].secret().expose_scalar()
    }
}

#[cfg(test)]
mod tests {
    use rand::thread_rng;

    use super::*;
    use crate::{
        ceremony::combine_public_keys,
        group::{Ristretto, ScalarOps},
    };

    fn run_key_exchange(
        trustees: &mut [KeyCeremonyTrustee<Ristretto>],
    ) -> Result<(), Error> {
        let packages: Vec<_> = trustees
            .iter()
            .map(|trustee| trustee.public_keys().clone())
            .collect();
        for trustee in trustees.iter_mut() {
            for package in &packages {
                if package.guardian_id() != trustee.id() {
                    trustee.receive_public_keys(package.clone())?;
                }
            }
        }
        Ok(())
    }

    fn run_ceremony(count: u64, quorum: usize) -> Vec<KeyCeremonyTrustee<Ristretto>> {
        let mut rng = thread_rng();
        let mut trustees: Vec<_> = (1..=count)
            .map(|i| KeyCeremonyTrustee::new(&format!("g{i}"), i, quorum, &mut rng))
            .collect();
        run_key_exchange(&mut trustees).unwrap();

        let ids: Vec<_> = trustees.iter().map(|t| t.id().to_owned()).collect();
        for i in 0..trustees.len() {
            for j in 0..trustees.len() {
                if i != j {
                    let share = trustees[i]
                        .encrypted_key_share_for(&ids[j], &mut rng)
                        .unwrap();
                    trustees[j].receive_encrypted_key_share(&share).unwrap();
                }
            }
        }
        trustees
    }

    #[test]
    fn joint_key_is_sum_of_election_keys() {
        let trustees = run_ceremony(3, 2);
        let packages: Vec<_> = trustees
            .iter()
            .map(|trustee| trustee.public_keys().clone())
            .collect();
        let joint_key = combine_public_keys(&packages);

        let joint_secret = trustees
            .iter()
            .fold(<Ristretto as ScalarOps>::Scalar::default(), |acc, t| {
                acc + *t.election_secret()
            });
        assert_eq!(
            joint_key.as_element(),
            Ristretto::mul_generator(&joint_secret)
        );
    }

    #[test]
    fn key_shares_interpolate_to_joint_secret() {
        let trustees = run_ceremony(3, 2);
        let joint_secret = trustees
            .iter()
            .fold(<Ristretto as ScalarOps>::Scalar::default(), |acc, t| {
                acc + *t.election_secret()
            });

        // Any 2 of the 3 shares must interpolate to the joint secret at zero.
        for absent in 0..trustees.len() {
            let present: Vec<_> = trustees
                .iter()
                .filter(|t| t.x_coordinate() != trustees[absent].x_coordinate())
                .collect();
            let coordinates: Vec<_> = present.iter().map(|t| t.x_coordinate()).collect();
            let interpolated = present
                .iter()
                .fold(<Ristretto as ScalarOps>::Scalar::default(), |acc, t| {
                    let weight = crate::decryption::lagrange_coefficient::<Ristretto>(
                        t.x_coordinate(),
                        &coordinates,
                    );
                    acc + weight * *t.key_share().unwrap().expose_scalar()
                });
            assert_eq!(interpolated, joint_secret);
        }
    }

    #[test]
    fn share_encryption_is_idempotent() {
        let mut rng = thread_rng();
        let mut trustees = run_ceremony(2, 2);
        let first = trustees[0].encrypted_key_share_for("g2", &mut rng).unwrap();
        let second = trustees[0].encrypted_key_share_for("g2", &mut rng).unwrap();
        assert_eq!(first.masked_share, second.masked_share);
        assert_eq!(first.mac, second.mac);
    }

    #[test]
    fn all_public_keys_defects_are_collected() {
        let mut rng = thread_rng();
        let mut trustees: Vec<_> = (1..=2)
            .map(|i| KeyCeremonyTrustee::<Ristretto>::new(&format!("g{i}"), i, 3, &mut rng))
            .collect();

        let mut package = trustees[0].public_keys().clone();
        package.x_coordinate = 0;
        package.commitments.pop();
        let err = trustees[1].receive_public_keys(package).unwrap_err();
        match err {
            Error::InvalidPublicKeys {
                guardian_id,
                defects,
            } => {
                assert_eq!(guardian_id, "g1");
                assert_eq!(
                    defects,
                    vec![
                        PublicKeysDefect::ZeroCoordinate,
                        PublicKeysDefect::CommitmentCountMismatch {
                            expected: 3,
                            actual: 2,
                        },
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Sending a package back to its producer is also a defect.
        let package = trustees[0].public_keys().clone();
        let err = trustees[0].receive_public_keys(package).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidPublicKeys { ref defects, .. }
                if defects == &[PublicKeysDefect::SelfReference]
        ));
    }

    #[test]
    fn tampered_proof_is_rejected() {
        let mut rng = thread_rng();
        let mut trustees: Vec<_> = (1..=2)
            .map(|i| KeyCeremonyTrustee::<Ristretto>::new(&format!("g{i}"), i, 2, &mut rng))
            .collect();

        let mut package = trustees[0].public_keys().clone();
        package.commitments[1] = Keypair::<Ristretto>::generate(&mut rng).public().clone();
        let err = trustees[1].receive_public_keys(package).unwrap_err();
        assert!(matches!(err, Error::InvalidProof { ref guardian_id, .. } if guardian_id == "g1"));
    }

    #[test]
    fn share_for_unknown_guardian_is_rejected() {
        let mut rng = thread_rng();
        let mut trustee = KeyCeremonyTrustee::<Ristretto>::new("g1", 1, 2, &mut rng);
        let err = trustee
            .encrypted_key_share_for("nobody", &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownGuardian { ref guardian_id } if guardian_id == "nobody"
        ));
    }

    #[test]
    fn misdirected_share_is_rejected() {
        let mut rng = thread_rng();
        let mut trustees = run_ceremony(3, 2);
        let share = trustees[0].encrypted_key_share_for("g2", &mut rng).unwrap();
        let err = trustees[2].receive_encrypted_key_share(&share).unwrap_err();
        assert!(matches!(
            err,
            Error::WrongRecipient { ref expected, ref actual }
                if expected == "g2" && actual == "g3"
        ));
    }

    #[test]
    fn corrupted_share_fails_authentication() {
        let mut rng = thread_rng();
        let mut trustees = run_ceremony(2, 2);
        let mut share = trustees[0].encrypted_key_share_for("g2", &mut rng).unwrap();
        share.masked_share[0] ^= 1;
        let err = trustees[1].receive_encrypted_key_share(&share).unwrap_err();
        assert!(matches!(
            err,
            Error::AuthenticationFailure { ref guardian_id } if guardian_id == "g1"
        ));
    }

    #[test]
    fn published_key_share_roundtrip() {
        let mut trustees = run_ceremony(2, 2);

        // g2 challenges g1's encrypted share; g1 publishes the plaintext share,
        // which g2 verifies against the commitments.
        let published = trustees[0].key_share_for("g2").unwrap();
        trustees[1].receive_key_share(published).unwrap();
        trustees[1].key_share().unwrap();
    }

    #[test]
    fn published_share_for_wrong_polynomial_is_rejected() {
        let mut rng = thread_rng();
        let mut trustees = run_ceremony(3, 2);
        let mut published = trustees[0].key_share_for("g2").unwrap();
        published.share = SecretKey::generate(&mut rng);
        let err = trustees[1].receive_key_share(published).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidShare { ref guardian_id } if guardian_id == "g1"
        ));
    }

    #[test]
    fn key_share_requires_all_peers() {
        let mut rng = thread_rng();
        let mut trustees: Vec<_> = (1..=2)
            .map(|i| KeyCeremonyTrustee::<Ristretto>::new(&format!("g{i}"), i, 2, &mut rng))
            .collect();
        run_key_exchange(&mut trustees).unwrap();

        let err = trustees[0].key_share().unwrap_err();
        assert!(matches!(
            err,
            Error::MissingShare { ref guardian_id } if guardian_id == "g2"
        ));
    }
}
