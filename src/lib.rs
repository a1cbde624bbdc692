//! Threshold ElGamal encryption and zero-knowledge proofs for verifiable elections.
//!
//! # Overview
//!
//! The crate implements the cryptographic core of an end-to-end verifiable election:
//!
//! - [`Ciphertext`] — additively homomorphic ElGamal encryption over a generic
//!   prime-order [`group`], with plaintexts encoded in the exponent of the receiver
//!   key and recovered via a [`DiscreteLogTable`].
//! - [`RangeProof`] — a zero-knowledge proof that an encrypted value lies in
//!   `0..=L`, e.g. that a ballot selection is 0 or 1.
//! - [`ceremony`] — a threshold key ceremony in which `n` guardians jointly produce
//!   an election key decryptable by any `quorum` of them, exchanging
//!   authenticated-encrypted polynomial shares.
//! - [`decryption`] — cooperative decryption with compensation for missing
//!   guardians, including the challenge-response round proving each partial
//!   decryption correct.
//! - [`Nonces`] — deterministic, domain-separated nonce sequences used to make
//!   proof construction reproducible.
//!
//! All proofs are bound to [`merlin`] transcripts, so callers can tie them to
//! arbitrary election context (manifest hashes etc.) by appending it to the
//! transcript on both sides.
//!
//! # Crate features
//!
//! - `serde` (off by default) — (de)serialization of public protocol messages via
//!   the `serde` crate, with base64url encodings in human-readable formats.
//!
//! # Examples
//!
//! Encrypting a ballot selection and proving it is 0 or 1:
//!
//! ```
//! use merlin::Transcript;
//! use rand::thread_rng;
//! use quorum_elgamal::{
//!     group::Ristretto, CiphertextWithValue, DiscreteLogTable, Keypair, RangeProof,
//! };
//!
//! # fn main() -> Result<(), quorum_elgamal::VerificationError> {
//! let mut rng = thread_rng();
//! let receiver = Keypair::<Ristretto>::generate(&mut rng);
//! let ciphertext = CiphertextWithValue::new(1, receiver.public(), &mut rng);
//! let proof = RangeProof::new(
//!     &ciphertext,
//!     1,
//!     receiver.public(),
//!     &mut Transcript::new(b"ballot"),
//! );
//! proof.verify(
//!     ciphertext.inner(),
//!     1,
//!     receiver.public(),
//!     &mut Transcript::new(b"ballot"),
//! )?;
//!
//! let lookup_table = DiscreteLogTable::new(receiver.public(), 0..=1);
//! assert_eq!(
//!     receiver.secret().decrypt(ciphertext.into_inner(), &lookup_table),
//!     Some(1),
//! );
//! # Ok(())
//! # }
//! ```
//!
//! See [`ceremony::KeyCeremonyTrustee`] for a key ceremony walkthrough.

#![warn(missing_debug_implementations, missing_docs, bare_trait_objects)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::doc_markdown
)]

pub mod ceremony;
pub mod decryption;
mod encryption;
pub mod group;
mod keys;
mod nonces;
mod proofs;
#[cfg(feature = "serde")]
mod serde;

pub use crate::{
    encryption::{Ciphertext, CiphertextWithValue, DiscreteLogTable},
    keys::{Keypair, PublicKey, PublicKeyConversionError, SecretKey},
    nonces::Nonces,
    proofs::{ProofOfPossession, RangeProof, VerificationError},
};

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
