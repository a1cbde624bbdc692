//! Deterministic sequences of nonce scalars derived from a seed.

use merlin::Transcript;
use subtle::ConstantTimeEq;

use core::marker::PhantomData;

use crate::group::{Group, RandomBytesProvider};

/// Infinite, lazily evaluated sequence of group scalars derived from a seed scalar
/// and a domain-separation label.
///
/// The same `(seed, label)` pair always yields the same sequence, which makes proof
/// construction reproducible; distinct labels yield independent sequences. Elements
/// are produced via a forked [`Transcript`] per index, so accessing element `i` does
/// not require computing elements `0..i` state-fully (the iterator still walks
/// indexes in order). Zero scalars are never emitted; a zero draw is skipped by
/// drawing again from the same fork.
pub struct Nonces<G: Group> {
    transcript: Transcript,
    index: u64,
    _group: PhantomData<G>,
}

impl<G: Group> core::fmt::Debug for Nonces<G> {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        formatter
            .debug_struct("Nonces")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl<G: Group> Nonces<G> {
    /// Creates a sequence from the provided seed scalar and label.
    pub fn new(seed: &G::Scalar, label: &'static [u8]) -> Self {
        let mut transcript = Transcript::new(b"nonce_sequence");
        let mut seed_bytes = vec![0_u8; G::SCALAR_SIZE];
        G::serialize_scalar(seed, &mut seed_bytes);
        transcript.append_message(b"seed", &seed_bytes);
        transcript.append_message(b"label", label);
        Self {
            transcript,
            index: 0,
            _group: PhantomData,
        }
    }
}

impl<G: Group> Iterator for Nonces<G> {
    type Item = G::Scalar;

    fn next(&mut self) -> Option<G::Scalar> {
        let mut fork = self.transcript.clone();
        fork.append_u64(b"index", self.index);
        self.index += 1;

        let mut nonce = G::scalar_from_random_bytes(RandomBytesProvider::new(&mut fork, b"nonce"));
        while bool::from(nonce.ct_eq(&G::Scalar::default())) {
            nonce = G::scalar_from_random_bytes(RandomBytesProvider::new(&mut fork, b"nonce"));
        }
        Some(nonce)
    }
}
