//! Zero-knowledge proofs used by the election protocols.
//!
//! All proofs are non-interactive via the Fiat-Shamir heuristic with [`Transcript`]s
//! as the hash oracle. Each proof starts with a domain-separation label; the caller
//! binds additional context (e.g., the election's extended base hash) by appending it
//! to the transcript before proof construction or verification. A proof verifies only
//! against a transcript with the same prior state as at construction.

use merlin::Transcript;

use core::fmt;

use crate::group::{Group, RandomBytesProvider};

mod possession;
mod range;

pub use self::{possession::ProofOfPossession, range::RangeProof};

/// Extension trait for [`Transcript`] abstracting over typed group values.
pub(crate) trait TranscriptForGroup {
    fn start_proof(&mut self, proof_label: &'static [u8]);

    fn append_element_bytes(&mut self, label: &'static [u8], element_bytes: &[u8]);

    fn append_element<G: Group>(&mut self, label: &'static [u8], element: &G::Element);

    fn append_scalar<G: Group>(&mut self, label: &'static [u8], scalar: &G::Scalar);

    fn challenge_scalar<G: Group>(&mut self, label: &'static [u8]) -> G::Scalar;
}

impl TranscriptForGroup for Transcript {
    fn start_proof(&mut self, proof_label: &'static [u8]) {
        self.append_message(b"dom-sep", proof_label);
    }

    fn append_element_bytes(&mut self, label: &'static [u8], element_bytes: &[u8]) {
        self.append_message(label, element_bytes);
    }

    fn append_element<G: Group>(&mut self, label: &'static [u8], element: &G::Element) {
        let mut output = vec![0_u8; G::ELEMENT_SIZE];
        G::serialize_element(element, &mut output);
        self.append_element_bytes(label, &output);
    }

    fn append_scalar<G: Group>(&mut self, label: &'static [u8], scalar: &G::Scalar) {
        let mut output = vec![0_u8; G::SCALAR_SIZE];
        G::serialize_scalar(scalar, &mut output);
        self.append_message(label, &output);
    }

    fn challenge_scalar<G: Group>(&mut self, label: &'static [u8]) -> G::Scalar {
        G::scalar_from_random_bytes(RandomBytesProvider::new(self, label))
    }
}

/// Errors that can occur when verifying proofs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum VerificationError {
    /// Restored challenge does not match the one provided in the proof.
    ///
    /// This error most likely means that the proof itself is malformed, or that it was
    /// created for a different context (other inputs, or other prior transcript state)
    /// than it is verified for.
    ChallengeMismatch,

    /// A collection (e.g., the set of challenge-response pairs in a proof) has a
    /// different size than expected.
    LenMismatch {
        /// Human-readable collection name, such as `"responses"`.
        collection: &'static str,
        /// Expected size of the collection.
        expected: usize,
        /// Actual size of the collection.
        actual: usize,
    },
}

impl VerificationError {
    pub(crate) fn check_lengths(
        collection: &'static str,
        actual: usize,
        expected: usize,
    ) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::LenMismatch {
                collection,
                expected,
                actual,
            })
        }
    }
}

impl fmt::Display for VerificationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChallengeMismatch => formatter.write_str(
                "restored challenge does not match the one provided in the proof",
            ),
            Self::LenMismatch {
                collection,
                expected,
                actual,
            } => write!(
                formatter,
                "collection of {collection} has unexpected size: expected {expected}, got {actual}"
            ),
        }
    }
}

impl std::error::Error for VerificationError {}
