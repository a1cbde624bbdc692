//! Threshold key ceremony for election guardians.
//!
//! `n` guardians, each identified by a unique id and a 1-based x-coordinate, jointly
//! produce an election key such that any `quorum` of them can decrypt. Each guardian
//! samples a secret polynomial of degree `quorum - 1`, publishes commitments to its
//! coefficients together with a proof of possession, and sends every peer an
//! authenticated-encrypted share of the polynomial evaluated at the peer's
//! coordinate. Misbehaving peers surface as typed [`Error`]s naming the guardian;
//! a failure for one peer never invalidates exchanges with the others.
//!
//! # Examples
//!
//! See [`KeyCeremonyTrustee`] for an end-to-end ceremony between three guardians.

use core::fmt;

use crate::proofs::VerificationError;

mod share;
mod trustee;

pub use self::{
    share::{EncryptedKeyShare, KeyShare},
    trustee::{KeyCeremonyTrustee, PublicKeys},
};

use crate::{group::Group, keys::PublicKey};

/// Structural defect in a guardian's published [`PublicKeys`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PublicKeysDefect {
    /// The package was produced by the receiving guardian itself.
    SelfReference,
    /// The x-coordinate of the sending guardian is zero.
    ZeroCoordinate,
    /// The number of coefficient commitments does not match the ceremony quorum.
    CommitmentCountMismatch {
        /// Expected number of commitments (the quorum).
        expected: usize,
        /// Actual number of commitments in the package.
        actual: usize,
    },
}

impl fmt::Display for PublicKeysDefect {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfReference => formatter.write_str("public keys sent to their own producer"),
            Self::ZeroCoordinate => formatter.write_str("guardian x-coordinate is zero"),
            Self::CommitmentCountMismatch { expected, actual } => write!(
                formatter,
                "expected {expected} coefficient commitments, got {actual}"
            ),
        }
    }
}

/// Errors that can occur during the key ceremony or when preparing for decryption.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A received [`PublicKeys`] package is structurally invalid. All defects of the
    /// package are collected before reporting.
    InvalidPublicKeys {
        /// Id of the guardian that produced the package.
        guardian_id: String,
        /// All detected defects.
        defects: Vec<PublicKeysDefect>,
    },
    /// The proof of possession in a [`PublicKeys`] package does not verify.
    InvalidProof {
        /// Id of the guardian that produced the package.
        guardian_id: String,
        /// Cause of the verification failure.
        error: VerificationError,
    },
    /// An operation references a guardian whose public keys were never received.
    UnknownGuardian {
        /// Id of the referenced guardian.
        guardian_id: String,
    },
    /// A key share was delivered to a guardian other than its recipient.
    WrongRecipient {
        /// Id of the guardian the share is intended for.
        expected: String,
        /// Id of the guardian the share was delivered to.
        actual: String,
    },
    /// An encrypted key share failed MAC verification.
    AuthenticationFailure {
        /// Id of the guardian that produced the share.
        guardian_id: String,
    },
    /// A key share decrypted successfully but does not contain a canonical scalar.
    MalformedShare {
        /// Id of the guardian that produced the share.
        guardian_id: String,
    },
    /// A key share does not match the commitments its producer made to its
    /// polynomial coefficients.
    InvalidShare {
        /// Id of the guardian that produced the share.
        guardian_id: String,
    },
    /// A key share expected from a guardian is absent.
    MissingShare {
        /// Id of the guardian whose share is absent.
        guardian_id: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPublicKeys {
                guardian_id,
                defects,
            } => {
                write!(
                    formatter,
                    "invalid public keys from guardian '{guardian_id}': "
                )?;
                for (i, defect) in defects.iter().enumerate() {
                    if i > 0 {
                        formatter.write_str("; ")?;
                    }
                    fmt::Display::fmt(defect, formatter)?;
                }
                Ok(())
            }
            Self::InvalidProof { guardian_id, error } => write!(
                formatter,
                "invalid proof of possession from guardian '{guardian_id}': {error}"
            ),
            Self::UnknownGuardian { guardian_id } => write!(
                formatter,
                "public keys for guardian '{guardian_id}' were never received"
            ),
            Self::WrongRecipient { expected, actual } => write!(
                formatter,
                "key share for guardian '{expected}' was delivered to guardian '{actual}'"
            ),
            Self::AuthenticationFailure { guardian_id } => write!(
                formatter,
                "encrypted key share from guardian '{guardian_id}' failed authentication"
            ),
            Self::MalformedShare { guardian_id } => write!(
                formatter,
                "key share from guardian '{guardian_id}' is not a canonical scalar"
            ),
            Self::InvalidShare { guardian_id } => write!(
                formatter,
                "key share from guardian '{guardian_id}' does not match the guardian's \
                 polynomial commitments"
            ),
            Self::MissingShare { guardian_id } => write!(
                formatter,
                "key share from guardian '{guardian_id}' is absent"
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidProof { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Combines guardians' published election keys into the joint election key
/// (the sum of all coefficient-0 commitments).
///
/// # Panics
///
/// Panics if `published_keys` is empty.
pub fn combine_public_keys<'a, G: Group>(
    published_keys: impl IntoIterator<Item = &'a PublicKeys<G>>,
) -> PublicKey<G> {
    let combined = published_keys
        .into_iter()
        .map(|keys| keys.election_public_key().as_element())
        .reduce(|acc, element| acc + element)
        .expect("cannot combine an empty set of public keys");
    PublicKey::from_element(combined)
}
