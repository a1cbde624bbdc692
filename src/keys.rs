//! ElGamal keys and keypairs.

use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use core::fmt;

use crate::group::Group;

/// Secret key for ElGamal encryption: a randomly chosen group scalar.
///
/// The wrapped scalar is zeroized on drop.
pub struct SecretKey<G: Group>(G::Scalar);

impl<G: Group> fmt::Debug for SecretKey<G> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SecretKey")
            .finish_non_exhaustive()
    }
}

impl<G: Group> Drop for SecretKey<G> {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl<G: Group> Clone for SecretKey<G> {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}

impl<G: Group> SecretKey<G> {
    pub(crate) fn new(scalar: G::Scalar) -> Self {
        Self(scalar)
    }

    /// Generates a random secret key.
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        Self(G::generate_scalar(rng))
    }

    /// Deserializes a secret key from `bytes`. Returns `None` if `bytes` is not
    /// a canonical scalar representation.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        G::deserialize_scalar(bytes).map(Self)
    }

    /// Serializes this key into a byte vector. The returned buffer is zeroized on drop.
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(vec![0_u8; G::SCALAR_SIZE]);
        G::serialize_scalar(&self.0, &mut bytes);
        bytes
    }

    /// Exposes the wrapped scalar.
    pub fn expose_scalar(&self) -> &G::Scalar {
        &self.0
    }
}

/// Public key for ElGamal encryption.
///
/// # Implementation details
///
/// The key stores both the original bytes and the decompressed group element;
/// this makes deserialization and transcript hashing cheap at the cost of extra
/// memory.
#[derive(Clone)]
pub struct PublicKey<G: Group> {
    pub(crate) bytes: Vec<u8>,
    pub(crate) element: G::Element,
}

impl<G: Group> fmt::Debug for PublicKey<G> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("PublicKey")
            .field(&hex::encode(&self.bytes))
            .finish()
    }
}

impl<G: Group> PartialEq for PublicKey<G> {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.bytes.ct_eq(&other.bytes))
    }
}

impl<G: Group> PublicKey<G> {
    pub(crate) fn from_element(element: G::Element) -> Self {
        let mut bytes = vec![0_u8; G::ELEMENT_SIZE];
        G::serialize_element(&element, &mut bytes);
        Self { bytes, element }
    }

    /// Deserializes a public key from `bytes`.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` has an invalid length, does not represent
    /// a group element, or represents the group identity.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PublicKeyConversionError> {
        if bytes.len() != G::ELEMENT_SIZE {
            return Err(PublicKeyConversionError::InvalidByteSize);
        }
        let element = G::deserialize_element(bytes)
            .ok_or(PublicKeyConversionError::InvalidGroupElement)?;
        if G::is_identity(&element) {
            return Err(PublicKeyConversionError::IdentityKey);
        }
        Ok(Self {
            bytes: bytes.to_vec(),
            element,
        })
    }

    /// Returns the serialization of this key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the group element corresponding to this key.
    pub fn as_element(&self) -> G::Element {
        self.element
    }
}

/// Errors that can occur when converting bytes into a [`PublicKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PublicKeyConversionError {
    /// The provided byte buffer has an invalid length.
    InvalidByteSize,
    /// The byte buffer is not a canonical encoding of a group element.
    InvalidGroupElement,
    /// The byte buffer encodes the group identity, which is not a valid public key.
    IdentityKey,
}

impl fmt::Display for PublicKeyConversionError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::InvalidByteSize => "invalid byte size of a public key",
            Self::InvalidGroupElement => "bytes do not represent a group element",
            Self::IdentityKey => "public key is the group identity",
        })
    }
}

impl std::error::Error for PublicKeyConversionError {}

/// ElGamal keypair.
#[derive(Debug, Clone)]
pub struct Keypair<G: Group> {
    secret: SecretKey<G>,
    public: PublicKey<G>,
}

impl<G: Group> Keypair<G> {
    /// Generates a random keypair.
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        Self::from(SecretKey::generate(rng))
    }

    /// Returns the public part of this keypair.
    pub fn public(&self) -> &PublicKey<G> {
        &self.public
    }

    /// Returns the secret part of this keypair.
    pub fn secret(&self) -> &SecretKey<G> {
        &self.secret
    }

    /// Returns both parts of this keypair.
    pub fn into_tuple(self) -> (PublicKey<G>, SecretKey<G>) {
        (self.public, self.secret)
    }
}

impl<G: Group> From<SecretKey<G>> for Keypair<G> {
    fn from(secret: SecretKey<G>) -> Self {
        let element = G::mul_generator(secret.expose_scalar());
        Self {
            public: PublicKey::from_element(element),
            secret,
        }
    }
}
