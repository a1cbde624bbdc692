//! ElGamal encryption with plaintexts encoded in the exponent of the receiver key.
//!
//! A plaintext integer `m` encrypted under key `K` with a random nonce `ξ` is the pair
//! `(α, β) = ([ξ]G, [ξ + m]K)`, where `G` is the group generator. Decryption with the
//! secret key `s` (`K = [s]G`) recovers `β − [s]α = [m]K`; mapping `[m]K` back to `m`
//! requires a [`DiscreteLogTable`] built for the same key, which is efficient only for
//! small plaintext ranges (e.g., vote counts).

use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

use std::{collections::HashMap, ops};

use crate::{
    group::Group,
    keys::{PublicKey, SecretKey},
};

/// ElGamal ciphertext: a pair of group elements.
///
/// Ciphertexts under the same key are additively homomorphic: the [`ops::Add`] impl
/// yields an encryption of the sum of plaintexts.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct Ciphertext<G: Group> {
    #[cfg_attr(feature = "serde", serde(with = "crate::serde::ElementHelper::<G>"))]
    pub(crate) random_element: G::Element,
    #[cfg_attr(feature = "serde", serde(with = "crate::serde::ElementHelper::<G>"))]
    pub(crate) blinded_element: G::Element,
}

impl<G: Group> std::fmt::Debug for Ciphertext<G> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Ciphertext")
            .field("random_element", &self.random_element)
            .field("blinded_element", &self.blinded_element)
            .finish()
    }
}

impl<G: Group> PartialEq for Ciphertext<G> {
    fn eq(&self, other: &Self) -> bool {
        bool::from(
            self.random_element.ct_eq(&other.random_element)
                & self.blinded_element.ct_eq(&other.blinded_element),
        )
    }
}

impl<G: Group> Ciphertext<G> {
    /// Returns the first ciphertext element (`[ξ]G`).
    pub fn random_element(&self) -> &G::Element {
        &self.random_element
    }

    /// Returns the second ciphertext element (`[ξ + m]K`).
    pub fn blinded_element(&self) -> &G::Element {
        &self.blinded_element
    }
}

impl<G: Group> ops::Add for Ciphertext<G> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            random_element: self.random_element + rhs.random_element,
            blinded_element: self.blinded_element + rhs.blinded_element,
        }
    }
}

impl<G: Group> PublicKey<G> {
    /// Encrypts `value` for this key using a fresh random nonce.
    pub fn encrypt<R: CryptoRng + RngCore>(&self, value: u64, rng: &mut R) -> Ciphertext<G> {
        self.encrypt_with_nonce(value, &G::generate_scalar(rng))
    }

    pub(crate) fn encrypt_with_nonce(&self, value: u64, nonce: &G::Scalar) -> Ciphertext<G> {
        let exponent = *nonce + G::Scalar::from(value);
        Ciphertext {
            random_element: G::mul_generator(nonce),
            blinded_element: self.element * &exponent,
        }
    }
}

impl<G: Group> SecretKey<G> {
    /// Decrypts the ciphertext into a group element `[m]K`, where `m` is the plaintext
    /// and `K` is the public key corresponding to this secret key.
    pub fn decrypt_to_element(&self, encrypted: Ciphertext<G>) -> G::Element {
        encrypted.blinded_element - encrypted.random_element * self.expose_scalar()
    }

    /// Decrypts the ciphertext and looks the result up in the `lookup_table`, which must
    /// be built for the public key corresponding to this secret key. Returns `None` if
    /// the decrypted value is out of the table's range.
    pub fn decrypt(
        &self,
        encrypted: Ciphertext<G>,
        lookup_table: &DiscreteLogTable<G>,
    ) -> Option<u64> {
        lookup_table.get(&self.decrypt_to_element(encrypted))
    }
}

/// Ciphertext together with the plaintext value and the nonce used to produce it.
/// Required as input for [`RangeProof`](crate::RangeProof) construction.
#[derive(Debug, Clone)]
pub struct CiphertextWithValue<G: Group> {
    inner: Ciphertext<G>,
    value: u64,
    nonce: SecretKey<G>,
}

impl<G: Group> CiphertextWithValue<G> {
    /// Encrypts `value` for `receiver` with a fresh random nonce, retaining the value
    /// and the nonce.
    pub fn new<R: CryptoRng + RngCore>(
        value: u64,
        receiver: &PublicKey<G>,
        rng: &mut R,
    ) -> Self {
        Self::with_nonce(value, receiver, SecretKey::new(G::generate_scalar(rng)))
    }

    /// Encrypts `value` for `receiver` with the provided nonce. Mostly useful to make
    /// encryption deterministic, e.g. in tests; ordinarily, [`Self::new()`] should
    /// be preferred.
    pub fn with_nonce(value: u64, receiver: &PublicKey<G>, nonce: SecretKey<G>) -> Self {
        Self {
            inner: receiver.encrypt_with_nonce(value, nonce.expose_scalar()),
            value,
            nonce,
        }
    }

    /// Returns a reference to the wrapped ciphertext.
    pub fn inner(&self) -> &Ciphertext<G> {
        &self.inner
    }

    /// Converts this into the wrapped ciphertext, dropping the value and the nonce.
    pub fn into_inner(self) -> Ciphertext<G> {
        self.inner
    }

    pub(crate) fn value(&self) -> u64 {
        self.value
    }

    pub(crate) fn nonce(&self) -> &G::Scalar {
        self.nonce.expose_scalar()
    }
}

/// Lookup table mapping `[m]K` for a fixed key `K` back to small plaintext values `m`.
#[derive(Debug, Clone)]
pub struct DiscreteLogTable<G: Group> {
    lookup_table: HashMap<Vec<u8>, u64>,
    _key: std::marker::PhantomData<G>,
}

impl<G: Group> DiscreteLogTable<G> {
    /// Creates a lookup table for the specified `key` and plaintext `values`.
    pub fn new(key: &PublicKey<G>, values: impl IntoIterator<Item = u64>) -> Self {
        let key_element = key.as_element();
        let lookup_table = values
            .into_iter()
            .filter(|&value| value != 0)
            .map(|value| {
                let element = key_element * &G::Scalar::from(value);
                let mut bytes = vec![0_u8; G::ELEMENT_SIZE];
                G::serialize_element(&element, &mut bytes);
                (bytes, value)
            })
            .collect();

        Self {
            lookup_table,
            _key: std::marker::PhantomData,
        }
    }

    /// Gets the plaintext corresponding to the specified group element, or `None` if
    /// the element is not in the table.
    pub fn get(&self, decrypted_element: &G::Element) -> Option<u64> {
        if G::is_identity(decrypted_element) {
            // Zero is not stored in the lookup table.
            Some(0)
        } else {
            let mut bytes = vec![0_u8; G::ELEMENT_SIZE];
            G::serialize_element(decrypted_element, &mut bytes);
            self.lookup_table.get(&bytes).copied()
        }
    }
}
