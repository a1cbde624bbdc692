//! Authenticated encryption of polynomial shares exchanged during the key ceremony.
//!
//! A share `P_i(ℓ)` sent from guardian `i` to guardian `ℓ` is encrypted in an
//! encrypt-then-MAC scheme keyed via ECDH against the recipient's election key `K_ℓ`:
//! the sender picks a fresh nonce `R` and both sides derive `(α, β) = ([R]G, [R]K_ℓ)`.
//! An HMAC-SHA-256 KDF in counter mode expands `(i, ℓ, K_ℓ, α, β)` into a MAC key and
//! a stream key; the ciphertext is `(C0, C1, C2) = (α, share ⊕ stream, MAC(C0 ‖ C1))`.
//! The MAC is verified before the share is unmasked.

use hmac::{Hmac, Mac};
use rand_core::{CryptoRng, RngCore};
use sha2::Sha256;

use crate::{
    group::Group,
    keys::{PublicKey, SecretKey},
};

#[cfg(feature = "serde")]
use crate::serde::{Base64Bytes, ElementHelper};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

type HmacSha256 = Hmac<Sha256>;

/// Domain separation prefix for the per-share key derivation.
const SHARE_KEY_DOMAIN: &[u8] = b"quorum_elgamal_share_keys";
const KDF_LABEL: &[u8] = b"share enc keys";
const KDF_CONTEXT: &[u8] = b"share encrypt";
/// Total output key material length in bits, as encoded into the KDF input.
const KDF_OUTPUT_BITS: u16 = 512;

fn hmac_sha256(key: &[u8], chunks: &[&[u8]]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC-SHA256 accepts any key length");
    for chunk in chunks {
        mac.update(chunk);
    }
    mac.finalize().into_bytes().into()
}

/// Derives the MAC key `k0` and the stream key `k1` for a share sent from guardian
/// `sender` to guardian `recipient`.
fn derive_share_keys<G: Group>(
    sender: u64,
    recipient: u64,
    recipient_key: &PublicKey<G>,
    alpha: &G::Element,
    beta: &G::Element,
) -> ([u8; 32], [u8; 32]) {
    let mut alpha_bytes = vec![0_u8; G::ELEMENT_SIZE];
    G::serialize_element(alpha, &mut alpha_bytes);
    let mut beta_bytes = vec![0_u8; G::ELEMENT_SIZE];
    G::serialize_element(beta, &mut beta_bytes);

    let shared_key = hmac_sha256(
        SHARE_KEY_DOMAIN,
        &[
            &[0x11],
            &sender.to_be_bytes(),
            &recipient.to_be_bytes(),
            recipient_key.as_bytes(),
            &alpha_bytes,
            &beta_bytes,
        ],
    );

    let expand = |counter: u8| {
        hmac_sha256(
            &shared_key,
            &[
                &[counter],
                KDF_LABEL,
                &[0x00],
                KDF_CONTEXT,
                &sender.to_be_bytes(),
                &recipient.to_be_bytes(),
                &KDF_OUTPUT_BITS.to_be_bytes(),
            ],
        )
    };
    (expand(0x01), expand(0x02))
}

/// Reasons why decrypting an [`EncryptedKeyShare`] can fail. Mapped onto module-level
/// errors by the callers, which know the guardian ids involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShareDecryptionError {
    /// MAC verification failed; the ciphertext is corrupted or keyed differently.
    Authentication,
    /// The MAC verified, but the unmasked bytes are not a canonical scalar.
    NonCanonicalScalar,
}

/// Share of a guardian's secret polynomial, authenticated-encrypted for a single
/// recipient guardian. Can be published without revealing the share.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct EncryptedKeyShare<G: Group> {
    pub(crate) sender_id: String,
    pub(crate) sender_coordinate: u64,
    pub(crate) recipient_id: String,
    pub(crate) recipient_coordinate: u64,
    /// `C0 = [R]G` for the encryption nonce `R`.
    #[cfg_attr(feature = "serde", serde(with = "ElementHelper::<G>"))]
    pub(crate) masking_element: G::Element,
    /// `C1 = share_bytes ⊕ k1`.
    #[cfg_attr(feature = "serde", serde(with = "Base64Bytes"))]
    pub(crate) masked_share: Vec<u8>,
    /// `C2 = HMAC(k0, C0 ‖ C1)`.
    #[cfg_attr(feature = "serde", serde(with = "Base64Bytes"))]
    pub(crate) mac: Vec<u8>,
}

impl<G: Group> EncryptedKeyShare<G> {
    pub(crate) fn new<R: CryptoRng + RngCore>(
        share: &G::Scalar,
        sender_id: String,
        sender_coordinate: u64,
        recipient_id: String,
        recipient_coordinate: u64,
        recipient_key: &PublicKey<G>,
        rng: &mut R,
    ) -> Self {
        let nonce = SecretKey::<G>::generate(rng);
        let alpha = G::mul_generator(nonce.expose_scalar());
        let beta = recipient_key.as_element() * nonce.expose_scalar();
        let (mac_key, stream_key) = derive_share_keys::<G>(
            sender_coordinate,
            recipient_coordinate,
            recipient_key,
            &alpha,
            &beta,
        );

        let mut masked_share = vec![0_u8; G::SCALAR_SIZE];
        G::serialize_scalar(share, &mut masked_share);
        debug_assert!(masked_share.len() <= stream_key.len());
        for (byte, key_byte) in masked_share.iter_mut().zip(&stream_key) {
            *byte ^= key_byte;
        }

        let mut alpha_bytes = vec![0_u8; G::ELEMENT_SIZE];
        G::serialize_element(&alpha, &mut alpha_bytes);
        let mac = hmac_sha256(&mac_key, &[&alpha_bytes, &masked_share]).to_vec();

        Self {
            sender_id,
            sender_coordinate,
            recipient_id,
            recipient_coordinate,
            masking_element: alpha,
            masked_share,
            mac,
        }
    }

    /// Verifies the MAC and unmasks the share. `recipient_key` / `recipient_secret`
    /// must be the election keypair of the recipient guardian.
    pub(crate) fn decrypt(
        &self,
        recipient_key: &PublicKey<G>,
        recipient_secret: &SecretKey<G>,
    ) -> Result<G::Scalar, ShareDecryptionError> {
        let beta = self.masking_element * recipient_secret.expose_scalar();
        let (mac_key, stream_key) = derive_share_keys::<G>(
            self.sender_coordinate,
            self.recipient_coordinate,
            recipient_key,
            &self.masking_element,
            &beta,
        );

        let mut alpha_bytes = vec![0_u8; G::ELEMENT_SIZE];
        G::serialize_element(&self.masking_element, &mut alpha_bytes);
        let mut mac = HmacSha256::new_from_slice(&mac_key)
            .expect("HMAC-SHA256 accepts any key length");
        mac.update(&alpha_bytes);
        mac.update(&self.masked_share);
        mac.verify_slice(&self.mac)
            .map_err(|_| ShareDecryptionError::Authentication)?;

        if self.masked_share.len() != G::SCALAR_SIZE {
            return Err(ShareDecryptionError::Authentication);
        }
        let mut share_bytes: Vec<u8> = self
            .masked_share
            .iter()
            .zip(&stream_key)
            .map(|(byte, key_byte)| byte ^ key_byte)
            .collect();
        let share =
            G::deserialize_scalar(&share_bytes).ok_or(ShareDecryptionError::NonCanonicalScalar);
        zeroize::Zeroize::zeroize(&mut share_bytes);
        share
    }

    /// Returns the id of the guardian whose polynomial is shared.
    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    /// Returns the id of the guardian this share is encrypted for.
    pub fn recipient_id(&self) -> &str {
        &self.recipient_id
    }
}

/// Unencrypted share of a guardian's secret polynomial, published when an encrypted
/// share is challenged by its recipient.
#[derive(Debug, Clone)]
pub struct KeyShare<G: Group> {
    pub(crate) sender_id: String,
    pub(crate) sender_coordinate: u64,
    pub(crate) recipient_id: String,
    pub(crate) share: SecretKey<G>,
}

impl<G: Group> KeyShare<G> {
    /// Returns the id of the guardian whose polynomial is shared.
    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    /// Returns the id of the guardian this share is intended for.
    pub fn recipient_id(&self) -> &str {
        &self.recipient_id
    }

    /// Returns the shared polynomial value.
    pub fn share(&self) -> &SecretKey<G> {
        &self.share
    }
}
