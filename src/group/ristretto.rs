//! Implementation of [`Group`] for the Ristretto transform of Curve25519 (aka ristretto255).

use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT,
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
    traits::{Identity, MultiscalarMul, VartimeMultiscalarMul},
};
use rand_core::{CryptoRng, RngCore};

use std::io;

use crate::group::{ElementOps, Group, ScalarOps};

/// [`Group`] implementation based on the Ristretto transform of Curve25519.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ristretto;

impl ScalarOps for Ristretto {
    type Scalar = Scalar;

    const SCALAR_SIZE: usize = 32;

    fn generate_scalar<R: CryptoRng + RngCore>(rng: &mut R) -> Self::Scalar {
        Scalar::random(rng)
    }

    fn scalar_from_random_bytes<R: io::Read>(mut source: R) -> Self::Scalar {
        let mut scalar_bytes = [0_u8; 64];
        source
            .read_exact(&mut scalar_bytes)
            .expect("cannot read random bytes from source");
        Scalar::from_bytes_mod_order_wide(&scalar_bytes)
    }

    fn invert_scalar(scalar: Self::Scalar) -> Self::Scalar {
        scalar.invert()
    }

    fn invert_scalars(scalars: &mut [Self::Scalar]) {
        Scalar::batch_invert(scalars);
    }

    fn serialize_scalar(scalar: &Self::Scalar, output: &mut [u8]) {
        output.copy_from_slice(&scalar.to_bytes());
    }

    fn deserialize_scalar(bytes: &[u8]) -> Option<Self::Scalar> {
        let bytes: &[u8; 32] = bytes.try_into().ok()?;
        Scalar::from_canonical_bytes(*bytes).into()
    }
}

impl ElementOps for Ristretto {
    type Element = RistrettoPoint;

    const ELEMENT_SIZE: usize = 32;

    fn identity() -> Self::Element {
        RistrettoPoint::identity()
    }

    fn is_identity(element: &Self::Element) -> bool {
        *element == RistrettoPoint::identity()
    }

    fn generator() -> Self::Element {
        RISTRETTO_BASEPOINT_POINT
    }

    fn serialize_element(element: &Self::Element, output: &mut [u8]) {
        output.copy_from_slice(&element.compress().to_bytes());
    }

    fn deserialize_element(input: &[u8]) -> Option<Self::Element> {
        CompressedRistretto::from_slice(input).ok()?.decompress()
    }
}

impl Group for Ristretto {
    fn mul_generator(k: &Scalar) -> Self::Element {
        RistrettoPoint::mul_base(k)
    }

    fn vartime_mul_generator(k: &Scalar) -> Self::Element {
        RistrettoPoint::vartime_double_scalar_mul_basepoint(
            &Scalar::ZERO,
            &RistrettoPoint::identity(),
            k,
        )
    }

    fn multi_mul<'a, I, J>(scalars: I, elements: J) -> Self::Element
    where
        I: IntoIterator<Item = &'a Self::Scalar>,
        J: IntoIterator<Item = Self::Element>,
    {
        RistrettoPoint::multiscalar_mul(scalars, elements)
    }

    fn vartime_double_mul_generator(
        k: &Scalar,
        k_element: Self::Element,
        r: &Scalar,
    ) -> Self::Element {
        RistrettoPoint::vartime_double_scalar_mul_basepoint(k, &k_element, r)
    }

    fn vartime_multi_mul<'a, I, J>(scalars: I, elements: J) -> Self::Element
    where
        I: IntoIterator<Item = &'a Self::Scalar>,
        J: IntoIterator<Item = Self::Element>,
    {
        RistrettoPoint::vartime_multiscalar_mul(scalars, elements)
    }
}

#[cfg(test)]
mod tests {
    use rand::thread_rng;

    use super::*;

    #[test]
    fn mul_generator_agrees_with_basepoint_mul() {
        let mut rng = thread_rng();
        for _ in 0..100 {
            let scalar = Ristretto::generate_scalar(&mut rng);
            let expected = RISTRETTO_BASEPOINT_POINT * scalar;
            assert_eq!(Ristretto::mul_generator(&scalar), expected);
            assert_eq!(Ristretto::vartime_mul_generator(&scalar), expected);
        }
    }

    #[test]
    fn element_roundtrip() {
        let mut rng = thread_rng();
        for _ in 0..100 {
            let element = Ristretto::mul_generator(&Ristretto::generate_scalar(&mut rng));
            let mut buffer = [0_u8; 32];
            Ristretto::serialize_element(&element, &mut buffer);
            let restored = Ristretto::deserialize_element(&buffer).unwrap();
            assert_eq!(restored, element);
        }
    }

    #[test]
    fn non_canonical_scalars_are_rejected() {
        // The group order is less than 2^255, so the all-ones bytes are not canonical.
        let bytes = [0xff_u8; 32];
        assert!(Ristretto::deserialize_scalar(&bytes).is_none());
    }
}
