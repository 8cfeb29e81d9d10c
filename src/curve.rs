//! The secp256k1 group, `G`.
//!
//! This module is the only place the crate touches a concrete curve
//! implementation (`ark-secp256k1`, the arkworks ecosystem's short
//! Weierstrass instantiation of this exact curve). Everywhere else works
//! against [`G`] and [`crate::field::Fq`]; the bridge between our
//! hand-rolled `Fq` and the curve crate's own scalar field happens only at
//! [`scalar_mul`]'s boundary, by canonical bytes, so the curve crate never
//! sees — and cannot silently coerce — our field type.

use ark_ec::short_weierstrass::Affine;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInteger, Field, PrimeField};
use ark_secp256k1::{Config, Fq as BaseField, Fr as ScalarField};
use num_bigint::BigUint;

use crate::error::Error;
use crate::field::Fq;

/// A point on secp256k1, represented in affine coordinates.
///
/// Curve arithmetic (`+`, scalar multiplication) is delegated to
/// `ark-secp256k1`'s projective group internally for efficiency, but every
/// public operation here takes and returns affine points: this crate never
/// leaks mixed-coordinate comparisons.
#[derive(Clone, Copy, Debug)]
pub struct G(pub Affine<Config>);

impl G {
    /// The group identity (point at infinity).
    pub fn identity() -> Self {
        G(Affine::identity())
    }

    /// Whether this is the identity.
    pub fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    /// `self + other`.
    pub fn add(&self, other: &G) -> G {
        G((self.0 + other.0).into_affine())
    }

    /// `scalar * point`. The only place a [`Fq`] value crosses into curve
    /// arithmetic: its canonical bytes are reduced into the curve crate's
    /// scalar field (a no-op reduction, since `Fq` values here are already
    /// `< q`) before multiplying.
    pub fn scalar_mul(scalar: &Fq, point: &G) -> G {
        let bytes = scalar.to_be_bytes32();
        let fr = ScalarField::from_be_bytes_mod_order(&bytes);
        G((point.0 * fr).into_affine())
    }

    /// Structural equality (after normalizing both sides to affine, which
    /// they already are).
    pub fn eq(&self, other: &G) -> bool {
        self.0 == other.0
    }

    /// Whether this point satisfies `y^2 = x^3 + 7` (or is the identity,
    /// which is vacuously on-curve).
    pub fn is_on_curve(&self) -> bool {
        if self.0.is_zero() {
            return true;
        }
        let x = self.0.x;
        let y = self.0.y;
        let lhs = y * y;
        let rhs = x * x * x + BaseField::from(7u64);
        lhs == rhs
    }

    /// SEC1-style compressed encoding: `0x02`/`0x03` prefix plus a 32-byte
    /// big-endian `x`, or a single `0x00` byte for the identity.
    pub fn compress(&self) -> Vec<u8> {
        if self.0.is_zero() {
            return vec![0u8];
        }
        let x_bytes = self.0.x.into_bigint().to_bytes_be();
        let mut x32 = [0u8; 32];
        x32[32 - x_bytes.len()..].copy_from_slice(&x_bytes);
        let y_odd = self.0.y.into_bigint().is_odd();
        let mut out = Vec::with_capacity(33);
        out.push(if y_odd { 0x03 } else { 0x02 });
        out.extend_from_slice(&x32);
        out
    }

    /// Inverse of [`G::compress`]. Rejects x-coordinates outside the base
    /// field, prefixes other than `0x02`/`0x03`/the identity marker, and
    /// x-coordinates with no square root (not on the curve).
    pub fn decompress(bytes: &[u8]) -> Result<G, Error> {
        if bytes.len() == 1 && bytes[0] == 0x00 {
            return Ok(G::identity());
        }
        if bytes.len() != 33 {
            return Err(Error::Decode(format!(
                "compressed point must be 1 or 33 bytes, got {}",
                bytes.len()
            )));
        }
        let prefix = bytes[0];
        if prefix != 0x02 && prefix != 0x03 {
            return Err(Error::Decode(format!("bad compression prefix 0x{:02x}", prefix)));
        }
        let x_big = BigUint::from_bytes_be(&bytes[1..33]);
        if x_big >= secp256k1_prime() {
            return Err(Error::Decode("x coordinate not reduced mod p".to_string()));
        }
        let x = BaseField::from_be_bytes_mod_order(&bytes[1..33]);
        let y_sq = x * x * x + BaseField::from(7u64);
        let y = y_sq.sqrt().ok_or(Error::NotOnCurve)?;
        let y_is_odd = y.into_bigint().is_odd();
        let want_odd = prefix == 0x03;
        let y = if y_is_odd == want_odd { y } else { -y };
        Ok(G(Affine::new_unchecked(x, y)))
    }
}

/// The secp256k1 base field prime `p`.
pub fn secp256k1_prime() -> BigUint {
    BigUint::parse_bytes(
        b"FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F",
        16,
    )
    .expect("static hex literal is valid")
}
