//! Scalar field arithmetic.
//!
//! `Fq` is a big-integer value paired with the modulus it was constructed
//! against. Unlike the curve crate's own field types, nothing here is
//! generic over a compile-time modulus: the modulus travels with the value
//! so that combining two scalars built against different moduli is a
//! checkable runtime condition ([`Error::ModulusMismatch`]) rather than
//! something the type system silently allows or silently forbids.
//!
//! Every operation below is a distinct, named function. There is
//! deliberately no `Add`/`Mul`/`Sub` operator overloading and no mixed-type
//! arithmetic that infers what you meant: `mul` is `Fq × Fq → Fq`,
//! `lift_mul` is `i64 × Fq → Fq`, and scalar multiplication of a curve point
//! lives on the curve side ([`crate::curve`]), not here.

use std::sync::OnceLock;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::Error;

/// The secp256k1 group order `q`, used as the default modulus everywhere in
/// this crate outside of modulus-mismatch tests.
pub fn secp256k1_order() -> BigUint {
    static ORDER: OnceLock<BigUint> = OnceLock::new();
    ORDER
        .get_or_init(|| {
            BigUint::parse_bytes(
                b"FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
                16,
            )
            .expect("static hex literal is valid")
        })
        .clone()
}

/// An element of `Z/mZ` for some runtime modulus `m`.
#[derive(Clone, Debug)]
pub struct Fq {
    value: BigUint,
    modulus: BigUint,
}

impl Fq {
    /// Construct `value mod modulus`. Never fails: the value is reduced.
    pub fn new(value: BigUint, modulus: BigUint) -> Self {
        Fq {
            value: value % &modulus,
            modulus,
        }
    }

    /// The additive identity of the given modulus.
    pub fn zero(modulus: BigUint) -> Self {
        Fq {
            value: BigUint::zero(),
            modulus,
        }
    }

    /// The multiplicative identity of the given modulus.
    pub fn one(modulus: BigUint) -> Self {
        Fq {
            value: BigUint::one(),
            modulus,
        }
    }

    /// Lift a signed integer into the field, reducing it mod `modulus`.
    /// This is the crate's only `i64 × Fq → Fq`-shaped operation: lift, then
    /// use [`Fq::mul`].
    pub fn lift(n: i64, modulus: BigUint) -> Self {
        if n >= 0 {
            Fq::new(BigUint::from(n as u64), modulus)
        } else {
            let m = &modulus;
            let reduced = BigUint::from((-n) as u64) % m;
            let value = if reduced.is_zero() { reduced } else { m - reduced };
            Fq { value, modulus }
        }
    }

    /// Reduced representative, as a `BigUint`.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// The modulus this element was constructed against.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Whether this element is the additive identity.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    fn check_same_modulus(&self, other: &Fq) -> Result<(), Error> {
        if self.modulus != other.modulus {
            Err(Error::ModulusMismatch(
                self.modulus.to_str_radix(16),
                other.modulus.to_str_radix(16),
            ))
        } else {
            Ok(())
        }
    }

    /// `self + other`, mod the shared modulus.
    pub fn add(&self, other: &Fq) -> Result<Fq, Error> {
        self.check_same_modulus(other)?;
        Ok(Fq::new(&self.value + &other.value, self.modulus.clone()))
    }

    /// `self - other`, mod the shared modulus.
    pub fn sub(&self, other: &Fq) -> Result<Fq, Error> {
        self.check_same_modulus(other)?;
        let m = &self.modulus;
        let value = if self.value >= other.value {
            &self.value - &other.value
        } else {
            m - (&other.value - &self.value)
        };
        Ok(Fq::new(value, m.clone()))
    }

    /// `self * other`, mod the shared modulus.
    pub fn mul(&self, other: &Fq) -> Result<Fq, Error> {
        self.check_same_modulus(other)?;
        Ok(Fq::new(&self.value * &other.value, self.modulus.clone()))
    }

    /// `-self`, mod the modulus.
    pub fn neg(&self) -> Fq {
        if self.value.is_zero() {
            self.clone()
        } else {
            Fq::new(&self.modulus - &self.value, self.modulus.clone())
        }
    }

    /// `self^exp`, mod the modulus, via square-and-multiply.
    pub fn pow(&self, exp: &BigUint) -> Fq {
        Fq::new(self.value.modpow(exp, &self.modulus), self.modulus.clone())
    }

    /// The multiplicative inverse of `self`, via the extended Euclidean
    /// algorithm. `Err(Error::NonInvertible)` iff `self` is zero.
    pub fn inv(&self) -> Result<Fq, Error> {
        if self.value.is_zero() {
            return Err(Error::NonInvertible);
        }
        let (gcd, x, _y) = extended_gcd(self.value.clone(), self.modulus.clone());
        debug_assert!(gcd.is_one(), "modulus must be prime for a field inverse to exist");
        Ok(Fq::new(x, self.modulus.clone()))
    }

    /// Equality on reduced representatives. Two `Fq` built against
    /// different moduli are never equal, even if their raw values match.
    pub fn ct_eq(&self, other: &Fq) -> bool {
        self.modulus == other.modulus && self.value == other.value
    }

    /// Big-endian 32-byte canonical encoding of the reduced value.
    pub fn to_be_bytes32(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        let bytes = self.value.to_bytes_be();
        out[32 - bytes.len()..].copy_from_slice(&bytes);
        out
    }

    /// Construct from a big-endian 32-byte encoding, reduced mod `modulus`.
    pub fn from_be_bytes32(bytes: &[u8; 32], modulus: BigUint) -> Self {
        Fq::new(BigUint::from_bytes_be(bytes), modulus)
    }
}

impl PartialEq for Fq {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other)
    }
}
impl Eq for Fq {}

/// Signed extended Euclidean algorithm over non-negative `BigUint` inputs,
/// returning `(gcd, x, y)` such that `a*x + b*y = gcd`, with `x` reduced
/// into `[0, b)` when `gcd == 1` (i.e. `x` is `a`'s inverse mod `b`).
fn extended_gcd(a: BigUint, b: BigUint) -> (BigUint, BigUint, BigUint) {
    // Work in signed big integers internally, then fold back to BigUint.
    use num_bigint::BigInt;
    let (a_i, b_i) = (BigInt::from(a), BigInt::from(b.clone()));
    let (mut old_r, mut r) = (a_i.clone(), b_i.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    while !r.is_zero() {
        let quotient = &old_r / &r;
        let new_r = &old_r - &quotient * &r;
        old_r = r;
        r = new_r;
        let new_s = &old_s - &quotient * &s;
        old_s = s;
        s = new_s;
    }
    let modulus_i = BigInt::from(b);
    let mut x = old_s % &modulus_i;
    if x < BigInt::zero() {
        x += &modulus_i;
    }
    let gcd = old_r.magnitude().clone();
    (gcd, x.to_biguint().expect("reduced mod positive modulus"), BigUint::zero())
}
