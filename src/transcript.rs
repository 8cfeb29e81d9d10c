//! Fiat-Shamir transcript.
//!
//! The transcript is an ordered log of points and scalars. A challenge is
//! derived by serializing every item appended so far as 86-bit big-integer
//! limbs, hashing that byte string with blake2s-256, folding the digest's
//! eight 32-bit little-endian words into an accumulator taken modulo the
//! computation prime `P_c = 2^251 + 17*2^192 + 1`, and finally reducing
//! that accumulator modulo the field the verifier actually works in (`q`,
//! the secp256k1 group order, everywhere this crate calls `challenge`).
//!
//! Protocol 2's round-by-round replay needs to re-derive a challenge from
//! an arbitrary prefix of the log, not just from the whole thing, so
//! [`Transcript`] keeps its state as a plain append-only vector rather
//! than an incremental hash: [`Transcript::challenge_at`] recomputes the
//! digest over `items[..n]` for any `n <= items.len()`.

use ark_ec::AffineRepr;
use blake2::{Blake2s256, Digest};
use num_bigint::BigUint;
use num_traits::Zero;

use crate::curve::G;
use crate::field::Fq;

/// One entry appended to the transcript.
#[derive(Clone, Debug)]
pub enum FsItem {
    /// A curve point, serialized as 6 limbs (3 for `x`, 3 for `y`).
    Point(G),
    /// A scalar, serialized as 3 limbs.
    Scalar(Fq),
    /// A raw integer (the seed), serialized as a single 32-byte limb.
    Seed(u64),
}

/// The computation prime `P_c = 2^251 + 17*2^192 + 1` the digest is folded
/// into before the final reduction mod `q`.
pub fn computation_prime() -> BigUint {
    (BigUint::from(1u32) << 251u32) + BigUint::from(17u32) * (BigUint::from(1u32) << 192u32) + BigUint::from(1u32)
}

const LIMB_BASE_BITS: u32 = 86;

fn to_limbs(value: &BigUint) -> [BigUint; 3] {
    let base = BigUint::from(1u32) << LIMB_BASE_BITS;
    let base2 = &base * &base;
    let d2 = value / &base2;
    let rem = value - &d2 * &base2;
    let d1 = &rem / &base;
    let d0 = &rem - &d1 * &base;
    [d0, d1, d2]
}

fn limb_le_bytes32(limb: &BigUint) -> [u8; 32] {
    let mut out = [0u8; 32];
    let bytes = limb.to_bytes_le();
    out[..bytes.len()].copy_from_slice(&bytes);
    out
}

fn item_limbs(item: &FsItem) -> Vec<BigUint> {
    match item {
        FsItem::Seed(n) => vec![BigUint::from(*n)],
        FsItem::Scalar(s) => to_limbs(s.value()).to_vec(),
        FsItem::Point(p) => {
            if p.is_identity() {
                let mut v = to_limbs(&BigUint::zero()).to_vec();
                v.extend(to_limbs(&BigUint::zero()));
                v
            } else {
                let (x, y) = p.0.xy().expect("checked non-identity above");
                use ark_ff::{BigInteger, PrimeField};
                let x_int = BigUint::from_bytes_be(&x.into_bigint().to_bytes_be());
                let y_int = BigUint::from_bytes_be(&y.into_bigint().to_bytes_be());
                let mut v = to_limbs(&x_int).to_vec();
                v.extend(to_limbs(&y_int));
                v
            }
        }
    }
}

/// `mod_hash`: blake2s-256 over the limb-serialized message, folded in
/// `p_computation`, returned reduced modulo `target_modulus`.
fn mod_hash(limbs: &[BigUint], p_computation: &BigUint, target_modulus: &BigUint) -> BigUint {
    let mut bytes = Vec::with_capacity(limbs.len() * 32);
    for limb in limbs {
        bytes.extend_from_slice(&limb_le_bytes32(limb));
    }
    let digest = Blake2s256::digest(&bytes);
    let mut acc = BigUint::zero();
    let base32 = BigUint::from(1u64 << 32);
    for chunk in digest.chunks(4) {
        let word = u32::from_le_bytes(chunk.try_into().expect("4-byte chunk"));
        acc = (acc * &base32 + BigUint::from(word)) % p_computation;
    }
    acc % target_modulus
}

/// An ordered Fiat-Shamir log, challenging over the secp256k1 group order.
#[derive(Clone, Debug)]
pub struct Transcript {
    modulus: BigUint,
    items: Vec<FsItem>,
}

impl Transcript {
    /// Start an empty transcript whose challenges live in `modulus`, with no
    /// seed item yet appended. Most callers want [`Transcript::seeded`].
    pub fn new(modulus: BigUint) -> Self {
        Transcript {
            modulus,
            items: Vec::new(),
        }
    }

    /// Start a transcript as `[seed, ...]`, matching the digest shape every
    /// proof in this crate is built against: item 0 is always the raw
    /// integer seed, everything after is points/scalars.
    pub fn seeded(modulus: BigUint, seed: u64) -> Self {
        let mut t = Transcript::new(modulus);
        t.items.push(FsItem::Seed(seed));
        t
    }

    /// The modulus challenges are drawn from.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// The raw seed this transcript was started with, if item 0 is a seed
    /// (true for every transcript this crate constructs via
    /// [`Transcript::seeded`]).
    pub fn seed(&self) -> Option<u64> {
        match self.items.first() {
            Some(FsItem::Seed(s)) => Some(*s),
            _ => None,
        }
    }

    /// The point recorded at `idx`, if that slot holds one.
    pub fn point_at(&self, idx: usize) -> Option<&G> {
        match self.items.get(idx) {
            Some(FsItem::Point(p)) => Some(p),
            _ => None,
        }
    }

    /// The scalar recorded at `idx`, if that slot holds one.
    pub fn scalar_at(&self, idx: usize) -> Option<&Fq> {
        match self.items.get(idx) {
            Some(FsItem::Scalar(s)) => Some(s),
            _ => None,
        }
    }

    /// Number of items appended so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a point.
    pub fn append_point(&mut self, p: &G) {
        self.items.push(FsItem::Point(*p));
    }

    /// Append a scalar.
    pub fn append_scalar(&mut self, s: &Fq) {
        self.items.push(FsItem::Scalar(s.clone()));
    }

    /// Append a slice of scalars, in order.
    pub fn append_scalars(&mut self, scalars: &[Fq]) {
        for s in scalars {
            self.append_scalar(s);
        }
    }

    /// Derive a challenge scalar from every item appended so far.
    pub fn challenge(&self) -> Fq {
        self.challenge_at(self.items.len())
    }

    /// Derive a challenge scalar from the first `upto` items only. Used by
    /// Protocol 2 to replay challenges against a growing prefix of the same
    /// log rather than a separately mutated running hash.
    pub fn challenge_at(&self, upto: usize) -> Fq {
        let limbs: Vec<BigUint> = self.items[..upto].iter().flat_map(item_limbs).collect();
        let value = mod_hash(&limbs, &computation_prime(), &self.modulus);
        Fq::new(value, self.modulus.clone())
    }
}
