//! Structured, validated proof containers for Protocol 1 and Protocol 2.
//!
//! Every constructor here is fallible and runs the §4.7 invariants before
//! handing back a value: there is no way to build a `Proof1`/`Proof2`
//! outside this module (and the test-only reference prover) without going
//! through these checks, including when decoding from untrusted bytes.
//!
//! [`Proof2::decode`]/[`Proof1::decode`] implement the canonical encoding
//! §6 sketches (length-prefixed `n`, `a`/`b` scalars, `log n` `(Lᵢ, Rᵢ,
//! xᵢ)` triples, a seed) and route every decoded point and scalar through
//! the exact same [`Proof2::new`]/[`Proof1::new`] invariant checks as
//! in-memory construction — decoding is never a second, looser validation
//! path.

use num_bigint::BigUint;

use crate::curve::G;
use crate::error::Error;
use crate::field::Fq;
use crate::transcript::Transcript;

/// The reduced-argument proof Protocol 2 verifies.
#[derive(Clone, Debug)]
pub struct Proof2 {
    pub(crate) a: Fq,
    pub(crate) b: Fq,
    pub(crate) xs: Vec<Fq>,
    pub(crate) ls: Vec<G>,
    pub(crate) rs: Vec<G>,
    pub(crate) transcript: Transcript,
    pub(crate) start: usize,
}

impl Proof2 {
    /// Construct a `Proof2`, checking `len(xs) == len(ls) == len(rs)`, a
    /// shared modulus across every scalar, and curve membership of every
    /// point.
    pub fn new(
        a: Fq,
        b: Fq,
        xs: Vec<Fq>,
        ls: Vec<G>,
        rs: Vec<G>,
        transcript: Transcript,
        start: usize,
    ) -> Result<Self, Error> {
        if xs.len() != ls.len() || xs.len() != rs.len() {
            return Err(Error::BadLength {
                expected: xs.len(),
                got: ls.len().max(rs.len()),
            });
        }
        let modulus = a.modulus().clone();
        if b.modulus() != &modulus || xs.iter().any(|x| x.modulus() != &modulus) {
            return Err(Error::ModulusMismatch(
                modulus.to_str_radix(16),
                "mismatched scalar in Proof2".to_string(),
            ));
        }
        for p in ls.iter().chain(rs.iter()) {
            if !p.is_on_curve() {
                return Err(Error::NotOnCurve);
            }
        }
        Ok(Proof2 {
            a,
            b,
            xs,
            ls,
            rs,
            transcript,
            start,
        })
    }

    /// Number of reduction rounds recorded, `log2(n)`.
    pub fn rounds(&self) -> usize {
        self.xs.len()
    }

    /// Canonical encoding: `n` (u32 LE), `seed` (u64 LE), `a`, `b`
    /// (32-byte scalars), then `log2(n)` `(Lᵢ, Rᵢ, xᵢ)` triples. Assumes a
    /// standalone proof whose enclosing transcript is exactly `[seed]`
    /// (i.e. `start == 1`); a `Proof2` embedded in a `Proof1` is encoded
    /// via [`Proof1::to_bytes`] instead, which shares the outer seed.
    pub fn to_bytes(&self) -> Vec<u8> {
        let seed = self.transcript.seed().unwrap_or(0);
        let mut w = ByteWriter::new();
        w.write_u32(1u32 << self.rounds());
        w.write_u64(seed);
        w.write_scalar(&self.a);
        w.write_scalar(&self.b);
        for i in 0..self.rounds() {
            w.write_point(&self.ls[i]);
            w.write_point(&self.rs[i]);
            w.write_scalar(&self.xs[i]);
        }
        w.into_inner()
    }

    /// Decode a standalone `Proof2` (enclosing transcript `[seed, ...]`,
    /// `start == 1`) from its canonical encoding, reduced against `modulus`.
    pub fn decode(bytes: &[u8], modulus: BigUint) -> Result<Self, Error> {
        let mut r = ByteReader::new(bytes);
        let n = r.read_u32()? as usize;
        if n == 0 {
            return Err(Error::Decode("proof2: n must be nonzero".to_string()));
        }
        let seed = r.read_u64()?;
        Self::decode_continuing(&mut r, n, Transcript::seeded(modulus, seed))
    }

    /// Decode the rest of a `Proof2` (its `a`, `b`, and round triples)
    /// given a transcript prefix already built by the caller (used by
    /// [`Proof1::decode`] to continue the outer transcript rather than
    /// starting a fresh one).
    fn decode_continuing(r: &mut ByteReader<'_>, n: usize, mut transcript: Transcript) -> Result<Self, Error> {
        let modulus = transcript.modulus().clone();
        let log_n = n.trailing_zeros() as usize;
        let a = r.read_scalar(&modulus)?;
        let b = r.read_scalar(&modulus)?;
        let start = transcript.len();
        let mut ls = Vec::with_capacity(log_n);
        let mut rs = Vec::with_capacity(log_n);
        let mut xs = Vec::with_capacity(log_n);
        for _ in 0..log_n {
            let l = r.read_point()?;
            let rr = r.read_point()?;
            let x = r.read_scalar(&modulus)?;
            transcript.append_point(&l);
            transcript.append_point(&rr);
            transcript.append_scalar(&x);
            ls.push(l);
            rs.push(rr);
            xs.push(x);
        }
        Proof2::new(a, b, xs, ls, rs, transcript, start)
    }
}

/// The outer wrapper proof Protocol 1 verifies.
#[derive(Clone, Debug)]
pub struct Proof1 {
    pub(crate) u_new: G,
    pub(crate) p_new: G,
    pub(crate) proof2: Proof2,
    pub(crate) transcript: Transcript,
}

impl Proof1 {
    /// Construct a `Proof1`. The transcript must carry exactly a seed and
    /// one outer challenge (length 2); both `u_new` and `p_new` must be
    /// on-curve.
    pub fn new(u_new: G, p_new: G, proof2: Proof2, transcript: Transcript) -> Result<Self, Error> {
        if transcript.len() != 2 {
            return Err(Error::BadLength {
                expected: 2,
                got: transcript.len(),
            });
        }
        if !u_new.is_on_curve() || !p_new.is_on_curve() {
            return Err(Error::NotOnCurve);
        }
        Ok(Proof1 {
            u_new,
            p_new,
            proof2,
            transcript,
        })
    }

    /// Canonical encoding: `n` (u32 LE, the embedded `Proof2`'s generator
    /// count), `seed` (u64 LE), `u_new`, `p_new`, then the embedded
    /// `Proof2`'s own `a`, `b`, and round triples (sharing this proof's
    /// seed, per §3's "frozen transcript of length 2... plus the embedded
    /// Proof2" shape — the outer challenge `x` is never written, since the
    /// decoder rederives it from `[seed]` rather than trusting a recorded
    /// value).
    pub fn to_bytes(&self) -> Vec<u8> {
        let seed = self.transcript.seed().unwrap_or(0);
        let mut w = ByteWriter::new();
        w.write_u32(1u32 << self.proof2.rounds());
        w.write_u64(seed);
        w.write_point(&self.u_new);
        w.write_point(&self.p_new);
        w.write_scalar(&self.proof2.a);
        w.write_scalar(&self.proof2.b);
        for i in 0..self.proof2.rounds() {
            w.write_point(&self.proof2.ls[i]);
            w.write_point(&self.proof2.rs[i]);
            w.write_scalar(&self.proof2.xs[i]);
        }
        w.into_inner()
    }

    /// Decode a `Proof1` from its canonical encoding, reduced against
    /// `modulus`. Rederives the outer challenge `x` from `[seed]` rather
    /// than trusting a value on the wire, then builds the embedded
    /// `Proof2`'s continuing transcript from the same seed.
    pub fn decode(bytes: &[u8], modulus: BigUint) -> Result<Self, Error> {
        let mut r = ByteReader::new(bytes);
        let n = r.read_u32()? as usize;
        if n == 0 {
            return Err(Error::Decode("proof1: n must be nonzero".to_string()));
        }
        let seed = r.read_u64()?;
        let u_new = r.read_point()?;
        let p_new = r.read_point()?;

        let mut transcript = Transcript::seeded(modulus, seed);
        let x = transcript.challenge();
        transcript.append_scalar(&x);
        let outer_transcript = transcript.clone();

        let proof2 = Proof2::decode_continuing(&mut r, n, transcript)?;
        Proof1::new(u_new, p_new, proof2, outer_transcript)
    }
}

/// Minimal big-endian-field, length-prefixed byte cursor for the canonical
/// proof encodings above. Not a general-purpose serialization framework:
/// just enough structure to round-trip `Proof1`/`Proof2`.
struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        ByteReader { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if self.pos + n > self.bytes.len() {
            return Err(Error::Decode(format!(
                "unexpected end of input: need {} bytes at offset {}, have {}",
                n,
                self.pos,
                self.bytes.len()
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32, Error> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes(b.try_into().expect("4 bytes")))
    }

    fn read_u64(&mut self) -> Result<u64, Error> {
        let b = self.take(8)?;
        Ok(u64::from_le_bytes(b.try_into().expect("8 bytes")))
    }

    fn read_scalar(&mut self, modulus: &BigUint) -> Result<Fq, Error> {
        let b = self.take(32)?;
        let arr: [u8; 32] = b.try_into().expect("32 bytes");
        Ok(Fq::from_be_bytes32(&arr, modulus.clone()))
    }

    fn read_point(&mut self) -> Result<G, Error> {
        let len = self.take(1)?[0] as usize;
        let b = self.take(len)?;
        G::decompress(b)
    }
}

struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    fn new() -> Self {
        ByteWriter { buf: Vec::new() }
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_scalar(&mut self, s: &Fq) {
        self.buf.extend_from_slice(&s.to_be_bytes32());
    }

    fn write_point(&mut self, p: &G) {
        let compressed = p.compress();
        self.buf.push(compressed.len() as u8);
        self.buf.extend_from_slice(&compressed);
    }

    fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::secp256k1_order;
    use ark_ec::Group;
    use num_bigint::BigUint;

    fn generator() -> G {
        G(ark_secp256k1::Affine::from(ark_secp256k1::Projective::generator()))
    }

    fn scalar(n: u64) -> Fq {
        Fq::new(BigUint::from(n), secp256k1_order())
    }

    fn sample_proof2(seed: u64) -> Proof2 {
        let g = generator();
        let mut transcript = Transcript::seeded(secp256k1_order(), seed);
        let start = transcript.len();
        let l0 = g.add(&g);
        let r0 = g.add(&g).add(&g);
        transcript.append_point(&l0);
        transcript.append_point(&r0);
        let x0 = transcript.challenge();
        transcript.append_scalar(&x0);
        Proof2::new(scalar(3), scalar(5), vec![x0], vec![l0], vec![r0], transcript, start).unwrap()
    }

    #[test]
    fn proof2_roundtrips_through_bytes() {
        let proof = sample_proof2(7);
        let bytes = proof.to_bytes();
        let back = Proof2::decode(&bytes, secp256k1_order()).unwrap();
        assert!(back.a.ct_eq(&proof.a));
        assert!(back.b.ct_eq(&proof.b));
        assert_eq!(back.rounds(), proof.rounds());
        assert!(back.ls[0].eq(&proof.ls[0]));
        assert!(back.rs[0].eq(&proof.rs[0]));
        assert!(back.xs[0].ct_eq(&proof.xs[0]));
    }

    #[test]
    fn proof2_decode_rejects_truncated_input() {
        let proof = sample_proof2(7);
        let mut bytes = proof.to_bytes();
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(Proof2::decode(&bytes, secp256k1_order()), Err(Error::Decode(_))));
    }

    #[test]
    fn proof1_roundtrips_through_bytes() {
        let g = generator();
        let u = g.add(&g);
        let p = g.add(&g).add(&g);
        let seed = 42;
        let mut outer = Transcript::seeded(secp256k1_order(), seed);
        let x = outer.challenge();
        outer.append_scalar(&x);

        let u_new = G::scalar_mul(&x, &u);
        let xc = x.mul(&scalar(15)).unwrap();
        let p_new = p.add(&G::scalar_mul(&xc, &u));

        let mut inner = outer.clone();
        let start = inner.len();
        let l0 = g.add(&g);
        let r0 = g;
        inner.append_point(&l0);
        inner.append_point(&r0);
        let x0 = inner.challenge();
        inner.append_scalar(&x0);
        let proof2 = Proof2::new(scalar(3), scalar(5), vec![x0], vec![l0], vec![r0], inner, start).unwrap();

        let proof1 = Proof1::new(u_new, p_new, proof2, outer).unwrap();
        let bytes = proof1.to_bytes();
        let back = Proof1::decode(&bytes, secp256k1_order()).unwrap();
        assert!(back.u_new.eq(&proof1.u_new));
        assert!(back.p_new.eq(&proof1.p_new));
        assert_eq!(back.proof2.rounds(), proof1.proof2.rounds());
    }
}
