//! Reference prover, for tests only.
//!
//! Implements the textbook recursive-halving Bulletproofs inner-product
//! prover so integration tests can exercise the verifier against honestly
//! constructed proofs instead of hand-encoded byte blobs. Not part of the
//! public crate API and not linked into non-test builds: the prover side
//! of this protocol is explicitly out of scope for the library itself.

use num_bigint::BigUint;
use secp256k1_ipa_verifier::field::secp256k1_order;
use secp256k1_ipa_verifier::msm::{self, PippengerConfig};
use secp256k1_ipa_verifier::proof::{Proof1, Proof2};
use secp256k1_ipa_verifier::transcript::Transcript;
use secp256k1_ipa_verifier::{Fq, G};

pub fn q() -> BigUint {
    secp256k1_order()
}

pub fn scalar(n: u64) -> Fq {
    Fq::new(BigUint::from(n), q())
}

pub fn generator() -> G {
    use ark_ec::Group;
    G(ark_secp256k1::Affine::from(ark_secp256k1::Projective::generator()))
}

fn inner_product(a: &[Fq], b: &[Fq]) -> Fq {
    let mut acc = Fq::zero(q());
    for (ai, bi) in a.iter().zip(b.iter()) {
        acc = acc.add(&ai.mul(bi).unwrap()).unwrap();
    }
    acc
}

/// Build a commitment `P = <a,g> + <b,h> + <a,b>*u` and a valid `Proof2`
/// for it, seeding the transcript with `seed` at item 0 (so the proof's
/// rounds begin at transcript index 1).
pub fn build_proof2(g: Vec<G>, h: Vec<G>, u: G, a: Vec<Fq>, b: Vec<Fq>, seed: u64) -> (G, Proof2) {
    let (p, a_final, b_final, xs, ls, rs, transcript, start) = build_proof2_parts(g, h, u, a, b, seed);
    let proof = Proof2::new(a_final, b_final, xs, ls, rs, transcript, start).unwrap();
    (p, proof)
}

/// Same construction as [`build_proof2`], but returns the raw components
/// instead of an already-validated `Proof2`, so a test can mutate a
/// component (swap two `L`s, flip a bit of `a`, ...) before constructing
/// the proof itself.
#[allow(clippy::type_complexity)]
pub fn build_proof2_parts(
    g: Vec<G>,
    h: Vec<G>,
    u: G,
    a: Vec<Fq>,
    b: Vec<Fq>,
    seed: u64,
) -> (G, Fq, Fq, Vec<Fq>, Vec<G>, Vec<G>, Transcript, usize) {
    let c = inner_product(&a, &b);
    let p0 = msm::pippenger(&a, &g, PippengerConfig::default()).unwrap();
    let p1 = msm::pippenger(&b, &h, PippengerConfig::default()).unwrap();
    let p = p0.add(&p1).add(&G::scalar_mul(&c, &u));

    let mut transcript = Transcript::seeded(q(), seed);
    let start = transcript.len();

    let (a_final, b_final, xs, ls, rs) = fold(g, h, u, a, b, &mut transcript);
    (p, a_final, b_final, xs, ls, rs, transcript, start)
}

fn fold(
    mut g: Vec<G>,
    mut h: Vec<G>,
    u: G,
    mut a: Vec<Fq>,
    mut b: Vec<Fq>,
    transcript: &mut Transcript,
) -> (Fq, Fq, Vec<Fq>, Vec<G>, Vec<G>) {
    let mut xs = Vec::new();
    let mut ls = Vec::new();
    let mut rs = Vec::new();

    while a.len() > 1 {
        let n = a.len();
        let half = n / 2;
        let (a_l, a_r) = a.split_at(half);
        let (b_l, b_r) = b.split_at(half);
        let (g_l, g_r) = g.split_at(half);
        let (h_l, h_r) = h.split_at(half);

        let c_l = inner_product(a_l, b_r);
        let c_r = inner_product(a_r, b_l);

        let l = msm::pippenger(a_l, g_r, PippengerConfig::default())
            .unwrap()
            .add(&msm::pippenger(b_r, h_l, PippengerConfig::default()).unwrap())
            .add(&G::scalar_mul(&c_l, &u));
        let r = msm::pippenger(a_r, g_l, PippengerConfig::default())
            .unwrap()
            .add(&msm::pippenger(b_l, h_r, PippengerConfig::default()).unwrap())
            .add(&G::scalar_mul(&c_r, &u));

        transcript.append_point(&l);
        transcript.append_point(&r);
        let x = transcript.challenge();
        transcript.append_scalar(&x);
        let x_inv = x.inv().unwrap();

        let mut g_new = Vec::with_capacity(half);
        let mut h_new = Vec::with_capacity(half);
        let mut a_new = Vec::with_capacity(half);
        let mut b_new = Vec::with_capacity(half);
        for i in 0..half {
            g_new.push(G::scalar_mul(&x_inv, &g_l[i]).add(&G::scalar_mul(&x, &g_r[i])));
            h_new.push(G::scalar_mul(&x, &h_l[i]).add(&G::scalar_mul(&x_inv, &h_r[i])));
            a_new.push(a_l[i].mul(&x).unwrap().add(&a_r[i].mul(&x_inv).unwrap()).unwrap());
            b_new.push(b_l[i].mul(&x_inv).unwrap().add(&b_r[i].mul(&x).unwrap()).unwrap());
        }

        xs.push(x);
        ls.push(l);
        rs.push(r);
        g = g_new;
        h = h_new;
        a = a_new;
        b = b_new;
    }

    (a[0].clone(), b[0].clone(), xs, ls, rs)
}

/// Build a Protocol 1 proof for claim `c = <a,b>` on top of a Protocol 2
/// reduction.
pub fn build_proof1(g: Vec<G>, h: Vec<G>, u: G, p: G, a: Vec<Fq>, b: Vec<Fq>, seed: u64) -> (Fq, Proof1) {
    let c = inner_product(&a, &b);

    // Protocol 1's own frozen transcript is exactly [seed, x]; the
    // embedded Proof2 carries the larger, continued transcript (same
    // prefix, then the round triples), per the proof's own contract.
    let mut transcript = Transcript::seeded(q(), seed);
    let x = transcript.challenge();
    transcript.append_scalar(&x);
    let proof1_transcript = transcript.clone();

    let xc = x.mul(&c).unwrap();
    let u_new = G::scalar_mul(&x, &u);
    let p_new = p.add(&G::scalar_mul(&xc, &u));

    let start = transcript.len();
    let (a_final, b_final, xs, ls, rs) = fold(g, h, u_new, a, b, &mut transcript);
    let proof2 = Proof2::new(a_final, b_final, xs, ls, rs, transcript, start).unwrap();

    let proof1 = Proof1::new(u_new, p_new, proof2, proof1_transcript).unwrap();
    (c, proof1)
}
