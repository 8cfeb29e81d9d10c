//! Protocol 2: the `log n`-round reduced inner-product verifier.
//!
//! Replays the recorded transcript round by round, rebuilds the scalar
//! schedule `s`, and checks a single folded commitment equation via one
//! [`crate::msm::pippenger`] call per side.

use crate::curve::G;
use crate::error::Error;
use crate::field::Fq;
use crate::msm::{self, PippengerConfig};
use crate::proof::Proof2;

/// Verify a Protocol 2 proof against generators `g, h`, blinding base `u`,
/// and commitment `p`.
pub fn verify(
    g: &[G],
    h: &[G],
    u: &G,
    p: &G,
    proof: &Proof2,
    msm_config: PippengerConfig,
) -> Result<(), Error> {
    verify_cancellable(g, h, u, p, proof, msm_config, None)
}

/// Same contract as [`verify`], additionally threading a cooperative
/// cancellation hook through to every MSM call.
pub fn verify_cancellable(
    g: &[G],
    h: &[G],
    u: &G,
    p: &G,
    proof: &Proof2,
    msm_config: PippengerConfig,
    cancel: Option<&dyn Fn() -> bool>,
) -> Result<(), Error> {
    let n = g.len();
    if n == 0 || !n.is_power_of_two() || h.len() != n {
        return Err(Error::BadLength {
            expected: n,
            got: h.len(),
        });
    }
    let log_n = n.trailing_zeros() as usize;
    if proof.rounds() != log_n {
        return Err(Error::BadLength {
            expected: log_n,
            got: proof.rounds(),
        });
    }

    replay_transcript(proof, log_n)?;

    let modulus = proof.a.modulus().clone();
    let s = scalar_schedule(&proof.xs, n, log_n, modulus.clone())?;

    let mut lhs_scalars = Vec::with_capacity(2 * n + 1);
    let mut lhs_bases = Vec::with_capacity(2 * n + 1);
    for (gj, sj) in g.iter().zip(s.iter()) {
        lhs_scalars.push(proof.a.mul(sj)?);
        lhs_bases.push(*gj);
    }
    for (hj, sj) in h.iter().zip(s.iter()) {
        let sj_inv = sj.inv().map_err(|_| Error::BadChallenge)?;
        lhs_scalars.push(proof.b.mul(&sj_inv)?);
        lhs_bases.push(*hj);
    }
    lhs_scalars.push(proof.a.mul(&proof.b)?);
    lhs_bases.push(*u);

    let lhs = msm::pippenger_cancellable(&lhs_scalars, &lhs_bases, msm_config, cancel)?;

    let mut rhs_scalars = Vec::with_capacity(2 * log_n);
    let mut rhs_bases = Vec::with_capacity(2 * log_n);
    let two = num_bigint::BigUint::from(2u32);
    for xi in &proof.xs {
        rhs_scalars.push(xi.pow(&two));
    }
    rhs_bases.extend_from_slice(&proof.ls);
    for xi in &proof.xs {
        let xi_inv = xi.inv().map_err(|_| Error::BadChallenge)?;
        rhs_scalars.push(xi_inv.pow(&two));
    }
    rhs_bases.extend_from_slice(&proof.rs);

    let rhs_msm = msm::pippenger_cancellable(&rhs_scalars, &rhs_bases, msm_config, cancel)?;
    let rhs = p.add(&rhs_msm);

    if lhs.eq(&rhs) {
        Ok(())
    } else {
        Err(Error::EquationMismatch)
    }
}

fn replay_transcript(proof: &Proof2, log_n: usize) -> Result<(), Error> {
    let start = proof.start;
    for i in 0..log_n {
        let idx_l = start + 3 * i;
        let idx_r = idx_l + 1;
        let idx_x = idx_l + 2;

        let recorded_l = proof.transcript.point_at(idx_l).ok_or(Error::TranscriptMismatch(i))?;
        if !recorded_l.eq(&proof.ls[i]) {
            return Err(Error::TranscriptMismatch(i));
        }
        let recorded_r = proof.transcript.point_at(idx_r).ok_or(Error::TranscriptMismatch(i))?;
        if !recorded_r.eq(&proof.rs[i]) {
            return Err(Error::TranscriptMismatch(i));
        }

        let expected_x = proof.transcript.challenge_at(idx_x);
        let recorded_x = proof.transcript.scalar_at(idx_x).ok_or(Error::TranscriptMismatch(i))?;
        if !expected_x.ct_eq(recorded_x) || !expected_x.ct_eq(&proof.xs[i]) {
            return Err(Error::TranscriptMismatch(i));
        }
        if proof.xs[i].is_zero() {
            return Err(Error::BadChallenge);
        }
    }
    Ok(())
}

/// `sᵢ = Π_j x_{j+1}^{b(i,j)}`, `b(i,j) = +1` if bit `j` (MSB-first) of `i`
/// is set, else `−1`.
fn scalar_schedule(xs: &[Fq], n: usize, log_n: usize, modulus: num_bigint::BigUint) -> Result<Vec<Fq>, Error> {
    let mut s = Vec::with_capacity(n);
    for idx in 0..n {
        let mut tmp = Fq::one(modulus.clone());
        for (j, xj) in xs.iter().enumerate().take(log_n) {
            let bit = (idx >> (log_n - 1 - j)) & 1;
            tmp = if bit == 1 {
                tmp.mul(xj)?
            } else {
                tmp.mul(&xj.inv().map_err(|_| Error::BadChallenge)?)?
            };
        }
        s.push(tmp);
    }
    Ok(s)
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

    #[test]
    fn scalar_schedule_matches_generator_halving_for_n2() {
        // n=2, log_n=1: s = [x0^-1, x0]
        let q = secp256k1_order();
        let x0 = Fq::new(BigUint::from(5u32), q.clone());
        let s = scalar_schedule(&[x0.clone()], 2, 1, q.clone()).unwrap();
        assert!(s[1].ct_eq(&x0));
        assert!(s[0].ct_eq(&x0.inv().unwrap()));
    }

    /// S3 — a zero challenge is treated as non-invertible and rejected
    /// with `BadChallenge`, exercised directly against the scalar schedule
    /// since a genuinely zero Fiat-Shamir output can't be produced by
    /// choosing transcript contents (it would require a blake2s-256
    /// preimage of zero).
    #[test]
    fn scalar_schedule_rejects_zero_challenge() {
        let q = secp256k1_order();
        let zero = Fq::zero(q.clone());
        let err = scalar_schedule(&[zero], 2, 1, q).unwrap_err();
        assert_eq!(err, Error::BadChallenge);
    }

    #[test]
    fn rejects_non_power_of_two_n() {
        let g = vec![generator(); 3];
        let h = vec![generator(); 3];
        let u = generator();
        let p = generator();
        let q = secp256k1_order();
        let proof = crate::proof::Proof2::new(
            Fq::zero(q.clone()),
            Fq::zero(q.clone()),
            vec![],
            vec![],
            vec![],
            crate::transcript::Transcript::seeded(q, 0),
            1,
        )
        .unwrap();
        let err = verify(&g, &h, &u, &p, &proof, PippengerConfig::default()).unwrap_err();
        assert!(matches!(err, Error::BadLength { .. }));
    }
}
