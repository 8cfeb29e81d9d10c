//! Protocol 1: the outer wrapper binding a claimed inner-product scalar
//! into the reduced statement Protocol 2 verifies.

use crate::curve::G;
use crate::error::Error;
use crate::field::Fq;
use crate::msm::PippengerConfig;
use crate::proof::Proof1;
use crate::protocol2;

/// Verify a Protocol 1 proof: generators `g, h`, bases `u, p`, claimed
/// inner product `c`, against `proof`.
pub fn verify(
    g: &[G],
    h: &[G],
    u: &G,
    p: &G,
    c: &Fq,
    proof: &Proof1,
    msm_config: PippengerConfig,
) -> Result<(), Error> {
    verify_cancellable(g, h, u, p, c, proof, msm_config, None)
}

/// Same contract as [`verify`], additionally threading a cooperative
/// cancellation hook through to Protocol 2's MSM calls.
pub fn verify_cancellable(
    g: &[G],
    h: &[G],
    u: &G,
    p: &G,
    c: &Fq,
    proof: &Proof1,
    msm_config: PippengerConfig,
    cancel: Option<&dyn Fn() -> bool>,
) -> Result<(), Error> {
    let expected_x = proof.transcript.challenge_at(1);
    let recorded_x = proof.transcript.scalar_at(1).ok_or(Error::TranscriptMismatch(0))?;
    if !expected_x.ct_eq(recorded_x) {
        return Err(Error::TranscriptMismatch(0));
    }
    let x = recorded_x;

    let xc = x.mul(c)?;
    let expected_p_new = p.add(&G::scalar_mul(&xc, u));
    if !proof.p_new.eq(&expected_p_new) {
        return Err(Error::EquationMismatch);
    }
    let expected_u_new = G::scalar_mul(x, u);
    if !proof.u_new.eq(&expected_u_new) {
        return Err(Error::EquationMismatch);
    }

    protocol2::verify_cancellable(g, h, &proof.u_new, &proof.p_new, &proof.proof2, msm_config, cancel)
}
