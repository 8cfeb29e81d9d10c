//! Verifier core for a Bulletproofs-style inner-product argument over
//! secp256k1.
//!
//! Given public generators, a commitment, a claimed inner-product scalar,
//! and a non-interactive proof produced via the Fiat-Shamir heuristic,
//! [`verify_proof1`] decides in `O(log n)` group operations whether the
//! prover knows two length-`n` vectors whose inner product equals the
//! claim, without learning the vectors. [`verify_proof2`] does the same
//! for the inner reduced statement directly, for callers that have
//! already folded the claim into the `u`/`P` bases themselves.
//!
//! ## Invariants
//!
//! - **Synchronous, single-threaded, no I/O.** A verification call is a
//!   pure function from `(public inputs, proof)` to `Result<(), Error>`.
//!   There is no logging from this crate; callers decide observability.
//! - **No global mutable state.** Curve parameters and MSM tuning are
//!   passed explicitly via [`VerifierContext`], never read from a
//!   module-level singleton.
//! - **No operator overloading across types.** Scalar arithmetic
//!   (`field::Fq`), scalar-by-point multiplication (`curve::G`), and
//!   integer lifting are distinct, named operations; combining scalars
//!   built against different moduli is a checked runtime error
//!   ([`error::Error::ModulusMismatch`]), never a silent coercion.
//! - **Curve fixed to secp256k1.** This crate does not negotiate curves.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod curve;
pub mod error;
pub mod field;
pub mod msm;
pub mod proof;
pub mod protocol1;
pub mod protocol2;
pub mod transcript;

#[cfg(feature = "cairo-emit")]
pub mod cairo;

pub use curve::G;
pub use error::Error;
pub use field::Fq;
pub use msm::PippengerConfig;
pub use proof::{Proof1, Proof2};
pub use transcript::Transcript;

/// Everything a `verify` call needs beyond the proof and its public
/// inputs: MSM tuning and an optional cooperative cancellation hook.
///
/// Replaces the module-level `Pipsecp256k1`/`SUPERCURVE` singletons this
/// crate's semantics were drawn from — curve parameters are fixed to
/// secp256k1 at the type level (`curve::G`), and everything else tunable
/// is threaded through here explicitly.
#[derive(Clone, Copy, Default)]
pub struct VerifierContext<'a> {
    /// Pippenger MSM tuning.
    pub msm_config: PippengerConfig,
    /// Checked at MSM window boundaries; `Some(f)` where `f()` returns
    /// `true` fails verification with [`Error::Cancelled`].
    pub cancel: Option<&'a dyn Fn() -> bool>,
}

/// Verify a Protocol 1 proof: the outer wrapper that folds the claimed
/// inner product `c` into the `u` base via the Fiat-Shamir challenge `x`,
/// then delegates to Protocol 2.
pub fn verify_proof1(
    g: &[G],
    h: &[G],
    u: &G,
    p: &G,
    c: &Fq,
    proof: &Proof1,
    ctx: &VerifierContext,
) -> Result<(), Error> {
    protocol1::verify_cancellable(g, h, u, p, c, proof, ctx.msm_config, ctx.cancel)
}

/// Verify a Protocol 2 proof directly: the `log n`-round reduced
/// inner-product argument, given generators already folded against the
/// caller's `u`/`P`.
pub fn verify_proof2(
    g: &[G],
    h: &[G],
    u: &G,
    p: &G,
    proof: &Proof2,
    ctx: &VerifierContext,
) -> Result<(), Error> {
    protocol2::verify_cancellable(g, h, u, p, proof, ctx.msm_config, ctx.cancel)
}
