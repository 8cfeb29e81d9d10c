//! Error taxonomy for the verifier core.
//!
//! All fallible operations in this crate return `Result<_, Error>`. There is
//! no panicking path in non-test code and no recovery attempted inside the
//! core: callers decide what to do with a rejected proof. Nothing in this
//! module logs — see the crate root docs for why.

/// Everything that can make a proof, or a malformed input, get rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// A vector-shaped input didn't have the length the caller promised.
    #[error("bad length: expected {expected}, got {got}")]
    BadLength {
        /// Length required by the caller.
        expected: usize,
        /// Length actually observed.
        got: usize,
    },

    /// A decoded or supplied point does not satisfy the curve equation.
    #[error("point is not on curve")]
    NotOnCurve,

    /// Two scalars were combined but were constructed against different moduli.
    #[error("modulus mismatch: {0} vs {1}")]
    ModulusMismatch(String, String),

    /// A scalar that must be invertible was zero (mod its modulus).
    #[error("non-invertible scalar")]
    NonInvertible,

    /// A Fiat-Shamir challenge derived to zero and no further recovery is defined.
    #[error("bad challenge: derived to zero")]
    BadChallenge,

    /// A proof's embedded transcript entries didn't match the entries the
    /// verifier independently recomputed.
    #[error("transcript mismatch at step {0}")]
    TranscriptMismatch(usize),

    /// The final verification equation did not hold.
    #[error("verification equation did not hold")]
    EquationMismatch,

    /// Verification was cooperatively cancelled before completion.
    #[error("verification cancelled")]
    Cancelled,

    /// A byte-level encoding (point compression, scalar limbs, proof wire
    /// format) was malformed.
    #[error("decode error: {0}")]
    Decode(String),
}
