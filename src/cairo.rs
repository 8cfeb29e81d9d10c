//! Optional, non-core bridge to a downstream Cairo hint layer.
//!
//! The source repository this crate's semantics are drawn from littered
//! `convert_to_cairo` methods across its proof and transcript types,
//! writing directly into an external memory map. None of that belongs in
//! a verifier core: this module is only the trait those call sites would
//! implement against, with no implementation shipped here. It exists so a
//! downstream consumer can depend on a stable shape without this crate
//! depending on Cairo at all.

use crate::curve::G;
use crate::field::Fq;
use crate::transcript::Transcript;

/// Emits scalars, points, and transcripts in a form a Cairo hint layer
/// could consume. This crate provides no implementor.
pub trait CairoEmit {
    /// Emit a scalar as its 86-bit big-integer limbs.
    fn emit_scalar(&mut self, s: &Fq);
    /// Emit a point as its two coordinates' limbs.
    fn emit_point(&mut self, p: &G);
    /// Emit a transcript's recorded items.
    fn emit_transcript(&mut self, t: &Transcript);
}
