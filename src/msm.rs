//! Pippenger multi-scalar multiplication.
//!
//! Every multi-scalar multiplication in this crate — both sides of the
//! Protocol 2 verification equation, and nowhere else in production code —
//! goes through [`pippenger`]. The windowed bucket algorithm below is a
//! direct implementation of the classic technique: split each scalar into
//! `w`-bit windows, accumulate points into `2^w - 1` buckets per window by
//! their window digit, fold each window's buckets into a running sum via
//! the standard running-tail trick, then combine windows by repeated
//! doubling.

use crate::curve::G;
use crate::error::Error;
use crate::field::Fq;

/// Tuning knobs for [`pippenger`]. The only knob exposed today is the
/// window width; `None` asks for the size-derived default from §4.3.
#[derive(Clone, Copy, Debug, Default)]
pub struct PippengerConfig {
    /// Force a specific window width, overriding the size-derived default.
    pub window_bits: Option<u32>,
}

/// `Σ scalars[i] * points[i]`.
///
/// Empty input returns the identity. `scalars.len() != points.len()` is
/// [`Error::BadLength`]. All scalars must share one modulus; the first
/// scalar's modulus is taken as authoritative and the rest are checked
/// against it via the normal `Fq` arithmetic.
pub fn pippenger(scalars: &[Fq], points: &[G], config: PippengerConfig) -> Result<G, Error> {
    pippenger_cancellable(scalars, points, config, None)
}

/// Same contract as [`pippenger`], additionally checking `cancel` at each
/// window boundary and failing with [`Error::Cancelled`] the first time it
/// returns `true`.
pub fn pippenger_cancellable(
    scalars: &[Fq],
    points: &[G],
    config: PippengerConfig,
    cancel: Option<&dyn Fn() -> bool>,
) -> Result<G, Error> {
    if scalars.len() != points.len() {
        return Err(Error::BadLength {
            expected: points.len(),
            got: scalars.len(),
        });
    }
    if scalars.is_empty() {
        return Ok(G::identity());
    }

    let modulus = scalars[0].modulus().clone();
    for s in &scalars[1..] {
        if s.modulus() != &modulus {
            return Err(Error::ModulusMismatch(
                modulus.to_str_radix(16),
                s.modulus().to_str_radix(16),
            ));
        }
    }

    let k = scalars.len();
    let w = config.window_bits.unwrap_or_else(|| default_window_bits(k));
    let bit_len = modulus.bits().max(1) as u32;
    let num_windows = ((bit_len + w - 1) / w).max(1);
    let num_buckets = (1usize << w) - 1;

    let mut digits: Vec<Vec<u32>> = Vec::with_capacity(k);
    for s in scalars {
        digits.push(window_digits(s, w, num_windows));
    }

    let mut acc = G::identity();
    for window in (0..num_windows).rev() {
        if let Some(f) = cancel {
            if f() {
                return Err(Error::Cancelled);
            }
        }
        for _ in 0..w {
            acc = acc.add(&acc);
        }
        let mut buckets = vec![G::identity(); num_buckets];
        for (i, point) in points.iter().enumerate() {
            let digit = digits[i][window as usize];
            if digit != 0 {
                buckets[(digit - 1) as usize] = buckets[(digit - 1) as usize].add(point);
            }
        }
        let mut running = G::identity();
        let mut window_sum = G::identity();
        for bucket in buckets.iter().rev() {
            running = running.add(bucket);
            window_sum = window_sum.add(&running);
        }
        acc = acc.add(&window_sum);
    }
    Ok(acc)
}

/// `w ≈ ⌈log2 k⌉ − 2`, floored at 2.
fn default_window_bits(k: usize) -> u32 {
    let log2_k = (usize::BITS - k.max(1).leading_zeros()) as u32;
    log2_k.saturating_sub(2).max(2)
}

/// Split `scalar`'s big-endian value into `num_windows` base-`2^w` digits,
/// least-significant window first.
fn window_digits(scalar: &Fq, w: u32, num_windows: u32) -> Vec<u32> {
    let value = scalar.value();
    let mask = (1u64 << w) - 1;
    let mut digits = Vec::with_capacity(num_windows as usize);
    for window in 0..num_windows {
        let shift = (window * w) as usize;
        let digit = ((value >> shift) & num_bigint::BigUint::from(mask))
            .iter_u32_digits()
            .next()
            .unwrap_or(0);
        digits.push(digit);
    }
    digits
}

#[cfg(test)]
fn naive(scalars: &[Fq], points: &[G]) -> G {
    let mut acc = G::identity();
    for (s, p) in scalars.iter().zip(points.iter()) {
        acc = acc.add(&G::scalar_mul(s, p));
    }
    acc
}
