//! Saturating fixed-point arithmetic
//!
//! All helpers clamp instead of wrapping. They are the only places in the
//! workspace where a wide intermediate is narrowed.

use crate::{Acc, Q31};

/// Largest Q31 fraction (0x7FFF_FFFF, just below 1.0)
pub const Q31_ONE: Q31 = Q31::MAX;

/// Extra fractional bits carried by extended-precision output state
pub const EXTENDED_FRAC_BITS: u32 = 32;

/// Largest magnitude accepted for signed shift exponents
pub const MAX_SHIFT: i32 = 31;

/// Clamp a 64-bit value into Q31.
#[inline]
pub fn saturate_q31(value: Acc) -> Q31 {
    value.clamp(Q31::MIN as Acc, Q31::MAX as Acc) as Q31
}

/// Clamp a 128-bit value into 64 bits.
#[inline]
pub fn saturate_acc(value: i128) -> Acc {
    value.clamp(Acc::MIN as i128, Acc::MAX as i128) as Acc
}

/// Right shift with round-half-up, saturating the rounding bias.
#[inline]
pub fn round_shift(acc: Acc, shift: u32) -> Acc {
    if shift == 0 {
        return acc;
    }
    acc.saturating_add(1 << (shift - 1)) >> shift
}

/// 128-bit variant of [`round_shift`]; cannot overflow for shifts below 127.
#[inline]
pub fn round_shift_wide(acc: i128, shift: u32) -> i128 {
    if shift == 0 {
        return acc;
    }
    (acc + (1 << (shift - 1))) >> shift
}

/// Rounding Q31 × Q31 multiply.
///
/// With `fraction == Q31_ONE` the result equals `value` for `|value| < 2^30`.
#[inline]
pub fn mul_q31(value: Q31, fraction: Q31) -> Q31 {
    let product = Acc::from(value) * Acc::from(fraction);
    saturate_q31((product + (1 << 30)) >> 31)
}

/// Signed power-of-two scaling.
///
/// Positive `shift` attenuates (arithmetic right shift), negative `shift`
/// amplifies with saturation. `shift` is clamped to `-MAX_SHIFT..=MAX_SHIFT`.
#[inline]
pub fn shift_saturating(value: Q31, shift: i32) -> Q31 {
    let shift = shift.clamp(-MAX_SHIFT, MAX_SHIFT);
    if shift >= 0 {
        value >> shift
    } else {
        saturate_q31(Acc::from(value) << (-shift))
    }
}
