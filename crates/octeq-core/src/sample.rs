//! Sample types and the narrow/wide format conversions
//!
//! | Name   | Type  | Meaning                                      |
//! |--------|-------|----------------------------------------------|
//! | Sample | `i16` | external PCM sample, Q15                     |
//! | Q31    | `i32` | internal filter-domain sample, Q31           |
//! | Acc    | `i64` | multiply-accumulate register for Q31 × Q31   |

/// External (narrow) sample format
pub type Sample = i16;

/// Internal (wide) fixed-point sample format
pub type Q31 = i32;

/// Wide accumulator for products of two Q31 values
pub type Acc = i64;

/// Bit-width difference between [`Q31`] and [`Sample`]
pub const WIDEN_SHIFT: u32 = Q31::BITS - Sample::BITS;

// ── Scalar conversions ──────────────────────────────────────────────

/// Widen a Q15 sample into Q31. Lossless.
#[inline]
pub fn to_internal(sample: Sample) -> Q31 {
    Q31::from(sample) << WIDEN_SHIFT
}

/// Narrow a Q31 value to Q15, keeping the most significant bits.
///
/// Truncates toward negative infinity and clamps to the `i16` range.
#[inline]
pub fn to_external(value: Q31) -> Sample {
    let narrowed = value >> WIDEN_SHIFT;
    narrowed.clamp(Sample::MIN as Q31, Sample::MAX as Q31) as Sample
}

// ── Slice conversions ───────────────────────────────────────────────

/// Widen a block of samples into `dest`.
///
/// # Panics
///
/// Panics if `src` and `dest` have different lengths.
pub fn to_internal_block(src: &[Sample], dest: &mut [Q31]) {
    assert_eq!(src.len(), dest.len(), "slice length mismatch");
    for (d, &s) in dest.iter_mut().zip(src) {
        *d = to_internal(s);
    }
}

/// Narrow a block of Q31 values into `dest`.
///
/// # Panics
///
/// Panics if `src` and `dest` have different lengths.
pub fn to_external_block(src: &[Q31], dest: &mut [Sample]) {
    assert_eq!(src.len(), dest.len(), "slice length mismatch");
    for (d, &s) in dest.iter_mut().zip(src) {
        *d = to_external(s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_every_sample() {
        for s in Sample::MIN..=Sample::MAX {
            assert_eq!(to_external(to_internal(s)), s, "round trip failed for {s}");
        }
    }

    #[test]
    fn test_widening_shift() {
        assert_eq!(WIDEN_SHIFT, 16);
        assert_eq!(to_internal(1), 0x0001_0000);
        assert_eq!(to_internal(-1), -0x0001_0000);
        assert_eq!(to_internal(Sample::MAX), 0x7FFF_0000);
        assert_eq!(to_internal(Sample::MIN), Q31::MIN);
    }

    #[test]
    fn test_narrowing_truncates_low_bits() {
        assert_eq!(to_external(0x0001_FFFF), 1);
        // Arithmetic shift rounds toward negative infinity
        assert_eq!(to_external(-1), -1);
        assert_eq!(to_external(Q31::MAX), Sample::MAX);
        assert_eq!(to_external(Q31::MIN), Sample::MIN);
    }

    #[test]
    fn test_block_conversion() {
        let src = [0i16, 1, -2, 300, Sample::MIN];
        let mut wide = [0; 5];
        let mut back = [0i16; 5];
        to_internal_block(&src, &mut wide);
        to_external_block(&wide, &mut back);
        assert_eq!(src, back);
        assert_eq!(wide[3], 300 << 16);
    }

    #[test]
    #[should_panic(expected = "slice length mismatch")]
    fn test_block_length_mismatch_panics() {
        let mut dest = [0; 2];
        to_internal_block(&[1, 2, 3], &mut dest);
    }
}
