//! Fixed-point biquad section using Direct Form I
//!
//! DF-I keeps the raw input and output history (four values per section)
//! and has a single rounding point per sample. With quantized coefficients
//! this keeps the section stable where DF-II would overflow its internal
//! node.

use octeq_core::{
    Acc, EXTENDED_FRAC_BITS, Q31, round_shift, round_shift_wide, saturate_acc, saturate_q31,
};
use serde::{Deserialize, Serialize};

use crate::{MonoProcessor, Processor};

/// Biquad coefficients in the canonical integer convention.
///
/// `y = (b0·x + b1·x1 + b2·x2 − a1·y1 − a2·y2) >> shift`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BiquadCoefficients {
    pub b0: Q31,
    pub b1: Q31,
    pub b2: Q31,
    pub a1: Q31,
    pub a2: Q31,
}

impl BiquadCoefficients {
    pub const fn new(b0: Q31, b1: Q31, b2: Q31, a1: Q31, a2: Q31) -> Self {
        Self { b0, b1, b2, a1, a2 }
    }

    /// Pass-through at the given accumulator shift (`shift < 31`).
    pub const fn identity(shift: u32) -> Self {
        Self::new(1 << shift, 0, 0, 0, 0)
    }
}

/// Output-state precision of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// 32-bit output history, 64-bit accumulator
    #[default]
    Standard,
    /// Output history with 32 extra fractional bits, 128-bit accumulator
    Extended,
}

/// Delay line of one section: last two inputs and last two outputs.
///
/// In [`Precision::Extended`] the outputs carry [`EXTENDED_FRAC_BITS`] extra
/// fractional bits; in [`Precision::Standard`] they are plain Q31 values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BiquadState {
    pub x1: Q31,
    pub x2: Q31,
    pub y1: Acc,
    pub y2: Acc,
}

impl BiquadState {
    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// One second-order section: immutable coefficients plus its own state
#[derive(Debug, Clone)]
pub struct BiquadSection {
    coeffs: BiquadCoefficients,
    shift: u32,
    precision: Precision,
    state: BiquadState,
}

impl BiquadSection {
    pub fn new(coeffs: BiquadCoefficients, shift: u32, precision: Precision) -> Self {
        Self {
            coeffs,
            shift,
            precision,
            state: BiquadState::default(),
        }
    }

    #[inline]
    pub fn coeffs(&self) -> &BiquadCoefficients {
        &self.coeffs
    }

    #[inline]
    pub fn shift(&self) -> u32 {
        self.shift
    }

    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    #[inline]
    pub fn state(&self) -> &BiquadState {
        &self.state
    }

    #[inline(always)]
    fn tick_standard(&mut self, x: Q31) -> Q31 {
        let c = &self.coeffs;
        let s = &mut self.state;

        let acc = (Acc::from(c.b0) * Acc::from(x))
            .saturating_add(Acc::from(c.b1) * Acc::from(s.x1))
            .saturating_add(Acc::from(c.b2) * Acc::from(s.x2))
            .saturating_sub(Acc::from(c.a1) * s.y1)
            .saturating_sub(Acc::from(c.a2) * s.y2);
        let y = saturate_q31(round_shift(acc, self.shift));

        s.x2 = s.x1;
        s.x1 = x;
        s.y2 = s.y1;
        s.y1 = Acc::from(y);
        y
    }

    #[inline(always)]
    fn tick_extended(&mut self, x: Q31) -> Q31 {
        let c = &self.coeffs;
        let s = &mut self.state;

        let feedforward = i128::from(c.b0) * i128::from(x)
            + i128::from(c.b1) * i128::from(s.x1)
            + i128::from(c.b2) * i128::from(s.x2);
        let acc = (feedforward << EXTENDED_FRAC_BITS)
            - i128::from(c.a1) * i128::from(s.y1)
            - i128::from(c.a2) * i128::from(s.y2);
        let y_wide = saturate_acc(round_shift_wide(acc, self.shift));

        s.x2 = s.x1;
        s.x1 = x;
        s.y2 = s.y1;
        s.y1 = y_wide;
        // Always within Q31 after dropping the extra fraction bits
        round_shift(y_wide, EXTENDED_FRAC_BITS) as Q31
    }

    /// Filter `input` into `output`, sample by sample.
    ///
    /// # Panics
    ///
    /// Panics if `input` and `output` have different lengths.
    pub fn process(&mut self, input: &[Q31], output: &mut [Q31]) {
        assert_eq!(input.len(), output.len(), "slice length mismatch");
        for (y, &x) in output.iter_mut().zip(input) {
            *y = self.process_sample(x);
        }
    }
}

impl Processor for BiquadSection {
    fn reset(&mut self) {
        self.state = BiquadState::default();
    }
}

impl MonoProcessor for BiquadSection {
    #[inline(always)]
    fn process_sample(&mut self, input: Q31) -> Q31 {
        match self.precision {
            Precision::Standard => self.tick_standard(input),
            Precision::Extended => self.tick_extended(input),
        }
    }
}
