//! Fixed-point gain stage: fractional multiply followed by a signed shift

use octeq_core::{EqError, EqResult, MAX_SHIFT, Q31, Q31_ONE, mul_q31, shift_saturating};
use serde::{Deserialize, Serialize};

/// Gain expressed as `multiplier / 2^31 · 2^-shift`.
///
/// `multiplier` is a Q31 fraction in `[-1, 1)`. A positive `shift`
/// attenuates by powers of two, a negative one amplifies with saturation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GainStage {
    pub multiplier: Q31,
    pub shift: i32,
}

impl Default for GainStage {
    fn default() -> Self {
        Self::UNITY
    }
}

impl GainStage {
    pub const UNITY: Self = Self {
        multiplier: Q31_ONE,
        shift: 0,
    };

    pub const fn new(multiplier: Q31, shift: i32) -> Self {
        Self { multiplier, shift }
    }

    /// Pure power-of-two scaling by `2^-shift`.
    pub const fn shift_only(shift: i32) -> Self {
        Self::new(Q31_ONE, shift)
    }

    /// Closest representable gain to a linear factor.
    ///
    /// The multiplier is normalized into `[0.5, 1)` so that the fraction
    /// keeps full resolution; the remaining factor becomes the shift.
    /// Exact powers of two map to [`Self::shift_only`], so `from_linear(1.0)`
    /// is [`Self::UNITY`].
    pub fn from_linear(gain: f64) -> EqResult<Self> {
        if !gain.is_finite() {
            return Err(EqError::InvalidParam(format!("gain {gain} is not finite")));
        }
        if gain == 0.0 {
            return Ok(Self::new(0, 0));
        }

        let magnitude = gain.abs();
        // magnitude = m · 2^e with m in [0.5, 1)
        let exponent = magnitude.log2().floor() as i32 + 1;
        let mantissa = magnitude / 2f64.powi(exponent);
        let (scaled, shift) = if mantissa == 0.5 {
            (Q31_ONE, 1 - exponent)
        } else {
            let scaled = (mantissa * 2f64.powi(31)).round().min(Q31::MAX as f64) as Q31;
            (scaled, -exponent)
        };
        if !(-MAX_SHIFT..=MAX_SHIFT).contains(&shift) {
            return Err(EqError::InvalidShift(shift));
        }

        let multiplier = if gain < 0.0 { -scaled } else { scaled };
        Ok(Self::new(multiplier, shift))
    }

    /// Gain from decibels.
    pub fn from_db(db: f64) -> EqResult<Self> {
        Self::from_linear(10f64.powf(db / 20.0))
    }

    /// Linear factor this stage applies (ignoring rounding).
    pub fn linear(&self) -> f64 {
        let fraction = if self.multiplier == Q31_ONE {
            1.0
        } else {
            self.multiplier as f64 / 2f64.powi(31)
        };
        fraction * 2f64.powi(-self.shift)
    }

    /// Check that the shift is within `-31..=31`.
    pub fn validate(&self) -> EqResult<()> {
        if (-MAX_SHIFT..=MAX_SHIFT).contains(&self.shift) {
            Ok(())
        } else {
            Err(EqError::InvalidShift(self.shift))
        }
    }

    /// Inverse power-of-two scaling (same multiplier, negated shift).
    pub const fn inverse_shift(&self) -> Self {
        Self::new(self.multiplier, -self.shift)
    }

    /// Scale one sample. A multiplier of [`Q31_ONE`] stands for exactly 1.0.
    #[inline(always)]
    pub fn scale(&self, sample: Q31) -> Q31 {
        let product = if self.multiplier == Q31_ONE {
            sample
        } else {
            mul_q31(sample, self.multiplier)
        };
        shift_saturating(product, self.shift)
    }

    /// Scale a block in place.
    pub fn apply(&self, block: &mut [Q31]) {
        for sample in block.iter_mut() {
            *sample = self.scale(*sample);
        }
    }
}
