//! Flat coefficient tables
//!
//! A table is the versioned contract with the offline coefficient designer:
//! `bands × stages × [b0, b1, b2, a1, a2]`, band-major then stage-major, all
//! scaled by one postshift. Both sides must agree on band count, stage count
//! and postshift.

use octeq_core::{EqError, EqResult, Q31};
use serde::{Deserialize, Serialize};

use crate::biquad::BiquadCoefficients;

/// Coefficients per biquad stage
pub const COEFFS_PER_STAGE: usize = 5;

/// Largest accumulator shift accepted for `Integer` tables
pub const MAX_INTEGER_POSTSHIFT: u32 = 62;

/// Storage convention of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoefficientFormat {
    /// Values are `c · 2^postshift`; feedback stored as `a1, a2`
    #[default]
    Integer,
    /// Q31 fractions divided by `2^postshift`; feedback stored as `-a1, -a2`
    Q31,
}

/// Flat, immutable coefficient table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoefficientTable {
    #[serde(default)]
    pub format: CoefficientFormat,
    pub band_count: usize,
    pub stages_per_band: usize,
    pub postshift: u32,
    pub values: Vec<Q31>,
}

impl CoefficientTable {
    pub fn new(
        format: CoefficientFormat,
        band_count: usize,
        stages_per_band: usize,
        postshift: u32,
        values: Vec<Q31>,
    ) -> Self {
        Self {
            format,
            band_count,
            stages_per_band,
            postshift,
            values,
        }
    }

    /// Every stage passes its input unchanged (`b0 = 1` at postshift 0).
    pub fn identity(band_count: usize, stages_per_band: usize) -> Self {
        let values = (0..band_count * stages_per_band)
            .flat_map(|_| [1, 0, 0, 0, 0])
            .collect();
        Self::new(CoefficientFormat::Integer, band_count, stages_per_band, 0, values)
    }

    /// Expected number of values for the declared layout.
    #[inline]
    pub fn expected_len(&self) -> usize {
        self.band_count * self.stages_per_band * COEFFS_PER_STAGE
    }

    /// Right shift applied to the biquad accumulator.
    #[inline]
    pub fn accumulator_shift(&self) -> u32 {
        match self.format {
            CoefficientFormat::Integer => self.postshift,
            CoefficientFormat::Q31 => 31 - self.postshift.min(31),
        }
    }

    /// Check layout and postshift, and that every stage normalizes.
    pub fn validate(&self) -> EqResult<()> {
        let max = match self.format {
            CoefficientFormat::Integer => MAX_INTEGER_POSTSHIFT,
            CoefficientFormat::Q31 => 31,
        };
        if self.postshift > max {
            return Err(EqError::InvalidPostshift {
                postshift: self.postshift,
                max,
            });
        }

        if self.values.len() != self.expected_len() {
            return Err(EqError::CoefficientTableLength {
                expected: self.expected_len(),
                actual: self.values.len(),
                bands: self.band_count,
                stages: self.stages_per_band,
            });
        }

        for band in 0..self.band_count {
            for stage in 0..self.stages_per_band {
                self.stage(band, stage)?;
            }
        }
        Ok(())
    }

    fn raw(&self, band: usize, stage: usize) -> EqResult<[Q31; COEFFS_PER_STAGE]> {
        if band >= self.band_count {
            return Err(EqError::BandIndex {
                index: band,
                bands: self.band_count,
            });
        }
        if stage >= self.stages_per_band {
            return Err(EqError::StageIndex {
                index: stage,
                stages: self.stages_per_band,
            });
        }
        let start = (band * self.stages_per_band + stage) * COEFFS_PER_STAGE;
        self.values
            .get(start..start + COEFFS_PER_STAGE)
            .and_then(|row| <[Q31; COEFFS_PER_STAGE]>::try_from(row).ok())
            .ok_or_else(|| EqError::CoefficientTableLength {
                expected: self.expected_len(),
                actual: self.values.len(),
                bands: self.band_count,
                stages: self.stages_per_band,
            })
    }

    /// Coefficients of `(band, stage)` in the canonical integer convention.
    pub fn stage(&self, band: usize, stage: usize) -> EqResult<BiquadCoefficients> {
        let [b0, b1, b2, a1, a2] = self.raw(band, stage)?;

        match self.format {
            CoefficientFormat::Integer => Ok(BiquadCoefficients::new(b0, b1, b2, a1, a2)),
            CoefficientFormat::Q31 => {
                let overflow = || EqError::CoefficientOverflow { band, stage };
                Ok(BiquadCoefficients::new(
                    b0,
                    b1,
                    b2,
                    a1.checked_neg().ok_or_else(overflow)?,
                    a2.checked_neg().ok_or_else(overflow)?,
                ))
            }
        }
    }

    /// All stages of one band, in cascade order.
    pub fn band(&self, band: usize) -> EqResult<Vec<BiquadCoefficients>> {
        (0..self.stages_per_band)
            .map(|stage| self.stage(band, stage))
            .collect()
    }
}
