//! Equalizer configuration
//!
//! Every option is fixed at initialization. The post-mix scale is not
//! configurable on its own: it is always the inverse of `headroom_shift`.

use std::path::Path;

use octeq_core::{EqError, EqResult, MAX_SHIFT};
use serde::{Deserialize, Serialize};

use crate::biquad::Precision;
use crate::coefficients::CoefficientTable;
use crate::gain::GainStage;
use crate::mixer::SummationPolicy;

/// Complete equalizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualizerConfig {
    /// Number of bands
    pub band_count: usize,

    /// Biquad stages per band
    pub stages_per_band: usize,

    /// Postshift the coefficient table was generated with
    pub postshift: u32,

    /// Samples per processing block
    pub block_size: usize,

    /// Pre-filter attenuation exponent (positive = divide by 2^n)
    pub headroom_shift: i32,

    /// Output gain of each band, applied before mixing
    pub band_gains: Vec<GainStage>,

    /// Output-state precision of each band (empty = all standard)
    #[serde(default)]
    pub band_precision: Vec<Precision>,

    /// Mixer summation policy
    #[serde(default)]
    pub summation: SummationPolicy,

    /// Coefficients for every band and stage
    pub coefficients: CoefficientTable,
}

impl EqualizerConfig {
    /// Configuration around an existing table, with unity band gains.
    pub fn from_table(coefficients: CoefficientTable, block_size: usize, headroom_shift: i32) -> Self {
        Self {
            band_count: coefficients.band_count,
            stages_per_band: coefficients.stages_per_band,
            postshift: coefficients.postshift,
            block_size,
            headroom_shift,
            band_gains: vec![GainStage::UNITY; coefficients.band_count],
            band_precision: Vec::new(),
            summation: SummationPolicy::default(),
            coefficients,
        }
    }

    /// Identity configuration: every stage passes, no headroom shift.
    pub fn identity(band_count: usize, stages_per_band: usize, block_size: usize) -> Self {
        Self::from_table(
            CoefficientTable::identity(band_count, stages_per_band),
            block_size,
            0,
        )
    }

    /// Set block size
    pub fn with_block_size(mut self, size: usize) -> Self {
        self.block_size = size;
        self
    }

    /// Set pre-filter headroom exponent
    pub fn with_headroom_shift(mut self, shift: i32) -> Self {
        self.headroom_shift = shift;
        self
    }

    /// Set one band's output gain
    pub fn with_band_gain(mut self, band: usize, gain: GainStage) -> EqResult<Self> {
        let bands = self.band_gains.len();
        let slot = self
            .band_gains
            .get_mut(band)
            .ok_or(EqError::BandIndex { index: band, bands })?;
        *slot = gain;
        Ok(self)
    }

    /// Set every band's precision
    pub fn with_precision(mut self, precision: Vec<Precision>) -> Self {
        self.band_precision = precision;
        self
    }

    /// Set the mixer summation policy
    pub fn with_summation(mut self, policy: SummationPolicy) -> Self {
        self.summation = policy;
        self
    }

    /// Pre-filter gain stage
    pub fn pre_scale(&self) -> GainStage {
        GainStage::shift_only(self.headroom_shift)
    }

    /// Post-mix gain stage, the exact inverse of [`pre_scale`](Self::pre_scale)
    pub fn post_scale(&self) -> GainStage {
        self.pre_scale().inverse_shift()
    }

    /// Precision of one band
    pub fn precision(&self, band: usize) -> Precision {
        self.band_precision.get(band).copied().unwrap_or_default()
    }

    /// Worst-case linear mix level relative to full scale, assuming each
    /// band's filter peaks at unity.
    ///
    /// Values above 1.0 mean the summed bands can clip before the post-scale.
    pub fn headroom_usage(&self) -> f64 {
        let band_sum: f64 = self.band_gains.iter().map(|g| g.linear().abs()).sum();
        band_sum * self.pre_scale().linear().abs()
    }

    /// Check every declared size and exponent against the table.
    pub fn validate(&self) -> EqResult<()> {
        if self.band_count == 0 {
            return Err(EqError::InvalidParam("band count must be at least 1".into()));
        }
        if self.stages_per_band == 0 {
            return Err(EqError::InvalidParam("stages per band must be at least 1".into()));
        }
        if self.block_size == 0 {
            return Err(EqError::InvalidParam("block size must be at least 1".into()));
        }
        if !(-MAX_SHIFT..=MAX_SHIFT).contains(&self.headroom_shift) {
            return Err(EqError::InvalidShift(self.headroom_shift));
        }

        let table = &self.coefficients;
        if table.band_count != self.band_count {
            return Err(EqError::BandCountMismatch {
                expected: self.band_count,
                actual: table.band_count,
            });
        }
        if table.stages_per_band != self.stages_per_band {
            return Err(EqError::StageCountMismatch {
                expected: self.stages_per_band,
                actual: table.stages_per_band,
            });
        }
        if table.postshift != self.postshift {
            return Err(EqError::PostshiftMismatch {
                expected: self.postshift,
                actual: table.postshift,
            });
        }
        table.validate()?;

        if self.band_gains.len() != self.band_count {
            return Err(EqError::LengthMismatch {
                what: "band_gains",
                expected: self.band_count,
                actual: self.band_gains.len(),
            });
        }
        for gain in &self.band_gains {
            gain.validate()?;
        }

        if !self.band_precision.is_empty() && self.band_precision.len() != self.band_count {
            return Err(EqError::LengthMismatch {
                what: "band_precision",
                expected: self.band_count,
                actual: self.band_precision.len(),
            });
        }

        Ok(())
    }

    // ── Persistence ─────────────────────────────────────────────────

    pub fn from_json_str(json: &str) -> EqResult<Self> {
        serde_json::from_str(json).map_err(|e| EqError::Serialization(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> EqResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EqError::Serialization(e.to_string()))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> EqResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn save_json_file<P: AsRef<Path>>(&self, path: P) -> EqResult<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}
