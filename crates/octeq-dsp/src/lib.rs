//! octeq-dsp: fixed-point multi-band equalizer
//!
//! Integer-only audio path for targets without a floating-point unit.
//!
//! ## Modules
//! - `biquad` - DF-I second-order sections (standard and extended precision)
//! - `band` - cascade of sections plus an output gain
//! - `bank` - independent bands sharing one input block
//! - `gain` - fractional multiply plus power-of-two shift
//! - `mixer` - saturating band summation
//! - `coefficients` - flat coefficient tables from the offline designer
//! - `config` - validated equalizer configuration (JSON persistence)
//! - `preset` - bundled 6-band octave table for 16 kHz
//! - `io` - block acquisition and transfer collaborators
//! - `pipeline` - widen, pre-scale, filter, mix, post-scale, narrow

pub mod band;
pub mod bank;
pub mod biquad;
pub mod coefficients;
pub mod config;
pub mod gain;
pub mod io;
pub mod mixer;
pub mod pipeline;
pub mod preset;

pub use band::Band;
pub use bank::FilterBank;
pub use biquad::{BiquadCoefficients, BiquadSection, BiquadState, Precision};
pub use coefficients::{COEFFS_PER_STAGE, CoefficientFormat, CoefficientTable};
pub use config::EqualizerConfig;
pub use gain::GainStage;
pub use io::{BlockSink, BlockSource, NullSink, NullSource};
pub use mixer::{Mixer, SummationPolicy};
pub use pipeline::EqualizerPipeline;

use octeq_core::Q31;

/// Trait for all stateful processors
pub trait Processor: Send + Sync {
    /// Zero all delay lines
    fn reset(&mut self);

    /// Get latency in samples
    fn latency(&self) -> usize {
        0
    }
}

/// Single-channel Q31 processor
pub trait MonoProcessor: Processor {
    /// Process a single sample
    fn process_sample(&mut self, input: Q31) -> Q31;

    /// Process a block of samples in place
    fn process_block(&mut self, buffer: &mut [Q31]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}
