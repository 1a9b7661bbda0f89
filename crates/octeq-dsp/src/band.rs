//! One equalizer band: a cascade of biquad sections plus an output gain

use octeq_core::Q31;

use crate::biquad::{BiquadCoefficients, BiquadSection, BiquadState, Precision};
use crate::gain::GainStage;
use crate::{MonoProcessor, Processor};

/// Cascade of second-order sections realizing an order `2 · stages` filter.
///
/// Stage `n` consumes the output of stage `n - 1`; each stage keeps its own
/// delay line across calls.
#[derive(Debug, Clone)]
pub struct Band {
    stages: Vec<BiquadSection>,
    gain: GainStage,
}

impl Band {
    /// Build a band from its stage coefficients (in cascade order).
    pub fn new(
        coeffs: &[BiquadCoefficients],
        shift: u32,
        precision: Precision,
        gain: GainStage,
    ) -> Self {
        Self {
            stages: coeffs
                .iter()
                .map(|c| BiquadSection::new(*c, shift, precision))
                .collect(),
            gain,
        }
    }

    #[inline]
    pub fn num_stages(&self) -> usize {
        self.stages.len()
    }

    #[inline]
    pub fn gain(&self) -> GainStage {
        self.gain
    }

    #[inline]
    pub fn stages(&self) -> &[BiquadSection] {
        &self.stages
    }

    /// Delay lines of every stage, in cascade order.
    pub fn states(&self) -> impl Iterator<Item = &BiquadState> + '_ {
        self.stages.iter().map(|s| s.state())
    }

    pub fn is_quiescent(&self) -> bool {
        self.states().all(BiquadState::is_zero)
    }

    /// Filter `input` through every stage into `output`, then apply the band gain.
    ///
    /// Runs stage-major: the first stage writes `output`, the following stages
    /// work on it in place.
    ///
    /// # Panics
    ///
    /// Panics if `input` and `output` have different lengths.
    pub fn process(&mut self, input: &[Q31], output: &mut [Q31]) {
        assert_eq!(input.len(), output.len(), "slice length mismatch");

        let Some((first, rest)) = self.stages.split_first_mut() else {
            output.copy_from_slice(input);
            self.gain.apply(output);
            return;
        };

        first.process(input, output);
        for stage in rest {
            stage.process_block(output);
        }
        self.gain.apply(output);
    }
}

impl Processor for Band {
    fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }
}

impl MonoProcessor for Band {
    #[inline]
    fn process_sample(&mut self, input: Q31) -> Q31 {
        let filtered = self
            .stages
            .iter_mut()
            .fold(input, |x, stage| stage.process_sample(x));
        self.gain.scale(filtered)
    }
}
