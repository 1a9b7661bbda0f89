//! Block-processing pipeline
//!
//! ```text
//! i16 ──► widen ──► pre-scale ──┬─► band 0 ─► gain ─┐
//!                               ├─► band 1 ─► gain ─┤
//!                               │       ...         ├─► mix ─► post-scale ─► narrow ──► i16
//!                               └─► band N ─► gain ─┘
//! ```
//!
//! A pipeline only exists once its configuration has been validated, so the
//! uninitialized state cannot be observed. All scratch memory is allocated in
//! [`EqualizerPipeline::initialize`]; processing never allocates.

use octeq_core::{EqResult, Q31, Sample, to_external_block, to_internal_block};

use crate::Processor;
use crate::band::Band;
use crate::bank::FilterBank;
use crate::config::EqualizerConfig;
use crate::gain::GainStage;
use crate::io::{BlockSink, BlockSource};
use crate::mixer::Mixer;

/// Ready-to-run equalizer
#[derive(Debug, Clone)]
pub struct EqualizerPipeline {
    config: EqualizerConfig,
    pre_scale: GainStage,
    post_scale: GainStage,
    bank: FilterBank,
    mixer: Mixer,
    /// Widened input, then the mixed result, for one block
    work: Vec<Q31>,
}

impl EqualizerPipeline {
    /// Validate `config`, build every band and zero all filter state.
    pub fn initialize(config: EqualizerConfig) -> EqResult<Self> {
        config.validate()?;

        let table = &config.coefficients;
        let shift = table.accumulator_shift();
        let bands = (0..config.band_count)
            .map(|b| -> EqResult<Band> {
                let stages = table.band(b)?;
                Ok(Band::new(
                    &stages,
                    shift,
                    config.precision(b),
                    config.band_gains[b],
                ))
            })
            .collect::<EqResult<Vec<_>>>()?;

        let usage = config.headroom_usage();
        if usage > 1.0 {
            log::warn!(
                "band gains with headroom shift {} can reach {:.2}x full scale before post-scale; mix will clip",
                config.headroom_shift,
                usage
            );
        }

        log::debug!(
            "equalizer ready: {} bands x {} stages, {:?} table, accumulator shift {}, block {}, headroom shift {}, {:?} summation",
            config.band_count,
            config.stages_per_band,
            table.format,
            shift,
            config.block_size,
            config.headroom_shift,
            config.summation
        );

        Ok(Self {
            pre_scale: config.pre_scale(),
            post_scale: config.post_scale(),
            bank: FilterBank::new(bands, config.block_size),
            mixer: Mixer::new(config.summation),
            work: vec![0; config.block_size],
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &EqualizerConfig {
        &self.config
    }

    #[inline]
    pub fn bank(&self) -> &FilterBank {
        &self.bank
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    /// True when no band carries any history.
    pub fn is_quiescent(&self) -> bool {
        self.bank.is_quiescent()
    }

    /// Run `len` samples already widened into `work` through scaling,
    /// the bank and the mixer. The mixed result replaces the input.
    fn filter_work(&mut self, len: usize) {
        let work = &mut self.work[..len];
        self.pre_scale.apply(work);
        let bands = self.bank.process(work);
        self.mixer.sum(bands, work);
        self.post_scale.apply(work);
    }

    /// Equalize `input` into `output`.
    ///
    /// Any length is accepted; input longer than the block size is handled
    /// in consecutive block-size chunks with filter state carried through.
    ///
    /// # Panics
    ///
    /// Panics if `input` and `output` have different lengths.
    pub fn process_block(&mut self, input: &[Sample], output: &mut [Sample]) {
        assert_eq!(input.len(), output.len(), "slice length mismatch");

        let block_size = self.block_size();
        for (src, dest) in input.chunks(block_size).zip(output.chunks_mut(block_size)) {
            let len = src.len();
            to_internal_block(src, &mut self.work[..len]);
            self.filter_work(len);
            to_external_block(&self.work[..len], dest);
        }
    }

    /// Equalize `block` in place.
    pub fn process_in_place(&mut self, block: &mut [Sample]) {
        let block_size = self.block_size();
        for chunk in block.chunks_mut(block_size) {
            let len = chunk.len();
            to_internal_block(chunk, &mut self.work[..len]);
            self.filter_work(len);
            to_external_block(&self.work[..len], chunk);
        }
    }

    /// One driver step: obtain a block, equalize it, hand it on.
    pub fn run_iteration<S, K>(&mut self, source: &mut S, sink: &mut K, buffer: &mut [Sample])
    where
        S: BlockSource + ?Sized,
        K: BlockSink + ?Sized,
    {
        source.obtain(buffer);
        self.process_in_place(buffer);
        sink.transfer(buffer);
    }
}

impl Processor for EqualizerPipeline {
    /// Drop all filter history; configuration is kept.
    fn reset(&mut self) {
        self.bank.reset();
        self.work.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{NullSink, NullSource};
    use crate::preset::octave_16k;

    #[test]
    fn test_identity_pipeline_passes_samples() {
        let config = EqualizerConfig::identity(1, 1, 4);
        let mut eq = EqualizerPipeline::initialize(config).unwrap();
        let mut out = [0; 4];
        eq.process_block(&[1, 2, 3, 4], &mut out);
        assert_eq!(out, [1, 2, 3, 4]);
    }

    #[test]
    fn test_identity_survives_headroom_round_trip() {
        let config = EqualizerConfig::identity(1, 3, 4).with_headroom_shift(3);
        let mut eq = EqualizerPipeline::initialize(config).unwrap();
        let mut block = [1, 2, 3, 4];
        eq.process_in_place(&mut block);
        assert_eq!(block, [1, 2, 3, 4]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = EqualizerConfig::identity(2, 2, 8);
        config.coefficients.values.pop();
        assert!(EqualizerPipeline::initialize(config).is_err());
    }

    #[test]
    fn test_chunked_matches_block_sized_calls() {
        let input: Vec<Sample> = (0..1000).map(|i| ((i * 7919) % 20_000 - 10_000) as Sample).collect();

        let mut whole = EqualizerPipeline::initialize(octave_16k()).unwrap();
        let mut expected = vec![0; input.len()];
        whole.process_block(&input, &mut expected);

        let mut manual = EqualizerPipeline::initialize(octave_16k()).unwrap();
        let mut actual = vec![0; input.len()];
        for (src, dest) in input.chunks(256).zip(actual.chunks_mut(256)) {
            manual.process_block(src, dest);
        }

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut eq = EqualizerPipeline::initialize(octave_16k()).unwrap();
        let input: Vec<Sample> = (0..256).map(|i| if i % 2 == 0 { 8000 } else { -8000 }).collect();

        let mut first = vec![0; 256];
        eq.process_block(&input, &mut first);
        assert!(!eq.is_quiescent());

        eq.reset();
        assert!(eq.is_quiescent());

        let mut second = vec![0; 256];
        eq.process_block(&input, &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn test_run_iteration_with_null_collaborators() {
        let mut eq = EqualizerPipeline::initialize(EqualizerConfig::identity(1, 1, 8)).unwrap();
        let mut buffer = [100; 8];
        eq.run_iteration(&mut NullSource, &mut NullSink, &mut buffer);
        assert_eq!(buffer, [100; 8]);
    }

    #[test]
    #[should_panic(expected = "slice length mismatch")]
    fn test_mismatched_output_panics() {
        let mut eq = EqualizerPipeline::initialize(EqualizerConfig::identity(1, 1, 8)).unwrap();
        let mut out = [0; 3];
        eq.process_block(&[1, 2, 3, 4], &mut out);
    }
}
