//! Filter bank: independent bands fed from the same input block

use octeq_core::{EqError, EqResult, Q31};

use crate::Processor;
use crate::band::Band;

/// Ordered set of bands, each with its own output buffer.
///
/// Output buffers are sized once to the block size and reused for every
/// call.
#[derive(Debug, Clone)]
pub struct FilterBank {
    bands: Vec<Band>,
    outputs: Vec<Vec<Q31>>,
    block_size: usize,
}

impl FilterBank {
    pub fn new(bands: Vec<Band>, block_size: usize) -> Self {
        let outputs = vec![vec![0; block_size]; bands.len()];
        Self {
            bands,
            outputs,
            block_size,
        }
    }

    #[inline]
    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn band(&self, index: usize) -> Option<&Band> {
        self.bands.get(index)
    }

    /// Per-band output buffers. Only the prefix written by the last
    /// [`process`](Self::process) call is meaningful.
    #[inline]
    pub fn outputs(&self) -> &[Vec<Q31>] {
        &self.outputs
    }

    /// Filter one block through every band.
    ///
    /// Every band reads the same `input`; results land in
    /// `outputs()[band][..input.len()]`.
    ///
    /// # Panics
    ///
    /// Panics if `input` is longer than the block size.
    pub fn process(&mut self, input: &[Q31]) -> &[Vec<Q31>] {
        assert!(
            input.len() <= self.block_size,
            "block of {} samples exceeds block size {}",
            input.len(),
            self.block_size
        );

        let len = input.len();
        for (band, output) in self.bands.iter_mut().zip(&mut self.outputs) {
            band.process(input, &mut output[..len]);
        }
        &self.outputs
    }

    /// Zero the delay lines of one band only.
    pub fn reset_band(&mut self, index: usize) -> EqResult<()> {
        let bands = self.bands.len();
        let band = self
            .bands
            .get_mut(index)
            .ok_or(EqError::BandIndex { index, bands })?;
        band.reset();
        Ok(())
    }

    /// True when every delay line of every band is zero.
    pub fn is_quiescent(&self) -> bool {
        self.bands.iter().all(Band::is_quiescent)
    }
}

impl Processor for FilterBank {
    fn reset(&mut self) {
        for band in &mut self.bands {
            band.reset();
        }
        for output in &mut self.outputs {
            output.fill(0);
        }
    }
}
