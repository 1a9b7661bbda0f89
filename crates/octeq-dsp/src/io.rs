//! Block acquisition and transfer collaborators
//!
//! The equalizer never talks to hardware or files. Whatever feeds it and
//! whatever consumes its output plugs in through these two traits. Both
//! default to doing nothing, and any closure with the matching signature
//! can stand in for either.

use octeq_core::Sample;

/// Fills a block of external samples before processing.
pub trait BlockSource {
    /// Overwrite `block` with the next input samples.
    ///
    /// The default leaves the buffer untouched.
    fn obtain(&mut self, block: &mut [Sample]) {
        let _ = block;
    }
}

/// Consumes a block of processed external samples.
pub trait BlockSink {
    /// Take the processed samples in `block`.
    ///
    /// The default discards them.
    fn transfer(&mut self, block: &[Sample]) {
        let _ = block;
    }
}

/// Source with no acquisition available
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSource;

impl BlockSource for NullSource {}

/// Sink that drops every block
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl BlockSink for NullSink {}

impl<F> BlockSource for F
where
    F: FnMut(&mut [Sample]),
{
    #[inline]
    fn obtain(&mut self, block: &mut [Sample]) {
        self(block)
    }
}

impl<F> BlockSink for F
where
    F: FnMut(&[Sample]),
{
    #[inline]
    fn transfer(&mut self, block: &[Sample]) {
        self(block)
    }
}
