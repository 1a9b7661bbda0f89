//! Band summation

use octeq_core::{Acc, Q31, saturate_q31};
use serde::{Deserialize, Serialize};

/// How band outputs are added together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummationPolicy {
    /// Accumulate in 64 bits, saturate once at the end
    #[default]
    WideAccumulator,
    /// Saturate after every pairwise addition, in band order
    Saturating,
}

/// Element-wise sum of the per-band blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct Mixer {
    policy: SummationPolicy,
}

impl Mixer {
    pub fn new(policy: SummationPolicy) -> Self {
        Self { policy }
    }

    #[inline]
    pub fn policy(&self) -> SummationPolicy {
        self.policy
    }

    /// Sum `blocks` sample-wise into `output`, left to right in band order.
    ///
    /// Only the first `output.len()` samples of each block are read. With no
    /// blocks the output is silence.
    ///
    /// # Panics
    ///
    /// Panics if a block is shorter than `output`.
    pub fn sum<B: AsRef<[Q31]>>(&self, blocks: &[B], output: &mut [Q31]) {
        let len = output.len();
        for block in blocks {
            assert!(block.as_ref().len() >= len, "band block shorter than output");
        }

        match self.policy {
            SummationPolicy::WideAccumulator => {
                for (i, out) in output.iter_mut().enumerate() {
                    let acc: Acc = blocks.iter().map(|b| Acc::from(b.as_ref()[i])).sum();
                    *out = saturate_q31(acc);
                }
            }
            SummationPolicy::Saturating => {
                for (i, out) in output.iter_mut().enumerate() {
                    *out = blocks
                        .iter()
                        .fold(0, |acc: Q31, b| acc.saturating_add(b.as_ref()[i]));
                }
            }
        }
    }
}
