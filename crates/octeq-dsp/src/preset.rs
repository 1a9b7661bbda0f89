//! Bundled coefficient preset
//!
//! Six octave bands covering 70 Hz to 4.5 kHz at a 16 kHz sample rate.
//! Each band is a 6th-order Butterworth bandpass split into three
//! sections, stored in Q31 format with postshift 4.

use octeq_core::Q31;

use crate::biquad::Precision;
use crate::coefficients::{CoefficientFormat, CoefficientTable};
use crate::config::EqualizerConfig;

pub const OCTAVE_16K_BANDS: usize = 6;
pub const OCTAVE_16K_STAGES: usize = 3;
pub const OCTAVE_16K_POSTSHIFT: u32 = 4;
pub const OCTAVE_16K_BLOCK_SIZE: usize = 256;
pub const OCTAVE_16K_HEADROOM_SHIFT: i32 = 3;

/// Sample rate the preset was designed for
pub const OCTAVE_16K_SAMPLE_RATE: u32 = 16_000;

/// Band edges in Hz; band `n` spans `[edges[n], edges[n + 1]]`
pub const OCTAVE_16K_EDGES_HZ: [f64; OCTAVE_16K_BANDS + 1] =
    [70.7, 141.4, 282.8, 565.7, 1131.4, 2262.7, 4525.5];

/// Bands below this index have poles close to the unit circle and run in
/// extended precision.
const OCTAVE_16K_EXTENDED_BANDS: usize = 3;

#[rustfmt::skip]
pub const OCTAVE_16K_Q31: [Q31; OCTAVE_16K_BANDS * OCTAVE_16K_STAGES * 5] = [
    // 70.7 - 141.4 Hz
    349, 699, 349, 264_555_182, -130_541_587,
    134_217_728, -67, -134_219_283, 265_663_083, -131_823_456,
    134_217_728, -268_434_645, 134_216_917, 267_019_266, -132_913_256,
    // 141.4 - 282.8 Hz
    2_721, 5_441, 2_721, 260_375_768, -126_963_381,
    134_217_728, -67, -134_219_283, 262_193_941, -129_474_301,
    134_217_728, -268_434_645, 134_216_917, 265_393_561, -131_620_459,
    // 282.8 - 565.7 Hz
    20_635, 41_271, 20_635, 251_164_150, -120_080_476,
    134_217_728, -67, -134_219_283, 253_261_157, -124_917_151,
    134_217_728, -268_434_645, 134_216_917, 261_522_959, -129_065_288,
    // 565.7 - 1131.4 Hz
    149_046, 298_092, 149_046, 229_631_975, -107_282_897,
    134_217_728, -67, -134_219_283, 228_128_773, -116_401_482,
    134_217_728, -268_434_645, 134_216_917, 251_380_082, -124_047_183,
    // 1131.4 - 2262.7 Hz
    988_093, 1_976_186, 988_093, 176_457_518, -84_757_405,
    134_217_728, 0, -134_217_728, 154_862_258, -101_974_490,
    134_217_728, -268_435_456, 134_217_728, 222_216_381, -114_157_820,
    // 2262.7 - 4525.5 Hz
    5_760_975, 0, -5_760_975, 47_472_643, -47_645_430,
    134_217_728, 268_435_456, 134_217_728, -34_439_088, -85_267_947,
    134_217_728, -268_435_456, 134_217_728, 136_338_823, -93_133_606,
];

/// Coefficient table of the bundled preset.
pub fn octave_16k_table() -> CoefficientTable {
    CoefficientTable::new(
        CoefficientFormat::Q31,
        OCTAVE_16K_BANDS,
        OCTAVE_16K_STAGES,
        OCTAVE_16K_POSTSHIFT,
        OCTAVE_16K_Q31.to_vec(),
    )
}

/// Full configuration for the bundled preset: unity band gains, 3 bits of
/// headroom, extended precision on the three lowest bands.
pub fn octave_16k() -> EqualizerConfig {
    let precision = (0..OCTAVE_16K_BANDS)
        .map(|band| {
            if band < OCTAVE_16K_EXTENDED_BANDS {
                Precision::Extended
            } else {
                Precision::Standard
            }
        })
        .collect();

    EqualizerConfig::from_table(
        octave_16k_table(),
        OCTAVE_16K_BLOCK_SIZE,
        OCTAVE_16K_HEADROOM_SHIFT,
    )
    .with_precision(precision)
}

impl Default for EqualizerConfig {
    fn default() -> Self {
        octave_16k()
    }
}
