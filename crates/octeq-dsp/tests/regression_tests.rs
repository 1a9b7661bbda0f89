//! Equalizer Regression Test Suite
//!
//! Bit-exact impulse responses of the bundled preset. Any change to the
//! arithmetic (rounding, saturation, accumulation order) shows up here.

use octeq_core::{Q31, Sample};
use octeq_dsp::preset::{octave_16k, octave_16k_table};
use octeq_dsp::{Band, EqualizerPipeline, GainStage, MonoProcessor, Precision, Processor};

// ============================================================================
// TEST UTILITIES
// ============================================================================

const IMPULSE_Q31: Q31 = 1 << 27;

fn generate_impulse<T: Copy + Default>(num_samples: usize, amplitude: T) -> Vec<T> {
    let mut signal = vec![T::default(); num_samples];
    if !signal.is_empty() {
        signal[0] = amplitude;
    }
    signal
}

fn preset_band(index: usize, precision: Precision) -> Band {
    let table = octave_16k_table();
    Band::new(
        &table.band(index).unwrap(),
        table.accumulator_shift(),
        precision,
        GainStage::UNITY,
    )
}

fn band_impulse_response(band: &mut Band, len: usize) -> Vec<Q31> {
    let input = generate_impulse(len, IMPULSE_Q31);
    let mut output = vec![0; len];
    band.process(&input, &mut output);
    output
}

// ============================================================================
// GOLDEN VECTORS
// ============================================================================

/// 565.7-1131.4 Hz band, standard precision
const BAND4_IMPULSE: [Q31; 24] = [
    149_046, 787_487, 1_941_912, 3_070_057, 3_525_885, 2_932_912, 1_244_949, -1_273_082,
    -4_129_229, -6_728_352, -8_506_500, -9_048_357, -8_166_803, -5_933_122, -2_656_729, 1_177_390,
    4_998_588, 8_249_562, 10_476_445, 11_395_348, 10_926_232, 9_191_443, 6_482_446, 3_203_201,
];

/// 70.7-141.4 Hz band, extended precision
const BAND1_IMPULSE: [Q31; 24] = [
    349, 2_074, 6_138, 12_738, 21_696, 32_828, 45_944, 60_850, 77_347, 95_238, 114_320, 134_393,
    155_253, 176_701, 198_537, 220_565, 242_592, 264_428, 285_892, 306_804, 326_990, 346_286,
    364_531, 381_575,
];

/// Full preset, half-scale i16 impulse
const PIPELINE_IMPULSE: [Sample; 48] = [
    844, 1392, -1402, -2574, 2333, 3852, -2114, -4749, -211, 3388, 2605, 1004, -290, -2166, -3127,
    -1916, -13, 1098, 1592, 1746, 1410, 863, 533, 305, -107, -644, -1116, -1451, -1572, -1401,
    -1001, -530, -92, 276, 548, 722, 823, 866, 847, 772, 662, 540, 423, 327, 252, 189, 121, 38,
];

// ============================================================================
// BAND IMPULSE RESPONSES
// ============================================================================

#[test]
fn test_band4_standard_impulse_response() {
    let mut band = preset_band(3, Precision::Standard);
    assert_eq!(band_impulse_response(&mut band, 24), BAND4_IMPULSE);
}

#[test]
fn test_band1_extended_impulse_response() {
    let mut band = preset_band(0, Precision::Extended);
    assert_eq!(band_impulse_response(&mut band, 24), BAND1_IMPULSE);
}

#[test]
fn test_impulse_response_repeats_after_reset() {
    for (index, precision) in [(0, Precision::Extended), (5, Precision::Standard)] {
        let mut band = preset_band(index, precision);
        let first = band_impulse_response(&mut band, 512);
        band.reset();
        let second = band_impulse_response(&mut band, 512);
        assert_eq!(first, second, "band {index}");
    }
}

#[test]
fn test_sample_and_block_responses_identical() {
    let mut by_block = preset_band(3, Precision::Standard);
    let mut by_sample = preset_band(3, Precision::Standard);

    let block = band_impulse_response(&mut by_block, 24);
    let samples: Vec<Q31> = generate_impulse(24, IMPULSE_Q31)
        .into_iter()
        .map(|x| by_sample.process_sample(x))
        .collect();

    assert_eq!(block, samples);
}

#[test]
fn test_impulse_response_decays() {
    // All preset bands are stable: the ringdown dies out well within a second
    for index in 0..6 {
        let mut band = preset_band(index, Precision::Extended);
        let response = band_impulse_response(&mut band, 16_000);
        let tail_peak = response[15_000..].iter().map(|x| x.unsigned_abs()).max().unwrap();
        assert!(tail_peak < 64, "band {index} tail peak {tail_peak}");
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

#[test]
fn test_pipeline_impulse_response() {
    let mut eq = EqualizerPipeline::initialize(octave_16k()).unwrap();
    let input = generate_impulse(48, 16_384 as Sample);
    let mut output = vec![0; 48];
    eq.process_block(&input, &mut output);
    assert_eq!(output, PIPELINE_IMPULSE);
}

#[test]
fn test_pipeline_is_deterministic() {
    let input = generate_impulse(1024, Sample::MAX);
    let mut runs = Vec::new();
    for _ in 0..3 {
        let mut eq = EqualizerPipeline::initialize(octave_16k()).unwrap();
        let mut output = vec![0; input.len()];
        eq.process_block(&input, &mut output);
        runs.push(output);
    }
    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[1], runs[2]);
}
