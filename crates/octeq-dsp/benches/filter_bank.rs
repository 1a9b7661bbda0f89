//! Filter bank and pipeline benchmarks

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use octeq_core::{Q31, Sample};
use octeq_dsp::preset::{octave_16k, octave_16k_table};
use octeq_dsp::{BiquadSection, EqualizerPipeline, MonoProcessor, Precision};

fn bench_biquad(c: &mut Criterion) {
    let table = octave_16k_table();
    let coeffs = table.stage(3, 2).unwrap();
    let shift = table.accumulator_shift();
    let mut buffer: Vec<Q31> = (0..256).map(|i| ((i as f64 * 0.05).sin() * 1e8) as Q31).collect();

    for precision in [Precision::Standard, Precision::Extended] {
        let mut section = BiquadSection::new(coeffs, shift, precision);
        c.bench_function(&format!("biquad_{precision:?}_256").to_lowercase(), |b| {
            b.iter(|| {
                section.process_block(black_box(&mut buffer));
            })
        });
    }
}

fn bench_pipeline(c: &mut Criterion) {
    let mut eq = EqualizerPipeline::initialize(octave_16k()).unwrap();
    let input: Vec<Sample> = (0..256).map(|i| ((i as f64 * 0.05).sin() * 8000.0) as Sample).collect();
    let mut output = vec![0; input.len()];

    c.bench_function("pipeline_octave_16k_256", |b| {
        b.iter(|| {
            eq.process_block(black_box(&input), black_box(&mut output));
        })
    });
}

criterion_group!(benches, bench_biquad, bench_pipeline);
criterion_main!(benches);
