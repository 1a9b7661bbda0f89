//! octeq - offline driver for the fixed-point equalizer
//!
//! Usage:
//!   octeq process -i in.wav -o out.wav   - Equalize a 16-bit mono WAV file
//!   octeq info                           - Show the band layout
//!   octeq dump-config                    - Print the default configuration as JSON
//!   octeq impulse --band 4               - Print one band's impulse ringdown

mod wav;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use octeq_core::Q31;
use octeq_dsp::preset::{OCTAVE_16K_EDGES_HZ, OCTAVE_16K_SAMPLE_RATE, octave_16k_table};
use octeq_dsp::{Band, EqualizerConfig, EqualizerPipeline, GainStage, MonoProcessor};

use crate::wav::{WavSink, WavSource};

#[derive(Parser)]
#[command(name = "octeq", version, about = "Fixed-point multi-band equalizer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Equalize a 16-bit mono WAV file
    Process {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,
        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,
        /// JSON configuration (defaults to the bundled 6-band preset)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Band gain in dB, bands numbered from 1 (e.g. 3=-6)
        #[arg(short, long = "gain", value_name = "BAND=DB", value_parser = parse_band_gain)]
        gains: Vec<(usize, f64)>,
        /// Pass audio through unfiltered
        #[arg(long, conflicts_with_all = ["config", "gains"])]
        bypass: bool,
    },
    /// Show the band layout
    Info {
        /// JSON configuration (defaults to the bundled 6-band preset)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration as JSON
    DumpConfig,
    /// Print one band's impulse ringdown (Q31, one value per line)
    Impulse {
        /// Band number, starting at 1
        #[arg(short, long)]
        band: usize,
        /// Number of output samples
        #[arg(short, long, default_value_t = 64)]
        len: usize,
        /// JSON configuration (defaults to the bundled 6-band preset)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Process {
            input,
            output,
            config,
            gains,
            bypass,
        } => {
            let config = if bypass {
                EqualizerConfig::identity(1, 1, EqualizerConfig::default().block_size)
            } else {
                apply_gains(load_config(config.as_deref())?, &gains)?
            };
            let written = process_file(&input, &output, config)?;
            log::info!("Wrote {} samples to {}", written, output.display());
            Ok(())
        }
        Commands::Info { config } => {
            let config = load_config(config.as_deref())?;
            print_info(&config);
            Ok(())
        }
        Commands::DumpConfig => {
            println!("{}", EqualizerConfig::default().to_json_pretty()?);
            Ok(())
        }
        Commands::Impulse { band, len, config } => {
            let config = load_config(config.as_deref())?;
            for value in impulse_response(&config, band, len)? {
                println!("{value}");
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EqualizerConfig> {
    let config = match path {
        Some(path) => EqualizerConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EqualizerConfig::default(),
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Parse `BAND=DB`
fn parse_band_gain(arg: &str) -> Result<(usize, f64), String> {
    let (band, db) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected BAND=DB, got '{arg}'"))?;
    let band: usize = band
        .trim()
        .parse()
        .map_err(|_| format!("invalid band number '{band}'"))?;
    if band == 0 {
        return Err("band numbers start at 1".to_string());
    }
    let db: f64 = db
        .trim()
        .parse()
        .map_err(|_| format!("invalid gain '{db}'"))?;
    Ok((band, db))
}

fn apply_gains(mut config: EqualizerConfig, gains: &[(usize, f64)]) -> Result<EqualizerConfig> {
    for &(band, db) in gains {
        if band > config.band_count {
            bail!("band {} out of range (1..={})", band, config.band_count);
        }
        let gain = GainStage::from_db(db).with_context(|| format!("Invalid gain for band {band}"))?;
        config = config.with_band_gain(band - 1, gain)?;
    }
    Ok(config)
}

/// Stream `input` through a fresh pipeline into `output`.
///
/// Returns the number of samples written.
fn process_file(input: &Path, output: &Path, config: EqualizerConfig) -> Result<usize> {
    let mut source = WavSource::open(input)?;
    let spec = source.spec();
    if spec.sample_rate != OCTAVE_16K_SAMPLE_RATE {
        log::warn!(
            "{} is {} Hz; bundled coefficients are designed for {} Hz",
            input.display(),
            spec.sample_rate,
            OCTAVE_16K_SAMPLE_RATE
        );
    }

    let mut eq = EqualizerPipeline::initialize(config).context("Failed to initialize equalizer")?;
    let mut sink = WavSink::create(output, spec)?;

    log::info!(
        "Processing {} ({} samples, {} Hz) in blocks of {}",
        input.display(),
        source.remaining(),
        spec.sample_rate,
        eq.block_size()
    );

    let mut buffer = vec![0; eq.block_size()];
    while source.remaining() > 0 {
        let len = source.remaining().min(buffer.len());
        eq.run_iteration(&mut source, &mut sink, &mut buffer[..len]);
    }

    let written = sink.written();
    source.finish()?;
    sink.finish()?;
    Ok(written)
}

fn print_info(config: &EqualizerConfig) {
    let table = &config.coefficients;
    println!("Bands:              {}", config.band_count);
    println!("Stages per band:    {} (order {})", config.stages_per_band, 2 * config.stages_per_band);
    println!("Coefficient format: {:?}, postshift {}", table.format, config.postshift);
    println!("Accumulator shift:  {}", table.accumulator_shift());
    println!("Block size:         {}", config.block_size);
    println!("Headroom shift:     {} (post-scale {})", config.headroom_shift, config.post_scale().shift);
    println!("Summation:          {:?}", config.summation);
    println!("Headroom usage:     {:.2}", config.headroom_usage());
    println!();

    let preset_edges = *table == octave_16k_table();
    for (i, gain) in config.band_gains.iter().enumerate() {
        let range = if preset_edges {
            format!("{:>7.1} - {:>7.1} Hz", OCTAVE_16K_EDGES_HZ[i], OCTAVE_16K_EDGES_HZ[i + 1])
        } else {
            String::from("-")
        };
        println!(
            "  band {}: {}  gain {:+.2} dB  {:?}",
            i + 1,
            range,
            20.0 * gain.linear().abs().log10(),
            config.precision(i)
        );
    }
}

/// Impulse response of one band (numbered from 1) in Q31.
fn impulse_response(config: &EqualizerConfig, band: usize, len: usize) -> Result<Vec<Q31>> {
    if band == 0 || band > config.band_count {
        bail!("band {} out of range (1..={})", band, config.band_count);
    }
    let index = band - 1;
    let table = &config.coefficients;
    let mut filter = Band::new(
        &table.band(index)?,
        table.accumulator_shift(),
        config.precision(index),
        config.band_gains[index],
    );

    // Half of the pre-scaled full-scale step, as the pipeline would see it
    let amplitude: Q31 = 1 << (30 - config.headroom_shift.clamp(0, 30));
    Ok((0..len)
        .map(|i| filter.process_sample(if i == 0 { amplitude } else { 0 }))
        .collect())
}
