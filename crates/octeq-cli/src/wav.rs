//! WAV file collaborators
//!
//! [`WavSource`] and [`WavSink`] adapt `hound` readers and writers to the
//! equalizer's block collaborators. The collaborator methods cannot fail, so
//! the first I/O error is parked and reported by `finish`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result, bail};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use octeq_core::Sample;
use octeq_dsp::{BlockSink, BlockSource};

/// Reads 16-bit mono PCM, one block at a time.
pub struct WavSource {
    reader: WavReader<std::io::BufReader<File>>,
    remaining: usize,
    error: Option<hound::Error>,
}

impl WavSource {
    pub fn open(path: &Path) -> Result<Self> {
        let reader = WavReader::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let spec = reader.spec();
        if spec.channels != 1 {
            bail!("{}: expected mono input, found {} channels", path.display(), spec.channels);
        }
        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            bail!(
                "{}: expected 16-bit integer PCM, found {}-bit {:?}",
                path.display(),
                spec.bits_per_sample,
                spec.sample_format
            );
        }

        let remaining = reader.len() as usize;
        Ok(Self {
            reader,
            remaining,
            error: None,
        })
    }

    pub fn spec(&self) -> WavSpec {
        self.reader.spec()
    }

    /// Samples not yet handed out.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Report the first read error, if any.
    pub fn finish(self) -> Result<()> {
        match self.error {
            Some(e) => Err(e).context("Failed to read input samples"),
            None => Ok(()),
        }
    }
}

impl BlockSource for WavSource {
    fn obtain(&mut self, block: &mut [Sample]) {
        let mut samples = self.reader.samples::<i16>();
        for slot in block.iter_mut() {
            *slot = match samples.next() {
                Some(Ok(s)) => s,
                Some(Err(e)) => {
                    self.error.get_or_insert(e);
                    0
                }
                None => 0,
            };
        }
        self.remaining = self.remaining.saturating_sub(block.len());
    }
}

/// Writes processed blocks as 16-bit PCM.
pub struct WavSink {
    writer: WavWriter<BufWriter<File>>,
    written: usize,
    error: Option<hound::Error>,
}

impl WavSink {
    pub fn create(path: &Path, spec: WavSpec) -> Result<Self> {
        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(Self {
            writer,
            written: 0,
            error: None,
        })
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush the header and report the first write error, if any.
    pub fn finish(self) -> Result<()> {
        if let Some(e) = self.error {
            return Err(e).context("Failed to write output samples");
        }
        self.writer.finalize().context("Failed to finalize output file")
    }
}

impl BlockSink for WavSink {
    fn transfer(&mut self, block: &[Sample]) {
        if self.error.is_some() {
            return;
        }
        for &sample in block {
            if let Err(e) = self.writer.write_sample(sample) {
                self.error = Some(e);
                return;
            }
        }
        self.written += block.len();
    }
}

/// 16-bit mono PCM format at `sample_rate`
pub fn mono_i16_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, spec: WavSpec, samples: &[i16]) {
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_source_sink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        let samples: Vec<i16> = (0..10).map(|i| i * 100 - 500).collect();
        write_wav(&input, mono_i16_spec(16_000), &samples);

        let mut source = WavSource::open(&input).unwrap();
        let mut sink = WavSink::create(&output, source.spec()).unwrap();
        assert_eq!(source.remaining(), 10);

        let mut block = [0; 4];
        source.obtain(&mut block);
        sink.transfer(&block);
        source.obtain(&mut block);
        sink.transfer(&block);
        let mut tail = [0; 2];
        source.obtain(&mut tail);
        sink.transfer(&tail);

        assert_eq!(source.remaining(), 0);
        assert_eq!(sink.written(), 10);
        source.finish().unwrap();
        sink.finish().unwrap();

        let read: Vec<i16> = WavReader::open(&output)
            .unwrap()
            .into_samples::<i16>()
            .map(|s| s.unwrap())
            .collect();
        assert_eq!(read, samples);
    }

    #[test]
    fn test_source_pads_past_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("short.wav");
        write_wav(&input, mono_i16_spec(16_000), &[7, 8]);

        let mut source = WavSource::open(&input).unwrap();
        let mut block = [1; 4];
        source.obtain(&mut block);
        assert_eq!(block, [7, 8, 0, 0]);
    }

    #[test]
    fn test_rejects_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            ..mono_i16_spec(16_000)
        };
        write_wav(&input, spec, &[1, 2, 3, 4]);

        let err = WavSource::open(&input).err().unwrap();
        assert!(err.to_string().contains("mono"), "{err}");
    }

    #[test]
    fn test_rejects_float() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("float.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&input, spec).unwrap();
        writer.write_sample(0.5f32).unwrap();
        writer.finalize().unwrap();

        assert!(WavSource::open(&input).is_err());
    }
}
