//! WAV File Rendering
//!
//! Wraps the raw sample stream in a RIFF container: 8-bit unsigned PCM,
//! channel-interleaved in driver order, at a configurable playback rate.
//! Unlike the stream renderers this one needs a seekable target, so it
//! writes to a file path and patches the RIFF header on finalize.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::driver::{Channels, SampleSink};
use crate::Result;

/// Default playback rate for rendered WAV files, the classic bytebeat rate
pub const DEFAULT_SAMPLE_RATE: u32 = 8_000;

/// Renders samples into an 8-bit PCM WAV file
pub struct WavRenderer {
    writer: WavWriter<BufWriter<File>>,
}

impl WavRenderer {
    /// Create a WAV file at `path` for the given rate and channel layout
    pub fn create<P: AsRef<Path>>(path: P, sample_rate: u32, channels: Channels) -> Result<Self> {
        let spec = WavSpec {
            channels: channels.count() as u16,
            sample_rate,
            bits_per_sample: 8,
            sample_format: SampleFormat::Int,
        };
        Ok(WavRenderer {
            writer: WavWriter::create(path, spec)?,
        })
    }

    /// Finish the file, patching the RIFF header with the final length
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize()?;
        Ok(())
    }
}

impl SampleSink for WavRenderer {
    fn write_sample(&mut self, _t: u32, _channel: u8, byte: u8) -> Result<()> {
        // WAV stores 8-bit PCM unsigned; hound takes offset-binary signed input
        self.writer.write_sample((byte as i16 - 128) as i8)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Driver, Registers, TimeRange};

    #[test]
    fn test_wav_roundtrip_preserves_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");

        let driver = Driver::new(TimeRange::from_endpoints(0, 16), Channels::Stereo);
        let mut sink = WavRenderer::create(&path, DEFAULT_SAMPLE_RATE, Channels::Stereo).unwrap();
        driver
            .run(
                &|t: u32, regs: &mut Registers| t.wrapping_add(regs.channel().wrapping_mul(100)),
                &mut sink,
            )
            .unwrap();
        sink.finalize().unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, DEFAULT_SAMPLE_RATE);
        assert_eq!(spec.bits_per_sample, 8);

        let samples: Vec<i8> = reader.samples::<i8>().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 32, "channels * (t1 - t0) samples");
        // first frame: bytes 0 and 100, read back in offset-binary form
        assert_eq!(samples[0], -128);
        assert_eq!(samples[1], (100i16 - 128) as i8);
    }
}
