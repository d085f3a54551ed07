//! Binary Stream Rendering
//!
//! Writes each sample as a single raw octet in the exact order the driver
//! produces them, channel-major within each step. No separators, no framing:
//! the stream is raw unsigned 8-bit PCM for an external consumer.

use std::io::Write;

use crate::driver::SampleSink;
use crate::Result;

/// Renders samples as a raw unsigned 8-bit PCM stream
#[derive(Debug)]
pub struct BinaryRenderer<W: Write> {
    out: W,
}

impl<W: Write> BinaryRenderer<W> {
    /// Create a renderer writing to `out`
    pub fn new(out: W) -> Self {
        BinaryRenderer { out }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SampleSink for BinaryRenderer<W> {
    fn write_sample(&mut self, _t: u32, _channel: u8, byte: u8) -> Result<()> {
        self.out.write_all(&[byte])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Channels, Driver, Registers, TimeRange};

    #[test]
    fn test_raw_bytes_in_driver_order() {
        let driver = Driver::new(TimeRange::from_endpoints(0, 4), Channels::Mono);
        let mut sink = BinaryRenderer::new(Vec::new());
        driver
            .run(&|t: u32, _regs: &mut Registers| t, &mut sink)
            .unwrap();
        assert_eq!(sink.into_inner(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_stereo_interleaving_and_length() {
        let driver = Driver::new(TimeRange::from_endpoints(0, 3), Channels::Stereo);
        let mut sink = BinaryRenderer::new(Vec::new());
        driver
            .run(
                &|t: u32, regs: &mut Registers| t.wrapping_add(regs.channel().wrapping_mul(100)),
                &mut sink,
            )
            .unwrap();
        // channel 0 then channel 1 for every step, 2 * (t1 - t0) bytes total
        assert_eq!(sink.into_inner(), vec![0, 100, 1, 101, 2, 102]);
    }
}
