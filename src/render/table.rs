//! Tabular Amplitude Rendering
//!
//! Emits one `x,y` line per time step for a single designated channel:
//! `x = t - t0` and `y = 256 * (channel + 1) - byte`. The inversion flips
//! the visual polarity so a zero sample plots at the top of its 256-unit
//! band, and the per-channel base places channel 1's points in the second
//! stacked band of the SVG canvas. Samples for other channels are filtered
//! out, so selecting a channel means running a full driver pass through one
//! renderer per channel.
//!
//! The lines are plain CSV records; the SVG renderer reuses them verbatim
//! as polyline point coordinates.

use std::io::Write;

use crate::driver::SampleSink;
use crate::render::CHANNEL_HEIGHT;
use crate::Result;

/// Renders one channel's samples as `x,y` CSV lines
pub struct TableRenderer<W: Write> {
    wtr: csv::Writer<W>,
    channel: u8,
    t0: u32,
    y_base: u32,
}

impl<W: Write> TableRenderer<W> {
    /// Create a renderer for `channel`, with x-coordinates relative to `t0`
    pub fn new(out: W, channel: u8, t0: u32) -> Self {
        TableRenderer {
            wtr: csv::Writer::from_writer(out),
            channel,
            t0,
            y_base: CHANNEL_HEIGHT * (channel as u32 + 1),
        }
    }

    /// Flush buffered records to the underlying writer
    pub fn finish(&mut self) -> Result<()> {
        self.wtr.flush()?;
        Ok(())
    }
}

impl<W: Write> SampleSink for TableRenderer<W> {
    fn write_sample(&mut self, t: u32, channel: u8, byte: u8) -> Result<()> {
        if channel != self.channel {
            return Ok(());
        }
        // wrapping keeps unbounded runs alive past the u32 wrap point
        let x = t.wrapping_sub(self.t0);
        let y = self.y_base - byte as u32;
        self.wtr.write_record(&[x.to_string(), y.to_string()])?;
        Ok(())
    }
}
