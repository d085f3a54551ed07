//! Time-Domain Iteration
//!
//! The driver walks the time counter over a half-open range, evaluates the
//! sample formula once per channel per step over a fresh register bank, and
//! feeds each truncated byte to the active sink in strict `(t, channel)`
//! order. An unbounded range streams forever; it stops only when the sink
//! reports a write failure (downstream closed the pipe) or the driver's
//! cancellation token fires.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::formula::{Registers, SampleFn};
use crate::Result;

/// Half-open time range the driver iterates over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    /// Finite range `[start, end)`
    Bounded {
        /// First time step
        start: u32,
        /// One past the last time step
        end: u32,
    },
    /// Live range from `start`, wrapping on overflow, never ending on its own
    Unbounded {
        /// First time step
        start: u32,
    },
}

impl TimeRange {
    /// Build a range from stream-tool endpoints, where `t1 == 0` means
    /// "unbounded" (the generator's live mode)
    pub fn from_endpoints(t0: u32, t1: u32) -> Self {
        if t1 == 0 {
            TimeRange::Unbounded { start: t0 }
        } else {
            TimeRange::Bounded { start: t0, end: t1 }
        }
    }

    /// First time step of the range
    pub fn start(&self) -> u32 {
        match *self {
            TimeRange::Bounded { start, .. } | TimeRange::Unbounded { start } => start,
        }
    }

    /// Number of time steps, `None` when unbounded
    pub fn steps(&self) -> Option<u32> {
        match *self {
            TimeRange::Bounded { start, end } => Some(end.saturating_sub(start)),
            TimeRange::Unbounded { .. } => None,
        }
    }
}

/// Number of output channels, fixed for the duration of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// Single channel
    Mono,
    /// Two channels, evaluated in order 0 then 1 within each time step
    Stereo,
}

impl Channels {
    /// Parse a `chans=` argument value
    pub fn from_arg(value: &str) -> Option<Self> {
        match value {
            "1" => Some(Channels::Mono),
            "2" => Some(Channels::Stereo),
            _ => None,
        }
    }

    /// Channel count as an integer
    pub fn count(&self) -> u8 {
        match self {
            Channels::Mono => 1,
            Channels::Stereo => 2,
        }
    }
}

/// Cooperative stop signal for unbounded runs
///
/// Clones share one flag. The driver checks the token once per time step,
/// so cancellation lands on a step boundary and never mid-channel.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that has not fired
    pub fn new() -> Self {
        CancelToken::default()
    }

    /// Fire the token; every clone observes the stop request
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Check whether the token has fired
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Receives one truncated sample per `(t, channel)` pair, in driver order
pub trait SampleSink {
    /// Consume the byte produced for time step `t` on `channel`
    fn write_sample(&mut self, t: u32, channel: u8, byte: u8) -> Result<()>;
}

/// Time-domain driver
///
/// Immutable run configuration; [`Driver::run`] may be invoked repeatedly,
/// each invocation being a full pass over the configured range.
#[derive(Debug, Clone)]
pub struct Driver {
    range: TimeRange,
    channels: Channels,
    cancel: CancelToken,
}

impl Driver {
    /// Create a driver for the given range and channel configuration
    pub fn new(range: TimeRange, channels: Channels) -> Self {
        Driver {
            range,
            channels,
            cancel: CancelToken::new(),
        }
    }

    /// Handle to the driver's cancellation token
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run the formula over the configured range, feeding every truncated
    /// byte to `sink`
    ///
    /// Each evaluation gets a fresh zeroed register bank with [`crate::Reg::C`]
    /// pre-seeded with the channel index. Within a step, channel 0's byte is
    /// delivered before channel 1's. An unbounded range returns only on sink
    /// error or cancellation.
    pub fn run<F, S>(&self, formula: &F, sink: &mut S) -> Result<()>
    where
        F: SampleFn + ?Sized,
        S: SampleSink + ?Sized,
    {
        match self.range {
            TimeRange::Bounded { start, end } => {
                for t in start..end {
                    if self.cancel.is_cancelled() {
                        break;
                    }
                    self.step(t, formula, sink)?;
                }
            }
            TimeRange::Unbounded { start } => {
                let mut t = start;
                loop {
                    if self.cancel.is_cancelled() {
                        break;
                    }
                    self.step(t, formula, sink)?;
                    t = t.wrapping_add(1);
                }
            }
        }
        Ok(())
    }

    /// Evaluate one time step across all channels
    fn step<F, S>(&self, t: u32, formula: &F, sink: &mut S) -> Result<()>
    where
        F: SampleFn + ?Sized,
        S: SampleSink + ?Sized,
    {
        for channel in 0..self.channels.count() {
            let mut regs = Registers::for_channel(channel);
            let byte = formula.sample(t, &mut regs) as u8;
            sink.write_sample(t, channel, byte)?;
        }
        Ok(())
    }
}
