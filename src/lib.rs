//! Formula-driven 8-bit sample generator ("bytebeat" engine)
//!
//! Evaluates an injected integer formula once per channel per time step,
//! truncates each result to its low 8 bits and renders the stream as raw
//! unsigned 8-bit PCM, a CSV amplitude table, an SVG waveform or a WAV file.
//!
//! # Features
//! - Deterministic per-sample evaluation over a fresh 26-register scratch bank
//! - Mono or stereo evaluation with a channel-seeded register
//! - Bounded and unbounded ("live") time ranges with cooperative cancellation
//! - Raw PCM, CSV table, SVG fragment / full-page and WAV renderers
//!
//! # Crate feature flags
//! - `wav` (default): WAV file rendering (enables the optional `hound` dep)
//!
//! # Quick start
//! ## Render a classic formula as raw bytes
//! ```
//! use bytebeat::render::BinaryRenderer;
//! use bytebeat::{Channels, Driver, Registers, TimeRange};
//!
//! let driver = Driver::new(TimeRange::from_endpoints(0, 4), Channels::Mono);
//! let mut sink = BinaryRenderer::new(Vec::new());
//! driver
//!     .run(&|t: u32, _regs: &mut Registers| t.wrapping_mul(42 & (t >> 10)), &mut sink)
//!     .unwrap();
//! assert_eq!(sink.into_inner().len(), 4);
//! ```
//!
//! ## Render an SVG fragment
//! ```
//! use bytebeat::formula::presets;
//! use bytebeat::render::SvgRenderer;
//! use bytebeat::Channels;
//!
//! let formula = presets::by_name("melody").unwrap();
//! let mut out = Vec::new();
//! SvgRenderer::new(0, 64, Channels::Stereo, false)
//!     .render(&formula, &mut out)
//!     .unwrap();
//! assert!(out.starts_with(b"<div"));
//! ```

#![warn(missing_docs)]

pub mod driver; // Time-Domain Iteration
pub mod formula; // Sample Formulas & Scratch Registers
pub mod render; // Output Renderers

/// Error types for sample generation and rendering
#[derive(thiserror::Error, Debug)]
pub enum BytebeatError {
    /// IO error from the output stream or filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error writing tabular sample output
    #[error("Table write error: {0}")]
    Table(#[from] csv::Error),

    /// Error writing a WAV file
    #[cfg(feature = "wav")]
    #[error("WAV write error: {0}")]
    Wav(#[from] hound::Error),

    /// Header document for full-page output could not be read
    #[error("Failed to read header file '{path}': {source}")]
    Header {
        /// Path the renderer tried to open
        path: String,
        /// Underlying system reason
        source: std::io::Error,
    },

    /// Invalid render configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Invalid command-line usage
    #[error("{0}")]
    Usage(String),
}

impl BytebeatError {
    /// Check whether the error is a consumer closing the output pipe.
    ///
    /// A closed pipe is the normal way an unbounded streaming run ends, so
    /// callers usually treat it as a clean exit rather than a failure.
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            BytebeatError::Io(err) => err.kind() == std::io::ErrorKind::BrokenPipe,
            BytebeatError::Table(err) => matches!(
                err.kind(),
                csv::ErrorKind::Io(io_err) if io_err.kind() == std::io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}

impl From<String> for BytebeatError {
    /// Converts a String into `BytebeatError::Usage`.
    ///
    /// Convenience for glue-level diagnostics (argument parsing and mode
    /// dispatch). Library code uses the specific variants instead.
    fn from(msg: String) -> Self {
        BytebeatError::Usage(msg)
    }
}

impl From<&str> for BytebeatError {
    /// Converts a string slice into `BytebeatError::Usage`.
    fn from(msg: &str) -> Self {
        BytebeatError::Usage(msg.to_string())
    }
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, BytebeatError>;

// Public API exports
pub use driver::{CancelToken, Channels, Driver, SampleSink, TimeRange};
pub use formula::{Reg, Registers, SampleFn};
#[cfg(feature = "wav")]
pub use render::WavRenderer;
pub use render::{BinaryRenderer, SvgRenderer, TableRenderer};
