//! SVG Waveform Rendering
//!
//! Draws one 256-unit-tall amplitude band per channel, stacked vertically,
//! each with a bounding rectangle and a polyline. The polyline point lists
//! are produced by running the driver through the tabular renderer, whose
//! `x,y` CSV lines are valid SVG point pairs as-is. Full-page mode wraps the
//! fragment in an HTML document, splicing a fixed external header file
//! verbatim into `<head>`; failing to read that file is the renderer's only
//! hard failure.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::driver::{Channels, Driver, TimeRange};
use crate::formula::SampleFn;
use crate::render::{TableRenderer, CHANNEL_HEIGHT};
use crate::{BytebeatError, Result};

/// Default location of the full-page header fragment
pub const DEFAULT_HEADER_PATH: &str = "assets/header.html";

/// Container height in pixels for full-page output
const FULL_PAGE_CONTAINER_PX: u32 = 320;
/// Container height in pixels for fragment output
const FRAGMENT_CONTAINER_PX: u32 = 200;

/// Renders a waveform as an SVG fragment or a full HTML page
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    t0: u32,
    t1: u32,
    channels: Channels,
    full_page: bool,
    header_path: PathBuf,
}

impl SvgRenderer {
    /// Create a renderer for the finite range `[t0, t1)`
    pub fn new(t0: u32, t1: u32, channels: Channels, full_page: bool) -> Self {
        SvgRenderer {
            t0,
            t1,
            channels,
            full_page,
            header_path: PathBuf::from(DEFAULT_HEADER_PATH),
        }
    }

    /// Override the header fragment spliced into full-page output
    pub fn with_header_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.header_path = path.into();
        self
    }

    /// Render the waveform for `formula` into `out`
    ///
    /// Canvas width is `t1 - t0`, height `256 * channels`. Every channel gets
    /// its own full driver pass; the two polylines of a stereo canvas share
    /// the x-domain and are offset vertically by exactly 256 units.
    pub fn render<F, W>(&self, formula: &F, out: &mut W) -> Result<()>
    where
        F: SampleFn + ?Sized,
        W: Write,
    {
        if self.t1 <= self.t0 {
            return Err(BytebeatError::Config(format!(
                "SVG rendering needs a non-empty time range (t0={}, t1={})",
                self.t0, self.t1
            )));
        }
        let width = self.t1 - self.t0;
        let height = CHANNEL_HEIGHT * self.channels.count() as u32;
        let container_px = if self.full_page {
            FULL_PAGE_CONTAINER_PX
        } else {
            FRAGMENT_CONTAINER_PX
        };

        if self.full_page {
            // whole-file read up front: nothing is written if the header is
            // missing, and there is no partial-splice state to clean up
            let header = fs::read(&self.header_path).map_err(|source| BytebeatError::Header {
                path: self.header_path.display().to_string(),
                source,
            })?;
            out.write_all(b"<html>\n<head>\n")?;
            out.write_all(&header)?;
            out.write_all(b"</head>\n<body>\n")?;
        }

        write!(
            out,
            "<div class=\"svg-container\"\n    \
             style=\"height: {container_px}px;\"\n    \
             data-zoom-on-wheel=\"max-scale: 500;\"\n    \
             data-pan-on-drag\n>\n"
        )?;
        write!(
            out,
            "    <svg\n        \
             viewBox=\"0 0 {width} {height}\"\n        \
             preserveAspectRatio=\"xMidYMid meet\"\n        \
             version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\"\n    >\n"
        )?;
        out.write_all(
            b"        <style>\n            .t-marker { font: 13px sans-serif; fill: grey; }\n        </style>\n",
        )?;

        for band in 0..self.channels.count() {
            let y = CHANNEL_HEIGHT * band as u32;
            writeln!(
                out,
                "        <rect x=\"0\" y=\"{y}\" width=\"{width}\" height=\"{CHANNEL_HEIGHT}\" stroke=\"grey\" fill=\"transparent\" stroke-width=\"1\"/>"
            )?;
        }

        let driver = Driver::new(
            TimeRange::Bounded {
                start: self.t0,
                end: self.t1,
            },
            self.channels,
        );
        for channel in 0..self.channels.count() {
            out.write_all(
                b"        <g>\n            <polyline\n                \
                  stroke=\"black\" fill=\"transparent\" stroke-width=\".75\"\n                \
                  points=\"\n",
            )?;
            {
                let mut points = TableRenderer::new(&mut *out, channel, self.t0);
                driver.run(formula, &mut points)?;
                points.finish()?;
            }
            out.write_all(b"                \"\n            />\n        </g>\n")?;
        }

        out.write_all(b"    </svg>\n</div>\n")?;
        if self.full_page {
            out.write_all(b"</body>\n</html>\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Registers;

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    fn render_fragment(channels: Channels) -> String {
        let mut out = Vec::new();
        SvgRenderer::new(0, 8, channels, false)
            .render(&|t: u32, _regs: &mut Registers| t, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_fragment_has_no_document_wrapper() {
        let text = render_fragment(Channels::Mono);
        assert!(!text.contains("<html>"));
        assert!(!text.contains("<head>"));
        assert!(!text.contains("<body>"));
        assert!(text.starts_with("<div class=\"svg-container\""));
        assert!(text.contains("height: 200px;"));
    }

    #[test]
    fn test_mono_canvas_single_band() {
        let text = render_fragment(Channels::Mono);
        assert!(text.contains("viewBox=\"0 0 8 256\""));
        assert_eq!(count(&text, "<rect "), 1);
        assert_eq!(count(&text, "<polyline"), 1);
    }

    #[test]
    fn test_stereo_canvas_stacked_bands() {
        let text = render_fragment(Channels::Stereo);
        assert!(text.contains("viewBox=\"0 0 8 512\""));
        assert_eq!(count(&text, "<rect "), 2);
        assert!(text.contains("y=\"0\""));
        assert!(text.contains("y=\"256\""));
        assert_eq!(count(&text, "<polyline"), 2);
        assert_eq!(count(&text, "height=\"256\""), 2);
    }

    #[test]
    fn test_polyline_points_come_from_table_renderer() {
        let text = render_fragment(Channels::Mono);
        // f(t) = t: first point is the 256 overshoot for the zero sample
        assert!(text.contains("0,256\n1,255\n2,254\n"));
    }

    #[test]
    fn test_full_page_splices_header_verbatim() {
        let marker = b"<title>waveform probe</title>\n<!-- header marker -->\n";
        let mut header = tempfile::NamedTempFile::new().unwrap();
        header.write_all(marker).unwrap();

        let mut out = Vec::new();
        SvgRenderer::new(0, 4, Channels::Mono, true)
            .with_header_path(header.path())
            .render(&|t: u32, _regs: &mut Registers| t, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(count(&text, "<html>"), 1);
        assert_eq!(count(&text, "<head>"), 1);
        assert_eq!(count(&text, "<body>"), 1);
        assert!(text.contains(std::str::from_utf8(marker).unwrap()));
        assert!(text.contains("height: 320px;"));
        assert!(text.ends_with("</body>\n</html>\n"));
    }

    #[test]
    fn test_missing_header_is_fatal_and_writes_nothing() {
        let mut out = Vec::new();
        let err = SvgRenderer::new(0, 4, Channels::Mono, true)
            .with_header_path("/nonexistent/header.html")
            .render(&|t: u32, _regs: &mut Registers| t, &mut out)
            .unwrap_err();

        match err {
            BytebeatError::Header { path, .. } => {
                assert_eq!(path, "/nonexistent/header.html");
            }
            other => panic!("expected header error, got {other:?}"),
        }
        assert!(out.is_empty(), "no partial output on header failure");
    }

    #[test]
    fn test_empty_range_is_rejected() {
        let mut out = Vec::new();
        let err = SvgRenderer::new(4, 4, Channels::Mono, false)
            .render(&|t: u32, _regs: &mut Registers| t, &mut out)
            .unwrap_err();
        assert!(matches!(err, BytebeatError::Config(_)));
    }
}
