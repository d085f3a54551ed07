mod cli {
    use std::env;
    use std::io::{self, Write};

    use bytebeat::formula::presets::{self, PresetFn};
    use bytebeat::render::svg::DEFAULT_HEADER_PATH;
    #[cfg(feature = "wav")]
    use bytebeat::render::wav::{WavRenderer, DEFAULT_SAMPLE_RATE};
    use bytebeat::render::{BinaryRenderer, SvgRenderer, TableRenderer};
    use bytebeat::{Channels, Driver, Result, TimeRange};

    /// Mode letters accepted by `mode=`
    const MODES: &str = if cfg!(feature = "wav") { "btsSw" } else { "btsS" };

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Mode {
        /// Raw unsigned 8-bit PCM on stdout
        Binary,
        /// CSV amplitude table for channel 0 on stdout
        Table,
        /// Embeddable SVG fragment on stdout
        SvgFragment,
        /// Full HTML page with spliced header on stdout
        SvgFullPage,
        /// 8-bit PCM WAV file at `out=`
        #[cfg(feature = "wav")]
        Wav,
    }

    impl Mode {
        fn from_letter(letter: char) -> Option<Self> {
            match letter {
                'b' => Some(Mode::Binary),
                't' => Some(Mode::Table),
                's' => Some(Mode::SvgFragment),
                'S' => Some(Mode::SvgFullPage),
                #[cfg(feature = "wav")]
                'w' => Some(Mode::Wav),
                _ => None,
            }
        }
    }

    #[derive(Debug)]
    struct Options {
        mode: Mode,
        chans: Channels,
        t0: u32,
        t1: u32,
        formula: PresetFn,
        header: String,
        #[cfg_attr(not(feature = "wav"), allow(dead_code))]
        rate: u32,
        #[cfg_attr(not(feature = "wav"), allow(dead_code))]
        out: Option<String>,
    }

    impl Default for Options {
        fn default() -> Self {
            Options {
                mode: Mode::Binary,
                chans: Channels::Stereo,
                t0: 0,
                t1: 0,
                formula: presets::PRESETS[0].1,
                header: DEFAULT_HEADER_PATH.to_string(),
                #[cfg(feature = "wav")]
                rate: DEFAULT_SAMPLE_RATE,
                #[cfg(not(feature = "wav"))]
                rate: 0,
                out: None,
            }
        }
    }

    fn parse_number(name: &str, value: &str) -> Result<u32> {
        value
            .parse::<u32>()
            .map_err(|_| format!("Invalid {} value: {}", name, value).into())
    }

    fn parse_args<I>(args: I) -> Result<Options>
    where
        I: IntoIterator<Item = String>,
    {
        let mut opts = Options::default();
        for arg in args {
            if let Some(value) = arg.strip_prefix("mode=") {
                let letter = value.chars().next().unwrap_or('\0');
                opts.mode = Mode::from_letter(letter).ok_or_else(|| {
                    format!(
                        "Unrecognized mode: [{}] (Expected one of: [{}])",
                        value, MODES
                    )
                })?;
            } else if let Some(value) = arg.strip_prefix("chans=") {
                opts.chans = Channels::from_arg(value).ok_or_else(|| {
                    format!("Unrecognized channel count: {} (Expected 1 or 2)", value)
                })?;
            } else if let Some(value) = arg.strip_prefix("t0=") {
                opts.t0 = parse_number("t0", value)?;
            } else if let Some(value) = arg.strip_prefix("t1=") {
                opts.t1 = parse_number("t1", value)?;
            } else if let Some(value) = arg.strip_prefix("formula=") {
                opts.formula = presets::by_name(value).ok_or_else(|| {
                    format!(
                        "Unknown formula: {} (Expected one of: {})",
                        value,
                        presets::names().join(", ")
                    )
                })?;
            } else if let Some(value) = arg.strip_prefix("header=") {
                opts.header = value.to_string();
            } else if let Some(value) = arg.strip_prefix("rate=") {
                opts.rate = parse_number("rate", value)?;
            } else if let Some(value) = arg.strip_prefix("out=") {
                opts.out = Some(value.to_string());
            } else {
                return Err(format!("Unrecognized option: {}", arg).into());
            }
        }
        Ok(opts)
    }

    pub fn run() -> Result<()> {
        let opts = parse_args(env::args().skip(1))?;

        match opts.mode {
            Mode::Binary => {
                let driver = Driver::new(TimeRange::from_endpoints(opts.t0, opts.t1), opts.chans);
                let mut sink = BinaryRenderer::new(io::BufWriter::new(io::stdout().lock()));
                driver.run(&opts.formula, &mut sink)?;
                sink.into_inner().flush()?;
            }
            Mode::Table => {
                let driver = Driver::new(TimeRange::from_endpoints(opts.t0, opts.t1), opts.chans);
                let mut out = io::BufWriter::new(io::stdout().lock());
                {
                    let mut sink = TableRenderer::new(&mut out, 0, opts.t0);
                    driver.run(&opts.formula, &mut sink)?;
                    sink.finish()?;
                }
                out.flush()?;
            }
            Mode::SvgFragment | Mode::SvgFullPage => {
                if opts.t1 == 0 {
                    return Err("Require an end time (t1) for SVG rendering".into());
                }
                let mut out = io::BufWriter::new(io::stdout().lock());
                SvgRenderer::new(opts.t0, opts.t1, opts.chans, opts.mode == Mode::SvgFullPage)
                    .with_header_path(&opts.header)
                    .render(&opts.formula, &mut out)?;
                out.flush()?;
            }
            #[cfg(feature = "wav")]
            Mode::Wav => {
                if opts.t1 == 0 {
                    return Err("Require an end time (t1) for WAV rendering".into());
                }
                let path = opts
                    .out
                    .ok_or("Require an output path (out=) for WAV rendering")?;
                let driver = Driver::new(TimeRange::from_endpoints(opts.t0, opts.t1), opts.chans);
                let mut sink = WavRenderer::create(&path, opts.rate, opts.chans)?;
                driver.run(&opts.formula, &mut sink)?;
                sink.finalize()?;
            }
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(args: &[&str]) -> Result<Options> {
            parse_args(args.iter().map(|s| s.to_string()))
        }

        #[test]
        fn test_defaults_match_stream_tool() {
            let opts = parse(&[]).unwrap();
            assert_eq!(opts.mode, Mode::Binary);
            assert_eq!(opts.chans, Channels::Stereo);
            assert_eq!(opts.t0, 0);
            assert_eq!(opts.t1, 0);
        }

        #[test]
        fn test_key_value_arguments_any_order() {
            let opts = parse(&["t1=4096", "mode=s", "chans=1", "t0=64"]).unwrap();
            assert_eq!(opts.mode, Mode::SvgFragment);
            assert_eq!(opts.chans, Channels::Mono);
            assert_eq!(opts.t0, 64);
            assert_eq!(opts.t1, 4096);
        }

        #[test]
        fn test_unrecognized_mode_letter_is_fatal() {
            let err = parse(&["mode=x"]).unwrap_err();
            assert!(err.to_string().contains("Unrecognized mode: [x]"));
        }

        #[test]
        fn test_unrecognized_option_is_fatal() {
            let err = parse(&["loudness=11"]).unwrap_err();
            assert!(err.to_string().contains("Unrecognized option: loudness=11"));
        }

        #[test]
        fn test_channel_domain_is_enforced() {
            assert!(parse(&["chans=2"]).is_ok());
            assert!(parse(&["chans=3"]).is_err());
            assert!(parse(&["chans=0"]).is_err());
        }

        #[test]
        fn test_unknown_formula_is_fatal() {
            let err = parse(&["formula=nope"]).unwrap_err();
            assert!(err.to_string().contains("Unknown formula: nope"));
        }

        #[test]
        fn test_full_page_mode_letter() {
            let opts = parse(&["mode=S", "t1=256"]).unwrap();
            assert_eq!(opts.mode, Mode::SvgFullPage);
        }
    }
}

fn main() {
    if let Err(err) = cli::run() {
        // a consumer hanging up on the stream is the normal end of an
        // unbounded run, not a failure
        if err.is_broken_pipe() {
            return;
        }
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
