#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually. Supports environment variable overrides via the
//! `SCROLLTEXT_*` prefix; explicit flags win over the environment.

use std::env;
use std::process;

use scrolltext_render::PixelFormat;
use scrolltext_runtime::{DEFAULT_DPI, DEFAULT_FACE};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Face name that selects the procedural block engine instead of a font file.
pub const BUILTIN_FACE: &str = "builtin";

const HELP_TEXT: &str = "\
scrolltext demo: scrolls English numerals across a headless pixel surface

USAGE:
    scrolltext-demo [OPTIONS]

OPTIONS:
    --font=PATH          Font file, or 'builtin' for block glyphs (default: /system/fonts/Roboto-Regular.ttf)
    --point-size=N       Point size (default: 8)
    --dpi=N              Dots per inch (default: 480)
    --size=WxH           Surface size in pixels (default: 1080x1920)
    --stride=N           Row stride in pixels, at least the width (default: width)
    --format=FMT         Pixel format: 'rgba8888', 'rgb565', or raw code 1/4 (default: rgba8888)
    --margins=X,Y        Text area margins in pixels (default: 10,250)
    --line-gap=N         Extra pixels between lines (default: 10)
    --interval-ms=N      Delay between blocks in ms (default: 1000)
    --frames=N           Stop after N numerals, 0 runs until --run-ms (default: 20)
    --start=N            First numeral (default: 0)
    --run-ms=N           Run time when --frames=0 (default: 5000)
    --tap=X,Y            Tap at X,Y once the run ends
    --snapshot=PATH      Write the last presented frame as a PPM image
    --summary=PATH       Write the run summary as JSON ('-' for stdout)
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    SCROLLTEXT_FONT          Override --font
    SCROLLTEXT_POINT_SIZE    Override --point-size
    SCROLLTEXT_DPI           Override --dpi (unparsable values fall back to 480)
    SCROLLTEXT_SIZE          Override --size (e.g., 720x1280)
    SCROLLTEXT_FORMAT        Override --format
    SCROLLTEXT_INTERVAL_MS   Override --interval-ms
    SCROLLTEXT_FRAMES        Override --frames
    SCROLLTEXT_SNAPSHOT      Override --snapshot
    SCROLLTEXT_SUMMARY       Override --summary
    SCROLLTEXT_TAP           Override --tap
    RUST_LOG                 Log filter (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Font path, or [`BUILTIN_FACE`].
    pub font: String,
    pub point_size: u32,
    pub dpi: u32,
    pub width: usize,
    pub height: usize,
    /// Row stride in pixels; `None` means tightly packed.
    pub stride: Option<usize>,
    pub format: PixelFormat,
    pub margin_x: usize,
    pub margin_y: usize,
    pub line_gap: i32,
    pub interval_ms: u64,
    /// Numerals to produce (0 = unbounded, run for `run_ms`).
    pub frames: u64,
    pub start: u64,
    pub run_ms: u64,
    pub tap: Option<(i32, i32)>,
    pub snapshot: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseError {
    Help,
    Version,
    InvalidValue { flag: &'static str, value: String },
    UnknownArg(String),
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            font: DEFAULT_FACE.into(),
            point_size: 8,
            dpi: DEFAULT_DPI,
            width: 1080,
            height: 1920,
            stride: None,
            format: PixelFormat::Rgba8888,
            margin_x: 10,
            margin_y: 250,
            line_gap: 10,
            interval_ms: 1000,
            frames: 20,
            start: 0,
            run_ms: 5000,
            tap: None,
            snapshot: None,
            summary: None,
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("scrolltext-demo {VERSION}");
                process::exit(0);
            }
            Err(ParseError::InvalidValue { flag, value }) => {
                eprintln!("Invalid {flag} value: {value}");
                process::exit(1);
            }
            Err(ParseError::UnknownArg(arg)) => {
                eprintln!("Unknown argument: {arg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Stride to allocate the surface with.
    #[must_use]
    pub fn effective_stride(&self) -> usize {
        self.stride.unwrap_or(self.width)
    }

    #[must_use]
    pub fn uses_builtin_face(&self) -> bool {
        self.font == BUILTIN_FACE
    }

    pub(crate) fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Environment first; invalid values keep the default.
        if let Some(val) = get_env("SCROLLTEXT_FONT")
            && !val.trim().is_empty()
        {
            opts.font = val;
        }
        if let Some(val) = get_env("SCROLLTEXT_POINT_SIZE")
            && let Ok(n) = val.trim().parse()
        {
            opts.point_size = n;
        }
        opts.dpi = get_env("SCROLLTEXT_DPI")
            .and_then(|val| val.trim().parse().ok())
            .filter(|&dpi| dpi > 0)
            .unwrap_or(DEFAULT_DPI);
        if let Some(val) = get_env("SCROLLTEXT_SIZE")
            && let Some((w, h)) = parse_size(&val)
        {
            opts.width = w;
            opts.height = h;
        }
        if let Some(val) = get_env("SCROLLTEXT_FORMAT")
            && let Some(format) = parse_format(&val)
        {
            opts.format = format;
        }
        if let Some(val) = get_env("SCROLLTEXT_INTERVAL_MS")
            && let Ok(n) = val.trim().parse()
        {
            opts.interval_ms = n;
        }
        if let Some(val) = get_env("SCROLLTEXT_FRAMES")
            && let Ok(n) = val.trim().parse()
        {
            opts.frames = n;
        }
        if let Some(val) = get_env("SCROLLTEXT_SNAPSHOT")
            && !val.trim().is_empty()
        {
            opts.snapshot = Some(val);
        }
        if let Some(val) = get_env("SCROLLTEXT_SUMMARY")
            && !val.trim().is_empty()
        {
            opts.summary = Some(val);
        }
        if let Some(val) = get_env("SCROLLTEXT_TAP") {
            opts.tap = parse_pair(&val);
        }

        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => return Err(ParseError::Help),
                "--version" | "-V" => return Err(ParseError::Version),
                other => {
                    let Some((flag, val)) = other.split_once('=') else {
                        return Err(ParseError::UnknownArg(other.to_string()));
                    };
                    opts.apply_flag(flag, val)?;
                }
            }
        }

        Ok(opts)
    }

    fn apply_flag(&mut self, flag: &str, val: &str) -> Result<(), ParseError> {
        match flag {
            "--font" => self.font = val.to_string(),
            "--point-size" => self.point_size = parse_number("--point-size", val)?,
            "--dpi" => {
                self.dpi = parse_number("--dpi", val)?;
                if self.dpi == 0 {
                    return Err(invalid("--dpi", val));
                }
            }
            "--size" => {
                let (w, h) = parse_size(val).ok_or_else(|| invalid("--size", val))?;
                self.width = w;
                self.height = h;
            }
            "--stride" => self.stride = Some(parse_number("--stride", val)?),
            "--format" => self.format = parse_format(val).ok_or_else(|| invalid("--format", val))?,
            "--margins" => {
                let (x, y) = parse_pair(val).ok_or_else(|| invalid("--margins", val))?;
                self.margin_x = usize::try_from(x).map_err(|_| invalid("--margins", val))?;
                self.margin_y = usize::try_from(y).map_err(|_| invalid("--margins", val))?;
            }
            "--line-gap" => self.line_gap = parse_number("--line-gap", val)?,
            "--interval-ms" => self.interval_ms = parse_number("--interval-ms", val)?,
            "--frames" => self.frames = parse_number("--frames", val)?,
            "--start" => self.start = parse_number("--start", val)?,
            "--run-ms" => self.run_ms = parse_number("--run-ms", val)?,
            "--tap" => self.tap = Some(parse_pair(val).ok_or_else(|| invalid("--tap", val))?),
            "--snapshot" => self.snapshot = Some(val.to_string()),
            "--summary" => self.summary = Some(val.to_string()),
            _ => return Err(ParseError::UnknownArg(format!("{flag}={val}"))),
        }
        Ok(())
    }
}

fn invalid(flag: &'static str, value: &str) -> ParseError {
    ParseError::InvalidValue {
        flag,
        value: value.to_string(),
    }
}

fn parse_number<T: std::str::FromStr>(flag: &'static str, val: &str) -> Result<T, ParseError> {
    val.trim().parse().map_err(|_| invalid(flag, val))
}

fn parse_size(raw: &str) -> Option<(usize, usize)> {
    let mut parts = raw.trim().split(['x', 'X']);
    let width: usize = parts.next()?.parse().ok()?;
    let height: usize = parts.next()?.parse().ok()?;
    if parts.next().is_some() || width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}

fn parse_pair(raw: &str) -> Option<(i32, i32)> {
    let (x, y) = raw.trim().split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// Accepts a format name or the host's raw format code.
fn parse_format(raw: &str) -> Option<PixelFormat> {
    let lower = raw.trim().to_ascii_lowercase();
    match lower.as_str() {
        "rgba" | "rgba8888" => Some(PixelFormat::Rgba8888),
        "565" | "rgb565" => Some(PixelFormat::Rgb565),
        code => PixelFormat::from_raw(code.parse().ok()?).ok(),
    }
}
