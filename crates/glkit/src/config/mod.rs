//! Application configuration.
//!
//! [`AppConfig`] is supplied by the program; [`LaunchArgs`] carries the
//! command-line overrides (`--width`, `--height`, `--screen`). Both are folded
//! into [`WindowSettings`] before the window is created.

use std::fmt;
use std::str::FromStr;

/// OpenGL context version, tried in the order given by
/// [`AppConfig::supported_gl_versions`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GlVersion {
    pub major: u8,
    pub minor: u8,
}

impl GlVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for GlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Program-supplied configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Title bar text. Empty means "use the program name".
    pub name: String,
    pub default_screen_width: u32,
    pub default_screen_height: u32,
    /// Close the window when Escape is released.
    pub escape_to_quit: bool,
    /// Context versions to request, most preferred first.
    ///
    /// When more than one is listed, the scene must only issue calls valid
    /// for the version that was actually negotiated.
    pub supported_gl_versions: Vec<GlVersion>,
    /// Skip the `glFlush` issued after each frame.
    pub skip_flush_after_loop: bool,
    pub vsync: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            default_screen_width: 1280,
            default_screen_height: 720,
            escape_to_quit: true,
            supported_gl_versions: vec![GlVersion::new(4, 1)],
            skip_flush_after_loop: false,
            vsync: true,
        }
    }
}

/// Command-line overrides. Zero means "not set"; a zero or negative size on
/// the command line is treated the same way.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct LaunchArgs {
    pub width: u32,
    pub height: u32,
    /// 0 runs windowed; `n` runs fullscreen on the n-th monitor (1-based).
    pub screen: usize,
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing value for --{0}")]
    MissingValue(String),

    #[error("invalid value `{value}` for --{flag}")]
    InvalidValue { flag: String, value: String },
}

impl LaunchArgs {
    /// Parses the process arguments (without the program name).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::parse(std::env::args().skip(1))
    }

    /// Accepts `--flag N`, `--flag=N` and the single-dash forms. Unknown
    /// arguments are left for the application and ignored here.
    pub fn parse<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self::default();
        let mut args = args.into_iter().map(|a| a.as_ref().to_string());

        while let Some(arg) = args.next() {
            let Some(flag) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
                continue;
            };

            let (name, inline) = match flag.split_once('=') {
                Some((name, value)) => (name.to_string(), Some(value.to_string())),
                None => (flag.to_string(), None),
            };

            if !matches!(name.as_str(), "width" | "height" | "screen") {
                continue;
            }

            let value = match inline {
                Some(v) => v,
                None => args
                    .next()
                    .ok_or_else(|| ConfigError::MissingValue(name.clone()))?,
            };

            match name.as_str() {
                "width" => out.width = parse_size(&name, &value)?,
                "height" => out.height = parse_size(&name, &value)?,
                _ => out.screen = parse_value(&name, &value)?,
            }
        }

        Ok(out)
    }
}

fn parse_value<T: FromStr>(flag: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

fn parse_size(flag: &str, value: &str) -> Result<u32, ConfigError> {
    let size: i64 = parse_value(flag, value)?;
    if size <= 0 {
        return Ok(0);
    }
    u32::try_from(size).map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

/// Final window parameters after defaults are applied.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub screen: usize,
}

impl WindowSettings {
    /// `program` is used as the title when `config.name` is empty.
    pub fn resolve(config: &AppConfig, args: &LaunchArgs, program: &str) -> Self {
        let title = if config.name.is_empty() {
            program.to_string()
        } else {
            config.name.clone()
        };

        let width = if args.width > 0 { args.width } else { config.default_screen_width };
        let height = if args.height > 0 { args.height } else { config.default_screen_height };

        Self {
            title,
            width,
            height,
            screen: args.screen,
        }
    }

    pub fn fullscreen(&self) -> bool {
        self.screen != 0
    }
}
