//! Single-letter directives accepted on the command line.

use std::str::FromStr;

use thiserror::Error;

/// Lowest brightness accepted by the `B` directive.
pub const MIN_BRIGHTNESS: u32 = 1;

/// Highest brightness accepted by the `B` directive.
pub const MAX_BRIGHTNESS: u32 = 255;

/// Malformed invocation. Always fatal: the caller gets usage text and exit 1.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// Port given without any directive
    #[error("no commands given")]
    MissingCommands,

    /// Empty token on the command line
    #[error("empty command")]
    EmptyDirective,

    /// Leading character is not a known directive
    #[error("unknown command {0:?}")]
    UnknownDirective(String),

    /// `B` suffix does not start with an unsigned integer
    #[error("invalid brightness {0:?}")]
    InvalidBrightness(String),

    /// `B` suffix parsed but falls outside 1-255
    #[error("brightness {0} outside 1-255")]
    BrightnessOutOfRange(u32),
}

/// One parsed command token.
///
/// Only the leading character selects the directive (case-insensitive);
/// anything after it is ignored except for `B`, which carries the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `L`: turn the light on
    LightOn,
    /// `D`: turn the light off
    LightOff,
    /// `Bnnn`: set brightness
    SetBrightness(u8),
    /// `G`: read brightness back
    GetBrightness,
    /// `V`: report the tool version
    Version,
    /// `O`: open the cover
    Open,
    /// `C`: close the cover
    Close,
    /// `P`: product identity probe
    ProductId,
    /// `F`: firmware probe
    Firmware,
    /// `S`: skip the exit delay
    Silent,
}

impl FromStr for Directive {
    type Err = UsageError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut chars = token.chars();
        let leading = chars.next().ok_or(UsageError::EmptyDirective)?;

        match leading.to_ascii_uppercase() {
            'L' => Ok(Directive::LightOn),
            'D' => Ok(Directive::LightOff),
            'B' => parse_brightness(chars.as_str()).map(Directive::SetBrightness),
            'G' => Ok(Directive::GetBrightness),
            'V' => Ok(Directive::Version),
            'O' => Ok(Directive::Open),
            'C' => Ok(Directive::Close),
            'P' => Ok(Directive::ProductId),
            'F' => Ok(Directive::Firmware),
            'S' => Ok(Directive::Silent),
            _ => Err(UsageError::UnknownDirective(token.to_string())),
        }
    }
}

/// Parse the numeric suffix of a `B` token.
///
/// Leading whitespace and a `+` sign are skipped and the longest run of
/// digits is taken; anything after it is ignored (`B200x` sets 200).
/// Out-of-range values are rejected rather than clamped.
fn parse_brightness(arg: &str) -> Result<u8, UsageError> {
    let unsigned = arg.trim_start();
    let unsigned = unsigned.strip_prefix('+').unwrap_or(unsigned);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];

    if digits.is_empty() {
        return Err(UsageError::InvalidBrightness(arg.to_string()));
    }

    let value: u32 = digits
        .parse()
        .map_err(|_| UsageError::InvalidBrightness(arg.to_string()))?;

    if !(MIN_BRIGHTNESS..=MAX_BRIGHTNESS).contains(&value) {
        return Err(UsageError::BrightnessOutOfRange(value));
    }

    u8::try_from(value).map_err(|_| UsageError::BrightnessOutOfRange(value))
}
