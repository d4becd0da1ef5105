use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{InputError, SignError};

/// An opaque sRGB color, written as a CSS hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Color {
    type Err = SignError;

    /// Parses `#rgb` or `#rrggbb`, case-insensitive.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || SignError::from(InputError::InvalidColor(value.to_owned()));
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = SignError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("#CCCCCC".parse::<Color>().unwrap(), Color::rgb(0xcc, 0xcc, 0xcc));
        assert_eq!("#1a2b3c".parse::<Color>().unwrap(), Color::rgb(0x1a, 0x2b, 0x3c));
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["fff", "#ff", "#ggg", "#12345", "red", "#+1+1+1"] {
            assert!(bad.parse::<Color>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn displays_lowercase_long_form() {
        assert_eq!("#ABC".parse::<Color>().unwrap().to_string(), "#aabbcc");
    }

    #[test]
    fn serde_uses_hex_strings() {
        let color: Color = serde_json::from_str("\"#000\"").unwrap();
        assert_eq!(color, Color::BLACK);
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#000000\"");
        assert!(serde_json::from_str::<Color>("\"black\"").is_err());
    }
}
