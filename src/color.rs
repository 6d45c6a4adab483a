//! A simple RGBA color, parsed from `#RRGGBB`/`#RRGGBBAA` hex strings, used
//! for the normal/selected/marked/tag border and bar schemes.
use crate::error::Error;
use std::convert::TryFrom;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl Color {
    pub fn new_from_hex(hex: u32) -> Self {
        let bytes = hex.to_be_bytes();
        Self {
            r: bytes[0] as f64 / 255.0,
            g: bytes[1] as f64 / 255.0,
            b: bytes[2] as f64 / 255.0,
            a: bytes[3] as f64 / 255.0,
        }
    }

    pub fn rgb(&self) -> (f64, f64, f64) {
        (self.r, self.g, self.b)
    }

    pub fn rgba(&self) -> (f64, f64, f64, f64) {
        (self.r, self.g, self.b, self.a)
    }

    pub fn as_rgb_hex_string(&self) -> String {
        format!("#{:06x}", self.rgb_u32())
    }

    pub fn rgb_u32(&self) -> u32 {
        ((self.r * 255.0) as u32) << 16 | ((self.g * 255.0) as u32) << 8 | (self.b * 255.0) as u32
    }

    pub fn rgba_u32(&self) -> u32 {
        ((self.r * 255.0) as u32) << 24
            | ((self.g * 255.0) as u32) << 16
            | ((self.b * 255.0) as u32) << 8
            | (self.a * 255.0) as u32
    }

    pub fn with_alpha(mut self, a: f64) -> Self {
        self.a = a.clamp(0.0, 1.0);
        self
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::new_from_hex(hex)
    }
}

impl From<(f64, f64, f64)> for Color {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl From<(f64, f64, f64, f64)> for Color {
    fn from((r, g, b, a): (f64, f64, f64, f64)) -> Self {
        Self { r, g, b, a }
    }
}

impl TryFrom<&str> for Color {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let stripped = s.strip_prefix('#').unwrap_or(s);
        let hex = match stripped.len() {
            6 => u32::from_str_radix(stripped, 16).map(|rgb| (rgb << 8) | 0xff),
            8 => u32::from_str_radix(stripped, 16),
            _ => return Err(Error::InvalidConfig("color".into(), s.to_string())),
        }
        .map_err(|_| Error::InvalidConfig("color".into(), s.to_string()))?;

        Ok(Self::new_from_hex(hex))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_through_rgb_string() {
        let c = Color::try_from("#cc241d").unwrap();
        assert_eq!(c.as_rgb_hex_string(), "#cc241d");
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Color::try_from("not-a-color").is_err());
    }
}
