//! Hex color values attached to gear.
//!
//! Colors are stored as strings so they round-trip verbatim through storage,
//! but every string written through the model is validated here first.

use nom::{
    bytes::complete::take_while_m_n,
    character::complete::{char, multispace0},
    combinator::{all_consuming, map_res, opt},
    IResult, Parser,
};

use crate::error::GreerError;

pub const DEFAULT_GEAR_COLOR: &str = "#000000";

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl HexColor {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: u8::MAX,
        }
    }

    /// Parse `#RRGGBB`, `RRGGBB` or `#RRGGBBAA`.
    pub fn parse(input: &str) -> Result<Self, GreerError> {
        all_consuming(hex_color)
            .parse(input)
            .map(|(_, color)| color)
            .map_err(|e| GreerError::InvalidColor {
                value: input.to_string(),
                message: e.to_string(),
            })
    }

    pub fn to_hex(&self) -> String {
        if self.alpha == u8::MAX {
            format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
        } else {
            format!(
                "#{:02X}{:02X}{:02X}{:02X}",
                self.red, self.green, self.blue, self.alpha
            )
        }
    }

    /// HSB hue in `[0, 1)`. Grays report 0.
    pub fn hue(&self) -> f64 {
        let r = self.red as f64 / 255.0;
        let g = self.green as f64 / 255.0;
        let b = self.blue as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        if delta == 0.0 {
            return 0.0;
        }

        let sector = if max == r {
            ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        sector / 6.0
    }
}

fn hex_byte(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
        |digits: &str| u8::from_str_radix(digits, 16),
    )
    .parse(input)
}

fn hex_color(input: &str) -> IResult<&str, HexColor> {
    let (input, (_, _, red, green, blue, alpha, _)) = (
        multispace0,
        opt(char('#')),
        hex_byte,
        hex_byte,
        hex_byte,
        opt(hex_byte),
        multispace0,
    )
        .parse(input)?;

    Ok((
        input,
        HexColor {
            red,
            green,
            blue,
            alpha: alpha.unwrap_or(u8::MAX),
        },
    ))
}

/// Validate a color string and return its canonical `#RRGGBB[AA]` form.
pub fn normalize(input: &str) -> Result<String, GreerError> {
    HexColor::parse(input).map(|c| c.to_hex())
}

/// Swatches offered when picking a gear color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultColor {
    Black,
    White,
    Gray,
    Red,
    Green,
    Blue,
    Orange,
    Yellow,
    Purple,
    Pink,
}

impl DefaultColor {
    pub const ALL: [DefaultColor; 10] = [
        DefaultColor::Black,
        DefaultColor::White,
        DefaultColor::Gray,
        DefaultColor::Red,
        DefaultColor::Green,
        DefaultColor::Blue,
        DefaultColor::Orange,
        DefaultColor::Yellow,
        DefaultColor::Purple,
        DefaultColor::Pink,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            DefaultColor::Black => "#000000",
            DefaultColor::White => "#FFFFFF",
            DefaultColor::Gray => "#808080",
            DefaultColor::Red => "#FF0000",
            DefaultColor::Green => "#00FF00",
            DefaultColor::Blue => "#0000FF",
            DefaultColor::Orange => "#FFA500",
            DefaultColor::Yellow => "#FFFF00",
            DefaultColor::Purple => "#800080",
            DefaultColor::Pink => "#FFC0CB",
        }
    }
}
