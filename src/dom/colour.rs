//! Colour parsing and WCAG contrast
//!
//! Accepts the 16 basic CSS colour keywords and hex notation (`#rgb`,
//! `#rrggbb`, or the same digits without `#`).

use thiserror::Error;

/// The 16 basic CSS colour keywords
const NAMED_COLOURS: [(&str, Rgb); 16] = [
    ("black", Rgb::new(0x00, 0x00, 0x00)),
    ("white", Rgb::new(0xff, 0xff, 0xff)),
    ("red", Rgb::new(0xff, 0x00, 0x00)),
    ("lime", Rgb::new(0x00, 0xff, 0x00)),
    ("blue", Rgb::new(0x00, 0x00, 0xff)),
    ("yellow", Rgb::new(0xff, 0xff, 0x00)),
    ("cyan", Rgb::new(0x00, 0xff, 0xff)),
    ("magenta", Rgb::new(0xff, 0x00, 0xff)),
    ("silver", Rgb::new(0xc0, 0xc0, 0xc0)),
    ("gray", Rgb::new(0x80, 0x80, 0x80)),
    ("maroon", Rgb::new(0x80, 0x00, 0x00)),
    ("olive", Rgb::new(0x80, 0x80, 0x00)),
    ("green", Rgb::new(0x00, 0x80, 0x00)),
    ("purple", Rgb::new(0x80, 0x00, 0x80)),
    ("teal", Rgb::new(0x00, 0x80, 0x80)),
    ("navy", Rgb::new(0x00, 0x00, 0x80)),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColourError {
    #[error("unrecognised colour value `{0}`")]
    Unrecognised(String),
}

/// An sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a colour keyword or hex value
    pub fn parse(value: &str) -> Result<Self, ColourError> {
        let trimmed = value.trim().to_ascii_lowercase();

        if let Some((_, colour)) = NAMED_COLOURS.iter().find(|(name, _)| *name == trimmed) {
            return Ok(*colour);
        }

        parse_hex(trimmed.trim_start_matches('#'))
            .ok_or_else(|| ColourError::Unrecognised(value.trim().to_string()))
    }
}

fn parse_hex(digits: &str) -> Option<Rgb> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match digits.len() {
        3 => Some(Rgb::new(
            channel(&digits[0..1].repeat(2))?,
            channel(&digits[1..2].repeat(2))?,
            channel(&digits[2..3].repeat(2))?,
        )),
        6 => Some(Rgb::new(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        _ => None,
    }
}

/// Relative luminance per WCAG 2.x
pub fn relative_luminance(colour: Rgb) -> f64 {
    let linear = [colour.r, colour.g, colour.b].map(|c| {
        let v = f64::from(c) / 255.0;
        if v <= 0.04045 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    });
    0.2126 * linear[0] + 0.7152 * linear[1] + 0.0722 * linear[2]
}

/// Contrast ratio between two colours, always >= 1.0
pub fn contrast_ratio(first: Rgb, second: Rgb) -> f64 {
    let l1 = relative_luminance(first);
    let l2 = relative_luminance(second);
    let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}
