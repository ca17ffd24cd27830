//! Colours and the decoration palette
//!
//! Palette entries are hex strings without a leading `#` (`ff0000`). An
//! optional fourth byte is read as alpha (`ff000010`).

use crate::error::{Result, TreeError};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Default palette: reds, white and two greens.
pub const DEFAULT_PALETTE: [&str; 5] = ["ff0000", "ff7878", "ffffff", "74d680", "378b29"];

/// Built-in palettes cycled with the `c` key
pub const PRESETS: [(&str, &[&str]); 4] = [
    ("classic", &DEFAULT_PALETTE),
    ("frost", &["e0f7ff", "8ecae6", "219ebc", "ffffff", "b8c0ff"]),
    ("gold", &["ffd700", "daa520", "fff1b8", "b22222", "ffffff"]),
    ("candy", &["ff4f9a", "ffffff", "7ae582", "ffb3c6", "c77dff"]),
];

/// An 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    pub const BLACK: Colour = Colour::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse `rrggbb` or `rrggbbaa`. A leading `#` is tolerated.
    pub fn parse_hex(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TreeError::InvalidColour(s.to_string()));
        }

        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| TreeError::InvalidColour(s.to_string()))
        };

        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self { r: byte(0)?, g: byte(2)?, b: byte(4)?, a })
    }

    /// Linear interpolation of all four channels, `t` clamped to [0, 1]
    pub fn lerp(self, other: Colour, t: f64) -> Colour {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Colour {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

impl FromStr for Colour {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// Ordered, non-empty list of colours available to decorations and presents.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colours: Vec<Colour>,
}

impl Palette {
    pub fn new(colours: Vec<Colour>) -> Result<Self> {
        if colours.is_empty() {
            return Err(TreeError::EmptyPalette);
        }
        Ok(Self { colours })
    }

    pub fn from_hex<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let colours = entries
            .into_iter()
            .map(|s| Colour::parse_hex(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(colours)
    }

    /// Parse a comma-separated list such as `ff0000,ffffff`
    pub fn parse_list(list: &str) -> Result<Self> {
        Self::from_hex(list.split(',').map(str::trim).filter(|s| !s.is_empty()))
    }

    /// Built-in palette by index, wrapping around
    pub fn preset(index: usize) -> (&'static str, Self) {
        let (name, entries) = PRESETS[index % PRESETS.len()];
        let colours = entries
            .iter()
            .filter_map(|hex| Colour::parse_hex(hex).ok())
            .collect();
        (name, Self { colours })
    }

    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Always false: [`Palette::new`] rejects an empty list
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    /// Uniform pick over the ordered entries
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Colour {
        self.colours[rng.gen_range(0..self.colours.len())]
    }

    /// Uniform pick among entries that differ from `exclude`.
    ///
    /// A palette with only one distinct colour cannot satisfy this; the
    /// excluded colour is returned so callers render equal colours instead
    /// of failing.
    pub fn pick_excluding<R: Rng + ?Sized>(&self, rng: &mut R, exclude: Colour) -> Colour {
        let candidates: Vec<Colour> = self.colours.iter().copied().filter(|c| *c != exclude).collect();
        if candidates.is_empty() {
            log::warn!("palette has a single distinct colour ({exclude}); reusing it");
            return exclude;
        }
        candidates[rng.gen_range(0..candidates.len())]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::preset(0).1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn parse_six_digit_hex() {
        let c = Colour::parse_hex("74d680").unwrap();
        assert_eq!(c, Colour::rgb(0x74, 0xd6, 0x80));
        assert_eq!(c.to_string(), "74d680");
    }

    #[test]
    fn parse_eight_digit_hex_keeps_alpha() {
        let c: Colour = "ff000010".parse().unwrap();
        assert_eq!(c.a, 0x10);
        assert_eq!(c.to_string(), "ff000010");
    }

    #[test]
    fn reject_bad_hex() {
        assert!(Colour::parse_hex("red").is_err());
        assert!(Colour::parse_hex("12345").is_err());
        assert!(Colour::parse_hex("gg0000").is_err());
    }

    #[test]
    fn default_palette_has_five_entries() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 5);
        assert_eq!(palette.colours()[0], Colour::rgb(255, 0, 0));
        assert_eq!(palette.colours()[4], Colour::rgb(0x37, 0x8b, 0x29));
    }

    #[test]
    fn empty_palette_is_an_error() {
        assert!(matches!(Palette::new(Vec::new()), Err(TreeError::EmptyPalette)));
        assert!(matches!(Palette::parse_list(" , "), Err(TreeError::EmptyPalette)));
    }

    #[test]
    fn parse_list_trims_entries() {
        let palette = Palette::parse_list("ff0000, ffffff ,00ff00").unwrap();
        assert_eq!(palette.len(), 3);
    }

    #[test]
    fn pick_excluding_never_returns_excluded() {
        let palette = Palette::default();
        let mut rng = StdRng::seed_from_u64(7);
        let red = Colour::rgb(255, 0, 0);
        for _ in 0..200 {
            assert_ne!(palette.pick_excluding(&mut rng, red), red);
        }
    }

    #[test]
    fn pick_excluding_degrades_on_single_colour() {
        let palette = Palette::from_hex(["ffffff", "ffffff"]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let white = Colour::rgb(255, 255, 255);
        assert!(!palette.is_empty());
        assert_eq!(palette.pick_excluding(&mut rng, white), white);
    }

    #[test]
    fn presets_wrap_around() {
        let (name, _) = Palette::preset(PRESETS.len());
        assert_eq!(name, "classic");
    }
}
