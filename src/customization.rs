//! Wheel customization
//!
//! Immutable per render: the renderer and button styling only ever read it.
//! The winner count is clamped when it is set, so reads never need to.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::assets::ImageRef;
use crate::consts::{MAX_WINNERS, MIN_WINNERS};
use crate::error::ValidationError;

/// Placeholder title shown until the user names the wheel
pub const DEFAULT_TITLE: &str = "Crowd Spin";

/// An RGBA color with 8-bit channels and float alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Perceived brightness (0-255)
    pub fn brightness(&self) -> f32 {
        (self.r as f32 * 299.0 + self.g as f32 * 587.0 + self.b as f32 * 114.0) / 1000.0
    }

    /// CSS color string for canvas fill/stroke styles
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// A `#RRGGBB` color as entered by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional)
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn red(&self) -> u8 {
        self.r
    }

    pub fn to_rgba(&self) -> Rgba {
        Rgba::rgb(self.r, self.g, self.b)
    }

    /// Uniformly random color
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let v: u32 = rng.random_range(0..=0xFF_FFFF);
        Self::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<HexColor> for String {
    fn from(c: HexColor) -> Self {
        c.to_string()
    }
}

/// Label text color on the wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextColor {
    #[default]
    White,
    Black,
}

impl TextColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextColor::White => "white",
            TextColor::Black => "black",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "white" => Some(TextColor::White),
            "black" => Some(TextColor::Black),
            _ => None,
        }
    }

    pub fn to_rgba(&self) -> Rgba {
        match self {
            TextColor::White => Rgba::WHITE,
            TextColor::Black => Rgba::BLACK,
        }
    }
}

/// Readable text color on top of a background (brightness > 140 -> black)
pub fn contrast_text_color(background: HexColor) -> TextColor {
    if background.to_rgba().brightness() > 140.0 {
        TextColor::Black
    } else {
        TextColor::White
    }
}

/// Celebration shown when a winner is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WinnerEffect {
    None,
    #[default]
    Confetti,
    Sparkles,
}

impl WinnerEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            WinnerEffect::None => "none",
            WinnerEffect::Confetti => "confetti",
            WinnerEffect::Sparkles => "sparkles",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(WinnerEffect::None),
            "confetti" => Some(WinnerEffect::Confetti),
            "sparkles" => Some(WinnerEffect::Sparkles),
            _ => None,
        }
    }
}

/// Number of winners to draw, always within [1, 10]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct WinnerCount(u8);

impl WinnerCount {
    /// Clamp any requested count into range
    pub fn new(requested: i64) -> Self {
        Self(requested.clamp(MIN_WINNERS as i64, MAX_WINNERS as i64) as u8)
    }

    pub fn get(&self) -> usize {
        self.0 as usize
    }
}

impl Default for WinnerCount {
    fn default() -> Self {
        Self(MIN_WINNERS)
    }
}

impl From<i64> for WinnerCount {
    fn from(requested: i64) -> Self {
        Self::new(requested)
    }
}

impl From<WinnerCount> for u8 {
    fn from(count: WinnerCount) -> Self {
        count.0
    }
}

/// Button colors derived from a background color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonStyle {
    pub background: Rgba,
    pub foreground: Rgba,
    /// Drop shadow behind white text
    pub text_shadow: Option<Rgba>,
    /// Subtle border around light buttons
    pub border: Option<Rgba>,
}

impl ButtonStyle {
    pub fn for_background(background: HexColor) -> Self {
        let text = contrast_text_color(background);
        let is_white = text == TextColor::White;
        Self {
            background: background.to_rgba(),
            foreground: text.to_rgba(),
            text_shadow: is_white.then(|| Rgba::BLACK.with_alpha(0.5)),
            border: (!is_white).then(|| Rgba::BLACK.with_alpha(0.2)),
        }
    }
}

/// How the wheel looks and how many winners it draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customization {
    pub primary_color: HexColor,
    pub secondary_color: HexColor,
    pub title: String,
    /// Owned by the configuration; never mutated by the renderer
    pub logo_url: Option<ImageRef>,
    /// Owned by the configuration; never mutated by the renderer
    pub background_image: Option<ImageRef>,
    pub winner_effect: WinnerEffect,
    pub additional_text: String,
    number_of_winners: WinnerCount,
    pub text_color: TextColor,
}

impl Default for Customization {
    fn default() -> Self {
        Self {
            primary_color: HexColor::new(0xAB, 0x53, 0x03),
            secondary_color: HexColor::new(0xDD, 0x92, 0x5B),
            title: DEFAULT_TITLE.to_string(),
            logo_url: None,
            background_image: None,
            winner_effect: WinnerEffect::default(),
            additional_text: String::new(),
            number_of_winners: WinnerCount::default(),
            text_color: TextColor::default(),
        }
    }
}

impl Customization {
    pub fn number_of_winners(&self) -> usize {
        self.number_of_winners.get()
    }

    /// Set the winner count (clamped to [1, 10])
    pub fn set_number_of_winners(&mut self, requested: i64) {
        self.number_of_winners = WinnerCount::new(requested);
    }

    /// Segment fill for segment `index` (primary on even, secondary on odd)
    pub fn segment_color(&self, index: usize) -> Rgba {
        if index % 2 == 0 {
            self.primary_color.to_rgba()
        } else {
            self.secondary_color.to_rgba()
        }
    }

    pub fn primary_button_style(&self) -> ButtonStyle {
        ButtonStyle::for_background(self.primary_color)
    }

    pub fn secondary_button_style(&self) -> ButtonStyle {
        ButtonStyle::for_background(self.secondary_color)
    }

    /// Replace both colors with a random pair whose red channels differ by 50+
    pub fn randomize_colors<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let primary = HexColor::random(rng);
        let mut secondary = HexColor::random(rng);
        while primary.red().abs_diff(secondary.red()) < 50 {
            secondary = HexColor::random(rng);
        }
        self.primary_color = primary;
        self.secondary_color = secondary;
        log::info!("Randomized colors: {} / {}", primary, secondary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_hex_parse() {
        assert_eq!(HexColor::parse("#ff8000").unwrap(), HexColor::new(255, 128, 0));
        assert_eq!(HexColor::parse("FF8000").unwrap(), HexColor::new(255, 128, 0));
        assert!(HexColor::parse("#ff80").is_err());
        assert!(HexColor::parse("#gg0000").is_err());
        assert!(HexColor::parse("#ff8000aa").is_err());
        assert_eq!(HexColor::new(171, 83, 3).to_string(), "#AB5303");
    }

    #[test]
    fn test_winner_count_clamps() {
        assert_eq!(WinnerCount::new(15).get(), 10);
        assert_eq!(WinnerCount::new(0).get(), 1);
        assert_eq!(WinnerCount::new(-4).get(), 1);
        assert_eq!(WinnerCount::new(7).get(), 7);

        let mut c = Customization::default();
        c.set_number_of_winners(42);
        assert_eq!(c.number_of_winners(), 10);
    }

    #[test]
    fn test_deserialize_clamps_and_defaults() {
        let c: Customization = serde_json::from_str(
            r##"{"primaryColor":"#000000","numberOfWinners":15,"textColor":"black","winnerEffect":"sparkles"}"##,
        )
        .unwrap();
        assert_eq!(c.number_of_winners(), 10);
        assert_eq!(c.text_color, TextColor::Black);
        assert_eq!(c.winner_effect, WinnerEffect::Sparkles);
        assert_eq!(c.title, DEFAULT_TITLE);
        assert_eq!(c.secondary_color, Customization::default().secondary_color);

        let c: Customization = serde_json::from_str(r#"{"numberOfWinners":-3}"#).unwrap();
        assert_eq!(c.number_of_winners(), 1);

        assert!(serde_json::from_str::<Customization>(r#"{"primaryColor":"red"}"#).is_err());
    }

    #[test]
    fn test_contrast_text_color() {
        assert_eq!(contrast_text_color(HexColor::new(255, 255, 255)), TextColor::Black);
        assert_eq!(contrast_text_color(HexColor::new(0, 0, 0)), TextColor::White);
        // Brightness exactly 140 stays white
        assert_eq!(contrast_text_color(HexColor::new(140, 140, 140)), TextColor::White);
    }

    #[test]
    fn test_button_styles() {
        let dark = ButtonStyle::for_background(HexColor::new(10, 10, 60));
        assert_eq!(dark.foreground, Rgba::WHITE);
        assert!(dark.text_shadow.is_some());
        assert!(dark.border.is_none());

        let light = ButtonStyle::for_background(HexColor::new(250, 240, 200));
        assert_eq!(light.foreground, Rgba::BLACK);
        assert!(light.text_shadow.is_none());
        assert!(light.border.is_some());
    }

    #[test]
    fn test_segment_colors_alternate() {
        let c = Customization::default();
        assert_eq!(c.segment_color(0), c.primary_color.to_rgba());
        assert_eq!(c.segment_color(1), c.secondary_color.to_rgba());
        assert_eq!(c.segment_color(4), c.primary_color.to_rgba());
    }

    #[test]
    fn test_randomize_colors_keeps_red_apart() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut c = Customization::default();
        for _ in 0..50 {
            c.randomize_colors(&mut rng);
            assert!(c.primary_color.red().abs_diff(c.secondary_color.red()) >= 50);
        }
    }

    #[test]
    fn test_css_output() {
        assert_eq!(Rgba::rgb(255, 0, 16).to_css(), "#ff0010");
        assert_eq!(Rgba::WHITE.with_alpha(0.3).to_css(), "rgba(255, 255, 255, 0.3)");
    }
}
