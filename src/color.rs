use crate::rng::RngPolicy;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Exclusive upper bound for each channel of a "dark" color
const DARK_CHANNEL_LIMIT: i64 = 128;

/// A particle's fill color. Cosmetic only; the physics never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Each channel drawn uniformly from `[0, 128)`
    pub fn random_dark<R: RngPolicy + ?Sized>(rng: &mut R) -> Self {
        let mut channel = || rng.int_in(0, DARK_CHANNEL_LIMIT) as u8;
        let r = channel();
        let g = channel();
        let b = channel();
        Self { r, g, b }
    }

    /// Lift a dark color so it stays readable on a black terminal background
    pub fn brightened(self, amount: u8) -> Self {
        Self {
            r: self.r.saturating_add(amount),
            g: self.g.saturating_add(amount),
            b: self.b.saturating_add(amount),
        }
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c.r, c.g, c.b)
    }
}
