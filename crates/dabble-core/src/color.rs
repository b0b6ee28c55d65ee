//! Color selection model and random color generation.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

/// Color selected in the color menu.
///
/// The menu exposes a numeric current value; [`ColorChoice::from_code`]
/// fixes the mapping. Unknown codes fall back to purple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// A fresh random RGB color on every resolution.
    #[default]
    Random,
    Red,
    Green,
    Blue,
    Purple,
}

impl ColorChoice {
    /// Map a menu value to a choice: 0 random, 1 red, 2 green, 3 blue,
    /// anything else purple.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => ColorChoice::Random,
            1 => ColorChoice::Red,
            2 => ColorChoice::Green,
            3 => ColorChoice::Blue,
            _ => ColorChoice::Purple,
        }
    }

    /// Resolve the choice to a concrete color.
    ///
    /// `Random` draws from `rng` on every call, so a stroke painted with it
    /// comes out speckled rather than uniform.
    pub fn resolve(self, rng: &mut ColorRng) -> Color {
        match self {
            ColorChoice::Random => rng.next_color(),
            ColorChoice::Red => Color::from_rgba8(255, 0, 0, 255),
            ColorChoice::Green => Color::from_rgba8(0, 128, 0, 255),
            ColorChoice::Blue => Color::from_rgba8(0, 0, 255, 255),
            ColorChoice::Purple => Color::from_rgba8(128, 0, 128, 255),
        }
    }
}

/// Process-wide counter so entropy-seeded generators differ even without a
/// time source.
static SEED_COUNTER: AtomicU32 = AtomicU32::new(1);

/// Avalanche mix (splitmix32-like) for counter-derived randomness.
fn mix(mut x: u32) -> u32 {
    x = x.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    x
}

/// Small deterministic RGB generator.
///
/// Counter plus avalanche mix, so it behaves the same on every platform;
/// seedable for reproducible sequences in tests.
#[derive(Debug, Clone)]
pub struct ColorRng {
    state: u32,
}

impl ColorRng {
    /// Generator seeded from the process-wide counter.
    pub fn from_entropy() -> Self {
        Self::seeded(mix(SEED_COUNTER.fetch_add(1, Ordering::Relaxed)))
    }

    /// Generator with a fixed seed.
    pub fn seeded(seed: u32) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x9E3779B9);
        mix(self.state)
    }

    /// A fresh opaque color with random 0-255 RGB channels.
    pub fn next_color(&mut self) -> Color {
        let [r, g, b, _] = self.next_u32().to_le_bytes();
        Color::from_rgba8(r, g, b, 255)
    }
}

impl Default for ColorRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
