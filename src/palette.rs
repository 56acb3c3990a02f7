//! Colour palettes for entities
//!
//! Every palette is fully resolved when an entity is constructed; nothing is
//! filled in lazily at draw time.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::sim::SceneryKind;

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Subtract `amount` from every channel, saturating at 0
    pub fn darken(self, amount: u8) -> Self {
        Rgb(
            self.0.saturating_sub(amount),
            self.1.saturating_sub(amount),
            self.2.saturating_sub(amount),
        )
    }
}

impl Default for Rgb {
    fn default() -> Self {
        COLOR_BG
    }
}

pub const COLOR_BG: Rgb = Rgb(10, 10, 30);
pub const COLOR_PLAYER: Rgb = Rgb(60, 180, 200);
pub const COLOR_BULLET: Rgb = Rgb(255, 220, 20);
pub const COLOR_SCENERY: Rgb = Rgb(80, 100, 140);
pub const COLOR_HUD: Rgb = Rgb(240, 240, 240);

/// Enemy "space monster" colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyPalette {
    pub body: Rgb,
    pub eye: Rgb,
    pub pupil: Rgb,
    pub mouth: Rgb,
    pub outline: Rgb,
}

pub const ENEMY_PALETTES: [EnemyPalette; 5] = [
    // purple
    EnemyPalette {
        body: Rgb(180, 80, 150),
        eye: Rgb(255, 255, 255),
        pupil: Rgb(20, 20, 30),
        mouth: Rgb(30, 10, 40),
        outline: Rgb(90, 30, 80),
    },
    // teal
    EnemyPalette {
        body: Rgb(80, 160, 200),
        eye: Rgb(255, 255, 255),
        pupil: Rgb(8, 20, 30),
        mouth: Rgb(10, 60, 90),
        outline: Rgb(30, 80, 100),
    },
    // orange
    EnemyPalette {
        body: Rgb(200, 120, 60),
        eye: Rgb(255, 255, 255),
        pupil: Rgb(30, 20, 10),
        mouth: Rgb(80, 30, 10),
        outline: Rgb(120, 60, 30),
    },
    // green
    EnemyPalette {
        body: Rgb(120, 200, 100),
        eye: Rgb(255, 255, 255),
        pupil: Rgb(10, 30, 10),
        mouth: Rgb(30, 70, 20),
        outline: Rgb(50, 120, 50),
    },
    // pink
    EnemyPalette {
        body: Rgb(220, 80, 120),
        eye: Rgb(255, 255, 255),
        pupil: Rgb(20, 10, 20),
        mouth: Rgb(80, 10, 40),
        outline: Rgb(140, 50, 80),
    },
];

/// Asteroid body and outline colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsteroidPalette {
    pub body: Rgb,
    pub outline: Rgb,
}

pub const ASTEROID_PALETTES: [AsteroidPalette; 4] = [
    // neutral gray
    AsteroidPalette { body: Rgb(120, 120, 120), outline: Rgb(80, 80, 80) },
    // brownish
    AsteroidPalette { body: Rgb(150, 130, 100), outline: Rgb(100, 80, 60) },
    // pale rock
    AsteroidPalette { body: Rgb(170, 170, 150), outline: Rgb(110, 110, 90) },
    // bluish rock
    AsteroidPalette { body: Rgb(140, 160, 180), outline: Rgb(90, 110, 130) },
];

/// Scenery colours: primary fill, secondary (ring/tail/second cloud), highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneryPalette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub highlight: Rgb,
}

pub fn random_enemy_palette(rng: &mut impl Rng) -> EnemyPalette {
    *ENEMY_PALETTES.choose(rng).unwrap_or(&ENEMY_PALETTES[0])
}

pub fn random_asteroid_palette(rng: &mut impl Rng) -> AsteroidPalette {
    *ASTEROID_PALETTES
        .choose(rng)
        .unwrap_or(&ASTEROID_PALETTES[0])
}

fn random_rgb(rng: &mut impl Rng, lo: u8, hi: u8) -> Rgb {
    Rgb(
        rng.random_range(lo..=hi),
        rng.random_range(lo..=hi),
        rng.random_range(lo..=hi),
    )
}

/// Build the palette a scenery object of `kind` is drawn with.
///
/// Planets and nebulae get randomized tones; stars and comets use fixed
/// colours.
pub fn scenery_palette(kind: SceneryKind, rng: &mut impl Rng) -> SceneryPalette {
    match kind {
        SceneryKind::Planet => SceneryPalette {
            primary: random_rgb(rng, 80, 230),
            secondary: random_rgb(rng, 20, 120),
            highlight: Rgb(255, 255, 255),
        },
        SceneryKind::Comet => SceneryPalette {
            primary: Rgb(240, 240, 200),
            secondary: Rgb(200, 200, 180),
            highlight: Rgb(255, 255, 220),
        },
        SceneryKind::Nebula => SceneryPalette {
            primary: Rgb(
                rng.random_range(40..=160),
                rng.random_range(40..=160),
                rng.random_range(80..=200),
            ),
            secondary: random_rgb(rng, 60, 200),
            highlight: Rgb(200, 200, 255),
        },
        SceneryKind::Star => SceneryPalette {
            primary: Rgb(255, 255, 200),
            secondary: Rgb(255, 220, 120),
            highlight: Rgb(255, 255, 255),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_darken_saturates() {
        assert_eq!(Rgb(40, 10, 0).darken(30), Rgb(10, 0, 0));
    }

    #[test]
    fn test_planet_palette_ranges() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let p = scenery_palette(SceneryKind::Planet, &mut rng);
            for c in [p.primary.0, p.primary.1, p.primary.2] {
                assert!((80..=230).contains(&c));
            }
            for c in [p.secondary.0, p.secondary.1, p.secondary.2] {
                assert!((20..=120).contains(&c));
            }
            assert_eq!(p.highlight, Rgb(255, 255, 255));
        }
    }

    #[test]
    fn test_fixed_palettes_are_stable() {
        let mut rng = Pcg32::seed_from_u64(1);
        let a = scenery_palette(SceneryKind::Star, &mut rng);
        let b = scenery_palette(SceneryKind::Star, &mut rng);
        assert_eq!(a, b);
        let c = scenery_palette(SceneryKind::Comet, &mut rng);
        assert_eq!(c.primary, Rgb(240, 240, 200));
    }

    #[test]
    fn test_random_palettes_come_from_tables() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..50 {
            assert!(ENEMY_PALETTES.contains(&random_enemy_palette(&mut rng)));
            assert!(ASTEROID_PALETTES.contains(&random_asteroid_palette(&mut rng)));
        }
    }
}
