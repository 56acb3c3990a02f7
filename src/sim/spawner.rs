//! Procedural generation of enemies, asteroids and background scenery
//!
//! Spawn functions are stateless: all randomness comes through the `rng`
//! argument and entity IDs are allocated by the caller.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::entity::{Enemy, EnemyPattern, Obstacle, Scenery, SceneryKind};
use crate::consts::*;
use crate::palette::{random_asteroid_palette, random_enemy_palette, scenery_palette};

/// Uniform float in `[a, b)`, accepting bounds in either order.
/// A degenerate range yields its single value.
pub fn uniform(rng: &mut impl Rng, a: f32, b: f32) -> f32 {
    if !(a.is_finite() && b.is_finite()) || a == b {
        return a;
    }
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    rng.random_range(lo..hi)
}

/// Accumulates frame time and fires once its interval is reached
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub interval: f32,
    pub elapsed: f32,
}

impl SpawnTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt`. On firing the timer restarts from zero; any excess
    /// time is dropped rather than carried over.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
}

/// Scenery kind weights with nebulae enabled
pub const SCENERY_WEIGHTS_WITH_NEBULAE: [(SceneryKind, u32); 4] = [
    (SceneryKind::Star, 40),
    (SceneryKind::Planet, 25),
    (SceneryKind::Comet, 20),
    (SceneryKind::Nebula, 15),
];

/// Scenery kind weights with nebulae excluded
pub const SCENERY_WEIGHTS: [(SceneryKind, u32); 3] = [
    (SceneryKind::Star, 60),
    (SceneryKind::Planet, 25),
    (SceneryKind::Comet, 15),
];

pub fn spawn_enemy(id: u32, rng: &mut impl Rng, width: f32) -> Enemy {
    let x = uniform(rng, 20.0, width - 20.0);
    let w = uniform(rng, 24.0, 48.0);
    let h = uniform(rng, 18.0, 36.0);
    let vy = uniform(rng, ENEMY_MIN_SPEED, ENEMY_MAX_SPEED);
    let pattern = *EnemyPattern::ALL
        .choose(rng)
        .unwrap_or(&EnemyPattern::Straight);
    let can_fire = rng.random_bool(ENEMY_ARMED_CHANCE);
    let hp = if can_fire { rng.random_range(1..=2) } else { 1 };
    let fire_cooldown = uniform(rng, 0.5, 2.0);
    let palette = random_enemy_palette(rng);

    Enemy {
        id,
        pos: Vec2::new(x, -20.0),
        size: Vec2::new(w, h),
        vy,
        pattern,
        can_fire,
        hp,
        age: 0.0,
        fire_cooldown,
        palette,
    }
}

pub fn spawn_obstacle(id: u32, rng: &mut impl Rng, width: f32) -> Obstacle {
    let x = uniform(rng, 16.0, width - 16.0);
    let size = uniform(rng, 22.0, 48.0);
    let vy = uniform(rng, SCENERY_MIN_SPEED, SCENERY_MAX_SPEED);
    let damage = rng.random_range(1..=2);
    let palette = random_asteroid_palette(rng);
    let crater_seed = rng.random::<f32>();

    Obstacle::new(id, Vec2::new(x, -20.0), size, vy, damage, palette, crater_seed)
}

/// Pick a scenery kind from the weighted table
pub fn choose_scenery_kind(rng: &mut impl Rng, allow_nebulae: bool) -> SceneryKind {
    let table: &[(SceneryKind, u32)] = if allow_nebulae {
        &SCENERY_WEIGHTS_WITH_NEBULAE
    } else {
        &SCENERY_WEIGHTS
    };
    table
        .choose_weighted(rng, |(_, weight)| *weight)
        .map(|(kind, _)| *kind)
        .unwrap_or(SceneryKind::Star)
}

/// Size, raw vertical speed range and depth range for a scenery kind
fn scenery_shape(kind: SceneryKind, rng: &mut impl Rng) -> (Vec2, f32, f32) {
    match kind {
        SceneryKind::Star => {
            let s = uniform(rng, 4.0, 10.0);
            let vy = uniform(rng, SCENERY_MIN_SPEED * 0.5, SCENERY_MIN_SPEED);
            (Vec2::splat(s), vy, uniform(rng, 0.2, 0.5))
        }
        SceneryKind::Planet => {
            let s = uniform(rng, 28.0, 80.0);
            let vy = uniform(rng, SCENERY_MIN_SPEED * 0.6, SCENERY_MIN_SPEED * 1.0);
            (Vec2::splat(s), vy, uniform(rng, 0.3, 0.7))
        }
        SceneryKind::Comet => {
            let w = uniform(rng, 8.0, 18.0);
            let h = uniform(rng, 6.0, 12.0);
            let vy = uniform(rng, SCENERY_MIN_SPEED * 1.0, SCENERY_MAX_SPEED * 1.2);
            (Vec2::new(w, h), vy, uniform(rng, 0.6, 1.0))
        }
        SceneryKind::Nebula => {
            let w = uniform(rng, 60.0, 140.0);
            let h = uniform(rng, 20.0, 60.0);
            let vy = uniform(rng, SCENERY_MIN_SPEED * 0.4, SCENERY_MIN_SPEED * 0.9);
            (Vec2::new(w, h), vy, uniform(rng, 0.15, 0.35))
        }
    }
}

/// Opacity for an object at `depth`: far objects fade into the background,
/// capped by `max_alpha` and never below 10.
pub fn scenery_alpha(depth: f32, max_alpha: u8) -> u8 {
    let base = (60.0 + depth * 180.0) as i32;
    base.min(max_alpha as i32).max(10).clamp(0, 255) as u8
}

pub fn spawn_scenery(
    rng: &mut impl Rng,
    width: f32,
    allow_nebulae: bool,
    max_alpha: u8,
) -> Scenery {
    let x = uniform(rng, 10.0, width - 10.0);
    let kind = choose_scenery_kind(rng, allow_nebulae);
    let (size, raw_vy, depth) = scenery_shape(kind, rng);
    let palette = scenery_palette(kind, rng);

    Scenery {
        pos: Vec2::new(x, -10.0),
        size,
        vy: raw_vy * depth,
        kind,
        depth,
        alpha: scenery_alpha(depth, max_alpha),
        age: 0.0,
        palette,
    }
}
