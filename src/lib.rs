//! Jet Runner - a vertical-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, collisions, game state)
//! - `renderer`: Read-only draw list construction and the terminal backend
//! - `platform`: Keyboard input and frame pacing
//! - `settings`: Run configuration (CLI / JSON)
//! - `app`: The real-time loop tying the above together

pub mod app;
pub mod palette;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::{App, StopReason};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Viewport dimensions
    pub const WIDTH: f32 = 480.0;
    pub const HEIGHT: f32 = 640.0;
    /// Target frame rate of the real-time loop
    pub const FPS: u32 = 60;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 300.0; // pixels per second
    pub const PLAYER_HEALTH: u32 = 5;
    pub const PLAYER_FIRE_COOLDOWN: f32 = 0.25; // seconds
    pub const PLAYER_WIDTH: f32 = 48.0;
    pub const PLAYER_HEIGHT: f32 = 24.0;
    /// Player spawns this far above the bottom edge
    pub const PLAYER_SPAWN_OFFSET: f32 = 60.0;

    /// Bullets
    pub const BULLET_SPEED: f32 = 500.0;
    pub const ENEMY_BULLET_SPEED: f32 = 220.0;
    pub const BULLET_WIDTH: f32 = 6.0;
    pub const BULLET_HEIGHT: f32 = 12.0;
    /// Gap between the shooter's edge and a fresh bullet's center
    pub const BULLET_MUZZLE_GAP: f32 = 6.0;

    /// Enemy and scenery speed bands
    pub const ENEMY_MIN_SPEED: f32 = 80.0;
    pub const ENEMY_MAX_SPEED: f32 = 200.0;
    pub const SCENERY_MIN_SPEED: f32 = 60.0;
    pub const SCENERY_MAX_SPEED: f32 = 140.0;

    /// Spawn intervals (seconds)
    pub const SPAWN_ENEMY_INTERVAL: f32 = 1.2;
    pub const SPAWN_OBSTACLE_INTERVAL: f32 = 0.9;
    pub const SPAWN_SCENERY_INTERVAL: f32 = 0.5;

    /// Probability a freshly spawned enemy is armed
    pub const ENEMY_ARMED_CHANCE: f64 = 0.35;

    /// Enemy movement patterns
    pub const SINE_FREQUENCY: f32 = 3.0;
    pub const SINE_AMPLITUDE: f32 = 60.0;
    pub const ZIGZAG_SPEED: f32 = 80.0;

    /// Scoring
    pub const SCORE_ENEMY_KILL: u32 = 10;
    pub const SCORE_OBSTACLE_HIT: u32 = 2;
    pub const SCORE_OBSTACLE_DESTROY: u32 = 5;

    /// Obstacle hit points: one per this many pixels of size
    pub const OBSTACLE_HP_DIVISOR: f32 = 24.0;

    /// Pruning margins (entity stays live while strictly inside)
    pub const BULLET_MARGIN: f32 = 50.0;
    pub const ENTITY_MARGIN: f32 = 200.0;

    /// Default opacity cap for scenery
    pub const DEFAULT_MAX_SCENERY_ALPHA: u8 = 180;
}
