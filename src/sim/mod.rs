//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module renders, sleeps or
//! reads the keyboard:
//! - Time arrives as a `dt` argument
//! - Randomness comes from the seeded RNG in `GameState`
//! - Collections keep insertion order (collision tie-breaks depend on it)

pub mod collision;
pub mod entity;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, explode, resolve_collisions};
pub use entity::{
    Bullet, BulletOwner, Debris, Enemy, EnemyPattern, EntityRef, Obstacle, Player, Rect, Scenery,
    SceneryKind,
};
pub use spawner::{SpawnTimer, choose_scenery_kind, spawn_enemy, spawn_obstacle, spawn_scenery};
pub use state::{GamePhase, GameState, Rules, RunSummary};
pub use tick::{TickInput, prune, tick};
