//! Game state and run bookkeeping
//!
//! `GameState` exclusively owns every entity collection. Collections keep
//! insertion order, which doubles as the collision tie-break order.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Bullet, Debris, Enemy, EntityRef, Obstacle, Player, Scenery};
use super::spawner::SpawnTimer;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Player health reached zero
    GameOver,
    /// The caller's time budget ran out
    StoppedByDuration,
    /// Quit/escape requested by the user
    UserQuit,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        self != GamePhase::Running
    }
}

/// Gameplay switches fixed for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Armed enemies actually shoot
    pub enemy_bullets: bool,
    /// Nebulae take part in scenery selection
    pub allow_nebulae: bool,
    /// Opacity cap for scenery
    pub max_scenery_alpha: u8,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            enemy_bullets: true,
            allow_nebulae: false,
            max_scenery_alpha: DEFAULT_MAX_SCENERY_ALPHA,
        }
    }
}

/// Final report of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub phase: GamePhase,
    pub score: u32,
    pub health: u32,
    /// Simulated seconds
    pub elapsed: f32,
    pub ticks: u64,
    pub seed: u64,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rules: Rules,
    /// Stop after this many simulated seconds
    pub time_limit: Option<f32>,
    pub phase: GamePhase,
    /// Sum of all tick durations so far
    pub elapsed: f32,
    pub ticks: u64,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub obstacles: Vec<Obstacle>,
    /// Cosmetic only, never collides
    pub debris: Vec<Debris>,
    /// Cosmetic only, never collides
    pub scenery: Vec<Scenery>,
    pub enemy_timer: SpawnTimer,
    pub obstacle_timer: SpawnTimer,
    pub scenery_timer: SpawnTimer,
    pub rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Fresh run: player at spawn, every collection empty
    pub fn new(seed: u64, rules: Rules) -> Self {
        Self {
            seed,
            rules,
            time_limit: None,
            phase: GamePhase::Running,
            elapsed: 0.0,
            ticks: 0,
            player: Player::spawn(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            obstacles: Vec::new(),
            debris: Vec::new(),
            scenery: Vec::new(),
            enemy_timer: SpawnTimer::new(SPAWN_ENEMY_INTERVAL),
            obstacle_timer: SpawnTimer::new(SPAWN_OBSTACLE_INTERVAL),
            scenery_timer: SpawnTimer::new(SPAWN_SCENERY_INTERVAL),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn with_time_limit(mut self, limit: Option<f32>) -> Self {
        self.time_limit = limit;
        self
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// All live entities, back to front:
    /// scenery, obstacles, debris, enemies, bullets, player
    pub fn draw_order(&self) -> impl Iterator<Item = EntityRef<'_>> {
        self.scenery
            .iter()
            .map(EntityRef::Scenery)
            .chain(self.obstacles.iter().map(EntityRef::Obstacle))
            .chain(self.debris.iter().map(EntityRef::Debris))
            .chain(self.enemies.iter().map(EntityRef::Enemy))
            .chain(self.bullets.iter().map(EntityRef::Bullet))
            .chain(std::iter::once(EntityRef::Player(&self.player)))
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            phase: self.phase,
            score: self.player.score,
            health: self.player.health,
            elapsed: self.elapsed,
            ticks: self.ticks,
            seed: self.seed,
        }
    }
}
