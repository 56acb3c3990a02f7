//! Per-frame simulation step
//!
//! `tick` runs the full frame sequence: input, spawning, motion, collisions,
//! pruning and the termination check. `dt` is whatever the caller measured;
//! passing a constant gives a reproducible run for a given seed.

use super::collision::{CollisionReport, resolve_collisions};
use super::spawner::{spawn_enemy, spawn_obstacle, spawn_scenery};
use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Horizontal steering: -1 left, 0 none, 1 right
    pub direction: f32,
    /// Fire held
    pub fire: bool,
    /// Quit/escape requested
    pub quit: bool,
}

impl TickInput {
    /// Build input from held keys; opposite keys cancel out
    pub fn from_keys(left: bool, right: bool, fire: bool, quit: bool) -> Self {
        let mut direction = 0.0;
        if left {
            direction -= 1.0;
        }
        if right {
            direction += 1.0;
        }
        Self {
            direction,
            fire,
            quit,
        }
    }
}

#[inline]
fn within(y: f32, margin: f32) -> bool {
    -margin < y && y < HEIGHT + margin
}

/// Drop entities that left their margin window and spent debris
pub fn prune(state: &mut GameState) {
    state.bullets.retain(|b| within(b.pos.y, BULLET_MARGIN));
    state.enemies.retain(|e| within(e.pos.y, ENTITY_MARGIN));
    state.obstacles.retain(|o| within(o.pos.y, ENTITY_MARGIN));
    state.scenery.retain(|s| within(s.pos.y, ENTITY_MARGIN));
    state
        .debris
        .retain(|d| !d.is_expired() && within(d.pos.y, ENTITY_MARGIN));
}

fn run_spawners(state: &mut GameState, dt: f32) {
    if state.enemy_timer.advance(dt) {
        let id = state.next_entity_id();
        let enemy = spawn_enemy(id, &mut state.rng, WIDTH);
        log::debug!("spawned enemy {} ({:?}, hp {})", id, enemy.pattern, enemy.hp);
        state.enemies.push(enemy);
    }

    if state.obstacle_timer.advance(dt) {
        let id = state.next_entity_id();
        let obstacle = spawn_obstacle(id, &mut state.rng, WIDTH);
        log::debug!("spawned obstacle {} (hp {})", id, obstacle.hp);
        state.obstacles.push(obstacle);
    }

    if state.scenery_timer.advance(dt) {
        let rules = state.rules;
        let scenery = spawn_scenery(
            &mut state.rng,
            WIDTH,
            rules.allow_nebulae,
            rules.max_scenery_alpha,
        );
        state.scenery.push(scenery);
    }
}

fn update_entities(state: &mut GameState, dt: f32) {
    state.player.update(dt);

    for bullet in &mut state.bullets {
        bullet.update(dt);
    }

    // Fresh enemy shots join after the existing bullets moved
    let mut shots = Vec::new();
    for enemy in &mut state.enemies {
        enemy.update(dt);
        if state.rules.enemy_bullets {
            if let Some(bullet) = enemy.try_fire(&mut state.rng) {
                shots.push(bullet);
            }
        }
    }
    state.bullets.extend(shots);

    for obstacle in &mut state.obstacles {
        obstacle.update(dt);
    }
    for piece in &mut state.debris {
        piece.update(dt);
    }
    for scenery in &mut state.scenery {
        scenery.update(dt);
    }
}

/// Advance the game by one frame of `dt` seconds.
///
/// Returns what the collision pass resolved; terminal states make this a
/// no-op returning an empty report.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> CollisionReport {
    if state.phase.is_terminal() {
        return CollisionReport::default();
    }

    if input.quit {
        state.phase = GamePhase::UserQuit;
        log::info!("quit requested after {:.2}s", state.elapsed);
        return CollisionReport::default();
    }

    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    state.ticks += 1;
    state.elapsed += dt;

    state.player.steer(input.direction.clamp(-1.0, 1.0), dt);
    if input.fire && state.player.can_fire() {
        let bullet = state.player.fire();
        state.bullets.push(bullet);
    }

    run_spawners(state, dt);
    update_entities(state, dt);
    let report = resolve_collisions(state);
    prune(state);

    if state.player.is_dead() {
        state.phase = GamePhase::GameOver;
        log::info!("game over, score {}", state.player.score);
    } else if state.time_limit.is_some_and(|limit| state.elapsed >= limit) {
        state.phase = GamePhase::StoppedByDuration;
        log::info!("time limit reached after {:.2}s", state.elapsed);
    }

    if !report.is_empty() {
        log::trace!("tick {}: {:?}", state.ticks, report);
    }

    report
}
