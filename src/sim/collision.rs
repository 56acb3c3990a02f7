//! Collision detection and outcome resolution
//!
//! Runs once per tick after every entity has moved. Nothing is removed while
//! scanning: hits only mark entities as gone, and the collections are rebuilt
//! from the survivors at the end. An entity marked gone is skipped by every
//! later check in the same pass, so double removal cannot happen.

use glam::Vec2;
use rand::Rng;

use super::entity::{BulletOwner, Debris, Obstacle};
use super::spawner::uniform;
use super::state::GameState;
use crate::consts::*;

/// What happened during one resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub enemies_hit: u32,
    pub enemies_killed: u32,
    pub obstacles_hit: u32,
    pub obstacles_destroyed: u32,
    pub debris_emitted: u32,
    /// Health the player lost (before flooring at zero)
    pub damage_taken: u32,
    pub score_gained: u32,
}

impl CollisionReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Break an asteroid into `3 + max_hp` fragments.
///
/// A rock with a non-finite or empty box breaks into nothing.
pub fn explode(obstacle: &Obstacle, rng: &mut impl Rng) -> Vec<Debris> {
    let Vec2 { x: w, y: h } = obstacle.size;
    if !(w.is_finite() && h.is_finite() && obstacle.vy.is_finite()) || w <= 0.0 || h <= 0.0 {
        return Vec::new();
    }

    (0..obstacle.fragment_count())
        .map(|_| {
            let fw = (w * uniform(rng, 0.12, 0.28)).floor().max(4.0);
            let fh = (h * uniform(rng, 0.08, 0.22)).floor().max(3.0);
            let fx = obstacle.pos.x + uniform(rng, -w * 0.3, w * 0.3);
            let fy = obstacle.pos.y + uniform(rng, -h * 0.1, h * 0.3);
            let vx = uniform(rng, -80.0, 80.0);
            let vy = uniform(rng, obstacle.vy * 0.3, obstacle.vy * 1.2);
            let lifetime = 0.8 + rng.random::<f32>() * 1.2;
            Debris {
                pos: Vec2::new(fx, fy),
                size: Vec2::new(fw, fh),
                vel: Vec2::new(vx, vy),
                lifetime,
                color: obstacle.palette.body,
            }
        })
        .collect()
}

/// Rebuild `items` keeping only the entries not marked in `gone`
fn keep_survivors<T>(items: &mut Vec<T>, gone: &[bool]) {
    *items = std::mem::take(items)
        .into_iter()
        .zip(gone.iter().copied())
        .filter_map(|(item, is_gone)| (!is_gone).then_some(item))
        .collect();
}

/// Resolve every collision for this tick and apply score/health outcomes.
///
/// Order:
/// 1. Player bullets vs enemies, else vs obstacles (enemies take priority)
/// 2. Enemy bullets vs player
/// 3. Obstacles vs player (rock always shatters)
/// 4. Enemies vs player (no score)
///
/// Each bullet resolves at most one hit; among targets of one kind the
/// earliest-spawned wins.
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let GameState {
        player,
        bullets,
        enemies,
        obstacles,
        debris,
        rng,
        ..
    } = state;

    let mut report = CollisionReport::default();
    let player_rect = player.rect();
    let mut bullet_gone = vec![false; bullets.len()];
    let mut enemy_gone = vec![false; enemies.len()];
    let mut obstacle_gone = vec![false; obstacles.len()];

    for (bi, bullet) in bullets.iter().enumerate() {
        let rect = bullet.rect();
        match bullet.owner {
            BulletOwner::Player => {
                let enemy_hit = enemies
                    .iter()
                    .enumerate()
                    .position(|(i, e)| !enemy_gone[i] && e.rect().overlaps(&rect));

                if let Some(ei) = enemy_hit {
                    bullet_gone[bi] = true;
                    report.enemies_hit += 1;
                    if enemies[ei].hit(1) {
                        enemy_gone[ei] = true;
                        player.score += SCORE_ENEMY_KILL;
                        report.enemies_killed += 1;
                        report.score_gained += SCORE_ENEMY_KILL;
                        log::debug!("enemy {} destroyed", enemies[ei].id);
                    }
                    continue;
                }

                let obstacle_hit = obstacles
                    .iter()
                    .enumerate()
                    .position(|(i, o)| !obstacle_gone[i] && o.rect().overlaps(&rect));

                if let Some(oi) = obstacle_hit {
                    bullet_gone[bi] = true;
                    report.obstacles_hit += 1;
                    player.score += SCORE_OBSTACLE_HIT;
                    report.score_gained += SCORE_OBSTACLE_HIT;
                    if obstacles[oi].hit(1) {
                        obstacle_gone[oi] = true;
                        let pieces = explode(&obstacles[oi], rng);
                        report.debris_emitted += pieces.len() as u32;
                        debris.extend(pieces);
                        player.score += SCORE_OBSTACLE_DESTROY;
                        report.obstacles_destroyed += 1;
                        report.score_gained += SCORE_OBSTACLE_DESTROY;
                        log::debug!("obstacle {} shattered by fire", obstacles[oi].id);
                    }
                }
            }
            BulletOwner::Enemy => {
                if rect.overlaps(&player_rect) {
                    bullet_gone[bi] = true;
                    player.take_damage(1);
                    report.damage_taken += 1;
                }
            }
        }
    }

    for (oi, obstacle) in obstacles.iter().enumerate() {
        if obstacle_gone[oi] || !obstacle.rect().overlaps(&player_rect) {
            continue;
        }
        obstacle_gone[oi] = true;
        let pieces = explode(obstacle, rng);
        report.debris_emitted += pieces.len() as u32;
        debris.extend(pieces);
        player.take_damage(obstacle.damage);
        report.damage_taken += obstacle.damage;
        report.obstacles_destroyed += 1;
        log::debug!("obstacle {} rammed the player", obstacle.id);
    }

    for (ei, enemy) in enemies.iter().enumerate() {
        if enemy_gone[ei] || !enemy.rect().overlaps(&player_rect) {
            continue;
        }
        enemy_gone[ei] = true;
        player.take_damage(1);
        report.damage_taken += 1;
        log::debug!("enemy {} rammed the player", enemy.id);
    }

    keep_survivors(bullets, &bullet_gone);
    keep_survivors(enemies, &enemy_gone);
    keep_survivors(obstacles, &obstacle_gone);

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{ASTEROID_PALETTES, ENEMY_PALETTES};
    use crate::sim::entity::{Bullet, Enemy, EnemyPattern, Rect};
    use crate::sim::state::Rules;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn empty_state() -> GameState {
        GameState::new(7, Rules::default())
    }

    fn add_enemy(state: &mut GameState, pos: Vec2, hp: u32) -> u32 {
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            pos,
            size: Vec2::new(30.0, 20.0),
            vy: 100.0,
            pattern: EnemyPattern::Straight,
            can_fire: false,
            hp,
            age: 0.0,
            fire_cooldown: 1.0,
            palette: ENEMY_PALETTES[0],
        });
        id
    }

    fn add_obstacle(state: &mut GameState, pos: Vec2, size: f32, damage: u32) -> u32 {
        let id = state.next_entity_id();
        state
            .obstacles
            .push(Obstacle::new(id, pos, size, 100.0, damage, ASTEROID_PALETTES[1], 0.3));
        id
    }

    fn player_bullet(pos: Vec2) -> Bullet {
        Bullet::new(pos, -BULLET_SPEED, BulletOwner::Player)
    }

    #[test]
    fn test_bullet_kills_one_hp_enemy() {
        let mut state = empty_state();
        add_enemy(&mut state, Vec2::new(100.0, 100.0), 1);
        state.bullets.push(player_bullet(Vec2::new(100.0, 100.0)));

        let report = resolve_collisions(&mut state);

        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.player.score, 10);
        assert_eq!(report.enemies_killed, 1);
    }

    #[test]
    fn test_bullet_wounds_tough_enemy() {
        let mut state = empty_state();
        add_enemy(&mut state, Vec2::new(100.0, 100.0), 2);
        state.bullets.push(player_bullet(Vec2::new(100.0, 100.0)));

        resolve_collisions(&mut state);

        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].hp, 1);
        assert!(state.bullets.is_empty());
        assert_eq!(state.player.score, 0);
    }

    #[test]
    fn test_obstacle_depletion_emits_debris_and_scores() {
        let mut state = empty_state();
        add_obstacle(&mut state, Vec2::new(200.0, 200.0), 48.0, 1);
        state.obstacles[0].hp = 1;
        state.bullets.push(player_bullet(Vec2::new(200.0, 200.0)));

        let report = resolve_collisions(&mut state);

        assert!(state.obstacles.is_empty());
        assert_eq!(state.debris.len(), 5);
        assert_eq!(state.player.score, 7);
        assert_eq!(report.score_gained, 7);
        assert!(state.debris.iter().all(|d| d.color == ASTEROID_PALETTES[1].body));
    }

    #[test]
    fn test_obstacle_chip_scores_two() {
        let mut state = empty_state();
        add_obstacle(&mut state, Vec2::new(200.0, 200.0), 48.0, 1);
        state.bullets.push(player_bullet(Vec2::new(200.0, 200.0)));

        resolve_collisions(&mut state);

        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].hp, 1);
        assert_eq!(state.player.score, 2);
        assert!(state.debris.is_empty());
    }

    #[test]
    fn test_enemy_hit_shields_obstacle() {
        let mut state = empty_state();
        add_enemy(&mut state, Vec2::new(100.0, 100.0), 2);
        add_obstacle(&mut state, Vec2::new(100.0, 100.0), 30.0, 1);
        state.bullets.push(player_bullet(Vec2::new(100.0, 100.0)));

        let report = resolve_collisions(&mut state);

        assert_eq!(report.enemies_hit, 1);
        assert_eq!(report.obstacles_hit, 0);
        assert_eq!(state.obstacles[0].hp, state.obstacles[0].max_hp);
    }

    #[test]
    fn test_earliest_enemy_wins_tie() {
        let mut state = empty_state();
        let first = add_enemy(&mut state, Vec2::new(100.0, 100.0), 1);
        let second = add_enemy(&mut state, Vec2::new(102.0, 100.0), 1);
        state.bullets.push(player_bullet(Vec2::new(101.0, 100.0)));

        resolve_collisions(&mut state);

        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].id, second);
        assert_ne!(first, second);
    }

    #[test]
    fn test_second_bullet_skips_destroyed_enemy() {
        let mut state = empty_state();
        add_enemy(&mut state, Vec2::new(100.0, 100.0), 1);
        state.bullets.push(player_bullet(Vec2::new(100.0, 100.0)));
        state.bullets.push(player_bullet(Vec2::new(100.0, 100.0)));

        resolve_collisions(&mut state);

        // The second bullet finds nothing left to hit and flies on
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.player.score, 10);
    }

    #[test]
    fn test_enemy_bullet_hurts_player() {
        let mut state = empty_state();
        let pos = state.player.pos;
        state.bullets.push(Bullet::new(pos, ENEMY_BULLET_SPEED, BulletOwner::Enemy));

        let report = resolve_collisions(&mut state);

        assert_eq!(state.player.health, 4);
        assert!(state.bullets.is_empty());
        assert_eq!(report.damage_taken, 1);
    }

    #[test]
    fn test_player_bullet_ignores_player() {
        let mut state = empty_state();
        let pos = state.player.pos;
        state.bullets.push(player_bullet(pos));

        resolve_collisions(&mut state);

        assert_eq!(state.player.health, 5);
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_obstacle_ram_shatters_without_score() {
        let mut state = empty_state();
        let pos = state.player.pos;
        add_obstacle(&mut state, pos, 48.0, 2);

        let report = resolve_collisions(&mut state);

        assert!(state.obstacles.is_empty());
        assert_eq!(state.debris.len(), 5);
        assert_eq!(state.player.health, 3);
        assert_eq!(state.player.score, 0);
        assert_eq!(report.obstacles_destroyed, 1);
    }

    #[test]
    fn test_enemy_ram_costs_one_health() {
        let mut state = empty_state();
        let pos = state.player.pos;
        add_enemy(&mut state, pos, 2);

        resolve_collisions(&mut state);

        assert!(state.enemies.is_empty());
        assert_eq!(state.player.health, 4);
        assert_eq!(state.player.score, 0);
    }

    #[test]
    fn test_lethal_damage_floors_health() {
        let mut state = empty_state();
        state.player.health = 1;
        let pos = state.player.pos;
        add_obstacle(&mut state, pos, 30.0, 2);

        let report = resolve_collisions(&mut state);

        assert_eq!(state.player.health, 0);
        assert_eq!(report.damage_taken, 2);
    }

    #[test]
    fn test_explode_fragment_bounds() {
        let mut rng = Pcg32::seed_from_u64(3);
        let rock = Obstacle::new(1, Vec2::new(100.0, 100.0), 40.0, 100.0, 1, ASTEROID_PALETTES[0], 0.1);
        let pieces = explode(&rock, &mut rng);
        assert_eq!(pieces.len(), 4);
        for d in &pieces {
            assert!(d.size.x >= 4.0 && d.size.y >= 3.0);
            assert!((88.0..=112.0).contains(&d.pos.x));
            assert!((96.0..=112.0).contains(&d.pos.y));
            assert!((-80.0..=80.0).contains(&d.vel.x));
            assert!((30.0..=120.0).contains(&d.vel.y));
            assert!((0.8..=2.0).contains(&d.lifetime));
        }
    }

    #[test]
    fn test_explode_degenerate_rock_is_empty() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut rock = Obstacle::new(1, Vec2::ZERO, 40.0, 100.0, 1, ASTEROID_PALETTES[0], 0.1);
        rock.size = Vec2::new(f32::NAN, 40.0);
        assert!(explode(&rock, &mut rng).is_empty());
    }

    #[test]
    fn test_nothing_to_resolve() {
        let mut state = empty_state();
        assert!(resolve_collisions(&mut state).is_empty());
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -100i32..100, ay in -100i32..100, aw in 0i32..60, ah in 0i32..60,
            bx in -100i32..100, by in -100i32..100, bw in 0i32..60, bh in 0i32..60,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_each_bullet_resolves_once(
            offsets in proptest::collection::vec((-20.0f32..20.0, -20.0f32..20.0), 1..6),
        ) {
            let mut state = empty_state();
            for (dx, dy) in &offsets {
                add_enemy(&mut state, Vec2::new(150.0 + dx, 150.0 + dy), 1);
                add_obstacle(&mut state, Vec2::new(150.0 - dx, 150.0 - dy), 48.0, 1);
            }
            state.bullets.push(player_bullet(Vec2::new(150.0, 150.0)));

            let report = resolve_collisions(&mut state);

            prop_assert!(report.enemies_hit + report.obstacles_hit <= 1);
            prop_assert!(state.obstacles.iter().all(|o| o.hp <= o.max_hp));
        }
    }
}
