//! Entity records and their per-tick update rules
//!
//! Every kind is a plain struct owned by its collection in `GameState`.
//! Position is the box center; `size` is the full width/height.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::spawner::uniform;
use crate::consts::*;
use crate::palette::{AsteroidPalette, EnemyPalette, Rgb, SceneryPalette};

/// Integer axis-aligned box, top-left anchored
///
/// Coordinates are truncated toward zero the same way for every entity, so
/// two boxes built from the same floats always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Box of size `size` centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            x: (center.x - size.x / 2.0) as i32,
            y: (center.y - size.y / 2.0) as i32,
            w: size.x as i32,
            h: size.y as i32,
        }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// True when the two boxes share a region of positive area.
    /// Touching edges and empty boxes never overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.w <= 0 || self.h <= 0 || other.w <= 0 || other.h <= 0 {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Which side fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// The player's craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: u32,
    /// Seconds until the next shot is allowed
    pub fire_cooldown: f32,
    pub score: u32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED,
            health: PLAYER_HEALTH,
            fire_cooldown: 0.0,
            score: 0,
        }
    }

    /// Player at its fixed spawn point near the bottom of the viewport
    pub fn spawn() -> Self {
        Self::new(Vec2::new(WIDTH / 2.0, HEIGHT - PLAYER_SPAWN_OFFSET))
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    /// Move horizontally; `direction` is -1, 0 or 1.
    pub fn steer(&mut self, direction: f32, dt: f32) {
        let half = self.size.x / 2.0;
        self.pos.x = (self.pos.x + direction * self.speed * dt).clamp(half, WIDTH - half);
    }

    pub fn can_fire(&self) -> bool {
        self.fire_cooldown <= 0.0
    }

    /// Fire a bullet upward from the nose and start the cooldown
    pub fn fire(&mut self) -> Bullet {
        self.fire_cooldown = PLAYER_FIRE_COOLDOWN;
        let y = self.pos.y - self.size.y / 2.0 - BULLET_MUZZLE_GAP;
        Bullet::new(Vec2::new(self.pos.x, y), -BULLET_SPEED, BulletOwner::Player)
    }

    pub fn update(&mut self, dt: f32) {
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
    }

    /// Apply damage, flooring health at zero
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    /// Negative moves up the screen
    pub vy: f32,
    pub owner: BulletOwner,
}

impl Bullet {
    pub fn new(pos: Vec2, vy: f32, owner: BulletOwner) -> Self {
        Self {
            pos,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            vy,
            owner,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y += self.vy * dt;
    }
}

/// Horizontal motion rule layered on an enemy's descent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPattern {
    Straight,
    Sine,
    Zigzag,
}

impl EnemyPattern {
    pub const ALL: [EnemyPattern; 3] = [
        EnemyPattern::Straight,
        EnemyPattern::Sine,
        EnemyPattern::Zigzag,
    ];

    /// Horizontal velocity at a given age
    pub fn horizontal_velocity(self, age: f32) -> f32 {
        match self {
            EnemyPattern::Straight => 0.0,
            EnemyPattern::Sine => (age * SINE_FREQUENCY).sin() * SINE_AMPLITUDE,
            EnemyPattern::Zigzag => {
                // Direction flips every half second
                if ((age * 2.0) as i64) % 2 == 0 {
                    ZIGZAG_SPEED
                } else {
                    -ZIGZAG_SPEED
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub vy: f32,
    pub pattern: EnemyPattern,
    pub can_fire: bool,
    pub hp: u32,
    /// Seconds since spawn
    pub age: f32,
    pub fire_cooldown: f32,
    pub palette: EnemyPalette,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    pub fn update(&mut self, dt: f32) {
        self.age += dt;
        self.pos.y += self.vy * dt;
        self.pos.x += self.pattern.horizontal_velocity(self.age) * dt;
        if self.can_fire {
            self.fire_cooldown -= dt;
        }
    }

    /// Fire downward once the cooldown has run out, re-arming with a random delay
    pub fn try_fire(&mut self, rng: &mut impl Rng) -> Option<Bullet> {
        if !self.can_fire || self.fire_cooldown > 0.0 {
            return None;
        }
        self.fire_cooldown = uniform(rng, 0.6, 2.5);
        let y = self.pos.y + self.size.y / 2.0 + BULLET_MUZZLE_GAP;
        Some(Bullet::new(
            Vec2::new(self.pos.x, y),
            ENEMY_BULLET_SPEED,
            BulletOwner::Enemy,
        ))
    }

    /// Apply damage; returns true once hit points are exhausted
    pub fn hit(&mut self, damage: u32) -> bool {
        self.hp = self.hp.saturating_sub(damage);
        self.hp == 0
    }
}

/// An asteroid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub vy: f32,
    /// Health the player loses on contact
    pub damage: u32,
    pub max_hp: u32,
    pub hp: u32,
    pub palette: AsteroidPalette,
    /// Stable per-rock value in [0, 1) used to place craters
    pub crater_seed: f32,
}

impl Obstacle {
    pub fn new(
        id: u32,
        pos: Vec2,
        size: f32,
        vy: f32,
        damage: u32,
        palette: AsteroidPalette,
        crater_seed: f32,
    ) -> Self {
        let max_hp = Self::max_hp_for_size(size);
        Self {
            id,
            pos,
            size: Vec2::splat(size),
            vy,
            damage,
            max_hp,
            hp: max_hp,
            palette,
            crater_seed,
        }
    }

    /// Bigger rocks are tougher: one hit point per 24px, at least one
    pub fn max_hp_for_size(size: f32) -> u32 {
        ((size / OBSTACLE_HP_DIVISOR).floor() as u32).max(1)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y += self.vy * dt;
    }

    /// Apply damage; returns true once hit points are exhausted
    pub fn hit(&mut self, damage: u32) -> bool {
        self.hp = self.hp.saturating_sub(damage);
        self.hp == 0
    }

    /// Number of fragments this rock breaks into
    pub fn fragment_count(&self) -> usize {
        3 + self.max_hp as usize
    }
}

/// Cosmetic fragment left behind by a destroyed asteroid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debris {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Seconds left before the fragment fades out
    pub lifetime: f32,
    pub color: Rgb,
}

impl Debris {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.lifetime -= dt;
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0
    }
}

/// Background decoration kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneryKind {
    Star,
    Planet,
    Comet,
    Nebula,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenery {
    pub pos: Vec2,
    pub size: Vec2,
    pub vy: f32,
    pub kind: SceneryKind,
    /// Parallax factor in (0, 1]; far objects are small values
    pub depth: f32,
    pub alpha: u8,
    /// Drives twinkle/animation only
    pub age: f32,
    pub palette: SceneryPalette,
}

impl Scenery {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y += self.vy * dt;
        self.age += dt;
    }
}

/// Borrowed view of any entity, used where kinds are handled uniformly
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Scenery(&'a Scenery),
    Obstacle(&'a Obstacle),
    Debris(&'a Debris),
    Enemy(&'a Enemy),
    Bullet(&'a Bullet),
    Player(&'a Player),
}

impl EntityRef<'_> {
    pub fn rect(&self) -> Rect {
        match self {
            EntityRef::Scenery(s) => s.rect(),
            EntityRef::Obstacle(o) => o.rect(),
            EntityRef::Debris(d) => d.rect(),
            EntityRef::Enemy(e) => e.rect(),
            EntityRef::Bullet(b) => b.rect(),
            EntityRef::Player(p) => p.rect(),
        }
    }

    /// Only these kinds take part in collision resolution
    pub fn is_solid(&self) -> bool {
        !matches!(self, EntityRef::Scenery(_) | EntityRef::Debris(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{ASTEROID_PALETTES, ENEMY_PALETTES};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy(pattern: EnemyPattern, can_fire: bool) -> Enemy {
        Enemy {
            id: 1,
            pos: Vec2::new(100.0, 100.0),
            size: Vec2::new(30.0, 20.0),
            vy: 100.0,
            pattern,
            can_fire,
            hp: 1,
            age: 0.0,
            fire_cooldown: 1.0,
            palette: ENEMY_PALETTES[0],
        }
    }

    #[test]
    fn test_rect_from_center_truncates() {
        let r = Rect::from_center(Vec2::new(10.5, 20.5), Vec2::new(5.0, 5.0));
        assert_eq!(r, Rect::new(8, 18, 5, 5));
    }

    #[test]
    fn test_rect_touching_edges_do_not_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.overlaps(&b));
        let c = Rect::new(9, 9, 10, 10);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_empty_rect_never_overlaps() {
        let a = Rect::new(0, 0, 0, 10);
        let b = Rect::new(-5, -5, 20, 20);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_player_steer_clamps_to_viewport() {
        let mut player = Player::spawn();
        player.steer(-1.0, 10.0);
        assert_eq!(player.pos.x, PLAYER_WIDTH / 2.0);
        player.steer(1.0, 10.0);
        assert_eq!(player.pos.x, WIDTH - PLAYER_WIDTH / 2.0);
    }

    #[test]
    fn test_player_cooldown_floors_at_zero() {
        let mut player = Player::spawn();
        let bullet = player.fire();
        assert_eq!(bullet.owner, BulletOwner::Player);
        assert!(bullet.vy < 0.0);
        assert!(!player.can_fire());
        player.update(1.0);
        assert_eq!(player.fire_cooldown, 0.0);
        assert!(player.can_fire());
    }

    #[test]
    fn test_player_bullet_spawns_above_nose() {
        let mut player = Player::spawn();
        let bullet = player.fire();
        assert_eq!(bullet.pos.x, player.pos.x);
        assert_eq!(bullet.pos.y, player.pos.y - PLAYER_HEIGHT / 2.0 - BULLET_MUZZLE_GAP);
    }

    #[test]
    fn test_player_damage_floors_at_zero() {
        let mut player = Player::spawn();
        player.take_damage(3);
        assert_eq!(player.health, 2);
        player.take_damage(5);
        assert_eq!(player.health, 0);
        assert!(player.is_dead());
    }

    #[test]
    fn test_straight_enemy_only_descends() {
        let mut e = enemy(EnemyPattern::Straight, false);
        e.update(0.5);
        assert_eq!(e.pos, Vec2::new(100.0, 150.0));
        assert_eq!(e.age, 0.5);
        // Unarmed enemies keep their cooldown untouched
        assert_eq!(e.fire_cooldown, 1.0);
    }

    #[test]
    fn test_sine_enemy_drifts() {
        let mut e = enemy(EnemyPattern::Sine, false);
        e.update(0.1);
        let expected = 100.0 + (0.1f32 * 3.0).sin() * 60.0 * 0.1;
        assert!((e.pos.x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_zigzag_flips_every_half_second() {
        assert_eq!(EnemyPattern::Zigzag.horizontal_velocity(0.2), ZIGZAG_SPEED);
        assert_eq!(EnemyPattern::Zigzag.horizontal_velocity(0.7), -ZIGZAG_SPEED);
        assert_eq!(EnemyPattern::Zigzag.horizontal_velocity(1.1), ZIGZAG_SPEED);
    }

    #[test]
    fn test_enemy_fires_when_cooldown_expires() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut e = enemy(EnemyPattern::Straight, true);
        e.update(0.5);
        assert!(e.try_fire(&mut rng).is_none());
        e.update(0.6);
        let bullet = e.try_fire(&mut rng).expect("cooldown elapsed");
        assert_eq!(bullet.owner, BulletOwner::Enemy);
        assert_eq!(bullet.vy, ENEMY_BULLET_SPEED);
        assert!((0.6..=2.5).contains(&e.fire_cooldown));
    }

    #[test]
    fn test_unarmed_enemy_never_fires() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut e = enemy(EnemyPattern::Straight, false);
        e.fire_cooldown = -1.0;
        assert!(e.try_fire(&mut rng).is_none());
    }

    #[test]
    fn test_obstacle_hp_from_size() {
        assert_eq!(Obstacle::max_hp_for_size(22.0), 1);
        assert_eq!(Obstacle::max_hp_for_size(47.9), 1);
        assert_eq!(Obstacle::max_hp_for_size(48.0), 2);
        let o = Obstacle::new(1, Vec2::ZERO, 48.0, 60.0, 1, ASTEROID_PALETTES[0], 0.5);
        assert_eq!(o.hp, 2);
        assert_eq!(o.fragment_count(), 5);
    }

    #[test]
    fn test_obstacle_hit_saturates() {
        let mut o = Obstacle::new(1, Vec2::ZERO, 30.0, 60.0, 1, ASTEROID_PALETTES[0], 0.5);
        assert!(o.hit(1));
        assert!(o.hit(1));
        assert_eq!(o.hp, 0);
    }

    #[test]
    fn test_debris_decays() {
        let mut d = Debris {
            pos: Vec2::ZERO,
            size: Vec2::new(4.0, 3.0),
            vel: Vec2::new(10.0, 20.0),
            lifetime: 0.5,
            color: ASTEROID_PALETTES[0].body,
        };
        d.update(0.25);
        assert_eq!(d.pos, Vec2::new(2.5, 5.0));
        assert!(!d.is_expired());
        d.update(0.25);
        assert!(d.is_expired());
    }
}
