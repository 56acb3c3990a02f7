//! Rendering module
//!
//! Rendering is a read-only pass over `GameState`: `build_frame` turns the
//! post-tick entity collections into a flat list of 2D primitives, back to
//! front, and a backend rasterises that list.

pub mod shapes;
pub mod terminal;

pub use terminal::TerminalRenderer;

use glam::Vec2;

use crate::palette::{COLOR_BG, COLOR_HUD, Rgb};
use crate::sim::{EntityRef, GameState};

/// Geometric primitive in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned filled box from its top-left corner
    Rect { min: Vec2, size: Vec2 },
    /// Filled ellipse; a circle when both radii match
    Ellipse { center: Vec2, radii: Vec2 },
    /// Filled triangle
    Triangle([Vec2; 3]),
    /// One-pixel line
    Line { from: Vec2, to: Vec2 },
}

impl Shape {
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Shape::Ellipse {
            center,
            radii: Vec2::splat(radius),
        }
    }

    /// Ellipse inscribed in the box of `size` centered on `center`
    pub fn ellipse_in(center: Vec2, size: Vec2) -> Self {
        Shape::Ellipse {
            center,
            radii: size / 2.0,
        }
    }

    /// Bounding box as (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        match *self {
            Shape::Rect { min, size } => (min, min + size),
            Shape::Ellipse { center, radii } => (center - radii, center + radii),
            Shape::Triangle([a, b, c]) => (a.min(b).min(c), a.max(b).max(c)),
            Shape::Line { from, to } => (from.min(to), from.max(to)),
        }
    }

    /// Whether a point lies inside a filled shape (lines contain nothing)
    pub fn contains(&self, p: Vec2) -> bool {
        match *self {
            Shape::Rect { min, size } => {
                p.x >= min.x && p.y >= min.y && p.x < min.x + size.x && p.y < min.y + size.y
            }
            Shape::Ellipse { center, radii } => {
                if radii.x <= 0.0 || radii.y <= 0.0 {
                    return false;
                }
                let d = (p - center) / radii;
                d.length_squared() <= 1.0
            }
            Shape::Triangle([a, b, c]) => {
                let edge = |u: Vec2, v: Vec2| (v - u).perp_dot(p - u);
                let (d1, d2, d3) = (edge(a, b), edge(b, c), edge(c, a));
                let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
                let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
                !(has_neg && has_pos)
            }
            Shape::Line { .. } => false,
        }
    }
}

/// One primitive with its colour and opacity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCmd {
    pub shape: Shape,
    pub color: Rgb,
    pub alpha: u8,
}

impl DrawCmd {
    pub fn opaque(shape: Shape, color: Rgb) -> Self {
        Self {
            shape,
            color,
            alpha: 255,
        }
    }
}

/// Everything needed to present one frame
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub background: Rgb,
    /// Back to front
    pub cmds: Vec<DrawCmd>,
    pub hud: String,
    pub hud_color: Rgb,
}

/// A presentation backend
pub trait Renderer {
    fn present(&mut self, frame: &DrawList) -> std::io::Result<()>;
}

/// Status line shown over the playfield
pub fn hud_text(state: &GameState) -> String {
    format!(
        "Health: {}  Score: {}",
        state.player.health, state.player.score
    )
}

/// Build the draw list for the current state: scenery, obstacles, debris,
/// enemies, bullets, player, then the HUD.
pub fn build_frame(state: &GameState) -> DrawList {
    let mut cmds = Vec::with_capacity(8 * (state.scenery.len() + state.enemies.len() + 1));
    for entity in state.draw_order() {
        match entity {
            EntityRef::Scenery(s) => shapes::scenery(s, &mut cmds),
            EntityRef::Obstacle(o) => shapes::obstacle(o, &mut cmds),
            EntityRef::Debris(d) => shapes::debris(d, &mut cmds),
            EntityRef::Enemy(e) => shapes::enemy(e, &mut cmds),
            EntityRef::Bullet(b) => shapes::bullet(b, &mut cmds),
            EntityRef::Player(p) => shapes::player(p, &mut cmds),
        }
    }
    DrawList {
        background: COLOR_BG,
        cmds,
        hud: hud_text(state),
        hud_color: COLOR_HUD,
    }
}
