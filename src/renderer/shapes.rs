//! Shape generation for entity sprites
//!
//! Each function appends the primitives for one entity to `out`, back to
//! front. Generation is pure: animation comes from entity age and position,
//! never from an RNG.

use glam::Vec2;

use super::{DrawCmd, Shape};
use crate::palette::{COLOR_BULLET, COLOR_PLAYER, Rgb};
use crate::sim::{Bullet, Debris, Enemy, Obstacle, Player, Scenery, SceneryKind};

const FLAME_OUTER: Rgb = Rgb(255, 200, 30);
const FLAME_INNER: Rgb = Rgb(255, 120, 10);

fn line(from: Vec2, to: Vec2, color: Rgb, alpha: u8) -> DrawCmd {
    DrawCmd {
        shape: Shape::Line { from, to },
        color,
        alpha,
    }
}

fn scaled_alpha(alpha: u8, factor: f32) -> u8 {
    (alpha as f32 * factor).clamp(0.0, 255.0) as u8
}

/// Jet body with an engine flame that brightens while the gun cools down
pub fn player(p: &Player, out: &mut Vec<DrawCmd>) {
    let half = p.size / 2.0;
    let flame_alpha = if p.fire_cooldown > 0.0 { 255 } else { 153 };
    let flame_top = p.pos.y + half.y * 0.6;
    let flame_w = p.size.x * 0.2;
    let flame_h = p.size.y * 0.8;
    out.push(DrawCmd {
        shape: Shape::Triangle([
            Vec2::new(p.pos.x - flame_w, flame_top),
            Vec2::new(p.pos.x + flame_w, flame_top),
            Vec2::new(p.pos.x, flame_top + flame_h),
        ]),
        color: FLAME_OUTER,
        alpha: flame_alpha,
    });
    out.push(DrawCmd {
        shape: Shape::Triangle([
            Vec2::new(p.pos.x - flame_w * 0.5, flame_top),
            Vec2::new(p.pos.x + flame_w * 0.5, flame_top),
            Vec2::new(p.pos.x, flame_top + flame_h * 0.7),
        ]),
        color: FLAME_INNER,
        alpha: flame_alpha,
    });
    out.push(DrawCmd::opaque(
        Shape::Triangle([
            Vec2::new(p.pos.x, p.pos.y - half.y),
            Vec2::new(p.pos.x - half.x, p.pos.y + half.y),
            Vec2::new(p.pos.x + half.x, p.pos.y + half.y),
        ]),
        COLOR_PLAYER,
    ));
}

pub fn bullet(b: &Bullet, out: &mut Vec<DrawCmd>) {
    out.push(DrawCmd::opaque(
        Shape::Rect {
            min: b.pos - b.size / 2.0,
            size: b.size,
        },
        COLOR_BULLET,
    ));
}

/// Space monster: outlined body, eyes, toothy mouth and waving tentacles
pub fn enemy(e: &Enemy, out: &mut Vec<DrawCmd>) {
    let pal = e.palette;
    let (w, h) = (e.size.x, e.size.y);

    out.push(DrawCmd::opaque(
        Shape::ellipse_in(e.pos, e.size + Vec2::splat(4.0)),
        pal.outline,
    ));
    out.push(DrawCmd::opaque(Shape::ellipse_in(e.pos, e.size), pal.body));

    let eye_count = if w < 34.0 { 1 } else { 2 };
    let eye_r = (w.min(h) * 0.12).floor().max(3.0);
    for i in 0..eye_count {
        let ex = if eye_count == 2 {
            e.pos.x - w * 0.2 + i as f32 * w * 0.4
        } else {
            e.pos.x - w * 0.2
        };
        let eye = Vec2::new(ex, e.pos.y - h * 0.18);
        out.push(DrawCmd::opaque(Shape::circle(eye, eye_r), pal.eye));
        out.push(DrawCmd::opaque(
            Shape::circle(eye, (eye_r / 2.0).floor().max(1.0)),
            pal.pupil,
        ));
    }

    let mouth_size = Vec2::new(w * 0.5, h * 0.18);
    let mouth_top = e.pos.y + h * 0.12;
    out.push(DrawCmd::opaque(
        Shape::ellipse_in(Vec2::new(e.pos.x, mouth_top + mouth_size.y / 2.0), mouth_size),
        pal.mouth,
    ));
    let mouth_left = e.pos.x - mouth_size.x / 2.0;
    for i in 1..=4 {
        let tx = mouth_left + i as f32 * mouth_size.x / 5.0;
        out.push(line(
            Vec2::new(tx, mouth_top),
            Vec2::new(tx, mouth_top + mouth_size.y / 2.0),
            pal.outline,
            255,
        ));
    }

    for i in 0..3 {
        let start = Vec2::new(e.pos.x - w * 0.35 + i as f32 * w * 0.35, e.pos.y + h / 2.0);
        let joint = |s: u32| {
            let s = s as f32;
            Vec2::new(
                start.x + (e.age * 2.0 + i as f32 + s * 0.6).sin() * (6.0 + s * 2.0),
                start.y + s * h * 0.18,
            )
        };
        for s in 0..4 {
            out.push(line(joint(s), joint(s + 1), pal.outline, 255));
        }
    }
}

/// Asteroid with two to four craters placed from its crater seed
pub fn obstacle(o: &Obstacle, out: &mut Vec<DrawCmd>) {
    let pal = o.palette;
    out.push(DrawCmd::opaque(
        Shape::ellipse_in(o.pos, o.size + Vec2::splat(4.0)),
        pal.outline,
    ));
    out.push(DrawCmd::opaque(Shape::ellipse_in(o.pos, o.size), pal.body));

    let top_left = o.pos - o.size / 2.0;
    let seed = o.crater_seed;
    let craters = 2 + (seed * 3.0) as u32;
    for i in 0..craters {
        let i = i as f32;
        let min = top_left
            + Vec2::new(
                (0.15 + (seed + i * 0.23) % 0.7) * o.size.x,
                (0.2 + (seed * 1.3 + i * 0.17) % 0.6) * o.size.y,
            );
        let size = Vec2::new(
            o.size.x * (0.15 + (seed + i * 0.17) % 0.25),
            o.size.y * (0.12 + (seed + i * 0.11) % 0.2),
        );
        out.push(DrawCmd::opaque(
            Shape::ellipse_in(min + size / 2.0, size + Vec2::splat(2.0)),
            pal.outline.darken(10),
        ));
        out.push(DrawCmd::opaque(
            Shape::ellipse_in(min + size / 2.0, size),
            pal.body.darken(30),
        ));
    }
}

pub fn debris(d: &Debris, out: &mut Vec<DrawCmd>) {
    out.push(DrawCmd::opaque(Shape::ellipse_in(d.pos, d.size), d.color));
}

/// Background decoration, drawn at the object's own opacity
pub fn scenery(s: &Scenery, out: &mut Vec<DrawCmd>) {
    let pal = s.palette;
    let alpha = s.alpha;
    let (w, h) = (s.size.x, s.size.y);
    match s.kind {
        SceneryKind::Star => {
            let r = (w.min(h) / 2.0).floor().max(1.0);
            let twinkle = 0.5 + 0.5 * (s.age * 6.0 + s.pos.x).sin();
            let v = (180.0 + 75.0 * twinkle).min(255.0) as u8;
            let col = Rgb(v, v, v);
            out.push(DrawCmd {
                shape: Shape::circle(s.pos, r),
                color: col,
                alpha,
            });
            let reach = r + 1.0;
            out.push(line(
                s.pos - Vec2::new(reach, 0.0),
                s.pos + Vec2::new(reach, 0.0),
                col,
                alpha,
            ));
            out.push(line(
                s.pos - Vec2::new(0.0, reach),
                s.pos + Vec2::new(0.0, reach),
                col,
                alpha,
            ));
        }
        SceneryKind::Planet => {
            let r = (w / 2.0).floor();
            out.push(DrawCmd {
                shape: Shape::circle(s.pos, r + 3.0),
                color: pal.secondary,
                alpha,
            });
            out.push(DrawCmd {
                shape: Shape::circle(s.pos, r),
                color: pal.primary,
                alpha,
            });
            out.push(DrawCmd {
                shape: Shape::ellipse_in(s.pos, Vec2::new(w * 1.2, h * 0.18)),
                color: pal.primary.darken(30),
                alpha,
            });
            out.push(DrawCmd {
                shape: Shape::circle(
                    s.pos - Vec2::new(w * 0.25, h * 0.25),
                    (w * 0.08).floor().max(2.0),
                ),
                color: pal.highlight,
                alpha,
            });
        }
        SceneryKind::Comet => {
            let tail_root = s.pos.x - w / 2.0;
            let tail_end = tail_root - w * 3.0;
            out.push(DrawCmd {
                shape: Shape::Triangle([
                    Vec2::new(tail_root, s.pos.y),
                    Vec2::new(tail_end, s.pos.y - h * 0.6),
                    Vec2::new(tail_end, s.pos.y + h * 0.6),
                ]),
                color: pal.secondary,
                alpha: scaled_alpha(alpha, 0.6).max(10),
            });
            out.push(DrawCmd {
                shape: Shape::ellipse_in(s.pos, s.size),
                color: pal.primary,
                alpha,
            });
        }
        SceneryKind::Nebula => {
            for i in 0..4 {
                let fi = i as f32;
                let drift = Vec2::new(
                    (s.age * 0.7 + fi * 1.9 + s.pos.x).sin(),
                    (s.age * 0.5 + fi * 2.3).cos(),
                ) * 0.5;
                let center = s.pos + drift * s.size;
                let size = Vec2::new(
                    (w * (0.6 + 0.6 * (fi + 1.0) / 4.0)).max(2.0),
                    (h * (0.6 + 0.6 * (4.0 - fi) / 4.0)).max(2.0),
                );
                let color = if i % 2 == 0 { pal.primary } else { pal.secondary };
                out.push(DrawCmd {
                    shape: Shape::ellipse_in(center, size),
                    color,
                    alpha: scaled_alpha(alpha, 0.4 + fi * 0.2).clamp(10, 200),
                });
            }
        }
    }
}
