//! Terminal backend
//!
//! The 480x640 viewport is scaled onto the terminal. Each character cell
//! shows two vertically stacked pixels with an upper half block: the
//! foreground colour is the top pixel and the background colour the bottom
//! one. Row 0 is reserved for the HUD.

use std::io::Write;

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Color, Print},
    terminal,
};
use glam::Vec2;

use super::{DrawCmd, DrawList, Renderer, Shape};
use crate::consts::{HEIGHT, WIDTH};
use crate::palette::Rgb;

const HALF_BLOCK: char = '▀';

/// Composite `src` over `dst` at the given opacity
pub fn blend(dst: Rgb, src: Rgb, alpha: u8) -> Rgb {
    let a = alpha as u16;
    let mix = |d: u8, s: u8| ((s as u16 * a + d as u16 * (255 - a) + 127) / 255) as u8;
    Rgb(mix(dst.0, src.0), mix(dst.1, src.1), mix(dst.2, src.2))
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

/// Pixel buffer covering the whole viewport
#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Viewport units to pixels
    fn scale(&self) -> Vec2 {
        Vec2::new(self.width as f32 / WIDTH, self.height as f32 / HEIGHT)
    }

    fn pixel_at(&self, world: Vec2) -> Option<(usize, usize)> {
        let p = (world * self.scale()).floor();
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let (x, y) = (p.x as usize, p.y as usize);
        (x < self.width && y < self.height).then_some((x, y))
    }

    fn put(&mut self, x: usize, y: usize, color: Rgb, alpha: u8) {
        let idx = y * self.width + x;
        self.pixels[idx] = blend(self.pixels[idx], color, alpha);
    }

    /// Rasterise one primitive. Filled shapes too small to cover any pixel
    /// centre still paint the pixel under their centre.
    pub fn draw(&mut self, cmd: &DrawCmd) {
        if self.width == 0 || self.height == 0 || cmd.alpha == 0 {
            return;
        }
        if let Shape::Line { from, to } = cmd.shape {
            self.draw_line(from, to, cmd.color, cmd.alpha);
            return;
        }

        let scale = self.scale();
        let (min, max) = cmd.shape.bounds();
        let lo = (min * scale).floor().max(Vec2::ZERO);
        let hi = (max * scale)
            .ceil()
            .min(Vec2::new(self.width as f32, self.height as f32));

        let mut covered = false;
        let mut y = lo.y as usize;
        while (y as f32) < hi.y {
            let mut x = lo.x as usize;
            while (x as f32) < hi.x {
                let world = (Vec2::new(x as f32, y as f32) + 0.5) / scale;
                if cmd.shape.contains(world) {
                    self.put(x, y, cmd.color, cmd.alpha);
                    covered = true;
                }
                x += 1;
            }
            y += 1;
        }

        if !covered && let Some((x, y)) = self.pixel_at((min + max) / 2.0) {
            self.put(x, y, cmd.color, cmd.alpha);
        }
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: u8) {
        let scale = self.scale();
        let span = (to - from) * scale;
        let steps = span.x.abs().max(span.y.abs()).ceil().max(1.0) as usize;
        let mut last = None;
        for i in 0..=steps {
            let world = from.lerp(to, i as f32 / steps as f32);
            let Some(px) = self.pixel_at(world) else {
                continue;
            };
            if last != Some(px) {
                self.put(px.0, px.1, color, alpha);
                last = Some(px);
            }
        }
    }
}

/// Renders frames to a terminal (or any writer) with 24-bit colour
pub struct TerminalRenderer<W: Write> {
    out: W,
    /// Columns and rows; queried from the terminal each frame when unset
    fixed_size: Option<(u16, u16)>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            fixed_size: None,
        }
    }

    pub fn with_size(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            fixed_size: Some((cols, rows)),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn size(&self) -> std::io::Result<(u16, u16)> {
        match self.fixed_size {
            Some(size) => Ok(size),
            None => terminal::size(),
        }
    }

    fn queue_hud(&mut self, frame: &DrawList, cols: usize) -> std::io::Result<()> {
        let text: String = frame
            .hud
            .chars()
            .chain(std::iter::repeat(' '))
            .take(cols)
            .collect();
        self.out.queue(cursor::MoveTo(0, 0))?;
        self.out
            .queue(style::SetBackgroundColor(to_color(frame.background)))?;
        self.out
            .queue(style::SetForegroundColor(to_color(frame.hud_color)))?;
        self.out.queue(Print(text))?;
        Ok(())
    }

    fn queue_canvas(&mut self, canvas: &Canvas) -> std::io::Result<()> {
        let mut current: Option<(Rgb, Rgb)> = None;
        for row in 0..canvas.height() / 2 {
            self.out.queue(cursor::MoveTo(0, row as u16 + 1))?;
            let mut line = String::with_capacity(canvas.width() * 3);
            for col in 0..canvas.width() {
                let top = canvas.get(col, row * 2).unwrap_or_default();
                let bottom = canvas.get(col, row * 2 + 1).unwrap_or_default();
                if current != Some((top, bottom)) {
                    if !line.is_empty() {
                        self.out.queue(Print(std::mem::take(&mut line)))?;
                    }
                    self.out.queue(style::SetForegroundColor(to_color(top)))?;
                    self.out.queue(style::SetBackgroundColor(to_color(bottom)))?;
                    current = Some((top, bottom));
                }
                line.push(HALF_BLOCK);
            }
            if !line.is_empty() {
                self.out.queue(Print(line))?;
            }
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn present(&mut self, frame: &DrawList) -> std::io::Result<()> {
        let (cols, rows) = self.size()?;
        let cols = cols as usize;
        let field_rows = rows.saturating_sub(1) as usize;

        let mut canvas = Canvas::new(cols, field_rows * 2, frame.background);
        for cmd in &frame.cmds {
            canvas.draw(cmd);
        }

        self.queue_hud(frame, cols)?;
        self.queue_canvas(&canvas)?;
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::COLOR_BG;

    const RED: Rgb = Rgb(255, 0, 0);

    #[test]
    fn test_blend_extremes() {
        assert_eq!(blend(COLOR_BG, RED, 255), RED);
        assert_eq!(blend(COLOR_BG, RED, 0), COLOR_BG);
        let half = blend(Rgb(0, 0, 0), Rgb(200, 100, 0), 128);
        assert_eq!(half, Rgb(100, 50, 0));
    }

    #[test]
    fn test_rect_fills_matching_pixels() {
        // One pixel per 10x10 viewport units
        let mut canvas = Canvas::new(48, 64, COLOR_BG);
        canvas.draw(&DrawCmd::opaque(
            Shape::Rect {
                min: Vec2::new(0.0, 0.0),
                size: Vec2::new(20.0, 20.0),
            },
            RED,
        ));
        assert_eq!(canvas.get(0, 0), Some(RED));
        assert_eq!(canvas.get(1, 1), Some(RED));
        assert_eq!(canvas.get(2, 2), Some(COLOR_BG));
    }

    #[test]
    fn test_tiny_shape_stays_visible() {
        let mut canvas = Canvas::new(48, 64, COLOR_BG);
        // A bullet-sized box that misses every pixel centre
        canvas.draw(&DrawCmd::opaque(
            Shape::Rect {
                min: Vec2::new(106.0, 106.0),
                size: Vec2::new(2.0, 2.0),
            },
            RED,
        ));
        assert_eq!(canvas.get(10, 10), Some(RED));
    }

    #[test]
    fn test_offscreen_shapes_are_clipped() {
        let mut canvas = Canvas::new(48, 64, COLOR_BG);
        canvas.draw(&DrawCmd::opaque(Shape::circle(Vec2::new(-500.0, 900.0), 30.0), RED));
        canvas.draw(&DrawCmd::opaque(
            Shape::Line {
                from: Vec2::new(-100.0, -100.0),
                to: Vec2::new(-10.0, -10.0),
            },
            RED,
        ));
        for y in 0..64 {
            for x in 0..48 {
                assert_eq!(canvas.get(x, y), Some(COLOR_BG));
            }
        }
    }

    #[test]
    fn test_line_paints_each_pixel_once() {
        let mut canvas = Canvas::new(48, 64, Rgb(0, 0, 0));
        canvas.draw(&DrawCmd {
            shape: Shape::Line {
                from: Vec2::new(5.0, 5.0),
                to: Vec2::new(95.0, 5.0),
            },
            color: Rgb(200, 200, 200),
            alpha: 128,
        });
        for x in 0..10 {
            assert_eq!(canvas.get(x, 0), Some(Rgb(100, 100, 100)));
        }
    }

    #[test]
    fn test_present_writes_hud() {
        let frame = DrawList {
            background: COLOR_BG,
            cmds: vec![DrawCmd::opaque(Shape::circle(Vec2::new(240.0, 320.0), 40.0), RED)],
            hud: "Health: 5  Score: 0".to_string(),
            hud_color: Rgb(240, 240, 240),
        };
        let mut renderer = TerminalRenderer::with_size(Vec::new(), 40, 12);
        renderer.present(&frame).unwrap();
        let bytes = renderer.into_inner();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("Health: 5  Score: 0"));
        assert!(text.contains(HALF_BLOCK));
    }

    #[test]
    fn test_present_handles_zero_size() {
        let frame = DrawList::default();
        let mut renderer = TerminalRenderer::with_size(Vec::new(), 0, 0);
        assert!(renderer.present(&frame).is_ok());
    }
}
