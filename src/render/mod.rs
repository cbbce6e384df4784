//! Drawing boundary between the simulation and whatever presents frames.
//!
//! All coordinates are screen space (origin top-left, y down) in logical pixels.

pub mod draw_list;
pub mod scene;

use bevy::prelude::*;

// ── Palette ─────────────────────────────────────────────────────────

pub mod palette {
    use bevy::prelude::Color;

    pub const BLUE: Color = Color::srgb_u8(0, 0, 255);
    pub const RED: Color = Color::srgb_u8(255, 0, 0);
    pub const GREEN: Color = Color::srgb_u8(0, 255, 0);
    pub const BLACK: Color = Color::srgb_u8(0, 0, 0);
    pub const WHITE: Color = Color::srgb_u8(255, 255, 255);
    pub const LIGHT_BLUE: Color = Color::srgb_u8(135, 206, 250);
    pub const YELLOW: Color = Color::srgb_u8(255, 215, 0);
    pub const HUD_BG: Color = Color::srgb_u8(20, 20, 20);
    pub const HUD_BORDER: Color = Color::srgb_u8(80, 80, 80);
    pub const JARVIS: Color = Color::srgb_u8(80, 180, 255);
    pub const PANEL: Color = Color::srgb_u8(40, 40, 40);
    pub const LOKI_BODY: Color = Color::srgb_u8(20, 90, 50);
    pub const BOLT: Color = Color::srgb_u8(150, 150, 150);
    pub const METER_EMPTY: Color = Color::srgb_u8(70, 70, 40);
    pub const METER_BORDER: Color = Color::srgb_u8(120, 120, 120);
}

// ── Text ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size: f32,
    pub bold: bool,
}

impl Font {
    pub const TITLE: Self = Self::regular(64.0);
    pub const SUB: Self = Self::regular(26.0);
    pub const ITEM: Self = Self::regular(32.0);
    pub const DESC: Self = Self::regular(24.0);
    pub const NAME: Self = Self::bold(26.0);
    pub const SMALL: Self = Self::regular(22.0);
    pub const SCORE: Self = Self::bold(28.0);
    pub const WIN: Self = Self::regular(100.0);

    pub const fn regular(size: f32) -> Self {
        Self { size, bold: false }
    }

    pub const fn bold(size: f32) -> Self {
        Self { size, bold: true }
    }
}

/// Horizontal placement of text inside its box. Text is vertically centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

// ── Shapes ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RectStyle {
    Fill,
    /// Outline of the given stroke width.
    Border(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub dot_len: f32,
    pub gap_len: f32,
    pub width: f32,
}

impl Default for Dash {
    fn default() -> Self {
        Self {
            dot_len: 6.0,
            gap_len: 6.0,
            width: 2.0,
        }
    }
}

/// Primitive drawing service.
pub trait Renderer {
    fn clear(&mut self, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn draw_rect(&mut self, rect: Rect, color: Color, style: RectStyle, corner_radius: f32);
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);
    /// Filled polygon; points in order, implicitly closed.
    fn draw_polygon(&mut self, points: &[Vec2], color: Color);
    fn draw_dotted_polyline(&mut self, points: &[Vec2], color: Color, dash: Dash);
    /// `text` may contain `\n`; the presenter wraps to `bounds` width.
    fn draw_text(&mut self, text: &str, font: Font, color: Color, bounds: Rect, align: TextAlign);
    /// New surface size; returns the size actually in effect.
    fn resize(&mut self, width: f32, height: f32) -> Vec2;
    fn size(&self) -> Vec2;
}

/// Split a polyline into visible dash segments. The dash pattern carries across vertices.
pub fn dash_segments(points: &[Vec2], dash: Dash) -> Vec<(Vec2, Vec2)> {
    let mut out = Vec::new();
    if dash.dot_len <= 0.0 {
        return out;
    }
    let period = dash.dot_len + dash.gap_len.max(0.0);
    let mut phase = 0.0_f32;
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let seg_len = a.distance(b);
        if seg_len <= f32::EPSILON {
            continue;
        }
        let dir = (b - a) / seg_len;
        let mut t = 0.0_f32;
        while t < seg_len {
            let in_period = phase % period;
            if in_period < dash.dot_len {
                let run = (dash.dot_len - in_period).min(seg_len - t);
                out.push((a + dir * t, a + dir * (t + run)));
                t += run;
                phase += run;
            } else {
                let run = (period - in_period).min(seg_len - t);
                t += run;
                phase += run;
            }
        }
    }
    out
}
