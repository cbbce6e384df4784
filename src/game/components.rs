use bevy::prelude::*;
use rand::Rng;

use super::types::{ControlState, Millis, Side};
use crate::config::tuning::Tuning;

// ── Match phase ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Menu,
    Serve,
    Play,
    /// Transient win announcement; returns to Menu at `until`.
    Win { winner: Side, until: Millis },
}

// ── Playfield ───────────────────────────────────────────────────────

/// Spatial bounds of the playfield (screen space, y-down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub hud_height: f32,
    pub center_margin: f32,
}

impl Arena {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            width: tuning.window_width,
            height: tuning.window_height,
            hud_height: tuning.hud_height,
            center_margin: tuning.center_margin,
        }
    }

    /// Top wall: the bottom of the HUD band.
    pub fn top(&self) -> f32 {
        self.hud_height
    }

    pub fn bottom(&self) -> f32 {
        self.height
    }

    pub fn mid_x(&self) -> f32 {
        self.width / 2.0
    }

    pub fn field_center(&self) -> Vec2 {
        Vec2::new(self.mid_x(), self.hud_height + (self.height - self.hud_height) / 2.0)
    }
}

// ── Ball ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub control: ControlState,
    /// x where the ball was hidden; visible again once it crosses the midline.
    pub hidden_from: Option<f32>,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            control: ControlState::default(),
            hidden_from: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center_half_size(self.pos, Vec2::splat(self.radius))
    }

    pub fn is_visible(&self) -> bool {
        self.hidden_from.is_none()
    }

    pub fn hide(&mut self) {
        self.hidden_from = Some(self.pos.x);
    }

    /// Reveal once `(anchor - mid) * (x - mid)` changes sign.
    pub fn update_visibility(&mut self, mid_x: f32) {
        if let Some(anchor) = self.hidden_from {
            if (anchor - mid_x) * (self.pos.x - mid_x) <= 0.0 {
                self.hidden_from = None;
            }
        }
    }

    /// Ball has fully left the field on the given side.
    pub fn exited(&self, arena: &Arena) -> Option<Side> {
        if self.pos.x + self.radius < 0.0 {
            Some(Side::Left)
        } else if self.pos.x - self.radius > arena.width {
            Some(Side::Right)
        } else {
            None
        }
    }
}

/// Loki decoy: follows ball physics, never scores or hits paddles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FakeBall {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl FakeBall {
    pub fn is_out(&self, arena: &Arena, radius: f32) -> bool {
        self.pos.x + radius < 0.0 || self.pos.x - radius > arena.width
    }
}

// ── Paddle ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Paddle {
    pub side: Side,
    pub base_x: f32,
    pub y: f32,
    pub x_offset: f32,
    pub vel_y: f32,
    pub size: Vec2,
    pub inset: f32,
    pub control: ControlState,
}

impl Paddle {
    pub fn new(side: Side, arena: &Arena, tuning: &Tuning) -> Self {
        let mut paddle = Self {
            side,
            base_x: 0.0,
            y: 0.0,
            x_offset: 0.0,
            vel_y: 0.0,
            size: Vec2::new(tuning.paddle_width, tuning.paddle_height),
            inset: tuning.paddle_inset,
            control: ControlState::default(),
        };
        paddle.place_base(arena);
        paddle.recenter(arena);
        paddle
    }

    /// Recompute the base x from the window width.
    pub fn place_base(&mut self, arena: &Arena) {
        self.base_x = match self.side {
            Side::Left => self.inset - self.size.x / 2.0,
            Side::Right => arena.width - (self.inset + self.size.x / 2.0),
        };
    }

    pub fn recenter(&mut self, arena: &Arena) {
        self.y = arena.hud_height + (arena.height - arena.hud_height - self.size.y) / 2.0;
    }

    pub fn x(&self) -> f32 {
        self.base_x + self.x_offset
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x(), self.y, self.x() + self.size.x, self.y + self.size.y)
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.size.y / 2.0
    }

    /// x of the edge facing the field center.
    pub fn face_x(&self) -> f32 {
        match self.side {
            Side::Left => self.x() + self.size.x,
            Side::Right => self.x(),
        }
    }

    pub fn clamp_vertical(&mut self, arena: &Arena) {
        self.y = self.y.min(arena.bottom() - self.size.y).max(arena.top());
    }

    /// Keep the paddle inside its half, outside the center margin.
    pub fn clamp_horizontal(&mut self, arena: &Arena) {
        let (min_x, max_x) = match self.side {
            Side::Left => (0.0, arena.mid_x().floor() - self.size.x - arena.center_margin),
            Side::Right => (arena.mid_x().floor() + arena.center_margin, arena.width - self.size.x),
        };
        let x = self.x().min(max_x).max(min_x);
        self.x_offset = x - self.base_x;
    }
}

// ── Hologram ────────────────────────────────────────────────────────

/// Loki passive: a copy of the enemy paddle drawn above or below it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hologram {
    pub active: bool,
    /// -1 above, +1 below, 0 not chosen this rally.
    pub sign: i8,
}

impl Hologram {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Pick a side that fits in the playfield, random when both fit. Kept until cleared.
    pub fn ensure_sign(&mut self, enemy: &Paddle, arena: &Arena, gap: f32, rng: &mut impl Rng) {
        if self.sign != 0 {
            return;
        }
        let h = enemy.size.y;
        let above_ok = enemy.y - (h + gap) >= arena.top();
        let below_ok = enemy.y + h + gap + h <= arena.bottom();
        self.sign = match (above_ok, below_ok) {
            (true, true) => {
                if rng.gen_bool(0.5) { -1 } else { 1 }
            }
            (true, false) => -1,
            (false, true) => 1,
            (false, false) => {
                let space_above = enemy.y - arena.top();
                let space_below = arena.bottom() - (enemy.y + h);
                if space_above >= space_below { -1 } else { 1 }
            }
        };
    }

    /// Rect mirroring the enemy paddle, clamped to the playfield.
    pub fn rect(&self, enemy: &Paddle, arena: &Arena, gap: f32) -> Rect {
        let h = enemy.size.y;
        let y = enemy.y + f32::from(self.sign) * (h + gap);
        let y = y.min(arena.bottom() - h).max(arena.top());
        Rect::new(enemy.x(), y, enemy.x() + enemy.size.x, y + h)
    }
}
