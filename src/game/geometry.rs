//! Speed/angle math, wall reflection, and trajectory prediction.
//!
//! Screen space is y-down: the HUD band is at the top, `bottom` is the
//! window height.

use bevy::prelude::*;
use rand::Rng;

/// Serve velocity: each axis magnitude uniform in `[min, max]`, signs independent.
pub fn random_velocity(rng: &mut impl Rng, min: f32, max: f32) -> Vec2 {
    let (lo, hi) = (min.min(max), min.max(max));
    let sx = rng.gen_range(lo..=hi) * random_sign(rng);
    let sy = rng.gen_range(lo..=hi) * random_sign(rng);
    Vec2::new(sx, sy)
}

pub fn random_sign(rng: &mut impl Rng) -> f32 {
    if rng.gen_bool(0.5) { 1.0 } else { -1.0 }
}

/// Velocity of length `speed` at `angle_deg` off the horizontal, heading right or left.
/// The angle is added to the heading (0 or pi), so its vertical sign mirrors for leftward shots.
pub fn velocity_at_angle(speed: f32, angle_deg: f32, toward_right: bool) -> Vec2 {
    let base = if toward_right { 0.0 } else { std::f32::consts::PI };
    let a = base + angle_deg.to_radians();
    Vec2::new(speed * a.cos(), speed * a.sin())
}

/// Clamp against the top/bottom walls and damp the vertical component on contact.
/// Returns the (possibly) corrected `(position, velocity)`.
pub fn reflect_vertical(
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    top: f32,
    bottom: f32,
    damping: f32,
) -> (Vec2, Vec2) {
    if pos.y - radius <= top {
        (Vec2::new(pos.x, top + radius), Vec2::new(vel.x, vel.y * -damping))
    } else if pos.y + radius >= bottom {
        (Vec2::new(pos.x, bottom - radius), Vec2::new(vel.x, vel.y * -damping))
    } else {
        (pos, vel)
    }
}

/// Scale `vel` down uniformly so its length is at most `max`.
pub fn clamp_speed(vel: Vec2, max: f32) -> Vec2 {
    let speed = vel.length();
    if speed > max && speed > 0.0 {
        vel * (max / speed)
    } else {
        vel
    }
}

/// Lazy piecewise-linear prediction of the ball path, bouncing off the
/// top/bottom walls until it reaches `target_x`.
///
/// Finite; clone before iterating to replay the path.
#[derive(Debug, Clone)]
pub struct Trajectory {
    cursor: Vec2,
    vel: Vec2,
    top: f32,
    bottom: f32,
    target_x: f32,
    remaining: usize,
    origin_pending: bool,
    done: bool,
}

/// Build the waypoint sequence. `top`/`bottom` are wall lines; the ball
/// radius is applied internally. Yields only the origin if the ball is not
/// heading toward `target_x`.
pub fn predict_trajectory(
    origin: Vec2,
    vel: Vec2,
    top: f32,
    bottom: f32,
    radius: f32,
    target_x: f32,
    max_bounces: usize,
) -> Trajectory {
    let heading_toward = (target_x - origin.x) * vel.x > 0.0;
    Trajectory {
        cursor: origin,
        vel,
        top: top + radius,
        bottom: bottom - radius,
        target_x,
        remaining: max_bounces + 1,
        origin_pending: true,
        done: !heading_toward,
    }
}

impl Iterator for Trajectory {
    type Item = Vec2;

    fn next(&mut self) -> Option<Vec2> {
        if self.origin_pending {
            self.origin_pending = false;
            return Some(self.cursor);
        }
        if self.done || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let Vec2 { x: cx, y: cy } = self.cursor;
        let Vec2 { x: sx, y: sy } = self.vel;

        let t_top = if sy >= 0.0 { f32::INFINITY } else { (self.top - cy) / sy };
        let t_bottom = if sy <= 0.0 { f32::INFINITY } else { (self.bottom - cy) / sy };
        let t_y = t_top.min(t_bottom);
        let t_x = (self.target_x - cx) / sx;

        if t_x <= t_y {
            self.done = true;
            return Some(Vec2::new(self.target_x, cy + sy * t_x));
        }

        let nx = cx + sx * t_y;
        let ny = (cy + sy * t_y).max(self.top).min(self.bottom);
        self.cursor = Vec2::new(nx, ny);
        self.vel.y = -sy;
        Some(self.cursor)
    }
}
