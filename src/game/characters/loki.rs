use bevy::prelude::*;
use rand::Rng;

use super::{CharacterBehavior, outline};
use crate::config::tuning::Tuning;
use crate::game::ability::Effects;
use crate::game::components::FakeBall;
use crate::game::geometry::{random_sign, velocity_at_angle};
use crate::game::types::Side;
use crate::render::{RectStyle, Renderer, palette};

const HORN_LEN: f32 = 14.0;
const HORN_HALF_THICKNESS: f32 = 7.0;
/// Attempts at a second decoy angle before mirroring the first.
const MAX_ANGLE_TRIES: usize = 32;

/// Passive: hologram of the enemy paddle on each hit. Ability: next hit splits the ball.
pub struct Loki;

impl CharacterBehavior for Loki {
    fn name(&self) -> &'static str {
        "Loki"
    }

    fn passive_text(&self) -> &'static str {
        "Doppelganger: every hit conjures an illusion of the enemy paddle on their side."
    }

    fn ability_text(&self) -> &'static str {
        "God of Mischief: double-press D or < and your next hit splits the ball into \
         three. Only one of them is real."
    }

    fn activate(&self, fx: &mut Effects) {
        fx.me.ability.split_pending = true;
    }

    fn on_paddle_hit(&self, fx: &mut Effects) {
        let foe = &mut *fx.foe;
        foe.hologram.active = true;
        foe.hologram
            .ensure_sign(&foe.paddle, fx.arena, fx.tuning.hologram_gap, &mut *fx.rng);

        if fx.me.ability.split_pending {
            fx.me.ability.split_pending = false;
            split_ball(fx);
        }
    }

    fn draw_skin(&self, r: &mut dyn Renderer, rect: Rect, side: Side) {
        r.draw_rect(rect, palette::LOKI_BODY, RectStyle::Fill, 0.0);

        // Face line and horns point toward the net; horns sit outside the paddle.
        let toward = side.away_sign();
        let edge = match side {
            Side::Left => rect.max.x,
            Side::Right => rect.min.x,
        };
        let line_x = edge - toward * 3.0;
        r.draw_line(
            Vec2::new(line_x, rect.min.y + 6.0),
            Vec2::new(line_x, rect.max.y - 6.0),
            palette::YELLOW,
            3.0,
        );
        for base_y in [rect.min.y + 8.0, rect.max.y - 8.0] {
            let horn = [
                Vec2::new(edge + toward * HORN_LEN, base_y),
                Vec2::new(edge + toward * 2.0, base_y - HORN_HALF_THICKNESS),
                Vec2::new(edge + toward * 2.0, base_y + HORN_HALF_THICKNESS),
            ];
            r.draw_polygon(&horn, palette::YELLOW);
        }
        outline(r, rect);
    }
}

fn decoy_angle(rng: &mut impl Rng, tuning: &Tuning) -> f32 {
    let lo = tuning.loki_min_deg.min(tuning.loki_max_deg);
    let hi = tuning.loki_min_deg.max(tuning.loki_max_deg);
    rng.gen_range(lo..=hi) * random_sign(rng)
}

/// Two decoys at separated random angles, then a fresh random heading for the real ball.
/// All three keep the outgoing speed and horizontal direction.
fn split_ball(fx: &mut Effects) {
    let speed = fx.ball.vel.length();
    if speed < 1e-6 {
        return;
    }
    let toward_right = fx.ball.vel.x > 0.0;
    let rng = &mut *fx.rng;

    let a1 = decoy_angle(rng, fx.tuning);
    let a2 = (0..MAX_ANGLE_TRIES)
        .map(|_| decoy_angle(rng, fx.tuning))
        .find(|a2| (a2 - a1).abs() >= fx.tuning.loki_min_sep_deg)
        .unwrap_or(-a1);

    for angle in [a1, a2] {
        fx.fake_balls.push(FakeBall {
            pos: fx.ball.pos,
            vel: velocity_at_angle(speed, angle, toward_right),
        });
    }
    fx.ball.vel = velocity_at_angle(speed, decoy_angle(rng, fx.tuning), toward_right);
    info!("[Loki] {} split the ball", fx.me.side.tag());
}
