use bevy::prelude::*;

use super::{CharacterBehavior, outline};
use crate::config::tuning::Tuning;
use crate::game::ability::{AbilityState, Effects};
use crate::game::types::{ControlEffect, Millis, Side};
use crate::render::{RectStyle, Renderer, palette};

/// Bolt outline as fractions of the paddle size.
const BOLT: [(f32, f32); 7] = [
    (0.22, 0.06),
    (0.58, 0.06),
    (0.42, 0.46),
    (0.76, 0.46),
    (0.30, 0.94),
    (0.46, 0.54),
    (0.22, 0.54),
];

/// Passive: faster paddle. Ability: slows everything else down.
pub struct QuickSilver;

impl CharacterBehavior for QuickSilver {
    fn name(&self) -> &'static str {
        "QuickSilver"
    }

    fn passive_text(&self) -> &'static str {
        "Speedster: your paddle moves faster than anyone else's."
    }

    fn ability_text(&self) -> &'static str {
        "Sweet Dreams: double-press D or < to slow the whole game except yourself, \
         and hit the ball harder. Lasts 18 seconds."
    }

    fn paddle_speed(&self, tuning: &Tuning, _ability: &AbilityState, _now: Millis) -> f32 {
        tuning.paddle_speed + tuning.quicksilver_speed_bonus
    }

    fn ability_duration_ms(&self, tuning: &Tuning) -> Option<u64> {
        Some(tuning.quicksilver_ability_ms)
    }

    fn hit_force(&self, tuning: &Tuning, ability: &AbilityState, now: Millis) -> f32 {
        if ability.is_active(now) {
            tuning.quicksilver_hit_force
        } else {
            1.0
        }
    }

    fn ability_track<'t>(&self, tuning: &'t Tuning) -> Option<(&'t str, f32)> {
        Some((tuning.quicksilver_track.as_str(), tuning.quicksilver_volume))
    }

    fn activate(&self, fx: &mut Effects) {
        let t = fx.tuning;
        let freeze = ControlEffect::Freeze {
            until: fx.now.plus(t.quicksilver_freeze_ms),
        };
        let slow = ControlEffect::Slow {
            until: fx.now.plus(t.quicksilver_ability_ms),
            ratio: t.quicksilver_slow_ratio,
        };
        for control in [&mut fx.foe.paddle.control, &mut fx.ball.control] {
            control.apply(freeze);
            control.apply(slow);
        }
        fx.music
            .start(&mut *fx.audio, &t.quicksilver_track, t.quicksilver_volume);
    }

    fn draw_skin(&self, r: &mut dyn Renderer, rect: Rect, _side: Side) {
        r.draw_rect(rect, palette::LIGHT_BLUE, RectStyle::Fill, 0.0);
        let size = rect.size();
        let bolt: Vec<Vec2> = BOLT
            .iter()
            .map(|&(u, v)| rect.min + Vec2::new((u * size.x).floor(), (v * size.y).floor()))
            .collect();
        r.draw_polygon(&bolt, palette::BOLT);
        outline(r, rect);
    }
}
