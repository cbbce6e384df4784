use bevy::prelude::*;

use super::{CharacterBehavior, outline};
use crate::config::tuning::Tuning;
use crate::game::ability::{AbilityState, Effects};
use crate::game::intent::{HeldKeys, KeyRole};
use crate::game::types::{Millis, Side};
use crate::render::{RectStyle, Renderer, palette};

/// Passive: horizontal thrusters. Ability: trajectory overlay plus a speed override.
pub struct IronMan;

impl CharacterBehavior for IronMan {
    fn name(&self) -> &'static str {
        "Iron Man"
    }

    fn passive_text(&self) -> &'static str {
        "Rocket boosters: hold A/D or </> to fly toward or away from the net."
    }

    fn ability_text(&self) -> &'static str {
        "Jarvis lock-in: double-press D or < to see where an incoming ball will land, \
         with faster paddle movement. Lasts 9 seconds."
    }

    fn paddle_speed(&self, tuning: &Tuning, ability: &AbilityState, now: Millis) -> f32 {
        if ability.is_active(now) {
            tuning.iron_ability_speed
        } else {
            tuning.paddle_speed
        }
    }

    fn ability_duration_ms(&self, tuning: &Tuning) -> Option<u64> {
        Some(tuning.iron_ability_ms)
    }

    fn shows_trajectory(&self, ability: &AbilityState, now: Millis) -> bool {
        ability.is_active(now)
    }

    fn on_held(&self, fx: &mut Effects, held: HeldKeys) {
        let paddle = &mut fx.me.paddle;
        if paddle.control.is_frozen(fx.now) {
            return;
        }
        let forward = paddle.side.away_sign() * fx.tuning.iron_nudge_speed;
        if held.role_held(paddle.side, KeyRole::Confirm) {
            paddle.x_offset += forward;
        }
        if held.role_held(paddle.side, KeyRole::Cancel) {
            paddle.x_offset -= forward;
        }
    }

    fn activate(&self, _fx: &mut Effects) {}

    fn draw_skin(&self, r: &mut dyn Renderer, rect: Rect, _side: Side) {
        r.draw_rect(rect, palette::RED, RectStyle::Fill, 0.0);
        // Arc reactor
        let outer = (rect.width() / 2.0 - 2.0).max(6.0);
        let inner = (outer * 0.55).max(3.0);
        r.fill_circle(rect.center(), outer, palette::YELLOW);
        r.fill_circle(rect.center(), inner, palette::BLUE);
        outline(r, rect);
    }
}
