use bevy::prelude::*;

use super::{CharacterBehavior, outline};
use crate::game::ability::Effects;
use crate::game::types::{ControlEffect, Side};
use crate::render::{Font, RectStyle, Renderer, TextAlign, palette};

/// Passive: one force-field freeze per rally. Ability: next hit turns the ball invisible.
pub struct InvisibleWoman;

impl CharacterBehavior for InvisibleWoman {
    fn name(&self) -> &'static str {
        "Invisible Woman"
    }

    fn passive_text(&self) -> &'static str {
        "Force Field: press A or > to briefly pin the enemy paddle and the ball. \
         Once per rally."
    }

    fn ability_text(&self) -> &'static str {
        "Disappear: double-press D or < and your next hit makes the ball invisible \
         until it crosses the center line."
    }

    fn on_passive_key(&self, fx: &mut Effects) {
        if fx.me.ability.passive_used {
            return;
        }
        let freeze = ControlEffect::Freeze {
            until: fx.now.plus(fx.tuning.invis_freeze_ms),
        };
        fx.foe.paddle.control.apply(freeze);
        fx.ball.control.apply(freeze);
        fx.me.ability.passive_used = true;
        info!("[Passive] {} force field", fx.me.side.tag());
    }

    fn activate(&self, fx: &mut Effects) {
        fx.me.ability.hide_pending = true;
    }

    fn on_paddle_hit(&self, fx: &mut Effects) {
        if fx.me.ability.hide_pending {
            fx.me.ability.hide_pending = false;
            fx.ball.hide();
        }
    }

    fn draw_skin(&self, r: &mut dyn Renderer, rect: Rect, _side: Side) {
        r.draw_rect(rect, palette::LIGHT_BLUE, RectStyle::Fill, 0.0);
        let size = (rect.height() * 0.4).floor().max(12.0);
        r.draw_text("4", Font::bold(size), palette::WHITE, rect, TextAlign::Center);
        outline(r, rect);
    }
}
