//! Playable characters. Each one owns its passive, its ability and its paddle skin.

pub mod invisible_woman;
pub mod iron_man;
pub mod loki;
pub mod quicksilver;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::ability::{AbilityState, Effects};
use super::intent::HeldKeys;
use super::types::{Millis, Side};
use crate::config::tuning::Tuning;
use crate::render::{RectStyle, Renderer, palette};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Character {
    IronMan,
    Loki,
    InvisibleWoman,
    QuickSilver,
}

impl Character {
    /// Menu order.
    pub const ROSTER: [Character; 4] = [
        Character::IronMan,
        Character::Loki,
        Character::InvisibleWoman,
        Character::QuickSilver,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::ROSTER[index % Self::ROSTER.len()]
    }

    pub fn behavior(self) -> &'static dyn CharacterBehavior {
        match self {
            Self::IronMan => &iron_man::IronMan,
            Self::Loki => &loki::Loki,
            Self::InvisibleWoman => &invisible_woman::InvisibleWoman,
            Self::QuickSilver => &quicksilver::QuickSilver,
        }
    }

    pub fn name(self) -> &'static str {
        self.behavior().name()
    }

    /// Two paragraphs for the menu: passive, then ability.
    pub fn description(self) -> String {
        let b = self.behavior();
        format!("(Passive) {}\n\n(Ability) {}", b.passive_text(), b.ability_text())
    }
}

/// Hooks the match calls into. Defaults describe a character with no effect.
pub trait CharacterBehavior: Sync {
    fn name(&self) -> &'static str;
    fn passive_text(&self) -> &'static str;
    fn ability_text(&self) -> &'static str;

    /// Vertical paddle speed (px/tick) before opponent slows.
    fn paddle_speed(&self, tuning: &Tuning, _ability: &AbilityState, _now: Millis) -> f32 {
        tuning.paddle_speed
    }

    /// `None` for one-shot abilities that arm a flag instead of running on a timer.
    fn ability_duration_ms(&self, _tuning: &Tuning) -> Option<u64> {
        None
    }

    /// Extra multiplier on outgoing ball speed when this character hits.
    fn hit_force(&self, _tuning: &Tuning, _ability: &AbilityState, _now: Millis) -> f32 {
        1.0
    }

    fn shows_trajectory(&self, _ability: &AbilityState, _now: Millis) -> bool {
        false
    }

    /// Track looped while the ability runs.
    fn ability_track<'t>(&self, _tuning: &'t Tuning) -> Option<(&'t str, f32)> {
        None
    }

    /// Every tick in Serve and Play.
    fn on_held(&self, _fx: &mut Effects, _held: HeldKeys) {}

    /// Cancel key pressed during Play.
    fn on_passive_key(&self, _fx: &mut Effects) {}

    /// Meter already spent and timer set when this runs.
    fn activate(&self, fx: &mut Effects);

    /// After the shared bounce math, ball already redirected.
    fn on_paddle_hit(&self, _fx: &mut Effects) {}

    fn draw_skin(&self, r: &mut dyn Renderer, rect: Rect, side: Side);
}

/// Paddle with the character's skin, or the plain side color before a pick.
pub fn draw_paddle(r: &mut dyn Renderer, rect: Rect, character: Option<Character>, side: Side) {
    match character {
        Some(c) => c.behavior().draw_skin(r, rect, side),
        None => {
            let base = match side {
                Side::Left => palette::RED,
                Side::Right => palette::GREEN,
            };
            r.draw_rect(rect, base, RectStyle::Fill, 0.0);
        }
    }
}

pub(crate) fn outline(r: &mut dyn Renderer, rect: Rect) {
    r.draw_rect(rect, palette::WHITE, RectStyle::Border(1.0), 0.0);
}
