use std::collections::HashMap;

use bevy::prelude::*;
use rand::rngs::StdRng;

use super::audio::{AudioSink, Music};
use super::components::{Arena, Ball, FakeBall};
use super::intent::LogicalKey;
use super::match_state::Player;
use super::types::{Meter, Millis};
use crate::config::tuning::Tuning;

/// Per-player ability bookkeeping. Meters persist across rallies; the rest is per rally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbilityState {
    pub meter: Meter,
    pub active_until: Millis,
    /// Invisible Woman passive: one use per rally.
    pub passive_used: bool,
    /// Loki: split the ball on the next own hit.
    pub split_pending: bool,
    /// Invisible Woman: hide the ball on the next own hit.
    pub hide_pending: bool,
    /// Activations this match.
    pub uses: u32,
}

impl AbilityState {
    pub fn gain(&mut self, amount: u8, max: u8) {
        self.meter = self.meter.add_clamped(amount, max);
    }

    /// Empty a full meter and count the activation. False if the meter is not full.
    pub fn try_spend(&mut self, max: u8) -> bool {
        if !self.meter.is_full(max) {
            return false;
        }
        self.meter = Meter(0);
        self.uses += 1;
        true
    }

    pub fn is_active(&self, now: Millis) -> bool {
        self.active_until.is_pending(now)
    }

    pub fn reset_rally(&mut self) {
        self.active_until = Millis::ZERO;
        self.passive_used = false;
        self.split_pending = false;
        self.hide_pending = false;
    }
}

/// Same logical key pressed again within the window counts as a double press.
#[derive(Debug, Clone, Default)]
pub struct DoublePress {
    last_seen: HashMap<LogicalKey, Millis>,
}

impl DoublePress {
    /// Record a key-down and report whether it completes a double press.
    pub fn register(&mut self, key: LogicalKey, now: Millis, window_ms: u64) -> bool {
        let previous = self.last_seen.insert(key, now);
        previous.is_some_and(|last| now >= last && now.since(last) <= window_ms)
    }
}

/// Everything a character hook may touch during one event or tick.
pub struct Effects<'a> {
    pub now: Millis,
    pub tuning: &'a Tuning,
    pub arena: &'a Arena,
    pub me: &'a mut Player,
    pub foe: &'a mut Player,
    pub ball: &'a mut Ball,
    pub fake_balls: &'a mut Vec<FakeBall>,
    pub rng: &'a mut StdRng,
    pub music: &'a mut Music,
    pub audio: &'a mut dyn AudioSink,
}

/// Spend the meter and apply the character's ability. False if nothing happened.
pub fn activate(fx: &mut Effects) -> bool {
    let Some(character) = fx.me.character else {
        return false;
    };
    if !fx.me.ability.try_spend(fx.tuning.meter_max) {
        return false;
    }
    let behavior = character.behavior();
    if let Some(ms) = behavior.ability_duration_ms(fx.tuning) {
        fx.me.ability.active_until = fx.now.plus(ms);
    }
    behavior.activate(fx);
    info!(
        "[Ability] {} {} activated (use #{})",
        fx.me.side.tag(),
        behavior.name(),
        fx.me.ability.uses
    );
    true
}
