use bevy::prelude::*;
use serde::{Serialize, Serializer};

use super::types::{Millis, Side};

/// One finished rally, as written to the match log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RallyRecord {
    pub rally_index: u32,
    pub paddle_hits: u32,
    /// Ball speed when it left the field, px per tick.
    #[serde(rename = "end_ball_speed_px_per_frame", serialize_with = "three_decimals")]
    pub end_speed: f32,
    #[serde(rename = "rally_duration_s", serialize_with = "three_decimals")]
    pub duration_s: f32,
    pub p1_ability_uses: u32,
    pub p2_ability_uses: u32,
    pub winner: &'static str,
    #[serde(rename = "p1_win_within_8s_after_ability")]
    pub p1_clutch: bool,
    #[serde(rename = "p2_win_within_8s_after_ability")]
    pub p2_clutch: bool,
}

fn three_decimals<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.3}"))
}

/// Per-rally counters between a serve and the next point.
#[derive(Debug, Clone, Default)]
pub struct RallyTracker {
    index: u32,
    started_at: Millis,
    paddle_hits: u32,
    ability_uses: [u32; 2],
    last_ability: [Option<Millis>; 2],
}

impl RallyTracker {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn paddle_hits(&self) -> u32 {
        self.paddle_hits
    }

    pub fn ability_uses(&self, side: Side) -> u32 {
        self.ability_uses[side.index()]
    }

    /// Start a new rally window at the serve.
    pub fn begin(&mut self, now: Millis) {
        self.index += 1;
        self.started_at = now;
        self.clear_counters();
    }

    pub fn record_hit(&mut self) {
        self.paddle_hits += 1;
    }

    pub fn record_ability(&mut self, side: Side, now: Millis) {
        self.ability_uses[side.index()] += 1;
        self.last_ability[side.index()] = Some(now);
    }

    /// Close the rally. `exit_vel` is the ball velocity before it was reset.
    pub fn finish(&mut self, winner: Side, exit_vel: Vec2, now: Millis, clutch_window_ms: u64) -> RallyRecord {
        let clutch = |side: Side| {
            winner == side
                && self.last_ability[side.index()].is_some_and(|at| now.since(at) <= clutch_window_ms)
        };
        let record = RallyRecord {
            rally_index: self.index,
            paddle_hits: self.paddle_hits,
            end_speed: exit_vel.length(),
            duration_s: now.since(self.started_at) as f32 / 1000.0,
            p1_ability_uses: self.ability_uses[0],
            p2_ability_uses: self.ability_uses[1],
            winner: winner.tag(),
            p1_clutch: clutch(Side::Left),
            p2_clutch: clutch(Side::Right),
        };
        self.clear_counters();
        record
    }

    fn clear_counters(&mut self) {
        self.paddle_hits = 0;
        self.ability_uses = [0; 2];
        self.last_ability = [None; 2];
    }
}
