use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::ability::{self, AbilityState, DoublePress, Effects};
use super::audio::{AudioSink, Music};
use super::characters::Character;
use super::components::{Arena, Ball, FakeBall, GamePhase, Hologram, Paddle};
use super::geometry::random_velocity;
use super::intent::{HeldKeys, InputEvent, KeyRole, LogicalKey};
use super::rally::RallyTracker;
use super::types::{Millis, Side};
use crate::config::tuning::Tuning;
use crate::storage::repo::RallySink;

/// Menu cursor for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RosterPick {
    pub index: usize,
    pub ready: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub side: Side,
    pub pick: RosterPick,
    /// Locked in at match start; `None` in the menu.
    pub character: Option<Character>,
    pub paddle: Paddle,
    pub ability: AbilityState,
    /// Loki illusion of this player's paddle, drawn on this player's side.
    pub hologram: Hologram,
}

impl Player {
    fn new(side: Side, arena: &Arena, tuning: &Tuning) -> Self {
        Self {
            side,
            pick: RosterPick::default(),
            character: None,
            paddle: Paddle::new(side, arena, tuning),
            ability: AbilityState::default(),
            hologram: Hologram::default(),
        }
    }

    pub fn ability_active(&self, now: Millis) -> bool {
        self.character.is_some() && self.ability.is_active(now)
    }
}

/// Whole-game state; the single owner of everything the tick mutates.
#[derive(Resource)]
pub struct MatchState {
    pub tuning: Tuning,
    pub arena: Arena,
    pub phase: GamePhase,
    pub players: [Player; 2],
    pub ball: Ball,
    pub fake_balls: Vec<FakeBall>,
    pub scores: [u32; 2],
    /// Side that serves the current rally.
    pub server: Side,
    pub serve_vel: Vec2,
    pub rally: RallyTracker,
    pub music: Music,
    presses: DoublePress,
    rng: StdRng,
}

impl MatchState {
    pub fn new(tuning: Tuning, rng: StdRng) -> Self {
        let arena = Arena::from_tuning(&tuning);
        let players = [
            Player::new(Side::Left, &arena, &tuning),
            Player::new(Side::Right, &arena, &tuning),
        ];
        Self {
            ball: Ball::new(arena.field_center(), tuning.ball_radius),
            arena,
            phase: GamePhase::Menu,
            players,
            fake_balls: Vec::new(),
            scores: [0; 2],
            server: Side::Left,
            serve_vel: Vec2::ZERO,
            rally: RallyTracker::default(),
            music: Music::default(),
            presses: DoublePress::default(),
            rng,
            tuning,
        }
    }

    pub fn seeded(tuning: Tuning, seed: u64) -> Self {
        Self::new(tuning, StdRng::seed_from_u64(seed))
    }

    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    pub fn player_mut(&mut self, side: Side) -> &mut Player {
        &mut self.players[side.index()]
    }

    pub fn score(&self, side: Side) -> u32 {
        self.scores[side.index()]
    }

    /// Hook context for `side` acting against its opponent.
    pub(crate) fn effects<'a>(
        &'a mut self,
        side: Side,
        now: Millis,
        audio: &'a mut dyn AudioSink,
    ) -> Effects<'a> {
        let [left, right] = &mut self.players;
        let (me, foe) = match side {
            Side::Left => (left, right),
            Side::Right => (right, left),
        };
        Effects {
            now,
            tuning: &self.tuning,
            arena: &self.arena,
            me,
            foe,
            ball: &mut self.ball,
            fake_balls: &mut self.fake_balls,
            rng: &mut self.rng,
            music: &mut self.music,
            audio,
        }
    }

    // ── Tick ────────────────────────────────────────────────────────

    /// Advance one fixed step: events in arrival order, then held-key and physics work.
    pub fn tick(
        &mut self,
        now: Millis,
        events: &[InputEvent],
        held: HeldKeys,
        audio: &mut dyn AudioSink,
        sink: &mut dyn RallySink,
    ) {
        for event in events {
            self.handle_event(*event, now, audio);
        }

        match self.phase {
            GamePhase::Menu => {}
            GamePhase::Win { until, .. } => {
                if now >= until {
                    self.return_to_menu();
                }
            }
            GamePhase::Serve | GamePhase::Play => {
                self.update_music(now, audio);
                self.update_paddles(now, held, audio);
                if self.phase == GamePhase::Play {
                    self.step_ball(now, audio, sink);
                }
            }
        }
    }

    pub fn handle_event(&mut self, event: InputEvent, now: Millis, audio: &mut dyn AudioSink) {
        match event {
            InputEvent::Resize { width, height } => self.resize(width, height),
            InputEvent::KeyDown(key) => self.handle_key(key, now, audio),
        }
    }

    fn handle_key(&mut self, key: LogicalKey, now: Millis, audio: &mut dyn AudioSink) {
        let double = self.presses.register(key, now, self.tuning.double_press_ms);

        match self.phase {
            GamePhase::Menu => self.handle_menu_key(key, now, audio),
            GamePhase::Serve => {
                if key.side == self.server && key.is_movement() {
                    self.serve(now);
                }
            }
            GamePhase::Play | GamePhase::Win { .. } => {}
        }

        let in_match = matches!(self.phase, GamePhase::Serve | GamePhase::Play);
        if in_match && double && key.role == KeyRole::Confirm {
            self.try_activate(key.side, now, audio);
        }
        if self.phase == GamePhase::Play && key.role == KeyRole::Cancel {
            if let Some(character) = self.player(key.side).character {
                let mut fx = self.effects(key.side, now, audio);
                character.behavior().on_passive_key(&mut fx);
            }
        }
    }

    /// Up/down cycle the roster; the right-pointing key readies, the left-pointing one unreadies.
    fn handle_menu_key(&mut self, key: LogicalKey, now: Millis, audio: &mut dyn AudioSink) {
        let roster_len = Character::ROSTER.len();
        let pick = &mut self.player_mut(key.side).pick;
        match key.role {
            KeyRole::Up => pick.index = (pick.index + roster_len - 1) % roster_len,
            KeyRole::Down => pick.index = (pick.index + 1) % roster_len,
            KeyRole::Confirm | KeyRole::Cancel => pick.ready = key.points_right(),
        }
        if self.players.iter().all(|p| p.pick.ready) {
            self.start_match(now, audio);
        }
    }

    // ── Transitions ─────────────────────────────────────────────────

    /// Lock in both picks and go to the first serve (left serves).
    pub fn start_match(&mut self, _now: Millis, audio: &mut dyn AudioSink) {
        for player in &mut self.players {
            player.character = Some(Character::from_index(player.pick.index));
            player.ability = AbilityState::default();
        }
        self.scores = [0; 2];
        self.reset_rally(Side::Left, audio);
        info!(
            "Match start: {} vs {}",
            self.players[0].character.map_or("?", Character::name),
            self.players[1].character.map_or("?", Character::name)
        );
    }

    /// Clear every per-rally effect and wait for `server` to serve. Safe to call repeatedly.
    pub fn reset_rally(&mut self, server: Side, audio: &mut dyn AudioSink) {
        self.ball = Ball::new(self.arena.field_center(), self.tuning.ball_radius);
        self.fake_balls.clear();
        for player in &mut self.players {
            player.paddle.x_offset = 0.0;
            player.paddle.vel_y = 0.0;
            player.paddle.control.clear();
            player.paddle.recenter(&self.arena);
            player.ability.reset_rally();
            player.hologram.clear();
        }
        self.music.stop(audio);

        self.server = server;
        let mut vel = random_velocity(
            &mut self.rng,
            self.tuning.serve_speed_min,
            self.tuning.serve_speed_max,
        );
        vel.x = vel.x.abs() * server.away_sign();
        self.serve_vel = vel;
        self.phase = GamePhase::Serve;
    }

    pub fn serve(&mut self, now: Millis) {
        self.ball.vel = self.serve_vel;
        self.phase = GamePhase::Play;
        self.rally.begin(now);
        info!("[Serve] {} serves rally {}", self.server.tag(), self.rally.index());
    }

    /// Double-press ability. False if there is no character or the meter is not full.
    pub fn try_activate(&mut self, side: Side, now: Millis, audio: &mut dyn AudioSink) -> bool {
        let mut fx = self.effects(side, now, audio);
        if !ability::activate(&mut fx) {
            return false;
        }
        self.rally.record_ability(side, now);
        debug!(
            "{} abilities this rally: {}",
            side.tag(),
            self.rally.ability_uses(side)
        );
        true
    }

    /// Ball left the field on `exited`; the other side takes the point.
    pub fn award_point(
        &mut self,
        exited: Side,
        now: Millis,
        audio: &mut dyn AudioSink,
        sink: &mut dyn RallySink,
    ) {
        let scorer = exited.opponent();
        self.scores[scorer.index()] += 1;
        let max = self.tuning.meter_max;
        self.player_mut(scorer).ability.gain(1, max);
        self.player_mut(exited).ability.gain(2, max);

        let exit_vel = self.ball.vel;
        let record = self
            .rally
            .finish(scorer, exit_vel, now, self.tuning.clutch_window_ms);
        if let Err(e) = sink.record(&record) {
            warn!("Failed to log rally {}: {e}", record.rally_index);
        }
        info!(
            "[Score] {} scores ({} : {})",
            scorer.tag(),
            self.scores[0],
            self.scores[1]
        );

        self.reset_rally(exited, audio);

        if self.score(scorer) >= self.tuning.points_to_win {
            self.phase = GamePhase::Win {
                winner: scorer,
                until: now.plus(self.tuning.win_announce_ms),
            };
            info!("[Win] {} wins the match", scorer.tag());
        }
    }

    /// Back to character select with nothing carried over.
    pub fn return_to_menu(&mut self) {
        for player in &mut self.players {
            player.pick.ready = false;
            player.character = None;
            player.ability = AbilityState::default();
        }
        self.scores = [0; 2];
        self.phase = GamePhase::Menu;
    }

    // ── Window ──────────────────────────────────────────────────────

    pub fn resize(&mut self, width: f32, height: f32) {
        self.arena.width = width.max(1.0);
        self.arena.height = height.max(self.arena.hud_height + 1.0);
        let arena = self.arena;
        for player in &mut self.players {
            player.paddle.place_base(&arena);
            player.paddle.clamp_vertical(&arena);
        }
        let r = self.ball.radius;
        let pos = &mut self.ball.pos;
        pos.x = pos.x.min(arena.width - r).max(r);
        pos.y = pos.y.min(arena.bottom() - r).max(arena.top() + r);
    }

    /// Swap in reloaded tuning. Window size is kept; geometry follows the new values.
    pub fn apply_tuning(&mut self, tuning: Tuning) {
        self.arena.hud_height = tuning.hud_height;
        self.arena.center_margin = tuning.center_margin;
        self.ball.radius = tuning.ball_radius;
        let arena = self.arena;
        for player in &mut self.players {
            let paddle = &mut player.paddle;
            paddle.size = Vec2::new(tuning.paddle_width, tuning.paddle_height);
            paddle.inset = tuning.paddle_inset;
            paddle.place_base(&arena);
            paddle.clamp_vertical(&arena);
        }
        self.tuning = tuning;
    }

    fn update_music(&mut self, now: Millis, audio: &mut dyn AudioSink) {
        if !self.music.is_on() {
            return;
        }
        let any_track = self.players.iter().any(|p| {
            p.ability_active(now)
                && p
                    .character
                    .is_some_and(|c| c.behavior().ability_track(&self.tuning).is_some())
        });
        if !any_track {
            self.music.stop(audio);
        }
    }
}
