use super::audio::AudioSink;
use super::geometry::reflect_vertical;
use super::intent::HeldKeys;
use super::match_state::MatchState;
use super::types::{Millis, Side};
use crate::storage::repo::RallySink;

impl MatchState {
    /// Held-key passives, horizontal band clamps, then vertical movement.
    pub(crate) fn update_paddles(&mut self, now: Millis, held: HeldKeys, audio: &mut dyn AudioSink) {
        for side in Side::BOTH {
            if let Some(character) = self.player(side).character {
                let mut fx = self.effects(side, now, audio);
                character.behavior().on_held(&mut fx, held);
            }
        }

        let arena = self.arena;
        for player in &mut self.players {
            let speed = match player.character {
                Some(c) => c.behavior().paddle_speed(&self.tuning, &player.ability, now),
                None => self.tuning.paddle_speed,
            };
            let paddle = &mut player.paddle;
            paddle.clamp_horizontal(&arena);
            paddle.vel_y = held.vertical_dir(player.side) * speed * paddle.control.speed_factor(now);
            paddle.y += paddle.vel_y;
            paddle.clamp_vertical(&arena);
        }
    }

    /// One Play step for the real ball and the decoys, ending in a point if the ball left.
    pub(crate) fn step_ball(&mut self, now: Millis, audio: &mut dyn AudioSink, sink: &mut dyn RallySink) {
        let (top, bottom) = (self.arena.top(), self.arena.bottom());
        let damping = self.tuning.wall_damping;
        let ball = &mut self.ball;
        (ball.pos, ball.vel) = reflect_vertical(ball.pos, ball.vel, ball.radius, top, bottom, damping);

        for side in Side::BOTH {
            self.resolve_paddle_hit(side, now, audio);
        }

        let factor = self.ball.control.speed_factor(now);
        self.ball.pos += self.ball.vel * factor;
        self.ball.update_visibility(self.arena.mid_x());

        self.step_fake_balls(now);

        if let Some(exited) = self.ball.exited(&self.arena) {
            self.award_point(exited, now, audio, sink);
        }
    }

    /// Decoys bounce and share the ball's slow, but ignore freezes and paddles.
    fn step_fake_balls(&mut self, now: Millis) {
        let control = self.ball.control;
        let factor = if control.is_slowed(now) { control.slow_ratio } else { 1.0 };
        let radius = self.ball.radius;
        let (top, bottom) = (self.arena.top(), self.arena.bottom());
        let damping = self.tuning.wall_damping;

        for fb in &mut self.fake_balls {
            (fb.pos, fb.vel) = reflect_vertical(fb.pos, fb.vel, radius, top, bottom, damping);
            fb.pos += fb.vel * factor;
        }
        let arena = self.arena;
        self.fake_balls.retain(|fb| !fb.is_out(&arena, radius));
    }
}

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::*;
    use crate::game::audio::NullAudio;
    use crate::game::audio::testing::RecordingAudio;
    use crate::game::characters::Character;
    use crate::game::components::{FakeBall, GamePhase};
    use crate::game::intent::{InputEvent, KeyRole, LogicalKey};
    use crate::game::match_state::testing::{key, started};
    use crate::game::types::{ControlEffect, Meter};
    use crate::storage::repo::MemoryRallySink;

    fn held(keys: &[(Side, KeyRole)]) -> HeldKeys {
        keys.iter()
            .fold(HeldKeys::default(), |h, &(side, role)| h.with(LogicalKey::new(side, role)))
    }

    fn tick_held(state: &mut MatchState, now: u64, events: &[InputEvent], keys: HeldKeys) {
        state.tick(Millis(now), events, keys, &mut NullAudio, &mut MemoryRallySink::default());
    }

    /// Serve and park the ball mid-field so nothing scores during the test.
    fn in_play(left: Character, right: Character) -> MatchState {
        let mut state = started(left, right);
        tick_held(&mut state, 1, &[key(Side::Left, KeyRole::Up)], HeldKeys::default());
        state.ball.pos = state.arena.field_center();
        state.ball.vel = Vec2::ZERO;
        state
    }

    #[test]
    fn test_paddle_moves_and_clamps() {
        let mut state = in_play(Character::IronMan, Character::Loki);
        let y0 = state.player(Side::Right).paddle.y;
        tick_held(&mut state, 10, &[], held(&[(Side::Right, KeyRole::Down)]));
        assert_eq!(state.player(Side::Right).paddle.y, y0 + 4.0);

        for t in 0..200 {
            tick_held(&mut state, 20 + t, &[], held(&[(Side::Right, KeyRole::Up)]));
        }
        assert_eq!(state.player(Side::Right).paddle.y, 80.0);
    }

    #[test]
    fn test_quicksilver_passive_is_faster() {
        let mut state = in_play(Character::QuickSilver, Character::IronMan);
        let y0 = state.player(Side::Left).paddle.y;
        tick_held(&mut state, 10, &[], held(&[(Side::Left, KeyRole::Down)]));
        assert_eq!(state.player(Side::Left).paddle.y, y0 + 7.5);
    }

    #[test]
    fn test_iron_man_nudge_and_ability_speed() {
        let mut state = in_play(Character::IronMan, Character::IronMan);
        tick_held(&mut state, 10, &[], held(&[(Side::Left, KeyRole::Confirm)]));
        assert_eq!(state.player(Side::Left).paddle.x_offset, 3.0);
        tick_held(&mut state, 20, &[], held(&[(Side::Right, KeyRole::Confirm)]));
        assert_eq!(state.player(Side::Right).paddle.x_offset, -3.0);
        tick_held(&mut state, 30, &[], held(&[(Side::Left, KeyRole::Cancel)]));
        assert_eq!(state.player(Side::Left).paddle.x_offset, 0.0);

        state.player_mut(Side::Left).ability.active_until = Millis(9000);
        let y0 = state.player(Side::Left).paddle.y;
        tick_held(&mut state, 40, &[], held(&[(Side::Left, KeyRole::Down)]));
        assert_eq!(state.player(Side::Left).paddle.y, y0 + 5.5);
    }

    #[test]
    fn test_iron_man_nudge_stops_at_band_edge() {
        let mut state = in_play(Character::IronMan, Character::IronMan);
        for t in 0..300 {
            tick_held(&mut state, 10 + t, &[], held(&[(Side::Left, KeyRole::Confirm)]));
        }
        assert_eq!(state.player(Side::Left).paddle.x(), 230.0);
        tick_held(&mut state, 400, &[], held(&[(Side::Left, KeyRole::Cancel)]));
        assert_eq!(state.player(Side::Left).paddle.x(), 227.0);
    }

    #[test]
    fn test_invisible_woman_passive_freezes_once_per_rally() {
        let mut state = in_play(Character::InvisibleWoman, Character::IronMan);
        state.ball.vel = Vec2::new(3.0, 0.0);
        let cancel = key(Side::Left, KeyRole::Cancel);
        tick_held(&mut state, 100, &[cancel], held(&[(Side::Right, KeyRole::Down)]));

        let right = &state.player(Side::Right).paddle;
        assert_eq!(right.control.frozen_until, Millis(850));
        assert_eq!(right.vel_y, 0.0);
        assert_eq!(state.ball.pos, state.arena.field_center(), "ball frozen too");
        assert!(state.player(Side::Left).ability.passive_used);

        state.player_mut(Side::Right).paddle.control.clear();
        tick_held(&mut state, 2000, &[cancel], HeldKeys::default());
        assert!(!state.player(Side::Right).paddle.control.is_frozen(Millis(2000)));

        tick_held(&mut state, 2100, &[], held(&[(Side::Right, KeyRole::Down)]));
        assert_eq!(state.player(Side::Right).paddle.vel_y, 4.0);
    }

    #[test]
    fn test_passive_key_ignored_during_serve() {
        let mut state = started(Character::InvisibleWoman, Character::IronMan);
        tick_held(&mut state, 10, &[key(Side::Left, KeyRole::Cancel)], HeldKeys::default());
        assert!(!state.player(Side::Left).ability.passive_used);
    }

    #[test]
    fn test_quicksilver_ability_freezes_then_slows() {
        let mut state = in_play(Character::IronMan, Character::QuickSilver);
        state.player_mut(Side::Right).ability.meter = Meter(8);
        state.ball.vel = Vec2::new(4.0, 0.0);
        let confirm = key(Side::Right, KeyRole::Confirm);
        let mut audio = RecordingAudio::default();
        let mut sink = MemoryRallySink::default();
        state.tick(Millis(1000), &[confirm], HeldKeys::default(), &mut audio, &mut sink);
        state.tick(Millis(1100), &[confirm], HeldKeys::default(), &mut audio, &mut sink);
        assert!(state.player(Side::Right).ability_active(Millis(1100)));
        assert_eq!(audio.played.len(), 1);
        assert!(state.music.is_on());

        let x0 = state.ball.pos.x;
        state.tick(Millis(3099), &[], held(&[(Side::Left, KeyRole::Down)]), &mut audio, &mut sink);
        assert_eq!(state.ball.pos.x, x0, "frozen for 2s");
        assert_eq!(state.player(Side::Left).paddle.vel_y, 0.0);

        state.tick(Millis(3100), &[], held(&[(Side::Left, KeyRole::Down)]), &mut audio, &mut sink);
        assert_eq!(state.ball.pos.x, x0 + 2.0);
        assert_eq!(state.player(Side::Left).paddle.vel_y, 2.0);

        // Quicksilver's own paddle is never slowed.
        state.tick(Millis(3200), &[], held(&[(Side::Right, KeyRole::Down)]), &mut audio, &mut sink);
        assert_eq!(state.player(Side::Right).paddle.vel_y, 7.5);

        // Music stops once the ability runs out.
        state.tick(Millis(19100), &[], HeldKeys::default(), &mut audio, &mut sink);
        assert!(!state.music.is_on());
        assert_eq!(audio.stops, 1);
    }

    #[test]
    fn test_music_stops_on_point() {
        let mut state = in_play(Character::QuickSilver, Character::IronMan);
        let mut audio = RecordingAudio::default();
        state.player_mut(Side::Left).ability.meter = Meter(8);
        assert!(state.try_activate(Side::Left, Millis(10), &mut audio));
        state.ball.pos = Vec2::new(-30.0, 300.0);
        state.ball.vel = Vec2::new(-3.0, 0.0);
        state.ball.control.clear();
        state.tick(Millis(20), &[], HeldKeys::default(), &mut audio, &mut MemoryRallySink::default());
        assert_eq!(state.phase, GamePhase::Serve);
        assert!(!state.music.is_on());
        assert_eq!(audio.stops, 1);
        assert_eq!(state.ball.control, Default::default());
    }

    #[test]
    fn test_ball_bounces_off_walls_in_play() {
        let mut state = in_play(Character::IronMan, Character::IronMan);
        state.ball.pos = Vec2::new(600.0, 89.0);
        state.ball.vel = Vec2::new(1.0, -5.0);
        tick_held(&mut state, 10, &[], HeldKeys::default());
        assert!((state.ball.vel.y - 4.0).abs() < 1e-5);
        assert_eq!(state.ball.pos, Vec2::new(601.0, 94.0));
    }

    #[test]
    fn test_invisible_ball_reappears_past_midline() {
        let mut state = in_play(Character::IronMan, Character::IronMan);
        state.ball.pos = Vec2::new(598.0, 300.0);
        state.ball.hide();
        state.ball.vel = Vec2::new(1.5, 0.0);
        tick_held(&mut state, 10, &[], HeldKeys::default());
        assert!(!state.ball.is_visible());
        tick_held(&mut state, 20, &[], HeldKeys::default());
        assert!(state.ball.is_visible());
    }

    #[test]
    fn test_fake_balls_move_slow_and_leave() {
        let mut state = in_play(Character::Loki, Character::IronMan);
        state.fake_balls.push(FakeBall {
            pos: Vec2::new(1215.0, 300.0),
            vel: Vec2::new(10.0, 0.0),
        });
        state.fake_balls.push(FakeBall {
            pos: Vec2::new(600.0, 300.0),
            vel: Vec2::new(4.0, 2.0),
        });
        state.ball.control.apply(ControlEffect::Freeze { until: Millis(5000) });
        state.ball.control.apply(ControlEffect::Slow { until: Millis(5000), ratio: 0.5 });
        tick_held(&mut state, 10, &[], HeldKeys::default());

        assert_eq!(state.fake_balls.len(), 1, "first decoy left the field");
        assert_eq!(state.fake_balls[0].pos, Vec2::new(602.0, 301.0));
        assert_eq!(state.scores, [0, 0], "decoys never score");
    }
}
