use bevy::prelude::*;

use super::audio::AudioSink;
use super::geometry::clamp_speed;
use super::match_state::MatchState;
use super::types::{Millis, Side};

/// Strict AABB overlap; touching edges do not count.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && b.min.x < a.max.x && a.min.y < b.max.y && b.min.y < a.max.y
}

impl MatchState {
    /// Bounce the ball off `side`'s paddle when they overlap and the ball is
    /// heading into it. Returns whether a hit happened.
    pub fn resolve_paddle_hit(&mut self, side: Side, now: Millis, audio: &mut dyn AudioSink) -> bool {
        let away = side.away_sign();
        let paddle = &self.players[side.index()].paddle;
        if !rects_overlap(paddle.rect(), self.ball.rect()) || self.ball.vel.x * away >= 0.0 {
            return false;
        }

        // Snap just outside the face so the ball cannot tunnel back in.
        self.ball.pos.x = paddle.face_x() + away * self.ball.radius;

        let half = paddle.size.y / 2.0;
        let offset = if half > 0.0 {
            ((self.ball.pos.y - paddle.center_y()) / half).min(1.0).max(-1.0)
        } else {
            0.0
        };
        let angle = offset * self.tuning.max_deflect_rad();
        let speed = self.ball.vel.length().max(self.tuning.min_speed);

        let player = self.player(side);
        let force = player
            .character
            .map_or(1.0, |c| c.behavior().hit_force(&self.tuning, &player.ability, now));
        let vel = Vec2::new(away * angle.cos(), angle.sin()) * speed * self.tuning.speedup_per_hit * force;
        self.ball.vel = clamp_speed(vel, self.tuning.max_speed);

        let meter_max = self.tuning.meter_max;
        let hitter = self.player_mut(side);
        hitter.ability.gain(1, meter_max);
        hitter.hologram.active = false;
        self.rally.record_hit();

        if let Some(character) = self.player(side).character {
            let mut fx = self.effects(side, now, audio);
            character.behavior().on_paddle_hit(&mut fx);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::audio::NullAudio;
    use crate::game::characters::Character;
    use crate::game::components::GamePhase;
    use crate::game::match_state::testing::started;
    use crate::game::types::Meter;

    /// Ball touching the left paddle face at `dy` from its center, moving left.
    fn ball_on_left_face(state: &mut MatchState, dy: f32, vel: Vec2) {
        let paddle = &state.player(Side::Left).paddle;
        let pos = Vec2::new(paddle.face_x() + 5.0, paddle.center_y() + dy);
        state.ball.pos = pos;
        state.ball.vel = vel;
        state.phase = GamePhase::Play;
    }

    #[test]
    fn test_center_hit_goes_straight_and_faster() {
        let mut state = started(Character::IronMan, Character::IronMan);
        ball_on_left_face(&mut state, 0.0, Vec2::new(-3.0, 4.0));
        assert!(state.resolve_paddle_hit(Side::Left, Millis(10), &mut NullAudio));
        assert_eq!(state.ball.pos.x, 80.0);
        assert!((state.ball.vel.x - 6.0).abs() < 1e-4);
        assert!(state.ball.vel.y.abs() < 1e-4);
        assert_eq!(state.player(Side::Left).ability.meter, Meter(1));
        assert_eq!(state.rally.paddle_hits(), 1);
    }

    #[test]
    fn test_edge_hit_deflects_at_max_angle() {
        let mut state = started(Character::IronMan, Character::IronMan);
        ball_on_left_face(&mut state, -65.0, Vec2::new(-2.0, 0.0));
        assert!(state.resolve_paddle_hit(Side::Left, Millis(10), &mut NullAudio));
        let v = state.ball.vel;
        let angle = v.y.atan2(v.x).to_degrees();
        assert!((angle + 60.0).abs() < 1e-3, "angle was {angle}");
    }

    #[test]
    fn test_ball_moving_away_is_ignored() {
        let mut state = started(Character::IronMan, Character::IronMan);
        ball_on_left_face(&mut state, 0.0, Vec2::new(3.0, 0.0));
        assert!(!state.resolve_paddle_hit(Side::Left, Millis(10), &mut NullAudio));
        assert_eq!(state.ball.vel, Vec2::new(3.0, 0.0));
        assert_eq!(state.player(Side::Left).ability.meter, Meter(0));
    }

    #[test]
    fn test_slow_ball_gets_min_speed() {
        let mut state = started(Character::IronMan, Character::IronMan);
        ball_on_left_face(&mut state, 0.0, Vec2::new(-0.5, 0.0));
        state.resolve_paddle_hit(Side::Left, Millis(10), &mut NullAudio);
        assert!((state.ball.vel.length() - 2.4).abs() < 1e-4);
    }

    #[test]
    fn test_speed_capped_at_max() {
        let mut state = started(Character::IronMan, Character::IronMan);
        ball_on_left_face(&mut state, 20.0, Vec2::new(-48.0, 0.0));
        state.resolve_paddle_hit(Side::Left, Millis(10), &mut NullAudio);
        assert!((state.ball.vel.length() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_quicksilver_ability_adds_hit_force() {
        let mut state = started(Character::QuickSilver, Character::IronMan);
        state.player_mut(Side::Left).ability.active_until = Millis(5000);
        ball_on_left_face(&mut state, 0.0, Vec2::new(-4.0, 0.0));
        state.resolve_paddle_hit(Side::Left, Millis(10), &mut NullAudio);
        assert!((state.ball.vel.length() - 4.0 * 1.2 * 1.35).abs() < 1e-3);
    }

    #[test]
    fn test_right_paddle_sends_ball_left() {
        let mut state = started(Character::IronMan, Character::IronMan);
        let paddle = &state.player(Side::Right).paddle;
        let pos = Vec2::new(paddle.face_x() - 5.0, paddle.center_y());
        state.ball.pos = pos;
        state.ball.vel = Vec2::new(5.0, 0.0);
        assert!(state.resolve_paddle_hit(Side::Right, Millis(10), &mut NullAudio));
        assert_eq!(state.ball.pos.x, 1120.0);
        assert!(state.ball.vel.x < 0.0);
        assert_eq!(state.player(Side::Right).ability.meter, Meter(1));
    }

    #[test]
    fn test_loki_hit_raises_enemy_hologram_and_clears_own() {
        let mut state = started(Character::Loki, Character::Loki);
        state.player_mut(Side::Left).hologram.active = true;
        ball_on_left_face(&mut state, 0.0, Vec2::new(-3.0, 0.0));
        state.resolve_paddle_hit(Side::Left, Millis(10), &mut NullAudio);
        assert!(!state.player(Side::Left).hologram.active);
        let holo = state.player(Side::Right).hologram;
        assert!(holo.active);
        assert_ne!(holo.sign, 0);
    }

    #[test]
    fn test_any_hit_clears_hitters_hologram() {
        let mut state = started(Character::IronMan, Character::Loki);
        state.player_mut(Side::Left).hologram.active = true;
        ball_on_left_face(&mut state, 0.0, Vec2::new(-3.0, 0.0));
        state.resolve_paddle_hit(Side::Left, Millis(10), &mut NullAudio);
        assert!(!state.player(Side::Left).hologram.active);
        assert!(!state.player(Side::Right).hologram.active);
    }

    #[test]
    fn test_loki_split_spawns_two_decoys() {
        let mut state = started(Character::Loki, Character::IronMan);
        state.player_mut(Side::Left).ability.split_pending = true;
        ball_on_left_face(&mut state, 10.0, Vec2::new(-4.0, 1.0));
        state.resolve_paddle_hit(Side::Left, Millis(10), &mut NullAudio);

        assert!(!state.player(Side::Left).ability.split_pending);
        assert_eq!(state.fake_balls.len(), 2);
        let speed = state.ball.vel.length();
        assert!(state.ball.vel.x > 0.0);
        let angles: Vec<f32> = state
            .fake_balls
            .iter()
            .map(|fb| {
                assert_eq!(fb.pos, state.ball.pos);
                assert!(fb.vel.x > 0.0);
                assert!((fb.vel.length() - speed).abs() < 1e-3);
                fb.vel.y.atan2(fb.vel.x).to_degrees()
            })
            .collect();
        for a in &angles {
            assert!((12.0 - 1e-3..=40.0 + 1e-3).contains(&a.abs()), "angle {a}");
        }
        assert!((angles[0] - angles[1]).abs() >= 10.0 - 1e-3);
    }

    #[test]
    fn test_invisible_woman_hides_on_next_hit() {
        let mut state = started(Character::InvisibleWoman, Character::IronMan);
        state.player_mut(Side::Left).ability.hide_pending = true;
        ball_on_left_face(&mut state, 0.0, Vec2::new(-3.0, 0.0));
        state.resolve_paddle_hit(Side::Left, Millis(10), &mut NullAudio);
        assert!(!state.ball.is_visible());
        assert_eq!(state.ball.hidden_from, Some(80.0));
        assert!(!state.player(Side::Left).ability.hide_pending);
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!rects_overlap(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
        assert!(rects_overlap(a, Rect::new(9.5, 9.5, 20.0, 20.0)));
    }
}
