//! Everything on screen for one frame, drawn from a read-only match snapshot.

use bevy::prelude::*;

use super::{Dash, Font, RectStyle, Renderer, TextAlign, palette};
use crate::game::characters::{Character, draw_paddle};
use crate::game::components::GamePhase;
use crate::game::geometry::predict_trajectory;
use crate::game::match_state::{MatchState, Player};
use crate::game::types::{Millis, Side};

// ── Layout ──────────────────────────────────────────────────────────

const HUD_PAD_X: f32 = 20.0;
const SEG_W: f32 = 16.0;
const SEG_H: f32 = 18.0;
const SEG_GAP: f32 = 4.0;
const SEG_RADIUS: f32 = 3.0;

const PANEL_TOP: f32 = 120.0;
const PANEL_SIDE: f32 = 30.0;
const PANEL_RADIUS: f32 = 16.0;
const LIST_MARGIN: f32 = 18.0;
const LIST_GAP: f32 = 18.0;
const LIST_WIDTH_RATIO: f32 = 0.45;
const LIST_ROW: f32 = 36.0;

pub fn draw_frame(state: &MatchState, now: Millis, r: &mut dyn Renderer) {
    if state.phase == GamePhase::Menu {
        draw_menu(state, r);
        return;
    }

    r.clear(palette::BLACK);
    draw_hud(state, r);

    if let GamePhase::Win { winner, .. } = state.phase {
        draw_win(state, winner, r);
        return;
    }

    let playing = state.phase == GamePhase::Play;
    if playing {
        draw_trajectories(state, now, r);
    }
    if state.ball.is_visible() {
        r.fill_circle(state.ball.pos, state.ball.radius, palette::BLUE);
    }
    for player in &state.players {
        draw_paddle(r, player.paddle.rect(), player.character, player.side);
    }
    if playing {
        draw_holograms(state, r);
        for fb in &state.fake_balls {
            r.fill_circle(fb.pos, state.ball.radius, palette::BLUE);
        }
    }
}

// ── HUD ─────────────────────────────────────────────────────────────

fn meter_width(max: u8) -> f32 {
    f32::from(max) * (SEG_W + SEG_GAP) - SEG_GAP
}

fn draw_meter(r: &mut dyn Renderer, x: f32, y: f32, value: u8, max: u8) {
    for i in 0..max {
        let x0 = x + f32::from(i) * (SEG_W + SEG_GAP);
        let seg = Rect::new(x0, y, x0 + SEG_W, y + SEG_H);
        if i < value {
            r.draw_rect(seg, palette::YELLOW, RectStyle::Fill, SEG_RADIUS);
        } else {
            r.draw_rect(seg, palette::METER_EMPTY, RectStyle::Fill, SEG_RADIUS);
            r.draw_rect(seg, palette::METER_BORDER, RectStyle::Border(1.0), SEG_RADIUS);
        }
    }
}

fn draw_hud(state: &MatchState, r: &mut dyn Renderer) {
    let width = state.arena.width;
    let hud = state.arena.hud_height;
    r.draw_rect(Rect::new(0.0, 0.0, width, hud), palette::HUD_BG, RectStyle::Fill, 0.0);
    r.draw_line(
        Vec2::new(0.0, hud - 1.0),
        Vec2::new(width, hud - 1.0),
        palette::HUD_BORDER,
        2.0,
    );

    let name_of = |p: &Player| p.character.map_or(p.side.tag(), Character::name);
    let left = state.player(Side::Left);
    let right = state.player(Side::Right);
    let name_row = |x0: f32, x1: f32| Rect::new(x0, 12.0, x1, 40.0);
    r.draw_text(
        name_of(left),
        Font::NAME,
        palette::WHITE,
        name_row(HUD_PAD_X, width / 2.0),
        TextAlign::Left,
    );
    r.draw_text(
        name_of(right),
        Font::NAME,
        palette::WHITE,
        name_row(width / 2.0, width - HUD_PAD_X),
        TextAlign::Right,
    );

    let max = state.tuning.meter_max;
    draw_meter(r, HUD_PAD_X, 44.0, left.ability.meter.0, max);
    draw_meter(r, width - HUD_PAD_X - meter_width(max), 44.0, right.ability.meter.0, max);

    let score = format!("{}  :  {}", state.score(Side::Left), state.score(Side::Right));
    r.draw_text(
        &score,
        Font::SCORE,
        palette::WHITE,
        Rect::new(0.0, 10.0, width, 40.0),
        TextAlign::Center,
    );

    if state.phase == GamePhase::Serve {
        let hint = match state.server {
            Side::Left => "Player 1 serve: W/S",
            Side::Right => "Player 2 serve: Up/Down",
        };
        r.draw_text(
            hint,
            Font::SMALL,
            palette::WHITE,
            Rect::new(0.0, 44.0, width, 68.0),
            TextAlign::Center,
        );
    }
}

fn draw_win(state: &MatchState, winner: Side, r: &mut dyn Renderer) {
    let text = match winner {
        Side::Left => "Player 1 Wins!",
        Side::Right => "Player 2 Wins!",
    };
    let c = Vec2::new(state.arena.width / 2.0, state.arena.height / 2.0);
    r.draw_text(
        text,
        Font::WIN,
        palette::WHITE,
        Rect::from_center_half_size(c, Vec2::new(state.arena.width / 2.0, 60.0)),
        TextAlign::Center,
    );
}

// ── Playfield overlays ──────────────────────────────────────────────

/// Predicted path for players who have the overlay, only while the ball approaches them.
/// Hidden balls still get a path.
fn draw_trajectories(state: &MatchState, now: Millis, r: &mut dyn Renderer) {
    for player in &state.players {
        let Some(character) = player.character else {
            continue;
        };
        if !character.behavior().shows_trajectory(&player.ability, now) {
            continue;
        }
        let points: Vec<Vec2> = predict_trajectory(
            state.ball.pos,
            state.ball.vel,
            state.arena.top(),
            state.arena.bottom(),
            state.ball.radius,
            player.paddle.face_x(),
            state.tuning.trajectory_max_bounces,
        )
        .collect();
        if points.len() >= 2 {
            r.draw_dotted_polyline(&points, palette::JARVIS, Dash::default());
        }
    }
}

/// Each hologram wears the skin of the paddle it imitates.
fn draw_holograms(state: &MatchState, r: &mut dyn Renderer) {
    for player in &state.players {
        if !player.hologram.active {
            continue;
        }
        let rect = player
            .hologram
            .rect(&player.paddle, &state.arena, state.tuning.hologram_gap);
        draw_paddle(r, rect, player.character, player.side);
    }
}

// ── Menu ────────────────────────────────────────────────────────────

fn draw_menu(state: &MatchState, r: &mut dyn Renderer) {
    let (width, height) = (state.arena.width, state.arena.height);
    r.clear(palette::BLACK);
    r.draw_text(
        "Marvel PONG: Pick Your Hero! Or villain...",
        Font::TITLE,
        palette::WHITE,
        Rect::new(0.0, 30.0, width, 100.0),
        TextAlign::Center,
    );

    let panel_w = (width / 2.0 - 40.0).max(1.0);
    let panel_h = (height - PANEL_TOP - 60.0).max(LIST_ROW * 6.0);
    let panels = [
        (
            Rect::new(PANEL_SIDE, PANEL_TOP, PANEL_SIDE + panel_w, PANEL_TOP + panel_h),
            "P1: select with W/S, ready with D, cancel with A",
        ),
        (
            Rect::new(width - PANEL_SIDE - panel_w, PANEL_TOP, width - PANEL_SIDE, PANEL_TOP + panel_h),
            "P2: select with Up/Down, ready with Right, cancel with Left",
        ),
    ];
    for (player, (rect, header)) in state.players.iter().zip(panels) {
        draw_player_panel(r, rect, header, player);
    }

    let both_ready = state.players.iter().all(|p| p.pick.ready);
    let footer = if both_ready {
        "Both ready! The server presses a paddle key to serve"
    } else {
        "Both players READY up to start"
    };
    r.draw_text(
        footer,
        Font::SUB,
        palette::WHITE,
        Rect::new(0.0, height - 46.0, width, height - 10.0),
        TextAlign::Center,
    );
}

fn draw_player_panel(r: &mut dyn Renderer, rect: Rect, header: &str, player: &Player) {
    r.draw_rect(rect, palette::PANEL, RectStyle::Fill, PANEL_RADIUS);
    r.draw_text(
        header,
        Font::SUB,
        palette::WHITE,
        Rect::new(rect.min.x + 16.0, rect.min.y + 10.0, rect.max.x - 16.0, rect.min.y + 40.0),
        TextAlign::Left,
    );

    let list_w = (rect.width() * LIST_WIDTH_RATIO).floor();
    let body_top = rect.min.y + 50.0;
    let body_bottom = (rect.max.y - 20.0).max(body_top);
    let list_x = rect.min.x + LIST_MARGIN;
    let desc_x = list_x + list_w + LIST_GAP;
    let desc_right = (rect.max.x - LIST_MARGIN).max(desc_x);

    let pick = player.pick;
    for (i, character) in Character::ROSTER.iter().enumerate() {
        let selected = i == pick.index;
        let color = match (selected, pick.ready) {
            (true, true) => palette::GREEN,
            (true, false) => palette::BLUE,
            _ => palette::WHITE,
        };
        let prefix = if selected { "->" } else { "   " };
        let y = body_top + i as f32 * LIST_ROW;
        r.draw_text(
            &format!("{prefix}{}", character.name()),
            Font::ITEM,
            color,
            Rect::new(list_x, y, list_x + list_w, y + LIST_ROW),
            TextAlign::Left,
        );
    }

    let (status, status_color) = if pick.ready {
        ("READY", palette::GREEN)
    } else {
        ("UNREADY", palette::RED)
    };
    r.draw_text(
        status,
        Font::SUB,
        status_color,
        Rect::new(rect.min.x, rect.max.y - 44.0, rect.max.x - 14.0, rect.max.y - 12.0),
        TextAlign::Right,
    );

    let selected = Character::from_index(pick.index);
    r.draw_text(
        selected.name(),
        Font::ITEM,
        palette::WHITE,
        Rect::new(desc_x, body_top, desc_right, body_top + LIST_ROW),
        TextAlign::Left,
    );
    r.draw_text(
        &selected.description(),
        Font::DESC,
        palette::WHITE,
        Rect::new(desc_x, body_top + LIST_ROW, desc_right, body_bottom - 30.0),
        TextAlign::Left,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tuning::Tuning;
    use crate::game::match_state::testing::started;
    use crate::render::draw_list::{DrawCommand, DrawList};

    fn render(state: &MatchState, now: u64) -> DrawList {
        let mut list = DrawList::new(state.arena.width, state.arena.height);
        draw_frame(state, Millis(now), &mut list);
        list
    }

    fn circles(list: &DrawList) -> usize {
        list.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    #[test]
    fn test_menu_shows_roster_and_status() {
        let mut state = MatchState::seeded(Tuning::default(), 3);
        state.players[1].pick = crate::game::match_state::RosterPick { index: 2, ready: true };
        let list = render(&state, 0);
        let texts: Vec<&str> = list.texts().collect();
        assert!(texts.contains(&"->Iron Man"));
        assert!(texts.contains(&"->Invisible Woman"));
        assert!(texts.contains(&"UNREADY"));
        assert!(texts.contains(&"READY"));
        assert!(texts.contains(&"Both players READY up to start"));
        assert!(texts.iter().any(|t| t.starts_with("(Passive) Force Field")));
    }

    #[test]
    fn test_hud_and_serve_hint() {
        let state = started(Character::IronMan, Character::QuickSilver);
        let list = render(&state, 0);
        let texts: Vec<&str> = list.texts().collect();
        assert!(texts.contains(&"Iron Man"));
        assert!(texts.contains(&"QuickSilver"));
        assert!(texts.contains(&"0  :  0"));
        assert!(texts.contains(&"Player 1 serve: W/S"));
        let segments = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { corner_radius, .. } if *corner_radius == SEG_RADIUS))
            .count();
        // Empty segments are filled and outlined.
        assert_eq!(segments, 2 * 8 * 2);
    }

    #[test]
    fn test_invisible_ball_is_not_drawn() {
        let mut state = started(Character::Loki, Character::Loki);
        state.phase = GamePhase::Play;
        let before = circles(&render(&state, 0));
        state.ball.hide();
        assert_eq!(circles(&render(&state, 0)), before - 1);
    }

    #[test]
    fn test_trajectory_only_toward_iron_man() {
        let mut state = started(Character::IronMan, Character::Loki);
        state.phase = GamePhase::Play;
        state.players[0].ability.active_until = Millis(9000);
        state.ball.vel = Vec2::new(-4.0, 3.0);
        let dotted = |list: &DrawList| {
            list.commands
                .iter()
                .filter(|c| matches!(c, DrawCommand::DottedPolyline { .. }))
                .count()
        };
        assert_eq!(dotted(&render(&state, 100)), 1);
        state.ball.vel.x = 4.0;
        assert_eq!(dotted(&render(&state, 100)), 0);
        state.ball.vel.x = -4.0;
        assert_eq!(dotted(&render(&state, 9000)), 0, "expired");
    }

    #[test]
    fn test_trajectory_drawn_for_hidden_ball() {
        let mut state = started(Character::InvisibleWoman, Character::IronMan);
        state.phase = GamePhase::Play;
        state.players[1].ability.active_until = Millis(9000);
        state.ball.vel = Vec2::new(4.0, -3.0);
        state.ball.hide();
        let list = render(&state, 100);
        let dotted = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::DottedPolyline { .. }))
            .count();
        assert_eq!(dotted, 1);
        assert!(
            !list
                .commands
                .iter()
                .any(|c| matches!(c, DrawCommand::Circle { center, .. } if *center == state.ball.pos))
        );
    }

    #[test]
    fn test_balls_drawn_blue() {
        let mut state = started(Character::Loki, Character::Loki);
        state.phase = GamePhase::Play;
        state.fake_balls.push(crate::game::components::FakeBall {
            pos: Vec2::new(500.0, 300.0),
            vel: Vec2::X,
        });
        let list = render(&state, 0);
        let blue = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { color, .. } if *color == palette::BLUE))
            .count();
        assert_eq!(blue, 2);
    }

    #[test]
    fn test_fake_balls_and_hologram_drawn_in_play() {
        let mut state = started(Character::Loki, Character::IronMan);
        state.phase = GamePhase::Play;
        let base = render(&state, 0).commands.len();
        state.fake_balls.push(crate::game::components::FakeBall {
            pos: Vec2::new(500.0, 300.0),
            vel: Vec2::X,
        });
        state.players[1].hologram.active = true;
        state.players[1].hologram.sign = 1;
        let list = render(&state, 0);
        // One decoy circle plus a full Iron Man skin: body, two reactor circles, outline.
        assert_eq!(list.commands.len(), base + 1 + 4);
    }

    #[test]
    fn test_win_screen_text() {
        let mut state = started(Character::Loki, Character::IronMan);
        state.phase = GamePhase::Win {
            winner: Side::Right,
            until: Millis(5000),
        };
        let list = render(&state, 0);
        assert!(list.texts().any(|t| t == "Player 2 Wins!"));
        assert_eq!(circles(&list), 0);
    }
}
