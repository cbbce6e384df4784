use bevy::input::ButtonState;
use bevy::input::keyboard::KeyboardInput;
use bevy::prelude::*;
use bevy::window::WindowResized;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::tuning::Tuning;
use crate::game::intent::{HeldKeys, InputEvent, KeyRole, LogicalKey};
use crate::game::match_state::MatchState;
use crate::game::types::{Millis, Side};
use crate::plugins::audio_plugin::AudioCues;
use crate::storage::rally_log::RallyLog;

/// Physical key → logical key. P1 on WASD, P2 on the arrows.
const KEY_MAP: [(KeyCode, LogicalKey); 8] = [
    (KeyCode::KeyW, LogicalKey::new(Side::Left, KeyRole::Up)),
    (KeyCode::KeyS, LogicalKey::new(Side::Left, KeyRole::Down)),
    (KeyCode::KeyD, LogicalKey::new(Side::Left, KeyRole::Confirm)),
    (KeyCode::KeyA, LogicalKey::new(Side::Left, KeyRole::Cancel)),
    (KeyCode::ArrowUp, LogicalKey::new(Side::Right, KeyRole::Up)),
    (KeyCode::ArrowDown, LogicalKey::new(Side::Right, KeyRole::Down)),
    (KeyCode::ArrowLeft, LogicalKey::new(Side::Right, KeyRole::Confirm)),
    (KeyCode::ArrowRight, LogicalKey::new(Side::Right, KeyRole::Cancel)),
];

pub fn logical_key(code: KeyCode) -> Option<LogicalKey> {
    KEY_MAP.iter().find(|(k, _)| *k == code).map(|(_, key)| *key)
}

// ── SystemSets (Update ordering) ────────────────────────────────────

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Keyboard and window messages into the input queue.
    Input,
    /// Draw the frame and flush audio cues.
    Present,
}

/// Input gathered in `Update`, drained by the next fixed tick.
#[derive(Resource, Debug, Default)]
pub struct InputQueue {
    pub events: Vec<InputEvent>,
    pub held: HeldKeys,
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputQueue>();
        app.configure_sets(Update, (FrameSet::Input, FrameSet::Present).chain());

        app.add_systems(Startup, setup_match);
        app.add_systems(Update, (collect_input, quit_on_escape).in_set(FrameSet::Input));
        app.add_systems(FixedUpdate, run_tick);

        // ── Always-on ───────────────────────────────────────────────────
        app.add_systems(Update, tuning_reload_input);
    }
}

// ── Startup ─────────────────────────────────────────────────────────

fn setup_match(mut commands: Commands, tuning: Res<Tuning>) {
    commands.insert_resource(MatchState::new(tuning.clone(), StdRng::from_entropy()));
    info!("Match state ready ({} points to win)", tuning.points_to_win);
}

// ── Input ───────────────────────────────────────────────────────────

fn collect_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut key_events: MessageReader<KeyboardInput>,
    mut resized: MessageReader<WindowResized>,
    mut queue: ResMut<InputQueue>,
) {
    for ev in key_events.read() {
        if ev.state != ButtonState::Pressed || ev.repeat {
            continue;
        }
        if let Some(key) = logical_key(ev.key_code) {
            queue.events.push(InputEvent::KeyDown(key));
        }
    }
    for ev in resized.read() {
        queue.events.push(InputEvent::Resize {
            width: ev.width,
            height: ev.height,
        });
    }

    let mut held = HeldKeys::default();
    for (code, key) in KEY_MAP {
        if keyboard.pressed(code) {
            held.press(key);
        }
    }
    queue.held = held;
}

fn quit_on_escape(keyboard: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        info!("Escape pressed, exiting");
        exit.write(AppExit::Success);
    }
}

// ── FixedUpdate ─────────────────────────────────────────────────────

fn run_tick(
    time: Res<Time>,
    mut state: ResMut<MatchState>,
    mut queue: ResMut<InputQueue>,
    mut audio: ResMut<AudioCues>,
    mut log: ResMut<RallyLog>,
) {
    let now = Millis(time.elapsed().as_millis() as u64);
    let events = std::mem::take(&mut queue.events);
    let held = queue.held;
    state.tick(now, &events, held, &mut *audio, &mut *log);
}

fn tuning_reload_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut tuning: ResMut<Tuning>,
    mut state: ResMut<MatchState>,
) {
    if keyboard.just_pressed(KeyCode::F5) {
        tuning.reload();
        state.apply_tuning(tuning.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_map_covers_both_players() {
        assert_eq!(
            logical_key(KeyCode::KeyD),
            Some(LogicalKey::new(Side::Left, KeyRole::Confirm))
        );
        assert_eq!(
            logical_key(KeyCode::ArrowLeft),
            Some(LogicalKey::new(Side::Right, KeyRole::Confirm))
        );
        assert_eq!(
            logical_key(KeyCode::ArrowRight),
            Some(LogicalKey::new(Side::Right, KeyRole::Cancel))
        );
        assert_eq!(logical_key(KeyCode::Space), None);
    }

    #[test]
    fn test_key_map_has_no_duplicates() {
        for (i, (code, key)) in KEY_MAP.iter().enumerate() {
            for (other_code, other_key) in &KEY_MAP[i + 1..] {
                assert_ne!(code, other_code);
                assert_ne!(key, other_key);
            }
        }
    }
}
