use bevy::audio::Volume;
use bevy::prelude::*;
use std::path::PathBuf;

use crate::game::audio::{AudioError, AudioSink};
use crate::plugins::game_plugin::FrameSet;

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCue {
    Loop { track: String, volume: f32 },
    Stop,
}

/// Playback requests from the fixed tick, applied once per frame.
#[derive(Resource, Debug)]
pub struct AudioCues {
    pending: Vec<AudioCue>,
    asset_root: PathBuf,
}

impl AudioCues {
    pub fn new(asset_root: PathBuf) -> Self {
        Self {
            pending: Vec::new(),
            asset_root,
        }
    }

    /// Same base directory Bevy's file asset reader uses.
    pub fn from_env() -> Self {
        let base = std::env::var_os("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .or_else(|| std::env::current_exe().ok()?.parent().map(PathBuf::from))
            .unwrap_or_default();
        Self::new(base.join("assets"))
    }
}

impl AudioSink for AudioCues {
    fn play_loop(&mut self, track: &str, volume: f32) -> Result<(), AudioError> {
        if !self.asset_root.join(track).is_file() {
            return Err(AudioError::MissingTrack(track.to_owned()));
        }
        self.pending.push(AudioCue::Loop {
            track: track.to_owned(),
            volume,
        });
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.pending.push(AudioCue::Stop);
        Ok(())
    }
}

#[derive(Component)]
struct AbilityMusic;

pub struct MusicPlugin;

impl Plugin for MusicPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(AudioCues::from_env());
        app.add_systems(Update, apply_audio_cues.in_set(FrameSet::Present));
    }
}

/// Only the last cue of the frame matters.
fn apply_audio_cues(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut cues: ResMut<AudioCues>,
    playing: Query<Entity, With<AbilityMusic>>,
) {
    let Some(cue) = cues.pending.drain(..).last() else {
        return;
    };
    for entity in &playing {
        commands.entity(entity).despawn();
    }
    if let AudioCue::Loop { track, volume } = cue {
        commands.spawn((
            AudioPlayer::new(asset_server.load(track)),
            PlaybackSettings::LOOP.with_volume(Volume::Linear(volume)),
            AbilityMusic,
        ));
    }
}
