use bevy::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("audio track not found: {0}")]
    MissingTrack(String),
}

/// Playback service the simulation calls into.
pub trait AudioSink {
    /// Load `track` and loop it indefinitely at `volume`.
    fn play_loop(&mut self, track: &str, volume: f32) -> Result<(), AudioError>;
    fn stop(&mut self) -> Result<(), AudioError>;
}

/// Discards all playback requests.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_loop(&mut self, _track: &str, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Whether the ability track is playing. Failures are logged and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Music {
    on: bool,
}

impl Music {
    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn start(&mut self, audio: &mut dyn AudioSink, track: &str, volume: f32) {
        if self.on {
            return;
        }
        match audio.play_loop(track, volume) {
            Ok(()) => self.on = true,
            Err(e) => warn!("Failed to start ability music: {e}"),
        }
    }

    pub fn stop(&mut self, audio: &mut dyn AudioSink) {
        if !self.on {
            return;
        }
        if let Err(e) = audio.stop() {
            warn!("Failed to stop ability music: {e}");
        }
        self.on = false;
    }
}
