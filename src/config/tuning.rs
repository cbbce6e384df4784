use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// All tunable game parameters, loaded from tuning.ron.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fixed simulation rate (ticks per second).
    pub tick_hz: f64,
    pub window_width: f32,
    pub window_height: f32,
    /// Height of the top HUD band; gameplay never enters it.
    pub hud_height: f32,
    /// How close paddles may fly toward the midline (px).
    pub center_margin: f32,

    // ── Ball ──
    pub ball_radius: f32,
    pub serve_speed_min: f32,
    pub serve_speed_max: f32,
    pub wall_damping: f32,
    pub max_deflect_deg: f32,
    pub speedup_per_hit: f32,
    pub min_speed: f32,
    pub max_speed: f32,

    // ── Paddles ──
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Distance from the window edge to the paddle center line.
    pub paddle_inset: f32,
    pub paddle_speed: f32,

    // ── Match ──
    pub points_to_win: u32,
    pub meter_max: u8,
    pub double_press_ms: u64,
    pub win_announce_ms: u64,
    /// A winner scoring this soon after their own ability counts as clutch.
    pub clutch_window_ms: u64,

    // ── Iron Man ──
    pub iron_nudge_speed: f32,
    pub iron_ability_speed: f32,
    pub iron_ability_ms: u64,
    pub trajectory_max_bounces: usize,

    // ── Loki ──
    pub loki_min_deg: f32,
    pub loki_max_deg: f32,
    pub loki_min_sep_deg: f32,
    pub hologram_gap: f32,

    // ── Invisible Woman ──
    pub invis_freeze_ms: u64,

    // ── QuickSilver ──
    pub quicksilver_speed_bonus: f32,
    pub quicksilver_ability_ms: u64,
    pub quicksilver_freeze_ms: u64,
    pub quicksilver_hit_force: f32,
    pub quicksilver_slow_ratio: f32,
    pub quicksilver_track: String,
    pub quicksilver_volume: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_hz: 120.0,
            window_width: 1200.0,
            window_height: 600.0,
            hud_height: 80.0,
            center_margin: 350.0,
            ball_radius: 10.0,
            serve_speed_min: 2.0,
            serve_speed_max: 2.5,
            wall_damping: 0.8,
            max_deflect_deg: 60.0,
            speedup_per_hit: 1.20,
            min_speed: 2.0,
            max_speed: 50.0,
            paddle_width: 20.0,
            paddle_height: 120.0,
            paddle_inset: 60.0,
            paddle_speed: 4.0,
            points_to_win: 5,
            meter_max: 8,
            double_press_ms: 250,
            win_announce_ms: 1800,
            clutch_window_ms: 8000,
            iron_nudge_speed: 3.0,
            iron_ability_speed: 5.5,
            iron_ability_ms: 9000,
            trajectory_max_bounces: 12,
            loki_min_deg: 12.0,
            loki_max_deg: 40.0,
            loki_min_sep_deg: 10.0,
            hologram_gap: 75.0,
            invis_freeze_ms: 750,
            quicksilver_speed_bonus: 3.5,
            quicksilver_ability_ms: 18000,
            quicksilver_freeze_ms: 2000,
            quicksilver_hit_force: 1.35,
            quicksilver_slow_ratio: 0.5,
            quicksilver_track: "audio/sweet_dreams_V1.ogg".into(),
            quicksilver_volume: 1.0,
        }
    }
}

impl Tuning {
    /// Get the data directory for tuning and log files.
    pub fn data_dir() -> PathBuf {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("hero_pong")
    }

    /// Path to the tuning file.
    pub fn file_path() -> PathBuf {
        Self::data_dir().join("tuning.ron")
    }

    /// Load from file, or create default if not found.
    pub fn load_or_default() -> Self {
        let path = Self::file_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match ron::from_str(&contents) {
                    Ok(tuning) => return tuning,
                    Err(e) => {
                        warn!("Failed to parse tuning.ron: {e}, using defaults");
                    }
                },
                Err(e) => {
                    warn!("Failed to read tuning.ron: {e}, using defaults");
                }
            }
        }
        let tuning = Self::default();
        tuning.save();
        tuning
    }

    /// Save current tuning to file.
    pub fn save(&self) {
        self.save_to(&Self::file_path());
    }

    /// Failures are logged; the game keeps its in-memory values.
    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Failed to create {}: {e}", parent.display());
            return;
        }
        let pretty = ron::ser::PrettyConfig::default();
        match ron::ser::to_string_pretty(self, pretty) {
            Ok(s) => {
                if let Err(e) = std::fs::write(path, s) {
                    warn!("Failed to write tuning.ron: {e}");
                }
            }
            Err(e) => {
                warn!("Failed to serialize tuning: {e}");
            }
        }
    }

    /// Reload from file (called by key press).
    pub fn reload(&mut self) {
        *self = Self::load_or_default();
        info!("Tuning reloaded");
    }

    pub fn max_deflect_rad(&self) -> f32 {
        self.max_deflect_deg.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_ron() {
        let tuning = Tuning::default();
        let text = ron::ser::to_string_pretty(&tuning, ron::ser::PrettyConfig::default())
            .expect("serialize");
        let back: Tuning = ron::from_str(&text).expect("parse");
        assert_eq!(back.points_to_win, 5);
        assert_eq!(back.meter_max, 8);
        assert_eq!(back.quicksilver_track, tuning.quicksilver_track);
    }

    #[test]
    fn test_save_to_creates_missing_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("tuning.ron");
        Tuning::default().save_to(&path);
        let back: Tuning = ron::from_str(&std::fs::read_to_string(&path).expect("read")).expect("parse");
        assert_eq!(back.tick_hz, 120.0);
    }

    #[test]
    fn test_save_to_unwritable_dir_is_not_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file, not a dir").expect("write");
        let path = blocker.join("tuning.ron");
        Tuning::default().save_to(&path);
        assert!(!path.exists());
    }

    #[test]
    fn test_partial_file_fills_missing_fields() {
        let back: Tuning = ron::from_str("(points_to_win: 3)").expect("parse");
        assert_eq!(back.points_to_win, 3);
        assert_eq!(back.double_press_ms, 250);
        assert!((back.max_deflect_rad() - 60f32.to_radians()).abs() < 1e-6);
    }
}
