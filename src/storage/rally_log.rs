use bevy::prelude::*;
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use super::repo::{RallyLogError, RallySink};
use crate::game::rally::RallyRecord;

pub const HEADER: [&str; 9] = [
    "rally_index",
    "paddle_hits",
    "end_ball_speed_px_per_frame",
    "rally_duration_s",
    "p1_ability_uses",
    "p2_ability_uses",
    "winner",
    "p1_win_within_8s_after_ability",
    "p2_win_within_8s_after_ability",
];

const MAX_NAME_ATTEMPTS: u32 = 1000;

/// CSV match log, one file per session (Bevy Resource).
#[derive(Resource)]
pub struct RallyLog {
    writer: Option<csv::Writer<File>>,
    path: Option<PathBuf>,
}

impl RallyLog {
    /// Create `match_log_<stamp>.csv` in `dir` and write the header.
    /// Existing files are never overwritten; a numeric suffix is added instead.
    pub fn create_in(dir: &Path, stamp: DateTime<Local>) -> Result<Self, RallyLogError> {
        std::fs::create_dir_all(dir)?;
        let stem = format!("match_log_{}", stamp.format("%Y%m%d_%H%M%S"));
        let (file, path) = create_unique(dir, &stem)?;

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(HEADER)?;
        writer.flush()?;
        Ok(Self {
            writer: Some(writer),
            path: Some(path),
        })
    }

    /// A log that rejects every record.
    pub fn disabled() -> Self {
        Self {
            writer: None,
            path: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl RallySink for RallyLog {
    fn record(&mut self, record: &RallyRecord) -> Result<(), RallyLogError> {
        let writer = self.writer.as_mut().ok_or(RallyLogError::Closed)?;
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}

fn create_unique(dir: &Path, stem: &str) -> io::Result<(File, PathBuf)> {
    let mut last_err = None;
    for n in 0..MAX_NAME_ATTEMPTS {
        let name = if n == 0 {
            format!("{stem}.csv")
        } else {
            format!("{stem}_{n}.csv")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => last_err = Some(e),
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| io::Error::other("no free log file name")))
}
