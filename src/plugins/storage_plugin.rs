use bevy::prelude::*;

use crate::config::tuning::Tuning;
use crate::storage::rally_log::RallyLog;

pub struct StoragePlugin;

impl Plugin for StoragePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_storage);
    }
}

fn init_storage(world: &mut World) {
    let dir = Tuning::data_dir();
    info!("Opening rally log in {:?}", dir);

    match RallyLog::create_in(&dir, chrono::Local::now()) {
        Ok(log) => {
            info!("Rally log at {:?}", log.path());
            world.insert_resource(log);
        }
        Err(e) => {
            error!("Failed to create rally log: {e}");
            // The match still runs, rallies just aren't written.
            world.insert_resource(RallyLog::disabled());
        }
    }
}
