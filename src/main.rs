mod config;
mod game;
mod plugins;
mod render;
mod storage;

use bevy::prelude::*;

use config::tuning::Tuning;
use plugins::{
    audio_plugin::MusicPlugin, game_plugin::GamePlugin, render_plugin::DrawPlugin,
    storage_plugin::StoragePlugin,
};

fn main() {
    let tuning = Tuning::load_or_default();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Hero Pong".into(),
                resolution: (tuning.window_width as u32, tuning.window_height as u32).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(Time::<Fixed>::from_hz(tuning.tick_hz))
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(tuning)
        .add_plugins(StoragePlugin)
        .add_plugins(MusicPlugin)
        .add_plugins(GamePlugin)
        .add_plugins(DrawPlugin)
        .run();
}
