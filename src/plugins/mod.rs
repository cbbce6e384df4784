pub mod audio_plugin;
pub mod game_plugin;
pub mod render_plugin;
pub mod storage_plugin;
