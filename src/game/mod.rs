pub mod ability;
pub mod audio;
pub mod characters;
pub mod collision;
pub mod components;
pub mod geometry;
pub mod intent;
pub mod match_state;
pub mod physics;
pub mod rally;
pub mod types;
