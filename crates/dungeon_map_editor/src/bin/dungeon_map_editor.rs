//! Standalone dungeon map editor binary
//!
//! Run with: dungeon_map_editor

use bevy::prelude::*;
use bevy::window::WindowResolution;
use dungeon_map_editor::MapEditorPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Dungeon Map Editor".to_string(),
                resolution: WindowResolution::new(1280, 720),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(MapEditorPlugin::default())
        .run();
}
