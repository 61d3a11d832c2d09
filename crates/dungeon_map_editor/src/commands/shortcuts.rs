//! Keyboard shortcut handling

use bevy::prelude::*;

use crate::state::{EditorState, PendingAction};
use crate::tools::EditorTool;

const LAYER_KEYS: [KeyCode; 4] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4];

const TOOL_KEYS: [(KeyCode, EditorTool); 6] = [
    (KeyCode::KeyS, EditorTool::Select),
    (KeyCode::KeyB, EditorTool::Paint),
    (KeyCode::KeyG, EditorTool::Fill),
    (KeyCode::KeyE, EditorTool::Erase),
    (KeyCode::KeyT, EditorTool::TileType),
    (KeyCode::KeyL, EditorTool::Location),
];

/// System to handle keyboard shortcuts
pub fn handle_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut editor_state: ResMut<EditorState>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    if ctrl {
        // Ctrl+Z - Undo
        if keyboard.just_pressed(KeyCode::KeyZ) && !shift {
            editor_state.pending_action = Some(PendingAction::Undo);
        }
        // Ctrl+Shift+Z or Ctrl+Y - Redo
        if (keyboard.just_pressed(KeyCode::KeyZ) && shift) || keyboard.just_pressed(KeyCode::KeyY) {
            editor_state.pending_action = Some(PendingAction::Redo);
        }
        // Ctrl+A - Select All
        if keyboard.just_pressed(KeyCode::KeyA) {
            editor_state.pending_action = Some(PendingAction::SelectAll);
        }
        // Ctrl+S - Save
        if keyboard.just_pressed(KeyCode::KeyS) {
            editor_state.pending_action = Some(PendingAction::Save);
        }
        // Ctrl+N - New
        if keyboard.just_pressed(KeyCode::KeyN) {
            editor_state.pending_action = Some(PendingAction::NewMap);
        }
        // Ctrl+W - Close
        if keyboard.just_pressed(KeyCode::KeyW) {
            editor_state.pending_action = Some(PendingAction::CloseMap);
        }
        return;
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        editor_state.pending_action = Some(PendingAction::ClearSelection);
    }

    if keyboard.just_pressed(KeyCode::F5) {
        editor_state.pending_action = Some(PendingAction::Validate);
    }

    for (index, key) in LAYER_KEYS.iter().enumerate() {
        if keyboard.just_pressed(*key) && index < editor_state.grid().max_layers() {
            editor_state.tool_settings.active_layer = index;
        }
    }

    for (key, tool) in TOOL_KEYS {
        if keyboard.just_pressed(key) {
            editor_state.set_tool(tool);
        }
    }

    // X - toggle erase mode
    if keyboard.just_pressed(KeyCode::KeyX) {
        let settings = &mut editor_state.tool_settings;
        settings.erase_mode = settings.erase_mode.toggled();
    }

    // Tab - swap wall/floor for the tile type tool
    if keyboard.just_pressed(KeyCode::Tab) {
        editor_state.tool_settings.type_swapped = !editor_state.tool_settings.type_swapped;
    }
}
