//! Window input for the viewport: pointer, pan and zoom

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::state::EditorState;
use crate::tools::ToolOutcome;

/// Wheel pixels treated as one line step on touchpads
const PIXELS_PER_LINE: f32 = 40.0;

/// Plugin for editor tools and viewport input
pub struct EditorToolsPlugin;

impl Plugin for EditorToolsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewportInputState>().add_systems(
            Update,
            (refresh_layout, handle_viewport_input, handle_zoom_input).chain(),
        );
    }
}

/// State for viewport input handling
#[derive(Resource, Default)]
pub struct ViewportInputState {
    /// Last cursor position for panning
    pub pan_last_pos: Option<Vec2>,
    /// Pan distance in pixels not yet applied as whole tiles
    pub pan_remainder: Vec2,
    /// Cursor position seen last frame
    pub last_cursor: Option<Vec2>,
}

impl ViewportInputState {
    /// Add a pan delta and return the whole-tile part ready to apply, if any.
    ///
    /// Sub-tile movement is kept for later frames so slow drags still pan.
    pub fn accumulate_pan(&mut self, delta: Vec2, tile_size: f32) -> Option<Vec2> {
        if !(tile_size > 0.0) {
            return None;
        }
        self.pan_remainder += delta;
        let whole = (self.pan_remainder / tile_size).trunc();
        if whole == Vec2::ZERO {
            return None;
        }
        let step = whole * tile_size;
        self.pan_remainder -= step;
        Some(step)
    }

    fn end_pan(&mut self) {
        self.pan_last_pos = None;
        self.pan_remainder = Vec2::ZERO;
    }
}

fn refresh_layout(windows: Query<&Window>, mut editor_state: ResMut<EditorState>) {
    let Ok(window) = windows.single() else { return };
    editor_state.update_layout(Vec2::new(window.width(), window.height()));
}

fn handle_viewport_input(
    mut editor_state: ResMut<EditorState>,
    mut input_state: ResMut<ViewportInputState>,
    windows: Query<&Window>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
) {
    let cursor = windows.single().ok().and_then(|w| w.cursor_position());

    if let Some(cursor) = cursor {
        // Handle panning (middle mouse or right mouse)
        if mouse_buttons.pressed(MouseButton::Middle) || mouse_buttons.pressed(MouseButton::Right) {
            if let Some(last) = input_state.pan_last_pos {
                // Content follows the cursor, so the view moves the other way
                let tile_size = editor_state.viewport.effective_tile_size();
                if let Some(step) = input_state.accumulate_pan(last - cursor, tile_size) {
                    editor_state.handle_pan(step);
                }
            }
            input_state.pan_last_pos = Some(cursor);
        } else {
            input_state.end_pan();

            if mouse_buttons.just_pressed(MouseButton::Left) {
                editor_state.handle_pointer_down(cursor);
            } else if mouse_buttons.pressed(MouseButton::Left)
                && input_state.last_cursor != Some(cursor)
            {
                editor_state.handle_pointer_move(cursor);
            }
        }
    } else {
        input_state.end_pan();
    }
    input_state.last_cursor = cursor;

    if mouse_buttons.just_released(MouseButton::Left) {
        if let ToolOutcome::Recorded { tiles } = editor_state.handle_pointer_up() {
            debug!("Edited {} tile(s)", tiles);
        }
    }
}

/// System to handle zoom input
#[allow(deprecated)] // EventReader is deprecated but still works in Bevy 0.17
fn handle_zoom_input(
    mut editor_state: ResMut<EditorState>,
    mut scroll_events: bevy::ecs::event::EventReader<MouseWheel>,
    windows: Query<&Window>,
) {
    let cursor = windows.single().ok().and_then(|w| w.cursor_position());

    for event in scroll_events.read() {
        let Some(cursor) = cursor else { continue };
        // Scrolling over the toolbar does not zoom the map
        if !editor_state.layout.contains(cursor) {
            continue;
        }
        let steps = match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / PIXELS_PER_LINE,
        };
        if steps != 0.0 {
            editor_state.handle_zoom(cursor, steps);
        }
    }
}
