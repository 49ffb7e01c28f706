//! Pointer input for the play button.

use bevy::{prelude::*, window::PrimaryWindow};

use super::progress::{LoadProgress, LoadingPhase};
use crate::{layout::ScreenLayout, viewport::WorldCamera, viewport::WorldViewport, GameState};

/// A mouse click or touch, in world space.
#[derive(Clone, Copy, Debug, Event, PartialEq)]
pub struct PointerPressed {
    pub position: Vec2,
}

/// Turns left clicks and new touches into [`PointerPressed`] events.
pub fn read_pointer_presses(
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<WorldCamera>>,
    mut press_tx: EventWriter<PointerPressed>,
) {
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };

    let clicked = mouse
        .just_pressed(MouseButton::Left)
        .then(|| windows.get_single().ok().and_then(Window::cursor_position))
        .flatten();

    let points = clicked
        .into_iter()
        .chain(touches.iter_just_pressed().map(|touch| touch.position()));

    for point in points {
        // points outside of the viewport have no world position
        if let Some(position) = camera.viewport_to_world_2d(camera_transform, point) {
            press_tx.send(PointerPressed { position });
        }
    }
}

/// Starts the game when the play button is pressed.
///
/// Presses made while assets are still loading are dropped.
pub fn press_play(
    mut presses: EventReader<PointerPressed>,
    progress: Res<LoadProgress>,
    layout: Res<ScreenLayout>,
    viewport: Res<WorldViewport>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if progress.phase() != LoadingPhase::Ready {
        presses.clear();
        return;
    }

    let world = viewport.size();

    if let Some(press) = presses
        .read()
        .find(|press| layout.button_contains(world, press.position))
    {
        info!("play pressed at {}", press.position);
        next_state.set(GameState::InGame);
    }

    // anything past the hit is stale
    presses.clear();
}
