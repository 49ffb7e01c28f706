//! Global game state structures and loading systems.

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy_asset_loader::prelude::*;

use crate::loading::LoadingScreenAssets;

/// Plugin to add game state.
///
/// This also adds the blocking load of the loading screen's own assets.
/// Make sure you install this plugin if anything!
pub struct GameStatePlugin;

impl Plugin for GameStatePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_loading_state(
                LoadingState::new(GameState::Splash)
                    .continue_to_state(GameState::Loading)
                    .on_failure_continue_to_state(GameState::LoadFailed)
                    .load_collection::<LoadingScreenAssets>(),
            )
            .add_systems(OnEnter(GameState::LoadFailed), exit_on_load_failure);
    }
}

/// Global game state.
///
/// See [module level documentation][`super`] for more info.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, States)]
pub enum GameState {
    /// Default game state on startup.
    ///
    /// Blocks until the splash, play button and progress bar textures are
    /// resident. Nothing is drawn yet.
    #[default]
    Splash,
    /// The loading screen.
    ///
    /// Game assets stream in the background. Will transition to
    /// [`GameState::InGame`] once everything is loaded and the player hits
    /// the play button.
    Loading,
    /// In game.
    InGame,
    /// An asset failed to load. The app exits on entering this state.
    LoadFailed,
}

fn exit_on_load_failure(mut exit: EventWriter<AppExit>) {
    error!("asset loading failed, exiting");
    exit.send(AppExit);
}
