//! Splash screen and asset loading for a game about catching raindrops.

#![allow(clippy::type_complexity)]

pub mod game;
pub mod layout;
pub mod loading;
pub mod state;
pub mod viewport;

use bevy::app::{PluginGroup, PluginGroupBuilder};
pub use state::GameState;

/// All game plugins.
pub struct RaindropPlugins;

impl PluginGroup for RaindropPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(layout::LayoutPlugin)
            .add(state::GameStatePlugin)
            .add(viewport::ViewportPlugin)
            .add(loading::LoadingScreenPlugin)
            .add(game::GamePlugin)
    }
}
