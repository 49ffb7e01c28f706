//! The main game screen.
//!
//! Its assets are queued by the loading screen and handed over in
//! [`GameAssets`].

use bevy::{audio::PlaybackSettings, prelude::*, sprite::Anchor};

use crate::{loading::LoadQueue, viewport::WorldViewport, GameState};

/// Game screen plugin.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::InGame), setup_game);
    }
}

pub const BACKGROUND_PATH: &str = "background.png";
pub const BUCKET_PATH: &str = "bucket.png";
pub const DROP_PATH: &str = "drop.png";
pub const MUSIC_PATH: &str = "music.mp3";
pub const DROP_SOUND_PATH: &str = "drop.mp3";

/// Bucket size in world units.
pub const BUCKET_SIZE: f32 = 1.;

/// Assets for the game itself.
#[derive(Clone, Debug, Default, Resource)]
pub struct GameAssets {
    pub background: Handle<Image>,
    pub bucket: Handle<Image>,
    pub drop: Handle<Image>,
    pub music: Handle<AudioSource>,
    pub drop_sound: Handle<AudioSource>,
}

impl GameAssets {
    /// Starts loading everything in the background.
    pub fn load(asset_server: &AssetServer) -> GameAssets {
        GameAssets {
            background: asset_server.load(BACKGROUND_PATH),
            bucket: asset_server.load(BUCKET_PATH),
            drop: asset_server.load(DROP_PATH),
            music: asset_server.load(MUSIC_PATH),
            drop_sound: asset_server.load(DROP_SOUND_PATH),
        }
    }

    /// Adds every handle to a [`LoadQueue`].
    pub fn queue(&self, queue: &mut LoadQueue) {
        queue.push(self.background.clone());
        queue.push(self.bucket.clone());
        queue.push(self.drop.clone());
        queue.push(self.music.clone());
        queue.push(self.drop_sound.clone());
    }
}

/// Marks the player's bucket.
#[derive(Clone, Component, Debug, Default)]
pub struct Bucket;

/// Sets the scene and starts the music.
pub fn setup_game(assets: Res<GameAssets>, viewport: Res<WorldViewport>, mut commands: Commands) {
    let world = viewport.size();

    commands.spawn(SpriteBundle {
        sprite: Sprite {
            custom_size: Some(world),
            anchor: Anchor::BottomLeft,
            ..default()
        },
        texture: assets.background.clone(),
        ..default()
    });

    commands.spawn((
        SpriteBundle {
            sprite: Sprite {
                custom_size: Some(Vec2::splat(BUCKET_SIZE)),
                anchor: Anchor::BottomCenter,
                ..default()
            },
            texture: assets.bucket.clone(),
            transform: Transform::from_xyz(world.x / 2., 0., 1.),
            ..default()
        },
        Bucket,
    ));

    commands.spawn(AudioBundle {
        source: assets.music.clone(),
        settings: PlaybackSettings::LOOP,
    });

    info!("game started");
}
