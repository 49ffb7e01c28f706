//! The loading screen.
//!
//! The splash, play button and progress bar textures are loaded up front
//! during [`GameState::Splash`]. Once they're in, the loading screen shows the
//! splash with a progress bar over it while the game's own assets stream in
//! the background. When everything is loaded the progress bar makes way for
//! the play button, and pressing it starts the game.
//!
//! # Lifetime
//! Everything the loading screen owns is dropped on leaving
//! [`GameState::Loading`], which unloads its textures. The game's assets live
//! on in [`GameAssets`].

pub mod input;
pub mod progress;

pub use input::PointerPressed;
pub use progress::{LoadProgress, LoadQueue, LoadingPhase};

use bevy::{prelude::*, sprite::Anchor};
use bevy_asset_loader::prelude::*;

use crate::{
    game::GameAssets,
    layout::{atlas_index, segments, BarLayer, BarPart, ScreenLayout},
    viewport::WorldViewport,
    GameState,
};

/// Loading screen plugin.
pub struct LoadingScreenPlugin;

impl Plugin for LoadingScreenPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PointerPressed>()
            .configure_sets(
                Update,
                (
                    LoadingSystem::Progress,
                    LoadingSystem::Draw,
                    LoadingSystem::Input,
                )
                    .chain()
                    .run_if(in_state(GameState::Loading)),
            )
            .add_systems(OnEnter(GameState::Loading), setup_loading_screen)
            .add_systems(
                Update,
                (
                    progress::track_load_progress
                        .in_set(LoadingSystem::Progress)
                        .run_if(resource_exists::<LoadQueue>),
                    draw_loading_screen
                        .in_set(LoadingSystem::Draw)
                        .run_if(resource_exists::<ScreenLayout>),
                    (input::read_pointer_presses, input::press_play)
                        .chain()
                        .in_set(LoadingSystem::Input)
                        .run_if(resource_exists::<ScreenLayout>),
                ),
            )
            .add_systems(OnExit(GameState::Loading), dispose_loading_screen);
    }
}

/// Per frame loading screen work, in the order it runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, SystemSet)]
pub enum LoadingSystem {
    /// Polls the asset server.
    Progress,
    /// Moves the progress bar and play button sprites.
    Draw,
    /// Handles presses on the play button.
    Input,
}

/// Assets only the loading screen uses.
#[derive(AssetCollection, Resource)]
pub struct LoadingScreenAssets {
    #[asset(path = "loading/splash.png")]
    pub splash: Handle<Image>,
    #[asset(path = "loading/play.png")]
    pub play: Handle<Image>,
    #[asset(path = "loading/progress.png")]
    pub progress: Handle<Image>,
    #[asset(path = "loading/layout.ron")]
    pub layout: Handle<ScreenLayout>,
}

/// The progress bar segments, cut out of [`LoadingScreenAssets::progress`].
#[derive(Clone, Debug, Resource)]
pub struct ProgressAtlas(pub Handle<TextureAtlasLayout>);

/// Anything spawned by the loading screen.
#[derive(Clone, Component, Debug, Default)]
pub struct LoadingScreenEntity;

/// One of the six progress bar sprites.
#[derive(Clone, Copy, Component, Debug)]
pub struct BarSegment {
    pub layer: BarLayer,
    pub part: BarPart,
}

/// The play button sprite.
#[derive(Clone, Component, Debug, Default)]
pub struct PlayButton;

const SPLASH_Z: f32 = 0.;
const BACKGROUND_Z: f32 = 1.;
const FOREGROUND_Z: f32 = 2.;

/// Builds the loading screen and queues up the game's assets.
pub fn setup_loading_screen(
    assets: Res<LoadingScreenAssets>,
    layouts: Res<Assets<ScreenLayout>>,
    images: Res<Assets<Image>>,
    mut atlas_layouts: ResMut<Assets<TextureAtlasLayout>>,
    asset_server: Res<AssetServer>,
    viewport: Res<WorldViewport>,
    mut next_state: ResMut<NextState<GameState>>,
    mut commands: Commands,
) {
    let Some(layout) = layouts.get(&assets.layout).cloned() else {
        error!("loading screen layout went missing");
        next_state.set(GameState::LoadFailed);
        return;
    };

    // the sheet has to at least cover every segment
    let sheet_size = images
        .get(&assets.progress)
        .map(|image| UVec2::new(image.width(), image.height()));
    let needed = layout.atlas.size();
    match sheet_size {
        Some(size) if size.cmpge(needed).all() => (),
        Some(size) => {
            error!("progress sheet is {}, needs at least {}", size, needed);
            next_state.set(GameState::LoadFailed);
            return;
        }
        None => {
            error!("progress sheet went missing");
            next_state.set(GameState::LoadFailed);
            return;
        }
    }

    let atlas = atlas_layouts.add(layout.atlas.texture_atlas_layout());
    let world = viewport.size();

    commands.spawn((
        SpriteBundle {
            sprite: Sprite {
                custom_size: Some(world),
                anchor: Anchor::BottomLeft,
                ..default()
            },
            texture: assets.splash.clone(),
            transform: Transform::from_xyz(0., 0., SPLASH_Z),
            ..default()
        },
        LoadingScreenEntity,
    ));

    let bar = layout.bar_geometry(world, 0.);
    for (layer, part) in segments() {
        let z = match layer {
            BarLayer::Background => BACKGROUND_Z,
            BarLayer::Foreground => FOREGROUND_Z,
        };
        let rect = bar.segment(layer, part).unwrap_or_default();

        commands.spawn((
            SpriteSheetBundle {
                sprite: Sprite {
                    custom_size: Some(rect.size()),
                    anchor: Anchor::BottomLeft,
                    ..default()
                },
                atlas: TextureAtlas {
                    layout: atlas.clone(),
                    index: atlas_index(layer, part),
                },
                texture: assets.progress.clone(),
                transform: Transform::from_translation(rect.min.extend(z)),
                ..default()
            },
            BarSegment { layer, part },
            LoadingScreenEntity,
        ));
    }

    let button = layout.button_rect(world);
    commands.spawn((
        SpriteBundle {
            sprite: Sprite {
                custom_size: Some(button.size()),
                anchor: Anchor::BottomLeft,
                ..default()
            },
            texture: assets.play.clone(),
            transform: Transform::from_translation(button.min.extend(BACKGROUND_Z)),
            visibility: Visibility::Hidden,
            ..default()
        },
        PlayButton,
        LoadingScreenEntity,
    ));

    // the loading screen's own textures are already in, but they still count
    let game_assets = GameAssets::load(&asset_server);
    let mut queue = LoadQueue::default();
    queue.push(assets.splash.clone());
    queue.push(assets.play.clone());
    queue.push(assets.progress.clone());
    game_assets.queue(&mut queue);

    info!("loading {} assets", queue.len());

    commands.insert_resource(layout);
    commands.insert_resource(ProgressAtlas(atlas));
    commands.insert_resource(queue);
    commands.insert_resource(LoadProgress::default());
    commands.insert_resource(game_assets);
}

/// Lays out the progress bar, or shows the play button once loaded.
pub fn draw_loading_screen(
    progress: Res<LoadProgress>,
    layout: Res<ScreenLayout>,
    viewport: Res<WorldViewport>,
    mut segments: Query<(&BarSegment, &mut Sprite, &mut Transform, &mut Visibility)>,
    mut buttons: Query<
        (&mut Sprite, &mut Transform, &mut Visibility),
        (With<PlayButton>, Without<BarSegment>),
    >,
) {
    // nothing moved, leave the sprites' change ticks alone
    if !(progress.is_changed() || layout.is_changed() || viewport.is_changed()) {
        return;
    }

    let world = viewport.size();
    let ready = progress.phase() == LoadingPhase::Ready;
    let bar = layout.bar_geometry(world, progress.fraction());

    for (segment, mut sprite, mut transform, mut visibility) in segments.iter_mut() {
        let rect = bar.segment(segment.layer, segment.part).filter(|_| !ready);

        if let Some(rect) = rect {
            sprite.custom_size = Some(rect.size());
            transform.translation = rect.min.extend(transform.translation.z);
            *visibility = Visibility::Inherited;
        } else {
            *visibility = Visibility::Hidden;
        }
    }

    let button = layout.button_rect(world);
    for (mut sprite, mut transform, mut visibility) in buttons.iter_mut() {
        sprite.custom_size = Some(button.size());
        transform.translation = button.min.extend(transform.translation.z);
        *visibility = if ready {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

/// Tears down the loading screen.
///
/// The loading screen's handles are dropped here, so its textures unload.
/// [`GameAssets`] is left alone for the game to use.
pub fn dispose_loading_screen(
    entities: Query<Entity, With<LoadingScreenEntity>>,
    mut commands: Commands,
) {
    for entity in entities.iter() {
        commands.entity(entity).despawn_recursive();
    }

    commands.remove_resource::<LoadingScreenAssets>();
    commands.remove_resource::<ProgressAtlas>();
    commands.remove_resource::<ScreenLayout>();
    commands.remove_resource::<LoadQueue>();
    commands.remove_resource::<LoadProgress>();
}
