//! Load progress tracking.

use bevy::asset::{AssetPath, RecursiveDependencyLoadState, UntypedHandle};
use bevy::prelude::*;

use std::fmt::{self, Display, Formatter};

use crate::GameState;

/// Every asset the loading screen waits on, in the order they were queued.
///
/// The handles are strong, so this keeps everything in it alive.
#[derive(Clone, Debug, Default, Resource)]
pub struct LoadQueue {
    handles: Vec<UntypedHandle>,
}

impl LoadQueue {
    /// Queues a handle.
    pub fn push(&mut self, handle: impl Into<UntypedHandle>) {
        self.handles.push(handle.into());
    }

    /// How many assets are queued.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// The queued handles, oldest first.
    pub fn handles(&self) -> &[UntypedHandle] {
        &self.handles
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Checks the queue against the asset server.
    ///
    /// An asset only counts as loaded once all of its dependencies have also
    /// loaded.
    pub fn status(&self, asset_server: &AssetServer) -> Result<QueueStatus, AssetLoadError> {
        let status = QueueStatus::tally(self.handles.iter().map(|handle| {
            asset_server
                .get_recursive_dependency_load_state(handle.id())
                .unwrap_or(RecursiveDependencyLoadState::NotLoaded)
        }));

        match status.failed {
            Some(index) => Err(AssetLoadError {
                path: self.handles[index].path().cloned(),
            }),
            None => Ok(status),
        }
    }
}

/// A snapshot of a [`LoadQueue`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueStatus {
    pub loaded: usize,
    pub total: usize,
    /// Index of the first asset that failed to load.
    pub failed: Option<usize>,
}

impl QueueStatus {
    /// Counts up load states.
    pub fn tally(states: impl IntoIterator<Item = RecursiveDependencyLoadState>) -> QueueStatus {
        let mut status = QueueStatus::default();

        for (i, state) in states.into_iter().enumerate() {
            status.total += 1;

            match state {
                RecursiveDependencyLoadState::Loaded => status.loaded += 1,
                RecursiveDependencyLoadState::Failed => {
                    status.failed.get_or_insert(i);
                }
                _ => (),
            }
        }

        status
    }

    /// Fraction of assets loaded, `1.0` if nothing is queued.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.
        } else {
            self.loaded as f32 / self.total as f32
        }
    }
}

/// An asset in a [`LoadQueue`] failed to load.
#[derive(Clone, Debug)]
pub struct AssetLoadError {
    pub path: Option<AssetPath<'static>>,
}

impl Display for AssetLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "failed to load asset {}", path),
            None => f.write_str("failed to load asset"),
        }
    }
}

impl std::error::Error for AssetLoadError {}

/// How far along the [`LoadQueue`] is, from `0.0` to `1.0`.
///
/// This follows the queue directly; it is not smoothed between frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Resource)]
pub struct LoadProgress(f32);

impl LoadProgress {
    /// Creates a new `LoadProgress`.
    pub fn new(fraction: f32) -> LoadProgress {
        LoadProgress(fraction.clamp(0., 1.))
    }

    /// The loaded fraction.
    pub fn fraction(&self) -> f32 {
        self.0
    }

    /// The phase of the loading screen at this progress.
    pub fn phase(&self) -> LoadingPhase {
        if self.0 >= 1. {
            LoadingPhase::Ready
        } else {
            LoadingPhase::Loading
        }
    }
}

/// What the loading screen is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoadingPhase {
    /// Assets are still loading. The progress bar is up.
    #[default]
    Loading,
    /// Everything is loaded. The play button is up and takes input.
    Ready,
}

/// Updates [`LoadProgress`] from the [`LoadQueue`].
pub fn track_load_progress(
    queue: Res<LoadQueue>,
    asset_server: Res<AssetServer>,
    mut progress: ResMut<LoadProgress>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    match queue.status(&asset_server) {
        Ok(status) => {
            let next = LoadProgress::new(status.fraction());

            if next.phase() != progress.phase() {
                info!("loaded {}/{} assets", status.loaded, status.total);
            }

            // only touch the resource on change so change detection works
            if next != *progress {
                *progress = next;
            }
        }
        Err(err) => {
            error!("{}", err);
            next_state.set(GameState::LoadFailed);
        }
    }
}
