//! The world camera.

use bevy::{prelude::*, render::camera::ScalingMode, window::WindowResized};

/// Viewport plugin.
pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorldViewport>()
            .insert_resource(ClearColor(Color::BLACK))
            .add_systems(Startup, spawn_world_camera)
            .add_systems(PostUpdate, fit_camera_to_viewport);
    }
}

/// The logical world rectangle, in world units.
///
/// The bottom left of the world is at the origin. However big the window is,
/// the whole world stays in view.
#[derive(Clone, Copy, Debug, PartialEq, Resource)]
pub struct WorldViewport {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldViewport {
    fn default() -> Self {
        WorldViewport {
            width: 16.,
            height: 10.,
        }
    }
}

impl WorldViewport {
    /// The world size as a vector.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Fits a camera to the world and centers it.
    pub fn fit(&self, projection: &mut OrthographicProjection, transform: &mut Transform) {
        projection.scaling_mode = ScalingMode::AutoMin {
            min_width: self.width,
            min_height: self.height,
        };

        transform.translation.x = self.width / 2.;
        transform.translation.y = self.height / 2.;
    }
}

/// Marks the camera that looks at the world.
#[derive(Clone, Component, Debug, Default)]
pub struct WorldCamera;

pub fn spawn_world_camera(viewport: Res<WorldViewport>, mut commands: Commands) {
    let mut camera = Camera2dBundle::default();
    viewport.fit(&mut camera.projection, &mut camera.transform);

    commands.spawn((camera, WorldCamera));
}

/// Refits the camera when the window is resized or the world changes size.
pub fn fit_camera_to_viewport(
    viewport: Res<WorldViewport>,
    mut resized: EventReader<WindowResized>,
    mut cameras: Query<(&mut OrthographicProjection, &mut Transform), With<WorldCamera>>,
) {
    let mut refit = viewport.is_changed();

    for event in resized.read() {
        debug!("window resized to {}x{}", event.width, event.height);
        refit = true;
    }

    if !refit {
        return;
    }

    for (mut projection, mut transform) in cameras.iter_mut() {
        viewport.fit(&mut projection, &mut transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_centers_camera_on_world() {
        let viewport = WorldViewport {
            width: 20.,
            height: 12.,
        };
        let mut projection = OrthographicProjection::default();
        let mut transform = Transform::from_xyz(-3., 4., 999.9);

        viewport.fit(&mut projection, &mut transform);

        assert_eq!(transform.translation, Vec3::new(10., 6., 999.9));
        assert!(matches!(
            projection.scaling_mode,
            ScalingMode::AutoMin { min_width, min_height } if min_width == 20. && min_height == 12.
        ));
    }

    #[test]
    fn refits_after_world_changes() {
        let mut world = World::new();
        world.init_resource::<WorldViewport>();
        world.init_resource::<Events<WindowResized>>();
        let camera = world
            .spawn((
                OrthographicProjection::default(),
                Transform::default(),
                WorldCamera,
            ))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(fit_camera_to_viewport);
        schedule.run(&mut world);

        assert_eq!(
            world.get::<Transform>(camera).unwrap().translation.truncate(),
            Vec2::new(8., 5.)
        );

        world.resource_mut::<WorldViewport>().width = 32.;
        schedule.run(&mut world);

        assert_eq!(
            world.get::<Transform>(camera).unwrap().translation.x,
            16.
        );
    }
}
