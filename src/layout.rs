//! Loading screen geometry.
//!
//! Everything here is in world units except [`AtlasRegions`], which is in
//! texture pixels. The world origin is the bottom left corner of the
//! [`WorldViewport`](crate::viewport::WorldViewport), with `y` going up.

use bevy::asset::{io::Reader, AssetLoader, AsyncReadExt, LoadContext};
use bevy::prelude::*;
use bevy::utils::BoxedFuture;

use serde::{Deserialize, Serialize};

use std::fmt::{self, Display, Formatter};

/// Layout plugin.
pub struct LayoutPlugin;

impl Plugin for LayoutPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<ScreenLayout>()
            .init_asset_loader::<LayoutLoader>();
    }
}

/// An asset loader for screen layouts.
#[derive(Default)]
pub struct LayoutLoader;

impl AssetLoader for LayoutLoader {
    type Asset = ScreenLayout;
    type Settings = ();
    type Error = LayoutLoadError;

    fn load<'a>(
        &'a self,
        reader: &'a mut Reader,
        _settings: &'a Self::Settings,
        _load_context: &'a mut LoadContext,
    ) -> BoxedFuture<'a, Result<ScreenLayout, Self::Error>> {
        Box::pin(async move {
            let mut contents = String::new();
            reader.read_to_string(&mut contents).await?;

            Ok(ron::from_str::<ScreenLayout>(&contents)?)
        })
    }

    fn extensions(&self) -> &[&str] {
        &["ron"]
    }
}

/// An error from layout loading.
#[derive(Debug)]
pub enum LayoutLoadError {
    Io(std::io::Error),
    Ron(ron::error::SpannedError),
}

impl From<std::io::Error> for LayoutLoadError {
    fn from(value: std::io::Error) -> Self {
        LayoutLoadError::Io(value)
    }
}

impl From<ron::error::SpannedError> for LayoutLoadError {
    fn from(value: ron::error::SpannedError) -> Self {
        LayoutLoadError::Ron(value)
    }
}

impl Display for LayoutLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LayoutLoadError::Io(io) => Display::fmt(io, f),
            LayoutLoadError::Ron(ron) => Display::fmt(ron, f),
        }
    }
}

impl std::error::Error for LayoutLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayoutLoadError::Io(e) => Some(e),
            LayoutLoadError::Ron(e) => Some(e),
        }
    }
}

/// Placement of the loading screen's progress bar and play button.
///
/// This is loaded as an asset, then copied into a resource for as long as the
/// loading screen is up. [`ScreenLayout::default`] is the stock layout that
/// ships in `assets/loading/layout.ron`.
#[derive(Asset, Clone, Debug, Default, Deserialize, PartialEq, Resource, Serialize, TypePath)]
pub struct ScreenLayout {
    #[serde(default)]
    pub bar: BarLayout,
    #[serde(default)]
    pub button: ButtonLayout,
    #[serde(default)]
    pub atlas: AtlasRegions,
}

/// The progress bar, centered horizontally.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BarLayout {
    pub width: f32,
    pub height: f32,
    /// Width of each end cap.
    pub cap_width: f32,
    /// Bottom of the bar as a fraction of the world height.
    pub y: f32,
}

impl Default for BarLayout {
    fn default() -> Self {
        BarLayout {
            width: 12.,
            height: 1.,
            cap_width: 1.,
            y: 0.2,
        }
    }
}

/// The play button, centered horizontally.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ButtonLayout {
    pub width: f32,
    pub height: f32,
    /// Bottom of the button as a fraction of the world height.
    pub y: f32,
}

impl Default for ButtonLayout {
    fn default() -> Self {
        ButtonLayout {
            width: 4.,
            height: 4.,
            y: 0.1,
        }
    }
}

/// Pixel layout of the progress bar sprite sheet.
///
/// The sheet has two rows of equal height. The top row is the empty bar, the
/// bottom row is the filled bar, and each row is a left cap, a stretchable
/// middle and a right cap, left to right.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AtlasRegions {
    pub cap_width: u32,
    pub middle_width: u32,
    pub row_height: u32,
}

impl Default for AtlasRegions {
    fn default() -> Self {
        AtlasRegions {
            cap_width: 24,
            middle_width: 272,
            row_height: 45,
        }
    }
}

impl AtlasRegions {
    /// The smallest texture the regions fit in.
    pub fn size(&self) -> UVec2 {
        UVec2::new(
            self.cap_width * 2 + self.middle_width,
            self.row_height * 2,
        )
    }

    /// The pixel rect of a segment.
    pub fn region(&self, layer: BarLayer, part: BarPart) -> Rect {
        let y = match layer {
            BarLayer::Background => 0,
            BarLayer::Foreground => self.row_height,
        };
        let (x, width) = match part {
            BarPart::LeftCap => (0, self.cap_width),
            BarPart::Fill => (self.cap_width, self.middle_width),
            BarPart::RightCap => (self.cap_width + self.middle_width, self.cap_width),
        };

        Rect::new(
            x as f32,
            y as f32,
            (x + width) as f32,
            (y + self.row_height) as f32,
        )
    }

    /// Builds a [`TextureAtlasLayout`] with the segments at the indices given
    /// by [`atlas_index`].
    pub fn texture_atlas_layout(&self) -> TextureAtlasLayout {
        let mut layout = TextureAtlasLayout::new_empty(self.size().as_vec2());

        for (layer, part) in segments() {
            let index = layout.add_texture(self.region(layer, part));
            debug_assert_eq!(index, atlas_index(layer, part));
        }

        layout
    }
}

/// Which row of the progress bar a segment belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BarLayer {
    /// The empty bar, always drawn in full.
    Background,
    /// The filled part of the bar, drawn over the background.
    Foreground,
}

/// Which third of the progress bar a segment is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BarPart {
    LeftCap,
    Fill,
    RightCap,
}

/// All six segments, background first, each left to right.
pub fn segments() -> impl Iterator<Item = (BarLayer, BarPart)> {
    [BarLayer::Background, BarLayer::Foreground]
        .into_iter()
        .flat_map(|layer| {
            [BarPart::LeftCap, BarPart::Fill, BarPart::RightCap]
                .into_iter()
                .map(move |part| (layer, part))
        })
}

/// Index of a segment in the progress bar [`TextureAtlasLayout`].
pub fn atlas_index(layer: BarLayer, part: BarPart) -> usize {
    let row = match layer {
        BarLayer::Background => 0,
        BarLayer::Foreground => 3,
    };
    let column = match part {
        BarPart::LeftCap => 0,
        BarPart::Fill => 1,
        BarPart::RightCap => 2,
    };

    row + column
}

/// Where each progress bar segment goes for some amount of progress.
#[derive(Clone, Debug, PartialEq)]
pub struct BarGeometry {
    /// Left cap, middle and right cap of the empty bar.
    pub background: [Rect; 3],
    pub fore_left: Rect,
    /// `None` when nothing has loaded yet.
    pub fore_fill: Option<Rect>,
    pub fore_right: Rect,
}

impl BarGeometry {
    /// The rect of a single segment, or `None` if it should not be drawn.
    pub fn segment(&self, layer: BarLayer, part: BarPart) -> Option<Rect> {
        match (layer, part) {
            (BarLayer::Background, BarPart::LeftCap) => Some(self.background[0]),
            (BarLayer::Background, BarPart::Fill) => Some(self.background[1]),
            (BarLayer::Background, BarPart::RightCap) => Some(self.background[2]),
            (BarLayer::Foreground, BarPart::LeftCap) => Some(self.fore_left),
            (BarLayer::Foreground, BarPart::Fill) => self.fore_fill,
            (BarLayer::Foreground, BarPart::RightCap) => Some(self.fore_right),
        }
    }
}

impl ScreenLayout {
    /// Bottom left corner of the progress bar.
    pub fn bar_origin(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x / 2. - self.bar.width / 2., world.y * self.bar.y)
    }

    /// How wide the foreground fill is for `progress` in `[0, 1]`.
    pub fn fill_width(&self, progress: f32) -> f32 {
        progress.clamp(0., 1.) * (self.bar.width - 2. * self.bar.cap_width)
    }

    /// Lays out the progress bar.
    pub fn bar_geometry(&self, world: Vec2, progress: f32) -> BarGeometry {
        let BarLayout {
            width,
            height,
            cap_width,
            ..
        } = self.bar;

        let origin = self.bar_origin(world);
        let rect = |x: f32, w: f32| Rect::new(x, origin.y, x + w, origin.y + height);

        let fill_x = origin.x + cap_width;
        let fill_width = self.fill_width(progress);

        let background = [
            rect(origin.x, cap_width),
            rect(fill_x, width - 2. * cap_width),
            rect(origin.x + width - cap_width, cap_width),
        ];

        // with nothing loaded the caps touch
        let (fore_fill, fore_right) = if progress > 0. {
            (
                Some(rect(fill_x, fill_width)),
                rect(fill_x + fill_width, cap_width),
            )
        } else {
            (None, rect(fill_x, cap_width))
        };

        BarGeometry {
            background,
            fore_left: rect(origin.x, cap_width),
            fore_fill,
            fore_right,
        }
    }

    /// The play button. Also its hitbox.
    pub fn button_rect(&self, world: Vec2) -> Rect {
        let min = Vec2::new(world.x / 2. - self.button.width / 2., world.y * self.button.y);

        Rect::from_corners(min, min + Vec2::new(self.button.width, self.button.height))
    }

    /// Whether `point` hits the play button. Edges count.
    pub fn button_contains(&self, world: Vec2, point: Vec2) -> bool {
        let rect = self.button_rect(world);

        point.x >= rect.min.x
            && point.x <= rect.max.x
            && point.y >= rect.min.y
            && point.y <= rect.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: Vec2 = Vec2::new(16., 10.);

    #[test]
    fn shipped_layout_is_default() {
        let layout: ScreenLayout =
            ron::from_str(include_str!("../assets/loading/layout.ron")).unwrap();

        assert_eq!(layout, ScreenLayout::default());
    }

    #[test]
    fn missing_sections_fall_back_to_default() {
        let layout: ScreenLayout =
            ron::from_str("(button: (width: 2.0, height: 2.0, y: 0.5))").unwrap();

        assert_eq!(layout.bar, BarLayout::default());
        assert_eq!(layout.button.width, 2.);
    }

    #[test]
    fn atlas_regions_match_sheet() {
        let atlas = AtlasRegions::default();

        assert_eq!(atlas.size(), UVec2::new(320, 90));
        assert_eq!(
            atlas.region(BarLayer::Background, BarPart::LeftCap),
            Rect::new(0., 0., 24., 45.)
        );
        assert_eq!(
            atlas.region(BarLayer::Background, BarPart::Fill),
            Rect::new(24., 0., 296., 45.)
        );
        assert_eq!(
            atlas.region(BarLayer::Foreground, BarPart::RightCap),
            Rect::new(296., 45., 320., 90.)
        );
    }

    #[test]
    fn atlas_layout_indices() {
        let atlas = AtlasRegions::default();
        let layout = atlas.texture_atlas_layout();

        assert_eq!(layout.len(), 6);
        for (layer, part) in segments() {
            assert_eq!(
                layout.textures[atlas_index(layer, part)],
                atlas.region(layer, part)
            );
        }
    }

    #[test]
    fn fill_width_scales_interior() {
        let layout = ScreenLayout::default();

        assert_eq!(layout.fill_width(0.), 0.);
        assert_eq!(layout.fill_width(0.5), 5.);
        assert_eq!(layout.fill_width(1.), 10.);
        assert_eq!(layout.fill_width(0.25), 2.5);
    }

    #[test]
    fn background_spans_whole_bar() {
        let layout = ScreenLayout::default();
        let bar = layout.bar_geometry(WORLD, 0.3);

        assert_eq!(bar.background[0], Rect::new(2., 2., 3., 3.));
        assert_eq!(bar.background[1], Rect::new(3., 2., 13., 3.));
        assert_eq!(bar.background[2], Rect::new(13., 2., 14., 3.));
    }

    #[test]
    fn empty_bar_caps_touch() {
        let layout = ScreenLayout::default();
        let bar = layout.bar_geometry(WORLD, 0.);

        assert_eq!(bar.fore_fill, None);
        assert_eq!(bar.fore_left, Rect::new(2., 2., 3., 3.));
        assert_eq!(bar.fore_right, Rect::new(3., 2., 4., 3.));
        assert_eq!(bar.segment(BarLayer::Foreground, BarPart::Fill), None);
    }

    #[test]
    fn half_loaded_bar() {
        let layout = ScreenLayout::default();
        let center_x = WORLD.x / 2.;
        let bar = layout.bar_geometry(WORLD, 0.5);

        let fill = bar.fore_fill.unwrap();
        assert_eq!(fill.min.x, center_x - 5.);
        assert_eq!(fill.width(), 5.);
        assert_eq!(bar.fore_right.min.x, center_x);
        assert_eq!(bar.fore_right.width(), 1.);
    }

    #[test]
    fn full_bar_covers_interior() {
        let layout = ScreenLayout::default();
        let bar = layout.bar_geometry(WORLD, 1.);

        assert_eq!(bar.fore_fill, Some(bar.background[1]));
        assert_eq!(bar.fore_right, bar.background[2]);
    }

    #[test]
    fn button_rect_position() {
        let layout = ScreenLayout::default();

        assert_eq!(layout.button_rect(WORLD), Rect::new(6., 1., 10., 5.));
    }

    #[test]
    fn button_edges_are_inclusive() {
        let layout = ScreenLayout::default();
        let rect = layout.button_rect(WORLD);

        for corner in [
            rect.min,
            rect.max,
            Vec2::new(rect.min.x, rect.max.y),
            Vec2::new(rect.max.x, rect.min.y),
        ] {
            assert!(layout.button_contains(WORLD, corner), "{:?}", corner);
        }

        assert!(layout.button_contains(WORLD, Vec2::new(8., 1.)));
    }

    #[test]
    fn button_misses_outside() {
        let layout = ScreenLayout::default();
        let rect = layout.button_rect(WORLD);
        let center = rect.center();

        for miss in [
            Vec2::new(rect.min.x - 1., center.y),
            Vec2::new(rect.max.x + 1., center.y),
            Vec2::new(center.x, rect.min.y - 1.),
            Vec2::new(center.x, rect.max.y + 1.),
        ] {
            assert!(!layout.button_contains(WORLD, miss), "{:?}", miss);
        }
    }
}
