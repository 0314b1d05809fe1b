#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Star Taxi adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use star_taxi_core::{Appearance, EntitySnapshot, FrameInput, ScreenBounds};
use std::{error::Error, fmt, ops::ControlFlow, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with a different alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Colors assigned to every appearance and overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Body of the working taxi.
    pub taxi: Color,
    /// Wreck left behind after a crash.
    pub explosion: Color,
    /// Ordinary planets.
    pub planet: Color,
    /// The planet the taxi must reach next.
    pub destination: Color,
    /// Collectable gas clouds.
    pub gas_cloud: Color,
    /// Warp stars.
    pub warp_star: Color,
    /// HUD status text.
    pub hud_text: Color,
    /// Transition banner text.
    pub banner_text: Color,
}

impl Palette {
    /// Color used to draw an entity with the given appearance.
    #[must_use]
    pub const fn color_for(&self, appearance: Appearance) -> Color {
        match appearance {
            Appearance::Taxi => self.taxi,
            Appearance::Explosion => self.explosion,
            Appearance::Planet => self.planet,
            Appearance::Destination => self.destination,
            Appearance::GasCloud => self.gas_cloud,
            Appearance::WarpStar => self.warp_star,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            taxi: Color::from_rgb_u8(0xff, 0xc1, 0x07),
            explosion: Color::from_rgb_u8(0xff, 0x57, 0x22),
            planet: Color::from_rgb_u8(0x4a, 0x6f, 0xa5),
            destination: Color::from_rgb_u8(0x4c, 0xaf, 0x50),
            gas_cloud: Color::from_rgb_u8(0xb3, 0x9d, 0xdb).with_alpha(0.8),
            warp_star: Color::from_rgb_u8(0xff, 0xff, 0xff),
            hud_text: Color::from_rgb_u8(0xe0, 0xe0, 0xe0),
            banner_text: Color::from_rgb_u8(0xff, 0xff, 0xff),
        }
    }
}

/// Drawable body positioned in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpritePresentation {
    /// Visual identity the backend should draw.
    pub appearance: Appearance,
    /// Centre of the sprite in screen space.
    pub position: Vec2,
    /// Facing in radians, counter-clockwise as seen on screen.
    pub heading: f32,
    /// Radius of the sprite's bounding circle.
    pub radius: f32,
    /// Fill color resolved from the palette.
    pub color: Color,
}

impl SpritePresentation {
    /// Creates a sprite descriptor from an entity snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &EntitySnapshot, palette: &Palette) -> Self {
        Self {
            appearance: snapshot.appearance,
            position: snapshot.position,
            heading: snapshot.heading.radians(),
            radius: snapshot.radius,
            color: palette.color_for(snapshot.appearance),
        }
    }

    /// Screen-space unit vector pointing along the sprite's heading.
    #[must_use]
    pub fn facing(&self) -> Vec2 {
        Vec2::new(self.heading.cos(), -self.heading.sin())
    }
}

/// Scene description combining the play area, its sprites and the text overlays.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Fixed play area that backends fit into the window.
    pub bounds: ScreenBounds,
    /// Sprites drawn back to front.
    pub sprites: Vec<SpritePresentation>,
    /// Status text drawn in the upper-left corner.
    pub hud: String,
    /// Centred message shown between levels.
    pub banner: Option<String>,
}

impl Scene {
    /// Creates an empty scene covering `bounds`.
    ///
    /// Returns an error when either dimension is zero.
    pub fn new(bounds: ScreenBounds) -> std::result::Result<Self, RenderingError> {
        if bounds.width() == 0 || bounds.height() == 0 {
            return Err(RenderingError::EmptyBounds {
                width: bounds.width(),
                height: bounds.height(),
            });
        }

        Ok(Self {
            bounds,
            sprites: Vec::new(),
            hud: String::new(),
            banner: None,
        })
    }

    /// Replaces the sprites with fresh snapshots colored by `palette`.
    pub fn set_sprites<'a, I>(&mut self, snapshots: I, palette: &Palette)
    where
        I: IntoIterator<Item = &'a EntitySnapshot>,
    {
        self.sprites.clear();
        self.sprites.extend(
            snapshots
                .into_iter()
                .map(|snapshot| SpritePresentation::from_snapshot(snapshot, palette)),
        );
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Colors used for text overlays.
    pub palette: Palette,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, palette: Palette, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            palette,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Star Taxi scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and mutates the scene before it is
    /// rendered. Returning [`ControlFlow::Break`] closes the window.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> ControlFlow<()> + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The play area must have a positive size to be fitted into a window.
    EmptyBounds {
        /// Provided width in pixels.
        width: u32,
        /// Provided height in pixels.
        height: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBounds { width, height } => {
                write!(f, "scene bounds must be non-empty (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}
