#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Star Taxi engine.
//!
//! This crate defines the vocabulary that connects the adapters with the
//! authoritative world. Adapters capture a [`FrameInput`] once per frame and
//! hand it to the world together with the elapsed time. The world answers
//! every interaction with an explicit outcome value ([`LevelOutcome`],
//! [`Landing`], [`Fueling`], [`Navigation`], [`TaxiReport`]) instead of
//! boolean flags, so callers can match exhaustively on what happened.

mod tuning;

use std::f32::consts::{FRAC_PI_2, PI};

pub use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use tuning::{
    GasCloudTuning, GenerationTuning, PlanetTuning, TaxiTuning, Tuning, WarpStarTuning,
};

/// Fuel levels strictly below this threshold count as exhausted.
pub const FUEL_EXHAUSTION_THRESHOLD: f32 = 1e-6;

/// Result of advancing a level by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelOutcome {
    /// The level keeps running; call `update` again next frame.
    Continue,
    /// Every destination was reached; the caller should start the next level.
    Advance,
    /// The player confirmed the end of the game.
    Quit,
}

/// Signal reported by the taxi after consuming a frame of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaxiReport {
    /// The taxi keeps flying (or keeps waiting for confirmation).
    Continue,
    /// The player confirmed quitting after running dry or crashing.
    Quit,
}

/// Result of testing the taxi against a planet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Landing {
    /// Nothing happened.
    Clear,
    /// The taxi touched the destination planet at thruster speed, completing a leg.
    Arrived,
    /// The taxi hit the planet while travelling at warp and is now wrecked.
    Crashed,
}

/// Result of testing the taxi against a gas cloud.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fueling {
    /// The taxi did not collect the cloud.
    Missed,
    /// The cloud was collected and granted fuel.
    Collected {
        /// Fuel added to the taxi's tank.
        bonus: f32,
    },
}

/// Result of offering a warp star's jump to the taxi.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// The trigger conditions were not met.
    Ignored,
    /// The taxi entered warp travel.
    Engaged,
}

/// Visual identity requested by an entity when presenting itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Appearance {
    /// The player's taxi in working order.
    Taxi,
    /// The wreck left behind after a warp crash.
    Explosion,
    /// A planet that is not the current destination.
    Planet,
    /// The planet the taxi must land on next.
    Destination,
    /// A collectable fuel cloud.
    GasCloud,
    /// A warp star that can launch the taxi into warp travel.
    WarpStar,
}

/// Immutable representation of an entity used by presentation layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Visual identity the entity currently requests.
    pub appearance: Appearance,
    /// Centre of the entity in screen space.
    pub position: Vec2,
    /// Facing of the entity.
    pub heading: Heading,
    /// Radius of the entity's bounding circle.
    pub radius: f32,
}

/// Facing direction expressed in radians.
///
/// Angles grow counter-clockwise as seen on screen. Because screen-space `y`
/// grows downward, [`Heading::NORTH`] moves toward smaller `y` values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Heading(f32);

impl Heading {
    /// Facing toward increasing `x`.
    pub const EAST: Self = Self(0.0);
    /// Facing toward decreasing `y`.
    pub const NORTH: Self = Self(FRAC_PI_2);
    /// Facing toward decreasing `x`.
    pub const WEST: Self = Self(PI);
    /// Facing toward increasing `y`.
    pub const SOUTH: Self = Self(PI + FRAC_PI_2);

    /// Creates a heading from an angle in radians.
    #[must_use]
    pub const fn from_radians(radians: f32) -> Self {
        Self(radians)
    }

    /// Derives the heading pointing along the provided screen-space vector.
    ///
    /// A zero vector yields [`Heading::EAST`].
    #[must_use]
    pub fn from_vector(vector: Vec2) -> Self {
        Self((-vector.y).atan2(vector.x))
    }

    /// Angle of the heading in radians.
    #[must_use]
    pub const fn radians(self) -> f32 {
        self.0
    }

    /// Unit-length screen-space direction of the heading.
    #[must_use]
    pub fn unit_vector(self) -> Vec2 {
        Vec2::new(self.0.cos(), -self.0.sin())
    }

    /// Returns the heading turned by `delta` radians.
    #[must_use]
    pub fn rotated(self, delta: f32) -> Self {
        Self(self.0 + delta)
    }
}

/// Dimensions of the playable screen measured in whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenBounds {
    width: u32,
    height: u32,
}

impl Default for ScreenBounds {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl ScreenBounds {
    /// Creates bounds of the provided size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the screen in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the screen in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Size of the screen as a floating point vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Centre of the screen rounded down to whole pixels.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.width / 2) as f32, (self.height / 2) as f32)
    }

    /// Reports whether the point lies within `[0, width) × [0, height)`.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0
            && point.y >= 0.0
            && point.x < self.width as f32
            && point.y < self.height as f32
    }

    /// Wraps the point onto the toroidal screen.
    ///
    /// Negative coordinates and offsets spanning several screens wrap
    /// correctly; the result always satisfies [`ScreenBounds::contains`] for
    /// non-empty bounds.
    #[must_use]
    pub fn wrap(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            wrap_axis(point.x, self.width as f32),
            wrap_axis(point.y, self.height as f32),
        )
    }
}

fn wrap_axis(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }

    let wrapped = value.rem_euclid(extent);
    // rem_euclid rounds tiny negative inputs up to `extent` itself.
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

/// Circular bounding shape used for collisions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    /// Centre of the circle in screen space.
    pub center: Vec2,
    /// Radius of the circle in screen units.
    pub radius: f32,
}

impl Circle {
    /// Creates a new circle.
    #[must_use]
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Boundary-inclusive overlap test between two circles.
    #[must_use]
    pub fn overlaps(&self, other: &Circle) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) <= reach * reach
    }

    /// Boundary-inclusive test of whether the point lies inside the circle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }
}

/// Keys and buttons observed by the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Right arrow.
    Right,
    /// Left arrow.
    Left,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Letter `D`, synonym of [`Key::Right`].
    D,
    /// Letter `A`, synonym of [`Key::Left`].
    A,
    /// Letter `W`, synonym of [`Key::Up`].
    W,
    /// Letter `S`, synonym of [`Key::Down`].
    S,
    /// Space bar, used to confirm the end of the game.
    Space,
    /// Primary pointer button, used to trigger warp stars.
    Pointer,
}

impl Key {
    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Compact set of [`Key`] values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeySet(u16);

impl KeySet {
    /// Creates an empty key set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns a copy of the set that additionally contains `key`.
    #[must_use]
    pub const fn with(self, key: Key) -> Self {
        Self(self.0 | key.bit())
    }

    /// Adds `key` to the set.
    pub fn insert(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    /// Reports whether `key` is part of the set.
    #[must_use]
    pub const fn contains(&self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }
}

impl FromIterator<Key> for KeySet {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

/// Input snapshot gathered by adapters before updating the level.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Keys held down during this frame.
    pub held: KeySet,
    /// Keys whose press began during this frame.
    pub pressed: KeySet,
    /// Pointer position expressed in screen space.
    pub pointer: Vec2,
}

impl FrameInput {
    /// Returns a copy of the input with `key` held.
    #[must_use]
    pub const fn holding(mut self, key: Key) -> Self {
        self.held = self.held.with(key);
        self
    }

    /// Returns a copy of the input with `key` pressed this frame.
    #[must_use]
    pub const fn pressing(mut self, key: Key) -> Self {
        self.pressed = self.pressed.with(key);
        self
    }

    /// Returns a copy of the input with the pointer at `pointer`.
    #[must_use]
    pub const fn pointing_at(mut self, pointer: Vec2) -> Self {
        self.pointer = pointer;
        self
    }

    /// Reports whether the confirm key was pressed this frame.
    #[must_use]
    pub const fn confirm_pressed(&self) -> bool {
        self.pressed.contains(Key::Space)
    }

    /// Reports whether the pointer trigger was pressed this frame.
    #[must_use]
    pub const fn trigger_pressed(&self) -> bool {
        self.pressed.contains(Key::Pointer)
    }
}

/// Thruster direction selected from the held directional keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Thrust {
    /// Thrust toward increasing `x`.
    Right,
    /// Thrust toward decreasing `x`.
    Left,
    /// Thrust toward decreasing `y`.
    Up,
    /// Thrust toward increasing `y`.
    Down,
}

impl Thrust {
    /// Order in which held directions are honoured; only the first match applies.
    pub const PRIORITY: [Thrust; 4] = [Thrust::Right, Thrust::Left, Thrust::Up, Thrust::Down];

    /// Selects the single thrust honoured for the held keys, if any.
    #[must_use]
    pub fn resolve(held: &KeySet) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|thrust| thrust.keys().iter().any(|key| held.contains(*key)))
    }

    /// Keys that request this thrust.
    #[must_use]
    pub const fn keys(self) -> [Key; 2] {
        match self {
            Self::Right => [Key::Right, Key::D],
            Self::Left => [Key::Left, Key::A],
            Self::Up => [Key::Up, Key::W],
            Self::Down => [Key::Down, Key::S],
        }
    }

    /// Canonical facing adopted while thrusting in this direction.
    #[must_use]
    pub const fn heading(self) -> Heading {
        match self {
            Self::Right => Heading::EAST,
            Self::Left => Heading::WEST,
            Self::Up => Heading::NORTH,
            Self::Down => Heading::SOUTH,
        }
    }

    /// Screen-space displacement covering `distance` units in this direction.
    #[must_use]
    pub fn offset(self, distance: f32) -> Vec2 {
        match self {
            Self::Right => Vec2::new(distance, 0.0),
            Self::Left => Vec2::new(-distance, 0.0),
            Self::Up => Vec2::new(0.0, -distance),
            Self::Down => Vec2::new(0.0, distance),
        }
    }
}
