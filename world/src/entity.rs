use std::time::Duration;

use rand::Rng;
use star_taxi_core::{Appearance, Circle, EntitySnapshot, Heading, ScreenBounds, Vec2};

/// Position, facing and bounding circle shared by every game object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    position: Vec2,
    heading: Heading,
    radius: f32,
}

impl Body {
    /// Creates a body at `position` facing `heading`.
    #[must_use]
    pub const fn new(position: Vec2, heading: Heading, radius: f32) -> Self {
        Self {
            position,
            heading,
            radius,
        }
    }

    /// Centre of the body in screen space.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current facing of the body.
    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    /// Radius of the bounding circle.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Bounding circle used for collision tests.
    #[must_use]
    pub const fn shape(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    /// Boundary-inclusive overlap test against another body.
    #[must_use]
    pub fn overlaps(&self, other: &Body) -> bool {
        self.shape().overlaps(&other.shape())
    }

    /// Reports whether the body's shape covers `point`.
    #[must_use]
    pub fn covers(&self, point: Vec2) -> bool {
        self.shape().contains(point)
    }

    pub(crate) fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub(crate) fn set_heading(&mut self, heading: Heading) {
        self.heading = heading;
    }

    pub(crate) fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    pub(crate) fn wrap(&mut self, bounds: ScreenBounds) {
        self.position = bounds.wrap(self.position);
    }
}

/// Capabilities shared by every object that lives in a level.
pub trait Entity {
    /// Physical state of the entity.
    fn body(&self) -> &Body;

    /// Visual identity the entity currently requests.
    fn appearance(&self) -> Appearance;

    /// Bounding circle used for collision tests.
    fn shape(&self) -> Circle {
        self.body().shape()
    }

    /// Captures what the presentation layer needs to draw the entity.
    fn snapshot(&self) -> EntitySnapshot {
        let body = self.body();
        EntitySnapshot {
            appearance: self.appearance(),
            position: body.position(),
            heading: body.heading(),
            radius: body.radius(),
        }
    }
}

/// Passive entities that advance on their own each frame, independent of input.
pub trait Scenery: Entity {
    /// Advances cosmetic state by `elapsed`.
    fn update(&mut self, elapsed: Duration);
}

/// Converts a frame delta into the millisecond scale used by every speed constant.
pub(crate) fn millis(elapsed: Duration) -> f32 {
    elapsed.as_secs_f32() * 1_000.0
}

/// Samples a whole-pixel position uniformly within the screen.
pub(crate) fn random_point<R>(rng: &mut R, bounds: ScreenBounds) -> Vec2
where
    R: Rng + ?Sized,
{
    let x = if bounds.width() == 0 {
        0
    } else {
        rng.gen_range(0..bounds.width())
    };
    let y = if bounds.height() == 0 {
        0
    } else {
        rng.gen_range(0..bounds.height())
    };
    Vec2::new(x as f32, y as f32)
}
