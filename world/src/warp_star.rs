use std::time::Duration;

use rand::Rng;
use star_taxi_core::{
    Appearance, FrameInput, Heading, Navigation, ScreenBounds, Vec2, WarpStarTuning,
};

use crate::{
    entity::{random_point, Body, Entity, Scenery},
    taxi::Taxi,
};

/// Stationary waypoint that launches the taxi into warp travel when clicked.
#[derive(Clone, Debug)]
pub struct WarpStar {
    body: Body,
}

impl WarpStar {
    /// Creates a warp star at `position`.
    #[must_use]
    pub fn new(position: Vec2, tuning: &WarpStarTuning) -> Self {
        Self {
            body: Body::new(position, Heading::EAST, tuning.radius),
        }
    }

    /// Creates a warp star at a uniformly random whole-pixel position.
    pub fn random<R>(rng: &mut R, bounds: ScreenBounds, tuning: &WarpStarTuning) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(random_point(rng, bounds), tuning)
    }

    /// Sends the taxi into warp when the pointer trigger fires over this star.
    ///
    /// The taxi needs fuel left in the tank. The warp heading is the star's own
    /// position read as a direction vector from the screen origin, so every
    /// star launches the taxi along a fixed course regardless of where the
    /// taxi currently is.
    pub fn handle_navigation(&self, taxi: &mut Taxi, input: &FrameInput) -> Navigation {
        if input.trigger_pressed() && taxi.fuel() > 0.0 && self.body.covers(input.pointer) {
            taxi.engage_warp(self.body.position())
        } else {
            Navigation::Ignored
        }
    }
}

impl Entity for WarpStar {
    fn body(&self) -> &Body {
        &self.body
    }

    fn appearance(&self) -> Appearance {
        Appearance::WarpStar
    }
}

impl Scenery for WarpStar {
    fn update(&mut self, _elapsed: Duration) {}
}
