use std::time::Duration;

use rand::Rng;
use star_taxi_core::{Appearance, Heading, Landing, PlanetTuning, ScreenBounds, Vec2};
use tracing::warn;

use crate::{
    entity::{random_point, Body, Entity, Scenery},
    taxi::Taxi,
};

/// Stationary obstacle that doubles as a fare destination.
#[derive(Clone, Debug)]
pub struct Planet {
    body: Body,
    is_destination: bool,
}

impl Planet {
    /// Creates a planet at `position`.
    #[must_use]
    pub fn new(position: Vec2, tuning: &PlanetTuning) -> Self {
        Self {
            body: Body::new(position, Heading::EAST, tuning.radius),
            is_destination: false,
        }
    }

    /// Places a planet at a random spot that does not overlap any planet in `placed`.
    ///
    /// Candidates are drawn until one fits or `placement_attempts` samples have
    /// been spent; in the latter case the final candidate is kept even though it
    /// overlaps a neighbour.
    pub fn random<R>(
        rng: &mut R,
        bounds: ScreenBounds,
        tuning: &PlanetTuning,
        placed: &[Planet],
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut planet = Self::new(Vec2::ZERO, tuning);
        let attempts = tuning.placement_attempts.max(1);

        for _ in 0..attempts {
            planet.body.set_position(random_point(rng, bounds));
            if placed.iter().all(|other| !planet.body.overlaps(&other.body)) {
                return planet;
            }
        }

        warn!(
            attempts,
            placed = placed.len(),
            "no free spot found for planet; accepting an overlapping position"
        );
        planet
    }

    /// Resolves contact between the taxi and this planet.
    ///
    /// Touching any planet at warp wrecks the taxi, whether or not it is the
    /// destination. Touching the destination at thruster speed completes the
    /// leg without changing the taxi. A wrecked taxi never lands.
    pub fn handle_landing(&self, taxi: &mut Taxi) -> Landing {
        if taxi.has_crashed() || !taxi.collides_with(&self.body) {
            return Landing::Clear;
        }

        if taxi.is_travelling_at_warp() {
            taxi.crash();
            Landing::Crashed
        } else if self.is_destination {
            Landing::Arrived
        } else {
            Landing::Clear
        }
    }

    /// Marks or unmarks the planet as the current destination.
    pub fn set_destination(&mut self, is_destination: bool) {
        self.is_destination = is_destination;
    }

    /// Reports whether this planet is the current destination.
    #[must_use]
    pub const fn is_destination(&self) -> bool {
        self.is_destination
    }
}

impl Entity for Planet {
    fn body(&self) -> &Body {
        &self.body
    }

    fn appearance(&self) -> Appearance {
        if self.is_destination {
            Appearance::Destination
        } else {
            Appearance::Planet
        }
    }
}

impl Scenery for Planet {
    fn update(&mut self, _elapsed: Duration) {}
}
