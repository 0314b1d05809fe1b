use std::time::Duration;

use rand::Rng;
use star_taxi_core::{Appearance, Fueling, GasCloudTuning, Heading, ScreenBounds, Vec2};
use tracing::debug;

use crate::{
    entity::{millis, random_point, Body, Entity, Scenery},
    taxi::Taxi,
};

/// Spinning fuel pickup that disappears once collected.
#[derive(Clone, Debug)]
pub struct GasCloud {
    body: Body,
    rotation_speed: f32,
    fuel_bonus: f32,
    should_remove: bool,
}

impl GasCloud {
    /// Creates a cloud at `position`.
    #[must_use]
    pub fn new(position: Vec2, tuning: &GasCloudTuning) -> Self {
        Self {
            body: Body::new(position, Heading::EAST, tuning.radius),
            rotation_speed: tuning.rotation_speed,
            fuel_bonus: tuning.fuel_bonus,
            should_remove: false,
        }
    }

    /// Creates a cloud at a uniformly random whole-pixel position.
    pub fn random<R>(rng: &mut R, bounds: ScreenBounds, tuning: &GasCloudTuning) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(random_point(rng, bounds), tuning)
    }

    /// Grants the fuel bonus when the taxi touches the cloud and flags it for removal.
    ///
    /// A flagged cloud never pays out again, and a wrecked taxi cannot collect.
    pub fn handle_fueling(&mut self, taxi: &mut Taxi) -> Fueling {
        if self.should_remove || taxi.has_crashed() || !taxi.collides_with(&self.body) {
            return Fueling::Missed;
        }

        taxi.add_fuel(self.fuel_bonus);
        self.should_remove = true;
        debug!(bonus = self.fuel_bonus, fuel = taxi.fuel(), "gas cloud collected");
        Fueling::Collected {
            bonus: self.fuel_bonus,
        }
    }

    /// Reports whether the cloud was collected and must leave the level.
    #[must_use]
    pub const fn should_remove(&self) -> bool {
        self.should_remove
    }
}

impl Entity for GasCloud {
    fn body(&self) -> &Body {
        &self.body
    }

    fn appearance(&self) -> Appearance {
        Appearance::GasCloud
    }
}

impl Scenery for GasCloud {
    fn update(&mut self, elapsed: Duration) {
        let heading = self
            .body
            .heading()
            .rotated(self.rotation_speed * millis(elapsed));
        self.body.set_heading(heading);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use star_taxi_core::TaxiTuning;

    fn taxi_at(x: f32, y: f32) -> Taxi {
        let tuning = TaxiTuning {
            starting_fuel: 5.0,
            ..TaxiTuning::default()
        };
        Taxi::new(Vec2::new(x, y), &tuning)
    }

    #[test]
    fn collecting_grants_the_bonus_exactly_once() {
        let mut cloud = GasCloud::new(Vec2::new(50.0, 50.0), &GasCloudTuning::default());
        let mut taxi = taxi_at(50.0, 50.0);

        assert_eq!(
            cloud.handle_fueling(&mut taxi),
            Fueling::Collected { bonus: 20.0 }
        );
        assert!(cloud.should_remove());
        assert!((taxi.fuel() - 25.0).abs() < 1e-4);

        assert_eq!(cloud.handle_fueling(&mut taxi), Fueling::Missed);
        assert!((taxi.fuel() - 25.0).abs() < 1e-4);
    }

    #[test]
    fn distant_taxi_collects_nothing() {
        let mut cloud = GasCloud::new(Vec2::new(50.0, 50.0), &GasCloudTuning::default());
        let mut taxi = taxi_at(300.0, 50.0);

        assert_eq!(cloud.handle_fueling(&mut taxi), Fueling::Missed);
        assert!(!cloud.should_remove());
        assert!((taxi.fuel() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn wrecked_taxi_cannot_refuel() {
        let mut cloud = GasCloud::new(Vec2::new(50.0, 50.0), &GasCloudTuning::default());
        let mut taxi = taxi_at(50.0, 50.0);
        taxi.crash();

        assert_eq!(cloud.handle_fueling(&mut taxi), Fueling::Missed);
        assert!(!cloud.should_remove());
    }

    #[test]
    fn update_spins_the_cloud_at_a_fixed_rate() {
        let mut cloud = GasCloud::new(Vec2::ZERO, &GasCloudTuning::default());
        cloud.update(Duration::from_millis(250));
        cloud.update(Duration::from_millis(250));

        assert!((cloud.body().heading().radians() - 0.5).abs() < 1e-5);
        assert_eq!(cloud.body().position(), Vec2::ZERO);
    }
}
