#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for Star Taxi.
//!
//! A [`Level`] owns the taxi and every body it can interact with. Adapters
//! drive it one frame at a time through [`Level::update`] and observe it
//! through the read-only [`query`] functions.

mod entity;
mod gas_cloud;
mod level;
mod level_file;
mod planet;
mod taxi;
mod warp_star;

pub use entity::{Body, Entity, Scenery};
pub use gas_cloud::GasCloud;
pub use level::{Level, CRASHED_MESSAGE, OUT_OF_FUEL_MESSAGE};
pub use level_file::{parse_level, read_level_file, LevelFileError, LevelLayout};
pub use planet::Planet;
pub use taxi::{Taxi, TaxiState};
pub use warp_star::WarpStar;

/// Query functions that provide read-only access to a level.
pub mod query {
    use star_taxi_core::{EntitySnapshot, ScreenBounds};

    use super::{Entity, GasCloud, Level, Planet, Taxi, WarpStar};

    /// Provides read-only access to the taxi.
    #[must_use]
    pub fn taxi(level: &Level) -> &Taxi {
        &level.taxi
    }

    /// Planets in destination order.
    #[must_use]
    pub fn planets(level: &Level) -> &[Planet] {
        &level.planets
    }

    /// Gas clouds that have not been collected yet.
    #[must_use]
    pub fn gas_clouds(level: &Level) -> &[GasCloud] {
        &level.gas_clouds
    }

    /// Warp stars placed in the level.
    #[must_use]
    pub fn warp_stars(level: &Level) -> &[WarpStar] {
        &level.warp_stars
    }

    /// Index of the current destination planet, equal to the number of fares completed.
    #[must_use]
    pub fn destination_index(level: &Level) -> usize {
        level.destination_index
    }

    /// Area the level plays out in.
    #[must_use]
    pub fn bounds(level: &Level) -> ScreenBounds {
        level.bounds
    }

    /// Captures every drawable body in back-to-front order.
    ///
    /// Planets come first, then gas clouds and warp stars, with the taxi on top.
    #[must_use]
    pub fn sprites(level: &Level) -> Vec<EntitySnapshot> {
        let mut sprites = Vec::with_capacity(
            level.planets.len() + level.gas_clouds.len() + level.warp_stars.len() + 1,
        );
        sprites.extend(level.planets.iter().map(Entity::snapshot));
        sprites.extend(level.gas_clouds.iter().map(Entity::snapshot));
        sprites.extend(level.warp_stars.iter().map(Entity::snapshot));
        sprites.push(level.taxi.snapshot());
        sprites
    }
}
