use serde::Deserialize;

use crate::ScreenBounds;

/// Aggregated tuning knobs controlling every adjustable aspect of a level.
///
/// Every section falls back to its defaults when omitted, so a tuning file only
/// needs to list the values it overrides.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Size of the toroidal play area.
    pub screen: ScreenBounds,
    /// Taxi fuel and speed parameters.
    pub taxi: TaxiTuning,
    /// Gas cloud reward and spin parameters.
    pub gas_cloud: GasCloudTuning,
    /// Planet size and placement parameters.
    pub planet: PlanetTuning,
    /// Warp star size.
    pub warp_star: WarpStarTuning,
    /// Entity counts used when generating a random level.
    pub generation: GenerationTuning,
}

/// Taxi fuel and speed parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaxiTuning {
    /// Fuel in the tank when a level starts; one unit buys one unit of thruster travel.
    pub starting_fuel: f32,
    /// Thruster speed in screen units per millisecond.
    pub thruster_speed: f32,
    /// Warp speed in screen units per millisecond; warp travel burns no fuel.
    pub warp_speed: f32,
    /// Collision radius of the taxi.
    pub radius: f32,
}

impl Default for TaxiTuning {
    fn default() -> Self {
        Self {
            starting_fuel: 300_000.0,
            thruster_speed: 0.1,
            warp_speed: 0.2,
            radius: 16.0,
        }
    }
}

/// Gas cloud reward and spin parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GasCloudTuning {
    /// Fuel granted when the taxi collects a cloud.
    pub fuel_bonus: f32,
    /// Cosmetic spin in radians per millisecond.
    pub rotation_speed: f32,
    /// Collision radius of a cloud.
    pub radius: f32,
}

impl Default for GasCloudTuning {
    fn default() -> Self {
        Self {
            fuel_bonus: 20.0,
            rotation_speed: 0.001,
            radius: 18.0,
        }
    }
}

/// Planet size and placement parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanetTuning {
    /// Collision radius of a planet.
    pub radius: f32,
    /// Maximum random samples drawn while searching for a non-overlapping spot.
    pub placement_attempts: u32,
}

impl Default for PlanetTuning {
    fn default() -> Self {
        Self {
            radius: 40.0,
            placement_attempts: 10_000,
        }
    }
}

/// Warp star size.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WarpStarTuning {
    /// Radius of the area that responds to the pointer trigger.
    pub radius: f32,
}

impl Default for WarpStarTuning {
    fn default() -> Self {
        Self { radius: 12.0 }
    }
}

/// Entity counts used when generating a random level.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationTuning {
    /// Number of warp stars scattered across the screen.
    pub warp_stars: usize,
    /// Number of gas clouds scattered across the screen.
    pub gas_clouds: usize,
    /// Number of planets, which is also the number of fares per level.
    pub planets: usize,
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            warp_stars: 6,
            gas_clouds: 6,
            planets: 6,
        }
    }
}
