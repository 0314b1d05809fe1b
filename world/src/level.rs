use std::{path::Path, time::Duration};

use rand::Rng;
use star_taxi_core::{
    FrameInput, Fueling, Landing, LevelOutcome, Navigation, ScreenBounds, TaxiReport, Tuning,
};
use tracing::{debug, info, warn};

use crate::{
    entity::{Entity, Scenery},
    gas_cloud::GasCloud,
    level_file::{read_level_file, LevelLayout},
    planet::Planet,
    taxi::Taxi,
    warp_star::WarpStar,
};

/// HUD text shown once the tank runs dry.
pub const OUT_OF_FUEL_MESSAGE: &str = "You've run out of fuel!\nPress the SPACEBAR to end this game.";

/// HUD text shown after a warp crash.
pub const CRASHED_MESSAGE: &str = "You've crashed into a planet!\nPress the SPACEBAR to end this game.";

/// One playthrough: the taxi, everything it can touch, and the fare sequence.
#[derive(Clone, Debug)]
pub struct Level {
    pub(crate) bounds: ScreenBounds,
    pub(crate) taxi: Taxi,
    pub(crate) warp_stars: Vec<WarpStar>,
    pub(crate) gas_clouds: Vec<GasCloud>,
    pub(crate) planets: Vec<Planet>,
    pub(crate) destination_index: usize,
}

impl Level {
    /// Loads the level described by `level_file`, or generates a random one.
    ///
    /// A file that cannot be read or parsed is reported through `tracing` and
    /// replaced by a random level drawn from `rng`.
    pub fn load<R>(rng: &mut R, tuning: &Tuning, level_file: Option<&Path>) -> Self
    where
        R: Rng + ?Sized,
    {
        let Some(path) = level_file else {
            return Self::generate(rng, tuning);
        };

        match read_level_file(path) {
            Ok(layout) => {
                info!(path = %path.display(), "loaded custom level");
                Self::from_layout(&layout, tuning)
            }
            Err(error) => {
                warn!(
                    path = %path.display(),
                    %error,
                    "custom level rejected; generating a random level instead"
                );
                Self::generate(rng, tuning)
            }
        }
    }

    /// Generates a random level with the taxi at the centre of the screen.
    ///
    /// Warp stars, gas clouds and planets are drawn from `rng` in that order;
    /// planets are placed so that they do not overlap one another.
    pub fn generate<R>(rng: &mut R, tuning: &Tuning) -> Self
    where
        R: Rng + ?Sized,
    {
        let bounds = tuning.screen;
        let counts = &tuning.generation;
        let taxi = Taxi::new(bounds.center(), &tuning.taxi);

        let warp_stars = (0..counts.warp_stars)
            .map(|_| WarpStar::random(rng, bounds, &tuning.warp_star))
            .collect();
        let gas_clouds = (0..counts.gas_clouds)
            .map(|_| GasCloud::random(rng, bounds, &tuning.gas_cloud))
            .collect();

        let mut planets = Vec::with_capacity(counts.planets);
        for _ in 0..counts.planets {
            let planet = Planet::random(rng, bounds, &tuning.planet, &planets);
            planets.push(planet);
        }

        Self::assemble(bounds, taxi, warp_stars, gas_clouds, planets)
    }

    /// Builds a level from explicit entity positions.
    #[must_use]
    pub fn from_layout(layout: &LevelLayout, tuning: &Tuning) -> Self {
        let taxi = Taxi::new(layout.taxi, &tuning.taxi);
        let warp_stars = layout
            .warp_stars
            .iter()
            .map(|position| WarpStar::new(*position, &tuning.warp_star))
            .collect();
        let gas_clouds = layout
            .gas_clouds
            .iter()
            .map(|position| GasCloud::new(*position, &tuning.gas_cloud))
            .collect();
        let planets = layout
            .planets
            .iter()
            .map(|position| Planet::new(*position, &tuning.planet))
            .collect();

        Self::assemble(tuning.screen, taxi, warp_stars, gas_clouds, planets)
    }

    fn assemble(
        bounds: ScreenBounds,
        taxi: Taxi,
        warp_stars: Vec<WarpStar>,
        gas_clouds: Vec<GasCloud>,
        mut planets: Vec<Planet>,
    ) -> Self {
        if let Some(first) = planets.first_mut() {
            first.set_destination(true);
        }

        Self {
            bounds,
            taxi,
            warp_stars,
            gas_clouds,
            planets,
            destination_index: 0,
        }
    }

    /// Advances the level by one frame.
    ///
    /// The taxi moves first; a quit request ends the frame immediately. Then
    /// every other entity animates, clouds refuel the taxi, collected clouds
    /// are dropped, warp stars handle the pointer trigger, and finally planets
    /// resolve landings in destination order. Reaching past the last planet
    /// yields [`LevelOutcome::Advance`].
    pub fn update(&mut self, elapsed: Duration, input: &FrameInput) -> LevelOutcome {
        if self.is_complete() {
            return LevelOutcome::Advance;
        }

        if self.taxi.update(elapsed, input, self.bounds) == TaxiReport::Quit {
            info!("player quit");
            return LevelOutcome::Quit;
        }

        update_all(&mut self.warp_stars, elapsed);
        update_all(&mut self.gas_clouds, elapsed);
        update_all(&mut self.planets, elapsed);

        let mut collected = 0_usize;
        for cloud in &mut self.gas_clouds {
            if let Fueling::Collected { .. } = cloud.handle_fueling(&mut self.taxi) {
                collected += 1;
            }
        }
        if collected > 0 {
            self.gas_clouds.retain(|cloud| !cloud.should_remove());
        }

        for star in &self.warp_stars {
            if star.handle_navigation(&mut self.taxi, input) == Navigation::Engaged {
                debug!(position = ?star.body().position(), "warp star engaged");
            }
        }

        for index in 0..self.planets.len() {
            if self.planets[index].handle_landing(&mut self.taxi) != Landing::Arrived {
                continue;
            }

            self.planets[index].set_destination(false);
            self.destination_index += 1;
            let total = self.planets.len();
            match self.planets.get_mut(self.destination_index) {
                Some(next) => {
                    debug!(fares = self.destination_index, total, "fare completed");
                    next.set_destination(true);
                }
                None => {
                    info!(fares = self.destination_index, "every fare completed");
                    return LevelOutcome::Advance;
                }
            }
        }

        LevelOutcome::Continue
    }

    /// Status text for the upper-left corner of the screen.
    #[must_use]
    pub fn hud_message(&self) -> String {
        if self.taxi.is_out_of_fuel() {
            OUT_OF_FUEL_MESSAGE.to_owned()
        } else if self.taxi.has_crashed() {
            CRASHED_MESSAGE.to_owned()
        } else {
            format!(
                "Fuel: {:.1}\nFares: {}/{}",
                self.taxi.fuel(),
                self.destination_index,
                self.fare_count()
            )
        }
    }

    /// Reports whether every planet in the sequence has been visited.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.destination_index >= self.planets.len()
    }

    /// Number of fares in this level, one per planet.
    #[must_use]
    pub fn fare_count(&self) -> usize {
        self.planets.len()
    }
}

fn update_all<S: Scenery>(scenery: &mut [S], elapsed: Duration) {
    for item in scenery {
        item.update(elapsed);
    }
}
