use std::time::Duration;

use star_taxi_core::{
    Appearance, FrameInput, Heading, Navigation, ScreenBounds, TaxiReport, TaxiTuning, Thrust,
    Vec2, FUEL_EXHAUSTION_THRESHOLD,
};
use tracing::{debug, info};

use crate::entity::{millis, Body, Entity};

/// Flight mode of the taxi.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaxiState {
    /// Moving under thruster control, burning fuel.
    Flying,
    /// Coasting at warp speed along the current heading without burning fuel.
    Warping,
    /// Wrecked after hitting a planet at warp. Terminal.
    Crashed,
}

/// The player-controlled taxi.
#[derive(Clone, Debug)]
pub struct Taxi {
    body: Body,
    fuel: f32,
    thruster_speed: f32,
    warp_speed: f32,
    state: TaxiState,
}

impl Taxi {
    /// Creates a taxi at `position` facing east with a full tank.
    #[must_use]
    pub fn new(position: Vec2, tuning: &TaxiTuning) -> Self {
        Self {
            body: Body::new(position, Heading::EAST, tuning.radius),
            fuel: tuning.starting_fuel,
            thruster_speed: tuning.thruster_speed,
            warp_speed: tuning.warp_speed,
            state: TaxiState::Flying,
        }
    }

    /// Consumes one frame of input, moves the taxi and reports whether the player quit.
    ///
    /// At most one directional key is honoured per frame (see
    /// [`Thrust::PRIORITY`]). Thruster travel is capped by the remaining fuel
    /// and deducted from it; any directional key also cancels warp travel.
    /// Warp travel then adds `warp_speed × heading × elapsed` without touching
    /// the fuel. Finally the position wraps around the screen edges.
    pub fn update(
        &mut self,
        elapsed: Duration,
        input: &FrameInput,
        bounds: ScreenBounds,
    ) -> TaxiReport {
        if self.has_crashed() {
            return confirm_report(input);
        }

        let elapsed_ms = millis(elapsed);
        let budget = self.travel_budget(elapsed_ms);

        if let Some(thrust) = Thrust::resolve(&input.held) {
            if let Some(distance) = budget.filter(|distance| *distance > 0.0) {
                self.body.translate(thrust.offset(distance));
                self.fuel -= distance;
            }
            self.body.set_heading(thrust.heading());
            self.state = TaxiState::Flying;
        }

        if self.state == TaxiState::Warping {
            let velocity = self.body.heading().unit_vector() * self.warp_speed;
            self.body.translate(velocity * elapsed_ms);
        }

        self.body.wrap(bounds);

        if self.is_out_of_fuel() {
            confirm_report(input)
        } else {
            TaxiReport::Continue
        }
    }

    /// Longest thruster trip affordable this frame, or `None` once the tank is negative.
    fn travel_budget(&self, elapsed_ms: f32) -> Option<f32> {
        (self.fuel >= 0.0).then(|| self.fuel.min(self.thruster_speed * elapsed_ms))
    }

    /// Fuel remaining in the tank.
    #[must_use]
    pub const fn fuel(&self) -> f32 {
        self.fuel
    }

    /// Reports whether the tank is empty for gameplay purposes.
    #[must_use]
    pub fn is_out_of_fuel(&self) -> bool {
        self.fuel < FUEL_EXHAUSTION_THRESHOLD
    }

    /// Adds `amount` to the tank.
    pub fn add_fuel(&mut self, amount: f32) {
        self.fuel += amount;
    }

    /// Sends the taxi into warp travel along `direction`.
    ///
    /// A wrecked taxi ignores the request.
    pub fn engage_warp(&mut self, direction: Vec2) -> Navigation {
        if self.has_crashed() {
            return Navigation::Ignored;
        }

        self.body.set_heading(Heading::from_vector(direction));
        self.state = TaxiState::Warping;
        debug!(
            heading = self.body.heading().radians(),
            "taxi engaged warp travel"
        );
        Navigation::Engaged
    }

    /// Reports whether the taxi is currently travelling at warp.
    #[must_use]
    pub fn is_travelling_at_warp(&self) -> bool {
        self.state == TaxiState::Warping
    }

    /// Wrecks the taxi. Only the quit confirmation is processed afterwards.
    pub fn crash(&mut self) {
        if self.state != TaxiState::Crashed {
            info!(x = self.body.position().x, y = self.body.position().y, "taxi crashed");
        }
        self.state = TaxiState::Crashed;
    }

    /// Reports whether the taxi has crashed.
    #[must_use]
    pub fn has_crashed(&self) -> bool {
        self.state == TaxiState::Crashed
    }

    /// Current flight mode.
    #[must_use]
    pub const fn state(&self) -> TaxiState {
        self.state
    }

    /// Boundary-inclusive collision test against another body.
    #[must_use]
    pub fn collides_with(&self, other: &Body) -> bool {
        self.body.overlaps(other)
    }
}

fn confirm_report(input: &FrameInput) -> TaxiReport {
    if input.confirm_pressed() {
        TaxiReport::Quit
    } else {
        TaxiReport::Continue
    }
}

impl Entity for Taxi {
    fn body(&self) -> &Body {
        &self.body
    }

    fn appearance(&self) -> Appearance {
        if self.has_crashed() {
            Appearance::Explosion
        } else {
            Appearance::Taxi
        }
    }
}
