//! Race state: everything one tick reads or writes

use super::clock::RaceClock;
use super::hud::HudSnapshot;
use super::vehicle::Vehicle;
use crate::circuit::Circuit;
use crate::config::{Config, RaceSettings};

/// Complete race context
///
/// The circuit is immutable after construction; the vehicle and clock are
/// only mutated by `tick`.
#[derive(Debug, Clone)]
pub struct Race {
    pub circuit: Circuit,
    pub vehicle: Vehicle,
    pub clock: RaceClock,
    pub settings: RaceSettings,
    /// Simulation steps actually run (paused ticks excluded)
    pub steps: u64,
}

impl Race {
    /// Put a fresh vehicle on the start line of `circuit`
    pub fn new(circuit: Circuit, config: &Config) -> Self {
        let vehicle = Vehicle::new(&circuit, config.vehicle.clone());
        Self {
            clock: RaceClock::new(config.race.tick_interval_ms),
            settings: config.race.clone(),
            circuit,
            vehicle,
            steps: 0,
        }
    }

    /// Back to the grid, clock stopped
    pub fn restart(&mut self) {
        self.vehicle.reset(&self.circuit);
        self.clock.reset();
        self.steps = 0;
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::capture(&self.vehicle, &self.circuit, &self.clock, &self.settings)
    }

    pub fn is_finished(&self) -> bool {
        self.clock.has_finished()
    }
}
