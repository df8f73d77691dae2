//! Fixed timestep race tick
//!
//! Applies one frame of player input to the race and advances the
//! simulation by at most one step.

use super::state::Race;
use super::vehicle::{LapEvent, Vehicle};

/// Heading gain of the demo driver per unit of lateral offset
const AUTOPILOT_GAIN: f32 = 0.15;
/// Largest heading offset the demo driver asks for (radians)
const AUTOPILOT_MAX_ANGLE: f32 = 0.3;
/// Heading error the demo driver tolerates before steering
const AUTOPILOT_DEADBAND: f32 = 0.01;

/// Input for a single tick
///
/// The four driving controls are held states; the rest are one-shot presses.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub accelerate: bool,
    pub brake: bool,
    pub left: bool,
    pub right: bool,
    /// Pause toggle
    pub pause_toggle: bool,
    /// Back to the start line
    pub reset: bool,
    /// Demo mode - the race drives itself
    pub autopilot: bool,
}

impl TickInput {
    fn any_held(&self) -> bool {
        self.accelerate || self.brake || self.left || self.right
    }
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceEvent {
    Started,
    Paused,
    Resumed,
    Reset,
    LapCompleted { completed: u32, elapsed_ms: u64 },
    Finished { elapsed_ms: u64 },
}

/// Advance the race by one tick
pub fn tick(race: &mut Race, input: &TickInput) -> Vec<RaceEvent> {
    let mut events = Vec::new();

    if input.reset {
        race.restart();
        log::debug!("Race reset");
        events.push(RaceEvent::Reset);
        return events;
    }

    if input.pause_toggle && race.clock.has_started() && !race.clock.has_finished() {
        if race.clock.is_paused() {
            race.clock.start();
            events.push(RaceEvent::Resumed);
        } else {
            race.clock.pause();
            events.push(RaceEvent::Paused);
        }
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot(&race.vehicle, &mut input);
    }

    if input.any_held() && !race.clock.is_paused() && race.clock.start() {
        log::info!("Race started");
        events.push(RaceEvent::Started);
    }

    if !race.clock.advance() {
        return events;
    }

    let vehicle = &mut race.vehicle;
    if input.accelerate {
        vehicle.accelerate();
    }
    if input.brake {
        vehicle.brake();
    }
    if input.left {
        vehicle.turn_left();
    }
    if input.right {
        vehicle.turn_right();
    }

    race.steps += 1;
    let elapsed_ms = race.clock.elapsed_ms();
    match vehicle.step(&race.circuit, race.settings.lap_count) {
        Some(LapEvent::LapCompleted { completed }) => {
            log::info!("Lap {completed} done at {elapsed_ms} ms");
            events.push(RaceEvent::LapCompleted {
                completed,
                elapsed_ms,
            });
        }
        Some(LapEvent::RaceFinished) => {
            log::info!("Race finished in {elapsed_ms} ms");
            race.clock.finish();
            events.push(RaceEvent::Finished { elapsed_ms });
        }
        None => {}
    }

    events
}

/// Demo driver: full throttle, steer the heading toward the centre line
fn autopilot(vehicle: &Vehicle, input: &mut TickInput) {
    let offset = vehicle.local_position().x;
    let want = (-AUTOPILOT_GAIN * offset).clamp(-AUTOPILOT_MAX_ANGLE, AUTOPILOT_MAX_ANGLE);
    let angle = vehicle.angle();

    input.accelerate = true;
    input.brake = false;
    input.left = angle > want + AUTOPILOT_DEADBAND;
    input.right = angle < want - AUTOPILOT_DEADBAND;
}
