//! Race simulation
//!
//! Pure state and fixed-step logic; no rendering, windowing or audio.
//! - `vehicle`: hover dynamics against the circuit frame
//! - `clock`: race phase and elapsed time
//! - `tick`: per-tick input application
//! - `hud`: read-only snapshots for display

pub mod clock;
pub mod hud;
pub mod state;
pub mod tick;
pub mod vehicle;

pub use clock::{RaceClock, RacePhase};
pub use hud::{CameraRig, HudSnapshot};
pub use state::Race;
pub use tick::{RaceEvent, TickInput, tick};
pub use vehicle::{LapEvent, Vehicle, ground_reaction};
