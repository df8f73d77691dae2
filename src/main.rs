//! Hover Racer headless driver
//!
//! Loads a track, lets the demo driver race it and logs the HUD once per
//! simulated second.
//!
//! Usage: `hover-racer [TRACK] [CONFIG.json]`

use std::process::ExitCode;

use hover_racer::sim::{Race, RaceEvent, TickInput, tick};
use hover_racer::{Circuit, Config};

const DEFAULT_TRACK: &str = "data/level.txt";
/// Give up after ten simulated minutes
const MAX_TICKS: u64 = 60_000;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let track_path = args.next().unwrap_or_else(|| DEFAULT_TRACK.to_string());
    let config = match args.next() {
        Some(path) => match Config::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{path}: {e}");
                return ExitCode::from(1);
            }
        },
        None => Config::default(),
    };

    let circuit = match Circuit::load(&track_path, &config.track) {
        Ok(circuit) => circuit,
        Err(e) => {
            log::error!("Failed to load {track_path}: {e}");
            return ExitCode::from(2);
        }
    };

    let mut race = Race::new(circuit, &config);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let ticks_per_second = u64::from(1000 / config.race.tick_interval_ms.max(1)).max(1);

    for n in 0..MAX_TICKS {
        for event in tick(&mut race, &input) {
            match event {
                RaceEvent::LapCompleted {
                    completed,
                    elapsed_ms,
                } => println!("Lap {completed} in {:.2} s", elapsed_ms as f64 / 1000.0),
                RaceEvent::Finished { elapsed_ms } => {
                    println!("Finished in {:.2} s", elapsed_ms as f64 / 1000.0)
                }
                _ => {}
            }
        }
        if n % ticks_per_second == 0 {
            log::info!("{}", race.hud().summary());
        }
        if race.is_finished() {
            log::info!("{}", race.hud().summary());
            return ExitCode::SUCCESS;
        }
    }

    log::warn!(
        "Race not finished after {MAX_TICKS} ticks ({:.1} m covered)",
        race.vehicle.circ_position()
    );
    ExitCode::SUCCESS
}
