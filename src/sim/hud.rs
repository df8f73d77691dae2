//! Read-only views for the display collaborators
//!
//! Nothing here feeds back into the simulation.

use glam::{Mat4, Vec2, Vec3};
use serde::Serialize;

use super::clock::{RaceClock, RacePhase};
use super::vehicle::Vehicle;
use crate::circuit::Circuit;
use crate::config::RaceSettings;
use crate::consts::CAMERA_DROP;

/// Values for the on-screen display, captured after a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    /// Display speed; hidden once the race is over
    pub speed: Option<u32>,
    /// (current lap, lap count); hidden once the race is over
    pub lap: Option<(u32, u32)>,
    pub wrong_way: bool,
    /// Share of the whole race distance covered (can go negative backwards)
    pub completion_percent: i32,
    pub elapsed_secs: u64,
    pub phase: RacePhase,
}

impl HudSnapshot {
    pub fn capture(
        vehicle: &Vehicle,
        circuit: &Circuit,
        clock: &RaceClock,
        settings: &RaceSettings,
    ) -> Self {
        let racing = vehicle.lap() <= settings.lap_count;
        let race_length = circuit.total_length() * settings.lap_count as f32;
        Self {
            speed: racing.then(|| (vehicle.speed() * settings.speed_display_factor) as u32),
            lap: racing.then(|| (vehicle.lap(), settings.lap_count)),
            wrong_way: racing && vehicle.is_wrong_way(),
            completion_percent: (vehicle.circ_position() / race_length * 100.0) as i32,
            elapsed_secs: clock.elapsed_secs(),
            phase: clock.phase(),
        }
    }

    /// Single-line summary for logs
    pub fn summary(&self) -> String {
        let mut line = format!("Time: {} s  Done: {}%", self.elapsed_secs, self.completion_percent);
        if let Some((lap, count)) = self.lap {
            line.push_str(&format!("  Lap {lap}/{count}"));
        }
        if let Some(speed) = self.speed {
            line.push_str(&format!("  Speed: {speed} km/h"));
        }
        if self.wrong_way {
            line.push_str("  WRONG WAY!");
        }
        if let Some(banner) = self.phase.banner() {
            line.push_str(&format!("  [{banner}]"));
        }
        line
    }
}

/// Chase camera placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Screen-space shift applied after the look-at (bank sway, fixed drop)
    pub screen_offset: Vec2,
}

impl CameraRig {
    /// Behind the vehicle along its heading, rolled with the track but not
    /// with the cosmetic bank
    pub fn chase(vehicle: &Vehicle) -> Self {
        let tuning = vehicle.tuning();
        let basis = vehicle.basis();
        let right = basis.right();
        let up = basis.backward().cross(Vec3::new(right.x, 0.0, right.z));
        Self {
            eye: vehicle.position() - vehicle.direction() * tuning.camera_distance,
            target: vehicle.position(),
            up,
            screen_offset: Vec2::new(vehicle.slope() * tuning.slope_offset_factor, -CAMERA_DROP),
        }
    }

    /// Right-handed view matrix including the screen offset
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.screen_offset.extend(0.0))
            * Mat4::look_at_rh(self.eye, self.target, self.up.normalize_or_zero())
    }
}
