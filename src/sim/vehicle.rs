//! Hover vehicle dynamics
//!
//! All forces are computed in the circuit's local frame at the vehicle's arc
//! position: x = right, y = up (height above the road), z = backward. The
//! integrator works in per-tick units with no time scaling, so behaviour is
//! tied to the fixed tick interval.

use glam::{Mat4, Vec3};

use super::hud::CameraRig;
use crate::circuit::Circuit;
use crate::config::VehicleTuning;
use crate::math::{Basis, VectorExt};
use crate::normalize_angle;

/// Lap bookkeeping reported by `Vehicle::step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapEvent {
    /// Crossed the line; `completed` laps are now done
    LapCompleted { completed: u32 },
    /// Crossed the line after the final lap
    RaceFinished,
}

/// The player's vehicle
#[derive(Debug, Clone)]
pub struct Vehicle {
    tuning: VehicleTuning,
    /// Circuit frame at `circ_position`
    basis: Basis,
    position: Vec3,
    /// Unit heading in world space
    direction: Vec3,
    velocity: Vec3,
    /// Forward thrust, in [0, max_accel]
    acceleration: f32,
    /// Heading offset from the circuit's forward axis (radians, + is right)
    angle: f32,
    /// Cosmetic bank angle
    slope: f32,
    /// Arc length travelled since the start (not wrapped)
    circ_position: f32,
    /// Arc length into the current lap
    lap_position: f32,
    /// Set by `accelerate`, consumed by the next `step`
    accelerated: bool,
    wrong_way: bool,
    /// Lap being driven, from 1
    lap: u32,
}

impl Vehicle {
    /// Place a vehicle on the start line of `circuit`
    pub fn new(circuit: &Circuit, tuning: VehicleTuning) -> Self {
        let basis = circuit.basis_at(0.0);
        let mut vehicle = Self {
            tuning,
            basis,
            position: Vec3::ZERO,
            direction: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: 0.0,
            angle: 0.0,
            slope: 0.0,
            circ_position: 0.0,
            lap_position: 0.0,
            accelerated: false,
            wrong_way: false,
            lap: 1,
        };
        vehicle.reset(circuit);
        vehicle
    }

    /// Back to the start line at rest, hovering at half height
    pub fn reset(&mut self, circuit: &Circuit) {
        self.basis = circuit.basis_at(0.0);
        self.position = self.basis.origin() + self.basis.up() * self.tuning.levit_height / 2.0;
        self.direction = self.basis.forward();
        self.velocity = Vec3::ZERO;
        self.acceleration = 0.0;
        self.angle = 0.0;
        self.slope = 0.0;
        self.circ_position = 0.0;
        self.lap_position = 0.0;
        self.accelerated = false;
        self.wrong_way = false;
        self.lap = 1;
    }

    /// Advance one tick.
    ///
    /// Order: local frame, heading, velocity, ground reaction, border bounce,
    /// translation, thrust/bank decay, arc progress and frame update, heading
    /// follow, lap check.
    pub fn step(&mut self, circuit: &Circuit, lap_count: u32) -> Option<LapEvent> {
        let t = &self.tuning;
        let local_pos = self.basis.revert_point(self.position);
        let local_vel = self.basis.revert_vector(self.velocity);

        self.direction = self
            .basis
            .transform_vector(Vec3::new(0.0, 0.0, -1.0).rotated(0.0, self.angle, 0.0));

        self.velocity = self.velocity * t.inerty
            + self.direction * self.acceleration
            + Vec3::new(0.0, -t.gravity, 0.0);

        if local_pos.y < 0.0 {
            // Below the road: snap back onto it
            self.position += self.basis.up() * -local_pos.y;
        }
        self.velocity += self.basis.up() * ground_reaction(local_pos.y, local_vel.y, t);

        let limit = circuit.width_at(self.circ_position) * 0.5
            + circuit.border_slope() * local_pos.y
            - t.border;
        let overshoot = local_pos.x.abs() - limit;
        if overshoot > 0.0 {
            let push = if local_pos.x < 0.0 { overshoot } else { -overshoot };
            self.position += self.basis.right() * (2.0 * push);

            let min = t.reaction_min * self.velocity.length();
            let mut reaction = local_vel.x * -t.reaction_factor;
            if reaction.abs() < min {
                reaction = if local_vel.x < 0.0 { min } else { -min };
            }
            self.velocity *= t.reaction_speed_factor * local_vel.x.abs();
            self.velocity += self.basis.right() * (reaction * t.reaction_factor);
            self.acceleration *= 0.5;
        }

        self.position += self.velocity;

        if self.accelerated {
            self.accelerated = false;
        } else {
            self.decelerate(self.tuning.accel / 2.0);
        }
        self.slope *= self.tuning.slope_decrease_factor;

        let moved = self.basis.revert_point(self.position);
        if moved.z != 0.0 {
            let advance = -moved.z;
            self.wrong_way = advance < -self.tuning.wrong_way_tolerance;
            self.circ_position += advance;
            self.lap_position += advance;

            let old_right = self.basis.right();
            self.basis = circuit.basis_at(self.circ_position);
            self.follow_frame(old_right);
        } else {
            self.wrong_way = false;
        }

        self.check_lap(circuit.total_length(), lap_count)
    }

    /// Carry the heading offset across a frame change by the rotation of the
    /// old right axis seen from the new frame
    fn follow_frame(&mut self, old_right: Vec3) {
        let r = self.basis.revert_vector(old_right);
        if r.x < 1.0 {
            let turn = r.x.max(-1.0).acos();
            if r.z > 0.0 {
                self.angle += turn;
            } else if r.z < 0.0 {
                self.angle -= turn;
            }
            self.angle = normalize_angle(self.angle);
        }
    }

    /// Roll `lap_position` over the finish line (at most once per tick)
    fn check_lap(&mut self, total_length: f32, lap_count: u32) -> Option<LapEvent> {
        if self.lap_position < total_length {
            return None;
        }
        self.lap_position -= total_length;
        self.lap += 1;
        if self.lap > lap_count {
            log::debug!("Final lap done at arc position {:.2}", self.circ_position);
            Some(LapEvent::RaceFinished)
        } else {
            log::debug!("Lap {} started", self.lap);
            Some(LapEvent::LapCompleted {
                completed: self.lap - 1,
            })
        }
    }

    /// Add thrust for this tick (suppresses the passive decay)
    pub fn accelerate(&mut self) {
        self.accelerated = true;
        self.acceleration = (self.acceleration + self.tuning.accel).min(self.tuning.max_accel);
    }

    pub fn brake(&mut self) {
        self.decelerate(self.tuning.accel * 4.0);
    }

    pub fn turn_left(&mut self) {
        self.angle -= self.tuning.rot_angle;
        self.slope = (self.slope + self.tuning.slope_increase).min(self.tuning.slope_max);
    }

    pub fn turn_right(&mut self) {
        self.angle += self.tuning.rot_angle;
        self.slope = (self.slope - self.tuning.slope_increase).max(-self.tuning.slope_max);
    }

    fn decelerate(&mut self, amount: f32) {
        if self.acceleration > 0.0 {
            self.acceleration = (self.acceleration - amount).max(0.0);
        }
    }

    pub fn tuning(&self) -> &VehicleTuning {
        &self.tuning
    }

    /// Circuit frame at the vehicle's arc position
    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Velocity magnitude in units per tick
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn slope(&self) -> f32 {
        self.slope
    }

    pub fn circ_position(&self) -> f32 {
        self.circ_position
    }

    pub fn lap_position(&self) -> f32 {
        self.lap_position
    }

    pub fn lap(&self) -> u32 {
        self.lap
    }

    pub fn is_wrong_way(&self) -> bool {
        self.wrong_way
    }

    /// Position in the circuit's local frame (y is height above the road)
    pub fn local_position(&self) -> Vec3 {
        self.basis.revert_point(self.position)
    }

    /// Frame centred on the vehicle, facing its heading
    pub fn model_basis(&self) -> Basis {
        Basis::from_direction(self.position, self.direction, self.basis.up())
    }

    /// Chase camera following this vehicle
    pub fn camera(&self) -> CameraRig {
        CameraRig::chase(self)
    }

    /// Model matrix for the hull: vehicle frame, hull offset, then bank
    pub fn model_matrix(&self) -> Mat4 {
        self.model_basis().model_matrix()
            * Mat4::from_translation(Vec3::new(0.0, 0.075, -0.55))
            * Mat4::from_rotation_z(self.slope)
    }
}

/// Vertical force along the track normal for a vehicle `height` above the
/// road moving at `vertical_speed` (local, before this tick's integration).
///
/// Below the road it is a bounce proportional to the incoming speed. Within
/// the hover band it is two linear pieces: from `ground_reaction_max` at the
/// surface down to `gravity` at hover height, then down to zero at
/// `ground_reaction_height_max`.
pub fn ground_reaction(height: f32, vertical_speed: f32, t: &VehicleTuning) -> f32 {
    if height < 0.0 {
        return vertical_speed * -t.ground_reaction_touch_factor;
    }
    if height >= t.ground_reaction_height_max {
        return 0.0;
    }

    let hover = t.levit_height / t.ground_reaction_factor;
    let force = if height <= hover {
        t.ground_reaction_max - height * ((t.ground_reaction_max - t.gravity) / hover)
    } else {
        t.gravity - (height - hover) * (t.gravity / (t.ground_reaction_height_max - hover))
    };
    force * t.ground_reaction_factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_ACCEL;
    use crate::test_tracks::{ring, square};

    fn tuning() -> VehicleTuning {
        VehicleTuning::default()
    }

    #[test]
    fn test_spawn_on_start_line() {
        let circuit = square();
        let vehicle = Vehicle::new(&circuit, tuning());
        let local = vehicle.local_position();
        assert!(local.x.abs() < 1e-6 && local.z.abs() < 1e-6);
        assert!((local.y - 0.15).abs() < 1e-6);
        assert_eq!(vehicle.lap(), 1);
        assert_eq!(vehicle.direction(), circuit.basis_at(0.0).forward());
        assert!(!vehicle.is_wrong_way());
    }

    #[test]
    fn test_ground_reaction_shape() {
        let t = tuning();
        // Peak at the surface, gravity at hover height, nothing at the top of the band
        assert!((ground_reaction(0.0, 0.0, &t) - t.ground_reaction_max).abs() < 1e-9);
        assert!((ground_reaction(t.levit_height, 0.0, &t) - t.gravity).abs() < 1e-7);
        assert!(ground_reaction(t.ground_reaction_height_max, 0.0, &t).abs() < 1e-9);
        assert_eq!(ground_reaction(2.0, 0.0, &t), 0.0);
        // Linear between the knots
        let mid = ground_reaction(t.levit_height / 2.0, 0.0, &t);
        assert!((mid - (t.ground_reaction_max + t.gravity) / 2.0).abs() < 1e-7);
        let upper = ground_reaction(0.6, 0.0, &t);
        assert!((upper - t.gravity / 2.0).abs() < 1e-7);
        // Below the surface: bounce against the incoming speed
        assert!((ground_reaction(-0.1, -0.02, &t) - 0.03).abs() < 1e-7);
    }

    #[test]
    fn test_hover_settles_near_levitation_height() {
        let circuit = square();
        let mut vehicle = Vehicle::new(&circuit, tuning());
        let mut lowest = f32::MAX;
        let mut highest = f32::MIN;
        for _ in 0..6000 {
            vehicle.step(&circuit, 3);
            let h = vehicle.local_position().y;
            lowest = lowest.min(h);
            highest = highest.max(h);
        }
        let h = vehicle.local_position().y;
        assert!((h - 0.3).abs() < 0.01, "settled at {h}");
        // Never touched the road nor escaped the hover band
        assert!(lowest > 0.0, "lowest {lowest}");
        assert!(highest < 0.9, "highest {highest}");
        assert!(vehicle.circ_position().abs() < 1e-3);
        assert_eq!(vehicle.lap(), 1);
    }

    #[test]
    fn test_accelerate_clamps_and_decays() {
        let circuit = square();
        let mut vehicle = Vehicle::new(&circuit, tuning());
        for _ in 0..1000 {
            vehicle.accelerate();
        }
        assert_eq!(vehicle.acceleration(), MAX_ACCEL);
        vehicle.step(&circuit, 3);
        // Accelerated tick: no decay
        assert_eq!(vehicle.acceleration(), MAX_ACCEL);
        vehicle.step(&circuit, 3);
        assert!(vehicle.acceleration() < MAX_ACCEL);
    }

    #[test]
    fn test_brake_never_goes_negative() {
        let circuit = square();
        let mut vehicle = Vehicle::new(&circuit, tuning());
        vehicle.accelerate();
        vehicle.brake();
        assert_eq!(vehicle.acceleration(), 0.0);
        vehicle.brake();
        assert_eq!(vehicle.acceleration(), 0.0);
    }

    #[test]
    fn test_steering_banks_and_clamps() {
        let circuit = square();
        let mut vehicle = Vehicle::new(&circuit, tuning());
        vehicle.turn_left();
        assert!((vehicle.angle() + 0.025).abs() < 1e-6);
        assert!((vehicle.slope() - 0.02).abs() < 1e-6);
        for _ in 0..200 {
            vehicle.turn_left();
        }
        assert_eq!(vehicle.slope(), crate::consts::SLOPE_MAX);
        for _ in 0..400 {
            vehicle.turn_right();
        }
        assert_eq!(vehicle.slope(), -crate::consts::SLOPE_MAX);
        // Bank decays on its own
        let before = vehicle.slope();
        vehicle.step(&circuit, 3);
        assert!((vehicle.slope() - before * 0.97).abs() < 1e-6);
    }

    #[test]
    fn test_lap_rollover() {
        let circuit = square();
        let total = circuit.total_length();
        let mut vehicle = Vehicle::new(&circuit, tuning());

        vehicle.lap_position = total - 0.25;
        assert_eq!(vehicle.check_lap(total, 3), None);

        vehicle.lap_position += 0.25 + 0.1;
        let event = vehicle.check_lap(total, 3);
        assert_eq!(event, Some(LapEvent::LapCompleted { completed: 1 }));
        assert_eq!(vehicle.lap(), 2);
        assert!((vehicle.lap_position() - 0.1).abs() < 1e-4);
        // Only one increment per check
        assert_eq!(vehicle.check_lap(total, 3), None);
    }

    #[test]
    fn test_exact_lap_length_counts() {
        let circuit = square();
        let total = circuit.total_length();
        let mut vehicle = Vehicle::new(&circuit, tuning());
        vehicle.lap_position = total;
        assert!(vehicle.check_lap(total, 3).is_some());
        assert_eq!(vehicle.lap_position(), 0.0);
    }

    #[test]
    fn test_final_lap_finishes_race() {
        let circuit = square();
        let total = circuit.total_length();
        let mut vehicle = Vehicle::new(&circuit, tuning());
        vehicle.lap = 3;
        vehicle.lap_position = total + 0.5;
        assert_eq!(vehicle.check_lap(total, 3), Some(LapEvent::RaceFinished));
        assert_eq!(vehicle.lap(), 4);
    }

    #[test]
    fn test_border_pushes_back_inside() {
        let circuit = ring();
        let mut vehicle = Vehicle::new(&circuit, tuning());
        let basis = *vehicle.basis();
        let limit = circuit.width_at(0.0) * 0.5 + circuit.border_slope() * 0.3 - 0.1;
        // At rest at spawn height, so only the hover force gives it speed
        vehicle.position = basis.transform_point(Vec3::new(limit + 0.5, 0.15, 0.0));
        assert_eq!(vehicle.velocity(), Vec3::ZERO);

        vehicle.step(&circuit, 3);

        let local = vehicle.local_position();
        assert!(local.x.abs() < limit, "still outside at {local:?}");
        // Bounced back toward the centre
        assert!(vehicle.velocity().dot(basis.right()) < 0.0, "velocity {:?}", vehicle.velocity());
        assert!(vehicle.acceleration() == 0.0);
    }

    #[test]
    fn test_border_bounce_flips_lateral_velocity() {
        let circuit = ring();
        let mut vehicle = Vehicle::new(&circuit, tuning());
        let basis = *vehicle.basis();
        let limit = circuit.width_at(0.0) * 0.5 + circuit.border_slope() * 0.3 - 0.1;
        vehicle.position = basis.transform_point(Vec3::new(limit + 0.5, 0.3, 0.0));
        vehicle.velocity = basis.right() * 0.05;
        vehicle.acceleration = 0.001;

        vehicle.step(&circuit, 3);

        assert!(vehicle.velocity().dot(basis.right()) < 0.0, "velocity {:?}", vehicle.velocity());
        assert!(vehicle.local_position().x.abs() < limit);
        // Thrust halved by the hit, then the passive decay
        let expected = 0.001 * 0.5 - crate::consts::ACCEL / 2.0;
        assert!((vehicle.acceleration() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_left_border_bounces_right() {
        let circuit = ring();
        let mut vehicle = Vehicle::new(&circuit, tuning());
        let basis = *vehicle.basis();
        vehicle.position = basis.transform_point(Vec3::new(-2.5, 0.3, 0.0));
        vehicle.velocity = -basis.right() * 0.05;

        vehicle.step(&circuit, 3);

        assert!(vehicle.velocity().dot(basis.right()) > 0.0);
        assert!(vehicle.local_position().x > -2.0);
    }

    #[test]
    fn test_driving_forward_makes_progress() {
        let circuit = ring();
        let mut vehicle = Vehicle::new(&circuit, tuning());
        for _ in 0..200 {
            vehicle.accelerate();
            vehicle.step(&circuit, 3);
            assert!(!vehicle.is_wrong_way());
        }
        assert!(vehicle.circ_position() > 3.0, "at {}", vehicle.circ_position());
        assert_eq!(vehicle.circ_position(), vehicle.lap_position());
        assert!(vehicle.local_position().x.abs() < 2.0);
        assert!(vehicle.speed() > 0.05);
    }

    #[test]
    fn test_reversing_sets_wrong_way() {
        let circuit = ring();
        let mut vehicle = Vehicle::new(&circuit, tuning());
        vehicle.velocity = vehicle.basis().backward() * 0.05;
        vehicle.step(&circuit, 3);
        assert!(vehicle.is_wrong_way());
        assert!(vehicle.circ_position() < 0.0);
    }

    #[test]
    fn test_reset_restores_start() {
        let circuit = ring();
        let mut vehicle = Vehicle::new(&circuit, tuning());
        for _ in 0..50 {
            vehicle.accelerate();
            vehicle.turn_right();
            vehicle.step(&circuit, 3);
        }
        vehicle.reset(&circuit);
        let fresh = Vehicle::new(&circuit, tuning());
        assert_eq!(vehicle.position(), fresh.position());
        assert_eq!(vehicle.velocity(), Vec3::ZERO);
        assert_eq!(vehicle.angle(), 0.0);
        assert_eq!(vehicle.circ_position(), 0.0);
    }

    #[test]
    fn test_model_basis_faces_heading() {
        let circuit = ring();
        let vehicle = Vehicle::new(&circuit, tuning());
        let model = vehicle.model_basis();
        assert!((model.forward() - vehicle.direction()).length() < 1e-5);
        assert_eq!(model.origin(), vehicle.position());
    }
}
