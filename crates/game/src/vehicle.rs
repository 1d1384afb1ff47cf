//! Truck kinematics: speed, steering, heading and position integration.

use crate::rig;
use engine_core::rotate_direction;
use glam::{Mat4, Vec3};
use input::DriveIntent;

/// Forward top speed, units per second.
pub const MAX_SPEED: f32 = 60.0;
/// Throttle acceleration, units per second squared.
pub const ACCEL: f32 = 20.0;
/// Steering rate at full speed, radians per second.
pub const STEER_SPEED: f32 = 1.0;
/// Below this absolute speed the wheels don't bite and steering input is
/// ignored (prevents turning in place).
pub const STEER_THRESHOLD: f32 = 1.0;

/// The truck's authoritative state. Heading is derived from the model
/// matrix every update rather than stored, so it can never drift out of
/// sync with what is drawn.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub position: Vec3,
    pub speed: f32,
    /// Steering angle about the vertical axis, radians.
    pub steering: f32,
    /// Unit heading, re-derived from the model matrix each update.
    pub forward: Vec3,
}

impl Default for Vehicle {
    fn default() -> Self {
        let mut vehicle = Self {
            position: Vec3::ZERO,
            speed: 0.0,
            steering: 0.0,
            forward: Vec3::ZERO,
        };
        vehicle.forward = rotate_direction(vehicle.model_matrix(), rig::FORWARD_LOCAL);
        vehicle
    }
}

impl Vehicle {
    /// Advance the truck by one frame of driving input.
    ///
    /// The drag model is asymmetric on purpose: braking from forward speed
    /// is twice as strong as reverse acceleration, and coasting only decays
    /// forward speed (a reversing truck keeps rolling until braked).
    pub fn update(&mut self, intent: DriveIntent, dt: f32) {
        if intent.throttle {
            self.speed += ACCEL * dt;
        } else if intent.brake {
            if self.speed > 0.0 {
                self.speed -= 2.0 * ACCEL * dt;
            } else {
                self.speed -= ACCEL * dt;
            }
        } else if self.speed > 0.0 {
            self.speed = (self.speed - 0.5 * ACCEL * dt).max(0.0);
        }
        self.speed = self.speed.clamp(-MAX_SPEED / 5.0, MAX_SPEED);

        // Turn rate scales with the speed fraction; the signum cancels the
        // negative fraction in reverse, so the steer key turns the same
        // direction regardless of travel direction.
        if self.speed.abs() > STEER_THRESHOLD {
            self.steering += STEER_SPEED
                * (self.speed / MAX_SPEED)
                * self.speed.signum()
                * intent.steer_axis
                * dt;
        }

        self.forward = rotate_direction(self.model_matrix(), rig::FORWARD_LOCAL);
        self.position += self.speed * self.forward * dt;
    }

    /// Full model matrix: translation, steering, then the fixed mesh-axis
    /// corrections.
    pub fn model_matrix(&self) -> Mat4 {
        rig::vehicle_model_matrix(self.position, self.steering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> DriveIntent {
        DriveIntent::default()
    }

    fn throttle() -> DriveIntent {
        DriveIntent {
            throttle: true,
            ..Default::default()
        }
    }

    fn brake() -> DriveIntent {
        DriveIntent {
            brake: true,
            ..Default::default()
        }
    }

    #[test]
    fn speed_stays_clamped() {
        let mut truck = Vehicle::default();
        for _ in 0..1000 {
            truck.update(throttle(), 0.1);
            assert!(truck.speed <= MAX_SPEED);
        }
        assert_eq!(truck.speed, MAX_SPEED);
        for _ in 0..1000 {
            truck.update(brake(), 0.1);
            assert!(truck.speed >= -MAX_SPEED / 5.0);
        }
        assert_eq!(truck.speed, -MAX_SPEED / 5.0);
    }

    #[test]
    fn braking_is_stronger_than_reverse() {
        let mut truck = Vehicle::default();
        truck.speed = 10.0;
        truck.update(brake(), 0.1);
        let braking_drop = 10.0 - truck.speed;

        let mut truck = Vehicle::default();
        truck.speed = -1.0;
        truck.update(brake(), 0.1);
        let reverse_drop = -1.0 - truck.speed;

        assert!((braking_drop - 2.0 * ACCEL * 0.1).abs() < 1e-4);
        assert!((reverse_drop - ACCEL * 0.1).abs() < 1e-4);
    }

    #[test]
    fn coasting_decays_forward_only() {
        let mut truck = Vehicle::default();
        truck.speed = 0.5;
        truck.update(idle(), 0.1);
        // Decay clamps at zero, never swings negative.
        assert_eq!(truck.speed, 0.0);

        let mut truck = Vehicle::default();
        truck.speed = -5.0;
        truck.update(idle(), 0.1);
        // No automatic deceleration from reverse.
        assert_eq!(truck.speed, -5.0);
    }

    #[test]
    fn steering_ignored_below_threshold() {
        let mut truck = Vehicle::default();
        truck.speed = 0.0;
        let steer = DriveIntent {
            steer_axis: 1.0,
            ..Default::default()
        };
        truck.update(steer, 0.1);
        assert_eq!(truck.steering, 0.0);

        truck.speed = 20.0;
        truck.update(steer, 0.1);
        assert!(truck.steering > 0.0);
    }

    #[test]
    fn reverse_steering_turns_the_same_way_as_forward() {
        let steer = DriveIntent {
            steer_axis: 1.0,
            ..Default::default()
        };

        let mut truck = Vehicle::default();
        truck.speed = 10.0;
        truck.update(steer, 0.1);
        let forward_delta = truck.steering;

        let mut truck = Vehicle::default();
        truck.speed = -10.0;
        truck.update(steer, 0.1);
        let reverse_delta = truck.steering;

        // The signum cancels the negative speed fraction: same key, same
        // turn direction, whichever way the truck is rolling.
        assert!(forward_delta > 0.0);
        assert!(reverse_delta > 0.0);
    }

    #[test]
    fn forward_is_unit_length_everywhere() {
        let mut truck = Vehicle::default();
        let steer = DriveIntent {
            throttle: true,
            steer_axis: -1.0,
            ..Default::default()
        };
        for _ in 0..500 {
            truck.update(steer, 0.016);
            assert!((truck.forward.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn drives_along_heading() {
        let mut truck = Vehicle::default();
        truck.speed = 10.0;
        let heading = truck.forward;
        truck.update(idle(), 0.1);
        let moved = truck.position;
        // One Euler step along the (re-derived, unchanged) heading.
        assert!((moved - heading * truck.speed * 0.1).length() < 1e-4);
    }

    #[test]
    fn zero_steering_heads_negative_z() {
        let truck = Vehicle::default();
        assert!((truck.forward - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }
}
