// src/controller/attitude.rs

//! # Attitude Controller
//!
//! The outer stage of the cascade: two single-axis PID controllers (roll and
//! pitch) that steer the measured orientation towards the desired attitude
//! and emit angular-rate adjustments. Yaw is not closed-loop at this stage;
//! the caller overwrites the z slot of the output with the externally
//! commanded yaw rate before handing the vector to the rate stage.

use crate::frame::{device_to_body, Vector3};
use crate::pid::{AxisPid, Number, PidGains};

/// Attitude controller producing angular-rate setpoints from orientation
/// error.
pub struct AttitudeController<T: Number> {
    roll_pid: AxisPid<T>,
    pitch_pid: AxisPid<T>,
}

impl<T: Number> AttitudeController<T> {
    /// Creates a controller from per-axis gains and shared `(min, max)`
    /// output bounds.
    pub fn new(roll: PidGains<T>, pitch: PidGains<T>, output_bounds: (T, T)) -> Self {
        AttitudeController {
            roll_pid: AxisPid::new(roll, output_bounds),
            pitch_pid: AxisPid::new(pitch, output_bounds),
        }
    }

    /// Sets the desired attitude from a device-frame command vector.
    pub fn set_desired_attitude(&mut self, orientation: Vector3<T>) {
        let desired = device_to_body(orientation);
        self.roll_pid.set_point(desired.x);
        self.pitch_pid.set_point(desired.y);
    }

    /// Runs both axis controllers against a device-frame orientation
    /// measurement and returns angular-rate adjustments
    /// `{x: roll, y: pitch, z: 0}` in percent of full scale.
    pub fn output(&mut self, sensor_orientation: Vector3<T>) -> Vector3<T> {
        let measured = device_to_body(sensor_orientation);

        let roll_rate_adj = self.roll_pid.compute(measured.x);
        let pitch_rate_adj = self.pitch_pid.compute(measured.y);

        // The z slot stays zero; the caller fills in the commanded yaw rate.
        Vector3::new(roll_rate_adj, pitch_rate_adj, T::zero())
    }

    /// Re-tunes and resets both axis controllers in one step.
    pub fn reset(&mut self, roll: PidGains<T>, pitch: PidGains<T>) {
        self.roll_pid.reset_with_gains(roll);
        self.pitch_pid.reset_with_gains(pitch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    const FULL_SCALE: (f64, f64) = (-100.0, 100.0);

    fn proportional_controller(kp: f64) -> AttitudeController<f64> {
        AttitudeController::new(
            PidGains::new(kp, 0.0, 0.0),
            PidGains::new(kp, 0.0, 0.0),
            FULL_SCALE,
        )
    }

    /// Test that a matching measurement produces no adjustment.
    #[test]
    fn test_attitude_no_error_no_adjustment() {
        let mut controller = proportional_controller(4.5);
        controller.set_desired_attitude(Vector3::new(10.0, 5.0, 0.0));

        let out = controller.output(Vector3::new(10.0, 5.0, 0.0));
        assert!(
            vector_close((0.0, 0.0, 0.0), (out.x, out.y, out.z)),
            "Matching orientation should produce zero adjustments."
        );
    }

    /// Test that commands and measurements use the device frame convention.
    #[test]
    fn test_attitude_device_frame_swap() {
        let mut controller = proportional_controller(1.0);
        // Device x carries pitch, device y carries roll.
        controller.set_desired_attitude(Vector3::new(2.0, 6.0, 0.0));

        let out = controller.output(Vector3::new(0.0, 0.0, 0.0));
        assert!(
            vector_close((6.0, 2.0, 0.0), (out.x, out.y, out.z)),
            "Roll adjustment should follow device y, pitch device x."
        );
    }

    /// Test that the yaw slot of the output is always zero.
    #[test]
    fn test_attitude_yaw_slot_stays_zero() {
        let mut controller = proportional_controller(4.5);
        controller.set_desired_attitude(Vector3::new(3.0, -3.0, 99.0));

        let out = controller.output(Vector3::new(-1.0, 1.0, 42.0));
        assert!(
            value_close(0.0, out.z),
            "The z slot is reserved for the commanded yaw rate."
        );
    }

    /// Test that reset re-tunes both axes and clears their accumulators.
    #[test]
    fn test_attitude_reset_retunes_both_axes() {
        let mut controller = AttitudeController::new(
            PidGains::new(0.0, 1.0, 0.0),
            PidGains::new(0.0, 1.0, 0.0),
            FULL_SCALE,
        );
        controller.set_desired_attitude(Vector3::new(5.0, 5.0, 0.0));
        let _ = controller.output(Vector3::new(0.0, 0.0, 0.0));

        controller.reset(PidGains::new(2.0, 0.0, 0.0), PidGains::new(3.0, 0.0, 0.0));
        let out = controller.output(Vector3::new(0.0, 0.0, 0.0));
        assert!(
            vector_close((2.0 * 5.0, 3.0 * 5.0, 0.0), (out.x, out.y, out.z)),
            "After reset the output should reflect the new gains only."
        );
    }
}
