// src/controller/rate.rs

//! # Rate Controller
//!
//! The inner stage of the cascade: three single-axis PID controllers (roll,
//! pitch, yaw) that steer measured angular rates towards the desired rates
//! and emit per-axis thrust adjustments for the motor mixer.

use crate::frame::{device_to_body, Vector3};
use crate::pid::{AxisPid, Number, PidGains};

/// Rate controller producing thrust adjustments from angular-rate error.
pub struct RateController<T: Number> {
    roll_pid: AxisPid<T>,
    pitch_pid: AxisPid<T>,
    yaw_pid: AxisPid<T>,
}

impl<T: Number> RateController<T> {
    /// Creates a controller from per-axis gains and shared `(min, max)`
    /// output bounds.
    pub fn new(
        roll: PidGains<T>,
        pitch: PidGains<T>,
        yaw: PidGains<T>,
        output_bounds: (T, T),
    ) -> Self {
        RateController {
            roll_pid: AxisPid::new(roll, output_bounds),
            pitch_pid: AxisPid::new(pitch, output_bounds),
            yaw_pid: AxisPid::new(yaw, output_bounds),
        }
    }

    /// Sets the desired angular rates from a device-frame command vector.
    /// Roll and pitch swap per the device convention; yaw passes through.
    pub fn set_desired_rates(&mut self, rates: Vector3<T>) {
        let desired = device_to_body(rates);
        self.roll_pid.set_point(desired.x);
        self.pitch_pid.set_point(desired.y);
        self.yaw_pid.set_point(desired.z);
    }

    /// Runs all three axis controllers against a device-frame rate
    /// measurement and returns thrust adjustments
    /// `{x: roll, y: pitch, z: yaw}` in percent of full scale.
    pub fn output(&mut self, sensor_rates: Vector3<T>) -> Vector3<T> {
        let measured = device_to_body(sensor_rates);

        let roll_thrust_adj = self.roll_pid.compute(measured.x);
        let pitch_thrust_adj = self.pitch_pid.compute(measured.y);
        let yaw_thrust_adj = self.yaw_pid.compute(measured.z);

        Vector3::new(roll_thrust_adj, pitch_thrust_adj, yaw_thrust_adj)
    }

    /// Re-tunes and resets all three axis controllers in one step.
    pub fn reset(&mut self, roll: PidGains<T>, pitch: PidGains<T>, yaw: PidGains<T>) {
        self.roll_pid.reset_with_gains(roll);
        self.pitch_pid.reset_with_gains(pitch);
        self.yaw_pid.reset_with_gains(yaw);
    }
}
