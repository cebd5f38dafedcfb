// src/flight.rs

//! # Flight Controller Node
//!
//! The control-pipeline context: consumes pilot commands and IMU samples,
//! drives the attitude and rate cascade, mixes the result and emits motor
//! commands. One instance is owned by whatever wires the crate to the
//! message bus; all methods run on that single context, at the cadence of
//! the incoming events.

use crate::controller::{AttitudeController, RateController};
use crate::frame::{quaternion_to_euler, Vector3};
use crate::mixer;
use crate::msg::{
    acknowledge, AttitudeCommand, GainUpdateRequest, GainUpdateResponse, ImuSample, MotorCommand,
    ThrustCommand, YawRateCommand,
};
use crate::pid::PidGains;

/// Default roll-rate gains, tuned on the reference airframe.
const DEFAULT_ROLL_RATE_GAINS: PidGains<f64> = PidGains::new(0.7, 0.0, 0.0);
/// Default pitch-rate gains.
const DEFAULT_PITCH_RATE_GAINS: PidGains<f64> = PidGains::new(0.7, 0.0, 0.0);
/// Default yaw-rate gains.
const DEFAULT_YAW_RATE_GAINS: PidGains<f64> = PidGains::new(2.5, 0.0, 0.0);
/// Default roll-attitude gains.
const DEFAULT_ROLL_ATT_GAINS: PidGains<f64> = PidGains::new(4.5, 0.0, 0.0);
/// Default pitch-attitude gains.
const DEFAULT_PITCH_ATT_GAINS: PidGains<f64> = PidGains::new(4.5, 0.0, 0.0);

/// Controller outputs are percentages of full scale.
const FULL_SCALE: (f64, f64) = (-100.0, 100.0);

/// Cascaded flight controller turning sensor samples and pilot commands
/// into motor commands.
pub struct FlightController {
    thrust: f64,
    roll: f64,
    pitch: f64,
    yaw: f64,
    attitude_controller: AttitudeController<f64>,
    rate_controller: RateController<f64>,
}

impl FlightController {
    /// Creates a controller with the default gains and zeroed pilot state.
    pub fn new() -> Self {
        FlightController {
            thrust: 0.0,
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
            attitude_controller: AttitudeController::new(
                DEFAULT_ROLL_ATT_GAINS,
                DEFAULT_PITCH_ATT_GAINS,
                FULL_SCALE,
            ),
            rate_controller: RateController::new(
                DEFAULT_ROLL_RATE_GAINS,
                DEFAULT_PITCH_RATE_GAINS,
                DEFAULT_YAW_RATE_GAINS,
                FULL_SCALE,
            ),
        }
    }

    /// Runs one control tick on an incoming IMU sample and returns the
    /// resulting motor command.
    pub fn handle_imu(&mut self, sample: &ImuSample) -> MotorCommand {
        let orientation = quaternion_to_euler(sample.orientation);

        // Attitude stage: orientation error becomes angular-rate
        // adjustments, with the commanded yaw rate dropped into the open z
        // slot.
        let mut rate_adjustments = self.attitude_controller.output(orientation);
        rate_adjustments.z = self.yaw;

        // Rate stage on the adjusted vector, then X-frame mixing.
        let thrust_adjustments = self.rate_controller.output(rate_adjustments);
        let [m1, m2, m3, m4] = mixer::mix(self.thrust, thrust_adjustments);

        MotorCommand { m1, m2, m3, m4 }
    }

    /// Applies a pilot thrust command. Clamping the resulting base thrust
    /// is left to the mixer's per-motor duty clamp.
    pub fn handle_thrust(&mut self, command: &ThrustCommand) {
        self.thrust = 60.0 - command.thrust * 3.0;
    }

    /// Applies a pilot yaw-rate command and refreshes the desired attitude.
    pub fn handle_yaw_rate(&mut self, command: &YawRateCommand) {
        self.yaw = command.turn_rate;
        self.push_desired_attitude();
    }

    /// Applies a pilot attitude command and refreshes the desired attitude.
    pub fn handle_attitude(&mut self, command: &AttitudeCommand) {
        self.roll = command.roll;
        self.pitch = command.pitch;
        self.push_desired_attitude();
    }

    /// Re-tunes and resets all five PID controllers from a gain-update
    /// request. The request is always acknowledged as successful; gains are
    /// applied exactly as received.
    pub fn handle_gain_update(&mut self, request: &GainUpdateRequest) -> GainUpdateResponse {
        self.rate_controller
            .reset(request.roll_rate, request.pitch_rate, request.yaw_rate);
        self.attitude_controller
            .reset(request.roll_attitude, request.pitch_attitude);
        log::info!("controller gains retuned: {:?}", request);

        GainUpdateResponse {
            success: acknowledge(),
        }
    }

    /// Pushes the commanded state as a device-frame desired vector: x
    /// carries pitch, y carries roll, per the device axis convention.
    fn push_desired_attitude(&mut self) {
        let commanded = Vector3::new(self.pitch, self.roll, self.yaw);
        self.attitude_controller.set_desired_attitude(commanded);
    }
}

impl Default for FlightController {
    fn default() -> Self {
        Self::new()
    }
}
