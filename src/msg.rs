// src/msg.rs

//! # Message Schema Module
//!
//! Serializable schemas for everything that crosses the message bus:
//! inbound IMU samples and pilot commands, the gain-update and
//! enable/disable service pairs, and the outbound motor command. Only the
//! schemas are in scope; the transport carrying them is not.

use serde::{Deserialize, Serialize};

use crate::frame::{Quaternion, Vector3};
use crate::pid::PidGains;

/// Service acknowledgement policy.
///
/// Gain-update and enable/disable requests are honored as successful
/// whatever their content; out-of-range values are accepted as-is and there
/// is no rejection path. Every service response goes through this one
/// function, so the policy can be tightened later without touching call
/// sites.
pub fn acknowledge() -> bool {
    true
}

/// A message timestamp, split ROS-style into seconds and nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stamp {
    /// Whole seconds.
    pub secs: u32,
    /// Nanoseconds within the second.
    pub nsecs: u32,
}

/// Common message header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Header {
    /// Monotonic sequence number.
    pub seq: u32,
    /// Capture time of the payload.
    pub stamp: Stamp,
    /// Coordinate frame the payload is expressed in.
    pub frame_id: String,
}

/// An inertial sample: orientation, angular velocity and linear
/// acceleration with their covariance matrices (row-major 3x3, zero-filled
/// when unknown).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImuSample {
    /// Header carrying sequence, stamp and frame id.
    pub header: Header,
    /// Orientation quaternion from the fusion pipeline.
    pub orientation: Quaternion<f64>,
    /// Angular velocity in rad/s.
    pub angular_velocity: Vector3<f64>,
    /// Linear acceleration in m/s^2, gravity removed.
    pub linear_acceleration: Vector3<f64>,
    /// Orientation covariance, zero-filled if unknown.
    pub orientation_covariance: [f64; 9],
    /// Angular velocity covariance, zero-filled if unknown.
    pub angular_velocity_covariance: [f64; 9],
    /// Linear acceleration covariance, zero-filled if unknown.
    pub linear_acceleration_covariance: [f64; 9],
}

/// Pilot thrust command.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThrustCommand {
    /// Commanded thrust scalar.
    pub thrust: f64,
}

/// Pilot yaw-rate command.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct YawRateCommand {
    /// Commanded turn rate.
    pub turn_rate: f64,
}

/// Pilot attitude command.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AttitudeCommand {
    /// Commanded roll angle.
    pub roll: f64,
    /// Commanded pitch angle.
    pub pitch: f64,
}

/// Gain-update service request carrying one PID triple per controller axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GainUpdateRequest {
    /// Roll-rate controller gains.
    pub roll_rate: PidGains<f64>,
    /// Pitch-rate controller gains.
    pub pitch_rate: PidGains<f64>,
    /// Yaw-rate controller gains.
    pub yaw_rate: PidGains<f64>,
    /// Roll-attitude controller gains.
    pub roll_attitude: PidGains<f64>,
    /// Pitch-attitude controller gains.
    pub pitch_attitude: PidGains<f64>,
}

/// Gain-update service response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GainUpdateResponse {
    /// Whether the request was applied; see [`acknowledge`].
    pub success: bool,
}

/// Outbound motor command with four duty percentages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotorCommand {
    /// Motor 1 duty percentage.
    pub m1: f64,
    /// Motor 2 duty percentage.
    pub m2: f64,
    /// Motor 3 duty percentage.
    pub m3: f64,
    /// Motor 4 duty percentage.
    pub m4: f64,
}

impl MotorCommand {
    /// The four duties in motor index order.
    pub fn duties(&self) -> [f64; 4] {
        [self.m1, self.m2, self.m3, self.m4]
    }
}

/// Enable/disable service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnableRequest {
    /// True to enable motor output, false to disable it.
    pub enable: bool,
}

/// Enable/disable service response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnableResponse {
    /// Whether the request was applied; see [`acknowledge`].
    pub success: bool,
}
