// src/imu.rs

//! # IMU Intake Module
//!
//! Collects the device's sensor event stream into one coherent inertial
//! state and builds the periodic [`ImuSample`] messages republished for the
//! flight controller and diagnostic consumers. Event kinds the sampler does
//! not consume are ignored, so new sensor types can appear upstream without
//! breaking the intake.

use crate::frame::{Quaternion, Vector3};
use crate::msg::{Header, ImuSample, Stamp};

/// One hardware sensor event.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorEvent {
    /// Fused orientation from the rotation-vector sensor.
    Orientation(Quaternion<f64>),
    /// Angular velocity from the gyroscope, rad/s.
    Gyroscope(Vector3<f64>),
    /// Linear acceleration with gravity removed, m/s^2.
    LinearAcceleration(Vector3<f64>),
    /// Magnetic field vector; delivered by the device but not consumed
    /// here.
    MagneticField(Vector3<f64>),
}

/// Aggregates sensor events and republishes them as [`ImuSample`] messages.
pub struct ImuSampler {
    frame_id: String,
    orientation: Quaternion<f64>,
    angular_velocity: Vector3<f64>,
    linear_acceleration: Vector3<f64>,
    seq: u32,
}

impl ImuSampler {
    /// Creates a sampler publishing under the given frame id, with all
    /// inertial state zeroed until the first events arrive.
    pub fn new(frame_id: impl Into<String>) -> Self {
        ImuSampler {
            frame_id: frame_id.into(),
            orientation: Quaternion::default(),
            angular_velocity: Vector3::default(),
            linear_acceleration: Vector3::default(),
            seq: 0,
        }
    }

    /// Folds one sensor event into the aggregated state. Unconsumed event
    /// kinds are a silent no-op.
    pub fn handle_event(&mut self, event: &SensorEvent) {
        match event {
            SensorEvent::Orientation(q) => self.orientation = *q,
            SensorEvent::Gyroscope(v) => self.angular_velocity = *v,
            SensorEvent::LinearAcceleration(v) => self.linear_acceleration = *v,
            _ => {}
        }
    }

    /// Builds the next republished sample, stamped by the caller. The
    /// sequence number increments per sample; covariances are unknown and
    /// therefore zero-filled.
    pub fn sample(&mut self, stamp: Stamp) -> ImuSample {
        let sample = ImuSample {
            header: Header {
                seq: self.seq,
                stamp,
                frame_id: self.frame_id.clone(),
            },
            orientation: self.orientation,
            angular_velocity: self.angular_velocity,
            linear_acceleration: self.linear_acceleration,
            orientation_covariance: [0.0; 9],
            angular_velocity_covariance: [0.0; 9],
            linear_acceleration_covariance: [0.0; 9],
        };
        self.seq += 1;
        sample
    }
}
