// src/frame.rs

//! # Coordinate Frame Module
//!
//! This module provides the scalar-triple and quaternion types shared by the
//! control pipeline and the message schemas, the quaternion-to-Euler
//! conversion used on the sensor path, and the device-to-body frame adapter
//! that every command or measurement crosses exactly once on its way into a
//! controller.

use num_traits::Float;
use serde::{Deserialize, Serialize};

use crate::pid::Number;

/// A generic 3-axis scalar triple.
///
/// The semantics of the components (angles, angular rates, PID terms) depend
/// on the context in which the vector is used; a vector is never reinterpreted
/// across a frame boundary without going through [`device_to_body`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3<T> {
    /// First axis component.
    pub x: T,
    /// Second axis component.
    pub y: T,
    /// Third axis component.
    pub z: T,
}

impl<T> Vector3<T> {
    /// Creates a vector from its three components.
    pub fn new(x: T, y: T, z: T) -> Self {
        Vector3 { x, y, z }
    }
}

/// A unit orientation quaternion.
///
/// The producer guarantees normalization; the conversion below tolerates the
/// small drift a sensor fusion pipeline accumulates and performs no explicit
/// renormalization.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quaternion<T> {
    /// Scalar component.
    pub w: T,
    /// First vector component.
    pub x: T,
    /// Second vector component.
    pub y: T,
    /// Third vector component.
    pub z: T,
}

impl<T> Quaternion<T> {
    /// Creates a quaternion from its scalar and vector components.
    pub fn new(w: T, x: T, y: T, z: T) -> Self {
        Quaternion { w, x, y, z }
    }
}

/// Converts an orientation quaternion to Euler angles
/// `{x: roll, y: pitch, z: yaw}`.
///
/// The negations and term ordering encode the assumed alignment between the
/// sensor frame and the body frame and must be kept exactly as written; they
/// are not the textbook identities.
// TODO: verify the sensor-to-body sign convention against hardware; it has
// only been exercised with the phone flat, screen up.
pub fn quaternion_to_euler<T: Number + Float>(q: Quaternion<T>) -> Vector3<T> {
    let two = T::one() + T::one();

    // Yaw (z-axis rotation)
    let siny = two * (-q.y * q.z + q.w * q.x);
    let cosy = -q.z * q.z + q.y * q.y - q.x * q.x + q.w * q.w;
    let yaw = -siny.atan2(cosy);

    // Roll (x-axis rotation)
    let sinr = two * (q.x * q.y + q.w * q.z);
    let roll = -sinr.asin();

    // Pitch (y-axis rotation)
    let sinp = two * (-q.x * q.z + q.w * q.y);
    let cosp = -q.z * q.z - q.y * q.y + q.x * q.x + q.w * q.w;
    let pitch = -sinp.atan2(cosp);

    Vector3::new(roll, pitch, yaw)
}

/// Adapts a device-frame vector to the controller body frame.
///
/// The device's x axis carries pitch and its y axis carries roll, so the two
/// components swap places; z passes through. Commands and measurements cross
/// frames only here, never through an inlined swap at a call site.
pub fn device_to_body<T>(v: Vector3<T>) -> Vector3<T> {
    Vector3::new(v.y, v.x, v.z)
}
