// src/mixer.rs

//! # Motor Mixer Module
//!
//! This module provides the stateless X-frame mixing step that distributes
//! the base thrust and the per-axis thrust adjustments across the four
//! motors. It is invoked once per control tick; the result is what gets
//! written into the shared duty state.

use crate::frame::Vector3;

/// Lower bound of a motor duty percentage.
pub const DUTY_MIN: f64 = 0.0;
/// Upper bound of a motor duty percentage.
pub const DUTY_MAX: f64 = 100.0;

/// Combines the base thrust with roll/pitch/yaw thrust adjustments into four
/// motor duty percentages using the X-frame mixing matrix, clamping each
/// result to `[DUTY_MIN, DUTY_MAX]`.
///
/// Motor order is `[m1, m2, m3, m4]` for the four diagonal corners of the
/// frame.
pub fn mix(thrust: f64, adjustments: Vector3<f64>) -> [f64; 4] {
    let roll_thrust_adj = adjustments.x;
    let pitch_thrust_adj = adjustments.y;
    let yaw_thrust_adj = adjustments.z;

    let m1 = thrust - roll_thrust_adj - pitch_thrust_adj - yaw_thrust_adj;
    let m2 = thrust + roll_thrust_adj - pitch_thrust_adj + yaw_thrust_adj;
    let m3 = thrust + roll_thrust_adj + pitch_thrust_adj - yaw_thrust_adj;
    let m4 = thrust - roll_thrust_adj + pitch_thrust_adj + yaw_thrust_adj;

    [
        m1.clamp(DUTY_MIN, DUTY_MAX),
        m2.clamp(DUTY_MIN, DUTY_MAX),
        m3.clamp(DUTY_MIN, DUTY_MAX),
        m4.clamp(DUTY_MIN, DUTY_MAX),
    ]
}
