// src/pid.rs

//! # PID Control Module
//!
//! This module provides the single-axis PID primitive used by every control
//! stage in the crate: a compute callback and a stateful wrapper around
//! `piddiy::PidController` that adds output clamping, anti-windup and reset
//! semantics.
//!
//! The integrator is sample-based: each call to [`AxisPid::compute`]
//! accumulates the current error once and differentiates against the
//! previous call's error. The control pipeline is driven by the cadence of
//! incoming sensor events rather than a fixed-rate loop, so no time delta
//! parameter is exposed.

use piddiy::Number as PiddiyNumber;
use piddiy::PidController;
use serde::{Deserialize, Serialize};

/// Custom trait to encapsulate base number requirements.
pub trait Number: PiddiyNumber {
    /// Clamps generic PartialOrd values within a given range.
    fn clamp(self, min: Self, max: Self) -> Self {
        if self < min {
            min
        } else if max < self {
            max
        } else {
            self
        }
    }
}

impl<T: PiddiyNumber> Number for T {}

/// A proportional/integral/derivative gain triple for one control axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidGains<T> {
    /// Proportional gain.
    pub kp: T,
    /// Integral gain.
    pub ki: T,
    /// Derivative gain.
    pub kd: T,
}

impl<T> PidGains<T> {
    /// Creates a gain triple from its three components.
    pub const fn new(kp: T, ki: T, kd: T) -> Self {
        PidGains { kp, ki, kd }
    }
}

/// Control data for the single-axis stabilization callback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisControlData<T> {
    /// The current measured value for the axis.
    pub measurement: T,
    /// Lower clamp bound for the controller output.
    pub output_min: T,
    /// Upper clamp bound for the controller output.
    pub output_max: T,
}

/// Single-axis PID compute callback with clamp-aware anti-windup.
///
/// The integral accumulates the raw error once per call. Whenever the
/// unclamped output would saturate against either output bound, the
/// accumulator falls back to the current single-step error instead of
/// growing, so a long saturation cannot wind the integrator up.
pub fn compute_axis<T: Number>(
    pid: &mut PidController<T, AxisControlData<T>>,
    data: AxisControlData<T>,
) -> (T, T, T) {
    let error = pid.set_point - data.measurement;
    let derivative = error - pid.error;
    let mut integral = pid.integral + error;

    let unclamped = pid.kp * error + pid.ki * integral + pid.kd * derivative;
    if unclamped < data.output_min || data.output_max < unclamped {
        integral = error;
    }

    (error, integral, derivative)
}

/// Single-axis PID controller with configured output bounds.
///
/// This is a thin stateful wrapper over the third-party
/// [`piddiy::PidController`] primitive. It pins the compute callback to
/// [`compute_axis`], clamps every output to the configured bounds and adds
/// the reset semantics the cascade controllers rely on: a reset clears the
/// integral accumulator and the previous error while preserving gains, and
/// an optional gain swap is applied together with the reset so no caller can
/// observe a half-retuned controller between the two steps.
///
/// Example Usage
/// ```
/// use audio_esc_flight_stabilization::pid::{AxisPid, PidGains};
///
/// let mut pid = AxisPid::new(PidGains::new(0.7, 0.0, 0.0), (-100.0, 100.0));
/// pid.set_point(10.0);
///
/// let output: f64 = pid.compute(4.0);
/// assert!((output - 4.2).abs() < 1e-9);
/// ```
pub struct AxisPid<T: Number> {
    pid: PidController<T, AxisControlData<T>>,
    output_min: T,
    output_max: T,
}

impl<T: Number> AxisPid<T> {
    /// Creates a controller with the given gains and `(min, max)` output
    /// bounds. The setpoint starts at zero.
    pub fn new(gains: PidGains<T>, output_bounds: (T, T)) -> Self {
        let (output_min, output_max) = output_bounds;
        let mut pid = PidController::new();
        pid.compute_fn(compute_axis)
            .set_point(T::zero())
            .kp(gains.kp)
            .ki(gains.ki)
            .kd(gains.kd);

        AxisPid {
            pid,
            output_min,
            output_max,
        }
    }

    /// Replaces the gains without touching the accumulator or setpoint.
    pub fn set_gains(&mut self, gains: PidGains<T>) {
        self.pid.kp(gains.kp).ki(gains.ki).kd(gains.kd);
    }

    /// Returns the currently configured gains.
    pub fn gains(&self) -> PidGains<T> {
        PidGains::new(self.pid.kp, self.pid.ki, self.pid.kd)
    }

    /// Sets the target value the axis is steered towards.
    pub fn set_point(&mut self, set_point: T) {
        self.pid.set_point(set_point);
    }

    /// Runs one control step against a measurement and returns the clamped
    /// output `kp*e + ki*∫e + kd*Δe`.
    pub fn compute(&mut self, measurement: T) -> T {
        let data = AxisControlData {
            measurement,
            output_min: self.output_min,
            output_max: self.output_max,
        };
        let output = self.pid.compute(data);
        output.clamp(self.output_min, self.output_max)
    }

    /// Clears the integral accumulator and the previous error. Gains and
    /// setpoint are preserved.
    pub fn reset(&mut self) {
        self.pid.integral = T::zero();
        self.pid.error = T::zero();
    }

    /// Replaces the gains and resets in one step.
    pub fn reset_with_gains(&mut self, gains: PidGains<T>) {
        self.set_gains(gains);
        self.reset();
    }
}
