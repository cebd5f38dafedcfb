// src/motor.rs

//! # Motor Output Module
//!
//! This module owns everything on the actuator side of the duty hand-off:
//! the shared [`duty::DutyState`], the real-time [`synth::Synthesizer`] and
//! the [`Motors`] lifecycle manager that starts, stops, pauses and resumes
//! the synthesis thread.
//!
//! The audio device itself is out of scope and appears only as the
//! [`AudioSink`] trait: the device reports its fixed sample rate and minimum
//! buffer length, and accepts blocking writes of interleaved 16-bit stereo
//! buffers.

pub mod duty;
pub mod synth;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use thiserror::Error;

use crate::msg::{acknowledge, EnableRequest, EnableResponse, MotorCommand};
use duty::DutyState;
use synth::{Synthesizer, SynthesizerConfig};

/// Boundary trait for the audio output device driving the ESCs.
pub trait AudioSink: Send {
    /// Native output sample rate in Hz, fixed for the device.
    fn sample_rate(&self) -> u32;

    /// Smallest interleaved buffer length the device accepts without
    /// underrunning.
    fn min_buffer_len(&self) -> usize;

    /// Blocking write of one interleaved 16-bit stereo buffer.
    fn write(&mut self, samples: &[i16]) -> io::Result<()>;
}

/// Errors reported by the motor subsystem.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MotorError {
    /// A duty update named a motor outside `0..4`. Caller error, not
    /// recoverable at this layer.
    #[error("motor index {0} out of range, must be below 4")]
    InvalidMotorIndex(usize),
}

/// Lifecycle manager for the motor-signal synthesis thread.
///
/// State machine: `start` spawns the synthesis thread disabled and is a
/// no-op while a thread exists; `resume` enables output; `pause` disables
/// output and forces all four duties to zero as a safety action; `stop`
/// requests termination and joins the thread before returning, so a
/// restart can never produce two output streams.
///
/// Duty updates are accepted in every state. While disabled they land in
/// the shared state but the synthesizer gates its amplitude to silence, so
/// they cannot reach the motors.
pub struct Motors {
    config: SynthesizerConfig,
    duties: Arc<DutyState>,
    enabled: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<Box<dyn AudioSink>>>,
    sink: Option<Box<dyn AudioSink>>,
}

impl Motors {
    /// Creates a stopped, disabled motor subsystem on the given audio
    /// device. The synthesis sample rate is queried from the device here
    /// and fixed for the lifetime of the subsystem; all four motors are
    /// parked at the bottom of the ESC band.
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        let config = SynthesizerConfig::new(sink.sample_rate());
        let motors = Motors {
            config,
            duties: Arc::new(DutyState::new()),
            enabled: Arc::new(AtomicBool::new(false)),
            stop: Arc::new(AtomicBool::new(false)),
            handle: None,
            sink: Some(sink),
        };
        motors.zero_duties();
        motors
    }

    /// Returns the active synthesis configuration.
    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// Sets one motor's commanded duty percentage.
    ///
    /// The raw duty is clamped to `[0, 100]`, mapped into the ESC-safe band
    /// and truncated to the configured resolution before it is stored; the
    /// synthesizer consumes the mapped value directly.
    pub fn set_motor_duty(&self, motor: usize, duty: f64) -> Result<(), MotorError> {
        if motor >= DutyState::MOTOR_COUNT {
            return Err(MotorError::InvalidMotorIndex(motor));
        }
        self.duties.store(motor, self.config.map_duty(duty));
        Ok(())
    }

    /// Reads back one motor's mapped duty, for telemetry.
    pub fn duty(&self, motor: usize) -> Result<f64, MotorError> {
        if motor >= DutyState::MOTOR_COUNT {
            return Err(MotorError::InvalidMotorIndex(motor));
        }
        Ok(self.duties.load(motor))
    }

    /// Applies a motor-command message to all four motors.
    pub fn apply_command(&self, command: &MotorCommand) {
        for (motor, duty) in command.duties().iter().enumerate() {
            // Indices come from the fixed message layout and are in range.
            let _ = self.set_motor_duty(motor, *duty);
        }
    }

    /// Spawns the synthesis thread, disabled. Calling `start` while a
    /// thread exists is a no-op, so there is never more than one stream.
    pub fn start(&mut self) -> io::Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }
        let Some(sink) = self.sink.take() else {
            // Only reachable after a panicked thread took the sink down
            // with it; the subsystem stays stopped.
            log::error!("audio sink lost, motor subsystem cannot start");
            return Ok(());
        };

        self.enabled.store(false, Ordering::Release);
        self.stop.store(false, Ordering::Release);
        let synth = Synthesizer::new(
            self.config,
            Arc::clone(&self.duties),
            Arc::clone(&self.enabled),
            Arc::clone(&self.stop),
        );
        let handle = thread::Builder::new()
            .name("motor-signal".into())
            .spawn(move || synth.run(sink))?;
        self.handle = Some(handle);

        log::info!(
            "motor signal thread started at {} Hz",
            self.config.sample_rate
        );
        Ok(())
    }

    /// Requests termination and joins the synthesis thread. Returns once
    /// the thread has fully exited; a stop while already stopped is a
    /// no-op.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.stop.store(true, Ordering::Release);
        match handle.join() {
            Ok(sink) => self.sink = Some(sink),
            Err(_) => log::error!("motor signal thread panicked, audio sink lost"),
        }
        self.stop.store(false, Ordering::Release);
        self.enabled.store(false, Ordering::Release);
        log::info!("motor signal thread stopped");
    }

    /// Disables motor output and forces all four duties to zero. Pausing
    /// while already disabled is a no-op apart from re-zeroing the duties.
    pub fn pause(&self) {
        self.zero_duties();
        self.enabled.store(false, Ordering::Release);
        log::info!("motor output paused, duties zeroed");
    }

    /// Enables motor output. The synthesizer picks the flag up within one
    /// buffer fill.
    pub fn resume(&self) {
        if !self.is_enabled() {
            self.enabled.store(true, Ordering::Release);
            log::info!("motor output resumed");
        }
    }

    /// Whether motor output is currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Whether the synthesis thread is alive. Turns false when the thread
    /// exits unexpectedly (fatal, no auto-restart).
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }

    /// Handles an enable/disable service request per the state machine.
    /// The request is always acknowledged as successful.
    pub fn handle_enable(&self, request: &EnableRequest) -> EnableResponse {
        if request.enable {
            self.resume();
        } else {
            self.pause();
        }
        EnableResponse {
            success: acknowledge(),
        }
    }

    fn zero_duties(&self) {
        for motor in 0..DutyState::MOTOR_COUNT {
            let _ = self.set_motor_duty(motor, 0.0);
        }
    }
}

impl Drop for Motors {
    fn drop(&mut self) {
        self.stop();
    }
}
