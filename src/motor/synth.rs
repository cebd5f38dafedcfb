// src/motor/synth.rs

//! # Motor Signal Synthesizer
//!
//! Renders the four motor duties as a continuous PWM-encoded stereo stream.
//! Each channel time-division-multiplexes two motors over one carrier
//! period: the first half-period carries motor A at a strong amplitude, the
//! second half-period carries motor B at a weak amplitude, so the receiving
//! ESC hardware can separate the two tones. The left channel carries motors
//! 1 and 2, the right channel motors 3 and 4.
//!
//! By construction the second motor of a pair can only occupy the second
//! half-period, which caps its representable duty at 50%. With the default
//! 5–10% ESC band the cap never binds; it is an inherent property of the
//! encoding, not an error.

use std::f64::consts::{PI, TAU};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::duty::DutyState;
use super::AudioSink;

/// Fraction of full-scale amplitude for the first motor of each channel.
const AMPLITUDE_PRIMARY: i16 = (8 * i16::MAX as i32 / 100) as i16;
/// Fraction of full-scale amplitude for the second motor of each channel.
const AMPLITUDE_SECONDARY: i16 = (2 * i16::MAX as i32 / 100) as i16;

/// Synthesis parameters. The sample rate comes from the audio device and is
/// fixed at construction; everything else defaults to the ESC-safe values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesizerConfig {
    /// Output sample rate in Hz, as reported by the audio device.
    pub sample_rate: u32,
    /// PWM carrier frequency in Hz.
    pub carrier_freq: f64,
    /// Bottom of the ESC-safe duty band, in percent.
    pub lower_bound: f64,
    /// Top of the ESC-safe duty band, in percent.
    pub upper_bound: f64,
    /// Number of decimal places kept (by truncation) on a mapped duty.
    pub resolution: u32,
}

impl SynthesizerConfig {
    /// Creates a configuration for the given device sample rate with the
    /// default 50 Hz carrier, 5–10% ESC band and two-decimal resolution.
    pub fn new(sample_rate: u32) -> Self {
        SynthesizerConfig {
            sample_rate,
            carrier_freq: 50.0,
            lower_bound: 5.0,
            upper_bound: 10.0,
            resolution: 2,
        }
    }

    /// Maps a raw commanded duty in `[0, 100]` into the ESC-safe band and
    /// floor-truncates the result to `resolution` decimal places. Inputs
    /// outside `[0, 100]` are clamped, never rejected.
    pub fn map_duty(&self, duty: f64) -> f64 {
        let duty = duty.clamp(0.0, 100.0);
        let mapped = duty / 100.0 * (self.upper_bound - self.lower_bound) + self.lower_bound;
        let scale = 10f64.powi(self.resolution as i32);
        (mapped * scale).floor() / scale
    }

    /// Phase advance per channel sample, in radians.
    fn phase_step(&self) -> f64 {
        TAU * self.carrier_freq / self.sample_rate as f64
    }
}

/// One channel's phase accumulator.
#[derive(Debug, Default)]
struct ToneChannel {
    phase: f64,
}

impl ToneChannel {
    /// Produces the next sample for a pair of motors and advances the phase.
    fn next_sample(
        &mut self,
        step: f64,
        duty_first: f64,
        duty_second: f64,
        amp_first: i16,
        amp_second: i16,
    ) -> i16 {
        let sample = if self.phase < PI {
            let cut_off_phase = duty_first / 100.0 * TAU;
            if self.phase > cut_off_phase {
                0
            } else {
                amp_first
            }
        } else {
            // The cut-off is offset by PI: the second half of each period is
            // reserved for the second motor, limiting its duty to 50%.
            let cut_off_phase = duty_second / 100.0 * TAU + PI;
            if self.phase > cut_off_phase {
                0
            } else {
                amp_second
            }
        };

        self.phase += step;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        sample
    }
}

/// The synthesis engine run by the dedicated motor-signal thread.
pub struct Synthesizer {
    config: SynthesizerConfig,
    duties: Arc<DutyState>,
    enabled: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
    left: ToneChannel,
    right: ToneChannel,
}

impl Synthesizer {
    pub(crate) fn new(
        config: SynthesizerConfig,
        duties: Arc<DutyState>,
        enabled: Arc<AtomicBool>,
        stop: Arc<AtomicBool>,
    ) -> Self {
        Synthesizer {
            config,
            duties,
            enabled,
            stop,
            left: ToneChannel::default(),
            right: ToneChannel::default(),
        }
    }

    /// Fills one interleaved stereo buffer from the current duty state.
    ///
    /// Duties and the enable flag are sampled once per buffer, so a pause or
    /// duty update takes effect within one synthesis-loop iteration. When
    /// disabled the amplitudes are gated to zero while the phase keeps
    /// running, so resuming stays phase-accurate.
    fn fill(&mut self, samples: &mut [i16]) {
        let step = self.config.phase_step();
        let [duty_1, duty_2, duty_3, duty_4] = self.duties.load_all();
        let (amp_first, amp_second) = if self.enabled.load(Ordering::Acquire) {
            (AMPLITUDE_PRIMARY, AMPLITUDE_SECONDARY)
        } else {
            (0, 0)
        };

        for frame in samples.chunks_exact_mut(2) {
            frame[0] = self
                .left
                .next_sample(step, duty_1, duty_2, amp_first, amp_second);
            frame[1] = self
                .right
                .next_sample(step, duty_3, duty_4, amp_first, amp_second);
        }
    }

    /// Renders buffers into the sink until asked to stop, then hands the
    /// sink back for a later restart.
    ///
    /// The stop-flag check once per buffer is the loop's only cancellation
    /// point. A sink write failure is fatal to the motor subsystem: the
    /// thread exits and nothing restarts it.
    pub(crate) fn run(mut self, mut sink: Box<dyn AudioSink>) -> Box<dyn AudioSink> {
        let min_len = sink.min_buffer_len().max(2);
        let mut buffer = vec![0i16; min_len + min_len % 2];

        while !self.stop.load(Ordering::Acquire) {
            self.fill(&mut buffer);
            if let Err(e) = sink.write(&buffer) {
                log::error!("audio sink write failed, motor output is down: {}", e);
                break;
            }
        }
        sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn test_state(duties: [f64; 4]) -> (Arc<DutyState>, Arc<AtomicBool>, Arc<AtomicBool>) {
        let state = Arc::new(DutyState::new());
        for (motor, duty) in duties.iter().enumerate() {
            state.store(motor, *duty);
        }
        (
            state,
            Arc::new(AtomicBool::new(true)),
            Arc::new(AtomicBool::new(false)),
        )
    }

    /// Test that the duty mapping lands in the ESC band and never reverses.
    #[test]
    fn test_synth_duty_mapping_monotonic_in_band() {
        let config = SynthesizerConfig::new(44_100);
        let mut previous = config.map_duty(0.0);
        assert!(
            value_close(5.0, previous),
            "Zero duty should map to the bottom of the band."
        );
        for step in 1..=100 {
            let mapped = config.map_duty(step as f64);
            assert!(
                previous <= mapped,
                "Mapping must be monotonic: {} then {}",
                previous,
                mapped
            );
            assert!(
                (config.lower_bound..=config.upper_bound).contains(&mapped),
                "Mapped duty {} escaped the ESC band",
                mapped
            );
            previous = mapped;
        }
        assert!(
            value_close(10.0, previous),
            "Full duty should map to the top of the band."
        );
    }

    /// Test that out-of-range raw duties clamp instead of being rejected.
    #[test]
    fn test_synth_duty_mapping_clamps_input() {
        let config = SynthesizerConfig::new(44_100);
        assert!(value_close(5.0, config.map_duty(-25.0)));
        assert!(value_close(10.0, config.map_duty(150.0)));
    }

    /// Test the floor truncation at the configured resolution.
    #[test]
    fn test_synth_duty_mapping_truncates() {
        let config = SynthesizerConfig::new(44_100);
        // 33.333% maps to 6.66665, which truncates (not rounds) to 6.66.
        assert!(
            value_close(6.66, config.map_duty(33.333)),
            "Mapped duty should be floor-truncated to two decimals."
        );
    }

    /// Test the time-division layout of one carrier period per channel.
    ///
    /// 25 samples per period (an odd count, so no sample lands exactly on
    /// the half-period boundary): with duties 30% and 20% on the left pair,
    /// the first 8 samples ride at the primary amplitude, samples 13..=17 at
    /// the secondary amplitude, everything else is silent.
    #[test]
    fn test_synth_period_layout() {
        let config = SynthesizerConfig {
            sample_rate: 1000,
            carrier_freq: 40.0,
            ..SynthesizerConfig::new(1000)
        };
        let (duties, enabled, stop) = test_state([30.0, 20.0, 0.0, 0.0]);
        let mut synth = Synthesizer::new(config, duties, enabled, stop);

        let mut buffer = vec![0i16; 50];
        synth.fill(&mut buffer);

        let left: Vec<i16> = buffer.iter().step_by(2).copied().collect();
        let right: Vec<i16> = buffer.iter().skip(1).step_by(2).copied().collect();

        for (k, sample) in left.iter().enumerate() {
            let expected = match k {
                0..=7 => AMPLITUDE_PRIMARY,
                13..=17 => AMPLITUDE_SECONDARY,
                _ => 0,
            };
            assert_eq!(
                expected, *sample,
                "Left sample {} should be {} not {}",
                k, expected, sample
            );
        }

        // Zero duty still emits the single sample sitting at phase zero.
        assert_eq!(AMPLITUDE_PRIMARY, right[0]);
        assert!(
            right[1..].iter().all(|s| *s == 0),
            "Idle right channel should be silent after phase zero."
        );
    }

    /// Test that the second motor of a pair saturates at the half period.
    #[test]
    fn test_synth_second_motor_capped_at_half_period() {
        let config = SynthesizerConfig {
            sample_rate: 1000,
            carrier_freq: 40.0,
            ..SynthesizerConfig::new(1000)
        };
        let (duties, enabled, stop) = test_state([0.0, 100.0, 0.0, 0.0]);
        let mut synth = Synthesizer::new(config, duties, enabled, stop);

        let mut buffer = vec![0i16; 50];
        synth.fill(&mut buffer);

        let left: Vec<i16> = buffer.iter().step_by(2).copied().collect();
        let active = left
            .iter()
            .filter(|s| **s == AMPLITUDE_SECONDARY)
            .count();
        assert_eq!(
            12, active,
            "A full-duty second motor can only occupy the second half period."
        );
    }

    /// Test that disabling gates the output to silence despite live duties.
    #[test]
    fn test_synth_disabled_emits_silence() {
        let config = SynthesizerConfig::new(1000);
        let (duties, enabled, stop) = test_state([8.0, 8.0, 8.0, 8.0]);
        enabled.store(false, Ordering::Release);
        let mut synth = Synthesizer::new(config, duties, enabled, stop);

        let mut buffer = vec![1i16; 64];
        synth.fill(&mut buffer);
        assert!(
            buffer.iter().all(|s| *s == 0),
            "Disabled synthesizer must write silence over the whole buffer."
        );
    }
}
