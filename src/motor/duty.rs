// src/motor/duty.rs

//! # Shared Duty State
//!
//! The hand-off point between the control pipeline and the signal
//! synthesizer: four independent duty-cycle cells, written at control-tick
//! cadence and read at audio sample-rate cadence. Each cell is a single
//! atomic word holding the bit pattern of an `f64`, so a reader can never
//! observe a value mixing bytes from two different writes, and neither side
//! ever blocks the other. A read may be stale by up to one control period;
//! it can never be torn.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free vector of the four per-motor duty percentages.
pub struct DutyState {
    cells: [AtomicU64; 4],
}

impl DutyState {
    /// Number of motors carried by the state.
    pub const MOTOR_COUNT: usize = 4;

    /// Creates a state with all duties at zero.
    pub const fn new() -> Self {
        DutyState {
            cells: [
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
            ],
        }
    }

    /// Stores one motor's duty percentage.
    ///
    /// # Panics
    /// Panics if `motor >= MOTOR_COUNT`; callers validate indices first.
    pub fn store(&self, motor: usize, duty: f64) {
        self.cells[motor].store(duty.to_bits(), Ordering::Release);
    }

    /// Loads one motor's duty percentage.
    ///
    /// # Panics
    /// Panics if `motor >= MOTOR_COUNT`; callers validate indices first.
    pub fn load(&self, motor: usize) -> f64 {
        f64::from_bits(self.cells[motor].load(Ordering::Relaxed))
    }

    /// Loads all four duties in motor order.
    pub fn load_all(&self) -> [f64; 4] {
        [self.load(0), self.load(1), self.load(2), self.load(3)]
    }
}

impl Default for DutyState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    /// Test that stored duties read back exactly.
    #[test]
    fn test_duty_store_load_roundtrip() {
        let state = DutyState::new();
        state.store(0, 8.25);
        state.store(3, 5.0);
        assert_eq!(8.25, state.load(0));
        assert_eq!(5.0, state.load(3));
        assert_eq!([8.25, 0.0, 0.0, 5.0], state.load_all());
    }

    /// Stress test: a concurrent reader must only ever observe bit patterns
    /// that some writer actually stored, never a mix of two writes.
    #[test]
    fn test_duty_no_torn_reads_under_concurrent_writes() {
        // Sentinels whose halves differ, so any torn word would produce a
        // bit pattern outside the written set.
        let first = f64::from_bits(0x5555_5555_AAAA_AAAA);
        let second = f64::from_bits(0xAAAA_AAAA_5555_5555);

        let state = Arc::new(DutyState::new());
        state.store(0, first);

        let writer_state = Arc::clone(&state);
        let writer = thread::spawn(move || {
            for i in 0..100_000usize {
                let value = if i % 2 == 0 { first } else { second };
                writer_state.store(0, value);
            }
        });

        let allowed = [first.to_bits(), second.to_bits()];
        for _ in 0..100_000usize {
            let seen = state.load(0).to_bits();
            assert!(
                allowed.contains(&seen),
                "Observed a bit pattern never written: {:#018x}",
                seen
            );
        }

        writer.join().expect("writer thread panicked");
    }
}
