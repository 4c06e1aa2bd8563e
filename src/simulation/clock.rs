/// Frame timing for the simulation loop.
///
/// Deltas are clamped to `[0, max_delta_ms]` so the first frame and any gap
/// while the window was hidden never reach the kernel as one huge step.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    previous_timestamp: f64,
    max_delta_ms: f64,
}

impl FrameClock {
    pub fn new(max_delta_ms: f64) -> Self {
        Self {
            previous_timestamp: 0.0,
            max_delta_ms,
        }
    }

    pub fn previous_timestamp(&self) -> f64 {
        self.previous_timestamp
    }

    /// Delta since the previous tick, clamped. Does not advance the clock.
    pub fn delta(&self, timestamp: f64) -> f64 {
        let raw = timestamp - self.previous_timestamp;
        if raw > self.max_delta_ms {
            log::warn!(
                "Frame delta {:.1}ms exceeds {:.1}ms, clamping",
                raw,
                self.max_delta_ms
            );
        }
        raw.clamp(0.0, self.max_delta_ms)
    }

    /// Record `timestamp` as the previous frame time
    pub fn advance(&mut self, timestamp: f64) {
        self.previous_timestamp = timestamp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_delta() {
        let clock = FrameClock::new(100.0);
        assert_eq!(clock.delta(16.7), 16.7);
    }

    #[test]
    fn test_delta_after_advance() {
        let mut clock = FrameClock::new(100.0);
        clock.advance(100.0);
        assert!((clock.delta(116.0) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_large_gap_is_clamped() {
        let mut clock = FrameClock::new(100.0);
        clock.advance(1_000.0);
        assert_eq!(clock.delta(61_000.0), 100.0);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = FrameClock::new(100.0);
        clock.advance(50.0);
        assert_eq!(clock.delta(40.0), 0.0);
    }
}
