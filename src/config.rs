use crate::error::SetupError;
use crate::simulation::{Channels, PeakParams};

/// Grid dimensions (256x256 = 65K cells)
pub const GRID_ROWS: u32 = 256;
pub const GRID_COLS: u32 = 256;

/// Channels per cell: velocity, height, and two reserved
pub const GRID_CHANNELS: Channels = Channels::Four;

/// Compute shader workgroup size
pub const WORKGROUP_SIZE: u32 = 16;

/// Initial window size in logical pixels
pub const WINDOW_WIDTH: u32 = 768;
pub const WINDOW_HEIGHT: u32 = 768;

// ============================================
// Initial Condition
// ============================================

/// Centre of the initial peak in normalized grid coordinates
pub const PEAK_CENTER: (f32, f32) = (0.5, 0.5);

/// Falloff of the initial peak: height = exp(-size * distance)
pub const PEAK_SIZE: f32 = 10.0;

// ============================================
// Wave Equation Parameters
// ============================================

/// Nominal frame length the kernel scales its time step against (ms)
pub const NOMINAL_FRAME_MS: f32 = 16.0;

/// Squared propagation speed in cells per nominal frame.
/// Keeps c²·dt² under 0.5 for deltas up to MAX_DELTA_MS.
pub const WAVE_SPEED_SQ: f32 = 0.012;

/// Per-frame velocity retention (1.0 = undamped)
pub const DAMPING: f32 = 0.998;

/// Radius in cells of the pointer-injected drop
pub const DROP_RADIUS: f32 = 4.0;

/// Velocity impulse of the pointer-injected drop
pub const DROP_STRENGTH: f32 = 0.25;

/// Upper bound on the frame delta handed to the update kernel (ms).
/// Covers the first frame and gaps while the window was hidden.
pub const MAX_DELTA_MS: f64 = 100.0;

/// Physics knobs forwarded to the update kernel each invocation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveParams {
    pub wave_speed_sq: f32,
    pub damping: f32,
    pub drop_radius: f32,
    pub drop_strength: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            wave_speed_sq: WAVE_SPEED_SQ,
            damping: DAMPING,
            drop_radius: DROP_RADIUS,
            drop_strength: DROP_STRENGTH,
        }
    }
}

/// Runtime configuration; fixed once the simulation is created
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub rows: u32,
    pub cols: u32,
    pub channels: Channels,
    pub peak: PeakParams,
    pub wave: WaveParams,
    pub max_delta_ms: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rows: GRID_ROWS,
            cols: GRID_COLS,
            channels: GRID_CHANNELS,
            peak: PeakParams::default(),
            wave: WaveParams::default(),
            max_delta_ms: MAX_DELTA_MS,
        }
    }
}

impl SimConfig {
    /// Reject shapes the simulation cannot run on
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.rows < 3 || self.cols < 3 {
            return Err(SetupError::InvalidGrid {
                rows: self.rows,
                cols: self.cols,
                reason: "grid needs at least one interior cell".into(),
            });
        }
        if self.max_delta_ms.is_nan() || self.max_delta_ms <= 0.0 {
            return Err(SetupError::InvalidConfig(format!(
                "max frame delta must be positive, got {}",
                self.max_delta_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference() {
        let config = SimConfig::default();
        assert_eq!((config.rows, config.cols), (256, 256));
        assert_eq!(config.channels, Channels::Four);
        assert_eq!(config.peak.size, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_degenerate_grid() {
        let config = SimConfig {
            rows: 2,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SetupError::InvalidGrid { rows: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_delta_bound() {
        let config = SimConfig {
            max_delta_ms: 0.0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(SetupError::InvalidConfig(_))));
    }
}
