use crate::config::{PEAK_CENTER, PEAK_SIZE};
use crate::simulation::cell::{Channels, HEIGHT};
use crate::simulation::grid::Grid;

/// Shape of the initial exponential peak
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeakParams {
    /// Peak position in normalized coordinates
    pub center: (f32, f32),
    /// Falloff rate: height = exp(-size * distance)
    pub size: f32,
}

impl Default for PeakParams {
    fn default() -> Self {
        Self {
            center: PEAK_CENTER,
            size: PEAK_SIZE,
        }
    }
}

/// Height of the peak at a normalized position
pub fn peak(uv: (f32, f32), params: &PeakParams) -> f32 {
    let dx = uv.0 - params.center.0;
    let dy = uv.1 - params.center.1;
    (-params.size * (dx * dx + dy * dy).sqrt()).exp()
}

/// Build the starting grid: a single peak over the interior, at rest.
///
/// Both axes are normalized by `rows`, so on a non-square grid the peak sits
/// at `cols * center.0 / rows` horizontally rather than at the visual centre.
/// Border cells stay zero, which is the boundary condition the update kernel
/// preserves.
pub fn generate(rows: u32, cols: u32, channels: Channels, params: &PeakParams) -> Grid {
    let mut grid = Grid::new(rows, cols, channels);
    let norm = rows as f32;

    for row in 1..rows.saturating_sub(1) {
        for col in 1..cols.saturating_sub(1) {
            let uv = (col as f32 / norm, row as f32 / norm);
            grid.set(row, col, HEIGHT, peak(uv, params));
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::cell::VELOCITY;

    fn reference_height(row: u32, col: u32, rows: u32) -> f32 {
        let u = col as f32 / rows as f32 - 0.5;
        let v = row as f32 / rows as f32 - 0.5;
        (-10.0 * (u * u + v * v).sqrt()).exp()
    }

    #[test]
    fn test_interior_matches_closed_form() {
        let grid = generate(32, 32, Channels::Four, &PeakParams::default());
        for row in 1..31 {
            for col in 1..31 {
                assert_eq!(grid.get(row, col, HEIGHT), reference_height(row, col, 32));
                assert_eq!(grid.get(row, col, VELOCITY), 0.0);
            }
        }
    }

    #[test]
    fn test_border_is_zero() {
        let grid = generate(16, 16, Channels::Four, &PeakParams::default());
        for row in 0..16 {
            for col in 0..16 {
                if grid.is_border(row, col) {
                    assert_eq!(grid.cell(row, col), [0.0; 4], "border ({}, {})", row, col);
                }
            }
        }
    }

    #[test]
    fn test_small_grid_hand_computed() {
        let params = PeakParams {
            center: (0.5, 0.5),
            size: 1.0,
        };
        let grid = generate(4, 4, Channels::Two, &params);

        // uv = (0.25, 0.25): exp(-sqrt(0.125))
        assert!((grid.get(1, 1, HEIGHT) - 0.702_188_5).abs() < 1e-6);
        // uv = (0.5, 0.5): the peak itself
        assert_eq!(grid.get(2, 2, HEIGHT), 1.0);
        // uv = (0.5, 0.25): exp(-0.25)
        assert!((grid.get(1, 2, HEIGHT) - 0.778_800_8).abs() < 1e-6);
    }

    #[test]
    fn test_non_square_normalizes_by_rows() {
        let params = PeakParams::default();
        let grid = generate(8, 16, Channels::Four, &params);
        // Column 4 of 16 maps to u = 4/8 = 0.5, the peak column
        let peak_col = grid.get(4, 4, HEIGHT);
        assert_eq!(peak_col, 1.0);
        assert!(grid.get(4, 8, HEIGHT) < peak_col);
        assert_eq!(grid.get(4, 12, HEIGHT), reference_height(4, 12, 8));
    }

    #[test]
    fn test_deterministic() {
        let a = generate(20, 20, Channels::Four, &PeakParams::default());
        let b = generate(20, 20, Channels::Four, &PeakParams::default());
        assert_eq!(a, b);
    }
}
