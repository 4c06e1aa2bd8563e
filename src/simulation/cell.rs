/// Per-cell channel layout.
///
/// Every cell stores `[velocity, height, reserved, reserved]`, truncated to
/// the configured channel count. Cells are packed row-major as plain `f32`s
/// so a grid uploads straight into an `Rg32Float` or `Rgba32Float` texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channels {
    Two,
    Four,
}

/// One cell as seen by kernels; channels beyond the layout's count are zero
pub type Cell = [f32; 4];

/// Channel index of the velocity component
pub const VELOCITY: usize = 0;

/// Channel index of the height (position) component
pub const HEIGHT: usize = 1;

impl Channels {
    /// Number of f32 values per cell
    pub const fn count(self) -> usize {
        match self {
            Channels::Two => 2,
            Channels::Four => 4,
        }
    }

    /// Bytes per cell in the packed buffer
    pub const fn cell_bytes(self) -> usize {
        self.count() * std::mem::size_of::<f32>()
    }
}

/// Build a cell with the given velocity and height, reserved channels zeroed
pub fn make_cell(velocity: f32, height: f32) -> Cell {
    let mut cell = [0.0; 4];
    cell[VELOCITY] = velocity;
    cell[HEIGHT] = height;
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_size() {
        assert_eq!(Channels::Two.cell_bytes(), 8);
        assert_eq!(Channels::Four.cell_bytes(), 16);
    }

    #[test]
    fn test_both_layouts_hold_velocity_and_height() {
        for channels in [Channels::Two, Channels::Four] {
            assert!(channels.count() > VELOCITY);
            assert!(channels.count() > HEIGHT);
        }
    }

    #[test]
    fn test_make_cell() {
        let cell = make_cell(0.5, 2.0);
        assert_eq!(cell, [0.5, 2.0, 0.0, 0.0]);
    }
}
