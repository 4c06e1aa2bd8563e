use crate::error::SetupError;
use crate::simulation::cell::{Cell, Channels};

/// Row-major grid of cells backed by one flat f32 buffer.
///
/// Shape is fixed at creation: `data.len() == rows * cols * channels` always.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: u32,
    cols: u32,
    channels: Channels,
    data: Vec<f32>,
}

impl Grid {
    /// Create a zero-filled grid
    pub fn new(rows: u32, cols: u32, channels: Channels) -> Self {
        let len = rows as usize * cols as usize * channels.count();
        Self {
            rows,
            cols,
            channels,
            data: vec![0.0; len],
        }
    }

    /// Wrap an existing buffer, checking it matches the shape
    pub fn from_data(
        rows: u32,
        cols: u32,
        channels: Channels,
        data: Vec<f32>,
    ) -> Result<Self, SetupError> {
        let expected = rows as usize * cols as usize * channels.count();
        if data.len() != expected {
            return Err(SetupError::InvalidGrid {
                rows,
                cols,
                reason: format!("expected {} values, got {}", expected, data.len()),
            });
        }
        Ok(Self {
            rows,
            cols,
            channels,
            data,
        })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Flat view of the packed buffer
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Raw bytes for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Offset of the first channel of (row, col)
    fn offset(&self, row: u32, col: u32) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        (row as usize * self.cols as usize + col as usize) * self.channels.count()
    }

    pub fn get(&self, row: u32, col: u32, channel: usize) -> f32 {
        self.data[self.offset(row, col) + channel]
    }

    pub fn set(&mut self, row: u32, col: u32, channel: usize, value: f32) {
        let i = self.offset(row, col) + channel;
        self.data[i] = value;
    }

    /// Read a cell, zero-padding channels the layout does not store
    pub fn cell(&self, row: u32, col: u32) -> Cell {
        let start = self.offset(row, col);
        let n = self.channels.count();
        let mut cell = [0.0; 4];
        cell[..n].copy_from_slice(&self.data[start..start + n]);
        cell
    }

    /// Write a cell, dropping channels the layout does not store
    pub fn set_cell(&mut self, row: u32, col: u32, cell: &Cell) {
        let start = self.offset(row, col);
        let n = self.channels.count();
        self.data[start..start + n].copy_from_slice(&cell[..n]);
    }

    /// True when (row, col) lies on the outer ring of the grid
    pub fn is_border(&self, row: u32, col: u32) -> bool {
        row == 0 || col == 0 || row == self.rows - 1 || col == self.cols - 1
    }

    /// Neighbourhood view centred on (row, col)
    pub fn neighborhood(&self, row: u32, col: u32) -> Neighborhood<'_> {
        Neighborhood {
            grid: self,
            row,
            col,
        }
    }
}

/// Read-only window onto a cell and its surroundings.
/// Out-of-range lookups clamp to the nearest edge cell.
#[derive(Clone, Copy)]
pub struct Neighborhood<'a> {
    grid: &'a Grid,
    row: u32,
    col: u32,
}

impl Neighborhood<'_> {
    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    pub fn rows(&self) -> u32 {
        self.grid.rows
    }

    pub fn cols(&self) -> u32 {
        self.grid.cols
    }

    pub fn is_border(&self) -> bool {
        self.grid.is_border(self.row, self.col)
    }

    pub fn center(&self) -> Cell {
        self.grid.cell(self.row, self.col)
    }

    /// Cell at a relative offset
    pub fn at(&self, d_row: i32, d_col: i32) -> Cell {
        let row = (self.row as i64 + d_row as i64).clamp(0, self.grid.rows as i64 - 1);
        let col = (self.col as i64 + d_col as i64).clamp(0, self.grid.cols as i64 - 1);
        self.grid.cell(row as u32, col as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(100, 50, Channels::Four);
        assert_eq!(grid.as_slice().len(), 100 * 50 * 4);
        assert!(grid.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_from_data_rejects_wrong_length() {
        let result = Grid::from_data(4, 4, Channels::Two, vec![0.0; 31]);
        assert!(matches!(result, Err(SetupError::InvalidGrid { .. })));
        assert!(Grid::from_data(4, 4, Channels::Two, vec![0.0; 32]).is_ok());
    }

    #[test]
    fn test_row_major_layout() {
        let mut grid = Grid::new(3, 5, Channels::Two);
        grid.set(1, 2, 1, 7.0);
        assert_eq!(grid.as_slice()[(5 + 2) * 2 + 1], 7.0);
        assert_eq!(grid.get(1, 2, 1), 7.0);
    }

    #[test]
    fn test_two_channel_cell_drops_reserved() {
        let mut grid = Grid::new(3, 3, Channels::Two);
        grid.set_cell(1, 1, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(grid.cell(1, 1), [1.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_border_detection() {
        let grid = Grid::new(4, 5, Channels::Four);
        assert!(grid.is_border(0, 2));
        assert!(grid.is_border(3, 2));
        assert!(grid.is_border(2, 0));
        assert!(grid.is_border(2, 4));
        assert!(!grid.is_border(1, 1));
        assert!(!grid.is_border(2, 3));
    }

    #[test]
    fn test_neighborhood_clamps_to_edge() {
        let mut grid = Grid::new(3, 3, Channels::Two);
        grid.set(0, 0, 1, 5.0);
        grid.set(0, 1, 1, 6.0);
        let n = grid.neighborhood(0, 0);
        assert_eq!(n.at(-1, -1)[1], 5.0);
        assert_eq!(n.at(0, 1)[1], 6.0);
        assert_eq!(n.at(-3, 1)[1], 6.0);
    }
}
