/// Latest pointer sample shared between the input adapter and the frame loop.
///
/// Coordinates are surface pixels with the origin at the bottom-left.
/// `updated` is raised by press/drag and cleared by the loop once a frame has
/// consumed it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MouseState {
    pub x: i32,
    pub y: i32,
    pub updated: bool,
    pub dragging: bool,
}

impl MouseState {
    /// Pointer pressed at a surface position
    pub fn press(&mut self, x: i32, y: i32) {
        self.dragging = true;
        self.x = x;
        self.y = y;
        self.updated = true;
    }

    /// Pointer moved; only recorded while dragging
    pub fn move_to(&mut self, x: i32, y: i32) {
        if self.dragging {
            self.x = x;
            self.y = y;
            self.updated = true;
        }
    }

    /// Pointer released or left the surface
    pub fn release(&mut self) {
        self.dragging = false;
    }

    /// Mark the current sample as consumed
    pub fn consume(&mut self) {
        self.updated = false;
    }
}

/// Convert a window-space position (top-left origin) to surface pixels with a
/// bottom-left origin, flooring like a canvas client rect would.
pub fn to_surface_coords(x: f64, y: f64, surface_height: u32) -> (i32, i32) {
    let px = x.floor() as i32;
    let py = (surface_height as f64 - y).floor() as i32;
    (px, py)
}
