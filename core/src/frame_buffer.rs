use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// # Frame buffer
/// The Chip-8 display is composed of 64x32 black/white pixels, stored row-major
/// and indexed as `[row][col]`.
///
/// `get` and `set` are unconditional; XOR and collision semantics belong to
/// `draw_sprite`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }

    /// # Panics
    /// If `row >= 32` or `col >= 64`.
    pub fn get(&self, row: usize, col: usize) -> bool {
        assert!(
            row < DISPLAY_HEIGHT && col < DISPLAY_WIDTH,
            "pixel ({}, {}) is outside the frame buffer",
            row,
            col
        );
        self.pixels[row][col]
    }

    /// # Panics
    /// If `row >= 32` or `col >= 64`.
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        assert!(
            row < DISPLAY_HEIGHT && col < DISPLAY_WIDTH,
            "pixel ({}, {}) is outside the frame buffer",
            row,
            col
        );
        self.pixels[row][col] = value;
    }

    /// The pixel rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool; DISPLAY_WIDTH]> {
        self.pixels.iter()
    }

    /// XORs a sprite onto the frame buffer with its top left corner at (x, y).
    ///
    /// Each byte of `sprite` is one row, most significant bit leftmost. Pixels
    /// past an edge wrap around to the opposite side.
    ///
    /// Returns whether any lit pixel was toggled off (a collision).
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, byte) in sprite.iter().enumerate() {
            let target_row = (y as usize + row) % DISPLAY_HEIGHT;
            for bit in 0..8 {
                if byte & (0x80 >> bit) == 0 {
                    continue;
                }
                let target_col = (x as usize + bit) % DISPLAY_WIDTH;
                let was_lit = self.get(target_row, target_col);
                collision |= was_lit;
                self.set(target_row, target_col, !was_lit);
            }
        }
        collision
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
