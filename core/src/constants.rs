/// Width of the frame buffer in pixels
pub const DISPLAY_WIDTH: usize = 64;

/// Height of the frame buffer in pixels
pub const DISPLAY_HEIGHT: usize = 32;

/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Where programs are loaded into memory; everything below is reserved
pub const PROGRAM_START: u16 = 0x200;

/// The largest program that fits between `PROGRAM_START` and the top of memory
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Where the hexadecimal font is loaded into memory
pub const FONT_START: u16 = 0x050;

/// Height in bytes (rows) of each font glyph
pub const FONT_GLYPH_SIZE: u16 = 5;

/// Maximum depth of nested subroutine calls
pub const STACK_SIZE: usize = 16;

/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

/// Index of the flag register VF
pub const FLAG_REGISTER: usize = 0xF;

/// Seed for the random source when none is supplied, so runs are reproducible
pub const DEFAULT_SEED: u64 = 123;

/// Default CPU clock speed in Hz
pub const CLOCK_SPEED: u64 = 500;

/// # Sprite sheet
/// Sprites for the hexadecimal digits 0..F, each 8 bits wide and 5 rows tall.
///
/// e.g. the sprite for `0`:
/// ```text
/// 11110000  0xF0  ****
/// 10010000  0x90  *  *
/// 10010000  0x90  *  *
/// 10010000  0x90  *  *
/// 11110000  0xF0  ****
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
