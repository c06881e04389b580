use crate::constants::KEY_COUNT;

/// # Keypad
/// Chip-8 input is generated with a hexadecimal keypad.
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
/// Each key is indexed by its value. There is no key above 0xF: pressing one does
/// nothing and it never reads as pressed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Keypad {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn press(&mut self, key: u8) {
        if let Some(down) = self.keys.get_mut(key as usize) {
            *down = true;
        }
    }

    pub fn release(&mut self, key: u8) {
        if let Some(down) = self.keys.get_mut(key as usize) {
            *down = false;
        }
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    /// The lowest-valued key currently held down
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|key| key as u8)
    }
}
