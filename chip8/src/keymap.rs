use std::fmt;
use std::str::FromStr;

use chip8_vm::Chip8;

/// # Keymap
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// This original layout is mapped to the left 4 alphanumeric columns.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
pub fn keymap(key: char) -> Option<u8> {
    match key.to_ascii_lowercase() {
        'x' => Some(0x0),
        '1' => Some(0x1),
        '2' => Some(0x2),
        '3' => Some(0x3),
        'q' => Some(0x4),
        'w' => Some(0x5),
        'e' => Some(0x6),
        'a' => Some(0x7),
        's' => Some(0x8),
        'd' => Some(0x9),
        'z' => Some(0xA),
        'c' => Some(0xB),
        '4' => Some(0xC),
        'r' => Some(0xD),
        'f' => Some(0xE),
        'v' => Some(0xF),
        _ => None,
    }
}

/// A key named either by its keyboard character (`w`) or directly as a
/// hex digit (`0x5`).
fn parse_key(name: &str) -> Option<u8> {
    if let Some(digit) = name.strip_prefix("0x").or_else(|| name.strip_prefix("0X")) {
        return u8::from_str_radix(digit, 16).ok().filter(|&key| key <= 0xF);
    }
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => keymap(c),
        _ => None,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub tick: u64,
    pub key: u8,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn apply(&self, chip8: &mut Chip8) {
        if self.pressed {
            chip8.key_press(self.key);
        } else {
            chip8.key_release(self.key);
        }
    }
}

/// Scripted keypad input, ordered by tick.
///
/// Written as comma separated `tick:key` (press) or `tick:-key` (release)
/// events, e.g. `10:w,40:-w,50:0xF`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyScript(pub Vec<KeyEvent>);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseKeyScriptError(String);

impl fmt::Display for ParseKeyScriptError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid key event {:?}, expected tick:key or tick:-key", self.0)
    }
}

impl std::error::Error for ParseKeyScriptError {}

impl FromStr for KeyScript {
    type Err = ParseKeyScriptError;

    fn from_str(script: &str) -> Result<Self, Self::Err> {
        let mut events = script
            .split(',')
            .map(str::trim)
            .filter(|event| !event.is_empty())
            .map(|event| {
                let invalid = || ParseKeyScriptError(event.to_string());
                let (tick, key) = event.split_once(':').ok_or_else(invalid)?;
                let tick = tick.trim().parse().map_err(|_| invalid())?;
                let key = key.trim();
                let (pressed, name) = match key.strip_prefix('-') {
                    Some(name) => (false, name),
                    None => (true, key),
                };
                let key = parse_key(name).ok_or_else(invalid)?;
                Ok(KeyEvent { tick, key, pressed })
            })
            .collect::<Result<Vec<_>, _>>()?;
        // stable, so same-tick events keep their written order
        events.sort_by_key(|event| event.tick);
        Ok(KeyScript(events))
    }
}
