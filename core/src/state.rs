use crate::constants::{PROGRAM_START, STACK_SIZE};
use crate::error::{Error, Result};

/// The Chip-8 register file
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter, starting at 0x200
///
/// Pointer
/// - (sp) an 8-bit stack pointer; the index of the next free stack slot
///
/// Stack
/// - 16 16-bit return addresses
///
/// Timers
/// - 2 8-bit timers (delay & sound), counting down to 0 once per tick
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub stack: [u16; STACK_SIZE],
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl State {
    pub fn new() -> Self {
        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            stack: [0; STACK_SIZE],
            delay_timer: 0,
            sound_timer: 0,
        }
    }

    /// STACK.push(PC)
    ///
    /// # Arguments
    /// * `address` the return address to save
    pub fn push(&mut self, address: u16) -> Result<()> {
        let slot = self
            .stack
            .get_mut(self.sp as usize)
            .ok_or(Error::StackOverflow { address })?;
        *slot = address;
        self.sp += 1;
        Ok(())
    }

    /// PC = STACK.pop()
    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow { address: self.pc });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
    }

    /// Counts both timers down by one, stopping at 0
    pub fn decrement_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = State::new();
        assert_eq!(state.pc, 0x200);
        assert_eq!(state.sp, 0);
        assert_eq!(state.v, [0; 16]);
    }

    #[test]
    fn test_push_pop() {
        let mut state = State::new();
        state.push(0xABC).unwrap();
        state.push(0xDEF).unwrap();
        assert_eq!(state.sp, 2);
        assert_eq!(state.pop(), Ok(0xDEF));
        assert_eq!(state.pop(), Ok(0xABC));
        assert_eq!(state.sp, 0);
    }

    #[test]
    fn test_push_overflows_at_capacity() {
        let mut state = State::new();
        for n in 0..STACK_SIZE as u16 {
            state.push(n).unwrap();
        }
        assert_eq!(
            state.push(0x300),
            Err(Error::StackOverflow { address: 0x300 })
        );
        assert_eq!(state.sp, 16);
    }

    #[test]
    fn test_pop_underflows_when_empty() {
        let mut state = State::new();
        assert_eq!(
            state.pop(),
            Err(Error::StackUnderflow { address: 0x200 })
        );
        assert_eq!(state.sp, 0);
    }

    #[test]
    fn test_timers_stop_at_zero() {
        let mut state = State::new();
        state.delay_timer = 2;
        state.sound_timer = 1;
        for _ in 0..5 {
            state.decrement_timers();
        }
        assert_eq!(state.delay_timer, 0);
        assert_eq!(state.sound_timer, 0);
    }
}
