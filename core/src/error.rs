use thiserror::Error;

/// Everything that can stop a Chip-8 session.
///
/// None of these are recoverable: the interpreter is deterministic so the same
/// program and input always fail in the same place.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("unknown opcode {opcode:#06X} at address {address:#06X}")]
    Decode { opcode: u16, address: u16 },

    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("stack overflow: no room to save return address {address:#06X}")]
    StackOverflow { address: u16 },

    #[error("stack underflow: return with an empty call stack (pc {address:#06X})")]
    StackUnderflow { address: u16 },

    #[error("program is too large ({size} bytes), max size is {max_size} bytes")]
    ProgramTooLarge { size: usize, max_size: usize },
}

/// An opcode that doesn't match any instruction in its band
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unknown opcode {opcode:#06X}")]
pub struct DecodeError {
    pub opcode: u16,
}

impl DecodeError {
    /// Attach the address the opcode was fetched from
    pub fn at(self, address: u16) -> Error {
        Error::Decode {
            opcode: self.opcode,
            address,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
