//! A Chip-8 CPU core: memory, registers, a 64x32 frame buffer and a
//! 16 key keypad, advanced one instruction per `Chip8::tick`.
//!
//! Rendering, key capture and ROM loading are left to the host.

pub use chip8::{Chip8, Step};
pub use constants::CLOCK_SPEED;
pub use error::{DecodeError, Error, Result};
pub use frame_buffer::FrameBuffer;
pub use instruction::{decode, disassemble, Instruction, Literal, Operand, Operation};
pub use keypad::Keypad;
pub use memory::Memory;
pub use opcode::Opcode;
pub use state::State;

mod chip8;
pub mod constants;
mod error;
mod frame_buffer;
mod instruction;
mod keypad;
mod memory;
mod opcode;
pub mod operations;
mod state;
