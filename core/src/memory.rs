use crate::constants::{FONT_START, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET};
use crate::error::{Error, Result};

/// # Memory
/// 4096 bytes of flat, byte addressed memory.
///
/// ```text
/// 0x000..0x200  reserved for the interpreter
///   0x050..0x0A0  hexadecimal font
/// 0x200..0x1000 program and scratch data
/// ```
///
/// Every access is bounds checked; reaching outside of memory ends the session.
#[derive(Clone)]
pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Memory {
    /// Zeroed memory with the font already in place
    pub fn new() -> Self {
        let mut bytes = Box::new([0; MEMORY_SIZE]);
        let font = FONT_START as usize;
        bytes[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory { bytes }
    }

    /// Copy a program in at `PROGRAM_START`.
    ///
    /// # Arguments
    /// * `program` the raw program bytes; may not exceed `MAX_PROGRAM_SIZE`
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                max_size: MAX_PROGRAM_SIZE,
            });
        }
        self.write_slice(PROGRAM_START, program)
    }

    pub fn read_u8(&self, addr: u16) -> Result<u8> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Error::MemoryOutOfBounds {
                address: addr as usize,
            })
    }

    pub fn write_u8(&mut self, addr: u16, data: u8) -> Result<()> {
        let slot = self
            .bytes
            .get_mut(addr as usize)
            .ok_or(Error::MemoryOutOfBounds {
                address: addr as usize,
            })?;
        *slot = data;
        Ok(())
    }

    /// Reads the big-endian word at `addr..addr + 2`
    pub fn read_u16(&self, addr: u16) -> Result<u16> {
        let word = self.read_slice(addr, 2)?;
        Ok(u16::from(word[0]) << 8 | u16::from(word[1]))
    }

    /// A read-only view of `len` bytes starting at `addr`
    pub fn read_slice(&self, addr: u16, len: usize) -> Result<&[u8]> {
        let (start, end) = Self::span(addr, len)?;
        Ok(&self.bytes[start..end])
    }

    /// Overwrites `data.len()` bytes starting at `addr`
    pub fn write_slice(&mut self, addr: u16, data: &[u8]) -> Result<()> {
        let (start, end) = Self::span(addr, data.len())?;
        self.bytes[start..end].copy_from_slice(data);
        Ok(())
    }

    /// Resolve `addr..addr + len` to indices, failing on the first byte that falls outside memory
    /// An empty span touches no byte, so it never fails.
    fn span(addr: u16, len: usize) -> Result<(usize, usize)> {
        if len == 0 {
            return Ok((0, 0));
        }
        let start = addr as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            return Err(Error::MemoryOutOfBounds {
                address: start.max(MEMORY_SIZE),
            });
        }
        Ok((start, end))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
