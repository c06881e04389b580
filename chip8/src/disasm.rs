use chip8_vm::constants::PROGRAM_START;
use chip8_vm::disassemble;

/// One `address  opcode  mnemonic` line per word, as loaded at 0x200.
pub fn listing(program: &[u8]) -> Vec<String> {
    disassemble(program, PROGRAM_START)
        .map(|(address, opcode, instruction)| match instruction {
            Ok(instruction) => format!("{:#06X}  {}  {}", address, opcode, instruction),
            Err(_) => format!("{:#06X}  {}  ???", address, opcode),
        })
        .collect()
}
