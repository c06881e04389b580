use std::fmt;

use crate::error::DecodeError;
use crate::opcode::Opcode;

/// What an instruction does, independent of its operands
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// legacy machine code call; ignored
    Sys,
    Cls,
    Ret,
    Jp,
    Call,
    Se,
    Sne,
    Ld,
    Add,
    Or,
    And,
    Xor,
    Sub,
    Shr,
    Subn,
    Shl,
    Rnd,
    Drw,
    Skp,
    Sknp,
}

impl Operation {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Operation::Sys => "SYS",
            Operation::Cls => "CLS",
            Operation::Ret => "RET",
            Operation::Jp => "JP",
            Operation::Call => "CALL",
            Operation::Se => "SE",
            Operation::Sne => "SNE",
            Operation::Ld => "LD",
            Operation::Add => "ADD",
            Operation::Or => "OR",
            Operation::And => "AND",
            Operation::Xor => "XOR",
            Operation::Sub => "SUB",
            Operation::Shr => "SHR",
            Operation::Subn => "SUBN",
            Operation::Shl => "SHL",
            Operation::Rnd => "RND",
            Operation::Drw => "DRW",
            Operation::Skp => "SKP",
            Operation::Sknp => "SKNP",
        }
    }
}

/// Something an instruction reads or writes
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    /// general purpose register V0..VF
    V(u8),
    /// the index register
    I,
    /// the delay timer
    Dt,
    /// the sound timer
    St,
    /// the next key press
    K,
    /// the font glyph for a digit
    F,
    /// the BCD digits at I..I+3
    B,
    /// memory starting at I, one byte per register
    IndirectI,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::V(n) => write!(f, "V{:X}", n),
            Operand::I => f.write_str("I"),
            Operand::Dt => f.write_str("DT"),
            Operand::St => f.write_str("ST"),
            Operand::K => f.write_str("K"),
            Operand::F => f.write_str("F"),
            Operand::B => f.write_str("B"),
            Operand::IndirectI => f.write_str("[I]"),
        }
    }
}

/// An immediate value, tagged by its width
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    /// `kk`, or the sprite height `n`
    Byte(u8),
    /// `nnn`
    Address(u16),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Byte(b) => write!(f, "{:#04X}", b),
            Literal::Address(a) => write!(f, "{:#06X}", a),
        }
    }
}

/// # Instruction
/// A decoded opcode: an operation, up to two operands and an optional literal.
///
/// Only used to describe what the CPU is doing (tracing, disassembly); it's
/// built fresh for every decode and never stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub operation: Operation,
    pub first: Option<Operand>,
    pub second: Option<Operand>,
    pub literal: Option<Literal>,
}

impl Instruction {
    fn bare(operation: Operation) -> Self {
        Instruction {
            operation,
            first: None,
            second: None,
            literal: None,
        }
    }

    fn address(operation: Operation, op: Opcode) -> Self {
        Instruction {
            literal: Some(Literal::Address(op.addr())),
            ..Self::bare(operation)
        }
    }

    fn unary(operation: Operation, first: Operand) -> Self {
        Instruction {
            first: Some(first),
            ..Self::bare(operation)
        }
    }

    fn binary(operation: Operation, first: Operand, second: Operand) -> Self {
        Instruction {
            first: Some(first),
            second: Some(second),
            ..Self::bare(operation)
        }
    }

    fn with_first(self, first: Operand) -> Self {
        Instruction {
            first: Some(first),
            ..self
        }
    }

    fn with_literal(self, literal: Literal) -> Self {
        Instruction {
            literal: Some(literal),
            ..self
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation.mnemonic())?;
        let mut separator = " ";
        for operand in self.first.iter().chain(self.second.iter()) {
            write!(f, "{}{}", separator, operand)?;
            separator = ", ";
        }
        if let Some(literal) = self.literal {
            write!(f, "{}{}", separator, literal)?;
        }
        Ok(())
    }
}

/// Decodes an opcode into the Instruction it represents.
///
/// Bands 0x8, 0xE and 0xF hold a fixed set of sub-operations; anything else in
/// those bands is an error. Every other band decodes for any operand values.
pub fn decode(raw: u16) -> Result<Instruction, DecodeError> {
    use self::Operand::*;
    use self::Operation::*;

    let op = Opcode(raw);
    let vx = V(op.x() as u8);
    let vy = V(op.y() as u8);
    let kk = Literal::Byte(op.kk());

    let instruction = match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => Instruction::bare(Cls),
        (0x0, 0x0, 0xE, 0xE) => Instruction::bare(Ret),
        (0x0, ..) => Instruction::address(Sys, op),
        (0x1, ..) => Instruction::address(Jp, op),
        (0x2, ..) => Instruction::address(Call, op),
        (0x3, ..) => Instruction::unary(Se, vx).with_literal(kk),
        (0x4, ..) => Instruction::unary(Sne, vx).with_literal(kk),
        (0x5, ..) => Instruction::binary(Se, vx, vy),
        (0x6, ..) => Instruction::unary(Ld, vx).with_literal(kk),
        (0x7, ..) => Instruction::unary(Add, vx).with_literal(kk),
        (0x8, .., 0x0) => Instruction::binary(Ld, vx, vy),
        (0x8, .., 0x1) => Instruction::binary(Or, vx, vy),
        (0x8, .., 0x2) => Instruction::binary(And, vx, vy),
        (0x8, .., 0x3) => Instruction::binary(Xor, vx, vy),
        (0x8, .., 0x4) => Instruction::binary(Add, vx, vy),
        (0x8, .., 0x5) => Instruction::binary(Sub, vx, vy),
        (0x8, .., 0x6) => Instruction::unary(Shr, vx),
        (0x8, .., 0x7) => Instruction::binary(Subn, vx, vy),
        (0x8, .., 0xE) => Instruction::unary(Shl, vx),
        (0x9, ..) => Instruction::binary(Sne, vx, vy),
        (0xA, ..) => Instruction::address(Ld, op).with_first(I),
        (0xB, ..) => Instruction::address(Jp, op).with_first(V(0)),
        (0xC, ..) => Instruction::unary(Rnd, vx).with_literal(kk),
        (0xD, .., n) => Instruction::binary(Drw, vx, vy).with_literal(Literal::Byte(n)),
        (0xE, _, 0x9, 0xE) => Instruction::unary(Skp, vx),
        (0xE, _, 0xA, 0x1) => Instruction::unary(Sknp, vx),
        (0xF, _, 0x0, 0x7) => Instruction::binary(Ld, vx, Dt),
        (0xF, _, 0x0, 0xA) => Instruction::binary(Ld, vx, K),
        (0xF, _, 0x1, 0x5) => Instruction::binary(Ld, Dt, vx),
        (0xF, _, 0x1, 0x8) => Instruction::binary(Ld, St, vx),
        (0xF, _, 0x1, 0xE) => Instruction::binary(Add, I, vx),
        (0xF, _, 0x2, 0x9) => Instruction::binary(Ld, F, vx),
        (0xF, _, 0x3, 0x3) => Instruction::binary(Ld, B, vx),
        (0xF, _, 0x5, 0x5) => Instruction::binary(Ld, IndirectI, vx),
        (0xF, _, 0x6, 0x5) => Instruction::binary(Ld, vx, IndirectI),
        _ => return Err(DecodeError { opcode: raw }),
    };
    Ok(instruction)
}

/// Walks a program two bytes at a time, decoding each word as if it were loaded at `origin`.
///
/// A trailing odd byte is not an instruction and is skipped.
pub fn disassemble(
    program: &[u8],
    origin: u16,
) -> impl Iterator<Item = (u16, Opcode, Result<Instruction, DecodeError>)> + '_ {
    program
        .chunks_exact(2)
        .enumerate()
        .map(move |(index, word)| {
            let address = origin.wrapping_add(2 * index as u16);
            let op = Opcode::from_bytes(word[0], word[1]);
            (address, op, decode(op.0))
        })
}
