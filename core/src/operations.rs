//! The arithmetic behind the register instructions.
//!
//! Every operation that defines a VF side effect returns `(result, flag)`. The
//! flag is computed from the operands before anything is written back; the
//! caller stores the result in Vx and then the flag in VF, so when Vx is VF
//! the flag wins.

/// Vx + Vy; VF = carry
pub fn add_with_carry(vx: u8, vy: u8) -> (u8, u8) {
    let sum = u16::from(vx) + u16::from(vy);
    ((sum & 0xFF) as u8, (sum > 0xFF) as u8)
}

/// Vx - Vy; VF = Vx > Vy (NOT borrow)
pub fn sub_with_borrow(vx: u8, vy: u8) -> (u8, u8) {
    (vx.wrapping_sub(vy), (vx > vy) as u8)
}

/// Vx >> 1; VF = least significant bit before the shift
pub fn shift_right(vx: u8) -> (u8, u8) {
    (vx >> 1, vx & 0x1)
}

/// Vx << 1; VF = most significant bit before the shift
pub fn shift_left(vx: u8) -> (u8, u8) {
    (vx << 1, vx >> 7)
}

/// Hundreds, tens and ones digits of a byte
pub fn bcd(value: u8) -> [u8; 3] {
    [value / 100, value / 10 % 10, value % 10]
}
