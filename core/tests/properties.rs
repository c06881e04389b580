use chip8_vm::{decode, Chip8, Error, FrameBuffer, Literal, Operand, Operation};
use proptest::prelude::*;

fn assemble(program: &[u16]) -> Vec<u8> {
    program.iter().flat_map(|op| op.to_be_bytes()).collect()
}

fn boot(program: &[u16]) -> Chip8 {
    Chip8::new(&assemble(program)).unwrap()
}

fn run(chip8: &mut Chip8, ticks: usize) {
    for _ in 0..ticks {
        chip8.tick().unwrap();
    }
}

/// `LD Vx, kk`
fn ld(x: u8, kk: u8) -> u16 {
    0x6000 | u16::from(x) << 8 | u16::from(kk)
}

/// `8xyn`
fn alu(x: u8, y: u8, n: u16) -> u16 {
    0x8000 | u16::from(x) << 8 | u16::from(y) << 4 | n
}

proptest! {
    #[test]
    fn decode_extracts_operands_per_band(band in 0u16..16, rest in 0u16..0x1000) {
        let raw = band << 12 | rest;
        let x = Operand::V(((raw >> 8) & 0xF) as u8);
        let y = Operand::V(((raw >> 4) & 0xF) as u8);
        let kk = Literal::Byte((raw & 0xFF) as u8);
        let nnn = Literal::Address(raw & 0xFFF);
        let n = (raw & 0xF) as u8;

        match (band, decode(raw)) {
            (0x0, Ok(i)) => {
                if raw == 0x00E0 || raw == 0x00EE {
                    prop_assert_eq!(i.literal, None);
                } else {
                    prop_assert_eq!(i.operation, Operation::Sys);
                    prop_assert_eq!(i.literal, Some(nnn));
                }
            }
            (0x1, Ok(i)) | (0x2, Ok(i)) => prop_assert_eq!(i.literal, Some(nnn)),
            (0xA, Ok(i)) => {
                prop_assert_eq!(i.first, Some(Operand::I));
                prop_assert_eq!(i.literal, Some(nnn));
            }
            (0xB, Ok(i)) => {
                prop_assert_eq!(i.first, Some(Operand::V(0)));
                prop_assert_eq!(i.literal, Some(nnn));
            }
            (0x3, Ok(i)) | (0x4, Ok(i)) | (0x6, Ok(i)) | (0x7, Ok(i)) | (0xC, Ok(i)) => {
                prop_assert_eq!(i.first, Some(x));
                prop_assert_eq!(i.second, None);
                prop_assert_eq!(i.literal, Some(kk));
            }
            (0x5, Ok(i)) | (0x9, Ok(i)) => {
                prop_assert_eq!(i.first, Some(x));
                prop_assert_eq!(i.second, Some(y));
            }
            (0xD, Ok(i)) => {
                prop_assert_eq!(i.first, Some(x));
                prop_assert_eq!(i.second, Some(y));
                prop_assert_eq!(i.literal, Some(Literal::Byte(n)));
            }
            (0x8, result) => {
                let defined = n <= 0x7 || n == 0xE;
                prop_assert_eq!(result.is_ok(), defined);
                if let Ok(i) = result {
                    prop_assert_eq!(i.first, Some(x));
                    if n != 0x6 && n != 0xE {
                        prop_assert_eq!(i.second, Some(y));
                    }
                }
            }
            (0xE, result) => {
                let defined = raw & 0xFF == 0x9E || raw & 0xFF == 0xA1;
                prop_assert_eq!(result.is_ok(), defined);
                if let Ok(i) = result {
                    prop_assert_eq!(i.first, Some(x));
                }
            }
            (0xF, result) => {
                let defined = [0x07, 0x0A, 0x15, 0x18, 0x1E, 0x29, 0x33, 0x55, 0x65]
                    .contains(&(raw & 0xFF));
                prop_assert_eq!(result.is_ok(), defined);
                if let Ok(i) = result {
                    prop_assert!(i.first == Some(x) || i.second == Some(x));
                }
            }
            (_, Err(e)) => prop_assert!(false, "band {:X} failed to decode: {}", band, e),
            _ => unreachable!(),
        }
    }

    #[test]
    fn add_sets_carry(a in any::<u8>(), b in any::<u8>(), x in 0u8..15, y in 0u8..15) {
        prop_assume!(x != y);
        let mut chip8 = boot(&[ld(x, a), ld(y, b), alu(x, y, 0x4)]);
        run(&mut chip8, 3);
        let sum = u16::from(a) + u16::from(b);
        prop_assert_eq!(chip8.state().v[x as usize], (sum % 256) as u8);
        prop_assert_eq!(chip8.state().v[0xF], (sum > 255) as u8);
    }

    #[test]
    fn sub_and_subn_set_not_borrow(a in any::<u8>(), b in any::<u8>()) {
        let mut chip8 = boot(&[ld(0, a), ld(1, b), alu(0, 1, 0x5)]);
        run(&mut chip8, 3);
        prop_assert_eq!(chip8.state().v[0], a.wrapping_sub(b));
        prop_assert_eq!(chip8.state().v[0xF], (a > b) as u8);

        let mut chip8 = boot(&[ld(0, a), ld(1, b), alu(0, 1, 0x7)]);
        run(&mut chip8, 3);
        prop_assert_eq!(chip8.state().v[0], b.wrapping_sub(a));
        prop_assert_eq!(chip8.state().v[0xF], (b > a) as u8);
    }

    #[test]
    fn shifts_flag_the_dropped_bit(a in any::<u8>()) {
        let mut chip8 = boot(&[ld(3, a), alu(3, 0, 0x6)]);
        run(&mut chip8, 2);
        prop_assert_eq!(chip8.state().v[3], a >> 1);
        prop_assert_eq!(chip8.state().v[0xF], a & 1);

        let mut chip8 = boot(&[ld(3, a), alu(3, 0, 0xE)]);
        run(&mut chip8, 2);
        prop_assert_eq!(chip8.state().v[3], a << 1);
        prop_assert_eq!(chip8.state().v[0xF], a >> 7);
    }

    #[test]
    fn drawing_twice_restores_the_frame(
        x in any::<u8>(),
        y in any::<u8>(),
        sprite in proptest::collection::vec(any::<u8>(), 1..16),
    ) {
        let height = sprite.len() as u16;
        // 0x200 LD V0, x; 0x202 LD V1, y; 0x204 LD I, 0x20A; 0x206 DRW; 0x208 DRW; 0x20A sprite
        let mut program = assemble(&[ld(0, x), ld(1, y), 0xA20A, 0xD010 | height, 0xD010 | height]);
        program.extend_from_slice(&sprite);
        let mut chip8 = Chip8::new(&program).unwrap();

        run(&mut chip8, 4);
        prop_assert_eq!(chip8.state().v[0xF], 0);
        let lit = chip8
            .frame_buffer()
            .rows()
            .flat_map(|r| r.iter())
            .filter(|&&p| p)
            .count();
        let bits: u32 = sprite.iter().map(|b| b.count_ones()).sum();
        prop_assert_eq!(lit as u32, bits);

        run(&mut chip8, 1);
        prop_assert_eq!(chip8.frame_buffer(), &FrameBuffer::new());
        prop_assert_eq!(chip8.state().v[0xF], (bits > 0) as u8);
    }

    #[test]
    fn store_then_load_round_trips(values in any::<[u8; 16]>(), x in 0u8..16) {
        let mut program: Vec<u16> = (0..16).map(|r| ld(r, values[r as usize])).collect();
        program.push(0xA300);
        program.push(0xF055 | u16::from(x) << 8);
        program.extend((0..16).map(|r| ld(r, 0)));
        program.push(0xF065 | u16::from(x) << 8);
        let mut chip8 = boot(&program);
        run(&mut chip8, program.len());

        let x = x as usize;
        prop_assert_eq!(&chip8.state().v[..=x], &values[..=x]);
        prop_assert!(chip8.state().v[x + 1..].iter().all(|&v| v == 0));
        prop_assert_eq!(chip8.memory().read_slice(0x300, x + 1).unwrap(), &values[..=x]);
    }

    #[test]
    fn bcd_digits_recompose(value in any::<u8>()) {
        let mut chip8 = boot(&[ld(5, value), 0xA300, 0xF533]);
        run(&mut chip8, 3);
        let digits = chip8.memory().read_slice(0x300, 3).unwrap();
        prop_assert!(digits.iter().all(|&d| d < 10));
        let recomposed = u16::from(digits[0]) * 100 + u16::from(digits[1]) * 10 + u16::from(digits[2]);
        prop_assert_eq!(recomposed, u16::from(value));
    }

    #[test]
    fn nested_calls_unwind(depth in 1usize..=16) {
        let mut chip8 = Chip8::new(&nested_calls(depth)).unwrap();
        let mut deepest = 0;
        for _ in 0..2 * depth {
            chip8.tick().unwrap();
            deepest = deepest.max(chip8.state().sp);
        }
        prop_assert_eq!(deepest as usize, depth);
        prop_assert_eq!(chip8.state().sp, 0);
        prop_assert_eq!(chip8.state().pc, 0x202);
    }

    #[test]
    fn timers_never_underflow(start in any::<u8>(), ticks in 0usize..600) {
        // LD V0, start; LD DT, V0; LD ST, V0; JP 0x206
        let mut chip8 = boot(&[ld(0, start), 0xF015, 0xF018, 0x1206]);
        run(&mut chip8, 3 + ticks);
        let elapsed_dt = (2 + ticks).min(255) as u8;
        let elapsed_st = (1 + ticks).min(255) as u8;
        prop_assert_eq!(chip8.state().delay_timer, start.saturating_sub(elapsed_dt));
        prop_assert_eq!(chip8.state().sound_timer, start.saturating_sub(elapsed_st));
    }
}

/// `depth` levels of subroutines, each calling the next and returning.
///
/// ```text
/// 0x200        CALL 0x300
/// 0x202        JP 0x202
/// 0x300 + 4k   CALL 0x300 + 4(k + 1)   (RET for the deepest)
/// 0x302 + 4k   RET
/// ```
fn nested_calls(depth: usize) -> Vec<u8> {
    let mut program = vec![0; 0x100 + 4 * depth];
    program[0..4].copy_from_slice(&assemble(&[0x2300, 0x1202]));
    for k in 0..depth {
        let at = 0x100 + 4 * k;
        let first = if k + 1 < depth {
            0x2000 | (0x300 + 4 * (k as u16 + 1))
        } else {
            0x00EE
        };
        program[at..at + 4].copy_from_slice(&assemble(&[first, 0x00EE]));
    }
    program
}

#[test]
fn seventeen_nested_calls_overflow() {
    let mut chip8 = Chip8::new(&nested_calls(17)).unwrap();
    run(&mut chip8, 16);
    assert_eq!(chip8.state().sp, 16);
    assert_eq!(
        chip8.tick(),
        Err(Error::StackOverflow {
            address: 0x300 + 4 * 15 + 2
        })
    );
}
