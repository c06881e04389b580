use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::constants::{DEFAULT_SEED, FLAG_REGISTER, FONT_GLYPH_SIZE, FONT_START};
use crate::error::Result;
use crate::frame_buffer::FrameBuffer;
use crate::instruction::{decode, Instruction};
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::operations;
use crate::state::State;

/// What a single `tick` did
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// fetched, decoded and executed one instruction
    Executed(Instruction),
    /// parked on `LD Vx, K` and no key is down yet
    AwaitingKey,
    /// a key arrived while parked; it was stored in `register`
    Resumed { register: u8, key: u8 },
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - the register file and call stack (`state`)
///  - 4K of `memory` holding the font and the loaded program
///  - the `frame_buffer` drawn into by `CLS` and `DRW`
///  - the `keypad`, written by the host and read by the CPU
///
/// Supplies interfaces for:
/// - pressing and releasing keys
/// - advancing the CPU one instruction at a time
/// - inspecting its frame buffer for rendering by some display
///
/// `tick` is not reentrant; a host running the renderer or input on another
/// thread has to put the whole machine behind a lock.
pub struct Chip8 {
    state: State,
    memory: Memory,
    frame_buffer: FrameBuffer,
    keypad: Keypad,
    rng: Box<dyn RngCore + Send>,
    register_needing_key: Option<usize>,
    draw_flag: bool,
}

impl Chip8 {
    /// A fresh machine running `program`, with random numbers drawn from a
    /// generator seeded with `DEFAULT_SEED` so that runs are reproducible.
    pub fn new(program: &[u8]) -> Result<Self> {
        Self::with_rng(program, StdRng::seed_from_u64(DEFAULT_SEED))
    }

    /// A fresh machine running `program`, drawing random numbers from `rng`.
    ///
    /// # Arguments
    /// * `program` the raw program, copied in at 0x200
    /// * `rng` the source for `RND Vx, kk`
    pub fn with_rng<R>(program: &[u8], rng: R) -> Result<Self>
    where
        R: RngCore + Send + 'static,
    {
        let mut memory = Memory::new();
        memory.load_program(program)?;
        debug!("loaded {} byte program", program.len());
        Ok(Chip8 {
            state: State::new(),
            memory,
            frame_buffer: FrameBuffer::new(),
            keypad: Keypad::new(),
            rng: Box::new(rng),
            register_needing_key: None,
            draw_flag: false,
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    /// Returns the FrameBuffer if the last tick cleared or drew to it
    pub fn get_frame(&self) -> Option<&FrameBuffer> {
        if self.draw_flag {
            Some(&self.frame_buffer)
        } else {
            None
        }
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit value of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.keypad.press(key);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit value of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.keypad.release(key);
    }

    /// The register waiting on `LD Vx, K`, if the CPU is parked
    pub fn awaiting_key(&self) -> Option<u8> {
        self.register_needing_key.map(|x| x as u8)
    }

    /// Advances the CPU by a single cycle
    /// - if parked on a key wait, only polls the keypad
    /// - otherwise fetches, decodes and executes the next opcode
    /// - then counts the timers down
    pub fn tick(&mut self) -> Result<Step> {
        self.draw_flag = false;
        let step = match self.register_needing_key {
            Some(x) => self.poll_key(x),
            None => self.step()?,
        };
        self.state.decrement_timers();
        Ok(step)
    }

    fn poll_key(&mut self, x: usize) -> Step {
        match self.keypad.first_pressed() {
            Some(key) => {
                info!("key {:X} pressed, resuming into V{:X}", key, x);
                self.state.v[x] = key;
                self.register_needing_key = None;
                Step::Resumed {
                    register: x as u8,
                    key,
                }
            }
            None => Step::AwaitingKey,
        }
    }

    fn step(&mut self) -> Result<Step> {
        trace!(
            "v{:02X?} i{:04X} pc{:04X} sp{:X}",
            self.state.v,
            self.state.i,
            self.state.pc,
            self.state.sp
        );
        let address = self.state.pc;
        let op = self.fetch()?;
        let instruction = decode(op.0).map_err(|e| e.at(address))?;
        debug!("{:#06X} {}: {}", address, op, instruction);

        self.state.pc += 2;
        self.execute(op)?;
        Ok(Step::Executed(instruction))
    }

    /// Gets the opcode currently pointed at by the pc.
    fn fetch(&self) -> Result<Opcode> {
        self.memory.read_u16(self.state.pc).map(Opcode)
    }

    /// Runs the operation selected by the opcode's nibbles. The pc already
    /// points at the next instruction.
    fn execute(&mut self, op: Opcode) -> Result<()> {
        match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => self.clr(),
            (0x0, 0x0, 0xE, 0xE) => self.rts()?,
            (0x0, ..) => self.sys(op),
            (0x1, ..) => self.jump(op),
            (0x2, ..) => self.call(op)?,
            (0x3, ..) => self.ske(op),
            (0x4, ..) => self.skne(op),
            (0x5, ..) => self.skre(op),
            (0x6, ..) => self.load(op),
            (0x7, ..) => self.add(op),
            (0x8, .., 0x0) => self.mv(op),
            (0x8, .., 0x1) => self.or(op),
            (0x8, .., 0x2) => self.and(op),
            (0x8, .., 0x3) => self.xor(op),
            (0x8, .., 0x4) => self.addr(op),
            (0x8, .., 0x5) => self.sub(op),
            (0x8, .., 0x6) => self.shr(op),
            (0x8, .., 0x7) => self.subn(op),
            (0x8, .., 0xE) => self.shl(op),
            (0x9, ..) => self.skrne(op),
            (0xA, ..) => self.loadi(op),
            (0xB, ..) => self.jumpi(op),
            (0xC, ..) => self.rand(op),
            (0xD, ..) => self.draw(op)?,
            (0xE, _, 0x9, 0xE) => self.skpr(op),
            (0xE, _, 0xA, 0x1) => self.skup(op),
            (0xF, _, 0x0, 0x7) => self.moved(op),
            (0xF, _, 0x0, 0xA) => self.keyd(op),
            (0xF, _, 0x1, 0x5) => self.loads(op),
            (0xF, _, 0x1, 0x8) => self.ld(op),
            (0xF, _, 0x1, 0xE) => self.addi(op),
            (0xF, _, 0x2, 0x9) => self.ldspr(op),
            (0xF, _, 0x3, 0x3) => self.bcd(op)?,
            (0xF, _, 0x5, 0x5) => self.stor(op)?,
            (0xF, _, 0x6, 0x5) => self.read(op)?,
            // step() only executes what decode() accepted
            _ => unreachable!("{} was not decoded", op),
        }
        Ok(())
    }

    /// Vx = result; VF = flag
    /// The flag is written last so it wins when Vx is VF.
    fn set_with_flag(&mut self, x: usize, (result, flag): (u8, u8)) {
        self.state.v[x] = result;
        self.state.v[FLAG_REGISTER] = flag;
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.state.pc += 2;
        }
    }

    /// ignored
    fn sys(&mut self, op: Opcode) {
        debug!("ignoring machine code call to {:#05X}", op.addr());
    }

    /// clear
    fn clr(&mut self) {
        self.frame_buffer.clear();
        self.draw_flag = true;
    }

    /// PC = STACK.pop()
    fn rts(&mut self) -> Result<()> {
        self.state.pc = self.state.pop()?;
        Ok(())
    }

    /// PC = addr
    fn jump(&mut self, op: Opcode) {
        self.state.pc = op.addr();
    }

    /// STACK.push(PC); PC = addr
    fn call(&mut self, op: Opcode) -> Result<()> {
        self.state.push(self.state.pc)?;
        self.state.pc = op.addr();
        Ok(())
    }

    /// if Vx == kk then pc += 2
    fn ske(&mut self, op: Opcode) {
        self.skip_if(self.state.v[op.x()] == op.kk());
    }

    /// if Vx != kk then pc += 2
    fn skne(&mut self, op: Opcode) {
        self.skip_if(self.state.v[op.x()] != op.kk());
    }

    /// if Vx == Vy then pc += 2
    fn skre(&mut self, op: Opcode) {
        self.skip_if(self.state.v[op.x()] == self.state.v[op.y()]);
    }

    /// Vx = kk
    fn load(&mut self, op: Opcode) {
        self.state.v[op.x()] = op.kk();
    }

    /// Vx += kk
    /// Add kk to Vx; allow for overflow but implicitly drop it, VF untouched
    fn add(&mut self, op: Opcode) {
        self.state.v[op.x()] = self.state.v[op.x()].wrapping_add(op.kk());
    }

    /// Vx = Vy
    fn mv(&mut self, op: Opcode) {
        self.state.v[op.x()] = self.state.v[op.y()];
    }

    /// Vx |= Vy
    fn or(&mut self, op: Opcode) {
        self.state.v[op.x()] |= self.state.v[op.y()];
    }

    /// Vx &= Vy
    fn and(&mut self, op: Opcode) {
        self.state.v[op.x()] &= self.state.v[op.y()];
    }

    /// Vx ^= Vy
    fn xor(&mut self, op: Opcode) {
        self.state.v[op.x()] ^= self.state.v[op.y()];
    }

    /// Vx += Vy; VF = carry
    fn addr(&mut self, op: Opcode) {
        let flagged = operations::add_with_carry(self.state.v[op.x()], self.state.v[op.y()]);
        self.set_with_flag(op.x(), flagged);
    }

    /// Vx -= Vy; VF = !borrow
    fn sub(&mut self, op: Opcode) {
        let flagged = operations::sub_with_borrow(self.state.v[op.x()], self.state.v[op.y()]);
        self.set_with_flag(op.x(), flagged);
    }

    /// Vx >>= 1; VF = lsb
    fn shr(&mut self, op: Opcode) {
        let flagged = operations::shift_right(self.state.v[op.x()]);
        self.set_with_flag(op.x(), flagged);
    }

    /// Vx = Vy - Vx; VF = !borrow
    fn subn(&mut self, op: Opcode) {
        let flagged = operations::sub_with_borrow(self.state.v[op.y()], self.state.v[op.x()]);
        self.set_with_flag(op.x(), flagged);
    }

    /// Vx <<= 1; VF = msb
    fn shl(&mut self, op: Opcode) {
        let flagged = operations::shift_left(self.state.v[op.x()]);
        self.set_with_flag(op.x(), flagged);
    }

    /// if Vx != Vy then pc += 2
    fn skrne(&mut self, op: Opcode) {
        self.skip_if(self.state.v[op.x()] != self.state.v[op.y()]);
    }

    /// I = addr
    fn loadi(&mut self, op: Opcode) {
        self.state.i = op.addr();
    }

    /// PC = V0 + addr
    fn jumpi(&mut self, op: Opcode) {
        self.state.pc = u16::from(self.state.v[0x0]) + op.addr();
    }

    /// Vx = rand_byte & kk
    fn rand(&mut self, op: Opcode) {
        let rand_byte: u8 = self.rng.gen();
        self.state.v[op.x()] = rand_byte & op.kk();
    }

    /// draw_sprite(x=Vx y=Vy size=n)
    /// XORs a sprite from memory I..I+n at position Vx, Vy on the FrameBuffer with wrapping.
    /// Sets VF if any pixels were erased
    fn draw(&mut self, op: Opcode) -> Result<()> {
        self.state.v[FLAG_REGISTER] = 0x0;
        let x = self.state.v[op.x()];
        let y = self.state.v[op.y()];

        let sprite = self.memory.read_slice(self.state.i, op.n() as usize)?;
        let collision = self.frame_buffer.draw_sprite(x, y, sprite);

        self.state.v[FLAG_REGISTER] = collision as u8;
        self.draw_flag = true;
        Ok(())
    }

    /// if Vx.pressed then pc += 2
    /// A Vx above 0xF names no key, so it is never pressed.
    fn skpr(&mut self, op: Opcode) {
        self.skip_if(self.keypad.is_pressed(self.state.v[op.x()]));
    }

    /// if !Vx.pressed then pc += 2
    fn skup(&mut self, op: Opcode) {
        self.skip_if(!self.keypad.is_pressed(self.state.v[op.x()]));
    }

    /// Vx = DT
    fn moved(&mut self, op: Opcode) {
        self.state.v[op.x()] = self.state.delay_timer;
    }

    /// await keypress for Vx
    /// A key already held is taken straight away, otherwise the CPU parks
    /// until a later tick sees one.
    fn keyd(&mut self, op: Opcode) {
        match self.keypad.first_pressed() {
            Some(key) => self.state.v[op.x()] = key,
            None => {
                info!("waiting for key press into V{:X}", op.x());
                self.register_needing_key = Some(op.x());
            }
        }
    }

    /// DT = Vx
    fn loads(&mut self, op: Opcode) {
        self.state.delay_timer = self.state.v[op.x()];
    }

    /// ST = Vx
    fn ld(&mut self, op: Opcode) {
        self.state.sound_timer = self.state.v[op.x()];
    }

    /// I += Vx
    fn addi(&mut self, op: Opcode) {
        self.state.i = self.state.i.wrapping_add(u16::from(self.state.v[op.x()]));
    }

    /// I = FONT_START + Vx * 5
    /// Set I to the memory address of the font sprite for digit Vx
    fn ldspr(&mut self, op: Opcode) {
        self.state.i = FONT_START + FONT_GLYPH_SIZE * u16::from(self.state.v[op.x()]);
    }

    /// mem[I..I+3] = bcd(Vx)
    fn bcd(&mut self, op: Opcode) -> Result<()> {
        let digits = operations::bcd(self.state.v[op.x()]);
        self.memory.write_slice(self.state.i, &digits)
    }

    /// mem[I..=I+x] = V0..=Vx
    fn stor(&mut self, op: Opcode) -> Result<()> {
        self.memory.write_slice(self.state.i, &self.state.v[..=op.x()])
    }

    /// V0..=Vx = mem[I..=I+x]
    fn read(&mut self, op: Opcode) -> Result<()> {
        let bytes = self.memory.read_slice(self.state.i, op.x() + 1)?;
        self.state.v[..=op.x()].copy_from_slice(bytes);
        Ok(())
    }
}
