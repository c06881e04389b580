use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use chip8_vm::constants::DEFAULT_SEED;
use chip8_vm::{Chip8, Step, CLOCK_SPEED};

use crate::keymap::{KeyEvent, KeyScript};
use crate::render::frame_to_text;
use crate::rom;

#[derive(clap::Args, Debug)]
pub struct Options {
    /// Program image loaded at 0x200
    pub rom: PathBuf,

    /// Treat the ROM as a text listing of hex bytes
    #[arg(long)]
    pub hex: bool,

    /// Stop after this many ticks
    #[arg(long, default_value_t = 1000)]
    pub ticks: u64,

    /// Ticks per second, 0 runs unpaced
    #[arg(long, default_value_t = CLOCK_SPEED)]
    pub rate: u64,

    /// Seed for the random source used by RND
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Key events as tick:key or tick:-key, comma separated
    #[arg(long)]
    pub keys: Option<KeyScript>,

    /// Print the frame after every tick that drew to it
    #[arg(long)]
    pub frames: bool,
}

pub fn run(options: &Options) -> Result<()> {
    let program = rom::load(&options.rom, options.hex)?;
    info!("loaded {} bytes from {}", program.len(), options.rom.display());
    let mut chip8 = Chip8::with_rng(&program, StdRng::seed_from_u64(options.seed))
        .with_context(|| format!("unable to load {}", options.rom.display()))?;

    let cycle_time = match options.rate {
        0 => None,
        rate => Some(Duration::from_nanos(1_000_000_000 / rate)),
    };
    let script = options.keys.clone().unwrap_or_default();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    drive(
        &mut chip8,
        &script,
        options.ticks,
        options.frames,
        cycle_time,
        &mut out,
    )
}

/// Ticks `chip8` until the tick budget runs out or the CPU faults.
///
/// Key events are applied right before the tick they are scheduled for. The
/// final frame is always written, after every drawing tick too when `frames`
/// is set.
pub fn drive<W: Write>(
    chip8: &mut Chip8,
    script: &KeyScript,
    ticks: u64,
    frames: bool,
    cycle_time: Option<Duration>,
    out: &mut W,
) -> Result<()> {
    let mut events = script.0.iter().peekable();
    let mut last_cycle = Instant::now();

    for tick in 0..ticks {
        while let Some(event) = events.next_if(|event: &&KeyEvent| event.tick <= tick) {
            debug!("tick {}: {:?}", tick, event);
            event.apply(chip8);
        }

        let step = chip8.tick().with_context(|| {
            format!("CPU halted on tick {} (pc {:#06X})", tick, chip8.state().pc)
        })?;
        if let Step::Resumed { register, key } = step {
            debug!("tick {}: V{:X} <- key {:X}", tick, register, key);
        }

        // If the draw flag is set, render the current frame
        if frames {
            if let Some(frame) = chip8.get_frame() {
                writeln!(out, "tick {}", tick)?;
                write!(out, "{}", frame_to_text(frame))?;
            }
        }

        // Handle timing
        if let Some(cycle_time) = cycle_time {
            let elapsed_cycle_time = last_cycle.elapsed();
            if cycle_time > elapsed_cycle_time {
                std::thread::sleep(cycle_time - elapsed_cycle_time);
            }
            last_cycle = Instant::now();
        }
    }

    writeln!(out, "final frame")?;
    write!(out, "{}", frame_to_text(chip8.frame_buffer()))?;
    Ok(())
}
