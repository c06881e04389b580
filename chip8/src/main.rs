//! Headless driver for the chip8-vm core.
//!
//! `chip8-run run <ROM>` ticks a program at a fixed rate, feeding it scripted
//! key events and printing the frame buffer as text. `chip8-run disasm <ROM>`
//! lists the program's instructions.
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

mod disasm;
mod keymap;
mod render;
mod rom;
mod run;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG also applies
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a program and print what it draws
    Run(run::Options),
    /// List a program's instructions
    Disasm {
        /// Program image loaded at 0x200
        rom: PathBuf,

        /// Treat the ROM as a text listing of hex bytes
        #[arg(long)]
        hex: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match args.command {
        Command::Run(options) => run::run(&options),
        Command::Disasm { rom, hex } => {
            let program = rom::load(&rom, hex)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for line in disasm::listing(&program) {
                writeln!(out, "{}", line)?;
            }
            Ok(())
        }
    }
}
