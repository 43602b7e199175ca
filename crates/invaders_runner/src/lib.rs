//! Drivers for the `invaders_i8080` core: a RAM-backed machine, a CP/M
//! harness for the 8080 exerciser programs, and the `invaders8080` binary.

use std::path::Path;

use anyhow::Result;
use invaders_i8080::Registers;

pub mod config;
pub mod cpm;
pub mod machine;
pub mod ram;

pub use config::RunConfig;
pub use machine::Machine;
pub use ram::RamBus;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgramKind {
    /// Flat image loaded at `RunConfig::load_address`, run until HLT.
    Raw,
    /// CP/M `.COM` program, run until it returns to the OS.
    Cpm,
}

impl ProgramKind {
    /// Guess the kind from a file name: `.com` means CP/M.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let is_com = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("com"));
        if is_com {
            ProgramKind::Cpm
        } else {
            ProgramKind::Raw
        }
    }
}

/// What a finished run left behind.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Console output captured from BDOS calls. Empty for raw runs.
    pub output: String,
    pub instructions: u64,
    pub registers: Registers,
    pub halted: bool,
}

pub fn run(kind: ProgramKind, program: &[u8], config: &RunConfig) -> Result<RunReport> {
    match kind {
        ProgramKind::Raw => run_raw(program, config),
        ProgramKind::Cpm => cpm::run(program, config.max_instructions),
    }
}

pub fn run_raw(program: &[u8], config: &RunConfig) -> Result<RunReport> {
    let mut bus = RamBus::new();
    bus.load(config.load_address, program)?;
    let mut machine = Machine::with_config(bus, config);

    let instructions = machine.run(config.max_instructions);
    let halted = machine.cpu().is_halted();
    if !halted {
        log::warn!("stopped after {} instructions without halting", instructions);
    }

    Ok(RunReport {
        output: String::new(),
        instructions,
        registers: *machine.cpu().registers(),
        halted,
    })
}
