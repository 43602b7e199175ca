//! Just enough of CP/M to run the classic 8080 exerciser programs.
//!
//! A `.COM` program is loaded at the start of the TPA. Two stubs stand in
//! for the operating system: `OUT 0` at the warm boot vector ends the run,
//! and `OUT 1; RET` at the BDOS entry hands console calls to the host.

use anyhow::{bail, ensure, Context, Result};

use crate::machine::Machine;
use crate::ram::RamBus;
use crate::RunReport;

/// Load address of every `.COM` program.
pub const TPA_START: u16 = 0x0100;

const WARM_BOOT: u16 = 0x0000;
const BDOS_ENTRY: u16 = 0x0005;

const EXIT_PORT: u8 = 0;
const BDOS_PORT: u8 = 1;

const BDOS_CONSOLE_OUTPUT: u8 = 2;
const BDOS_PRINT_STRING: u8 = 9;

/// Build a machine with `program` in the TPA and the OS stubs planted.
pub fn load(program: &[u8]) -> Result<Machine<RamBus>> {
    let mut bus = RamBus::new();
    bus.load(TPA_START, program)
        .context("program does not fit in the TPA")?;
    bus.load(WARM_BOOT, &[0xd3, EXIT_PORT])?;
    bus.load(BDOS_ENTRY, &[0xd3, BDOS_PORT, 0xc9])?;

    let mut machine = Machine::new(bus);
    machine.cpu_mut().registers_mut().set_pc(TPA_START);
    Ok(machine)
}

/// Run a `.COM` program until it jumps back to CP/M.
///
/// Fails if the program halts, or if `max_instructions` is reached first.
pub fn run(program: &[u8], max_instructions: Option<u64>) -> Result<RunReport> {
    let mut machine = load(program)?;
    let mut output = String::new();

    loop {
        if let Some(limit) = max_instructions {
            ensure!(
                machine.instructions() < limit,
                "instruction limit of {} reached before the program exited",
                limit
            );
        }
        if !machine.step() {
            bail!(
                "program halted at {:04X} without returning to CP/M",
                machine.cpu().registers().pc().wrapping_sub(1)
            );
        }

        match machine.bus_mut().take_port_write() {
            Some((EXIT_PORT, _)) => break,
            Some((BDOS_PORT, _)) => bdos_call(&machine, &mut output),
            _ => {}
        }
    }

    log::debug!(
        "program exited after {} instructions",
        machine.instructions()
    );
    Ok(RunReport {
        output,
        instructions: machine.instructions(),
        registers: *machine.cpu().registers(),
        halted: false,
    })
}

fn bdos_call(machine: &Machine<RamBus>, output: &mut String) {
    let regs = machine.cpu().registers();
    match regs.c() {
        BDOS_CONSOLE_OUTPUT => output.push(char::from(regs.e())),
        BDOS_PRINT_STRING => {
            let bus = machine.bus();
            let mut addr = regs.de();
            // At most one pass over memory if the terminator is missing.
            for _ in 0..=u16::MAX {
                let b = bus.peek(addr);
                if b == b'$' {
                    break;
                }
                output.push(char::from(b));
                addr = addr.wrapping_add(1);
            }
        }
        function => log::debug!("ignoring BDOS function {}", function),
    }
}
