//! Intel 8080 CPU core.
//!
//! The core owns the register file and the two processor latches
//! (interrupt-enable and halted). Memory and IO ports live behind the
//! [`Bus`] trait, which the surrounding machine implements.
//!
//! A driver repeatedly calls [`Cpu8080::fetch_opcode`] followed by
//! [`Cpu8080::execute_instruction`] (or [`Cpu8080::step`], which does both).

pub mod bus;
pub mod cpu;
pub mod decode;
pub mod regs;

pub use bus::{Bus, MemoryCell, NullBus};
pub use cpu::Cpu8080;
pub use decode::{AluOp, Condition, Instruction, Opcode, Reg8, RegPair, StackPair};
pub use regs::{Flags, RegisterPair, Registers};
