mod alu;
mod exec;


use crate::bus::Bus;
use crate::decode::{Condition, Reg8, RegPair, StackPair};
use crate::regs::{Flags, Registers};

/// Intel 8080 CPU core.
///
/// The core does not own a bus: every operation that touches memory or
/// ports borrows one from the caller, so the same CPU can be driven against
/// a real machine, a test double, or a [`NullBus`](crate::NullBus).
#[derive(Clone, Debug, Default)]
pub struct Cpu8080 {
    regs: Registers,
    interrupts_enabled: bool,
    halted: bool,
}

impl Cpu8080 {
    /// Create a new CPU instance in power-on state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all registers and latches to their power-on values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    /// Full read/write access for loaders, interrupt vectoring and tests.
    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    /// Set once HLT executes. Clearing it is the driver's business.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled
    }

    /// Clear the interrupt-enable latch, as acknowledging an interrupt does.
    pub fn disable_interrupts(&mut self) {
        self.interrupts_enabled = false;
    }

    /// Read the opcode at PC and advance PC by one.
    pub fn fetch_opcode<B: Bus>(&mut self, bus: &mut B) -> u8 {
        self.fetch_byte(bus)
    }

    /// Fetch and execute a single instruction.
    pub fn step<B: Bus>(&mut self, bus: &mut B) {
        let opcode = self.fetch_opcode(bus);
        self.execute_instruction(bus, opcode);
    }

    fn fetch_byte<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let pc = self.regs.pc();
        let b = bus.read_memory(pc);
        self.regs.set_pc(pc.wrapping_add(1));
        b
    }

    fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch_byte(bus);
        let hi = self.fetch_byte(bus);
        u16::from_le_bytes([lo, hi])
    }

    fn read_reg<B: Bus>(&mut self, bus: &mut B, reg: Reg8) -> u8 {
        match reg {
            Reg8::B => self.regs.b(),
            Reg8::C => self.regs.c(),
            Reg8::D => self.regs.d(),
            Reg8::E => self.regs.e(),
            Reg8::H => self.regs.h(),
            Reg8::L => self.regs.l(),
            Reg8::M => bus.memory_cell(self.regs.hl()).get(),
            Reg8::A => self.regs.a(),
        }
    }

    fn write_reg<B: Bus>(&mut self, bus: &mut B, reg: Reg8, value: u8) {
        match reg {
            Reg8::B => self.regs.set_b(value),
            Reg8::C => self.regs.set_c(value),
            Reg8::D => self.regs.set_d(value),
            Reg8::E => self.regs.set_e(value),
            Reg8::H => self.regs.set_h(value),
            Reg8::L => self.regs.set_l(value),
            Reg8::M => bus.memory_cell(self.regs.hl()).set(value),
            Reg8::A => self.regs.set_a(value),
        }
    }

    /// Read-modify-write of an 8-bit operand; `M` is a single bus access.
    fn update_reg<B: Bus>(&mut self, bus: &mut B, reg: Reg8, mut f: impl FnMut(u8) -> u8) -> u8 {
        match reg {
            Reg8::M => bus.memory_cell(self.regs.hl()).update(f),
            _ => {
                let value = f(self.read_reg(bus, reg));
                self.write_reg(bus, reg, value);
                value
            }
        }
    }

    fn pair(&self, rp: RegPair) -> u16 {
        match rp {
            RegPair::BC => self.regs.bc(),
            RegPair::DE => self.regs.de(),
            RegPair::HL => self.regs.hl(),
            RegPair::SP => self.regs.sp(),
        }
    }

    fn set_pair(&mut self, rp: RegPair, value: u16) {
        match rp {
            RegPair::BC => self.regs.set_bc(value),
            RegPair::DE => self.regs.set_de(value),
            RegPair::HL => self.regs.set_hl(value),
            RegPair::SP => self.regs.set_sp(value),
        }
    }

    fn stack_pair(&self, rp: StackPair) -> u16 {
        match rp {
            StackPair::BC => self.regs.bc(),
            StackPair::DE => self.regs.de(),
            StackPair::HL => self.regs.hl(),
            StackPair::PSW => self.regs.af(),
        }
    }

    fn set_stack_pair(&mut self, rp: StackPair, value: u16) {
        match rp {
            StackPair::BC => self.regs.set_bc(value),
            StackPair::DE => self.regs.set_de(value),
            StackPair::HL => self.regs.set_hl(value),
            StackPair::PSW => {
                let [a, f] = value.to_be_bytes();
                self.regs.set_a(a);
                self.regs.set_f(Flags::normalize(f));
            }
        }
    }

    /// Push a word: high byte at SP-1, low byte at SP-2.
    fn push<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        let sp = self.regs.sp().wrapping_sub(1);
        bus.write_memory(sp, hi);
        let sp = sp.wrapping_sub(1);
        bus.write_memory(sp, lo);
        self.regs.set_sp(sp);
    }

    fn pop<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let sp = self.regs.sp();
        let lo = bus.read_memory(sp);
        let hi = bus.read_memory(sp.wrapping_add(1));
        self.regs.set_sp(sp.wrapping_add(2));
        u16::from_le_bytes([lo, hi])
    }

    fn call<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        let ret = self.regs.pc();
        self.push(bus, ret);
        self.regs.set_pc(addr);
    }

    fn condition(&self, cond: Condition) -> bool {
        let flags = self.regs.flags();
        match cond {
            Condition::NotZero => !flags.contains(Flags::Z),
            Condition::Zero => flags.contains(Flags::Z),
            Condition::NotCarry => !flags.contains(Flags::C),
            Condition::Carry => flags.contains(Flags::C),
            Condition::ParityOdd => !flags.contains(Flags::P),
            Condition::ParityEven => flags.contains(Flags::P),
            Condition::Plus => !flags.contains(Flags::S),
            Condition::Minus => flags.contains(Flags::S),
        }
    }
}
