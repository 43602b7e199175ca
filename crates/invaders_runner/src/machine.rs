use invaders_i8080::{Bus, Cpu8080};

use crate::config::RunConfig;

/// An 8080 wired to a bus, plus an instruction counter.
pub struct Machine<B: Bus> {
    cpu: Cpu8080,
    bus: B,
    instructions: u64,
}

impl<B: Bus> Machine<B> {
    /// Construct a machine with the CPU in its power-on state.
    pub fn new(bus: B) -> Self {
        Self {
            cpu: Cpu8080::new(),
            bus,
            instructions: 0,
        }
    }

    /// Construct a machine with PC and SP taken from `config`.
    pub fn with_config(bus: B, config: &RunConfig) -> Self {
        let mut machine = Self::new(bus);
        let regs = machine.cpu.registers_mut();
        regs.set_pc(config.entry_point);
        regs.set_sp(config.stack_pointer);
        machine
    }

    pub fn cpu(&self) -> &Cpu8080 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu8080 {
        &mut self.cpu
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Total instructions executed since construction.
    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Execute one instruction. Returns `false` without touching the bus
    /// when the CPU is halted.
    pub fn step(&mut self) -> bool {
        if self.cpu.is_halted() {
            return false;
        }
        self.cpu.step(&mut self.bus);
        self.instructions += 1;
        true
    }

    /// Step until the CPU halts or `limit` instructions have run.
    ///
    /// Returns the number of instructions executed by this call.
    pub fn run(&mut self, limit: Option<u64>) -> u64 {
        let start = self.instructions;
        while limit.map_or(true, |limit| self.instructions - start < limit) {
            if !self.step() {
                break;
            }
        }
        self.instructions - start
    }

    /// Acknowledge a maskable interrupt for `RST vector`.
    ///
    /// Ignored while interrupts are disabled. Otherwise the interrupt-enable
    /// latch is cleared and the CPU executes the RST opcode as if the
    /// controller had jammed it onto the data bus. The RST is never fetched,
    /// so its trace line reports PC-1 rather than a fetch address. A halted
    /// CPU stays halted.
    pub fn interrupt(&mut self, vector: u8) -> bool {
        if !self.cpu.interrupts_enabled() {
            log::trace!("interrupt {} ignored, interrupts disabled", vector & 0x07);
            return false;
        }
        let rst = 0xc7 | ((vector & 0x07) << 3);
        self.cpu.disable_interrupts();
        self.cpu.execute_instruction(&mut self.bus, rst);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ram::RamBus;

    fn machine_with(program: &[u8]) -> Machine<RamBus> {
        let mut bus = RamBus::new();
        bus.load(0x0000, program).unwrap();
        Machine::new(bus)
    }

    #[test]
    fn run_stops_at_halt() {
        // MVI B,03h; DCR B; JNZ 0002h; HLT
        let mut machine = machine_with(&[0x06, 0x03, 0x05, 0xc2, 0x02, 0x00, 0x76]);

        let executed = machine.run(None);

        assert!(machine.cpu().is_halted());
        assert_eq!(machine.cpu().registers().b(), 0);
        assert_eq!(executed, 1 + 3 * 2 + 1);
        assert!(!machine.step());
        assert_eq!(machine.instructions(), executed);
    }

    #[test]
    fn run_honours_limit() {
        // JMP 0000h
        let mut machine = machine_with(&[0xc3, 0x00, 0x00]);

        assert_eq!(machine.run(Some(10)), 10);
        assert_eq!(machine.run(Some(5)), 5);
        assert_eq!(machine.instructions(), 15);
        assert!(!machine.cpu().is_halted());
    }

    #[test]
    fn with_config_sets_entry_and_stack() {
        let config = RunConfig::builder()
            .entry_point(0x0100)
            .stack_pointer(0x2400)
            .build();
        let machine = Machine::with_config(RamBus::new(), &config);
        assert_eq!(machine.cpu().registers().pc(), 0x0100);
        assert_eq!(machine.cpu().registers().sp(), 0x2400);
    }

    #[test]
    fn interrupt_ignored_while_disabled() {
        let mut machine = machine_with(&[0x00]);
        machine.cpu_mut().registers_mut().set_sp(0x2400);

        assert!(!machine.interrupt(1));
        assert_eq!(machine.cpu().registers().pc(), 0x0000);
        assert_eq!(machine.cpu().registers().sp(), 0x2400);
    }

    #[test]
    fn interrupt_vectors_through_rst() {
        // EI; NOP
        let mut machine = machine_with(&[0xfb, 0x00]);
        machine.cpu_mut().registers_mut().set_sp(0x2400);
        machine.step();
        machine.step();

        assert!(machine.interrupt(2));

        let regs = machine.cpu().registers();
        assert_eq!(regs.pc(), 0x0010);
        assert_eq!(regs.sp(), 0x23fe);
        assert_eq!(&machine.bus().memory()[0x23fe..0x2400], &[0x02, 0x00]);
        assert!(!machine.cpu().interrupts_enabled());

        // Disabled again until the handler re-enables them.
        assert!(!machine.interrupt(1));
    }

    #[test]
    fn interrupt_does_not_resume_halted_cpu() {
        // EI; HLT
        let mut machine = machine_with(&[0xfb, 0x76]);
        machine.cpu_mut().registers_mut().set_sp(0x2400);
        machine.run(None);

        assert!(machine.interrupt(1));
        assert_eq!(machine.cpu().registers().pc(), 0x0008);
        assert!(machine.cpu().is_halted());
        assert!(!machine.step());
    }
}
