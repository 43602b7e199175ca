use super::Cpu8080;
use crate::bus::Bus;
use crate::decode::Instruction;
use crate::regs::Flags;

impl Cpu8080 {
    /// Execute a single, already fetched opcode to completion.
    ///
    /// Immediate operands are fetched from PC as needed, so after this
    /// returns PC points past the whole instruction unless it transferred
    /// control.
    pub fn execute_instruction<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let instruction = Instruction::decode(opcode);
        log::trace!(
            "{:04X}: {:02X} {:?}",
            self.regs.pc().wrapping_sub(1),
            opcode,
            instruction
        );

        match instruction {
            Instruction::Nop => {}

            // 16-bit loads and arithmetic.
            Instruction::Lxi(rp) => {
                let v = self.fetch_word(bus);
                self.set_pair(rp, v);
            }
            Instruction::Dad(rp) => {
                let v = self.pair(rp);
                self.dad(v);
            }
            Instruction::Inx(rp) => {
                let v = self.pair(rp).wrapping_add(1);
                self.set_pair(rp, v);
            }
            Instruction::Dcx(rp) => {
                let v = self.pair(rp).wrapping_sub(1);
                self.set_pair(rp, v);
            }

            // Indirect and direct memory transfers.
            Instruction::Stax(rp) => {
                let addr = self.pair(rp);
                bus.write_memory(addr, self.regs.a());
            }
            Instruction::Ldax(rp) => {
                let addr = self.pair(rp);
                let v = bus.read_memory(addr);
                self.regs.set_a(v);
            }
            Instruction::Shld => {
                let addr = self.fetch_word(bus);
                bus.write_memory(addr, self.regs.l());
                bus.write_memory(addr.wrapping_add(1), self.regs.h());
            }
            Instruction::Lhld => {
                let addr = self.fetch_word(bus);
                let lo = bus.read_memory(addr);
                let hi = bus.read_memory(addr.wrapping_add(1));
                self.regs.set_hl(u16::from_le_bytes([lo, hi]));
            }
            Instruction::Sta => {
                let addr = self.fetch_word(bus);
                bus.write_memory(addr, self.regs.a());
            }
            Instruction::Lda => {
                let addr = self.fetch_word(bus);
                let v = bus.read_memory(addr);
                self.regs.set_a(v);
            }

            // Single register operations.
            Instruction::Inr(r) => {
                let v = self.update_reg(bus, r, |v| v.wrapping_add(1));
                self.inr_flags(v);
            }
            Instruction::Dcr(r) => {
                let v = self.update_reg(bus, r, |v| v.wrapping_sub(1));
                self.dcr_flags(v);
            }
            Instruction::Mvi(r) => {
                let v = self.fetch_byte(bus);
                self.write_reg(bus, r, v);
            }
            Instruction::Rlc => self.rlc(),
            Instruction::Rrc => self.rrc(),
            Instruction::Ral => self.ral(),
            Instruction::Rar => self.rar(),
            Instruction::Daa => self.daa(),
            Instruction::Cma => {
                let a = self.regs.a();
                self.regs.set_a(!a);
            }
            Instruction::Stc => self.regs.set_flag(Flags::C, true),
            Instruction::Cmc => {
                let carry = self.regs.flag(Flags::C);
                self.regs.set_flag(Flags::C, !carry);
            }

            Instruction::Mov { dst, src } => {
                let v = self.read_reg(bus, src);
                self.write_reg(bus, dst, v);
            }
            Instruction::Hlt => {
                log::debug!("HLT at {:04X}", self.regs.pc().wrapping_sub(1));
                self.halted = true;
            }

            Instruction::Alu(op, r) => {
                let v = self.read_reg(bus, r);
                self.alu(op, v);
            }
            Instruction::AluImm(op) => {
                let v = self.fetch_byte(bus);
                self.alu(op, v);
            }

            // Stack.
            Instruction::Push(rp) => {
                let v = self.stack_pair(rp);
                self.push(bus, v);
            }
            Instruction::Pop(rp) => {
                let v = self.pop(bus);
                self.set_stack_pair(rp, v);
            }
            Instruction::Xthl => {
                // Exchange HL with the word at the top of the stack.
                let sp = self.regs.sp();
                let lo = bus.read_memory(sp);
                let hi = bus.read_memory(sp.wrapping_add(1));
                bus.write_memory(sp, self.regs.l());
                bus.write_memory(sp.wrapping_add(1), self.regs.h());
                self.regs.set_hl(u16::from_le_bytes([lo, hi]));
            }
            Instruction::Xchg => {
                let de = self.regs.de();
                let hl = self.regs.hl();
                self.regs.set_de(hl);
                self.regs.set_hl(de);
            }
            Instruction::Sphl => {
                let hl = self.regs.hl();
                self.regs.set_sp(hl);
            }

            // Control transfer.
            Instruction::Jmp => {
                let addr = self.fetch_word(bus);
                self.regs.set_pc(addr);
            }
            Instruction::JumpIf(cond) => {
                // The address is always fetched so PC skips it when not taken.
                let addr = self.fetch_word(bus);
                if self.condition(cond) {
                    self.regs.set_pc(addr);
                }
            }
            Instruction::Pchl => {
                let hl = self.regs.hl();
                self.regs.set_pc(hl);
            }
            Instruction::Call => {
                let addr = self.fetch_word(bus);
                self.call(bus, addr);
            }
            Instruction::CallIf(cond) => {
                let addr = self.fetch_word(bus);
                if self.condition(cond) {
                    self.call(bus, addr);
                }
            }
            Instruction::Ret => {
                let addr = self.pop(bus);
                self.regs.set_pc(addr);
            }
            Instruction::RetIf(cond) => {
                if self.condition(cond) {
                    let addr = self.pop(bus);
                    self.regs.set_pc(addr);
                }
            }
            Instruction::Rst(n) => {
                let vector = u16::from(n) * 8;
                self.call(bus, vector);
            }

            // IO and interrupt control.
            Instruction::Out => {
                let port = self.fetch_byte(bus);
                bus.write_port(port, self.regs.a());
            }
            Instruction::In => {
                let port = self.fetch_byte(bus);
                let v = bus.read_port(port);
                self.regs.set_a(v);
            }
            Instruction::Ei => {
                if !self.interrupts_enabled {
                    log::debug!("interrupts enabled");
                }
                self.interrupts_enabled = true;
            }
            Instruction::Di => {
                if self.interrupts_enabled {
                    log::debug!("interrupts disabled");
                }
                self.interrupts_enabled = false;
            }
        }
    }
}
