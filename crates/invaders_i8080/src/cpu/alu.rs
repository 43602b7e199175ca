use super::Cpu8080;
use crate::decode::AluOp;
use crate::regs::Flags;

impl Cpu8080 {
    /// Run one of the eight accumulator operations against `value`.
    pub(super) fn alu(&mut self, op: AluOp, value: u8) {
        let carry = self.regs.flag(Flags::C);
        let result = match op {
            AluOp::Add => self.add(value, false),
            AluOp::Adc => self.add(value, carry),
            AluOp::Sub => self.sub(value, false),
            AluOp::Sbb => self.sub(value, carry),
            AluOp::Ana => self.logic(self.regs.a() & value),
            AluOp::Xra => self.logic(self.regs.a() ^ value),
            AluOp::Ora => self.logic(self.regs.a() | value),
            AluOp::Cmp => {
                // Flags only; A keeps its value.
                self.sub(value, false);
                return;
            }
        };
        self.regs.set_a(result);
    }

    /// 8-bit addition into the flags; returns the sum.
    fn add(&mut self, value: u8, carry: bool) -> u8 {
        let a = self.regs.a();
        let carry = u8::from(carry);
        let full = u16::from(a) + u16::from(value) + u16::from(carry);
        let result = full as u8;

        self.regs
            .set_flag(Flags::AC, (a & 0x0f) + (value & 0x0f) + carry > 0x0f);
        self.regs.set_flag(Flags::C, full > 0xff);
        self.regs.set_szp(result);
        result
    }

    /// 8-bit subtraction, computed as `A + !value + !borrow`.
    ///
    /// AC is the nibble carry of that addition and C is the inverted carry
    /// out of bit 7, so C reads as "a borrow happened".
    fn sub(&mut self, value: u8, borrow: bool) -> u8 {
        let a = self.regs.a();
        let operand = !value;
        let carry = u8::from(!borrow);
        let full = u16::from(a) + u16::from(operand) + u16::from(carry);
        let result = full as u8;

        self.regs
            .set_flag(Flags::AC, (a & 0x0f) + (operand & 0x0f) + carry > 0x0f);
        self.regs.set_flag(Flags::C, full <= 0xff);
        self.regs.set_szp(result);
        result
    }

    fn logic(&mut self, result: u8) -> u8 {
        self.regs.set_flag(Flags::AC | Flags::C, false);
        self.regs.set_szp(result);
        result
    }

    /// Flags for INR; carry is not affected.
    pub(super) fn inr_flags(&mut self, result: u8) {
        self.regs.set_flag(Flags::AC, result & 0x0f == 0x00);
        self.regs.set_szp(result);
    }

    /// Flags for DCR; AC is set when the low nibble borrowed.
    pub(super) fn dcr_flags(&mut self, result: u8) {
        self.regs.set_flag(Flags::AC, result & 0x0f == 0x0f);
        self.regs.set_szp(result);
    }

    /// HL += value, only carry is affected.
    pub(super) fn dad(&mut self, value: u16) {
        let (result, carry) = self.regs.hl().overflowing_add(value);
        self.regs.set_flag(Flags::C, carry);
        self.regs.set_hl(result);
    }

    pub(super) fn daa(&mut self) {
        let mut a = self.regs.a();

        if a & 0x0f > 9 || self.regs.flag(Flags::AC) {
            self.regs.set_flag(Flags::AC, a & 0x0f > 9);
            a = a.wrapping_add(0x06);
        }
        if a >> 4 > 9 || self.regs.flag(Flags::C) {
            self.regs.set_flag(Flags::C, a >> 4 > 9);
            a = a.wrapping_add(0x60);
        }

        self.regs.set_a(a);
        self.regs.set_szp(a);
    }

    pub(super) fn rlc(&mut self) {
        let a = self.regs.a();
        self.regs.set_flag(Flags::C, a & 0x80 != 0);
        self.regs.set_a(a.rotate_left(1));
    }

    pub(super) fn rrc(&mut self) {
        let a = self.regs.a();
        self.regs.set_flag(Flags::C, a & 0x01 != 0);
        self.regs.set_a(a.rotate_right(1));
    }

    pub(super) fn ral(&mut self) {
        let a = self.regs.a();
        let carry = u8::from(self.regs.flag(Flags::C));
        self.regs.set_flag(Flags::C, a & 0x80 != 0);
        self.regs.set_a((a << 1) | carry);
    }

    pub(super) fn rar(&mut self) {
        let a = self.regs.a();
        let carry = if self.regs.flag(Flags::C) { 0x80 } else { 0 };
        self.regs.set_flag(Flags::C, a & 0x01 != 0);
        self.regs.set_a((a >> 1) | carry);
    }
}
