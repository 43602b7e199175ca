use bitflags::bitflags;

bitflags! {
    /// Status bits in the low half of AF.
    ///
    /// Layout (bit index in the byte, from MSB to LSB):
    /// - bit 7: S (sign)
    /// - bit 6: Z (zero)
    /// - bit 5: always 0
    /// - bit 4: AC (auxiliary carry)
    /// - bit 3: always 0
    /// - bit 2: P (parity, set when even)
    /// - bit 1: always 1
    /// - bit 0: C (carry / borrow)
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        const S = 0x80;
        const Z = 0x40;
        const AC = 0x10;
        const P = 0x04;
        const C = 0x01;
    }
}

impl Flags {
    /// Bit 1 of the flags byte reads as 1 on real hardware.
    pub const ALWAYS_ONE: u8 = 0x02;
    /// Bits 3 and 5 of the flags byte read as 0 on real hardware.
    pub const ALWAYS_ZERO: u8 = 0x28;

    /// Force the fixed bits of a raw flags byte to their hardware values.
    pub fn normalize(raw: u8) -> u8 {
        (raw & !Self::ALWAYS_ZERO) | Self::ALWAYS_ONE
    }
}

/// A 16-bit register pair with aliased 8-bit halves.
///
/// Stored as one `u16`; the halves are bit slices of it, so writing one half
/// can never disturb the other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterPair(u16);

impl RegisterPair {
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn set(&mut self, value: u16) {
        self.0 = value;
    }

    #[inline]
    pub fn high(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub fn low(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub fn set_high(&mut self, value: u8) {
        self.0 = u16::from_be_bytes([value, self.low()]);
    }

    #[inline]
    pub fn set_low(&mut self, value: u8) {
        self.0 = u16::from_be_bytes([self.high(), value]);
    }
}

/// Architectural registers of the 8080.
///
/// No accessor validates its input; callers are responsible for wrapping
/// arithmetic before storing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registers {
    af: RegisterPair,
    bc: RegisterPair,
    de: RegisterPair,
    hl: RegisterPair,
    sp: u16,
    pc: u16,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            af: RegisterPair::new(Flags::ALWAYS_ONE as u16),
            bc: RegisterPair::default(),
            de: RegisterPair::default(),
            hl: RegisterPair::default(),
            sp: 0,
            pc: 0,
        }
    }
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    // 16-bit pairs.

    #[inline]
    pub fn af(&self) -> u16 {
        self.af.get()
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        self.af.set(value);
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        self.bc.get()
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        self.bc.set(value);
    }

    #[inline]
    pub fn de(&self) -> u16 {
        self.de.get()
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        self.de.set(value);
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        self.hl.get()
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        self.hl.set(value);
    }

    #[inline]
    pub fn sp(&self) -> u16 {
        self.sp
    }

    #[inline]
    pub fn set_sp(&mut self, value: u16) {
        self.sp = value;
    }

    #[inline]
    pub fn pc(&self) -> u16 {
        self.pc
    }

    #[inline]
    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    // 8-bit halves.

    #[inline]
    pub fn a(&self) -> u8 {
        self.af.high()
    }

    #[inline]
    pub fn set_a(&mut self, value: u8) {
        self.af.set_high(value);
    }

    /// Raw flags byte, fixed bits included.
    #[inline]
    pub fn f(&self) -> u8 {
        self.af.low()
    }

    /// Store the raw flags byte verbatim.
    #[inline]
    pub fn set_f(&mut self, value: u8) {
        self.af.set_low(value);
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.bc.high()
    }

    #[inline]
    pub fn set_b(&mut self, value: u8) {
        self.bc.set_high(value);
    }

    #[inline]
    pub fn c(&self) -> u8 {
        self.bc.low()
    }

    #[inline]
    pub fn set_c(&mut self, value: u8) {
        self.bc.set_low(value);
    }

    #[inline]
    pub fn d(&self) -> u8 {
        self.de.high()
    }

    #[inline]
    pub fn set_d(&mut self, value: u8) {
        self.de.set_high(value);
    }

    #[inline]
    pub fn e(&self) -> u8 {
        self.de.low()
    }

    #[inline]
    pub fn set_e(&mut self, value: u8) {
        self.de.set_low(value);
    }

    #[inline]
    pub fn h(&self) -> u8 {
        self.hl.high()
    }

    #[inline]
    pub fn set_h(&mut self, value: u8) {
        self.hl.set_high(value);
    }

    #[inline]
    pub fn l(&self) -> u8 {
        self.hl.low()
    }

    #[inline]
    pub fn set_l(&mut self, value: u8) {
        self.hl.set_low(value);
    }

    // Flags.

    /// Status bits of the flags byte; the fixed bits are not represented.
    #[inline]
    pub fn flags(&self) -> Flags {
        Flags::from_bits_truncate(self.f())
    }

    #[inline]
    pub fn flag(&self, flag: Flags) -> bool {
        self.flags().contains(flag)
    }

    /// Set or clear status bits, leaving every other bit of F untouched.
    #[inline]
    pub fn set_flag(&mut self, flag: Flags, value: bool) {
        let f = self.f();
        let mask = flag.bits();
        self.set_f(if value { f | mask } else { f & !mask });
    }

    /// Update Z, S and P from an 8-bit result.
    #[inline]
    pub fn set_szp(&mut self, value: u8) {
        self.set_flag(Flags::Z, value == 0);
        self.set_flag(Flags::S, value & 0x80 != 0);
        self.set_flag(Flags::P, value.count_ones() % 2 == 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_state() {
        let regs = Registers::new();
        assert_eq!(regs.f(), 0x02);
        assert_eq!(regs.flags(), Flags::empty());
        assert_eq!((regs.a(), regs.bc(), regs.de(), regs.hl()), (0, 0, 0, 0));
        assert_eq!((regs.sp(), regs.pc()), (0, 0));
    }

    #[test]
    fn halves_alias_the_pair() {
        let mut regs = Registers::new();
        regs.set_bc(0x1234);
        assert_eq!((regs.b(), regs.c()), (0x12, 0x34));

        regs.set_b(0xab);
        assert_eq!(regs.bc(), 0xab34);
        regs.set_c(0xcd);
        assert_eq!(regs.bc(), 0xabcd);

        regs.set_h(0x80);
        regs.set_l(0x01);
        assert_eq!(regs.hl(), 0x8001);

        regs.set_de(0xffff);
        regs.set_e(0x00);
        assert_eq!((regs.d(), regs.de()), (0xff, 0xff00));
    }

    #[test]
    fn every_half_write_preserves_its_sibling() {
        for value in 0..=u8::MAX {
            let mut pair = RegisterPair::new(0x5aa5);
            pair.set_high(value);
            assert_eq!(pair.low(), 0xa5);
            assert_eq!(pair.get(), (u16::from(value) << 8) | 0xa5);

            let mut pair = RegisterPair::new(0x5aa5);
            pair.set_low(value);
            assert_eq!(pair.high(), 0x5a);
            assert_eq!(pair.get(), 0x5a00 | u16::from(value));
        }
    }

    #[test]
    fn accumulator_and_flags_share_af() {
        let mut regs = Registers::new();
        regs.set_a(0x42);
        assert_eq!(regs.af(), 0x4202);
        regs.set_af(0x00d7);
        assert_eq!(regs.a(), 0);
        assert_eq!(regs.flags(), Flags::all());
    }

    #[test]
    fn set_flag_leaves_fixed_bits_alone() {
        let mut regs = Registers::new();
        regs.set_f(0xff);
        regs.set_flag(Flags::Z | Flags::C, false);
        assert_eq!(regs.f(), 0xbe);
        regs.set_f(0x00);
        regs.set_flag(Flags::AC, true);
        assert_eq!(regs.f(), 0x10);
    }

    #[test]
    fn szp_from_result() {
        let mut regs = Registers::new();
        regs.set_szp(0x00);
        assert!(regs.flag(Flags::Z) && regs.flag(Flags::P) && !regs.flag(Flags::S));
        regs.set_szp(0x80);
        assert!(!regs.flag(Flags::Z) && !regs.flag(Flags::P) && regs.flag(Flags::S));
        regs.set_szp(0x03);
        assert!(regs.flag(Flags::P));
    }

    #[test]
    fn normalize_fixes_reserved_bits() {
        assert_eq!(Flags::normalize(0x00), 0x02);
        assert_eq!(Flags::normalize(0xff), 0xd7);
    }
}
