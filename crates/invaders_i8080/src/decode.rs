//! Opcode decoding.
//!
//! Every 8080 opcode splits into the fields
//!
//! ```text
//! |x x|y y y|z z z|
//! |   |p p|q|     |
//! ```
//!
//! `x` picks the instruction group, `y` and `z` pick registers, conditions
//! or ALU operations, and `p`/`q` pick register pairs. [`Instruction::decode`]
//! turns the fields into a tagged value; all 256 byte values decode to a
//! defined instruction.

/// Bitfields of one opcode byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opcode {
    pub x: u8,
    pub y: u8,
    pub z: u8,
    pub p: u8,
    pub q: u8,
}

impl Opcode {
    pub const fn new(opcode: u8) -> Self {
        let y = (opcode >> 3) & 7;
        Self {
            x: (opcode >> 6) & 3,
            y,
            z: opcode & 7,
            p: y >> 1,
            q: y & 1,
        }
    }

    /// Reassemble the opcode byte from `x`, `y` and `z`.
    pub const fn byte(self) -> u8 {
        (self.x << 6) | (self.y << 3) | self.z
    }
}

/// 8-bit operand selected by a 3-bit register index.
///
/// `M` is the memory byte addressed by HL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reg8 {
    B,
    C,
    D,
    E,
    H,
    L,
    M,
    A,
}

impl Reg8 {
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => Reg8::B,
            1 => Reg8::C,
            2 => Reg8::D,
            3 => Reg8::E,
            4 => Reg8::H,
            5 => Reg8::L,
            6 => Reg8::M,
            7 => Reg8::A,
            _ => panic!("Invalid register index {index}"),
        }
    }
}

/// Register pair table used by LXI, DAD, INX, DCX, STAX and LDAX.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegPair {
    BC,
    DE,
    HL,
    SP,
}

impl RegPair {
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => RegPair::BC,
            1 => RegPair::DE,
            2 => RegPair::HL,
            3 => RegPair::SP,
            _ => panic!("Invalid register pair index {index}"),
        }
    }
}

/// Register pair table used by PUSH and POP, where slot 3 is PSW (A + flags).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackPair {
    BC,
    DE,
    HL,
    PSW,
}

impl StackPair {
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => StackPair::BC,
            1 => StackPair::DE,
            2 => StackPair::HL,
            3 => StackPair::PSW,
            _ => panic!("Invalid stack pair index {index}"),
        }
    }
}

/// Branch predicate of conditional jumps, calls and returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    NotZero,
    Zero,
    NotCarry,
    Carry,
    ParityOdd,
    ParityEven,
    Plus,
    Minus,
}

impl Condition {
    /// Out-of-range indices clamp to `Minus`.
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => Condition::NotZero,
            1 => Condition::Zero,
            2 => Condition::NotCarry,
            3 => Condition::Carry,
            4 => Condition::ParityOdd,
            5 => Condition::ParityEven,
            6 => Condition::Plus,
            _ => Condition::Minus,
        }
    }
}

/// Accumulator operation of groups x=2 and x=3/z=6.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbb,
    Ana,
    Xra,
    Ora,
    Cmp,
}

impl AluOp {
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbb,
            4 => AluOp::Ana,
            5 => AluOp::Xra,
            6 => AluOp::Ora,
            7 => AluOp::Cmp,
            _ => panic!("Invalid ALU operation index {index}"),
        }
    }
}

/// A decoded 8080 instruction.
///
/// Immediate operands are not part of the value; they are fetched from the
/// instruction stream while executing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    Nop,
    Lxi(RegPair),
    Dad(RegPair),
    Stax(RegPair),
    Ldax(RegPair),
    Shld,
    Lhld,
    Sta,
    Lda,
    Inx(RegPair),
    Dcx(RegPair),
    Inr(Reg8),
    Dcr(Reg8),
    Mvi(Reg8),
    Rlc,
    Rrc,
    Ral,
    Rar,
    Daa,
    Cma,
    Stc,
    Cmc,
    Mov { dst: Reg8, src: Reg8 },
    Hlt,
    Alu(AluOp, Reg8),
    RetIf(Condition),
    Pop(StackPair),
    Ret,
    Pchl,
    Sphl,
    JumpIf(Condition),
    Jmp,
    Out,
    In,
    Xthl,
    Xchg,
    Di,
    Ei,
    CallIf(Condition),
    Push(StackPair),
    Call,
    AluImm(AluOp),
    Rst(u8),
}

impl Instruction {
    pub fn decode(opcode: u8) -> Self {
        let Opcode { x, y, z, p, q } = Opcode::new(opcode);
        match (x, z) {
            // 0x08, 0x10, ... 0x38 are undocumented NOP aliases.
            (0, 0) => Instruction::Nop,
            (0, 1) if q == 0 => Instruction::Lxi(RegPair::from_index(p)),
            (0, 1) => Instruction::Dad(RegPair::from_index(p)),
            (0, 2) => match (p, q) {
                (0 | 1, 0) => Instruction::Stax(RegPair::from_index(p)),
                (0 | 1, _) => Instruction::Ldax(RegPair::from_index(p)),
                (2, 0) => Instruction::Shld,
                (2, _) => Instruction::Lhld,
                (_, 0) => Instruction::Sta,
                (_, _) => Instruction::Lda,
            },
            (0, 3) if q == 0 => Instruction::Inx(RegPair::from_index(p)),
            (0, 3) => Instruction::Dcx(RegPair::from_index(p)),
            (0, 4) => Instruction::Inr(Reg8::from_index(y)),
            (0, 5) => Instruction::Dcr(Reg8::from_index(y)),
            (0, 6) => Instruction::Mvi(Reg8::from_index(y)),
            (0, _) => match y {
                0 => Instruction::Rlc,
                1 => Instruction::Rrc,
                2 => Instruction::Ral,
                3 => Instruction::Rar,
                4 => Instruction::Daa,
                5 => Instruction::Cma,
                6 => Instruction::Stc,
                _ => Instruction::Cmc,
            },

            (1, 6) if y == 6 => Instruction::Hlt,
            (1, _) => Instruction::Mov {
                dst: Reg8::from_index(y),
                src: Reg8::from_index(z),
            },

            (2, _) => Instruction::Alu(AluOp::from_index(y), Reg8::from_index(z)),

            (_, 0) => Instruction::RetIf(Condition::from_index(y)),
            (_, 1) => match (q, p) {
                (0, _) => Instruction::Pop(StackPair::from_index(p)),
                // 0xD9 is an undocumented RET alias.
                (_, 0 | 1) => Instruction::Ret,
                (_, 2) => Instruction::Pchl,
                (_, _) => Instruction::Sphl,
            },
            (_, 2) => Instruction::JumpIf(Condition::from_index(y)),
            (_, 3) => match (p, q) {
                // 0xCB is an undocumented JMP alias.
                (0, _) => Instruction::Jmp,
                (1, 0) => Instruction::Out,
                (1, _) => Instruction::In,
                (2, 0) => Instruction::Xthl,
                (2, _) => Instruction::Xchg,
                (_, 0) => Instruction::Di,
                (_, _) => Instruction::Ei,
            },
            (_, 4) => Instruction::CallIf(Condition::from_index(y)),
            (_, 5) if q == 0 => Instruction::Push(StackPair::from_index(p)),
            // 0xDD, 0xED and 0xFD are undocumented CALL aliases.
            (_, 5) => Instruction::Call,
            (_, 6) => Instruction::AluImm(AluOp::from_index(y)),
            (_, _) => Instruction::Rst(y),
        }
    }
}
