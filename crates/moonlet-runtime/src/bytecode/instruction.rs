//! 32-bit packed instructions
//!
//! ```text
//!  31                      6 5     0
//! +-------------------------+-------+
//! |            U            |  op   |   U / S mode
//! +-------------+-----------+-------+
//! |      A      |     B     |  op   |   AB mode
//! +-------------+-----------+-------+
//!   17 bits       9 bits     6 bits
//! ```
//!
//! Signed arguments are stored excess-`MAXARG_S`.

use super::opcode::Opcode;
use std::fmt;

pub const SIZE_OP: u32 = 6;
pub const SIZE_B: u32 = 9;
pub const SIZE_U: u32 = 32 - SIZE_OP;
pub const SIZE_A: u32 = 32 - (SIZE_OP + SIZE_B);

const POS_U: u32 = SIZE_OP;
const POS_B: u32 = SIZE_OP;
const POS_A: u32 = SIZE_OP + SIZE_B;

pub const MAXARG_U: u32 = (1 << SIZE_U) - 1;
pub const MAXARG_S: i32 = (MAXARG_U >> 1) as i32;
pub const MAXARG_A: u32 = (1 << SIZE_A) - 1;
pub const MAXARG_B: u32 = (1 << SIZE_B) - 1;

/// `Call` result count meaning "all results"
pub const MULT_RET: u32 = 255;

const MASK_OP: u32 = (1 << SIZE_OP) - 1;

/// One encoded instruction
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction(u32);

impl Instruction {
    /// Instruction with no argument
    pub fn new(op: Opcode) -> Self {
        Self(op as u32)
    }

    /// Instruction with an unsigned argument
    pub fn with_u(op: Opcode, u: u32) -> Self {
        debug_assert!(u <= MAXARG_U, "argument U out of range");
        Self((u << POS_U) | op as u32)
    }

    /// Instruction with a signed argument
    pub fn with_s(op: Opcode, s: i32) -> Self {
        debug_assert!(-MAXARG_S <= s && s <= MAXARG_S, "argument S out of range");
        Self::with_u(op, (s + MAXARG_S) as u32)
    }

    /// Instruction with A and B arguments
    pub fn with_ab(op: Opcode, a: u32, b: u32) -> Self {
        debug_assert!(a <= MAXARG_A, "argument A out of range");
        debug_assert!(b <= MAXARG_B, "argument B out of range");
        Self((a << POS_A) | (b << POS_B) | op as u32)
    }

    /// Wrap a raw word, e.g. from a loader
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    /// Decode the opcode; `None` for bytes outside the opcode set
    pub fn opcode(self) -> Option<Opcode> {
        Opcode::try_from((self.0 & MASK_OP) as u8).ok()
    }

    pub fn arg_u(self) -> u32 {
        self.0 >> POS_U
    }

    pub fn arg_s(self) -> i32 {
        self.arg_u() as i32 - MAXARG_S
    }

    pub fn arg_a(self) -> u32 {
        self.0 >> POS_A
    }

    pub fn arg_b(self) -> u32 {
        (self.0 >> POS_B) & MAXARG_B
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use super::opcode::ArgMode;
        match self.opcode() {
            None => write!(f, "<invalid {:#010x}>", self.0),
            Some(op) => match op.properties().mode {
                ArgMode::None => write!(f, "{}", op.name()),
                ArgMode::U => write!(f, "{} {}", op.name(), self.arg_u()),
                ArgMode::S => write!(f, "{} {}", op.name(), self.arg_s()),
                ArgMode::AB => write!(f, "{} {} {}", op.name(), self.arg_a(), self.arg_b()),
            },
        }
    }
}
