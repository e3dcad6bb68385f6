//! Bytecode model
//!
//! 32-bit packed instructions, the opcode property table, compact line
//! tables and function prototypes. The debug core only reads these; the
//! builder exists for hosts and tests that assemble code by hand.

mod builder;
pub mod disasm;
mod instruction;
pub mod lineinfo;
mod opcode;
mod proto;

pub use builder::ProtoBuilder;
pub use instruction::{Instruction, MAXARG_A, MAXARG_B, MAXARG_S, MAXARG_U, MULT_RET};
pub use lineinfo::{LineInfo, LineInfoBuilder, LINE_INFO_END};
pub use opcode::{ArgMode, OpProperties, Opcode, NUM_OPCODES};
pub use proto::{LocVar, Proto};
