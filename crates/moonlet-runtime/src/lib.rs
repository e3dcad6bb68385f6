//! Moonlet Runtime - Debug and introspection core
//!
//! This library provides the introspection layer of the Moonlet bytecode VM:
//! - Line tables and pc to line decoding
//! - Call-frame walking over activation marks
//! - Symbolic execution for naming stack values
//! - The `get_info` / `get_local` / `set_local` API and line/call hooks

/// Moonlet runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod bytecode;
pub mod debug;
pub mod error;
pub mod state;
pub mod table;
pub mod tagmethod;
pub mod value;

// Re-export commonly used types
pub use bytecode::{Instruction, Opcode, Proto, ProtoBuilder};
pub use debug::{DebugRecord, FrameRef, FuncKind, Hook, HookEvent, NameKind};
pub use error::{DebugError, RuntimeError};
pub use state::{DebugSettings, State};
pub use table::{Table, TableRef};
pub use tagmethod::{TagMethodTable, TmEvent};
pub use value::{CallInfo, LuaClosure, NativeClosure, NativeFn, Value};
