//! Shared test fixtures
//!
//! Hand-assembled programs and a helper that lays out their frames on a
//! state the way the interpreter would while running them.

#![allow(dead_code)]

use moonlet_runtime::{FrameRef, LuaClosure, Opcode, Proto, ProtoBuilder, State, Value};
use std::rc::Rc;

/// `function f(a) local *t; return a + 1, t.len end` at lines 5-8 of
/// `@demo.lua`
///
/// ```text
/// 0  [6]  GETLOCAL 0     a
/// 1  [6]  PUSHINT 1
/// 2  [6]  ADD
/// 3  [7]  GETGLOBAL t
/// 4  [7]  GETDOTTED len
/// 5  [8]  RETURN 1
/// ```
pub fn callee_proto() -> Proto {
    let mut b = ProtoBuilder::new("@demo.lua");
    b.defined_at(5).params(1);
    b.declare_local("a");
    b.emit_u(Opcode::GetLocal, 0, 6);
    b.emit_s(Opcode::PushInt, 1, 6);
    b.emit(Opcode::Add, 6);
    b.declare_local("*t");
    let t = b.string_constant("t");
    b.emit_u(Opcode::GetGlobal, t, 7);
    let len = b.string_constant("len");
    b.emit_u(Opcode::GetDotted, len, 7);
    b.emit_u(Opcode::Return, 1, 8);
    b.build()
}

/// Main chunk of `@demo.lua`: `local x = 10; f(x)`
///
/// ```text
/// 0  [1]  PUSHINT 10
/// 1  [2]  GETGLOBAL f
/// 2  [2]  GETLOCAL 0     x
/// 3  [2]  CALL 1 0
/// 4  [3]  END
/// ```
pub fn main_proto() -> Proto {
    let mut b = ProtoBuilder::new("@demo.lua");
    b.emit_s(Opcode::PushInt, 10, 1);
    b.declare_local("x");
    let f = b.string_constant("f");
    b.emit_u(Opcode::GetGlobal, f, 2);
    b.emit_u(Opcode::GetLocal, 0, 2);
    b.emit_ab(Opcode::Call, 1, 0, 2);
    b.emit(Opcode::End, 3);
    b.build()
}

/// pc of the CALL in [`main_proto`]
pub const MAIN_CALL_PC: usize = 3;

/// State suspended inside `f(x)`:
///
/// ```text
/// 0  main mark     (executing the CALL)
/// 1  x = 10
/// 2  f mark        (preamble)
/// 3  a = 10
/// ```
pub struct Demo {
    pub state: State,
    pub main: FrameRef,
    pub callee: FrameRef,
    pub main_fn: Rc<LuaClosure>,
    pub callee_fn: Rc<LuaClosure>,
}

impl Demo {
    pub fn new() -> Self {
        Self::with_state(State::new())
    }

    pub fn with_state(mut state: State) -> Self {
        let main_fn = Rc::new(LuaClosure::new(Rc::new(main_proto())));
        let callee_fn = Rc::new(LuaClosure::new(Rc::new(callee_proto())));
        state.set_global("f", Value::LuaFunction(Rc::clone(&callee_fn)));

        let main = state.push_lua_frame(Rc::clone(&main_fn));
        state.push(Value::Number(10.0));
        state
            .set_savedpc(main, MAIN_CALL_PC + 1)
            .expect("main is a Lua frame");
        let callee = state.push_lua_frame(Rc::clone(&callee_fn));
        state.push(Value::Number(10.0));

        Self {
            state,
            main,
            callee,
            main_fn,
            callee_fn,
        }
    }

    /// Suspend the callee while it executes instruction `savedpc - 1`,
    /// with nil placeholders for the values its earlier instructions left
    pub fn run_callee_to(&mut self, savedpc: usize) {
        self.state
            .set_savedpc(self.callee, savedpc)
            .expect("callee is a Lua frame");
        let live = match savedpc {
            0 | 1 => 1,
            2 => 2,
            3 => 3,
            4 => 2,
            _ => 3,
        };
        self.state.set_top(self.callee.base() + live);
    }
}

impl Default for Demo {
    fn default() -> Self {
        Self::new()
    }
}
