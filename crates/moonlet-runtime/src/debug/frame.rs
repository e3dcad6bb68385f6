//! Frame introspection: source, current line, locals, upvalues

use super::source::chunk_id;
use super::{DebugRecord, FrameRef, FuncKind};
use crate::bytecode::lineinfo::get_line;
use crate::bytecode::Proto;
use crate::state::State;
use crate::value::Value;
use std::rc::Rc;

/// Where a function comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub source: Rc<str>,
    pub short_src: String,
    /// `None` for host functions
    pub line_defined: Option<u32>,
    pub what: FuncKind,
}

impl SourceInfo {
    pub(crate) fn fill(self, ar: &mut DebugRecord) {
        ar.source = Some(self.source.to_string());
        ar.short_src = Some(self.short_src);
        ar.line_defined = self.line_defined;
        ar.what = Some(self.what);
    }
}

/// Source facts for a function or mark; `None` for other values
pub fn source_info(func: &Value, short_src_len: usize) -> Option<SourceInfo> {
    let (source, line_defined, what) = match func {
        Value::LuaFunction(f) => lua_source(&f.proto),
        Value::LuaMark(ci) => lua_source(ci.proto()),
        Value::NativeFunction(_) | Value::NativeMark(_) => (Rc::from("(C)"), None, FuncKind::C),
        Value::Nil | Value::Number(_) | Value::String(_) | Value::Table(_) => return None,
    };
    Some(SourceInfo {
        short_src: chunk_id(&source, short_src_len),
        source,
        line_defined,
        what,
    })
}

fn lua_source(proto: &Proto) -> (Rc<str>, Option<u32>, FuncKind) {
    let what = if proto.is_main() {
        FuncKind::Main
    } else {
        FuncKind::Lua
    };
    (Rc::clone(&proto.source), Some(proto.line_defined), what)
}

/// Line being executed by an active Lua call; `None` for anything else or
/// when the function carries no line table
pub fn current_line(func: &Value) -> Option<u32> {
    match func {
        Value::LuaMark(ci) => get_line(ci.proto().lineinfo.as_ref(), ci.current_pc(), 1, None),
        _ => None,
    }
}

/// Upvalue count of a function or mark; 0 otherwise
pub fn upvalue_count(func: &Value) -> usize {
    func.upvalue_count()
}

impl State {
    /// Name of local `n` (1-based) of the record's frame at its current pc
    fn local_name(&self, ar: &DebugRecord, n: usize) -> Option<(FrameRef, Rc<str>)> {
        let frame = ar.frame?;
        let ci = self.call_info(frame)?;
        let name = ci.proto().local_name(n, ci.current_pc())?;
        Some((frame, Rc::clone(name)))
    }

    /// Push the value of local `n` of the record's frame and return its
    /// name. Nothing is pushed when the local does not exist.
    pub fn get_local(&mut self, ar: &DebugRecord, n: usize) -> Option<Rc<str>> {
        let (frame, name) = self.local_name(ar, n)?;
        let value = self
            .stack
            .get(frame.base() + (n - 1))
            .cloned()
            .unwrap_or(Value::Nil);
        self.push(value);
        Some(name)
    }

    /// Pop the top value and store it in local `n` of the record's frame,
    /// returning the local's name.
    ///
    /// The value is popped even when the assignment is refused: the local
    /// does not exist, or its name starts with the private prefix.
    pub fn set_local(&mut self, ar: &DebugRecord, n: usize) -> Option<Rc<str>> {
        let value = self.pop();
        let (frame, name) = self.local_name(ar, n)?;
        if name.starts_with(self.settings().private_prefix) {
            return None;
        }
        let slot = self.stack.get_mut(frame.base() + (n - 1))?;
        *slot = value?;
        Some(name)
    }
}
