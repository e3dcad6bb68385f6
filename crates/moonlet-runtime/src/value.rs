//! Runtime values
//!
//! Besides the ordinary value kinds, the stack holds activation marks: a
//! slot tagged [`Value::LuaMark`] or [`Value::NativeMark`] is a running
//! call, and its position in the stack is the frame's identity.

use crate::bytecode::Proto;
use crate::state::State;
use crate::table::TableRef;
use std::fmt;
use std::rc::Rc;

/// Host function: runs against the state and returns how many results it
/// left on the stack
pub type NativeFn = fn(&mut State) -> usize;

/// Closure over a compiled prototype
#[derive(Debug)]
pub struct LuaClosure {
    pub proto: Rc<Proto>,
    pub upvalues: Vec<Value>,
}

impl LuaClosure {
    pub fn new(proto: Rc<Proto>) -> Self {
        Self {
            proto,
            upvalues: Vec::new(),
        }
    }

    pub fn with_upvalues(proto: Rc<Proto>, upvalues: Vec<Value>) -> Self {
        Self { proto, upvalues }
    }
}

/// Closure over a host function
pub struct NativeClosure {
    pub name: Rc<str>,
    pub func: NativeFn,
    pub upvalues: Vec<Value>,
}

impl NativeClosure {
    pub fn new(name: &str, func: NativeFn) -> Self {
        Self {
            name: Rc::from(name),
            func,
            upvalues: Vec::new(),
        }
    }

    pub fn call(&self, state: &mut State) -> usize {
        (self.func)(state)
    }
}

impl fmt::Debug for NativeClosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeClosure")
            .field("name", &self.name)
            .field("upvalues", &self.upvalues.len())
            .finish()
    }
}

/// Per-activation bookkeeping carried by a Lua mark
#[derive(Debug, Clone)]
pub struct CallInfo {
    pub func: Rc<LuaClosure>,
    /// One past the last executed instruction; 0 while in the preamble
    pub savedpc: usize,
    /// Line-tracing cursor: last reported line
    pub line: u32,
    /// Line-tracing cursor: line table entry of `line`
    pub refi: usize,
    /// Line-tracing cursor: pc at the last line event
    pub lastpc: usize,
}

impl CallInfo {
    pub fn new(func: Rc<LuaClosure>) -> Self {
        Self {
            func,
            savedpc: 0,
            line: 1,
            refi: 0,
            lastpc: 0,
        }
    }

    pub fn proto(&self) -> &Proto {
        &self.func.proto
    }

    /// pc of the instruction being executed; `None` in the preamble
    pub fn current_pc(&self) -> Option<usize> {
        self.savedpc.checked_sub(1)
    }
}

/// Runtime value type
#[derive(Clone)]
pub enum Value {
    Nil,
    /// Numeric value (IEEE 754 double-precision)
    Number(f64),
    /// String value (shared, immutable)
    String(Rc<str>),
    Table(TableRef),
    LuaFunction(Rc<LuaClosure>),
    NativeFunction(Rc<NativeClosure>),
    /// Active call of a Lua function
    LuaMark(CallInfo),
    /// Active call of a host function
    NativeMark(Rc<NativeClosure>),
}

impl Value {
    pub fn string(s: &str) -> Self {
        Value::String(Rc::from(s))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Whether this slot is an activation mark
    pub fn is_mark(&self) -> bool {
        matches!(self, Value::LuaMark(_) | Value::NativeMark(_))
    }

    /// Functions and marks
    pub fn is_function(&self) -> bool {
        match self {
            Value::LuaFunction(_)
            | Value::NativeFunction(_)
            | Value::LuaMark(_)
            | Value::NativeMark(_) => true,
            Value::Nil | Value::Number(_) | Value::String(_) | Value::Table(_) => false,
        }
    }

    /// Type name as reported to programs; a mark is a function
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Table(_) => "table",
            Value::LuaFunction(_)
            | Value::NativeFunction(_)
            | Value::LuaMark(_)
            | Value::NativeMark(_) => "function",
        }
    }

    /// A mark replaced by the function it activates
    pub fn normalized(&self) -> Value {
        match self {
            Value::LuaMark(ci) => Value::LuaFunction(Rc::clone(&ci.func)),
            Value::NativeMark(f) => Value::NativeFunction(Rc::clone(f)),
            other => other.clone(),
        }
    }

    /// Primitive equality: numbers by value, strings by content, everything
    /// else by identity. Marks compare as their functions.
    pub fn raw_equal(&self, other: &Value) -> bool {
        match (&self.normalized(), &other.normalized()) {
            (Value::Nil, Value::Nil) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Table(a), Value::Table(b)) => Rc::ptr_eq(a, b),
            (Value::LuaFunction(a), Value::LuaFunction(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFunction(a), Value::NativeFunction(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Upvalue count of a function or mark; 0 for anything else
    pub fn upvalue_count(&self) -> usize {
        match self {
            Value::LuaFunction(f) => f.upvalues.len(),
            Value::LuaMark(ci) => ci.func.upvalues.len(),
            Value::NativeFunction(f) | Value::NativeMark(f) => f.upvalues.len(),
            Value::Nil | Value::Number(_) | Value::String(_) | Value::Table(_) => 0,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", &**s),
            Value::Table(t) => write!(f, "table: {:p}", Rc::as_ptr(t)),
            Value::LuaFunction(c) => write!(f, "function: {}", c.proto.source),
            Value::NativeFunction(c) => write!(f, "function: {}", c.name),
            Value::LuaMark(ci) => write!(
                f,
                "<call {} pc={}>",
                ci.func.proto.source, ci.savedpc
            ),
            Value::NativeMark(c) => write!(f, "<call {}>", c.name),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}
