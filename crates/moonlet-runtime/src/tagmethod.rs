//! Tag methods
//!
//! Every value has a tag: one per basic type, plus tags created at run time
//! with [`TagMethodTable::new_tag`]. Each tag has one method slot per
//! [`TmEvent`].

use crate::value::Value;

/// Events a tag method can be registered for, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TmEvent {
    GetTable,
    SetTable,
    Index,
    GetGlobal,
    SetGlobal,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Unm,
    Lt,
    Concat,
    Gc,
    Function,
}

pub const NUM_EVENTS: usize = 15;

impl TmEvent {
    pub const ALL: [TmEvent; NUM_EVENTS] = [
        TmEvent::GetTable,
        TmEvent::SetTable,
        TmEvent::Index,
        TmEvent::GetGlobal,
        TmEvent::SetGlobal,
        TmEvent::Add,
        TmEvent::Sub,
        TmEvent::Mul,
        TmEvent::Div,
        TmEvent::Pow,
        TmEvent::Unm,
        TmEvent::Lt,
        TmEvent::Concat,
        TmEvent::Gc,
        TmEvent::Function,
    ];

    /// Event name as reported by name resolution
    pub fn name(self) -> &'static str {
        match self {
            TmEvent::GetTable => "gettable",
            TmEvent::SetTable => "settable",
            TmEvent::Index => "index",
            TmEvent::GetGlobal => "getglobal",
            TmEvent::SetGlobal => "setglobal",
            TmEvent::Add => "add",
            TmEvent::Sub => "sub",
            TmEvent::Mul => "mul",
            TmEvent::Div => "div",
            TmEvent::Pow => "pow",
            TmEvent::Unm => "unm",
            TmEvent::Lt => "lt",
            TmEvent::Concat => "concat",
            TmEvent::Gc => "gc",
            TmEvent::Function => "function",
        }
    }
}

// ── Basic tags ──────────────────────────────────────────────────────

pub const TAG_NUMBER: usize = 0;
pub const TAG_STRING: usize = 1;
pub const TAG_TABLE: usize = 2;
pub const TAG_LUA_FUNCTION: usize = 3;
pub const TAG_NATIVE_FUNCTION: usize = 4;
pub const TAG_NIL: usize = 5;
pub const NUM_BASIC_TAGS: usize = 6;

/// Basic tag of a value; marks carry their function's tag
pub fn basic_tag(value: &Value) -> usize {
    match value {
        Value::Nil => TAG_NIL,
        Value::Number(_) => TAG_NUMBER,
        Value::String(_) => TAG_STRING,
        Value::Table(_) => TAG_TABLE,
        Value::LuaFunction(_) | Value::LuaMark(_) => TAG_LUA_FUNCTION,
        Value::NativeFunction(_) | Value::NativeMark(_) => TAG_NATIVE_FUNCTION,
    }
}

/// Method slots for every tag
#[derive(Debug, Clone)]
pub struct TagMethodTable {
    rows: Vec<[Value; NUM_EVENTS]>,
}

impl TagMethodTable {
    /// Table with the basic tags and no methods set
    pub fn new() -> Self {
        Self {
            rows: (0..NUM_BASIC_TAGS).map(|_| empty_row()).collect(),
        }
    }

    /// Create a user tag; returns its number
    pub fn new_tag(&mut self) -> usize {
        self.rows.push(empty_row());
        self.rows.len() - 1
    }

    /// Highest valid tag
    pub fn last_tag(&self) -> usize {
        self.rows.len() - 1
    }

    /// Method for `event` on `tag`; nil when unset or the tag is unknown
    pub fn get(&self, tag: usize, event: TmEvent) -> Value {
        self.rows
            .get(tag)
            .map(|row| row[event as usize].clone())
            .unwrap_or(Value::Nil)
    }

    /// Install `method` for `event` on `tag`, returning the previous one.
    /// `None` if the tag does not exist.
    pub fn set(&mut self, tag: usize, event: TmEvent, method: Value) -> Option<Value> {
        let row = self.rows.get_mut(tag)?;
        Some(std::mem::replace(&mut row[event as usize], method))
    }

    /// First `(event, tag)` whose method is raw-equal to `value`, searching
    /// events in table order and, within an event, tags in ascending order
    pub fn find(&self, value: &Value) -> Option<(TmEvent, usize)> {
        TmEvent::ALL.iter().find_map(|&event| {
            self.rows
                .iter()
                .position(|row| row[event as usize].raw_equal(value))
                .map(|tag| (event, tag))
        })
    }
}

impl Default for TagMethodTable {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_row() -> [Value; NUM_EVENTS] {
    std::array::from_fn(|_| Value::Nil)
}
