//! Interpreter state
//!
//! One `State` per interpreter instance: the execution stack, the global
//! table, tag methods, the two hook slots and the debug settings. Nothing
//! here is process-global, so independent states can coexist.

use crate::debug::{FrameRef, Hook};
use crate::error::DebugError;
use crate::table::{Table, TableRef};
use crate::tagmethod::TagMethodTable;
use crate::value::{CallInfo, LuaClosure, NativeClosure, Value};
use moonlet_config::{Config, DEFAULT_PRIVATE_PREFIX, DEFAULT_SHORT_SRC_LEN};
use std::fmt;
use std::rc::Rc;

/// Tunables the debug core reads at run time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugSettings {
    /// Buffer size for `short_src`, terminator included
    pub short_src_len: usize,
    /// Locals whose name starts with this are read-only to `set_local`
    pub private_prefix: char,
    pub hooks_enabled: bool,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            short_src_len: DEFAULT_SHORT_SRC_LEN,
            private_prefix: DEFAULT_PRIVATE_PREFIX,
            hooks_enabled: true,
        }
    }
}

impl From<&Config> for DebugSettings {
    fn from(config: &Config) -> Self {
        Self {
            short_src_len: config.short_src_len(),
            private_prefix: config.private_prefix(),
            hooks_enabled: config.hooks_enabled(),
        }
    }
}

pub struct State {
    pub(crate) stack: Vec<Value>,
    globals: TableRef,
    tag_methods: TagMethodTable,
    pub(crate) line_hook: Option<Hook>,
    pub(crate) call_hook: Option<Hook>,
    /// Cleared while a hook runs
    pub(crate) allow_hooks: bool,
    settings: DebugSettings,
}

impl State {
    pub fn new() -> Self {
        Self::with_settings(DebugSettings::default())
    }

    /// State configured from a loaded configuration
    pub fn with_config(config: &Config) -> Self {
        Self::with_settings(DebugSettings::from(config))
    }

    pub fn with_settings(settings: DebugSettings) -> Self {
        Self {
            stack: Vec::new(),
            globals: Table::new_ref(),
            tag_methods: TagMethodTable::new(),
            line_hook: None,
            call_hook: None,
            allow_hooks: true,
            settings,
        }
    }

    pub fn settings(&self) -> &DebugSettings {
        &self.settings
    }

    // ── Stack ───────────────────────────────────────────────────────

    /// Index one past the last occupied slot
    pub fn top(&self) -> usize {
        self.stack.len()
    }

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.stack.get(index)
    }

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) -> Option<Value> {
        self.stack.pop()
    }

    /// Shrink the stack to `top` slots, or grow it with nils
    pub fn set_top(&mut self, top: usize) {
        self.stack.resize(top, Value::Nil);
    }

    /// Push an activation mark for `func`; its arguments go above it
    pub fn push_lua_frame(&mut self, func: Rc<LuaClosure>) -> FrameRef {
        let frame = FrameRef::new(self.top());
        tracing::trace!(frame = frame.index(), source = %func.proto.source, "push Lua frame");
        self.stack.push(Value::LuaMark(CallInfo::new(func)));
        frame
    }

    pub fn push_native_frame(&mut self, func: Rc<NativeClosure>) -> FrameRef {
        let frame = FrameRef::new(self.top());
        tracing::trace!(frame = frame.index(), name = %func.name, "push native frame");
        self.stack.push(Value::NativeMark(func));
        frame
    }

    /// Record that `frame` has executed up to, not including, `savedpc`
    pub fn set_savedpc(&mut self, frame: FrameRef, savedpc: usize) -> Result<(), DebugError> {
        let ci = self
            .call_info_mut(frame)
            .ok_or(DebugError::NotLuaFrame(frame.index()))?;
        assert!(savedpc <= ci.proto().code.len(), "pc outside function");
        ci.savedpc = savedpc;
        Ok(())
    }

    pub(crate) fn call_info(&self, frame: FrameRef) -> Option<&CallInfo> {
        match self.stack.get(frame.index()) {
            Some(Value::LuaMark(ci)) => Some(ci),
            _ => None,
        }
    }

    pub(crate) fn call_info_mut(&mut self, frame: FrameRef) -> Option<&mut CallInfo> {
        match self.stack.get_mut(frame.index()) {
            Some(Value::LuaMark(ci)) => Some(ci),
            _ => None,
        }
    }

    // ── Globals and tag methods ─────────────────────────────────────

    pub fn globals(&self) -> &TableRef {
        &self.globals
    }

    pub fn set_global(&mut self, name: &str, value: Value) {
        self.globals.borrow_mut().set(Value::string(name), value);
    }

    pub fn get_global(&self, name: &str) -> Value {
        self.globals.borrow().get(&Value::string(name))
    }

    pub fn tag_methods(&self) -> &TagMethodTable {
        &self.tag_methods
    }

    pub fn tag_methods_mut(&mut self) -> &mut TagMethodTable {
        &mut self.tag_methods
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("stack", &self.stack)
            .field("line_hook", &self.line_hook.is_some())
            .field("call_hook", &self.call_hook.is_some())
            .field("allow_hooks", &self.allow_hooks)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
