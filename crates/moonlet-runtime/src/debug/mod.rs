//! Debug and introspection
//!
//! Everything here works from the execution state alone: the stack with
//! its activation marks, each frame's saved pc, and the prototypes'
//! compile-time tables. Frames are addressed by stack index, so a handle
//! stays meaningful while hooks grow the stack.
//!
//! ```text
//! stack ──> walker ──> frame / symbolic ──> names ──> info
//! ```

pub mod errors;
pub mod frame;
pub mod hooks;
pub mod info;
pub mod names;
pub mod source;
pub mod symbolic;
pub mod walker;

pub use hooks::Hook;
pub use source::chunk_id;
pub use symbolic::{symbolic_execute, SymbolicExecutor};

use serde::Serialize;
use std::fmt;

/// Handle of an active frame: the stack index of its mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRef(usize);

impl FrameRef {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// Stack index of the frame's first local
    pub fn base(self) -> usize {
        self.0 + 1
    }
}

/// How a name was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameKind {
    Global,
    Local,
    Field,
    TagMethod,
}

impl NameKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NameKind::Global => "global",
            NameKind::Local => "local",
            NameKind::Field => "field",
            NameKind::TagMethod => "tag-method",
        }
    }
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of function a frame runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FuncKind {
    Lua,
    #[serde(rename = "main")]
    Main,
    C,
}

impl FuncKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FuncKind::Lua => "Lua",
            FuncKind::Main => "main",
            FuncKind::C => "C",
        }
    }
}

impl fmt::Display for FuncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hook event that produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HookEvent {
    Call,
    Return,
    Line,
}

impl HookEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            HookEvent::Call => "call",
            HookEvent::Return => "return",
            HookEvent::Line => "line",
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facts about one frame, filled in by [`State::get_info`](crate::State::get_info)
///
/// A record names its frame by stack index; it goes stale as soon as the
/// frame is popped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DebugRecord {
    #[serde(skip)]
    pub(crate) frame: Option<FrameRef>,
    pub event: Option<HookEvent>,
    pub source: Option<String>,
    pub short_src: Option<String>,
    pub what: Option<FuncKind>,
    /// `None` for host functions
    pub line_defined: Option<u32>,
    /// `None` when not known
    pub current_line: Option<u32>,
    pub nups: usize,
    pub name: Option<String>,
    pub name_what: Option<NameKind>,
}

impl DebugRecord {
    /// Record bound to `frame`
    pub fn for_frame(frame: FrameRef) -> Self {
        Self {
            frame: Some(frame),
            ..Self::default()
        }
    }

    pub fn frame(&self) -> Option<FrameRef> {
        self.frame
    }
}
