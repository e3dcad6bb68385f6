//! Line and call hooks
//!
//! Each state has one line hook slot and one call hook slot. A hook runs
//! with hooks switched off, so it may freely inspect the state (or even
//! run code) without re-triggering itself, and the stack top is restored
//! when it returns.

use super::{DebugRecord, FrameRef, HookEvent};
use crate::state::State;
use std::rc::Rc;

/// Hook callback; receives the state and a record bound to the frame that
/// triggered it
pub type Hook = Rc<dyn Fn(&mut State, &DebugRecord)>;

impl State {
    /// Install the line hook, returning the previous one
    pub fn set_line_hook(&mut self, hook: Option<Hook>) -> Option<Hook> {
        tracing::debug!(installed = hook.is_some(), "set line hook");
        std::mem::replace(&mut self.line_hook, hook)
    }

    /// Install the call hook, returning the previous one
    pub fn set_call_hook(&mut self, hook: Option<Hook>) -> Option<Hook> {
        tracing::debug!(installed = hook.is_some(), "set call hook");
        std::mem::replace(&mut self.call_hook, hook)
    }

    /// Whether a hook would run right now
    pub fn hooks_allowed(&self) -> bool {
        self.allow_hooks && self.settings().hooks_enabled
    }

    /// Report that `frame` is about to run `line`
    pub fn dispatch_line_hook(&mut self, frame: FrameRef, line: u32) {
        let Some(hook) = self.line_hook.clone() else {
            return;
        };
        if !self.hooks_allowed() {
            return;
        }
        let mut ar = DebugRecord::for_frame(frame);
        ar.event = Some(HookEvent::Line);
        ar.current_line = Some(line);
        self.run_hook(&hook, &ar);
    }

    /// Report a call or return of `frame`
    ///
    /// The frame's pc is reset, so inside the hook it reads as not yet
    /// executing.
    pub fn dispatch_call_hook(&mut self, frame: FrameRef, event: HookEvent) {
        let Some(hook) = self.call_hook.clone() else {
            return;
        };
        if !self.hooks_allowed() {
            return;
        }
        if let Some(ci) = self.call_info_mut(frame) {
            ci.savedpc = 0;
        }
        let mut ar = DebugRecord::for_frame(frame);
        ar.event = Some(event);
        self.run_hook(&hook, &ar);
    }

    /// Line tracing for an interpreter about to execute the instruction
    /// before `frame`'s saved pc
    ///
    /// Fires the line hook when execution enters a new line or jumps
    /// backward. Frames without a line table are never traced.
    pub fn trace_exec(&mut self, frame: FrameRef) {
        if self.line_hook.is_none() {
            return;
        }
        let Some(ci) = self.call_info_mut(frame) else {
            return;
        };
        let Some(pc) = ci.current_pc() else {
            return;
        };
        let func = Rc::clone(&ci.func);
        let Some(lineinfo) = func.proto.lineinfo.as_ref() else {
            return;
        };

        if pc == 0 {
            ci.line = 1;
            ci.refi = 0;
            ci.lastpc = 1;
        }
        let new_line = lineinfo.decode(Some(pc), ci.line, Some(&mut ci.refi));
        if new_line != ci.line || pc <= ci.lastpc {
            ci.line = new_line;
            ci.lastpc = pc;
            self.dispatch_line_hook(frame, new_line);
        }
    }

    fn run_hook(&mut self, hook: &Hook, ar: &DebugRecord) {
        let top = self.top();
        tracing::debug!(event = ?ar.event, frame = ?ar.frame, top, "dispatch hook");
        self.allow_hooks = false;
        hook(self, ar);
        self.allow_hooks = true;
        self.set_top(top);
    }
}
