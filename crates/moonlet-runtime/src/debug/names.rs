//! Name resolution
//!
//! A stack value gets a name from the instruction that produced it, found
//! by symbolic execution of its frame. A function with no such producer
//! (the function being run, say) falls back to a search of the globals and
//! then the tag methods.

use super::symbolic::symbolic_execute;
use super::{FrameRef, NameKind};
use crate::bytecode::{Opcode, Proto};
use crate::state::State;
use crate::value::Value;
use std::rc::Rc;

impl State {
    /// Symbolic name of the value in stack slot `slot`
    ///
    /// `None` when the slot belongs to a host frame, lies below every frame,
    /// or was produced by an instruction that names nothing (arithmetic, a
    /// call result).
    pub fn object_name(&self, slot: usize) -> Option<(NameKind, Rc<str>)> {
        let frame = self.find_frame(0, slot)?;
        let ci = self.call_info(frame)?;
        let proto = ci.proto();
        let pc = ci.current_pc()?;
        let i = symbolic_execute(proto, pc, slot - frame.base())?;
        let op = i.opcode()?;

        let found = match op {
            Opcode::GetGlobal => (NameKind::Global, constant(proto, i.arg_u())),
            Opcode::GetLocal => {
                let name = proto
                    .local_name(i.arg_u() as usize + 1, Some(pc))
                    .expect("local must exist");
                (NameKind::Local, Rc::clone(name))
            }
            Opcode::GetDotted | Opcode::PushSelf => (NameKind::Field, constant(proto, i.arg_u())),
            _ => return None,
        };
        tracing::trace!(slot, kind = %found.0, name = %found.1, "object name");
        Some(found)
    }

    /// Name under which `frame`'s function was called, read from the call
    /// instruction its caller is executing
    pub fn caller_name(&self, frame: FrameRef) -> Option<(NameKind, Rc<str>)> {
        let caller = self.find_frame(0, frame.index())?;
        let ci = self.call_info(caller)?;
        let pc = ci.current_pc()?;
        let i = ci.proto().code[pc];
        match i.opcode()? {
            Opcode::Call | Opcode::TailCall => {
                self.object_name(caller.base() + i.arg_a() as usize)
            }
            _ => None,
        }
    }

    /// First global bound to `value`, or else the first tag method equal
    /// to it, searched event by event
    pub fn global_or_tag_method_name(&self, value: &Value) -> Option<(NameKind, Rc<str>)> {
        let target = value.normalized();
        let global = self.globals().borrow().iter().find_map(|(key, v)| match key {
            Value::String(name) if v.raw_equal(&target) => Some(Rc::clone(name)),
            _ => None,
        });
        if let Some(name) = global {
            return Some((NameKind::Global, name));
        }

        self.tag_methods()
            .find(&target)
            .map(|(event, _)| (NameKind::TagMethod, Rc::from(event.name())))
    }
}

fn constant(proto: &Proto, idx: u32) -> Rc<str> {
    Rc::clone(&proto.kstr[idx as usize])
}
