//! Prototype assembly
//!
//! `ProtoBuilder` plays the code generator's part for hosts that assemble
//! bytecode directly: it records line information as instructions are
//! emitted, interns constants, tracks local scopes and sizes the stack.

use super::instruction::Instruction;
use super::lineinfo::LineInfoBuilder;
use super::opcode::Opcode;
use super::proto::{LocVar, Proto};
use crate::debug::symbolic::{entry_top, stack_high_water};
use std::rc::Rc;

/// Incrementally builds a [`Proto`]
#[derive(Debug, Clone)]
pub struct ProtoBuilder {
    code: Vec<Instruction>,
    lines: LineInfoBuilder,
    with_lines: bool,
    kstr: Vec<Rc<str>>,
    knum: Vec<f64>,
    kproto: Vec<Rc<Proto>>,
    numparams: usize,
    is_vararg: bool,
    max_stack: Option<usize>,
    locvars: Vec<LocVar>,
    source: Rc<str>,
    line_defined: u32,
}

impl ProtoBuilder {
    /// Start a main chunk named `source`
    pub fn new(source: &str) -> Self {
        Self {
            code: Vec::new(),
            lines: LineInfoBuilder::new(),
            with_lines: true,
            kstr: Vec::new(),
            knum: Vec::new(),
            kproto: Vec::new(),
            numparams: 0,
            is_vararg: false,
            max_stack: None,
            locvars: Vec::new(),
            source: Rc::from(source),
            line_defined: 0,
        }
    }

    pub fn params(&mut self, n: usize) -> &mut Self {
        self.numparams = n;
        self
    }

    pub fn vararg(&mut self) -> &mut Self {
        self.is_vararg = true;
        self
    }

    /// Mark this as a nested function defined at `line`
    pub fn defined_at(&mut self, line: u32) -> &mut Self {
        self.line_defined = line;
        self
    }

    /// Fix `maxstacksize` instead of computing it
    pub fn max_stack(&mut self, n: usize) -> &mut Self {
        self.max_stack = Some(n);
        self
    }

    /// Build without a line table, as a stripped chunk would load
    pub fn without_line_info(&mut self) -> &mut Self {
        self.with_lines = false;
        self
    }

    /// pc the next instruction will get
    pub fn current_pc(&self) -> usize {
        self.code.len()
    }

    /// Emit an encoded instruction from source `line`; returns its pc
    pub fn emit_instruction(&mut self, instruction: Instruction, line: u32) -> usize {
        let pc = self.code.len();
        self.lines.mark(pc, line);
        self.code.push(instruction);
        pc
    }

    pub fn emit(&mut self, op: Opcode, line: u32) -> usize {
        self.emit_instruction(Instruction::new(op), line)
    }

    pub fn emit_u(&mut self, op: Opcode, u: u32, line: u32) -> usize {
        self.emit_instruction(Instruction::with_u(op, u), line)
    }

    pub fn emit_s(&mut self, op: Opcode, s: i32, line: u32) -> usize {
        self.emit_instruction(Instruction::with_s(op, s), line)
    }

    pub fn emit_ab(&mut self, op: Opcode, a: u32, b: u32, line: u32) -> usize {
        self.emit_instruction(Instruction::with_ab(op, a, b), line)
    }

    /// Point the signed-offset jump at `at` to `target`
    pub fn patch_jump(&mut self, at: usize, target: usize) {
        let op = self.code[at]
            .opcode()
            .expect("patching an invalid instruction");
        let offset = target as i32 - (at as i32 + 1);
        self.code[at] = Instruction::with_s(op, offset);
    }

    /// Index of `s` in the string pool, adding it if new
    pub fn string_constant(&mut self, s: &str) -> u32 {
        if let Some(idx) = self.kstr.iter().position(|k| &**k == s) {
            return idx as u32;
        }
        self.kstr.push(Rc::from(s));
        (self.kstr.len() - 1) as u32
    }

    /// Index of `n` in the number pool, adding it if new
    pub fn number_constant(&mut self, n: f64) -> u32 {
        if let Some(idx) = self.knum.iter().position(|k| k.to_bits() == n.to_bits()) {
            return idx as u32;
        }
        self.knum.push(n);
        (self.knum.len() - 1) as u32
    }

    pub fn proto_constant(&mut self, proto: Rc<Proto>) -> u32 {
        self.kproto.push(proto);
        (self.kproto.len() - 1) as u32
    }

    /// Open a local scope starting at the current pc; returns its handle
    pub fn declare_local(&mut self, name: &str) -> usize {
        let pc = self.current_pc();
        self.locvars.push(LocVar {
            name: Rc::from(name),
            startpc: pc,
            endpc: usize::MAX,
        });
        self.locvars.len() - 1
    }

    /// Close the local scope `handle` at the current pc
    pub fn close_local(&mut self, handle: usize) {
        self.locvars[handle].endpc = self.current_pc();
    }

    pub fn build(self) -> Proto {
        let end = self.code.len();
        let maxstacksize = self.max_stack.unwrap_or_else(|| {
            stack_high_water(&self.code, entry_top(self.numparams, self.is_vararg))
        });
        let locvars = self
            .locvars
            .into_iter()
            .map(|mut v| {
                v.endpc = v.endpc.min(end);
                v
            })
            .collect();

        Proto {
            code: self.code,
            lineinfo: self.with_lines.then(|| self.lines.finish()),
            kstr: self.kstr,
            knum: self.knum,
            kproto: self.kproto,
            numparams: self.numparams,
            is_vararg: self.is_vararg,
            maxstacksize,
            locvars,
            source: self.source,
            line_defined: self.line_defined,
        }
    }
}
