//! Symbolic execution of bytecode
//!
//! Replays a function's instructions from entry up to a pc, tracking only
//! which instruction last wrote each stack position. Values are never
//! computed. The result tells the name resolver where a stack value came
//! from.
//!
//! The simulated stack must stay within `[0, maxstacksize]`; bytecode is
//! validated before it runs, so leaving that range is a bug and panics.

use crate::bytecode::{Instruction, Opcode, Proto, MULT_RET};

/// Stepwise symbolic interpreter over one instruction stream
#[derive(Debug, Clone)]
pub struct SymbolicExecutor<'a> {
    code: &'a [Instruction],
    /// Stop before executing this pc
    last_pc: usize,
    /// Conditional jumps are followed only when they land at or before this pc
    horizon: usize,
    /// Maximum simulated stack height
    limit: usize,
    pc: usize,
    top: usize,
    /// Per stack position, the pc of the instruction that last wrote it
    writers: Vec<Option<usize>>,
    high_water: usize,
}

impl<'a> SymbolicExecutor<'a> {
    /// Executor for `proto` that stops before `last_pc`
    pub fn new(proto: &'a Proto, last_pc: usize) -> Self {
        assert!(last_pc <= proto.code.len(), "pc outside function");
        Self::with_bounds(
            &proto.code,
            entry_top(proto.numparams, proto.is_vararg),
            proto.maxstacksize,
            last_pc,
            last_pc,
        )
    }

    fn with_bounds(
        code: &'a [Instruction],
        base: usize,
        limit: usize,
        last_pc: usize,
        horizon: usize,
    ) -> Self {
        assert!(base <= limit, "wrong stack");
        Self {
            code,
            last_pc,
            horizon,
            limit,
            pc: 0,
            top: base,
            writers: vec![None; base],
            high_water: base,
        }
    }

    /// Next pc to execute
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Current simulated stack height
    pub fn top(&self) -> usize {
        self.top
    }

    /// Highest stack height seen so far
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    pub fn is_done(&self) -> bool {
        self.pc >= self.last_pc
    }

    /// pc of the instruction that last wrote `slot`, if any did
    pub fn writer(&self, slot: usize) -> Option<usize> {
        self.writers.get(slot).copied().flatten()
    }

    /// Execute one instruction; returns the pc executed, or `None` when the
    /// stop pc has been reached.
    pub fn step(&mut self) -> Option<usize> {
        if self.is_done() {
            return None;
        }
        assert!(self.top <= self.limit, "wrong stack");

        let at = self.pc;
        let i = self.code[at];
        self.pc += 1;
        let op = i.opcode().expect("invalid opcode in trusted bytecode");

        match op {
            Opcode::Return => {
                let n = i.arg_u() as usize;
                assert!(self.top >= n, "wrong stack");
                self.top = n;
            }
            Opcode::TailCall => {
                assert!(self.top >= i.arg_a() as usize, "wrong stack");
                self.top = i.arg_b() as usize;
            }
            Opcode::Call => {
                let base = i.arg_a() as usize;
                let nresults = match i.arg_b() {
                    MULT_RET => 1,
                    n => n as usize,
                };
                assert!(self.top >= base, "wrong stack");
                self.top = base;
                self.push(at, nresults);
            }
            Opcode::PushNil => self.push(at, i.arg_u() as usize),
            Opcode::Pop => self.pop(i.arg_u() as usize),
            Opcode::SetTable | Opcode::SetList => self.pop(i.arg_b() as usize),
            Opcode::SetMap => self.pop(2 * i.arg_u() as usize),
            Opcode::Concat => {
                self.pop(i.arg_u() as usize);
                self.push(at, 1);
            }
            Opcode::Closure => {
                self.pop(i.arg_b() as usize);
                self.push(at, 1);
            }
            Opcode::JmpOnT | Opcode::JmpOnF => {
                let target = self.pc as i64 + i.arg_s() as i64;
                // Forward jump that does not skip the stop pc: the surviving
                // value comes from the `and`/`or` itself
                if (self.pc as i64) < target && target <= self.horizon as i64 {
                    assert!(self.top >= 1, "wrong stack");
                    self.writers[self.top - 1] = Some(at);
                    self.pc = target as usize;
                } else {
                    self.pop(1);
                }
            }
            _ => {
                let props = op.properties();
                let push = props
                    .push
                    .expect("opcode with operand-dependent push has no generic rule");
                self.pop(props.pop as usize);
                self.push(at, push as usize);
            }
        }

        tracing::trace!(pc = at, op = op.name(), top = self.top, "symbolic step");
        Some(at)
    }

    /// Execute until the stop pc
    pub fn run(&mut self) {
        while self.step().is_some() {}
    }

    fn push(&mut self, at: usize, n: usize) {
        let new_top = self.top + n;
        assert!(new_top <= self.limit, "wrong stack");
        if self.writers.len() < new_top {
            self.writers.resize(new_top, None);
        }
        for slot in &mut self.writers[self.top..new_top] {
            *slot = Some(at);
        }
        self.top = new_top;
        self.high_water = self.high_water.max(new_top);
    }

    fn pop(&mut self, n: usize) {
        assert!(self.top >= n, "wrong stack");
        self.top -= n;
    }
}

/// Stack height at function entry: parameters plus the vararg pseudo-local
pub fn entry_top(numparams: usize, is_vararg: bool) -> usize {
    numparams + usize::from(is_vararg)
}

/// The instruction that produced the value at `stack_pos` when `proto` is
/// about to execute `last_pc`.
///
/// `None` when no instruction wrote the slot (a parameter or the vararg
/// table).
pub fn symbolic_execute(proto: &Proto, last_pc: usize, stack_pos: usize) -> Option<Instruction> {
    let mut exec = SymbolicExecutor::new(proto, last_pc);
    exec.run();
    exec.writer(stack_pos).map(|pc| proto.code[pc])
}

/// Maximum stack height reached by `code` executed straight through.
///
/// Conditional jumps are never followed, so every instruction contributes;
/// used to size `maxstacksize` for freshly built prototypes.
pub fn stack_high_water(code: &[Instruction], base: usize) -> usize {
    let mut exec = SymbolicExecutor::with_bounds(code, base, usize::MAX, code.len(), 0);
    exec.run();
    exec.high_water()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::ProtoBuilder;

    #[test]
    fn test_global_load_provenance() {
        let mut b = ProtoBuilder::new("=test");
        let x = b.string_constant("x");
        b.emit_u(Opcode::GetGlobal, x, 1);
        b.emit_s(Opcode::PushInt, 1, 1);
        b.emit(Opcode::Add, 1);
        b.emit(Opcode::End, 1);
        let p = b.build();

        let i = symbolic_execute(&p, 1, 0).unwrap();
        assert_eq!(i.opcode(), Some(Opcode::GetGlobal));
        assert_eq!(i.arg_u(), x);

        let i = symbolic_execute(&p, 3, 0).unwrap();
        assert_eq!(i.opcode(), Some(Opcode::Add));
    }

    #[test]
    fn test_parameter_has_no_writer() {
        let mut b = ProtoBuilder::new("=test");
        b.params(2);
        b.emit_u(Opcode::GetLocal, 0, 1);
        b.emit(Opcode::End, 1);
        let p = b.build();

        assert_eq!(symbolic_execute(&p, 1, 0), None);
        assert_eq!(symbolic_execute(&p, 1, 2).unwrap().opcode(), Some(Opcode::GetLocal));
    }

    #[test]
    fn test_vararg_reserves_slot() {
        let mut b = ProtoBuilder::new("=test");
        b.params(1).vararg();
        b.emit_s(Opcode::PushInt, 7, 1);
        b.emit(Opcode::End, 1);
        let p = b.build();

        let mut exec = SymbolicExecutor::new(&p, 1);
        assert_eq!(exec.top(), 2);
        exec.run();
        assert_eq!(exec.top(), 3);
        assert_eq!(exec.writer(2), Some(0));
    }

    #[test]
    fn test_multret_call_counts_one_result() {
        let mut b = ProtoBuilder::new("=test");
        let f = b.string_constant("f");
        b.emit_u(Opcode::GetGlobal, f, 1);
        b.emit_s(Opcode::PushInt, 1, 1);
        b.emit_ab(Opcode::Call, 0, MULT_RET, 1);
        b.emit(Opcode::End, 1);
        let p = b.build();

        let mut exec = SymbolicExecutor::new(&p, 3);
        exec.run();
        assert_eq!(exec.top(), 1);
        assert_eq!(exec.writer(0), Some(2));
    }

    #[test]
    fn test_or_jump_taken_tags_surviving_value() {
        // a = b or c
        let mut b = ProtoBuilder::new("=test");
        let kb = b.string_constant("b");
        let kc = b.string_constant("c");
        b.emit_u(Opcode::GetGlobal, kb, 1); // 0
        b.emit_s(Opcode::JmpOnT, 1, 1); // 1 -> 3
        b.emit_u(Opcode::GetGlobal, kc, 1); // 2
        b.emit(Opcode::End, 1); // 3
        let p = b.build();

        // Jump lands on the stop pc: value attributed to the `or`
        let i = symbolic_execute(&p, 3, 0).unwrap();
        assert_eq!(i.opcode(), Some(Opcode::JmpOnT));

        // Stop inside the skipped region: jump not followed
        let mut exec = SymbolicExecutor::new(&p, 2);
        exec.run();
        assert_eq!(exec.top(), 0);
    }

    #[test]
    fn test_high_water_counts_skipped_branch() {
        let mut b = ProtoBuilder::new("=test");
        let k = b.string_constant("k");
        b.emit_u(Opcode::GetGlobal, k, 1);
        b.emit_s(Opcode::JmpOnT, 3, 1);
        b.emit_u(Opcode::GetGlobal, k, 1);
        b.emit_s(Opcode::PushInt, 1, 1);
        b.emit(Opcode::Add, 1);
        b.emit(Opcode::End, 1);
        let code = b.build().code;

        assert_eq!(stack_high_water(&code, 0), 2);
    }

    #[test]
    #[should_panic(expected = "wrong stack")]
    fn test_underflow_is_fatal() {
        let mut b = ProtoBuilder::new("=test");
        b.emit_u(Opcode::Pop, 1, 1);
        b.emit(Opcode::End, 1);
        b.max_stack(1);
        let p = b.build();
        symbolic_execute(&p, 1, 0);
    }

    #[test]
    #[should_panic(expected = "wrong stack")]
    fn test_overflow_is_fatal() {
        let mut b = ProtoBuilder::new("=test");
        b.emit_u(Opcode::PushNil, 3, 1);
        b.emit(Opcode::End, 1);
        b.max_stack(2);
        let p = b.build();
        symbolic_execute(&p, 1, 0);
    }
}
