//! Function prototypes

use super::instruction::Instruction;
use super::lineinfo::LineInfo;
use std::rc::Rc;

/// A named local and the pc range `[startpc, endpc)` where it is live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocVar {
    pub name: Rc<str>,
    pub startpc: usize,
    pub endpc: usize,
}

/// Compiled, immutable form of one source function
#[derive(Debug, Clone)]
pub struct Proto {
    pub code: Vec<Instruction>,
    /// `None` when compiled without line information
    pub lineinfo: Option<LineInfo>,
    pub kstr: Vec<Rc<str>>,
    pub knum: Vec<f64>,
    pub kproto: Vec<Rc<Proto>>,
    pub numparams: usize,
    pub is_vararg: bool,
    pub maxstacksize: usize,
    /// Locals ordered by `startpc`
    pub locvars: Vec<LocVar>,
    /// Chunk name (`@file`, `=label`, or the source text itself)
    pub source: Rc<str>,
    /// Line where the function was defined; 0 for the main chunk
    pub line_defined: u32,
}

impl Proto {
    /// Name of the `local_number`-th (1-based) local live at `pc`.
    ///
    /// Locals are counted in declaration order among those whose range
    /// contains `pc`. A function in its preamble (`pc == None`) has none.
    pub fn local_name(&self, local_number: usize, pc: Option<usize>) -> Option<&Rc<str>> {
        let pc = pc?;
        let mut remaining = local_number;
        for var in self.locvars.iter().take_while(|v| v.startpc <= pc) {
            if pc < var.endpc {
                remaining = remaining.checked_sub(1)?;
                if remaining == 0 {
                    return Some(&var.name);
                }
            }
        }
        None
    }

    /// Whether this is a main chunk rather than a nested function
    pub fn is_main(&self) -> bool {
        self.line_defined == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::Opcode;

    fn proto_with_locals(locvars: Vec<LocVar>) -> Proto {
        Proto {
            code: vec![Instruction::new(Opcode::End)],
            lineinfo: None,
            kstr: Vec::new(),
            knum: Vec::new(),
            kproto: Vec::new(),
            numparams: 0,
            is_vararg: false,
            maxstacksize: 4,
            locvars,
            source: Rc::from("=test"),
            line_defined: 0,
        }
    }

    fn var(name: &str, startpc: usize, endpc: usize) -> LocVar {
        LocVar {
            name: Rc::from(name),
            startpc,
            endpc,
        }
    }

    #[test]
    fn test_local_numbering_skips_dead_locals() {
        let p = proto_with_locals(vec![var("a", 0, 10), var("b", 1, 3), var("c", 4, 10)]);
        assert_eq!(p.local_name(1, Some(5)).map(|n| &**n), Some("a"));
        assert_eq!(p.local_name(2, Some(5)).map(|n| &**n), Some("c"));
        assert_eq!(p.local_name(2, Some(2)).map(|n| &**n), Some("b"));
        assert_eq!(p.local_name(3, Some(5)), None);
    }

    #[test]
    fn test_local_not_yet_started() {
        let p = proto_with_locals(vec![var("x", 2, 6)]);
        assert_eq!(p.local_name(1, Some(1)), None);
        assert_eq!(p.local_name(1, Some(2)).map(|n| &**n), Some("x"));
        assert_eq!(p.local_name(1, Some(6)), None);
    }

    #[test]
    fn test_preamble_and_zero_slot() {
        let p = proto_with_locals(vec![var("x", 0, 6)]);
        assert_eq!(p.local_name(1, None), None);
        assert_eq!(p.local_name(0, Some(1)), None);
    }
}
