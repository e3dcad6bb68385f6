//! Bytecode disassembler
//!
//! Converts a prototype back to a human-readable listing with source lines.
//! Used for diagnostics and in tests.

use super::lineinfo::LineInfo;
use super::{Opcode, Proto};
use std::fmt::Write;

/// Disassemble a prototype and, after it, every nested prototype
///
/// # Format
/// ```text
/// === main <=demo> ===
/// params: 0, vararg: no, stack: 2
/// === Constants ===
/// s0: "x"
///
/// === Instructions ===
/// 0000  [1]  GETGLOBAL 0  ; "x"
/// 0001  [1]  END
/// ```
pub fn disassemble(proto: &Proto) -> String {
    let mut output = String::new();
    write_proto(proto, &mut output);
    output
}

fn write_proto(proto: &Proto, output: &mut String) {
    if proto.is_main() {
        writeln!(output, "=== main <{}> ===", proto.source).unwrap();
    } else {
        writeln!(
            output,
            "=== function <{}:{}> ===",
            proto.source, proto.line_defined
        )
        .unwrap();
    }
    writeln!(
        output,
        "params: {}, vararg: {}, stack: {}",
        proto.numparams,
        if proto.is_vararg { "yes" } else { "no" },
        proto.maxstacksize
    )
    .unwrap();

    // Constants section
    if !proto.kstr.is_empty() || !proto.knum.is_empty() {
        writeln!(output, "=== Constants ===").unwrap();
        for (idx, s) in proto.kstr.iter().enumerate() {
            writeln!(output, "s{}: {:?}", idx, &**s).unwrap();
        }
        for (idx, n) in proto.knum.iter().enumerate() {
            writeln!(output, "n{}: {}", idx, n).unwrap();
        }
        writeln!(output).unwrap();
    }

    // Locals section
    if !proto.locvars.is_empty() {
        writeln!(output, "=== Locals ===").unwrap();
        for (idx, var) in proto.locvars.iter().enumerate() {
            writeln!(
                output,
                "{}: {} [{}, {})",
                idx, var.name, var.startpc, var.endpc
            )
            .unwrap();
        }
        writeln!(output).unwrap();
    }

    // Instructions section
    writeln!(output, "=== Instructions ===").unwrap();
    let mut lines = LineCursor::new(proto.lineinfo.as_ref());
    for pc in 0..proto.code.len() {
        let line = match lines.line_at(pc) {
            Some(line) => line.to_string(),
            None => "-".to_string(),
        };
        let mut text = format!("{:04}  [{}]  {:?}", pc, line, proto.code[pc]);
        if let Some(note) = annotate(proto, pc) {
            text.push_str("  ; ");
            text.push_str(&note);
        }
        writeln!(output, "{}", text).unwrap();
    }

    for child in &proto.kproto {
        writeln!(output).unwrap();
        write_proto(child, output);
    }
}

/// Sequential line lookup reusing the decoder's cursor
struct LineCursor<'a> {
    info: Option<&'a LineInfo>,
    cursor: usize,
    line: u32,
}

impl<'a> LineCursor<'a> {
    fn new(info: Option<&'a LineInfo>) -> Self {
        Self {
            info,
            cursor: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, pc: usize) -> Option<u32> {
        let info = self.info?;
        self.line = info.decode(Some(pc), self.line, Some(&mut self.cursor));
        Some(self.line)
    }
}

/// Operand annotation: constant names, local names, jump targets
fn annotate(proto: &Proto, pc: usize) -> Option<String> {
    let i = proto.code[pc];
    match i.opcode()? {
        Opcode::PushString
        | Opcode::GetGlobal
        | Opcode::SetGlobal
        | Opcode::GetDotted
        | Opcode::PushSelf => proto
            .kstr
            .get(i.arg_u() as usize)
            .map(|s| format!("{:?}", &**s)),
        Opcode::PushNum => proto.knum.get(i.arg_u() as usize).map(|n| n.to_string()),
        Opcode::PushNegNum => proto
            .knum
            .get(i.arg_u() as usize)
            .map(|n| format!("-{}", n)),
        Opcode::GetLocal | Opcode::SetLocal | Opcode::GetIndexed => proto
            .local_name(i.arg_u() as usize + 1, Some(pc))
            .map(|name| name.to_string()),
        Opcode::JmpNe
        | Opcode::JmpEq
        | Opcode::JmpLt
        | Opcode::JmpLe
        | Opcode::JmpGt
        | Opcode::JmpGe
        | Opcode::JmpT
        | Opcode::JmpF
        | Opcode::JmpOnT
        | Opcode::JmpOnF
        | Opcode::Jmp
        | Opcode::ForPrep
        | Opcode::ForLoop
        | Opcode::LForPrep
        | Opcode::LForLoop => Some(format!("to {}", pc as i64 + 1 + i.arg_s() as i64)),
        _ => None,
    }
}
