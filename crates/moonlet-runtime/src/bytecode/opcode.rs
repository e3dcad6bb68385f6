//! Opcode set and the static opcode property table
//!
//! Every opcode has a fixed argument mode and, where the effect is not
//! operand-dependent, a fixed number of stack values popped and pushed.

/// How an instruction's 26 argument bits are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgMode {
    /// No argument
    None,
    /// One unsigned argument
    U,
    /// One signed argument (jump offsets, small integers)
    S,
    /// Two arguments, A (17 bits) and B (9 bits)
    AB,
}

/// Static stack behaviour of one opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpProperties {
    pub mode: ArgMode,
    /// Values pushed; `None` when the count depends on the operands
    pub push: Option<u8>,
    /// Values popped
    pub pop: u8,
}

const fn props(mode: ArgMode, push: Option<u8>, pop: u8) -> OpProperties {
    OpProperties { mode, push, pop }
}

/// Bytecode opcode (49 instructions)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // ===== Calls and returns =====
    /// End of code
    End = 0,
    /// Return values above base+U
    Return = 1,
    /// Call function at base+A expecting B results (MULT_RET = all)
    Call = 2,
    /// Call at A and return its results, dropping B slots
    TailCall = 3,

    // ===== Stack =====
    /// Push U nils
    PushNil = 4,
    /// Pop U values
    Pop = 5,

    // ===== Constants and loads =====
    /// Push the integer S
    PushInt = 6,
    /// Push kstr[U]
    PushString = 7,
    /// Push knum[U]
    PushNum = 8,
    /// Push -knum[U]
    PushNegNum = 9,
    /// Push upvalue U
    PushUpvalue = 10,
    /// Push local U
    GetLocal = 11,
    /// Push global named kstr[U]
    GetGlobal = 12,
    /// Pop key and table, push table[key]
    GetTable = 13,
    /// Pop table, push table[kstr[U]]
    GetDotted = 14,
    /// Pop table, push table[local U]
    GetIndexed = 15,
    /// Pop table, push table[kstr[U]] and the table itself
    PushSelf = 16,
    /// Push a new table sized U
    CreateTable = 17,

    // ===== Stores =====
    /// Pop into local U
    SetLocal = 18,
    /// Pop into global kstr[U]
    SetGlobal = 19,
    /// Store top into the table at top-A, popping B values
    SetTable = 20,
    /// Store B values into the list below them
    SetList = 21,
    /// Store U key/value pairs into the table below them
    SetMap = 22,

    // ===== Arithmetic =====
    Add = 23,
    /// Add the integer S to top
    AddI = 24,
    Sub = 25,
    Mult = 26,
    Div = 27,
    Pow = 28,
    /// Concatenate the top U values into one
    Concat = 29,
    /// Unary minus
    Minus = 30,
    Not = 31,

    // ===== Conditional jumps (pop operands) =====
    JmpNe = 32,
    JmpEq = 33,
    JmpLt = 34,
    JmpLe = 35,
    JmpGt = 36,
    JmpGe = 37,
    /// Pop, jump if not nil
    JmpT = 38,
    /// Pop, jump if nil
    JmpF = 39,
    /// Jump keeping top if not nil, else pop (`or`)
    JmpOnT = 40,
    /// Jump keeping top if nil, else pop (`and`)
    JmpOnF = 41,
    /// Unconditional jump
    Jmp = 42,
    /// Push nil and skip the next instruction
    PushNilJmp = 43,

    // ===== Loops =====
    ForPrep = 44,
    ForLoop = 45,
    LForPrep = 46,
    LForLoop = 47,

    // ===== Closures =====
    /// Create closure kproto[A] over B upvalues from the stack
    Closure = 48,
}

/// Number of opcodes
pub const NUM_OPCODES: usize = 49;

/// Property table indexed by opcode byte
static OP_PROPERTIES: [OpProperties; NUM_OPCODES] = [
    props(ArgMode::None, Some(0), 0), // End
    props(ArgMode::U, Some(0), 0),    // Return
    props(ArgMode::AB, Some(0), 0),   // Call
    props(ArgMode::AB, Some(0), 0),   // TailCall
    props(ArgMode::U, None, 0),       // PushNil
    props(ArgMode::U, None, 0),       // Pop
    props(ArgMode::S, Some(1), 0),    // PushInt
    props(ArgMode::U, Some(1), 0),    // PushString
    props(ArgMode::U, Some(1), 0),    // PushNum
    props(ArgMode::U, Some(1), 0),    // PushNegNum
    props(ArgMode::U, Some(1), 0),    // PushUpvalue
    props(ArgMode::U, Some(1), 0),    // GetLocal
    props(ArgMode::U, Some(1), 0),    // GetGlobal
    props(ArgMode::None, Some(1), 2), // GetTable
    props(ArgMode::U, Some(1), 1),    // GetDotted
    props(ArgMode::U, Some(1), 1),    // GetIndexed
    props(ArgMode::U, Some(2), 1),    // PushSelf
    props(ArgMode::U, Some(1), 0),    // CreateTable
    props(ArgMode::U, Some(0), 1),    // SetLocal
    props(ArgMode::U, Some(0), 1),    // SetGlobal
    props(ArgMode::AB, None, 0),      // SetTable
    props(ArgMode::AB, None, 0),      // SetList
    props(ArgMode::U, None, 0),       // SetMap
    props(ArgMode::None, Some(1), 2), // Add
    props(ArgMode::S, Some(1), 1),    // AddI
    props(ArgMode::None, Some(1), 2), // Sub
    props(ArgMode::None, Some(1), 2), // Mult
    props(ArgMode::None, Some(1), 2), // Div
    props(ArgMode::None, Some(1), 2), // Pow
    props(ArgMode::U, None, 0),       // Concat
    props(ArgMode::None, Some(1), 1), // Minus
    props(ArgMode::None, Some(1), 1), // Not
    props(ArgMode::S, Some(0), 2),    // JmpNe
    props(ArgMode::S, Some(0), 2),    // JmpEq
    props(ArgMode::S, Some(0), 2),    // JmpLt
    props(ArgMode::S, Some(0), 2),    // JmpLe
    props(ArgMode::S, Some(0), 2),    // JmpGt
    props(ArgMode::S, Some(0), 2),    // JmpGe
    props(ArgMode::S, Some(0), 1),    // JmpT
    props(ArgMode::S, Some(0), 1),    // JmpF
    props(ArgMode::S, Some(0), 1),    // JmpOnT
    props(ArgMode::S, Some(0), 1),    // JmpOnF
    props(ArgMode::S, Some(0), 0),    // Jmp
    props(ArgMode::None, Some(0), 0), // PushNilJmp
    props(ArgMode::S, Some(0), 0),    // ForPrep
    props(ArgMode::S, Some(0), 3),    // ForLoop
    props(ArgMode::S, Some(2), 0),    // LForPrep
    props(ArgMode::S, Some(0), 3),    // LForLoop
    props(ArgMode::AB, None, 0),      // Closure
];

/// Opcodes in byte order, for decoding
static OPCODES: [Opcode; NUM_OPCODES] = [
    Opcode::End,
    Opcode::Return,
    Opcode::Call,
    Opcode::TailCall,
    Opcode::PushNil,
    Opcode::Pop,
    Opcode::PushInt,
    Opcode::PushString,
    Opcode::PushNum,
    Opcode::PushNegNum,
    Opcode::PushUpvalue,
    Opcode::GetLocal,
    Opcode::GetGlobal,
    Opcode::GetTable,
    Opcode::GetDotted,
    Opcode::GetIndexed,
    Opcode::PushSelf,
    Opcode::CreateTable,
    Opcode::SetLocal,
    Opcode::SetGlobal,
    Opcode::SetTable,
    Opcode::SetList,
    Opcode::SetMap,
    Opcode::Add,
    Opcode::AddI,
    Opcode::Sub,
    Opcode::Mult,
    Opcode::Div,
    Opcode::Pow,
    Opcode::Concat,
    Opcode::Minus,
    Opcode::Not,
    Opcode::JmpNe,
    Opcode::JmpEq,
    Opcode::JmpLt,
    Opcode::JmpLe,
    Opcode::JmpGt,
    Opcode::JmpGe,
    Opcode::JmpT,
    Opcode::JmpF,
    Opcode::JmpOnT,
    Opcode::JmpOnF,
    Opcode::Jmp,
    Opcode::PushNilJmp,
    Opcode::ForPrep,
    Opcode::ForLoop,
    Opcode::LForPrep,
    Opcode::LForLoop,
    Opcode::Closure,
];

impl Opcode {
    /// Static stack behaviour of this opcode
    pub fn properties(self) -> OpProperties {
        OP_PROPERTIES[self as usize]
    }

    /// Upper-case mnemonic used in listings
    pub fn name(self) -> &'static str {
        match self {
            Opcode::End => "END",
            Opcode::Return => "RETURN",
            Opcode::Call => "CALL",
            Opcode::TailCall => "TAILCALL",
            Opcode::PushNil => "PUSHNIL",
            Opcode::Pop => "POP",
            Opcode::PushInt => "PUSHINT",
            Opcode::PushString => "PUSHSTRING",
            Opcode::PushNum => "PUSHNUM",
            Opcode::PushNegNum => "PUSHNEGNUM",
            Opcode::PushUpvalue => "PUSHUPVALUE",
            Opcode::GetLocal => "GETLOCAL",
            Opcode::GetGlobal => "GETGLOBAL",
            Opcode::GetTable => "GETTABLE",
            Opcode::GetDotted => "GETDOTTED",
            Opcode::GetIndexed => "GETINDEXED",
            Opcode::PushSelf => "PUSHSELF",
            Opcode::CreateTable => "CREATETABLE",
            Opcode::SetLocal => "SETLOCAL",
            Opcode::SetGlobal => "SETGLOBAL",
            Opcode::SetTable => "SETTABLE",
            Opcode::SetList => "SETLIST",
            Opcode::SetMap => "SETMAP",
            Opcode::Add => "ADD",
            Opcode::AddI => "ADDI",
            Opcode::Sub => "SUB",
            Opcode::Mult => "MULT",
            Opcode::Div => "DIV",
            Opcode::Pow => "POW",
            Opcode::Concat => "CONCAT",
            Opcode::Minus => "MINUS",
            Opcode::Not => "NOT",
            Opcode::JmpNe => "JMPNE",
            Opcode::JmpEq => "JMPEQ",
            Opcode::JmpLt => "JMPLT",
            Opcode::JmpLe => "JMPLE",
            Opcode::JmpGt => "JMPGT",
            Opcode::JmpGe => "JMPGE",
            Opcode::JmpT => "JMPT",
            Opcode::JmpF => "JMPF",
            Opcode::JmpOnT => "JMPONT",
            Opcode::JmpOnF => "JMPONF",
            Opcode::Jmp => "JMP",
            Opcode::PushNilJmp => "PUSHNILJMP",
            Opcode::ForPrep => "FORPREP",
            Opcode::ForLoop => "FORLOOP",
            Opcode::LForPrep => "LFORPREP",
            Opcode::LForLoop => "LFORLOOP",
            Opcode::Closure => "CLOSURE",
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = ();

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        OPCODES.get(byte as usize).copied().ok_or(())
    }
}
