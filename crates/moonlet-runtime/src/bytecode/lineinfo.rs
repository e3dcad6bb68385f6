//! Compact line tables
//!
//! The table holds one entry per source line that owns code. A non-negative
//! entry is the pc where the next line starts (lines advance by one per
//! entry); a negative entry `-k` right before it skips `k` lines that own no
//! code. The table is closed by [`LINE_INFO_END`].
//!
//! ```text
//! source lines with code:  1  2  5  6
//! first pc of each line:   0  3  4  9
//! encoded:                [0, 3, -2, 4, 9, END]
//! ```

/// Terminator entry; larger than any pc
pub const LINE_INFO_END: i32 = i32::MAX;

/// Encoded pc → line table of one prototype
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineInfo {
    entries: Vec<i32>,
}

impl LineInfo {
    /// Wrap entries produced elsewhere (e.g. a loader). The table must be
    /// closed by [`LINE_INFO_END`].
    pub fn from_raw(entries: Vec<i32>) -> Self {
        assert!(
            entries.last() == Some(&LINE_INFO_END),
            "invalid line info: missing terminator"
        );
        Self { entries }
    }

    pub fn entries(&self) -> &[i32] {
        &self.entries
    }

    /// Line active at `pc`.
    ///
    /// `pc == None` is the function preamble and yields `refline` untouched.
    /// Without a cursor the walk starts at entry 0 with `refline` as the line
    /// before the first entry (callers pass 1). With a cursor the walk
    /// resumes from the entry it names, `refline` being that entry's line,
    /// and the cursor is left on the entry that covers `pc`; this lets a
    /// caller tracing consecutive pcs pay O(1) per step, forward or back.
    ///
    /// Panics if the table is malformed; tables come from the compiler and
    /// are trusted.
    pub fn decode(&self, pc: Option<usize>, refline: u32, cursor: Option<&mut usize>) -> u32 {
        let pc = match pc {
            Some(pc) => i32::try_from(pc).expect("pc beyond line table range"),
            None => return refline,
        };
        let info = &self.entries;
        let mut refi = cursor.as_deref().copied().unwrap_or(0);
        let mut line = refline as i64;

        if info[refi] < 0 {
            line += -(info[refi] as i64);
            refi += 1;
        }
        assert!(info[refi] >= 0, "invalid line info");

        // Walk back while the current entry starts after pc
        while info[refi] > pc {
            line -= 1;
            refi = refi.checked_sub(1).expect("invalid line info");
            if info[refi] < 0 {
                line -= -(info[refi] as i64);
                refi = refi.checked_sub(1).expect("invalid line info");
            }
            assert!(info[refi] >= 0, "invalid line info");
        }

        // Walk forward while the next entry still starts at or before pc
        loop {
            let mut next_line = line + 1;
            let mut next_ref = refi + 1;
            if info[next_ref] < 0 {
                next_line += -(info[next_ref] as i64);
                next_ref += 1;
            }
            assert!(info[next_ref] >= 0, "invalid line info");
            if info[next_ref] > pc {
                break;
            }
            line = next_line;
            refi = next_ref;
        }

        if let Some(cursor) = cursor {
            *cursor = refi;
        }
        assert!(line >= 0, "invalid line info");
        line as u32
    }
}

/// Line lookup that tolerates a missing table: `None` means "unknown".
pub fn get_line(
    lineinfo: Option<&LineInfo>,
    pc: Option<usize>,
    refline: u32,
    cursor: Option<&mut usize>,
) -> Option<u32> {
    lineinfo.map(|info| info.decode(pc, refline, cursor))
}

/// Builds a [`LineInfo`] while code is emitted
///
/// Call [`mark`](Self::mark) before each instruction with the source line
/// the instruction comes from. Lines that do not move forward add nothing.
#[derive(Debug, Clone, Default)]
pub struct LineInfoBuilder {
    entries: Vec<i32>,
    last_line: u32,
}

impl LineInfoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the instruction at `pc` belongs to `line`
    pub fn mark(&mut self, pc: usize, line: u32) {
        if line > self.last_line {
            if line > self.last_line + 1 {
                let skipped = line - (self.last_line + 1);
                self.entries.push(-(skipped as i32));
            }
            self.entries.push(pc as i32);
            self.last_line = line;
        }
    }

    pub fn finish(mut self) -> LineInfo {
        self.entries.push(LINE_INFO_END);
        LineInfo {
            entries: self.entries,
        }
    }
}
