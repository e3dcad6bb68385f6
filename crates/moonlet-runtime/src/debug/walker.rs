//! Call-frame walking
//!
//! There is no frame list: frames are the activation marks on the stack,
//! found by scanning down from a given top.

use super::{DebugRecord, FrameRef};
use crate::state::State;

impl State {
    /// The `level`-th active frame below `top`, level 0 being the innermost
    pub fn find_frame(&self, level: usize, top: usize) -> Option<FrameRef> {
        let top = top.min(self.stack.len());
        let found = self.stack[..top]
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, slot)| slot.is_mark())
            .nth(level)
            .map(|(idx, _)| FrameRef::new(idx));
        tracing::trace!(level, top, frame = ?found, "find frame");
        found
    }

    /// Record for the `level`-th active frame, or `None` past the outermost
    pub fn get_stack(&self, level: usize) -> Option<DebugRecord> {
        self.find_frame(level, self.top()).map(DebugRecord::for_frame)
    }

    /// Number of active frames
    pub fn stack_depth(&self) -> usize {
        self.stack.iter().filter(|slot| slot.is_mark()).count()
    }
}
