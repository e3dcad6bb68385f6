//! `get_info`: option-driven frame queries
//!
//! | option | fills                                         |
//! |--------|-----------------------------------------------|
//! | `S`    | `source`, `short_src`, `line_defined`, `what` |
//! | `l`    | `current_line`                                |
//! | `u`    | `nups`                                        |
//! | `n`    | `name`, `name_what`                           |
//! | `f`    | pushes the function onto the stack            |
//!
//! A leading `>` queries the function on top of the stack instead of the
//! record's frame; that function is popped first.

use super::frame::{current_line, source_info, upvalue_count};
use super::DebugRecord;
use crate::error::DebugError;
use crate::state::State;
use crate::value::Value;

const OPTIONS: &str = "Slunf";

impl State {
    /// Fill `ar` with the facts requested by `what`
    ///
    /// Fails without touching the stack or the record when an option is
    /// unknown or there is no function to describe.
    pub fn get_info(&mut self, what: &str, ar: &mut DebugRecord) -> Result<(), DebugError> {
        let (active, options) = match what.strip_prefix('>') {
            Some(rest) => (false, rest),
            None => (true, what),
        };
        if let Some(bad) = options.chars().find(|c| !OPTIONS.contains(*c)) {
            return Err(DebugError::InvalidOption(bad));
        }

        let func = if active {
            let frame = ar.frame.ok_or(DebugError::NoFunctionOnStack)?;
            self.function_at(frame.index())?
        } else {
            let top = self.top().checked_sub(1).ok_or(DebugError::NoFunctionOnStack)?;
            let func = self.function_at(top)?;
            self.pop();
            func
        };

        for option in options.chars() {
            match option {
                'S' => {
                    if let Some(info) = source_info(&func, self.settings().short_src_len) {
                        info.fill(ar);
                    }
                }
                'l' => ar.current_line = current_line(&func),
                'u' => ar.nups = upvalue_count(&func),
                'n' => {
                    let called_as = match ar.frame {
                        Some(frame) if active => self.caller_name(frame),
                        _ => None,
                    };
                    let found = called_as.or_else(|| self.global_or_tag_method_name(&func));
                    ar.name_what = found.as_ref().map(|(kind, _)| *kind);
                    ar.name = found.map(|(_, name)| name.to_string());
                }
                'f' => self.push(func.normalized()),
                _ => unreachable!("options validated above"),
            }
        }
        Ok(())
    }

    fn function_at(&self, index: usize) -> Result<Value, DebugError> {
        let value = self.stack.get(index).ok_or(DebugError::NoFunctionOnStack)?;
        if value.is_function() {
            Ok(value.clone())
        } else {
            Err(DebugError::NotAFunction(value.type_name()))
        }
    }
}
