//! Runtime error messages that name the offending value

use crate::error::RuntimeError;
use crate::state::State;

impl State {
    /// "attempt to {op} ..." for the value in `slot`, naming it when its
    /// origin can be recovered
    pub fn type_error(&self, slot: usize, op: &str) -> RuntimeError {
        let t = self.stack[slot].type_name();
        let msg = match self.object_name(slot) {
            Some((kind, name)) => format!(
                "attempt to {} {} `{}' (a {} value)",
                clip(op, 30),
                clip(kind.as_str(), 20),
                clip(&name, 40),
                clip(t, 10)
            ),
            None => format!("attempt to {} a {} value", clip(op, 30), clip(t, 10)),
        };
        RuntimeError::TypeError { msg }
    }

    /// Type error for a binary operation on `slot` and `slot + 1`: blames
    /// the first operand unless it already has the `expected` type
    pub fn bin_error(&self, slot: usize, expected: &str, op: &str) -> RuntimeError {
        let culprit = if self.stack[slot].type_name() == expected {
            slot + 1
        } else {
            slot
        };
        assert!(
            self.stack[culprit].type_name() != expected,
            "must be an error"
        );
        self.type_error(culprit, op)
    }

    /// Comparison error for the two values on top of the stack
    pub fn order_error(&self) -> RuntimeError {
        let top = self.top();
        assert!(top >= 2, "order error needs two operands");
        let t1 = self.stack[top - 2].type_name();
        let t2 = self.stack[top - 1].type_name();
        let msg = if t1 == t2 {
            format!("attempt to compare two {} values", clip(t1, 10))
        } else {
            format!("attempt to compare {} with {}", clip(t1, 10), clip(t2, 10))
        };
        RuntimeError::CompareError { msg }
    }
}

/// At most `max` characters of `s`
fn clip(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use rstest::rstest;

    #[rstest]
    #[case("abc", 2, "ab")]
    #[case("abc", 3, "abc")]
    #[case("abc", 10, "abc")]
    #[case("ééé", 1, "é")]
    fn test_clip(#[case] s: &str, #[case] max: usize, #[case] expected: &str) {
        assert_eq!(clip(s, max), expected);
    }

    #[test]
    fn test_order_error_messages() {
        let mut state = State::new();
        state.push(Value::Number(1.0));
        state.push(Value::from("x"));
        assert_eq!(
            state.order_error().message(),
            "attempt to compare number with string"
        );
        state.push(Value::from("y"));
        assert_eq!(
            state.order_error().message(),
            "attempt to compare two string values"
        );
    }

    #[test]
    fn test_unnamed_type_error() {
        let mut state = State::new();
        state.push(Value::Nil);
        assert_eq!(
            state.type_error(0, "call").message(),
            "attempt to call a nil value"
        );
    }

    #[test]
    fn test_long_operation_is_clipped() {
        let mut state = State::new();
        state.push(Value::Nil);
        let op = "x".repeat(50);
        let msg = state.type_error(0, &op).to_string();
        assert_eq!(msg, format!("attempt to {} a nil value", "x".repeat(30)));
    }

    #[test]
    fn test_bin_error_blames_second_operand() {
        let mut state = State::new();
        state.push(Value::Number(1.0));
        state.push(Value::Nil);
        assert_eq!(
            state.bin_error(0, "number", "perform arithmetic on").message(),
            "attempt to perform arithmetic on a nil value"
        );
    }
}
