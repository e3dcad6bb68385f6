//! Ordered tables
//!
//! Entries keep insertion order so traversals, and therefore the names the
//! debug core reports when several bindings hold the same value, are
//! deterministic.

use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared, mutable table handle
pub type TableRef = Rc<RefCell<Table>>;

#[derive(Debug, Default)]
pub struct Table {
    entries: Vec<(Value, Value)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_ref() -> TableRef {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Value stored under `key`, nil when absent
    pub fn get(&self, key: &Value) -> Value {
        self.position(key)
            .map(|idx| self.entries[idx].1.clone())
            .unwrap_or(Value::Nil)
    }

    /// Store `value` under `key`; storing nil removes the entry
    pub fn set(&mut self, key: Value, value: Value) {
        assert!(!key.is_nil(), "table index is nil");
        match (self.position(&key), value.is_nil()) {
            (Some(idx), true) => {
                self.entries.remove(idx);
            }
            (Some(idx), false) => self.entries[idx].1 = value,
            (None, true) => {}
            (None, false) => self.entries.push((key, value)),
        }
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &Value) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k.raw_equal(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut t = Table::new();
        t.set(Value::from("a"), Value::Number(1.0));
        t.set(Value::from("b"), Value::Number(2.0));
        t.set(Value::from("a"), Value::Number(3.0));
        assert!(t.get(&Value::from("a")).raw_equal(&Value::Number(3.0)));
        assert_eq!(t.len(), 2);

        t.set(Value::from("a"), Value::Nil);
        assert!(t.get(&Value::from("a")).is_nil());
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let mut t = Table::new();
        for key in ["z", "a", "m"] {
            t.set(Value::from(key), Value::Number(0.0));
        }
        let keys: Vec<String> = t
            .iter()
            .map(|(k, _)| match k {
                Value::String(s) => s.to_string(),
                other => panic!("unexpected key {:?}", other),
            })
            .collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    #[should_panic(expected = "table index is nil")]
    fn test_nil_key_rejected() {
        Table::new().set(Value::Nil, Value::Number(1.0));
    }
}
