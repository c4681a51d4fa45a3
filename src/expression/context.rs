//! Name environments for the two phases of an expression's life.
//!
//! A [`SymbolTable`] maps names to types while a tree is built, a [`Context`]
//! maps the same names to values while it is evaluated.

use crate::types::{DataType, Value};
use std::collections::BTreeMap;

/// Name to type environment consulted while building a tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    types: BTreeMap<String, DataType>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: impl Into<String>, data_type: DataType) {
        self.types.insert(name.into(), data_type);
    }

    pub fn with(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.declare(name, data_type);
        self
    }

    pub fn get(&self, name: &str) -> Option<DataType> {
        self.types.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Name to value environment a built tree is evaluated against
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: BTreeMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_table() {
        let symbols = SymbolTable::new()
            .with("a", DataType::Integer)
            .with("b", DataType::String);

        assert_eq!(symbols.get("a"), Some(DataType::Integer));
        assert_eq!(symbols.get("b"), Some(DataType::String));
        assert_eq!(symbols.get("c"), None);
        assert!(symbols.contains("a"));
        assert_eq!(symbols.len(), 2);
    }

    #[test]
    fn test_context() {
        let mut context = Context::new().with("n", 1).with("s", "text");
        context.set("missing", Value::Null);

        assert_eq!(context.get("n"), Some(&Value::Integer(1)));
        assert_eq!(context.get("s"), Some(&Value::from("text")));
        assert_eq!(context.get("missing"), Some(&Value::Null));
        assert_eq!(context.get("other"), None);
        assert_eq!(context.len(), 3);
    }
}
