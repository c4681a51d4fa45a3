//! Typed variable scope shared by the statements of a script.

use crate::expression::{Context, SymbolTable};
use crate::types::{DataType, Value};
use std::collections::BTreeMap;

/// A variable's declared type and current value
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub data_type: DataType,
    pub value: Value,
}

/// Ordered mapping from variable names to bindings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    entries: BTreeMap<String, Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value, typed after the value itself
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let value = value.into();
        self.assign(name, value.data_type(), value);
    }

    /// Declare a variable of a known type holding null
    pub fn declare(&mut self, name: impl Into<String>, data_type: DataType) {
        self.assign(name, data_type, Value::Null);
    }

    /// Bind a value under an explicit declared type
    pub fn assign(&mut self, name: impl Into<String>, data_type: DataType, value: Value) {
        self.entries
            .insert(name.into(), Binding { data_type, value });
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name).map(|binding| &binding.value)
    }

    pub fn data_type(&self, name: &str) -> Option<DataType> {
        self.entries.get(name).map(|binding| binding.data_type)
    }

    /// Bindings in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.entries
            .iter()
            .map(|(name, binding)| (name.as_str(), binding))
    }

    pub fn symbols(&self) -> SymbolTable {
        let mut symbols = SymbolTable::new();
        for (name, binding) in &self.entries {
            symbols.declare(name.clone(), binding.data_type);
        }
        symbols
    }

    pub fn context(&self) -> Context {
        let mut context = Context::new();
        for (name, binding) in &self.entries {
            context.set(name.clone(), binding.value.clone());
        }
        context
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
