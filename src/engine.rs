//! Script engine binding expressions to a variable scope.
//!
//! Each statement of a script is parsed, resolved against the types of the
//! current bindings, evaluated against their values and assigned, so later
//! statements see earlier results.

pub mod bindings;
pub mod error;

pub use bindings::{Binding, Bindings};
pub use error::{ScriptError, ScriptResult};

use crate::config::EngineConfig;
use crate::expression::{ExpressionVisitor, FunctionTable, ResolvableExpression};
use crate::script::{Assignment, Parser};
use crate::types::{DataType, Value};
use anyhow::Context as _;
use log::debug;
use parking_lot::RwLock;
use std::path::Path;

/// Evaluates scripts against a shared set of bindings.
///
/// Bindings sit behind a lock so one engine can be shared between threads.
/// A script either runs to completion or leaves the bindings untouched.
pub struct ScriptEngine {
    config: EngineConfig,
    functions: FunctionTable,
    bindings: RwLock<Bindings>,
}

impl ScriptEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            functions: FunctionTable::standard(),
            bindings: RwLock::new(Bindings::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run every statement of `script` in order
    pub fn eval(&self, script: &str) -> ScriptResult<()> {
        let script = Parser::with_config(script, &self.config)?.parse_script()?;
        debug!("running script with {} statements", script.statements.len());

        let mut bindings = self.bindings.write();
        let mut scope = bindings.clone();
        for statement in &script.statements {
            self.execute(statement, &mut scope)?;
        }
        *bindings = scope;
        Ok(())
    }

    fn execute(&self, statement: &Assignment, scope: &mut Bindings) -> ScriptResult<()> {
        let symbols = scope.symbols();
        let visitor = ExpressionVisitor::with_config(&symbols, &self.functions, &self.config);
        let expr = visitor.visit(&statement.expression)?;
        debug!(
            "{} := {} resolved as {}",
            statement.target,
            statement.expression.text(),
            expr.data_type()
        );

        let value = expr.resolve(&scope.context())?;
        debug!("{} = {}", statement.target, value);
        scope.assign(statement.target.clone(), expr.data_type(), value);
        Ok(())
    }

    /// Build a reusable tree for `source` against the current bindings
    pub fn compile(&self, source: &str) -> ScriptResult<ResolvableExpression> {
        let expr = Parser::with_config(source, &self.config)?.parse_standalone_expression()?;
        let symbols = self.bindings.read().symbols();
        let visitor = ExpressionVisitor::with_config(&symbols, &self.functions, &self.config);
        Ok(visitor.visit(&expr)?)
    }

    /// Compile `source` and evaluate it against the current bindings
    pub fn evaluate(&self, source: &str) -> ScriptResult<Value> {
        let expr = self.compile(source)?;
        let context = self.bindings.read().context();
        Ok(expr.resolve(&context)?)
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.read().get(name).cloned()
    }

    pub fn data_type(&self, name: &str) -> Option<DataType> {
        self.bindings.read().data_type(name)
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.bindings.write().set(name, value);
    }

    pub fn declare(&self, name: impl Into<String>, data_type: DataType) {
        self.bindings.write().declare(name, data_type);
    }

    /// Copy of the current bindings
    pub fn bindings(&self) -> Bindings {
        self.bindings.read().clone()
    }
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a script file and run it on `engine`
pub fn run_script_file(engine: &ScriptEngine, path: &Path) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    engine
        .eval(&source)
        .with_context(|| format!("Failed to evaluate script {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{Context, ExpressionError};

    #[test]
    fn test_statements_see_earlier_results() {
        let engine = ScriptEngine::new();
        engine
            .eval("a := 1; b := a + 2.5; c := upper(\"x\") || \"y\"")
            .unwrap();

        assert_eq!(engine.get("a"), Some(Value::Integer(1)));
        assert_eq!(engine.get("b"), Some(Value::Number(3.5)));
        assert_eq!(engine.data_type("b"), Some(DataType::Number));
        assert_eq!(engine.get("c"), Some(Value::from("Xy")));
    }

    #[test]
    fn test_failed_script_leaves_bindings() {
        let engine = ScriptEngine::new();
        engine.set("a", 1);

        let err = engine.eval("a := 2; b := missing").unwrap_err();
        assert_eq!(err.to_string(), "undefined variable missing");
        assert!(matches!(
            err,
            ScriptError::Semantic(ExpressionError::UndefinedVariable { .. })
        ));
        assert_eq!(engine.get("a"), Some(Value::Integer(1)));
        assert_eq!(engine.get("b"), None);
    }

    #[test]
    fn test_declared_types_survive_null() {
        let engine = ScriptEngine::new();
        engine.declare("n", DataType::Integer);
        engine.eval("m := n * 2").unwrap();

        assert_eq!(engine.get("m"), Some(Value::Null));
        assert_eq!(engine.data_type("m"), Some(DataType::Integer));
    }

    #[test]
    fn test_compile_and_reuse() {
        let engine = ScriptEngine::new();
        engine.set("x", 0);
        let expr = engine.compile("x > 10").unwrap();

        for (x, expected) in [(5, false), (11, true)] {
            let context = Context::new().with("x", x);
            assert_eq!(expr.resolve(&context).unwrap(), Value::Boolean(expected));
        }
        assert_eq!(engine.evaluate("x + 1").unwrap(), Value::Integer(1));
    }

    #[test]
    fn test_configured_depth() {
        let engine = ScriptEngine::with_config(EngineConfig::with_max_depth(4));
        assert!(engine.eval("a := ((((((1))))))").is_err());
        assert!(engine.eval("a := 1").is_ok());
    }

    #[test]
    fn test_parse_errors() {
        let engine = ScriptEngine::new();
        let err = engine.eval("a 1").unwrap_err();
        assert!(matches!(err, ScriptError::Parse(_)));
        assert_eq!(
            err.to_string(),
            "expected ':=', found number 1 at line 1, column 3"
        );
    }
}
