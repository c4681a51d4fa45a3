pub mod config;
pub mod engine;
pub mod expression;
pub mod script;
pub mod types;

pub use config::EngineConfig;
pub use engine::{ScriptEngine, ScriptError};
pub use expression::{resolve_expression, ResolvableExpression};
pub use types::{DataType, Value};
