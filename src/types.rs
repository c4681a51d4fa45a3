//! Type system shared by the expression engine.
//!
//! - **DataType**: the static type every typed expression declares
//! - **Value**: the runtime representation of each type
//!
//! The only implicit conversion is the widening of `Integer` to `Number`.

pub mod value;

pub use value::{DataType, Value};
