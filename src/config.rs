//! Engine configuration.

/// Default limit on expression nesting
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Settings shared by the parser and the expression visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum nesting depth of a single expression.
    ///
    /// Deeper expressions are rejected before recursion can exhaust the stack.
    pub max_depth: usize,
}

impl EngineConfig {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
