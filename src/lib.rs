//! Partial evaluator for pure expression trees
//!
//! Given an immutable expression tree, produce its runtime value while
//! skipping compilation whenever a lightweight recursive interpreter can
//! finish the job. When the interpreter misses — an unsupported node kind
//! anywhere on the required path — the tree falls back to a caller-supplied
//! compile-and-execute strategy, but only when it is free of unbound
//! variables; open trees have no value and are rejected.
//!
//! # Architecture
//!
//! ```text
//! caller → Evaluator → Interpreter (fast path)
//!                         └─ miss → FreeVariableDetector → CompiledExecutor
//! ```
//!
//! # Example
//!
//! ```
//! use preval::{EvalError, Evaluator, Expr, ExprRef, MethodDescriptor, Value};
//!
//! fn no_compiler(_tree: &ExprRef) -> Result<Value, EvalError> {
//!     Err(EvalError::runtime("no compiler wired"))
//! }
//!
//! let len = MethodDescriptor::instance("len", |target, _args| match target {
//!     Value::Str(s) => Ok(Value::Int(s.len() as i64)),
//!     other => Err(EvalError::runtime(format!("no len on {}", other.type_name()))),
//! });
//! let tree = Expr::call(Expr::constant("hello"), len, vec![]);
//!
//! // The stub executor never runs: the tree interprets directly.
//! let evaluator = Evaluator::new(no_compiler);
//! assert_eq!(evaluator.evaluate(&tree).unwrap(), Value::Int(5));
//! ```

pub mod diagnostics;
pub mod evaluator;
pub mod expr;
pub mod fallback;
pub mod free_vars;
pub mod interp;

// Re-exports for convenience
pub use diagnostics::EvalError;
pub use evaluator::Evaluator;
pub use expr::{Expr, ExprRef, ExtensionNode, Lambda, LambdaType, MemberDescriptor, MethodDescriptor};
pub use fallback::CompiledExecutor;
pub use free_vars::{FreeVariableDetector, FreeVariableScanner};
pub use interp::{ArithInterpreter, BaseInterpreter, Interpreted, Interpreter, Value};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directly interpret a tree with the base interpreter, without any
/// fallback policy
pub fn interpret(tree: &ExprRef) -> Result<Interpreted, EvalError> {
    BaseInterpreter.try_interpret(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn top_level_interpret_uses_the_base_kinds() {
        assert_eq!(
            interpret(&Expr::constant(3i64)).unwrap(),
            Interpreted::Value(Value::Int(3))
        );
        assert!(interpret(&Expr::parameter("x")).unwrap().is_miss());
    }
}
