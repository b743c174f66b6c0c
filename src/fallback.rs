//! Compiled-execution fallback seam
//!
//! When direct interpretation misses and the tree is closed, the evaluator
//! hands the *whole* tree to a [`CompiledExecutor`]: conceptually, compile
//! it as a zero-argument callable and run it. How that happens is the
//! executor's business; its errors propagate to the caller unchanged.

use crate::diagnostics::EvalError;
use crate::expr::ExprRef;
use crate::interp::Value;

/// Compile a parameter-free tree into executable code and run it
pub trait CompiledExecutor {
    fn compile_and_run(&self, tree: &ExprRef) -> Result<Value, EvalError>;
}

impl<F> CompiledExecutor for F
where
    F: Fn(&ExprRef) -> Result<Value, EvalError>,
{
    fn compile_and_run(&self, tree: &ExprRef) -> Result<Value, EvalError> {
        self(tree)
    }
}
