//! Evaluator facade
//!
//! Composition of the three pieces: try the node interpreter first; on a
//! miss, reject trees with unbound variables; otherwise hand the whole tree
//! to the compiled fallback. The facade is deliberately dumb — all policy
//! lives here and nowhere else, so a specialized interpreter reuses it
//! unchanged by swapping in a different `I`.
//!
//! Evaluators are explicit caller-constructed values. There is no process
//! default and nothing mutable to configure after construction.

use crate::diagnostics::EvalError;
use crate::expr::ExprRef;
use crate::fallback::CompiledExecutor;
use crate::free_vars::{FreeVariableDetector, FreeVariableScanner};
use crate::interp::{BaseInterpreter, Interpreted, Interpreter, Value};

/// Partial evaluator: direct interpretation with a compiled fallback
#[derive(Debug, Clone)]
pub struct Evaluator<I, D, X> {
    interpreter: I,
    detector: D,
    executor: X,
}

impl<X: CompiledExecutor> Evaluator<BaseInterpreter, FreeVariableScanner, X> {
    /// Evaluator over the base node kinds with the stock scanner
    pub fn new(executor: X) -> Self {
        Evaluator {
            interpreter: BaseInterpreter,
            detector: FreeVariableScanner,
            executor,
        }
    }
}

impl<I, X> Evaluator<I, FreeVariableScanner, X>
where
    I: Interpreter,
    X: CompiledExecutor,
{
    /// Evaluator with a specialized interpreter and the stock scanner
    pub fn with_interpreter(interpreter: I, executor: X) -> Self {
        Evaluator {
            interpreter,
            detector: FreeVariableScanner,
            executor,
        }
    }
}

impl<I, D, X> Evaluator<I, D, X>
where
    I: Interpreter,
    D: FreeVariableDetector,
    X: CompiledExecutor,
{
    /// Evaluator with every collaborator supplied explicitly
    pub fn with_parts(interpreter: I, detector: D, executor: X) -> Self {
        Evaluator {
            interpreter,
            detector,
            executor,
        }
    }

    /// Evaluate `tree`, reporting `None` when it contains unbound variables
    ///
    /// Direct interpretation is attempted first; the fallback only runs
    /// when interpretation misses and the tree is closed. Errors from
    /// descriptors or the fallback propagate unchanged.
    pub fn try_evaluate(&self, tree: &ExprRef) -> Result<Option<Value>, EvalError> {
        match self.interpreter.try_interpret(tree)? {
            Interpreted::Value(value) => {
                tracing::trace!(kind = tree.kind_name(), "evaluated directly");
                Ok(Some(value))
            }
            Interpreted::Miss => {
                if self.detector.has_unbound_variables(tree) {
                    tracing::debug!(
                        kind = tree.kind_name(),
                        "tree has unbound variables, not evaluable"
                    );
                    return Ok(None);
                }
                tracing::debug!(kind = tree.kind_name(), "falling back to compiled execution");
                self.executor.compile_and_run(tree).map(Some)
            }
        }
    }

    /// Evaluate `tree`, failing when it contains unbound variables
    pub fn evaluate(&self, tree: &ExprRef) -> Result<Value, EvalError> {
        self.try_evaluate(tree)?.ok_or(EvalError::UnboundVariables)
    }
}
