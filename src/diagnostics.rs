//! Error taxonomy for evaluation
//!
//! A *miss* (unsupported node kind) is not an error and never appears here;
//! it travels as [`Interpreted::Miss`](crate::interp::Interpreted). This
//! module covers the conditions that do abort an evaluation: trees with
//! unbound variables, malformed nodes, and failures raised by descriptor
//! reads, method invocations, or the compiled fallback.

use miette::Diagnostic;
use thiserror::Error;

/// Evaluation failure
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum EvalError {
    /// The tree references parameters with no bound value, so it has no
    /// single value under either evaluation strategy.
    #[error("tree contains unbound variables")]
    #[diagnostic(
        code(preval::unbound_variables),
        help("bind every parameter before evaluating, or rewrite the tree without free variables")
    )]
    UnboundVariables,

    /// A node's declared kind does not match its actual shape, e.g. an
    /// instance member read with no target. Contract violation: fails
    /// immediately, never reported as a miss.
    #[error("malformed {kind} node: {detail}")]
    #[diagnostic(code(preval::malformed_node))]
    MalformedNode {
        kind: &'static str,
        detail: String,
    },

    /// Downstream failure raised by a member read, a method invocation, or
    /// the compiled fallback. Propagated unchanged: no retry, no wrapping.
    #[error("{message}")]
    #[diagnostic(code(preval::runtime))]
    Runtime { message: String },
}

impl EvalError {
    /// Contract-violation error for a node whose shape is wrong
    pub fn malformed(kind: &'static str, detail: impl Into<String>) -> Self {
        EvalError::MalformedNode {
            kind,
            detail: detail.into(),
        }
    }

    /// Downstream runtime failure (descriptor or fallback code)
    pub fn runtime(message: impl Into<String>) -> Self {
        EvalError::Runtime {
            message: message.into(),
        }
    }
}
