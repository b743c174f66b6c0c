//! Unbound-variable detection
//!
//! A tree with a free parameter has no single value under any strategy, so
//! the evaluator asks this collaborator before ever reaching for the
//! compiled fallback. The trait keeps the policy pluggable;
//! [`FreeVariableScanner`] is the stock implementation: a read-only walk
//! with a scope stack of lambda-bound names.

use crate::expr::{Expr, ExprRef};

/// Pure predicate over a tree: does it reference any unbound variable?
pub trait FreeVariableDetector {
    fn has_unbound_variables(&self, tree: &ExprRef) -> bool;
}

/// Stock detector: walks the tree, treating a parameter as bound only when
/// an enclosing lambda declares it
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeVariableScanner;

impl FreeVariableDetector for FreeVariableScanner {
    fn has_unbound_variables(&self, tree: &ExprRef) -> bool {
        scan(tree, &mut Vec::new())
    }
}

fn scan(node: &ExprRef, bound: &mut Vec<std::sync::Arc<str>>) -> bool {
    match &**node {
        Expr::Constant(_) => false,

        Expr::Parameter(name) => !bound.iter().any(|b| b == name),

        // Quoted subtrees are data, but their parameters still need binding
        // before the tree as a whole can have a value.
        Expr::Quote(child) => scan(child, bound),

        Expr::Member { target, .. } => target.as_ref().is_some_and(|t| scan(t, bound)),

        Expr::Call { target, args, .. } => {
            target.as_ref().is_some_and(|t| scan(t, bound))
                || args.iter().any(|arg| scan(arg, bound))
        }

        Expr::Lambda(lambda) => {
            let depth = bound.len();
            bound.extend(lambda.params.iter().cloned());
            let free = scan(&lambda.body, bound);
            bound.truncate(depth);
            free
        }

        Expr::Extension(ext) => ext.children().iter().any(|child| scan(child, bound)),
    }
}
