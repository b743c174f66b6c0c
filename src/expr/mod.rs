//! Immutable expression trees
//!
//! Nodes are built once by the caller and shared through [`ExprRef`]
//! (`Arc<Expr>`), so a quoted subtree or an expression-typed lambda can be
//! handed back *as a value* with its identity intact. A node's kind fixes
//! the shape of its children; evaluation only ever borrows a tree and never
//! mutates it.
//!
//! The base kinds are a closed enum. Everything else enters through
//! [`Expr::Extension`], which is opaque to the base interpreter and exists
//! for specialized interpreters to widen the supported set (see
//! [`crate::interp::arith`] for the arithmetic widening).

pub mod descriptor;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::interp::Value;

pub use descriptor::{MemberDescriptor, MethodDescriptor};

/// Shared handle to an immutable expression node
pub type ExprRef = Arc<Expr>;

/// An expression node
#[derive(Debug)]
pub enum Expr {
    /// Literal value; evaluates to itself
    Constant(Value),
    /// Wraps exactly one child; evaluates to the child node *unevaluated*
    Quote(ExprRef),
    /// Field or property read; `target` is absent for static members
    Member {
        target: Option<ExprRef>,
        member: MemberDescriptor,
    },
    /// Method invocation; `target` is absent for static calls
    Call {
        target: Option<ExprRef>,
        method: MethodDescriptor,
        args: Vec<ExprRef>,
    },
    /// Function literal, possibly denoting a tree value rather than a
    /// callable (see [`LambdaType`])
    Lambda(Lambda),
    /// Unbound variable reference
    Parameter(Arc<str>),
    /// Node kind unknown to the base interpreter
    Extension(Arc<dyn ExtensionNode>),
}

/// Body, parameter names, and declared type of a lambda node
#[derive(Debug)]
pub struct Lambda {
    pub params: Vec<Arc<str>>,
    pub body: ExprRef,
    pub ty: LambdaType,
}

/// What a lambda node's declared type says the node *is*
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LambdaType {
    /// An invocable function. Calling it needs real parameter binding, so
    /// the lightweight interpreter always misses on it.
    Function,
    /// An expression tree describing a function. The node is its own value,
    /// the same way a quote is.
    Expression,
}

/// A node kind the base interpreter does not know
///
/// Specialized interpreters recognize their own extension nodes by
/// downcasting through [`ExtensionNode::as_any`]. `children` exposes the
/// subtrees so that generic walks (the free-variable scanner in particular)
/// can still descend through kinds they cannot interpret.
pub trait ExtensionNode: fmt::Debug + Send + Sync + 'static {
    /// Short name of this kind, for diagnostics
    fn kind_name(&self) -> &str;

    /// Child subtrees, in evaluation order
    fn children(&self) -> Vec<ExprRef>;

    /// Downcasting hook for specialized interpreters
    fn as_any(&self) -> &dyn Any;
}

impl Expr {
    /// Literal node
    pub fn constant(value: impl Into<Value>) -> ExprRef {
        Arc::new(Expr::Constant(value.into()))
    }

    /// Quote node wrapping `child`
    pub fn quote(child: ExprRef) -> ExprRef {
        Arc::new(Expr::Quote(child))
    }

    /// Instance member read off `target`
    pub fn member(target: ExprRef, member: MemberDescriptor) -> ExprRef {
        Arc::new(Expr::Member {
            target: Some(target),
            member,
        })
    }

    /// Static member read (no target)
    pub fn static_member(member: MemberDescriptor) -> ExprRef {
        Arc::new(Expr::Member {
            target: None,
            member,
        })
    }

    /// Instance method call on `target`
    pub fn call(target: ExprRef, method: MethodDescriptor, args: Vec<ExprRef>) -> ExprRef {
        Arc::new(Expr::Call {
            target: Some(target),
            method,
            args,
        })
    }

    /// Static method call (no target)
    pub fn static_call(method: MethodDescriptor, args: Vec<ExprRef>) -> ExprRef {
        Arc::new(Expr::Call {
            target: None,
            method,
            args,
        })
    }

    /// Lambda node
    pub fn lambda<P: Into<Arc<str>>>(
        params: impl IntoIterator<Item = P>,
        body: ExprRef,
        ty: LambdaType,
    ) -> ExprRef {
        Arc::new(Expr::Lambda(Lambda {
            params: params.into_iter().map(Into::into).collect(),
            body,
            ty,
        }))
    }

    /// Unbound variable reference
    pub fn parameter(name: impl Into<Arc<str>>) -> ExprRef {
        Arc::new(Expr::Parameter(name.into()))
    }

    /// Extension node
    pub fn extension(node: impl ExtensionNode) -> ExprRef {
        Arc::new(Expr::Extension(Arc::new(node)))
    }

    /// Name of this node's kind, for diagnostics
    pub fn kind_name(&self) -> &str {
        match self {
            Expr::Constant(_) => "Constant",
            Expr::Quote(_) => "Quote",
            Expr::Member { .. } => "MemberAccess",
            Expr::Call { .. } => "Call",
            Expr::Lambda(_) => "Lambda",
            Expr::Parameter(_) => "Parameter",
            Expr::Extension(node) => node.kind_name(),
        }
    }
}
