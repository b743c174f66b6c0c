//! Recursive node-dispatch interpreter
//!
//! [`Interpreter`] is the extension contract: three override points
//! (top-level dispatch, member handler, lambda handler), each defaulting to
//! the base behavior. A specialized interpreter widens the supported node
//! set by overriding [`Interpreter::try_interpret`] and delegating anything
//! it does not recognize back to [`base_dispatch`]; because every recursive
//! step goes through `self.try_interpret`, the widened dispatch applies all
//! the way down the tree.
//!
//! Unsupported kinds are a miss, never an error. Errors are reserved for
//! contract violations and for failures raised by descriptors themselves.

use crate::diagnostics::EvalError;
use crate::expr::{Expr, ExprRef, Lambda, LambdaType, MemberDescriptor, MethodDescriptor};

use super::value::{Interpreted, Value};

/// The node interpreter extension contract
pub trait Interpreter {
    /// Top-level dispatch over node kinds
    fn try_interpret(&self, node: &ExprRef) -> Result<Interpreted, EvalError> {
        base_dispatch(self, node)
    }

    /// Member-access handler
    fn interpret_member(
        &self,
        target: Option<&ExprRef>,
        member: &MemberDescriptor,
    ) -> Result<Interpreted, EvalError> {
        base_member(self, target, member)
    }

    /// Lambda handler; `node` is the lambda node itself
    fn interpret_lambda(&self, node: &ExprRef, lambda: &Lambda) -> Result<Interpreted, EvalError> {
        base_lambda(node, lambda)
    }
}

/// Interpreter supporting exactly the base node kinds
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseInterpreter;

impl Interpreter for BaseInterpreter {}

/// Base dispatch over the closed node kinds
///
/// Specialized interpreters call this from their own `try_interpret` for
/// every node they do not specially handle.
pub fn base_dispatch<I: Interpreter + ?Sized>(
    interp: &I,
    node: &ExprRef,
) -> Result<Interpreted, EvalError> {
    match &**node {
        Expr::Constant(value) => Ok(Interpreted::Value(value.clone())),

        // The child is the value. It is never evaluated further: a quote
        // means "this expression", not "its result".
        Expr::Quote(child) => Ok(Interpreted::Value(Value::Tree(child.clone()))),

        Expr::Member { target, member } => interp.interpret_member(target.as_ref(), member),

        Expr::Call {
            target,
            method,
            args,
        } => interpret_call(interp, target.as_ref(), method, args),

        Expr::Lambda(lambda) => interp.interpret_lambda(node, lambda),

        Expr::Parameter(_) | Expr::Extension(_) => {
            tracing::trace!(kind = node.kind_name(), "unsupported node kind, miss");
            Ok(Interpreted::Miss)
        }
    }
}

/// Base member-access behavior: a target miss is a node miss; descriptor
/// read failures propagate unchanged.
pub fn base_member<I: Interpreter + ?Sized>(
    interp: &I,
    target: Option<&ExprRef>,
    member: &MemberDescriptor,
) -> Result<Interpreted, EvalError> {
    let target_value = match interpret_target(interp, target)? {
        Target::Value(v) => v,
        Target::Miss => return Ok(Interpreted::Miss),
    };
    member.read(target_value.as_ref()).map(Interpreted::Value)
}

/// Base lambda behavior: a lambda declared as an expression tree is its own
/// value; an invocable lambda misses, since calling it needs real parameter
/// binding and therefore compilation.
pub fn base_lambda(node: &ExprRef, lambda: &Lambda) -> Result<Interpreted, EvalError> {
    match lambda.ty {
        LambdaType::Expression => Ok(Interpreted::Value(Value::Tree(node.clone()))),
        LambdaType::Function => Ok(Interpreted::Miss),
    }
}

fn interpret_call<I: Interpreter + ?Sized>(
    interp: &I,
    target: Option<&ExprRef>,
    method: &MethodDescriptor,
    args: &[ExprRef],
) -> Result<Interpreted, EvalError> {
    let target_value = match interpret_target(interp, target)? {
        Target::Value(v) => v,
        Target::Miss => return Ok(Interpreted::Miss),
    };

    // Strictly left to right; the first miss stops evaluation, so no later
    // argument is ever touched.
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        match interp.try_interpret(arg)? {
            Interpreted::Value(v) => values.push(v),
            Interpreted::Miss => return Ok(Interpreted::Miss),
        }
    }

    method
        .invoke(target_value.as_ref(), &values)
        .map(Interpreted::Value)
}

/// Interpreted target of a member access or call
enum Target {
    /// `None` inside means "no target": static access
    Value(Option<Value>),
    Miss,
}

fn interpret_target<I: Interpreter + ?Sized>(
    interp: &I,
    target: Option<&ExprRef>,
) -> Result<Target, EvalError> {
    match target {
        // An absent target is trivially interpretable: its value is the
        // absence itself.
        None => Ok(Target::Value(None)),
        Some(node) => match interp.try_interpret(node)? {
            Interpreted::Value(v) => Ok(Target::Value(Some(v))),
            Interpreted::Miss => Ok(Target::Miss),
        },
    }
}
