//! Arithmetic and logic widening of the base interpreter
//!
//! [`BinaryExpr`] and [`UnaryExpr`] are extension nodes the base interpreter
//! knows nothing about; [`ArithInterpreter`] recognizes them, evaluates
//! their operands through its own dispatch (so nesting composes), and hands
//! every other kind back to [`base_dispatch`]. Operand type combinations it
//! cannot handle are a miss, leaving them for the compiled fallback.

use std::any::Any;

use crate::diagnostics::EvalError;
use crate::expr::{Expr, ExprRef, ExtensionNode};

use super::eval::{Interpreter, base_dispatch};
use super::value::{Interpreted, Value};

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Binary operation extension node
#[derive(Debug)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: ExprRef,
    pub right: ExprRef,
}

impl BinaryExpr {
    pub fn new(op: BinaryOp, left: ExprRef, right: ExprRef) -> ExprRef {
        Expr::extension(BinaryExpr { op, left, right })
    }
}

impl ExtensionNode for BinaryExpr {
    fn kind_name(&self) -> &str {
        "Binary"
    }

    fn children(&self) -> Vec<ExprRef> {
        vec![self.left.clone(), self.right.clone()]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Unary operation extension node
#[derive(Debug)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: ExprRef,
}

impl UnaryExpr {
    pub fn new(op: UnaryOp, operand: ExprRef) -> ExprRef {
        Expr::extension(UnaryExpr { op, operand })
    }
}

impl ExtensionNode for UnaryExpr {
    fn kind_name(&self) -> &str {
        "Unary"
    }

    fn children(&self) -> Vec<ExprRef> {
        vec![self.operand.clone()]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Interpreter supporting the base kinds plus binary/unary operations
#[derive(Debug, Clone, Copy, Default)]
pub struct ArithInterpreter;

impl Interpreter for ArithInterpreter {
    fn try_interpret(&self, node: &ExprRef) -> Result<Interpreted, EvalError> {
        if let Expr::Extension(ext) = &**node {
            if let Some(binary) = ext.as_any().downcast_ref::<BinaryExpr>() {
                return self.interpret_binary(binary);
            }
            if let Some(unary) = ext.as_any().downcast_ref::<UnaryExpr>() {
                return self.interpret_unary(unary);
            }
        }
        base_dispatch(self, node)
    }
}

impl ArithInterpreter {
    fn interpret_binary(&self, node: &BinaryExpr) -> Result<Interpreted, EvalError> {
        let lhs = match self.try_interpret(&node.left)? {
            Interpreted::Value(v) => v,
            Interpreted::Miss => return Ok(Interpreted::Miss),
        };

        // Short-circuit for And/Or: the right operand is only evaluated
        // when the left operand does not decide the result.
        match node.op {
            BinaryOp::And => {
                if !lhs.is_truthy() {
                    return Ok(Interpreted::Value(Value::Bool(false)));
                }
                return Ok(match self.try_interpret(&node.right)? {
                    Interpreted::Value(rhs) => Interpreted::Value(Value::Bool(rhs.is_truthy())),
                    Interpreted::Miss => Interpreted::Miss,
                });
            }
            BinaryOp::Or => {
                if lhs.is_truthy() {
                    return Ok(Interpreted::Value(Value::Bool(true)));
                }
                return Ok(match self.try_interpret(&node.right)? {
                    Interpreted::Value(rhs) => Interpreted::Value(Value::Bool(rhs.is_truthy())),
                    Interpreted::Miss => Interpreted::Miss,
                });
            }
            _ => {}
        }

        let rhs = match self.try_interpret(&node.right)? {
            Interpreted::Value(v) => v,
            Interpreted::Miss => return Ok(Interpreted::Miss),
        };
        apply_binary(node.op, lhs, rhs)
    }

    fn interpret_unary(&self, node: &UnaryExpr) -> Result<Interpreted, EvalError> {
        let value = match self.try_interpret(&node.operand)? {
            Interpreted::Value(v) => v,
            Interpreted::Miss => return Ok(Interpreted::Miss),
        };

        let result = match (node.op, value) {
            (UnaryOp::Neg, Value::Int(n)) => Value::Int(-n),
            (UnaryOp::Neg, Value::Float(f)) => Value::Float(-f),
            (UnaryOp::Not, Value::Bool(b)) => Value::Bool(!b),
            (UnaryOp::Not, Value::Int(n)) => Value::Int(!n),
            _ => return Ok(Interpreted::Miss),
        };
        Ok(Interpreted::Value(result))
    }
}

/// Int/float pair with promotion, only when at least one side is a float
fn float_pair(lhs: &Value, rhs: &Value) -> Option<(f64, f64)> {
    if matches!(lhs, Value::Float(_)) || matches!(rhs, Value::Float(_)) {
        Some((lhs.as_float()?, rhs.as_float()?))
    } else {
        None
    }
}

fn apply_binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Interpreted, EvalError> {
    let result = match op {
        BinaryOp::Add => match (&lhs, &rhs) {
            (Value::Int(a), Value::Int(b)) => Some(Value::Int(a + b)),
            (Value::Str(a), Value::Str(b)) => Some(Value::Str(format!("{a}{b}"))),
            _ => float_pair(&lhs, &rhs).map(|(a, b)| Value::Float(a + b)),
        },
        BinaryOp::Sub => match (&lhs, &rhs) {
            (Value::Int(a), Value::Int(b)) => Some(Value::Int(a - b)),
            _ => float_pair(&lhs, &rhs).map(|(a, b)| Value::Float(a - b)),
        },
        BinaryOp::Mul => match (&lhs, &rhs) {
            (Value::Int(a), Value::Int(b)) => Some(Value::Int(a * b)),
            _ => float_pair(&lhs, &rhs).map(|(a, b)| Value::Float(a * b)),
        },
        BinaryOp::Div => match (&lhs, &rhs) {
            (Value::Int(_), Value::Int(0)) => {
                return Err(EvalError::runtime("division by zero"));
            }
            (Value::Int(a), Value::Int(b)) => Some(Value::Int(a / b)),
            _ => float_pair(&lhs, &rhs).map(|(a, b)| Value::Float(a / b)),
        },
        BinaryOp::Rem => match (&lhs, &rhs) {
            (Value::Int(_), Value::Int(0)) => {
                return Err(EvalError::runtime("division by zero"));
            }
            (Value::Int(a), Value::Int(b)) => Some(Value::Int(a % b)),
            _ => float_pair(&lhs, &rhs).map(|(a, b)| Value::Float(a % b)),
        },
        BinaryOp::Eq => Some(Value::Bool(lhs == rhs)),
        BinaryOp::Ne => Some(Value::Bool(lhs != rhs)),
        BinaryOp::Lt => compare(&lhs, &rhs, |o| o.is_lt()),
        BinaryOp::Le => compare(&lhs, &rhs, |o| o.is_le()),
        BinaryOp::Gt => compare(&lhs, &rhs, |o| o.is_gt()),
        BinaryOp::Ge => compare(&lhs, &rhs, |o| o.is_ge()),
        // Handled before operand evaluation
        BinaryOp::And | BinaryOp::Or => unreachable!("short-circuit ops reach apply_binary"),
    };

    Ok(match result {
        Some(value) => Interpreted::Value(value),
        None => Interpreted::Miss,
    })
}

fn compare(lhs: &Value, rhs: &Value, pick: impl Fn(std::cmp::Ordering) -> bool) -> Option<Value> {
    let ordering = match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        _ => {
            let (a, b) = float_pair(lhs, rhs)?;
            a.partial_cmp(&b)?
        }
    };
    Some(Value::Bool(pick(ordering)))
}
