//! Runtime values and interpretation outcomes

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::expr::ExprRef;

/// Runtime value
#[derive(Clone)]
pub enum Value {
    /// Unit value, for methods that return nothing
    Unit,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// String
    Str(String),
    /// An expression tree held as data (quoted subtrees, expression-typed
    /// lambdas); compares by node identity
    Tree(ExprRef),
    /// Arbitrary host object; compares by pointer identity
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wrap a host object
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Value::Opaque(Arc::new(value))
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Tree(_) => "tree",
            Value::Opaque(_) => "opaque",
        }
    }

    /// Check if value is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Unit => false,
            _ => true,
        }
    }

    /// Try to get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as float (integers widen)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as an expression tree
    pub fn as_tree(&self) -> Option<&ExprRef> {
        match self {
            Value::Tree(node) => Some(node),
            _ => None,
        }
    }

    /// Try to downcast an opaque host object
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Opaque(any) => any.downcast_ref(),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Tree(node) => write!(f, "<tree {}>", node.kind_name()),
            Value::Opaque(_) => write!(f, "<opaque>"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            other => write!(f, "{:?}", other),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Tree(a), Value::Tree(b)) => Arc::ptr_eq(a, b),
            (Value::Opaque(a), Value::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Outcome of direct interpretation
///
/// A miss means "this node cannot be interpreted without compiling"; it is
/// ordinary data, not an error, and the caller decides what happens next.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpreted {
    /// The node's value
    Value(Value),
    /// Node kind unsupported, or a required child itself missed
    Miss,
}

impl Interpreted {
    pub fn is_miss(&self) -> bool {
        matches!(self, Interpreted::Miss)
    }

    /// Extract the value, if any
    pub fn into_value(self) -> Option<Value> {
        match self {
            Interpreted::Value(v) => Some(v),
            Interpreted::Miss => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;

    #[test]
    fn trees_compare_by_identity() {
        let node = Expr::constant(1i64);
        assert_eq!(Value::Tree(node.clone()), Value::Tree(node.clone()));
        assert_ne!(Value::Tree(node), Value::Tree(Expr::constant(1i64)));
    }

    #[test]
    fn opaque_downcast() {
        let value = Value::opaque(vec![1u8, 2, 3]);
        assert_eq!(value.downcast_ref::<Vec<u8>>().unwrap().len(), 3);
        assert!(value.downcast_ref::<String>().is_none());
    }

    #[test]
    fn int_widens_to_float() {
        assert_eq!(Value::Int(2).as_float(), Some(2.0));
        assert_eq!(Value::Str("x".into()).as_float(), None);
    }
}
