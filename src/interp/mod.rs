//! Direct interpretation of expression trees
//!
//! The fast path: a recursive dispatch over node kinds that either produces
//! a value or reports a miss, without ever compiling anything.

pub mod arith;
pub mod eval;
pub mod value;

pub use arith::ArithInterpreter;
pub use eval::{BaseInterpreter, Interpreter, base_dispatch, base_lambda, base_member};
pub use value::{Interpreted, Value};
