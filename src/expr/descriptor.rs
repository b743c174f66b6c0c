//! Member and method descriptors
//!
//! A descriptor is the capability a tree node carries for touching the host
//! world: a named closure that reads a field/property or invokes a method on
//! an evaluated value. Instance descriptors require a target; static ones
//! take none. The split is part of the node contract — an instance
//! descriptor reached with no target is a malformed node, reported loudly,
//! never a quiet miss.
//!
//! Failures raised inside the closures (missing member, accessor blew up,
//! method panicked into an error) come back as [`EvalError`] values and
//! propagate through evaluation unchanged.

use std::fmt;
use std::sync::Arc;

use crate::diagnostics::EvalError;
use crate::interp::Value;

type ReadFn = dyn Fn(Option<&Value>) -> Result<Value, EvalError> + Send + Sync;
type InvokeFn = dyn Fn(Option<&Value>, &[Value]) -> Result<Value, EvalError> + Send + Sync;

/// Instance vs static binding of a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Instance,
    Static,
}

/// Named read capability for a field or property
#[derive(Clone)]
pub struct MemberDescriptor {
    name: Arc<str>,
    binding: Binding,
    read: Arc<ReadFn>,
}

impl MemberDescriptor {
    /// Member read off an instance
    pub fn instance(
        name: impl Into<Arc<str>>,
        read: impl Fn(&Value) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        let member = name.clone();
        MemberDescriptor {
            name,
            binding: Binding::Instance,
            read: Arc::new(move |target| match target {
                Some(value) => read(value),
                None => Err(EvalError::malformed(
                    "MemberAccess",
                    format!("instance member `{member}` read with no target"),
                )),
            }),
        }
    }

    /// Member read off a type, taking no target
    pub fn static_member(
        name: impl Into<Arc<str>>,
        read: impl Fn() -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Self {
        MemberDescriptor {
            name: name.into(),
            binding: Binding::Static,
            read: Arc::new(move |_| read()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_static(&self) -> bool {
        self.binding == Binding::Static
    }

    /// Read the member off `target` (ignored by static members)
    pub fn read(&self, target: Option<&Value>) -> Result<Value, EvalError> {
        (self.read)(target)
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

/// Named invocation capability for a method
#[derive(Clone)]
pub struct MethodDescriptor {
    name: Arc<str>,
    binding: Binding,
    invoke: Arc<InvokeFn>,
}

impl MethodDescriptor {
    /// Method invoked on an instance, with ordered arguments
    pub fn instance(
        name: impl Into<Arc<str>>,
        invoke: impl Fn(&Value, &[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        let method = name.clone();
        MethodDescriptor {
            name,
            binding: Binding::Instance,
            invoke: Arc::new(move |target, args| match target {
                Some(value) => invoke(value, args),
                None => Err(EvalError::malformed(
                    "Call",
                    format!("instance method `{method}` invoked with no target"),
                )),
            }),
        }
    }

    /// Static method, taking no target
    pub fn static_method(
        name: impl Into<Arc<str>>,
        invoke: impl Fn(&[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Self {
        MethodDescriptor {
            name: name.into(),
            binding: Binding::Static,
            invoke: Arc::new(move |_, args| invoke(args)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_static(&self) -> bool {
        self.binding == Binding::Static
    }

    /// Invoke the method with the evaluated target and arguments
    pub fn invoke(&self, target: Option<&Value>, args: &[Value]) -> Result<Value, EvalError> {
        (self.invoke)(target, args)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}
