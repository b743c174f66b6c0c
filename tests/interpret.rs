//! Node interpreter integration tests
//!
//! Exercises the base dispatch per node kind, the miss contract, the
//! extension seam, and the left-to-right argument short-circuit.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pretty_assertions::assert_eq;
use preval::interp::base_dispatch;
use preval::{
    ArithInterpreter, BaseInterpreter, EvalError, Expr, ExprRef, ExtensionNode, Interpreted,
    Interpreter, LambdaType, MemberDescriptor, MethodDescriptor, Value,
};

/// Helper to interpret a tree with the base interpreter
fn interpret(tree: &ExprRef) -> Interpreted {
    BaseInterpreter
        .try_interpret(tree)
        .expect("interpretation should not error")
}

/// Helper to check a tree interprets to the expected value
fn assert_value(tree: &ExprRef, expected: Value) {
    match interpret(tree) {
        Interpreted::Value(v) => assert_eq!(v, expected),
        Interpreted::Miss => panic!("expected {:?}, got a miss", expected),
    }
}

/// Helper to check a tree misses
fn assert_miss(tree: &ExprRef) {
    assert!(interpret(tree).is_miss(), "expected a miss");
}

fn len_method() -> MethodDescriptor {
    MethodDescriptor::instance("len", |target, _args| match target {
        Value::Str(s) => Ok(Value::Int(s.len() as i64)),
        other => Err(EvalError::runtime(format!(
            "`len` not defined on {}",
            other.type_name()
        ))),
    })
}

fn concat_method() -> MethodDescriptor {
    MethodDescriptor::static_method("concat", |args| {
        let mut out = String::new();
        for arg in args {
            match arg {
                Value::Str(s) => out.push_str(s),
                other => return Err(EvalError::runtime(format!("not a string: {other}"))),
            }
        }
        Ok(Value::Str(out))
    })
}

fn pi_member() -> MemberDescriptor {
    MemberDescriptor::static_member("PI", || Ok(Value::Float(std::f64::consts::PI)))
}

// ==================== Constants and quotes ====================

#[test]
fn constant_int_round_trips() {
    assert_value(&Expr::constant(42i64), Value::Int(42));
}

#[test]
fn constant_string_round_trips() {
    assert_value(&Expr::constant("hello"), Value::Str("hello".into()));
}

#[test]
fn constant_opaque_round_trips_by_identity() {
    let obj = Value::opaque(vec![1u32, 2, 3]);
    assert_value(&Expr::constant(obj.clone()), obj);
}

#[test]
fn quote_returns_the_exact_child() {
    let child = Expr::constant(7i64);
    let value = interpret(&Expr::quote(child.clone()))
        .into_value()
        .unwrap();
    assert!(Arc::ptr_eq(value.as_tree().unwrap(), &child));
}

#[test]
fn quote_never_descends() {
    // A child the interpreter could not handle is still a fine quote value.
    let child = Expr::parameter("x");
    let value = interpret(&Expr::quote(child.clone()))
        .into_value()
        .unwrap();
    assert!(Arc::ptr_eq(value.as_tree().unwrap(), &child));
}

// ==================== Member access ====================

#[test]
fn instance_member_reads_off_the_evaluated_target() {
    let first = MemberDescriptor::instance("first", |target| match target {
        Value::Str(s) => Ok(Value::Str(s.chars().take(1).collect())),
        other => Err(EvalError::runtime(format!(
            "`first` not defined on {}",
            other.type_name()
        ))),
    });
    let tree = Expr::member(Expr::constant("hello"), first);
    assert_value(&tree, Value::Str("h".into()));
}

#[test]
fn static_member_needs_no_target() {
    let tree = Expr::static_member(pi_member());
    assert_value(&tree, Value::Float(std::f64::consts::PI));
}

#[test]
fn member_misses_when_its_target_misses() {
    let member = MemberDescriptor::instance("anything", |_| Ok(Value::Unit));
    let tree = Expr::member(Expr::parameter("x"), member);
    assert_miss(&tree);
}

#[test]
fn instance_member_with_absent_target_fails_loudly() {
    let member = MemberDescriptor::instance("len", |_| Ok(Value::Unit));
    let tree = Expr::static_member(member);
    let err = BaseInterpreter.try_interpret(&tree).unwrap_err();
    assert!(matches!(
        err,
        EvalError::MalformedNode {
            kind: "MemberAccess",
            ..
        }
    ));
}

#[test]
fn accessor_failure_propagates_unchanged() {
    let tree = Expr::member(
        Expr::constant(3i64),
        MemberDescriptor::instance("boom", |_| Err(EvalError::runtime("accessor exploded"))),
    );
    let err = BaseInterpreter.try_interpret(&tree).unwrap_err();
    assert_eq!(err, EvalError::runtime("accessor exploded"));
}

// ==================== Calls ====================

#[test]
fn instance_call_on_a_constant_target() {
    let tree = Expr::call(Expr::constant("hello"), len_method(), vec![]);
    assert_value(&tree, Value::Int(5));
}

#[test]
fn static_call_with_arguments() {
    let tree = Expr::static_call(
        concat_method(),
        vec![Expr::constant("foo"), Expr::constant("bar")],
    );
    assert_value(&tree, Value::Str("foobar".into()));
}

#[test]
fn call_misses_when_its_target_misses() {
    let tree = Expr::call(Expr::parameter("x"), len_method(), vec![]);
    assert_miss(&tree);
}

#[test]
fn call_misses_when_any_argument_misses() {
    let tree = Expr::static_call(
        concat_method(),
        vec![Expr::constant("a"), Expr::parameter("x")],
    );
    assert_miss(&tree);
}

#[test]
fn method_failure_propagates_unchanged() {
    let tree = Expr::call(Expr::constant(1i64), len_method(), vec![]);
    let err = BaseInterpreter.try_interpret(&tree).unwrap_err();
    assert_eq!(err, EvalError::runtime("`len` not defined on int"));
}

// ==================== Short-circuit instrumentation ====================

/// Extension node that records whether any interpreter ever touched it
#[derive(Debug)]
struct Probe {
    touched: AtomicBool,
}

impl Probe {
    fn new() -> Arc<Self> {
        Arc::new(Probe {
            touched: AtomicBool::new(false),
        })
    }
}

impl ExtensionNode for Probe {
    fn kind_name(&self) -> &str {
        "Probe"
    }

    fn children(&self) -> Vec<ExprRef> {
        Vec::new()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Interpreter that trips probes and delegates everything else to the base
struct ProbeInterpreter;

impl Interpreter for ProbeInterpreter {
    fn try_interpret(&self, node: &ExprRef) -> Result<Interpreted, EvalError> {
        if let Expr::Extension(ext) = &**node {
            if let Some(probe) = ext.as_any().downcast_ref::<Probe>() {
                probe.touched.store(true, Ordering::SeqCst);
                return Ok(Interpreted::Value(Value::Str("probed".into())));
            }
        }
        base_dispatch(self, node)
    }
}

#[test]
fn later_arguments_are_never_interpreted_after_a_miss() {
    let probe = Probe::new();
    let probe_node: ExprRef = Arc::new(Expr::Extension(probe.clone()));
    let tree = Expr::static_call(
        concat_method(),
        vec![Expr::constant("a"), Expr::parameter("x"), probe_node],
    );

    let result = ProbeInterpreter.try_interpret(&tree).unwrap();
    assert!(result.is_miss());
    assert!(
        !probe.touched.load(Ordering::SeqCst),
        "argument after the miss was interpreted"
    );
}

#[test]
fn arguments_before_a_miss_are_interpreted_in_order() {
    let probe = Probe::new();
    let probe_node: ExprRef = Arc::new(Expr::Extension(probe.clone()));
    let tree = Expr::static_call(
        concat_method(),
        vec![probe_node, Expr::parameter("x"), Expr::constant("z")],
    );

    assert!(ProbeInterpreter.try_interpret(&tree).unwrap().is_miss());
    assert!(probe.touched.load(Ordering::SeqCst));
}

#[test]
fn probed_extension_nodes_flow_into_the_call_result() {
    let probe = Probe::new();
    let probe_node: ExprRef = Arc::new(Expr::Extension(probe.clone()));
    let tree = Expr::static_call(concat_method(), vec![Expr::constant("a"), probe_node]);

    let result = ProbeInterpreter.try_interpret(&tree).unwrap();
    assert_eq!(result, Interpreted::Value(Value::Str("aprobed".into())));
}

// ==================== Handler override points ====================

/// Interpreter that resolves one member name itself and keeps the base
/// behavior for everything else
struct ShadowingInterpreter;

impl Interpreter for ShadowingInterpreter {
    fn interpret_member(
        &self,
        target: Option<&ExprRef>,
        member: &MemberDescriptor,
    ) -> Result<Interpreted, EvalError> {
        if member.name() == "shadowed" {
            return Ok(Interpreted::Value(Value::Str("intercepted".into())));
        }
        preval::interp::base_member(self, target, member)
    }

    fn interpret_lambda(
        &self,
        node: &ExprRef,
        lambda: &preval::Lambda,
    ) -> Result<Interpreted, EvalError> {
        // Count parameters instead of quoting; other lambdas keep the base
        // rule.
        if lambda.params.len() > 1 {
            return Ok(Interpreted::Value(Value::Int(lambda.params.len() as i64)));
        }
        preval::interp::base_lambda(node, lambda)
    }
}

#[test]
fn member_handler_override_shadows_one_name_only() {
    let shadowed = Expr::member(
        Expr::constant(1i64),
        MemberDescriptor::instance("shadowed", |_| Err(EvalError::runtime("never read"))),
    );
    let result = ShadowingInterpreter.try_interpret(&shadowed).unwrap();
    assert_eq!(result, Interpreted::Value(Value::Str("intercepted".into())));

    // Unshadowed members still follow the base path, misses included.
    let other = Expr::member(
        Expr::parameter("x"),
        MemberDescriptor::instance("other", |_| Ok(Value::Unit)),
    );
    assert!(ShadowingInterpreter.try_interpret(&other).unwrap().is_miss());
}

#[test]
fn lambda_handler_override_delegates_to_the_base_rule() {
    let wide = Expr::lambda(["x", "y"], Expr::parameter("x"), LambdaType::Function);
    assert_eq!(
        ShadowingInterpreter.try_interpret(&wide).unwrap(),
        Interpreted::Value(Value::Int(2))
    );

    let narrow = Expr::lambda(["x"], Expr::parameter("x"), LambdaType::Function);
    assert!(ShadowingInterpreter.try_interpret(&narrow).unwrap().is_miss());
}

// ==================== Lambdas ====================

#[test]
fn expression_typed_lambda_is_its_own_value() {
    let tree = Expr::lambda(["x"], Expr::parameter("x"), LambdaType::Expression);
    let value = interpret(&tree).into_value().unwrap();
    assert!(Arc::ptr_eq(value.as_tree().unwrap(), &tree));
}

#[test]
fn function_typed_lambda_misses() {
    let tree = Expr::lambda(["x"], Expr::parameter("x"), LambdaType::Function);
    assert_miss(&tree);
}

#[test]
fn parameter_misses() {
    assert_miss(&Expr::parameter("x"));
}

// ==================== Idempotence ====================

mod idempotence {
    use super::*;
    use preval::interp::arith::{BinaryExpr, BinaryOp};
    use proptest::prelude::*;

    fn arb_tree() -> impl Strategy<Value = ExprRef> {
        let leaf = prop_oneof![
            (-1_000i64..1_000).prop_map(Expr::constant),
            any::<bool>().prop_map(Expr::constant),
            "[a-z]{0,6}".prop_map(Expr::constant),
            Just(Expr::parameter("p")),
        ];
        leaf.prop_recursive(4, 24, 2, |inner| {
            prop_oneof![
                inner.clone().prop_map(Expr::quote),
                (
                    prop::sample::select(vec![BinaryOp::Add, BinaryOp::Sub, BinaryOp::Lt]),
                    inner.clone(),
                    inner
                )
                    .prop_map(|(op, left, right)| BinaryExpr::new(op, left, right)),
            ]
        })
    }

    proptest! {
        /// Evaluating the same immutable tree twice yields the same result
        /// and leaves the tree unchanged.
        #[test]
        fn repeated_interpretation_is_stable(tree in arb_tree()) {
            let snapshot = format!("{:?}", tree);
            let first = ArithInterpreter.try_interpret(&tree);
            let second = ArithInterpreter.try_interpret(&tree);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(snapshot, format!("{:?}", tree));
        }
    }
}
