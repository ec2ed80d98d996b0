//! Property-based tests for operator precedence and truthiness.

use proptest::prelude::*;
use woke_eval::{ops, Evaluator, Value};
use woke_parser::parse;
use woke_types::ast::UnaryOp;
use woke_types::SourceFile;

// ── Helpers ─────────────────────────────────────────────────────────

fn eval_main(body: &str) -> Value {
    let source = format!("to main() {{ give back {body}; }}");
    let program = parse(&SourceFile::new("prop.woke", source.as_str())).expect("parses");
    Evaluator::new().run(&program).expect("runs")
}

fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<f64>().prop_map(Value::Float),
        "[a-z]{0,4}".prop_map(Value::String),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Unit),
        "[a-z]{1,4}".prop_map(Value::Thanks),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            (inner, "[a-z]{1,3}").prop_map(|(v, unit)| v.measured(unit)),
        ]
    })
}

// ── Properties ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn multiplication_binds_tighter_than_addition(
        a in -1000i64..1000,
        b in -1000i64..1000,
        c in -1000i64..1000,
    ) {
        prop_assert_eq!(
            eval_main(&format!("{a} + {b} * {c}")),
            eval_main(&format!("{a} + ({b} * {c})"))
        );
        prop_assert_eq!(eval_main(&format!("{a} + {b} * {c}")), Value::Int(a + b * c));
    }

    #[test]
    fn subtraction_is_left_associative(
        a in -1000i64..1000,
        b in -1000i64..1000,
        c in -1000i64..1000,
    ) {
        prop_assert_eq!(
            eval_main(&format!("{a} - {b} - {c}")),
            eval_main(&format!("({a} - {b}) - {c}"))
        );
        prop_assert_eq!(eval_main(&format!("{a} - {b} - {c}")), Value::Int(a - b - c));
    }

    #[test]
    fn truthiness_is_stable(value in value_strategy()) {
        let first = value.is_truthy();
        prop_assert_eq!(value.is_truthy(), first);
        prop_assert_eq!(value.clone().is_truthy(), first);
    }

    #[test]
    fn double_negation_reflects_truthiness(value in value_strategy()) {
        let truthy = value.is_truthy();
        let once = ops::unary(UnaryOp::Not, value).unwrap();
        prop_assert_eq!(&once, &Value::Bool(!truthy));
        prop_assert_eq!(ops::unary(UnaryOp::Not, once).unwrap(), Value::Bool(truthy));
    }
}
