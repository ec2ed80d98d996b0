//! Operator semantics on already-evaluated values.
//!
//! Kept free of evaluator state so the arithmetic rules can be exercised
//! directly.

use crate::error::{EvalError, EvalResult};
use crate::value::Value;
use std::cmp::Ordering;
use woke_types::ast::{BinOp, UnaryOp};

/// Apply a binary operator.
///
/// `==`, `!=`, `and` and `or` never look at units: equality is structural
/// and the logical operators combine truthiness. For the other operators,
/// two measured operands must share a unit. Arithmetic keeps that unit on
/// its result while comparisons yield a bare `Bool`. A measured value next
/// to a bare one gets no special treatment.
pub fn binary(op: BinOp, left: Value, right: Value) -> EvalResult<Value> {
    if matches!(op, BinOp::Eq | BinOp::NotEq | BinOp::And | BinOp::Or) {
        return raw(op, &left, &right);
    }
    match (left, right) {
        (Value::Measured(l, lu), Value::Measured(r, ru)) => {
            if lu != ru {
                return Err(EvalError::UnitMismatch {
                    left: lu,
                    right: ru,
                });
            }
            let result = binary(op, *l, *r)?;
            if is_arithmetic(op) {
                Ok(result.measured(lu))
            } else {
                Ok(result)
            }
        }
        (left, right) => raw(op, &left, &right),
    }
}

fn is_arithmetic(op: BinOp) -> bool {
    matches!(
        op,
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod
    )
}

/// Apply a unary operator.
pub fn unary(op: UnaryOp, operand: Value) -> EvalResult<Value> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
        UnaryOp::Neg => negate(operand),
    }
}

fn negate(value: Value) -> EvalResult<Value> {
    match value {
        Value::Int(n) => n.checked_neg().map(Value::Int).ok_or(EvalError::Overflow),
        Value::Float(n) => Ok(Value::Float(-n)),
        Value::Measured(inner, unit) => Ok(negate(*inner)?.measured(unit)),
        other => Err(EvalError::type_mismatch(format!(
            "cannot negate {}",
            other.type_name()
        ))),
    }
}

/// Coerce a `repeat` count to an iteration count.
pub fn repeat_count(value: &Value) -> EvalResult<i64> {
    match value {
        Value::Int(n) => Ok(*n),
        Value::Float(n) => Ok(n.trunc() as i64),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Measured(inner, _) => repeat_count(inner),
        other => Err(EvalError::type_mismatch(format!(
            "repeat count must be a number, got {}",
            other.type_name()
        ))),
    }
}

fn raw(op: BinOp, l: &Value, r: &Value) -> EvalResult<Value> {
    match op {
        BinOp::Eq => Ok(Value::Bool(l == r)),
        BinOp::NotEq => Ok(Value::Bool(l != r)),
        // both sides are already evaluated; no short-circuit
        BinOp::And => Ok(Value::Bool(l.is_truthy() && r.is_truthy())),
        BinOp::Or => Ok(Value::Bool(l.is_truthy() || r.is_truthy())),
        BinOp::Add => add(l, r),
        BinOp::Sub => arith(op, l, r, |a, b| a.checked_sub(b), |a, b| a - b),
        BinOp::Mul => arith(op, l, r, |a, b| a.checked_mul(b), |a, b| a * b),
        BinOp::Div => {
            check_divisor(r)?;
            arith(op, l, r, |a, b| a.checked_div(b), |a, b| a / b)
        }
        BinOp::Mod => {
            check_divisor(r)?;
            arith(op, l, r, |a, b| a.checked_rem(b), |a, b| a % b)
        }
        BinOp::Less => compare(op, l, r, Ordering::is_lt),
        BinOp::Greater => compare(op, l, r, Ordering::is_gt),
        BinOp::LessEq => compare(op, l, r, Ordering::is_le),
        BinOp::GreaterEq => compare(op, l, r, Ordering::is_ge),
    }
}

fn add(l: &Value, r: &Value) -> EvalResult<Value> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => a.checked_add(*b).map(Value::Int).ok_or(EvalError::Overflow),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(*a as f64 + b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a + *b as f64)),
        (Value::String(_), _) | (_, Value::String(_)) => Ok(Value::String(format!("{l}{r}"))),
        _ => Err(mismatch(BinOp::Add, l, r)),
    }
}

fn check_divisor(r: &Value) -> EvalResult<()> {
    match r {
        Value::Int(0) => Err(EvalError::DivisionByZero),
        Value::Float(n) if *n == 0.0 => Err(EvalError::DivisionByZero),
        _ => Ok(()),
    }
}

fn arith(
    op: BinOp,
    l: &Value,
    r: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> EvalResult<Value> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b).map(Value::Int).ok_or(EvalError::Overflow),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(float_op(*a, *b))),
        _ => Err(mismatch(op, l, r)),
    }
}

fn compare(op: BinOp, l: &Value, r: &Value, test: fn(Ordering) -> bool) -> EvalResult<Value> {
    let ordering = match (l, r) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        _ => return Err(mismatch(op, l, r)),
    };
    // NaN compares false against everything
    Ok(Value::Bool(ordering.is_some_and(test)))
}

fn mismatch(op: BinOp, l: &Value, r: &Value) -> EvalError {
    EvalError::type_mismatch(format!(
        "cannot apply '{}' to {} and {}",
        op.as_str(),
        l.type_name(),
        r.type_name()
    ))
}
