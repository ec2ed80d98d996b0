//! Runtime values.

use std::fmt;
use std::rc::Rc;

use woke_types::ast::FunctionDecl;

/// Every value a WokeLang program can compute.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Array(Vec<Value>),
    /// A value tagged with a unit name, e.g. `5 measured in km`.
    Measured(Box<Value>, String),
    /// Result of statements and functions that give nothing back.
    Unit,
    /// A function definition used as a value. No environment is captured.
    Function(Rc<FunctionDecl>),
    /// `thanks("contributor")`
    Thanks(String),
}

impl Value {
    /// Tag `self` with `unit`.
    pub fn measured(self, unit: impl Into<String>) -> Value {
        Value::Measured(Box::new(self), unit.into())
    }

    /// Truthiness used by `when`, `and`, `or` and `not`.
    ///
    /// `false`, `0`, `""`, `[]` and `()` are falsy. Every other value is
    /// truthy, including all floats (even `0.0`) and all measured values.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Unit => false,
            Value::Float(_) | Value::Measured(..) | Value::Function(_) | Value::Thanks(_) => true,
        }
    }

    /// Name used in type error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bool(_) => "Bool",
            Value::Array(_) => "Array",
            Value::Measured(..) => "Measured",
            Value::Unit => "Unit",
            Value::Function(_) => "Function",
            Value::Thanks(_) => "Thanks",
        }
    }
}

impl PartialEq for Value {
    /// Structural equality. Values of different kinds are simply unequal;
    /// functions are equal only to the very same definition.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Measured(a, ua), Value::Measured(b, ub)) => ua == ub && a == b,
            (Value::Unit, Value::Unit) => true,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Thanks(a), Value::Thanks(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            // `{:?}` keeps the `.0` on whole floats
            Value::Float(n) => write!(f, "{n:?}"),
            Value::String(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Measured(inner, unit) => write!(f, "{inner} {unit}"),
            Value::Unit => f.write_str("()"),
            Value::Function(decl) => write!(f, "<function {}>", decl.name.name),
            Value::Thanks(who) => write!(f, "Thanks to {who}"),
        }
    }
}
