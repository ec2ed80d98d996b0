//! Built-in functions. These take precedence over variables and
//! user-defined functions of the same name.

use crate::error::{EvalError, EvalResult};
use crate::output::Output;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    /// `say(x)`, also the target of the `say x;` statement.
    Say,
    /// `print(a, b, ...)`: display strings joined by single spaces.
    Print,
    Len,
    ToString,
    ToInt,
}

impl Builtin {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "say" => Some(Self::Say),
            "print" => Some(Self::Print),
            "len" => Some(Self::Len),
            "toString" => Some(Self::ToString),
            "toInt" => Some(Self::ToInt),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Say => "say",
            Self::Print => "print",
            Self::Len => "len",
            Self::ToString => "toString",
            Self::ToInt => "toInt",
        }
    }

    pub(crate) fn call(self, args: Vec<Value>, out: &mut Output) -> EvalResult<Value> {
        if self == Self::Print {
            let line = args
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            out.emit(line);
            return Ok(Value::Unit);
        }

        let arg = self.single(args)?;
        match self {
            Self::Say => {
                out.emit(arg.to_string());
                Ok(Value::Unit)
            }
            Self::Len => match &arg {
                Value::String(s) => Ok(Value::Int(s.chars().count() as i64)),
                Value::Array(items) => Ok(Value::Int(items.len() as i64)),
                other => Err(EvalError::type_mismatch(format!(
                    "len() expects a String or Array, got {}",
                    other.type_name()
                ))),
            },
            Self::ToString => Ok(Value::String(arg.to_string())),
            Self::ToInt => to_int(&arg),
            Self::Print => Ok(Value::Unit),
        }
    }

    fn single(self, args: Vec<Value>) -> EvalResult<Value> {
        let got = args.len();
        match <[Value; 1]>::try_from(args) {
            Ok([arg]) => Ok(arg),
            Err(_) => Err(EvalError::ArityMismatch {
                name: self.name().to_string(),
                expected: 1,
                got,
            }),
        }
    }
}

fn to_int(value: &Value) -> EvalResult<Value> {
    match value {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(n) => Ok(Value::Int(n.trunc() as i64)),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::String(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
            EvalError::type_mismatch(format!("cannot convert \"{s}\" to Int"))
        }),
        other => Err(EvalError::type_mismatch(format!(
            "cannot convert {} to Int",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: Vec<Value>) -> (EvalResult<Value>, Vec<String>) {
        let mut out = Output::new(false);
        let builtin = Builtin::from_name(name).unwrap();
        let result = builtin.call(args, &mut out);
        (result, out.lines().to_vec())
    }

    #[test]
    fn test_print_joins_with_spaces() {
        let (result, lines) = call(
            "print",
            vec![Value::String("a".into()), Value::Int(1), Value::Float(2.0)],
        );
        assert_eq!(result, Ok(Value::Unit));
        assert_eq!(lines, vec!["a 1 2.0"]);
    }

    #[test]
    fn test_print_without_arguments_prints_empty_line() {
        let (_, lines) = call("print", vec![]);
        assert_eq!(lines, vec![""]);
    }

    #[test]
    fn test_say() {
        let (result, lines) = call("say", vec![Value::Int(8).measured("km")]);
        assert_eq!(result, Ok(Value::Unit));
        assert_eq!(lines, vec!["8 km"]);
    }

    #[test]
    fn test_len_counts_chars() {
        assert_eq!(call("len", vec![Value::String("héllo".into())]).0, Ok(Value::Int(5)));
        assert_eq!(
            call("len", vec![Value::Array(vec![Value::Unit, Value::Unit])]).0,
            Ok(Value::Int(2))
        );
        assert!(matches!(
            call("len", vec![Value::Int(3)]).0,
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_to_string_and_to_int() {
        assert_eq!(
            call("toString", vec![Value::Float(1.5)]).0,
            Ok(Value::String("1.5".into()))
        );
        assert_eq!(call("toInt", vec![Value::Float(-2.7)]).0, Ok(Value::Int(-2)));
        assert_eq!(call("toInt", vec![Value::String(" 42 ".into())]).0, Ok(Value::Int(42)));
        assert_eq!(call("toInt", vec![Value::Bool(true)]).0, Ok(Value::Int(1)));
        assert!(matches!(
            call("toInt", vec![Value::String("forty".into())]).0,
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_arity_is_checked() {
        assert_eq!(
            call("len", vec![]).0,
            Err(EvalError::ArityMismatch {
                name: "len".into(),
                expected: 1,
                got: 0
            })
        );
        let (result, lines) = call("say", vec![Value::Int(1), Value::Int(2)]);
        assert!(matches!(result, Err(EvalError::ArityMismatch { got: 2, .. })));
        assert!(lines.is_empty());
    }
}
