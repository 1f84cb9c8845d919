//! Arithmetic, logical, comparison, string and array functions.

use super::{arg, number_or, require, string_or, FunctionLibrary};
use crate::binding::Scope;
use crate::error::{Error, Result};
use crate::value::{Primitive, Value};

pub(super) fn register(lib: &mut FunctionLibrary) {
    // arithmetic
    lib.register("add", |_, args| fold("add", args, |a, b| a + b));
    lib.register("sub", |_, args| fold("sub", args, |a, b| a - b));
    lib.register("mul", |_, args| fold("mul", args, |a, b| a * b));
    lib.register("div", |_, args| fold("div", args, |a, b| a / b));
    lib.register("mod", |_, args| fold("mod", args, |a, b| a % b));
    lib.register("max", |_, args| fold("max", args, f64::max));
    lib.register("min", |_, args| fold("min", args, f64::min));

    // logical
    lib.register("and", and);
    lib.register("or", or);
    lib.register("not", not);
    lib.register("ternary", ternary);

    // comparison
    lib.register("eq", |_, args| {
        Ok(Value::bool(arg(args, 0).as_string() == arg(args, 1).as_string()))
    });
    lib.register("lt", |_, args| compare(args, |a, b| a < b));
    lib.register("gt", |_, args| compare(args, |a, b| a > b));
    lib.register("lte", |_, args| compare(args, |a, b| a <= b));
    lib.register("gte", |_, args| compare(args, |a, b| a >= b));

    // string
    lib.register("charAt", char_at);
    lib.register("contains", contains);
    lib.register("isEmpty", is_empty);
    lib.register("length", length);
    lib.register("trim", trim);

    // array
    lib.register("join", join);
    lib.register("slice", slice);
}

/// Left fold over numeric arguments, starting at the first.
fn fold(name: &str, args: &[Value], op: impl Fn(f64, f64) -> f64) -> Result<Value> {
    require(name, args, 1)?;
    let mut acc = args[0].as_f64()?;
    for value in &args[1..] {
        acc = op(acc, value.as_f64()?);
    }
    Ok(Value::number(acc))
}

fn compare(args: &[Value], op: impl Fn(f64, f64) -> bool) -> Result<Value> {
    let a = number_or(args, 0, 0.0)?;
    let b = number_or(args, 1, 0.0)?;
    Ok(Value::bool(op(a, b)))
}

fn and(_: &Scope<'_>, args: &[Value]) -> Result<Value> {
    Ok(Value::bool(args.iter().all(Value::is_truthy)))
}

fn or(_: &Scope<'_>, args: &[Value]) -> Result<Value> {
    Ok(Value::bool(args.iter().any(Value::is_truthy)))
}

fn not(_: &Scope<'_>, args: &[Value]) -> Result<Value> {
    require("not", args, 1)?;
    Ok(Value::bool(!args[0].is_truthy()))
}

fn ternary(_: &Scope<'_>, args: &[Value]) -> Result<Value> {
    require("ternary", args, 2)?;
    if args[0].is_truthy() {
        Ok(args[1].clone())
    } else {
        Ok(args.get(2).cloned().unwrap_or_else(|| Value::string("")))
    }
}

fn char_at(_: &Scope<'_>, args: &[Value]) -> Result<Value> {
    require("charAt", args, 1)?;
    let s = args[0].as_string();
    let i = number_or(args, 1, 0.0)?;
    if i < 0.0 || i.fract() != 0.0 {
        return Err(Error::binding(format!("charAt index {i} is not a valid position")));
    }
    s.chars()
        .nth(i as usize)
        .map(|c| Value::Primitive(Primitive::Char(c)))
        .ok_or_else(|| {
            Error::binding(format!(
                "charAt index {i} out of range for string of length {}",
                s.chars().count()
            ))
        })
}

fn contains(_: &Scope<'_>, args: &[Value]) -> Result<Value> {
    require("contains", args, 2)?;
    Ok(Value::bool(args[0].as_string().contains(&args[1].as_string())))
}

fn is_empty(_: &Scope<'_>, args: &[Value]) -> Result<Value> {
    require("isEmpty", args, 1)?;
    Ok(Value::bool(args[0].as_string().is_empty()))
}

fn length(_: &Scope<'_>, args: &[Value]) -> Result<Value> {
    require("length", args, 1)?;
    let len = match &args[0] {
        Value::Null => 0,
        Value::Array(items) => items.len(),
        Value::Primitive(p) if p.is_string() => p.as_string().chars().count(),
        other => return Err(Error::mismatch("string or array", other.kind())),
    };
    Ok(Value::number(len as f64))
}

fn trim(_: &Scope<'_>, args: &[Value]) -> Result<Value> {
    require("trim", args, 1)?;
    Ok(Value::string(args[0].as_string().trim()))
}

fn join(_: &Scope<'_>, args: &[Value]) -> Result<Value> {
    require("join", args, 1)?;
    let delimiter = string_or(args, 1, ", ");
    match &args[0] {
        Value::Null => Ok(Value::string("")),
        Value::Array(items) => Ok(Value::string(
            items
                .iter()
                .map(Value::as_string)
                .collect::<Vec<_>>()
                .join(&delimiter),
        )),
        other => Err(Error::mismatch("array", other.kind())),
    }
}

/// Clamp a possibly negative index into `[0, len]`, negatives counting from
/// the end.
fn clamp_index(i: f64, len: usize) -> usize {
    let len_f = len as f64;
    let absolute = if i < 0.0 { len_f + i.trunc() } else { i.trunc() };
    absolute.clamp(0.0, len_f) as usize
}

fn slice(_: &Scope<'_>, args: &[Value]) -> Result<Value> {
    require("slice", args, 1)?;
    let items = match &args[0] {
        Value::Null => return Ok(Value::Null),
        Value::Array(items) => items,
        other => return Err(Error::mismatch("array", other.kind())),
    };
    let len = items.len();
    let start = clamp_index(number_or(args, 1, 0.0)?, len);
    let end = clamp_index(number_or(args, 2, len as f64)?, len);
    if start >= end {
        return Ok(Value::Array(Vec::new()));
    }
    Ok(Value::Array(items[start..end].iter().map(Value::copy).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;
    use pretty_assertions::assert_eq;

    fn call(name: &str, args: &[Value]) -> Result<Value> {
        let lib = FunctionLibrary::builtin();
        let data = Object::new();
        let f = lib.get(name).unwrap();
        f(&Scope::new(&data, 0), args)
    }

    fn n(x: f64) -> Value {
        Value::number(x)
    }

    fn s(x: &str) -> Value {
        Value::string(x)
    }

    fn five() -> Value {
        Value::Array((1..=5).map(|i| n(i as f64)).collect())
    }

    #[test]
    fn arithmetic_folds_left() {
        assert_eq!(call("add", &[n(1.0), n(2.0), n(3.0)]).unwrap(), n(6.0));
        assert_eq!(call("sub", &[n(10.0), n(3.0), n(2.0)]).unwrap(), n(5.0));
        assert_eq!(call("div", &[n(20.0), n(2.0), n(5.0)]).unwrap(), n(2.0));
        assert_eq!(call("mod", &[n(17.0), n(5.0)]).unwrap(), n(2.0));
        assert_eq!(call("mul", &[s("4"), n(2.5)]).unwrap(), n(10.0));
    }

    #[test]
    fn arithmetic_rejects_bad_input() {
        assert!(matches!(call("add", &[]), Err(Error::TypeMismatch { .. })));
        assert!(matches!(call("add", &[s("x"), n(1.0)]), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn max_min() {
        assert_eq!(call("max", &[n(3.0), n(9.0), n(-1.0)]).unwrap(), n(9.0));
        assert_eq!(call("min", &[n(3.0), n(9.0), n(-1.0)]).unwrap(), n(-1.0));
        assert!(call("max", &[]).is_err());
    }

    #[test]
    fn logical() {
        assert_eq!(call("and", &[Value::bool(true), n(1.0)]).unwrap(), Value::bool(true));
        assert_eq!(call("and", &[Value::bool(true), Value::Null]).unwrap(), Value::bool(false));
        assert_eq!(call("or", &[Value::Null, s("x")]).unwrap(), Value::bool(true));
        assert_eq!(call("not", &[Value::bool(false)]).unwrap(), Value::bool(true));
    }

    #[test]
    fn not_without_arguments_is_an_arity_error() {
        assert!(matches!(call("not", &[]), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn comparison() {
        assert_eq!(call("eq", &[n(3.0), s("3")]).unwrap(), Value::bool(true));
        assert_eq!(call("eq", &[s("a"), s("b")]).unwrap(), Value::bool(false));
        assert_eq!(call("lt", &[n(1.0), n(2.0)]).unwrap(), Value::bool(true));
        assert_eq!(call("gte", &[n(2.0), n(2.0)]).unwrap(), Value::bool(true));
        // missing operand defaults to zero
        assert_eq!(call("gt", &[n(1.0)]).unwrap(), Value::bool(true));
        assert_eq!(call("lte", &[]).unwrap(), Value::bool(true));
    }

    #[test]
    fn ternary_defaults_to_empty_string() {
        assert_eq!(call("ternary", &[Value::bool(true), s("y"), s("n")]).unwrap(), s("y"));
        assert_eq!(call("ternary", &[Value::bool(false), s("y")]).unwrap(), s(""));
    }

    #[test]
    fn strings() {
        assert_eq!(
            call("charAt", &[s("hello"), n(1.0)]).unwrap(),
            Value::Primitive(Primitive::Char('e'))
        );
        assert_eq!(
            call("charAt", &[s("hello")]).unwrap(),
            Value::Primitive(Primitive::Char('h'))
        );
        assert!(matches!(call("charAt", &[s("hi"), n(5.0)]), Err(Error::Binding(_))));
        assert_eq!(call("contains", &[s("banana"), s("nan")]).unwrap(), Value::bool(true));
        assert_eq!(call("isEmpty", &[Value::Null]).unwrap(), Value::bool(true));
        assert_eq!(call("length", &[s("héllo")]).unwrap(), n(5.0));
        assert_eq!(call("length", &[five()]).unwrap(), n(5.0));
        assert!(call("length", &[n(3.0)]).is_err());
        assert_eq!(call("trim", &[s("  x ")]).unwrap(), s("x"));
    }

    #[test]
    fn join_uses_default_delimiter() {
        assert_eq!(call("join", &[five()]).unwrap(), s("1, 2, 3, 4, 5"));
        assert_eq!(call("join", &[five(), s("-")]).unwrap(), s("1-2-3-4-5"));
        assert!(call("join", &[s("abc")]).is_err());
    }

    #[test]
    fn slice_boundaries() {
        let tail = call("slice", &[five(), n(-2.0)]).unwrap();
        assert_eq!(tail, Value::Array(vec![n(4.0), n(5.0)]));
        let all = call("slice", &[five(), n(0.0), n(100.0)]).unwrap();
        assert_eq!(all, five());
        let middle = call("slice", &[five(), n(1.0), n(-1.0)]).unwrap();
        assert_eq!(middle, Value::Array(vec![n(2.0), n(3.0), n(4.0)]));
        let empty = call("slice", &[five(), n(4.0), n(2.0)]).unwrap();
        assert_eq!(empty, Value::Array(vec![]));
        assert_eq!(call("slice", &[five(), n(-100.0)]).unwrap(), five());
    }
}
