//! `format` (printf-style substitution) and `number` (grouped decimals).

use super::{arg, require, string_or, FunctionLibrary};
use crate::binding::Scope;
use crate::error::{Error, Result};
use crate::value::Value;

pub(super) fn register(lib: &mut FunctionLibrary) {
    lib.register("format", format_fn);
    lib.register("number", number_fn);
}

fn format_fn(_: &Scope<'_>, args: &[Value]) -> Result<Value> {
    require("format", args, 1)?;
    printf(&args[0].as_string(), &args[1..]).map(Value::string)
}

fn number_fn(_: &Scope<'_>, args: &[Value]) -> Result<Value> {
    require("number", args, 1)?;
    if args[0].is_null() {
        return Ok(Value::Null);
    }
    let value = arg(args, 0).as_f64()?;
    let pattern = string_or(args, 1, "#,###");
    Ok(Value::string(format_decimal(value, &pattern)))
}

// ---------------------------------------------------------------------------
// printf
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Spec {
    position: Option<usize>,
    left: bool,
    zero: bool,
    plus: bool,
    group: bool,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

/// Substitute `%s`, `%d`, `%f`, `%x`, `%c`, `%b`, `%%` and `%n` with flags
/// `-`, `0`, `+`, `,`, a width, a precision and optional `n$` positions.
pub fn printf(template: &str, args: &[Value]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next_arg = 0usize;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let spec = parse_spec(&mut chars, template)?;
        match spec.conversion {
            '%' => {
                out.push('%');
                continue;
            }
            'n' => {
                out.push('\n');
                continue;
            }
            _ => {}
        }
        let index = match spec.position {
            Some(p) => p,
            None => {
                next_arg += 1;
                next_arg - 1
            }
        };
        let value = args.get(index).ok_or_else(|| {
            Error::binding(format!(
                "format '{template}' has no argument for %{}",
                spec.conversion
            ))
        })?;
        out.push_str(&render(&spec, value)?);
    }
    Ok(out)
}

fn parse_spec(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    template: &str,
) -> Result<Spec> {
    let mut spec = Spec::default();

    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            digits.push(c);
            chars.next();
        } else {
            break;
        }
    }
    if chars.peek() == Some(&'$') && !digits.is_empty() {
        chars.next();
        let p: usize = digits.parse().unwrap_or(0);
        if p == 0 {
            return Err(Error::binding(format!("invalid argument position in '{template}'")));
        }
        spec.position = Some(p - 1);
        digits.clear();
    }

    if digits.is_empty() {
        while let Some(&c) = chars.peek() {
            match c {
                '-' => spec.left = true,
                '0' => spec.zero = true,
                '+' => spec.plus = true,
                ',' => spec.group = true,
                _ => break,
            }
            chars.next();
        }
        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                chars.next();
            } else {
                break;
            }
        }
    } else if digits.starts_with('0') {
        spec.zero = true;
    }
    if !digits.is_empty() {
        spec.width = digits.parse().ok();
    }

    if chars.peek() == Some(&'.') {
        chars.next();
        let mut precision = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() {
                precision.push(c);
                chars.next();
            } else {
                break;
            }
        }
        spec.precision = Some(precision.parse().unwrap_or(0));
    }

    spec.conversion = chars
        .next()
        .ok_or_else(|| Error::binding(format!("dangling '%' in '{template}'")))?;
    Ok(spec)
}

fn render(spec: &Spec, value: &Value) -> Result<String> {
    let body = match spec.conversion {
        's' | 'S' => {
            let mut s = value.as_string();
            if let Some(p) = spec.precision {
                s = s.chars().take(p).collect();
            }
            if spec.conversion == 'S' {
                s = s.to_uppercase();
            }
            s
        }
        'd' => {
            let n = value.as_f64()?;
            if n.fract() != 0.0 {
                return Err(Error::mismatch("integer for %d", format!("{n}")));
            }
            let mut digits = (n.abs() as i64).to_string();
            if spec.group {
                digits = group_digits(&digits, 3);
            }
            signed(n < 0.0, spec.plus, digits)
        }
        'f' => {
            let n = value.as_f64()?;
            let precision = spec.precision.unwrap_or(6);
            let text = format!("{:.*}", precision, n.abs());
            let text = if spec.group {
                match text.split_once('.') {
                    Some((int, frac)) => format!("{}.{}", group_digits(int, 3), frac),
                    None => group_digits(&text, 3),
                }
            } else {
                text
            };
            signed(n < 0.0, spec.plus, text)
        }
        'x' | 'X' => {
            let n = value.as_f64()?;
            if n.fract() != 0.0 {
                return Err(Error::mismatch("integer for %x", format!("{n}")));
            }
            let hex = format!("{:x}", n as i64);
            if spec.conversion == 'X' {
                hex.to_uppercase()
            } else {
                hex
            }
        }
        'c' => value
            .as_string()
            .chars()
            .next()
            .map(String::from)
            .ok_or_else(|| Error::mismatch("character for %c", "empty string"))?,
        'b' | 'B' => value.is_truthy().to_string(),
        other => {
            return Err(Error::binding(format!("unsupported conversion '%{other}'")));
        }
    };
    Ok(pad(spec, body))
}

fn signed(negative: bool, plus: bool, digits: String) -> String {
    if negative {
        format!("-{digits}")
    } else if plus {
        format!("+{digits}")
    } else {
        digits
    }
}

fn pad(spec: &Spec, body: String) -> String {
    let width = match spec.width {
        Some(w) => w,
        None => return body,
    };
    let len = body.chars().count();
    if len >= width {
        return body;
    }
    let fill = width - len;
    if spec.left {
        format!("{body}{}", " ".repeat(fill))
    } else if spec.zero && matches!(spec.conversion, 'd' | 'f' | 'x' | 'X') {
        match body.strip_prefix(['-', '+']) {
            Some(rest) => format!("{}{}{rest}", &body[..1], "0".repeat(fill)),
            None => format!("{}{body}", "0".repeat(fill)),
        }
    } else {
        format!("{}{body}", " ".repeat(fill))
    }
}

// ---------------------------------------------------------------------------
// number
// ---------------------------------------------------------------------------

/// Insert `,` every `size` digits from the right.
fn group_digits(digits: &str, size: usize) -> String {
    if size == 0 || digits.len() <= size {
        return digits.to_owned();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / size);
    let lead = digits.len() % size;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + size - lead) % size == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Grouping size implied by a decimal pattern such as `#,###` or `#,##0.00`.
fn grouping_size(pattern: &str) -> usize {
    let integer = pattern.split('.').next().unwrap_or("");
    match integer.rfind(',') {
        Some(pos) => integer[pos + 1..]
            .chars()
            .filter(|c| *c == '#' || *c == '0')
            .count(),
        None => 0,
    }
}

/// Format with grouping from `pattern`, rounding toward negative infinity
/// and keeping between zero and two fraction digits.
pub fn format_decimal(value: f64, pattern: &str) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    // Round away representation noise (1.23 * 100 = 122.999...) before flooring.
    let scaled = (value * 100.0 * 1e6).round() / 1e6;
    let cents = scaled.floor() as i128;
    let negative = cents < 0;
    let abs = cents.unsigned_abs();
    let integer = (abs / 100).to_string();
    let fraction = abs % 100;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(&integer, grouping_size(pattern)));
    if fraction != 0 {
        out.push('.');
        if fraction % 10 == 0 {
            out.push_str(&(fraction / 10).to_string());
        } else {
            out.push_str(&format!("{fraction:02}"));
        }
    }
    out
}
