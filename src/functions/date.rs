//! `date(input, toFormat?, fromFormat?)` with Java-style date patterns.

use chrono::{NaiveDate, NaiveDateTime};

use super::{require, string_or, FunctionLibrary};
use crate::error::{Error, Result};
use crate::value::Value;

pub(super) fn register(lib: &mut FunctionLibrary, default_from: String, default_to: String) {
    lib.register("date", move |_, args| {
        require("date", args, 1)?;
        if args[0].is_null() {
            return Ok(Value::Null);
        }
        let input = args[0].as_string();
        let to = string_or(args, 1, &default_to);
        let from = string_or(args, 2, &default_from);
        reformat(&input, &from, &to).map(Value::string)
    });
}

/// Parse `input` with `from` and render it with `to`. Unparsable input is a
/// [`Error::Binding`].
pub fn reformat(input: &str, from: &str, to: &str) -> Result<String> {
    let from_chrono = translate(from)?;
    let to_chrono = translate(to)?;
    let parsed = parse(input.trim(), &from_chrono).ok_or_else(|| {
        Error::binding(format!("cannot parse date '{input}' with pattern '{from}'"))
    })?;
    Ok(parsed.format(&to_chrono).to_string())
}

fn parse(input: &str, pattern: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, pattern) {
        return Some(dt);
    }
    NaiveDate::parse_from_str(input, pattern)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Translate a Java `SimpleDateFormat` pattern into a chrono format string.
pub fn translate(pattern: &str) -> Result<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            // quoted literal; '' is a single quote
            i += 1;
            if i < chars.len() && chars[i] == '\'' {
                out.push('\'');
                i += 1;
                continue;
            }
            while i < chars.len() && chars[i] != '\'' {
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }
        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }
        let spec = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', 1) => "%-I",
            ('h', _) => "%I",
            ('m', _) => "%M",
            ('s', _) => "%S",
            ('S', _) => "%3f",
            ('a', _) => "%p",
            ('Z', _) => "%z",
            ('D', _) => "%j",
            _ => {
                return Err(Error::binding(format!(
                    "unsupported date pattern letter '{c}' in '{pattern}'"
                )))
            }
        };
        out.push_str(spec);
        i += run;
    }
    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}
