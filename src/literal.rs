//! Literal canonicalization.
//!
//! Turns `Const` payloads into Java literal text: narrowest integral display
//! types, char/string escaping, named library constants for sentinel values,
//! and shortest-round-trip decimal forms for `float`/`double`. Every decimal
//! form emitted here re-parses to the exact stored bit pattern; a candidate
//! that parses to a different value is rejected regardless of brevity.

use crate::context::DecompileContext;
use crate::diagnostics::DecompileError;
use crate::exprent::ConstValue;
use crate::types::{BaseType, VarType};

/// Render one constant payload as Java source text.
pub fn render_const(
    value: &ConstValue,
    const_type: &VarType,
    boolean_context: bool,
    ctx: &DecompileContext,
) -> Result<String, DecompileError> {
    let opts = &ctx.options;
    match value {
        ConstValue::Null => Ok("null".to_string()),
        ConstValue::Boolean(b) => Ok(if *b { "true" } else { "false" }.to_string()),
        ConstValue::Int(v) => {
            let as_boolean = const_type == &VarType::BOOLEAN
                || (boolean_context && opts.boolean_true_one && (*v == 0 || *v == 1));
            if as_boolean {
                return Ok(if *v == 0 { "false" } else { "true" }.to_string());
            }
            if const_type.base == BaseType::Char {
                return Ok(render_char(*v, opts.ascii_string_characters));
            }
            if !opts.literals_as_is {
                if *v == i32::MAX {
                    return Ok("Integer.MAX_VALUE".to_string());
                }
                if *v == i32::MIN {
                    return Ok("Integer.MIN_VALUE".to_string());
                }
            }
            Ok(v.to_string())
        }
        ConstValue::Long(v) => {
            if !opts.literals_as_is {
                if *v == i64::MAX {
                    return Ok("Long.MAX_VALUE".to_string());
                }
                if *v == i64::MIN {
                    return Ok("Long.MIN_VALUE".to_string());
                }
            }
            Ok(format!("{v}L"))
        }
        ConstValue::Float(bits) => render_float(f32::from_bits(*bits), ctx),
        ConstValue::Double(bits) => render_double(f64::from_bits(*bits), ctx),
        ConstValue::String(s) => {
            Ok(format!("\"{}\"", escape_string(s, opts.ascii_string_characters)))
        }
        ConstValue::Class(name) => {
            Ok(format!("{}.class", ctx.shorten(&name.replace('/', "."))))
        }
    }
}

// ── Char / string escaping ───────────────────────────────────────────

/// Render a char constant, including the surrounding quotes.
pub fn render_char(code: i32, ascii_only: bool) -> String {
    let code = code as u32 & 0xFFFF;
    let body = match code {
        0x08 => "\\b".to_string(),
        0x09 => "\\t".to_string(),
        0x0a => "\\n".to_string(),
        0x0c => "\\f".to_string(),
        0x0d => "\\r".to_string(),
        0x27 => "\\'".to_string(),
        0x5c => "\\\\".to_string(),
        0x20..=0x7e => char::from_u32(code).expect("printable ascii").to_string(),
        _ => match char::from_u32(code) {
            Some(c) if !ascii_only && !c.is_control() => c.to_string(),
            _ => format!("\\u{code:04x}"),
        },
    };
    format!("'{body}'")
}

/// Escape a string literal body (no surrounding quotes).
pub fn escape_string(s: &str, ascii_only: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            ' '..='~' => out.push(c),
            _ if !ascii_only && !c.is_control() => out.push(c),
            _ => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    out.push_str(&format!("\\u{unit:04x}"));
                }
            }
        }
    }
    out
}

// ── Is a printable char display possible? ────────────────────────────

/// Whether an integer value used where `char` is expected can actually be
/// shown as a character literal: printable, or one of the known escapes.
pub fn has_char_display(code: i64) -> bool {
    if !(0..=0xFFFF).contains(&code) {
        return false;
    }
    matches!(code, 0x08 | 0x09 | 0x0a | 0x0c | 0x0d | 0x27 | 0x5c)
        || matches!(code, 0x20..=0x7e)
        || char::from_u32(code as u32).is_some_and(|c| !c.is_control())
}

// ── Floating point ───────────────────────────────────────────────────

fn render_float(v: f32, ctx: &DecompileContext) -> Result<String, DecompileError> {
    let opts = &ctx.options;
    let suffix = "F";
    if v.is_nan() || v.is_infinite() {
        return Ok(special_float_text(
            v.is_nan(),
            v.is_sign_positive(),
            "Float",
            suffix,
            opts.literals_as_is,
        ));
    }
    if !opts.literals_as_is {
        if let Some(named) = named_float(v) {
            return Ok(named);
        }
    }
    let text = if opts.standardize_floating_point_numbers {
        trim_float(v)?
    } else {
        let (neg, digits, exp) = split_scientific(&format!("{v:e}"));
        format_literal(neg, &digits, exp)
    };
    Ok(format!("{text}{suffix}"))
}

fn render_double(v: f64, ctx: &DecompileContext) -> Result<String, DecompileError> {
    let opts = &ctx.options;
    let suffix = if opts.standardize_floating_point_numbers { "D" } else { "" };
    if v.is_nan() || v.is_infinite() {
        return Ok(special_float_text(
            v.is_nan(),
            v.is_sign_positive(),
            "Double",
            suffix,
            opts.literals_as_is,
        ));
    }
    if !opts.literals_as_is {
        if let Some(named) = named_double(v) {
            return Ok(named);
        }
    }
    if opts.standardize_floating_point_numbers {
        let text = trim_double(v)?;
        // A double that is bit-exactly the widening of its nearest float and
        // has a strictly shorter float form renders as that float literal
        // with an explicit widening cast.
        let narrowed = v as f32;
        if narrowed.is_finite() && f64::from(narrowed).to_bits() == v.to_bits() {
            let float_text = trim_float(narrowed)?;
            if float_text.len() < text.len() {
                return Ok(format!("(double){float_text}F"));
            }
        }
        Ok(format!("{text}{suffix}"))
    } else {
        let (neg, digits, exp) = split_scientific(&format!("{v:e}"));
        Ok(format!("{}{suffix}", format_literal(neg, &digits, exp)))
    }
}

/// NaN and the infinities have no literal syntax; with `literals_as_is` they
/// render as division expressions, otherwise as the named constants.
fn special_float_text(
    is_nan: bool,
    positive: bool,
    class: &str,
    suffix: &str,
    literals_as_is: bool,
) -> String {
    if literals_as_is {
        if is_nan {
            format!("0.0{suffix} / 0.0{suffix}")
        } else if positive {
            format!("1.0{suffix} / 0.0{suffix}")
        } else {
            format!("-1.0{suffix} / 0.0{suffix}")
        }
    } else if is_nan {
        format!("{class}.NaN")
    } else if positive {
        format!("{class}.POSITIVE_INFINITY")
    } else {
        format!("{class}.NEGATIVE_INFINITY")
    }
}

/// Sentinel doubles and the named expressions that replace them.
fn named_double(v: f64) -> Option<String> {
    let pi = std::f64::consts::PI;
    let table: [(f64, &str); 10] = [
        (f64::MAX, "Double.MAX_VALUE"),
        (f64::from_bits(1), "Double.MIN_VALUE"),
        (f64::MIN_POSITIVE, "Double.MIN_NORMAL"),
        (std::f64::consts::E, "Math.E"),
        (pi, "Math.PI"),
        (pi / 2.0, "(Math.PI / 2)"),
        (pi / 4.0, "(Math.PI / 4)"),
        (pi * 2.0, "(Math.PI * 2)"),
        (pi / 180.0, "(Math.PI / 180)"),
        (180.0 / pi, "(180.0 / Math.PI)"),
    ];
    for (sentinel, name) in table {
        if v.to_bits() == sentinel.to_bits() {
            return Some(name.to_string());
        }
        if v.to_bits() == (-sentinel).to_bits() {
            return Some(format!("-{name}"));
        }
    }
    None
}

/// Sentinel floats. The `Math` constants are naturally doubles, so their
/// float-narrowed forms carry a `(float)` cast prefix.
fn named_float(v: f32) -> Option<String> {
    let table: [(f32, &str); 3] = [
        (f32::MAX, "Float.MAX_VALUE"),
        (f32::from_bits(1), "Float.MIN_VALUE"),
        (f32::MIN_POSITIVE, "Float.MIN_NORMAL"),
    ];
    for (sentinel, name) in table {
        if v.to_bits() == sentinel.to_bits() {
            return Some(name.to_string());
        }
        if v.to_bits() == (-sentinel).to_bits() {
            return Some(format!("-{name}"));
        }
    }
    let pi = std::f64::consts::PI;
    let math_table: [(f64, &str); 7] = [
        (std::f64::consts::E, "Math.E"),
        (pi, "Math.PI"),
        (pi / 2.0, "(Math.PI / 2)"),
        (pi / 4.0, "(Math.PI / 4)"),
        (pi * 2.0, "(Math.PI * 2)"),
        (pi / 180.0, "(Math.PI / 180)"),
        (180.0 / pi, "(180.0 / Math.PI)"),
    ];
    for (sentinel, name) in math_table {
        if v.to_bits() == (sentinel as f32).to_bits() {
            return Some(format!("(float){name}"));
        }
        if v.to_bits() == (-(sentinel as f32)).to_bits() {
            return Some(format!("(float)-{name}"));
        }
    }
    None
}

// ── Shortest round-trip decimals ─────────────────────────────────────

/// Shortest decimal literal (no suffix) that re-parses bit-identically to
/// `v`. Starts from the full-precision 17-significant-digit form and
/// repeatedly truncates the last digit, also trying the round-up branch,
/// keeping the shortest exact candidate.
pub fn trim_double(v: f64) -> Result<String, DecompileError> {
    if v == 0.0 {
        return Ok(if v.is_sign_negative() { "-0.0" } else { "0.0" }.to_string());
    }
    let (neg, digits, exp) = split_scientific(&format!("{v:.16e}"));
    let bits = v.to_bits();
    let exact = |digits: &str, exp: i32| {
        scientific(digits, exp).parse::<f64>().is_ok_and(|p| {
            let p = if neg { -p } else { p };
            p.to_bits() == bits
        })
    };
    let (digits, exp) = shorten(digits, exp, &exact);
    if !exact(&digits, exp) {
        return Err(DecompileError::structural(format!(
            "round-trip violation trimming double {bits:#x}"
        )));
    }
    Ok(format_literal(neg, &digits, exp))
}

/// Float counterpart of `trim_double`; starts from 9 significant digits.
pub fn trim_float(v: f32) -> Result<String, DecompileError> {
    if v == 0.0 {
        return Ok(if v.is_sign_negative() { "-0.0" } else { "0.0" }.to_string());
    }
    let (neg, digits, exp) = split_scientific(&format!("{v:.8e}"));
    let bits = v.to_bits();
    let exact = |digits: &str, exp: i32| {
        scientific(digits, exp).parse::<f32>().is_ok_and(|p| {
            let p = if neg { -p } else { p };
            p.to_bits() == bits
        })
    };
    let (digits, exp) = shorten(digits, exp, &exact);
    if !exact(&digits, exp) {
        return Err(DecompileError::structural(format!(
            "round-trip violation trimming float {bits:#x}"
        )));
    }
    Ok(format_literal(neg, &digits, exp))
}

/// Greedy digit-dropping loop shared by both widths. `digits`/`exp` encode
/// the value `d0.d1d2... * 10^exp`; `exact` judges a candidate against the
/// original bit pattern.
fn shorten(digits: String, exp: i32, exact: &dyn Fn(&str, i32) -> bool) -> (String, i32) {
    let mut digits = trim_trailing_zeros(digits);
    let mut exp = exp;
    while digits.len() > 1 {
        let head = &digits[..digits.len() - 1];
        let truncated = trim_trailing_zeros(head.to_string());
        if exact(&truncated, exp) {
            digits = truncated;
            continue;
        }
        let (rounded, exp_bump) = increment_digits(head);
        let rounded = trim_trailing_zeros(rounded);
        if exact(&rounded, exp + exp_bump) {
            digits = rounded;
            exp += exp_bump;
            continue;
        }
        break;
    }
    (digits, exp)
}

/// Add one to the last digit, carrying leftward; a full carry (`999` ->
/// `1`) bumps the exponent.
fn increment_digits(digits: &str) -> (String, i32) {
    let mut ds: Vec<u8> = digits.bytes().collect();
    for i in (0..ds.len()).rev() {
        if ds[i] == b'9' {
            ds[i] = b'0';
        } else {
            ds[i] += 1;
            return (String::from_utf8(ds).expect("ascii digits"), 0);
        }
    }
    ("1".to_string(), 1)
}

fn trim_trailing_zeros(mut digits: String) -> String {
    while digits.len() > 1 && digits.ends_with('0') {
        digits.pop();
    }
    digits
}

/// `("1234", 2)` -> `"1.234e2"` — the re-parse form for exactness checks.
fn scientific(digits: &str, exp: i32) -> String {
    if digits.len() == 1 {
        format!("{digits}e{exp}")
    } else {
        format!("{}.{}e{}", &digits[..1], &digits[1..], exp)
    }
}

/// Split Rust `{:e}` output (`-1.25e-3`) into sign, bare digits and exponent.
fn split_scientific(text: &str) -> (bool, String, i32) {
    let (mantissa, exp) = text.split_once(['e', 'E']).expect("scientific form");
    let neg = mantissa.starts_with('-');
    let mantissa = mantissa.trim_start_matches('-');
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    (neg, digits, exp.parse().expect("exponent"))
}

/// Format digits/exponent as a Java-style literal: plain decimal inside
/// `1e-3 ..= 1e7`, scientific (`1.5E12`) outside.
fn format_literal(neg: bool, digits: &str, exp: i32) -> String {
    let mut out = String::new();
    if neg {
        out.push('-');
    }
    if (0..7).contains(&exp) {
        let point = exp as usize + 1;
        if digits.len() > point {
            out.push_str(&digits[..point]);
            out.push('.');
            out.push_str(&digits[point..]);
        } else {
            out.push_str(digits);
            out.push_str(&"0".repeat(point - digits.len()));
            out.push_str(".0");
        }
    } else if (-3..0).contains(&exp) {
        out.push_str("0.");
        out.push_str(&"0".repeat((-exp - 1) as usize));
        out.push_str(digits);
    } else {
        out.push_str(&digits[..1]);
        out.push('.');
        if digits.len() > 1 {
            out.push_str(&digits[1..]);
        } else {
            out.push('0');
        }
        out.push('E');
        out.push_str(&exp.to_string());
    }
    out
}
