//! Property-based tests for the shortest-round-trip decimal algorithm.
//!
//! Two invariants from the canonicalizer contract:
//! 1. Exactness — the rendered literal re-parses to the identical bit
//!    pattern, for every finite value.
//! 2. Minimality — no decimal string with fewer significant digits (under
//!    the same truncate/round-up rule) also round-trips.

use dejava::literal::{trim_double, trim_float};
use proptest::prelude::*;

/// Significant digits of a rendered literal (sign, point and exponent
/// stripped).
fn digit_count(text: &str) -> usize {
    let mantissa = text.split(['E', 'e']).next().unwrap();
    mantissa
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>()
        .trim_start_matches('0')
        .trim_end_matches('0')
        .len()
        .max(1)
}

#[test]
fn prop_double_roundtrip_exact() {
    proptest!(|(bits in any::<u64>())| {
        let v = f64::from_bits(bits);
        prop_assume!(v.is_finite());
        let text = trim_double(v).unwrap();
        let parsed: f64 = text.parse().unwrap();
        prop_assert_eq!(parsed.to_bits(), v.to_bits(), "rendered {}", text);
    });
}

#[test]
fn prop_float_roundtrip_exact() {
    proptest!(|(bits in any::<u32>())| {
        let v = f32::from_bits(bits);
        prop_assume!(v.is_finite());
        let text = trim_float(v).unwrap();
        let parsed: f32 = text.parse().unwrap();
        prop_assert_eq!(parsed.to_bits(), v.to_bits(), "rendered {}", text);
    });
}

#[test]
fn prop_double_no_shorter_form_roundtrips() {
    proptest!(|(bits in any::<u64>())| {
        let v = f64::from_bits(bits);
        prop_assume!(v.is_finite() && v != 0.0);
        let text = trim_double(v).unwrap();
        let digits = digit_count(&text);
        prop_assume!(digits > 1);
        // Chop the least significant digit both ways; neither may survive.
        let shorter_parses_back = shorter_candidates(v.abs(), digits - 1)
            .into_iter()
            .any(|cand| cand.parse::<f64>().is_ok_and(|p| p.to_bits() == v.abs().to_bits()));
        prop_assert!(!shorter_parses_back, "a shorter form than {} round-trips", text);
    });
}

#[test]
fn prop_float_no_shorter_form_roundtrips() {
    proptest!(|(bits in any::<u32>())| {
        let v = f32::from_bits(bits);
        prop_assume!(v.is_finite() && v != 0.0);
        let text = trim_float(v).unwrap();
        let digits = digit_count(&text);
        prop_assume!(digits > 1);
        let shorter_parses_back = shorter_candidates(f64::from(v.abs()), digits - 1)
            .into_iter()
            .any(|cand| cand.parse::<f32>().is_ok_and(|p| p.to_bits() == v.abs().to_bits()));
        prop_assert!(!shorter_parses_back, "a shorter form than {} round-trips", text);
    });
}

/// All `target_digits`-digit candidates near `v`: the nearest rounding at
/// that precision plus its decrement and increment, which together cover
/// the floor and ceiling of `v` on the shorter grid.
fn shorter_candidates(v: f64, target_digits: usize) -> Vec<String> {
    let exact = format!("{:.*e}", target_digits.saturating_sub(1), v);
    let (mantissa, exp) = exact.split_once('e').unwrap();
    let exp: i32 = exp.parse().unwrap();
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    let mut out = vec![assemble(&digits, exp)];
    if let Some(decremented) = decrement_digits(&digits) {
        out.push(assemble(&decremented, exp));
    }
    let (incremented, exp_bump) = increment_digits(&digits);
    out.push(assemble(&incremented, exp + exp_bump));
    out
}

fn assemble(digits: &str, exp: i32) -> String {
    if digits.len() == 1 {
        format!("{digits}e{exp}")
    } else {
        format!("{}.{}e{}", &digits[..1], &digits[1..], exp)
    }
}

fn decrement_digits(digits: &str) -> Option<String> {
    let mut ds: Vec<u8> = digits.bytes().collect();
    for i in (0..ds.len()).rev() {
        if ds[i] == b'0' {
            ds[i] = b'9';
        } else {
            ds[i] -= 1;
            return Some(String::from_utf8(ds).unwrap());
        }
    }
    None
}

fn increment_digits(digits: &str) -> (String, i32) {
    let mut ds: Vec<u8> = digits.bytes().collect();
    for i in (0..ds.len()).rev() {
        if ds[i] == b'9' {
            ds[i] = b'0';
        } else {
            ds[i] += 1;
            return (String::from_utf8(ds).unwrap(), 0);
        }
    }
    ("1".to_string(), 1)
}

#[test]
fn prop_double_matches_platform_shortest_digit_count() {
    // Rust's `{:e}` output is itself a shortest round-trip form, so the
    // trimming loop must land on the same number of significant digits.
    proptest!(|(bits in any::<u64>())| {
        let v = f64::from_bits(bits);
        prop_assume!(v.is_finite() && v != 0.0);
        let ours = digit_count(&trim_double(v).unwrap());
        let shortest = digit_count(&format!("{v:e}"));
        prop_assert_eq!(ours, shortest);
    });
}

#[test]
fn prop_trim_is_deterministic() {
    proptest!(|(bits in any::<u64>())| {
        let v = f64::from_bits(bits);
        prop_assume!(v.is_finite());
        prop_assert_eq!(trim_double(v).unwrap(), trim_double(v).unwrap());
    });
}
