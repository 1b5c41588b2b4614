//! Constant canonicalization expectations across the option surface.

use dejava::literal::{render_const, trim_double, trim_float};
use dejava::{ConstValue, DecompileContext, Options, VarType};

fn ctx_with(opts: Options) -> DecompileContext {
    DecompileContext::new(opts, "com/example/Demo")
}

fn defaults() -> DecompileContext {
    ctx_with(Options::default())
}

fn standardized() -> DecompileContext {
    ctx_with(Options { standardize_floating_point_numbers: true, ..Options::default() })
}

fn render(value: &ConstValue, ty: &VarType, ctx: &DecompileContext) -> String {
    render_const(value, ty, false, ctx).unwrap()
}

#[test]
fn float_one_with_standardize() {
    let c = standardized();
    assert_eq!(render(&ConstValue::float(1.0), &VarType::FLOAT, &c), "1.0F");
}

#[test]
fn double_nan_as_division_when_literals_as_is() {
    let c = ctx_with(Options {
        literals_as_is: true,
        standardize_floating_point_numbers: true,
        ..Options::default()
    });
    assert_eq!(render(&ConstValue::double(f64::NAN), &VarType::DOUBLE, &c), "0.0D / 0.0D");
}

#[test]
fn named_sentinels_by_default() {
    let c = defaults();
    assert_eq!(
        render(&ConstValue::double(f64::NAN), &VarType::DOUBLE, &c),
        "Double.NaN"
    );
    assert_eq!(
        render(&ConstValue::float(f32::INFINITY), &VarType::FLOAT, &c),
        "Float.POSITIVE_INFINITY"
    );
    assert_eq!(
        render(&ConstValue::Int(i32::MAX), &VarType::INT, &c),
        "Integer.MAX_VALUE"
    );
    assert_eq!(
        render(&ConstValue::Long(i64::MIN), &VarType::LONG, &c),
        "Long.MIN_VALUE"
    );
    assert_eq!(
        render(&ConstValue::double(std::f64::consts::PI), &VarType::DOUBLE, &c),
        "Math.PI"
    );
}

#[test]
fn literals_as_is_suppresses_names() {
    let c = ctx_with(Options { literals_as_is: true, ..Options::default() });
    assert_eq!(render(&ConstValue::Int(i32::MAX), &VarType::INT, &c), "2147483647");
    assert_eq!(render(&ConstValue::Long(i64::MAX), &VarType::LONG, &c), "9223372036854775807L");
}

#[test]
fn degree_radian_factors() {
    let c = defaults();
    assert_eq!(
        render(
            &ConstValue::double(std::f64::consts::PI / 180.0),
            &VarType::DOUBLE,
            &c
        ),
        "(Math.PI / 180)"
    );
    assert_eq!(
        render(
            &ConstValue::double(180.0 / std::f64::consts::PI),
            &VarType::DOUBLE,
            &c
        ),
        "(180.0 / Math.PI)"
    );
}

#[test]
fn double_suffix_only_when_standardized() {
    assert_eq!(render(&ConstValue::double(1.5), &VarType::DOUBLE, &defaults()), "1.5");
    assert_eq!(render(&ConstValue::double(1.5), &VarType::DOUBLE, &standardized()), "1.5D");
}

#[test]
fn float_always_carries_suffix() {
    assert_eq!(render(&ConstValue::float(2.5), &VarType::FLOAT, &defaults()), "2.5F");
}

#[test]
fn widened_float_shortens_double() {
    let c = standardized();
    let widened = f64::from(0.1_f32);
    assert_eq!(render(&ConstValue::double(widened), &VarType::DOUBLE, &c), "(double)0.1F");
}

#[test]
fn long_literals_and_bounds() {
    let c = defaults();
    assert_eq!(render(&ConstValue::Long(0), &VarType::LONG, &c), "0L");
    assert_eq!(render(&ConstValue::Long(-42), &VarType::LONG, &c), "-42L");
}

#[test]
fn char_constants() {
    let c = defaults();
    assert_eq!(render(&ConstValue::Int('A' as i32), &VarType::CHAR, &c), "'A'");
    assert_eq!(render(&ConstValue::Int('\n' as i32), &VarType::CHAR, &c), "'\\n'");
    assert_eq!(render(&ConstValue::Int(0x0), &VarType::CHAR, &c), "'\\u0000'");
}

#[test]
fn string_with_mixed_content() {
    let c = defaults();
    assert_eq!(
        render(
            &ConstValue::String("line1\nline2\t\"x\"".to_string()),
            &VarType::string(),
            &c
        ),
        "\"line1\\nline2\\t\\\"x\\\"\""
    );
}

#[test]
fn boolean_coercion_in_boolean_context() {
    let c = defaults();
    assert_eq!(render_const(&ConstValue::Int(1), &VarType::INT, true, &c).unwrap(), "true");
    assert_eq!(render_const(&ConstValue::Int(0), &VarType::INT, true, &c).unwrap(), "false");
}

#[test]
fn trim_is_exact_for_known_awkward_values() {
    // Values whose shortest forms historically tripped naive formatters.
    for v in [
        5e-324,
        2.2250738585072011e-308, // near MIN_NORMAL boundary
        9007199254740993.0,      // 2^53 + 1 (not representable; rounds)
        0.1 + 0.2,
    ] {
        let text = trim_double(v).unwrap();
        let parsed: f64 = text.parse().unwrap();
        assert_eq!(parsed.to_bits(), v.to_bits(), "value {v:?} rendered {text}");
    }
}

#[test]
fn trim_float_is_exact_for_known_awkward_values() {
    for v in [1.1_f32, 16777217.0_f32, 3.4028235e38_f32] {
        let text = trim_float(v).unwrap();
        let parsed: f32 = text.parse().unwrap();
        assert_eq!(parsed.to_bits(), v.to_bits(), "value {v:?} rendered {text}");
    }
}
