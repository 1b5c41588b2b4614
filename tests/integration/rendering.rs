//! End-to-end rendering expectations: tree in, Java text out.

use dejava::context::MethodContext;
use dejava::exprent::{InvokeKind, MonitorKind};
use dejava::{
    BytecodeMappingTracer, BytecodeRange, DecompileContext, Exprent, ExprentKind, FunctionType,
    MethodDescriptor, Options, VarType, render_expression,
};
use insta::assert_snapshot;

fn ctx() -> DecompileContext {
    DecompileContext::new(Options::default(), "com/example/Demo")
}

fn render(expr: &mut Exprent, ctx: &DecompileContext) -> String {
    let mut tracer = BytecodeMappingTracer::new();
    render_expression(expr, 0, ctx, &mut tracer).unwrap()
}

fn int_var(ctx: &mut DecompileContext, name: &str) -> Exprent {
    Exprent::local_var(ctx, name, VarType::INT)
}

#[test]
fn add_over_mul_needs_no_parens() {
    let mut c = ctx();
    let a = int_var(&mut c, "a");
    let b = int_var(&mut c, "b");
    let d = int_var(&mut c, "c");
    let mul = Exprent::function(&mut c, FunctionType::Mul, vec![b, d]);
    let mut add = Exprent::function(&mut c, FunctionType::Add, vec![a, mul]);
    assert_eq!(render(&mut add, &c), "a + b * c");
}

#[test]
fn mul_over_add_keeps_parens() {
    let mut c = ctx();
    let a = int_var(&mut c, "a");
    let b = int_var(&mut c, "b");
    let d = int_var(&mut c, "c");
    let add = Exprent::function(&mut c, FunctionType::Add, vec![a, b]);
    let mut mul = Exprent::function(&mut c, FunctionType::Mul, vec![add, d]);
    assert_eq!(render(&mut mul, &c), "(a + b) * c");
}

#[test]
fn deep_mixed_precedence_tree() {
    // ((a + b * c) << 2) ^ (d | e) — every grouping decision in one tree.
    let mut c = ctx();
    let a = int_var(&mut c, "a");
    let b = int_var(&mut c, "b");
    let cc = int_var(&mut c, "c");
    let d = int_var(&mut c, "d");
    let e = int_var(&mut c, "e");
    let mul = Exprent::function(&mut c, FunctionType::Mul, vec![b, cc]);
    let add = Exprent::function(&mut c, FunctionType::Add, vec![a, mul]);
    let two = Exprent::const_int(&mut c, 2);
    let shl = Exprent::function(&mut c, FunctionType::Shl, vec![add, two]);
    let or = Exprent::function(&mut c, FunctionType::Or, vec![d, e]);
    let mut xor = Exprent::function(&mut c, FunctionType::Xor, vec![shl, or]);
    assert_eq!(render(&mut xor, &c), "a + b * c << 2 ^ (d | e)");
}

#[test]
fn conditional_chain_snapshot() {
    let mut c = ctx();
    let limit = int_var(&mut c, "limit");
    let size = int_var(&mut c, "size");
    let lt = Exprent::function(&mut c, FunctionType::Lt, vec![size, limit]);
    let empty = Exprent::local_var(&mut c, "empty", VarType::BOOLEAN);
    let not = Exprent::function(&mut c, FunctionType::BoolNot, vec![empty]);
    let mut and = Exprent::function(&mut c, FunctionType::BoolAnd, vec![not, lt]);
    assert_snapshot!(render(&mut and, &c), @"!empty && size < limit");
}

#[test]
fn comparison_against_char_variable_retypes_literal() {
    let mut c = ctx();
    let ch = Exprent::local_var(&mut c, "ch", VarType::CHAR);
    let lit = Exprent::const_int(&mut c, 'q' as i32);
    let mut cmp = Exprent::function(&mut c, FunctionType::Eq, vec![ch, lit]);
    assert_eq!(render(&mut cmp, &c), "ch == 'q'");
}

#[test]
fn comparison_against_unprintable_stays_numeric() {
    let mut c = ctx();
    let ch = Exprent::local_var(&mut c, "ch", VarType::CHAR);
    let lit = Exprent::const_int(&mut c, 1);
    let mut cmp = Exprent::function(&mut c, FunctionType::Eq, vec![ch, lit]);
    assert_eq!(render(&mut cmp, &c), "ch == 1");
}

#[test]
fn boxing_call_elision_and_suppression() {
    let mut c = ctx();
    let five = Exprent::const_int(&mut c, 5);
    let mut call = Exprent::new(
        &mut c,
        ExprentKind::Invocation {
            name: "valueOf".to_string(),
            class_name: "java/lang/Integer".to_string(),
            invoke_kind: InvokeKind::Static,
            instance: None,
            params: vec![five],
            descriptor: MethodDescriptor::from_descriptor("(I)Ljava/lang/Integer;").unwrap(),
            uses_boxing_result: false,
        },
    );
    assert_eq!(render(&mut call, &c), "5");
    call.mark_using_boxing_result();
    assert_eq!(render(&mut call, &c), "Integer.valueOf(5)");
}

#[test]
fn invocation_argument_adjusted_against_descriptor() {
    // A bytechar literal passed where char is declared renders as a char.
    let mut c = ctx();
    let lit = Exprent::const_int(&mut c, 'x' as i32);
    let s = Exprent::local_var(&mut c, "s", VarType::string());
    let mut call = Exprent::new(
        &mut c,
        ExprentKind::Invocation {
            name: "indexOf".to_string(),
            class_name: "java/lang/String".to_string(),
            invoke_kind: InvokeKind::Virtual,
            instance: Some(Box::new(s)),
            params: vec![lit],
            descriptor: MethodDescriptor::from_descriptor("(C)I").unwrap(),
            uses_boxing_result: false,
        },
    );
    assert_eq!(render(&mut call, &c), "s.indexOf('x')");
}

#[test]
fn synchronized_block_header() {
    let mut c = ctx();
    let lock = Exprent::local_var(&mut c, "lock", VarType::java_lang_object());
    let mut enter = Exprent::new(
        &mut c,
        ExprentKind::Monitor { kind: MonitorKind::Enter, value: Box::new(lock) },
    );
    assert_eq!(render(&mut enter, &c), "synchronized (lock)");
}

#[test]
fn throw_with_declared_exceptions() {
    let mut c = DecompileContext::new(Options::default(), "com/example/Demo").with_method(
        MethodContext {
            name: "load".to_string(),
            descriptor: MethodDescriptor::from_descriptor("()V").unwrap(),
            thrown: vec!["java/io/IOException".to_string()],
        },
    );
    let null = Exprent::const_null(&mut c);
    let mut throw = Exprent::new(
        &mut c,
        ExprentKind::Exit {
            kind: dejava::ExitKind::Throw,
            value: Some(Box::new(null)),
            ret_type: VarType::VOID,
        },
    );
    assert_eq!(render(&mut throw, &c), "throw (java.io.IOException)null");
}

#[test]
fn nested_invocation_snapshot() {
    let mut c = ctx();
    let list = Exprent::local_var(&mut c, "list", VarType::object("java/util/List"));
    let i = int_var(&mut c, "i");
    let get = Exprent::new(
        &mut c,
        ExprentKind::Invocation {
            name: "get".to_string(),
            class_name: "java/util/List".to_string(),
            invoke_kind: InvokeKind::Virtual,
            instance: Some(Box::new(list)),
            params: vec![i],
            descriptor: MethodDescriptor::from_descriptor("(I)Ljava/lang/Object;").unwrap(),
            uses_boxing_result: false,
        },
    );
    let mut to_string = Exprent::new(
        &mut c,
        ExprentKind::Invocation {
            name: "toString".to_string(),
            class_name: "java/lang/Object".to_string(),
            invoke_kind: InvokeKind::Virtual,
            instance: Some(Box::new(get)),
            params: vec![],
            descriptor: MethodDescriptor::from_descriptor("()Ljava/lang/String;").unwrap(),
            uses_boxing_result: false,
        },
    );
    assert_snapshot!(render(&mut to_string, &c), @"list.get(i).toString()");
}

#[test]
fn assignment_statement_has_no_terminator() {
    let mut c = ctx();
    let x = int_var(&mut c, "x");
    let y = int_var(&mut c, "y");
    let mut assign = Exprent::new(
        &mut c,
        ExprentKind::Assignment { left: Box::new(x), right: Box::new(y), cond_type: None },
    );
    let text = render(&mut assign, &c);
    assert_eq!(text, "x = y");
    assert!(!text.ends_with(';'));
}

#[test]
fn tracer_collects_whole_subtree() {
    let mut c = ctx();
    let a = int_var(&mut c, "a").with_bytecode(BytecodeRange::from_offsets([0, 1]));
    let b = int_var(&mut c, "b").with_bytecode(BytecodeRange::from_offsets([2]));
    let mut add = Exprent::function(&mut c, FunctionType::Add, vec![a, b])
        .with_bytecode(BytecodeRange::from_offsets([3]));
    let mut tracer = BytecodeMappingTracer::with_start_line(12);
    render_expression(&mut add, 0, &c, &mut tracer).unwrap();
    let mapping = tracer.mapping();
    assert_eq!(mapping.len(), 4);
    for offset in [0, 1, 2, 3] {
        assert_eq!(mapping.get(&offset), Some(&12));
    }
}

#[test]
fn rendering_propagates_structural_errors() {
    let mut c = ctx();
    let mut clinit = Exprent::new(
        &mut c,
        ExprentKind::Invocation {
            name: "<clinit>".to_string(),
            class_name: "com/example/Demo".to_string(),
            invoke_kind: InvokeKind::StaticInit,
            instance: None,
            params: vec![],
            descriptor: MethodDescriptor::from_descriptor("()V").unwrap(),
            uses_boxing_result: false,
        },
    );
    let mut tracer = BytecodeMappingTracer::new();
    assert!(render_expression(&mut clinit, 0, &c, &mut tracer).is_err());
}

#[test]
fn generic_signature_rendered_when_enabled() {
    let mut c = DecompileContext::new(
        Options { decompile_generic_signatures: true, ..Options::default() },
        "com/example/Demo",
    );
    let list_of_string = VarType::generic_object("java/util/List", vec![VarType::string()]);
    let mut v = Exprent::new(
        &mut c,
        ExprentKind::Var {
            index: 1,
            version: 0,
            name: Some("names".to_string()),
            var_type: list_of_string,
            is_definition: true,
        },
    );
    assert_eq!(render(&mut v, &c), "java.util.List<String> names");
}
