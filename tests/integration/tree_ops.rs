//! The uniform structural contract: copy fidelity, identity-based
//! replacement, bytecode-range union, value equality, and idempotent
//! constant retyping.

use dejava::infer::normalize_const_types;
use dejava::{
    BytecodeRange, DecompileContext, Exprent, ExprentKind, FunctionType, Options, VarType,
};

fn ctx() -> DecompileContext {
    DecompileContext::new(Options::default(), "com/example/Demo")
}

fn sample_tree(c: &mut DecompileContext) -> Exprent {
    let a = Exprent::local_var(c, "a", VarType::INT)
        .with_bytecode(BytecodeRange::from_offsets([0]));
    let b = Exprent::const_int(c, 7).with_bytecode(BytecodeRange::from_offsets([1]));
    let mul = Exprent::function(c, FunctionType::Mul, vec![a, b])
        .with_bytecode(BytecodeRange::from_offsets([2]));
    let d = Exprent::local_var(c, "d", VarType::INT)
        .with_bytecode(BytecodeRange::from_offsets([3]));
    Exprent::function(c, FunctionType::Add, vec![mul, d])
        .with_bytecode(BytecodeRange::from_offsets([4]))
}

#[test]
fn copy_is_equal_distinct_and_independent() {
    let mut c = ctx();
    let original = sample_tree(&mut c);
    let mut copy = original.copy(&mut c);

    assert_eq!(original, copy);
    assert_ne!(original.id, copy.id);

    // Mutating a grandchild of the copy must not touch the original.
    let replacement = Exprent::const_int(&mut c, 999);
    let ExprentKind::Function { operands, .. } = &mut copy.kind else { unreachable!() };
    let grandchild_id = operands[0].children()[1].id;
    assert!(operands[0].replace_child(grandchild_id, replacement).is_some());
    assert_ne!(original, copy);

    let ExprentKind::Function { operands, .. } = &original.kind else { unreachable!() };
    let ExprentKind::Function { operands: inner, .. } = &operands[0].kind else { unreachable!() };
    assert!(matches!(
        inner[1].kind,
        ExprentKind::Const { value: dejava::ConstValue::Int(7), .. }
    ));
}

#[test]
fn copy_assigns_fresh_ids_everywhere() {
    let mut c = ctx();
    let original = sample_tree(&mut c);
    let copy = original.copy(&mut c);

    let mut original_ids = Vec::new();
    original.walk(&mut |e| original_ids.push(e.id));
    let mut copy_ids = Vec::new();
    copy.walk(&mut |e| copy_ids.push(e.id));

    assert_eq!(original_ids.len(), copy_ids.len());
    for id in &copy_ids {
        assert!(!original_ids.contains(id), "copy reused id {id}");
    }
}

#[test]
fn replace_needs_reference_identity_not_value_equality() {
    let mut c = ctx();
    let a1 = Exprent::const_int(&mut c, 1);
    let a2 = Exprent::const_int(&mut c, 1);
    assert_eq!(a1, a2);
    let a2_id = a2.id;
    let mut sum = Exprent::function(&mut c, FunctionType::Add, vec![a1, a2]);

    // Replacing by the *second* operand's identity must leave the first
    // (value-equal) operand alone.
    let replacement = Exprent::const_int(&mut c, 2);
    assert!(sum.replace_child(a2_id, replacement).is_some());
    let ExprentKind::Function { operands, .. } = &sum.kind else { unreachable!() };
    assert!(matches!(operands[0].kind, ExprentKind::Const { value: dejava::ConstValue::Int(1), .. }));
    assert!(matches!(operands[1].kind, ExprentKind::Const { value: dejava::ConstValue::Int(2), .. }));
}

#[test]
fn replace_with_absent_id_is_noop() {
    let mut c = ctx();
    let mut tree = sample_tree(&mut c);
    let before = tree.clone();
    let replacement = Exprent::const_int(&mut c, 0);
    assert!(tree.replace_child(u32::MAX, replacement).is_none());
    assert_eq!(tree, before);
}

#[test]
fn fill_bytecode_range_measures_whole_subtree() {
    let mut c = ctx();
    let tree = sample_tree(&mut c);
    let mut acc = BytecodeRange::empty();
    tree.fill_bytecode_range(&mut acc);
    assert_eq!(acc, BytecodeRange::from_offsets([0, 1, 2, 3, 4]));
}

#[test]
fn synthetic_nodes_contribute_nothing_to_ranges() {
    let mut c = ctx();
    let real = Exprent::local_var(&mut c, "x", VarType::INT)
        .with_bytecode(BytecodeRange::from_offsets([9]));
    let synthetic = Exprent::const_int(&mut c, 0);
    let sum = Exprent::function(&mut c, FunctionType::Add, vec![real, synthetic]);
    let mut acc = BytecodeRange::empty();
    sum.fill_bytecode_range(&mut acc);
    assert_eq!(acc, BytecodeRange::from_offsets([9]));
}

#[test]
fn equality_ignores_identity_and_ranges() {
    let mut c = ctx();
    let first = sample_tree(&mut c);
    let mut second = sample_tree(&mut c);
    second.bytecode = BytecodeRange::from_offsets([100]);
    assert_eq!(first, second);
}

#[test]
fn normalization_is_idempotent_over_a_full_tree() {
    let mut c = ctx();
    let ch = Exprent::local_var(&mut c, "ch", VarType::CHAR);
    let lit = Exprent::const_int(&mut c, 'z' as i32);
    let cmp = Exprent::function(&mut c, FunctionType::Eq, vec![ch, lit]);
    let flag = Exprent::local_var(&mut c, "flag", VarType::BOOLEAN);
    let mut tree = Exprent::function(&mut c, FunctionType::BoolOr, vec![flag, cmp]);

    normalize_const_types(&mut tree, &c);
    let after_once = tree.clone();
    normalize_const_types(&mut tree, &c);
    assert_eq!(tree, after_once);
}

#[test]
fn children_cover_every_direct_child_exactly_once() {
    let mut c = ctx();
    let tree = sample_tree(&mut c);
    let children = tree.children();
    assert_eq!(children.len(), 2);
    let mut ids: Vec<u32> = children.iter().map(|e| e.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 2);
}
