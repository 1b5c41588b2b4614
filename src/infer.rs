//! Type-bounds inference.
//!
//! Two cooperating mechanisms: downward bound propagation
//! (`check_expr_type_bounds`) computes advisory min/max operand types the
//! cast-insertion logic consumes, and contextual retyping
//! (`adjust_const_type`, `normalize_const_types`) reclassifies the displayed
//! type of ambiguous constants once surrounding context is known.
//!
//! Retyping mutates `Const` nodes in place. The mutation is idempotent:
//! running any of these passes again with the same or tightening bounds is a
//! no-op, which `tests/integration/tree_ops.rs` exercises.

use std::collections::HashMap;

use crate::context::{DecompileContext, MethodDescriptor};
use crate::exprent::{ExitKind, Exprent, ExprentKind, ExprentTag, FunctionType};
use crate::literal::has_char_display;
use crate::types::{BaseType, TypeFamily, VarType};

/// Advisory constraints on one child, keyed by child id in `TypeBounds`.
/// Consumed immediately by the caller to decide casts, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeBound {
    pub min: Option<VarType>,
    pub max: Option<VarType>,
}

pub type TypeBounds = HashMap<u32, TypeBound>;

fn is_comparison(fn_type: FunctionType) -> bool {
    matches!(
        fn_type,
        FunctionType::Eq
            | FunctionType::Ne
            | FunctionType::Lt
            | FunctionType::Ge
            | FunctionType::Gt
            | FunctionType::Le
    )
}

/// Compute, for each child, the minimum and/or maximum acceptable type given
/// this node's own semantics.
pub fn check_expr_type_bounds(expr: &Exprent, ctx: &DecompileContext) -> TypeBounds {
    let mut bounds = TypeBounds::new();
    match &expr.kind {
        ExprentKind::Function { fn_type, operands, .. } => match fn_type {
            FunctionType::Shl | FunctionType::Shr | FunctionType::Ushr => {
                // The shift distance is int-typed no matter the value width.
                if let Some(right) = operands.get(1) {
                    bounds.insert(
                        right.id,
                        TypeBound {
                            min: Some(VarType::BYTECHAR),
                            max: Some(VarType::INT),
                        },
                    );
                }
            }
            FunctionType::Ternary => {
                let result = expr.expr_type(ctx);
                let min = VarType::min_type_in_family(result.family());
                for branch in operands.iter().skip(1) {
                    bounds.insert(
                        branch.id,
                        TypeBound { min: Some(min.clone()), max: None },
                    );
                }
            }
            FunctionType::BoolAnd | FunctionType::BoolOr | FunctionType::BoolNot => {
                for op in operands {
                    bounds.insert(
                        op.id,
                        TypeBound {
                            min: Some(VarType::BOOLEAN),
                            max: Some(VarType::BOOLEAN),
                        },
                    );
                }
            }
            FunctionType::And | FunctionType::Or | FunctionType::Xor => {
                if expr.expr_type(ctx) == VarType::BOOLEAN {
                    for op in operands {
                        bounds.insert(
                            op.id,
                            TypeBound {
                                min: Some(VarType::BOOLEAN),
                                max: Some(VarType::BOOLEAN),
                            },
                        );
                    }
                }
            }
            _ => {}
        },
        ExprentKind::ArrayAccess { index, .. } => {
            bounds.insert(
                index.id,
                TypeBound { min: Some(VarType::BYTECHAR), max: Some(VarType::INT) },
            );
        }
        ExprentKind::Assignment { left, right, .. } => {
            let left_type = left.expr_type(ctx);
            if left_type.is_primitive() {
                bounds.insert(right.id, TypeBound { min: Some(left_type), max: None });
            }
        }
        ExprentKind::Exit { kind: ExitKind::Return, value: Some(value), ret_type } => {
            if ret_type.is_primitive() {
                bounds.insert(
                    value.id,
                    TypeBound { min: Some(ret_type.clone()), max: None },
                );
            }
        }
        ExprentKind::Invocation { params, descriptor, .. } => {
            for (param, target) in params.iter().zip(&descriptor.params) {
                if target.is_primitive() {
                    bounds.insert(param.id, TypeBound { min: None, max: Some(target.clone()) });
                }
            }
        }
        ExprentKind::SwitchHead { selector, case_values } => {
            let selector_type = selector.expr_type(ctx);
            for case in case_values {
                bounds.insert(
                    case.id,
                    TypeBound { min: None, max: Some(selector_type.clone()) },
                );
            }
        }
        _ => {}
    }
    bounds
}

/// Narrow or reclassify a constant's displayed type once its expected type
/// is known. No-op for non-constants and non-integral constants. Idempotent:
/// re-applying with the same expectation leaves the node unchanged.
pub fn adjust_const_type(expr: &mut Exprent, expected: &VarType) {
    let ExprentKind::Const { value, const_type, boolean_context } = &mut expr.kind else {
        return;
    };
    if expected.family() == TypeFamily::Boolean {
        *boolean_context = true;
        return;
    }
    if const_type.family() != TypeFamily::Integer {
        return;
    }
    let expects_char = expected == &VarType::CHAR
        || expected.class_name() == Some("java/lang/Character");
    if expects_char
        && matches!(const_type.base, BaseType::ByteChar | BaseType::ShortChar)
        && value.as_int().is_some_and(has_char_display)
    {
        tracing::trace!(value = ?value, "retyping constant as char");
        *const_type = VarType::CHAR;
        return;
    }
    let expects_int =
        expected == &VarType::INT || expected.class_name() == Some("java/lang/Integer");
    if expects_int {
        tracing::trace!(value = ?value, "retyping constant as int");
        *const_type = VarType::INT;
    }
}

/// Contextual retyping entry point: push `upper_bound` into the node, then
/// report its (possibly refined) own type.
pub fn infer_expr_type(
    expr: &mut Exprent,
    upper_bound: &VarType,
    ctx: &DecompileContext,
) -> VarType {
    adjust_const_type(expr, upper_bound);
    expr.expr_type(ctx)
}

/// The pre-render normalization walk. Applies the comparison-operand
/// adjustment (an untyped literal compared against a `char` renders as a
/// character constant) and pushes expected types into constants at
/// assignment, return, argument and switch-case positions.
///
/// Running this twice over the same tree is a no-op.
pub fn normalize_const_types(expr: &mut Exprent, ctx: &DecompileContext) {
    match &mut expr.kind {
        ExprentKind::Function { fn_type, operands, .. }
            if is_comparison(*fn_type) && operands.len() == 2 =>
        {
            let left_type = operands[0].expr_type(ctx);
            let right_type = operands[1].expr_type(ctx);
            let left_const = operands[0].tag() == ExprentTag::Const;
            let right_const = operands[1].tag() == ExprentTag::Const;
            if right_const && !left_const {
                adjust_const_type(&mut operands[1], &left_type);
            } else if left_const && !right_const {
                adjust_const_type(&mut operands[0], &right_type);
            }
        }
        ExprentKind::Assignment { left, right, .. } => {
            let left_type = left.expr_type(ctx);
            adjust_const_type(right.as_mut(), &left_type);
        }
        ExprentKind::Exit { kind: ExitKind::Return, value: Some(value), ret_type } => {
            let expected = ret_type.clone();
            adjust_const_type(value.as_mut(), &expected);
        }
        ExprentKind::Invocation { params, descriptor, .. } => {
            for (param, target) in params.iter_mut().zip(descriptor.params.clone()) {
                adjust_const_type(param, &target);
            }
        }
        ExprentKind::SwitchHead { selector, case_values } => {
            let selector_type = selector.expr_type(ctx);
            for case in case_values {
                adjust_const_type(case, &selector_type);
            }
        }
        _ => {}
    }
    for child in expr.children_mut() {
        normalize_const_types(child, ctx);
    }
}

/// Overload-ambiguity detection for call-site casts.
///
/// Among declared methods of `class_name` with the invoked name, the same
/// arity and matching parameter type families, any position where some
/// candidate's exact parameter type differs from the invoked descriptor's
/// must carry an explicit cast, even where widening alone would make it
/// redundant. Heuristic: the invoked overload is the exact-descriptor match
/// (observed behavior), with no boxing/varargs widening closure.
pub fn ambiguous_param_casts(
    class_name: &str,
    name: &str,
    descriptor: &MethodDescriptor,
    ctx: &DecompileContext,
) -> Vec<bool> {
    let mut flags = vec![false; descriptor.params.len()];
    let candidates: Vec<_> = ctx
        .methods
        .methods_of(class_name)
        .iter()
        .filter(|m| {
            m.name == name
                && m.descriptor.params.len() == descriptor.params.len()
                && m.descriptor
                    .params
                    .iter()
                    .zip(&descriptor.params)
                    .all(|(a, b)| a.family() == b.family())
        })
        .collect();
    if candidates.len() <= 1 {
        return flags;
    }
    tracing::debug!(class_name, name, count = candidates.len(), "ambiguous overload set");
    for candidate in candidates {
        for (i, (theirs, ours)) in
            candidate.descriptor.params.iter().zip(&descriptor.params).enumerate()
        {
            if theirs != ours {
                flags[i] = true;
            }
        }
    }
    flags
}
