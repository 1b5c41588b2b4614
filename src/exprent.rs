//! The expression node model.
//!
//! `Exprent` is the central data type of the core: one node of the
//! reconstructed expression tree, tagged with one of a closed set of
//! variants. Shared structure (per-unit id, bytecode range) lives on the
//! carrier struct; variant payloads live in `ExprentKind`.
//!
//! Passes over the tree are kept out of this module: rendering lives in
//! `render`, bounds/retyping in `infer`, rule matching in `matching`.

use serde::{Deserialize, Serialize};

use crate::bytecode::BytecodeRange;
use crate::context::{DecompileContext, MethodDescriptor};
use crate::types::{TypeFamily, VarType};

/// Discriminant identifying which expression kind a node is. Fixed at
/// construction; the enumeration is closed and exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExprentTag {
    ArrayAccess,
    Assignment,
    Assert,
    Const,
    Exit,
    Field,
    Function,
    If,
    Invocation,
    Monitor,
    New,
    Pattern,
    SwitchHead,
    Var,
    Annotation,
}

/// Operator selector for the n-ary `Function` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionType {
    // Binary arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    // Bitwise / logical (operand types decide which)
    And,
    Or,
    Xor,
    // Shifts
    Shl,
    Shr,
    Ushr,
    // Unary
    Neg,
    BitNot,
    BoolNot,
    // Pre/post increment and decrement
    PpI,
    IPp,
    MmI,
    IMm,
    // Comparisons
    Eq,
    Ne,
    Lt,
    Ge,
    Gt,
    Le,
    // Short-circuit
    BoolAnd,
    BoolOr,
    // Rest
    Ternary,
    Cast,
    InstanceOf,
    ArrayLength,
    StrConcat,
}

/// Literal payload of a `Const` node. Floating-point values are stored as
/// raw bit patterns so NaN payloads and `-0.0` survive value equality and
/// round-trip tests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstValue {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(u32),
    Double(u64),
    String(String),
    /// A class literal, internal name (`java/lang/String` for `String.class`).
    Class(String),
}

impl ConstValue {
    pub fn float(value: f32) -> Self {
        ConstValue::Float(value.to_bits())
    }

    pub fn double(value: f64) -> Self {
        ConstValue::Double(value.to_bits())
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            ConstValue::Float(bits) => Some(f32::from_bits(*bits)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConstValue::Double(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    /// Integral view of the value, if it has one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConstValue::Int(v) => Some(i64::from(*v)),
            ConstValue::Long(v) => Some(*v),
            ConstValue::Boolean(b) => Some(i64::from(*b)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitKind {
    Return,
    Throw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonitorKind {
    Enter,
    Exit,
}

/// How an invocation dispatches. `StaticInit` exists only so a translator
/// bug surfaces as a structural error instead of emitting `<clinit>()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvokeKind {
    Constructor,
    StaticInit,
    Virtual,
    Special,
    Static,
}

/// Variant payloads. Child expressions are exclusively owned by the parent;
/// a node reused in two structural positions must be `copy()`ed first to
/// preserve tree shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprentKind {
    ArrayAccess {
        array: Box<Exprent>,
        index: Box<Exprent>,
    },
    Assignment {
        left: Box<Exprent>,
        right: Box<Exprent>,
        /// Compound-assignment operator (`Some(Add)` renders `+=`); `None`
        /// renders plain `=`.
        cond_type: Option<FunctionType>,
    },
    Assert {
        condition: Option<Box<Exprent>>,
        message: Option<Box<Exprent>>,
    },
    Const {
        value: ConstValue,
        const_type: VarType,
        /// Whether the surrounding context permits a boolean reading of an
        /// integer 0/1 value.
        boolean_context: bool,
    },
    Exit {
        kind: ExitKind,
        value: Option<Box<Exprent>>,
        ret_type: VarType,
    },
    Field {
        name: String,
        class_name: String,
        /// `None` for static access.
        instance: Option<Box<Exprent>>,
        descriptor: VarType,
        is_static: bool,
    },
    Function {
        fn_type: FunctionType,
        operands: Vec<Exprent>,
        /// Target type for `Cast`/`InstanceOf`; result-type override for
        /// implicit widening conversions.
        implicit_type: Option<VarType>,
    },
    If {
        condition: Box<Exprent>,
    },
    Invocation {
        name: String,
        class_name: String,
        invoke_kind: InvokeKind,
        /// `None` for static invocations.
        instance: Option<Box<Exprent>>,
        params: Vec<Exprent>,
        descriptor: MethodDescriptor,
        /// Set by a containing expression that observably depends on the
        /// boxed identity; suppresses boxing-call elision.
        uses_boxing_result: bool,
    },
    Monitor {
        kind: MonitorKind,
        value: Box<Exprent>,
    },
    New {
        new_type: VarType,
        /// The `<init>` invocation for object construction.
        constructor: Option<Box<Exprent>>,
        array_lengths: Vec<Exprent>,
        array_init: Vec<Exprent>,
        /// Render the brace-only `{ ... }` form (field/array declaration
        /// initializer position).
        is_array_initializer: bool,
    },
    /// Record deconstruction: `Point(int x, int y) p`. Components are `Var`
    /// definitions or nested `Pattern`s.
    Pattern {
        pattern_type: VarType,
        components: Vec<Exprent>,
    },
    /// The selector of a switch; carries the case constants so their display
    /// types can be retyped against the selector.
    SwitchHead {
        selector: Box<Exprent>,
        case_values: Vec<Exprent>,
    },
    Var {
        index: u32,
        version: u32,
        name: Option<String>,
        var_type: VarType,
        /// Render as a declaration (`int x`) instead of a bare use.
        is_definition: bool,
    },
    Annotation {
        class_name: String,
        par_names: Vec<String>,
        par_values: Vec<Exprent>,
    },
}

/// One node of the reconstructed expression tree.
///
/// * `id` is unique within the decompilation unit and monotonically
///   increasing; it stands in for reference identity (`replace_child`,
///   diagnostics). `copy()` assigns fresh ids deep through the clone.
/// * `bytecode` is the set of originating instruction offsets; empty for
///   synthetic nodes.
/// * Value equality (`==`) compares variant and payload only — two nodes
///   with different ids can be equal. Identity-sensitive passes must
///   compare ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exprent {
    pub id: u32,
    pub bytecode: BytecodeRange,
    pub kind: ExprentKind,
}

impl PartialEq for Exprent {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Exprent {
    pub fn new(ctx: &mut DecompileContext, kind: ExprentKind) -> Self {
        Self { id: ctx.next_id(), bytecode: BytecodeRange::empty(), kind }
    }

    pub fn with_bytecode(mut self, bytecode: BytecodeRange) -> Self {
        self.bytecode = bytecode;
        self
    }

    // ── Convenience constructors ─────────────────────────────────────

    pub fn const_int(ctx: &mut DecompileContext, value: i32) -> Self {
        Self::new(
            ctx,
            ExprentKind::Const {
                value: ConstValue::Int(value),
                const_type: VarType::min_int_type(i64::from(value)),
                boolean_context: false,
            },
        )
    }

    pub fn const_long(ctx: &mut DecompileContext, value: i64) -> Self {
        Self::new(
            ctx,
            ExprentKind::Const {
                value: ConstValue::Long(value),
                const_type: VarType::LONG,
                boolean_context: false,
            },
        )
    }

    pub fn const_float(ctx: &mut DecompileContext, value: f32) -> Self {
        Self::new(
            ctx,
            ExprentKind::Const {
                value: ConstValue::float(value),
                const_type: VarType::FLOAT,
                boolean_context: false,
            },
        )
    }

    pub fn const_double(ctx: &mut DecompileContext, value: f64) -> Self {
        Self::new(
            ctx,
            ExprentKind::Const {
                value: ConstValue::double(value),
                const_type: VarType::DOUBLE,
                boolean_context: false,
            },
        )
    }

    pub fn const_string(ctx: &mut DecompileContext, value: impl Into<String>) -> Self {
        Self::new(
            ctx,
            ExprentKind::Const {
                value: ConstValue::String(value.into()),
                const_type: VarType::string(),
                boolean_context: false,
            },
        )
    }

    pub fn const_null(ctx: &mut DecompileContext) -> Self {
        Self::new(
            ctx,
            ExprentKind::Const {
                value: ConstValue::Null,
                const_type: VarType::NULL,
                boolean_context: false,
            },
        )
    }

    pub fn local_var(ctx: &mut DecompileContext, name: impl Into<String>, var_type: VarType) -> Self {
        Self::new(
            ctx,
            ExprentKind::Var {
                index: 0,
                version: 0,
                name: Some(name.into()),
                var_type,
                is_definition: false,
            },
        )
    }

    pub fn function(
        ctx: &mut DecompileContext,
        fn_type: FunctionType,
        operands: Vec<Exprent>,
    ) -> Self {
        Self::new(ctx, ExprentKind::Function { fn_type, operands, implicit_type: None })
    }

    // ── Uniform structural contract ──────────────────────────────────

    pub fn tag(&self) -> ExprentTag {
        match &self.kind {
            ExprentKind::ArrayAccess { .. } => ExprentTag::ArrayAccess,
            ExprentKind::Assignment { .. } => ExprentTag::Assignment,
            ExprentKind::Assert { .. } => ExprentTag::Assert,
            ExprentKind::Const { .. } => ExprentTag::Const,
            ExprentKind::Exit { .. } => ExprentTag::Exit,
            ExprentKind::Field { .. } => ExprentTag::Field,
            ExprentKind::Function { .. } => ExprentTag::Function,
            ExprentKind::If { .. } => ExprentTag::If,
            ExprentKind::Invocation { .. } => ExprentTag::Invocation,
            ExprentKind::Monitor { .. } => ExprentTag::Monitor,
            ExprentKind::New { .. } => ExprentTag::New,
            ExprentKind::Pattern { .. } => ExprentTag::Pattern,
            ExprentKind::SwitchHead { .. } => ExprentTag::SwitchHead,
            ExprentKind::Var { .. } => ExprentTag::Var,
            ExprentKind::Annotation { .. } => ExprentTag::Annotation,
        }
    }

    /// Every direct child exactly once, in stable left-to-right semantic
    /// order (operand order for operators, argument order for calls).
    pub fn children(&self) -> Vec<&Exprent> {
        let mut out = Vec::new();
        match &self.kind {
            ExprentKind::ArrayAccess { array, index } => {
                out.push(array.as_ref());
                out.push(index.as_ref());
            }
            ExprentKind::Assignment { left, right, .. } => {
                out.push(left.as_ref());
                out.push(right.as_ref());
            }
            ExprentKind::Assert { condition, message } => {
                out.extend(condition.as_deref());
                out.extend(message.as_deref());
            }
            ExprentKind::Const { .. } | ExprentKind::Var { .. } => {}
            ExprentKind::Exit { value, .. } => out.extend(value.as_deref()),
            ExprentKind::Field { instance, .. } => out.extend(instance.as_deref()),
            ExprentKind::Function { operands, .. } => out.extend(operands.iter()),
            ExprentKind::If { condition } => out.push(condition.as_ref()),
            ExprentKind::Invocation { instance, params, .. } => {
                out.extend(instance.as_deref());
                out.extend(params.iter());
            }
            ExprentKind::Monitor { value, .. } => out.push(value.as_ref()),
            ExprentKind::New { constructor, array_lengths, array_init, .. } => {
                out.extend(array_lengths.iter());
                out.extend(array_init.iter());
                out.extend(constructor.as_deref());
            }
            ExprentKind::Pattern { components, .. } => out.extend(components.iter()),
            ExprentKind::SwitchHead { selector, case_values } => {
                out.push(selector.as_ref());
                out.extend(case_values.iter());
            }
            ExprentKind::Annotation { par_values, .. } => out.extend(par_values.iter()),
        }
        out
    }

    /// Mutable view of the same child slots, in the same order.
    pub fn children_mut(&mut self) -> Vec<&mut Exprent> {
        let mut out = Vec::new();
        match &mut self.kind {
            ExprentKind::ArrayAccess { array, index } => {
                out.push(array.as_mut());
                out.push(index.as_mut());
            }
            ExprentKind::Assignment { left, right, .. } => {
                out.push(left.as_mut());
                out.push(right.as_mut());
            }
            ExprentKind::Assert { condition, message } => {
                out.extend(condition.as_deref_mut());
                out.extend(message.as_deref_mut());
            }
            ExprentKind::Const { .. } | ExprentKind::Var { .. } => {}
            ExprentKind::Exit { value, .. } => out.extend(value.as_deref_mut()),
            ExprentKind::Field { instance, .. } => out.extend(instance.as_deref_mut()),
            ExprentKind::Function { operands, .. } => out.extend(operands.iter_mut()),
            ExprentKind::If { condition } => out.push(condition.as_mut()),
            ExprentKind::Invocation { instance, params, .. } => {
                out.extend(instance.as_deref_mut());
                out.extend(params.iter_mut());
            }
            ExprentKind::Monitor { value, .. } => out.push(value.as_mut()),
            ExprentKind::New { constructor, array_lengths, array_init, .. } => {
                out.extend(array_lengths.iter_mut());
                out.extend(array_init.iter_mut());
                out.extend(constructor.as_deref_mut());
            }
            ExprentKind::Pattern { components, .. } => out.extend(components.iter_mut()),
            ExprentKind::SwitchHead { selector, case_values } => {
                out.push(selector.as_mut());
                out.extend(case_values.iter_mut());
            }
            ExprentKind::Annotation { par_values, .. } => out.extend(par_values.iter_mut()),
        }
        out
    }

    /// Deep clone with fresh ids throughout. The copy is value-equal to the
    /// original, identity-distinct, and shares no child ownership — the only
    /// sanctioned way to duplicate a subtree into a second structural
    /// position.
    pub fn copy(&self, ctx: &mut DecompileContext) -> Exprent {
        let mut clone = self.clone();
        clone.refresh_ids(ctx);
        clone
    }

    fn refresh_ids(&mut self, ctx: &mut DecompileContext) {
        self.id = ctx.next_id();
        for child in self.children_mut() {
            child.refresh_ids(ctx);
        }
    }

    /// Identity-based substitution of exactly one direct child slot. Returns
    /// the displaced child, or `None` (a no-op, not an error) when no direct
    /// child carries `old_id`. Callers needing recursive replacement walk
    /// the tree themselves.
    pub fn replace_child(&mut self, old_id: u32, new: Exprent) -> Option<Exprent> {
        for slot in self.children_mut() {
            if slot.id == old_id {
                return Some(std::mem::replace(slot, new));
            }
        }
        None
    }

    /// Union this node's own range and every descendant's range into the
    /// caller-supplied accumulator (the "measure" operation).
    pub fn fill_bytecode_range(&self, out: &mut BytecodeRange) {
        out.union_with(&self.bytecode);
        for child in self.children() {
            child.fill_bytecode_range(out);
        }
    }

    /// Pre-order traversal over the whole subtree, including `self`.
    pub fn walk(&self, f: &mut impl FnMut(&Exprent)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    /// Suppress boxing-call elision on an `Invocation`; no-op for other
    /// variants.
    pub fn mark_using_boxing_result(&mut self) {
        if let ExprentKind::Invocation { uses_boxing_result, .. } = &mut self.kind {
            *uses_boxing_result = true;
        }
    }

    // ── Own result type ──────────────────────────────────────────────

    /// The node's own value/result type. A pure function of already-known
    /// child types; degrades to `unknown`/`void` when insufficient
    /// information is present, never fails.
    pub fn expr_type(&self, ctx: &DecompileContext) -> VarType {
        match &self.kind {
            ExprentKind::ArrayAccess { array, .. } => array
                .expr_type(ctx)
                .decreased_arr_dim()
                .unwrap_or_else(VarType::java_lang_object),
            ExprentKind::Assignment { left, .. } => left.expr_type(ctx),
            ExprentKind::Assert { .. } => VarType::VOID,
            ExprentKind::Const { const_type, .. } => const_type.clone(),
            ExprentKind::Exit { .. } => VarType::VOID,
            ExprentKind::Field { name, class_name, descriptor, .. } => {
                if ctx.options.decompile_generic_signatures {
                    if let Some(generic) = ctx.generics.field_type(class_name, name) {
                        return generic.clone();
                    }
                }
                descriptor.clone()
            }
            ExprentKind::Function { .. } => self.function_type(ctx),
            ExprentKind::If { .. } => VarType::BOOLEAN,
            ExprentKind::Invocation { name, class_name, descriptor, .. } => {
                if ctx.options.decompile_generic_signatures {
                    let erased = descriptor.to_descriptor_string();
                    if let Some(generic) = ctx.generics.method_return(class_name, name, &erased) {
                        return generic.clone();
                    }
                }
                descriptor.ret.clone()
            }
            ExprentKind::Monitor { .. } => VarType::VOID,
            ExprentKind::New { new_type, .. } => new_type.clone(),
            ExprentKind::Pattern { pattern_type, .. } => pattern_type.clone(),
            ExprentKind::SwitchHead { selector, .. } => selector.expr_type(ctx),
            ExprentKind::Var { var_type, .. } => var_type.clone(),
            ExprentKind::Annotation { class_name, .. } => VarType::object(class_name.clone()),
        }
    }

    fn function_type(&self, ctx: &DecompileContext) -> VarType {
        let ExprentKind::Function { fn_type, operands, implicit_type } = &self.kind else {
            return VarType::UNKNOWN;
        };
        let operand_type =
            |i: usize| operands.get(i).map(|o| o.expr_type(ctx)).unwrap_or(VarType::UNKNOWN);
        match fn_type {
            FunctionType::Add
            | FunctionType::Sub
            | FunctionType::Mul
            | FunctionType::Div
            | FunctionType::Rem => {
                VarType::arithmetic_result(&operand_type(0), &operand_type(1))
            }
            FunctionType::And | FunctionType::Or | FunctionType::Xor => {
                let (a, b) = (operand_type(0), operand_type(1));
                if a.family() == TypeFamily::Boolean && b.family() == TypeFamily::Boolean {
                    VarType::BOOLEAN
                } else {
                    VarType::arithmetic_result(&a, &b)
                }
            }
            FunctionType::Shl | FunctionType::Shr | FunctionType::Ushr => {
                if operand_type(0).family() == TypeFamily::Long {
                    VarType::LONG
                } else {
                    VarType::INT
                }
            }
            FunctionType::Neg | FunctionType::BitNot => match operand_type(0).family() {
                TypeFamily::Double => VarType::DOUBLE,
                TypeFamily::Float => VarType::FLOAT,
                TypeFamily::Long => VarType::LONG,
                _ => VarType::INT,
            },
            FunctionType::PpI | FunctionType::IPp | FunctionType::MmI | FunctionType::IMm => {
                operand_type(0)
            }
            FunctionType::BoolNot
            | FunctionType::Eq
            | FunctionType::Ne
            | FunctionType::Lt
            | FunctionType::Ge
            | FunctionType::Gt
            | FunctionType::Le
            | FunctionType::BoolAnd
            | FunctionType::BoolOr
            | FunctionType::InstanceOf => VarType::BOOLEAN,
            FunctionType::Ternary => {
                VarType::common_supertype(&operand_type(1), &operand_type(2))
                    .unwrap_or(VarType::UNKNOWN)
            }
            FunctionType::Cast => implicit_type.clone().unwrap_or_else(|| operand_type(0)),
            FunctionType::ArrayLength => VarType::INT,
            FunctionType::StrConcat => VarType::string(),
        }
    }
}
