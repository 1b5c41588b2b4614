//! Precedence-driven rendering of expression trees into Java source text.
//!
//! Walks the tree bottom-up, inserting parentheses only where operator
//! precedence or associativity requires them, synthesizing casts where the
//! type lattice demands one, and reporting every node's bytecode range to
//! the tracer as it emits.

use crate::context::DecompileContext;
use crate::diagnostics::DecompileError;
use crate::exprent::{
    ExitKind, Exprent, ExprentKind, FunctionType, InvokeKind, MonitorKind,
};
use crate::infer::ambiguous_param_casts;
use crate::literal::render_const;
use crate::tracer::BytecodeMappingTracer;
use crate::types::{BaseType, VarType};

// ── Text buffer ──────────────────────────────────────────────────────

/// Small string builder the render pass assembles output in. Supports the
/// wrap-after-the-fact operations (`enclose`, `prepend`) parenthesization
/// and cast insertion need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    content: String,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: &str) -> &mut Self {
        self.content.push_str(text);
        self
    }

    pub fn append_buf(&mut self, other: TextBuffer) -> &mut Self {
        self.content.push_str(&other.content);
        self
    }

    pub fn prepend(&mut self, text: &str) -> &mut Self {
        self.content.insert_str(0, text);
        self
    }

    pub fn enclose(&mut self, left: &str, right: &str) -> &mut Self {
        self.prepend(left);
        self.append(right)
    }

    /// Four spaces per indent level, the statement printer's convention.
    pub fn append_indent(&mut self, n: usize) -> &mut Self {
        for _ in 0..n {
            self.content.push_str("    ");
        }
        self
    }

    pub fn new_line(&mut self) -> &mut Self {
        self.content.push('\n');
        self
    }

    /// Newlines contained so far; the statement printer feeds this to
    /// `BytecodeMappingTracer::increment_line`.
    pub fn line_count(&self) -> u32 {
        self.content.matches('\n').count() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn into_string(self) -> String {
        self.content
    }
}

impl std::fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.content)
    }
}

// ── Precedence ───────────────────────────────────────────────────────

/// Precedence rank of a node; 0 binds tightest (primary/postfix), larger is
/// looser. Assignment is the loosest expression form.
pub fn precedence(expr: &Exprent) -> u8 {
    match &expr.kind {
        ExprentKind::Function { fn_type, .. } => function_precedence(*fn_type),
        ExprentKind::Assignment { .. } => 13,
        ExprentKind::New { is_array_initializer, .. } => {
            if *is_array_initializer { 0 } else { 1 }
        }
        _ => 0,
    }
}

fn function_precedence(fn_type: FunctionType) -> u8 {
    use FunctionType::*;
    match fn_type {
        ArrayLength | PpI | IPp | MmI | IMm => 0,
        Neg | BitNot | BoolNot | Cast => 1,
        Mul | Div | Rem => 2,
        Add | Sub | StrConcat => 3,
        Shl | Shr | Ushr => 4,
        Lt | Ge | Gt | Le | InstanceOf => 5,
        Eq | Ne => 6,
        And => 7,
        Xor => 8,
        Or => 9,
        BoolAnd => 10,
        BoolOr => 11,
        Ternary => 12,
    }
}

/// Operators whose same-operator chains regroup freely, so a right-hand
/// operand of the same operator renders without parentheses.
fn is_associative(fn_type: FunctionType) -> bool {
    use FunctionType::*;
    matches!(fn_type, Add | Mul | And | Or | Xor | BoolAnd | BoolOr | StrConcat)
}

fn operator_text(fn_type: FunctionType) -> &'static str {
    use FunctionType::*;
    match fn_type {
        Add | StrConcat => "+",
        Sub => "-",
        Mul => "*",
        Div => "/",
        Rem => "%",
        And => "&",
        Or => "|",
        Xor => "^",
        Shl => "<<",
        Shr => ">>",
        Ushr => ">>>",
        Eq => "==",
        Ne => "!=",
        Lt => "<",
        Ge => ">=",
        Gt => ">",
        Le => "<=",
        BoolAnd => "&&",
        BoolOr => "||",
        Neg => "-",
        BitNot => "~",
        BoolNot => "!",
        _ => "",
    }
}

fn operand_fn_type(expr: &Exprent) -> Option<FunctionType> {
    match &expr.kind {
        ExprentKind::Function { fn_type, .. } => Some(*fn_type),
        _ => None,
    }
}

// ── Type names ───────────────────────────────────────────────────────

/// Java-source name of a type: keyword for primitives, shortened qualified
/// name for classes, `[]` per array dimension. Generic arguments are
/// rendered only under `decompile_generic_signatures`.
pub fn type_name(ty: &VarType, ctx: &DecompileContext) -> String {
    let mut out = match &ty.base {
        BaseType::Boolean => "boolean".to_string(),
        // The transient constant ranges erase to their narrow carriers.
        BaseType::Byte | BaseType::ByteChar => "byte".to_string(),
        BaseType::Short | BaseType::ShortChar => "short".to_string(),
        BaseType::Char => "char".to_string(),
        BaseType::Int => "int".to_string(),
        BaseType::Long => "long".to_string(),
        BaseType::Float => "float".to_string(),
        BaseType::Double => "double".to_string(),
        BaseType::Void => "void".to_string(),
        BaseType::Null | BaseType::Unknown => ctx.shorten("java.lang.Object"),
        BaseType::Object { name, args } => {
            let mut s = ctx.shorten(&name.replace('/', "."));
            if ctx.options.decompile_generic_signatures && !args.is_empty() {
                s.push('<');
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        s.push_str(", ");
                    }
                    s.push_str(&type_name(a, ctx));
                }
                s.push('>');
            }
            s
        }
    };
    for _ in 0..ty.arr_dim {
        out.push_str("[]");
    }
    out
}

// ── Rendering ────────────────────────────────────────────────────────

impl Exprent {
    /// Render this node as Java source text, reporting bytecode ranges to
    /// `tracer`. Statement terminators are owned by the statement printer.
    pub fn to_java(
        &self,
        indent: usize,
        ctx: &DecompileContext,
        tracer: &mut BytecodeMappingTracer,
    ) -> Result<TextBuffer, DecompileError> {
        render(self, indent, ctx, tracer)
    }
}

fn operand<'a>(operands: &'a [Exprent], i: usize) -> Result<&'a Exprent, DecompileError> {
    operands
        .get(i)
        .ok_or_else(|| DecompileError::structural(format!("operator is missing operand {i}")))
}

/// Render `operand` in a child position of an operator with rank
/// `parent_prec`. Parentheses are added when the operand binds looser, or
/// equally on the non-preferred (right) side unless it is the same operator
/// and that operator is in the associative set.
fn wrap_operand(
    op: &Exprent,
    parent_prec: u8,
    parent_fn: Option<FunctionType>,
    right_side: bool,
    indent: usize,
    ctx: &DecompileContext,
    tracer: &mut BytecodeMappingTracer,
) -> Result<TextBuffer, DecompileError> {
    let mut buf = render(op, indent, ctx, tracer)?;
    let op_prec = precedence(op);
    let mut parenthesize = op_prec > parent_prec;
    if !parenthesize && op_prec == parent_prec && right_side {
        let same_associative = match (parent_fn, operand_fn_type(op)) {
            (Some(p), Some(o)) => p == o && is_associative(p),
            _ => false,
        };
        parenthesize = !same_associative;
    }
    if parenthesize {
        buf.enclose("(", ")");
    }
    Ok(buf)
}

/// Render `op` with an explicit cast to `target` when the lattice requires
/// one (or when `force` is set by overload disambiguation).
fn render_casted(
    op: &Exprent,
    target: &VarType,
    force: bool,
    indent: usize,
    ctx: &DecompileContext,
    tracer: &mut BytecodeMappingTracer,
) -> Result<TextBuffer, DecompileError> {
    let op_type = op.expr_type(ctx);
    let needs_cast = force || needs_cast(target, &op_type);
    let mut buf = render(op, indent, ctx, tracer)?;
    if needs_cast {
        tracing::trace!(cast_to = %target, operand = %op_type, "inserting cast");
        if precedence(op) > 1 {
            buf.enclose("(", ")");
        }
        buf.prepend(&format!("({})", type_name(target, ctx)));
    }
    Ok(buf)
}

fn needs_cast(target: &VarType, op_type: &VarType) -> bool {
    if *target == VarType::UNKNOWN || *target == VarType::VOID {
        return false;
    }
    if *op_type == VarType::UNKNOWN || op_type.is_null() {
        return false;
    }
    if target.is_primitive() && op_type.is_primitive() {
        return !target.is_superset_of(op_type);
    }
    if target.is_reference() && op_type.is_reference() {
        // Downcast needed only from an erased Object view.
        return *op_type == VarType::java_lang_object() && target != op_type;
    }
    // Object vs primitive mismatches always require a cast.
    true
}

fn is_this_var(expr: &Exprent) -> bool {
    matches!(&expr.kind, ExprentKind::Var { name: Some(n), .. } if n == "this")
}

const UNBOXING_ACCESSORS: [&str; 8] = [
    "booleanValue",
    "byteValue",
    "charValue",
    "shortValue",
    "intValue",
    "longValue",
    "floatValue",
    "doubleValue",
];

fn is_boxing_call(
    name: &str,
    class_name: &str,
    invoke_kind: InvokeKind,
    param_count: usize,
) -> bool {
    invoke_kind == InvokeKind::Static
        && name == "valueOf"
        && param_count == 1
        && VarType::unboxed_primitive(class_name).is_some()
}

fn is_unboxing_call(
    name: &str,
    class_name: &str,
    invoke_kind: InvokeKind,
    param_count: usize,
) -> bool {
    invoke_kind != InvokeKind::Static
        && param_count == 0
        && UNBOXING_ACCESSORS.contains(&name)
        && VarType::unboxed_primitive(class_name).is_some()
}

/// Most specific declared exception type for a synthesized throw cast:
/// `Throwable` if declared, else the first declared type whose name says
/// `Exception`, else none.
fn preferred_throw_type(ctx: &DecompileContext) -> Option<&str> {
    let thrown = &ctx.method.as_ref()?.thrown;
    if let Some(t) = thrown.iter().find(|t| *t == "java/lang/Throwable") {
        return Some(t);
    }
    thrown.iter().find(|t| t.contains("Exception")).map(String::as_str)
}

fn comma_separated(
    items: &[Exprent],
    indent: usize,
    ctx: &DecompileContext,
    tracer: &mut BytecodeMappingTracer,
) -> Result<TextBuffer, DecompileError> {
    let mut buf = TextBuffer::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            buf.append(", ");
        }
        buf.append_buf(render(item, indent, ctx, tracer)?);
    }
    Ok(buf)
}

/// Render one expression node. The single entry point for the whole pass;
/// every variant reports its bytecode range before emitting.
pub fn render(
    expr: &Exprent,
    indent: usize,
    ctx: &DecompileContext,
    tracer: &mut BytecodeMappingTracer,
) -> Result<TextBuffer, DecompileError> {
    tracer.add_range(&expr.bytecode);
    let mut buf = TextBuffer::new();
    match &expr.kind {
        ExprentKind::ArrayAccess { array, index } => {
            let mut array_buf = render(array, indent, ctx, tracer)?;
            if precedence(array) > 0 {
                array_buf.enclose("(", ")");
            }
            if array.expr_type(ctx).arr_dim == 0 {
                // The static type lost its dimensions (erased/object-typed
                // array): force a one-dimension object-array view.
                let object_array = VarType::java_lang_object().increased_arr_dim();
                array_buf.enclose(&format!("(({})", type_name(&object_array, ctx)), ")");
            }
            buf.append_buf(array_buf);
            buf.append("[");
            buf.append_buf(render(index, indent, ctx, tracer)?);
            buf.append("]");
        }

        ExprentKind::Assignment { left, right, cond_type } => {
            // The left side is an lvalue; it is never elided or duplicated
            // regardless of how simple it looks.
            buf.append_buf(render(left, indent, ctx, tracer)?);
            match cond_type {
                Some(op) => {
                    buf.append(&format!(" {}= ", operator_text(*op)));
                    buf.append_buf(render(right, indent, ctx, tracer)?);
                }
                None => {
                    buf.append(" = ");
                    let left_type = left.expr_type(ctx);
                    buf.append_buf(render_casted(right, &left_type, false, indent, ctx, tracer)?);
                }
            }
        }

        ExprentKind::Assert { condition, message } => {
            buf.append("assert ");
            match condition {
                Some(c) => {
                    buf.append_buf(render(c, indent, ctx, tracer)?);
                }
                None => {
                    buf.append("false");
                }
            }
            if let Some(m) = message {
                buf.append(" : ");
                buf.append_buf(render(m, indent, ctx, tracer)?);
            }
        }

        ExprentKind::Const { value, const_type, boolean_context } => {
            buf.append(&render_const(value, const_type, *boolean_context, ctx)?);
        }

        ExprentKind::Exit { kind: ExitKind::Return, value, ret_type } => {
            buf.append("return");
            if let Some(v) = value {
                buf.append(" ");
                buf.append_buf(render_casted(v, ret_type, false, indent, ctx, tracer)?);
            }
        }

        ExprentKind::Exit { kind: ExitKind::Throw, value, .. } => {
            let v = value
                .as_ref()
                .ok_or_else(|| DecompileError::structural("throw without an operand"))?;
            buf.append("throw ");
            let value_type = v.expr_type(ctx);
            let cast_to = if value_type.is_null() || value_type == VarType::UNKNOWN {
                preferred_throw_type(ctx).map(str::to_string)
            } else {
                None
            };
            let mut value_buf = render(v, indent, ctx, tracer)?;
            if let Some(exception) = cast_to {
                if precedence(v) > 1 {
                    value_buf.enclose("(", ")");
                }
                let ty = VarType::object(exception);
                value_buf.prepend(&format!("({})", type_name(&ty, ctx)));
            }
            buf.append_buf(value_buf);
        }

        ExprentKind::Field { name, class_name, instance, is_static, .. } => {
            if *is_static {
                if class_name != &ctx.class_name {
                    buf.append(&ctx.shorten(&class_name.replace('/', ".")));
                    buf.append(".");
                }
                buf.append(name);
            } else {
                let inst = instance.as_ref().ok_or_else(|| {
                    DecompileError::structural("instance field access without a receiver")
                })?;
                if !is_this_var(inst) {
                    let mut inst_buf = render(inst, indent, ctx, tracer)?;
                    if precedence(inst) > 0 {
                        inst_buf.enclose("(", ")");
                    }
                    buf.append_buf(inst_buf);
                    buf.append(".");
                }
                buf.append(name);
            }
        }

        ExprentKind::Function { fn_type, operands, implicit_type } => {
            render_function(&mut buf, expr, *fn_type, operands, implicit_type, indent, ctx, tracer)?;
        }

        ExprentKind::If { condition } => {
            buf.append_buf(render(condition, indent, ctx, tracer)?);
        }

        ExprentKind::Invocation {
            name,
            class_name,
            invoke_kind,
            instance,
            params,
            descriptor,
            uses_boxing_result,
        } => {
            match invoke_kind {
                InvokeKind::StaticInit => {
                    return Err(DecompileError::structural(
                        "static initializer is not directly invocable",
                    ));
                }
                InvokeKind::Constructor => {
                    // Direct <init> call inside another constructor; the
                    // `new` form is rendered by the owning New node.
                    buf.append(if class_name == &ctx.class_name { "this" } else { "super" });
                    buf.append("(");
                    buf.append_buf(render_arguments(
                        params, descriptor, class_name, name, indent, ctx, tracer,
                    )?);
                    buf.append(")");
                }
                _ => {
                    if is_boxing_call(name, class_name, *invoke_kind, params.len())
                        && !uses_boxing_result
                    {
                        tracing::trace!(%class_name, "eliding boxing call");
                        return render(operand(params, 0)?, indent, ctx, tracer);
                    }
                    if let Some(inst) = instance {
                        if is_unboxing_call(name, class_name, *invoke_kind, params.len()) {
                            tracing::trace!(%class_name, "eliding unboxing accessor");
                            return render(inst, indent, ctx, tracer);
                        }
                    }
                    if *invoke_kind == InvokeKind::Static {
                        if class_name != &ctx.class_name {
                            buf.append(&ctx.shorten(&class_name.replace('/', ".")));
                            buf.append(".");
                        }
                    } else {
                        let inst = instance.as_ref().ok_or_else(|| {
                            DecompileError::structural("instance invocation without a receiver")
                        })?;
                        if !is_this_var(inst) {
                            let mut inst_buf = render(inst, indent, ctx, tracer)?;
                            if precedence(inst) > 0 {
                                inst_buf.enclose("(", ")");
                            }
                            buf.append_buf(inst_buf);
                            buf.append(".");
                        }
                    }
                    buf.append(name);
                    buf.append("(");
                    buf.append_buf(render_arguments(
                        params, descriptor, class_name, name, indent, ctx, tracer,
                    )?);
                    buf.append(")");
                }
            }
        }

        ExprentKind::Monitor { kind: MonitorKind::Enter, value } => {
            buf.append("synchronized (");
            buf.append_buf(render(value, indent, ctx, tracer)?);
            buf.append(")");
        }

        ExprentKind::Monitor { kind: MonitorKind::Exit, .. } => {
            // No Java surface form; a stray exit only appears in damaged
            // control flow.
            buf.append("// monitorexit");
        }

        ExprentKind::New {
            new_type,
            constructor,
            array_lengths,
            array_init,
            is_array_initializer,
        } => {
            if *is_array_initializer {
                buf.append("{");
                buf.append_buf(comma_separated(array_init, indent, ctx, tracer)?);
                buf.append("}");
            } else if new_type.arr_dim > 0 {
                if !array_init.is_empty() {
                    buf.append("new ");
                    buf.append(&type_name(new_type, ctx));
                    buf.append("{");
                    buf.append_buf(comma_separated(array_init, indent, ctx, tracer)?);
                    buf.append("}");
                } else {
                    buf.append("new ");
                    buf.append(&type_name(&new_type.with_arr_dim(0), ctx));
                    for dim in 0..new_type.arr_dim {
                        buf.append("[");
                        if let Some(len) = array_lengths.get(dim as usize) {
                            buf.append_buf(render(len, indent, ctx, tracer)?);
                        }
                        buf.append("]");
                    }
                }
            } else {
                buf.append("new ");
                buf.append(&type_name(new_type, ctx));
                buf.append("(");
                if let Some(ctor) = constructor {
                    let ExprentKind::Invocation { params, descriptor, class_name, name, .. } =
                        &ctor.kind
                    else {
                        return Err(DecompileError::structural(
                            "object construction without an <init> invocation",
                        ));
                    };
                    tracer.add_range(&ctor.bytecode);
                    buf.append_buf(render_arguments(
                        params, descriptor, class_name, name, indent, ctx, tracer,
                    )?);
                }
                buf.append(")");
            }
        }

        ExprentKind::Pattern { pattern_type, components } => {
            buf.append(&type_name(pattern_type, ctx));
            buf.append("(");
            buf.append_buf(comma_separated(components, indent, ctx, tracer)?);
            buf.append(")");
        }

        ExprentKind::SwitchHead { selector, .. } => {
            buf.append_buf(render(selector, indent, ctx, tracer)?);
        }

        ExprentKind::Var { index, name, var_type, is_definition, .. } => {
            if *is_definition {
                buf.append(&type_name(var_type, ctx));
                buf.append(" ");
            }
            match name {
                Some(n) => buf.append(n),
                None => buf.append(&format!("var{index}")),
            };
        }

        ExprentKind::Annotation { class_name, par_names, par_values } => {
            buf.append("@");
            buf.append(&ctx.shorten(&class_name.replace('/', ".")));
            if !par_values.is_empty() {
                buf.append("(");
                if par_names.is_empty() && par_values.len() == 1 {
                    buf.append_buf(render(&par_values[0], indent, ctx, tracer)?);
                } else {
                    for (i, (pname, pvalue)) in
                        par_names.iter().zip(par_values.iter()).enumerate()
                    {
                        if i > 0 {
                            buf.append(", ");
                        }
                        buf.append(pname);
                        buf.append(" = ");
                        buf.append_buf(render(pvalue, indent, ctx, tracer)?);
                    }
                }
                buf.append(")");
            }
        }
    }
    Ok(buf)
}

/// Invocation argument list with overload-ambiguity and lattice casts.
fn render_arguments(
    params: &[Exprent],
    descriptor: &crate::context::MethodDescriptor,
    class_name: &str,
    name: &str,
    indent: usize,
    ctx: &DecompileContext,
    tracer: &mut BytecodeMappingTracer,
) -> Result<TextBuffer, DecompileError> {
    let ambiguous = ambiguous_param_casts(class_name, name, descriptor, ctx);
    let mut buf = TextBuffer::new();
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            buf.append(", ");
        }
        let target = descriptor.params.get(i).cloned().unwrap_or(VarType::UNKNOWN);
        let force = ambiguous.get(i).copied().unwrap_or(false);
        buf.append_buf(render_casted(param, &target, force, indent, ctx, tracer)?);
    }
    Ok(buf)
}

#[allow(clippy::too_many_arguments)]
fn render_function(
    buf: &mut TextBuffer,
    expr: &Exprent,
    fn_type: FunctionType,
    operands: &[Exprent],
    implicit_type: &Option<VarType>,
    indent: usize,
    ctx: &DecompileContext,
    tracer: &mut BytecodeMappingTracer,
) -> Result<(), DecompileError> {
    use FunctionType::*;
    let prec = function_precedence(fn_type);
    match fn_type {
        Add | Sub | Mul | Div | Rem | And | Or | Xor | Shl | Shr | Ushr | Eq | Ne | Lt | Ge
        | Gt | Le | BoolAnd | BoolOr | StrConcat => {
            let left =
                wrap_operand(operand(operands, 0)?, prec, Some(fn_type), false, indent, ctx, tracer)?;
            let right =
                wrap_operand(operand(operands, 1)?, prec, Some(fn_type), true, indent, ctx, tracer)?;
            buf.append_buf(left);
            buf.append(&format!(" {} ", operator_text(fn_type)));
            buf.append_buf(right);
        }
        Neg | BitNot | BoolNot => {
            buf.append(operator_text(fn_type));
            // Equal-precedence operands keep their parentheses: -(-x) must
            // not collapse into the decrement operator.
            buf.append_buf(wrap_operand(
                operand(operands, 0)?,
                prec,
                Some(fn_type),
                true,
                indent,
                ctx,
                tracer,
            )?);
        }
        PpI | MmI => {
            buf.append(if fn_type == PpI { "++" } else { "--" });
            buf.append_buf(render(operand(operands, 0)?, indent, ctx, tracer)?);
        }
        IPp | IMm => {
            buf.append_buf(render(operand(operands, 0)?, indent, ctx, tracer)?);
            buf.append(if fn_type == IPp { "++" } else { "--" });
        }
        Ternary => {
            let cond = operand(operands, 0)?;
            let mut cond_buf = render(cond, indent, ctx, tracer)?;
            if precedence(cond) >= prec {
                cond_buf.enclose("(", ")");
            }
            let then_buf =
                wrap_operand(operand(operands, 1)?, prec, Some(fn_type), false, indent, ctx, tracer)?;
            let else_buf =
                wrap_operand(operand(operands, 2)?, prec, Some(fn_type), false, indent, ctx, tracer)?;
            buf.append_buf(cond_buf);
            buf.append(" ? ");
            buf.append_buf(then_buf);
            buf.append(" : ");
            buf.append_buf(else_buf);
        }
        Cast => {
            let target = implicit_type
                .as_ref()
                .ok_or_else(|| DecompileError::structural("cast without a target type"))?;
            buf.append(&format!("({})", type_name(target, ctx)));
            buf.append_buf(wrap_operand(
                operand(operands, 0)?,
                prec,
                Some(fn_type),
                true,
                indent,
                ctx,
                tracer,
            )?);
        }
        InstanceOf => {
            let left =
                wrap_operand(operand(operands, 0)?, prec, Some(fn_type), false, indent, ctx, tracer)?;
            buf.append_buf(left);
            buf.append(" instanceof ");
            if let Some(pattern) = operands.get(1) {
                buf.append_buf(render(pattern, indent, ctx, tracer)?);
            } else {
                let target = implicit_type.as_ref().ok_or_else(|| {
                    DecompileError::structural("instanceof without a type or pattern")
                })?;
                buf.append(&type_name(target, ctx));
            }
        }
        ArrayLength => {
            let array = operand(operands, 0)?;
            let mut array_buf = render(array, indent, ctx, tracer)?;
            if precedence(array) > 0 {
                array_buf.enclose("(", ")");
            }
            buf.append_buf(array_buf);
            buf.append(".length");
        }
    }
    Ok(())
}
