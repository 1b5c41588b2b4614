//! Expression IR and Java-source code generator core of a JVM-bytecode
//! decompiler.
//!
//! The out-of-scope translator hands this crate a fully-formed [`Exprent`]
//! tree per method body plus a [`DecompileContext`] (current class/method
//! metadata, option flags, lookup tables). The crate owns:
//!
//! - the closed expression-node variant set and its structural contract
//!   (`exprent`),
//! - the type lattice the nodes carry (`types`),
//! - constant canonicalization (`literal`),
//! - bidirectional type-bounds inference (`infer`),
//! - precedence-driven rendering with bytecode-to-line tracing (`render`),
//! - the pattern-match facade for rewrite rules (`matching`).
//!
//! One worker decompiles one unit at a time; a context is never shared
//! across concurrent units.

pub mod bytecode;
pub mod context;
pub mod diagnostics;
pub mod exprent;
pub mod infer;
pub mod literal;
pub mod matching;
pub mod options;
pub mod render;
pub mod tracer;
pub mod types;

pub use bytecode::BytecodeRange;
pub use context::{DecompileContext, MethodContext, MethodDescriptor};
pub use diagnostics::DecompileError;
pub use exprent::{ConstValue, ExitKind, Exprent, ExprentKind, ExprentTag, FunctionType};
pub use options::Options;
pub use render::TextBuffer;
pub use tracer::BytecodeMappingTracer;
pub use types::{TypeFamily, VarType};

/// Render one expression (normalize constant display types, then emit).
///
/// This is the per-expression pipeline the statement printer drives:
/// the normalization walk retypes ambiguous constants in place (idempotent),
/// rendering then reports bytecode ranges to `tracer` as it emits.
pub fn render_expression(
    expr: &mut Exprent,
    indent: usize,
    ctx: &DecompileContext,
    tracer: &mut BytecodeMappingTracer,
) -> Result<String, DecompileError> {
    infer::normalize_const_types(expr, ctx);
    Ok(render::render(expr, indent, ctx, tracer)?.into_string())
}

/// Render an already-normalized tree without touching it.
pub fn render_expression_raw(
    expr: &Exprent,
    indent: usize,
    ctx: &DecompileContext,
    tracer: &mut BytecodeMappingTracer,
) -> Result<String, DecompileError> {
    Ok(render::render(expr, indent, ctx, tracer)?.into_string())
}
