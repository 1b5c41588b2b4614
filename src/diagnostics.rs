use thiserror::Error;

/// Errors surfaced by the expression core.
///
/// `Structural` is fatal for the current method's decompilation: the driver
/// catches it, substitutes a placeholder body, and moves on to the next
/// method. Everything else in the core degrades gracefully instead of
/// erroring (missing context falls back to erased types, heuristic misses
/// are quality defects, not failures).
#[derive(Debug, Error)]
pub enum DecompileError {
    #[error("Structural error: {msg}")]
    Structural { msg: String },

    #[error("Render error: {msg}")]
    Render { msg: String },

    #[error("Options error: {msg}")]
    Options { msg: String },
}

impl DecompileError {
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::Structural { msg: msg.into() }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render { msg: msg.into() }
    }

    pub fn options(msg: impl Into<String>) -> Self {
        Self::Options { msg: msg.into() }
    }
}
