use serde::{Deserialize, Serialize};

use crate::diagnostics::DecompileError;

/// Compiler option flags recognized by the expression core.
///
/// Snapshotted into each `DecompileContext` at the start of a unit, never
/// mutated mid-decompilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Suppress named-constant substitution (`Integer.MAX_VALUE`, `Math.PI`, ...).
    pub literals_as_is: bool,
    /// Force non-ASCII characters in char/string literals to `\uXXXX` escapes.
    pub ascii_string_characters: bool,
    /// Treat integer literal 1 as `true` (and 0 as `false`) in boolean context.
    pub boolean_true_one: bool,
    /// Shortest-round-trip trimming of float/double literals plus unconditional
    /// `F`/`D` suffixes.
    pub standardize_floating_point_numbers: bool,
    /// Prefer generic-signature-derived types over erased descriptor types.
    pub decompile_generic_signatures: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            literals_as_is: false,
            ascii_string_characters: false,
            boolean_true_one: true,
            standardize_floating_point_numbers: false,
            decompile_generic_signatures: false,
        }
    }
}

impl Options {
    /// Parse options from a TOML table, e.g. the `[decompiler]` section of a
    /// host tool's config file. Unknown keys are rejected.
    pub fn from_toml(text: &str) -> Result<Self, DecompileError> {
        toml::from_str(text).map_err(|e| DecompileError::options(e.to_string()))
    }
}
