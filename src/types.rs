use serde::{Deserialize, Serialize};

use crate::diagnostics::DecompileError;

/// Coarse type classification used for promotion/compatibility checks
/// independent of exact width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeFamily {
    Boolean,
    Integer,
    Long,
    Float,
    Double,
    Object,
    Unknown,
}

impl TypeFamily {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TypeFamily::Integer | TypeFamily::Long | TypeFamily::Float | TypeFamily::Double
        )
    }
}

/// The scalar part of a JVM/source type.
///
/// `ByteChar` is the 0..=127 value range (fits both `byte` and `char`),
/// `ShortChar` the 0..=32767 range (fits both `short` and `char`). Both are
/// transient classifications for constants whose display type is not yet
/// pinned down; they never appear in emitted source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseType {
    Boolean,
    Byte,
    ByteChar,
    ShortChar,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Void,
    Object { name: String, args: Vec<VarType> },
    Null,
    Unknown,
}

/// Immutable value type describing a JVM/source type: a scalar base plus an
/// array dimension (0 for non-arrays). Nodes hold types by value, never by
/// shared mutable reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarType {
    pub base: BaseType,
    pub arr_dim: u32,
}

pub const JAVA_LANG_OBJECT: &str = "java/lang/Object";
pub const JAVA_LANG_STRING: &str = "java/lang/String";

/// Value range of an integer-family scalar, used for the containment lattice.
fn int_range(base: &BaseType) -> Option<(i64, i64)> {
    match base {
        BaseType::ByteChar => Some((0, 127)),
        BaseType::Byte => Some((-128, 127)),
        BaseType::ShortChar => Some((0, 32767)),
        BaseType::Short => Some((-32768, 32767)),
        BaseType::Char => Some((0, 65535)),
        BaseType::Int => Some((i64::from(i32::MIN), i64::from(i32::MAX))),
        _ => None,
    }
}

/// Integer-family candidates ordered narrowest first; the first whose range
/// contains a value (or a union of ranges) is the minimal admissible type.
const INT_CANDIDATES: [BaseType; 6] = [
    BaseType::ByteChar,
    BaseType::Byte,
    BaseType::ShortChar,
    BaseType::Short,
    BaseType::Char,
    BaseType::Int,
];

impl VarType {
    pub const BOOLEAN: VarType = VarType { base: BaseType::Boolean, arr_dim: 0 };
    pub const BYTE: VarType = VarType { base: BaseType::Byte, arr_dim: 0 };
    pub const BYTECHAR: VarType = VarType { base: BaseType::ByteChar, arr_dim: 0 };
    pub const SHORTCHAR: VarType = VarType { base: BaseType::ShortChar, arr_dim: 0 };
    pub const SHORT: VarType = VarType { base: BaseType::Short, arr_dim: 0 };
    pub const CHAR: VarType = VarType { base: BaseType::Char, arr_dim: 0 };
    pub const INT: VarType = VarType { base: BaseType::Int, arr_dim: 0 };
    pub const LONG: VarType = VarType { base: BaseType::Long, arr_dim: 0 };
    pub const FLOAT: VarType = VarType { base: BaseType::Float, arr_dim: 0 };
    pub const DOUBLE: VarType = VarType { base: BaseType::Double, arr_dim: 0 };
    pub const VOID: VarType = VarType { base: BaseType::Void, arr_dim: 0 };
    pub const NULL: VarType = VarType { base: BaseType::Null, arr_dim: 0 };
    pub const UNKNOWN: VarType = VarType { base: BaseType::Unknown, arr_dim: 0 };

    pub fn scalar(base: BaseType) -> Self {
        Self { base, arr_dim: 0 }
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self { base: BaseType::Object { name: name.into(), args: Vec::new() }, arr_dim: 0 }
    }

    pub fn generic_object(name: impl Into<String>, args: Vec<VarType>) -> Self {
        Self { base: BaseType::Object { name: name.into(), args }, arr_dim: 0 }
    }

    pub fn string() -> Self {
        Self::object(JAVA_LANG_STRING)
    }

    pub fn java_lang_object() -> Self {
        Self::object(JAVA_LANG_OBJECT)
    }

    // ── Classification ───────────────────────────────────────────────

    pub fn family(&self) -> TypeFamily {
        if self.arr_dim > 0 {
            return TypeFamily::Object;
        }
        match &self.base {
            BaseType::Boolean => TypeFamily::Boolean,
            BaseType::Byte
            | BaseType::ByteChar
            | BaseType::ShortChar
            | BaseType::Short
            | BaseType::Char
            | BaseType::Int => TypeFamily::Integer,
            BaseType::Long => TypeFamily::Long,
            BaseType::Float => TypeFamily::Float,
            BaseType::Double => TypeFamily::Double,
            BaseType::Object { .. } | BaseType::Null => TypeFamily::Object,
            BaseType::Void | BaseType::Unknown => TypeFamily::Unknown,
        }
    }

    pub fn is_null(&self) -> bool {
        self.arr_dim == 0 && self.base == BaseType::Null
    }

    pub fn is_reference(&self) -> bool {
        self.arr_dim > 0 || matches!(self.base, BaseType::Object { .. } | BaseType::Null)
    }

    pub fn is_primitive(&self) -> bool {
        self.arr_dim == 0
            && !matches!(
                self.base,
                BaseType::Object { .. } | BaseType::Null | BaseType::Unknown | BaseType::Void
            )
    }

    fn is_object_class(&self) -> bool {
        self.arr_dim == 0
            && matches!(&self.base, BaseType::Object { name, .. } if name == JAVA_LANG_OBJECT)
    }

    pub fn class_name(&self) -> Option<&str> {
        match &self.base {
            BaseType::Object { name, .. } => Some(name),
            _ => None,
        }
    }

    // ── Lattice queries ──────────────────────────────────────────────

    /// Widening-compatibility: can a value of type `other` flow into a slot
    /// of type `self` without a cast?
    ///
    /// Within the integer family this is value-range containment. For
    /// references, any reference/array type accepts `null`, and
    /// `java/lang/Object` accepts every reference and array. `unknown`
    /// matches only itself.
    pub fn is_superset_of(&self, other: &VarType) -> bool {
        if self == other {
            return true;
        }
        if other.is_null() {
            return self.is_reference();
        }
        if self.is_object_class() {
            return other.is_reference();
        }
        if self.arr_dim != other.arr_dim {
            return false;
        }
        if self.arr_dim > 0 {
            // Arrays of distinct element types only widen to Object (above).
            return false;
        }
        match (int_range(&self.base), int_range(&other.base)) {
            (Some((lo1, hi1)), Some((lo2, hi2))) => lo1 <= lo2 && hi2 <= hi1,
            _ => false,
        }
    }

    /// Least type both operands implicitly convert to, or `None` when the
    /// families are incompatible (e.g. boolean vs int, primitive vs object).
    pub fn common_supertype(a: &VarType, b: &VarType) -> Option<VarType> {
        if a.is_superset_of(b) {
            return Some(a.clone());
        }
        if b.is_superset_of(a) {
            return Some(b.clone());
        }
        let (fa, fb) = (a.family(), b.family());
        if fa == TypeFamily::Integer && fb == TypeFamily::Integer {
            let (lo1, hi1) = int_range(&a.base)?;
            let (lo2, hi2) = int_range(&b.base)?;
            let (lo, hi) = (lo1.min(lo2), hi1.max(hi2));
            for cand in INT_CANDIDATES {
                let (clo, chi) = int_range(&cand).expect("candidate has a range");
                if clo <= lo && hi <= chi {
                    return Some(VarType::scalar(cand));
                }
            }
            return Some(VarType::INT);
        }
        if fa.is_numeric() && fb.is_numeric() {
            return Some(VarType::promoted(fa, fb));
        }
        if fa == TypeFamily::Object && fb == TypeFamily::Object {
            return Some(VarType::java_lang_object());
        }
        None
    }

    /// Binary numeric promotion: `double > float > long > int`. The integer
    /// family always promotes to plain `int`.
    fn promoted(a: TypeFamily, b: TypeFamily) -> VarType {
        fn rank(f: TypeFamily) -> u8 {
            match f {
                TypeFamily::Double => 4,
                TypeFamily::Float => 3,
                TypeFamily::Long => 2,
                _ => 1,
            }
        }
        let widest = if rank(a) >= rank(b) { a } else { b };
        match widest {
            TypeFamily::Double => VarType::DOUBLE,
            TypeFamily::Float => VarType::FLOAT,
            TypeFamily::Long => VarType::LONG,
            _ => VarType::INT,
        }
    }

    /// Result type of a two-operand arithmetic expression over `a` and `b`.
    pub fn arithmetic_result(a: &VarType, b: &VarType) -> VarType {
        VarType::promoted(a.family(), b.family())
    }

    /// The loosest admissible type of a family, used when propagating bounds.
    pub fn min_type_in_family(family: TypeFamily) -> VarType {
        match family {
            TypeFamily::Boolean => VarType::BOOLEAN,
            TypeFamily::Integer => VarType::BYTECHAR,
            TypeFamily::Long => VarType::LONG,
            TypeFamily::Float => VarType::FLOAT,
            TypeFamily::Double => VarType::DOUBLE,
            TypeFamily::Object => VarType::NULL,
            TypeFamily::Unknown => VarType::UNKNOWN,
        }
    }

    /// Narrowest integer-family type able to represent `value`; `long` when
    /// the value exceeds `int` range.
    pub fn min_int_type(value: i64) -> VarType {
        for cand in INT_CANDIDATES {
            let (lo, hi) = int_range(&cand).expect("candidate has a range");
            if lo <= value && value <= hi {
                return VarType::scalar(cand);
            }
        }
        VarType::LONG
    }

    // ── Array dimension transforms ───────────────────────────────────

    pub fn with_arr_dim(&self, arr_dim: u32) -> VarType {
        VarType { base: self.base.clone(), arr_dim }
    }

    /// Element type of an array; `None` when `self` is not an array.
    pub fn decreased_arr_dim(&self) -> Option<VarType> {
        if self.arr_dim == 0 {
            return None;
        }
        Some(self.with_arr_dim(self.arr_dim - 1))
    }

    pub fn increased_arr_dim(&self) -> VarType {
        self.with_arr_dim(self.arr_dim + 1)
    }

    // ── Descriptors ──────────────────────────────────────────────────

    /// Parse a JVM field descriptor: `I`, `J`, `[Ljava/lang/String;`, ...
    pub fn from_descriptor(descriptor: &str) -> Result<VarType, DecompileError> {
        let (ty, rest) = Self::read_descriptor(descriptor)?;
        if !rest.is_empty() {
            return Err(DecompileError::structural(format!(
                "trailing characters in type descriptor '{descriptor}'"
            )));
        }
        Ok(ty)
    }

    /// Parse one type from the front of `descriptor`, returning the remainder.
    /// Shared with method-descriptor parsing.
    pub(crate) fn read_descriptor(descriptor: &str) -> Result<(VarType, &str), DecompileError> {
        let mut arr_dim = 0u32;
        let mut rest = descriptor;
        while let Some(stripped) = rest.strip_prefix('[') {
            arr_dim += 1;
            rest = stripped;
        }
        let mut chars = rest.chars();
        let base = match chars.next() {
            Some('Z') => BaseType::Boolean,
            Some('B') => BaseType::Byte,
            Some('C') => BaseType::Char,
            Some('S') => BaseType::Short,
            Some('I') => BaseType::Int,
            Some('J') => BaseType::Long,
            Some('F') => BaseType::Float,
            Some('D') => BaseType::Double,
            Some('V') => BaseType::Void,
            Some('L') => {
                let body = chars.as_str();
                let semi = body.find(';').ok_or_else(|| {
                    DecompileError::structural(format!(
                        "unterminated class descriptor '{descriptor}'"
                    ))
                })?;
                let name = &body[..semi];
                return Ok((
                    VarType {
                        base: BaseType::Object { name: name.to_string(), args: Vec::new() },
                        arr_dim,
                    },
                    &body[semi + 1..],
                ));
            }
            _ => {
                return Err(DecompileError::structural(format!(
                    "malformed type descriptor '{descriptor}'"
                )));
            }
        };
        Ok((VarType { base, arr_dim }, chars.as_str()))
    }

    pub fn to_descriptor(&self) -> String {
        let mut out = "[".repeat(self.arr_dim as usize);
        match &self.base {
            BaseType::Boolean => out.push('Z'),
            BaseType::Byte => out.push('B'),
            // The transient ranges erase to their descriptor-visible carriers.
            BaseType::ByteChar | BaseType::ShortChar | BaseType::Char => out.push('C'),
            BaseType::Short => out.push('S'),
            BaseType::Int => out.push('I'),
            BaseType::Long => out.push('J'),
            BaseType::Float => out.push('F'),
            BaseType::Double => out.push('D'),
            BaseType::Void => out.push('V'),
            BaseType::Object { name, .. } => {
                out.push('L');
                out.push_str(name);
                out.push(';');
            }
            BaseType::Null | BaseType::Unknown => out.push_str(&format!("L{JAVA_LANG_OBJECT};")),
        }
        out
    }

    // ── Boxing ───────────────────────────────────────────────────────

    /// Boxed wrapper class of a primitive scalar type.
    pub fn boxed_class(&self) -> Option<&'static str> {
        if self.arr_dim > 0 {
            return None;
        }
        match self.base {
            BaseType::Boolean => Some("java/lang/Boolean"),
            BaseType::Byte => Some("java/lang/Byte"),
            BaseType::Char => Some("java/lang/Character"),
            BaseType::Short => Some("java/lang/Short"),
            BaseType::Int => Some("java/lang/Integer"),
            BaseType::Long => Some("java/lang/Long"),
            BaseType::Float => Some("java/lang/Float"),
            BaseType::Double => Some("java/lang/Double"),
            _ => None,
        }
    }

    /// Primitive carried by a boxed wrapper class name.
    pub fn unboxed_primitive(class_name: &str) -> Option<VarType> {
        match class_name {
            "java/lang/Boolean" => Some(VarType::BOOLEAN),
            "java/lang/Byte" => Some(VarType::BYTE),
            "java/lang/Character" => Some(VarType::CHAR),
            "java/lang/Short" => Some(VarType::SHORT),
            "java/lang/Integer" => Some(VarType::INT),
            "java/lang/Long" => Some(VarType::LONG),
            "java/lang/Float" => Some(VarType::FLOAT),
            "java/lang/Double" => Some(VarType::DOUBLE),
            _ => None,
        }
    }
}

impl std::fmt::Display for VarType {
    /// Diagnostic form using internal (slash-separated) class names; the
    /// renderer owns source-form type names.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.base {
            BaseType::Boolean => write!(f, "boolean")?,
            BaseType::Byte => write!(f, "byte")?,
            BaseType::ByteChar => write!(f, "bytechar")?,
            BaseType::ShortChar => write!(f, "shortchar")?,
            BaseType::Short => write!(f, "short")?,
            BaseType::Char => write!(f, "char")?,
            BaseType::Int => write!(f, "int")?,
            BaseType::Long => write!(f, "long")?,
            BaseType::Float => write!(f, "float")?,
            BaseType::Double => write!(f, "double")?,
            BaseType::Void => write!(f, "void")?,
            BaseType::Null => write!(f, "null")?,
            BaseType::Unknown => write!(f, "unknown")?,
            BaseType::Object { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{a}")?;
                    }
                    write!(f, ">")?;
                }
            }
        }
        for _ in 0..self.arr_dim {
            write!(f, "[]")?;
        }
        Ok(())
    }
}
