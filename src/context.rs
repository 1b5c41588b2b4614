use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::diagnostics::DecompileError;
use crate::options::Options;
use crate::types::VarType;

/// Parsed JVM method descriptor: parameter types plus return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub params: Vec<VarType>,
    pub ret: VarType,
}

impl MethodDescriptor {
    pub fn new(params: Vec<VarType>, ret: VarType) -> Self {
        Self { params, ret }
    }

    /// Parse `(IJLjava/lang/String;)V`-style descriptors.
    pub fn from_descriptor(descriptor: &str) -> Result<Self, DecompileError> {
        let body = descriptor
            .strip_prefix('(')
            .ok_or_else(|| bad_method_descriptor(descriptor))?;
        let close = body.find(')').ok_or_else(|| bad_method_descriptor(descriptor))?;
        let (mut params_str, ret_str) = (&body[..close], &body[close + 1..]);
        let mut params = Vec::new();
        while !params_str.is_empty() {
            let (ty, rest) = VarType::read_descriptor(params_str)?;
            params.push(ty);
            params_str = rest;
        }
        let ret = VarType::from_descriptor(ret_str)?;
        Ok(Self { params, ret })
    }

    /// Erased descriptor string, the generics-table and signature-rule key.
    pub fn to_descriptor_string(&self) -> String {
        let mut out = String::from("(");
        for p in &self.params {
            out.push_str(&p.to_descriptor());
        }
        out.push(')');
        out.push_str(&self.ret.to_descriptor());
        out
    }
}

fn bad_method_descriptor(descriptor: &str) -> DecompileError {
    DecompileError::structural(format!("malformed method descriptor '{descriptor}'"))
}

/// Metadata of the method currently being decompiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodContext {
    pub name: String,
    pub descriptor: MethodDescriptor,
    /// Declared checked exceptions, internal names (`java/io/IOException`).
    pub thrown: Vec<String>,
}

/// One declared method of a class, as the overload-ambiguity check sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSig {
    pub name: String,
    pub descriptor: MethodDescriptor,
}

/// Declared methods per class, consulted by ambiguous-overload cast
/// detection. Missing classes degrade to "no ambiguity", never an error.
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    by_class: HashMap<String, Vec<MethodSig>>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, class_name: impl Into<String>, sig: MethodSig) {
        self.by_class.entry(class_name.into()).or_default().push(sig);
    }

    pub fn methods_of(&self, class_name: &str) -> &[MethodSig] {
        self.by_class.get(class_name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Generic-signature-derived types, keyed by member. Populated by the
/// out-of-scope metadata reader; consulted only when
/// `decompile_generic_signatures` is on, silently absent otherwise.
#[derive(Debug, Clone, Default)]
pub struct GenericsTable {
    fields: HashMap<(String, String), VarType>,
    method_returns: HashMap<(String, String, String), VarType>,
}

impl GenericsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field_type(&mut self, class: &str, field: &str, ty: VarType) {
        self.fields.insert((class.to_string(), field.to_string()), ty);
    }

    pub fn field_type(&self, class: &str, field: &str) -> Option<&VarType> {
        self.fields.get(&(class.to_string(), field.to_string()))
    }

    pub fn set_method_return(&mut self, class: &str, name: &str, descriptor: &str, ty: VarType) {
        self.method_returns
            .insert((class.to_string(), name.to_string(), descriptor.to_string()), ty);
    }

    pub fn method_return(&self, class: &str, name: &str, descriptor: &str) -> Option<&VarType> {
        self.method_returns
            .get(&(class.to_string(), name.to_string(), descriptor.to_string()))
    }
}

/// Name-shortening/import service supplied by the host. The renderer hands
/// it every qualified (dot-separated) class name it is about to emit.
pub trait ImportResolver {
    fn shorten(&self, qualified: &str) -> String;
}

/// Default resolver: no import collection, names stay fully qualified.
pub struct IdentityImporter;

impl ImportResolver for IdentityImporter {
    fn shorten(&self, qualified: &str) -> String {
        qualified.to_string()
    }
}

/// Shortens `java.lang.*` members to their simple names, the minimum a
/// readable decompile needs without a real import collector.
pub struct JavaLangImporter;

impl ImportResolver for JavaLangImporter {
    fn shorten(&self, qualified: &str) -> String {
        match qualified.rsplit_once('.') {
            Some((package, simple)) if package == "java.lang" => simple.to_string(),
            _ => qualified.to_string(),
        }
    }
}

/// Per-decompilation-unit state, threaded explicitly through every
/// construction, inference and render call.
///
/// One context per worker; never shared across concurrently decompiled
/// units. The id counter resets with each new context, keeping node ids
/// meaningful for diagnostics within a unit.
pub struct DecompileContext {
    pub options: Options,
    /// Qualified internal name of the class being decompiled.
    pub class_name: String,
    pub method: Option<MethodContext>,
    pub generics: GenericsTable,
    pub methods: MethodTable,
    pub importer: Box<dyn ImportResolver>,
    counter: u32,
}

impl DecompileContext {
    pub fn new(options: Options, class_name: impl Into<String>) -> Self {
        Self {
            options,
            class_name: class_name.into(),
            method: None,
            generics: GenericsTable::new(),
            methods: MethodTable::new(),
            importer: Box::new(JavaLangImporter),
            counter: 0,
        }
    }

    pub fn with_method(mut self, method: MethodContext) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_importer(mut self, importer: Box<dyn ImportResolver>) -> Self {
        self.importer = importer;
        self
    }

    /// Next per-unit node id, monotonically increasing.
    pub fn next_id(&mut self) -> u32 {
        self.counter += 1;
        self.counter
    }

    /// Shorten a dot-separated qualified class name for emission.
    pub fn shorten(&self, qualified: &str) -> String {
        self.importer.shorten(qualified)
    }
}
