//! Structural rewrite / pattern-match facade.
//!
//! An external rewrite-rule engine describes a subtree shape as a
//! `MatchNode` (a bag of property rules); `Exprent::matches` answers whether
//! a node satisfies it. Matching short-circuits to false on the first
//! violated rule, checks the variant tag before any variant-specific rule,
//! and supports capture rules that bind a matched sub-value for reuse across
//! the rest of the pattern: the first occurrence binds, later occurrences
//! must equal the bound value. Absence of a rule for an attribute means
//! "don't care".

use std::collections::HashMap;

use crate::exprent::{ConstValue, ExitKind, Exprent, ExprentKind, ExprentTag, FunctionType};
use crate::types::VarType;

/// A concrete value a rule compares or captures.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchValue {
    Tag(ExprentTag),
    FnType(FunctionType),
    ExitKind(ExitKind),
    Const(ConstValue),
    Type(VarType),
    Name(String),
    Index(u32),
    /// A whole node, bound by `ExprentRet` captures; compared by value.
    Node(Box<Exprent>),
}

/// The attributes a rule can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchProperty {
    ExprentType,
    ExprentRet,
    FunctionType,
    ExitKind,
    ConstValue,
    ConstType,
    InvocationName,
    InvocationClass,
    InvocationSignature,
    FieldName,
    VarIndex,
}

/// A rule is either an exact expected value or a named capture slot.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleValue {
    Value(MatchValue),
    Capture(String),
}

/// One pattern node: the rules a candidate expression must satisfy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchNode {
    rules: Vec<(MatchProperty, RuleValue)>,
}

impl MatchNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, property: MatchProperty, rule: RuleValue) -> Self {
        self.rules.push((property, rule));
        self
    }

    pub fn with_value(self, property: MatchProperty, value: MatchValue) -> Self {
        self.with_rule(property, RuleValue::Value(value))
    }

    pub fn with_capture(self, property: MatchProperty, name: impl Into<String>) -> Self {
        self.with_rule(property, RuleValue::Capture(name.into()))
    }

    pub fn rules(&self) -> &[(MatchProperty, RuleValue)] {
        &self.rules
    }

    fn rule(&self, property: MatchProperty) -> Option<&RuleValue> {
        self.rules.iter().find(|(p, _)| *p == property).map(|(_, r)| r)
    }
}

/// Capture-variable state shared across one pattern application.
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    bindings: HashMap<String, MatchValue>,
}

impl MatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` on first sight; on later sights require equality with the
    /// bound value.
    pub fn check_and_set(&mut self, name: &str, value: MatchValue) -> bool {
        match self.bindings.get(name) {
            Some(bound) => *bound == value,
            None => {
                self.bindings.insert(name.to_string(), value);
                true
            }
        }
    }

    pub fn binding(&self, name: &str) -> Option<&MatchValue> {
        self.bindings.get(name)
    }
}

fn check(rule: &RuleValue, engine: &mut MatchEngine, actual: MatchValue) -> bool {
    match rule {
        RuleValue::Value(expected) => *expected == actual,
        RuleValue::Capture(name) => engine.check_and_set(name, actual),
    }
}

impl Exprent {
    /// Does this node satisfy every rule of `pattern`?
    pub fn matches(&self, pattern: &MatchNode, engine: &mut MatchEngine) -> bool {
        if let Some(rule) = pattern.rule(MatchProperty::ExprentType) {
            if !check(rule, engine, MatchValue::Tag(self.tag())) {
                return false;
            }
        }
        for (property, rule) in pattern.rules() {
            let ok = match property {
                MatchProperty::ExprentType => true,
                MatchProperty::ExprentRet => {
                    check(rule, engine, MatchValue::Node(Box::new(self.clone())))
                }
                MatchProperty::FunctionType => match &self.kind {
                    ExprentKind::Function { fn_type, .. } => {
                        check(rule, engine, MatchValue::FnType(*fn_type))
                    }
                    _ => false,
                },
                MatchProperty::ExitKind => match &self.kind {
                    ExprentKind::Exit { kind, .. } => {
                        check(rule, engine, MatchValue::ExitKind(*kind))
                    }
                    _ => false,
                },
                MatchProperty::ConstValue => match &self.kind {
                    ExprentKind::Const { value, .. } => {
                        check(rule, engine, MatchValue::Const(value.clone()))
                    }
                    _ => false,
                },
                MatchProperty::ConstType => match &self.kind {
                    ExprentKind::Const { const_type, .. } => {
                        check(rule, engine, MatchValue::Type(const_type.clone()))
                    }
                    _ => false,
                },
                MatchProperty::InvocationName => match &self.kind {
                    ExprentKind::Invocation { name, .. } => {
                        check(rule, engine, MatchValue::Name(name.clone()))
                    }
                    _ => false,
                },
                MatchProperty::InvocationClass => match &self.kind {
                    ExprentKind::Invocation { class_name, .. } => {
                        check(rule, engine, MatchValue::Name(class_name.clone()))
                    }
                    _ => false,
                },
                MatchProperty::InvocationSignature => match &self.kind {
                    ExprentKind::Invocation { descriptor, .. } => {
                        check(rule, engine, MatchValue::Name(descriptor.to_descriptor_string()))
                    }
                    _ => false,
                },
                MatchProperty::FieldName => match &self.kind {
                    ExprentKind::Field { name, .. } => {
                        check(rule, engine, MatchValue::Name(name.clone()))
                    }
                    _ => false,
                },
                MatchProperty::VarIndex => match &self.kind {
                    ExprentKind::Var { index, .. } => {
                        check(rule, engine, MatchValue::Index(*index))
                    }
                    _ => false,
                },
            };
            if !ok {
                return false;
            }
        }
        true
    }
}
