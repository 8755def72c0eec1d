//! Data model shared by every compiler phase

use crate::core::util::format_number;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeTuple};
use serde::{Serialize, Serializer};
use std::fmt;

/// Ordered key/value map of a style object
pub type StyleMap = IndexMap<String, Value>;

/// Compiled namespaces keyed by their original name
pub type CompiledStyles = IndexMap<String, CompiledNamespace>;

/// A raw style value as written by the author
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicitly unsets a property. Produces no rule.
    Null,
    Number(f64),
    String(String),
    /// Fallback chain. Later entries win in the cascade.
    Fallbacks(Vec<Value>),
    /// Reference to a parameter of a dynamic namespace
    Dynamic(DynamicRef),
    /// Inline keyframes block, replaced by its generated name
    Keyframes(Keyframes),
    /// Nested pseudo/at-rule map or a property-level conditional object
    Object(StyleMap),
}

impl Value {
    /// Fallback chain where the first value the browser understands wins.
    pub fn first_that_works<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut chain: Vec<Value> = values.into_iter().map(Into::into).collect();
        chain.reverse();
        Value::Fallbacks(chain)
    }

    pub fn fallbacks<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Fallbacks(values.into_iter().map(Into::into).collect())
    }

    pub fn dynamic(param: impl Into<String>) -> Self {
        Value::Dynamic(DynamicRef::new(param))
    }

    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(style_map(entries))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Fallbacks(_) => "fallback chain",
            Value::Dynamic(_) => "dynamic value",
            Value::Keyframes(_) => "keyframes",
            Value::Object(_) => "object",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<StyleMap> for Value {
    fn from(value: StyleMap) -> Self {
        Value::Object(value)
    }
}

impl From<Keyframes> for Value {
    fn from(value: Keyframes) -> Self {
        Value::Keyframes(value)
    }
}

impl From<DynamicRef> for Value {
    fn from(value: DynamicRef) -> Self {
        Value::Dynamic(value)
    }
}

/// Build a [`StyleMap`] from key/value pairs, preserving order
pub fn style_map<I, K, V>(entries: I) -> StyleMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// A dynamic value bound to a namespace parameter at runtime
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicRef {
    pub param: String,
    /// Rendered when the runtime argument is nullish. `None` means the
    /// configured default (normally `initial`).
    pub fallback: Option<String>,
}

impl DynamicRef {
    pub fn new(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }
}

/// Ordered animation frames, keyed by offset label (`from`, `50%`, `to`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Keyframes {
    pub frames: IndexMap<String, StyleMap>,
}

impl Keyframes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(mut self, label: impl Into<String>, styles: StyleMap) -> Self {
        self.frames.insert(label.into(), styles);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// One named style object. Dynamic namespaces declare parameters that
/// [`Value::Dynamic`] references may name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Namespace {
    pub params: Vec<String>,
    pub styles: StyleMap,
}

impl Namespace {
    pub fn new(styles: StyleMap) -> Self {
        Self {
            params: Vec::new(),
            styles,
        }
    }

    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_dynamic(&self) -> bool {
        !self.params.is_empty()
    }
}

/// A full style definition: every namespace passed to one create call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleDefinition {
    pub namespaces: IndexMap<String, Namespace>,
}

impl StyleDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(mut self, name: impl Into<String>, namespace: Namespace) -> Self {
        self.namespaces.insert(name.into(), namespace);
        self
    }

    /// Definition with a single static namespace
    pub fn single(name: impl Into<String>, styles: StyleMap) -> Self {
        Self::new().namespace(name, Namespace::new(styles))
    }
}

/// One level of selector or at-rule nesting
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextSegment {
    /// `:hover`, `::before`, `:nth-child(2n)`
    Pseudo(String),
    /// `@media (...)`, `@supports (...)`, `@container (...)`
    AtRule(String),
}

impl ContextSegment {
    pub fn as_str(&self) -> &str {
        match self {
            ContextSegment::Pseudo(s) | ContextSegment::AtRule(s) => s,
        }
    }

    pub fn is_pseudo_element(&self) -> bool {
        matches!(self, ContextSegment::Pseudo(s) if s.starts_with("::"))
    }
}

impl fmt::Display for ContextSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stack of contexts from the outermost key to the current leaf
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ContextPath {
    segments: Vec<ContextSegment>,
}

impl ContextPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<ContextSegment>) -> Self {
        Self { segments }
    }

    pub fn push(&mut self, segment: ContextSegment) {
        self.segments.push(segment);
    }

    pub fn pop(&mut self) -> Option<ContextSegment> {
        self.segments.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[ContextSegment] {
        &self.segments
    }

    pub fn contains(&self, segment: &ContextSegment) -> bool {
        self.segments.contains(segment)
    }

    /// Pseudo selectors in source order
    pub fn pseudos(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                ContextSegment::Pseudo(p) => Some(p.as_str()),
                ContextSegment::AtRule(_) => None,
            })
            .collect()
    }

    /// At-rules in source order, outermost first
    pub fn at_rules(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                ContextSegment::AtRule(a) => Some(a.as_str()),
                ContextSegment::Pseudo(_) => None,
            })
            .collect()
    }

    pub fn has_pseudo_element(&self) -> bool {
        self.segments.iter().any(ContextSegment::is_pseudo_element)
    }

    /// Key prefix used for namespace-level nested objects, e.g. `:hover_`
    pub fn key_prefix(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("{}_", s.as_str()))
            .collect()
    }
}

impl fmt::Display for ContextPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.segments.iter().map(ContextSegment::as_str).collect();
        write!(f, "{}", parts.join(" > "))
    }
}

/// A flattened (property, context, value) triple, consumed within one compile
#[derive(Debug, Clone, PartialEq)]
pub struct StyleLeaf {
    /// Key of the compiled namespace this leaf's classes are listed under
    pub key: String,
    pub property: String,
    pub context: ContextPath,
    pub value: Value,
}

/// Base-direction rule text and its mirrored form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CssPair {
    pub ltr: String,
    pub rtl: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    pub class_name: String,
    pub css: CssPair,
    pub priority: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyframesArtifact {
    pub name: String,
    /// Concatenated `label{prop:value;}` frames in source order
    pub frames: String,
    pub css: CssPair,
    pub priority: u32,
}

/// Anything the compiler emits for injection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Rule(CompiledRule),
    Keyframes(KeyframesArtifact),
}

impl Artifact {
    pub fn id(&self) -> &str {
        match self {
            Artifact::Rule(rule) => &rule.class_name,
            Artifact::Keyframes(keyframes) => &keyframes.name,
        }
    }

    pub fn css(&self) -> &CssPair {
        match self {
            Artifact::Rule(rule) => &rule.css,
            Artifact::Keyframes(keyframes) => &keyframes.css,
        }
    }

    pub fn priority(&self) -> u32 {
        match self {
            Artifact::Rule(rule) => rule.priority,
            Artifact::Keyframes(keyframes) => keyframes.priority,
        }
    }

    pub fn is_keyframes(&self) -> bool {
        matches!(self, Artifact::Keyframes(_))
    }
}

// Wire format: [id, {"ltr": .., "rtl": ..}, priority]
impl Serialize for Artifact {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(self.id())?;
        tuple.serialize_element(self.css())?;
        tuple.serialize_element(&self.priority())?;
        tuple.end()
    }
}

/// Class names generated for one key of a namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CompiledValue {
    Class(String),
    Classes(Vec<String>),
    Null,
}

impl CompiledValue {
    pub fn push(&mut self, class_name: String) {
        match self {
            CompiledValue::Null => *self = CompiledValue::Class(class_name),
            CompiledValue::Class(existing) => {
                if *existing != class_name {
                    let first = std::mem::take(existing);
                    *self = CompiledValue::Classes(vec![first, class_name]);
                }
            }
            CompiledValue::Classes(names) => {
                if !names.contains(&class_name) {
                    names.push(class_name);
                }
            }
        }
    }

    pub fn class_names(&self) -> Vec<&str> {
        match self {
            CompiledValue::Class(name) => vec![name.as_str()],
            CompiledValue::Classes(names) => names.iter().map(String::as_str).collect(),
            CompiledValue::Null => Vec::new(),
        }
    }

    /// Space-separated class attribute value
    pub fn joined(&self) -> Option<String> {
        match self {
            CompiledValue::Null => None,
            _ => Some(self.class_names().join(" ")),
        }
    }
}

/// Argument passed to a dynamic namespace at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeArg {
    Number(f64),
    String(String),
    Null,
}

/// How a runtime argument becomes the value of a CSS variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueTransform {
    /// Appended to numeric arguments (`px`, `ms` or empty)
    pub suffix: String,
    /// Used when the argument is nullish
    pub null_fallback: String,
}

impl ValueTransform {
    pub fn apply(&self, arg: &RuntimeArg) -> String {
        match arg {
            RuntimeArg::Number(n) => format!("{}{}", format_number(*n), self.suffix),
            RuntimeArg::String(s) => s.clone(),
            RuntimeArg::Null => self.null_fallback.clone(),
        }
    }

    /// Equivalent JavaScript arrow function for host adapters
    pub fn describe(&self) -> String {
        let number_branch = if self.suffix.is_empty() {
            "val".to_string()
        } else {
            format!("val + \"{}\"", self.suffix)
        };
        format!(
            "val => typeof val === \"number\" ? {} : val != null ? val : \"{}\"",
            number_branch, self.null_fallback
        )
    }
}

/// A CSS variable set inline from a namespace parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DynamicBinding {
    pub variable: String,
    pub param: String,
    pub transform: ValueTransform,
}

/// Compiled form of one namespace
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledNamespace {
    pub classes: IndexMap<String, CompiledValue>,
    pub params: Vec<String>,
    pub bindings: Vec<DynamicBinding>,
}

impl CompiledNamespace {
    pub fn get(&self, key: &str) -> Option<&CompiledValue> {
        self.classes.get(key)
    }

    pub fn is_dynamic(&self) -> bool {
        !self.params.is_empty()
    }

    /// Every class name in key order, without duplicates
    pub fn class_list(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for value in self.classes.values() {
            for name in value.class_names() {
                if !seen.contains(&name) {
                    seen.push(name);
                }
            }
        }
        seen
    }

    /// Resolve the inline style object for a dynamic namespace.
    /// Missing arguments count as null.
    pub fn inline_styles(&self, args: &IndexMap<String, RuntimeArg>) -> IndexMap<String, String> {
        self.bindings
            .iter()
            .map(|binding| {
                let arg = args.get(&binding.param).unwrap_or(&RuntimeArg::Null);
                (binding.variable.clone(), binding.transform.apply(arg))
            })
            .collect()
    }
}

impl Serialize for CompiledNamespace {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let extra = if self.is_dynamic() { 3 } else { 1 };
        let mut map = serializer.serialize_map(Some(self.classes.len() + extra))?;
        for (key, value) in &self.classes {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("$$css", &true)?;
        if self.is_dynamic() {
            map.serialize_entry("$params", &self.params)?;
            map.serialize_entry("$bindings", &self.bindings)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_that_works_reverses_chain() {
        let value = Value::first_that_works(["sticky", "fixed"]);
        assert_eq!(
            value,
            Value::Fallbacks(vec![Value::from("fixed"), Value::from("sticky")])
        );
    }

    #[test]
    fn test_compiled_value_push() {
        let mut value = CompiledValue::Null;
        value.push("x1".to_string());
        assert_eq!(value, CompiledValue::Class("x1".to_string()));

        value.push("x1".to_string());
        assert_eq!(value, CompiledValue::Class("x1".to_string()));

        value.push("x2".to_string());
        assert_eq!(
            value,
            CompiledValue::Classes(vec!["x1".to_string(), "x2".to_string()])
        );
        assert_eq!(value.joined().as_deref(), Some("x1 x2"));
    }

    #[test]
    fn test_context_path_accessors() {
        let mut path = ContextPath::new();
        path.push(ContextSegment::AtRule("@media (min-width: 10px)".to_string()));
        path.push(ContextSegment::Pseudo(":hover".to_string()));

        assert_eq!(path.pseudos(), vec![":hover"]);
        assert_eq!(path.at_rules(), vec!["@media (min-width: 10px)"]);
        assert_eq!(path.key_prefix(), "@media (min-width: 10px)_:hover_");
        assert!(!path.has_pseudo_element());

        path.pop();
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_value_transform() {
        let transform = ValueTransform {
            suffix: "px".to_string(),
            null_fallback: "initial".to_string(),
        };
        assert_eq!(transform.apply(&RuntimeArg::Number(10.0)), "10px");
        assert_eq!(transform.apply(&RuntimeArg::Number(1.5)), "1.5px");
        assert_eq!(transform.apply(&RuntimeArg::String("50%".into())), "50%");
        assert_eq!(transform.apply(&RuntimeArg::Null), "initial");
        assert_eq!(
            transform.describe(),
            "val => typeof val === \"number\" ? val + \"px\" : val != null ? val : \"initial\""
        );
    }

    #[test]
    fn test_artifact_wire_format() {
        let artifact = Artifact::Rule(CompiledRule {
            class_name: "x1e2nbdu".to_string(),
            css: CssPair {
                ltr: ".x1e2nbdu{color:red}".to_string(),
                rtl: None,
            },
            priority: 3000,
        });
        let json = serde_json::to_string(&artifact).unwrap();
        assert_eq!(
            json,
            r#"["x1e2nbdu",{"ltr":".x1e2nbdu{color:red}","rtl":null},3000]"#
        );
    }
}
