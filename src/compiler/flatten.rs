// FILE: src/compiler/flatten.rs

// Turns a namespace's nested style map into flat (key, property, context,
// value) leaves, walking with an explicit context stack.

use crate::classifier::{classify, to_segment, KeyKind};
use crate::core::constants::MAX_CONTEXT_DEPTH;
use crate::error::{CompilerError, Result};
use crate::types::{ContextPath, StyleLeaf, StyleMap, Value};

pub struct Flattener<'a> {
    namespace: &'a str,
    path: ContextPath,
    leaves: Vec<StyleLeaf>,
}

impl<'a> Flattener<'a> {
    pub fn new(namespace: &'a str) -> Self {
        Self {
            namespace,
            path: ContextPath::new(),
            leaves: Vec::new(),
        }
    }

    pub fn flatten(mut self, styles: &StyleMap) -> Result<Vec<StyleLeaf>> {
        self.walk_styles(styles)?;
        log::trace!(
            "namespace '{}' flattened into {} leaves",
            self.namespace,
            self.leaves.len()
        );
        Ok(self.leaves)
    }

    /// Namespace level: properties and legacy nested pseudo/at-rule maps
    fn walk_styles(&mut self, styles: &StyleMap) -> Result<()> {
        for (key, value) in styles {
            match classify(key) {
                KeyKind::Pseudo | KeyKind::AtRule => {
                    let nested = match value {
                        Value::Object(nested) => nested,
                        other => {
                            return Err(CompilerError::invalid_key(
                                self.namespace,
                                key,
                                format!("expected a style object, found a {}", other.kind_name()),
                            ));
                        }
                    };
                    self.enter(key)?;
                    self.walk_styles(nested)?;
                    self.path.pop();
                }
                KeyKind::Property | KeyKind::Default => {
                    if key.trim().is_empty() {
                        return Err(CompilerError::invalid_key(
                            self.namespace,
                            key,
                            "empty property name",
                        ));
                    }
                    let output_key = format!("{}{}", self.path.key_prefix(), key);
                    match value {
                        Value::Object(conditions) => {
                            self.walk_conditions(&output_key, key, conditions)?;
                        }
                        _ => self.push_leaf(&output_key, key, value),
                    }
                }
            }
        }
        Ok(())
    }

    /// Property level: `{ default, ':hover', '@media ..' }`
    fn walk_conditions(&mut self, output_key: &str, property: &str, conditions: &StyleMap) -> Result<()> {
        if conditions.is_empty() {
            return Err(CompilerError::invalid_key(
                self.namespace,
                property,
                "conditional object has no values",
            ));
        }

        for (key, value) in conditions {
            match classify(key) {
                KeyKind::Default => self.visit_condition(output_key, property, value)?,
                KeyKind::Pseudo | KeyKind::AtRule => {
                    self.enter(key)?;
                    self.visit_condition(output_key, property, value)?;
                    self.path.pop();
                }
                KeyKind::Property => {
                    return Err(CompilerError::invalid_key(
                        self.namespace,
                        format!("{}.{}", property, key),
                        "conditional objects only take 'default', pseudo and at-rule keys",
                    ));
                }
            }
        }
        Ok(())
    }

    fn visit_condition(&mut self, output_key: &str, property: &str, value: &Value) -> Result<()> {
        match value {
            Value::Object(nested) => self.walk_conditions(output_key, property, nested),
            _ => {
                self.push_leaf(output_key, property, value);
                Ok(())
            }
        }
    }

    /// Push a context segment after checking it against the current path
    fn enter(&mut self, key: &str) -> Result<()> {
        let segment = to_segment(key)?;

        if self.path.contains(&segment) {
            return Err(CompilerError::invalid_nesting(
                format!("{} > {}", self.path, segment),
                format!("'{}' is repeated", segment),
            ));
        }
        if segment.is_pseudo_element() && self.path.has_pseudo_element() {
            return Err(CompilerError::invalid_nesting(
                format!("{} > {}", self.path, segment),
                "pseudo-elements cannot be nested in pseudo-elements",
            ));
        }
        if self.path.len() >= MAX_CONTEXT_DEPTH {
            return Err(CompilerError::invalid_nesting(
                self.path.to_string(),
                format!("contexts nest at most {} levels deep", MAX_CONTEXT_DEPTH),
            ));
        }

        self.path.push(segment);
        Ok(())
    }

    fn push_leaf(&mut self, output_key: &str, property: &str, value: &Value) {
        self.leaves.push(StyleLeaf {
            key: output_key.to_string(),
            property: property.to_string(),
            context: self.path.clone(),
            value: value.clone(),
        });
    }
}

/// Flatten one namespace's style map
pub fn flatten(namespace: &str, styles: &StyleMap) -> Result<Vec<StyleLeaf>> {
    Flattener::new(namespace).flatten(styles)
}
