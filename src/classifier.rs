//! Key classification and context priorities

use crate::core::constants::*;
use crate::core::properties;
use crate::error::{CompilerError, Result};
use crate::types::{ContextPath, ContextSegment};

/// What a key in a style map stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Property,
    /// `:hover`, `::before`
    Pseudo,
    /// `@media ...`, `@supports ...`, `@container ...` (or an unsupported at-rule)
    AtRule,
    /// `default` inside a conditional object
    Default,
}

pub fn classify(key: &str) -> KeyKind {
    if key.starts_with(':') {
        KeyKind::Pseudo
    } else if key.starts_with('@') {
        KeyKind::AtRule
    } else if key == "default" {
        KeyKind::Default
    } else {
        KeyKind::Property
    }
}

/// Convert a pseudo or at-rule key into a context segment, rejecting
/// at-rules that cannot scope a declaration.
pub fn to_segment(key: &str) -> Result<ContextSegment> {
    let key = key.trim();
    match classify(key) {
        KeyKind::Pseudo => {
            let name = key.trim_start_matches(':');
            if name.is_empty() {
                return Err(CompilerError::invalid_nesting(
                    key,
                    "pseudo selector without a name",
                ));
            }
            Ok(ContextSegment::Pseudo(key.to_string()))
        }
        KeyKind::AtRule => {
            let supported = SUPPORTED_AT_RULES.iter().any(|rule| {
                key.strip_prefix(rule)
                    .map_or(false, |rest| rest.starts_with(' ') || rest.starts_with('('))
            });
            if supported {
                Ok(ContextSegment::AtRule(key.to_string()))
            } else {
                Err(CompilerError::InvalidAtRule {
                    at_rule: key.to_string(),
                })
            }
        }
        KeyKind::Property | KeyKind::Default => Err(CompilerError::invalid_nesting(
            key,
            "expected a pseudo selector or at-rule",
        )),
    }
}

pub fn segment_priority(segment: &ContextSegment) -> u32 {
    match segment {
        ContextSegment::AtRule(_) => PRIORITY_AT_RULE,
        ContextSegment::Pseudo(_) if segment.is_pseudo_element() => PRIORITY_PSEUDO_ELEMENT,
        ContextSegment::Pseudo(pseudo) => properties::pseudo_class_priority(pseudo),
    }
}

impl ContextPath {
    /// Sum of the priorities of every segment
    pub fn priority(&self) -> u32 {
        self.segments().iter().map(segment_priority).sum()
    }
}

/// Injection priority of a declaration in a context
pub fn priority(property: &str, context: &ContextPath) -> u32 {
    properties::property_priority(property) + context.priority()
}
