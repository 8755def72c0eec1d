//! Error and warning types for the atomic style compiler

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompilerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid key '{key}' in namespace '{namespace}': {message}")]
    InvalidKey { namespace: String, key: String, message: String },

    #[error("Invalid at-rule '{at_rule}': only @media, @supports and @container may scope styles")]
    InvalidAtRule { at_rule: String },

    #[error("Invalid nesting at '{path}': {message}")]
    InvalidNesting { path: String, message: String },

    #[error("Pseudo-class or at-rule '{key}' is not allowed inside keyframes")]
    PseudoInKeyframes { key: String },

    #[error("Invalid keyframes: {message}")]
    InvalidKeyframes { message: String },

    #[error("Unknown dynamic value '{param}' in namespace '{namespace}'")]
    UnknownDynamicReference { namespace: String, param: String },

    #[error("Invalid value for '{property}': {message}")]
    InvalidValue { property: String, message: String },

    #[error("Fallback chain for '{property}' mixes var() references with plain values")]
    NonContiguousVariables { property: String },

    #[error("Class name collision for '{class_name}': '{existing}' vs '{incoming}'")]
    ClassNameCollision {
        class_name: String,
        existing: String,
        incoming: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },
}

pub type Result<T> = std::result::Result<T, CompilerError>;

impl CompilerError {
    pub fn invalid_key(
        namespace: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidKey {
            namespace: namespace.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn invalid_nesting(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidNesting {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_keyframes(message: impl Into<String>) -> Self {
        Self::InvalidKeyframes {
            message: message.into(),
        }
    }

    pub fn invalid_value(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            property: property.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Errors caused by the style input itself. These abort a single definition.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidKey { .. }
                | Self::InvalidAtRule { .. }
                | Self::InvalidNesting { .. }
                | Self::PseudoInKeyframes { .. }
                | Self::InvalidKeyframes { .. }
                | Self::UnknownDynamicReference { .. }
                | Self::InvalidValue { .. }
                | Self::NonContiguousVariables { .. }
        )
    }

    /// Internal errors that indicate a hashing bug rather than bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::ClassNameCollision { .. })
    }
}

/// Category of a non-fatal normalization problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    UnknownProperty,
    UnparsableUnit,
    MalformedShorthand,
}

/// A non-fatal problem found while normalizing a declaration.
///
/// The declaration is still compiled as a literal pass-through.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub property: String,
    pub value: String,
    pub message: String,
}

impl Warning {
    pub fn unknown_property(property: &str, value: &str) -> Self {
        Self {
            kind: WarningKind::UnknownProperty,
            property: property.to_string(),
            value: value.to_string(),
            message: format!("Unknown CSS property '{}', passed through as-is", property),
        }
    }

    pub fn unparsable_unit(property: &str, value: &str, token: &str) -> Self {
        Self {
            kind: WarningKind::UnparsableUnit,
            property: property.to_string(),
            value: value.to_string(),
            message: format!("Unrecognized unit in '{}', passed through as-is", token),
        }
    }

    pub fn malformed_shorthand(property: &str, value: &str, max_tokens: usize) -> Self {
        Self {
            kind: WarningKind::MalformedShorthand,
            property: property.to_string(),
            value: value.to_string(),
            message: format!(
                "Shorthand '{}' takes at most {} values, left unexpanded",
                property, max_tokens
            ),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}: {})", self.message, self.property, self.value)
    }
}
