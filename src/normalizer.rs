//! Value normalization
//!
//! Turns one authored `(key, value)` pair into canonical CSS declarations:
//! dashed property names, legacy aliases resolved, shorthands expanded,
//! physical properties mapped to logical ones and values canonicalized so
//! that equal styles hash equally.

use crate::core::constants::*;
use crate::core::properties;
use crate::core::util::{dashify, format_number, split_top_level, strip_leading_zero};
use crate::error::{CompilerError, Result, Warning};
use crate::types::Value;
use crate::CompilerOptions;
use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-]?(?:\d+\.?\d*|\.\d+))([a-zA-Z%]*)$").unwrap());

static SINGLE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#"'([^'"]*)'"#).unwrap());

const CONTENT_KEYWORDS: &[&str] = &[
    "normal",
    "none",
    "open-quote",
    "close-quote",
    "no-open-quote",
    "no-close-quote",
    "inherit",
    "initial",
    "unset",
    "revert",
    "revert-layer",
];

/// One canonical CSS declaration. Fallback chains carry several values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Declaration {
    pub property: String,
    pub values: Vec<String>,
    pub direction_sensitive: bool,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            values: vec![value.into()],
            direction_sensitive: false,
        }
    }

    /// Value text fed to the hasher
    pub fn value_text(&self) -> String {
        self.values.join(", ")
    }

    /// `prop:value`, repeated with `;` for fallback chains
    pub fn to_css(&self) -> String {
        self.values
            .iter()
            .map(|value| format!("{}:{}", self.property, value))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// The same declaration for the opposite writing direction, if it differs
    pub fn mirrored(&self) -> Option<Declaration> {
        if !self.direction_sensitive {
            return None;
        }
        Some(Declaration {
            property: properties::mirror_property(&self.property),
            values: self
                .values
                .iter()
                .map(|value| properties::mirror_value(&self.property, value))
                .collect(),
            direction_sensitive: true,
        })
    }
}

/// Output of normalizing one key
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Normalized {
    pub declarations: Vec<Declaration>,
    pub warnings: Vec<Warning>,
}

/// A property name after dashifying, aliasing and logical mapping
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProperty {
    pub name: String,
    pub direction_sensitive: bool,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    expand_shorthands: bool,
    logical_properties: bool,
    warn_unknown_properties: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&CompilerOptions::default())
    }
}

impl Normalizer {
    pub fn new(options: &CompilerOptions) -> Self {
        Self {
            expand_shorthands: options.expand_shorthands,
            logical_properties: options.logical_properties,
            warn_unknown_properties: options.warn_unknown_properties,
        }
    }

    /// Normalize a literal value (number, string or fallback chain)
    pub fn normalize(&self, key: &str, value: &Value) -> Result<Normalized> {
        let name = self.canonical_name(key);
        let mut out = Normalized::default();
        self.check_known(&name, &display_value(value), &mut out.warnings);

        match value {
            Value::Number(_) | Value::String(_) => {
                for (property, value) in self.expand(&name, value, &mut out.warnings) {
                    let text = self.transform(&property, value, &mut out.warnings)?;
                    out.declarations
                        .push(self.to_logical(property, vec![text]));
                }
            }
            Value::Fallbacks(chain) => {
                if chain.is_empty() {
                    return Err(CompilerError::invalid_value(&name, "empty fallback chain"));
                }
                let mut texts = Vec::with_capacity(chain.len());
                for item in chain {
                    texts.push(self.transform(&name, item, &mut out.warnings)?);
                }
                let values = compose_variables(&name, texts)?;
                out.declarations.push(self.to_logical(name, values));
            }
            other => {
                return Err(CompilerError::invalid_value(
                    &name,
                    format!("a {} cannot be normalized as a literal", other.kind_name()),
                ));
            }
        }

        log::trace!("normalized '{}' into {} declaration(s)", key, out.declarations.len());
        Ok(out)
    }

    /// Resolve just the property name, for values that are not literals
    /// (dynamic references).
    pub fn resolve_property(&self, key: &str) -> ResolvedProperty {
        let name = self.canonical_name(key);
        let mut warnings = Vec::new();
        self.check_known(&name, "", &mut warnings);

        let (name, direction_sensitive) = match self.logical_name(&name) {
            Some(logical) => (logical.to_string(), true),
            None => (name, false),
        };
        ResolvedProperty {
            name,
            direction_sensitive,
            warnings,
        }
    }

    fn canonical_name(&self, key: &str) -> String {
        let dashed = dashify(key);
        match properties::legacy_alias(&dashed) {
            Some(alias) => alias.to_string(),
            None => dashed,
        }
    }

    fn check_known(&self, name: &str, value: &str, warnings: &mut Vec<Warning>) {
        if self.warn_unknown_properties && !properties::is_known_property(name) {
            warnings.push(Warning::unknown_property(name, value));
        }
    }

    fn logical_name(&self, name: &str) -> Option<&'static str> {
        if self.logical_properties {
            properties::logical_property(name)
        } else {
            None
        }
    }

    /// Split a shorthand into longhand/value pairs. Returns the input
    /// unchanged when it is not an expandable shorthand.
    fn expand<'v>(
        &self,
        name: &str,
        value: &'v Value,
        warnings: &mut Vec<Warning>,
    ) -> Vec<(String, ExpandedValue<'v>)> {
        let whole = vec![(name.to_string(), ExpandedValue::Whole(value))];
        if !self.expand_shorthands {
            return whole;
        }
        let shorthand = match properties::shorthand(name) {
            Some(shorthand) => shorthand,
            None => return whole,
        };

        let text = match value {
            Value::Number(_) => return expand_number(shorthand, value),
            Value::String(text) => text,
            _ => return whole,
        };
        if name == "border-radius" && text.contains('/') {
            return whole;
        }

        let tokens = split_top_level(text);
        if tokens.is_empty() {
            return whole;
        }
        match shorthand.distribute(&tokens) {
            Some(pairs) => pairs
                .into_iter()
                .map(|(longhand, token)| {
                    (longhand.to_string(), ExpandedValue::Token(token.to_string()))
                })
                .collect(),
            None => {
                warnings.push(Warning::malformed_shorthand(
                    name,
                    text,
                    shorthand.max_tokens(),
                ));
                whole
            }
        }
    }

    fn transform(
        &self,
        property: &str,
        value: impl Into<Literal>,
        warnings: &mut Vec<Warning>,
    ) -> Result<String> {
        match value.into() {
            Literal::Number(n) => Ok(transform_number(property, n)),
            Literal::Text(text) => Ok(transform_string(property, &text, warnings)),
            Literal::Invalid(kind) => Err(CompilerError::invalid_value(
                property,
                format!("a {} is not allowed here", kind),
            )),
        }
    }

    fn to_logical(&self, property: String, values: Vec<String>) -> Declaration {
        if let Some(logical) = self.logical_name(&property) {
            return Declaration {
                property: logical.to_string(),
                values,
                direction_sensitive: true,
            };
        }

        if self.logical_properties {
            let mut mapped = false;
            let values: Vec<String> = values
                .into_iter()
                .map(|value| match properties::logical_value(&property, &value) {
                    Some(logical) => {
                        mapped = true;
                        logical.to_string()
                    }
                    None => value,
                })
                .collect();
            return Declaration {
                property,
                values,
                direction_sensitive: mapped,
            };
        }

        Declaration {
            property,
            values,
            direction_sensitive: false,
        }
    }
}

/// A value after shorthand expansion
enum ExpandedValue<'v> {
    Whole(&'v Value),
    Token(String),
}

enum Literal {
    Number(f64),
    Text(String),
    Invalid(&'static str),
}

impl From<ExpandedValue<'_>> for Literal {
    fn from(value: ExpandedValue<'_>) -> Self {
        match value {
            ExpandedValue::Whole(value) => value.into(),
            ExpandedValue::Token(token) => Literal::Text(token),
        }
    }
}

impl From<&Value> for Literal {
    fn from(value: &Value) -> Self {
        match value {
            Value::Number(n) => Literal::Number(*n),
            Value::String(s) => Literal::Text(s.clone()),
            other => Literal::Invalid(other.kind_name()),
        }
    }
}

fn expand_number(
    shorthand: properties::Shorthand,
    value: &Value,
) -> Vec<(String, ExpandedValue<'_>)> {
    let longhands: &[&'static str] = match &shorthand {
        properties::Shorthand::Box(longhands) => &longhands[..],
        properties::Shorthand::Axis(longhands) => &longhands[..],
    };
    longhands
        .iter()
        .map(|longhand| (longhand.to_string(), ExpandedValue::Whole(value)))
        .collect()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Number(n) => format_number(*n),
        Value::String(s) => s.clone(),
        Value::Fallbacks(chain) => chain
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.kind_name().to_string(),
    }
}

/// Render a bare number with the property's unit
pub fn transform_number(property: &str, value: f64) -> String {
    let number = strip_leading_zero(&format_number(value));
    format!("{}{}", number, properties::number_suffix(property))
}

/// Canonicalize an authored CSS value string
pub fn transform_string(property: &str, raw: &str, warnings: &mut Vec<Warning>) -> String {
    let quoted = SINGLE_QUOTED.replace_all(raw, "\"$1\"");
    let collapsed = collapse_whitespace(&quoted);
    let rewritten = rewrite_numbers(property, &collapsed, warnings);

    if property == "content" {
        quote_content(rewritten)
    } else {
        rewritten
    }
}

/// Collapse whitespace runs and drop spaces that hug commas or
/// parentheses inside functions. Quoted text is left alone.
fn collapse_whitespace(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut pending_space = false;

    for c in value.chars() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }

        if c.is_whitespace() {
            pending_space = true;
            continue;
        }

        if pending_space && !out.is_empty() {
            let after_open = depth > 0 && (out.ends_with(',') || out.ends_with('('));
            let before_close = depth > 0 && (c == ',' || c == ')');
            if !after_open && !before_close {
                out.push(' ');
            }
        }
        pending_space = false;

        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        out.push(c);
    }
    out
}

/// Rewrite numeric tokens: leading zeros, zero lengths, millisecond times
fn rewrite_numbers(property: &str, value: &str, warnings: &mut Vec<Warning>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut word = String::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;

    for c in value.chars() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            ' ' | ',' | '(' | ')' | '/' | '*' | '"' | '\'' => {
                out.push_str(&rewrite_word(property, value, &word, depth, warnings));
                word.clear();
                match c {
                    '(' => depth += 1,
                    ')' => depth = depth.saturating_sub(1),
                    '"' | '\'' => quote = Some(c),
                    _ => {}
                }
                out.push(c);
            }
            _ => word.push(c),
        }
    }
    out.push_str(&rewrite_word(property, value, &word, depth, warnings));
    out
}

fn rewrite_word(
    property: &str,
    value: &str,
    word: &str,
    depth: usize,
    warnings: &mut Vec<Warning>,
) -> String {
    let captures = match NUMERIC_TOKEN.captures(word) {
        Some(captures) => captures,
        None => return word.to_string(),
    };
    let number_text = &captures[1];
    let unit = captures[2].to_ascii_lowercase();

    if !unit.is_empty() && !KNOWN_UNITS.contains(&unit.as_str()) {
        warnings.push(Warning::unparsable_unit(property, value, word));
        return word.to_string();
    }

    let number: f64 = match number_text.parse() {
        Ok(number) => number,
        Err(_) => return word.to_string(),
    };

    if number == 0.0 {
        return if unit == "%" {
            "0%".to_string()
        } else if TIME_UNITS.contains(&unit.as_str()) {
            "0s".to_string()
        } else if ANGLE_UNITS.contains(&unit.as_str()) || depth > 0 {
            format!("0{}", unit)
        } else {
            "0".to_string()
        };
    }

    if unit == "ms" && number.abs() >= 10.0 {
        return format!("{}s", strip_leading_zero(&format_number(number / 1000.0)));
    }

    format!("{}{}", strip_leading_zero(number_text.trim_start_matches('+')), unit)
}

fn quote_content(value: String) -> String {
    let already_quoted = value.starts_with('"') && value.ends_with('"') && value.len() >= 2;
    if already_quoted || value.contains('(') || CONTENT_KEYWORDS.contains(&value.as_str()) {
        value
    } else {
        format!("\"{}\"", value.replace('"', "\\\""))
    }
}

fn is_variable(value: &str) -> bool {
    value.starts_with("var(") && value.ends_with(')')
}

/// Fold `var()` entries of a fallback chain into nested fallbacks:
/// `[500px, var(--x), var(--y), 100dvh]` becomes
/// `[var(--y,var(--x,500px)), 100dvh]`.
pub fn compose_variables(property: &str, values: Vec<String>) -> Result<Vec<String>> {
    let first = values.iter().position(|v| is_variable(v));
    let last = values.iter().rposition(|v| is_variable(v));
    let (first, last) = match (first, last) {
        (Some(first), Some(last)) => (first, last),
        _ => return Ok(values),
    };

    let variables = &values[first..=last];
    if !variables.iter().all(|v| is_variable(v)) {
        return Err(CompilerError::NonContiguousVariables {
            property: property.to_string(),
        });
    }
    // Innermost fallback is the earliest variable
    let names: Vec<&str> = variables
        .iter()
        .rev()
        .map(|v| &v[4..v.len() - 1])
        .collect();

    let before = &values[..first];
    let after = &values[last + 1..];

    let mut composed: Vec<String> = if before.is_empty() {
        vec![nest_variables(&names, None)]
    } else {
        before
            .iter()
            .map(|value| nest_variables(&names, Some(value)))
            .collect()
    };
    composed.extend(after.iter().cloned());
    Ok(composed)
}

fn nest_variables(names: &[&str], fallback: Option<&str>) -> String {
    match names.split_first() {
        Some((first, rest)) if !rest.is_empty() || fallback.is_some() => {
            format!("var({},{})", first, nest_variables(rest, fallback))
        }
        Some((first, _)) => {
            if first.starts_with("--") {
                format!("var({})", first)
            } else {
                first.to_string()
            }
        }
        None => fallback.unwrap_or_default().to_string(),
    }
}
