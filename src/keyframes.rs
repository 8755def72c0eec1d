//! Keyframes blocks

use crate::classifier::{classify, KeyKind};
use crate::core::constants::*;
use crate::error::{CompilerError, Result, Warning};
use crate::hasher;
use crate::normalizer::{Declaration, Normalizer};
use crate::types::{CssPair, Keyframes, KeyframesArtifact, StyleMap, Value};

/// A compiled keyframes block and the warnings raised while normalizing it
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledKeyframes {
    pub artifact: KeyframesArtifact,
    pub warnings: Vec<Warning>,
}

pub fn compile_keyframes(
    keyframes: &Keyframes,
    normalizer: &Normalizer,
    prefix: &str,
) -> Result<CompiledKeyframes> {
    if keyframes.is_empty() {
        return Err(CompilerError::invalid_keyframes("keyframes need at least one frame"));
    }

    let mut ltr_body = String::new();
    let mut rtl_body = String::new();
    let mut warnings = Vec::new();

    for (label, styles) in &keyframes.frames {
        let label = canonical_label(label)?;
        let declarations = frame_declarations(styles, normalizer, &mut warnings)?;

        ltr_body.push_str(&frame_text(&label, declarations.iter()));
        let mirrored: Vec<Declaration> = declarations
            .iter()
            .map(|d| d.mirrored().unwrap_or_else(|| d.clone()))
            .collect();
        rtl_body.push_str(&frame_text(&label, mirrored.iter()));
    }

    let name = hasher::keyframes_name(prefix, &ltr_body);
    let ltr = format!("@keyframes {}{{{}}}", name, ltr_body);
    let rtl = if rtl_body != ltr_body {
        Some(format!("@keyframes {}{{{}}}", name, rtl_body))
    } else {
        None
    };
    log::debug!("compiled keyframes {} ({} frames)", name, keyframes.frames.len());

    Ok(CompiledKeyframes {
        artifact: KeyframesArtifact {
            name,
            frames: ltr_body,
            css: CssPair { ltr, rtl },
            priority: PRIORITY_KEYFRAMES,
        },
        warnings,
    })
}

fn frame_declarations(
    styles: &StyleMap,
    normalizer: &Normalizer,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<Declaration>> {
    let mut declarations = Vec::new();
    for (key, value) in styles {
        match classify(key) {
            KeyKind::Pseudo | KeyKind::AtRule => {
                return Err(CompilerError::PseudoInKeyframes { key: key.clone() });
            }
            KeyKind::Property | KeyKind::Default => {}
        }

        match value {
            Value::Null => continue,
            Value::Object(_) | Value::Dynamic(_) | Value::Keyframes(_) => {
                return Err(CompilerError::invalid_keyframes(format!(
                    "'{}' has a {} value; frames only take plain values",
                    key,
                    value.kind_name()
                )));
            }
            _ => {}
        }

        let normalized = normalizer.normalize(key, value)?;
        warnings.extend(normalized.warnings);
        declarations.extend(normalized.declarations);
    }
    Ok(declarations)
}

fn frame_text<'a>(label: &str, declarations: impl Iterator<Item = &'a Declaration>) -> String {
    let mut body = String::new();
    for declaration in declarations {
        for value in &declaration.values {
            body.push_str(&format!("{}:{};", declaration.property, value));
        }
    }
    format!("{}{{{}}}", label, body)
}

/// `from`, `to`, a percentage or a comma list of those
fn canonical_label(label: &str) -> Result<String> {
    let mut parts = Vec::new();
    for part in label.split(',') {
        let part = part.trim();
        if !is_offset(part) {
            return Err(CompilerError::invalid_keyframes(format!(
                "invalid frame label '{}'",
                label
            )));
        }
        parts.push(part);
    }
    Ok(parts.join(","))
}

fn is_offset(part: &str) -> bool {
    if KEYFRAME_KEYWORDS.contains(&part) {
        return true;
    }
    match part.strip_suffix('%') {
        Some(number) => number
            .parse::<f64>()
            .map_or(false, |n| (0.0..=100.0).contains(&n)),
        None => false,
    }
}
