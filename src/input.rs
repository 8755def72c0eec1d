//! JSON style sources
//!
//! A source file looks like:
//!
//! ```json
//! {
//!   "create": {
//!     "root": { "color": "red", ":hover": { "start": 10 } },
//!     "sized": { "$params": ["width"], "width": { "$dynamic": "width" } }
//!   },
//!   "keyframes": {
//!     "fadeIn": { "from": { "opacity": 0 }, "to": { "opacity": 1 } }
//!   }
//! }
//! ```

use crate::error::{CompilerError, Result};
use crate::types::{DynamicRef, Keyframes, Namespace, StyleDefinition, StyleMap, Value};
use indexmap::IndexMap;
use serde_json::{Map, Value as Json};
use std::fs;
use std::path::Path;

const DYNAMIC_KEY: &str = "$dynamic";
const KEYFRAMES_KEY: &str = "$keyframes";
const FIRST_THAT_WORKS_KEY: &str = "$firstThatWorks";
const PARAMS_KEY: &str = "$params";

/// Everything declared in one source file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleSource {
    pub create: StyleDefinition,
    pub keyframes: IndexMap<String, Keyframes>,
}

impl StyleSource {
    pub fn is_empty(&self) -> bool {
        self.create.namespaces.is_empty() && self.keyframes.is_empty()
    }
}

pub fn load_source(path: &Path) -> Result<StyleSource> {
    let text = fs::read_to_string(path).map_err(|e| CompilerError::FileNotFound {
        path: format!("{}: {}", path.display(), e),
    })?;
    parse_source(&text).map_err(|e| match e {
        CompilerError::InvalidFormat { message } => CompilerError::InvalidFormat {
            message: format!("{}: {}", path.display(), message),
        },
        other => other,
    })
}

pub fn parse_source(text: &str) -> Result<StyleSource> {
    let json: Json = serde_json::from_str(text).map_err(|e| CompilerError::InvalidFormat {
        message: e.to_string(),
    })?;
    let root = as_object(&json, "source root")?;

    let mut source = StyleSource::default();
    for (key, value) in root {
        match key.as_str() {
            "create" => source.create = definition_from_json(value)?,
            "keyframes" => {
                for (name, frames) in as_object(value, "keyframes")? {
                    source
                        .keyframes
                        .insert(name.clone(), keyframes_from_json(frames)?);
                }
            }
            other => {
                return Err(CompilerError::InvalidFormat {
                    message: format!(
                        "unexpected top-level key '{}', expected 'create' or 'keyframes'",
                        other
                    ),
                });
            }
        }
    }
    Ok(source)
}

pub fn definition_from_json(json: &Json) -> Result<StyleDefinition> {
    let mut definition = StyleDefinition::new();
    for (name, namespace) in as_object(json, "create")? {
        definition
            .namespaces
            .insert(name.clone(), namespace_from_json(name, namespace)?);
    }
    Ok(definition)
}

pub fn namespace_from_json(name: &str, json: &Json) -> Result<Namespace> {
    let object = as_object(json, name)?;
    let mut params = Vec::new();
    let mut styles = StyleMap::new();

    for (key, value) in object {
        if key == PARAMS_KEY {
            params = params_from_json(name, value)?;
        } else {
            styles.insert(key.clone(), value_from_json(key, value)?);
        }
    }
    Ok(Namespace::new(styles).with_params(params))
}

fn params_from_json(namespace: &str, json: &Json) -> Result<Vec<String>> {
    let items = json.as_array().ok_or_else(|| {
        CompilerError::invalid_key(namespace, PARAMS_KEY, "expected an array of names")
    })?;
    items
        .iter()
        .map(|item| match item.as_str() {
            Some(param) if crate::core::util::is_valid_identifier(param) => Ok(param.to_string()),
            _ => Err(CompilerError::invalid_key(
                namespace,
                PARAMS_KEY,
                format!("'{}' is not a valid parameter name", item),
            )),
        })
        .collect()
}

pub fn value_from_json(key: &str, json: &Json) -> Result<Value> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(_) => Err(CompilerError::invalid_value(
            key,
            "booleans are not valid style values",
        )),
        Json::Number(n) => n
            .as_f64()
            .map(Value::Number)
            .ok_or_else(|| CompilerError::invalid_value(key, format!("unsupported number {}", n))),
        Json::String(s) => Ok(Value::String(s.clone())),
        Json::Array(items) => {
            let chain = items
                .iter()
                .map(|item| value_from_json(key, item))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Fallbacks(chain))
        }
        Json::Object(object) => object_from_json(key, object),
    }
}

fn object_from_json(key: &str, object: &Map<String, Json>) -> Result<Value> {
    if let Some(param) = object.get(DYNAMIC_KEY) {
        let param = param
            .as_str()
            .ok_or_else(|| CompilerError::invalid_value(key, "$dynamic must name a parameter"))?;
        let mut reference = DynamicRef::new(param);
        match object.get("default") {
            Some(Json::String(fallback)) => reference = reference.with_fallback(fallback.clone()),
            Some(Json::Number(fallback)) => {
                reference = reference.with_fallback(fallback.to_string())
            }
            Some(Json::Null) | None => {}
            Some(_) => {
                return Err(CompilerError::invalid_value(
                    key,
                    "dynamic default must be a string or number",
                ));
            }
        }
        return Ok(Value::Dynamic(reference));
    }

    if let Some(frames) = object.get(KEYFRAMES_KEY) {
        return Ok(Value::Keyframes(keyframes_from_json(frames)?));
    }

    if let Some(chain) = object.get(FIRST_THAT_WORKS_KEY) {
        let items = chain
            .as_array()
            .ok_or_else(|| CompilerError::invalid_value(key, "$firstThatWorks takes an array"))?;
        let values = items
            .iter()
            .map(|item| value_from_json(key, item))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Value::first_that_works(values));
    }

    let mut map = StyleMap::new();
    for (nested_key, value) in object {
        map.insert(nested_key.clone(), value_from_json(nested_key, value)?);
    }
    Ok(Value::Object(map))
}

pub fn keyframes_from_json(json: &Json) -> Result<Keyframes> {
    let mut keyframes = Keyframes::new();
    for (label, frame) in as_object(json, "keyframes")? {
        let mut styles = StyleMap::new();
        for (key, value) in as_object(frame, label)? {
            styles.insert(key.clone(), value_from_json(key, value)?);
        }
        keyframes.frames.insert(label.clone(), styles);
    }
    Ok(keyframes)
}

fn as_object<'a>(json: &'a Json, what: &str) -> Result<&'a Map<String, Json>> {
    json.as_object().ok_or_else(|| CompilerError::InvalidFormat {
        message: format!("'{}' must be an object", what),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::style_map;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SOURCE: &str = r#"{
        "create": {
            "root": {
                "color": "red",
                "height": 5,
                ":hover": { "start": 10 },
                "position": { "$firstThatWorks": ["sticky", "fixed"] },
                "display": null
            },
            "sized": {
                "$params": ["width"],
                "width": { "$dynamic": "width", "default": "auto" }
            },
            "animated": {
                "animationName": { "$keyframes": { "from": { "opacity": 0 }, "to": { "opacity": 1 } } }
            }
        },
        "keyframes": {
            "spin": { "from": { "rotate": "0deg" }, "to": { "rotate": "360deg" } }
        }
    }"#;

    #[test]
    fn test_parse_source() {
        let source = parse_source(SOURCE).unwrap();
        let root = &source.create.namespaces["root"];

        let keys: Vec<&str> = root.styles.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["color", "height", ":hover", "position", "display"]);
        assert_eq!(root.styles["height"], Value::Number(5.0));
        assert_eq!(
            root.styles[":hover"],
            Value::Object(style_map([("start", 10)]))
        );
        assert_eq!(
            root.styles["position"],
            Value::first_that_works(["sticky", "fixed"])
        );
        assert_eq!(root.styles["display"], Value::Null);

        let sized = &source.create.namespaces["sized"];
        assert_eq!(sized.params, vec!["width"]);
        assert_eq!(
            sized.styles["width"],
            Value::Dynamic(DynamicRef::new("width").with_fallback("auto"))
        );

        let animated = &source.create.namespaces["animated"];
        assert!(matches!(animated.styles["animationName"], Value::Keyframes(_)));

        assert_eq!(source.keyframes["spin"].frames.len(), 2);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            parse_source("{ not json"),
            Err(CompilerError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_source(r#"{"styles": {}}"#),
            Err(CompilerError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_source(r#"{"create": {"root": {"hidden": true}}}"#),
            Err(CompilerError::InvalidValue { .. })
        ));
        assert!(parse_source(r#"{"create": {"root": {"$params": ["1x"]}}}"#).is_err());
    }

    #[test]
    fn test_load_source() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SOURCE.as_bytes()).unwrap();
        let source = load_source(file.path()).unwrap();
        assert!(!source.is_empty());

        let missing = load_source(Path::new("/definitely/not/here.json"));
        assert!(matches!(missing, Err(CompilerError::FileNotFound { .. })));
    }
}
