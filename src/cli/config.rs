// FILE: src/cli/config.rs

use crate::error::{CompilerError, Result};
use crate::CompilerOptions;
use serde::{Deserialize, Serialize};
use std::fs;

/// Settings read from `--config`. Unset fields leave the default in place.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub class_name_prefix: Option<String>,
    pub expand_shorthands: Option<bool>,
    pub logical_properties: Option<bool>,
    pub warn_unknown_properties: Option<bool>,
    pub dynamic_null_fallback: Option<String>,
    pub debug_mode: Option<bool>,
    pub output_file: Option<String>,
}

impl ConfigFile {
    pub fn apply(&self, options: &mut CompilerOptions) {
        if let Some(prefix) = &self.class_name_prefix {
            options.class_name_prefix = prefix.clone();
        }
        if let Some(expand) = self.expand_shorthands {
            options.expand_shorthands = expand;
        }
        if let Some(logical) = self.logical_properties {
            options.logical_properties = logical;
        }
        if let Some(warn) = self.warn_unknown_properties {
            options.warn_unknown_properties = warn;
        }
        if let Some(fallback) = &self.dynamic_null_fallback {
            options.dynamic_null_fallback = fallback.clone();
        }
        if let Some(debug) = self.debug_mode {
            options.debug_mode = debug;
        }
    }
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config_content = fs::read_to_string(config_path).map_err(|e| {
        CompilerError::FileNotFound {
            path: format!("Config file {}: {}", config_path, e),
        }
    })?;
    let config = parse(config_path, &config_content)?;
    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}

fn parse(config_path: &str, config_content: &str) -> Result<ConfigFile> {
    if config_path.ends_with(".json") {
        serde_json::from_str(config_content).map_err(|e| CompilerError::InvalidFormat {
            message: format!("Invalid JSON config: {}", e),
        })
    } else if config_path.ends_with(".toml") {
        toml::from_str(config_content).map_err(|e| CompilerError::InvalidFormat {
            message: format!("Invalid TOML config: {}", e),
        })
    } else {
        Err(CompilerError::InvalidFormat {
            message: "Config file must be .json or .toml format".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_toml_config() {
        let config = parse(
            "atomc.toml",
            "class_name_prefix = \"app\"\nexpand_shorthands = false\n",
        )
        .unwrap();
        let mut options = CompilerOptions::default();
        config.apply(&mut options);

        assert_eq!(options.class_name_prefix, "app");
        assert!(!options.expand_shorthands);
        assert!(options.logical_properties);
    }

    #[test]
    fn test_json_config_file() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"dynamic_null_fallback": "unset", "output_file": "out.css"}"#)
            .unwrap();
        let config = load(file.path().to_str().unwrap()).unwrap();

        let mut options = CompilerOptions::default();
        config.apply(&mut options);
        assert_eq!(options.dynamic_null_fallback, "unset");
        assert_eq!(config.output_file.as_deref(), Some("out.css"));
    }

    #[test]
    fn test_unknown_extension() {
        assert!(matches!(
            parse("atomc.yaml", ""),
            Err(CompilerError::InvalidFormat { .. })
        ));
    }
}
