//! Atomic Style Compiler
//!
//! Compiles declarative style definitions (nested property maps with
//! pseudo-class, media-query and keyframe sub-maps) into content-addressed
//! atomic CSS rules and the class names that reference them.
//!
//! # Features
//!
//! - Deterministic class names: equal declarations always hash equally
//! - Logical properties with mirrored right-to-left rules
//! - Shorthand expansion into atomic longhands
//! - Priority-ordered injection that encodes selector specificity
//! - Keyframes, fallback chains and dynamic (runtime) values
//!
//! # Basic Usage
//!
//! ```rust
//! use atomc::{style_map, StyleCompiler, StyleDefinition, StyleRegistry, Value};
//!
//! fn main() -> atomc::Result<()> {
//!     let compiler = StyleCompiler::new(Default::default())?;
//!     let mut registry = StyleRegistry::new();
//!     let definition = StyleDefinition::single("root", style_map([("color", Value::from("red"))]));
//!     let output = compiler.compile(&definition, &mut registry)?;
//!     assert_eq!(output.styles["root"].class_list(), vec!["x1e2nbdu"]);
//!     Ok(())
//! }
//! ```
//!
//! # Compilation Pipeline
//!
//! 1. **Flatten**: walk each namespace with a context stack into leaves
//! 2. **Normalize**: dashify, alias, expand shorthands, map to logical
//!    properties and canonicalize values
//! 3. **Hash**: derive the class name from property, value and context
//! 4. **Generate**: render the ltr/rtl rule text and its priority
//! 5. **Merge**: deduplicate into the [`StyleRegistry`] and emit CSS

pub mod classifier;
pub mod cli;
pub mod compiler;
pub mod core;
pub mod error;
pub mod hasher;
pub mod input;
pub mod keyframes;
pub mod normalizer;
pub mod registry;
pub mod rule_generator;
pub mod types;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// Re-export commonly used types and functions
pub use compiler::{CompileOutput, StyleCompiler};
pub use error::{CompilerError, Result, Warning, WarningKind};
pub use input::{load_source, parse_source, StyleSource};
pub use keyframes::CompiledKeyframes;
pub use normalizer::{Declaration, Normalizer};
pub use registry::{Direction, SharedRegistry, StyleRegistry};
pub use types::*;

/// Compiler version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Compiler build information
pub const BUILD_INFO: CompilerInfo = CompilerInfo {
    version: VERSION,
    name: NAME,
    description: DESCRIPTION,
    supported_features: &[
        "pseudo-classes",
        "pseudo-elements",
        "media-queries",
        "supports-queries",
        "container-queries",
        "keyframes",
        "dynamic-values",
        "fallback-chains",
        "logical-properties",
        "shorthand-expansion",
    ],
};

/// Compiler information structure
#[derive(Debug, Clone)]
pub struct CompilerInfo {
    pub version: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub supported_features: &'static [&'static str],
}

/// Compilation options and settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Prepended to every generated class and keyframes name
    pub class_name_prefix: String,

    /// Split shorthands such as `margin` into atomic longhands
    pub expand_shorthands: bool,

    /// Rewrite physical properties (`left`, `margin-right`) to logical ones
    pub logical_properties: bool,

    /// Report properties missing from the known CSS property list
    pub warn_unknown_properties: bool,

    /// Value a dynamic variable takes when its runtime argument is null
    pub dynamic_null_fallback: String,

    /// Enable debug mode with extra logging
    pub debug_mode: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            class_name_prefix: crate::core::constants::DEFAULT_CLASS_NAME_PREFIX.to_string(),
            expand_shorthands: true,
            logical_properties: true,
            warn_unknown_properties: true,
            dynamic_null_fallback: crate::core::constants::DEFAULT_DYNAMIC_NULL_FALLBACK.to_string(),
            debug_mode: false,
        }
    }
}

impl CompilerOptions {
    pub fn validate(&self) -> Result<()> {
        if !crate::core::util::is_valid_class_prefix(&self.class_name_prefix) {
            return Err(CompilerError::config(format!(
                "class name prefix '{}' must start with a letter or underscore",
                self.class_name_prefix
            )));
        }
        if self.dynamic_null_fallback.trim().is_empty() {
            return Err(CompilerError::config(
                "dynamic null fallback cannot be empty",
            ));
        }
        Ok(())
    }
}

/// Compilation statistics and metrics
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompilationStats {
    /// Source size in bytes
    pub source_size: u64,

    /// Emitted stylesheet size in bytes
    pub output_size: u64,

    /// Number of source files compiled
    pub file_count: usize,

    /// Number of namespaces compiled
    pub namespace_count: usize,

    /// Number of distinct atomic rules
    pub rule_count: usize,

    /// Number of distinct keyframes blocks
    pub keyframes_count: usize,

    /// Number of warnings raised
    pub warning_count: usize,

    /// Compilation time in milliseconds
    pub compile_time_ms: u64,
}

impl CompilationStats {
    /// Fold one compiled source into the totals
    pub fn record(&mut self, output: &CompileOutput, keyframes: usize) {
        self.file_count += 1;
        self.namespace_count += output.styles.len();
        self.warning_count += output.warnings.len();
        self.keyframes_count += keyframes;
    }

    /// Fill registry-derived counts
    pub fn finish(&mut self, registry: &StyleRegistry, output_size: usize) {
        self.rule_count = registry.rule_count();
        self.keyframes_count = registry.keyframes_count();
        self.output_size = output_size as u64;
    }
}

/// Compile a JSON source file to a stylesheet with default options
pub fn compile_file(input_path: &str, output_path: &str) -> Result<CompilationStats> {
    compile_file_with_options(input_path, output_path, CompilerOptions::default())
}

/// Compile a JSON source file to a stylesheet with custom options
pub fn compile_file_with_options(
    input_path: &str,
    output_path: &str,
    options: CompilerOptions,
) -> Result<CompilationStats> {
    use std::time::Instant;

    let start_time = Instant::now();

    if options.debug_mode {
        log::info!("{} v{}", NAME, VERSION);
        log::info!("Compiling '{}' to '{}'...", input_path, output_path);
        log::debug!("Compiler options: {:?}", options);
    }

    let source_size = fs::metadata(input_path)
        .map_err(|e| CompilerError::FileNotFound {
            path: format!("{}: {}", input_path, e),
        })?
        .len();
    let source = load_source(Path::new(input_path))?;

    let compiler = StyleCompiler::new(options.clone())?;
    let mut registry = StyleRegistry::new();
    let (output, keyframes) = compile_source_into(&compiler, &source, &mut registry)?;

    let css = registry.to_css(Direction::Ltr);
    fs::write(output_path, &css)?;

    let mut stats = CompilationStats {
        source_size,
        ..CompilationStats::default()
    };
    stats.record(&output, keyframes);
    stats.finish(&registry, css.len());
    stats.compile_time_ms = start_time.elapsed().as_millis() as u64;

    if options.debug_mode {
        log::info!("Compilation successful!");
        log::info!("Rules: {}, keyframes: {}", stats.rule_count, stats.keyframes_count);
        log::info!("Output size: {} bytes", stats.output_size);
        log::info!("Compile time: {}ms", stats.compile_time_ms);
        log::debug!("Full stats: {:?}", stats);
    }

    Ok(stats)
}

/// Compile JSON source text with default options, returning the output and
/// the registry holding its artifacts
pub fn compile_source(text: &str) -> Result<(CompileOutput, StyleRegistry)> {
    compile_source_with_options(text, CompilerOptions::default())
}

pub fn compile_source_with_options(
    text: &str,
    options: CompilerOptions,
) -> Result<(CompileOutput, StyleRegistry)> {
    let source = parse_source(text)?;
    let compiler = StyleCompiler::new(options)?;
    let mut registry = StyleRegistry::new();
    let (output, _) = compile_source_into(&compiler, &source, &mut registry)?;
    Ok((output, registry))
}

/// Compile a parsed source's namespaces and standalone keyframes into
/// `registry`. Returns the output and the keyframes count.
///
/// The registry is only touched once the whole source has compiled.
pub fn compile_source_into(
    compiler: &StyleCompiler,
    source: &StyleSource,
    registry: &mut StyleRegistry,
) -> Result<(CompileOutput, usize)> {
    let output = compile_source_local(compiler, source)?;
    registry.merge(&output.artifacts)?;
    Ok((output, source.keyframes.len()))
}

/// Compile a parsed source without touching any registry. Artifacts from
/// namespaces and standalone keyframes are deduplicated together.
pub fn compile_source_local(compiler: &StyleCompiler, source: &StyleSource) -> Result<CompileOutput> {
    let mut output = compiler.compile_local(&source.create)?;
    let mut artifacts = StyleRegistry::new();
    artifacts.merge(&output.artifacts)?;

    for (name, frames) in &source.keyframes {
        let compiled = compiler.compile_keyframes_local(frames)?;
        log::debug!("keyframes '{}' -> {}", name, compiled.artifact.name);
        output.warnings.extend(compiled.warnings);
        artifacts.insert(Artifact::Keyframes(compiled.artifact))?;
    }

    output.artifacts = artifacts.artifacts().cloned().collect();
    Ok(output)
}

/// Check if the compiler supports a named feature
pub fn supports_feature(feature: &str) -> bool {
    BUILD_INFO.supported_features.contains(&feature)
}

/// Get compiler build information
pub fn build_info() -> &'static CompilerInfo {
    &BUILD_INFO
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SOURCE: &str = r#"{
        "create": {
            "root": {
                "color": "red",
                "height": 5,
                ":hover": { "start": 10 },
                "@media (min-width: 1000px)": { "end": 5 }
            }
        },
        "keyframes": {
            "slide": { "from": { "start": 0 }, "to": { "start": 100 } }
        }
    }"#;

    #[test]
    fn test_compile_source() {
        let (output, registry) = compile_source(SOURCE).unwrap();
        assert_eq!(
            output.styles["root"].class_list(),
            vec!["x1e2nbdu", "x1ycjhwn", "xaiupp8", "x1uy60zq"]
        );

        let css = registry.to_css(Direction::Ltr);
        let lines: Vec<&str> = css.lines().collect();
        assert_eq!(
            lines,
            vec![
                "@keyframes x1g85oeb-B{from{inset-inline-start:0px;}to{inset-inline-start:100px;}}",
                ".x1e2nbdu{color:red}",
                ".xaiupp8:hover{inset-inline-start:10px}",
                "@media (min-width: 1000px){.x1uy60zq.x1uy60zq{inset-inline-end:5px}}",
                ".x1ycjhwn{height:5px}",
            ]
        );
    }

    #[test]
    fn test_compiled_styles_serialize() {
        let (output, _) = compile_source(SOURCE).unwrap();
        let json = serde_json::to_string(&output.styles).unwrap();
        assert!(json.starts_with(r#"{"root":{"color":"x1e2nbdu","height":"x1ycjhwn""#));
        assert!(json.contains(r#""$$css":true"#));

        let artifacts = serde_json::to_string(&output.artifacts[0]).unwrap();
        assert_eq!(
            artifacts,
            r#"["x1e2nbdu",{"ltr":".x1e2nbdu{color:red}","rtl":null},3000]"#
        );
    }

    #[test]
    fn test_shared_keyframes_listed_once() {
        let source = parse_source(
            r#"{
                "create": {
                    "fading": {
                        "animationName": {
                            "$keyframes": { "from": { "opacity": 0 }, "to": { "opacity": 1 } }
                        }
                    }
                },
                "keyframes": {
                    "fade": { "from": { "opacity": 0 }, "to": { "opacity": 1 } }
                }
            }"#,
        )
        .unwrap();
        let compiler = StyleCompiler::new(CompilerOptions::default()).unwrap();
        let mut registry = StyleRegistry::new();
        let (output, keyframes) = compile_source_into(&compiler, &source, &mut registry).unwrap();

        let ids: Vec<&str> = output.artifacts.iter().map(Artifact::id).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(output.keyframes_count(), 1);
        assert_eq!(keyframes, 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_failed_keyframes_leave_registry_untouched() {
        let source = parse_source(
            r#"{
                "create": { "root": { "color": "red" } },
                "keyframes": {
                    "broken": { "from": { ":hover": { "opacity": 0 } } }
                }
            }"#,
        )
        .unwrap();
        let compiler = StyleCompiler::new(CompilerOptions::default()).unwrap();
        let mut registry = StyleRegistry::new();

        assert!(compile_source_into(&compiler, &source, &mut registry).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_compile_file() {
        let temp_dir = TempDir::new().unwrap();
        let input_path = temp_dir.path().join("styles.json");
        let output_path = temp_dir.path().join("styles.css");
        fs::write(&input_path, SOURCE).unwrap();

        let stats = compile_file(
            input_path.to_str().unwrap(),
            output_path.to_str().unwrap(),
        )
        .unwrap();

        assert!(output_path.exists());
        assert_eq!(stats.file_count, 1);
        assert_eq!(stats.namespace_count, 1);
        assert_eq!(stats.rule_count, 4);
        assert_eq!(stats.keyframes_count, 1);
        assert_eq!(stats.source_size, SOURCE.len() as u64);

        let css = fs::read_to_string(&output_path).unwrap();
        assert_eq!(stats.output_size, css.len() as u64);
    }

    #[test]
    fn test_compile_missing_file() {
        let result = compile_file("/no/such/styles.json", "/tmp/out.css");
        assert!(matches!(result, Err(CompilerError::FileNotFound { .. })));
    }

    #[test]
    fn test_compile_with_options() {
        let options = CompilerOptions {
            class_name_prefix: "app-".to_string(),
            debug_mode: true,
            ..Default::default()
        };
        let (output, _) = compile_source_with_options(SOURCE, options).unwrap();
        assert_eq!(output.styles["root"].get("color"), Some(&CompiledValue::Class("app-1e2nbdu".into())));
    }

    #[test]
    fn test_build_info() {
        let info = build_info();
        assert!(!info.version.is_empty());
        assert!(!info.name.is_empty());
        assert!(supports_feature("keyframes"));
        assert!(supports_feature("logical-properties"));
        assert!(!supports_feature("nonexistent_feature"));
    }

    #[test]
    fn test_compiler_options_default() {
        let options = CompilerOptions::default();
        assert_eq!(options.class_name_prefix, "x");
        assert!(options.expand_shorthands);
        assert!(options.logical_properties);
        assert!(options.warn_unknown_properties);
        assert_eq!(options.dynamic_null_fallback, "initial");
        assert!(!options.debug_mode);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_compiler_options_validation() {
        let options = CompilerOptions {
            class_name_prefix: "9x".to_string(),
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(CompilerError::Config { .. })));
        assert!(StyleCompiler::new(options).is_err());

        let options = CompilerOptions {
            dynamic_null_fallback: " ".to_string(),
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }
}
