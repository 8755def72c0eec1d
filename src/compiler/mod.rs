// FILE: src/compiler/mod.rs

// The style compiler: orchestrates flattening, normalization, hashing and
// rule generation for whole style definitions.

pub mod flatten;

use crate::core::constants::DYNAMIC_VARIABLE_FALLBACK;
use crate::core::properties::number_suffix;
use crate::error::{CompilerError, Result, Warning};
use crate::hasher;
use crate::keyframes::{self, CompiledKeyframes};
use crate::normalizer::{Declaration, Normalizer};
use crate::registry::{SharedRegistry, StyleRegistry};
use crate::rule_generator;
use crate::types::*;
use crate::CompilerOptions;
use rayon::prelude::*;

/// Everything one definition compiled to
#[derive(Debug, Clone, Default)]
pub struct CompileOutput {
    pub styles: CompiledStyles,
    /// Deduplicated, in first-occurrence order
    pub artifacts: Vec<Artifact>,
    pub warnings: Vec<Warning>,
}

impl CompileOutput {
    pub fn rule_count(&self) -> usize {
        self.artifacts.iter().filter(|a| !a.is_keyframes()).count()
    }

    pub fn keyframes_count(&self) -> usize {
        self.artifacts.iter().filter(|a| a.is_keyframes()).count()
    }
}

#[derive(Debug, Clone)]
pub struct StyleCompiler {
    options: CompilerOptions,
    normalizer: Normalizer,
}

impl StyleCompiler {
    pub fn new(options: CompilerOptions) -> Result<Self> {
        options.validate()?;
        let normalizer = Normalizer::new(&options);
        Ok(Self {
            options,
            normalizer,
        })
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile a definition and merge its artifacts into `registry`.
    ///
    /// Nothing is inserted unless the whole definition compiles and none of
    /// its artifacts collide with the registry.
    pub fn compile(
        &self,
        definition: &StyleDefinition,
        registry: &mut StyleRegistry,
    ) -> Result<CompileOutput> {
        let output = self.compile_local(definition)?;
        registry.merge(&output.artifacts)?;
        Ok(output)
    }

    /// Compile a definition without touching any registry
    pub fn compile_local(&self, definition: &StyleDefinition) -> Result<CompileOutput> {
        let mut unit = Unit::default();

        for (name, namespace) in &definition.namespaces {
            // STAGE 1: flatten nested contexts into leaves
            let leaves = flatten::flatten(name, &namespace.styles)?;

            // STAGE 2: normalize, hash and render every leaf
            let mut compiled = CompiledNamespace {
                params: namespace.params.clone(),
                ..CompiledNamespace::default()
            };
            for leaf in &leaves {
                self.compile_leaf(name, namespace, leaf, &mut compiled, &mut unit)?;
            }
            log::debug!(
                "namespace '{}': {} keys, {} leaves",
                name,
                compiled.classes.len(),
                leaves.len()
            );
            unit.output.styles.insert(name.clone(), compiled);
        }

        // STAGE 3: hand back artifacts in first-occurrence order
        unit.output.artifacts = unit.artifacts.artifacts().cloned().collect();
        for warning in &unit.output.warnings {
            log::warn!("{}", warning);
        }
        Ok(unit.output)
    }

    /// Compile a standalone keyframes block into `registry`
    pub fn compile_keyframes(
        &self,
        frames: &Keyframes,
        registry: &mut StyleRegistry,
    ) -> Result<CompiledKeyframes> {
        let compiled = self.compile_keyframes_local(frames)?;
        registry.insert(Artifact::Keyframes(compiled.artifact.clone()))?;
        Ok(compiled)
    }

    pub fn compile_keyframes_local(&self, frames: &Keyframes) -> Result<CompiledKeyframes> {
        let compiled =
            keyframes::compile_keyframes(frames, &self.normalizer, &self.options.class_name_prefix)?;
        for warning in &compiled.warnings {
            log::warn!("{}", warning);
        }
        Ok(compiled)
    }

    /// Compile locally, then merge under the registry lock
    pub fn compile_shared(
        &self,
        definition: &StyleDefinition,
        registry: &SharedRegistry,
    ) -> Result<CompileOutput> {
        let output = self.compile_local(definition)?;
        merge_shared(registry, &output)?;
        Ok(output)
    }

    /// Compile independent definitions on the rayon pool. Merges happen in
    /// input order so the registry contents do not depend on scheduling.
    pub fn compile_parallel(
        &self,
        definitions: &[StyleDefinition],
        registry: &SharedRegistry,
    ) -> Vec<Result<CompileOutput>> {
        let locals: Vec<Result<CompileOutput>> = definitions
            .par_iter()
            .map(|definition| self.compile_local(definition))
            .collect();

        log::debug!("compiled {} definitions in parallel", definitions.len());
        locals
            .into_iter()
            .map(|local| {
                let output = local?;
                merge_shared(registry, &output)?;
                Ok(output)
            })
            .collect()
    }

    fn compile_leaf(
        &self,
        namespace_name: &str,
        namespace: &Namespace,
        leaf: &StyleLeaf,
        compiled: &mut CompiledNamespace,
        unit: &mut Unit,
    ) -> Result<()> {
        let prefix = &self.options.class_name_prefix;

        let declarations = match &leaf.value {
            Value::Null => {
                compiled
                    .classes
                    .entry(leaf.key.clone())
                    .or_insert(CompiledValue::Null);
                return Ok(());
            }
            Value::Object(_) => {
                return Err(CompilerError::invalid_key(
                    namespace_name,
                    &leaf.key,
                    "unexpected nested object",
                ));
            }
            Value::Keyframes(frames) => {
                let keyframes = keyframes::compile_keyframes(
                    frames,
                    &self.normalizer,
                    &self.options.class_name_prefix,
                )?;
                let name = keyframes.artifact.name.clone();
                unit.output.warnings.extend(keyframes.warnings);
                unit.artifacts.insert(Artifact::Keyframes(keyframes.artifact))?;

                let normalized = self
                    .normalizer
                    .normalize(&leaf.property, &Value::String(name))?;
                unit.output.warnings.extend(normalized.warnings);
                normalized.declarations
            }
            Value::Dynamic(reference) => {
                if !namespace.params.contains(&reference.param) {
                    return Err(CompilerError::UnknownDynamicReference {
                        namespace: namespace_name.to_string(),
                        param: reference.param.clone(),
                    });
                }
                let (declaration, binding) = self.dynamic_declaration(leaf, reference, unit);
                match compiled.bindings.iter().position(|b| b.variable == binding.variable) {
                    Some(index) if compiled.bindings[index] != binding => {
                        return Err(CompilerError::invalid_key(
                            namespace_name,
                            &leaf.key,
                            format!(
                                "variable '{}' is already bound to parameter '{}'",
                                binding.variable, compiled.bindings[index].param
                            ),
                        ));
                    }
                    Some(_) => {}
                    None => compiled.bindings.push(binding),
                }
                vec![declaration]
            }
            literal => {
                let normalized = self.normalizer.normalize(&leaf.property, literal)?;
                unit.output.warnings.extend(normalized.warnings);
                normalized.declarations
            }
        };

        let entry = compiled
            .classes
            .entry(leaf.key.clone())
            .or_insert(CompiledValue::Null);
        for declaration in &declarations {
            let rule = rule_generator::compile_rule(prefix, declaration, &leaf.context);
            entry.push(rule.class_name.clone());
            unit.artifacts.insert(Artifact::Rule(rule))?;
        }
        Ok(())
    }

    fn dynamic_declaration(
        &self,
        leaf: &StyleLeaf,
        reference: &DynamicRef,
        unit: &mut Unit,
    ) -> (Declaration, DynamicBinding) {
        let resolved = self.normalizer.resolve_property(&leaf.property);
        unit.output.warnings.extend(resolved.warnings);

        let variable = hasher::dynamic_variable(&resolved.name, &leaf.context);
        let transform = ValueTransform {
            suffix: number_suffix(&resolved.name).to_string(),
            null_fallback: reference
                .fallback
                .clone()
                .unwrap_or_else(|| self.options.dynamic_null_fallback.clone()),
        };
        let declaration = Declaration {
            values: vec![format!("var({},{})", variable, DYNAMIC_VARIABLE_FALLBACK)],
            property: resolved.name,
            direction_sensitive: resolved.direction_sensitive,
        };
        let binding = DynamicBinding {
            variable,
            param: reference.param.clone(),
            transform,
        };
        (declaration, binding)
    }
}

/// Working state of one compile call
#[derive(Default)]
struct Unit {
    output: CompileOutput,
    /// Local dedup set; catches collisions inside one definition
    artifacts: StyleRegistry,
}

fn merge_shared(registry: &SharedRegistry, output: &CompileOutput) -> Result<usize> {
    let mut guard = registry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.merge(&output.artifacts)
}
