//! Deduplicating artifact accumulator and stylesheet emission

use crate::error::{CompilerError, Result};
use crate::types::Artifact;
use indexmap::IndexMap;
use std::sync::{Arc, Mutex};

/// Writing direction of an emitted stylesheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Every artifact of one compilation unit, keyed by class or keyframes name.
///
/// A name maps to exactly one CSS body; inserting the same artifact twice is
/// a no-op and inserting a different body under an existing name fails.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    artifacts: IndexMap<String, Artifact>,
}

/// Registry shared between compiler threads
pub type SharedRegistry = Arc<Mutex<StyleRegistry>>;

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(Mutex::new(self))
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.artifacts.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Artifact> {
        self.artifacts.get(id)
    }

    /// Artifacts in insertion order
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    pub fn rule_count(&self) -> usize {
        self.artifacts().filter(|a| !a.is_keyframes()).count()
    }

    pub fn keyframes_count(&self) -> usize {
        self.artifacts().filter(|a| a.is_keyframes()).count()
    }

    /// Fail if `artifact` would redefine an existing name
    pub fn check(&self, artifact: &Artifact) -> Result<()> {
        match self.artifacts.get(artifact.id()) {
            Some(existing) if existing != artifact => Err(CompilerError::ClassNameCollision {
                class_name: artifact.id().to_string(),
                existing: existing.css().ltr.clone(),
                incoming: artifact.css().ltr.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Insert one artifact. Returns whether it was new.
    pub fn insert(&mut self, artifact: Artifact) -> Result<bool> {
        self.check(&artifact)?;
        if self.artifacts.contains_key(artifact.id()) {
            return Ok(false);
        }
        self.artifacts.insert(artifact.id().to_string(), artifact);
        Ok(true)
    }

    /// Insert a batch atomically: every artifact is checked before any is
    /// inserted. Returns the number of new artifacts.
    pub fn merge<'a, I>(&mut self, artifacts: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Artifact>,
        I::IntoIter: Clone,
    {
        let artifacts = artifacts.into_iter();
        for artifact in artifacts.clone() {
            self.check(artifact)?;
        }

        let mut added = 0;
        for artifact in artifacts {
            if !self.artifacts.contains_key(artifact.id()) {
                self.artifacts
                    .insert(artifact.id().to_string(), artifact.clone());
                added += 1;
            }
        }
        log::debug!("merged {} new artifact(s), {} total", added, self.len());
        Ok(added)
    }

    /// Artifacts by ascending priority, insertion order within a priority
    pub fn sorted(&self) -> Vec<&Artifact> {
        let mut sorted: Vec<&Artifact> = self.artifacts.values().collect();
        sorted.sort_by_key(|artifact| artifact.priority());
        sorted
    }

    /// Stylesheet text, one rule per line. Rules without a mirrored form
    /// appear unchanged in the rtl sheet.
    pub fn to_css(&self, direction: Direction) -> String {
        let mut css = String::new();
        for artifact in self.sorted() {
            let pair = artifact.css();
            let text = match direction {
                Direction::Ltr => &pair.ltr,
                Direction::Rtl => pair.rtl.as_ref().unwrap_or(&pair.ltr),
            };
            css.push_str(text);
            css.push('\n');
        }
        css
    }

    /// Content hash of both stylesheets, stable for equal artifact sets
    pub fn fingerprint(&self) -> String {
        let mut context = md5::Context::new();
        context.consume(self.to_css(Direction::Ltr).as_bytes());
        context.consume(self.to_css(Direction::Rtl).as_bytes());
        format!("{:x}", context.compute())
    }

    pub fn clear(&mut self) {
        self.artifacts.clear();
    }
}
