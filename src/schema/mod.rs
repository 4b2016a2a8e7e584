use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::scoring::Dimension;

/// One adjective offered by a forced-choice group, bound to a dimension.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Adjective {
    pub label: String,
    pub dimension: Dimension,
}

/// A forced-choice question group: four adjectives, one per dimension.
/// The respondent picks one "most like me" and one "least like me".
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdjectiveGroup {
    pub id: u32,
    pub adjectives: Vec<Adjective>,

    // Exact-key lookup built once at load; never populated from YAML.
    #[serde(skip)]
    label_index: HashMap<String, Dimension>,
}

impl AdjectiveGroup {
    /// Dimension bound to a label, by exact match. `None` means the label
    /// is not part of this group's schema.
    pub fn dimension_for(&self, label: &str) -> Option<Dimension> {
        self.label_index.get(label).copied()
    }

    fn build_index(&mut self) {
        self.label_index = self
            .adjectives
            .iter()
            .map(|a| (a.label.clone(), a.dimension))
            .collect();
    }
}

/// A contiguous run of Likert question indices scored into one dimension.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LikertBlock {
    pub dimension: Dimension,
    /// First question index of the block (inclusive).
    pub start: u32,
    /// Last question index of the block (inclusive).
    pub end: u32,
}

impl LikertBlock {
    pub fn contains(&self, index: u32) -> bool {
        index >= self.start && index <= self.end
    }
}

/// The question bank, in one of the two supported scoring schemes.
/// Immutable configuration once loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "scheme", rename_all = "kebab-case")]
pub enum Questionnaire {
    ForcedChoice { groups: Vec<AdjectiveGroup> },
    Likert { blocks: Vec<LikertBlock> },
}

impl Questionnaire {
    pub fn scheme_name(&self) -> &'static str {
        match self {
            Questionnaire::ForcedChoice { .. } => "forced-choice",
            Questionnaire::Likert { .. } => "likert",
        }
    }

    /// The block covering a question index, if any.
    pub fn block_for(&self, index: u32) -> Option<&LikertBlock> {
        match self {
            Questionnaire::Likert { blocks } => blocks.iter().find(|b| b.contains(index)),
            Questionnaire::ForcedChoice { .. } => None,
        }
    }

    /// Parse a questionnaire from YAML, validate it, and build the
    /// label lookups. The only way to obtain a usable `Questionnaire`.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut questionnaire: Questionnaire = serde_saphyr::from_str(content)
            .context("Failed to parse questionnaire: invalid YAML")?;

        if let Err(errors) = validate_questionnaire(&questionnaire) {
            anyhow::bail!("Invalid questionnaire:\n  - {}", errors.join("\n  - "));
        }

        questionnaire.build_indexes();
        Ok(questionnaire)
    }

    fn build_indexes(&mut self) {
        if let Questionnaire::ForcedChoice { groups } = self {
            for group in groups {
                group.build_index();
            }
        }
    }
}

/// Load a questionnaire from a YAML file and prepare its label lookups.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the YAML cannot be parsed,
/// or the questionnaire is structurally invalid.
pub fn load_questionnaire(path: &Path) -> Result<Questionnaire> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read questionnaire at {}", path.display()))?;

    Questionnaire::from_yaml(&content)
        .with_context(|| format!("Invalid questionnaire at {}", path.display()))
}

/// Validate questionnaire structure at load time.
/// Returns all validation errors at once (not just the first).
pub fn validate_questionnaire(questionnaire: &Questionnaire) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    match questionnaire {
        Questionnaire::ForcedChoice { groups } => {
            if groups.is_empty() {
                errors.push("forced-choice questionnaire has no groups".to_string());
            }

            let mut seen_ids = HashSet::new();
            for group in groups {
                if !seen_ids.insert(group.id) {
                    errors.push(format!("group {}: duplicate group id", group.id));
                }

                if group.adjectives.len() != 4 {
                    errors.push(format!(
                        "group {}: expected 4 adjectives, found {}",
                        group.id,
                        group.adjectives.len()
                    ));
                }

                let mut seen_dims = HashSet::new();
                let mut seen_labels = HashSet::new();
                for adjective in &group.adjectives {
                    if !seen_dims.insert(adjective.dimension) {
                        errors.push(format!(
                            "group {}: dimension {} bound more than once",
                            group.id, adjective.dimension
                        ));
                    }
                    if !seen_labels.insert(adjective.label.as_str()) {
                        errors.push(format!(
                            "group {}: duplicate label '{}'",
                            group.id, adjective.label
                        ));
                    }
                }
            }
        }
        Questionnaire::Likert { blocks } => {
            if blocks.is_empty() {
                errors.push("likert questionnaire has no blocks".to_string());
            }

            let mut covered_dims = HashSet::new();
            let mut seen_indexes: HashMap<u32, Dimension> = HashMap::new();
            for block in blocks {
                covered_dims.insert(block.dimension);

                if block.start > block.end {
                    errors.push(format!(
                        "block {}: empty range {}..{}",
                        block.dimension, block.start, block.end
                    ));
                    continue;
                }
                for index in block.start..=block.end {
                    if let Some(other) = seen_indexes.insert(index, block.dimension) {
                        errors.push(format!(
                            "block {}: question {} already belongs to {}",
                            block.dimension, index, other
                        ));
                    }
                }
            }

            if !blocks.is_empty() {
                for dim in Dimension::ALL {
                    if !covered_dims.contains(&dim) {
                        errors.push(format!("dimension {} has no likert block", dim));
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
