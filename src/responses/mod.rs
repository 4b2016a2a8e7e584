use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A respondent's picks for one forced-choice group. Either field may be
/// absent while the form is still being filled in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupPick {
    #[serde(default)]
    pub most: Option<String>,
    #[serde(default)]
    pub least: Option<String>,
}

/// Raw answers as produced by the form-collection layer, keyed by group id
/// or question index. BTreeMap keeps iteration in ascending identifier
/// order, which the validator's reporting contract relies on.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "scheme", rename_all = "kebab-case")]
pub enum RawResponses {
    ForcedChoice {
        #[serde(default)]
        picks: BTreeMap<u32, GroupPick>,
    },
    Likert {
        #[serde(default)]
        answers: BTreeMap<u32, Option<u8>>,
    },
}

impl RawResponses {
    pub fn scheme_name(&self) -> &'static str {
        match self {
            RawResponses::ForcedChoice { .. } => "forced-choice",
            RawResponses::Likert { .. } => "likert",
        }
    }
}

/// Load raw responses from a YAML file.
pub fn load_responses(path: &Path) -> Result<RawResponses> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read responses at {}", path.display()))?;

    serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse responses: invalid YAML in {}", path.display()))
}
