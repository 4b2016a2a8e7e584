use anyhow::{bail, Result};

use super::types::{Profile, RankedDimension, ScoreVector};

/// How the primary-type label is derived from the ranking. The two
/// questionnaire schemes historically use different conventions, so both
/// are kept as explicit modes rather than merged into one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelConvention {
    /// Forced-choice convention: dimensions tied for the top raw score
    /// collapse into one label ("High D", "DI", "DIS", or "Balanced").
    TopTies,
    /// Likert convention: the label is the single top-ranked letter and
    /// the runner-up is reported separately as the secondary type.
    PrimarySecondary,
}

impl LabelConvention {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "top-ties" => Ok(LabelConvention::TopTies),
            "primary-secondary" => Ok(LabelConvention::PrimarySecondary),
            _ => bail!(
                "Unknown label convention '{}' (expected 'top-ties' or 'primary-secondary')",
                s
            ),
        }
    }
}

/// Derive the human-readable label and machine-readable order string from
/// a ranking. `separator` joins the four letters of the order string; both
/// ">" and "" are in real-world use.
pub fn classify(
    ranked: &[RankedDimension],
    convention: LabelConvention,
    separator: &str,
) -> Profile {
    let type_order = ranked
        .iter()
        .map(|r| r.dimension.to_string())
        .collect::<Vec<_>>()
        .join(separator);

    let mut scores = ScoreVector::zero();
    for r in ranked {
        scores.add(r.dimension, r.score);
    }

    match convention {
        LabelConvention::TopTies => {
            // Ties here are semantic: raw score only, ignoring the
            // high-count and canonical tiers the ranker already applied.
            let top_score = ranked[0].score;
            let tied: Vec<&RankedDimension> =
                ranked.iter().filter(|r| r.score == top_score).collect();

            let primary_label = match tied.len() {
                1 => format!("High {}", tied[0].dimension),
                4 => "Balanced".to_string(),
                _ => tied.iter().map(|r| r.dimension.to_string()).collect(),
            };

            Profile {
                primary_label,
                type_order,
                secondary: None,
                scores,
            }
        }
        LabelConvention::PrimarySecondary => Profile {
            primary_label: ranked[0].dimension.to_string(),
            type_order,
            secondary: Some(ranked[1].dimension),
            scores,
        },
    }
}
