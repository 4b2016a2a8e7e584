use std::fmt;

use super::types::{HighCounts, ScoreVector, Tally};
use crate::responses::RawResponses;
use crate::schema::Questionnaire;

/// A response referenced something the questionnaire does not define.
/// This is a caller or schema bug, never routine user error, so scoring
/// stops instead of silently dropping the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    UnknownLabel { group: u32, label: String },
    UnknownGroup { id: u32 },
    UnknownQuestion { index: u32 },
    SchemeMismatch { expected: &'static str, found: &'static str },
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::UnknownLabel { group, label } => {
                write!(f, "group {}: label '{}' not in questionnaire", group, label)
            }
            ScoreError::UnknownGroup { id } => {
                write!(f, "response references unknown group {}", id)
            }
            ScoreError::UnknownQuestion { index } => {
                write!(f, "response references unknown question {}", index)
            }
            ScoreError::SchemeMismatch { expected, found } => {
                write!(
                    f,
                    "responses use scheme '{}' but questionnaire is '{}'",
                    found, expected
                )
            }
        }
    }
}

impl std::error::Error for ScoreError {}

/// Reduce raw answers to per-dimension totals plus the high-answer counts
/// the Likert tie-break reads.
///
/// Callers are expected to validate first; an absent answer contributes 0
/// rather than failing, so partially filled forms still tally cleanly.
/// Integer arithmetic throughout — same input, same output, always.
pub fn aggregate(
    responses: &RawResponses,
    questionnaire: &Questionnaire,
) -> Result<Tally, ScoreError> {
    match (questionnaire, responses) {
        (Questionnaire::ForcedChoice { groups }, RawResponses::ForcedChoice { picks }) => {
            let mut scores = ScoreVector::zero();

            for (id, pick) in picks {
                let group = groups
                    .iter()
                    .find(|g| g.id == *id)
                    .ok_or(ScoreError::UnknownGroup { id: *id })?;

                if let Some(most) = &pick.most {
                    let dimension =
                        group
                            .dimension_for(most)
                            .ok_or_else(|| ScoreError::UnknownLabel {
                                group: *id,
                                label: most.clone(),
                            })?;
                    scores.add(dimension, 1);
                }

                if let Some(least) = &pick.least {
                    let dimension =
                        group
                            .dimension_for(least)
                            .ok_or_else(|| ScoreError::UnknownLabel {
                                group: *id,
                                label: least.clone(),
                            })?;
                    scores.add(dimension, -1);
                }
            }

            Ok(Tally {
                scores,
                high_counts: HighCounts::zero(),
            })
        }
        (Questionnaire::Likert { .. }, RawResponses::Likert { answers }) => {
            let mut scores = ScoreVector::zero();
            let mut high_counts = HighCounts::zero();

            for (index, answer) in answers {
                let block = questionnaire
                    .block_for(*index)
                    .ok_or(ScoreError::UnknownQuestion { index: *index })?;

                if let Some(value) = answer {
                    scores.add(block.dimension, i32::from(*value));
                    if *value >= 4 {
                        high_counts.bump(block.dimension);
                    }
                }
            }

            Ok(Tally { scores, high_counts })
        }
        (questionnaire, responses) => Err(ScoreError::SchemeMismatch {
            expected: questionnaire.scheme_name(),
            found: responses.scheme_name(),
        }),
    }
}
