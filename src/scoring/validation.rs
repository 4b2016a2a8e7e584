use crate::responses::RawResponses;
use crate::schema::Questionnaire;

/// Outcome of completeness checking. `missing_or_invalid` holds every
/// failing group id or question index in ascending order — the full set,
/// never just the first, so callers can highlight all of them at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub missing_or_invalid: Vec<u32>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.missing_or_invalid.is_empty()
    }
}

/// Check every item the questionnaire defines against the raw responses.
///
/// Forced-choice: a group fails when `most` is absent, `least` is absent,
/// or both name the same adjective. Likert: a question fails when it is
/// unanswered or its value is outside 1..=5.
///
/// Responses whose scheme does not match the questionnaire answer nothing,
/// so every item is reported; the aggregator raises the scheme mismatch as
/// a hard error before that report would normally be acted on.
pub fn validate_responses(
    responses: &RawResponses,
    questionnaire: &Questionnaire,
) -> ValidationReport {
    let mut missing_or_invalid = Vec::new();

    match questionnaire {
        Questionnaire::ForcedChoice { groups } => {
            // Schema order may be arbitrary; report in ascending group id.
            let mut ids: Vec<u32> = groups.iter().map(|g| g.id).collect();
            ids.sort_unstable();

            for id in ids {
                if !group_answered(responses, id) {
                    missing_or_invalid.push(id);
                }
            }
        }
        Questionnaire::Likert { blocks } => {
            let mut indexes: Vec<u32> = blocks.iter().flat_map(|b| b.start..=b.end).collect();
            indexes.sort_unstable();

            for index in indexes {
                if !question_answered(responses, index) {
                    missing_or_invalid.push(index);
                }
            }
        }
    }

    ValidationReport { missing_or_invalid }
}

fn group_answered(responses: &RawResponses, id: u32) -> bool {
    let picks = match responses {
        RawResponses::ForcedChoice { picks } => picks,
        RawResponses::Likert { .. } => return false,
    };

    match picks.get(&id) {
        Some(pick) => match (&pick.most, &pick.least) {
            // Same adjective for both is a zero-sum entry and a user error.
            (Some(most), Some(least)) => most != least,
            _ => false,
        },
        None => false,
    }
}

fn question_answered(responses: &RawResponses, index: u32) -> bool {
    let answers = match responses {
        RawResponses::Likert { answers } => answers,
        RawResponses::ForcedChoice { .. } => return false,
    };

    matches!(answers.get(&index), Some(Some(value)) if (1..=5).contains(value))
}
