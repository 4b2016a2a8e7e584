use std::fmt;

use crate::responses::RawResponses;
use crate::schema::Questionnaire;
use crate::scoring::{
    aggregate, classify, rank, validate_responses, LabelConvention, Profile, RankedDimension,
    ScoreError, Tally,
};

/// Knobs the caller may override; everything else is derived from the
/// questionnaire itself.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Labeling convention. `None` uses the scheme's own default
    /// (forced-choice: top-ties, Likert: primary/secondary).
    pub convention: Option<LabelConvention>,
    /// Separator for the type-order string.
    pub separator: String,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            convention: None,
            separator: ">".to_string(),
        }
    }
}

/// Everything one evaluation produces. Recomputed in full from the
/// complete response set every time; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub profile: Profile,
    pub tally: Tally,
    pub ranked: Vec<RankedDimension>,
    pub scheme: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Missing or illegal answers; the complete failing identifier set,
    /// ascending. Routine during interactive use.
    Incomplete(Vec<u32>),
    /// The responses referenced something outside the schema, or the two
    /// files disagree on scheme.
    Score(ScoreError),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Incomplete(ids) => {
                let rendered: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                write!(f, "incomplete input, failing items: {}", rendered.join(", "))
            }
            EvalError::Score(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EvalError {}

impl From<ScoreError> for EvalError {
    fn from(e: ScoreError) -> Self {
        EvalError::Score(e)
    }
}

fn default_convention(questionnaire: &Questionnaire) -> LabelConvention {
    match questionnaire {
        Questionnaire::ForcedChoice { .. } => LabelConvention::TopTies,
        Questionnaire::Likert { .. } => LabelConvention::PrimarySecondary,
    }
}

/// Run the full pipeline: validate, aggregate, rank, classify.
///
/// This is the one entry point main and the submission path both call.
/// Returns either a complete `Evaluation` or a structured error — never
/// a partial result.
pub fn evaluate(
    responses: &RawResponses,
    questionnaire: &Questionnaire,
    options: &EvalOptions,
) -> Result<Evaluation, EvalError> {
    // Scheme mismatch is a caller bug; surface it before the validator
    // reads the mismatch as "everything missing".
    if responses.scheme_name() != questionnaire.scheme_name() {
        return Err(ScoreError::SchemeMismatch {
            expected: questionnaire.scheme_name(),
            found: responses.scheme_name(),
        }
        .into());
    }

    let report = validate_responses(responses, questionnaire);
    if !report.is_valid() {
        return Err(EvalError::Incomplete(report.missing_or_invalid));
    }

    let tally = aggregate(responses, questionnaire)?;
    let ranked = rank(&tally.scores, &tally.high_counts);

    let convention = options
        .convention
        .unwrap_or_else(|| default_convention(questionnaire));
    let profile = classify(&ranked, convention, &options.separator);

    Ok(Evaluation {
        profile,
        tally,
        ranked,
        scheme: questionnaire.scheme_name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Dimension;

    fn forced_questionnaire() -> Questionnaire {
        Questionnaire::from_yaml(
            r#"
scheme: forced-choice
groups:
  - id: 1
    adjectives:
      - { label: "Decisive", dimension: D }
      - { label: "Sociable", dimension: I }
      - { label: "Patient", dimension: S }
      - { label: "Precise", dimension: C }
"#,
        )
        .unwrap()
    }

    fn likert_questionnaire() -> Questionnaire {
        Questionnaire::from_yaml(
            r#"
scheme: likert
blocks:
  - { dimension: D, start: 1, end: 6 }
  - { dimension: I, start: 7, end: 12 }
  - { dimension: S, start: 13, end: 18 }
  - { dimension: C, start: 19, end: 24 }
"#,
        )
        .unwrap()
    }

    fn responses(yaml: &str) -> RawResponses {
        serde_saphyr::from_str(yaml).unwrap()
    }

    fn all_fives() -> RawResponses {
        let entries: Vec<String> = (1..=24).map(|i| format!("  {}: 5", i)).collect();
        responses(&format!("scheme: likert\nanswers:\n{}\n", entries.join("\n")))
    }

    #[test]
    fn test_forced_choice_scenario_high_d() {
        let responses = responses(
            r#"
scheme: forced-choice
picks:
  1: { most: "Decisive", least: "Patient" }
"#,
        );
        let evaluation =
            evaluate(&responses, &forced_questionnaire(), &EvalOptions::default()).unwrap();

        assert_eq!(evaluation.profile.primary_label, "High D");
        assert_eq!(evaluation.tally.scores.get(Dimension::D), 1);
        assert_eq!(evaluation.tally.scores.get(Dimension::S), -1);
        assert_eq!(evaluation.scheme, "forced-choice");
    }

    #[test]
    fn test_likert_all_fives_resolves_canonically() {
        let evaluation =
            evaluate(&all_fives(), &likert_questionnaire(), &EvalOptions::default()).unwrap();

        for dim in Dimension::ALL {
            assert_eq!(evaluation.tally.scores.get(dim), 30);
        }
        assert_eq!(evaluation.profile.type_order, "D>I>S>C");
        assert_eq!(evaluation.profile.primary_label, "D");
        assert_eq!(evaluation.profile.secondary, Some(Dimension::I));
    }

    #[test]
    fn test_incomplete_input_is_structured_error() {
        let responses = responses("scheme: forced-choice\npicks: {}\n");
        let err =
            evaluate(&responses, &forced_questionnaire(), &EvalOptions::default()).unwrap_err();
        assert_eq!(err, EvalError::Incomplete(vec![1]));
    }

    #[test]
    fn test_scheme_mismatch_is_loud_not_incomplete() {
        let responses = responses("scheme: likert\nanswers: { 1: 5 }\n");
        let err =
            evaluate(&responses, &forced_questionnaire(), &EvalOptions::default()).unwrap_err();
        assert_eq!(
            err,
            EvalError::Score(ScoreError::SchemeMismatch {
                expected: "forced-choice",
                found: "likert"
            })
        );
    }

    #[test]
    fn test_convention_override() {
        let evaluation = evaluate(
            &all_fives(),
            &likert_questionnaire(),
            &EvalOptions {
                convention: Some(LabelConvention::TopTies),
                separator: ">".to_string(),
            },
        )
        .unwrap();
        assert_eq!(evaluation.profile.primary_label, "Balanced");
    }

    #[test]
    fn test_separator_option_flows_through() {
        let evaluation = evaluate(
            &all_fives(),
            &likert_questionnaire(),
            &EvalOptions {
                convention: None,
                separator: String::new(),
            },
        )
        .unwrap();
        assert_eq!(evaluation.profile.type_order, "DISC");
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let responses = all_fives();
        let questionnaire = likert_questionnaire();
        let options = EvalOptions::default();

        let first = evaluate(&responses, &questionnaire, &options).unwrap();
        let second = evaluate(&responses, &questionnaire, &options).unwrap();

        assert_eq!(first.profile, second.profile);
        assert_eq!(first.tally, second.tally);
        assert_eq!(first.ranked, second.ranked);
    }

    #[test]
    fn test_likert_range_invariant_on_complete_input() {
        let evaluation =
            evaluate(&all_fives(), &likert_questionnaire(), &EvalOptions::default()).unwrap();
        for (_, score) in evaluation.tally.scores.entries() {
            // block size 6: totals live in [6, 30]
            assert!((6..=30).contains(&score));
        }
    }

    #[test]
    fn test_type_order_is_permutation() {
        let evaluation =
            evaluate(&all_fives(), &likert_questionnaire(), &EvalOptions::default()).unwrap();
        let mut letters: Vec<char> = evaluation
            .profile
            .type_order
            .chars()
            .filter(|c| *c != '>')
            .collect();
        letters.sort_unstable();
        assert_eq!(letters, vec!['C', 'D', 'I', 'S']);
    }
}
