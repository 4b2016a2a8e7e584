use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use serde_json::json;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use crate::config::SubmitConfig;
use crate::evaluate::Evaluation;
use crate::scoring::Dimension;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the JSON body the relay endpoint forwards to the form backend.
/// Field names are part of the external contract; the relay passes them
/// through untouched.
pub fn build_payload(evaluation: &Evaluation) -> serde_json::Value {
    let scores = &evaluation.tally.scores;

    json!({
        "scheme": evaluation.scheme,
        "scores": {
            "d": scores.get(Dimension::D),
            "i": scores.get(Dimension::I),
            "s": scores.get(Dimension::S),
            "c": scores.get(Dimension::C),
        },
        "type_order": evaluation.profile.type_order,
        "primary_label": evaluation.profile.primary_label,
        "secondary": evaluation.profile.secondary.map(|d| d.to_string()),
        "submitted_at": Utc::now().to_rfc3339(),
    })
}

fn request_timeout(config: &SubmitConfig) -> Result<Duration> {
    match &config.timeout {
        Some(s) => humantime::parse_duration(s)
            .with_context(|| format!("submit.timeout: invalid duration '{}'", s)),
        None => Ok(DEFAULT_TIMEOUT),
    }
}

/// POST the payload to the configured relay endpoint.
///
/// Transient failures are retried with exponential backoff. On final
/// failure the caller is expected to fall back to printing the payload so
/// the result is not lost.
pub async fn submit_profile(config: &SubmitConfig, payload: &serde_json::Value) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(request_timeout(config)?)
        .build()
        .context("Failed to create HTTP client")?;

    let retry_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .take(3);

    let response = Retry::spawn(retry_strategy, || async {
        client
            .post(&config.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow!("Relay endpoint timed out: {}", config.url)
                } else if e.is_connect() {
                    anyhow!("Could not reach relay endpoint {}: {}", config.url, e)
                } else {
                    anyhow!("Relay request failed: {}", e)
                }
            })
    })
    .await?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("Relay endpoint {} returned {}", config.url, status);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::{evaluate, EvalOptions};
    use crate::responses::RawResponses;
    use crate::schema::Questionnaire;

    fn sample_evaluation() -> Evaluation {
        let questionnaire = Questionnaire::from_yaml(
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
        .unwrap();
        let responses: RawResponses = serde_saphyr::from_str(
            r#"
scheme: forced-choice
picks:
  1: { most: "Decisive", least: "Patient" }
"#,
        )
        .unwrap();
        evaluate(&responses, &questionnaire, &EvalOptions::default()).unwrap()
    }

    #[test]
    fn test_payload_field_shape() {
        let payload = build_payload(&sample_evaluation());

        assert_eq!(payload["scheme"], "forced-choice");
        assert_eq!(payload["scores"]["d"], 1);
        assert_eq!(payload["scores"]["i"], 0);
        assert_eq!(payload["scores"]["s"], -1);
        assert_eq!(payload["scores"]["c"], 0);
        assert_eq!(payload["type_order"], "D>I>C>S");
        assert_eq!(payload["primary_label"], "High D");
        assert!(payload["secondary"].is_null());
        assert!(payload["submitted_at"].is_string());
    }

    #[test]
    fn test_timeout_defaults_to_30s() {
        let config = SubmitConfig {
            url: "https://example.com".to_string(),
            timeout: None,
        };
        assert_eq!(request_timeout(&config).unwrap(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_timeout_parses_humantime() {
        let config = SubmitConfig {
            url: "https://example.com".to_string(),
            timeout: Some("10s".to_string()),
        };
        assert_eq!(request_timeout(&config).unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let config = SubmitConfig {
            url: "https://example.com".to_string(),
            timeout: Some("soon".to_string()),
        };
        assert!(request_timeout(&config).is_err());
    }
}
