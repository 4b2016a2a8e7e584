use serde::Deserialize;

/// Application configuration.
///
/// Everything here can also be supplied (or overridden) on the command
/// line; the file just saves typing.
///
/// Example YAML:
/// ```yaml
/// questionnaire: /home/me/disc/questionnaires/forced-choice.yaml
/// separator: ">"
/// convention: top-ties
/// submit:
///   url: https://forms.example.com/relay/disc
///   timeout: 30s
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Default questionnaire file to score against
    #[serde(default)]
    pub questionnaire: Option<String>,

    /// Separator for the type-order string (default ">"; "" is also valid)
    #[serde(default)]
    pub separator: Option<String>,

    /// Labeling convention override: "top-ties" or "primary-secondary".
    /// Unset means each scheme uses its own default.
    #[serde(default)]
    pub convention: Option<String>,

    /// Webhook relay settings for `disc-profiler submit`
    #[serde(default)]
    pub submit: Option<SubmitConfig>,
}

/// Webhook relay endpoint configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SubmitConfig {
    /// Relay endpoint that forwards the profile to the form backend
    pub url: String,

    /// Request timeout as a humantime string (default: "30s")
    #[serde(default)]
    pub timeout: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parses() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config_parses() {
        let yaml = r#"
questionnaire: questionnaires/likert.yaml
separator: ""
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(
            config.questionnaire.as_deref(),
            Some("questionnaires/likert.yaml")
        );
        assert_eq!(config.separator.as_deref(), Some(""));
        assert!(config.convention.is_none());
        assert!(config.submit.is_none());
    }

    #[test]
    fn test_full_config_parses() {
        let yaml = r#"
questionnaire: questionnaires/forced-choice.yaml
separator: ">"
convention: top-ties
submit:
  url: https://forms.example.com/relay/disc
  timeout: 10s
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let submit = config.submit.unwrap();
        assert_eq!(submit.url, "https://forms.example.com/relay/disc");
        assert_eq!(submit.timeout.as_deref(), Some("10s"));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("scoring: {}\n");
        assert!(result.is_err());
    }
}
