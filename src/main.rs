use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use disc_profiler::evaluate::{evaluate, EvalError, EvalOptions, Evaluation};
use disc_profiler::scoring::{validate_responses, LabelConvention};

const EXIT_SUCCESS: i32 = 0;
const EXIT_NETWORK: i32 = 2;
const EXIT_INPUT: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a responses file and print the profile (default)
    Score {
        /// Path to the responses YAML file
        responses: PathBuf,

        /// Print the webhook JSON payload instead of the table
        #[arg(long)]
        json: bool,
    },
    /// Validate a responses file without scoring it
    Check {
        /// Path to the responses YAML file
        responses: PathBuf,
    },
    /// Score a responses file and POST the profile to the relay endpoint
    Submit {
        /// Path to the responses YAML file
        responses: PathBuf,
    },
}

#[derive(Parser, Debug)]
#[command(name = "disc-profiler")]
#[command(about = "DISC questionnaire scoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/disc-profiler/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the questionnaire YAML file (overrides config)
    #[arg(short, long, global = true)]
    questionnaire: Option<String>,

    /// Separator for the type-order string (overrides config)
    #[arg(long, global = true)]
    separator: Option<String>,

    /// Labeling convention: "top-ties" or "primary-secondary" (overrides
    /// the scheme's default)
    #[arg(long, global = true)]
    convention: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();

    // Load config
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let config = match disc_profiler::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Resolve and load the questionnaire; structural validation happens at
    // load, so schema problems surface before any responses are read.
    let questionnaire_path = match cli.questionnaire.clone().or(config.questionnaire.clone()) {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("No questionnaire configured.");
            eprintln!("Pass --questionnaire <path> or add to ~/.config/disc-profiler/config.yaml:");
            eprintln!("  questionnaire: /path/to/questionnaire.yaml");
            std::process::exit(EXIT_CONFIG);
        }
    };

    let questionnaire = match disc_profiler::schema::load_questionnaire(&questionnaire_path) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("Questionnaire error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if cli.verbose {
        eprintln!(
            "Loaded {} questionnaire from {}",
            questionnaire.scheme_name(),
            questionnaire_path.display()
        );
    }

    let convention = match cli.convention.as_ref().or(config.convention.as_ref()) {
        Some(s) => match LabelConvention::parse(s) {
            Ok(c) => Some(c),
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
        None => None,
    };

    let options = EvalOptions {
        convention,
        separator: cli
            .separator
            .clone()
            .or(config.separator.clone())
            .unwrap_or_else(|| ">".to_string()),
    };

    let use_colors = disc_profiler::output::should_use_colors();

    match &cli.command {
        Commands::Score { responses, json } => {
            let responses = load_responses_or_exit(responses);
            let evaluation = evaluate_or_exit(&responses, &questionnaire, &options);

            if *json {
                let payload = disc_profiler::submit::build_payload(&evaluation);
                println!("{}", render_payload(&payload));
            } else {
                println!(
                    "{}",
                    disc_profiler::output::format_profile(&evaluation, use_colors, cli.verbose)
                );
            }
        }
        Commands::Check { responses } => {
            let responses = load_responses_or_exit(responses);

            if responses.scheme_name() != questionnaire.scheme_name() {
                eprintln!(
                    "Responses use scheme '{}' but questionnaire is '{}'",
                    responses.scheme_name(),
                    questionnaire.scheme_name()
                );
                std::process::exit(EXIT_CONFIG);
            }

            let report = validate_responses(&responses, &questionnaire);
            if report.is_valid() {
                println!("Responses are complete.");
            } else {
                println!(
                    "{}",
                    disc_profiler::output::format_validation_failures(
                        &report.missing_or_invalid,
                        questionnaire.scheme_name()
                    )
                );
                std::process::exit(EXIT_INPUT);
            }
        }
        Commands::Submit { responses } => {
            let responses = load_responses_or_exit(responses);
            let evaluation = evaluate_or_exit(&responses, &questionnaire, &options);

            let submit_config = match &config.submit {
                Some(s) => s,
                None => {
                    eprintln!("No submit endpoint configured.");
                    eprintln!("Add to ~/.config/disc-profiler/config.yaml:");
                    eprintln!("  submit:");
                    eprintln!("    url: https://forms.example.com/relay/disc");
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let payload = disc_profiler::submit::build_payload(&evaluation);

            if cli.verbose {
                eprintln!("Submitting profile to {}", submit_config.url);
            }

            match disc_profiler::submit::submit_profile(submit_config, &payload).await {
                Ok(()) => {
                    println!("Profile submitted: {}", evaluation.profile.primary_label);
                }
                Err(e) => {
                    eprintln!("Submission failed: {:#}", e);
                    // Fallback: surface the payload so the result is not lost
                    println!("{}", render_payload(&payload));
                    std::process::exit(EXIT_NETWORK);
                }
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

fn render_payload(payload: &serde_json::Value) -> String {
    serde_json::to_string_pretty(payload).expect("JSON value always serializes")
}

fn load_responses_or_exit(path: &Path) -> disc_profiler::responses::RawResponses {
    match disc_profiler::responses::load_responses(path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Responses error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

fn evaluate_or_exit(
    responses: &disc_profiler::responses::RawResponses,
    questionnaire: &disc_profiler::schema::Questionnaire,
    options: &EvalOptions,
) -> Evaluation {
    match evaluate(responses, questionnaire, options) {
        Ok(evaluation) => evaluation,
        Err(EvalError::Incomplete(failing)) => {
            eprintln!(
                "{}",
                disc_profiler::output::format_validation_failures(
                    &failing,
                    questionnaire.scheme_name()
                )
            );
            std::process::exit(EXIT_INPUT);
        }
        Err(EvalError::Score(e)) => {
            eprintln!("Scoring error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}
