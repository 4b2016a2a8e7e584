use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::evaluate::Evaluation;

const MAX_BAR_WIDTH: usize = 24;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Render an evaluated profile as a per-dimension table followed by the
/// type order and label lines. Verbose mode adds the high-answer counts
/// that drive the Likert tie-break.
pub fn format_profile(evaluation: &Evaluation, use_colors: bool, verbose: bool) -> String {
    let mut lines = Vec::new();

    let max_magnitude = evaluation
        .tally
        .scores
        .entries()
        .iter()
        .map(|(_, score)| score.unsigned_abs() as usize)
        .max()
        .unwrap_or(0);

    // Leave room for the name column and the score on narrow terminals
    let bar_width = match get_terminal_width() {
        Some(w) if w < 60 => MAX_BAR_WIDTH.min(w.saturating_sub(32)),
        _ => MAX_BAR_WIDTH,
    };

    for ranked in &evaluation.ranked {
        let dim = ranked.dimension;
        let bar = score_bar(ranked.score, max_magnitude, bar_width);

        let mut line = if use_colors {
            format!(
                "  {}  {:<18} {:<width$} {:>4}",
                dim.letter().bold(),
                dim.name(),
                bar,
                ranked.score,
                width = bar_width
            )
        } else {
            format!(
                "  {}  {:<18} {:<width$} {:>4}",
                dim.letter(),
                dim.name(),
                bar,
                ranked.score,
                width = bar_width
            )
        };

        if verbose && evaluation.scheme == "likert" {
            line.push_str(&format!("  ({} high answers)", ranked.high_count));
        }

        lines.push(line);
    }

    lines.push(String::new());

    if use_colors {
        lines.push(format!("Type order: {}", evaluation.profile.type_order.cyan()));
        lines.push(format!("Primary: {}", evaluation.profile.primary_label.bold()));
    } else {
        lines.push(format!("Type order: {}", evaluation.profile.type_order));
        lines.push(format!("Primary: {}", evaluation.profile.primary_label));
    }

    if let Some(secondary) = evaluation.profile.secondary {
        lines.push(format!("Secondary: {}", secondary));
    }

    lines.join("\n")
}

fn score_bar(score: i32, max_magnitude: usize, bar_width: usize) -> String {
    if max_magnitude == 0 || bar_width == 0 {
        return String::new();
    }
    let magnitude = score.unsigned_abs() as usize;
    let filled = (magnitude * bar_width).div_ceil(max_magnitude);
    if score < 0 {
        "░".repeat(filled)
    } else {
        "█".repeat(filled)
    }
}

/// Render the validator's failing-identifier list, one item per line so
/// the caller can see the complete set at a glance.
pub fn format_validation_failures(failing: &[u32], scheme: &str) -> String {
    let noun = if scheme == "likert" { "question" } else { "group" };

    let mut lines = vec![format!(
        "{} incomplete or invalid {}{}:",
        failing.len(),
        noun,
        if failing.len() == 1 { "" } else { "s" }
    )];
    for id in failing {
        lines.push(format!("  - {} {}", noun, id));
    }
    lines.join("\n")
}
