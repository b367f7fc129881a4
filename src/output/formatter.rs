use std::io::IsTerminal;

use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde_json::Value;
use terminal_size::{terminal_size, Width};

use crate::dataset::Entity;
use crate::scoring::RankedEntity;

/// How `rank` renders its results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned, optionally colored lines for the terminal
    #[default]
    Table,
    /// Tab-separated values with a header row
    Tsv,
    /// Pretty JSON array of ranked records
    Json,
}

/// Columns tried, in order, for the display name of a centre.
const NAME_COLUMNS: &[&str] = &["Centre", "name", "Name"];

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Display name of an entity, or "(unnamed)".
pub fn display_name(entity: &Entity) -> String {
    NAME_COLUMNS
        .iter()
        .find_map(|col| entity.text(col).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "(unnamed)".to_string())
}

/// Format a composite score with two decimals.
pub fn format_composite(score: f64) -> String {
    format!("{:.2}", score)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format ranked centres as one line each: rank, composite, wins, name.
/// Rank column is right-aligned with a trailing dot ("12."),
/// composite is right-aligned 7 chars, wins right-aligned 4 chars.
pub fn format_ranked_table(rows: &[RankedEntity], use_colors: bool) -> String {
    format_ranked_table_with_width(rows, use_colors, get_terminal_width())
}

fn format_ranked_table_with_width(
    rows: &[RankedEntity],
    use_colors: bool,
    term_width: Option<usize>,
) -> String {
    if rows.is_empty() {
        return "No centres found.".to_string();
    }

    let rank_width = rows.len().to_string().len() + 1;
    let score_width = 7;
    let wins_width = 4;
    let separator = "  ";
    let fixed_width = rank_width + 1 + score_width + wins_width + separator.len() * 2;

    rows.iter()
        .map(|row| {
            let rank_str = format!("{:>width$}", format!("{}.", row.rank), width = rank_width);
            let score_str = format!(
                "{:>width$}",
                format_composite(row.composite),
                width = score_width
            );
            let wins_str = format!("{:>width$}", row.pairwise_wins, width = wins_width);

            let name = display_name(&row.entity);
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_name(&name, width - fixed_width),
                // Very narrow terminal, show truncated
                Some(_) => truncate_name(&name, 20),
                // No terminal (pipe), don't truncate
                None => name,
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str.dimmed(),
                    score_str.bold(),
                    separator,
                    wins_str.cyan(),
                    separator,
                    name
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str, score_str, separator, wins_str, separator, name
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn tsv_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.replace(['\t', '\n', '\r'], " "),
        Some(other) => other.to_string(),
    }
}

/// Format ranked centres as tab-separated values for scripting.
/// Columns: Rank, the original columns in order, Composite, PairwiseWins.
pub fn format_tsv(rows: &[RankedEntity], columns: &[String]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);

    let mut header = vec!["Rank".to_string()];
    header.extend(columns.iter().cloned());
    header.push("Composite".to_string());
    header.push("PairwiseWins".to_string());
    lines.push(header.join("\t"));

    for row in rows {
        let mut cells = vec![row.rank.to_string()];
        cells.extend(columns.iter().map(|c| tsv_cell(row.entity.get(c))));
        cells.push(row.composite.to_string());
        cells.push(row.pairwise_wins.to_string());
        lines.push(cells.join("\t"));
    }

    lines.join("\n")
}

/// Format ranked centres as a pretty JSON array.
pub fn format_json(rows: &[RankedEntity]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}
