use crate::controller::FilterOutcome;
use crate::replay::{Firing, Trigger};
use colored::Colorize;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;
use std::fmt::Write as _;

/// One visible row as printed
#[derive(Debug, Clone, Serialize)]
pub struct EventRow {
    pub when: String,
    pub name: String,
    pub place: String,
    pub url: String,
}

/// Everything a `filter` run reports
#[derive(Debug, Clone, Serialize)]
pub struct FilterReport {
    pub query: String,
    /// Canonical form of the parsed query
    pub rules: String,
    pub link: String,
    pub total: usize,
    pub outcome: FilterOutcome,
    pub events: Vec<EventRow>,
}

pub fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

pub fn format_filter_text(report: &FilterReport, empty_state_label: &str) -> String {
    let mut out = String::new();

    if report.outcome.empty_state_visible {
        let _ = writeln!(out, "{}", empty_state_label.bold().bright_white());
    } else {
        let _ = writeln!(
            out,
            "{} {}",
            "Query:".bold(),
            report.rules.bright_cyan()
        );
    }
    let _ = writeln!(
        out,
        "Showing {} of {} event{}",
        report.outcome.visible.to_string().green().bold(),
        report.total,
        if report.total == 1 { "" } else { "s" }
    );

    if report.events.is_empty() {
        let _ = writeln!(out, "No events match the query.");
        return out;
    }

    let mut table = create_styled_table(&["When", "Name", "Place"]);
    for row in &report.events {
        table.add_row(vec![
            Cell::new(&row.when),
            Cell::new(truncate_string(&row.name, 60)),
            Cell::new(truncate_string(&row.place, 40)),
        ]);
    }
    let _ = writeln!(out, "{table}");

    if !report.outcome.empty_state_visible {
        let _ = writeln!(out, "Share: {}", report.link.underline());
    }
    out
}

pub fn format_filter_json(report: &FilterReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_replay_text(firings: &[Firing], total: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "REPLAY ran the filter {} time{}",
        firings.len(),
        if firings.len() == 1 { "" } else { "s" }
    );

    if firings.is_empty() {
        return out;
    }
    out.push('\n');

    let mut table = create_styled_table(&["At (ms)", "Trigger", "Query", "Visible", "Empty state"]);
    for firing in firings {
        let trigger = match firing.trigger {
            Trigger::Debounce => "debounce",
            Trigger::Clear => "clear",
            Trigger::Exclude => "exclude",
        };
        table.add_row(vec![
            Cell::new(firing.at_ms),
            Cell::new(trigger),
            Cell::new(truncate_string(firing.query.trim(), 40)),
            Cell::new(format!("{}/{}", firing.outcome.visible, total)),
            Cell::new(if firing.outcome.empty_state_visible { "shown" } else { "hidden" }),
        ]);
    }
    let _ = writeln!(out, "{table}");
    out
}

pub fn format_replay_json(firings: &[Firing], total: usize) -> String {
    serde_json::to_string_pretty(&serde_json::json!({
        "replay": {
            "total": total,
            "firings": firings,
        }
    }))
    .unwrap_or_else(|_| "{\"replay\":{\"error\":\"failed to serialize replay output\"}}".into())
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
