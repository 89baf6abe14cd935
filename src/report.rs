use std::fmt::Write as _;

use serde_json::{Value, json};

use crate::analysis::AnalysisReport;
use crate::export::{Cell, Table};
use crate::platforms::PlatformRegistry;

pub const EMPTY_NOTICE: &str = "No keyword was analyzed successfully; nothing to show.";

const YES: &str = "✅";
const NO: &str = "❌";

fn display(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.clone(),
        Cell::Flag(true) => YES.to_string(),
        Cell::Flag(false) => NO.to_string(),
        Cell::Rank(Some(r)) => r.to_string(),
        Cell::Rank(None) => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

/// Fixed-width terminal table. Emoji are counted as one column each.
pub fn render_table(table: &Table) -> String {
    let body: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(display).map(|s| truncate(&s, 40)).collect())
        .collect();

    let widths: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(col, h)| {
            body.iter()
                .map(|r| r[col].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let line = |cells: &[String], out: &mut String| {
        let parts: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect();
        let _ = writeln!(out, "{}", parts.join(" | ").trim_end());
    };

    line(&table.headers, &mut out);
    let rule_len = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);
    let _ = writeln!(out, "{}", "-".repeat(rule_len));
    for row in &body {
        line(row, &mut out);
    }
    out
}

/// Per-platform counts plus processed/failed totals.
pub fn render_summary(report: &AnalysisReport, registry: &PlatformRegistry) -> String {
    let mut out = String::new();
    for label in registry.labels() {
        let anywhere = report.rows.iter().filter(|r| r.anywhere(label)).count();
        let top10 = report.rows.iter().filter(|r| r.top10(label)).count();
        let _ = writeln!(
            out,
            "{label:<10} anywhere: {anywhere:>3}   top 10: {top10:>3}"
        );
    }
    let _ = writeln!(
        out,
        "\n{} keywords analyzed, {} failed",
        report.rows.len(),
        report.failures.len()
    );
    out
}

/// Table, failures and summary, or the empty-state notice.
pub fn render(report: &AnalysisReport, registry: &PlatformRegistry, diagnostics: bool) -> String {
    let mut out = String::new();
    if report.is_empty() {
        let _ = writeln!(out, "{EMPTY_NOTICE}");
    } else {
        out.push_str(&render_table(&Table::build(&report.rows, registry, diagnostics)));
        out.push('\n');
    }
    if !report.failures.is_empty() {
        let _ = writeln!(out, "--- Failed keywords ---");
        for f in &report.failures {
            let _ = writeln!(out, "  {}: {}", f.keyword, f.reason);
        }
        out.push('\n');
    }
    out.push_str(&render_summary(report, registry));
    out
}

/// Machine-readable run output: rows, failures and, when requested, the raw
/// response of the first keyword, all in one JSON document.
pub fn json_output(report: &AnalysisReport) -> Value {
    let mut out = json!({
        "rows": report.rows,
        "failures": report.failures,
    });
    if let Some((keyword, payload)) = &report.debug_payload {
        out["debug_payload"] = json!({
            "keyword": keyword,
            "response": payload,
        });
    }
    out
}
