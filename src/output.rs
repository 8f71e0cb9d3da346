use crate::filter::{FieldList, QueryFilter, record::value_text};
use crate::records::JsonRecord;
use colored::Colorize;
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use serde_json::json;
use std::fmt::Write;
use std::path::PathBuf;

const MAX_CELL_WIDTH: usize = 60;

/// Where the records came from, echoed in JSON output
#[derive(Debug, Clone, Copy)]
pub struct SearchSource<'a> {
    pub query: &'a str,
    pub files: &'a [PathBuf],
    pub default_fields: &'a FieldList,
}

pub fn format_matches_text(matches: &[&JsonRecord], columns: &FieldList) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", matched_label(matches.len()).bold());

    if matches.is_empty() {
        let _ = writeln!(out, "No matching records found.");
        return out;
    }
    out.push('\n');

    let mut table = create_styled_table(columns);
    for record in matches {
        table.add_row(
            columns
                .iter()
                .map(|column| {
                    let text = record.get(column).and_then(value_text).unwrap_or_default();
                    Cell::new(truncate_string(&text.replace('\n', "\\n"), MAX_CELL_WIDTH))
                })
                .collect::<Vec<_>>(),
        );
    }
    let _ = writeln!(out, "{table}");

    out
}

pub fn format_matches_json(source: &SearchSource<'_>, matches: &[&JsonRecord]) -> String {
    serde_json::to_string_pretty(&json!({
        "search": {
            "query": source.query,
            "default_fields": source.default_fields,
            "files": file_names(source.files),
            "matches": matches.len(),
            "records": matches,
        }
    }))
    .unwrap_or_else(|_| "{\"search\":{\"error\":\"failed to serialize search output\"}}".into())
}

pub fn format_count_text(count: usize) -> String {
    format!("{count}\n")
}

pub fn format_count_json(source: &SearchSource<'_>, count: usize) -> String {
    serde_json::to_string_pretty(&json!({
        "search": {
            "query": source.query,
            "default_fields": source.default_fields,
            "files": file_names(source.files),
            "matches": count,
        }
    }))
    .unwrap_or_else(|_| {
        "{\"search\":{\"error\":\"failed to serialize search count output\"}}".into()
    })
}

pub fn format_explain_text(filter: &QueryFilter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "QUERY".bold());
    let _ = writeln!(out, "{}", filter.search_string());
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} ({})",
        "COMPILED".bold(),
        if filter.options().case_sensitive {
            "case-sensitive"
        } else {
            "case-insensitive"
        }
    );
    let _ = writeln!(out, "{}", filter.description());

    if !filter.warnings().is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "WARNINGS".bold());
        for warning in filter.warnings() {
            let _ = writeln!(out, "- {warning}");
        }
    }

    out
}

pub fn format_explain_json(filter: &QueryFilter) -> String {
    serde_json::to_string_pretty(&json!({
        "explain": {
            "query": filter.search_string(),
            "default_fields": filter.default_fields(),
            "case_sensitive": filter.options().case_sensitive,
            "expr": filter.expr(),
            "description": filter.description(),
            "warnings": filter
                .warnings()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
        }
    }))
    .unwrap_or_else(|_| "{\"explain\":{\"error\":\"failed to serialize query\"}}".into())
}

/// Print compile warnings to stderr
pub fn print_filter_warnings(filter: &QueryFilter) {
    for warning in filter.warnings() {
        eprintln!("{} {}", "Warning:".yellow().bold(), warning);
    }
}

pub fn create_styled_table(columns: &FieldList) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(columns.iter().map(|c| Cell::new(c).fg(comfy_table::Color::Cyan)));
    table
}

pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

fn matched_label(count: usize) -> String {
    format!(
        "SEARCH matched {} record{}",
        count,
        if count == 1 { "" } else { "s" }
    )
}

fn file_names(files: &[PathBuf]) -> Vec<String> {
    files.iter().map(|f| f.display().to_string()).collect()
}
