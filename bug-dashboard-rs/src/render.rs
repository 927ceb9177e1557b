//! Plain-text rendering of the dashboard

use std::fmt::Write;

use bug_sdk::{BugRecord, HealthStatus, Priority};

use crate::loader::SubmissionOutcome;
use crate::view_model::{BugListView, BugStats, SortDirection, SortField, ViewParameters};

/// Longest description shown in the table before truncation
pub const DESCRIPTION_LIMIT: usize = 100;

/// Capitalized tier label; `Unknown` when missing
pub fn priority_tag(priority: Option<&str>) -> String {
    match priority {
        Some(p) if !p.is_empty() => {
            let mut chars = p.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        _ => "Unknown".to_string(),
    }
}

/// Cut `text` to `limit` characters, marking the cut with `...`
pub fn truncate_text(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

pub fn sort_indicator(params: &ViewParameters, field: SortField) -> &'static str {
    match (params.sort_field, params.sort_direction) {
        (Some(active), SortDirection::Ascending) if active == field => "↑",
        (Some(active), SortDirection::Descending) if active == field => "↓",
        _ => "↕",
    }
}

pub fn render_stats(stats: &BugStats) -> String {
    let mut cards = vec![format!("Total Bugs: {}", stats.total)];
    for tier in Priority::ALL {
        cards.push(format!("{}: {}", priority_tag(Some(tier.as_str())), stats.count(tier)));
    }
    cards.join("  |  ")
}

/// Table columns: sortable headings, then the unsortable description
fn columns(params: &ViewParameters) -> Vec<String> {
    let mut headings: Vec<String> = SortField::ALL
        .iter()
        .map(|field| format!("{} {}", field.label(), sort_indicator(params, *field)))
        .collect();
    headings.push("Description".to_string());
    headings
}

fn row_cells(record: &BugRecord) -> Vec<String> {
    vec![
        record.title.clone(),
        record.module.clone(),
        record.frequency.clone(),
        record.user_type.clone(),
        priority_tag(record.priority.as_deref()),
        truncate_text(&record.description, DESCRIPTION_LIMIT),
    ]
}

pub fn render_table(view: &BugListView<'_>, params: &ViewParameters) -> String {
    if let Some(message) = view.empty_message() {
        return message.to_string();
    }

    let header = columns(params);
    let rows: Vec<Vec<String>> = view.rows.iter().map(|r| row_cells(r)).collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(&mut out, &rule, &widths);
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out.truncate(out.trim_end().len());
    out
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}

/// Stat cards, table and the `Showing X of Y` footer
pub fn render_dashboard(view: &BugListView<'_>, params: &ViewParameters) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", render_stats(&view.stats));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", render_table(view, params));
    if view.shown() > 0 {
        let _ = writeln!(out);
        let _ = write!(out, "Showing {} of {} bug reports", view.shown(), view.total());
    }
    out.truncate(out.trim_end().len());
    out
}

/// Every field of one record
pub fn render_bug_detail(record: &BugRecord) -> String {
    let mut out = String::new();
    if let Some(id) = &record.id {
        let _ = writeln!(out, "ID:          {}", id);
    }
    let _ = writeln!(out, "Title:       {}", record.title);
    let _ = writeln!(out, "Priority:    {}", priority_tag(record.priority.as_deref()));
    if let Some(percent) = record.confidence_percent() {
        let _ = writeln!(out, "Confidence:  {}%", percent);
    }
    let _ = writeln!(out, "Module:      {}", record.module);
    let _ = writeln!(out, "Frequency:   {}", record.frequency);
    let _ = writeln!(out, "User Type:   {}", record.user_type);
    let _ = writeln!(out, "Description: {}", record.description);
    if let Some(logs) = record.logs.as_deref().filter(|l| !l.is_empty()) {
        let _ = writeln!(out, "Logs:\n{}", logs);
    }
    out.truncate(out.trim_end().len());
    out
}

/// The payload's `status`, or the whole payload when it has none
pub fn render_health(status: &HealthStatus) -> String {
    format!("Service status: {}", status)
}

/// Result panel shown after a successful submission
pub fn render_prediction(outcome: &SubmissionOutcome) -> String {
    let mut out = String::from("Bug report submitted successfully!\n");
    let _ = write!(out, "Priority:    {}", priority_tag(Some(&outcome.prediction.priority)));
    if let Some(percent) = outcome.prediction.confidence_percent() {
        let _ = write!(out, "\nConfidence:  {}%", percent);
    }
    if let Some(alert) = outcome.alert() {
        let _ = write!(out, "\n\n{}", alert);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bug_sdk::{BugId, Prediction};

    use crate::view_model::build_view;

    fn record(title: &str, priority: Option<&str>) -> BugRecord {
        BugRecord {
            id: Some(BugId::Number(7)),
            title: title.to_string(),
            description: "Short".to_string(),
            module: "API".to_string(),
            frequency: "Once".to_string(),
            user_type: "Tester".to_string(),
            priority: priority.map(str::to_string),
            ..BugRecord::default()
        }
    }

    #[test]
    fn test_priority_tag() {
        assert_eq!(priority_tag(Some("critical")), "Critical");
        assert_eq!(priority_tag(Some("HIGH")), "HIGH");
        assert_eq!(priority_tag(Some("")), "Unknown");
        assert_eq!(priority_tag(None), "Unknown");
    }

    #[test]
    fn test_truncate_text() {
        let long = "x".repeat(120);
        let cut = truncate_text(&long, DESCRIPTION_LIMIT);
        assert_eq!(cut.len(), 103);
        assert!(cut.ends_with("..."));

        let exact = "y".repeat(100);
        assert_eq!(truncate_text(&exact, DESCRIPTION_LIMIT), exact);

        assert_eq!(truncate_text("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_sort_indicator() {
        let mut params = ViewParameters::new();
        assert_eq!(sort_indicator(&params, SortField::Title), "↕");

        params.toggle_sort(SortField::Title);
        assert_eq!(sort_indicator(&params, SortField::Title), "↑");
        assert_eq!(sort_indicator(&params, SortField::Priority), "↕");

        params.toggle_sort(SortField::Title);
        assert_eq!(sort_indicator(&params, SortField::Title), "↓");
    }

    #[test]
    fn test_render_stats() {
        let records = vec![record("a", Some("critical")), record("b", Some("low")), record("c", None)];
        let stats = crate::view_model::compute_stats(&records);
        assert_eq!(
            render_stats(&stats),
            "Total Bugs: 3  |  Critical: 1  |  High: 0  |  Medium: 0  |  Low: 1"
        );
    }

    #[test]
    fn test_render_table_rows_and_headings() {
        let records = vec![record("Crash on save", Some("high")), record("Odd label", None)];
        let params = ViewParameters::new();
        let table = render_table(&build_view(&records, &params), &params);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Title ↕"));
        assert!(lines[0].ends_with("Description"));
        assert!(lines[2].contains("Crash on save"));
        assert!(lines[2].contains("High"));
        assert!(lines[3].contains("Unknown"));
    }

    #[test]
    fn test_render_table_empty_states() {
        let none: Vec<BugRecord> = Vec::new();
        let params = ViewParameters::new();
        assert_eq!(
            render_table(&build_view(&none, &params), &params),
            crate::view_model::NO_BUGS_MESSAGE
        );

        let records = vec![record("Crash on save", Some("high"))];
        let params = ViewParameters::new().with_search("nothing");
        assert_eq!(
            render_table(&build_view(&records, &params), &params),
            crate::view_model::NO_MATCHES_MESSAGE
        );
    }

    #[test]
    fn test_render_dashboard_footer() {
        let records = vec![record("Crash on save", Some("high")), record("Odd label", None)];
        let params = ViewParameters::new().with_search("crash");
        let out = render_dashboard(&build_view(&records, &params), &params);
        assert!(out.starts_with("Total Bugs: 2"));
        assert!(out.ends_with("Showing 1 of 2 bug reports"));
    }

    #[test]
    fn test_render_bug_detail() {
        let mut bug = record("Crash on save", Some("medium"));
        bug.confidence = Some(0.5);
        bug.logs = Some("panic at save.rs:10".to_string());

        let out = render_bug_detail(&bug);
        assert!(out.starts_with("ID:          7"));
        assert!(out.contains("Priority:    Medium"));
        assert!(out.contains("Confidence:  50%"));
        assert!(out.ends_with("panic at save.rs:10"));
    }

    #[test]
    fn test_render_prediction_with_alert() {
        let outcome = SubmissionOutcome {
            record: record("Crash on save", Some("critical")),
            prediction: Prediction {
                priority: "critical".to_string(),
                confidence: Some(0.91),
            },
        };
        let out = render_prediction(&outcome);
        assert!(out.contains("Priority:    Critical"));
        assert!(out.contains("Confidence:  91%"));
        assert!(out.ends_with(crate::loader::CRITICAL_ALERT));
    }

    #[test]
    fn test_render_health_without_status_field() {
        let bare = HealthStatus(serde_json::json!({ "model_loaded": true }));
        assert_eq!(render_health(&bare), "Service status: {\"model_loaded\":true}");

        let named = HealthStatus(serde_json::json!({ "status": "healthy", "model_loaded": true }));
        assert_eq!(render_health(&named), "Service status: healthy");
    }
}
