//! Interpretation of the validation service's answer.
//!
//! The service answers either `{ "error_list": { "errors": [...] } }` or a
//! bare `{ "errors": [...] }`. [`effective_result`] picks the object to
//! read and [`ResultView::interpret`] sorts it into exactly one of three
//! views: invalid, all valid, or itemized errors.

use crate::utils::html::escape_html;
use serde_json::{Map, Value};
use std::fmt::Write;

/// Prefers the wrapped `error_list` only when its `errors` is an array.
pub fn effective_result(response: &Value) -> &Value {
    match response.get("error_list") {
        Some(wrapped) if wrapped.get("errors").is_some_and(Value::is_array) => wrapped,
        _ => response,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FinalRanking,
    InGameRanking,
    EliminationCount,
    Unknown,
}

impl ErrorKind {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => ErrorKind::FinalRanking,
            Some(2) => ErrorKind::InGameRanking,
            Some(3) => ErrorKind::EliminationCount,
            _ => ErrorKind::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::FinalRanking => "final ranking error",
            ErrorKind::InGameRanking => "in-game ranking error",
            ErrorKind::EliminationCount => "team-elimination-count error",
            ErrorKind::Unknown => "unknown type",
        }
    }
}

/// One reported mismatch, numbered by its place in the list
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRow {
    /// 1-based
    pub position: usize,
    pub code: Option<i64>,
    pub kind: ErrorKind,
    pub team: String,
    pub original_data: String,
    pub correct_data: String,
}

impl ErrorRow {
    fn from_entry(position: usize, entry: &Value) -> Self {
        let code = error_code(entry.get("error_type"));
        Self {
            position,
            code,
            kind: ErrorKind::from_code(code),
            team: text_field(entry, "team"),
            original_data: text_field(entry, "original_data"),
            correct_data: text_field(entry, "correct_data"),
        }
    }

    pub fn badge_class(&self) -> String {
        format!("error-type-{}", self.code.unwrap_or(0))
    }
}

/// Codes may arrive as numbers or numeric strings.
fn error_code(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Missing and null fields read as empty text.
fn text_field(entry: &Value, key: &str) -> String {
    match entry.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// What the result panel shows. Every new submission replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultView {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// No usable error list. Carries the failure text when a request failed.
    Invalid { failure: Option<String> },
    AllValid,
    Itemized {
        rows: Vec<ErrorRow>,
        /// `{ "error_list": result }`, pretty printed
        raw_json: String,
    },
}

impl ResultView {
    pub fn interpret(result: Option<&Value>) -> Self {
        let Some(errors) = result
            .and_then(|r| r.get("errors"))
            .and_then(Value::as_array)
        else {
            return ResultView::Invalid { failure: None };
        };

        if errors.is_empty() {
            return ResultView::AllValid;
        }

        let rows = errors
            .iter()
            .enumerate()
            .map(|(idx, entry)| ErrorRow::from_entry(idx + 1, entry))
            .collect();

        let mut wrapper = Map::new();
        wrapper.insert(
            "error_list".to_string(),
            result.cloned().unwrap_or(Value::Null),
        );
        let raw_json = serde_json::to_string_pretty(&Value::Object(wrapper)).unwrap_or_default();

        ResultView::Itemized { rows, raw_json }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        ResultView::Invalid {
            failure: Some(message.into()),
        }
    }

    /// Text the copy button puts on the clipboard
    pub fn copyable_text(&self) -> Option<&str> {
        match self {
            ResultView::Itemized { raw_json, .. } => Some(raw_json),
            _ => None,
        }
    }

    /// Class for the container holding the rendered view
    pub fn container_class(&self) -> &'static str {
        match self {
            ResultView::Idle | ResultView::Invalid { .. } => "empty",
            ResultView::AllValid => "success",
            ResultView::Itemized { .. } => "",
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            ResultView::Idle => {
                r#"<div class="empty-tip">Results appear here after upload</div>"#.to_string()
            }
            ResultView::Invalid { failure: None } => {
                r#"<div class="empty-tip">No valid error list was returned</div>"#.to_string()
            }
            ResultView::Invalid {
                failure: Some(message),
            } => format!(
                r#"<div class="empty-tip">Request failed: {}</div>"#,
                escape_html(message)
            ),
            ResultView::AllValid => {
                r#"<div class="success-tip">✅ Validation passed, no errors found.</div>"#
                    .to_string()
            }
            ResultView::Itemized { rows, raw_json } => itemized_html(rows, raw_json),
        }
    }
}

fn itemized_html(rows: &[ErrorRow], raw_json: &str) -> String {
    let mut body = String::new();
    for row in rows {
        // Writing into a String cannot fail.
        let _ = write!(
            body,
            "<tr>\
             <td><span class=\"badge {}\">#{}</span></td>\
             <td>{}</td>\
             <td>{}</td>\
             <td>{}</td>\
             <td>{}</td>\
             </tr>",
            row.badge_class(),
            row.position,
            row.kind.label(),
            escape_html(&row.team),
            escape_html(&row.original_data),
            escape_html(&row.correct_data),
        );
    }

    format!(
        "<table class=\"error-table\">\
         <thead><tr><th>#</th><th>Type</th><th>Team</th><th>Original</th><th>Correct</th></tr></thead>\
         <tbody>{}</tbody>\
         </table>\
         <details style=\"margin-top:10px;\">\
         <summary>Raw response JSON</summary>\
         <pre style=\"white-space: pre-wrap;\">{}</pre>\
         </details>",
        body,
        escape_html(raw_json)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrapped_result_preferred() {
        let response = json!({ "error_list": { "errors": [] } });
        assert_eq!(effective_result(&response), &json!({ "errors": [] }));
    }

    #[test]
    fn test_wrapped_without_array_falls_back_to_body() {
        let response = json!({ "error_list": { "errors": "oops" }, "errors": [] });
        assert_eq!(effective_result(&response), &response);
    }

    #[test]
    fn test_bare_result_used_directly() {
        let response = json!({ "errors": [] });
        assert_eq!(effective_result(&response), &response);
    }

    #[test]
    fn test_empty_errors_is_all_valid() {
        let view = ResultView::interpret(Some(&json!({ "errors": [] })));
        assert_eq!(view, ResultView::AllValid);
        assert!(view.to_html().contains("no errors found"));
        assert!(!view.to_html().contains("<table"));
    }

    #[test]
    fn test_invalid_shapes() {
        assert_eq!(
            ResultView::interpret(Some(&json!({ "foo": "bar" }))),
            ResultView::Invalid { failure: None }
        );
        assert_eq!(
            ResultView::interpret(None),
            ResultView::Invalid { failure: None }
        );
        assert_eq!(
            ResultView::interpret(Some(&json!({ "errors": {} }))),
            ResultView::Invalid { failure: None }
        );
    }

    #[test]
    fn test_single_error_row() {
        let result = json!({ "errors": [
            { "error_type": 1, "team": "A", "original_data": "5", "correct_data": "3" }
        ]});
        let view = ResultView::interpret(Some(&result));
        let ResultView::Itemized { rows, .. } = &view else {
            panic!("expected itemized view, got {:?}", view);
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[0].kind.label(), "final ranking error");

        let html = view.to_html();
        assert!(html.contains("#1"));
        assert!(html.contains("final ranking error"));
        assert!(html.contains("error-type-1"));
    }

    #[test]
    fn test_rows_numbered_by_position() {
        let result = json!({ "errors": [
            { "error_type": 3, "team": "B" },
            { "error_type": 9, "team": "C" },
            { "error_type": "2", "team": "D" }
        ]});
        let ResultView::Itemized { rows, .. } = ResultView::interpret(Some(&result)) else {
            panic!("expected itemized view");
        };
        let positions: Vec<_> = rows.iter().map(|r| r.position).collect();
        let kinds: Vec<_> = rows.iter().map(|r| r.kind).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(
            kinds,
            vec![
                ErrorKind::EliminationCount,
                ErrorKind::Unknown,
                ErrorKind::InGameRanking
            ]
        );
        assert_eq!(rows[1].kind.label(), "unknown type");
    }

    #[test]
    fn test_missing_fields_render_empty() {
        let result = json!({ "errors": [ { "team": null } ] });
        let ResultView::Itemized { rows, .. } = ResultView::interpret(Some(&result)) else {
            panic!("expected itemized view");
        };
        assert_eq!(rows[0].team, "");
        assert_eq!(rows[0].original_data, "");
        assert_eq!(rows[0].badge_class(), "error-type-0");
    }

    #[test]
    fn test_non_numeric_code_uses_default_badge() {
        let result = json!({ "errors": [ { "error_type": "x" }, { "error_type": "3" } ] });
        let ResultView::Itemized { rows, .. } = ResultView::interpret(Some(&result)) else {
            panic!("expected itemized view");
        };
        assert_eq!(rows[0].badge_class(), "error-type-0");
        assert_eq!(rows[0].kind, ErrorKind::Unknown);
        assert_eq!(rows[1].badge_class(), "error-type-3");
    }

    #[test]
    fn test_text_is_escaped() {
        let result = json!({ "errors": [
            { "error_type": 2, "team": "<script>", "original_data": "", "correct_data": "" }
        ]});
        let html = ResultView::interpret(Some(&result)).to_html();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_raw_json_wraps_result() {
        let result = json!({ "errors": [ { "error_type": 1, "team": "A" } ] });
        let view = ResultView::interpret(Some(&result));
        let raw: Value = serde_json::from_str(view.copyable_text().unwrap()).unwrap();
        assert_eq!(raw, json!({ "error_list": result }));
        assert!(view.copyable_text().unwrap().contains("\n  \"error_list\""));
    }

    #[test]
    fn test_failure_message_is_escaped() {
        let view = ResultView::failed("<b>502</b>");
        assert_eq!(view.copyable_text(), None);
        assert_eq!(view.container_class(), "empty");
        assert_eq!(
            view.to_html(),
            r#"<div class="empty-tip">Request failed: &lt;b&gt;502&lt;/b&gt;</div>"#
        );
    }
}
