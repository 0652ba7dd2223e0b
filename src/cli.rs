//! Windowless submission: ingest, upload, print, optionally save a report.

use crate::app::{Event, UploadState};
use crate::upload::{read_images, HeadlessPreviews, HttpTransport, ResultView, Transport};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub async fn run_submit(
    server: &str,
    game_id: &str,
    stage: &str,
    files: &[PathBuf],
    report: Option<&Path>,
) -> Result<ResultView> {
    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::new(server).context("Failed to create HTTP client")?);

    let mut state = UploadState::new(HeadlessPreviews::new());
    let (images, notices) = read_images(files);
    for notice in notices {
        state.notify(notice);
    }
    state.dispatch(Event::Ingest(images));
    info!("Queued {} of {} files", state.queue().len(), files.len());

    state.submit(transport, game_id, stage).await;

    for notice in state.notices_mut().drain() {
        println!("• {}", notice);
    }
    println!("{}", summary(state.result()));

    if let Some(path) = report {
        std::fs::write(path, report_document(state.result()))
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Wrote report to {}", path.display());
    }

    match state.result() {
        ResultView::Idle => bail!("nothing was submitted"),
        ResultView::Invalid {
            failure: Some(message),
        } => bail!("{}", message),
        view => Ok(view.clone()),
    }
}

/// Plain-text rendering of a result for the terminal
pub fn summary(view: &ResultView) -> String {
    match view {
        ResultView::Idle => "Nothing submitted".to_string(),
        ResultView::Invalid { failure: None } => "No valid error list was returned".to_string(),
        ResultView::Invalid {
            failure: Some(message),
        } => format!("Request failed: {}", message),
        ResultView::AllValid => "Validation passed, no errors found.".to_string(),
        ResultView::Itemized { rows, .. } => {
            let mut out = format!("{} errors found:", rows.len());
            for row in rows {
                out.push_str(&format!(
                    "\n#{:<3} {:<30} {:<16} {} -> {}",
                    row.position,
                    row.kind.label(),
                    row.team,
                    row.original_data,
                    row.correct_data
                ));
            }
            out
        }
    }
}

/// Standalone HTML page around the rendered result
pub fn report_document(view: &ResultView) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Validation result</title></head>\n<body>\n<div class=\"result {}\">{}</div>\n</body>\n</html>\n",
        view.container_class(),
        view.to_html()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_lists_rows() {
        let view = ResultView::interpret(Some(&json!({ "errors": [
            { "error_type": 3, "team": "Wolves", "original_data": "4", "correct_data": "5" }
        ]})));
        let text = summary(&view);
        assert!(text.starts_with("1 errors found:"));
        assert!(text.contains("team-elimination-count error"));
        assert!(text.contains("4 -> 5"));
    }

    #[test]
    fn report_wraps_fragment() {
        let doc = report_document(&ResultView::AllValid);
        assert!(doc.contains("<div class=\"result success\">"));
        assert!(doc.contains("no errors found"));
    }
}
