use colored::*;
use serde::Serialize;

use crate::placement::{PlacementError, PlacementReport};

/// 一个缩放级别的布局结果，用于 JSON 输出
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionSummary {
    pub zoom: i32,
    pub visible: Vec<String>,
    pub hidden: Vec<String>,
    pub failures: Vec<FailureSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureSummary {
    pub element: String,
    pub error: String,
}

impl TransitionSummary {
    /// `visible` 为图层当前显示的全部元素（包括静态元素）
    pub fn new(zoom: i32, visible: Vec<String>, report: &PlacementReport<String>) -> Self {
        TransitionSummary {
            zoom,
            visible,
            hidden: report.rejected.clone(),
            failures: report
                .failures
                .iter()
                .map(|(element, error)| FailureSummary {
                    element: element.clone(),
                    error: error.to_string(),
                })
                .collect(),
        }
    }
}

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format_transition(summary: &TransitionSummary) -> String {
        let mut lines = vec![format!(
            "{} {}  ({} visible, {} hidden, {} failed)",
            "zoom".bold(),
            summary.zoom.to_string().cyan(),
            summary.visible.len(),
            summary.hidden.len(),
            summary.failures.len()
        )];

        for element in &summary.visible {
            lines.push(format!("  {} {}", "+".green(), element));
        }
        for element in &summary.hidden {
            lines.push(format!("  {} {}", "-".yellow(), element.dimmed()));
        }
        for failure in &summary.failures {
            lines.push(Self::format_failure(&failure.element, &failure.error));
        }

        lines.join("\n")
    }

    pub fn format_json(summary: &TransitionSummary) -> crate::Result<String> {
        Ok(serde_json::to_string(summary)?)
    }

    pub fn format_load_failure(element: &str, error: &PlacementError) -> String {
        Self::format_failure(element, &error.to_string())
    }

    fn format_failure(element: &str, error: &str) -> String {
        format!("  {} {} {}", "!".red(), element, format!("(error) {}", error).red())
    }

    pub fn format_dump_message(path: &str, entries: usize) -> String {
        format!("Dumped {} index entries to {}", entries.to_string().cyan(), path.green())
    }
}
