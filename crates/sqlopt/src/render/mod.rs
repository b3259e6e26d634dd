//! Report renderer. Every presentation is a pure projection of one
//! [`AnalysisRecord`]; the section titles below are shared so the Word and
//! Markdown documents stay textually equivalent.

use crate::error::AnalyzerError;
use crate::models::AnalysisRecord;

pub mod docx;
pub mod markdown;
pub mod naming;
pub mod screen;

pub use naming::{ReportFileNames, report_base_name, report_file_names};
pub use screen::{ScreenView, TextOptions};

pub const REPORT_TITLE: &str = "SQL Stored Procedure Analysis Report";
pub const PROCEDURE_HEADING: &str = "Procedure Name:";
pub const SCOPE_HEADING: &str = "Scope:";
pub const ANALYSIS_SUMMARY_HEADING: &str = "Analysis Summary:";
pub const STEPS_HEADING: &str = "Optimization Steps:";
pub const SUMMARY_TABLE_HEADING: &str = "Summary Table:";
pub const EXISTING_LOGIC_LABEL: &str = "Existing Logic:";
pub const OPTIMIZED_LOGIC_LABEL: &str = "Optimized Logic:";
pub const EXPLANATION_LABEL: &str = "Explanation:";
pub const NO_SUGGESTIONS_NOTICE: &str = "No optimization suggestions were generated.";

pub const ISSUES_LABEL: &str = "Identified Issues:";
pub const IMPACT_LABEL: &str = "Expected Impact:";
pub const DIFFICULTY_LABEL: &str = "Implementation Difficulty:";

pub const TABLE_HEADERS: [&str; 5] = [
    "Type of Change",
    "Line Number",
    "Original Code Snippet",
    "Optimized Code Snippet",
    "Optimization Explanation",
];

/// `Step N: <type> (Line: <line>)`, with `N` counted from one.
#[must_use]
pub fn step_title(index: usize, step: &crate::models::OptimizationStep) -> String {
    format!(
        "Step {}: {} (Line: {})",
        index + 1,
        crate::models::display_or_placeholder(&step.kind),
        crate::models::display_or_placeholder(&step.line_number)
    )
}

/// The summary bullets in presentation order.
#[must_use]
pub fn summary_items(record: &AnalysisRecord) -> [(&'static str, &str); 3] {
    [
        (ISSUES_LABEL, record.summary.original_performance_issues.as_str()),
        (IMPACT_LABEL, record.summary.optimization_impact.as_str()),
        (DIFFICULTY_LABEL, record.summary.implementation_difficulty.as_str()),
    ]
}

/// All three presentations of one record. A failed Word document leaves
/// the other two intact.
#[derive(Debug)]
pub struct RenderedReport {
    pub screen: ScreenView,
    pub markdown: String,
    pub docx: Result<Vec<u8>, AnalyzerError>,
}

#[must_use]
pub fn render_report(record: &AnalysisRecord) -> RenderedReport {
    RenderedReport {
        screen: screen::build_screen(record),
        markdown: markdown::render_markdown(record),
        docx: docx::build_document(record),
    }
}

/// Normalizes line endings and drops characters that cannot appear in
/// document text.
#[must_use]
pub(crate) fn clean_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter(|ch| matches!(ch, '\n' | '\t') || !ch.is_control())
        .collect()
}
