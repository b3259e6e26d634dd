use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use sqlopt::adapter::{ParsedReply, ShapeWarning};
use sqlopt::cli::commands::report::{ReportArgs, ScreenFormat, present};
use sqlopt::models::{AnalysisRecord, AnalysisSummary, OptimizationStep};
use sqlopt::render::render_report;
use sqlopt::{AnalyzerError, ErrorKind};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}-{nanos}"))
}

fn reply() -> ParsedReply {
    ParsedReply {
        record: AnalysisRecord {
            procedure_name: "usp_X".to_string(),
            scope: "Updates totals.".to_string(),
            optimizations: vec![OptimizationStep {
                kind: "Replace Cursor".to_string(),
                line_number: "12".to_string(),
                existing_logic: "OPEN c;".to_string(),
                optimized_logic: "UPDATE t;".to_string(),
                explanation: "Set based".to_string(),
            }],
            summary: AnalysisSummary {
                original_performance_issues: "Cursor".to_string(),
                optimization_impact: "Large".to_string(),
                implementation_difficulty: "Low".to_string(),
            },
        },
        warnings: vec![ShapeWarning {
            path: "summary.optimization_impact".to_string(),
            detail: "missing; using default".to_string(),
        }],
    }
}

#[test]
fn word_failure_keeps_screen_and_markdown() {
    let out_dir = unique_temp_dir("sqlopt-report-docx-failure");
    let reply = reply();
    let mut rendered = render_report(&reply.record);
    rendered.docx = Err(AnalyzerError::Document("table could not be written".to_string()));
    let mut screen = Vec::new();

    let err = present(
        &mut screen,
        "analyze",
        &reply,
        rendered,
        "usp_X",
        &ReportArgs::default(),
        &out_dir,
    )
    .expect_err("document failure must surface");

    let kind = err.downcast_ref::<AnalyzerError>().map(AnalyzerError::kind);
    assert_eq!(kind, Some(ErrorKind::Document));
    let screen = String::from_utf8(screen).expect("screen output should be UTF-8");
    assert!(screen.contains("Analysis Complete!"));
    assert!(screen.contains("Step 1: Replace Cursor (Line: 12)"));
    let markdown = std::fs::read_to_string(out_dir.join("usp_X_analysis.md"))
        .expect("markdown should be written before the document fails");
    assert!(markdown.contains("`usp_X`"));
    assert!(!out_dir.join("usp_X_analysis.docx").exists());
}

#[test]
fn writes_both_documents_and_reports_paths() {
    let out_dir = unique_temp_dir("sqlopt-report-written");
    let reply = reply();
    let rendered = render_report(&reply.record);
    let mut screen = Vec::new();

    let written = present(
        &mut screen,
        "render",
        &reply,
        rendered,
        "usp_X",
        &ReportArgs::default(),
        &out_dir,
    )
    .expect("reports should be written");

    assert_eq!(written.markdown, Some(out_dir.join("usp_X_analysis.md")));
    assert_eq!(written.docx, Some(out_dir.join("usp_X_analysis.docx")));
    assert!(out_dir.join("usp_X_analysis.docx").exists());
}

#[test]
fn json_format_carries_record_and_warnings() {
    let out_dir = unique_temp_dir("sqlopt-report-json");
    let reply = reply();
    let rendered = render_report(&reply.record);
    let args = ReportArgs {
        format: ScreenFormat::Json,
        no_docx: true,
        no_markdown: true,
        ..ReportArgs::default()
    };
    let mut screen = Vec::new();

    let written = present(&mut screen, "render", &reply, rendered, "usp_X", &args, &out_dir)
        .expect("json output should be written");

    assert_eq!(written.markdown, None);
    assert_eq!(written.docx, None);
    let value: serde_json::Value = serde_json::from_slice(&screen).expect("screen should be JSON");
    assert_eq!(value["record"]["procedure_name"], "usp_X");
    assert_eq!(value["record"]["optimizations"][0]["type"], "Replace Cursor");
    assert_eq!(value["warnings"][0]["path"], "summary.optimization_impact");
    assert!(!out_dir.join("usp_X_analysis.md").exists());
}
