use std::io::{Cursor, Read};

use sqlopt::models::{AnalysisRecord, AnalysisSummary, OptimizationStep};
use sqlopt::render::NO_SUGGESTIONS_NOTICE;
use sqlopt::render::docx::build_document;

fn step(kind: &str, line: &str, existing: &str, optimized: &str) -> OptimizationStep {
    OptimizationStep {
        kind: kind.to_string(),
        line_number: line.to_string(),
        existing_logic: existing.to_string(),
        optimized_logic: optimized.to_string(),
        explanation: format!("Explains {kind}"),
    }
}

fn record_with(steps: Vec<OptimizationStep>) -> AnalysisRecord {
    AnalysisRecord {
        procedure_name: "usp_X".to_string(),
        scope: "Updates order totals.".to_string(),
        optimizations: steps,
        summary: AnalysisSummary {
            original_performance_issues: "Row by row updates".to_string(),
            optimization_impact: "Large".to_string(),
            implementation_difficulty: "Low".to_string(),
        },
    }
}

fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("docx should be a zip package");
    let mut part = archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("package should contain {name}"));
    let mut text = String::new();
    part.read_to_string(&mut text).expect("part should be UTF-8");
    text
}

#[test]
fn package_contains_word_parts() {
    let bytes = build_document(&record_with(Vec::new())).expect("document should build");
    let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).expect("zip package");
    let names = archive.file_names().collect::<Vec<_>>();

    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "word/_rels/document.xml.rels",
        "word/styles.xml",
        "word/document.xml",
    ] {
        assert!(names.contains(&part), "missing {part} in {names:?}");
    }
    assert!(read_part(&bytes, "word/styles.xml").contains("Table Grid"));
}

#[test]
fn identical_records_build_identical_bytes() {
    let record = record_with(vec![step("Replace Cursor", "10", "OPEN c;", "UPDATE t;")]);
    let first = build_document(&record).expect("first build");
    let second = build_document(&record).expect("second build");
    assert_eq!(first, second);
}

#[test]
fn empty_optimizations_write_notice_without_table() {
    let bytes = build_document(&record_with(Vec::new())).expect("document should build");
    let document = read_part(&bytes, "word/document.xml");

    assert!(document.contains("usp_X"));
    assert_eq!(document.matches(NO_SUGGESTIONS_NOTICE).count(), 2);
    assert!(!document.contains("<w:tbl>"));
}

#[test]
fn summary_table_has_header_banding_and_fixed_widths() {
    let bytes = build_document(&record_with(vec![
        step("Replace Cursor", "10", "OPEN c;", "UPDATE t;"),
        step("Add Index", "N/A", "", "CREATE INDEX ix ON t(x);"),
        step("Batch Writes", "40", "INSERT t VALUES (1);", "INSERT t SELECT * FROM s;"),
    ]))
    .expect("document should build");
    let document = read_part(&bytes, "word/document.xml");

    assert_eq!(document.matches("<w:tbl>").count(), 1);
    assert!(document.contains(r#"<w:tblStyle w:val="TableGrid"/>"#));
    assert!(document.contains("<w:tblHeader/>"));
    for width in ["1440", "720", "2880", "2160"] {
        assert!(
            document.contains(&format!(r#"<w:gridCol w:w="{width}"/>"#)),
            "missing column width {width}"
        );
    }
    assert_eq!(document.matches(r#"w:fill="D9D9D9""#).count(), 5);
    // Only the second of three data rows is banded.
    assert_eq!(document.matches(r#"w:fill="F2F2F2""#).count(), 5);
    assert!(document.contains("Type of Change"));
    assert!(document.contains("Optimization Explanation"));
}

#[test]
fn code_uses_monospace_and_steps_use_titles() {
    let bytes = build_document(&record_with(vec![step("Add Index", "N/A", "", "CREATE INDEX ix ON t(x);")]))
        .expect("document should build");
    let document = read_part(&bytes, "word/document.xml");

    assert!(document.contains(r#"w:ascii="Courier New""#));
    assert!(document.contains(r#"<w:sz w:val="20"/>"#));
    assert!(document.contains(r#"<w:sz w:val="18"/>"#));
    assert!(document.contains(r#"<w:ind w:left="360"/>"#));
    assert!(document.contains("Step 1: Add Index (Line: N/A)"));
    assert!(document.contains(&"_".repeat(50)));
}

#[test]
fn markup_characters_are_escaped() {
    let bytes = build_document(&record_with(vec![step(
        "Rewrite",
        "7",
        "IF @a < 5 AND @b > 2",
        "SELECT 'x' + \"y\" & z",
    )]))
    .expect("document should build");
    let document = read_part(&bytes, "word/document.xml");

    assert!(document.contains("@a &lt; 5"));
    assert!(document.contains("&amp; z"));
    assert!(!document.contains("@a < 5"));
}

#[test]
fn multi_line_code_keeps_line_breaks() {
    let bytes = build_document(&record_with(vec![step("Rewrite", "3", "OPEN c;\r\nFETCH c;", "UPDATE t;")]))
        .expect("document should build");
    let document = read_part(&bytes, "word/document.xml");

    assert!(document.contains(
        r#"<w:t xml:space="preserve">OPEN c;</w:t><w:br/><w:t xml:space="preserve">FETCH c;</w:t>"#
    ));
}

#[test]
fn tabs_in_code_become_word_tabs() {
    let bytes = build_document(&record_with(vec![step("Rewrite", "3", "BEGIN\n\tSELECT 1;", "UPDATE t;")]))
        .expect("document should build");
    let document = read_part(&bytes, "word/document.xml");

    assert!(document.contains(
        r#"<w:t xml:space="preserve">BEGIN</w:t><w:br/><w:tab/><w:t xml:space="preserve">SELECT 1;</w:t>"#
    ));
    assert!(!document.contains('\t'));
}
