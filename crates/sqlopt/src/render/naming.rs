use std::sync::OnceLock;

use regex::Regex;

use crate::input::{SAMPLE_STEM, SourceOrigin};
use crate::models::{AnalysisRecord, PLACEHOLDER};

pub const REPORT_SUFFIX: &str = "_analysis";
pub const FALLBACK_BASE_NAME: &str = "sql_analysis";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFileNames {
    pub docx: String,
    pub markdown: String,
}

/// Picks the report base name: the uploaded file's stem, otherwise the
/// procedure name the model extracted, otherwise a fixed fallback.
#[must_use]
pub fn report_base_name(origin: &SourceOrigin, record: &AnalysisRecord) -> String {
    let candidate = match origin {
        SourceOrigin::File { stem } if !stem.trim().is_empty() => stem.as_str(),
        SourceOrigin::Sample => SAMPLE_STEM,
        _ if record.procedure_name.trim() != PLACEHOLDER => record.procedure_name.as_str(),
        _ => "",
    };
    sanitize_base_name(candidate)
}

#[must_use]
pub fn report_file_names(base_name: &str) -> ReportFileNames {
    ReportFileNames {
        docx: format!("{base_name}{REPORT_SUFFIX}.docx"),
        markdown: format!("{base_name}{REPORT_SUFFIX}.md"),
    }
}

#[must_use]
pub fn sanitize_base_name(name: &str) -> String {
    let replaced = unsafe_name_regex().replace_all(name.trim(), "_");
    let trimmed = replaced.trim_matches(|ch| ch == '_' || ch == '.');
    if trimmed.is_empty() {
        FALLBACK_BASE_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

fn unsafe_name_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"[^\p{L}\p{N}._\-]+").expect("file name regex should compile")
    })
}

#[cfg(test)]
mod tests {
    use super::{report_base_name, report_file_names, sanitize_base_name};
    use crate::input::SourceOrigin;
    use crate::models::{AnalysisRecord, AnalysisSummary};

    fn record_named(name: &str) -> AnalysisRecord {
        AnalysisRecord {
            procedure_name: name.to_string(),
            scope: "scope".to_string(),
            optimizations: Vec::new(),
            summary: AnalysisSummary::default(),
        }
    }

    #[test]
    fn uploaded_file_stem_wins_over_procedure_name() {
        let origin = SourceOrigin::File {
            stem: "nightly_load".to_string(),
        };
        assert_eq!(
            report_base_name(&origin, &record_named("usp_Other")),
            "nightly_load"
        );
    }

    #[test]
    fn pasted_text_uses_procedure_name_with_spaces_replaced() {
        assert_eq!(
            report_base_name(&SourceOrigin::Pasted, &record_named("dbo.usp Get Orders")),
            "dbo.usp_Get_Orders"
        );
    }

    #[test]
    fn placeholder_procedure_name_falls_back() {
        assert_eq!(
            report_base_name(&SourceOrigin::Pasted, &record_named("N/A")),
            "sql_analysis"
        );
        assert_eq!(sanitize_base_name("  / "), "sql_analysis");
    }

    #[test]
    fn file_names_carry_analysis_suffix() {
        let names = report_file_names("usp_X");
        assert_eq!(names.docx, "usp_X_analysis.docx");
        assert_eq!(names.markdown, "usp_X_analysis.md");
    }
}
