use std::io::Read;
use std::path::Path;

use crate::error::AnalyzerError;

pub mod sample;

pub use sample::{SAMPLE_PROCEDURE, SAMPLE_STEM};

/// Where the SQL text of a request came from. Drives report naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    File { stem: String },
    Pasted,
    Sample,
}

/// The SQL text of one analysis request together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlSource {
    pub text: String,
    pub origin: SourceOrigin,
}

impl SqlSource {
    #[must_use]
    pub fn pasted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: SourceOrigin::Pasted,
        }
    }

    #[must_use]
    pub fn sample() -> Self {
        Self {
            text: SAMPLE_PROCEDURE.to_string(),
            origin: SourceOrigin::Sample,
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        match &self.origin {
            SourceOrigin::File { stem } => format!("file:{stem}"),
            SourceOrigin::Pasted => "pasted".to_string(),
            SourceOrigin::Sample => "sample".to_string(),
        }
    }
}

/// Reads an uploaded `.sql` file. The extension check is case-insensitive
/// and the content must decode as UTF-8; a leading byte-order mark is dropped.
pub fn read_sql_file(path: &Path) -> Result<SqlSource, AnalyzerError> {
    let has_sql_extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("sql"));
    if !has_sql_extension {
        return Err(AnalyzerError::Input(format!(
            "expected a .sql file: {}",
            path.display()
        )));
    }

    let bytes = std::fs::read(path).map_err(|error| {
        AnalyzerError::Input(format!("failed to read {}: {error}", path.display()))
    })?;
    let text = decode_utf8(bytes, &path.display().to_string())?;
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(SqlSource {
        text,
        origin: SourceOrigin::File { stem },
    })
}

/// Reads pasted SQL from a reader, normally standard input.
pub fn read_pasted<R: Read>(mut reader: R) -> Result<SqlSource, AnalyzerError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|error| AnalyzerError::Input(format!("failed to read standard input: {error}")))?;
    Ok(SqlSource::pasted(decode_utf8(bytes, "standard input")?))
}

fn decode_utf8(bytes: Vec<u8>, label: &str) -> Result<String, AnalyzerError> {
    let text = String::from_utf8(bytes).map_err(|error| {
        AnalyzerError::Input(format!(
            "{label} could not be decoded as UTF-8 ({})",
            error.utf8_error()
        ))
    })?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Rejects requests whose text is blank, before anything leaves the process.
pub fn ensure_non_empty(source: &SqlSource) -> Result<(), AnalyzerError> {
    if source.text.trim().is_empty() {
        return Err(AnalyzerError::Input(
            "SQL source is empty; provide a stored procedure to analyze".to_string(),
        ));
    }
    Ok(())
}
