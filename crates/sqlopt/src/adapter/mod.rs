//! Prompt/response adapter: turns SQL text into a validated
//! [`AnalysisRecord`] with one completion call.

use tracing::info;

use crate::error::AnalyzerError;
use crate::input::{SqlSource, ensure_non_empty};
use crate::models::AnalysisRecord;

pub mod client;
pub mod prompt;
pub mod response;

pub use client::{AzureOpenAiClient, CompletionClient, CompletionRequest};
pub use response::{ParsedReply, ShapeWarning, parse_reply};

/// Result of one successful analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub source: SqlSource,
    pub record: AnalysisRecord,
    pub warnings: Vec<ShapeWarning>,
}

#[must_use]
pub fn build_request(sql: &str, model: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        system_instruction: prompt::SYSTEM_INSTRUCTION.to_string(),
        user_instruction: prompt::build_user_instruction(sql),
        temperature: prompt::TEMPERATURE,
        json_response: true,
    }
}

/// Runs one analysis. Blank input fails before `client` is touched.
pub fn analyze<C: CompletionClient + ?Sized>(
    client: &C,
    model: &str,
    source: SqlSource,
) -> Result<AnalysisOutcome, AnalyzerError> {
    ensure_non_empty(&source)?;

    let request = build_request(&source.text, model);
    let raw = client.complete(&request)?;
    let ParsedReply { record, warnings } = parse_reply(&raw)?;
    info!(
        procedure = %record.procedure_name,
        steps = record.optimizations.len(),
        warnings = warnings.len(),
        "analysis reply validated"
    );

    Ok(AnalysisOutcome {
        source,
        record,
        warnings,
    })
}
