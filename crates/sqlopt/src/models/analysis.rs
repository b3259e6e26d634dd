use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Text shown wherever the model left a field out.
pub const PLACEHOLDER: &str = "N/A";

pub const TOP_LEVEL_KEYS: &[&str] = &["procedure_name", "scope", "optimizations", "summary"];

pub const STEP_KEYS: &[&str] = &[
    "type",
    "line_number",
    "existing_logic",
    "optimized_logic",
    "explanation",
];

pub const SUMMARY_KEYS: &[&str] = &[
    "original_performance_issues",
    "optimization_impact",
    "implementation_difficulty",
];

/// One completed optimization analysis of a stored procedure.
///
/// Every field is presentation text. Defaults are applied here, at
/// deserialization time, so renderers never deal with absent values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisRecord {
    #[serde(default = "placeholder")]
    pub procedure_name: String,

    #[serde(default = "placeholder")]
    pub scope: String,

    #[serde(default)]
    pub optimizations: Vec<OptimizationStep>,

    #[serde(default)]
    pub summary: AnalysisSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OptimizationStep {
    #[serde(rename = "type", default)]
    #[schemars(rename = "type")]
    pub kind: String,

    #[serde(default = "placeholder")]
    pub line_number: String,

    #[serde(default)]
    pub existing_logic: String,

    #[serde(default)]
    pub optimized_logic: String,

    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisSummary {
    #[serde(default = "placeholder")]
    pub original_performance_issues: String,

    #[serde(default = "placeholder")]
    pub optimization_impact: String,

    #[serde(default = "placeholder")]
    pub implementation_difficulty: String,
}

impl Default for AnalysisSummary {
    fn default() -> Self {
        Self {
            original_performance_issues: placeholder(),
            optimization_impact: placeholder(),
            implementation_difficulty: placeholder(),
        }
    }
}

impl AnalysisRecord {
    #[must_use]
    pub fn has_optimizations(&self) -> bool {
        !self.optimizations.is_empty()
    }
}

fn placeholder() -> String {
    PLACEHOLDER.to_string()
}

/// Returns `text`, or the placeholder when it is blank.
#[must_use]
pub fn display_or_placeholder(text: &str) -> &str {
    if text.trim().is_empty() {
        PLACEHOLDER
    } else {
        text
    }
}

#[must_use]
pub fn json_schema() -> Value {
    let schema = schemars::schema_for!(AnalysisRecord);
    match serde_json::to_value(schema) {
        Ok(value) => value,
        Err(error) => {
            panic!("failed to serialize generated analysis schema: {error}");
        }
    }
}
