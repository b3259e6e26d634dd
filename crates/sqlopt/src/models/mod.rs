pub mod analysis;

pub use analysis::{
    AnalysisRecord, AnalysisSummary, OptimizationStep, PLACEHOLDER, STEP_KEYS, SUMMARY_KEYS,
    TOP_LEVEL_KEYS, display_or_placeholder, json_schema,
};
