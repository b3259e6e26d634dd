use std::fmt::{Display, Formatter};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::AnalyzerError;
use crate::models::{AnalysisRecord, STEP_KEYS, SUMMARY_KEYS};

/// A non-fatal problem with the shape of a model reply. The affected field
/// has already been replaced by its default when this is reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeWarning {
    pub path: String,
    pub detail: String,
}

impl Display for ShapeWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.detail)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub record: AnalysisRecord,
    pub warnings: Vec<ShapeWarning>,
}

/// Parses a raw model reply into an [`AnalysisRecord`].
///
/// Invalid JSON, or JSON that is not an object, is a parse error carrying the
/// raw text. Anything else degrades: missing or mistyped fields are warned
/// about and fall back to the record's defaults.
pub fn parse_reply(raw: &str) -> Result<ParsedReply, AnalyzerError> {
    let value = serde_json::from_str::<Value>(raw).map_err(|error| AnalyzerError::Parse {
        detail: error.to_string(),
        raw: raw.to_string(),
    })?;
    let Value::Object(mut object) = value else {
        return Err(AnalyzerError::Parse {
            detail: format!("reply is a JSON {}, expected an object", json_type_name(&value)),
            raw: raw.to_string(),
        });
    };

    let mut warnings = Vec::new();
    normalize_text_field(&mut object, "procedure_name", "procedure_name", &mut warnings);
    normalize_text_field(&mut object, "scope", "scope", &mut warnings);
    normalize_optimizations(&mut object, &mut warnings);
    normalize_summary(&mut object, &mut warnings);

    let record = serde_json::from_value::<AnalysisRecord>(Value::Object(object)).map_err(
        |error| AnalyzerError::Parse {
            detail: format!("reply does not match the analysis shape: {error}"),
            raw: raw.to_string(),
        },
    )?;

    Ok(ParsedReply { record, warnings })
}

fn normalize_optimizations(object: &mut Map<String, Value>, warnings: &mut Vec<ShapeWarning>) {
    let steps = match object.remove("optimizations") {
        None => {
            push_warning(warnings, "optimizations", "missing; using an empty list");
            return;
        }
        Some(Value::Array(steps)) => steps,
        Some(other) => {
            push_warning(
                warnings,
                "optimizations",
                &format!("expected a list, found {}; using an empty list", json_type_name(&other)),
            );
            return;
        }
    };

    let mut kept = Vec::with_capacity(steps.len());
    for (index, step) in steps.into_iter().enumerate() {
        let step_path = format!("optimizations[{index}]");
        match step {
            Value::Object(mut fields) => {
                for key in STEP_KEYS {
                    normalize_text_field(
                        &mut fields,
                        key,
                        &format!("{step_path}.{key}"),
                        warnings,
                    );
                }
                kept.push(Value::Object(fields));
            }
            other => push_warning(
                warnings,
                &step_path,
                &format!("expected an object, found {}; step skipped", json_type_name(&other)),
            ),
        }
    }
    object.insert("optimizations".to_string(), Value::Array(kept));
}

fn normalize_summary(object: &mut Map<String, Value>, warnings: &mut Vec<ShapeWarning>) {
    match object.get_mut("summary") {
        None => push_warning(warnings, "summary", "missing; using placeholder text"),
        Some(Value::Object(fields)) => {
            for key in SUMMARY_KEYS {
                normalize_text_field(fields, key, &format!("summary.{key}"), warnings);
            }
        }
        Some(other) => {
            let found = json_type_name(other);
            object.remove("summary");
            push_warning(
                warnings,
                "summary",
                &format!("expected an object, found {found}; using placeholder text"),
            );
        }
    }
}

/// Coerces `key` to a string value in place. Absent and null values are
/// left absent so the field default applies.
fn normalize_text_field(
    fields: &mut Map<String, Value>,
    key: &str,
    path: &str,
    warnings: &mut Vec<ShapeWarning>,
) {
    let Some(value) = fields.get(key) else {
        push_warning(warnings, path, "missing; using default");
        return;
    };

    let replacement = match value {
        Value::String(_) => return,
        Value::Null => None,
        Value::Number(number) if key == "line_number" => {
            Some(Value::String(number.to_string()))
        }
        Value::Number(number) => {
            push_warning(warnings, path, "expected text, found a number");
            Some(Value::String(number.to_string()))
        }
        Value::Bool(flag) => {
            push_warning(warnings, path, "expected text, found a boolean");
            Some(Value::String(flag.to_string()))
        }
        Value::Array(_) | Value::Object(_) => {
            push_warning(
                warnings,
                path,
                &format!("expected text, found {}", json_type_name(value)),
            );
            Some(Value::String(value.to_string()))
        }
    };

    match replacement {
        Some(text) => {
            fields.insert(key.to_string(), text);
        }
        None => {
            fields.remove(key);
            push_warning(warnings, path, "null; using default");
        }
    }
}

fn push_warning(warnings: &mut Vec<ShapeWarning>, path: &str, detail: &str) {
    debug!(path, detail, "reply shape degraded");
    warnings.push(ShapeWarning {
        path: path.to_string(),
        detail: detail.to_string(),
    });
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
