pub const SYSTEM_INSTRUCTION: &str = "You are an expert SQL database optimizer. Your response MUST be a single, valid JSON object matching the requested schema, with no surrounding text or markdown.";

/// Sampling temperature for every analysis request; low to keep replies stable.
pub const TEMPERATURE: f32 = 0.2;

pub const MAX_OPPORTUNITIES: usize = 5;

const RESPONSE_SHAPE: &str = r#"{
  "procedure_name": "string",
  "scope": "string",
  "optimizations": [
    {
      "type": "string",
      "line_number": "string",
      "existing_logic": "string (full SQL code snippet)",
      "optimized_logic": "string (full SQL code snippet)",
      "explanation": "string"
    }
  ],
  "summary": {
    "original_performance_issues": "string",
    "optimization_impact": "string",
    "implementation_difficulty": "string"
  }
}"#;

const FOCUS_AREAS: &[&str] = &[
    "Replacing cursors with set-based operations (e.g., CTEs, derived tables).",
    "Consolidating multiple UPDATE/DELETE statements targeting the same rows.",
    "Optimizing or adding necessary indexes, especially for JOINs and WHERE clauses (suggest index creation statements if applicable).",
    "Identifying and rewriting inefficient query patterns (e.g., correlated subqueries, functions in WHERE clauses).",
    "Detecting unused variables or temporary tables.",
    "Simplifying complex logic where possible.",
];

/// Builds the user instruction. The SQL text is embedded verbatim.
#[must_use]
pub fn build_user_instruction(sql: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "Analyze the following SQL stored procedure and return your analysis ONLY in JSON format:\n\n",
    );
    prompt.push_str("```sql\n");
    prompt.push_str(sql);
    if !sql.ends_with('\n') {
        prompt.push('\n');
    }
    prompt.push_str("```\n\n");

    prompt.push_str("**Instructions:**\n");
    prompt.push_str("1. Identify the stored procedure name.\n");
    prompt.push_str("2. Describe the scope/purpose of the stored procedure in 4-5 concise lines.\n");
    prompt.push_str(&format!(
        "3. Identify up to {MAX_OPPORTUNITIES} high-priority optimization opportunities. Focus on significant performance impacts like:\n"
    ));
    for area in FOCUS_AREAS {
        prompt.push_str("   * ");
        prompt.push_str(area);
        prompt.push('\n');
    }
    prompt.push_str("4. For each optimization opportunity, provide:\n");
    prompt.push_str("   * `type`: A short description (e.g., \"Replace Cursor\", \"Combine Updates\", \"Add Index\").\n");
    prompt.push_str("   * `line_number`: The approximate starting line number or range (e.g., \"55\" or \"55-60\") where the existing logic is found. If not applicable, use \"N/A\".\n");
    prompt.push_str("   * `existing_logic`: The *complete*, relevant block of the original SQL code that needs modification. Include enough context.\n");
    prompt.push_str("   * `optimized_logic`: The *complete*, suggested replacement SQL code, including any necessary surrounding syntax (like declarations if needed).\n");
    prompt.push_str("   * `explanation`: A brief explanation of *why* the change is beneficial (e.g., \"Reduces loops, improves set-based processing\").\n");
    prompt.push_str("5. Provide a brief overall summary containing:\n");
    prompt.push_str("   * `original_performance_issues`: Key performance problems identified.\n");
    prompt.push_str("   * `optimization_impact`: Expected overall impact (e.g., \"Significant performance improvement expected\").\n");
    prompt.push_str("   * `implementation_difficulty`: Estimated effort (e.g., \"Low\", \"Medium\", \"High\").\n\n");

    prompt.push_str("**Output Format (Strict JSON):**\n");
    prompt.push_str("Structure your response as a single, valid JSON object adhering precisely to this schema. Do NOT include any text before or after the JSON object (like ```json markdown).\n\n");
    prompt.push_str(RESPONSE_SHAPE);
    prompt.push('\n');
    prompt
}
