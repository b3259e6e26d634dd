use crate::models::{AnalysisRecord, OptimizationStep, PLACEHOLDER, display_or_placeholder};

use super::{
    ANALYSIS_SUMMARY_HEADING, EXISTING_LOGIC_LABEL, EXPLANATION_LABEL, NO_SUGGESTIONS_NOTICE,
    OPTIMIZED_LOGIC_LABEL, PROCEDURE_HEADING, REPORT_TITLE, SCOPE_HEADING, STEPS_HEADING,
    SUMMARY_TABLE_HEADING, TABLE_HEADERS, clean_text, step_title, summary_items,
};

#[must_use]
pub fn render_markdown(record: &AnalysisRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {REPORT_TITLE}\n\n"));

    out.push_str(&format!("## {PROCEDURE_HEADING}\n\n"));
    out.push_str(&inline_code(display_or_placeholder(&record.procedure_name)));
    out.push_str("\n\n");

    out.push_str(&format!("## {SCOPE_HEADING}\n\n"));
    out.push_str(&block_text(display_or_placeholder(&record.scope)));
    out.push_str("\n\n");

    out.push_str(&format!("## {ANALYSIS_SUMMARY_HEADING}\n\n"));
    for (label, value) in summary_items(record) {
        out.push_str(&format!(
            "- **{label}** {}\n",
            escape_html(&single_line(display_or_placeholder(value)))
        ));
    }
    out.push('\n');

    out.push_str(&format!("## {STEPS_HEADING}\n\n"));
    if !record.has_optimizations() {
        out.push_str(NO_SUGGESTIONS_NOTICE);
        out.push_str("\n\n");
    } else {
        for (index, step) in record.optimizations.iter().enumerate() {
            push_step(&mut out, index, step);
        }
    }

    out.push_str(&format!("## {SUMMARY_TABLE_HEADING}\n\n"));
    if !record.has_optimizations() {
        out.push_str(NO_SUGGESTIONS_NOTICE);
        out.push('\n');
    } else {
        out.push_str(&summary_table(&record.optimizations));
    }
    out
}

fn push_step(out: &mut String, index: usize, step: &OptimizationStep) {
    out.push_str(&format!("### {}\n\n", escape_html(&single_line(&step_title(index, step)))));

    out.push_str(&format!("**{EXISTING_LOGIC_LABEL}**\n\n"));
    out.push_str(&code_block(&step.existing_logic));
    out.push_str(&format!("**{OPTIMIZED_LOGIC_LABEL}**\n\n"));
    out.push_str(&code_block(&step.optimized_logic));

    out.push_str(&format!("**{EXPLANATION_LABEL}**\n\n"));
    for line in clean_text(display_or_placeholder(&step.explanation)).lines() {
        let line = block_line(line);
        if line.is_empty() {
            out.push_str(">\n");
        } else {
            out.push_str(&format!("> {line}\n"));
        }
    }
    out.push_str("\n---\n\n");
}

/// The trailing table, one row per step, in GitHub table syntax. Cell
/// contents stay on one line: line breaks become `<br>` and pipes are escaped.
#[must_use]
pub fn summary_table(steps: &[OptimizationStep]) -> String {
    let mut out = String::new();
    out.push_str(&format!("| {} |\n", TABLE_HEADERS.join(" | ")));
    out.push_str(&format!("|{}\n", " --- |".repeat(TABLE_HEADERS.len())));
    for step in steps {
        let cells = [
            table_text(&step.kind),
            table_text(&step.line_number),
            table_code(&step.existing_logic),
            table_code(&step.optimized_logic),
            table_text(&step.explanation),
        ];
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}

fn code_block(code: &str) -> String {
    if code.trim().is_empty() {
        return format!("{PLACEHOLDER}\n\n");
    }
    let code = clean_text(code);
    let code = code.trim_end_matches('\n');
    let fence = "`".repeat(longest_backtick_run(code).max(2) + 1);
    format!("{fence}sql\n{code}\n{fence}\n\n")
}

fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in text.chars() {
        if ch == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn inline_code(text: &str) -> String {
    let text = single_line(text);
    let fence = "`".repeat(longest_backtick_run(&text) + 1);
    if text.starts_with('`') || text.ends_with('`') {
        format!("{fence} {text} {fence}")
    } else {
        format!("{fence}{text}{fence}")
    }
}

fn single_line(text: &str) -> String {
    clean_text(text)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Free text laid out as paragraphs. Characters that would open a heading,
/// list, quote or fence at the start of a line are escaped.
fn block_text(text: &str) -> String {
    clean_text(text)
        .lines()
        .map(block_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn block_line(line: &str) -> String {
    let line = escape_html(line.trim_start());
    match line.chars().next() {
        Some('#' | '-' | '+' | '*' | '=' | '_' | '|' | '`' | '~') => format!("\\{line}"),
        Some(first) if first.is_ascii_digit() => {
            let digits = line.chars().take_while(char::is_ascii_digit).count();
            match line[digits..].chars().next() {
                Some('.' | ')') => format!("{}\\{}", &line[..digits], &line[digits..]),
                _ => line,
            }
        }
        _ => line,
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn table_text(text: &str) -> String {
    clean_text(display_or_placeholder(text).trim())
        .lines()
        .map(|line| escape_html(line).replace('|', "\\|"))
        .collect::<Vec<_>>()
        .join("<br>")
}

fn table_code(code: &str) -> String {
    if code.trim().is_empty() {
        return PLACEHOLDER.to_string();
    }
    let lines = clean_text(code.trim_end())
        .lines()
        .map(|line| escape_html(line).replace('|', "&#124;"))
        .collect::<Vec<_>>();
    format!("<code>{}</code>", lines.join("<br>"))
}
