use serde::Serialize;

use crate::models::{AnalysisRecord, display_or_placeholder};

use super::{
    ANALYSIS_SUMMARY_HEADING, EXISTING_LOGIC_LABEL, EXPLANATION_LABEL, NO_SUGGESTIONS_NOTICE,
    OPTIMIZED_LOGIC_LABEL, SCOPE_HEADING, clean_text, step_title, summary_items,
};

pub const COMPLETE_BANNER: &str = "Analysis Complete!";
pub const SCOPE_SECTION_TITLE: &str = "View Scope & Summary";
pub const SUGGESTIONS_HEADING: &str = "Optimization Suggestions:";
pub const DEFAULT_WIDTH: usize = 100;

const INDENT: &str = "  ";
const COLUMN_GAP: &str = " | ";

/// What the screen shows, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenView {
    pub blocks: Vec<ScreenBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScreenBlock {
    Banner { text: String },
    Heading { text: String },
    Notice { text: String },
    Section(ScreenSection),
}

/// A collapsible section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenSection {
    pub title: String,
    pub expanded: bool,
    pub items: Vec<SectionItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionItem {
    Label { text: String },
    Text { text: String },
    Bullet { label: String, value: String },
    CodeColumns { left: CodePane, right: CodePane },
    Caption { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodePane {
    pub title: String,
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOptions {
    pub width: usize,
    /// When false every section is drawn open.
    pub honor_collapsed: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            honor_collapsed: false,
        }
    }
}

#[must_use]
pub fn build_screen(record: &AnalysisRecord) -> ScreenView {
    let mut blocks = vec![
        ScreenBlock::Banner {
            text: COMPLETE_BANNER.to_string(),
        },
        ScreenBlock::Heading {
            text: format!(
                "Procedure Name: {}",
                display_or_placeholder(&record.procedure_name)
            ),
        },
    ];

    let mut scope_items = vec![
        SectionItem::Label {
            text: SCOPE_HEADING.to_string(),
        },
        SectionItem::Text {
            text: display_or_placeholder(&record.scope).to_string(),
        },
        SectionItem::Label {
            text: ANALYSIS_SUMMARY_HEADING.to_string(),
        },
    ];
    scope_items.extend(summary_items(record).into_iter().map(|(label, value)| {
        SectionItem::Bullet {
            label: label.to_string(),
            value: display_or_placeholder(value).to_string(),
        }
    }));
    blocks.push(ScreenBlock::Section(ScreenSection {
        title: SCOPE_SECTION_TITLE.to_string(),
        expanded: false,
        items: scope_items,
    }));

    blocks.push(ScreenBlock::Heading {
        text: SUGGESTIONS_HEADING.to_string(),
    });
    if !record.has_optimizations() {
        blocks.push(ScreenBlock::Notice {
            text: NO_SUGGESTIONS_NOTICE.to_string(),
        });
    }
    for (index, step) in record.optimizations.iter().enumerate() {
        blocks.push(ScreenBlock::Section(ScreenSection {
            title: step_title(index, step),
            expanded: index == 0,
            items: vec![
                SectionItem::CodeColumns {
                    left: CodePane {
                        title: EXISTING_LOGIC_LABEL.to_string(),
                        code: display_or_placeholder(&step.existing_logic).to_string(),
                    },
                    right: CodePane {
                        title: OPTIMIZED_LOGIC_LABEL.to_string(),
                        code: display_or_placeholder(&step.optimized_logic).to_string(),
                    },
                },
                SectionItem::Label {
                    text: EXPLANATION_LABEL.to_string(),
                },
                SectionItem::Caption {
                    text: display_or_placeholder(&step.explanation).to_string(),
                },
            ],
        }));
    }

    ScreenView { blocks }
}

/// Draws the view as plain terminal text.
#[must_use]
pub fn render_text(view: &ScreenView, options: TextOptions) -> String {
    let mut lines = Vec::new();
    for block in &view.blocks {
        match block {
            ScreenBlock::Banner { text } => lines.push(format!("== {text} ==")),
            ScreenBlock::Heading { text } => {
                lines.push(String::new());
                lines.push(text.clone());
            }
            ScreenBlock::Notice { text } => lines.push(format!("(i) {text}")),
            ScreenBlock::Section(section) => {
                let open = section.expanded || !options.honor_collapsed;
                let marker = if open { "[-]" } else { "[+]" };
                lines.push(String::new());
                lines.push(format!("{marker} {}", section.title));
                if open {
                    for item in &section.items {
                        push_item(&mut lines, item, options.width);
                    }
                }
            }
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn push_item(lines: &mut Vec<String>, item: &SectionItem, width: usize) {
    match item {
        SectionItem::Label { text } => lines.push(format!("{INDENT}{text}")),
        SectionItem::Text { text } => {
            lines.extend(clean_text(text).lines().map(|line| format!("{INDENT}{line}")));
        }
        SectionItem::Bullet { label, value } => {
            lines.push(format!("{INDENT}- {label} {}", clean_text(value).replace('\n', " ")));
        }
        SectionItem::Caption { text } => {
            lines.extend(clean_text(text).lines().map(|line| format!("{INDENT}> {line}")));
        }
        SectionItem::CodeColumns { left, right } => {
            lines.extend(side_by_side(left, right, width.saturating_sub(INDENT.len())));
        }
    }
}

fn side_by_side(left: &CodePane, right: &CodePane, width: usize) -> Vec<String> {
    let column = (width.saturating_sub(COLUMN_GAP.len()) / 2).max(1);
    let left_lines = pane_lines(&left.code, column);
    let right_lines = pane_lines(&right.code, column);

    let mut rows = vec![
        format_row(&left.title, &right.title, column),
        format_row(&"-".repeat(column), &"-".repeat(column), column),
    ];
    let height = left_lines.len().max(right_lines.len());
    for index in 0..height {
        let left = left_lines.get(index).map(String::as_str).unwrap_or("");
        let right = right_lines.get(index).map(String::as_str).unwrap_or("");
        rows.push(format_row(left, right, column));
    }
    rows
}

fn format_row(left: &str, right: &str, column: usize) -> String {
    let padding = column.saturating_sub(left.chars().count());
    let row = format!("{INDENT}{left}{}{COLUMN_GAP}{right}", " ".repeat(padding));
    row.trim_end().to_string()
}

fn pane_lines(code: &str, column: usize) -> Vec<String> {
    clean_text(code.trim_end())
        .replace('\t', "    ")
        .lines()
        .flat_map(|line| wrap_chars(line, column))
        .collect()
}

fn wrap_chars(line: &str, column: usize) -> Vec<String> {
    let chars = line.chars().collect::<Vec<_>>();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(column)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
