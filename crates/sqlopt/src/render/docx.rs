//! Minimal WordprocessingML writer.
//!
//! The package holds only the parts Word needs (content types, relationships,
//! styles and the document body). No `docProps` part is written and every
//! zip entry carries the same fixed timestamp, so identical records produce
//! identical bytes.

use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::warn;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::AnalyzerError;
use crate::models::{AnalysisRecord, OptimizationStep, PLACEHOLDER, display_or_placeholder};

use super::{
    ANALYSIS_SUMMARY_HEADING, EXISTING_LOGIC_LABEL, EXPLANATION_LABEL, NO_SUGGESTIONS_NOTICE,
    OPTIMIZED_LOGIC_LABEL, PROCEDURE_HEADING, REPORT_TITLE, SCOPE_HEADING, STEPS_HEADING,
    SUMMARY_TABLE_HEADING, TABLE_HEADERS, clean_text, step_title, summary_items,
};

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub const CODE_FONT: &str = "Courier New";
/// Half-points: 10pt body code, 9pt table code.
const CODE_SIZE: u32 = 20;
const TABLE_CODE_SIZE: u32 = 18;
/// Twips (1/1440 inch).
const CODE_INDENT: u32 = 360;
pub const COLUMN_WIDTHS: [u32; 5] = [1440, 720, 2880, 2880, 2160];
pub const HEADER_FILL: &str = "D9D9D9";
pub const BAND_FILL: &str = "F2F2F2";
const SEPARATOR_WIDTH: usize = 50;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:spacing w:after="240"/></w:pPr><w:rPr><w:sz w:val="52"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="360" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:color w:val="2F5496"/><w:sz w:val="32"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="80"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:color w:val="2F5496"/><w:sz w:val="26"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="160" w:after="40"/><w:outlineLvl w:val="2"/></w:pPr><w:rPr><w:b/><w:color w:val="1F3763"/><w:sz w:val="24"/></w:rPr></w:style><w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders><w:tblCellMar><w:left w:w="108" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr></w:style></w:styles>"#;

/// Builds the `.docx` bytes for `record`.
pub fn build_document(record: &AnalysisRecord) -> Result<Vec<u8>, AnalyzerError> {
    let body = document_xml(record)
        .map_err(|error| AnalyzerError::Document(format!("{error:#}")))?;
    package(&body).map_err(|error| AnalyzerError::Document(format!("{error:#}")))
}

fn package(document_xml: &[u8]) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let parts: [(&str, &[u8]); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS_XML.as_bytes()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.as_bytes()),
        ("word/styles.xml", STYLES_XML.as_bytes()),
        ("word/document.xml", document_xml),
    ];
    for (name, bytes) in parts {
        zip.start_file(name, options)
            .with_context(|| format!("failed to start package part {name}"))?;
        zip.write_all(bytes)
            .with_context(|| format!("failed to write package part {name}"))?;
    }
    let cursor = zip.finish().context("failed to finish document package")?;
    Ok(cursor.into_inner())
}

/// Renders `word/document.xml`.
pub fn document_xml(record: &AnalysisRecord) -> Result<Vec<u8>> {
    let mut doc = BodyWriter::new();
    doc.writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    doc.start("w:document", &[("xmlns:w", WORD_NS)])?;
    doc.start("w:body", &[])?;

    doc.paragraph(&Para::styled("Title").centered(), &Run::plain(), REPORT_TITLE)?;

    doc.heading(1, PROCEDURE_HEADING)?;
    doc.paragraph(
        &Para::plain(),
        &Run::plain().bold(),
        display_or_placeholder(&record.procedure_name),
    )?;

    doc.heading(1, SCOPE_HEADING)?;
    doc.paragraph(&Para::plain(), &Run::plain(), display_or_placeholder(&record.scope))?;

    doc.heading(1, ANALYSIS_SUMMARY_HEADING)?;
    for (label, value) in summary_items(record) {
        doc.labelled_paragraph(label, display_or_placeholder(value))?;
    }

    doc.heading(1, STEPS_HEADING)?;
    if !record.has_optimizations() {
        doc.paragraph(&Para::plain(), &Run::plain(), NO_SUGGESTIONS_NOTICE)?;
    } else {
        for (index, step) in record.optimizations.iter().enumerate() {
            doc.step(index, step)?;
        }
    }

    doc.heading(1, SUMMARY_TABLE_HEADING)?;
    if !record.has_optimizations() {
        doc.paragraph(&Para::plain(), &Run::plain(), NO_SUGGESTIONS_NOTICE)?;
    } else if let Err(error) = doc.summary_table(&record.optimizations) {
        warn!(error = %error, "summary table could not be written");
        return Err(error.context("failed to write the summary table"));
    }

    doc.section_properties()?;
    doc.end("w:body")?;
    doc.end("w:document")?;
    Ok(doc.writer.into_inner())
}

#[derive(Debug, Clone, Default)]
struct Para {
    style: Option<&'static str>,
    centered: bool,
    indent: Option<u32>,
}

impl Para {
    fn plain() -> Self {
        Self::default()
    }

    fn styled(style: &'static str) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }

    fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    fn indented(mut self, twips: u32) -> Self {
        self.indent = Some(twips);
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Run {
    bold: bool,
    italic: bool,
    code_size: Option<u32>,
}

impl Run {
    fn plain() -> Self {
        Self::default()
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn code(size: u32) -> Self {
        Self {
            code_size: Some(size),
            ..Self::default()
        }
    }
}

struct BodyWriter {
    writer: Writer<Vec<u8>>,
}

impl BodyWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Start(element))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    fn heading(&mut self, level: u8, text: &str) -> Result<()> {
        let style = match level {
            1 => "Heading1",
            2 => "Heading2",
            _ => "Heading3",
        };
        self.paragraph(&Para::styled(style), &Run::plain(), text)
    }

    fn paragraph(&mut self, para: &Para, run: &Run, text: &str) -> Result<()> {
        self.start("w:p", &[])?;
        self.paragraph_properties(para)?;
        self.run(run, text)?;
        self.end("w:p")
    }

    fn labelled_paragraph(&mut self, label: &str, value: &str) -> Result<()> {
        self.start("w:p", &[])?;
        self.run(&Run::plain().bold(), &format!("{label} "))?;
        self.run(&Run::plain(), value)?;
        self.end("w:p")
    }

    fn paragraph_properties(&mut self, para: &Para) -> Result<()> {
        if para.style.is_none() && !para.centered && para.indent.is_none() {
            return Ok(());
        }
        self.start("w:pPr", &[])?;
        if let Some(style) = para.style {
            self.empty("w:pStyle", &[("w:val", style)])?;
        }
        if let Some(indent) = para.indent {
            let indent = indent.to_string();
            self.empty("w:ind", &[("w:left", indent.as_str())])?;
        }
        if para.centered {
            self.empty("w:jc", &[("w:val", "center")])?;
        }
        self.end("w:pPr")
    }

    /// One run; embedded line breaks become `<w:br/>` and tabs `<w:tab/>`.
    fn run(&mut self, run: &Run, text: &str) -> Result<()> {
        self.start("w:r", &[])?;
        if run.bold || run.italic || run.code_size.is_some() {
            self.start("w:rPr", &[])?;
            if run.code_size.is_some() {
                self.empty(
                    "w:rFonts",
                    &[
                        ("w:ascii", CODE_FONT),
                        ("w:hAnsi", CODE_FONT),
                        ("w:cs", CODE_FONT),
                    ],
                )?;
            }
            if run.bold {
                self.empty("w:b", &[])?;
            }
            if run.italic {
                self.empty("w:i", &[])?;
            }
            if let Some(size) = run.code_size {
                let size = size.to_string();
                self.empty("w:sz", &[("w:val", size.as_str())])?;
                self.empty("w:szCs", &[("w:val", size.as_str())])?;
            }
            self.end("w:rPr")?;
        }

        let cleaned = clean_text(text);
        for (index, line) in cleaned.split('\n').enumerate() {
            if index > 0 {
                self.empty("w:br", &[])?;
            }
            for (piece, segment) in line.split('\t').enumerate() {
                if piece > 0 {
                    self.empty("w:tab", &[])?;
                }
                if segment.is_empty() {
                    continue;
                }
                self.start("w:t", &[("xml:space", "preserve")])?;
                self.writer.write_event(Event::Text(BytesText::new(segment)))?;
                self.end("w:t")?;
            }
        }
        self.end("w:r")
    }

    fn code_paragraph(&mut self, code: &str) -> Result<()> {
        if code.trim().is_empty() {
            return self.paragraph(&Para::plain(), &Run::plain(), PLACEHOLDER);
        }
        self.paragraph(
            &Para::plain().indented(CODE_INDENT),
            &Run::code(CODE_SIZE),
            code.trim_end_matches(['\r', '\n']),
        )
    }

    fn step(&mut self, index: usize, step: &OptimizationStep) -> Result<()> {
        self.heading(2, &step_title(index, step))?;
        self.heading(3, EXISTING_LOGIC_LABEL)?;
        self.code_paragraph(&step.existing_logic)?;
        self.heading(3, OPTIMIZED_LOGIC_LABEL)?;
        self.code_paragraph(&step.optimized_logic)?;
        self.heading(3, EXPLANATION_LABEL)?;
        self.paragraph(
            &Para::plain(),
            &Run::plain().italic(),
            display_or_placeholder(&step.explanation),
        )?;
        self.paragraph(&Para::plain(), &Run::plain(), &"_".repeat(SEPARATOR_WIDTH))
    }

    fn summary_table(&mut self, steps: &[OptimizationStep]) -> Result<()> {
        let total_width = COLUMN_WIDTHS.iter().sum::<u32>().to_string();
        self.start("w:tbl", &[])?;
        self.start("w:tblPr", &[])?;
        self.empty("w:tblStyle", &[("w:val", "TableGrid")])?;
        self.empty("w:tblW", &[("w:w", total_width.as_str()), ("w:type", "dxa")])?;
        self.empty("w:tblLayout", &[("w:type", "fixed")])?;
        self.end("w:tblPr")?;

        self.start("w:tblGrid", &[])?;
        for width in COLUMN_WIDTHS {
            let width = width.to_string();
            self.empty("w:gridCol", &[("w:w", width.as_str())])?;
        }
        self.end("w:tblGrid")?;

        self.start("w:tr", &[])?;
        self.start("w:trPr", &[])?;
        self.empty("w:tblHeader", &[])?;
        self.end("w:trPr")?;
        for (column, header) in TABLE_HEADERS.iter().enumerate() {
            self.cell(
                column,
                Some(HEADER_FILL),
                &Para::plain().centered(),
                &Run::plain().bold(),
                header,
            )?;
        }
        self.end("w:tr")?;

        for (row, step) in steps.iter().enumerate() {
            // Data rows count from one; every second row is banded.
            let fill = ((row + 1) % 2 == 0).then_some(BAND_FILL);
            let code_run = Run::code(TABLE_CODE_SIZE);
            self.start("w:tr", &[])?;
            let cells = [
                (Run::plain(), step.kind.as_str()),
                (Run::plain(), step.line_number.as_str()),
                (code_run, step.existing_logic.as_str()),
                (code_run, step.optimized_logic.as_str()),
                (Run::plain(), step.explanation.as_str()),
            ];
            for (column, (run, text)) in cells.iter().enumerate() {
                self.cell(column, fill, &Para::plain(), run, display_or_placeholder(text))?;
            }
            self.end("w:tr")?;
        }
        self.end("w:tbl")?;
        // Word requires a paragraph between a table and the section end.
        self.start("w:p", &[])?;
        self.end("w:p")
    }

    fn cell(
        &mut self,
        column: usize,
        fill: Option<&str>,
        para: &Para,
        run: &Run,
        text: &str,
    ) -> Result<()> {
        let width = COLUMN_WIDTHS
            .get(column)
            .copied()
            .with_context(|| format!("no width configured for table column {column}"))?
            .to_string();
        self.start("w:tc", &[])?;
        self.start("w:tcPr", &[])?;
        self.empty("w:tcW", &[("w:w", width.as_str()), ("w:type", "dxa")])?;
        if let Some(fill) = fill {
            self.empty(
                "w:shd",
                &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", fill)],
            )?;
        }
        self.end("w:tcPr")?;
        self.paragraph(para, run, text.trim_end_matches(['\r', '\n']))?;
        self.end("w:tc")
    }

    fn section_properties(&mut self) -> Result<()> {
        self.start("w:sectPr", &[])?;
        self.empty("w:pgSz", &[("w:w", "12240"), ("w:h", "15840")])?;
        self.empty(
            "w:pgMar",
            &[
                ("w:top", "1440"),
                ("w:right", "1080"),
                ("w:bottom", "1440"),
                ("w:left", "1080"),
                ("w:header", "720"),
                ("w:footer", "720"),
                ("w:gutter", "0"),
            ],
        )?;
        self.end("w:sectPr")
    }
}
