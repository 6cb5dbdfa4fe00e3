//! DOCX text extraction using docx-rs.

use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};

use super::{ExtractError, ResumeFormat, TextExtractor};

/// Emits one line per non-empty paragraph in document order. Paragraphs inside
/// table cells are emitted where the table sits.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractError::Parse {
            format: ResumeFormat::Docx,
            cause: e.to_string(),
        })?;

        let mut lines: Vec<String> = Vec::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(p) => push_line(&mut lines, paragraph_text(p)),
                DocumentChild::Table(t) => push_table_lines(&mut lines, t),
                _ => {}
            }
        }

        Ok(lines.join("\n"))
    }
}

fn push_line(lines: &mut Vec<String>, text: String) {
    if !text.trim().is_empty() {
        lines.push(text);
    }
}

fn push_table_lines(lines: &mut Vec<String>, table: &Table) {
    for row in &table.rows {
        let TableChild::TableRow(r) = row;
        for cell in &r.cells {
            let TableRowChild::TableCell(c) = cell;
            for content in &c.children {
                if let TableCellContent::Paragraph(p) = content {
                    push_line(lines, paragraph_text(p));
                }
            }
        }
    }
}

fn paragraph_text(p: &Paragraph) -> String {
    let mut text = String::new();
    for child in &p.children {
        match child {
            ParagraphChild::Run(r) => {
                for run_child in &r.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(h) => {
                for child in &h.children {
                    if let ParagraphChild::Run(r) = child {
                        for run_child in &r.children {
                            if let RunChild::Text(t) = run_child {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }
    text
}
