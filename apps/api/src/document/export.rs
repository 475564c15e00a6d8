//! Document Exporter: writes text to a DOCX file for download.
//!
//! Files are created with `tempfile` and persisted; deleting them is the
//! caller's responsibility.

use std::path::PathBuf;

use docx_rs::{
    read_docx, DocumentChild, Docx, Paragraph, ParagraphChild, Run, RunChild, Style, StyleType,
};
use tracing::debug;

use super::DocumentError;
use crate::negotiation::redline::{Redline, SegmentKind};

const HEADING_STYLE: &str = "Heading1";
const HEADING_SIZE: usize = 32; // half-points
const DELETION_COLOR: &str = "C00000";
const INSERTION_COLOR: &str = "1F4E79";

/// Writes `heading` followed by one paragraph per `\n`-separated line of `text`.
/// Returns the path of the freshly created `.docx` file.
pub fn export_docx(heading: &str, text: &str) -> Result<PathBuf, DocumentError> {
    let docx = text
        .split('\n')
        .fold(base_document(heading), |docx, line| {
            docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)))
        });

    write_temp(docx)
}

/// Writes a redline of the original clause against the arbitrated clause:
/// removed words struck through, added words underlined, then the clean final text.
pub fn export_redline_docx(
    redline: &Redline,
    final_clause: &str,
) -> Result<PathBuf, DocumentError> {
    let marked = redline.segments.iter().fold(Paragraph::new(), |para, segment| {
        let run = Run::new().add_text(format!("{} ", segment.text));
        let run = match segment.kind {
            SegmentKind::Equal => run,
            SegmentKind::Removed => run.strike().color(DELETION_COLOR),
            SegmentKind::Added => run.underline("single").color(INSERTION_COLOR),
        };
        para.add_run(run)
    });

    let docx = base_document("Clause Redline")
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Marked changes").bold()))
        .add_paragraph(marked)
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Final clause").bold()));
    let docx = final_clause.split('\n').fold(docx, |docx, line| {
        docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)))
    });

    write_temp(docx)
}

/// Reads the text of every body paragraph of a DOCX file, in document order.
pub fn read_docx_paragraphs(bytes: &[u8]) -> Result<Vec<String>, DocumentError> {
    let docx = read_docx(bytes).map_err(|e| DocumentError::Format(format!("invalid DOCX: {e}")))?;

    Ok(docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect())
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
    }
    text
}

fn base_document(heading: &str) -> Docx {
    Docx::new()
        .add_style(Style::new(HEADING_STYLE, StyleType::Paragraph).name("Heading 1"))
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(heading).bold().size(HEADING_SIZE))
                .style(HEADING_STYLE),
        )
}

fn write_temp(docx: Docx) -> Result<PathBuf, DocumentError> {
    let temp = tempfile::Builder::new()
        .prefix("clausewright-")
        .suffix(".docx")
        .tempfile()?;
    let (file, path) = temp.keep().map_err(|e| DocumentError::Io(e.error))?;

    docx.build()
        .pack(file)
        .map_err(|e| DocumentError::Write(e.to_string()))?;

    debug!("Exported DOCX to {}", path.display());
    Ok(path)
}
