//! Report persistence to fixed-name TXT and PDF files.
//!
//! TXT writes the content verbatim. PDF typesets the same content onto A4
//! pages with `lopdf`. A failed export never affects the already-computed
//! report; the error surfaces to the triggering action only.

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use thiserror::Error;
use tracing::info;

use crate::models::{ExportFormat, ExportRequest};

/// A4 page geometry, in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;

/// Body type settings.
const FONT_SIZE: f32 = 11.0;
const LEADING: f32 = 14.0;

/// Word-wrap column for PDF body lines.
const WRAP_COLUMNS: usize = 95;

/// Errors that can occur while exporting a report.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The output file could not be written.
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PDF assembly failed.
    #[error("PDF conversion failed: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// Writes the request's content to the fixed-name file for its format,
/// inside `out_dir`. Returns the path of the written file.
///
/// # Examples
///
/// ```
/// use ebpcharlie::export::export;
/// use ebpcharlie::models::{ExportFormat, ExportRequest};
///
/// # fn main() -> Result<(), ebpcharlie::export::ExportError> {
/// let dir = std::env::temp_dir();
/// let request = ExportRequest::new(ExportFormat::Txt, "report body");
/// let path = export(&request, &dir)?;
/// assert!(path.ends_with("summary_and_abstracts.txt"));
/// # Ok(())
/// # }
/// ```
pub fn export(request: &ExportRequest, out_dir: &Path) -> Result<PathBuf, ExportError> {
    let path = out_dir.join(request.format.file_name());

    let bytes = match request.format {
        ExportFormat::Txt => request.content.clone().into_bytes(),
        ExportFormat::Pdf => render_pdf(&request.content)?,
    };

    fs::write(&path, bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), "report exported");
    Ok(path)
}

/// Typesets plain text onto A4 pages and returns the PDF bytes.
fn render_pdf(content: &str) -> Result<Vec<u8>, lopdf::Error> {
    let mut lines = wrap_content(content);
    if lines.is_empty() {
        // A PDF needs at least one page even for empty content.
        lines.push(String::new());
    }
    let lines_per_page = ((PAGE_HEIGHT - 2.0 * MARGIN) / LEADING) as usize;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut page_ids: Vec<Object> = Vec::new();
    for page_lines in lines.chunks(lines_per_page.max(1)) {
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            page_content(page_lines).encode()?,
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id.into());
    }

    let page_count = page_ids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Builds the content stream for one page of wrapped lines.
fn page_content(lines: &[String]) -> Content {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
        Operation::new("TL", vec![LEADING.into()]),
        Operation::new(
            "Td",
            vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN - FONT_SIZE).into()],
        ),
    ];

    for line in lines {
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(to_latin1(line))],
        ));
        operations.push(Operation::new("T*", vec![]));
    }

    operations.push(Operation::new("ET", vec![]));
    Content { operations }
}

/// Splits content into display lines, word-wrapping anything longer than
/// the fixed column width. Blank lines survive as paragraph separators.
fn wrap_content(content: &str) -> Vec<String> {
    let mut out = Vec::new();

    for line in content.lines() {
        if line.chars().count() <= WRAP_COLUMNS {
            out.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        for word in line.split_whitespace() {
            let candidate_len = current.chars().count() + 1 + word.chars().count();
            if !current.is_empty() && candidate_len > WRAP_COLUMNS {
                out.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            out.push(current);
        }
    }

    out
}

/// Maps text to Latin-1 bytes for the standard Helvetica encoding,
/// substituting '?' for anything outside that range.
fn to_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}
