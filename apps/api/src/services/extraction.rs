//! Résumé text extraction for PDF and DOCX uploads.
//!
//! Parsing is CPU-bound and runs inside `tokio::task::spawn_blocking`.

use std::io::{Cursor, Read};

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::interview::error::InterviewError;
use crate::services::ResumeUpload;

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Content type wins; the file extension is the fallback.
    pub fn detect(upload: &ResumeUpload) -> Option<Self> {
        match upload.content_type.as_deref() {
            Some(PDF_MIME) => return Some(DocumentKind::Pdf),
            Some(DOCX_MIME) => return Some(DocumentKind::Docx),
            _ => {}
        }
        let name = upload.file_name.to_ascii_lowercase();
        if name.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else if name.ends_with(".docx") {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }
}

pub async fn extract_text(upload: &ResumeUpload) -> Result<String, InterviewError> {
    let kind = DocumentKind::detect(upload).ok_or_else(|| {
        InterviewError::Input("Unsupported file type. Please upload a PDF or DOCX file.".to_string())
    })?;

    let bytes = upload.bytes.clone();
    let text = tokio::task::spawn_blocking(move || match kind {
        DocumentKind::Pdf => pdf_text(&bytes),
        DocumentKind::Docx => docx_text(&bytes),
    })
    .await
    .map_err(|e| {
        warn!("Document parser aborted: {e}");
        InterviewError::Input("The document could not be read.".to_string())
    })??;

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(InterviewError::Input(
            "Could not extract any text from the document.".to_string(),
        ));
    }

    debug!("Extracted {} characters from {}", text.len(), upload.file_name);
    Ok(text)
}

fn pdf_text(bytes: &[u8]) -> Result<String, InterviewError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| InterviewError::Input(format!("Failed to read PDF: {e}")))
}

fn docx_text(bytes: &[u8]) -> Result<String, InterviewError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| InterviewError::Input(format!("Failed to open DOCX: {e}")))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|e| InterviewError::Input(format!("DOCX has no document body: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| InterviewError::Input(format!("Failed to read DOCX body: {e}")))?;
    document_xml_text(&xml)
}

/// Collects `<w:t>` runs, one line per `<w:p>` paragraph.
fn document_xml_text(xml: &str) -> Result<String, InterviewError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                out.push_str(&String::from_utf8_lossy(&t));
            }
            Ok(Event::GeneralRef(r)) if in_text => {
                match r.resolve_char_ref().map_err(malformed)? {
                    Some(c) => out.push(c),
                    None => {
                        let name = r.decode().map_err(malformed)?;
                        match resolve_predefined_entity(&name) {
                            Some(text) => out.push_str(text),
                            None => debug!("Skipping unknown entity &{name};"),
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(e)),
        }
    }

    Ok(out)
}

fn malformed(e: impl std::fmt::Display) -> InterviewError {
    InterviewError::Input(format!("Malformed DOCX body: {e}"))
}
