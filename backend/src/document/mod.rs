//! Word document handling
//!
//! Reading and writing paragraph text of `.docx` packages.

pub mod docx;

pub use docx::{read_paragraphs, write_paragraphs};

use thiserror::Error;

/// MIME type of a Word-processing document
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Errors raised while reading or writing a `.docx` package
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The bytes are not a readable zip archive
    #[error("not a valid .docx archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A required part is missing from the package
    #[error("missing document part: {0}")]
    MissingPart(String),

    /// The document XML could not be parsed
    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Reading or writing the archive failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Paragraphs of a document, with blank and whitespace-only ones dropped
pub fn non_blank_paragraphs(bytes: &[u8]) -> Result<Vec<String>, DocumentError> {
    Ok(read_paragraphs(bytes)?
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect())
}
