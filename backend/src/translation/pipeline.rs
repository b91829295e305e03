//! Extract → translate → rebuild
//!
//! Strictly sequential: one paragraph, one service call, in document order.
//! The first failure aborts the run and nothing is produced.

use super::{TargetLanguage, Translator};
use crate::document::{non_blank_paragraphs, write_paragraphs, DOCX_MIME_TYPE};
use crate::error::AppError;
use chrono::{DateTime, Local, TimeZone};
use std::time::Instant;
use tracing::{debug, info, warn};

/// A translated document ready for download
#[derive(Debug, Clone)]
pub struct TranslatedDocument {
    /// Suggested download name (`translated_<code>_<YYYYMMDD_HHMMSS>.docx`)
    pub file_name: String,
    /// MIME type of `bytes`
    pub mime_type: &'static str,
    /// Serialized `.docx` package
    pub bytes: Vec<u8>,
    /// Number of paragraphs translated
    pub paragraph_count: usize,
}

/// Download name for a translation produced at `at`
pub fn output_file_name<Tz: TimeZone>(target: &TargetLanguage, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "translated_{}_{}.docx",
        target.code,
        at.format("%Y%m%d_%H%M%S")
    )
}

/// Translate every non-blank paragraph of a `.docx` document
///
/// # Arguments
/// * `file` - Uploaded document bytes, `None` when nothing was uploaded
/// * `target` - Language to translate into (source is auto-detected)
/// * `translator` - Translation service, called once per paragraph
///
/// # Errors
/// * `AppError::NoFileProvided` - `file` is `None`; no service call is made
/// * `AppError::InvalidDocument` - The bytes are not a readable `.docx`
/// * `AppError::EmptyDocument` - No non-blank paragraphs; no service call is made
/// * `AppError::TranslationServiceFailure` - Any single call failed
pub async fn translate_document(
    file: Option<&[u8]>,
    target: &TargetLanguage,
    translator: &dyn Translator,
) -> Result<TranslatedDocument, AppError> {
    let bytes = file.ok_or(AppError::NoFileProvided)?;
    let paragraphs = non_blank_paragraphs(bytes)?;
    if paragraphs.is_empty() {
        return Err(AppError::EmptyDocument);
    }

    let started = Instant::now();
    info!(
        paragraphs = paragraphs.len(),
        target = target.code,
        "Translating document"
    );

    let mut translated = Vec::with_capacity(paragraphs.len());
    for (index, paragraph) in paragraphs.iter().enumerate() {
        let text = translator
            .translate(paragraph, target)
            .await
            .map_err(|e| {
                warn!(paragraph = index, error = %e, "Translation aborted");
                e
            })?;
        debug!(paragraph = index, chars = paragraph.len(), "Paragraph translated");
        translated.push(text);
    }

    let output = write_paragraphs(&translated)?;
    info!(
        paragraphs = translated.len(),
        bytes = output.len(),
        duration_ms = started.elapsed().as_millis() as u64,
        "Document translated"
    );

    Ok(TranslatedDocument {
        file_name: output_file_name(target, &Local::now()),
        mime_type: DOCX_MIME_TYPE,
        bytes: output,
        paragraph_count: translated.len(),
    })
}
