//! Document translation API
//!
//! Accepts a `.docx` upload as multipart form data and answers with the
//! translated document as a download.

use crate::api::ApiState;
use crate::error::AppError;
use crate::translation::{translate_document, TargetLanguage, SUPPORTED_LANGUAGES};
use axum::{
    body::Body,
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{Json, Response},
};
use serde::Serialize;
use tracing::{info, warn};

/// Header carrying the number of translated paragraphs
pub const PARAGRAPH_COUNT_HEADER: &str = "x-paragraph-count";

/// Supported languages response
#[derive(Serialize)]
pub struct LanguagesResponse {
    /// Languages a document can be translated into
    pub languages: &'static [TargetLanguage],
}

/// GET /api/languages - Supported target languages
pub async fn list_languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: SUPPORTED_LANGUAGES,
    })
}

/// POST /api/translate - Translate an uploaded document
///
/// Accepts multipart form data with:
/// - file: the `.docx` document
/// - language: target language code (or name)
pub async fn translate(
    State(api): State<ApiState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut file: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut language: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidRequest(format!("Failed to read uploaded file: {}", e))
                })?;
                // Browsers send an empty part when no file was chosen
                if !data.is_empty() {
                    file = Some(data.to_vec());
                }
            }
            "language" => {
                let text = field.text().await.map_err(|e| {
                    AppError::InvalidRequest(format!("Failed to read language field: {}", e))
                })?;
                if !text.trim().is_empty() {
                    language = Some(text);
                }
            }
            _ => {
                warn!("Unknown multipart field: {}", field_name);
            }
        }
    }

    let file = file.ok_or(AppError::NoFileProvided)?;
    let target = match language {
        Some(code) => TargetLanguage::from_code(&code)?,
        None => {
            return Err(AppError::InvalidRequest(
                "language field is required".to_string(),
            ))
        }
    };

    info!(
        upload = file_name.as_deref().unwrap_or("<unnamed>"),
        bytes = file.len(),
        target = target.code,
        "Translation requested"
    );

    let document = translate_document(Some(file.as_slice()), &target, api.translator.as_ref()).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, document.mime_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.file_name),
        )
        .header(PARAGRAPH_COUNT_HEADER, document.paragraph_count)
        .body(Body::from(document.bytes))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build response: {}", e)))
}
