//! Document translation
//!
//! The `Translator` seam, the supported target languages, the Gemini-backed
//! translator and the extract → translate → rebuild pipeline.

pub mod gemini;
pub mod gemini_types;
pub mod pipeline;

pub use gemini::GeminiTranslator;
pub use pipeline::{output_file_name, translate_document, TranslatedDocument};

use crate::error::AppError;
use async_trait::async_trait;
use serde::Serialize;

/// A language a document can be translated into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetLanguage {
    /// Language code sent to the translation service (`es`, `zh-CN`, ...)
    pub code: &'static str,
    /// Human-readable name
    pub name: &'static str,
}

/// Supported target languages, in the order offered to users
pub const SUPPORTED_LANGUAGES: &[TargetLanguage] = &[
    TargetLanguage { code: "en", name: "English" },
    TargetLanguage { code: "es", name: "Spanish" },
    TargetLanguage { code: "fr", name: "French" },
    TargetLanguage { code: "de", name: "German" },
    TargetLanguage { code: "it", name: "Italian" },
    TargetLanguage { code: "pt", name: "Portuguese" },
    TargetLanguage { code: "nl", name: "Dutch" },
    TargetLanguage { code: "ru", name: "Russian" },
    TargetLanguage { code: "ar", name: "Arabic" },
    TargetLanguage { code: "hi", name: "Hindi" },
    TargetLanguage { code: "ja", name: "Japanese" },
    TargetLanguage { code: "ko", name: "Korean" },
    TargetLanguage { code: "zh-CN", name: "Chinese (Simplified)" },
];

impl TargetLanguage {
    /// Look up a language by code or name, ignoring ASCII case
    pub fn from_code(code: &str) -> Result<Self, AppError> {
        let wanted = code.trim();
        SUPPORTED_LANGUAGES
            .iter()
            .find(|lang| {
                lang.code.eq_ignore_ascii_case(wanted) || lang.name.eq_ignore_ascii_case(wanted)
            })
            .copied()
            .ok_or_else(|| AppError::UnsupportedLanguage(code.to_string()))
    }
}

/// External translation service
///
/// The source language is always auto-detected by the service.
/// Implementations make exactly one call per `translate` and never retry.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target`
    ///
    /// # Errors
    /// * `AppError::TranslationServiceFailure` - The service could not produce a translation
    async fn translate(&self, text: &str, target: &TargetLanguage) -> Result<String, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_lookup() {
        assert_eq!(TargetLanguage::from_code("es").unwrap().name, "Spanish");
        assert_eq!(TargetLanguage::from_code("ZH-cn").unwrap().code, "zh-CN");
        assert_eq!(TargetLanguage::from_code("french").unwrap().code, "fr");
    }

    #[test]
    fn test_unknown_language() {
        match TargetLanguage::from_code("xx") {
            Err(AppError::UnsupportedLanguage(code)) => assert_eq!(code, "xx"),
            other => panic!("Expected UnsupportedLanguage error, got: {:?}", other),
        }
    }
}
