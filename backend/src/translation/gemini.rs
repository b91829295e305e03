//! Gemini-backed translator
//!
//! Direct HTTP client for the Gemini `generateContent` endpoint. Each call
//! translates one paragraph; there is no batching and no retry.

use super::gemini_types::{
    GeminiApiRequest, GeminiApiResponse, GenerationConfig, RequestContent, RequestPart,
};
use super::{TargetLanguage, Translator};
use crate::config::TranslationConfig;
use crate::error::AppError;
use async_trait::async_trait;
use std::time::Duration;

/// Translator that prompts a Gemini model
#[derive(Clone)]
pub struct GeminiTranslator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiTranslator {
    /// Create a translator from configuration
    ///
    /// The HTTP client is shared across calls (connection pooling) and
    /// carries the configured per-request timeout.
    pub fn new(config: &TranslationConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Build the translation prompt for one paragraph
pub fn translation_prompt(text: &str, target: &TargetLanguage) -> String {
    format!(
        "Translate the following text into {} (language code \"{}\"). \
         Detect the source language automatically. \
         Reply with the translated text only, without quotes, notes or explanations.\n\n{}",
        target.name, target.code, text
    )
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn translate(&self, text: &str, target: &TargetLanguage) -> Result<String, AppError> {
        let prompt = translation_prompt(text, target);
        let translated = call_gemini_api(
            &self.client,
            &self.base_url,
            &self.api_key,
            &self.model,
            &prompt,
        )
        .await
        .map_err(AppError::TranslationServiceFailure)?;

        Ok(translated.trim().to_string())
    }
}

/// Call the Gemini API with a prompt and return the first candidate's text
///
/// # Returns
/// * `Ok(String)` - The text content from the API response
/// * `Err(String)` - Description of what went wrong (missing key, HTTP failure,
///   error status, unparsable body, blocked prompt, empty answer)
async fn call_gemini_api(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    model: &str,
    prompt: &str,
) -> Result<String, String> {
    if api_key.is_empty() {
        return Err("API key is empty (set GEMINI_API_KEY)".to_string());
    }

    let url = format!("{}/models/{}:generateContent", base_url, model);

    let request_body = GeminiApiRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart {
                text: prompt.to_string(),
            }],
        }],
        generation_config: Some(GenerationConfig {
            temperature: Some(0.0),
            response_mime_type: Some("text/plain".to_string()),
        }),
    };

    tracing::debug!(
        url = %url,
        model = %model,
        prompt_len = prompt.len(),
        "Calling Gemini API"
    );

    let response = client
        .post(&url)
        .query(&[("key", api_key)])
        .json(&request_body)
        .send()
        .await
        .map_err(|e| format!("Failed to send HTTP request to Gemini API: {}", e))?;

    let status = response.status();
    if !status.is_success() {
        let status_code = status.as_u16();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error body".to_string());

        tracing::error!(
            status_code = status_code,
            error_body = %error_body,
            "Gemini API returned error status"
        );

        if status_code == 429 {
            return Err(format!(
                "Gemini API rate limit exceeded (HTTP {}): {}",
                status_code, error_body
            ));
        }

        return Err(format!(
            "Gemini API returned error status {}: {}",
            status_code, error_body
        ));
    }

    let response_body = response
        .text()
        .await
        .map_err(|e| format!("Failed to read response body from Gemini API: {}", e))?;

    let parsed: GeminiApiResponse = serde_json::from_str(&response_body).map_err(|e| {
        format!(
            "Failed to parse JSON response from Gemini API: {} - Response body: {}",
            e, response_body
        )
    })?;

    if let Some(reason) = parsed
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_ref())
    {
        return Err(format!("Gemini API blocked the prompt: {}", reason));
    }

    let candidate = parsed
        .candidates
        .first()
        .ok_or_else(|| "Gemini API response contains no candidates".to_string())?;

    let text: String = candidate
        .content
        .parts
        .iter()
        .map(|part| part.text.as_str())
        .collect();

    if text.trim().is_empty() {
        return Err(format!(
            "Gemini API response text is empty (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        ));
    }

    tracing::debug!(
        response_len = text.len(),
        "Successfully received response from Gemini API"
    );

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serial_test::serial;

    const SPANISH: TargetLanguage = TargetLanguage {
        code: "es",
        name: "Spanish",
    };

    fn translator_for(base_url: &str, api_key: &str) -> GeminiTranslator {
        GeminiTranslator::new(&TranslationConfig {
            api_key: api_key.to_string(),
            api_base_url: base_url.to_string(),
            timeout_secs: 5,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_translate_empty_api_key() {
        // No server: the call must fail before any request is made
        let translator = translator_for("http://127.0.0.1:9", "");
        assert!(!translator.has_api_key());
        let result = translator.translate("Hello", &SPANISH).await;
        match result {
            Err(AppError::TranslationServiceFailure(msg)) => {
                assert!(msg.contains("API key is empty"))
            }
            other => panic!("Expected TranslationServiceFailure, got: {:?}", other),
        }
    }

    #[test]
    fn test_prompt_names_target_language() {
        let prompt = translation_prompt("Good morning", &SPANISH);
        assert!(prompt.contains("Spanish"));
        assert!(prompt.contains("\"es\""));
        assert!(prompt.ends_with("Good morning"));
    }

    #[tokio::test]
    #[serial]
    async fn test_translate_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::AllOf(vec![Matcher::UrlEncoded(
                "key".into(),
                "test-key".into(),
            )]))
            .match_header("content-type", "application/json")
            .match_body(Matcher::Regex("Good morning".to_string()))
            .with_status(200)
            .with_body(
                r#"{
                    "candidates": [{
                        "content": {
                            "parts": [{"text": "Buenos días\n"}],
                            "role": "model"
                        },
                        "finishReason": "STOP"
                    }]
                }"#,
            )
            .create_async()
            .await;

        let translator = translator_for(&server.url(), "test-key");
        let result = translator.translate("Good morning", &SPANISH).await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), "Buenos días");
    }

    #[tokio::test]
    #[serial]
    async fn test_translate_empty_candidates() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let translator = translator_for(&server.url(), "test-key");
        let result = translator.translate("Hello", &SPANISH).await;

        mock.assert_async().await;
        assert!(result.unwrap_err().to_string().contains("no candidates"));
    }

    #[tokio::test]
    #[serial]
    async fn test_translate_blocked_prompt() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates": [], "promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let translator = translator_for(&server.url(), "test-key");
        let error_msg = translator
            .translate("Hello", &SPANISH)
            .await
            .unwrap_err()
            .to_string();

        mock.assert_async().await;
        assert!(
            error_msg.contains("blocked the prompt"),
            "Error message should contain 'blocked the prompt', got: {}",
            error_msg
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_translate_rate_limit_is_not_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"error": "Rate limit exceeded"}"#)
            .expect(1)
            .create_async()
            .await;

        let translator = translator_for(&server.url(), "test-key");
        let result = translator.translate("Hello", &SPANISH).await;

        mock.assert_async().await;
        let error_msg = result.unwrap_err().to_string();
        assert!(error_msg.contains("rate limit") || error_msg.contains("429"));
    }

    #[tokio::test]
    #[serial]
    async fn test_translate_invalid_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("This is not JSON")
            .create_async()
            .await;

        let translator = translator_for(&server.url(), "test-key");
        let result = translator.translate("Hello", &SPANISH).await;

        mock.assert_async().await;
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse JSON"));
    }
}
