//! Command-line document translator
//!
//! Usage: `translate_docx <input.docx> <language> [output_dir]`
//!
//! Runs the same extract → translate → rebuild pipeline as the
//! `/api/translate` endpoint and writes the result next to the input
//! (or into `output_dir`). Requires `GEMINI_API_KEY`.

use agent_dashboard_backend::config::Config;
use agent_dashboard_backend::translation::{
    translate_document, GeminiTranslator, TargetLanguage, SUPPORTED_LANGUAGES,
};
use anyhow::{bail, Context};
use std::env;
use std::path::PathBuf;

fn usage() -> String {
    let codes: Vec<&str> = SUPPORTED_LANGUAGES.iter().map(|l| l.code).collect();
    format!(
        "Usage: translate_docx <input.docx> <language> [output_dir]\nLanguages: {}",
        codes.join(", ")
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 || args.len() > 3 {
        bail!(usage());
    }

    let input = PathBuf::from(&args[0]);
    let target = TargetLanguage::from_code(&args[1])?;
    let output_dir = match args.get(2) {
        Some(dir) => PathBuf::from(dir),
        None => input
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let bytes = tokio::fs::read(&input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let config = Config::from_env();
    let translator = GeminiTranslator::new(&config.translation)?;

    println!(
        "Translating {} into {} ({})...",
        input.display(),
        target.name,
        target.code
    );
    let document = translate_document(Some(bytes.as_slice()), &target, &translator).await?;

    tokio::fs::create_dir_all(&output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let output = output_dir.join(&document.file_name);
    tokio::fs::write(&output, &document.bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "✓ {} paragraphs translated → {}",
        document.paragraph_count,
        output.display()
    );
    Ok(())
}
