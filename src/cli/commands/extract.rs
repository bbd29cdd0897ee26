//! One-shot extraction from the command line.

use std::sync::Arc;

use anyhow::Context;

use crate::config::Settings;
use crate::http_client::HttpClient;
use crate::ocr::{OcrBudget, TesseractBackend};
use crate::services::DocumentProcessor;

/// Extract text from a URL or local file and print the result as JSON.
pub async fn cmd_extract(
    settings: Settings,
    source: &str,
    max_chars: Option<i64>,
) -> anyhow::Result<()> {
    let max_chars = max_chars.unwrap_or(settings.default_max_chars as i64);
    let budget = OcrBudget::new(max_chars)?;

    let bytes = if is_remote(source) {
        let mut builder =
            HttpClient::builder(settings.download_timeout, settings.max_download_bytes);
        if let Some(ref ua) = settings.user_agent {
            builder = builder.user_agent(ua);
        }
        builder.build()?.download(source).await?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("Failed to read {}", source))?
    };

    let backend = TesseractBackend::new(settings.ocr_language.clone());
    let processor = DocumentProcessor::new(Arc::new(backend)).with_page_cap(settings.page_cap);
    let extraction =
        tokio::task::spawn_blocking(move || processor.process(&bytes, budget)).await??;

    println!("{}", serde_json::to_string_pretty(&extraction)?);
    Ok(())
}

fn is_remote(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/a.pdf"));
        assert!(is_remote("HTTP://example.com/a.pdf"));
        assert!(!is_remote("./scans/a.pdf"));
        assert!(!is_remote("/tmp/https.pdf"));
    }

    #[tokio::test]
    async fn test_extract_local_text_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "local notes").unwrap();

        cmd_extract(Settings::default(), path.to_str().unwrap(), Some(50))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_extract_rejects_bad_budget() {
        let err = cmd_extract(Settings::default(), "unused.txt", Some(0))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("max_chars"));
    }
}
