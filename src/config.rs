//! Process-wide configuration.
//!
//! Values come from command-line flags or the environment (a `.env` file is
//! loaded first by `main`). They are resolved once into an immutable
//! [`Settings`] that the server and CLI share behind an `Arc`.

use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;

use crate::ocr::{DEFAULT_MAX_CHARS, SAFETY_CAP};

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Default request timeout for document downloads.
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Default ceiling on downloaded document size.
pub const DEFAULT_MAX_DOWNLOAD_MB: usize = 100;

/// Settings shared by the `serve` and `extract` commands.
#[derive(Debug, Clone, Args)]
pub struct SettingsArgs {
    /// API key callers must send in the X-API-Key header
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Tesseract language code(s), e.g. "eng" or "eng+deu"
    #[arg(long, env = "OCR_LANGUAGE", default_value = "eng")]
    pub ocr_language: String,

    /// Timeout for document downloads, in seconds
    #[arg(long, env = "DOWNLOAD_TIMEOUT_SECS", default_value_t = DEFAULT_DOWNLOAD_TIMEOUT_SECS)]
    pub download_timeout_secs: u64,

    /// Maximum document size to download, in megabytes
    #[arg(long, env = "MAX_DOWNLOAD_MB", default_value_t = DEFAULT_MAX_DOWNLOAD_MB)]
    pub max_download_mb: usize,

    /// Maximum number of PDF pages OCR'd per document
    #[arg(long, env = "OCR_PAGE_CAP", default_value_t = SAFETY_CAP)]
    pub page_cap: u32,

    /// Character budget used when a request gives no max_chars
    #[arg(long, env = "DEFAULT_MAX_CHARS", default_value_t = DEFAULT_MAX_CHARS)]
    pub default_max_chars: usize,

    /// User agent for downloads ("impersonate" picks a random browser)
    #[arg(long, env = "DOWNLOAD_USER_AGENT")]
    pub user_agent: Option<String>,
}

/// Resolved, immutable configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// `None` means every authenticated request is rejected.
    pub api_key: Option<String>,
    pub ocr_language: String,
    pub download_timeout: Duration,
    pub max_download_bytes: usize,
    pub page_cap: u32,
    pub default_max_chars: usize,
    pub user_agent: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            ocr_language: "eng".to_string(),
            download_timeout: Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
            max_download_bytes: DEFAULT_MAX_DOWNLOAD_MB * 1024 * 1024,
            page_cap: SAFETY_CAP,
            default_max_chars: DEFAULT_MAX_CHARS,
            user_agent: None,
        }
    }
}

impl Settings {
    /// Validate and resolve command-line/environment values.
    pub fn from_args(args: &SettingsArgs) -> Result<Self> {
        if args.page_cap == 0 {
            bail!("OCR page cap must be at least 1");
        }
        if args.default_max_chars == 0 {
            bail!("Default max_chars must be at least 1");
        }
        if args.download_timeout_secs == 0 {
            bail!("Download timeout must be at least 1 second");
        }

        let api_key = args
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);
        if api_key.is_none() {
            tracing::warn!("API_KEY is not set; all document requests will be rejected");
        }

        Ok(Self {
            api_key,
            ocr_language: args.ocr_language.clone(),
            download_timeout: Duration::from_secs(args.download_timeout_secs),
            max_download_bytes: args.max_download_mb.saturating_mul(1024 * 1024),
            page_cap: args.page_cap,
            default_max_chars: args.default_max_chars,
            user_agent: args.user_agent.clone(),
        })
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Check a presented key against the configured one.
    pub fn api_key_matches(&self, presented: Option<&str>) -> bool {
        match (self.api_key.as_deref(), presented) {
            (Some(expected), Some(given)) => constant_time_eq(expected.as_bytes(), given.as_bytes()),
            _ => false,
        }
    }
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        settings: SettingsArgs,
    }

    fn parse(args: &[&str]) -> SettingsArgs {
        TestCli::parse_from(std::iter::once("doctext").chain(args.iter().copied())).settings
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_args(&parse(&["--api-key", "secret"])).unwrap();
        assert_eq!(settings.page_cap, SAFETY_CAP);
        assert_eq!(settings.default_max_chars, 1000);
        assert_eq!(settings.download_timeout, Duration::from_secs(30));
        assert_eq!(settings.max_download_bytes, 100 * 1024 * 1024);
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let settings = Settings::from_args(&parse(&["--api-key", "   "])).unwrap();
        assert_eq!(settings.api_key, None);
        assert!(!settings.api_key_matches(Some("")));
    }

    #[test]
    fn test_zero_page_cap_rejected() {
        assert!(Settings::from_args(&parse(&["--page-cap", "0"])).is_err());
    }

    #[test]
    fn test_api_key_matches() {
        let settings = Settings::default().with_api_key("secret");
        assert!(settings.api_key_matches(Some("secret")));
        assert!(!settings.api_key_matches(Some("secreT")));
        assert!(!settings.api_key_matches(Some("secret2")));
        assert!(!settings.api_key_matches(None));
        assert!(!Settings::default().api_key_matches(Some("secret")));
    }
}
