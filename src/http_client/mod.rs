//! HTTP client for fetching documents by URL.
//!
//! Bodies are read chunk by chunk into memory with a hard size ceiling, and
//! the whole request (connect, headers, body) shares one timeout.

mod user_agent;

pub use user_agent::{resolve_user_agent, IMPERSONATE_USER_AGENTS, USER_AGENT};

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

/// Errors that can occur while downloading a document.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server responded with {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("Document exceeds the {limit_bytes} byte download limit")]
    TooLarge { limit_bytes: usize },
}

/// Builder for [`HttpClient`].
pub struct HttpClientBuilder {
    timeout: Duration,
    max_bytes: usize,
    user_agent: Option<String>,
    use_proxy: bool,
}

impl HttpClientBuilder {
    /// Set the user agent string (`"impersonate"` picks a random browser).
    pub fn user_agent(mut self, ua: &str) -> Self {
        self.user_agent = Some(ua.to_string());
        self
    }

    /// Ignore proxy settings from the environment.
    pub fn no_proxy(mut self) -> Self {
        self.use_proxy = false;
        self
    }

    pub fn build(self) -> Result<HttpClient, DownloadError> {
        let user_agent = resolve_user_agent(self.user_agent.as_deref());
        let mut builder = Client::builder()
            .user_agent(&user_agent)
            .timeout(self.timeout);
        if !self.use_proxy {
            builder = builder.no_proxy();
        }

        Ok(HttpClient {
            client: builder.build()?,
            max_bytes: self.max_bytes,
        })
    }
}

/// Document downloader.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_bytes: usize,
}

impl HttpClient {
    /// Create a builder with the request timeout and body size ceiling.
    pub fn builder(timeout: Duration, max_bytes: usize) -> HttpClientBuilder {
        HttpClientBuilder {
            timeout,
            max_bytes,
            user_agent: None,
            use_proxy: true,
        }
    }

    /// Only absolute http(s) URLs are fetched.
    pub fn parse_url(url: &str) -> Result<Url, DownloadError> {
        let parsed = Url::parse(url).map_err(|e| DownloadError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(DownloadError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }

    /// Download a document into memory.
    ///
    /// Non-2xx responses are errors. The body may be empty; callers decide
    /// what an empty document means.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let url = Self::parse_url(url)?;
        tracing::info!("Downloading {}", url);

        let mut response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                status,
                url: url.to_string(),
            });
        }

        let mut body = Vec::with_capacity(
            response
                .content_length()
                .map(|len| (len as usize).min(self.max_bytes))
                .unwrap_or(0),
        );
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(DownloadError::TooLarge {
                    limit_bytes: self.max_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(bytes = body.len(), "Download complete");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::get, Router};

    async fn upstream() -> String {
        let app = Router::new()
            .route("/hello", get(|| async { "hello world" }))
            .route("/big", get(|| async { "x".repeat(64) }))
            .route("/gone", get(|| async { (AxumStatus::NOT_FOUND, "nope") }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(max_bytes: usize) -> HttpClient {
        HttpClient::builder(Duration::from_secs(5), max_bytes)
            .no_proxy()
            .build()
            .unwrap()
    }

    #[test]
    fn test_parse_url_rejects_other_schemes() {
        assert!(HttpClient::parse_url("https://example.com/a.pdf").is_ok());
        assert!(matches!(
            HttpClient::parse_url("file:///etc/passwd"),
            Err(DownloadError::InvalidUrl { .. })
        ));
        assert!(matches!(
            HttpClient::parse_url("not a url"),
            Err(DownloadError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_download_body() {
        let base = upstream().await;
        let body = client(1024).download(&format!("{}/hello", base)).await.unwrap();
        assert_eq!(body, b"hello world");
    }

    #[tokio::test]
    async fn test_download_non_success_status() {
        let base = upstream().await;
        let err = client(1024)
            .download(&format!("{}/gone", base))
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Status { status, .. } if status == StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_download_size_limit() {
        let base = upstream().await;
        let err = client(16)
            .download(&format!("{}/big", base))
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::TooLarge { limit_bytes: 16 }));
    }
}
