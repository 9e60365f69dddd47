//! Completion client

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::{
    CompletionOutcome, CompletionRequest,
    error::{Error, Result},
    response::{decode_body, resolve},
};

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5009/api";

/// Environment variable consulted by [`HttpCompletionClient::from_env`]
pub const BASE_URL_ENV_VAR: &str = "BANTER_API_BASE_URL";

/// Anything that can turn a prompt into a completion outcome.
///
/// Implementations must always resolve; failures are reported as
/// [`CompletionOutcome::Failure`].
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> CompletionOutcome;
}

/// Client for `POST <base>/completions`
#[derive(Debug, Clone)]
pub struct HttpCompletionClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCompletionClient {
    /// Create a client for the given base URL (e.g. `http://host:5009/api`)
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(&base_url.into())?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    /// Create from `BANTER_API_BASE_URL`, falling back to [`DEFAULT_BASE_URL`]
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Use a preconfigured reqwest client
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Configured base URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full completions endpoint URL
    pub fn endpoint(&self) -> String {
        format!("{}/completions", self.base_url)
    }

    async fn request(&self, prompt: &str) -> Result<CompletionOutcome> {
        let url = self.endpoint();
        tracing::debug!("POST {} ({} chars)", url, prompt.chars().count());

        let response = self
            .client
            .post(&url)
            .json(&CompletionRequest::new(prompt))
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        let payload = decode_body(content_type.as_deref(), &body)?;
        Ok(resolve(status.as_u16(), status.is_success(), &payload))
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, prompt: &str) -> CompletionOutcome {
        let outcome = match self.request(prompt).await {
            Ok(outcome) => outcome,
            Err(e) => e.into(),
        };
        if let CompletionOutcome::Failure { error } = &outcome {
            tracing::warn!("Completion failed: {}", error);
        }
        outcome
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidConfig("base URL is empty".to_string()));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::InvalidConfig(format!(
            "base URL must start with http:// or https://, got {}",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Usage;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Serve exactly one canned HTTP response; the join handle yields the raw request.
    async fn serve_once(
        status_line: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut response = format!("HTTP/1.1 {}\r\n", status_line);
        if let Some(ct) = content_type {
            response.push_str(&format!("Content-Type: {}\r\n", ct));
        }
        response.push_str(&format!(
            "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        ));

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (format!("http://{}/api/", addr), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= pos + 4 + len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn test_client(base_url: &str) -> HttpCompletionClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpCompletionClient::new(base_url).unwrap().with_client(http)
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpCompletionClient::new("http://localhost:5009/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5009/api");
        assert_eq!(client.endpoint(), "http://localhost:5009/api/completions");
    }

    #[test]
    fn test_base_url_rejects_empty_and_schemeless() {
        assert!(matches!(
            HttpCompletionClient::new("  "),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            HttpCompletionClient::new("localhost:5009/api"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_complete_success_posts_prompt() {
        let (base, server) = serve_once(
            "200 OK",
            Some("application/json"),
            r#"{"response":"Echo: Hello","usage":{"prompt_chars":5,"response_chars":11}}"#,
        )
        .await;

        let outcome = test_client(&base).complete("Hello").await;
        assert_eq!(
            outcome,
            CompletionOutcome::Success {
                response: "Echo: Hello".into(),
                usage: Some(Usage {
                    prompt_chars: 5,
                    response_chars: 11
                }),
            }
        );

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/completions "), "got: {}", request);
        assert!(request.to_lowercase().contains("content-type: application/json"));
        assert!(request.ends_with(r#"{"prompt":"Hello"}"#), "got: {}", request);
    }

    #[tokio::test]
    async fn test_complete_error_status_with_json_error() {
        let (base, _server) = serve_once(
            "400 Bad Request",
            Some("application/json"),
            r#"{"error":"'prompt' is required"}"#,
        )
        .await;

        let outcome = test_client(&base).complete("x").await;
        assert_eq!(outcome, CompletionOutcome::failure("'prompt' is required"));
    }

    #[tokio::test]
    async fn test_complete_error_status_plain_text() {
        let (base, _server) =
            serve_once("502 Bad Gateway", Some("text/html"), "<h1>Bad Gateway</h1>").await;

        let outcome = test_client(&base).complete("x").await;
        assert_eq!(outcome, CompletionOutcome::failure("<h1>Bad Gateway</h1>"));
    }

    #[tokio::test]
    async fn test_complete_error_status_empty_body() {
        let (base, _server) = serve_once("500 Internal Server Error", None, "").await;

        let outcome = test_client(&base).complete("x").await;
        assert_eq!(
            outcome,
            CompletionOutcome::failure(crate::response::UNKNOWN_FORMAT)
        );
    }

    #[tokio::test]
    async fn test_complete_error_payload_on_ok_status() {
        let (base, _server) = serve_once(
            "200 OK",
            Some("application/json"),
            r#"{"error":"content filtered"}"#,
        )
        .await;

        let outcome = test_client(&base).complete("x").await;
        assert_eq!(outcome, CompletionOutcome::failure("content filtered"));
    }

    #[tokio::test]
    async fn test_complete_text_body_that_is_json() {
        let (base, _server) =
            serve_once("200 OK", Some("text/plain"), r#"{"response":"plain but json"}"#).await;

        let outcome = test_client(&base).complete("x").await;
        assert_eq!(outcome, CompletionOutcome::success("plain but json"));
    }

    #[tokio::test]
    async fn test_complete_declared_json_unparseable() {
        let (base, _server) = serve_once("200 OK", Some("application/json"), "not json").await;

        let outcome = test_client(&base).complete("x").await;
        assert!(!outcome.is_success());
        assert!(!outcome.error().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_complete_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let outcome = test_client(&format!("http://{}/api", addr))
            .complete("Hello")
            .await;
        let error = outcome.error().expect("transport failure should be an error outcome");
        assert!(!error.is_empty());
    }
}
