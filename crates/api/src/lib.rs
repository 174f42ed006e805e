//! Prediction service client.
//!
//! This module provides a lightweight client for the student performance
//! prediction service. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Resolving the base URL from explicit configuration or `GRADECAST_API_BASE`
//! - Submitting a feature payload to `POST /predict`
//! - Mapping failures into the display strings the UI shows verbatim
//!
//! The primary entry point is [`PredictClient`]. Resolve a [`ClientConfig`]
//! first, then create an instance via [`PredictClient::new`] and call
//! [`PredictClient::predict`].

use std::env;

use anyhow::{Context, Result, anyhow};
use gradecast_types::{PredictionRequest, PredictionResult};
use reqwest::{Client, StatusCode, Url, header};
use thiserror::Error;
use tracing::debug;

/// Environment variable consulted when no base URL is passed explicitly.
pub const BASE_URL_ENV: &str = "GRADECAST_API_BASE";
/// Default base URL for local development against the reference service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Hostnames allowed to use plain HTTP; everything else must be HTTPS.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Resolved client configuration.
///
/// The base URL is injected at construction rather than read as an ambient
/// global inside the client, so tests and the CLI can point the client
/// anywhere without touching the process environment.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    /// Resolve the base URL from an explicit override, then the
    /// `GRADECAST_API_BASE` environment variable, then the default.
    ///
    /// The chosen URL is validated before it is accepted: any scheme is fine
    /// for localhost, everything else must be HTTPS.
    pub fn resolve(override_url: Option<String>) -> Result<Self> {
        let base_url = override_url
            .or_else(|| env::var(BASE_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let base_url = base_url.trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;
        Ok(Self { base_url })
    }
}

/// Failure of a single prediction request.
///
/// The `Display` impl of each variant is the exact string the UI renders:
/// a service-supplied detail message is used verbatim, everything else is a
/// stringified description of the underlying failure.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Connection, DNS, or timeout failure from the transport stack.
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-2xx response. `detail` is the service's message when the body
    /// carried one, otherwise `HTTP <status>: <body>`.
    #[error("{detail}")]
    Service { status: u16, detail: String },

    /// 2xx response whose body was not valid JSON at all.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for the prediction API.
///
/// Requests are built against the validated base URL with a consistent
/// User-Agent and Accept header.
pub struct PredictClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
}

impl PredictClient {
    /// Construct a [`PredictClient`] from a resolved configuration.
    ///
    /// No timeout is layered on top of the transport default, and nothing
    /// here retries; each call is a single attempt.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .build()
            .context("build http client")?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http,
            user_agent: format!("gradecast/0.1; {}", env::consts::OS),
        })
    }

    /// Submit a feature payload to `POST /predict`.
    ///
    /// On success the decoded body is returned; on failure the error's
    /// display string is what the UI should show. The call is awaited to
    /// completion and is never retried or cancelled.
    pub async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, PredictError> {
        let url = format!("{}/predict", self.base_url);
        debug!(%url, "submitting prediction request");

        let resp = self
            .http
            .post(url)
            .header(header::USER_AGENT, &self.user_agent)
            .json(request)
            .send()
            .await
            .map_err(|e| PredictError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(PredictError::Service {
                status: status.as_u16(),
                detail: extract_detail(status, &text),
            });
        }

        serde_json::from_str(&text).map_err(|e| PredictError::Decode(e.to_string()))
    }

    /// Probe `GET /health` and report whether the service answered `ok`.
    pub async fn health(&self) -> Result<bool, PredictError> {
        let url = format!("{}/health", self.base_url);
        debug!(%url, "probing service health");

        let resp = self
            .http
            .get(url)
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| PredictError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(PredictError::Service {
                status: status.as_u16(),
                detail: extract_detail(status, &text),
            });
        }

        let body: serde_json::Value = serde_json::from_str(&text).map_err(|e| PredictError::Decode(e.to_string()))?;
        Ok(body.get("ok").and_then(serde_json::Value::as_bool).unwrap_or(false))
    }
}

/// Pull the human-readable message out of an error response body.
///
/// The service reports failures as `{"detail": "..."}`; that string is used
/// verbatim when present. Anything else falls back to a generic
/// `HTTP <status>: <body>` description.
fn extract_detail(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}: {}", status.as_u16(), body.trim()))
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
fn validate_base_url(base: &str) -> Result<()> {
    let parsed = Url::parse(base).map_err(|e| anyhow!("Invalid {} URL '{}': {}", BASE_URL_ENV, base, e))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow!("{} must include a host", BASE_URL_ENV))?;

    // Local development allowances: localhost/127.0.0.1 with any scheme.
    if LOCALHOST_DOMAINS.iter().any(|&allowed| host.eq_ignore_ascii_case(allowed)) {
        return Ok(());
    }

    if parsed.scheme() != "https" {
        return Err(anyhow!(
            "{} must use https for non-localhost hosts; got '{}://'",
            BASE_URL_ENV,
            parsed.scheme()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_base_urls_allow_plain_http() {
        assert!(validate_base_url("http://localhost:8000").is_ok());
        assert!(validate_base_url("http://127.0.0.1:8000").is_ok());
    }

    #[test]
    fn remote_base_urls_require_https() {
        assert!(validate_base_url("https://predict.example.com").is_ok());
        assert!(validate_base_url("http://predict.example.com").is_err());
    }

    #[test]
    fn malformed_base_urls_are_rejected() {
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn resolve_prefers_the_explicit_override() {
        let config = ClientConfig::resolve(Some("http://localhost:9999/".into())).unwrap();
        assert_eq!(config.base_url, "http://localhost:9999");
    }

    #[test]
    fn detail_field_is_used_verbatim() {
        let body = r#"{"detail": "feature X out of range"}"#;
        let msg = extract_detail(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(msg, "feature X out of range");
    }

    #[test]
    fn missing_detail_falls_back_to_status_and_body() {
        let msg = extract_detail(StatusCode::BAD_GATEWAY, "upstream died");
        assert_eq!(msg, "HTTP 502: upstream died");
    }

    #[test]
    fn non_string_detail_falls_back_too() {
        let msg = extract_detail(StatusCode::BAD_REQUEST, r#"{"detail": 42}"#);
        assert_eq!(msg, r#"HTTP 400: {"detail": 42}"#);
    }

    #[test]
    fn service_error_displays_the_detail_only() {
        let err = PredictError::Service {
            status: 422,
            detail: "Inference failed: bad column".into(),
        };
        assert_eq!(err.to_string(), "Inference failed: bad column");
    }

    #[tokio::test]
    async fn transport_failure_yields_a_non_empty_display_string() {
        // Nothing listens on this port; the connect error is stringified.
        let config = ClientConfig {
            base_url: "http://127.0.0.1:1".into(),
        };
        let client = PredictClient::new(&config).unwrap();
        let err = client
            .predict(&PredictionRequest::from_form(&gradecast_types::FormState::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, PredictError::Transport(_)));
        assert!(!err.to_string().is_empty());
    }
}
