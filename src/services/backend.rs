use crate::models::{HealthStatus, SearchRequest, SearchResponse};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

/// Errors that can occur when talking to the matcher backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx response; the detail is the response body text, verbatim.
    #[error("backend returned {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid response format: {0}")]
    InvalidResponse(String),
}

/// Matcher backend client
///
/// Wraps the two calls the client ever makes:
/// - GET /health, fetched once at startup for the connectivity indicator
/// - POST /search, one multipart request per submitted search
///
/// No retries and no cancellation; a search is a single request/response.
pub struct MatcherClient {
    base_url: String,
    client: Client,
}

impl MatcherClient {
    /// Create a new client for the given API base URL.
    pub fn new(base_url: String, timeout_secs: Option<u64>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.unwrap_or(30)))
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the backend status object. The shape is opaque; any failure
    /// here just means "unreachable" to the caller.
    pub async fn health(&self) -> Result<HealthStatus, BackendError> {
        let url = format!("{}/health", self.base_url.trim_end_matches('/'));

        tracing::debug!("Fetching backend health from: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = read_body(response).await;
            return Err(BackendError::Api { status, detail });
        }

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse status: {}", e)))
    }

    /// Submit one similarity search as a multipart form.
    ///
    /// The form carries the optional binary `file` part, the optional
    /// `image_url` text part (both when both are set) and the two numeric
    /// parameters as text parts.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, BackendError> {
        request
            .validate()
            .map_err(|e| BackendError::InvalidRequest(e.to_string()))?;
        if !request.has_query() {
            return Err(BackendError::InvalidRequest(
                "provide an image file or an image URL".to_string(),
            ));
        }

        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let form = build_search_form(request)?;

        tracing::debug!(
            "Submitting search to {} (file: {}, url: {}, top_k: {}, min_similarity: {})",
            url,
            request.file.is_some(),
            request.image_url.is_some(),
            request.top_k,
            request.min_similarity
        );

        let response = self.client.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = read_body(response).await;
            tracing::debug!("Search failed: {} - {}", status, detail);
            return Err(BackendError::Api { status, detail });
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse results: {}", e)))
    }
}

async fn read_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read body".to_string())
}

fn build_search_form(request: &SearchRequest) -> Result<Form, BackendError> {
    let mut form = Form::new()
        .text("top_k", request.top_k.to_string())
        .text("min_similarity", request.min_similarity.to_string());

    if let Some(file) = &request.file {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(guess_mime(&file.file_name))?;
        form = form.part("file", part);
    }

    if let Some(image_url) = &request.image_url {
        form = form.text("image_url", image_url.clone());
    }

    Ok(form)
}

/// Content type from the file extension; the backend sniffs the bytes
/// anyway, so octet-stream is a safe fallback.
fn guess_mime(file_name: &str) -> &'static str {
    let ext = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}
