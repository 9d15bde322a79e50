//! Extraction client — the single point of entry for all resume-service
//! calls. No other module talks to the service directly.
//!
//! The service contract: `POST {base}/upload-resume` with a multipart
//! `file` part returns `{ "json": <record>, "pdf_url": <relative path> }`;
//! `GET {base}/` answers 2xx when healthy; the generated PDF is fetched
//! from the resolved `pdf_url`.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::ExtractionResult;

const UPLOAD_PATH: &str = "/upload-resume";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed service response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Wire shape of a successful `POST /upload-resume` response. Only `json`
/// and `pdf_url` are guaranteed; the rest is advisory.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub json: Value,
    pub pdf_url: String,
    #[serde(default)]
    pub message: Option<String>,
    // Accepted from the service but unused by the workflow; the resolved
    // `pdf_url` already covers retrieval.
    #[allow(dead_code)]
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub processed_at: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// FastAPI-style error body.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    detail: Value,
}

/// The seam the workflow talks through; carried as
/// `Arc<dyn ResumeExtractor>` so the coordinator can be exercised against
/// a fake.
#[async_trait]
pub trait ResumeExtractor: Send + Sync {
    /// Transmits the file and returns the structured record plus the
    /// resolved address of the generated document.
    async fn process(
        &self,
        file_name: &str,
        bytes: Bytes,
    ) -> Result<ExtractionResult, ExtractionError>;

    /// Reachability probe against the service root.
    async fn probe(&self) -> Result<(), ExtractionError>;

    /// Fetches a generated document from its resolved address.
    async fn fetch_document(&self, url: &str) -> Result<Bytes, ExtractionError>;
}

/// HTTP client for the resume service.
///
/// The processing call carries no timeout: the service fronts a slow model
/// call, and the workflow waits for a response or a transport-level error.
#[derive(Clone)]
pub struct ExtractionClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ExtractionClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base(base_url.into()),
            api_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl ResumeExtractor for ExtractionClient {
    async fn process(
        &self,
        file_name: &str,
        bytes: Bytes,
    ) -> Result<ExtractionResult, ExtractionError> {
        let part = reqwest::multipart::Part::bytes(bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = format!("{}{}", self.base_url, UPLOAD_PATH);
        debug!("POST {url} ({file_name})");
        let response = self
            .authorized(self.client.post(&url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ExtractionError::Api {
                status: status.as_u16(),
                message: extract_detail(&body),
            });
        }

        let parsed: UploadResponse = serde_json::from_str(&body)?;
        if let Some(message) = &parsed.message {
            debug!("service: {message}");
        }
        Ok(ExtractionResult {
            record: parsed.json,
            document_url: resolve_document_url(&self.base_url, &parsed.pdf_url),
            original_filename: parsed.original_filename,
            processed_at: parsed.processed_at,
        })
    }

    async fn probe(&self) -> Result<(), ExtractionError> {
        let url = format!("{}/", self.base_url);
        debug!("GET {url}");
        let response = self.authorized(self.client.get(&url)).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ExtractionError::Api {
                status: status.as_u16(),
                message: extract_detail(&body),
            })
        }
    }

    async fn fetch_document(&self, url: &str) -> Result<Bytes, ExtractionError> {
        debug!("GET {url}");
        let response = self.authorized(self.client.get(url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Api {
                status: status.as_u16(),
                message: format!("generated document unavailable at {url}"),
            });
        }
        Ok(response.bytes().await?)
    }
}

/// Strips trailing slashes so joins stay single-slashed.
fn normalize_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}

/// Resolves the service's `pdf_url` against the base address. Absolute
/// references pass through untouched.
fn resolve_document_url(base: &str, pdf_url: &str) -> String {
    if pdf_url.starts_with("http://") || pdf_url.starts_with("https://") {
        return pdf_url.to_string();
    }
    if pdf_url.starts_with('/') {
        format!("{base}{pdf_url}")
    } else {
        format!("{base}/{pdf_url}")
    }
}

/// Pulls the `detail` field out of an error body, falling back to the raw
/// body when it is not JSON.
fn extract_detail(body: &str) -> String {
    serde_json::from_str::<ServiceErrorBody>(body)
        .map(|e| match e.detail {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_pdf_url_is_resolved_against_the_base() {
        assert_eq!(
            resolve_document_url("http://localhost:8000", "/static/out.pdf"),
            "http://localhost:8000/static/out.pdf"
        );
        assert_eq!(
            resolve_document_url("http://localhost:8000", "static/out.pdf"),
            "http://localhost:8000/static/out.pdf"
        );
    }

    #[test]
    fn absolute_pdf_url_passes_through() {
        assert_eq!(
            resolve_document_url("http://localhost:8000", "https://cdn.example.com/out.pdf"),
            "https://cdn.example.com/out.pdf"
        );
    }

    #[test]
    fn trailing_slashes_are_stripped_from_the_base() {
        assert_eq!(
            normalize_base("http://localhost:8000//".to_string()),
            "http://localhost:8000"
        );
        let client = ExtractionClient::new("http://localhost:8000/", None);
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn upload_response_parses_the_full_service_payload() {
        let body = r#"{
            "message": "Resume processed successfully",
            "json": {"first_name": "Ada", "work": []},
            "pdf_url": "/static/resume_20250101_abcd1234_cv.pdf",
            "download_url": "/download-pdf/resume_20250101_abcd1234_cv.pdf",
            "original_filename": "cv.pdf",
            "processed_at": "2025-01-01T12:00:00",
            "file_size": 53248
        }"#;
        let parsed: UploadResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.json["first_name"], "Ada");
        assert_eq!(parsed.pdf_url, "/static/resume_20250101_abcd1234_cv.pdf");
        assert_eq!(parsed.original_filename.as_deref(), Some("cv.pdf"));
        assert_eq!(parsed.file_size, Some(53248));
    }

    #[test]
    fn upload_response_requires_only_json_and_pdf_url() {
        let parsed: UploadResponse =
            serde_json::from_str(r#"{"json": {}, "pdf_url": "/static/x.pdf"}"#).unwrap();
        assert!(parsed.message.is_none());
        assert!(parsed.download_url.is_none());
    }

    #[test]
    fn error_detail_is_extracted_from_fastapi_bodies() {
        assert_eq!(
            extract_detail(r#"{"detail": "Only PDF files are allowed"}"#),
            "Only PDF files are allowed"
        );
        assert_eq!(
            extract_detail(r#"{"detail": {"code": 13}}"#),
            r#"{"code":13}"#
        );
        assert_eq!(extract_detail("upstream blew up"), "upstream blew up");
    }
}
