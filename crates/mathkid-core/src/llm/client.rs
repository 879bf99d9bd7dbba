//! HTTP client for the Gemini generative-language REST API

use super::{FileHandle, GenerationRequest, GenerationService, Part};
use crate::config::{Config, ServiceConfig};
use crate::error::{MathKidError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const API_KEY_HEADER: &str = "x-goog-api-key";
const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

/// API metrics for monitoring
#[derive(Debug, Default)]
pub struct APIMetrics {
    pub total_requests: AtomicU64,
    pub total_errors: AtomicU64,
    pub total_uploads: AtomicU64,
    pub total_latency_ms: AtomicU64,
}

/// Snapshot of API metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub total_errors: u64,
    pub total_uploads: u64,
    pub avg_latency_ms: f64,
}

/// Gemini client: `generateContent` plus the Files API upload
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    default_model: String,
    metrics: Arc<APIMetrics>,
}

impl GeminiClient {
    /// Create client from configuration; fails when no API key is configured
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("mathkid/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MathKidError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            default_model: config.text_model.clone(),
            metrics: Arc::new(APIMetrics::default()),
        })
    }

    /// Create from the config file and environment variables
    pub fn from_env() -> Result<Self> {
        let config = Config::load()?;
        Self::new(&config.service)
    }

    /// Get current API metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        let total = self.metrics.total_requests.load(Ordering::Relaxed);
        MetricsSnapshot {
            total_requests: total,
            total_errors: self.metrics.total_errors.load(Ordering::Relaxed),
            total_uploads: self.metrics.total_uploads.load(Ordering::Relaxed),
            avg_latency_ms: if total > 0 {
                self.metrics.total_latency_ms.load(Ordering::Relaxed) as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    fn record_latency(&self, start: Instant) {
        let elapsed = start.elapsed().as_millis() as u64;
        self.metrics
            .total_latency_ms
            .fetch_add(elapsed, Ordering::Relaxed);
    }

    fn record_outcome<T>(&self, result: &Result<T>) {
        if result.is_err() {
            self.metrics.total_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    async fn send_generate(&self, request: &GenerationRequest) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, request.model
        );
        let body = GenerateContentRequest::from_request(request);

        tracing::debug!(
            "generateContent: model={} parts={}",
            request.model,
            request.parts.len()
        );

        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response, "generateContent").await?;

        let parsed: GenerateContentResponse = response.json().await?;
        parsed.into_text()
    }

    async fn start_upload_session(
        &self,
        display_name: &str,
        mime_type: &str,
        len: usize,
    ) -> Result<String> {
        let url = format!("{}/upload/v1beta/files", self.base_url);
        let metadata = serde_json::json!({ "file": { "display_name": display_name } });

        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", len.to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&metadata)
            .send()
            .await?;
        let response = ensure_success(response, "upload start").await?;

        response
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| MathKidError::service("upload session URL missing from response"))
    }

    async fn send_upload(&self, path: &Path, mime_type: &str) -> Result<FileHandle> {
        let bytes = tokio::fs::read(path).await?;
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        tracing::debug!("Uploading {} ({} bytes, {})", display_name, bytes.len(), mime_type);

        let upload_url = self
            .start_upload_session(&display_name, mime_type, bytes.len())
            .await?;

        let response = self
            .http_client
            .post(&upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .await?;
        let response = ensure_success(response, "upload finalize").await?;

        let uploaded: UploadResponse = response.json().await?;
        tracing::debug!("Uploaded file handle {}", uploaded.file.name);
        Ok(uploaded.file)
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let start = Instant::now();
        self.metrics.total_requests.fetch_add(1, Ordering::Relaxed);

        let result = self.send_generate(&request).await;
        self.record_latency(start);
        self.record_outcome(&result);

        if let Ok(text) = &result {
            tracing::debug!(
                "generateContent finished in {}ms ({} chars)",
                start.elapsed().as_millis(),
                text.len()
            );
        }
        result
    }

    async fn upload_file(&self, path: &Path, mime_type: &str) -> Result<FileHandle> {
        self.metrics.total_uploads.fetch_add(1, Ordering::Relaxed);

        let result = self.send_upload(path, mime_type).await;
        self.record_outcome(&result);
        result
    }

    fn model_name(&self) -> &str {
        &self.default_model
    }
}

async fn ensure_success(response: reqwest::Response, call: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(MathKidError::service(format!(
        "{} rejected (HTTP {}): {}",
        call,
        status,
        error_detail(&body)
    )))
}

/// Prefer the `error.message` field of a Google API error body
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: WireContent<'a>,
    contents: Vec<WireContent<'a>>,
}

#[derive(Serialize)]
struct WireContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<WirePart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum WirePart<'a> {
    Text {
        text: &'a str,
    },
    File {
        #[serde(rename = "fileData")]
        file_data: WireFileData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireFileData<'a> {
    mime_type: &'a str,
    file_uri: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_request(request: &'a GenerationRequest) -> Self {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => WirePart::Text {
                    text: text.as_str(),
                },
                Part::File(handle) => WirePart::File {
                    file_data: WireFileData {
                        mime_type: &handle.mime_type,
                        file_uri: &handle.uri,
                    },
                },
            })
            .collect();

        Self {
            system_instruction: WireContent {
                role: None,
                parts: vec![WirePart::Text {
                    text: &request.system_instruction,
                }],
            },
            contents: vec![WireContent {
                role: Some("user"),
                parts,
            }],
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    file: FileHandle,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Result<String> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(MathKidError::service(match block_reason {
                Some(reason) => format!("prompt blocked by the service: {}", reason),
                None => "response contained no candidates".to_string(),
            }));
        };

        // Blank text is a valid answer; only a candidate without text parts is an error
        let texts: Vec<String> = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if texts.is_empty() {
            return Err(MathKidError::service(format!(
                "response contained no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(texts.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let request = GenerationRequest::new("gemini-2.0-flash", "Be kind")
            .with_part(Part::File(FileHandle {
                name: "files/abc".to_string(),
                uri: "https://example.test/files/abc".to_string(),
                mime_type: "image/png".to_string(),
            }))
            .with_text("Only the expression.");

        let json = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Be kind");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(
            json["contents"][0]["parts"][0]["fileData"]["fileUri"],
            "https://example.test/files/abc"
        );
        assert_eq!(
            json["contents"][0]["parts"][0]["fileData"]["mimeType"],
            "image/png"
        );
        assert_eq!(json["contents"][0]["parts"][1]["text"], "Only the expression.");
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"2 + "},{"text":"2 * 3"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "2 + 2 * 3");
    }

    #[test]
    fn test_blocked_prompt_is_service_error() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        let err = response.into_text().unwrap_err();
        assert!(err.is_service());
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_candidate_without_text_is_service_error() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#).unwrap();
        let err = response.into_text().unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_blank_text_is_returned_as_is() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"  \n"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "  \n");
    }

    #[test]
    fn test_error_detail_prefers_message() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(error_detail(body), "Resource has been exhausted");
        assert_eq!(error_detail("  plain failure \n"), "plain failure");
    }

    #[test]
    fn test_new_requires_api_key() {
        let err = GeminiClient::new(&ServiceConfig::default()).err().unwrap();
        assert!(matches!(err, MathKidError::Config(_)));
    }
}
