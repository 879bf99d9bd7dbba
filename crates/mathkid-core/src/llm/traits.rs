//! Generation service trait definitions

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Remote generative-language service (text + vision + file upload)
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate content and return the response text
    async fn generate(&self, request: GenerationRequest) -> Result<String>;

    /// Upload a local file and return a handle usable as a content part
    async fn upload_file(&self, path: &Path, mime_type: &str) -> Result<FileHandle>;

    /// Get default model name
    fn model_name(&self) -> &str;
}

/// Service-side reference to an uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHandle {
    /// Resource name, e.g. `files/abc-123`
    pub name: String,
    pub uri: String,
    pub mime_type: String,
}

/// One piece of request content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    File(FileHandle),
}

impl Part {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::File(_) => None,
        }
    }
}

/// Content generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub model: String,
    pub parts: Vec<Part>,
    /// Persona attached to the call
    pub system_instruction: String,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            parts: Vec::new(),
            system_instruction: system_instruction.into(),
        }
    }

    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_part(Part::Text(text.into()))
    }

    /// Text parts joined with newlines
    pub fn prompt_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
