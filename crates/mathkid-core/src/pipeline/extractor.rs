//! Expression extraction stage

use super::ask;
use crate::config::{Config, PromptConfig};
use crate::error::Result;
use crate::input::ClassifiedInput;
use crate::llm::{FileHandle, GenerationRequest, GenerationService, Part};
use crate::prompts;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Name prefix of the temporary files staged for upload
pub const UPLOAD_FILE_PREFIX: &str = "mathkid-upload-";

/// Finds the single dominant expression in a typed question or an image
pub struct ExpressionExtractor {
    service: Arc<dyn GenerationService>,
    persona: Arc<PromptConfig>,
    text_model: String,
    vision_model: String,
    upload_dir: Option<PathBuf>,
}

impl ExpressionExtractor {
    pub fn new(
        service: Arc<dyn GenerationService>,
        persona: Arc<PromptConfig>,
        config: &Config,
    ) -> Self {
        Self {
            service,
            persona,
            text_model: config.service.text_model.clone(),
            vision_model: config.service.vision_model.clone(),
            upload_dir: config.pipeline.upload_dir.clone(),
        }
    }

    /// Extract the expression; the service's answer is returned trimmed and
    /// otherwise untouched, even when it is a refusal rather than a formula.
    pub async fn extract(&self, input: &ClassifiedInput) -> Result<String> {
        match input {
            ClassifiedInput::Text(text) => {
                tracing::info!("Input identified as text, extracting expression");
                ask(
                    self.service.as_ref(),
                    &self.text_model,
                    &self.persona,
                    prompts::text_extraction_prompt(text),
                )
                .await
            }
            ClassifiedInput::Image { bytes, mime_type } => {
                tracing::info!("Input identified as image, extracting expression");
                let handle = self.upload(bytes, mime_type).await?;

                let request = GenerationRequest::new(
                    self.vision_model.as_str(),
                    self.persona.system_instruction.as_str(),
                )
                .with_part(Part::File(handle))
                .with_text(prompts::IMAGE_EXTRACTION_PROMPT);

                let response = self.service.generate(request).await?;
                Ok(response.trim().to_string())
            }
        }
    }

    /// Stage the bytes in a uniquely named temp file, upload it, then remove
    /// it whatever the upload outcome. Dropping the future mid-upload also
    /// removes the file.
    async fn upload(&self, bytes: &[u8], mime_type: &str) -> Result<FileHandle> {
        let staged = self.stage(bytes, mime_type)?;
        let path = staged.path().to_path_buf();
        tracing::debug!("Staged upload at {}", path.display());

        let result = self.service.upload_file(&path, mime_type).await;

        if let Err(e) = staged.close() {
            tracing::warn!(
                "Failed to remove temporary upload file {}: {}",
                path.display(),
                e
            );
        }

        result
    }

    fn stage(&self, bytes: &[u8], mime_type: &str) -> Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder
            .prefix(UPLOAD_FILE_PREFIX)
            .suffix(extension_for(mime_type));

        let mut file = match &self.upload_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(bytes)?;
        file.flush()?;
        Ok(file)
    }
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => ".jpg",
        _ => ".png",
    }
}
