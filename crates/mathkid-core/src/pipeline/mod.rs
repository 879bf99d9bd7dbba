//! Three-stage prompt pipeline
//!
//! classify → extract expression → (visual example ∥ definitive answer)

mod answer;
mod example;
mod extractor;
mod orchestrator;

pub use answer::AnswerResolver;
pub use example::ExampleGenerator;
pub use extractor::{ExpressionExtractor, UPLOAD_FILE_PREFIX};
pub use orchestrator::{NoopObserver, Pipeline, PipelineResult, Stage, StageObserver};

use crate::config::PromptConfig;
use crate::error::Result;
use crate::llm::{GenerationRequest, GenerationService};

/// Single text prompt with the shared persona; the response is trimmed
async fn ask(
    service: &dyn GenerationService,
    model: &str,
    persona: &PromptConfig,
    prompt: String,
) -> Result<String> {
    let request = GenerationRequest::new(model, persona.system_instruction.as_str()).with_text(prompt);
    let response = service.generate(request).await?;
    Ok(response.trim().to_string())
}
