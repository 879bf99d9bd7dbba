//! Visual example stage

use super::ask;
use crate::config::PromptConfig;
use crate::error::Result;
use crate::llm::GenerationService;
use crate::prompts;
use std::sync::Arc;

/// Produces a minimal-text, symbol-first example of an expression
pub struct ExampleGenerator {
    service: Arc<dyn GenerationService>,
    persona: Arc<PromptConfig>,
    model: String,
}

impl ExampleGenerator {
    pub fn new(
        service: Arc<dyn GenerationService>,
        persona: Arc<PromptConfig>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            service,
            persona,
            model: model.into(),
        }
    }

    pub async fn generate_example(&self, expression: &str) -> Result<String> {
        tracing::info!("Generating example for the expression");
        ask(
            self.service.as_ref(),
            &self.model,
            &self.persona,
            prompts::example_prompt(expression),
        )
        .await
    }
}
