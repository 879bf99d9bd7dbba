//! Definitive answer stage

use super::ask;
use crate::config::PromptConfig;
use crate::error::Result;
use crate::llm::GenerationService;
use crate::prompts;
use std::sync::Arc;

/// Asks for the numeric value or simplification of an expression
pub struct AnswerResolver {
    service: Arc<dyn GenerationService>,
    persona: Arc<PromptConfig>,
    model: String,
}

impl AnswerResolver {
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

    pub async fn resolve_answer(&self, expression: &str) -> Result<String> {
        tracing::info!("Resolving definitive answer");
        ask(
            self.service.as_ref(),
            &self.model,
            &self.persona,
            prompts::answer_prompt(expression),
        )
        .await
    }
}
