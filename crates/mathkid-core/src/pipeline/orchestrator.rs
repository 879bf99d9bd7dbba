//! Pipeline orchestration
//!
//! Runs the stages in a fixed order. Example generation and answer
//! resolution only depend on the extracted expression, so they are
//! dispatched together and joined before the result is built. The first
//! failing stage aborts the request and nothing partial is returned.

use super::{AnswerResolver, ExampleGenerator, ExpressionExtractor};
use crate::config::Config;
use crate::error::{MathKidError, Result};
use crate::input::{classify_input, RawInput};
use crate::llm::{GeminiClient, GenerationService};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Classifying,
    Extracting,
    GeneratingExample,
    ResolvingAnswer,
    Done,
    Failed,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Progress line suitable for a UI
    pub fn description(&self) -> &'static str {
        match self {
            Self::Idle => "Waiting for a question",
            Self::Classifying => "Checking whether the input is text or an image",
            Self::Extracting => "Identifying the expression",
            Self::GeneratingExample => "Generating an example of the expression",
            Self::ResolvingAnswer => "Calculating the definitive answer",
            Self::Done => "Done",
            Self::Failed => "Failed",
        }
    }
}

/// Notified on every stage transition
pub trait StageObserver: Send + Sync {
    fn on_stage(&self, stage: Stage);
}

/// Observer that ignores transitions
pub struct NoopObserver;

impl StageObserver for NoopObserver {
    fn on_stage(&self, _stage: Stage) {}
}

impl<F> StageObserver for F
where
    F: Fn(Stage) + Send + Sync,
{
    fn on_stage(&self, stage: Stage) {
        self(stage)
    }
}

/// Complete response for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub expression: String,
    pub example: String,
    pub answer: String,
}

/// Classify → extract → example + answer
pub struct Pipeline {
    extractor: ExpressionExtractor,
    example_generator: ExampleGenerator,
    answer_resolver: AnswerResolver,
    concurrent_followups: bool,
}

impl Pipeline {
    /// Build the stages around a shared service handle and persona
    pub fn new(service: Arc<dyn GenerationService>, config: &Config) -> Self {
        let persona = Arc::new(config.persona.clone());
        let text_model = config.service.text_model.as_str();

        Self {
            extractor: ExpressionExtractor::new(service.clone(), persona.clone(), config),
            example_generator: ExampleGenerator::new(service.clone(), persona.clone(), text_model),
            answer_resolver: AnswerResolver::new(service, persona, text_model),
            concurrent_followups: config.pipeline.concurrent_followups,
        }
    }

    /// Build with a Gemini client; fails when the API key is missing
    pub fn from_config(config: &Config) -> Result<(Self, Arc<GeminiClient>)> {
        let client = Arc::new(GeminiClient::new(&config.service)?);
        let pipeline = Self::new(client.clone(), config);
        Ok((pipeline, client))
    }

    pub async fn run(&self, input: RawInput) -> Result<PipelineResult> {
        self.run_with_observer(input, &NoopObserver).await
    }

    pub async fn run_with_observer(
        &self,
        input: RawInput,
        observer: &dyn StageObserver,
    ) -> Result<PipelineResult> {
        let result = self.execute(input, observer).await;

        match &result {
            Ok(_) => observer.on_stage(Stage::Done),
            // Nothing ran; the caller reports this as a warning
            Err(MathKidError::EmptyInput(_)) => {}
            Err(e) => {
                tracing::warn!("Pipeline failed: {}", e);
                observer.on_stage(Stage::Failed);
            }
        }

        result
    }

    async fn execute(
        &self,
        input: RawInput,
        observer: &dyn StageObserver,
    ) -> Result<PipelineResult> {
        if input.is_empty() {
            return Err(MathKidError::EmptyInput(
                "type a math question or provide an image".to_string(),
            ));
        }

        observer.on_stage(Stage::Classifying);
        let classified = classify_input(&input.into_payload());

        observer.on_stage(Stage::Extracting);
        let expression = self.extractor.extract(&classified).await?;
        tracing::debug!("Extracted expression: {}", expression);

        let (example, answer) = if self.concurrent_followups {
            observer.on_stage(Stage::GeneratingExample);
            observer.on_stage(Stage::ResolvingAnswer);
            futures::try_join!(
                self.example_generator.generate_example(&expression),
                self.answer_resolver.resolve_answer(&expression)
            )?
        } else {
            observer.on_stage(Stage::GeneratingExample);
            let example = self.example_generator.generate_example(&expression).await?;
            observer.on_stage(Stage::ResolvingAnswer);
            let answer = self.answer_resolver.resolve_answer(&expression).await?;
            (example, answer)
        };

        Ok(PipelineResult {
            expression,
            example,
            answer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_stages() {
        assert!(Stage::Done.is_terminal());
        assert!(Stage::Failed.is_terminal());
        assert!(!Stage::Extracting.is_terminal());
        assert!(!Stage::Idle.is_terminal());
    }

    #[test]
    fn test_result_serializes_three_fields() {
        let result = PipelineResult {
            expression: "2 + 2 * 3".to_string(),
            example: "🍎🍎 + 🍎🍎🍎🍎🍎🍎".to_string(),
            answer: "8".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["expression"], "2 + 2 * 3");
        assert_eq!(json["answer"], "8");
    }
}
