//! Mathkid Core Library
//!
//! Turns a math question, typed or photographed, into three short answers
//! for a deaf pre-teen with limited reading ability.
//!
//! # Features
//! - Base64 image vs text classification with PNG/JPEG header validation
//! - Expression extraction through Gemini (vision model for images)
//! - Low-text visual example and definitive answer, generated concurrently
//! - Temporary upload files cleaned up on every exit path

pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod pipeline;
pub mod prompts;

pub use config::{Config, PipelineConfig, PromptConfig, ServiceConfig};
pub use error::{MathKidError, Error, Result};
pub use input::{classify, classify_input, ClassifiedInput, Modality, RawInput};
pub use llm::{
    FileHandle, GeminiClient, GenerationRequest, GenerationService, MetricsSnapshot, Part,
};
pub use pipeline::{
    AnswerResolver, ExampleGenerator, ExpressionExtractor, NoopObserver, Pipeline,
    PipelineResult, Stage, StageObserver,
};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "mathkid";
