//! Generation service integration
//!
//! Provides the service trait used by the pipeline stages and the Gemini
//! HTTP implementation.

mod client;
mod traits;

pub use client::{APIMetrics, GeminiClient, MetricsSnapshot};
pub use traits::*;
