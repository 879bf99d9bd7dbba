//! Output formatters

pub mod json;
pub mod markdown;
pub mod terminal;

use crate::app::OutputFormat;
use mathkid_core::PipelineResult;

pub const EXPRESSION_HEADING: &str = "Identified expression";
pub const EXAMPLE_HEADING: &str = "Example for kids";
pub const ANSWER_HEADING: &str = "Definitive answer";

/// Format one pipeline result
pub fn format_solution(result: &PipelineResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_solution(result),
        OutputFormat::Md => markdown::format_solution(result),
        OutputFormat::Cli => terminal::format_solution(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PipelineResult {
        PipelineResult {
            expression: "2 + 2 * 3".to_string(),
            example: "🍎🍎 + 🍎🍎🍎🍎🍎🍎\n= 8 🍎".to_string(),
            answer: "8".to_string(),
        }
    }

    #[test]
    fn test_json_roundtrips() {
        let out = format_solution(&sample(), OutputFormat::Json);
        let parsed: PipelineResult = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_markdown_has_three_sections() {
        let out = format_solution(&sample(), OutputFormat::Md);
        assert!(out.contains("### Identified expression"));
        assert!(out.contains("### Example for kids"));
        assert!(out.contains("### Definitive answer"));
        assert!(out.contains("= 8 🍎"));
    }

    #[test]
    fn test_terminal_indents_multiline_example() {
        let out = format_solution(&sample(), OutputFormat::Cli);
        assert!(out.starts_with("Identified expression:\n  2 + 2 * 3\n"));
        assert!(out.contains("  = 8 🍎\n"));
        assert!(out.ends_with("Definitive answer:\n  8\n"));
    }
}
