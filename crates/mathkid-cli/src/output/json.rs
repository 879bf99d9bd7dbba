//! JSON output formatter

use mathkid_core::PipelineResult;

pub fn format_solution(result: &PipelineResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string()) + "\n"
}
