//! Terminal output formatter

use super::{ANSWER_HEADING, EXAMPLE_HEADING, EXPRESSION_HEADING};
use mathkid_core::PipelineResult;

pub fn format_solution(result: &PipelineResult) -> String {
    let sections = [
        (EXPRESSION_HEADING, &result.expression),
        (EXAMPLE_HEADING, &result.example),
        (ANSWER_HEADING, &result.answer),
    ];

    sections
        .iter()
        .map(|(heading, body)| {
            let mut section = format!("{}:\n", heading);
            for line in body.lines() {
                section.push_str(&format!("  {}\n", line));
            }
            section
        })
        .collect::<Vec<_>>()
        .join("\n")
}
