//! Markdown output formatter

use super::{ANSWER_HEADING, EXAMPLE_HEADING, EXPRESSION_HEADING};
use mathkid_core::PipelineResult;

pub fn format_solution(result: &PipelineResult) -> String {
    let mut output = String::new();

    for (heading, body) in [
        (EXPRESSION_HEADING, &result.expression),
        (EXAMPLE_HEADING, &result.example),
        (ANSWER_HEADING, &result.answer),
    ] {
        output.push_str(&format!("### {}\n\n{}\n\n", heading, body));
    }

    output
}
