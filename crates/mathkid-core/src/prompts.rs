//! Fixed prompt templates for the three pipeline stages

/// Extraction prompt sent alongside an uploaded image
pub const IMAGE_EXTRACTION_PROMPT: &str =
    "Identify the main mathematical expression present in this image. Only the expression.";

/// Extraction prompt for a typed question
pub fn text_extraction_prompt(input: &str) -> String {
    format!(
        "Identify the main mathematical expression in: '{}'. Only the expression.",
        input
    )
}

/// Low-text, visual example for a child who cannot read
pub fn example_prompt(expression: &str) -> String {
    format!(
        "Generate a very simple and visually intuitive example so that a child who cannot read \
         can understand the following mathematical expression: '{}'. Use as little text as \
         possible, focusing on symbols and visual representations. If it is an operation, show \
         the operation happening with simple objects. If it is a concept (such as a power), show \
         a basic representation. The answer must be concise and suitable for a child.",
        expression
    )
}

/// Definitive numeric value or simplification
pub fn answer_prompt(expression: &str) -> String {
    format!(
        "What is the result of the following mathematical expression: '{}'? Answer with the \
         numeric value or the simplification, clearly and concisely.",
        expression
    )
}
