//! CLI command handlers

pub mod classify;
pub mod config;
pub mod solve;

use crate::app::InputArgs;
use anyhow::{Context, Result};
use mathkid_core::RawInput;

/// Single input value for the pipeline; an image file wins over typed text
pub fn read_input(args: &InputArgs) -> Result<RawInput> {
    if let Some(ref path) = args.image {
        let bytes = std::fs::read(path)
            .with_context(|| format!("cannot read image {}", path.display()))?;
        return Ok(RawInput::Image(bytes));
    }
    Ok(RawInput::Text(args.question.join(" ")))
}
