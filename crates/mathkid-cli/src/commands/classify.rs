//! Classify command

use super::read_input;
use crate::app::{InputArgs, OutputFormat};
use anyhow::Result;
use mathkid_core::{classify_input, ClassifiedInput, MathKidError};

pub async fn run(args: InputArgs, format: OutputFormat) -> Result<()> {
    let input = read_input(&args)?;
    if input.is_empty() {
        return Err(MathKidError::EmptyInput(
            "please type some input or pass an image with --image".to_string(),
        )
        .into());
    }

    let classified = classify_input(&input.into_payload());
    let size = match &classified {
        ClassifiedInput::Text(text) => text.len(),
        ClassifiedInput::Image { bytes, .. } => bytes.len(),
    };

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "modality": classified.modality(),
                "mime_type": classified.mime_type(),
                "bytes": size,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Md => {
            println!("- **Modality**: {}", classified.modality());
            if let Some(mime) = classified.mime_type() {
                println!("- **MIME type**: `{}`", mime);
            }
            println!("- **Size**: {} bytes", size);
        }
        OutputFormat::Cli => match classified.mime_type() {
            Some(mime) => println!("{} ({}, {} bytes)", classified.modality(), mime, size),
            None => println!("{} ({} bytes)", classified.modality(), size),
        },
    }
    Ok(())
}
