//! Base64 image vs plain text heuristic

use super::{ClassifiedInput, Modality};
use base64::Engine;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;

/// Inputs shorter than this are always text; real image payloads are far longer
pub const MIN_IMAGE_PAYLOAD_LEN: usize = 20;

/// Decide whether `input` is a base64 encoded PNG/JPEG or a typed question
pub fn classify(input: &str) -> Modality {
    if decode_image_payload(input).is_some() {
        Modality::Image
    } else {
        Modality::Text
    }
}

/// Classify and keep what the extractor needs for the detected modality
pub fn classify_input(input: &str) -> ClassifiedInput {
    match decode_image_payload(input) {
        Some((bytes, mime_type)) => ClassifiedInput::Image { bytes, mime_type },
        None => ClassifiedInput::Text(input.to_string()),
    }
}

/// Decode an image payload, returning the raw bytes and their MIME type.
///
/// A leading data-URI prefix (`data:image/png;base64,`) is dropped first.
/// Decoding is strict: non-alphabet characters, whitespace, missing or
/// non-canonical padding all reject the payload. The decoded bytes must then
/// carry a parseable PNG or JPEG header. Anything else yields `None`.
pub fn decode_image_payload(input: &str) -> Option<(Vec<u8>, &'static str)> {
    if input.chars().count() < MIN_IMAGE_PAYLOAD_LEN {
        return None;
    }

    let encoded = strip_data_uri(input);
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()?;
    let mime_type = sniff_image(&bytes)?;
    Some((bytes, mime_type))
}

fn strip_data_uri(input: &str) -> &str {
    input
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .map(|(_, data)| data)
        .unwrap_or(input)
}

fn sniff_image(bytes: &[u8]) -> Option<&'static str> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?;

    let mime_type = match reader.format()? {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        _ => return None,
    };

    // Header parse only; pixels are never decoded
    reader.into_dimensions().ok()?;
    Some(mime_type)
}
