//! Request input types and modality detection

mod classifier;

pub use classifier::{classify, classify_input, decode_image_payload, MIN_IMAGE_PAYLOAD_LEN};

use base64::Engine;
use serde::Serialize;

/// Input exactly as the UI layer received it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    /// Typed question
    Text(String),
    /// Uploaded image file contents (PNG/JPEG)
    Image(Vec<u8>),
}

impl RawInput {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn image(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Image(bytes.into())
    }

    /// True when there is nothing to solve
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Image(bytes) => bytes.is_empty(),
        }
    }

    /// String payload fed to the classifier.
    ///
    /// Image uploads are base64 encoded with the standard padded alphabet.
    pub fn into_payload(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Image(bytes) => base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }
}

/// Modality of a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Image,
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// Classifier output, consumed by the expression extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedInput {
    Text(String),
    Image {
        bytes: Vec<u8>,
        mime_type: &'static str,
    },
}

impl ClassifiedInput {
    pub fn modality(&self) -> Modality {
        match self {
            Self::Text(_) => Modality::Text,
            Self::Image { .. } => Modality::Image,
        }
    }

    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            Self::Text(_) => None,
            Self::Image { mime_type, .. } => Some(mime_type),
        }
    }
}
