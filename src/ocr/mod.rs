pub mod bridge;

pub use bridge::TesseractBridge;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::core::document::DocumentImage;
use crate::core::error::SignalError;
use crate::core::model::TextStatus;

/// Turns a document image into recognized text.
///
/// `Err(SignalError::Unavailable)` means the engine itself could not run;
/// an image without text is `Ok` with an empty string.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, image: &DocumentImage) -> Result<String, SignalError>;

    fn is_available(&self) -> bool {
        true
    }
}

/// OCR text for one request, NFC-normalized and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub text: String,
    pub status: TextStatus,
    /// Chars in the trimmed text as the engine returned it, before NFC.
    pub length: usize,
}

impl Extraction {
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        let text: String = trimmed.nfc().collect();
        let status = if text.is_empty() {
            TextStatus::Empty
        } else {
            TextStatus::Extracted
        };
        Self {
            text,
            status,
            length: trimmed.chars().count(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            text: String::new(),
            status: TextStatus::Unavailable,
            length: 0,
        }
    }

    /// Character count; this is the only property of the text the blend weight sees.
    pub fn text_length(&self) -> usize {
        self.length
    }
}
