pub mod bridge;

pub use bridge::{BridgeInput, ModelBridge, ScriptImageClassifier, ScriptTextClassifier};

use crate::core::document::DocumentImage;
use crate::core::error::SignalError;
use crate::core::model::ClassScores;

/// Maps OCR text to a distribution over the text model's own labels.
pub trait TextClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<ClassScores, SignalError>;

    fn is_available(&self) -> bool {
        true
    }
}

/// Maps image pixels to a distribution over the image model's own labels.
pub trait ImageClassifier: Send + Sync {
    fn classify(&self, image: &DocumentImage) -> Result<ClassScores, SignalError>;

    fn is_available(&self) -> bool {
        true
    }
}
