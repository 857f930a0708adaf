use serde::{Deserialize, Serialize};

/// Opaque document category name, e.g. `"invoice"`.
pub type ClassLabel = String;

/// One probability per label of some label space.
pub type ProbabilityVector = Vec<f64>;

/// Label returned when the winning index has no name in the display space.
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSpace(Vec<ClassLabel>);

impl LabelSpace {
    pub fn new(labels: Vec<ClassLabel>) -> Self {
        Self(labels)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(String::as_str)
    }

    /// Name at `idx`, or [`UNKNOWN_LABEL`] when the space is too short.
    pub fn name_at(&self, idx: usize) -> &str {
        self.get(idx).unwrap_or(UNKNOWN_LABEL)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[ClassLabel] {
        &self.0
    }

    /// First `n` labels; shorter spaces are returned whole.
    pub fn truncated(&self, n: usize) -> Self {
        Self(self.0.iter().take(n).cloned().collect())
    }
}

impl From<Vec<ClassLabel>> for LabelSpace {
    fn from(labels: Vec<ClassLabel>) -> Self {
        Self(labels)
    }
}

impl<'a> FromIterator<&'a str> for LabelSpace {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

/// Raw output of one classifier: its own labels and one probability per label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassScores {
    #[serde(default)]
    pub labels: LabelSpace,
    pub probabilities: ProbabilityVector,
}

impl ClassScores {
    pub fn new(labels: LabelSpace, probabilities: ProbabilityVector) -> Self {
        Self {
            labels,
            probabilities,
        }
    }

    /// Scores without a label list of their own.
    pub fn unlabeled(probabilities: ProbabilityVector) -> Self {
        Self {
            labels: LabelSpace::default(),
            probabilities,
        }
    }
}

/// Which upstream signals actually contributed to a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Full,
    Partial,
    Fallback,
    Demo,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Full => "full",
            Mode::Partial => "partial",
            Mode::Fallback => "fallback",
            Mode::Demo => "demo",
        }
    }

    /// Whether the prediction came out of a real blend.
    pub fn is_computed(&self) -> bool {
        matches!(self, Mode::Full | Mode::Partial)
    }
}

/// Outcome of OCR, kept apart from the text itself so that an engine that
/// could not run is distinguishable from a page without text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextStatus {
    Extracted,
    Empty,
    Unavailable,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EnsembleWeights {
    pub text: f64,
    pub image: f64,
}

impl EnsembleWeights {
    pub fn from_text_weight(text: f64) -> Self {
        let text = text.clamp(0.0, 1.0);
        Self {
            text,
            image: 1.0 - text,
        }
    }
}

/// Class counts per source before and after reconciliation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DebugInfo {
    pub text_classes: usize,
    pub image_classes: usize,
    pub aligned_classes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnostics {
    pub text_status: TextStatus,
    /// Weight the text-length rule asked for, before any zero-vector nulling.
    pub nominal_text_weight: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub label_mismatches: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Final decision for one image. Built once per request and never changed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnsembleResult {
    pub prediction: ClassLabel,
    pub confidence: f64,
    pub extracted_text: String,
    pub text_length: usize,
    pub ensemble_weights: EnsembleWeights,
    pub mode: Mode,
    /// Display labels of the reconciled class space.
    pub labels: LabelSpace,
    pub text_proba: ProbabilityVector,
    pub image_proba: ProbabilityVector,
    pub final_proba: ProbabilityVector,
    pub diagnostics: Diagnostics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<DebugInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_keeps_leading_labels() {
        let labels: LabelSpace = ["form", "invoice", "list", "note", "sign"].into_iter().collect();
        let short = labels.truncated(3);
        assert_eq!(short.as_slice(), &["form", "invoice", "list"]);
        assert_eq!(labels.truncated(9).len(), 5);
    }

    #[test]
    fn missing_index_names_unknown() {
        let labels: LabelSpace = ["form"].into_iter().collect();
        assert_eq!(labels.name_at(0), "form");
        assert_eq!(labels.name_at(3), UNKNOWN_LABEL);
    }

    #[test]
    fn mode_serializes_lowercase() {
        let json = serde_json::to_string(&Mode::Partial).unwrap();
        assert_eq!(json, "\"partial\"");
    }

    #[test]
    fn weights_sum_to_one() {
        let weights = EnsembleWeights::from_text_weight(0.7);
        assert!((weights.text + weights.image - 1.0).abs() < 1e-12);
    }
}
