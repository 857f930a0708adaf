pub mod align;
pub mod compare;
pub mod finalize;
pub mod resolve;

use tracing::{debug, warn};

use crate::core::confidence::text_weight;
use crate::core::error::EnsembleError;
use crate::core::model::{ClassScores, EnsembleResult, LabelSpace, Mode};
use crate::core::placeholder::PlaceholderPolicy;
use crate::core::signals::{select_mode, SignalOutcome};
use crate::fusion::finalize::{BlendReport, Reporter};
use crate::ocr::Extraction;

/// What the collaborators produced for one image. `None` means the signal was
/// substituted: model missing, no text to classify, or engine unavailable.
#[derive(Debug, Clone)]
pub struct EnsembleSignals {
    pub extraction: Extraction,
    pub text: Option<ClassScores>,
    pub image: Option<ClassScores>,
}

pub trait FusionEngine {
    fn fuse(&self, signals: &EnsembleSignals) -> Result<EnsembleResult, EnsembleError>;

    /// Result for a request that failed before anything could be fused.
    fn fallback(&self, extraction: &Extraction, error: &str) -> EnsembleResult;
}

#[derive(Debug, Clone)]
pub struct WeightedFusionEngine {
    default_labels: LabelSpace,
    placeholder: PlaceholderPolicy,
    reporter: Reporter,
}

impl WeightedFusionEngine {
    pub fn new(default_labels: LabelSpace) -> Self {
        Self {
            default_labels,
            placeholder: PlaceholderPolicy::default(),
            reporter: Reporter::new(100, true),
        }
    }

    pub fn with_placeholder(mut self, placeholder: PlaceholderPolicy) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn default_labels(&self) -> &LabelSpace {
        &self.default_labels
    }

    /// The text classifier's own labels when it reported some, else the defaults.
    fn display_labels<'a>(&'a self, text: Option<&'a ClassScores>) -> &'a LabelSpace {
        text.map(|scores| &scores.labels)
            .filter(|labels| !labels.is_empty())
            .unwrap_or(&self.default_labels)
    }
}

impl FusionEngine for WeightedFusionEngine {
    fn fuse(&self, signals: &EnsembleSignals) -> Result<EnsembleResult, EnsembleError> {
        // An empty vector is as good as no output at all.
        let text = signals.text.as_ref().filter(|s| !s.probabilities.is_empty());
        let image = signals.image.as_ref().filter(|s| !s.probabilities.is_empty());

        let mode = select_mode(SignalOutcome {
            text_real: text.is_some(),
            image_real: image.is_some(),
        });
        if mode == Mode::Demo {
            debug!("no classifier produced output, returning demo placeholder");
            let placeholder = self.placeholder.demo(&self.default_labels);
            return Ok(self
                .reporter
                .placeholder(mode, &signals.extraction, placeholder, None));
        }

        let aligned = align::align_vectors(
            text.map_or(&[][..], |s| s.probabilities.as_slice()),
            image.map_or(&[][..], |s| s.probabilities.as_slice()),
        )?;
        let n = aligned.len();
        let labels = align::align_labels(self.display_labels(text), n);

        let label_mismatches = match (text, image) {
            (Some(t), Some(i)) => compare::label_mismatches(&t.labels, &i.labels, n),
            _ => Vec::new(),
        };
        if !label_mismatches.is_empty() {
            warn!(
                positions = ?label_mismatches,
                "text and image label spaces disagree at aligned positions"
            );
        }

        let nominal = text_weight(signals.extraction.text_length());
        let blend = resolve::blend(&aligned, nominal)
            .ok_or_else(|| EnsembleError::malformed("aligned", "empty class space"))?;
        debug!(
            mode = mode.as_str(),
            classes = n,
            text_weight = blend.weights.text,
            class_idx = blend.class_idx,
            confidence = blend.confidence,
            "blended classifier outputs"
        );

        Ok(self.reporter.blended(BlendReport {
            mode,
            extraction: &signals.extraction,
            labels,
            aligned,
            blend,
            nominal_text_weight: nominal,
            label_mismatches,
        }))
    }

    fn fallback(&self, extraction: &Extraction, error: &str) -> EnsembleResult {
        let placeholder = self.placeholder.fallback(&self.default_labels);
        self.reporter.placeholder(
            Mode::Fallback,
            extraction,
            placeholder,
            Some(error.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::TextStatus;

    fn labels() -> LabelSpace {
        ["form", "invoice", "list", "note", "sign"].into_iter().collect()
    }

    fn signals(text: &str, t: Option<Vec<f64>>, i: Option<Vec<f64>>) -> EnsembleSignals {
        EnsembleSignals {
            extraction: Extraction::from_raw(text),
            text: t.map(ClassScores::unlabeled),
            image: i.map(ClassScores::unlabeled),
        }
    }

    #[test]
    fn uses_default_labels_without_text_labels() {
        let engine = WeightedFusionEngine::new(labels());
        let result = engine
            .fuse(&signals(
                "Invoice number 2024-118 total due",
                Some(vec![0.1, 0.6, 0.3]),
                Some(vec![0.2, 0.2, 0.6]),
            ))
            .unwrap();
        assert_eq!(result.mode, Mode::Full);
        assert_eq!(result.prediction, "invoice");
        assert_eq!(result.labels.len(), 3);
    }

    #[test]
    fn text_labels_take_priority() {
        let engine = WeightedFusionEngine::new(labels());
        let mut s = signals("", None, Some(vec![0.1, 0.9]));
        s.text = Some(ClassScores::new(
            ["memo", "resume"].into_iter().collect(),
            vec![],
        ));
        // Empty text output is substituted, so defaults still apply.
        let result = engine.fuse(&s).unwrap();
        assert_eq!(result.prediction, "invoice");

        s.extraction = Extraction::from_raw("MEMO to all staff from management");
        s.text = Some(ClassScores::new(
            ["memo", "resume"].into_iter().collect(),
            vec![0.8, 0.2],
        ));
        let result = engine.fuse(&s).unwrap();
        assert_eq!(result.prediction, "memo");
    }

    #[test]
    fn empty_vectors_count_as_missing() {
        let engine = WeightedFusionEngine::new(labels());
        let result = engine
            .fuse(&signals("", Some(vec![]), Some(vec![])))
            .unwrap();
        assert_eq!(result.mode, Mode::Demo);
        assert_eq!(result.diagnostics.text_status, TextStatus::Empty);
    }

    #[test]
    fn malformed_vector_is_an_error() {
        let engine = WeightedFusionEngine::new(labels());
        let err = engine
            .fuse(&signals("abc", None, Some(vec![0.5, f64::INFINITY])))
            .unwrap_err();
        assert!(matches!(err, EnsembleError::MalformedInput { .. }));
    }

    #[test]
    fn mismatched_label_spaces_are_reported() {
        let engine = WeightedFusionEngine::new(labels());
        let s = EnsembleSignals {
            extraction: Extraction::from_raw("Dear Sir or Madam, I am writing"),
            text: Some(ClassScores::new(
                ["form", "letter", "memo"].into_iter().collect(),
                vec![0.2, 0.5, 0.3],
            )),
            image: Some(ClassScores::new(
                ["form", "invoice", "memo"].into_iter().collect(),
                vec![0.3, 0.3, 0.4],
            )),
        };
        let result = engine.fuse(&s).unwrap();
        assert_eq!(result.diagnostics.label_mismatches, vec![1]);
        assert_eq!(result.prediction, "letter");
    }
}
