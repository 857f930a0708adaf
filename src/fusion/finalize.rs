use crate::core::confidence::text_weight;
use crate::core::model::{
    DebugInfo, Diagnostics, EnsembleResult, EnsembleWeights, LabelSpace, Mode,
};
use crate::core::placeholder::Placeholder;
use crate::fusion::align::AlignmentResult;
use crate::fusion::resolve::Blend;
use crate::ocr::Extraction;

/// Everything needed to report a computed (`full` / `partial`) decision.
#[derive(Debug, Clone)]
pub struct BlendReport<'a> {
    pub mode: Mode,
    pub extraction: &'a Extraction,
    pub labels: LabelSpace,
    pub aligned: AlignmentResult,
    pub blend: Blend,
    pub nominal_text_weight: f64,
    pub label_mismatches: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Reporter {
    pub display_text_limit: usize,
    pub include_debug: bool,
}

impl Reporter {
    pub fn new(display_text_limit: usize, include_debug: bool) -> Self {
        Self {
            display_text_limit,
            include_debug,
        }
    }

    pub fn blended(&self, report: BlendReport<'_>) -> EnsembleResult {
        let debug_info = DebugInfo {
            text_classes: report.aligned.text_classes,
            image_classes: report.aligned.image_classes,
            aligned_classes: report.aligned.len(),
        };
        EnsembleResult {
            prediction: report.labels.name_at(report.blend.class_idx).to_string(),
            confidence: report.blend.confidence,
            extracted_text: display_text(&report.extraction.text, self.display_text_limit),
            text_length: report.extraction.text_length(),
            ensemble_weights: report.blend.weights,
            mode: report.mode,
            labels: report.labels,
            text_proba: report.aligned.text,
            image_proba: report.aligned.image,
            final_proba: report.blend.final_proba,
            diagnostics: Diagnostics {
                text_status: report.extraction.status,
                nominal_text_weight: report.nominal_text_weight,
                label_mismatches: report.label_mismatches,
                error: None,
            },
            debug_info: self.include_debug.then_some(debug_info),
        }
    }

    /// A `demo` or `fallback` result. No vectors are attached and the weights
    /// are the step-rule weights for the extracted text, since nothing was blended.
    pub fn placeholder(
        &self,
        mode: Mode,
        extraction: &Extraction,
        placeholder: Placeholder,
        error: Option<String>,
    ) -> EnsembleResult {
        let nominal = text_weight(extraction.text_length());
        EnsembleResult {
            prediction: placeholder.label,
            confidence: placeholder.confidence,
            extracted_text: display_text(&extraction.text, self.display_text_limit),
            text_length: extraction.text_length(),
            ensemble_weights: EnsembleWeights::from_text_weight(nominal),
            mode,
            labels: LabelSpace::default(),
            text_proba: Vec::new(),
            image_proba: Vec::new(),
            final_proba: Vec::new(),
            diagnostics: Diagnostics {
                text_status: extraction.status,
                nominal_text_weight: nominal,
                label_mismatches: Vec::new(),
                error,
            },
            debug_info: self.include_debug.then_some(DebugInfo {
                text_classes: 0,
                image_classes: 0,
                aligned_classes: 0,
            }),
        }
    }
}

/// First `limit` characters, with `...` appended when anything was cut.
pub fn display_text(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit).collect();
    out.push_str("...");
    out
}
